use crate::CLAP_STYLING;
use annomap_core::config::DEFAULT_CONFIG_DIR;
use clap::{arg, command};
use std::path::PathBuf;
use url::Url;

const FORMATS: [&str; 6] = ["text", "txt", "json", "html", "markdown", "md"];
const DEFAULT_TIMEOUT: &str = "30";

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("annomap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("annomap")
        .about("Turns hashtag-structured reference annotations into a mind map")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log every token merge and request")
                .required(false)
                .global(true)
                .conflicts_with("quiet"),
        )
        .arg(
            arg!(-c --"config" <DIR>)
                .required(false)
                .global(true)
                .help("Directory holding the annomap settings database")
                .default_value(DEFAULT_CONFIG_DIR),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Initializes the annomap settings database on your filesystem")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location to store the settings database (default: --config)"),
                )
                .arg(
                    arg!(-f --"force")
                        .help("Overwrite any existing settings database without asking")
                        .required(false),
                ),
        )
        .subcommand(
            command!("config")
                .about("Manage saved settings")
                .subcommand_required(true)
                .subcommand(
                    command!("set-token")
                        .about("Saves the API token used for every request")
                        .arg(arg!(<TOKEN>).required(true).help("Reference manager API token")),
                )
                .subcommand(
                    command!("set-reference")
                        .about("Selects the reference used when --reference is not given")
                        .arg(arg!(<ID>).required(true).help("Numeric reference id")),
                )
                .subcommand(command!("show").about("Prints the saved settings")),
        )
        .subcommand(
            command!("locate")
                .about(
                    "Recognizes a reference page URL and selects that reference for the next \
                report",
                )
                .arg(
                    arg!(<URL>)
                        .required(true)
                        .help("Address of a reference page in the web app"),
                )
                .arg(
                    arg!(--"no-save")
                        .required(false)
                        .help("Only print the reference id, do not select it")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("report")
                .about("Fetches a reference with its notes and renders the mind map")
                .arg(
                    arg!(-r --"reference" <ID>)
                        .required(false)
                        .help("Reference id (default: the saved reference)"),
                )
                .arg(
                    arg!(--"token" <TOKEN>)
                        .required(false)
                        .help("API token (default: the saved token)"),
                )
                .arg(
                    arg!(--"base-url" <URL>)
                        .required(false)
                        .help("Reference service API root")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per request timeout")
                        .value_parser(clap::value_parser!(u64))
                        .default_value(DEFAULT_TIMEOUT),
                )
                .arg(format_arg())
                .arg(output_arg()),
        )
        .subcommand(
            command!("render")
                .about("Builds the mind map from reference and notes JSON saved on disk")
                .arg(
                    arg!(--"reference-file" <PATH>)
                        .required(true)
                        .help("JSON body of GET /references/{id}")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--"notes-file" <PATH>)
                        .required(true)
                        .help("JSON body of GET /references/{id}/notes")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(format_arg())
                .arg(output_arg()),
        )
}

fn format_arg() -> clap::Arg {
    arg!(-f --"format" <FORMAT>)
        .required(false)
        .help("Report format: text, json, html, markdown (default: from --output, else text)")
        .value_parser(FORMATS)
}

fn output_arg() -> clap::Arg {
    arg!(-o --"output" <PATH>)
        .required(false)
        .help("Save report to file (default: display to screen)")
        .value_parser(clap::value_parser!(PathBuf))
}
