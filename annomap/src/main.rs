use annomap::handlers::{
    handle_config_set_reference, handle_config_set_token, handle_config_show, handle_init,
    handle_locate, handle_render, handle_report, init_tracing,
};
use annomap_core::config::DEFAULT_CONFIG_DIR;
use annomap_core::print_banner;
use commands::command_argument_builder;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");
    let config_dir = chosen_command
        .get_one::<String>("config")
        .cloned()
        .unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string());

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    init_tracing(verbose, quiet);

    match chosen_command.subcommand() {
        Some(("init", primary_command)) => handle_init(primary_command, &config_dir),
        Some(("config", primary_command)) => match primary_command.subcommand() {
            Some(("set-token", secondary_command)) => {
                handle_config_set_token(secondary_command, &config_dir)
            }
            Some(("set-reference", secondary_command)) => {
                handle_config_set_reference(secondary_command, &config_dir)
            }
            Some(("show", _)) => handle_config_show(&config_dir),
            _ => unreachable!("clap should ensure we don't get here"),
        },
        Some(("locate", primary_command)) => handle_locate(primary_command, &config_dir),
        Some(("report", primary_command)) => {
            handle_report(primary_command, &config_dir, quiet).await
        }
        Some(("render", primary_command)) => handle_render(primary_command),
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
