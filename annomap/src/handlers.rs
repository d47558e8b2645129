use annomap_client::{Annotation, Reference};
use annomap_core::config::{Settings, SettingsStore, database_path};
use annomap_core::fetch::{
    DEFAULT_TIMEOUT_SECS, ReportOptions, ReportOverrides, ReportProgressCallback, build_report,
    execute_report,
};
use annomap_core::locate::{ReferenceView, classify_url};
use annomap_core::report::{ReportFormat, render_report, save_report};
use annomap_core::{MindMap, RandomIds, RenderOptions};
use anyhow::{Context, anyhow, bail};
use clap::ArgMatches;
use colored::Colorize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Level, debug};
use url::Url;

/// Routes logs to stderr so reports on stdout stay clean.
pub fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

// Helper functions for report handlers

/// Picks the output format: the explicit flag wins, then the output file's
/// extension, then plain text.
pub fn resolve_format(
    format: Option<&str>,
    output: Option<&Path>,
) -> anyhow::Result<ReportFormat> {
    if let Some(name) = format {
        return ReportFormat::from_str(name)
            .ok_or_else(|| anyhow!("Unknown report format '{}'", name));
    }

    let from_extension = output
        .and_then(|path| path.extension())
        .and_then(|ext| ext.to_str())
        .and_then(ReportFormat::from_str);
    Ok(from_extension.unwrap_or(ReportFormat::Text))
}

/// Loads saved API responses: a reference object and an array of notes.
pub fn load_inputs_from_files(
    reference_file: &Path,
    notes_file: &Path,
) -> anyhow::Result<(Reference, Vec<Annotation>)> {
    let reference_json = fs::read_to_string(reference_file)
        .with_context(|| format!("Failed to read reference file {}", reference_file.display()))?;
    let reference: Reference = serde_json::from_str(&reference_json)
        .with_context(|| format!("{} is not a reference object", reference_file.display()))?;

    let notes_json = fs::read_to_string(notes_file)
        .with_context(|| format!("Failed to read notes file {}", notes_file.display()))?;
    let notes: Vec<Annotation> = serde_json::from_str(&notes_json)
        .with_context(|| format!("{} is not an array of notes", notes_file.display()))?;

    Ok((reference, notes))
}

/// Shows only the ends of a token.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

/// Renders the map and either saves it or prints it to stdout.
pub fn write_output(
    map: &MindMap,
    format: ReportFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let content = render_report(map, &RenderOptions::default(), format)
        .context("Failed to serialize the mind map")?;

    match output {
        Some(path) => {
            save_report(&content, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Opens the settings database, creating it on first use.
pub fn open_store(config_dir: &str) -> anyhow::Result<SettingsStore> {
    let db_path = database_path(config_dir);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    debug!("Opening settings at {}", db_path.display());
    SettingsStore::new(&db_path)
        .with_context(|| format!("Failed to open settings database {}", db_path.display()))
}

/// Saved settings, or empty settings when nothing was saved yet.
pub fn load_settings(config_dir: &str) -> anyhow::Result<Settings> {
    let db_path = database_path(config_dir);
    if !SettingsStore::exists(&db_path) {
        debug!("No settings database at {}", db_path.display());
        return Ok(Settings::default());
    }
    let store = SettingsStore::new(&db_path)
        .with_context(|| format!("Failed to open settings database {}", db_path.display()))?;
    Ok(store.load()?)
}

/// Validates and stores a reference id.
pub fn select_reference(store: &SettingsStore, reference_id: &str) -> anyhow::Result<()> {
    let reference_id = reference_id.trim();
    if reference_id.is_empty() || !reference_id.chars().all(|c| c.is_ascii_digit()) {
        bail!("Reference ids are numeric, got '{}'", reference_id);
    }
    store.set_reference_id(reference_id)?;
    Ok(())
}

fn view_name(view: ReferenceView) -> &'static str {
    match view {
        ReferenceView::Detail => "detail page",
        ReferenceView::UnsortedDetail => "unsorted detail page",
        ReferenceView::Pdf => "PDF viewer",
    }
}

fn fail(err: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "✗".red().bold(), err);
    std::process::exit(1);
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> io::Result<String> {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().to_lowercase())
}

pub fn handle_init(args: &ArgMatches, config_dir: &str) {
    let target = args
        .get_one::<String>("PATH")
        .map(String::as_str)
        .unwrap_or(config_dir);
    let force = args.get_flag("force");

    if let Err(e) = init_settings(target, force) {
        fail(e);
    }
}

fn init_settings(config_dir: &str, force: bool) -> anyhow::Result<()> {
    print_divider();
    println!("{}", "  ANNOMAP INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    let db_path = database_path(config_dir);
    let annomap_config_dir = db_path
        .parent()
        .ok_or_else(|| anyhow!("Invalid config directory {}", config_dir))?;

    println!(
        "{} Target: {}",
        "→".blue(),
        annomap_config_dir.display().to_string().bright_white()
    );
    println!();

    if SettingsStore::exists(&db_path) {
        let overwrite = if force {
            true
        } else {
            println!("{}", "⚠ WARNING".yellow().bold());
            println!("Settings database already exists at:");
            println!(
                "  {} {}",
                "•".yellow(),
                db_path.display().to_string().bright_white()
            );
            println!();
            println!("{}", "Overwriting clears the saved token and reference.".yellow());

            let response = print_prompt("Do you want to continue? [y/N]:")?;
            println!();
            response == "y" || response == "yes"
        };

        if !overwrite {
            println!("{} Keeping existing settings", "→".blue());
            return Ok(());
        }

        SettingsStore::drop(&db_path)
            .with_context(|| format!("Failed to remove {}", db_path.display()))?;
        println!("{} Existing settings removed", "✓".green().bold());
    }

    println!("{} Creating directory structure...", "→".blue());
    fs::create_dir_all(annomap_config_dir).with_context(|| {
        format!(
            "Failed to create config directory {}",
            annomap_config_dir.display()
        )
    })?;

    println!("{} Creating settings database...", "→".blue());
    SettingsStore::new(&db_path)
        .with_context(|| format!("Failed to create {}", db_path.display()))?;

    println!();
    print_divider();
    println!("{}", "  INITIALIZATION COMPLETE".green().bold());
    print_divider();
    println!();
    println!(
        "{} Database: {}",
        "✓".green().bold(),
        db_path.display().to_string().bright_white()
    );
    println!(
        "{} Next: {}",
        "ℹ".blue(),
        "annomap config set-token <TOKEN>".bright_white()
    );
    println!();
    Ok(())
}

pub fn handle_config_set_token(args: &ArgMatches, config_dir: &str) {
    let result = args
        .get_one::<String>("TOKEN")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow!("The token must not be empty"))
        .and_then(|token| {
            let store = open_store(config_dir)?;
            store.set_auth_token(&token)?;
            Ok(token)
        });

    match result {
        Ok(token) => println!("{} Token saved: {}", "✓".green().bold(), mask_token(&token)),
        Err(e) => fail(e),
    }
}

pub fn handle_config_set_reference(args: &ArgMatches, config_dir: &str) {
    let reference_id = args
        .get_one::<String>("ID")
        .map(String::as_str)
        .unwrap_or_default();

    let result = open_store(config_dir).and_then(|store| select_reference(&store, reference_id));
    match result {
        Ok(()) => println!(
            "{} Reference selected: {}",
            "✓".green().bold(),
            reference_id.trim().bright_white()
        ),
        Err(e) => fail(e),
    }
}

pub fn handle_config_show(config_dir: &str) {
    let settings = match load_settings(config_dir) {
        Ok(settings) => settings,
        Err(e) => fail(e),
    };

    println!(
        "{} {}",
        "Database: ".blue(),
        database_path(config_dir).display().to_string().bright_white()
    );
    println!(
        "{} {}",
        "Token:    ".blue(),
        settings
            .auth_token
            .as_deref()
            .map(mask_token)
            .unwrap_or_else(|| "(not set)".dimmed().to_string())
    );
    println!(
        "{} {}",
        "Reference:".blue(),
        settings
            .reference_id
            .unwrap_or_else(|| "(not set)".dimmed().to_string())
    );
}

pub fn handle_locate(args: &ArgMatches, config_dir: &str) {
    let raw = args
        .get_one::<String>("URL")
        .map(String::as_str)
        .unwrap_or_default();
    let no_save = args.get_flag("no-save");

    let Some(location) = classify_url(raw) else {
        eprintln!(
            "{} Not a reference page, annomap is not applicable here: {}",
            "✗".red().bold(),
            raw
        );
        std::process::exit(1);
    };

    println!(
        "{} Reference {} ({})",
        "✓".green().bold(),
        location.reference_id.bright_white(),
        view_name(location.view)
    );

    if !no_save {
        let saved = open_store(config_dir)
            .and_then(|store| select_reference(&store, &location.reference_id));
        if let Err(e) = saved {
            fail(e);
        }
        println!("{} Selected for the next report", "→".blue());
    }
}

pub async fn handle_report(args: &ArgMatches, config_dir: &str, quiet: bool) {
    let format = args.get_one::<String>("format").map(String::as_str);
    let output = args.get_one::<PathBuf>("output").map(PathBuf::as_path);
    let timeout = args
        .get_one::<u64>("timeout")
        .copied()
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let overrides = ReportOverrides {
        reference_id: args.get_one::<String>("reference").cloned(),
        auth_token: args.get_one::<String>("token").cloned(),
        base_url: args.get_one::<Url>("base-url").map(Url::to_string),
    };

    let prepared = resolve_format(format, output).and_then(|format| {
        let settings = load_settings(config_dir)?;
        let options = ReportOptions::from_settings(&settings, overrides)?
            .with_timeout(timeout)
            .with_progress(!quiet);
        Ok((format, options))
    });
    let (format, options) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => fail(e),
    };

    let progress_callback: Option<ReportProgressCallback> = if quiet {
        None
    } else {
        Some(Arc::new(|msg: String| {
            debug!("{}", msg);
        }))
    };

    let map = match execute_report(options, progress_callback).await {
        Ok(map) => map,
        Err(e) => fail(e.into()),
    };

    if let Err(e) = write_output(&map, format, output) {
        fail(e);
    }
}

pub fn handle_render(args: &ArgMatches) {
    let format = args.get_one::<String>("format").map(String::as_str);
    let output = args.get_one::<PathBuf>("output").map(PathBuf::as_path);
    let (Some(reference_file), Some(notes_file)) = (
        args.get_one::<PathBuf>("reference-file"),
        args.get_one::<PathBuf>("notes-file"),
    ) else {
        fail(anyhow!("Both --reference-file and --notes-file are required"));
    };

    let result = resolve_format(format, output).and_then(|format| {
        let (reference, notes) = load_inputs_from_files(reference_file, notes_file)?;
        let map = build_report(&reference, &notes, RandomIds)?;
        write_output(&map, format, output)
    });

    if let Err(e) = result {
        fail(e);
    }
}
