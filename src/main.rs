//! CLI entry point for the annotation engine.
//!
//! Runs the text pass over Lua files on disk: prints the edits it would make,
//! applies them in place, or reports how files are classified.

use anyhow::Context;
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use gluadoc::diff::{TextEdit, apply_edits};
use gluadoc::io::{ExitCode, JsonResponse, OutputFormat};
use gluadoc::scope::SourcePath;
use gluadoc::synth::ScopeTarget;
use gluadoc::{AnnotatorContext, ConfigError, Settings, annotate_file};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Type annotations for Garry's Mod Lua
#[derive(Parser)]
#[command(
    name = "gluadoc",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate LuaLS annotations for Garry's Mod framework calls",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up .gluadoc directory with default configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Display active settings
    Config,

    /// Generate annotations for Lua files
    #[command(after_help = "Examples:
  gluadoc annotate lua/entities
  gluadoc annotate lua --apply
  gluadoc annotate lua --check --json")]
    Annotate {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write the edits back to disk
        #[arg(long, conflicts_with = "check")]
        apply: bool,

        /// Exit with code 3 if any file would change
        #[arg(long)]
        check: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the scope, type and base inferred for each file
    Classify {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct FileEdits {
    path: String,
    edits: Vec<TextEdit>,
    applied: bool,
}

#[derive(Debug, Serialize)]
struct FileClass {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<ScopeTarget>,
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if debug { "gluadoc=debug" } else { "gluadoc=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Lua files under `paths`, sorted for stable output
fn collect_lua_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in paths {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        for entry in WalkDir::new(root).follow_links(false) {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    let is_lua = path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("lua"));
                    if entry.file_type().is_file() && is_lua {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => tracing::warn!(error = %e, "skipping unreadable entry"),
            }
        }
    }
    files.sort();
    files.dedup();
    files
}

fn read_source(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
            None
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
}

fn exit_on_config_error(e: &ConfigError, json: bool) -> ! {
    if json {
        if let Ok(out) = serde_json::to_string_pretty(&JsonResponse::from_config_error(e)) {
            println!("{out}");
        }
    } else {
        eprintln!("Configuration error: {e}");
        for suggestion in e.recovery_suggestions() {
            eprintln!("  - {suggestion}");
        }
    }
    std::process::exit(ExitCode::from_config_error(e).into());
}

fn run_annotate(
    ctx: &AnnotatorContext,
    paths: &[PathBuf],
    apply: bool,
    check: bool,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let mut results = Vec::new();

    for file in collect_lua_files(paths) {
        let Some(text) = read_source(&file) else {
            continue;
        };
        let display = file.to_string_lossy().into_owned();
        let Some(edits) = annotate_file(&display, &text, ctx) else {
            continue;
        };

        if apply {
            let updated = apply_edits(&text, &edits)
                .with_context(|| format!("applying edits to {display}"))?;
            std::fs::write(&file, updated).with_context(|| format!("writing {display}"))?;
        }
        results.push(FileEdits {
            path: display,
            edits,
            applied: apply,
        });
    }

    let pending = check && !results.is_empty();
    let code = if pending {
        ExitCode::PendingEdits
    } else {
        ExitCode::Success
    };

    if format.is_json() {
        let mut response = JsonResponse::success(&results);
        if pending {
            response = response.with_exit(
                code,
                &format!("{} file(s) need annotation", results.len()),
            );
        }
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(code);
    }

    for file in &results {
        let verb = if file.applied { "annotated" } else { "would annotate" };
        println!("{verb} {} ({} edit(s))", file.path, file.edits.len());
        if !file.applied {
            for edit in file.edits.iter().rev() {
                let kind = if edit.is_insertion() { "+" } else { "~" };
                for line in edit.text.lines() {
                    println!("  {kind} {line}");
                }
            }
        }
    }
    if results.is_empty() {
        println!("Nothing to annotate.");
    }

    Ok(code)
}

fn run_classify(
    ctx: &AnnotatorContext,
    paths: &[PathBuf],
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let mut results = Vec::new();
    for file in collect_lua_files(paths) {
        let text = read_source(&file).unwrap_or_default();
        let display = file.to_string_lossy().into_owned();
        let source = SourcePath::parse(&display)?;
        results.push(FileClass {
            target: ScopeTarget::resolve(&source, &text, ctx),
            path: display,
        });
    }

    if format.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonResponse::success(&results))?
        );
        return Ok(ExitCode::Success);
    }

    for file in &results {
        match &file.target {
            Some(target) => {
                let layout = match &target.folder {
                    Some(folder) => format!("folder {}", folder.path),
                    None => "single file".to_string(),
                };
                println!(
                    "{}: {} {} : {} ({layout})",
                    file.path, target.global, target.logical_type, target.base.value
                );
            }
            None => println!("{}: not scoped", file.path),
        }
    }
    Ok(ExitCode::Success)
}

fn main() {
    let cli = Cli::parse();

    if let Commands::Init { force } = &cli.command {
        init_tracing(cli.debug);
        match Settings::init_config_file(*force) {
            Ok(path) => {
                println!("Created configuration file at: {}", path.display());
                println!("Edit this file to customize your settings.");
            }
            Err(e) => {
                eprintln!("Error: {e}");
                for suggestion in e.recovery_suggestions() {
                    eprintln!("  - {suggestion}");
                }
                std::process::exit(ExitCode::from_config_error(&e).into());
            }
        }
        return;
    }

    let json = matches!(
        cli.command,
        Commands::Annotate { json: true, .. } | Commands::Classify { json: true, .. }
    );
    let settings = load_settings(&cli).unwrap_or_else(|e| exit_on_config_error(&e, json));
    init_tracing(cli.debug || settings.debug);

    if let Commands::Config = cli.command {
        println!("Current Configuration:");
        println!("{}", "=".repeat(50));
        match toml::to_string_pretty(&settings) {
            Ok(toml_str) => println!("{toml_str}"),
            Err(e) => eprintln!("Error displaying config: {e}"),
        }
        return;
    }

    let ctx =
        AnnotatorContext::with_disk(&settings).unwrap_or_else(|e| exit_on_config_error(&e, json));

    let result = match &cli.command {
        Commands::Annotate {
            paths,
            apply,
            check,
            json,
        } => run_annotate(
            &ctx,
            paths,
            *apply,
            *check,
            OutputFormat::from_json_flag(*json),
        ),
        Commands::Classify { paths, json } => {
            run_classify(&ctx, paths, OutputFormat::from_json_flag(*json))
        }
        Commands::Init { .. } | Commands::Config => Ok(ExitCode::Success),
    };

    match result {
        Ok(code) => std::process::exit(code.into()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(ExitCode::GeneralError.into());
        }
    }
}
