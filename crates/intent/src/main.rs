//! voxdesk - voice command runner
//!
//! Usage:
//!   voxdesk run "ouvre firefox"
//!   voxdesk classify "va au bureau dix sept"
//!   voxdesk repl < transcripts.txt
//!   voxdesk aliases

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use env_logger::Env;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use voxdesk_intent::config::default_config_path;
use voxdesk_intent::{
    DesktopActions, DryRunActions, HyprlandActions, IntentContext, Outcome, VoiceConfig,
};

#[derive(Parser, Debug)]
#[command(name = "voxdesk")]
#[command(about = "Turn speech-to-text output into desktop actions", long_about = None)]
struct Cli {
    /// Configuration file (JSON, or TOML with a .toml extension)
    #[arg(short, long, env = "VOXDESK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Report actions instead of performing them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Handle one utterance
    Run {
        /// Recognized text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show intent and resolution without acting
    Classify {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Handle one utterance per stdin line
    Repl,

    /// List the resolved app and delete aliases
    Aliases,
}

#[derive(Debug, Serialize)]
struct AliasEntry<'a> {
    alias: &'a str,
    target: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let config = load_config(cli.config.as_ref())?;
    let mut context = IntentContext::new(&config);
    let mut actions: Box<dyn DesktopActions> = if cli.dry_run {
        Box::new(DryRunActions::new())
    } else {
        Box::new(HyprlandActions::new())
    };

    match cli.command {
        Commands::Run { text } => {
            let outcome = context.dispatch(&text.join(" "), &mut *actions);
            print_outcome(outcome.as_ref(), cli.json)?;
        }
        Commands::Classify { text } => {
            let classification = context.explain(&text.join(" "));
            if cli.json {
                println!("{}", serde_json::to_string(&classification)?);
            } else {
                println!("{:#?}", classification);
            }
        }
        Commands::Repl => run_repl(&mut context, &mut *actions, cli.json)?,
        Commands::Aliases => print_aliases(&context, cli.json)?,
    }

    Ok(())
}

/// Explicit paths must load; a missing default file means an empty config.
fn load_config(explicit: Option<&PathBuf>) -> anyhow::Result<VoiceConfig> {
    if let Some(path) = explicit {
        return VoiceConfig::load(path).with_context(|| format!("loading {}", path.display()));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            VoiceConfig::load(&path).with_context(|| format!("loading {}", path.display()))
        }
        _ => {
            log::warn!("No config file found, starting with no apps");
            Ok(VoiceConfig::default())
        }
    }
}

fn run_repl(context: &mut IntentContext, actions: &mut dyn DesktopActions, json: bool) -> anyhow::Result<()> {
    log::info!("Reading utterances from stdin");
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let outcome = context.dispatch(&line, actions);
        print_outcome(outcome.as_ref(), json)?;
    }

    Ok(())
}

fn print_outcome(outcome: Option<&Outcome>, json: bool) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    match (outcome, json) {
        (Some(outcome), true) => writeln!(stdout, "{}", serde_json::to_string(outcome)?)?,
        (Some(outcome), false) => writeln!(stdout, "{}", outcome)?,
        (None, true) => writeln!(stdout, "null")?,
        (None, false) => writeln!(stdout, "(aucune commande reconnue)")?,
    }
    Ok(())
}

fn print_aliases(context: &IntentContext, json: bool) -> anyhow::Result<()> {
    let apps: Vec<AliasEntry> = context
        .registry()
        .iter()
        .map(|(alias, command)| AliasEntry {
            alias,
            target: command.to_string(),
        })
        .collect();
    let deletes: Vec<AliasEntry> = context
        .delete_aliases()
        .iter()
        .map(|(alias, path)| AliasEntry {
            alias,
            target: path.display().to_string(),
        })
        .collect();

    if json {
        let dump = serde_json::json!({ "apps": apps, "delete": deletes });
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    println!("Apps ({} aliases):", apps.len());
    for entry in &apps {
        println!("  {:<30} -> {}", entry.alias, entry.target);
    }
    println!("\nDelete aliases ({}):", deletes.len());
    for entry in &deletes {
        println!("  {:<30} -> {}", entry.alias, entry.target);
    }
    if let Some(base) = context.delete_base_dir() {
        println!("  base: {}", base.display());
    }

    Ok(())
}
