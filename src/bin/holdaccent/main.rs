// Holdaccent CLI
// Replay key scripts or type interactively through the substitution engine

mod interactive;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

use holdaccent_core::config::default_config_content;
use holdaccent_core::{Config, Output, Script, Session, Transcript};

/// Timed accent substitution: hold an accent key, tap the leader
#[derive(Parser, Debug)]
#[command(name = "holdaccent")]
#[command(version)]
#[command(about = "Timed accent substitution engine", long_about = None)]
struct Args {
    /// TOML configuration file (defaults to ~/.config/holdaccent/config.toml)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate config, print the effective settings and exit
    #[arg(long)]
    check_config: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Write a commented default config to the config path and exit
    #[arg(long)]
    init_config: bool,

    /// Run a replay script and print every commit and forwarded key
    #[arg(short, long, value_name = "SCRIPT")]
    replay: Option<PathBuf>,

    /// Type in a raw-mode terminal (the default without --replay)
    #[arg(short, long)]
    interactive: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_toml_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load_default().context("Failed to load default config"),
    }
}

/// Write the default config file, refusing to overwrite an existing one
fn init_config(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path().ok_or_else(|| anyhow!("No config directory found"))?,
    };
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&path, default_config_content())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn check_config(config: &Config) {
    let timeouts = config.timeouts();
    let mapping = config.mapping_table();

    println!("Configuration is valid");
    println!(
        "  delays: {} ms lowercase, {} ms uppercase",
        timeouts.lowercase().as_millis(),
        timeouts.uppercase().as_millis()
    );
    println!("  leader: {}", config.leader_key);
    println!("  {} active mapping(s)", mapping.len());
    for (input, output) in mapping.iter() {
        println!("    {} -> {}", input, output);
    }
}

fn format_output(output: &Output) -> String {
    match output {
        Output::Commit { context, text } => format!("[{}] commit {:?}", context, text),
        Output::Forward {
            context,
            key,
            action,
            text: Some(ch),
        } => format!("[{}] forward {} {} {:?}", context, action, key, ch),
        Output::Forward {
            context,
            key,
            action,
            text: None,
        } => format!("[{}] forward {} {}", context, action, key),
    }
}

fn replay(config: &Config, path: &Path) -> Result<()> {
    let script = Script::from_path(path)
        .with_context(|| format!("Failed to read replay script {}", path.display()))?;
    log::info!("Replaying {} step(s) from {}", script.len(), path.display());

    let mut session = Session::new(config, Transcript::new());
    session
        .run_script(&script)
        .with_context(|| format!("Replay of {} failed", path.display()))?;

    let transcript = session.into_sink();
    for output in transcript.outputs() {
        println!("{}", format_output(output));
    }
    println!("typed: {}", transcript.typed_text());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.init_config {
        let path = init_config(args.config.as_deref())?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;

    if args.check_config {
        check_config(&config);
        return Ok(());
    }

    if args.print_config {
        print!("{}", config.sanitized().to_toml());
        return Ok(());
    }

    if let Some(ref script) = args.replay {
        return replay(&config, script);
    }

    interactive::run(&config)
}
