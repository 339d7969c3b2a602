use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codecmap_core::{
    ConfigDocument, GID_DECODE, ModuleManager, RegistryError, RuleRegistry, Tracer,
    describe_module, make_catalog,
};
use glob::glob;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "codecmap")]
#[command(version)]
#[command(
    about = "Decode anomaly catalog and decoder option checker.",
    long_about = None,
    after_help = "Examples:\n  codecmap rules --gid 116\n  codecmap lookup 401\n  codecmap check snort.json"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered rule descriptors.
    Rules {
        /// Only list rules of this generator id
        #[arg(long)]
        gid: Option<u32>,

        /// Write the catalog as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long, requires = "json")]
        pretty: bool,
    },
    /// Resolve one rule descriptor.
    Lookup {
        /// Signature id
        sid: u32,

        /// Generator id
        #[arg(long, default_value_t = GID_DECODE)]
        gid: u32,
    },
    /// List built-in modules and their options.
    Modules {
        /// Write the listing as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long, requires = "json")]
        pretty: bool,
    },
    /// Validate a configuration document.
    #[command(
        after_help = "Examples:\n  codecmap check snort.json\n  codecmap check 'conf/*.json' --quiet"
    )]
    Check {
        /// Path to a .json configuration file (or a glob pattern)
        input: PathBuf,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Rules { gid, json, pretty } => cmd_rules(gid, json, pretty),
        Commands::Lookup { sid, gid } => cmd_lookup(gid, sid),
        Commands::Modules { json, pretty } => cmd_modules(json, pretty),
        Commands::Check { input, quiet } => cmd_check(&input, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn decode_registry() -> Result<RuleRegistry, CliError> {
    RuleRegistry::decode()
        .context("decode rule table is inconsistent")
        .map_err(Into::into)
}

fn cmd_rules(gid: Option<u32>, json: bool, pretty: bool) -> Result<(), CliError> {
    let registry = decode_registry()?;
    if let Some(gid) = gid {
        if registry.rules_for_gid(gid).next().is_none() {
            return Err(CliError::new(
                format!("no rules registered for gid {gid}"),
                Some(format!("known gids: {}", join_gids(&registry))),
            ));
        }
    }

    if json {
        let catalog = make_catalog(&registry, gid);
        println!("{}", to_json(&catalog, pretty)?);
        return Ok(());
    }

    let rules: Vec<_> = match gid {
        Some(gid) => registry.rules_for_gid(gid).collect(),
        None => registry.iter().collect(),
    };
    for rule in rules {
        println!("{rule}");
    }
    Ok(())
}

fn cmd_lookup(gid: u32, sid: u32) -> Result<(), CliError> {
    let registry = decode_registry()?;
    match registry.lookup(gid, sid) {
        Ok(rule) => {
            let entry = codecmap_core::RuleEntry::from(rule);
            match entry.name {
                Some(name) => println!("{rule}\n  name: {name}"),
                None => println!("{rule}"),
            }
            Ok(())
        }
        Err(err @ RegistryError::Unresolved { .. }) => Err(CliError::new(
            err.to_string(),
            Some(format!("run `codecmap rules --gid {gid}` to list assigned sids")),
        )),
        Err(err) => Err(CliError::new(err.to_string(), None)),
    }
}

fn cmd_modules(json: bool, pretty: bool) -> Result<(), CliError> {
    let tracer = Tracer::new();
    let manager =
        ModuleManager::with_builtins(&tracer).context("built-in module registration failed")?;
    let summaries: Vec<_> = manager.modules().map(describe_module).collect();

    if json {
        println!("{}", to_json(&summaries, pretty)?);
        return Ok(());
    }

    for module in &summaries {
        println!(
            "{} [{}] gid {} rules {}{}",
            module.name,
            module.usage,
            module.gid,
            module.rules,
            if module.list { " (list)" } else { "" }
        );
        println!("  {}", module.help);
        for param in &module.params {
            match &param.default {
                Some(default) => println!(
                    "    {} <{}> = {}: {}",
                    param.name, param.kind, default, param.help
                ),
                None => println!("    {} <{}>: {}", param.name, param.kind, param.help),
            }
        }
    }
    Ok(())
}

fn cmd_check(input: &Path, quiet: bool) -> Result<(), CliError> {
    let paths = resolve_config_paths(input)?;
    let mut failed = 0usize;
    for path in &paths {
        // A file that cannot be loaded counts as one error; keep checking the rest.
        match validate_config_file(path).and_then(|()| check_file(path)) {
            Ok(count) => failed += count,
            Err(err) if paths.len() == 1 => return Err(err),
            Err(err) => {
                eprintln!("{}: {}", path.display(), err.message);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::new(
            format!("{failed} configuration error(s)"),
            Some("run `codecmap modules` to list accepted options".to_string()),
        ));
    }
    if !quiet {
        eprintln!("OK: configuration valid");
    }
    Ok(())
}

/// Apply one document to a fresh manager; returns how many errors it recorded.
fn check_file(path: &Path) -> Result<usize, CliError> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration: {}", path.display()))?;
    let doc = ConfigDocument::from_json_str(&text).map_err(|err| {
        CliError::new(
            format!("invalid configuration {}: {err}", path.display()),
            Some("expected a JSON object with \"global\" and \"context\" sections".to_string()),
        )
    })?;

    let tracer = Tracer::new();
    let mut manager =
        ModuleManager::with_builtins(&tracer).context("built-in module registration failed")?;
    let failed = manager.apply(&doc);
    for err in manager.errors() {
        eprintln!("{}: {err}", path.display());
    }
    if failed == 0 {
        let engine = manager
            .finish()
            .with_context(|| format!("Failed to activate {}", path.display()))?;
        debug!(
            path = %path.display(),
            modules = engine.modules().count(),
            "configuration accepted"
        );
    }
    Ok(failed)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn join_gids(registry: &RuleRegistry) -> String {
    registry
        .gids()
        .iter()
        .map(|gid| gid.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn validate_config_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("configuration file not found: {}", input.display()),
            Some("pass a .json configuration file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a .json configuration file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "json" {
        return Err(CliError::new(
            format!("unsupported configuration format '{}'", input.display()),
            Some("expected a .json file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_config_paths(input: &Path) -> Result<Vec<PathBuf>, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(vec![input.to_path_buf()]);
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .json files".to_string()),
        ));
    }
    matches.sort();
    Ok(matches)
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
