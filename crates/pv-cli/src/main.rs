//! pv - reversible PII masking for report documents.
//!
//! Masks a JSON document against a key policy, replacing sensitive values
//! with vault labels, and restores the original values in any text rendered
//! from the masked output. The session vault can be persisted as a snapshot
//! so masking and unmasking may happen in separate invocations.
//!
//! stdout is reserved for command payloads; all log output goes to stderr.

use clap::{Args, Parser, Subcommand};
use pv_mask::{mask_document, unmask_text, MaskPolicy, TokenVault, VaultSnapshot};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit codes for pv operations.
///
/// These are a stable contract for scripting around the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
enum ExitCode {
    /// Success
    Clean = 0,

    /// Usage or data error: unreadable input, malformed JSON, missing vault
    DataError = 1,

    /// Internal error (store failure, unwritable output)
    InternalError = 2,
}

impl ExitCode {
    fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Reversible PII masking for report documents
#[derive(Parser)]
#[command(name = "pv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Mask a JSON document, minting labels into the session vault
    Mask(MaskArgs),

    /// Substitute vault labels in text with their original values
    Unmask(UnmaskArgs),

    /// Emit the default masking policy for operators to edit
    Policy(PolicyArgs),
}

#[derive(Args, Debug)]
struct MaskArgs {
    /// Input document (defaults to stdin)
    input: Option<PathBuf>,

    /// Write masked output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Vault snapshot file; loaded if present, written back after masking
    #[arg(long)]
    vault: Option<PathBuf>,

    /// Policy file overriding the default vocabularies
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Additional key to always mask (repeatable)
    #[arg(long = "mask-key", value_name = "KEY")]
    mask_keys: Vec<String>,

    /// Additional key to pass through unmasked (repeatable)
    #[arg(long = "allow-key", value_name = "KEY")]
    allow_keys: Vec<String>,
}

#[derive(Args, Debug)]
struct UnmaskArgs {
    /// Input text (defaults to stdin)
    input: Option<PathBuf>,

    /// Write restored output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Vault snapshot from the masking session
    #[arg(long)]
    vault: PathBuf,
}

#[derive(Args, Debug)]
struct PolicyArgs {
    /// Write the policy here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.global);

    let exit_code = match &cli.command {
        Commands::Mask(args) => run_mask(args),
        Commands::Unmask(args) => run_unmask(args),
        Commands::Policy(args) => run_policy(args),
    };

    std::process::exit(exit_code.as_i32());
}

/// Initialize stderr logging. RUST_LOG overrides the verbosity flags.
fn init_logging(global: &GlobalOpts) {
    let default_level = if global.quiet {
        "error"
    } else {
        match global.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_mask(args: &MaskArgs) -> ExitCode {
    let mut policy = match &args.policy {
        Some(path) => match MaskPolicy::load(path) {
            Ok(policy) => policy,
            Err(e) => {
                eprintln!("pv: cannot load policy {}: {}", path.display(), e);
                return ExitCode::DataError;
            }
        },
        None => MaskPolicy::default(),
    };
    for key in &args.mask_keys {
        policy.mask_key(key.clone());
    }
    for key in &args.allow_keys {
        policy.allow_key(key.clone());
    }

    // An existing snapshot continues its session; labels minted earlier
    // keep their meaning and dedup still applies.
    let mut vault = match &args.vault {
        Some(path) if path.exists() => match VaultSnapshot::load(path) {
            Ok(snapshot) => TokenVault::from_snapshot(snapshot),
            Err(e) => {
                eprintln!("pv: cannot load vault {}: {}", path.display(), e);
                return ExitCode::DataError;
            }
        },
        _ => TokenVault::new(),
    };

    let text = match read_input(args.input.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("pv: cannot read input: {}", e);
            return ExitCode::DataError;
        }
    };
    let doc: Value = match serde_json::from_str(&text) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("pv: input is not valid JSON: {}", e);
            return ExitCode::DataError;
        }
    };

    let masked = match mask_document(&policy, &mut vault, &doc) {
        Ok(masked) => masked,
        Err(e) => {
            eprintln!("pv: masking failed: {}", e);
            return ExitCode::InternalError;
        }
    };
    debug!(tokens = vault.len().unwrap_or(0), "Masking complete");

    let rendered = match render_document(&masked) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("pv: cannot render output: {}", e);
            return ExitCode::InternalError;
        }
    };
    if let Err(e) = write_output(args.output.as_deref(), &rendered) {
        eprintln!("pv: cannot write output: {}", e);
        return ExitCode::InternalError;
    }

    if let Some(path) = &args.vault {
        let saved = vault.snapshot().and_then(|snapshot| snapshot.save(path));
        if let Err(e) = saved {
            eprintln!("pv: cannot save vault {}: {}", path.display(), e);
            return ExitCode::InternalError;
        }
    }

    ExitCode::Clean
}

fn run_unmask(args: &UnmaskArgs) -> ExitCode {
    let vault = match VaultSnapshot::load(&args.vault) {
        Ok(snapshot) => TokenVault::from_snapshot(snapshot),
        Err(e) => {
            eprintln!("pv: cannot load vault {}: {}", args.vault.display(), e);
            return ExitCode::DataError;
        }
    };

    let text = match read_input(args.input.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("pv: cannot read input: {}", e);
            return ExitCode::DataError;
        }
    };

    let restored = match unmask_text(&vault, &text) {
        Ok(restored) => restored,
        Err(e) => {
            eprintln!("pv: unmasking failed: {}", e);
            return ExitCode::InternalError;
        }
    };

    if let Err(e) = write_output(args.output.as_deref(), &restored) {
        eprintln!("pv: cannot write output: {}", e);
        return ExitCode::InternalError;
    }
    ExitCode::Clean
}

fn run_policy(args: &PolicyArgs) -> ExitCode {
    let rendered = match serde_json::to_string_pretty(&MaskPolicy::default()) {
        Ok(mut text) => {
            text.push('\n');
            text
        }
        Err(e) => {
            eprintln!("pv: cannot render policy: {}", e);
            return ExitCode::InternalError;
        }
    };

    if let Err(e) = write_output(args.output.as_deref(), &rendered) {
        eprintln!("pv: cannot write output: {}", e);
        return ExitCode::InternalError;
    }
    ExitCode::Clean
}

/// Pretty-print a document with a trailing newline.
fn render_document(doc: &Value) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(doc)?;
    text.push('\n');
    Ok(text)
}

fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> std::io::Result<()> {
    match path {
        Some(path) => std::fs::write(path, content),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}
