//! ses-firehose - Firehose transformation for SES event notifications
//!
//! The main entry point, handling:
//! - Batch transformation of Firehose events read from a file or stdin
//! - Redaction of single SES event documents
//! - Ad-hoc address masking

use clap::{Args, Parser, Subcommand};
use ses_firehose::config::{load_config, ConfigOptions, ResolvedConfig};
use ses_firehose::exit_codes::ExitCode;
use ses_firehose::io::{encode_response, parse_event, read_input, to_json, write_output};
use ses_firehose::logging::{
    event_names, init_default_logging, init_logging, LogConfig, LogFormat, LogLevel,
};
use ses_firehose::process_batch;
use ses_redact::{mask_email, redact_payload};
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Redact PII from SES event records delivered through Kinesis Data Firehose
#[derive(Parser)]
#[command(name = "ses-firehose")]
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
    /// Path to config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a Firehose event and print the Firehose response
    Transform(TransformArgs),

    /// Redact a single SES event document
    Redact(RedactArgs),

    /// Print the masked form of each value
    Mask(MaskArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
struct TransformArgs {
    /// Firehose event JSON ("-" for stdin)
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Write the response here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct RedactArgs {
    /// SES event JSON ("-" for stdin)
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Pretty-print the redacted document
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct MaskArgs {
    /// Values to mask
    #[arg(required = true)]
    values: Vec<String>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here, on stdout.
            let code = if e.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = e.print();
            std::process::exit(code.as_i32());
        }
    };

    let options = ConfigOptions {
        config_path: cli.global.config.clone(),
        ..ConfigOptions::default()
    };
    let resolved = match load_config(&options) {
        Ok(resolved) => resolved,
        Err(e) => {
            init_default_logging();
            error!(error = %e, "failed to load config");
            eprintln!("ses-firehose: {}", e);
            std::process::exit(ExitCode::ConfigError.as_i32());
        }
    };

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    let log_config = LogConfig::resolve(&resolved.config.log, cli_level, cli.global.log_format);
    init_logging(&log_config);

    match &resolved.path {
        Some(path) => debug!(
            event = event_names::CONFIG_LOADED,
            path = %path.display(),
            "config loaded"
        ),
        None => debug!(event = event_names::CONFIG_DEFAULT_USED, "using default config"),
    }

    let exit_code = match cli.command {
        Commands::Transform(args) => run_transform(&resolved, &args),
        Commands::Redact(args) => run_redact(&resolved, &args),
        Commands::Mask(args) => run_mask(&args),
        Commands::Version => {
            println!("ses-firehose {}", env!("CARGO_PKG_VERSION"));
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run_transform(resolved: &ResolvedConfig, args: &TransformArgs) -> ExitCode {
    let input = match read_input(args.input.as_deref()) {
        Ok(bytes) => bytes,
        Err(e) => return fail(ExitCode::IoError, &e),
    };

    let event = match parse_event(&input) {
        Ok(event) => event,
        Err(e) => return fail(ExitCode::InputError, &e),
    };

    let response = process_batch(&event);
    let summary = response.summary();

    let pretty = args.pretty || resolved.config.output.pretty;
    let encoded = match encode_response(&response, pretty) {
        Ok(bytes) => bytes,
        Err(e) => return fail(ExitCode::InternalError, &e),
    };
    if let Err(e) = write_output(args.output.as_deref(), &encoded) {
        return fail(ExitCode::IoError, &e);
    }

    if summary.all_ok() {
        ExitCode::Clean
    } else {
        info!(failed = summary.failed, total = summary.total, "some records failed");
        ExitCode::PartialFail
    }
}

fn run_redact(resolved: &ResolvedConfig, args: &RedactArgs) -> ExitCode {
    let input = match read_input(args.input.as_deref()) {
        Ok(bytes) => bytes,
        Err(e) => return fail(ExitCode::IoError, &e),
    };

    let redacted = match redact_payload(&input) {
        Ok(redacted) => redacted,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "redaction failed");
            eprintln!("ses-firehose: {}", e);
            return ExitCode::PartialFail;
        }
    };
    debug!(shapes = ?redacted.shapes, "document redacted");

    let pretty = args.pretty || resolved.config.output.pretty;
    let output = if pretty {
        // Re-render; the redacted bytes are always valid JSON.
        match serde_json::from_slice::<serde_json::Value>(&redacted.data)
            .and_then(|value| to_json(&value, true))
        {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "failed to render document");
                return ExitCode::InternalError;
            }
        }
    } else {
        redacted.data
    };

    match write_output(None, &output) {
        Ok(()) => ExitCode::Clean,
        Err(e) => fail(ExitCode::IoError, &e),
    }
}

fn run_mask(args: &MaskArgs) -> ExitCode {
    let masked: Vec<String> = args.values.iter().map(|v| mask_email(v)).collect();
    match write_output(None, masked.join("\n").as_bytes()) {
        Ok(()) => ExitCode::Clean,
        Err(e) => fail(ExitCode::IoError, &e),
    }
}

fn fail(code: ExitCode, err: &ses_firehose::FirehoseError) -> ExitCode {
    error!(code = %code, error = %err, "command failed");
    eprintln!("ses-firehose: {}", err);
    code
}
