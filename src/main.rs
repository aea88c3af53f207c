use anyhow::{Context, Result};
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use fftc::common::config::{apply_overrides, load_config, ConfigOverrides};
use fftc::common::config_commands::{run_config_check, run_config_path, run_config_show};
use fftc::output::{self, finish_spinner_error, finish_spinner_success, spinner};
use fftc::send::probe_source;
use fftc::{AppConfig, Receiver, Sender, TransferError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "\
Examples:

Send a file called \"myfile.zip\" to 10.1.1.12, port 12344:
    fftc -s 10.1.1.12 12344 -f myfile.zip

Listen for a file called \"myfile.zip\" at port 12344:
    fftc -l 12344 -f myfile.zip";

#[derive(Parser)]
#[command(name = "fftc")]
#[command(version, about = "Fast File Transfer Client")]
#[command(args_conflicts_with_subcommands = true, after_help = EXAMPLES)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    transfer: TransferArgs,
}

#[derive(Args)]
struct TransferArgs {
    /// Send FILENAME to HOST at PORT
    #[arg(
        short = 's',
        visible_short_alias = 'c',
        num_args = 2,
        value_names = ["HOST", "PORT"],
        conflicts_with = "listen",
        requires = "file"
    )]
    send: Option<Vec<String>>,

    /// Listen on PORT and write the incoming stream to FILENAME
    #[arg(short = 'l', value_name = "PORT", requires = "file")]
    listen: Option<u16>,

    /// File to send or to write to
    #[arg(short = 'f', value_name = "FILENAME")]
    file: Option<PathBuf>,

    /// Bytes per read/write cycle (overrides config)
    #[arg(long, value_name = "BYTES")]
    buffer_size: Option<usize>,

    /// Buffer fills between progress updates (overrides config)
    #[arg(long, value_name = "FILLS")]
    report_interval: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the config file, or the built-in defaults
    Show {
        #[arg(long)]
        defaults: bool,
    },
    /// Validate the config file
    Check,
}

enum Role {
    Send {
        host: String,
        port: u16,
        file: PathBuf,
    },
    Listen {
        port: u16,
        file: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Turn parsed flags into a role.
fn role_from_args(args: &TransferArgs) -> Result<Role, TransferError> {
    match (&args.send, args.listen, args.file.clone()) {
        (Some(target), None, Some(file)) => {
            let port = target[1].parse::<u16>().map_err(|_| {
                TransferError::Usage(format!("invalid port '{}' for -s", target[1]))
            })?;
            Ok(Role::Send {
                host: target[0].clone(),
                port,
                file,
            })
        }
        (None, Some(port), Some(file)) => Ok(Role::Listen { port, file }),
        _ => Err(TransferError::Usage(
            "either -s|-c <HOST> <PORT> or -l <PORT> is required, together with -f <FILENAME>"
                .to_string(),
        )),
    }
}

fn run_send(config: &AppConfig, host: &str, port: u16, file: &Path) -> Result<()> {
    // Fail on a bad path before touching the network
    probe_source(file)?;

    println!("Connecting to {host}:{port}");
    let sender = Sender::new(config.transfer);
    let wait = spinner("Waiting for peer ...");
    let connection = match sender.connect(host, port) {
        Ok(connection) => {
            finish_spinner_success(&wait, &format!("Connected to {}", connection.peer));
            connection
        }
        Err(e) => {
            finish_spinner_error(&wait, "Could not connect to peer");
            return Err(e.into());
        }
    };

    let stdout = std::io::stdout();
    sender.send(connection, file, &mut stdout.lock())?;
    Ok(())
}

fn run_listen(config: &AppConfig, port: u16, file: &Path) -> Result<()> {
    let receiver = Receiver::bind(port, config)?;
    println!("Listening on port {}", receiver.local_addr().port());

    let wait = spinner("Waiting for sender ...");
    let connection = match receiver.accept() {
        Ok(connection) => {
            finish_spinner_success(&wait, "Sender connected");
            connection
        }
        Err(e) => {
            finish_spinner_error(&wait, "Accept failed");
            return Err(e.into());
        }
    };
    println!("Connection from {}", connection.peer);

    let stdout = std::io::stdout();
    receiver.receive(connection, file, &mut stdout.lock())?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    if let Some(Commands::Config { action }) = cli.command {
        return match action {
            ConfigAction::Path => run_config_path(),
            ConfigAction::Show { defaults } => run_config_show(defaults),
            ConfigAction::Check => run_config_check(),
        };
    }

    let role = role_from_args(&cli.transfer)
        .unwrap_or_else(|e| Cli::command().error(ErrorKind::ValueValidation, e).exit());
    let overrides = ConfigOverrides {
        buffer_size: cli.transfer.buffer_size,
        report_interval: cli.transfer.report_interval,
    };
    let config = apply_overrides(load_config()?, &overrides).context("Invalid override")?;

    println!("{}", output::banner());
    match role {
        Role::Send { host, port, file } => run_send(&config, &host, port, &file),
        Role::Listen { port, file } => run_listen(&config, port, &file),
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
