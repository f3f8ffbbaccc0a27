use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use billetera::cli::{run_demo, run_session, SessionMode};
use billetera::config::{BilleteraPaths, Settings};
use billetera::storage::BankStore;

#[derive(Parser)]
#[command(
    name = "billetera",
    version,
    about = "In-memory mobile wallet ledger with budget envelopes",
    long_about = "Billetera keeps a wallet balance, contacts, budget envelopes and \
                  automation rules that route incoming transfers into envelopes. \
                  State lives in memory for the length of a session."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session
    Shell,

    /// Run a session script, stopping at the first error
    Run {
        /// Path to the script
        file: PathBuf,
    },

    /// Run the guided demo scenarios
    Demo,

    /// Show current configuration and paths
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = BilleteraPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Shell) => {
            let store = BankStore::open(&paths, settings)?;
            println!("Billetera. Escriba 'help' para ver los comandos, 'salir' para terminar.");
            let stdin = std::io::stdin();
            run_session(&store, stdin.lock(), SessionMode::Interactive).await?;
        }
        Some(Commands::Run { file }) => {
            let store = BankStore::open(&paths, settings)?;
            let script = File::open(&file)
                .with_context(|| format!("No se pudo abrir el script {}", file.display()))?;
            run_session(&store, BufReader::new(script), SessionMode::Script).await?;
        }
        Some(Commands::Demo) => {
            run_demo(&settings)?;
        }
        Some(Commands::Config) => {
            println!("Billetera Configuration");
            println!("=======================");
            println!("Data directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Opening balance:   {}", settings.opening_balance.format_with_symbol(&settings.currency_symbol));
            println!("  Transfer history:  {}", settings.transfer_history_limit);
            println!("  Recharge history:  {}", settings.recharge_history_limit);
            println!("  Notifications:     {}", settings.notification_limit);
            println!("  Audit enabled:     {}", settings.audit_enabled);
        }
        None => {
            println!("Billetera - mobile wallet ledger");
            println!();
            println!("Run 'billetera --help' for usage information.");
            println!("Run 'billetera shell' to start a session.");
        }
    }

    Ok(())
}

/// Install the fmt subscriber; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default = if verbose {
        "billetera=debug"
    } else {
        "billetera=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
