use clap::Parser;
use sales_rollup::args::{Args, Command};
use sales_rollup::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().sales_home().path();

    // This allows for running the program without reaching Google. When
    // SALES_ROLLUP_IN_TEST_MODE is set and non-zero in length, then the mode will be Mode::Test,
    // otherwise it will be Mode::Google.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.sheet_url()).await?.print(),

        Command::Brands(brands_args) => {
            let config = Config::load_or_default(home).await?;
            commands::brands(config, mode, brands_args.clone())
                .await?
                .emit()
        }

        Command::Products(products_args) => {
            let config = Config::load_or_default(home).await?;
            commands::products(config, mode, products_args.clone())
                .await?
                .emit()
        }

        Command::Monthly(monthly_args) => {
            let config = Config::load_or_default(home).await?;
            commands::monthly(config, mode, monthly_args.clone())
                .await?
                .emit()
        }

        Command::Summary(summary_args) => {
            let config = Config::load_or_default(home).await?;
            commands::summary(config, mode, summary_args.clone())
                .await?
                .emit()
        }

        Command::Sample(sample_args) => commands::sample(sample_args.output()).await?.emit(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={level},sales_rollup={level}",
                env!("CARGO_CRATE_NAME"),
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
