use cafe_forecast::dashboard::{sales_history, DashboardSummary};
use cafe_forecast::models::load_model;
use cafe_forecast::utils::parse_date;
use cafe_forecast::{CafeConfig, DataLoader, ForecastError, Result, RollingForecaster};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cafe_report", version, about = "Café sales dashboard and 7-day forecast")]
struct Cli {
    /// Transaction log (CSV)
    #[arg(short = 't', long = "transactions")]
    transactions: PathBuf,

    /// Configuration file (JSON); defaults are used when omitted
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forecast the next seven days of sales
    Forecast {
        /// Trained model artifact (JSON)
        #[arg(short = 'm', long = "model")]
        model: PathBuf,
    },
    /// Summary figures for the latest day in the log
    Dashboard,
    /// All sales on one date
    History {
        /// Date to list, YYYY-MM-DD
        #[arg(short = 'd', long = "date")]
        date: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => CafeConfig::from_json_file(path)?,
        None => CafeConfig::default(),
    };

    let log = DataLoader::from_csv(&cli.transactions)?;

    match cli.command {
        Command::Forecast { model } => {
            let model = load_model(&model)?;
            let forecaster = RollingForecaster::new(&config.forecast)?;
            let result = forecaster.forecast(&log.daily_sales(), &model)?;
            print_json(&result)
        }
        Command::Dashboard => {
            let transactions = log.transactions();
            match DashboardSummary::build(&transactions, &config.dashboard) {
                Some(summary) => print_json(&summary),
                None => Err(ForecastError::ValidationError(
                    "Transaction log has no valid transactions".to_string(),
                )),
            }
        }
        Command::History { date } => {
            let date = parse_date(&date).ok_or_else(|| {
                ForecastError::InvalidParameter(format!("Cannot parse date '{}'", date))
            })?;
            print_json(&sales_history(&log.transactions(), date))
        }
    }
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!("Starting {} v{}", cafe_forecast::NAME, cafe_forecast::VERSION);

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "cafe_report failed");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
