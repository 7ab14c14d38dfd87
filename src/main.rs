use clap::{ArgAction, Args, Parser, Subcommand};
use forecast_etl::{
    api_to_db, api_to_table, json_to_db, json_to_table, save_csv, DateWindow, DbConfig,
    ForecastClient, ForecastEtlError, ForecastRequest, ForecastTransformer,
};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "forecast-etl",
    version,
    about = "Load open-meteo forecasts into CSV files or PostgreSQL"
)]
struct Cli {
    /// Directory `--fname` is resolved against.
    #[arg(long, global = true, default_value = "inputs")]
    input_dir: PathBuf,
    /// Directory CSV files are written to.
    #[arg(long, global = true, default_value = "outputs")]
    output_dir: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upsert a saved JSON forecast into the database.
    JsonToDb(JsonArgs),
    /// Convert a saved JSON forecast to a CSV file.
    JsonToCsv(JsonArgs),
    /// Fetch a forecast from the API and upsert it into the database.
    ApiToDb(ApiArgs),
    /// Fetch a forecast from the API and save it as a CSV file.
    ApiToCsv(ApiArgs),
}

#[derive(Args, Debug)]
struct JsonArgs {
    /// File name of the JSON forecast inside the input directory.
    #[arg(long)]
    fname: String,
}

#[derive(Args, Debug)]
struct ApiArgs {
    /// First forecast day, e.g. 2025-05-05.
    #[arg(long)]
    start_date: Option<String>,
    /// Last forecast day, e.g. 2025-05-11.
    #[arg(long)]
    end_date: Option<String>,
    /// `y` requests the 7 days starting today and ignores the dates.
    #[arg(long, default_value = "n", action = ArgAction::Set, value_parser = parse_yes_no)]
    use_default_date: bool,
}

impl ApiArgs {
    fn window(&self, request: &ForecastRequest) -> Result<DateWindow, ForecastEtlError> {
        Ok(DateWindow::resolve(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.use_default_date,
            request.today()?,
        )?)
    }
}

fn parse_yes_no(value: &str) -> Result<bool, String> {
    match value {
        "y" => Ok(true),
        "n" => Ok(false),
        other => Err(format!("expected 'y' or 'n', got '{}'", other)),
    }
}

async fn run(cli: Cli) -> Result<(), ForecastEtlError> {
    let transformer = ForecastTransformer::default();
    let request = ForecastRequest::default();
    let client = ForecastClient::new();

    match cli.command {
        Command::JsonToDb(args) => {
            let pool = DbConfig::from_env()?.connect().await?;
            let rows = json_to_db(cli.input_dir.join(&args.fname), &transformer, &pool).await?;
            info!("{} rows upserted from {}", rows, args.fname);
        }
        Command::JsonToCsv(args) => {
            let table = json_to_table(cli.input_dir.join(&args.fname), &transformer)?;
            let path = save_csv(&table, &cli.output_dir, &request.user_timezone)?;
            println!("Saved {}", path.display());
        }
        Command::ApiToDb(args) => {
            let window = args.window(&request)?;
            let pool = DbConfig::from_env()?.connect().await?;
            let rows = api_to_db(&client, &request, &window, &transformer, &pool).await?;
            info!("{} rows upserted for {} .. {}", rows, window.start, window.end);
        }
        Command::ApiToCsv(args) => {
            let window = args.window(&request)?;
            let table = api_to_table(&client, &request, &window, &transformer).await?;
            let path = save_csv(&table, &cli.output_dir, &request.user_timezone)?;
            println!("Saved {}", path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
