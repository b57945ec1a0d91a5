use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use recall::config::{Cli, Command, Config, default_config_path};
use recall::pipeline::{self, StepStatus};
use recall::report::{DailyReport, FileSink, ReportSink};
use recall::sample::sample_random;
use recall::unpack_error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // Values in the config file may reference variables defined in .env
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = args
        .config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    let cfg = Config::new(&config_path).unwrap_or_else(|e| {
        tracing::error!(error = %unpack_error(&*e), path = ?config_path, "failed to load config file");
        std::process::exit(1);
    });

    let result = match args.command.unwrap_or(Command::Run) {
        Command::Run => run_daily(&cfg).await,
        Command::Sample { count, pretty } => print_sample(&cfg, count, pretty).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %unpack_error(&*e), "recall run failed");
        std::process::exit(1);
    }
}

async fn run_daily(cfg: &Config) -> anyhow::Result<()> {
    tracing::info!("recall run starting");
    let mut rng = StdRng::from_entropy();
    let summary = pipeline::run(cfg, &mut rng).await?;

    for (step, status) in [("kobo", summary.kobo), ("manual", summary.manual)] {
        if let StepStatus::Ran(stats) = status {
            tracing::info!(
                step,
                inserted = stats.inserted,
                duplicates = stats.duplicates,
                rejected = stats.rejected,
                "step finished"
            );
        }
    }

    let report = DailyReport::new(chrono::Local::now().date_naive(), &summary.quotes);
    let document = report.render_document()?;
    FileSink::new(&cfg.report.output)
        .deliver(&report.subject(), &document)
        .await?;

    tracing::info!(
        quotes = report.quotes().len(),
        store = %summary.final_store.display(),
        "recall run complete"
    );
    Ok(())
}

async fn print_sample(cfg: &Config, count: Option<usize>, pretty: bool) -> anyhow::Result<()> {
    let store = pipeline::final_store(cfg)?;
    let mut rng = StdRng::from_entropy();
    let quotes = sample_random(store, count.unwrap_or(cfg.report.sample_count), &mut rng).await?;

    if pretty {
        println!("{}", serde_json::to_string_pretty(&quotes)?);
    } else {
        println!("{}", serde_json::to_string(&quotes)?);
    }

    Ok(())
}
