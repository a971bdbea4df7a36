use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use citycast::{
    City, CityCatalog, CitycastConfig, CitycastError, ForecastClient, ForecastFetcher,
    IncrementalSearch, MainQueue, telemetry,
};
use clap::{Parser, Subcommand};
use tracing::{debug, error, warn};

#[derive(Parser)]
#[command(
    name = "citycast",
    version,
    about = "Incremental city search and weather forecast lookup for Japanese cities"
)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// City dataset replacing the bundled one
    #[arg(long, global = true)]
    cities: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every city of the dataset
    Cities,
    /// Print cities whose name, kana or prefecture contains QUERY
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Read search text from stdin, one edit per line, and print settled results
    Watch,
    /// Fetch and print the forecast for a city id
    Forecast { city_id: String },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            match err.downcast_ref::<CitycastError>() {
                Some(app_err) => eprintln!("{}", app_err.user_message()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = CitycastConfig::load_from_path(cli.config)?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    telemetry::init_tracing(&config.logging);

    let dataset = cli.cities.or_else(|| config.catalog.path.clone());
    let catalog = CityCatalog::load(dataset.as_deref())?;
    debug!("Catalog holds {} cities", catalog.len());

    match cli.command {
        Command::Cities => {
            print_cities(catalog.cities());
            Ok(ExitCode::SUCCESS)
        }
        Command::Search { query } => {
            print_cities(&catalog.search(&query));
            Ok(ExitCode::SUCCESS)
        }
        Command::Watch => watch(&catalog, &config),
        Command::Forecast { city_id } => forecast(&catalog, &config, city_id),
    }
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("citycast-worker")
        .build()
        .context("Failed to start worker runtime")
}

fn print_cities(cities: &[City]) {
    if cities.is_empty() {
        println!("No matching cities");
        return;
    }
    for city in cities {
        println!("{}", city.display_label());
    }
}

fn watch(catalog: &CityCatalog, config: &CitycastConfig) -> Result<ExitCode> {
    let runtime = build_runtime()?;
    let cities = catalog.shared();
    let debounce = config.search.debounce();

    runtime.block_on(async move {
        let (queries, mut results, task) =
            IncrementalSearch::spawn(cities, debounce).into_parts();

        std::thread::spawn(move || {
            // `lines` already drops the "\n" / "\r\n" terminator; the rest is the query.
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if queries.blocking_send(line).is_err() {
                    break;
                }
            }
        });

        while let Some(hits) = results.recv().await {
            println!("--- {} cities", hits.len());
            print_cities(&hits);
        }
        task.await.context("Search task failed")
    })?;

    Ok(ExitCode::SUCCESS)
}

fn forecast(catalog: &CityCatalog, config: &CitycastConfig, city_id: String) -> Result<ExitCode> {
    match catalog.get(&city_id) {
        Some(city) => println!("Forecast for {}", city.display_label()),
        None => warn!("City id {} is not in the catalog, asking the service anyway", city_id),
    }

    let runtime = build_runtime()?;
    let client = ForecastClient::from_config(&config.forecast)?;
    let (main_queue, main_loop) = MainQueue::channel();
    let fetcher = ForecastFetcher::new(client, runtime.handle().clone(), main_queue.clone());

    let succeeded = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&succeeded);
    let success_queue = main_queue.clone();
    let failure_queue = main_queue.clone();

    let _handle = fetcher.fetch_forecast(
        city_id,
        move |forecast| {
            print!("{}", forecast.render());
            flag.store(true, Ordering::Release);
            success_queue.quit();
        },
        move |err| {
            error!("Forecast fetch failed: {}", err);
            eprintln!("{}", CitycastError::from(err).user_message());
            failure_queue.quit();
        },
    );
    drop(fetcher);
    drop(main_queue);

    // This thread is the foreground context from here on.
    main_loop.run();

    if succeeded.load(Ordering::Acquire) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
