use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trend_tracker::app::init_tracing;
use trend_tracker::config::Config;
use trend_tracker::handlers::{
    OutputFormat, StopwordEdit, analyze_handler, collect_handler, list_handler,
    stopwords_handler,
};
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(name = "trend-tracker")]
#[command(about = "Track research keyword trends from journal search results")]
struct Cli {
    /// Directory for saved datasets and the stopword list
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the site for a keyword and report on the results
    Collect {
        keyword: String,
        /// Do not write <keyword>_data.csv
        #[arg(long)]
        no_save: bool,
        #[arg(long)]
        json: bool,
    },
    /// Report on a previously saved dataset
    Analyze {
        keyword: String,
        #[arg(long)]
        json: bool,
    },
    /// List saved datasets
    List,
    /// Show or edit the excluded-word list
    Stopwords {
        /// Comma-separated words to exclude
        #[arg(long)]
        add: Option<String>,
        /// Word to stop excluding (repeatable)
        #[arg(long)]
        remove: Vec<String>,
        /// Restore the default list
        #[arg(long)]
        reset: bool,
    },
}

fn format_for(json: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    debug!("Configuration loaded: {:?}", config);

    let outcome = match cli.command {
        Commands::Collect {
            keyword,
            no_save,
            json,
        } => collect_handler(&config, &keyword, !no_save, format_for(json)).await,
        Commands::Analyze { keyword, json } => {
            analyze_handler(&config, &keyword, format_for(json))
        }
        Commands::List => list_handler(&config),
        Commands::Stopwords { add, remove, reset } => {
            stopwords_handler(&config, &StopwordEdit { add, remove, reset })
        }
    };

    match outcome {
        Ok(()) => info!("Done"),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
