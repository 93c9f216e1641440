use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use eth_balance_exporter::registry::parse_line;

#[derive(Parser)]
#[command(name = "balance-cli")]
#[command(about = "Companion CLI for the Ethereum balance exporter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the balance page of a running exporter
    Scrape {
        #[arg(short, long, default_value = "http://localhost:9015")]
        url: String,
    },
    /// Report which lines of a registry file would be loaded
    Validate {
        /// Registry file of `name:address` lines
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape { url } => scrape(&url).await,
        Commands::Validate { file } => validate(&file),
    }
}

async fn scrape(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let res = reqwest::get(format!("{}/metrics", url.trim_end_matches('/'))).await?;

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: exporter returned status {}", status);
        return Ok(());
    }

    print!("{}", res.text().await?);
    Ok(())
}

fn validate(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(path)?);
    let (mut accepted, mut skipped) = (0usize, 0usize);

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Some(entry) => {
                accepted += 1;
                println!("ok    {:>4}  {}", idx + 1, entry);
            }
            None => {
                skipped += 1;
                println!("skip  {:>4}  {}", idx + 1, line);
            }
        }
    }

    println!("{} accepted, {} skipped", accepted, skipped);
    Ok(())
}
