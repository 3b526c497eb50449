use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use boutique_crawler::BoutiqueCrawler;
use boutique_crawler::config::CrawlArgs;
use boutique_crawler::output::write_partition;

#[derive(Debug, Parser)]
#[command(name = "boutique-crawler")]
#[command(about = "Scrapes Oxygen Boutique into normalized item records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl the storefront and write items.json
    Crawl(CrawlArgs),
    /// Split an item file into per-type name lists
    Partition {
        #[arg(long, default_value = "items.json")]
        input: PathBuf,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Crawl(args) => {
            info!("Starting Oxygen Boutique crawl");
            let crawler = BoutiqueCrawler::new(&args)?;
            let count = crawler.run().await?;
            info!("Crawl finished with {} items", count);
        }
        Commands::Partition { input, out_dir } => {
            write_partition(&input, &out_dir).await?;
        }
    }

    Ok(())
}
