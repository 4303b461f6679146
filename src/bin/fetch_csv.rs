use std::error::Error;

use clap::Parser;
use simple_logger::SimpleLogger;

use bucket_csv::*;

#[derive(clap::ValueEnum, Debug, Clone)]
enum Backend {
    Disk,
    Remote,
}

const ABOUT: &'static str = r#"Fetches a CSV object and prints its columns and first rows.
The remote backend reads BUCKET_NAME, ACCESS_KEY, SECRET_KEY, REGION and ENDPOINT_URL
from the environment (or a `.env` file)."#;

#[derive(Parser, Debug)]
#[command(author, version, about = ABOUT)]
struct Cli {
    /// The key of the object
    key: String,
    /// Number of rows to print
    #[arg(long, default_value_t = 5)]
    head: usize,
    /// Where to read the object from
    #[arg(long, value_enum, default_value_t=Backend::Remote)]
    backend: Backend,
    /// Directory the key is relative to when using the disk backend
    #[arg(long, default_value = ".")]
    root: String,
}

async fn run<P: BlobStorageProvider>(
    fetcher: &ObjectFetcher<P>,
    key: &str,
    head: usize,
) -> Result<(), Box<dyn Error>> {
    let table = fetcher.fetch(key).await?;

    println!("{}", table.columns().join(","));
    for row in table.rows().take(head) {
        println!("{}", row.join(","));
    }
    println!("({} records)", table.len());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();

    let cli = Cli::parse();

    match cli.backend {
        Backend::Disk => {
            let fetcher = ObjectFetcher::with_provider(LocalDisk::new(cli.root));
            run(&fetcher, &cli.key, cli.head).await
        }
        Backend::Remote => {
            let config = FetcherConfig::from_env()?;
            let fetcher = ObjectFetcher::new(&config).await;
            run(&fetcher, &cli.key, cli.head).await
        }
    }
}
