use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use wikiart::{
    ConfigName, DatasetBuilder, DownloadManager, HttpDownloadManager, LocalDownloadManager,
    Settings, Split, SplitGenerator, WikiArt,
};

#[derive(Parser)]
#[command(name = "wikiart")]
#[command(about = "Fetch the WikiArt style dataset and list its examples")]
#[command(version)]
struct Args {
    /// Dataset configuration: All, Baroque or Realism
    #[arg(long, global = true, default_value = "All", value_parser = parse_config)]
    config: ConfigName,

    /// Cache directory for downloaded archives (defaults to $WIKIART_CACHE_DIR)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print dataset metadata and feature schema as JSON
    Info,
    /// Resolve split archives and print their local folders
    Splits {
        /// Use already extracted folders under this root instead of downloading
        #[arg(long)]
        local: Option<PathBuf>,
    },
    /// Print the examples of one split as JSON lines
    Examples {
        #[arg(long, default_value = "train")]
        split: Split,
        /// Use already extracted folders under this root instead of downloading
        #[arg(long)]
        local: Option<PathBuf>,
        /// Stop after this many examples
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn parse_config(value: &str) -> Result<ConfigName, wikiart::LoaderError> {
    value.parse()
}

fn main() {
    env_logger::init();

    if let Err(err) = run(Args::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let builder = WikiArt::new(args.config);
    match args.command {
        Command::Info => {
            let info = serde_json::to_string_pretty(&builder.describe())?;
            println!("{info}");
        }
        Command::Splits { local } => {
            let downloads = download_manager(local, args.cache_dir)?;
            for split in builder.resolve_splits(downloads.as_ref())? {
                println!("{}\t{}", split.split, split.manifest_path().display());
            }
        }
        Command::Examples {
            split,
            local,
            limit,
        } => {
            let downloads = download_manager(local, args.cache_dir)?;
            let generator = resolve_split(&builder, downloads.as_ref(), split)?;
            print_examples(&builder, &generator, limit)?;
        }
    }
    Ok(())
}

fn download_manager(
    local: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
) -> Result<Box<dyn DownloadManager>> {
    if let Some(root) = local {
        return Ok(Box::new(LocalDownloadManager::new(root)));
    }
    let settings = Settings::resolve(cache_dir)?;
    Ok(Box::new(HttpDownloadManager::new(settings.cache_dir)))
}

fn resolve_split(
    builder: &WikiArt,
    downloads: &dyn DownloadManager,
    split: Split,
) -> Result<SplitGenerator> {
    builder
        .resolve_splits(downloads)?
        .into_iter()
        .find(|g| g.split == split)
        .with_context(|| format!("split {split} was not resolved"))
}

fn print_examples(builder: &WikiArt, split: &SplitGenerator, limit: Option<usize>) -> Result<()> {
    let examples = builder
        .generate_examples(split)
        .with_context(|| format!("generating {} examples", split.split))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for example in examples.take(limit.unwrap_or(usize::MAX)) {
        let (key, record) = example?;
        let line = json!({
            "key": key,
            "style": record.style,
            "artwork": record.artwork,
            "image": record.image,
        });
        writeln!(out, "{line}")?;
    }
    Ok(())
}
