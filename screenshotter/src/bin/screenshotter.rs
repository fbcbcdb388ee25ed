use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use screenshotter::scan::DEFAULT_URL_FILE;
use screenshotter::{process_file, scan_url, Config, LogProgress, Viewport};

/// Generate screenshots at several viewport widths for a file of URLs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture screenshots for every URL in a file (one URL per line)
    Process {
        /// File with one URL per line
        file: PathBuf,

        /// Output directory other than 'screenshots'
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of URLs captured concurrently
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Viewport as WIDTHxHEIGHT; repeat to replace the default set
        #[arg(long = "viewport", value_parser = Viewport::parse)]
        viewports: Vec<Viewport>,

        /// Milliseconds a page may render after load before capture
        #[arg(long)]
        delay: Option<u64>,

        /// Seconds before a single browser run is abandoned
        #[arg(long)]
        timeout: Option<u64>,

        /// Keep the full viewport height instead of cropping to the page content
        #[arg(long)]
        no_crop: bool,

        /// Skip fetching each page before screenshotting it
        #[arg(long)]
        no_preflight: bool,

        /// Chromium or Chrome executable
        #[arg(long)]
        chrome: Option<String>,

        /// Write directly into the output directory instead of a timestamped subdirectory
        #[arg(long)]
        no_date_dir: bool,

        /// JSON file with default settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Build a URL file from the pages a base URL links to
    Scan {
        baseurl: String,

        /// Output file other than 'urls'
        #[arg(short, long, default_value = DEFAULT_URL_FILE)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Process {
            file,
            output,
            batch_size,
            viewports,
            delay,
            timeout,
            no_crop,
            no_preflight,
            chrome,
            no_date_dir,
            config,
        } => {
            let mut settings = match &config {
                Some(path) => Config::from_file(path)?,
                None => Config::default(),
            };
            if let Some(output) = output {
                settings.output = output;
            }
            if let Some(batch_size) = batch_size {
                settings.batch_size = batch_size;
            }
            if !viewports.is_empty() {
                settings.viewports = viewports;
            }
            if let Some(delay) = delay {
                settings.delay_ms = delay;
            }
            if let Some(timeout) = timeout {
                settings.timeout_secs = timeout;
            }
            if no_crop {
                settings.crop = false;
            }
            if no_preflight {
                settings.preflight = false;
            }
            if let Some(chrome) = chrome {
                settings.chrome = chrome;
            }
            if no_date_dir {
                settings.date_dir = false;
            }

            let capturer = settings.capturer();
            let report = process_file(&file, &settings, capturer, &mut LogProgress)
                .await
                .with_context(|| format!("Failed to process screenshots for {}", file.display()))?;

            println!(
                "Screenshots saved to the '{}' directory.",
                report.output_dir.display()
            );
        }
        Command::Scan { baseurl, output } => {
            let urls = scan_url(&baseurl, &output)
                .await
                .with_context(|| format!("Failed to scan {}", baseurl))?;
            info!("Found {} pages", urls.len());
            println!("URLs logged to file: '{}'.", output.display());
        }
    }

    Ok(())
}
