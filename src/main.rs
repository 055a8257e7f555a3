use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tabled::settings::Style;

use skylog::{
    export_summary, parse_display_date, sync_range, Archive, DateRange, MediaStats, APP_NAME,
    DEFAULT_PAUSE,
};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Archive file [default: apod.json under the XDG data dir]
    #[arg(long, global = true)]
    archive: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch any missing records between two dates into the archive
    Fetch {
        /// First date of the range, DD/MM/YYYY
        start: String,
        /// Last date of the range, inclusive, DD/MM/YYYY
        end: String,
        /// Override the API endpoint, for testing
        #[arg(long, hide = true)]
        api_url: Option<String>,
    },
    /// Merge the archive into a summary CSV, skipping dates already there
    Export {
        /// Summary file [default: apod_summary.csv under the XDG data dir]
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show media counts and the date with the longest explanation
    Stats,
}

fn data_path(arg: Option<PathBuf>, name: &str) -> Result<PathBuf> {
    match arg {
        Some(path) => Ok(path),
        None => {
            let dirs = xdg::BaseDirectories::with_prefix(APP_NAME)?;
            Ok(dirs.place_data_file(name)?)
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let archive_path = data_path(cli.archive, "apod.json")?;

    match cli.command {
        Command::Fetch {
            start,
            end,
            api_url,
        } => {
            // Fail on configuration before any network activity.
            let api_key = std::env::var("API_KEY")
                .ok()
                .filter(|k| !k.is_empty())
                .context("Please set the API_KEY environment variable")?;
            let start = parse_display_date(&start)?;
            let end = parse_display_date(&end)?;
            let range = DateRange::new(start, end)?;

            let report = sync_range(
                &api_key,
                range,
                &archive_path,
                api_url.as_deref(),
                DEFAULT_PAUSE,
            )?;
            println!(
                "{} fetched, {} already archived, {} failed",
                report.fetched, report.skipped, report.failed
            );
        }
        Command::Export { out } => {
            let archive = Archive::load(&archive_path);
            let out = data_path(out, "apod_summary.csv")?;
            let appended = export_summary(&archive, &out)?;
            if appended > 0 {
                println!("Appended {appended} new rows to {}", out.display());
            } else {
                println!("No new rows for {}", out.display());
            }
        }
        Command::Stats => {
            let archive = Archive::load(&archive_path);
            if archive.is_empty() {
                bail!("Archive at {} holds no records", archive_path.display());
            }
            let stats = MediaStats::from_archive(&archive);
            let mut table = tabled::Table::new([stats]);
            table.with(Style::sharp());
            println!("{table}");
        }
    }
    Ok(())
}
