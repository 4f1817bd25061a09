/*!
 * Command-line interface for mdbundle
 */

use std::fs;
use std::io;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, FixedOffset, Local};
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use mdbundle::config::{Args, Config};
use mdbundle::exporter::Exporter;
use mdbundle::report::{ExportReport, ReportFormat, Reporter};

fn init_logging(verbose: u8, quiet: bool) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) Elapsed: {elapsed_precise}")
    {
        progress.set_style(style);
    }
    progress.set_prefix("📊 Bundling");
    progress
}

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "mdbundle", &mut io::stdout());
        return;
    }

    init_logging(args.verbose, args.quiet);
    let quiet = args.quiet;

    // Create and validate configuration
    let config = Config::from_args(args);
    if let Err(e) = config.validate() {
        log::error!("{}", e);
        process::exit(1);
    }

    let progress = progress_bar(quiet);
    progress.set_message(format!("📂 {}", config.target_dir.display()));

    let generated_at: DateTime<FixedOffset> = Local::now().into();
    let exporter = Exporter::new(config, generated_at, Arc::new(progress.clone()));

    let start_time = Instant::now();
    let summary = match exporter.compile() {
        Ok(summary) => summary,
        Err(e) => {
            progress.finish_and_clear();
            log::error!("Export failed: {}", e);
            process::exit(1);
        }
    };
    let duration = start_time.elapsed();
    progress.finish_and_clear();

    if quiet {
        return;
    }

    let bytes_written = summary
        .documents
        .iter()
        .filter_map(|path| fs::metadata(path).ok())
        .map(|m| m.len())
        .sum();

    let report = ExportReport {
        summary,
        duration,
        bytes_written,
    };
    Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
}
