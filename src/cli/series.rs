//! Series command implementation.

use super::output::{JsonSeriesResult, format_series_csv, format_series_text};
use super::{CliError, SeriesFormat};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tricolor::{AgentCommand, SeriesConfig, run_series};

/// Execute the series command.
///
/// # Errors
///
/// Returns an error if the series cannot be run or its result written.
pub(crate) fn execute(
    agents: &[AgentCommand; 2],
    config: &SeriesConfig,
    format: SeriesFormat,
    progress: bool,
) -> Result<(), CliError> {
    let names = [agents[0].label(), agents[1].label()];

    let pb = if progress {
        let pb = ProgressBar::new(config.games);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    let stats = run_series(agents, config, |_| {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    })?;

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();

    match format {
        SeriesFormat::Text => {
            println!();
            print!("{}", format_series_text(&stats, &names));
            println!();
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        SeriesFormat::Json => {
            let json_result = JsonSeriesResult::from_stats(&stats, &names);
            println!("{}", serde_json::to_string_pretty(&json_result)?);
        }
        SeriesFormat::Csv => {
            print!("{}", format_series_csv(&stats, &names));
        }
    }

    Ok(())
}
