mod reports;
mod simulation;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;

use simulation::{BatchConfig, run_batch};

#[derive(Debug, Parser)]
#[command(name = "ludoroyale-tester", version = "0.1.0")]
#[command(about = "Headless balance and QA harness for Ludo Royale")]
struct Args {
    /// Number of matches per seed
    #[arg(long, default_value_t = 20)]
    games: usize,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of bot opponents (1-3)
    #[arg(long, default_value_t = 3)]
    bots: usize,

    /// Abort a match after this many turns
    #[arg(long, default_value_t = 5000)]
    max_turns: u32,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "markdown"])]
    report: String,

    /// Log per-match outcomes as they finish
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.games == 0 {
        bail!("--games must be at least 1");
    }
    let seeds = parse_seeds(&args.seeds)?;

    if args.report == "console" {
        println!(
            "{} {} seed(s) x {} game(s), {} bot(s)",
            "Running".bright_green().bold(),
            seeds.len(),
            args.games,
            args.bots.clamp(1, 3)
        );
    }

    let mut batch_reports = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let config = BatchConfig {
            seed,
            games: args.games,
            bots: args.bots.clamp(1, 3),
            max_turns: args.max_turns,
            verbose: args.verbose,
        };
        batch_reports.push(run_batch(&config)?);
    }

    match args.report.as_str() {
        "json" => reports::generate_json_report(&batch_reports)?,
        "markdown" => reports::generate_markdown_report(&batch_reports),
        _ => reports::generate_console_report(&batch_reports),
    }
    Ok(())
}

fn parse_seeds(input: &str) -> Result<Vec<u64>> {
    let seeds: Vec<u64> = input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<u64>()
                .with_context(|| format!("invalid seed '{token}'"))
        })
        .collect::<Result<_>>()?;
    if seeds.is_empty() {
        bail!("no seeds provided");
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_parse_from_csv() {
        assert_eq!(parse_seeds("1, 2,3").unwrap(), vec![1, 2, 3]);
        assert!(parse_seeds("1,x").is_err());
        assert!(parse_seeds(" , ").is_err());
    }
}
