//! Report rendering for batch results.

use anyhow::Result;
use colored::Colorize;

use ludoroyale_game::numbers::round_f64_to_i32;

use crate::simulation::BatchReport;

fn percent(rate: f64) -> i32 {
    round_f64_to_i32(rate * 100.0)
}

pub fn generate_console_report(reports: &[BatchReport]) {
    println!();
    println!("{}", "Ludo Royale Batch Results".bright_cyan().bold());
    println!("{}", "=========================".cyan());

    for report in reports {
        println!();
        println!(
            "{} seed {} ({} games, {} unfinished)",
            "▶".green(),
            report.seed.to_string().bold(),
            report.games,
            report.unfinished
        );
        let seats: Vec<String> = report
            .wins_by_seat
            .iter()
            .enumerate()
            .map(|(seat, wins)| format!("seat {seat}: {wins}"))
            .collect();
        println!("   Wins by seat: {}", seats.join(", "));
        println!(
            "   Human win rate: {}%",
            percent(report.human_win_rate).to_string().bold()
        );
        println!("   Average match length: {:.1} turns", report.average_turns);

        let stages = &report.stage_counts;
        let total = stages.total().max(1);
        println!(
            "   Stages: failsafe {} | endgame {} | capture {} | sigmoid {}/{} ({}% default)",
            stages.failsafe.to_string().yellow(),
            stages.endgame.to_string().yellow(),
            stages.capture_assist.to_string().yellow(),
            stages.sigmoid_low,
            stages.sigmoid_high,
            percent_of(stages.sigmoid_low + stages.sigmoid_high, total)
        );
        println!(
            "   Anti-capture corrections: {} | no-move turns: {} | rebuys: {}",
            report.anti_capture_corrections, report.no_move_turns, report.rebuys
        );
        println!(
            "   Final balance: {} | recent win rate: {:.3}",
            report.final_balance.to_string().bold(),
            report.final_recent_win_rate
        );
    }
    println!();
}

/// Emit the raw reports as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn generate_json_report(reports: &[BatchReport]) -> Result<()> {
    let json = serde_json::to_string_pretty(reports)?;
    println!("{json}");
    Ok(())
}

pub fn generate_markdown_report(reports: &[BatchReport]) {
    println!("# Ludo Royale Batch Results\n");
    for report in reports {
        println!("## Seed {}\n", report.seed);
        println!("- **Games**: {} ({} unfinished)", report.games, report.unfinished);
        println!("- **Human win rate**: {}%", percent(report.human_win_rate));
        println!("- **Average match length**: {:.1} turns", report.average_turns);
        let stages = &report.stage_counts;
        println!(
            "- **Stages**: failsafe {}, endgame {}, capture {}, sigmoid {}/{}",
            stages.failsafe,
            stages.endgame,
            stages.capture_assist,
            stages.sigmoid_low,
            stages.sigmoid_high
        );
        println!(
            "- **Anti-capture corrections**: {}",
            report.anti_capture_corrections
        );
        println!("- **Final balance**: {}\n", report.final_balance);
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent_of(part: usize, whole: usize) -> i32 {
    round_f64_to_i32(part as f64 / whole as f64 * 100.0)
}
