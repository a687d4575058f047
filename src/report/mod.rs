// src/report/mod.rs
use crate::types::{Recommendation, ScanReport, SizingResult};
use serde_json::{json, Value};

pub const TARGET_MET: &str = "Already at or below target!";
pub const NOTHING_FLAGGED: &str = "No positions found exceeding your target loss!";

/// Sizing outcome for one flagged position of a scan.
#[derive(Debug, Clone)]
pub struct SizedPosition {
    pub ticker: String,
    /// Failure message when the position could not be sized.
    pub outcome: Result<SizingResult, String>,
}

/// Text block for one sizing result. Money and percents use 2 decimals.
pub fn render_sizing(result: &SizingResult) -> String {
    let h = &result.holding;
    let mut lines = vec![
        format!("Current price:     ${:.2}", h.current_price()),
        format!("Average cost:      ${:.2}", h.average_cost()),
        format!("Shares held:       {:.2}", h.share_count()),
        format!(
            "Current loss:      ${:.2} ({:.2}%)",
            result.current_loss_amount, result.current_loss_percent
        ),
        format!("Target loss:       -{:.2}%", result.target_loss_percent),
    ];

    match &result.recommendation {
        Recommendation::TargetAlreadyMet => {
            lines.push(format!("Shares to buy:     {}", TARGET_MET));
        }
        Recommendation::Buy {
            shares_to_buy,
            projection,
            ..
        } => {
            lines.push(format!("Shares to buy:     {}", shares_to_buy));
            lines.push(format!("New share count:   {:.2}", projection.new_share_count));
            lines.push(format!("New average cost:  ${:.2}", projection.new_average_cost));
            lines.push(format!("New loss:          {:.2}%", projection.new_loss_percent));
        }
    }
    to_block(lines)
}

/// Flagged positions in page order, or a notice when nothing crossed the threshold.
pub fn render_scan(report: &ScanReport) -> String {
    let mut lines = Vec::new();
    if report.flagged.is_empty() {
        lines.push(NOTHING_FLAGGED.to_string());
    } else {
        lines.push(format!(
            "Positions beyond -{:.2}% ({} of {}):",
            report.threshold_percent,
            report.flagged.len(),
            report.scanned
        ));
        lines.extend(report.flagged.iter().map(|position| {
            format!(
                "  {:<8} {:>9.2}%  {} shares",
                position.ticker,
                position.percent_change,
                position.share_count.normalize()
            )
        }));
    }
    if !report.skipped.is_empty() {
        lines.push(format!("Skipped {} unreadable entries", report.skipped.len()));
    }
    to_block(lines)
}

/// One headed sizing block per successfully sized position.
pub fn render_sized(sized: &[SizedPosition]) -> String {
    let mut out = String::new();
    for position in sized {
        if let Ok(result) = &position.outcome {
            out.push_str(&format!("\n== {} ==\n", position.ticker));
            out.push_str(&render_sizing(result));
        }
    }
    out
}

/// A scan and its sizings as a single JSON document.
pub fn scan_json(report: &ScanReport, sized: &[SizedPosition]) -> Value {
    let skipped: Vec<String> = report.skipped.iter().map(|e| e.to_string()).collect();
    let sizing: Vec<Value> = sized
        .iter()
        .map(|position| match &position.outcome {
            Ok(result) => json!({ "ticker": position.ticker, "result": result }),
            Err(e) => json!({ "ticker": position.ticker, "error": e }),
        })
        .collect();
    json!({
        "thresholdPercent": report.threshold_percent,
        "scanned": report.scanned,
        "flagged": report.flagged,
        "skipped": skipped,
        "sizing": sizing,
    })
}

fn to_block(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
