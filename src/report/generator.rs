//! Report generation.
//!
//! Renders the analytics summary and employee listings for the terminal
//! (or an output file), builds the fixed-format context block the AI
//! path consumes, and maps AI failures to the strings users see.

use crate::ai::AiError;
use crate::models::{AnalyticsSummary, EmployeeRecord};
use anyhow::Result;
use chrono::Utc;

/// Generate the plain-text summary report.
pub fn generate_text_report(summary: &AnalyticsSummary, database: &str) -> String {
    let mut output = String::new();

    output.push_str("# TeamPulse Report\n\n");

    output.push_str("## Metadata\n\n");
    output.push_str(&format!("- **Database:** {}\n", database));
    output.push_str(&format!(
        "- **Generated:** {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!(
        "- **Total Employees:** {}\n\n",
        summary.total_employees
    ));

    output.push_str("## Summary\n\n");
    output.push_str(&format!(
        "- **Average Sentiment:** {:.1}%\n\n",
        summary.average_sentiment
    ));

    output.push_str("### Quadrant Distribution\n\n");
    if summary.quadrant_distribution.is_empty() {
        output.push_str("No records loaded.\n\n");
    } else {
        for (label, count) in &summary.quadrant_distribution {
            output.push_str(&format!("- {}: {}\n", label, count));
        }
        output.push('\n');
    }

    output.push_str("### Sentiment by Role\n\n");
    if summary.sentiment_by_role.is_empty() {
        output.push_str("No records loaded.\n");
    } else {
        for (role, sentiment) in &summary.sentiment_by_role {
            output.push_str(&format!("- {}: {:.1}%\n", role, sentiment));
        }
    }

    output
}

/// Serialize the summary in its API response shape.
pub fn generate_json_report(summary: &AnalyticsSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Render employee records as one line each.
pub fn generate_employee_listing(records: &[EmployeeRecord]) -> String {
    if records.is_empty() {
        return "No matching employees.".to_string();
    }

    records
        .iter()
        .map(|record| {
            format!(
                "📄 #{} {} ({}): {:.1}% [{}]",
                record.employee_id,
                record.employee_name,
                record.role,
                record.sentiment_score,
                record.quadrant
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}

/// Build the fixed-format context block sent alongside an AI question.
///
/// One line per statistic; the two breakdowns are `key: value` pairs
/// joined by commas, percentages with one decimal.
pub fn build_ai_context(summary: &AnalyticsSummary) -> String {
    let quadrant_info = summary
        .quadrant_distribution
        .iter()
        .map(|(label, count)| format!("{}: {}", label, count))
        .collect::<Vec<String>>()
        .join(", ");

    let role_info = summary
        .sentiment_by_role
        .iter()
        .map(|(role, sentiment)| format!("{}: {:.1}%", role, sentiment))
        .collect::<Vec<String>>()
        .join(", ");

    format!(
        "Total Employees: {}\nAverage Sentiment: {:.1}%\nQuadrant Distribution: {}\nSentiment by Role: {}",
        summary.total_employees, summary.average_sentiment, quadrant_info, role_info
    )
}

/// Map an AI failure to the string shown to the user.
///
/// The AI surface always yields a string, so callers never need a
/// separate error-rendering path.
pub fn render_ai_failure(error: &AiError) -> String {
    match error {
        AiError::NotConfigured => {
            "⚠️ AI analysis is not configured. Set GEMINI_API_KEY to enable it.".to_string()
        }
        AiError::NoCandidates => "⚠️ The AI service returned no candidates.".to_string(),
        AiError::ContentFiltered { finish_reason } => format!(
            "⚠️ The AI service returned no usable text (finish reason: {}).",
            finish_reason
        ),
        other => format!("❌ AI analysis failed: {}", other),
    }
}
