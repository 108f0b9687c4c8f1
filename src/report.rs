//! Plain-text case report for volunteers and counsellors.
//!
//! Built only from the redacted parts of a case; the raw text is never
//! rendered even when it was stored.

use std::fmt::{self, Write};

use crate::models::Case;
use crate::utils::wrap_text;

/// Report title
pub const REPORT_TITLE: &str = "HopeChain Case Report";

fn join_labels<T: fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return "none".to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_section(out: &mut String, heading: &str, body: &str, line_width: usize) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{heading}")?;
    writeln!(out, "{}", "-".repeat(heading.chars().count()))?;
    for line in wrap_text(body, line_width) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn write_report(out: &mut String, case: &Case, line_width: usize) -> fmt::Result {
    let risk = &case.risk;
    let needs = &case.needs;
    let emotion = &case.emotion;

    writeln!(out, "{REPORT_TITLE}")?;
    writeln!(out, "{}", "=".repeat(REPORT_TITLE.len()))?;
    writeln!(out)?;
    writeln!(out, "Case ID: {}", case.intake_id)?;
    writeln!(out, "Status: {}", case.status)?;
    writeln!(
        out,
        "Assigned to: {}",
        case.assigned_to.as_deref().unwrap_or("unassigned")
    )?;
    writeln!(
        out,
        "Consent: {} ({})",
        case.consent_type.label(),
        case.consent_timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(
        out,
        "Risk: {} ({:.3}), escalate: {}",
        risk.risk_level,
        risk.risk_score,
        if risk.should_escalate { "yes" } else { "no" }
    )?;
    writeln!(out, "Recommended action: {}", risk.recommended_action)?;
    if !risk.reason.is_empty() {
        writeln!(out, "Reason: {}", risk.reason)?;
    }
    writeln!(
        out,
        "Needs: {} (urgency: {}, confidence: {})",
        join_labels(&needs.needs),
        needs.urgency,
        needs.confidence
    )?;
    writeln!(
        out,
        "Emotion: {} (intensity {}, {}), support: {}",
        emotion.emotion, emotion.intensity, emotion.category, emotion.support_suggestion
    )?;
    writeln!(out, "Matched phrases: {}", join_labels(&risk.matched_phrases))?;
    writeln!(out, "Safety flags: {}", join_labels(&case.safety.safety_flags))?;
    writeln!(
        out,
        "Redacted fields: {}",
        join_labels(&case.safety.redacted_fields)
    )?;

    write_section(out, "Microstory", &case.curated.microstory, line_width)?;
    write_section(out, "Safe text", &case.safety.safe_text, line_width)
}

/// Render a case as a word-wrapped text report
#[must_use]
pub fn render_case_report(case: &Case, line_width: usize) -> String {
    let mut report = String::new();
    match write_report(&mut report, case, line_width) {
        Ok(()) => report,
        // Formatting into a String only fails if a Display impl does
        Err(_) => String::new(),
    }
}
