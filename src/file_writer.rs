//! Case report export.
//!
//! Writes one case per file as TXT (the rendered report), CSV (a header and
//! one row) or JSON (the case record without the raw text).

use crate::error::Result;
use crate::models::{Case, OutputFormat};
use crate::report::render_case_report;
use csv::Writer;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name for a case export: `hopechain_case_<id>.<ext>`.
///
/// Characters outside `[A-Za-z0-9_-]` in the id are replaced with `_` so an id
/// can never escape the output directory.
#[must_use]
pub fn report_file_name(intake_id: &str, format: OutputFormat) -> String {
    let safe_id: String = intake_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("hopechain_case_{safe_id}.{}", format.extension())
}

/// Write a case report into `output_dir`, creating it if needed.
///
/// # Returns
///
/// Path of the created file
pub fn write_case_report(
    case: &Case,
    format: OutputFormat,
    output_dir: &Path,
    line_width: usize,
) -> Result<PathBuf> {
    create_dir_all(output_dir)?;
    let file_path = output_dir.join(report_file_name(&case.intake_id, format));

    match format {
        OutputFormat::Txt => write_txt_file(case, &file_path, line_width)?,
        OutputFormat::Csv => write_csv_file(case, &file_path)?,
        OutputFormat::Json => write_json_file(case, &file_path)?,
    }

    tracing::info!(
        intake_id = %case.intake_id,
        format = format.extension(),
        path = %file_path.display(),
        "Case report written"
    );
    Ok(file_path)
}

fn write_txt_file(case: &Case, file_path: &Path, line_width: usize) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(render_case_report(case, line_width).as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn join<T: ToString>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(";")
}

/// Header row plus a single data row
fn write_csv_file(case: &Case, file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([
        "intake_id",
        "status",
        "assigned_to",
        "risk_level",
        "risk_score",
        "should_escalate",
        "recommended_action",
        "needs",
        "urgency",
        "emotion",
        "intensity",
        "support_suggestion",
        "safety_flags",
        "redacted_fields",
        "microstory",
        "safe_text",
    ])?;

    writer.write_record([
        case.intake_id.clone(),
        case.status.to_string(),
        case.assigned_to.clone().unwrap_or_default(),
        case.risk.risk_level.to_string(),
        case.risk.risk_score.to_string(),
        case.risk.should_escalate.to_string(),
        case.risk.recommended_action.to_string(),
        join(&case.needs.needs),
        case.needs.urgency.to_string(),
        case.emotion.emotion.to_string(),
        case.emotion.intensity.to_string(),
        case.emotion.support_suggestion.to_string(),
        join(&case.safety.safety_flags),
        join(&case.safety.redacted_fields),
        case.curated.microstory.clone(),
        case.safety.safe_text.clone(),
    ])?;

    writer.flush()?;
    Ok(())
}

fn write_json_file(case: &Case, file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let writer = BufWriter::new(file);

    let mut value = serde_json::to_value(case)?;
    if let Some(object) = value.as_object_mut() {
        object.remove("raw_text");
    }

    serde_json::to_writer_pretty(writer, &value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_sanitized() {
        assert_eq!(report_file_name("case-7", OutputFormat::Txt), "hopechain_case_case-7.txt");
        assert_eq!(
            report_file_name("../etc/passwd", OutputFormat::Json),
            "hopechain_case____etc_passwd.json"
        );
    }
}
