//! Latest analysis report per course, kept as `gap_analysis_<course>.json`
//! files in the analysis output directory.

use std::path::{Path, PathBuf};

use crate::analysis::pipeline::AnalysisReport;
use crate::ingest::store::{read_json_or_default, write_json_pretty};
use crate::ingest::IngestError;

/// `"AI Engineer"` → `gap_analysis_ai_engineer.json`.
pub fn report_file_name(course_name: &str) -> String {
    let mut slug = String::with_capacity(course_name.len());
    for ch in course_name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "gap_analysis_course.json".to_string()
    } else {
        format!("gap_analysis_{slug}.json")
    }
}

/// Overwrites the course's previous report. Returns the written path.
pub async fn save_report(dir: &Path, report: &AnalysisReport) -> Result<PathBuf, IngestError> {
    let path = dir.join(report_file_name(&report.course_name));
    write_json_pretty(&path, report).await?;
    Ok(path)
}

/// Latest saved report for `course_name`, if any.
///
/// Names that share a file name (e.g. "AI Engineer" and "ai-engineer") do not
/// see each other's reports.
pub async fn load_report(
    dir: &Path,
    course_name: &str,
) -> Result<Option<AnalysisReport>, IngestError> {
    let course_name = course_name.trim();
    let report: Option<AnalysisReport> =
        read_json_or_default(&dir.join(report_file_name(course_name))).await?;
    Ok(report.filter(|r| r.course_name == course_name))
}
