//! Rendering of analysis snapshots
//!
//! [`console`] produces the text printed by `analyze` and `monitor`;
//! [`html`] produces a standalone page written under `reports/`.

pub mod console;
pub mod html;

use crate::analyzer::AnalysisSnapshot;
use crate::paths::{DataDir, PathError};
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

pub use console::render_console;
pub use html::{escape_html, render_html};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Dir(#[from] PathError),
    #[error("Failed to write report {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

pub fn report_file_name(time: DateTime<Local>) -> String {
    format!("mesh_analysis_{}.html", time.format("%Y%m%d_%H%M%S"))
}

/// Write the HTML report for `snapshot` and return its path
pub fn write_html_report(data_dir: &DataDir, snapshot: &AnalysisSnapshot) -> Result<PathBuf, ReportError> {
    data_dir.ensure()?;

    let path = data_dir.reports_dir().join(report_file_name(snapshot.timestamp));
    fs::write(&path, render_html(snapshot)).map_err(|source| ReportError::Write {
        path: path.clone(),
        source,
    })?;
    data_dir.hand_over(&path);

    info!("HTML report written to {}", path.display());
    Ok(path)
}

/// `dual_band` -> `Dual Band` (with `sep` between words)
pub(crate) fn title_case(s: &str, sep: &str) -> String {
    s.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(sep)
}

/// Rating label for a historical stability score
pub(crate) fn stability_rating(score: f64) -> &'static str {
    if score >= 90.0 {
        "excellent"
    } else if score >= 75.0 {
        "good"
    } else if score >= 60.0 {
        "fair"
    } else {
        "poor"
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("dual_band", "-"), "Dual-Band");
        assert_eq!(title_case("good_topology", " "), "Good Topology");
        assert_eq!(title_case("eero", " "), "Eero");
    }

    #[test]
    fn test_stability_rating_thresholds() {
        assert_eq!(stability_rating(90.0), "excellent");
        assert_eq!(stability_rating(89.9), "good");
        assert_eq!(stability_rating(60.0), "fair");
        assert_eq!(stability_rating(12.0), "poor");
    }

    #[test]
    fn test_write_html_report() {
        let tmp = TempDir::new().unwrap();
        let data_dir = DataDir::at(tmp.path().join("data"));
        let snapshot = fixtures::mesh_snapshot();

        let path = write_html_report(&data_dir, &snapshot).unwrap();

        assert_eq!(
            path,
            tmp.path().join("data/reports/mesh_analysis_20261019_143005.html")
        );
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("HomeMesh"));
    }
}
