//! Support archive of a session's logs and history data

use crate::history::{EVENTS_FILE, HISTORY_FILE};
use crate::logs::{self, Session, ANALYSIS};
use crate::paths::{DataDir, PathError};
use chrono::Local;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error(transparent)]
    Dir(#[from] PathError),
    #[error("Archive I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ArchiveError + '_ {
    move |source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub fn archive_name(session: &Session) -> String {
    format!("mesh_analysis_{}.zip", session.id)
}

/// Zip the session's logs and the history files into the data directory
///
/// Returns the archive path.
pub fn create_archive(data_dir: &DataDir, session: &Session) -> Result<PathBuf, ArchiveError> {
    data_dir.ensure()?;

    let path = data_dir.root().join(archive_name(session));
    let file = File::create(&path).map_err(io_error(&path))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let logs_dir = data_dir.logs_dir();
    let log_files = logs::session_log_files(&logs_dir, session).map_err(io_error(&logs_dir))?;

    let mut included = Vec::new();
    for log in &log_files {
        if let Some(name) = log.file_name().and_then(|n| n.to_str()) {
            let entry = format!("logs/{}", name);
            zip.start_file(entry.as_str(), options)?;
            zip.write_all(&fs::read(log).map_err(io_error(log))?)
                .map_err(io_error(&path))?;
            included.push(entry);
        }
    }

    for name in [HISTORY_FILE, EVENTS_FILE] {
        let source = data_dir.root().join(name);
        if !source.exists() {
            continue;
        }
        let entry = format!("data/{}", name);
        zip.start_file(entry.as_str(), options)?;
        zip.write_all(&fs::read(&source).map_err(io_error(&source))?)
            .map_err(io_error(&path))?;
        included.push(entry);
    }

    zip.start_file("session_summary.txt", options)?;
    zip.write_all(session_summary(session, &logs_dir, &included).as_bytes())
        .map_err(io_error(&path))?;

    zip.start_file("README.txt", options)?;
    zip.write_all(README.as_bytes()).map_err(io_error(&path))?;

    zip.finish()?;
    data_dir.hand_over(&path);

    info!(target: ANALYSIS, "Analysis archive created: {}", path.display());
    Ok(path)
}

fn session_summary(session: &Session, logs_dir: &Path, included: &[String]) -> String {
    let host = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());

    let mut lines = vec![
        "WiFi Mesh Network Analysis Session Summary".to_string(),
        "=".repeat(50),
        format!("Session ID: {}", session.id),
        format!("Date: {}", session.date),
        format!("Host: {}", host),
        format!("Created: {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
        format!("Logs Directory: {}", logs_dir.display()),
        String::new(),
        "Files Included:".to_string(),
    ];
    if included.is_empty() {
        lines.push("- (no logs or history data found)".to_string());
    }
    lines.extend(included.iter().map(|entry| format!("- {}", entry)));
    lines.push(String::new());
    lines.join("\n")
}

const README: &str = "\
WiFi Mesh Network Analyzer - Log Archive
=============================================

This archive contains the logs and history data from one analysis session.

LOG FILES

logs/analysis_<session>.log
  Analysis results: mesh topology, recommendations and problem detection.

logs/connections_<date>.log
  Connection events: roams, disconnects and authentication failures.

logs/performance_<date>.log
  Signal strength of the current link and scored alternatives over time.

logs/debug_<date>.log
  Everything above plus command timing and other diagnostics.

DATA FILES

data/bssid_history.json
  Per-BSSID history: connection counts, success rate, signal samples and
  stability score.

data/connection_events.json
  Raw connection events used for pattern analysis.

session_summary.txt
  Session id, host name, creation time and the list of included files.
";
