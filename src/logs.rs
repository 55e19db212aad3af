//! Session logging
//!
//! Records are routed by tracing target into per-session and per-day files
//! under `~/.mesh_analyzer/logs`:
//!
//! | target        | file                          |
//! |---------------|-------------------------------|
//! | `analysis`    | `analysis_<session>.log`      |
//! | `connections` | `connections_<date>.log`      |
//! | `performance` | `performance_<date>.log`      |
//! | everything    | `debug_<date>.log`            |
//!
//! The console only shows this crate's own records.

use crate::advisor::{Alternative, Recommendation};
use crate::history::{ConnectionEvent, ConnectionPatterns};
use crate::mesh::MeshReport;
use crate::wifi::LinkInfo;
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

pub const ANALYSIS: &str = "analysis";
pub const CONNECTIONS: &str = "connections";
pub const PERFORMANCE: &str = "performance";

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("Failed to install log subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Identifies one run of the analyzer in log and archive names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub date: String,
}

impl Session {
    pub fn start() -> Self {
        Self::at(Local::now())
    }

    pub fn at(time: DateTime<Local>) -> Self {
        Self {
            id: time.format("%Y-%m-%d_%H-%M-%S").to_string(),
            date: time.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn analysis_log(&self) -> String {
        format!("analysis_{}.log", self.id)
    }

    pub fn connections_log(&self) -> String {
        format!("connections_{}.log", self.date)
    }

    pub fn performance_log(&self) -> String {
        format!("performance_{}.log", self.date)
    }

    pub fn debug_log(&self) -> String {
        format!("debug_{}.log", self.date)
    }

    /// Whether a log file belongs to this session or its day
    pub fn owns(&self, file_name: &str) -> bool {
        file_name.ends_with(".log") && (file_name.contains(&self.id) || file_name.contains(&self.date))
    }
}

/// Keeps the background log writers alive; drop to flush
pub struct LogGuard {
    _guards: Vec<WorkerGuard>,
    logs_dir: Option<PathBuf>,
}

impl LogGuard {
    /// `None` when only console logging is active
    pub fn logs_dir(&self) -> Option<&Path> {
        self.logs_dir.as_deref()
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn console_layer(verbose: bool) -> BoxedLayer {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mesh_analyzer={}", level)));

    fmt::layer()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(filter)
        .boxed()
}

fn file_layer(
    dir: &Path,
    file_name: &str,
    filter: Targets,
    guards: &mut Vec<WorkerGuard>,
) -> BoxedLayer {
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    guards.push(guard);

    fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter)
        .boxed()
}

fn file_layers(dir: &Path, session: &Session, guards: &mut Vec<WorkerGuard>) -> Vec<BoxedLayer> {
    vec![
        file_layer(
            dir,
            &session.analysis_log(),
            Targets::new().with_target(ANALYSIS, LevelFilter::INFO),
            guards,
        ),
        file_layer(
            dir,
            &session.connections_log(),
            Targets::new().with_target(CONNECTIONS, LevelFilter::INFO),
            guards,
        ),
        file_layer(
            dir,
            &session.performance_log(),
            Targets::new().with_target(PERFORMANCE, LevelFilter::DEBUG),
            guards,
        ),
        file_layer(
            dir,
            &session.debug_log(),
            Targets::new().with_default(LevelFilter::DEBUG),
            guards,
        ),
    ]
}

/// Install the global subscriber
///
/// With `logs_dir` set, the session files are created there. If the
/// directory can't be created the console layer is still installed and a
/// warning is logged.
pub fn init(logs_dir: Option<&Path>, session: &Session, verbose: bool) -> Result<LogGuard, LogError> {
    let mut guards = Vec::new();
    let mut layers = vec![console_layer(verbose)];
    let mut active_dir = None;
    let mut dir_error = None;

    if let Some(dir) = logs_dir {
        match fs::create_dir_all(dir) {
            Ok(()) => {
                layers.extend(file_layers(dir, session, &mut guards));
                active_dir = Some(dir.to_path_buf());
            }
            Err(source) => {
                dir_error = Some(LogError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        }
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    if let Some(e) = dir_error {
        warn!("File logging disabled: {}", e);
    }
    Ok(LogGuard {
        _guards: guards,
        logs_dir: active_dir,
    })
}

/// Log files in `dir` belonging to `session`, sorted by name
pub fn session_log_files(dir: &Path, session: &Session) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| session.owns(name))
        })
        .collect();
    files.sort();
    Ok(files)
}

pub fn log_analysis_start(interface: &str, session: &Session) {
    info!(target: ANALYSIS, "{}", "=".repeat(80));
    info!(target: ANALYSIS, "WiFi Mesh Network Analysis Session Started");
    info!(target: ANALYSIS, "Interface: {}", interface);
    info!(target: ANALYSIS, "Session ID: {}", session.id);
    info!(target: ANALYSIS, "{}", "=".repeat(80));
    debug!("Analysis session started on interface {}", interface);
}

pub fn log_network_scan(aps_found: usize, scan_secs: f64) {
    info!(
        target: ANALYSIS,
        "Network Scan Complete: {} APs found in {:.2}s", aps_found, scan_secs
    );
}

pub fn log_mesh_analysis(report: &MeshReport) {
    let bands: Vec<String> = report.bands.iter().map(|b| b.to_string()).collect();
    info!(target: ANALYSIS, "MESH TOPOLOGY ANALYSIS:");
    info!(
        target: ANALYSIS,
        "  Brand: {}", report.brand_name.as_deref().unwrap_or("Unknown")
    );
    info!(target: ANALYSIS, "  Type: {}", report.mesh_type.as_str());
    info!(target: ANALYSIS, "  Nodes: {}", report.total_nodes());
    info!(target: ANALYSIS, "  Radios: {}", report.total_radios);
    info!(target: ANALYSIS, "  Bands: {}", bands.join(", "));
    info!(
        target: ANALYSIS,
        "  Topology Health: {}", report.coverage.assessment.classification.as_str()
    );
    info!(target: ANALYSIS, "  Signal Range: {}dB", report.signal_range);

    for (i, node) in report.nodes.iter().enumerate() {
        info!(
            target: ANALYSIS,
            "  Node {}: {}dBm, {} radios", i + 1, node.strongest_signal, node.radios.len()
        );
        for radio in &node.radios {
            info!(
                target: ANALYSIS,
                "    Radio {}: {}dBm ({})", radio.bssid, radio.signal, radio.band
            );
        }
    }

    match serde_json::to_string(report) {
        Ok(json) => debug!("Mesh topology data: {}", json),
        Err(e) => warn!("Could not serialize mesh data: {}", e),
    }
}

pub fn log_connection_event(event: &ConnectionEvent) {
    let mut line = format!(
        "EVENT: {} | BSSID: {} | Signal: {}dBm",
        event.kind.as_str().to_uppercase(),
        event.bssid,
        event.signal
    );
    if let Some(duration) = event.duration_secs {
        line.push_str(&format!(" | Duration: {:.1}s", duration));
    }
    if let Some(reason) = &event.reason {
        line.push_str(&format!(" | Reason: {}", reason));
    }
    info!(target: CONNECTIONS, "{}", line);
}

pub fn log_performance(current: &LinkInfo, alternatives: &[Alternative]) {
    info!(target: PERFORMANCE, "CURRENT CONNECTION:");
    info!(target: PERFORMANCE, "  BSSID: {}", current.bssid);
    info!(target: PERFORMANCE, "  Signal: {}dBm", current.signal);
    info!(target: PERFORMANCE, "  Frequency: {}MHz", current.freq);
    info!(target: PERFORMANCE, "  Band: {}", current.band());

    if !alternatives.is_empty() {
        info!(target: PERFORMANCE, "ALTERNATIVES FOUND: {}", alternatives.len());
        for (i, alt) in alternatives.iter().take(3).enumerate() {
            info!(
                target: PERFORMANCE,
                "  Option {}: {} | {}dBm ({}) | Score: {:.1} | Diff: {:+}dB",
                i + 1,
                alt.bssid,
                alt.signal,
                alt.band,
                alt.score,
                alt.signal_diff
            );
        }
    }
}

pub fn log_recommendation(recommendation: &Recommendation) {
    info!(target: ANALYSIS, "RECOMMENDATIONS:");
    match recommendation {
        Recommendation::Switch {
            target,
            signal_improvement,
            priority,
            ..
        } => {
            info!(target: ANALYSIS, "  Action: Switch to stronger radio/node");
            info!(target: ANALYSIS, "  Target: {}", target);
            info!(target: ANALYSIS, "  Expected Improvement: {}dB", signal_improvement);
            info!(target: ANALYSIS, "  Priority: {}", priority);
        }
        Recommendation::StayConnected { reason } => {
            info!(target: ANALYSIS, "  No action recommended - {}", reason);
        }
    }
}

pub fn log_problems(patterns: &ConnectionPatterns) {
    let total = patterns.issue_count()
        + patterns.time_based_issues.len()
        + patterns.bssid_problems.len();
    info!(target: ANALYSIS, "PROBLEM DETECTION: {} issues found", total);

    if !patterns.roaming_loops.is_empty() {
        info!(target: ANALYSIS, "  Roaming Loops: {}", patterns.roaming_loops.len());
    }
    if !patterns.auth_failure_clusters.is_empty() {
        info!(target: ANALYSIS, "  Auth Failures: {}", patterns.auth_failure_clusters.len());
    }
    if !patterns.rapid_reconnects.is_empty() {
        info!(target: ANALYSIS, "  Rapid Disconnects: {}", patterns.rapid_reconnects.len());
    }

    if total > 0 {
        match serde_json::to_string(patterns) {
            Ok(json) => warn!("Problems detected: {}", json),
            Err(e) => warn!("Could not serialize problem patterns: {}", e),
        }
    }
}
