//! Per-BSSID connection history
//!
//! Every connect, disconnect and authentication timeout is recorded as a
//! [`ConnectionEvent`] and folded into a [`BssidHistory`] carrying a
//! 0-100 stability score. Both are persisted as JSON in the data
//! directory so scores accumulate across runs.

pub mod problems;
pub mod tracker;

use crate::paths::DataDir;
use crate::wifi::{Bssid, NO_SIGNAL};
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use problems::{analyze_patterns, ConnectionPatterns};
pub use tracker::ConnectionTracker;

pub const HISTORY_FILE: &str = "bssid_history.json";
pub const EVENTS_FILE: &str = "connection_events.json";

const MAX_SIGNAL_SAMPLES: usize = 100;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Failed to access history file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Connect,
    Disconnect,
    AuthTimeout,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Connect => "connect",
            EventKind::Disconnect => "disconnect",
            EventKind::AuthTimeout => "auth_timeout",
        }
    }

    pub fn is_problem(&self) -> bool {
        matches!(self, EventKind::Disconnect | EventKind::AuthTimeout)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionEvent {
    pub timestamp: DateTime<Utc>,
    pub bssid: Bssid,
    pub kind: EventKind,
    pub signal: i32,
    /// Seconds spent connected, set on disconnect events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ConnectionEvent {
    pub fn new(timestamp: DateTime<Utc>, bssid: Bssid, kind: EventKind, signal: i32) -> Self {
        Self {
            timestamp,
            bssid,
            kind,
            signal,
            duration_secs: None,
            reason: None,
        }
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSample {
    pub timestamp: DateTime<Utc>,
    pub signal: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BssidHistory {
    pub bssid: Bssid,
    pub total_connections: u32,
    pub successful_connections: u32,
    pub total_duration_secs: f64,
    pub avg_signal: f64,
    pub signal_samples: Vec<SignalSample>,
    pub auth_failures: u32,
    pub disconnects: u32,
    pub last_seen: DateTime<Utc>,
    pub stability_score: f64,
}

impl BssidHistory {
    pub fn new(bssid: Bssid, now: DateTime<Utc>) -> Self {
        Self {
            bssid,
            total_connections: 0,
            successful_connections: 0,
            total_duration_secs: 0.0,
            avg_signal: 0.0,
            signal_samples: Vec::new(),
            auth_failures: 0,
            disconnects: 0,
            last_seen: now,
            stability_score: 100.0,
        }
    }

    /// Fold one event into the counters and rescore
    pub fn apply(&mut self, event: &ConnectionEvent) {
        self.last_seen = event.timestamp;

        match event.kind {
            EventKind::Connect => {
                self.total_connections += 1;
                self.successful_connections += 1;
            }
            EventKind::AuthTimeout => self.auth_failures += 1,
            EventKind::Disconnect => {
                self.disconnects += 1;
                if let Some(duration) = event.duration_secs {
                    self.total_duration_secs += duration;
                }
            }
        }

        if event.signal != NO_SIGNAL {
            self.signal_samples.push(SignalSample {
                timestamp: event.timestamp,
                signal: event.signal,
            });
            if self.signal_samples.len() > MAX_SIGNAL_SAMPLES {
                let excess = self.signal_samples.len() - MAX_SIGNAL_SAMPLES;
                self.signal_samples.drain(..excess);
            }
            let sum: i64 = self.signal_samples.iter().map(|s| i64::from(s.signal)).sum();
            self.avg_signal = sum as f64 / self.signal_samples.len() as f64;
        }

        self.stability_score = self.compute_stability();
    }

    /// Stability from failure rate, disconnect rate, signal variance and
    /// typical session length, clamped to 0-100
    pub fn compute_stability(&self) -> f64 {
        let mut score = 100.0;

        if self.total_connections > 0 {
            let attempts = f64::from(self.total_connections + self.auth_failures);
            score -= f64::from(self.auth_failures) / attempts * 50.0;
        }

        if self.successful_connections > 0 {
            let rate = f64::from(self.disconnects) / f64::from(self.successful_connections);
            score -= (rate * 30.0).min(30.0);
        }

        if self.signal_samples.len() > 5 {
            let recent = &self.signal_samples[self.signal_samples.len().saturating_sub(10)..];
            let max = recent.iter().map(|s| s.signal).max().unwrap_or(0);
            let min = recent.iter().map(|s| s.signal).min().unwrap_or(0);
            let variance = max - min;
            if variance < 10 {
                score += 10.0;
            } else if variance > 30 {
                score -= 20.0;
            }
        }

        // Sessions that never ended carry no duration information
        if self.successful_connections > 0 && self.total_duration_secs > 0.0 {
            let avg_duration = self.total_duration_secs / f64::from(self.successful_connections);
            if avg_duration > 3600.0 {
                score += 15.0;
            } else if avg_duration < 300.0 {
                score -= 15.0;
            }
        }

        score.clamp(0.0, 100.0)
    }

    pub fn success_rate(&self) -> f64 {
        let attempts = self.total_connections + self.auth_failures;
        if attempts == 0 {
            return 0.0;
        }
        f64::from(self.successful_connections) / f64::from(attempts) * 100.0
    }
}

/// Sizes and counts for `storage-info`
#[derive(Debug, Clone, Serialize)]
pub struct StorageInfo {
    pub data_dir: PathBuf,
    pub history_bytes: u64,
    pub events_bytes: u64,
    pub log_files: usize,
    pub log_bytes: u64,
    pub report_files: usize,
    pub report_bytes: u64,
    pub bssids: usize,
    pub events: usize,
    pub oldest_event: Option<DateTime<Utc>>,
}

impl StorageInfo {
    pub fn total_bytes(&self) -> u64 {
        self.history_bytes + self.events_bytes + self.log_bytes + self.report_bytes
    }
}

pub struct HistoryStore {
    dir: DataDir,
    retention: Duration,
    bssids: BTreeMap<Bssid, BssidHistory>,
    events: Vec<ConnectionEvent>,
}

impl HistoryStore {
    /// Load history from `dir`, dropping events older than the retention
    /// window. Unreadable files are moved aside and the store starts empty.
    pub fn open(dir: DataDir, retention_days: u32, now: DateTime<Utc>) -> Self {
        let retention = Duration::days(i64::from(retention_days));
        let history: Vec<BssidHistory> = load_or_quarantine(&dir.root().join(HISTORY_FILE), now);
        let mut events: Vec<ConnectionEvent> =
            load_or_quarantine(&dir.root().join(EVENTS_FILE), now);

        let before = events.len();
        let cutoff = now - retention;
        events.retain(|e| e.timestamp > cutoff);
        if events.len() < before {
            info!(
                "Cleaned {} old events (keeping last {} days)",
                before - events.len(),
                retention_days
            );
        }

        debug!(
            "Loaded history for {} BSSIDs and {} events",
            history.len(),
            events.len()
        );

        Self {
            dir,
            retention,
            bssids: history.into_iter().map(|h| (h.bssid, h)).collect(),
            events,
        }
    }

    pub fn record(&mut self, event: ConnectionEvent) {
        self.bssids
            .entry(event.bssid)
            .or_insert_with(|| BssidHistory::new(event.bssid, event.timestamp))
            .apply(&event);
        self.events.push(event);
    }

    pub fn save(&self) -> Result<(), HistoryError> {
        let history: Vec<&BssidHistory> = self.bssids.values().collect();
        self.write_json(HISTORY_FILE, &history)?;
        self.write_json(EVENTS_FILE, &self.events)?;
        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), HistoryError> {
        fs::create_dir_all(self.dir.root())?;
        let path = self.dir.root().join(name);
        let tmp = self.dir.root().join(format!("{}.tmp", name));
        fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
        fs::rename(&tmp, &path)?;
        self.dir.hand_over(&path);
        Ok(())
    }

    pub fn get(&self, bssid: &Bssid) -> Option<&BssidHistory> {
        self.bssids.get(bssid)
    }

    pub fn stability(&self, bssid: &Bssid) -> Option<f64> {
        self.get(bssid).map(|h| h.stability_score)
    }

    pub fn histories(&self) -> impl Iterator<Item = &BssidHistory> {
        self.bssids.values()
    }

    pub fn events(&self) -> &[ConnectionEvent] {
        &self.events
    }

    pub fn retention_days(&self) -> i64 {
        self.retention.num_days()
    }

    /// Events from the last `hours` hours, oldest first
    pub fn recent_events(&self, hours: u32, now: DateTime<Utc>) -> Vec<ConnectionEvent> {
        let cutoff = now - Duration::hours(i64::from(hours));
        self.events
            .iter()
            .filter(|e| e.timestamp > cutoff)
            .cloned()
            .collect()
    }

    /// Move the current files aside and start over
    pub fn reset(&mut self, now: DateTime<Utc>) -> Result<Vec<PathBuf>, HistoryError> {
        let stamp = now.format("%Y%m%d_%H%M%S");
        let mut backups = Vec::new();
        for name in [HISTORY_FILE, EVENTS_FILE] {
            let path = self.dir.root().join(name);
            if path.exists() {
                let backup = self.dir.root().join(backup_name(name, "backup", &stamp));
                fs::rename(&path, &backup)?;
                backups.push(backup);
            }
        }
        self.bssids.clear();
        self.events.clear();
        Ok(backups)
    }

    pub fn storage_info(&self) -> StorageInfo {
        let root = self.dir.root();
        let (log_files, log_bytes) = dir_usage(&self.dir.logs_dir());
        let (report_files, report_bytes) = dir_usage(&self.dir.reports_dir());
        StorageInfo {
            data_dir: root.to_path_buf(),
            history_bytes: file_size(&root.join(HISTORY_FILE)),
            events_bytes: file_size(&root.join(EVENTS_FILE)),
            log_files,
            log_bytes,
            report_files,
            report_bytes,
            bssids: self.bssids.len(),
            events: self.events.len(),
            oldest_event: self.events.iter().map(|e| e.timestamp).min(),
        }
    }
}

fn backup_name(file: &str, label: &str, stamp: &impl fmt::Display) -> String {
    let (stem, ext) = file.rsplit_once('.').unwrap_or((file, "json"));
    format!("{}_{}_{}.{}", stem, label, stamp, ext)
}

fn load_or_quarantine<T: DeserializeOwned + Default>(path: &Path, now: DateTime<Utc>) -> T {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            return T::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            warn!("Could not load {} (corrupted): {}", path.display(), e);
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let backup = path.with_file_name(backup_name(
                &name,
                "corrupted",
                &now.format("%Y%m%d_%H%M%S"),
            ));
            match fs::rename(path, &backup) {
                Ok(()) => info!("Backed up corrupted file to {}", backup.display()),
                Err(e) => warn!("Could not back up corrupted file: {}", e),
            }
            T::default()
        }
    }
}

fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

fn dir_usage(dir: &Path) -> (usize, u64) {
    let Ok(entries) = fs::read_dir(dir) else {
        return (0, 0);
    };
    entries
        .filter_map(Result::ok)
        .filter_map(|e| e.metadata().ok())
        .filter(|m| m.is_file())
        .fold((0, 0), |(count, bytes), m| (count + 1, bytes + m.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bssid(s: &str) -> Bssid {
        s.parse().unwrap()
    }

    fn event(secs: i64, kind: EventKind, signal: i32) -> ConnectionEvent {
        let ts = DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap();
        ConnectionEvent::new(ts, bssid("A0:21:B7:00:00:01"), kind, signal)
    }

    #[test]
    fn test_connect_updates_counts_and_signal() {
        let mut history = BssidHistory::new(bssid("A0:21:B7:00:00:01"), Utc::now());
        history.apply(&event(0, EventKind::Connect, -50));
        history.apply(&event(10, EventKind::Connect, -60));

        assert_eq!(history.total_connections, 2);
        assert_eq!(history.successful_connections, 2);
        assert_eq!(history.signal_samples.len(), 2);
        assert!((history.avg_signal - -55.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_signal_not_sampled() {
        let mut history = BssidHistory::new(bssid("A0:21:B7:00:00:01"), Utc::now());
        history.apply(&event(0, EventKind::AuthTimeout, NO_SIGNAL));
        assert_eq!(history.auth_failures, 1);
        assert!(history.signal_samples.is_empty());
    }

    #[test]
    fn test_signal_samples_capped() {
        let mut history = BssidHistory::new(bssid("A0:21:B7:00:00:01"), Utc::now());
        for i in 0..150 {
            history.apply(&event(i, EventKind::Connect, -50 - (i as i32 % 5)));
        }
        assert_eq!(history.signal_samples.len(), MAX_SIGNAL_SAMPLES);
        assert_eq!(
            history.signal_samples[0].timestamp,
            DateTime::from_timestamp(1_700_000_050, 0).unwrap()
        );
    }

    #[test]
    fn test_stability_penalizes_failures_and_short_sessions() {
        let mut history = BssidHistory::new(bssid("A0:21:B7:00:00:01"), Utc::now());
        history.total_connections = 2;
        history.successful_connections = 2;
        history.auth_failures = 2;
        history.disconnects = 2;
        history.total_duration_secs = 120.0;

        // 100 - 25 (failures) - 30 (disconnects) - 15 (short sessions)
        assert!((history.compute_stability() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_stability_rewards_long_steady_sessions() {
        let mut history = BssidHistory::new(bssid("A0:21:B7:00:00:01"), Utc::now());
        history.apply(&event(0, EventKind::Connect, -50));
        for i in 1..=6 {
            history.apply(&event(i, EventKind::Connect, -52));
        }
        history.apply(&event(100, EventKind::Disconnect, -51).with_duration(7.0 * 7200.0));

        // 100 - 30*(1/7) + 10 (steady) + 15 (long sessions), clamped
        assert!((history.stability_score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_open_sessions_keep_full_stability() {
        let mut history = BssidHistory::new(bssid("A0:21:B7:00:00:01"), Utc::now());
        history.apply(&event(0, EventKind::Connect, -50));
        history.apply(&event(60, EventKind::Connect, -50));

        assert_eq!(history.total_duration_secs, 0.0);
        assert!((history.compute_stability() - 100.0).abs() < 1e-9);
        assert!((history.stability_score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_stability_clamped_at_zero() {
        let mut history = BssidHistory::new(bssid("A0:21:B7:00:00:01"), Utc::now());
        history.total_connections = 1;
        history.successful_connections = 1;
        history.auth_failures = 99;
        history.disconnects = 10;
        history.signal_samples = (0..10)
            .map(|i| SignalSample {
                timestamp: Utc::now(),
                signal: if i % 2 == 0 { -40 } else { -90 },
            })
            .collect();
        assert_eq!(history.compute_stability(), 0.0);
    }

    #[test]
    fn test_store_roundtrip_and_retention() {
        let tmp = TempDir::new().unwrap();
        let now = Utc::now();
        let dir = DataDir::at(tmp.path());

        let mut store = HistoryStore::open(dir.clone(), 30, now);
        let b = bssid("A0:21:B7:00:00:01");
        store.record(ConnectionEvent::new(now - Duration::days(40), b, EventKind::Connect, -50));
        store.record(ConnectionEvent::new(now - Duration::hours(1), b, EventKind::Connect, -55));
        store.save().unwrap();

        let reopened = HistoryStore::open(dir, 30, now);
        assert_eq!(reopened.events().len(), 1);
        assert_eq!(reopened.get(&b).unwrap().total_connections, 2);
        assert_eq!(reopened.recent_events(24, now).len(), 1);
    }

    #[test]
    fn test_corrupted_files_are_quarantined() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(HISTORY_FILE), "{not json").unwrap();

        let store = HistoryStore::open(DataDir::at(tmp.path()), 30, Utc::now());
        assert_eq!(store.histories().count(), 0);
        assert!(!tmp.path().join(HISTORY_FILE).exists());

        let quarantined = fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(Result::ok)
            .any(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with("bssid_history_corrupted_")
            });
        assert!(quarantined);
    }

    #[test]
    fn test_reset_backs_up_files() {
        let tmp = TempDir::new().unwrap();
        let now = Utc::now();
        let mut store = HistoryStore::open(DataDir::at(tmp.path()), 30, now);
        store.record(event(0, EventKind::Connect, -50));
        store.save().unwrap();

        let backups = store.reset(now).unwrap();
        assert_eq!(backups.len(), 2);
        assert!(backups.iter().all(|p| p.exists()));
        assert_eq!(store.events().len(), 0);
        assert!(!tmp.path().join(EVENTS_FILE).exists());
    }

    #[test]
    fn test_storage_info() {
        let tmp = TempDir::new().unwrap();
        let dir = DataDir::at(tmp.path());
        dir.ensure().unwrap();
        fs::write(dir.logs_dir().join("debug_2024-01-01.log"), "hello").unwrap();

        let mut store = HistoryStore::open(dir, 30, Utc::now());
        store.record(event(0, EventKind::Connect, -50));
        store.save().unwrap();

        let info = store.storage_info();
        assert_eq!(info.log_files, 1);
        assert_eq!(info.log_bytes, 5);
        assert_eq!(info.bssids, 1);
        assert!(info.history_bytes > 0);
        assert!(info.total_bytes() >= info.history_bytes + 5);
    }
}
