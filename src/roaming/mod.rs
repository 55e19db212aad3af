//! Roaming and micro-dropout detection
//!
//! The link is sampled every 50-100 ms and transitions are turned into
//! [`RoamEvent`]s:
//!
//! - connected to disconnected is a `Disconnect`
//! - disconnected to connected is a `Reconnect`, with the downtime when the
//!   disconnect was seen
//! - a BSSID change while staying connected is a seamless `Roam`
//!
//! Sampling runs on the blocking pool since it reads procfs and spawns `iw`.

pub mod probe;

pub use probe::LinkProbe;

use crate::logs::CONNECTIONS;
use crate::wifi::Bssid;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::future::Future;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Events kept in memory per monitoring run
pub const MAX_EVENTS: usize = 1000;
/// A reconnect faster than this is a micro-dropout
pub const MICRO_DROPOUT_SECS: f64 = 1.0;

#[derive(Error, Debug)]
pub enum RoamingError {
    #[error("Failed to open roaming log {path}: {source}")]
    Log { path: PathBuf, source: io::Error },
    #[error("Link sampler task failed: {0}")]
    Sampler(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected { bssid: Option<Bssid>, signal: i32 },
    Disconnected,
    /// The probe itself failed
    Unknown,
}

/// Source of link samples; implemented by [`LinkProbe`]
pub trait LinkSampler: Send + Sync {
    fn sample(&self) -> LinkState;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoamEventKind {
    Disconnect {
        last_bssid: Option<Bssid>,
        last_signal: i32,
    },
    Reconnect {
        downtime_secs: Option<f64>,
        new_bssid: Option<Bssid>,
        new_signal: i32,
    },
    Roam {
        from: Bssid,
        to: Bssid,
        from_signal: i32,
        to_signal: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoamEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: RoamEventKind,
}

impl RoamEvent {
    pub fn is_micro_dropout(&self) -> bool {
        matches!(
            self.kind,
            RoamEventKind::Reconnect { downtime_secs: Some(d), .. } if d < MICRO_DROPOUT_SECS
        )
    }

    /// One-line description, as written to the roaming log
    pub fn describe(&self) -> String {
        let time = self.timestamp.with_timezone(&Local).format("%H:%M:%S");
        match &self.kind {
            RoamEventKind::Disconnect { last_bssid, .. } => {
                format!("{}: CONNECTION LOST from {}", time, or_unknown(last_bssid))
            }
            RoamEventKind::Reconnect {
                downtime_secs,
                new_bssid,
                ..
            } => match downtime_secs {
                Some(d) => format!(
                    "{}: RECONNECTED to {} (down {:.3}s)",
                    time,
                    or_unknown(new_bssid),
                    d
                ),
                None => format!("{}: RECONNECTED to {}", time, or_unknown(new_bssid)),
            },
            RoamEventKind::Roam {
                from,
                to,
                from_signal,
                to_signal,
            } => format!(
                "{}: ROAMED {} -> {} ({:+}dBm)",
                time,
                from,
                to,
                to_signal - from_signal
            ),
        }
    }
}

fn or_unknown(bssid: &Option<Bssid>) -> String {
    bssid.map_or_else(|| "unknown".to_string(), |b| b.to_string())
}

/// Turns a stream of link samples into roaming events
#[derive(Debug, Default)]
pub struct RoamingMonitor {
    last: Option<LinkState>,
    disconnect_start: Option<DateTime<Utc>>,
    events: VecDeque<RoamEvent>,
}

impl RoamingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> impl Iterator<Item = &RoamEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Feed one sample; returns the event it produced, if any
    pub fn observe(&mut self, state: LinkState, now: DateTime<Utc>) -> Option<RoamEvent> {
        let previous = self.last.replace(state);

        let kind = match (previous, state) {
            (
                Some(LinkState::Connected {
                    bssid: last_bssid,
                    signal: last_signal,
                }),
                LinkState::Disconnected,
            ) => {
                self.disconnect_start = Some(now);
                RoamEventKind::Disconnect {
                    last_bssid,
                    last_signal,
                }
            }
            (Some(LinkState::Disconnected), LinkState::Connected { bssid, signal }) => {
                let downtime_secs = self
                    .disconnect_start
                    .take()
                    .map(|start| (now - start).num_microseconds().unwrap_or(0) as f64 / 1e6);
                RoamEventKind::Reconnect {
                    downtime_secs,
                    new_bssid: bssid,
                    new_signal: signal,
                }
            }
            (
                Some(LinkState::Connected {
                    bssid: Some(from),
                    signal: from_signal,
                }),
                LinkState::Connected {
                    bssid: Some(to),
                    signal: to_signal,
                },
            ) if from != to => RoamEventKind::Roam {
                from,
                to,
                from_signal,
                to_signal,
            },
            _ => return None,
        };

        let event = RoamEvent {
            timestamp: now,
            kind,
        };
        if self.events.len() == MAX_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event.clone());
        Some(event)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoamingSummary {
    pub seamless_roams: usize,
    /// Disconnects seen, i.e. roams that were not seamless
    pub dropped_roams: usize,
    pub reconnects: usize,
    pub avg_downtime_secs: Option<f64>,
    pub longest_downtime_secs: Option<f64>,
    pub shortest_downtime_secs: Option<f64>,
    pub micro_dropouts: usize,
}

impl RoamingSummary {
    pub fn is_stable(&self) -> bool {
        self.seamless_roams == 0 && self.dropped_roams == 0
    }
}

pub fn summarize<'a>(events: impl IntoIterator<Item = &'a RoamEvent>) -> RoamingSummary {
    let mut summary = RoamingSummary::default();
    let mut downtimes = Vec::new();

    for event in events {
        match event.kind {
            RoamEventKind::Roam { .. } => summary.seamless_roams += 1,
            RoamEventKind::Disconnect { .. } => summary.dropped_roams += 1,
            RoamEventKind::Reconnect { downtime_secs, .. } => {
                summary.reconnects += 1;
                if let Some(d) = downtime_secs {
                    downtimes.push(d);
                    if d < MICRO_DROPOUT_SECS {
                        summary.micro_dropouts += 1;
                    }
                }
            }
        }
    }

    if !downtimes.is_empty() {
        summary.avg_downtime_secs = Some(downtimes.iter().sum::<f64>() / downtimes.len() as f64);
        summary.longest_downtime_secs = downtimes.iter().copied().reduce(f64::max);
        summary.shortest_downtime_secs = downtimes.iter().copied().reduce(f64::min);
    }
    summary
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionStats {
    pub from: Bssid,
    pub to: Bssid,
    pub count: usize,
    pub avg_signal_change: f64,
}

/// Roams grouped by (from, to) pair, in order of first occurrence
pub fn transition_stats<'a>(events: impl IntoIterator<Item = &'a RoamEvent>) -> Vec<TransitionStats> {
    let mut pairs: Vec<(Bssid, Bssid, Vec<i32>)> = Vec::new();

    for event in events {
        if let RoamEventKind::Roam {
            from,
            to,
            from_signal,
            to_signal,
        } = event.kind
        {
            let change = to_signal - from_signal;
            match pairs.iter_mut().find(|(f, t, _)| *f == from && *t == to) {
                Some((_, _, changes)) => changes.push(change),
                None => pairs.push((from, to, vec![change])),
            }
        }
    }

    pairs
        .into_iter()
        .map(|(from, to, changes)| TransitionStats {
            from,
            to,
            count: changes.len(),
            avg_signal_change: changes.iter().sum::<i32>() as f64 / changes.len() as f64,
        })
        .collect()
}

/// Poll `sampler` every `poll` until `stop` completes
///
/// `on_event` sees every event as it happens.
pub async fn run_monitor<S, F, E>(
    sampler: Arc<S>,
    poll: Duration,
    stop: F,
    mut on_event: E,
) -> Result<RoamingMonitor, RoamingError>
where
    S: LinkSampler + ?Sized + 'static,
    F: Future<Output = ()>,
    E: FnMut(&RoamEvent),
{
    let mut monitor = RoamingMonitor::new();
    let mut ticker = interval(poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(stop);

    debug!("Link polling every {:?}", poll);
    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = ticker.tick() => {
                let probe = Arc::clone(&sampler);
                let state = tokio::task::spawn_blocking(move || probe.sample()).await?;
                if let Some(event) = monitor.observe(state, Utc::now()) {
                    info!(target: CONNECTIONS, "{}", event.describe());
                    on_event(&event);
                }
            }
        }
    }

    Ok(monitor)
}

/// Completes after `limit` or on Ctrl+C, whichever is first
pub async fn timeout_or_interrupt(limit: Duration) {
    tokio::select! {
        _ = tokio::time::sleep(limit) => {}
        _ = interrupted() => {}
    }
}

/// Completes on Ctrl+C; never completes if the handler can't be installed
pub async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Completes when Enter is pressed or on Ctrl+C
async fn enter_or_interrupt() {
    let mut line = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = stdin.read_line(&mut line) => {
            if let Err(e) = result {
                debug!("stdin closed: {}", e);
            }
        }
        _ = interrupted() => {}
    }
}

pub struct DropoutReport {
    pub duration: Duration,
    pub dropouts: Vec<RoamEvent>,
    pub roams: Vec<RoamEvent>,
}

/// Poll fast for `duration` looking for sub-second drops
pub async fn detect_microdropouts<S>(
    sampler: Arc<S>,
    poll: Duration,
    duration: Duration,
) -> Result<DropoutReport, RoamingError>
where
    S: LinkSampler + ?Sized + 'static,
{
    println!("Monitoring for micro-dropouts for {} seconds...", duration.as_secs());
    println!("Keep using your WiFi normally - browse, stream, etc.");

    let monitor = run_monitor(sampler, poll, timeout_or_interrupt(duration), |_| {}).await?;

    Ok(DropoutReport {
        duration,
        dropouts: monitor.events().filter(|e| e.is_micro_dropout()).cloned().collect(),
        roams: monitor
            .events()
            .filter(|e| matches!(e.kind, RoamEventKind::Roam { .. }))
            .cloned()
            .collect(),
    })
}

pub enum RoamingTest {
    /// Walk around until Enter is pressed
    Walk,
    Timed(Duration),
}

#[derive(Debug, Clone, Serialize)]
pub struct RoamingMeasurement {
    pub summary: RoamingSummary,
    pub roams: Vec<RoamEvent>,
    pub transitions: Vec<TransitionStats>,
}

pub async fn measure_roaming<S>(
    sampler: Arc<S>,
    poll: Duration,
    test: RoamingTest,
) -> Result<RoamingMeasurement, RoamingError>
where
    S: LinkSampler + ?Sized + 'static,
{
    let monitor = match test {
        RoamingTest::Walk => {
            println!("Walk around your space now, moving between rooms.");
            println!("Press Enter when you're done walking around...");
            run_monitor(sampler, poll, enter_or_interrupt(), |_| {}).await?
        }
        RoamingTest::Timed(limit) => {
            println!("Monitoring roaming events for {} seconds...", limit.as_secs());
            run_monitor(sampler, poll, timeout_or_interrupt(limit), |_| {}).await?
        }
    };

    Ok(RoamingMeasurement {
        summary: summarize(monitor.events()),
        roams: monitor
            .events()
            .filter(|e| matches!(e.kind, RoamEventKind::Roam { .. }))
            .cloned()
            .collect(),
        transitions: transition_stats(monitor.events()),
    })
}

fn open_log(path: &Path) -> Result<File, RoamingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| RoamingError::Log {
            path: path.to_path_buf(),
            source,
        })
}

/// Log every event to `log_path` and the console until Ctrl+C
pub async fn continuous_monitor<S>(
    sampler: Arc<S>,
    poll: Duration,
    log_path: &Path,
) -> Result<(RoamingSummary, usize), RoamingError>
where
    S: LinkSampler + ?Sized + 'static,
{
    let mut log = open_log(log_path)?;
    if let Err(e) = writeln!(log, "\n--- Roaming Monitor Session Started {} ---", Local::now()) {
        warn!("Failed to write {}: {}", log_path.display(), e);
    }

    println!("Logging to: {}", log_path.display());
    println!("Monitor running, use your WiFi normally. Ctrl+C to stop.");

    let monitor = run_monitor(sampler, poll, interrupted(), |event| {
        let line = event.describe();
        println!("{}", line);
        if let Err(e) = writeln!(log, "{}", line).and_then(|_| log.flush()) {
            warn!("Failed to write {}: {}", log_path.display(), e);
        }
    })
    .await?;

    Ok((summarize(monitor.events()), monitor.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    const A: &str = "A0:21:B7:00:00:01";
    const B: &str = "A0:21:B7:00:00:02";

    fn connected(bssid: &str, signal: i32) -> LinkState {
        LinkState::Connected {
            bssid: Some(bssid.parse().unwrap()),
            signal,
        }
    }

    fn at(start: DateTime<Utc>, millis: i64) -> DateTime<Utc> {
        start + ChronoDuration::milliseconds(millis)
    }

    #[test]
    fn test_roam_disconnect_reconnect() {
        let start = Utc::now();
        let mut monitor = RoamingMonitor::new();

        assert!(monitor.observe(connected(A, -60), start).is_none());

        let roam = monitor.observe(connected(B, -50), at(start, 100)).unwrap();
        assert!(matches!(roam.kind, RoamEventKind::Roam { to_signal: -50, .. }));

        let drop = monitor.observe(LinkState::Disconnected, at(start, 200)).unwrap();
        assert!(matches!(drop.kind, RoamEventKind::Disconnect { last_signal: -50, .. }));

        let back = monitor.observe(connected(A, -58), at(start, 450)).unwrap();
        match back.kind {
            RoamEventKind::Reconnect { downtime_secs, .. } => {
                assert!((downtime_secs.unwrap() - 0.25).abs() < 1e-9)
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(back.is_micro_dropout());
        assert_eq!(monitor.len(), 3);
    }

    #[test]
    fn test_unknown_breaks_transitions() {
        let start = Utc::now();
        let mut monitor = RoamingMonitor::new();
        monitor.observe(connected(A, -60), start);
        assert!(monitor.observe(LinkState::Unknown, at(start, 100)).is_none());
        assert!(monitor.observe(connected(B, -60), at(start, 200)).is_none());
        assert!(monitor.is_empty());
    }

    #[test]
    fn test_reconnect_without_observed_disconnect() {
        let start = Utc::now();
        let mut monitor = RoamingMonitor::new();
        monitor.observe(LinkState::Disconnected, start);
        let event = monitor.observe(connected(A, -60), at(start, 100)).unwrap();
        assert!(matches!(
            event.kind,
            RoamEventKind::Reconnect { downtime_secs: None, .. }
        ));
        assert!(!event.is_micro_dropout());
    }

    #[test]
    fn test_event_buffer_is_bounded() {
        let start = Utc::now();
        let mut monitor = RoamingMonitor::new();
        for i in 0..(MAX_EVENTS as i64 + 10) {
            let bssid = if i % 2 == 0 { A } else { B };
            monitor.observe(connected(bssid, -60), at(start, i * 100));
        }
        assert_eq!(monitor.len(), MAX_EVENTS);
    }

    #[test]
    fn test_summarize() {
        let start = Utc::now();
        let mut monitor = RoamingMonitor::new();
        let states = [
            connected(A, -60),
            connected(B, -55),
            LinkState::Disconnected,
            connected(B, -55),
            LinkState::Disconnected,
            LinkState::Disconnected,
            connected(A, -62),
        ];
        let mut t = 0;
        for state in states {
            monitor.observe(state, at(start, t));
            t += 500;
        }

        let summary = summarize(monitor.events());
        assert_eq!(summary.seamless_roams, 1);
        assert_eq!(summary.dropped_roams, 2);
        assert_eq!(summary.reconnects, 2);
        assert_eq!(summary.micro_dropouts, 1);
        assert_eq!(summary.shortest_downtime_secs, Some(0.5));
        assert_eq!(summary.longest_downtime_secs, Some(1.0));
        assert_eq!(summary.avg_downtime_secs, Some(0.75));
    }

    #[test]
    fn test_transition_stats() {
        let start = Utc::now();
        let mut monitor = RoamingMonitor::new();
        let states = [
            connected(A, -70),
            connected(B, -50),
            connected(A, -60),
            connected(B, -56),
        ];
        for (i, state) in states.into_iter().enumerate() {
            monitor.observe(state, at(start, i as i64 * 100));
        }

        let stats = transition_stats(monitor.events());
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].from.to_string(), A);
        assert_eq!(stats[0].count, 2);
        assert!((stats[0].avg_signal_change - 12.0).abs() < 1e-9);
        assert_eq!(stats[1].count, 1);
    }

    #[test]
    fn test_describe() {
        let event = RoamEvent {
            timestamp: Utc::now(),
            kind: RoamEventKind::Roam {
                from: A.parse().unwrap(),
                to: B.parse().unwrap(),
                from_signal: -70,
                to_signal: -52,
            },
        };
        assert!(event.describe().ends_with("ROAMED A0:21:B7:00:00:01 -> A0:21:B7:00:00:02 (+18dBm)"));
    }

    /// Plays back fixed states, then signals `done`
    struct Scripted {
        states: Mutex<VecDeque<LinkState>>,
        done: Arc<Notify>,
    }

    impl LinkSampler for Scripted {
        fn sample(&self) -> LinkState {
            let mut states = self.states.lock().unwrap();
            let state = states.pop_front();
            if states.is_empty() {
                self.done.notify_one();
            }
            state.unwrap_or(LinkState::Unknown)
        }
    }

    #[tokio::test]
    async fn test_run_monitor_with_scripted_sampler() {
        let done = Arc::new(Notify::new());
        let sampler = Arc::new(Scripted {
            states: Mutex::new(VecDeque::from(vec![
                connected(A, -60),
                LinkState::Disconnected,
                connected(B, -50),
                connected(A, -65),
            ])),
            done: Arc::clone(&done),
        });

        let mut seen = Vec::new();
        let stop = {
            let done = Arc::clone(&done);
            async move { done.notified().await }
        };
        let monitor = run_monitor(sampler, Duration::from_millis(1), stop, |event| {
            seen.push(event.clone())
        })
        .await
        .unwrap();

        assert_eq!(seen.len(), 3);
        assert_eq!(monitor.len(), 3);
        let summary = summarize(monitor.events());
        assert_eq!(summary.seamless_roams, 1);
        assert_eq!(summary.dropped_roams, 1);
        assert_eq!(summary.reconnects, 1);
    }
}
