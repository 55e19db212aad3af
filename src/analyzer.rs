//! One-shot analysis and the continuous monitor
//!
//! [`analyze`] is the pure core: given the current link, a scan and the
//! stored history it produces an [`AnalysisSnapshot`]. [`Analyzer`] feeds it
//! from the live wireless tools and keeps the history store up to date.

use crate::advisor::{evaluate_alternatives, recommend, Alternative, Recommendation};
use crate::history::{
    analyze_patterns, BssidHistory, ConnectionEvent, ConnectionPatterns, ConnectionTracker,
    HistoryError, HistoryStore,
};
use crate::logs;
use crate::mesh::{analyze_topology, Topology};
use crate::platform::{detect_interface, PlatformError, WirelessTools};
use crate::power::PowerReport;
use crate::roaming::RoamingMeasurement;
use crate::wifi::{parse_link, parse_scan, AccessPoint, LinkInfo};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("Failed to save history: {0}")]
    History(#[from] HistoryError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Everything one analysis pass found
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSnapshot {
    pub timestamp: DateTime<Local>,
    pub interface: String,
    pub link: Option<LinkInfo>,
    /// Access points seen in the scan, all SSIDs
    pub scanned: usize,
    pub topology: Topology,
    pub alternatives: Vec<Alternative>,
    /// Only set when connected to a network with more than one AP
    pub recommendation: Option<Recommendation>,
    pub history: Option<BssidHistory>,
    pub patterns: ConnectionPatterns,
    pub roaming: Option<RoamingMeasurement>,
    pub power: Option<PowerReport>,
}

/// Build a snapshot from already collected data
pub fn analyze(
    interface: &str,
    link: Option<LinkInfo>,
    aps: &[AccessPoint],
    history: &HistoryStore,
    recent_events: &[ConnectionEvent],
    timestamp: DateTime<Local>,
) -> AnalysisSnapshot {
    let patterns = analyze_patterns(recent_events);

    let (topology, alternatives, recommendation, bssid_history) = match &link {
        Some(current) => {
            let same_ssid: Vec<AccessPoint> = aps
                .iter()
                .filter(|ap| ap.ssid == current.ssid)
                .cloned()
                .collect();
            let alternatives = evaluate_alternatives(current, &same_ssid, |b| history.stability(b));
            let recommendation = (same_ssid.len() > 1).then(|| recommend(current, &alternatives));
            (
                analyze_topology(&same_ssid),
                alternatives,
                recommendation,
                history.get(&current.bssid).cloned(),
            )
        }
        None => (Topology::Empty, Vec::new(), None, None),
    };

    AnalysisSnapshot {
        timestamp,
        interface: interface.to_string(),
        link,
        scanned: aps.len(),
        topology,
        alternatives,
        recommendation,
        history: bssid_history,
        patterns,
        roaming: None,
        power: None,
    }
}

/// Current association, `None` when disconnected or `iw` fails
pub fn read_link(tools: &dyn WirelessTools, interface: &str) -> Option<LinkInfo> {
    match tools.link(interface) {
        Ok(output) => parse_link(&output),
        Err(e) => {
            warn!("Could not read link state: {}", e);
            None
        }
    }
}

/// Scan results, empty when the scan fails
pub fn scan(tools: &dyn WirelessTools, interface: &str) -> Vec<AccessPoint> {
    let started = Instant::now();
    let aps = match tools.scan(interface) {
        Ok(output) => parse_scan(&output, Utc::now()),
        Err(e) => {
            warn!("Scan failed: {}", e);
            Vec::new()
        }
    };
    logs::log_network_scan(aps.len(), started.elapsed().as_secs_f64());
    aps
}

fn log_snapshot(snapshot: &AnalysisSnapshot) {
    if let Topology::Mesh(report) = &snapshot.topology {
        logs::log_mesh_analysis(report);
    }
    logs::log_problems(&snapshot.patterns);
    if let Some(link) = &snapshot.link {
        logs::log_performance(link, &snapshot.alternatives);
    }
    if let Some(recommendation) = &snapshot.recommendation {
        logs::log_recommendation(recommendation);
    }
}

pub struct Analyzer {
    tools: Arc<dyn WirelessTools>,
    interface: String,
    history: HistoryStore,
    window_hours: u32,
}

impl Analyzer {
    pub fn new(
        tools: Arc<dyn WirelessTools>,
        interface: impl Into<String>,
        history: HistoryStore,
        window_hours: u32,
    ) -> Self {
        Self {
            tools,
            interface: interface.into(),
            history,
            window_hours,
        }
    }

    /// Use `configured` if set, otherwise detect the wireless interface
    pub fn resolve_interface(
        tools: &dyn WirelessTools,
        configured: Option<&str>,
    ) -> Result<String, AnalyzerError> {
        match configured {
            Some(interface) => Ok(interface.to_string()),
            None => Ok(detect_interface(tools, Path::new("/sys/class/net"))?),
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn tools(&self) -> Arc<dyn WirelessTools> {
        Arc::clone(&self.tools)
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }

    /// Read the link, scan and analyze
    pub fn snapshot(&self) -> AnalysisSnapshot {
        let link = read_link(self.tools.as_ref(), &self.interface);
        let aps = scan(self.tools.as_ref(), &self.interface);
        self.analyze(link, &aps)
    }

    /// Analyze already collected data against this analyzer's history
    pub fn analyze(&self, link: Option<LinkInfo>, aps: &[AccessPoint]) -> AnalysisSnapshot {
        let recent = self.history.recent_events(self.window_hours, Utc::now());
        let snapshot = analyze(&self.interface, link, aps, &self.history, &recent, Local::now());
        log_snapshot(&snapshot);
        snapshot
    }

    /// Record whatever changed since the last poll; returns the event count
    pub fn record_link(
        &mut self,
        tracker: &mut ConnectionTracker,
        link: Option<&LinkInfo>,
        now: DateTime<Utc>,
    ) -> Result<usize, HistoryError> {
        let events = tracker.observe(link, now);
        let count = events.len();
        for event in events {
            logs::log_connection_event(&event);
            self.history.record(event);
        }
        if count > 0 {
            self.history.save()?;
        }
        Ok(count)
    }

    /// Track the link every `link_poll` and analyze every `scan_interval`
    /// until `stop` completes. Returns the number of events recorded.
    pub async fn monitor<F, R>(
        &mut self,
        link_poll: Duration,
        scan_interval: Duration,
        stop: F,
        mut on_snapshot: R,
    ) -> Result<usize, AnalyzerError>
    where
        F: Future<Output = ()>,
        R: FnMut(&AnalysisSnapshot),
    {
        let mut tracker = ConnectionTracker::new();
        let mut link_ticker = interval(link_poll);
        link_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut scan_ticker = interval(scan_interval);
        scan_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(stop);

        info!(
            "Monitoring {} (link every {:?}, scan every {:?})",
            self.interface, link_poll, scan_interval
        );

        let mut recorded = 0;
        loop {
            tokio::select! {
                _ = &mut stop => break,
                _ = link_ticker.tick() => {
                    let tools = self.tools();
                    let interface = self.interface.clone();
                    let link = tokio::task::spawn_blocking(move || {
                        read_link(tools.as_ref(), &interface)
                    })
                    .await?;
                    recorded += self.record_link(&mut tracker, link.as_ref(), Utc::now())?;
                }
                _ = scan_ticker.tick() => {
                    let tools = self.tools();
                    let interface = self.interface.clone();
                    let (link, aps) = tokio::task::spawn_blocking(move || {
                        let link = read_link(tools.as_ref(), &interface);
                        (link, scan(tools.as_ref(), &interface))
                    })
                    .await?;
                    let snapshot = self.analyze(link, &aps);
                    debug!("Monitor snapshot with {} access points", snapshot.scanned);
                    on_snapshot(&snapshot);
                }
            }
        }

        info!("Monitor stopped after recording {} events", recorded);
        Ok(recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::EventKind;
    use crate::paths::DataDir;
    use crate::platform::testing::FakeTools;
    use crate::report::fixtures::ap;
    use tempfile::TempDir;

    const LINK: &str = "Connected to a0:21:b7:11:22:30 (on wlp2s0)
\tSSID: HomeMesh
\tfreq: 2437
\tsignal: -72 dBm
";

    const SCAN: &str = "BSS a0:21:b7:11:22:30(on wlp2s0) -- associated
\tfreq: 2437
\tsignal: -72.00 dBm
\tSSID: HomeMesh
BSS a0:21:b7:11:22:31(on wlp2s0)
\tfreq: 5180
\tsignal: -45.00 dBm
\tSSID: HomeMesh
BSS 10:20:30:40:50:60(on wlp2s0)
\tfreq: 2412
\tsignal: -80.00 dBm
\tSSID: Neighbor
";

    fn link() -> LinkInfo {
        parse_link(LINK).unwrap()
    }

    fn store(tmp: &TempDir) -> HistoryStore {
        HistoryStore::open(DataDir::at(tmp.path()), 30, Utc::now())
    }

    #[test]
    fn test_analyze_filters_to_current_ssid() {
        let tmp = TempDir::new().unwrap();
        let history = store(&tmp);
        let aps = vec![
            ap("A0:21:B7:11:22:30", 2437, -72),
            ap("A0:21:B7:11:22:31", 5180, -45),
            AccessPoint {
                ssid: "Neighbor".to_string(),
                ..ap("10:20:30:40:50:60", 2412, -40)
            },
        ];

        let snapshot = analyze("wlp2s0", Some(link()), &aps, &history, &[], Local::now());

        assert_eq!(snapshot.scanned, 3);
        assert!(matches!(snapshot.topology, Topology::Mesh(_)));
        assert_eq!(snapshot.alternatives.len(), 1);
        assert_eq!(snapshot.alternatives[0].bssid, aps[1].bssid);
        assert!(snapshot.recommendation.as_ref().is_some_and(|r| r.is_switch()));
        assert!(snapshot.history.is_none());
    }

    #[test]
    fn test_analyze_disconnected() {
        let tmp = TempDir::new().unwrap();
        let history = store(&tmp);
        let aps = vec![ap("A0:21:B7:11:22:31", 5180, -45)];

        let snapshot = analyze("wlp2s0", None, &aps, &history, &[], Local::now());

        assert!(matches!(snapshot.topology, Topology::Empty));
        assert!(snapshot.alternatives.is_empty());
        assert!(snapshot.recommendation.is_none());
    }

    #[test]
    fn test_single_ap_has_no_recommendation() {
        let tmp = TempDir::new().unwrap();
        let history = store(&tmp);
        let aps = vec![ap("A0:21:B7:11:22:30", 2437, -72)];

        let snapshot = analyze("wlp2s0", Some(link()), &aps, &history, &[], Local::now());

        assert!(matches!(snapshot.topology, Topology::SingleAp { .. }));
        assert!(snapshot.recommendation.is_none());
    }

    #[test]
    fn test_snapshot_from_tools() {
        let tmp = TempDir::new().unwrap();
        let tools = FakeTools {
            link: Some(LINK.to_string()),
            scan: Some(SCAN.to_string()),
            ..FakeTools::default()
        };
        let analyzer = Analyzer::new(Arc::new(tools), "wlp2s0", store(&tmp), 24);

        let snapshot = analyzer.snapshot();
        assert_eq!(snapshot.link, Some(link()));
        assert_eq!(snapshot.scanned, 3);
        assert_eq!(snapshot.alternatives.len(), 1);
    }

    #[test]
    fn test_failed_scan_degrades_to_empty() {
        let tmp = TempDir::new().unwrap();
        let tools = FakeTools {
            link: Some(LINK.to_string()),
            ..FakeTools::default()
        };
        let analyzer = Analyzer::new(Arc::new(tools), "wlp2s0", store(&tmp), 24);

        let snapshot = analyzer.snapshot();
        assert_eq!(snapshot.scanned, 0);
        assert!(snapshot.link.is_some());
        assert!(matches!(snapshot.topology, Topology::Empty));
    }

    #[test]
    fn test_record_link_saves_history() {
        let tmp = TempDir::new().unwrap();
        let mut analyzer = Analyzer::new(Arc::new(FakeTools::default()), "wlp2s0", store(&tmp), 24);
        let mut tracker = ConnectionTracker::new();
        let now = Utc::now();

        assert_eq!(analyzer.record_link(&mut tracker, Some(&link()), now).unwrap(), 1);
        assert_eq!(analyzer.record_link(&mut tracker, Some(&link()), now).unwrap(), 0);
        assert_eq!(analyzer.record_link(&mut tracker, None, now).unwrap(), 1);

        let kinds: Vec<EventKind> = analyzer.history().events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Connect, EventKind::Disconnect]);

        let reopened = store(&tmp);
        assert_eq!(reopened.events().len(), 2);
    }

    #[test]
    fn test_resolve_interface_prefers_configured() {
        let tools = FakeTools::default();
        assert_eq!(
            Analyzer::resolve_interface(&tools, Some("wlan7")).unwrap(),
            "wlan7"
        );
    }

    #[tokio::test]
    async fn test_monitor_records_and_analyzes() {
        let tmp = TempDir::new().unwrap();
        let tools = FakeTools {
            link: Some(LINK.to_string()),
            scan: Some(SCAN.to_string()),
            ..FakeTools::default()
        };
        let mut analyzer = Analyzer::new(Arc::new(tools), "wlp2s0", store(&tmp), 24);

        let mut snapshots = 0;
        let recorded = analyzer
            .monitor(
                Duration::from_millis(10),
                Duration::from_millis(40),
                tokio::time::sleep(Duration::from_millis(150)),
                |_| snapshots += 1,
            )
            .await
            .unwrap();

        // Same BSSID on every poll: one connect only
        assert_eq!(recorded, 1);
        assert!(snapshots >= 1);
        assert_eq!(analyzer.history().events()[0].kind, EventKind::Connect);
    }
}
