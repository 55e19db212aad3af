//! Problem pattern detection over recent connection events

use super::{ConnectionEvent, EventKind};
use crate::wifi::Bssid;
use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Events closer together than this belong to the same burst
const CLUSTER_WINDOW_SECS: f64 = 300.0;
const RAPID_RECONNECT_SECS: f64 = 60.0;
const HOURLY_PROBLEM_THRESHOLD: usize = 5;
const MIN_FAILURES: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct RoamingLoop {
    pub bssids: [Bssid; 2],
    pub time_span_secs: f64,
    pub start: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthFailureCluster {
    pub bssid: Bssid,
    pub failure_count: usize,
    pub time_span_secs: f64,
    pub start: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RapidReconnect {
    pub bssid: Bssid,
    pub cycle_secs: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourlyIssue {
    pub problem_count: usize,
    pub problem_kinds: Vec<EventKind>,
    pub affected_bssids: Vec<Bssid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BssidProblem {
    pub total_problems: usize,
    pub auth_failures: usize,
    pub disconnects: usize,
    /// Share of this BSSID's events that were problems, 0-1
    pub problem_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConnectionPatterns {
    pub roaming_loops: Vec<RoamingLoop>,
    pub auth_failure_clusters: Vec<AuthFailureCluster>,
    pub rapid_reconnects: Vec<RapidReconnect>,
    /// Keyed by local hour of day
    pub time_based_issues: BTreeMap<u32, HourlyIssue>,
    pub bssid_problems: BTreeMap<Bssid, BssidProblem>,
}

impl ConnectionPatterns {
    /// Loops, clusters and rapid reconnects found
    pub fn issue_count(&self) -> usize {
        self.roaming_loops.len() + self.auth_failure_clusters.len() + self.rapid_reconnects.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
            && self.time_based_issues.is_empty()
            && self.bssid_problems.is_empty()
    }
}

fn seconds_between(a: &DateTime<Utc>, b: &DateTime<Utc>) -> f64 {
    (*b - *a).num_milliseconds() as f64 / 1000.0
}

/// Detect problem patterns in `events` (oldest first), bucketing hours in
/// local time
pub fn analyze_patterns(events: &[ConnectionEvent]) -> ConnectionPatterns {
    analyze_patterns_in(events, &Local)
}

pub fn analyze_patterns_in<Tz: TimeZone>(events: &[ConnectionEvent], tz: &Tz) -> ConnectionPatterns {
    ConnectionPatterns {
        roaming_loops: roaming_loops(events),
        auth_failure_clusters: auth_failure_clusters(events),
        rapid_reconnects: rapid_reconnects(events),
        time_based_issues: hourly_issues(events, tz),
        bssid_problems: bssid_problems(events),
    }
}

/// A, B, A, B connects within five minutes
fn roaming_loops(events: &[ConnectionEvent]) -> Vec<RoamingLoop> {
    let connects: Vec<&ConnectionEvent> = events
        .iter()
        .filter(|e| e.kind == EventKind::Connect)
        .collect();

    connects
        .windows(4)
        .filter_map(|w| {
            let (a, b) = (w[0].bssid, w[1].bssid);
            if a != b && w[2].bssid == a && w[3].bssid == b {
                let span = seconds_between(&w[0].timestamp, &w[3].timestamp);
                (span < CLUSTER_WINDOW_SECS).then(|| RoamingLoop {
                    bssids: [a, b],
                    time_span_secs: span,
                    start: w[0].timestamp,
                })
            } else {
                None
            }
        })
        .collect()
}

fn auth_failure_clusters(events: &[ConnectionEvent]) -> Vec<AuthFailureCluster> {
    let mut by_bssid: BTreeMap<Bssid, Vec<DateTime<Utc>>> = BTreeMap::new();
    for event in events.iter().filter(|e| e.kind == EventKind::AuthTimeout) {
        by_bssid.entry(event.bssid).or_default().push(event.timestamp);
    }

    let mut clusters = Vec::new();
    for (bssid, mut times) in by_bssid {
        if times.len() < MIN_FAILURES {
            continue;
        }
        times.sort();

        let mut groups: Vec<Vec<DateTime<Utc>>> = vec![vec![times[0]]];
        for pair in times.windows(2) {
            if seconds_between(&pair[0], &pair[1]) < CLUSTER_WINDOW_SECS {
                if let Some(group) = groups.last_mut() {
                    group.push(pair[1]);
                }
            } else {
                groups.push(vec![pair[1]]);
            }
        }

        for group in groups.into_iter().filter(|g| g.len() >= MIN_FAILURES) {
            let (first, last) = (group[0], group[group.len() - 1]);
            clusters.push(AuthFailureCluster {
                bssid,
                failure_count: group.len(),
                time_span_secs: seconds_between(&first, &last),
                start: first,
            });
        }
    }
    clusters
}

/// Disconnect followed directly by a connect within a minute
fn rapid_reconnects(events: &[ConnectionEvent]) -> Vec<RapidReconnect> {
    events
        .windows(2)
        .filter_map(|w| {
            let cycle = seconds_between(&w[0].timestamp, &w[1].timestamp);
            (w[0].kind == EventKind::Disconnect
                && w[1].kind == EventKind::Connect
                && cycle < RAPID_RECONNECT_SECS)
                .then(|| RapidReconnect {
                    bssid: w[0].bssid,
                    cycle_secs: cycle,
                })
        })
        .collect()
}

fn hourly_issues<Tz: TimeZone>(events: &[ConnectionEvent], tz: &Tz) -> BTreeMap<u32, HourlyIssue> {
    let mut by_hour: BTreeMap<u32, Vec<&ConnectionEvent>> = BTreeMap::new();
    for event in events.iter().filter(|e| e.kind.is_problem()) {
        let hour = event.timestamp.with_timezone(tz).hour();
        by_hour.entry(hour).or_default().push(event);
    }

    by_hour
        .into_iter()
        .filter(|(_, list)| list.len() >= HOURLY_PROBLEM_THRESHOLD)
        .map(|(hour, list)| {
            let kinds: BTreeSet<EventKind> = list.iter().map(|e| e.kind).collect();
            let bssids: BTreeSet<Bssid> = list.iter().map(|e| e.bssid).collect();
            (
                hour,
                HourlyIssue {
                    problem_count: list.len(),
                    problem_kinds: kinds.into_iter().collect(),
                    affected_bssids: bssids.into_iter().collect(),
                },
            )
        })
        .collect()
}

fn bssid_problems(events: &[ConnectionEvent]) -> BTreeMap<Bssid, BssidProblem> {
    let mut by_bssid: BTreeMap<Bssid, Vec<&ConnectionEvent>> = BTreeMap::new();
    for event in events {
        by_bssid.entry(event.bssid).or_default().push(event);
    }

    by_bssid
        .into_iter()
        .filter_map(|(bssid, list)| {
            let auth_failures = list.iter().filter(|e| e.kind == EventKind::AuthTimeout).count();
            let disconnects = list.iter().filter(|e| e.kind == EventKind::Disconnect).count();
            let total = auth_failures + disconnects;
            (total >= MIN_FAILURES).then(|| {
                (
                    bssid,
                    BssidProblem {
                        total_problems: total,
                        auth_failures,
                        disconnects,
                        problem_rate: total as f64 / list.len() as f64,
                    },
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "A0:21:B7:00:00:01";
    const B: &str = "A0:21:B7:00:00:02";

    fn event(secs: i64, bssid: &str, kind: EventKind) -> ConnectionEvent {
        // 2023-11-14T22:13:20Z
        let ts = DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap();
        ConnectionEvent::new(ts, bssid.parse().unwrap(), kind, -60)
    }

    #[test]
    fn test_roaming_loop_detected() {
        let events = vec![
            event(0, A, EventKind::Connect),
            event(30, B, EventKind::Connect),
            event(60, A, EventKind::Connect),
            event(90, B, EventKind::Connect),
        ];
        let patterns = analyze_patterns_in(&events, &Utc);
        assert_eq!(patterns.roaming_loops.len(), 1);
        let found = &patterns.roaming_loops[0];
        assert_eq!(found.bssids[0].to_string(), A);
        assert!((found.time_span_secs - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_slow_roaming_is_not_a_loop() {
        let events = vec![
            event(0, A, EventKind::Connect),
            event(200, B, EventKind::Connect),
            event(400, A, EventKind::Connect),
            event(600, B, EventKind::Connect),
        ];
        assert!(analyze_patterns_in(&events, &Utc).roaming_loops.is_empty());
    }

    #[test]
    fn test_auth_failure_clusters_split_on_gap() {
        let mut events: Vec<ConnectionEvent> = [0, 60, 120, 1000, 1100]
            .iter()
            .map(|&s| event(s, A, EventKind::AuthTimeout))
            .collect();
        events.push(event(2000, B, EventKind::AuthTimeout));

        let patterns = analyze_patterns_in(&events, &Utc);
        assert_eq!(patterns.auth_failure_clusters.len(), 1);
        let cluster = &patterns.auth_failure_clusters[0];
        assert_eq!(cluster.failure_count, 3);
        assert!((cluster.time_span_secs - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rapid_reconnects() {
        let events = vec![
            event(0, A, EventKind::Disconnect),
            event(20, A, EventKind::Connect),
            event(100, A, EventKind::Disconnect),
            event(200, A, EventKind::Connect),
        ];
        let patterns = analyze_patterns_in(&events, &Utc);
        assert_eq!(patterns.rapid_reconnects.len(), 1);
        assert!((patterns.rapid_reconnects[0].cycle_secs - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hourly_and_bssid_problems() {
        let mut events: Vec<ConnectionEvent> = (0..5)
            .map(|i| event(i * 60, A, EventKind::Disconnect))
            .collect();
        events.push(event(400, B, EventKind::Connect));
        events.push(event(410, A, EventKind::Connect));

        let patterns = analyze_patterns_in(&events, &Utc);
        let issue = patterns.time_based_issues.get(&22).unwrap();
        assert_eq!(issue.problem_count, 5);
        assert_eq!(issue.problem_kinds, vec![EventKind::Disconnect]);

        let problem = patterns.bssid_problems.get(&A.parse().unwrap()).unwrap();
        assert_eq!(problem.total_problems, 5);
        assert_eq!(problem.disconnects, 5);
        assert!((problem.problem_rate - 5.0 / 6.0).abs() < 1e-9);
        assert!(!patterns.bssid_problems.contains_key(&B.parse().unwrap()));
    }

    #[test]
    fn test_no_events_is_clean() {
        assert!(analyze_patterns(&[]).is_clean());
    }
}
