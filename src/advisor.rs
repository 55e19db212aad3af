//! Scoring of alternative BSSIDs for the current network
//!
//! Scores start at 100. Switching is only suggested when there is a
//! compelling reason (a much stronger signal, escaping a weak zone or a
//! band upgrade); otherwise moving off a good 5/6 GHz link is penalized.

use crate::wifi::{AccessPoint, Band, Bssid, LinkInfo};
use serde::Serialize;
use std::fmt;

const MAX_ALTERNATIVES: usize = 5;
const SWITCH_THRESHOLD: f64 = 110.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rating::Excellent => "EXCELLENT",
            Rating::Good => "GOOD",
            Rating::Fair => "FAIR",
            Rating::Poor => "POOR",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Alternative {
    pub bssid: Bssid,
    pub signal: i32,
    pub freq: u32,
    pub band: Band,
    pub score: f64,
    pub rating: Rating,
    pub reasons: Vec<String>,
    pub signal_diff: i32,
    pub stability_score: Option<f64>,
    pub compelling: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Moderate,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => f.write_str("HIGH"),
            Priority::Moderate => f.write_str("MODERATE"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Recommendation {
    /// Nothing better was found
    StayConnected { reason: String },
    Switch {
        target: Bssid,
        signal_improvement: i32,
        priority: Priority,
        rating: Rating,
        score: f64,
    },
}

impl Recommendation {
    pub fn is_switch(&self) -> bool {
        matches!(self, Recommendation::Switch { .. })
    }
}

/// Score every other BSSID broadcasting the current SSID, best first
///
/// `stability` looks up the historical stability score of a BSSID.
pub fn evaluate_alternatives<F>(
    current: &LinkInfo,
    aps: &[AccessPoint],
    stability: F,
) -> Vec<Alternative>
where
    F: Fn(&Bssid) -> Option<f64>,
{
    let mut alternatives: Vec<Alternative> = aps
        .iter()
        .filter(|ap| ap.ssid == current.ssid && ap.bssid != current.bssid)
        .map(|ap| score_alternative(current, ap, stability(&ap.bssid)))
        .collect();

    alternatives.sort_by(|a, b| b.score.total_cmp(&a.score));
    alternatives.truncate(MAX_ALTERNATIVES);
    alternatives
}

fn score_alternative(current: &LinkInfo, ap: &AccessPoint, stability: Option<f64>) -> Alternative {
    let current_band = current.band();
    let current_signal = current.signal;
    let alt_band = ap.band();
    let diff = ap.signal - current_signal;

    let mut score = 100.0;
    let mut reasons = Vec::new();

    match stability {
        Some(s) if s > 0.0 => {
            score += (s * 0.3).min(30.0);
            reasons.push(format!("Stability: {:.0}%", s));
        }
        _ => reasons.push("No historical data".to_string()),
    }

    let mut compelling = true;
    if diff > 15 {
        score += 25.0;
        reasons.push(format!("Major signal boost (+{}dB)", diff));
    } else if current_signal < -70 && diff > 5 {
        score += 20.0;
        reasons.push(format!("Escape weak signal zone (+{}dB)", diff));
    } else if current_band == Band::TwoGhz && alt_band == Band::FiveGhz && ap.signal > -65 {
        score += 15.0;
        reasons.push(format!("5GHz upgrade opportunity ({}dBm)", ap.signal));
    } else if current_band == Band::SixGhz && current_signal < -60 && diff > 10 {
        score += 10.0;
        reasons.push(format!(
            "6GHz signal marginal, better alternative (+{}dB)",
            diff
        ));
    } else {
        compelling = false;
        let downgrade = (current_band == Band::SixGhz
            && current_signal > -60
            && matches!(alt_band, Band::TwoGhz | Band::FiveGhz))
            .then_some(30.0)
            .or_else(|| {
                (current_band == Band::FiveGhz && current_signal > -65 && alt_band == Band::TwoGhz)
                    .then_some(20.0)
            });
        match downgrade {
            Some(penalty) => {
                score -= penalty;
                reasons.push(format!("Potential speed downgrade from {}", current_band));
            }
            None => reasons.push(format!("Minimal benefit ({:+}dB)", diff)),
        }
    }

    if alt_band == Band::FiveGhz
        && (current_band == Band::TwoGhz || (current_band == Band::SixGhz && current_signal < -65))
    {
        score += 5.0;
        reasons.push("Good speed/range balance".to_string());
    } else if alt_band == Band::SixGhz && current_band != Band::SixGhz && ap.signal > -55 {
        score += 10.0;
        reasons.push("Maximum speed potential".to_string());
    } else if alt_band == Band::TwoGhz && current_signal < -75 {
        score += 5.0;
        reasons.push("Better range/penetration".to_string());
    }

    if ap.signal > -50 {
        reasons.push(format!("Excellent signal ({}dBm)", ap.signal));
    } else if ap.signal > -60 {
        reasons.push(format!("Good signal ({}dBm)", ap.signal));
    } else if ap.signal > -70 {
        reasons.push(format!("Fair signal ({}dBm)", ap.signal));
    } else {
        reasons.push(format!("Weak signal ({}dBm)", ap.signal));
        score -= 15.0;
    }

    let rating = if compelling && score >= 120.0 {
        Rating::Excellent
    } else if compelling && score >= 100.0 {
        Rating::Good
    } else if score >= 90.0 {
        Rating::Fair
    } else {
        Rating::Poor
    };

    Alternative {
        bssid: ap.bssid,
        signal: ap.signal,
        freq: ap.freq,
        band: alt_band,
        score,
        rating,
        reasons,
        signal_diff: diff,
        stability_score: stability,
        compelling,
    }
}

/// Decide whether the best alternative is worth switching to
pub fn recommend(current: &LinkInfo, alternatives: &[Alternative]) -> Recommendation {
    let Some(best) = alternatives.first() else {
        return Recommendation::StayConnected {
            reason: "No beneficial alternatives found".to_string(),
        };
    };

    let worthwhile = best.compelling
        && best.score > SWITCH_THRESHOLD
        && (best.signal_diff > 5 || current.signal < -70);

    if worthwhile {
        Recommendation::Switch {
            target: best.bssid,
            signal_improvement: best.signal_diff,
            priority: if best.signal_diff > 15 {
                Priority::High
            } else {
                Priority::Moderate
            },
            rating: best.rating,
            score: best.score,
        }
    } else {
        Recommendation::StayConnected {
            reason: "Current connection is optimal".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const CURRENT: &str = "A0:21:B7:00:00:01";

    fn current(freq: u32, signal: i32) -> LinkInfo {
        LinkInfo {
            ssid: "HomeMesh".to_string(),
            bssid: CURRENT.parse().unwrap(),
            freq,
            signal,
        }
    }

    fn ap(bssid: &str, ssid: &str, freq: u32, signal: i32) -> AccessPoint {
        AccessPoint {
            ssid: ssid.to_string(),
            bssid: bssid.parse().unwrap(),
            freq,
            signal,
            last_seen: Utc::now(),
        }
    }

    fn no_history(_: &Bssid) -> Option<f64> {
        None
    }

    #[test]
    fn test_skips_current_and_other_networks() {
        let aps = [
            ap(CURRENT, "HomeMesh", 5180, -50),
            ap("A0:21:B7:00:00:02", "Neighbor", 5180, -40),
            ap("A0:21:B7:00:00:03", "HomeMesh", 5500, -55),
        ];
        let alternatives = evaluate_alternatives(&current(5180, -60), &aps, no_history);
        assert_eq!(alternatives.len(), 1);
        assert_eq!(alternatives[0].bssid.to_string(), "A0:21:B7:00:00:03");
    }

    #[test]
    fn test_major_signal_boost_is_excellent() {
        let aps = [ap("A0:21:B7:00:00:02", "HomeMesh", 5180, -48)];
        let alternatives = evaluate_alternatives(&current(5500, -72), &aps, |_| Some(80.0));
        let best = &alternatives[0];
        // 100 + 24 (history) + 25 (boost)
        assert!(best.compelling);
        assert!((best.score - 149.0).abs() < 1e-9);
        assert_eq!(best.rating, Rating::Excellent);
        assert_eq!(best.signal_diff, 24);

        match recommend(&current(5500, -72), &alternatives) {
            Recommendation::Switch { priority, .. } => assert_eq!(priority, Priority::High),
            other => panic!("expected switch, got {:?}", other),
        }
    }

    #[test]
    fn test_downgrade_from_good_6ghz_is_penalized() {
        let aps = [ap("A0:21:B7:00:00:02", "HomeMesh", 5180, -50)];
        let alternatives = evaluate_alternatives(&current(6115, -55), &aps, no_history);
        let best = &alternatives[0];
        // 100 - 30 (downgrade), not compelling
        assert!(!best.compelling);
        assert!((best.score - 70.0).abs() < 1e-9);
        assert_eq!(best.rating, Rating::Poor);
        assert!(!recommend(&current(6115, -55), &alternatives).is_switch());
    }

    #[test]
    fn test_band_upgrade_from_2ghz() {
        let aps = [ap("A0:21:B7:00:00:02", "HomeMesh", 5180, -60)];
        let alternatives = evaluate_alternatives(&current(2437, -58), &aps, no_history);
        let best = &alternatives[0];
        // 100 + 15 (5GHz upgrade) + 5 (band balance)
        assert!(best.compelling);
        assert!((best.score - 120.0).abs() < 1e-9);
        assert_eq!(best.rating, Rating::Excellent);

        // diff is -2 and current is not weak: no switch
        assert!(!recommend(&current(2437, -58), &alternatives).is_switch());
    }

    #[test]
    fn test_weak_alternative_penalty() {
        let aps = [ap("A0:21:B7:00:00:02", "HomeMesh", 5180, -78)];
        let alternatives = evaluate_alternatives(&current(5500, -76), &aps, no_history);
        // 100 (minimal benefit) - 15 (weak)
        assert!((alternatives[0].score - 85.0).abs() < 1e-9);
        assert_eq!(alternatives[0].rating, Rating::Poor);
    }

    #[test]
    fn test_sorted_and_truncated() {
        let aps: Vec<AccessPoint> = (2..10)
            .map(|i| ap(&format!("A0:21:B7:00:00:0{}", i), "HomeMesh", 5180, -80 + i as i32 * 4))
            .collect();
        let alternatives = evaluate_alternatives(&current(5500, -75), &aps, no_history);
        assert_eq!(alternatives.len(), MAX_ALTERNATIVES);
        assert!(alternatives.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_no_alternatives() {
        let recommendation = recommend(&current(5180, -50), &[]);
        assert!(matches!(recommendation, Recommendation::StayConnected { .. }));
    }
}
