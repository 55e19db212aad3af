//! Plain text rendering for the terminal

use super::{stability_rating, title_case};
use crate::advisor::Recommendation;
use crate::analyzer::AnalysisSnapshot;
use crate::history::{BssidHistory, ConnectionPatterns};
use crate::mesh::{MeshReport, PlacementQuality, Topology};
use crate::power::PowerReport;
use crate::roaming::RoamingMeasurement;
use crate::severity::Severity;
use crate::wifi::LinkInfo;
use std::fmt::{self, Write};

const RULE_WIDTH: usize = 60;
const SHOWN_ALTERNATIVES: usize = 3;
const SHOWN_OVERLAPS: usize = 3;

pub fn render_console(snapshot: &AnalysisSnapshot) -> String {
    ConsoleReport(snapshot).to_string()
}

struct ConsoleReport<'a>(&'a AnalysisSnapshot);

impl fmt::Display for ConsoleReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;

        writeln!(f, "WiFi Mesh Network Analyzer")?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "Interface: {}", s.interface)?;
        match &s.link {
            Some(link) => {
                writeln!(
                    f,
                    "Connected: {} | {} | {} MHz | {} dBm",
                    link.ssid, link.bssid, link.freq, link.signal
                )?;
                let quality = link.quality();
                writeln!(
                    f,
                    "Signal: {} ({})",
                    title_case(quality.as_str(), " "),
                    quality.description()
                )?;
            }
            None => writeln!(f, "Not connected to any network")?,
        }

        heading(f, "NETWORK SCANNING")?;
        writeln!(f, "Found {} access points", s.scanned)?;

        if let Some(link) = &s.link {
            write_topology(f, &s.topology, link)?;
        }

        heading(f, "HISTORICAL PERFORMANCE")?;
        write_history(f, s.link.as_ref(), s.history.as_ref())?;

        heading(f, "PROBLEM DETECTION")?;
        write_patterns(f, &s.patterns)?;

        if let (Some(link), Some(recommendation)) = (&s.link, &s.recommendation) {
            heading(f, "RECOMMENDATIONS")?;
            write_recommendations(f, s, link, recommendation)?;
        }

        if let Some(roaming) = &s.roaming {
            heading(f, "ROAMING ANALYSIS")?;
            write_roaming(f, roaming)?;
        }

        if let Some(power) = &s.power {
            heading(f, "POWER MANAGEMENT")?;
            write_power_summary(f, power)?;
        }
        Ok(())
    }
}

fn heading(f: &mut impl Write, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "-".repeat(RULE_WIDTH))
}

fn write_topology(f: &mut impl Write, topology: &Topology, link: &LinkInfo) -> fmt::Result {
    match topology {
        Topology::Empty => Ok(()),
        Topology::SingleAp { quality, reason, .. } => {
            heading(f, "SINGLE ACCESS POINT NETWORK")?;
            writeln!(f, "Signal Quality: {}", title_case(quality.as_str(), " "))?;
            writeln!(f, "  Analysis: {}", reason)?;
            match quality {
                PlacementQuality::Poor => {
                    writeln!(f, "  Recommendations:")?;
                    writeln!(f, "    1. Move closer to the access point")?;
                    writeln!(f, "    2. Check for physical obstructions")?;
                    writeln!(f, "    3. Consider relocating the AP to a more central location")?;
                    writeln!(f, "    4. Verify AP placement is elevated and away from interference")
                }
                PlacementQuality::Fair => {
                    writeln!(f, "  Recommendations:")?;
                    writeln!(f, "    1. Minor positioning adjustments may help")?;
                    writeln!(f, "    2. Check for interference sources nearby")
                }
                _ => Ok(()),
            }
        }
        Topology::MultipleAps {
            quality,
            reason,
            aps,
            ..
        } => {
            heading(f, "MULTIPLE ACCESS POINTS")?;
            writeln!(f, "Configuration: {} standalone APs", aps.len())?;
            writeln!(f, "Coverage Quality: {}", title_case(quality.as_str(), " "))?;
            writeln!(f, "  Analysis: {}", reason)?;
            for ap in aps {
                writeln!(f, "  {} {} {}dBm", ap.bssid, ap.band, ap.signal)?;
            }
            Ok(())
        }
        Topology::Mesh(report) => {
            heading(f, "MESH INTELLIGENCE")?;
            write_mesh(f, report, link)
        }
    }
}

fn write_mesh(f: &mut impl Write, report: &MeshReport, link: &LinkInfo) -> fmt::Result {
    let brand = report
        .brand_name
        .clone()
        .unwrap_or_else(|| title_case(&report.brand, " "));
    let assessment = &report.coverage.assessment;

    writeln!(f, "Brand: {}", brand)?;
    writeln!(f, "Type: {} Mesh", title_case(report.mesh_type.as_str(), "-"))?;
    writeln!(
        f,
        "Topology: {} nodes, {} radios",
        report.total_nodes(),
        report.total_radios
    )?;
    writeln!(f, "  Note: only nodes visible from your current location are shown")?;
    writeln!(
        f,
        "Mesh Topology: {} (Quality Score: {}/100)",
        title_case(assessment.classification.as_str(), " "),
        assessment.quality_score
    )?;
    writeln!(f, "  Analysis: {}", assessment.summary)?;
    writeln!(f, "  Nodes: {}", assessment.node_assessment)?;
    writeln!(f, "  Distribution: {}", assessment.distribution_analysis)?;

    writeln!(f)?;
    writeln!(f, "Nodes:")?;
    for node in &report.nodes {
        let radios: Vec<String> = node
            .radios
            .iter()
            .map(|r| {
                let here = if r.bssid == link.bssid { " (connected)" } else { "" };
                format!("{} {}dBm{}", r.band, r.signal, here)
            })
            .collect();
        writeln!(
            f,
            "  {}  strongest {}dBm  [{}]",
            node.base_mac,
            node.strongest_signal,
            radios.join(", ")
        )?;
    }

    write_zones(f, report, link)?;

    let bands: Vec<String> = report.bands.iter().map(|b| b.to_string()).collect();
    writeln!(f, "Bands: {}", bands.join(", "))?;

    if !report.coverage.issues.is_empty() {
        writeln!(f)?;
        writeln!(f, "Coverage issues:")?;
        for issue in &report.coverage.issues {
            writeln!(
                f,
                "  [{}] {}",
                issue.severity.as_str().to_uppercase(),
                issue.details
            )?;
            writeln!(f, "      Impact: {}", issue.impact)?;
            writeln!(f, "      Location: {}", issue.location)?;
        }
    }

    if !assessment.recommendations.is_empty() {
        writeln!(f)?;
        writeln!(f, "Placement recommendations:")?;
        for (i, rec) in assessment.recommendations.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, rec)?;
        }
    }

    let venn = &report.venn;
    writeln!(f)?;
    writeln!(f, "VENN OVERLAP ANALYSIS:")?;
    writeln!(
        f,
        "  Coverage Overlap Quality: {} (Score: {}/100)",
        title_case(venn.assessment.quality.as_str(), " "),
        venn.assessment.score
    )?;
    writeln!(f, "  {}", venn.assessment.description)?;
    if venn.overlaps.is_empty() {
        writeln!(f, "  No significant node overlaps detected - potential coverage gaps")?;
    } else {
        writeln!(f, "  Detected {} node overlaps", venn.overlaps.len())?;
        for overlap in venn.overlaps.iter().take(SHOWN_OVERLAPS) {
            writeln!(
                f,
                "    {} <-> {}: {:.1}% overlap",
                overlap.first_label, overlap.second_label, overlap.percentage
            )?;
        }
    }
    Ok(())
}

fn write_zones(f: &mut impl Write, report: &MeshReport, link: &LinkInfo) -> fmt::Result {
    let zones = &report.coverage.zones;
    let current = report
        .nodes
        .iter()
        .find(|n| n.radios.iter().any(|r| r.bssid == link.bssid));

    writeln!(f)?;
    writeln!(f, "Coverage zones:")?;

    let rows = [
        ("Primary", "same room or very close", &zones.primary),
        ("Secondary", "adjacent rooms or floors", &zones.secondary),
        ("Tertiary", "distant rooms", &zones.tertiary),
        ("Fringe", "maximum range", &zones.fringe),
    ];
    let mut stronger = 0;
    for (name, area, signals) in rows {
        if let (Some(min), Some(max)) = (signals.iter().min(), signals.iter().max()) {
            writeln!(
                f,
                "  {} Zone: {} nodes ({} to {}dBm), {}",
                name,
                signals.len(),
                min,
                max,
                area
            )?;
            if current.is_some_and(|n| signals.contains(&n.strongest_signal)) {
                writeln!(
                    f,
                    "    YOU ARE HERE: connected to {} at {}dBm",
                    link.bssid, link.signal
                )?;
                if name == "Fringe" {
                    writeln!(f, "    You're at maximum range, move closer for better performance")?;
                }
                if stronger > 0 {
                    writeln!(f, "    {} stronger nodes available", stronger)?;
                }
            }
        }
        stronger += signals.len();
    }

    if current.is_none() {
        writeln!(
            f,
            "  Current connection {} at {}dBm does not match any detected node",
            link.bssid, link.signal
        )?;
    }
    Ok(())
}

fn write_history(
    f: &mut impl Write,
    link: Option<&LinkInfo>,
    history: Option<&BssidHistory>,
) -> fmt::Result {
    let Some(link) = link else {
        return writeln!(f, "Connect to a network for historical analysis");
    };

    match history {
        Some(h) => {
            writeln!(f, "Current BSSID Performance ({}):", link.bssid)?;
            writeln!(
                f,
                "  Stability Score: {:.1}/100 ({})",
                h.stability_score,
                title_case(stability_rating(h.stability_score), " ")
            )?;
            writeln!(f, "  Connection History: {} total attempts", h.total_connections)?;
            writeln!(f, "  Success Rate: {:.1}%", h.success_rate())?;
            writeln!(f, "  Average Signal: {:.0}dBm", h.avg_signal)
        }
        None => {
            writeln!(f, "No historical data for current BSSID ({})", link.bssid)?;
            writeln!(f, "  This appears to be a new connection")
        }
    }
}

fn write_patterns(f: &mut impl Write, patterns: &ConnectionPatterns) -> fmt::Result {
    let total = patterns.issue_count();
    if total == 0 {
        return writeln!(f, "No problematic patterns detected");
    }

    writeln!(f, "{} problematic patterns detected:", total)?;
    if !patterns.roaming_loops.is_empty() {
        writeln!(f, "  Roaming Loops: {}", patterns.roaming_loops.len())?;
    }
    if !patterns.auth_failure_clusters.is_empty() {
        writeln!(
            f,
            "  Auth Failure Clusters: {}",
            patterns.auth_failure_clusters.len()
        )?;
    }
    if !patterns.rapid_reconnects.is_empty() {
        writeln!(f, "  Rapid Reconnects: {}", patterns.rapid_reconnects.len())?;
    }
    Ok(())
}

fn write_recommendations(
    f: &mut impl Write,
    snapshot: &AnalysisSnapshot,
    link: &LinkInfo,
    recommendation: &Recommendation,
) -> fmt::Result {
    if snapshot.alternatives.is_empty() {
        return writeln!(f, "Current BSSID appears to be the best available option");
    }

    writeln!(f, "Alternatives for {}:", link.ssid)?;
    for (i, alt) in snapshot.alternatives.iter().take(SHOWN_ALTERNATIVES).enumerate() {
        writeln!(
            f,
            "  Option {}: {} {} {}dBm ({:+}dB) score {:.0} {}",
            i + 1,
            alt.bssid,
            alt.band,
            alt.signal,
            alt.signal_diff,
            alt.score,
            alt.rating
        )?;
        writeln!(f, "     {}", alt.reasons.join("; "))?;
    }
    writeln!(f)?;

    match recommendation {
        Recommendation::Switch {
            target,
            signal_improvement,
            priority,
            rating,
            ..
        } => {
            writeln!(f, "PERFORMANCE OPTIMIZATION OPPORTUNITY ({} priority):", priority)?;
            writeln!(f, "  Recommended BSSID: {}", target)?;
            writeln!(
                f,
                "  Expected improvement: {:+}dB signal strength",
                signal_improvement
            )?;
            writeln!(f, "  Quality rating: {}", rating)
        }
        Recommendation::StayConnected { .. } => {
            writeln!(f, "CURRENT CONNECTION IS OPTIMAL")?;
            writeln!(f, "  Analysis: Your current connection is performing well")
        }
    }
}

pub fn write_roaming(f: &mut impl Write, roaming: &RoamingMeasurement) -> fmt::Result {
    let s = &roaming.summary;
    writeln!(f, "Seamless roams: {}", s.seamless_roams)?;
    writeln!(f, "Dropped connections: {}", s.dropped_roams)?;
    writeln!(f, "Micro-dropouts: {}", s.micro_dropouts)?;
    if let (Some(avg), Some(longest), Some(shortest)) = (
        s.avg_downtime_secs,
        s.longest_downtime_secs,
        s.shortest_downtime_secs,
    ) {
        writeln!(
            f,
            "Downtime: avg {:.3}s, longest {:.3}s, shortest {:.3}s",
            avg, longest, shortest
        )?;
    }
    for t in &roaming.transitions {
        writeln!(
            f,
            "  {} -> {}: {} times, avg {:+.1}dBm",
            t.from, t.to, t.count, t.avg_signal_change
        )?;
    }
    if s.is_stable() {
        writeln!(f, "Connection stayed on one access point")?;
    }
    Ok(())
}

/// Severity counts and the high severity findings
pub fn write_power_summary(f: &mut impl Write, power: &PowerReport) -> fmt::Result {
    if power.total() == 0 {
        return writeln!(f, "No power management issues detected");
    }

    let counts = power.severity_counts();
    writeln!(
        f,
        "{} issues found ({} critical)",
        power.total(),
        power.critical()
    )?;
    for severity in [Severity::High, Severity::Medium, Severity::Low, Severity::Info] {
        if let Some(n) = counts.get(&severity) {
            writeln!(f, "  {}: {}", severity.as_str(), n)?;
        }
    }
    for findings in &power.categories {
        for issue in findings.issues.iter().filter(|i| i.severity == Severity::High) {
            writeln!(f, "  [{}] {}", findings.category, issue.issue)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::mesh_snapshot;

    #[test]
    fn test_mesh_snapshot_console() {
        let out = render_console(&mesh_snapshot());

        assert!(out.contains("Connected: HomeMesh | A0:21:B7:11:22:30 | 2437 MHz | -72 dBm"));
        assert!(out.contains("MESH INTELLIGENCE"));
        assert!(out.contains("Type: Dual-Band Mesh"));
        assert!(out.contains("Topology: 2 nodes, 4 radios"));
        assert!(out.contains("YOU ARE HERE: connected to A0:21:B7:11:22:30 at -72dBm"));
        assert!(out.contains("Stability Score: 82.5/100 (Good)"));
        assert!(out.contains("No problematic patterns detected"));
        assert!(out.contains("PERFORMANCE OPTIMIZATION OPPORTUNITY (HIGH priority)"));
        assert!(out.contains("Recommended BSSID: A0:21:B7:11:22:31"));
        assert!(out.contains("Expected improvement: +27dB"));
        assert!(!out.contains("ROAMING ANALYSIS"));
    }

    #[test]
    fn test_only_three_alternatives_listed() {
        let mut snapshot = mesh_snapshot();
        let extra = snapshot.alternatives[0].clone();
        snapshot.alternatives.push(extra.clone());
        snapshot.alternatives.push(extra);
        assert_eq!(snapshot.alternatives.len(), 5);

        let out = render_console(&snapshot);
        assert!(out.contains("Option 3:"));
        assert!(!out.contains("Option 4:"));
    }

    #[test]
    fn test_disconnected_console() {
        let mut snapshot = mesh_snapshot();
        snapshot.link = None;
        snapshot.recommendation = None;
        snapshot.topology = Topology::Empty;

        let out = render_console(&snapshot);
        assert!(out.contains("Not connected to any network"));
        assert!(out.contains("Connect to a network for historical analysis"));
        assert!(!out.contains("RECOMMENDATIONS"));
    }

    #[test]
    fn test_no_alternatives() {
        let mut snapshot = mesh_snapshot();
        snapshot.alternatives.clear();
        snapshot.history = None;

        let out = render_console(&snapshot);
        assert!(out.contains("Current BSSID appears to be the best available option"));
        assert!(out.contains("This appears to be a new connection"));
    }

    #[test]
    fn test_power_summary() {
        let out = render_console(&mesh_snapshot());
        assert!(!out.contains("POWER MANAGEMENT"));

        let mut text = String::new();
        write_power_summary(&mut text, &PowerReport::default()).unwrap();
        assert_eq!(text, "No power management issues detected\n");
    }
}
