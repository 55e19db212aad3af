//! Standalone HTML report
//!
//! The page carries its own stylesheet and has no scripts or external
//! assets, so it can be opened straight from `reports/` or attached to a
//! support ticket.

use super::{stability_rating, title_case};
use crate::advisor::{Alternative, Rating, Recommendation};
use crate::analyzer::AnalysisSnapshot;
use crate::history::{BssidHistory, ConnectionPatterns};
use crate::mesh::venn::{OverlapQuality, VennNode};
use crate::mesh::{MeshReport, PlacementQuality, Topology, TopologyClass};
use crate::power::PowerReport;
use crate::roaming::RoamingMeasurement;
use crate::severity::Severity;
use crate::wifi::{LinkInfo, SignalQuality};
use std::fmt::{self, Write};

const SVG_WIDTH: i32 = 400;
const SVG_HEIGHT: i32 = 300;
const MAX_SVG_NODES: usize = 4;
const SHOWN_ALTERNATIVES: usize = 3;
const SHOWN_OVERLAPS: usize = 5;

/// Escape text for use in element content and quoted attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn render_html(snapshot: &AnalysisSnapshot) -> String {
    HtmlReport(snapshot).to_string()
}

struct HtmlReport<'a>(&'a AnalysisSnapshot);

impl fmt::Display for HtmlReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        let network = s
            .link
            .as_ref()
            .map_or_else(|| "No Active Connection".to_string(), |l| escape_html(&l.ssid));

        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"en\">")?;
        writeln!(f, "<head>")?;
        writeln!(f, "<meta charset=\"UTF-8\">")?;
        writeln!(
            f,
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(f, "<title>Mesh Analysis - {}</title>", network)?;
        writeln!(f, "<style>{}</style>", STYLE)?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;
        writeln!(f, "<div class=\"container\">")?;

        writeln!(f, "<header class=\"main-header\">")?;
        writeln!(f, "<h1>WiFi Mesh Network Analysis</h1>")?;
        writeln!(f, "<h2>{}</h2>", network)?;
        writeln!(
            f,
            "<p class=\"timestamp\">Generated: {} on {}</p>",
            s.timestamp.format("%Y-%m-%d %H:%M:%S"),
            escape_html(&s.interface)
        )?;
        writeln!(f, "</header>")?;

        writeln!(f, "<main class=\"content-grid\">")?;
        write_connection(f, s.link.as_ref())?;
        write_topology(f, &s.topology)?;
        write_alternatives(f, &s.alternatives, s.recommendation.as_ref())?;
        write_history(f, s.history.as_ref())?;
        write_problems(f, &s.patterns)?;
        write_roaming(f, s.roaming.as_ref())?;
        write_power(f, s.power.as_ref())?;
        writeln!(f, "</main>")?;

        writeln!(f, "<footer class=\"report-footer\">")?;
        writeln!(
            f,
            "<p>Generated by mesh-analyzer {}: mesh topology, signal optimization, historical tracking, problem detection</p>",
            env!("CARGO_PKG_VERSION")
        )?;
        writeln!(f, "</footer>")?;
        writeln!(f, "</div>")?;
        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

fn signal_class(signal: i32) -> &'static str {
    SignalQuality::from_dbm(signal).as_str()
}

/// Node and Venn circles use wider bands than link quality
fn node_class(signal: i32) -> &'static str {
    if signal > -50 {
        "excellent"
    } else if signal > -65 {
        "good"
    } else if signal > -80 {
        "fair"
    } else {
        "poor"
    }
}

fn row(f: &mut impl Write, label: &str, value: &str) -> fmt::Result {
    writeln!(
        f,
        "<div class=\"detail-row\"><span class=\"label\">{}</span><span class=\"value\">{}</span></div>",
        label, value
    )
}

fn write_connection(f: &mut impl Write, link: Option<&LinkInfo>) -> fmt::Result {
    let Some(link) = link else {
        writeln!(f, "<section class=\"card no-connection\">")?;
        writeln!(f, "<h3>Connection Status</h3>")?;
        writeln!(f, "<p>Not connected to any WiFi network</p>")?;
        writeln!(f, "<p class=\"hint\">Connect to a WiFi network to enable mesh analysis</p>")?;
        return writeln!(f, "</section>");
    };

    writeln!(f, "<section class=\"card connection-status\">")?;
    writeln!(f, "<h3>Current Connection</h3>")?;
    row(f, "Network (SSID)", &escape_html(&link.ssid))?;
    row(f, "Access Point (BSSID)", &link.bssid.to_string())?;
    row(
        f,
        "Signal Strength",
        &format!(
            "<span class=\"signal-{}\">{} dBm</span>",
            signal_class(link.signal),
            link.signal
        ),
    )?;
    row(f, "Frequency", &format!("{} MHz ({})", link.freq, link.band()))?;
    row(f, "Quality", link.quality().description())?;
    writeln!(f, "</section>")
}

fn placement_class(quality: PlacementQuality) -> &'static str {
    match quality {
        PlacementQuality::Excellent => "excellent",
        PlacementQuality::Good => "good",
        PlacementQuality::Fair => "warning",
        PlacementQuality::Poor => "poor",
    }
}

fn write_topology(f: &mut impl Write, topology: &Topology) -> fmt::Result {
    match topology {
        Topology::Empty => {
            writeln!(f, "<section class=\"card\">")?;
            writeln!(f, "<h3>Network Topology</h3>")?;
            writeln!(f, "<p>No topology analysis available</p>")?;
            writeln!(f, "</section>")
        }
        Topology::SingleAp { quality, reason, .. } => {
            writeln!(f, "<section class=\"card single-ap\">")?;
            writeln!(f, "<h3>Single Access Point Network</h3>")?;
            writeln!(
                f,
                "<div class=\"quality-indicator {}\">{}</div>",
                placement_class(*quality),
                title_case(quality.as_str(), " ")
            )?;
            writeln!(f, "<p>{}</p>", escape_html(reason))?;
            writeln!(f, "</section>")
        }
        Topology::MultipleAps {
            quality,
            reason,
            aps,
            ..
        } => {
            writeln!(f, "<section class=\"card multiple-aps\">")?;
            writeln!(f, "<h3>Multiple Access Points</h3>")?;
            writeln!(
                f,
                "<div class=\"count\"><span class=\"count-number\">{}</span> Access Points</div>",
                aps.len()
            )?;
            writeln!(
                f,
                "<div class=\"quality-indicator {}\">{}</div>",
                placement_class(*quality),
                title_case(quality.as_str(), " ")
            )?;
            writeln!(f, "<p>{}</p>", escape_html(reason))?;
            writeln!(f, "</section>")
        }
        Topology::Mesh(report) => write_mesh(f, report),
    }
}

fn write_mesh(f: &mut impl Write, report: &MeshReport) -> fmt::Result {
    let assessment = &report.coverage.assessment;
    let health_class = match assessment.classification {
        TopologyClass::ExcellentTopology | TopologyClass::GoodTopology => "excellent",
        TopologyClass::BasicTopology => "good",
        TopologyClass::TopologyIssues => "warning",
    };
    let brand = report
        .brand_name
        .clone()
        .unwrap_or_else(|| title_case(&report.brand, " "));
    let bands: Vec<String> = report.bands.iter().map(|b| b.to_string()).collect();

    writeln!(f, "<section class=\"card mesh-topology\">")?;
    writeln!(f, "<h3>Mesh Network Topology</h3>")?;
    writeln!(f, "<div class=\"topology-stats\">")?;
    row(f, "Brand", &escape_html(&brand))?;
    row(
        f,
        "Type",
        &format!("{} Mesh", title_case(report.mesh_type.as_str(), "-")),
    )?;
    row(f, "Nodes", &report.total_nodes().to_string())?;
    row(f, "Radios", &report.total_radios.to_string())?;
    row(f, "Bands", &bands.join(", "))?;
    writeln!(f, "</div>")?;

    writeln!(f, "<div class=\"topology-health {}\">", health_class)?;
    writeln!(
        f,
        "<div class=\"health-score\">Health Score: {}/100</div>",
        assessment.quality_score
    )?;
    writeln!(
        f,
        "<div class=\"health-status\">{}</div>",
        title_case(assessment.classification.as_str(), " ")
    )?;
    writeln!(f, "<p>{}</p>", escape_html(&assessment.summary))?;
    writeln!(f, "</div>")?;

    write_zones(f, report)?;

    if !report.coverage.issues.is_empty() {
        writeln!(f, "<div class=\"coverage-issues\">")?;
        writeln!(f, "<h4>Coverage Issues</h4>")?;
        for issue in &report.coverage.issues {
            writeln!(
                f,
                "<div class=\"issue-item severity-{}\"><strong>{}</strong><p>{}</p><p class=\"hint\">{}</p></div>",
                issue.severity.as_str(),
                escape_html(&issue.details),
                escape_html(&issue.impact),
                escape_html(&issue.location)
            )?;
        }
        writeln!(f, "</div>")?;
    }

    if !assessment.recommendations.is_empty() {
        writeln!(f, "<div class=\"placement\">")?;
        writeln!(f, "<h4>Placement Recommendations</h4>")?;
        writeln!(f, "<ol>")?;
        for rec in &assessment.recommendations {
            writeln!(f, "<li>{}</li>", escape_html(rec))?;
        }
        writeln!(f, "</ol>")?;
        writeln!(f, "</div>")?;
    }

    write_venn(f, report)?;

    writeln!(f, "<div class=\"mesh-nodes\">")?;
    writeln!(f, "<h4>Detected Mesh Nodes</h4>")?;
    writeln!(f, "<div class=\"nodes-grid\">")?;
    for node in &report.nodes {
        writeln!(f, "<div class=\"node-card {}\">", node_class(node.strongest_signal))?;
        writeln!(
            f,
            "<div class=\"node-header\"><h5>Node {}</h5><span>{}dBm</span></div>",
            escape_html(&node.base_mac),
            node.strongest_signal
        )?;
        for radio in &node.radios {
            writeln!(
                f,
                "<div class=\"radio-info\"><span>{}</span><span>{}</span><span>{}dBm</span></div>",
                radio.bssid, radio.band, radio.signal
            )?;
        }
        writeln!(f, "</div>")?;
    }
    writeln!(f, "</div>")?;
    writeln!(f, "</div>")?;

    writeln!(
        f,
        "<p class=\"hint\">Only shows nodes visible from your current location. Distant or weak nodes may not appear.</p>"
    )?;
    writeln!(f, "</section>")
}

fn write_zones(f: &mut impl Write, report: &MeshReport) -> fmt::Result {
    let zones = &report.coverage.zones;
    let rows = [
        ("Primary", "excellent", &zones.primary),
        ("Secondary", "good", &zones.secondary),
        ("Tertiary", "fair", &zones.tertiary),
        ("Fringe", "poor", &zones.fringe),
    ];

    writeln!(f, "<div class=\"coverage-zones\">")?;
    writeln!(f, "<h4>Coverage Zones</h4>")?;
    writeln!(f, "<div class=\"zones-grid\">")?;
    for (name, class, signals) in rows {
        let range = match (signals.iter().min(), signals.iter().max()) {
            (Some(min), Some(max)) if min != max => format!("{} to {}dBm", min, max),
            (Some(min), Some(_)) => format!("{}dBm", min),
            _ => continue,
        };
        writeln!(
            f,
            "<div class=\"zone-card {}\"><span class=\"zone-name\">{}</span><span>{} nodes</span><span>{}</span></div>",
            class,
            name,
            signals.len(),
            range
        )?;
    }
    writeln!(f, "</div>")?;
    writeln!(f, "</div>")
}

fn write_venn(f: &mut impl Write, report: &MeshReport) -> fmt::Result {
    let venn = &report.venn;
    let quality_class = match venn.assessment.quality {
        OverlapQuality::Excellent => "excellent",
        OverlapQuality::Good => "good",
        OverlapQuality::Fair => "warning",
        OverlapQuality::Poor | OverlapQuality::SingleNode => "poor",
    };

    writeln!(f, "<div class=\"venn-analysis\">")?;
    writeln!(f, "<h4>Venn Overlap Analysis</h4>")?;
    writeln!(
        f,
        "<div class=\"venn-quality {}\"><span class=\"quality-score\">{}/100</span> Overlap Quality</div>",
        quality_class, venn.assessment.score
    )?;
    writeln!(f, "<p>{}</p>", escape_html(&venn.assessment.description))?;

    if venn.nodes.len() >= 2 {
        writeln!(f, "<div class=\"venn-svg-wrapper\">")?;
        f.write_str(&venn_svg(&venn.nodes))?;
        writeln!(f, "</div>")?;
    }

    if venn.overlaps.is_empty() {
        writeln!(
            f,
            "<p class=\"no-overlaps\">No significant overlaps detected - potential coverage gaps</p>"
        )?;
    } else {
        writeln!(f, "<div class=\"overlap-list\">")?;
        for overlap in venn.overlaps.iter().take(SHOWN_OVERLAPS) {
            writeln!(
                f,
                "<div class=\"overlap-item\"><span>{} &harr; {}</span><span>{:.1}%</span></div>",
                escape_html(&overlap.first_label),
                escape_html(&overlap.second_label),
                overlap.percentage
            )?;
        }
        writeln!(f, "</div>")?;
    }
    writeln!(f, "</div>")
}

fn circle_fill(signal: i32) -> (&'static str, &'static str) {
    match node_class(signal) {
        "excellent" => ("#4ade80", "0.6"),
        "good" => ("#fbbf24", "0.5"),
        "fair" => ("#fb923c", "0.4"),
        _ => ("#f87171", "0.3"),
    }
}

/// Radius for the report's circles, stronger nodes drawn larger
fn circle_radius(signal: i32) -> i32 {
    ((100 + signal) * 2).clamp(30, 80)
}

/// Up to four node circles on a fixed 2x2 layout
pub fn venn_svg(nodes: &[VennNode]) -> String {
    if nodes.len() < 2 {
        return "<p>Need at least 2 nodes for Venn diagram</p>\n".to_string();
    }

    // Slot centres in tenths of the canvas
    let slots = [(3, 4), (7, 4), (3, 7), (7, 7)];
    let circles: Vec<(i32, i32, &VennNode)> = nodes
        .iter()
        .take(MAX_SVG_NODES)
        .zip(slots)
        .map(|(node, (x, y))| (SVG_WIDTH * x / 10, SVG_HEIGHT * y / 10, node))
        .collect();

    let mut svg = String::new();
    // Writing to a String cannot fail
    let _ = write_svg(&mut svg, &circles);
    svg
}

fn write_svg(svg: &mut String, circles: &[(i32, i32, &VennNode)]) -> fmt::Result {
    writeln!(
        svg,
        "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">",
        w = SVG_WIDTH,
        h = SVG_HEIGHT
    )?;
    writeln!(
        svg,
        "<rect width=\"{}\" height=\"{}\" fill=\"#f8f9fa\" stroke=\"#ddd\" stroke-width=\"1\" rx=\"10\"/>",
        SVG_WIDTH, SVG_HEIGHT
    )?;
    writeln!(
        svg,
        "<text x=\"{}\" y=\"25\" class=\"svg-title\">Mesh Node Coverage Overlap</text>",
        SVG_WIDTH / 2
    )?;

    for (x, y, node) in circles {
        let (color, opacity) = circle_fill(node.signal);
        writeln!(
            svg,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" fill-opacity=\"{}\" stroke=\"#333\" stroke-width=\"2\"/>",
            x,
            y,
            circle_radius(node.signal),
            color,
            opacity
        )?;
    }
    for (x, y, node) in circles {
        writeln!(
            svg,
            "<text x=\"{}\" y=\"{}\" class=\"node-label\">{}</text>",
            x,
            y - 5,
            escape_html(&node.label)
        )?;
        writeln!(
            svg,
            "<text x=\"{}\" y=\"{}\" class=\"signal-label\">{}dBm</text>",
            x,
            y + 10,
            node.signal
        )?;
    }

    writeln!(svg, "<g transform=\"translate(10, {})\" class=\"legend\">", SVG_HEIGHT - 60)?;
    writeln!(svg, "<text x=\"0\" y=\"0\">Circle size = signal strength</text>")?;
    writeln!(svg, "<text x=\"0\" y=\"15\">Overlapping areas = good coverage</text>")?;
    writeln!(
        svg,
        "<text x=\"0\" y=\"30\">Colors: Green=Excellent, Yellow=Good, Orange=Fair, Red=Poor</text>"
    )?;
    writeln!(svg, "</g>")?;
    writeln!(svg, "</svg>")
}

fn rating_class(rating: Rating) -> &'static str {
    match rating {
        Rating::Excellent => "excellent",
        Rating::Good => "good",
        Rating::Fair => "fair",
        Rating::Poor => "poor",
    }
}

fn write_alternatives(
    f: &mut impl Write,
    alternatives: &[Alternative],
    recommendation: Option<&Recommendation>,
) -> fmt::Result {
    writeln!(f, "<section class=\"card alternatives\">")?;
    writeln!(f, "<h3>Connection Alternatives</h3>")?;

    let Some(recommendation) = recommendation.filter(|_| !alternatives.is_empty()) else {
        writeln!(
            f,
            "<p class=\"no-alternatives\">Current connection appears optimal or no alternatives available</p>"
        )?;
        return writeln!(f, "</section>");
    };

    match recommendation {
        Recommendation::Switch {
            target,
            signal_improvement,
            priority,
            rating,
            ..
        } => {
            writeln!(f, "<div class=\"recommendation-banner excellent\">")?;
            writeln!(f, "<h4>Performance Optimization Opportunity</h4>")?;
            writeln!(f, "<p><strong>Recommended BSSID:</strong> {}</p>", target)?;
            writeln!(
                f,
                "<p><strong>Expected Improvement:</strong> {:+}dB signal strength</p>",
                signal_improvement
            )?;
            writeln!(f, "<p><strong>Quality Rating:</strong> {}</p>", rating)?;
            writeln!(f, "<p><strong>Priority:</strong> {}</p>", priority)?;
            writeln!(f, "</div>")?;
        }
        Recommendation::StayConnected { .. } => {
            writeln!(f, "<div class=\"recommendation-banner good\">")?;
            writeln!(f, "<h4>Current Connection is Optimal</h4>")?;
            writeln!(
                f,
                "<p>Your current connection is performing well among available options.</p>"
            )?;
            writeln!(f, "</div>")?;
        }
    }

    writeln!(f, "<div class=\"alternatives-grid\">")?;
    for (i, alt) in alternatives.iter().take(SHOWN_ALTERNATIVES).enumerate() {
        writeln!(f, "<div class=\"alternative-card {}\">", rating_class(alt.rating))?;
        writeln!(
            f,
            "<div class=\"alt-header\"><span>Option {}</span><span class=\"alt-rating\">{}</span></div>",
            i + 1,
            alt.rating
        )?;
        row(f, "BSSID", &alt.bssid.to_string())?;
        row(f, "Signal", &format!("{}dBm ({})", alt.signal, alt.band))?;
        row(f, "Difference", &format!("{:+}dB", alt.signal_diff))?;
        row(f, "Score", &format!("{:.0}", alt.score))?;
        writeln!(f, "<ul>")?;
        for reason in &alt.reasons {
            writeln!(f, "<li>{}</li>", escape_html(reason))?;
        }
        writeln!(f, "</ul>")?;
        writeln!(f, "</div>")?;
    }
    writeln!(f, "</div>")?;
    writeln!(f, "</section>")
}

fn write_history(f: &mut impl Write, history: Option<&BssidHistory>) -> fmt::Result {
    writeln!(f, "<section class=\"card historical\">")?;
    writeln!(f, "<h3>Historical Performance</h3>")?;

    match history {
        None => {
            writeln!(f, "<p>No historical data available for current connection</p>")?;
            writeln!(f, "<p class=\"hint\">Data will be collected over time for performance tracking</p>")?;
        }
        Some(h) => {
            writeln!(
                f,
                "<div class=\"stability-score {}\"><span class=\"stability-number\">{:.1}/100</span> Stability Score</div>",
                stability_rating(h.stability_score),
                h.stability_score
            )?;
            writeln!(f, "<div class=\"history-stats\">")?;
            row(f, "Success Rate", &format!("{:.1}%", h.success_rate()))?;
            row(f, "Total Connections", &h.total_connections.to_string())?;
            row(f, "Avg Signal", &format!("{:.0}dBm", h.avg_signal))?;
            row(f, "Disconnects", &h.disconnects.to_string())?;
            row(f, "Auth Failures", &h.auth_failures.to_string())?;
            writeln!(f, "</div>")?;
        }
    }
    writeln!(f, "</section>")
}

fn write_problems(f: &mut impl Write, patterns: &ConnectionPatterns) -> fmt::Result {
    let total = patterns.issue_count();
    if total == 0 {
        writeln!(f, "<section class=\"card problems\">")?;
        writeln!(f, "<h3>Problem Detection</h3>")?;
        writeln!(f, "<p>No problematic patterns detected in recent activity</p>")?;
        return writeln!(f, "</section>");
    }

    writeln!(f, "<section class=\"card problems warning\">")?;
    writeln!(f, "<h3>Problem Detection</h3>")?;
    writeln!(
        f,
        "<div class=\"count\"><span class=\"count-number\">{}</span> Issues Detected</div>",
        total
    )?;
    let counts = [
        ("Roaming Loops", patterns.roaming_loops.len()),
        ("Auth Failure Clusters", patterns.auth_failure_clusters.len()),
        ("Rapid Reconnects", patterns.rapid_reconnects.len()),
    ];
    for (label, n) in counts.into_iter().filter(|(_, n)| *n > 0) {
        writeln!(f, "<div class=\"problem-item\">{}: {}</div>", label, n)?;
    }
    writeln!(f, "</section>")
}

fn write_roaming(f: &mut impl Write, roaming: Option<&RoamingMeasurement>) -> fmt::Result {
    writeln!(f, "<section class=\"card roaming\">")?;
    writeln!(f, "<h3>Roaming Analysis</h3>")?;

    let Some(roaming) = roaming else {
        writeln!(f, "<p>No roaming analysis data available</p>")?;
        writeln!(
            f,
            "<p class=\"hint\">Run with --roaming-test to generate roaming performance data</p>"
        )?;
        return writeln!(f, "</section>");
    };

    let s = &roaming.summary;
    row(f, "Seamless Roams", &s.seamless_roams.to_string())?;
    row(f, "Dropped Connections", &s.dropped_roams.to_string())?;
    row(f, "Micro-dropouts", &s.micro_dropouts.to_string())?;
    if let Some(avg) = s.avg_downtime_secs {
        row(f, "Average Downtime", &format!("{:.3}s", avg))?;
    }
    if let Some(longest) = s.longest_downtime_secs {
        row(f, "Longest Downtime", &format!("{:.3}s", longest))?;
    }

    if !roaming.transitions.is_empty() {
        writeln!(f, "<table class=\"transitions\">")?;
        writeln!(f, "<tr><th>From</th><th>To</th><th>Count</th><th>Avg change</th></tr>")?;
        for t in &roaming.transitions {
            writeln!(
                f,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:+.1}dBm</td></tr>",
                t.from, t.to, t.count, t.avg_signal_change
            )?;
        }
        writeln!(f, "</table>")?;
    }
    writeln!(f, "</section>")
}

fn write_power(f: &mut impl Write, power: Option<&PowerReport>) -> fmt::Result {
    let Some(power) = power.filter(|p| p.total() > 0) else {
        writeln!(f, "<section class=\"card power\">")?;
        writeln!(f, "<h3>Power Management</h3>")?;
        writeln!(f, "<p>No power management issues detected</p>")?;
        return writeln!(f, "</section>");
    };

    let counts = power.severity_counts();
    writeln!(f, "<section class=\"card power warning\">")?;
    writeln!(f, "<h3>Power Management Issues</h3>")?;
    writeln!(
        f,
        "<div class=\"count\"><span class=\"count-number\">{}</span> Issues Found</div>",
        power.total()
    )?;
    writeln!(f, "<div class=\"severity-breakdown\">")?;
    for severity in [Severity::High, Severity::Medium, Severity::Low] {
        writeln!(
            f,
            "<div class=\"severity-item severity-{s}\"><span>{}</span> {s}</div>",
            counts.get(&severity).copied().unwrap_or(0),
            s = severity.as_str()
        )?;
    }
    writeln!(f, "</div>")?;

    writeln!(f, "<ul class=\"power-issues\">")?;
    for findings in &power.categories {
        for issue in &findings.issues {
            writeln!(
                f,
                "<li class=\"severity-{}\"><strong>{}:</strong> {} <span class=\"hint\">{}</span></li>",
                issue.severity.as_str(),
                findings.category,
                escape_html(&issue.issue),
                escape_html(&issue.impact)
            )?;
        }
    }
    writeln!(f, "</ul>")?;
    writeln!(
        f,
        "<p class=\"hint\">These issues require manual configuration changes; see the generated fix script</p>"
    )?;
    writeln!(f, "</section>")
}

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Ubuntu, sans-serif;
  background: linear-gradient(135deg, #1a1a2e 0%, #16213e 50%, #0f3460 100%);
  color: #fff; min-height: 100vh; line-height: 1.6;
}
.container { max-width: 1400px; margin: 0 auto; padding: 20px; }
.main-header, .card {
  background: rgba(255, 255, 255, 0.05);
  border: 1px solid rgba(255, 255, 255, 0.1);
  border-radius: 20px;
}
.main-header { padding: 30px; margin-bottom: 30px; text-align: center; }
.main-header h1 { font-size: 2.2rem; color: #00d4ff; }
.main-header h2 { font-size: 1.4rem; color: #7b68ee; }
.timestamp, .hint { color: rgba(255, 255, 255, 0.7); font-size: 0.9rem; }
.content-grid {
  display: grid; grid-template-columns: repeat(auto-fit, minmax(400px, 1fr));
  gap: 25px; margin-bottom: 30px;
}
.card { padding: 25px; }
.card h3 { font-size: 1.3rem; margin-bottom: 20px; color: #00d4ff; }
.card h4 { margin: 18px 0 10px; color: #7b68ee; }
.detail-row, .zone-card, .overlap-item, .radio-info, .alt-header {
  display: flex; justify-content: space-between; gap: 10px;
  padding: 8px 14px; margin-bottom: 6px;
  background: rgba(255, 255, 255, 0.03); border-radius: 10px;
}
.label { color: rgba(255, 255, 255, 0.8); }
.value { font-weight: 600; }
.signal-excellent { color: #4ade80; }
.signal-good { color: #fbbf24; }
.signal-fair { color: #fb923c; }
.signal-poor { color: #f87171; }
.excellent { border-left: 4px solid #4ade80; }
.good { border-left: 4px solid #fbbf24; }
.warning, .fair { border-left: 4px solid #fb923c; }
.poor { border-left: 4px solid #f87171; }
.severity-high { color: #f87171; }
.severity-medium { color: #fb923c; }
.severity-low { color: #fbbf24; }
.severity-info { color: #94a3b8; }
.count-number, .quality-score, .stability-number { font-size: 2rem; font-weight: 700; }
.nodes-grid, .alternatives-grid, .zones-grid {
  display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 12px;
}
.node-card, .alternative-card, .recommendation-banner, .topology-health {
  padding: 12px; border-radius: 12px; background: rgba(255, 255, 255, 0.04); margin: 10px 0;
}
.venn-svg-wrapper { text-align: center; margin: 15px 0; }
.venn-svg-wrapper svg { max-width: 100%; height: auto; }
svg text { font-family: Arial, sans-serif; text-anchor: middle; }
svg .svg-title { font-size: 14px; font-weight: bold; fill: #333; }
svg .node-label { font-size: 12px; fill: #333; }
svg .signal-label { font-size: 10px; fill: #666; }
svg .legend text { font-size: 10px; fill: #666; text-anchor: start; }
table.transitions { width: 100%; border-collapse: collapse; margin-top: 12px; }
table.transitions th, table.transitions td { padding: 6px; text-align: left; }
ul, ol { padding-left: 20px; }
.report-footer { text-align: center; color: rgba(255, 255, 255, 0.6); padding: 20px; }
"#;
