//! Mesh topology analysis
//!
//! Groups the access points broadcasting the current SSID into physical
//! nodes, then judges how well those nodes cover the space around the
//! client:
//!
//! - radios sharing the first five MAC octets belong to one node
//! - node signal levels are bucketed into coverage zones
//! - gaps between neighbouring node signals hint at dead zones
//! - [`venn`] estimates how much node coverage overlaps

pub mod oui;
pub mod venn;

use crate::severity::Severity;
use crate::wifi::{AccessPoint, Band, Bssid};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

pub use venn::VennDiagram;

#[derive(Debug, Clone, Serialize)]
pub struct Radio {
    pub bssid: Bssid,
    pub freq: u32,
    pub signal: i32,
    pub band: Band,
}

/// A physical mesh unit with one or more radios
#[derive(Debug, Clone, Serialize)]
pub struct MeshNode {
    pub base_mac: String,
    pub radios: Vec<Radio>,
    pub bands: BTreeSet<Band>,
    pub strongest_signal: i32,
}

impl MeshNode {
    fn new(ap: &AccessPoint) -> Self {
        Self {
            base_mac: ap.bssid.base(),
            radios: Vec::new(),
            bands: BTreeSet::new(),
            strongest_signal: ap.signal,
        }
    }

    fn add_radio(&mut self, ap: &AccessPoint) {
        let band = ap.band();
        self.radios.push(Radio {
            bssid: ap.bssid,
            freq: ap.freq,
            signal: ap.signal,
            band,
        });
        self.bands.insert(band);
        self.strongest_signal = self.strongest_signal.max(ap.signal);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshType {
    SingleBand,
    DualBand,
    TriBand,
}

impl MeshType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeshType::SingleBand => "single_band",
            MeshType::DualBand => "dual_band",
            MeshType::TriBand => "tri_band",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PlacementQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementQuality::Excellent => "excellent",
            PlacementQuality::Good => "good",
            PlacementQuality::Fair => "fair",
            PlacementQuality::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CoverageZones {
    pub primary: Vec<i32>,
    pub secondary: Vec<i32>,
    pub tertiary: Vec<i32>,
    pub fringe: Vec<i32>,
}

impl CoverageZones {
    pub fn classify(signals: &[i32]) -> Self {
        let mut zones = Self::default();
        for &signal in signals {
            if signal > -50 {
                zones.primary.push(signal);
            } else if signal > -65 {
                zones.secondary.push(signal);
            } else if signal > -80 {
                zones.tertiary.push(signal);
            } else {
                zones.fringe.push(signal);
            }
        }
        zones
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    LargeCoverageGap,
    MissingIntermediateCoverage,
    NodeClustering,
    IsolatedDistantNode,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub details: String,
    pub impact: String,
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyClass {
    TopologyIssues,
    BasicTopology,
    GoodTopology,
    ExcellentTopology,
}

impl TopologyClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopologyClass::TopologyIssues => "topology_issues",
            TopologyClass::BasicTopology => "basic_topology",
            TopologyClass::GoodTopology => "good_topology",
            TopologyClass::ExcellentTopology => "excellent_topology",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    Poor,
    Uneven,
    Good,
    Excellent,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopologyAssessment {
    pub classification: TopologyClass,
    pub summary: String,
    pub node_assessment: String,
    pub distribution: Distribution,
    pub distribution_analysis: String,
    pub quality_score: i32,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageAnalysis {
    pub sorted_signals: Vec<i32>,
    pub signal_gaps: Vec<i32>,
    pub max_gap: i32,
    pub avg_gap: f64,
    pub zones: CoverageZones,
    pub issues: Vec<CoverageIssue>,
    pub assessment: TopologyAssessment,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeshReport {
    /// Brand key from the OUI table, or `unknown`
    pub brand: String,
    pub brand_name: Option<String>,
    pub mesh_type: MeshType,
    pub nodes: Vec<MeshNode>,
    pub total_radios: usize,
    pub radios_per_node: f64,
    pub bands: Vec<Band>,
    pub signal_range: i32,
    pub coverage: CoverageAnalysis,
    pub venn: VennDiagram,
}

impl MeshReport {
    pub fn total_nodes(&self) -> usize {
        self.nodes.len()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApSummary {
    pub bssid: Bssid,
    pub freq: u32,
    pub signal: i32,
    pub band: Band,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Topology {
    Empty,
    SingleAp {
        signal: i32,
        quality: PlacementQuality,
        reason: String,
    },
    MultipleAps {
        strongest_signal: i32,
        quality: PlacementQuality,
        reason: String,
        aps: Vec<ApSummary>,
    },
    Mesh(Box<MeshReport>),
}

/// Classify the network formed by `aps` (all broadcasting one SSID)
///
/// A base MAC with several radios is a mesh node. A single-radio base joins
/// the mesh only when it shares a vendor prefix with such a node, so lone
/// routers from one vendor stay separate APs.
pub fn analyze_topology(aps: &[AccessPoint]) -> Topology {
    match aps {
        [] => return Topology::Empty,
        [ap] => return single_ap(ap.signal),
        _ => {}
    }

    let mut base_counts: HashMap<String, usize> = HashMap::new();
    for ap in aps {
        *base_counts.entry(ap.bssid.base()).or_default() += 1;
    }
    let multi_radio_ouis: BTreeSet<String> = aps
        .iter()
        .filter(|ap| base_counts.get(&ap.bssid.base()).is_some_and(|&n| n > 1))
        .map(|ap| ap.bssid.oui())
        .collect();

    let mut nodes: Vec<MeshNode> = Vec::new();
    for ap in aps {
        let base = ap.bssid.base();
        if let Some(node) = nodes.iter_mut().find(|n| n.base_mac == base) {
            node.add_radio(ap);
            continue;
        }

        let shares_base = base_counts.get(&base).copied().unwrap_or(0) > 1;
        let shares_vendor = multi_radio_ouis.contains(&ap.bssid.oui());
        if shares_base || shares_vendor {
            let mut node = MeshNode::new(ap);
            node.add_radio(ap);
            nodes.push(node);
        }
    }

    if nodes.is_empty() {
        multiple_aps(aps)
    } else {
        Topology::Mesh(Box::new(analyze_mesh(nodes, aps)))
    }
}

fn single_ap(signal: i32) -> Topology {
    let (quality, reason) = if signal > -50 {
        (
            PlacementQuality::Excellent,
            format!("Strong signal ({}dBm) indicates good placement", signal),
        )
    } else if signal > -60 {
        (
            PlacementQuality::Good,
            format!("Good signal strength ({}dBm)", signal),
        )
    } else if signal > -75 {
        (
            PlacementQuality::Fair,
            format!(
                "Moderate signal ({}dBm) - consider moving closer or improving placement",
                signal
            ),
        )
    } else {
        (
            PlacementQuality::Poor,
            format!(
                "Weak signal ({}dBm) - poor placement or too far from AP",
                signal
            ),
        )
    };
    Topology::SingleAp {
        signal,
        quality,
        reason,
    }
}

fn multiple_aps(aps: &[AccessPoint]) -> Topology {
    let strongest = aps.iter().map(|ap| ap.signal).max().unwrap_or(crate::wifi::NO_SIGNAL);
    let (quality, reason) = if strongest > -50 {
        (
            PlacementQuality::Excellent,
            format!(
                "Strong signals available ({}dBm) from multiple APs",
                strongest
            ),
        )
    } else if strongest > -60 {
        (
            PlacementQuality::Good,
            format!(
                "Good signal options ({}dBm) from {} APs",
                strongest,
                aps.len()
            ),
        )
    } else if strongest > -75 {
        (
            PlacementQuality::Fair,
            format!(
                "Moderate signals ({}dBm) - consider moving closer to APs",
                strongest
            ),
        )
    } else {
        (
            PlacementQuality::Poor,
            format!(
                "Weak signals from all APs ({}dBm) - poor coverage area",
                strongest
            ),
        )
    };

    Topology::MultipleAps {
        strongest_signal: strongest,
        quality,
        reason,
        aps: aps
            .iter()
            .map(|ap| ApSummary {
                bssid: ap.bssid,
                freq: ap.freq,
                signal: ap.signal,
                band: ap.band(),
            })
            .collect(),
    }
}

fn analyze_mesh(nodes: Vec<MeshNode>, aps: &[AccessPoint]) -> MeshReport {
    let brand = oui::identify_brand(aps.iter().map(|ap| &ap.bssid));

    let bands: BTreeSet<Band> = nodes.iter().flat_map(|n| n.bands.iter().copied()).collect();
    let mesh_type = match bands.len() {
        n if n >= 3 => MeshType::TriBand,
        2 => MeshType::DualBand,
        _ => MeshType::SingleBand,
    };

    let mut signals: Vec<i32> = nodes.iter().map(|n| n.strongest_signal).collect();
    signals.sort_by(|a, b| b.cmp(a));
    let signal_range = match (signals.first(), signals.last()) {
        (Some(max), Some(min)) => max - min,
        _ => 0,
    };

    let coverage = analyze_coverage(signals);
    let venn = venn::generate(&nodes);

    MeshReport {
        brand: brand.map_or_else(|| "unknown".to_string(), |b| b.key.to_string()),
        brand_name: brand.map(|b| b.name.to_string()),
        mesh_type,
        total_radios: aps.len(),
        radios_per_node: aps.len() as f64 / nodes.len() as f64,
        bands: bands.into_iter().collect(),
        signal_range,
        coverage,
        venn,
        nodes,
    }
}

/// Rough location of a node judging by its signal level
pub fn distance_estimate(signal: i32) -> &'static str {
    if signal > -40 {
        "very close (same room)"
    } else if signal > -50 {
        "close (adjacent room)"
    } else if signal > -65 {
        "medium range (different floor/far room)"
    } else if signal > -80 {
        "extended range (distant area)"
    } else {
        "maximum range (basement/garage/far areas)"
    }
}

/// Zone, gap and issue analysis over node signals sorted strongest first
pub fn analyze_coverage(sorted_signals: Vec<i32>) -> CoverageAnalysis {
    let signal_gaps: Vec<i32> = sorted_signals.windows(2).map(|w| w[0] - w[1]).collect();
    let max_gap = signal_gaps.iter().copied().max().unwrap_or(0);
    let avg_gap = if signal_gaps.is_empty() {
        0.0
    } else {
        signal_gaps.iter().sum::<i32>() as f64 / signal_gaps.len() as f64
    };

    let zones = CoverageZones::classify(&sorted_signals);
    let issues = detect_issues(&sorted_signals, &signal_gaps, &zones);
    let assessment = assess(sorted_signals.len(), max_gap, &zones, &issues);

    CoverageAnalysis {
        sorted_signals,
        signal_gaps,
        max_gap,
        avg_gap,
        zones,
        issues,
        assessment,
    }
}

fn detect_issues(signals: &[i32], gaps: &[i32], zones: &CoverageZones) -> Vec<CoverageIssue> {
    let mut issues = Vec::new();

    for (i, &gap) in gaps.iter().enumerate() {
        if gap > 25 {
            issues.push(CoverageIssue {
                kind: IssueKind::LargeCoverageGap,
                severity: if gap > 35 {
                    Severity::High
                } else {
                    Severity::Medium
                },
                details: format!(
                    "{}dB gap between node {} ({}dBm) and node {} ({}dBm)",
                    gap,
                    i + 1,
                    signals[i],
                    i + 2,
                    signals[i + 1]
                ),
                impact: "Potential dead zone or weak coverage area".to_string(),
                location: format!(
                    "Between {} and {}",
                    distance_estimate(signals[i]),
                    distance_estimate(signals[i + 1])
                ),
            });
        }
    }

    if zones.secondary.is_empty() && !zones.primary.is_empty() && !zones.tertiary.is_empty() {
        issues.push(CoverageIssue {
            kind: IssueKind::MissingIntermediateCoverage,
            severity: Severity::Medium,
            details: "No medium-range coverage detected".to_string(),
            impact: "May have coverage gaps between close and distant areas".to_string(),
            location: "Medium-range areas (adjacent rooms/floors)".to_string(),
        });
    }

    if zones.primary.len() as f64 > signals.len() as f64 * 0.6 {
        issues.push(CoverageIssue {
            kind: IssueKind::NodeClustering,
            severity: Severity::Low,
            details: format!(
                "{} of {} nodes in primary zone",
                zones.primary.len(),
                signals.len()
            ),
            impact: "Possible over-concentration of nodes in small area".to_string(),
            location: "Primary coverage area".to_string(),
        });
    }

    if let Some(&weakest) = signals.iter().min() {
        if !zones.fringe.is_empty() && zones.tertiary.is_empty() {
            issues.push(CoverageIssue {
                kind: IssueKind::IsolatedDistantNode,
                severity: Severity::Medium,
                details: format!(
                    "Distant node at {}dBm without intermediate coverage",
                    weakest
                ),
                impact: "Isolated coverage with potential gap to main mesh".to_string(),
                location: format!("~{}", distance_estimate(weakest)),
            });
        }
    }

    issues
}

fn assess(
    node_count: usize,
    max_gap: i32,
    zones: &CoverageZones,
    issues: &[CoverageIssue],
) -> TopologyAssessment {
    let mut score: i32 = 100;
    for issue in issues {
        score -= match issue.severity {
            Severity::High => 25,
            Severity::Medium => 15,
            Severity::Low => 5,
            Severity::Info => 0,
        };
    }
    if !zones.secondary.is_empty() {
        score += 10;
    }
    if max_gap < 20 {
        score += 15;
    }

    let node_assessment = match node_count {
        n if n >= 4 => format!("{} nodes detected - excellent for comprehensive coverage", n),
        3 => "3 nodes detected - good for most home sizes".to_string(),
        2 => "2 nodes detected - basic mesh configuration".to_string(),
        n => format!("{} node detected - not a true mesh", n),
    };

    let (distribution, distribution_analysis) = if max_gap > 30 {
        (
            Distribution::Poor,
            format!(
                "Large signal gaps detected (max {}dB) - potential coverage holes",
                max_gap
            ),
        )
    } else if max_gap > 20 {
        (
            Distribution::Uneven,
            format!(
                "Moderate signal gaps (max {}dB) - some coverage irregularities",
                max_gap
            ),
        )
    } else if max_gap > 10 {
        (
            Distribution::Good,
            format!(
                "Well-spaced nodes (max gap {}dB) - good coverage continuity",
                max_gap
            ),
        )
    } else {
        (
            Distribution::Excellent,
            format!(
                "Smooth signal transitions (max gap {}dB) - excellent spatial distribution",
                max_gap
            ),
        )
    };

    let has_high = issues.iter().any(|i| i.severity == Severity::High);
    let has_medium = issues.iter().any(|i| i.severity == Severity::Medium);

    let (classification, summary) = if has_high {
        (
            TopologyClass::TopologyIssues,
            format!("{} but significant coverage gaps detected", node_assessment),
        )
    } else if has_medium && node_count < 3 {
        (
            TopologyClass::BasicTopology,
            format!("{} with some coverage limitations", node_assessment),
        )
    } else if has_medium {
        (
            TopologyClass::GoodTopology,
            format!("{} with minor coverage irregularities", node_assessment),
        )
    } else if node_count >= 4 && score > 85 {
        (
            TopologyClass::ExcellentTopology,
            format!("{} with excellent spatial distribution", node_assessment),
        )
    } else if node_count >= 3 && score > 75 {
        (
            TopologyClass::GoodTopology,
            format!("{} with good spatial coverage", node_assessment),
        )
    } else {
        (
            TopologyClass::BasicTopology,
            format!("{} - adequate but could be optimized", node_assessment),
        )
    };

    let mut recommendations: Vec<String> = Vec::new();
    for issue in issues {
        let text = match issue.kind {
            IssueKind::LargeCoverageGap => format!(
                "Consider adding a node in {} to eliminate coverage gap",
                issue.location
            ),
            IssueKind::MissingIntermediateCoverage => {
                "Add intermediate nodes for smoother coverage transitions".to_string()
            }
            IssueKind::NodeClustering => {
                "Consider relocating some nodes for better spatial distribution".to_string()
            }
            IssueKind::IsolatedDistantNode => {
                "Add intermediate nodes to bridge coverage to distant areas".to_string()
            }
        };
        if !recommendations.contains(&text) {
            recommendations.push(text);
        }
    }
    if recommendations.is_empty() {
        recommendations.push(if score > 90 {
            "Excellent mesh topology - no improvements needed".to_string()
        } else {
            "Good mesh topology - minor optimizations possible".to_string()
        });
    }

    TopologyAssessment {
        classification,
        summary,
        node_assessment,
        distribution,
        distribution_analysis,
        quality_score: score.clamp(0, 100),
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ap(bssid: &str, freq: u32, signal: i32) -> AccessPoint {
        AccessPoint {
            ssid: "HomeMesh".to_string(),
            bssid: bssid.parse().unwrap(),
            freq,
            signal,
            last_seen: Utc::now(),
        }
    }

    #[test]
    fn test_empty_and_single() {
        assert!(matches!(analyze_topology(&[]), Topology::Empty));

        match analyze_topology(&[ap("10:00:00:00:00:01", 5180, -55)]) {
            Topology::SingleAp {
                quality, reason, ..
            } => {
                assert_eq!(quality, PlacementQuality::Good);
                assert_eq!(reason, "Good signal strength (-55dBm)");
            }
            other => panic!("unexpected topology {:?}", other),
        }
    }

    #[test]
    fn test_unrelated_aps_are_multiple() {
        let aps = [
            ap("10:00:00:00:00:01", 2412, -62),
            ap("20:00:00:00:00:01", 5180, -70),
        ];
        match analyze_topology(&aps) {
            Topology::MultipleAps {
                strongest_signal,
                quality,
                aps,
                ..
            } => {
                assert_eq!(strongest_signal, -62);
                assert_eq!(quality, PlacementQuality::Fair);
                assert_eq!(aps.len(), 2);
            }
            other => panic!("unexpected topology {:?}", other),
        }
    }

    #[test]
    fn test_radios_group_into_nodes() {
        let aps = [
            ap("68:1D:A0:00:01:10", 2437, -48),
            ap("68:1D:A0:00:01:11", 5180, -45),
            ap("68:1D:A0:00:02:10", 5745, -62),
            ap("68:1D:A0:00:02:11", 6115, -66),
        ];
        let Topology::Mesh(report) = analyze_topology(&aps) else {
            panic!("expected mesh");
        };
        assert_eq!(report.brand, "eero");
        assert_eq!(report.total_nodes(), 2);
        assert_eq!(report.total_radios, 4);
        assert_eq!(report.mesh_type, MeshType::TriBand);
        assert_eq!(report.nodes[0].radios.len(), 2);
        assert_eq!(report.nodes[0].strongest_signal, -45);
        assert_eq!(report.nodes[1].strongest_signal, -62);
        assert_eq!(report.signal_range, 17);
        assert!((report.radios_per_node - 2.0).abs() < f64::EPSILON);
        let bands: Vec<String> = report.bands.iter().map(|b| b.to_string()).collect();
        assert_eq!(bands, vec!["2.4GHz", "5GHz", "6GHz"]);
    }

    #[test]
    fn test_shared_vendor_prefix_extends_mesh() {
        // A single-radio base joins the dual-radio node from the same vendor
        let aps = [
            ap("F8:BB:BF:10:00:01", 5180, -50),
            ap("F8:BB:BF:10:00:02", 2412, -55),
            ap("F8:BB:BF:20:00:01", 5180, -70),
            ap("30:00:00:00:00:01", 2412, -80),
        ];
        let Topology::Mesh(report) = analyze_topology(&aps) else {
            panic!("expected mesh");
        };
        assert_eq!(report.total_nodes(), 2);
        assert_eq!(report.total_radios, 4);
        assert_eq!(report.brand, "eero");
    }

    #[test]
    fn test_same_vendor_single_radios_are_separate_aps() {
        let aps = [
            ap("A0:21:B7:11:11:11", 2412, -50),
            ap("A0:21:B7:22:22:22", 5180, -60),
        ];
        assert!(matches!(
            analyze_topology(&aps),
            Topology::MultipleAps { .. }
        ));
    }

    #[test]
    fn test_zones_classification() {
        let zones = CoverageZones::classify(&[-45, -60, -70, -85]);
        assert_eq!(zones.primary, vec![-45]);
        assert_eq!(zones.secondary, vec![-60]);
        assert_eq!(zones.tertiary, vec![-70]);
        assert_eq!(zones.fringe, vec![-85]);
    }

    #[test]
    fn test_large_gap_is_high_severity() {
        let coverage = analyze_coverage(vec![-40, -80]);
        assert_eq!(coverage.max_gap, 40);
        let gap = coverage
            .issues
            .iter()
            .find(|i| i.kind == IssueKind::LargeCoverageGap)
            .unwrap();
        assert_eq!(gap.severity, Severity::High);
        assert_eq!(
            gap.location,
            "Between close (adjacent room) and maximum range (basement/garage/far areas)"
        );
        assert_eq!(
            coverage.assessment.classification,
            TopologyClass::TopologyIssues
        );
    }

    #[test]
    fn test_missing_intermediate_coverage() {
        let coverage = analyze_coverage(vec![-45, -70, -72]);
        assert!(coverage
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::MissingIntermediateCoverage));
        // medium issue with three nodes
        assert_eq!(
            coverage.assessment.classification,
            TopologyClass::GoodTopology
        );
        assert_eq!(
            coverage.assessment.recommendations,
            vec!["Add intermediate nodes for smoother coverage transitions"]
        );
    }

    #[test]
    fn test_isolated_distant_node() {
        let coverage = analyze_coverage(vec![-55, -60, -82]);
        let issue = coverage
            .issues
            .iter()
            .find(|i| i.kind == IssueKind::IsolatedDistantNode)
            .unwrap();
        assert_eq!(issue.location, "~maximum range (basement/garage/far areas)");
    }

    #[test]
    fn test_excellent_topology() {
        // 4 nodes, smooth gaps, secondary present, no issues
        let coverage = analyze_coverage(vec![-52, -58, -63, -70]);
        assert!(coverage.issues.is_empty());
        assert_eq!(coverage.assessment.quality_score, 100);
        assert_eq!(
            coverage.assessment.classification,
            TopologyClass::ExcellentTopology
        );
        assert_eq!(coverage.assessment.distribution, Distribution::Excellent);
        assert_eq!(
            coverage.assessment.recommendations,
            vec!["Excellent mesh topology - no improvements needed"]
        );
    }

    #[test]
    fn test_single_node_coverage_has_no_gaps() {
        let coverage = analyze_coverage(vec![-60]);
        assert!(coverage.signal_gaps.is_empty());
        assert_eq!(coverage.max_gap, 0);
        assert_eq!(
            coverage.assessment.node_assessment,
            "1 node detected - not a true mesh"
        );
        assert_eq!(
            coverage.assessment.classification,
            TopologyClass::BasicTopology
        );
    }

    #[test]
    fn test_distance_estimate() {
        assert_eq!(distance_estimate(-35), "very close (same room)");
        assert_eq!(distance_estimate(-40), "close (adjacent room)");
        assert_eq!(distance_estimate(-79), "extended range (distant area)");
    }
}
