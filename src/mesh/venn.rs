//! Coverage circles and pairwise overlap for mesh nodes
//!
//! Each node becomes a circle on a 0..100 grid whose radius grows with
//! signal strength. Grid distances are scaled by [`DISTANCE_SCALE`] before
//! being compared with radii.

use super::MeshNode;
use crate::wifi::Band;
use serde::Serialize;
use std::f64::consts::PI;

const MIN_RADIUS: u32 = 40;
const MAX_RADIUS: u32 = 120;
const COVERAGE_MULTIPLIER: f64 = 3.5;
const DISTANCE_SCALE: f64 = 4.0;
/// Overlaps at or below this percentage are not recorded
const SIGNIFICANT_OVERLAP: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VennNode {
    pub id: String,
    pub label: String,
    pub signal: i32,
    pub radios: usize,
    pub bands: Vec<Band>,
    pub position: Position,
    pub radius: u32,
    pub coverage_area: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeOverlap {
    pub first: usize,
    pub second: usize,
    pub first_label: String,
    pub second_label: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapQuality {
    SingleNode,
    Excellent,
    Good,
    Fair,
    Poor,
}

impl OverlapQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapQuality::SingleNode => "single_node",
            OverlapQuality::Excellent => "excellent",
            OverlapQuality::Good => "good",
            OverlapQuality::Fair => "fair",
            OverlapQuality::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlapAssessment {
    pub quality: OverlapQuality,
    pub score: u32,
    pub description: String,
    pub overlap_ratio: String,
    pub avg_overlap_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VennDiagram {
    pub nodes: Vec<VennNode>,
    pub overlaps: Vec<NodeOverlap>,
    pub total_coverage: f64,
    pub avg_overlap: f64,
    pub assessment: OverlapAssessment,
}

/// Circle radius for a signal level
pub fn coverage_radius(signal: i32) -> u32 {
    let normalized = f64::from((signal + 100).max(0));
    let radius = (f64::from(MIN_RADIUS) + normalized * COVERAGE_MULTIPLIER) as u32;
    radius.clamp(MIN_RADIUS, MAX_RADIUS)
}

/// Indices of `signals` ordered strongest first, ties in original order
fn rank_by_signal(signals: &[i32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..signals.len()).collect();
    order.sort_by(|&a, &b| signals[b].cmp(&signals[a]));
    order
}

fn place_by_rank(signals: &[i32], slots: &[Position]) -> Vec<Position> {
    let mut positions = vec![Position::new(50.0, 50.0); signals.len()];
    for (slot, index) in slots.iter().zip(rank_by_signal(signals)) {
        positions[index] = *slot;
    }
    positions
}

/// Grid positions for nodes, one per signal in input order
pub fn layout(signals: &[i32]) -> Vec<Position> {
    match signals.len() {
        0 => Vec::new(),
        1 => vec![Position::new(50.0, 50.0)],
        2 => {
            let order = rank_by_signal(signals);
            let r1 = coverage_radius(signals[order[0]]);
            let r2 = coverage_radius(signals[order[1]]);
            let spacing = f64::from(r1 + r2) * 0.6;
            vec![
                Position::new(40.0, 50.0),
                Position::new(40.0 + spacing / DISTANCE_SCALE, 50.0),
            ]
        }
        3 => place_by_rank(
            signals,
            &[
                Position::new(35.0, 35.0),
                Position::new(65.0, 35.0),
                Position::new(50.0, 65.0),
            ],
        ),
        4 => place_by_rank(
            signals,
            &[
                Position::new(40.0, 35.0),
                Position::new(60.0, 35.0),
                Position::new(35.0, 55.0),
                Position::new(65.0, 55.0),
            ],
        ),
        n => (0..n)
            .map(|i| {
                if i == 0 {
                    return Position::new(50.0, 50.0);
                }
                let step = (i - 1) as f64;
                let angle = step * (2.0 * PI / (n - 1) as f64);
                let offset = 15.0 + step * 5.0;
                Position::new(
                    (50.0 + offset * angle.cos()).clamp(20.0, 80.0),
                    (50.0 + offset * angle.sin()).clamp(20.0, 80.0),
                )
            })
            .collect(),
    }
}

/// Overlap of two coverage circles as a percentage of their union
///
/// A circle fully inside the other reports the area ratio instead.
pub fn overlap_percentage(a: Position, r1: u32, b: Position, r2: u32) -> f64 {
    let d = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt() * DISTANCE_SCALE;
    let (r1, r2) = (f64::from(r1), f64::from(r2));

    if d >= r1 + r2 {
        return 0.0;
    }

    if d <= (r1 - r2).abs() {
        let small = r1.min(r2);
        let large = r1.max(r2);
        return (PI * small * small) / (PI * large * large) * 100.0;
    }

    let alpha = ((d * d + r1 * r1 - r2 * r2) / (2.0 * d * r1)).clamp(-1.0, 1.0);
    let beta = ((d * d + r2 * r2 - r1 * r1) / (2.0 * d * r2)).clamp(-1.0, 1.0);
    let kite = ((-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2)).max(0.0);

    let intersection = r1 * r1 * alpha.acos() + r2 * r2 * beta.acos() - 0.5 * kite.sqrt();
    let union = PI * r1 * r1 + PI * r2 * r2 - intersection;

    if union > 0.0 {
        intersection / union * 100.0
    } else {
        0.0
    }
}

/// Label shown for a node: the tail of its base MAC
pub fn node_label(base_mac: &str) -> String {
    let chars: Vec<char> = base_mac.chars().collect();
    let start = chars.len().saturating_sub(8);
    format!("Node {}", chars[start..].iter().collect::<String>())
}

pub fn generate(nodes: &[MeshNode]) -> VennDiagram {
    let signals: Vec<i32> = nodes.iter().map(|n| n.strongest_signal).collect();
    let positions = layout(&signals);

    let venn_nodes: Vec<VennNode> = nodes
        .iter()
        .zip(positions)
        .map(|(node, position)| {
            let radius = coverage_radius(node.strongest_signal);
            VennNode {
                id: node.base_mac.clone(),
                label: node_label(&node.base_mac),
                signal: node.strongest_signal,
                radios: node.radios.len(),
                bands: node.bands.iter().copied().collect(),
                position,
                radius,
                coverage_area: PI * f64::from(radius).powi(2),
            }
        })
        .collect();

    let mut overlaps = Vec::new();
    for i in 0..venn_nodes.len() {
        for j in (i + 1)..venn_nodes.len() {
            let (a, b) = (&venn_nodes[i], &venn_nodes[j]);
            let percentage = overlap_percentage(a.position, a.radius, b.position, b.radius);
            if percentage > SIGNIFICANT_OVERLAP {
                overlaps.push(NodeOverlap {
                    first: i,
                    second: j,
                    first_label: a.label.clone(),
                    second_label: b.label.clone(),
                    percentage,
                });
            }
        }
    }

    let total_coverage = venn_nodes.iter().map(|n| n.coverage_area).sum();
    let avg_overlap = if overlaps.is_empty() {
        0.0
    } else {
        overlaps.iter().map(|o| o.percentage).sum::<f64>() / overlaps.len() as f64
    };
    let assessment = assess_overlap(venn_nodes.len(), &overlaps, avg_overlap);

    VennDiagram {
        nodes: venn_nodes,
        overlaps,
        total_coverage,
        avg_overlap,
        assessment,
    }
}

/// Score how well node coverage overlaps
pub fn assess_overlap(
    node_count: usize,
    overlaps: &[NodeOverlap],
    avg_overlap: f64,
) -> OverlapAssessment {
    if node_count < 2 {
        return OverlapAssessment {
            quality: OverlapQuality::SingleNode,
            score: 100,
            description: "Single node - no overlap analysis needed".to_string(),
            overlap_ratio: "0/0".to_string(),
            avg_overlap_pct: 0.0,
        };
    }

    let high = overlaps.iter().filter(|o| o.percentage > 30.0).count();
    let medium = overlaps
        .iter()
        .filter(|o| (15.0..=30.0).contains(&o.percentage))
        .count();

    let possible = node_count * (node_count - 1) / 2;
    let actual = overlaps.len();
    let ratio = actual as f64 / possible as f64;

    let mut score = if ratio > 0.7 {
        30
    } else if ratio > 0.5 {
        20
    } else {
        10
    };

    if high > 0 && medium > 0 {
        score += 25;
    } else if medium > 0 {
        score += 15;
    }

    if actual > 0 {
        score += 20;
    }

    if avg_overlap > 25.0 {
        score += 25;
    } else if avg_overlap > 15.0 {
        score += 15;
    } else if avg_overlap > 5.0 {
        score += 10;
    }

    let (quality, description) = if score >= 80 {
        (
            OverlapQuality::Excellent,
            format!(
                "Excellent mesh overlap - {}/{} node pairs overlapping",
                actual, possible
            ),
        )
    } else if score >= 60 {
        (
            OverlapQuality::Good,
            format!(
                "Good mesh overlap - {}/{} node pairs with coverage overlap",
                actual, possible
            ),
        )
    } else if score >= 40 {
        (
            OverlapQuality::Fair,
            "Fair mesh overlap - some coverage gaps possible".to_string(),
        )
    } else {
        (
            OverlapQuality::Poor,
            "Poor mesh overlap - significant coverage gaps likely".to_string(),
        )
    };

    OverlapAssessment {
        quality,
        score: score.min(100),
        description,
        overlap_ratio: format!("{}/{}", actual, possible),
        avg_overlap_pct: (avg_overlap * 10.0).round() / 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn node(base: &str, signal: i32) -> MeshNode {
        MeshNode {
            base_mac: base.to_string(),
            radios: Vec::new(),
            bands: BTreeSet::from([Band::FiveGhz]),
            strongest_signal: signal,
        }
    }

    fn overlap(percentage: f64) -> NodeOverlap {
        NodeOverlap {
            first: 0,
            second: 1,
            first_label: "a".to_string(),
            second_label: "b".to_string(),
            percentage,
        }
    }

    #[test]
    fn test_coverage_radius() {
        assert_eq!(coverage_radius(-100), 40);
        assert_eq!(coverage_radius(-120), 40);
        assert_eq!(coverage_radius(-90), 75);
        assert_eq!(coverage_radius(-85), 92);
        assert_eq!(coverage_radius(-80), 110);
        assert_eq!(coverage_radius(-50), 120);
    }

    #[test]
    fn test_layout_two_nodes() {
        let positions = layout(&[-60, -80]);
        assert_eq!(positions[0], Position::new(40.0, 50.0));
        // (120 + 110) * 0.6 / 4
        assert!((positions[1].x - 74.5).abs() < 1e-9);
    }

    #[test]
    fn test_layout_three_nodes_by_rank() {
        let positions = layout(&[-70, -40, -55]);
        assert_eq!(positions[1], Position::new(35.0, 35.0));
        assert_eq!(positions[2], Position::new(65.0, 35.0));
        assert_eq!(positions[0], Position::new(50.0, 65.0));
    }

    #[test]
    fn test_layout_many_nodes_stays_in_bounds() {
        let positions = layout(&[-40, -50, -60, -70, -80, -85, -90]);
        assert_eq!(positions.len(), 7);
        assert_eq!(positions[0], Position::new(50.0, 50.0));
        for p in &positions {
            assert!((20.0..=80.0).contains(&p.x));
            assert!((20.0..=80.0).contains(&p.y));
        }
    }

    #[test]
    fn test_overlap_disjoint_and_contained() {
        let a = Position::new(0.0, 0.0);
        let far = Position::new(100.0, 0.0);
        assert_eq!(overlap_percentage(a, 120, far, 120), 0.0);

        assert!((overlap_percentage(a, 80, a, 80) - 100.0).abs() < 1e-9);
        assert!((overlap_percentage(a, 120, a, 60) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_partial() {
        let a = Position::new(40.0, 50.0);
        let b = Position::new(74.5, 50.0);
        let pct = overlap_percentage(a, 120, b, 110);
        assert!(pct > 5.0 && pct < 100.0, "got {}", pct);
    }

    #[test]
    fn test_node_label() {
        assert_eq!(node_label("A0:21:B7:12:34"), "Node B7:12:34");
        assert_eq!(node_label("AB"), "Node AB");
    }

    #[test]
    fn test_generate_two_close_nodes() {
        let nodes = vec![node("A0:21:B7:00:01", -45), node("A0:21:B7:00:02", -55)];
        let diagram = generate(&nodes);
        assert_eq!(diagram.nodes.len(), 2);
        assert_eq!(diagram.overlaps.len(), 1);
        assert_eq!(diagram.nodes[0].label, "Node B7:00:01");
        assert!(diagram.avg_overlap > 5.0);
        assert!((diagram.total_coverage - 2.0 * PI * 120.0 * 120.0).abs() < 1e-6);
    }

    #[test]
    fn test_assess_single_node() {
        let assessment = assess_overlap(1, &[], 0.0);
        assert_eq!(assessment.quality, OverlapQuality::SingleNode);
        assert_eq!(assessment.score, 100);
    }

    #[test]
    fn test_assess_one_high_overlap() {
        // ratio 1/1 (+30), no medium (+0), some overlap (+20), avg > 25 (+25)
        let assessment = assess_overlap(2, &[overlap(40.0)], 40.0);
        assert_eq!(assessment.score, 75);
        assert_eq!(assessment.quality, OverlapQuality::Good);
        assert_eq!(assessment.overlap_ratio, "1/1");
    }

    #[test]
    fn test_assess_balanced_overlaps() {
        // 2 of 3 pairs (+20), high + medium (+25), overlaps (+20), avg 27.5 (+25)
        let assessment = assess_overlap(3, &[overlap(35.0), overlap(20.0)], 27.5);
        assert_eq!(assessment.score, 90);
        assert_eq!(assessment.quality, OverlapQuality::Excellent);
        assert_eq!(
            assessment.description,
            "Excellent mesh overlap - 2/3 node pairs overlapping"
        );
    }

    #[test]
    fn test_assess_no_overlaps() {
        let assessment = assess_overlap(3, &[], 0.0);
        assert_eq!(assessment.score, 10);
        assert_eq!(assessment.quality, OverlapQuality::Poor);
    }
}
