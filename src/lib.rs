//! Mesh Analyzer - WiFi mesh diagnostics for Linux
//!
//! Reads the current association and scan results from `iw`, groups the
//! radios of the current SSID into mesh nodes, scores alternative BSSIDs
//! against stored connection history, and looks for roaming dropouts and
//! power management settings that destabilize the link.
//!
//! # Architecture
//!
//! - `platform`: `iw`/`nmcli`/`lspci` access behind the `WirelessTools` trait
//! - `wifi`: BSSIDs, bands and the `iw` output parsers
//! - `mesh`: topology, coverage zones and the node overlap diagram
//! - `history`: per-BSSID history, connection events and problem patterns
//! - `advisor`: alternative scoring and the switch recommendation
//! - `roaming`: roam, disconnect and micro-dropout detection
//! - `power`: power management detective and fix script
//! - `analyzer`: ties the above into snapshots and the monitor loop
//! - `report`, `archive`, `logs`: console/HTML output, zip archives, session logs
//! - `config`, `paths`: TOML configuration and the data directory

pub mod advisor;
pub mod analyzer;
pub mod archive;
pub mod config;
pub mod history;
pub mod logs;
pub mod mesh;
pub mod paths;
pub mod platform;
pub mod power;
pub mod report;
pub mod roaming;
pub mod severity;
pub mod wifi;

pub use analyzer::{AnalysisSnapshot, Analyzer};
pub use config::Config;
pub use paths::DataDir;
