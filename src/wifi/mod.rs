//! WiFi data types: BSSIDs, bands, signal quality and scan results
//!
//! Everything in here is built from the text output of `iw`, `nmcli` and
//! `/proc/net/wireless`; see [`parse`] for the parsers.

pub mod parse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use parse::{
    parse_link, parse_link_bssid, parse_power_save, parse_proc_wireless, parse_scan,
    parse_wifi_device,
};

/// Signal value used when a tool reports no signal
pub const NO_SIGNAL: i32 = -100;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WifiError {
    #[error("Invalid BSSID: {0}")]
    InvalidBssid(String),
}

/// MAC address of a single access point radio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Bssid([u8; 6]);

impl Bssid {
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Vendor prefix (first three octets), e.g. `A0:21:B7`
    pub fn oui(&self) -> String {
        format!("{:02X}:{:02X}:{:02X}", self.0[0], self.0[1], self.0[2])
    }

    /// First five octets. Radios of the same physical node share this.
    pub fn base(&self) -> String {
        format!(
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4]
        )
    }
}

impl FromStr for Bssid {
    type Err = WifiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 17 || s.matches(':').count() != 5 {
            return Err(WifiError::InvalidBssid(s.to_string()));
        }

        let mut octets = [0u8; 6];
        for (slot, part) in octets.iter_mut().zip(s.split(':')) {
            if part.len() != 2 {
                return Err(WifiError::InvalidBssid(s.to_string()));
            }
            *slot = u8::from_str_radix(part, 16)
                .map_err(|_| WifiError::InvalidBssid(s.to_string()))?;
        }
        Ok(Self(octets))
    }
}

impl TryFrom<String> for Bssid {
    type Error = WifiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Bssid> for String {
    fn from(bssid: Bssid) -> Self {
        bssid.to_string()
    }
}

impl fmt::Display for Bssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

/// Frequency band of a radio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Band {
    TwoGhz,
    FiveGhz,
    SixGhz,
    Other(u32),
}

impl Band {
    pub fn from_freq(freq: u32) -> Self {
        match freq {
            2400..=2500 => Band::TwoGhz,
            5000..=5999 => Band::FiveGhz,
            6000..=7125 => Band::SixGhz,
            other => Band::Other(other),
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Band::TwoGhz => f.write_str("2.4GHz"),
            Band::FiveGhz => f.write_str("5GHz"),
            Band::SixGhz => f.write_str("6GHz"),
            Band::Other(freq) => write!(f, "{}MHz", freq),
        }
    }
}

impl Serialize for Band {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Quality of the current connection, classified by dBm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl SignalQuality {
    pub fn from_dbm(signal: i32) -> Self {
        if signal > -50 {
            SignalQuality::Excellent
        } else if signal > -60 {
            SignalQuality::Good
        } else if signal > -75 {
            SignalQuality::Fair
        } else {
            SignalQuality::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalQuality::Excellent => "excellent",
            SignalQuality::Good => "good",
            SignalQuality::Fair => "fair",
            SignalQuality::Poor => "poor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SignalQuality::Excellent => "Excellent signal strength - very close to access point",
            SignalQuality::Good => "Good signal strength - reliable connection",
            SignalQuality::Fair => "Fair signal - may experience slower speeds",
            SignalQuality::Poor => "Poor signal - connection may be unstable",
        }
    }
}

impl fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One access point seen in a scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessPoint {
    pub ssid: String,
    pub bssid: Bssid,
    pub freq: u32,
    pub signal: i32,
    pub last_seen: DateTime<Utc>,
}

impl AccessPoint {
    pub fn band(&self) -> Band {
        Band::from_freq(self.freq)
    }
}

/// The link the interface is currently associated with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkInfo {
    pub ssid: String,
    pub bssid: Bssid,
    pub freq: u32,
    pub signal: i32,
}

impl LinkInfo {
    pub fn band(&self) -> Band {
        Band::from_freq(self.freq)
    }

    pub fn quality(&self) -> SignalQuality {
        SignalQuality::from_dbm(self.signal)
    }
}
