//! Parsers for `iw`, `nmcli` and `/proc/net/wireless` output
//!
//! All functions here are pure: they take captured command output and
//! never run anything themselves.

use super::{AccessPoint, Bssid, LinkInfo, NO_SIGNAL};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Parse `iw dev <if> link`
///
/// Returns `None` when the interface is not associated or the output is
/// missing the BSSID, SSID or frequency.
pub fn parse_link(output: &str) -> Option<LinkInfo> {
    if !output.contains("Connected to") {
        return None;
    }

    let mut bssid = None;
    let mut ssid = None;
    let mut freq = None;
    let mut signal = NO_SIGNAL;

    for line in output.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Connected to ") {
            bssid = rest.get(..17).and_then(|s| s.parse::<Bssid>().ok());
        } else if let Some(rest) = line.strip_prefix("SSID:") {
            ssid = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("freq:") {
            freq = leading_number(rest).map(|f| f as u32);
        } else if let Some(rest) = line.strip_prefix("signal:") {
            if let Some(value) = leading_number(rest) {
                signal = value as i32;
            }
        }
    }

    Some(LinkInfo {
        ssid: ssid?,
        bssid: bssid?,
        freq: freq?,
        signal,
    })
}

/// Just the BSSID from the `Connected to` line of `iw dev <if> link`
pub fn parse_link_bssid(output: &str) -> Option<Bssid> {
    output.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("Connected to ")?;
        rest.get(..17)?.parse().ok()
    })
}

#[derive(Default)]
struct ScanBlock {
    bssid: Option<Bssid>,
    ssid: Option<String>,
    freq: u32,
    signal: Option<i32>,
}

impl ScanBlock {
    fn finish(self, seen: DateTime<Utc>) -> Option<AccessPoint> {
        let bssid = self.bssid?;
        let ssid = self.ssid.filter(|s| !s.is_empty())?;
        Some(AccessPoint {
            ssid,
            bssid,
            freq: self.freq,
            signal: self.signal.unwrap_or(NO_SIGNAL),
            last_seen: seen,
        })
    }
}

/// Parse `iw dev <if> scan`
///
/// Hidden networks are dropped. When a BSSID shows up twice the later
/// block wins but keeps the position of the first.
pub fn parse_scan(output: &str, seen: DateTime<Utc>) -> Vec<AccessPoint> {
    let mut aps: Vec<AccessPoint> = Vec::new();
    let mut index: HashMap<Bssid, usize> = HashMap::new();
    let mut block: Option<ScanBlock> = None;

    let mut push = |block: ScanBlock, aps: &mut Vec<AccessPoint>| {
        if let Some(ap) = block.finish(seen) {
            match index.get(&ap.bssid) {
                Some(&i) => aps[i] = ap,
                None => {
                    index.insert(ap.bssid, aps.len());
                    aps.push(ap);
                }
            }
        }
    };

    for raw in output.lines() {
        // Block headers are unindented; "BSS Load:" inside a block is not
        if let Some(rest) = raw.strip_prefix("BSS ") {
            if let Some(done) = block.take() {
                push(done, &mut aps);
            }
            let bssid = rest.trim().get(..17).and_then(|s| s.parse::<Bssid>().ok());
            block = bssid.map(|b| ScanBlock {
                bssid: Some(b),
                ..ScanBlock::default()
            });
            continue;
        }

        let Some(current) = block.as_mut() else {
            continue;
        };
        let line = raw.trim();
        if let Some(rest) = line.strip_prefix("SSID:") {
            current.ssid = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("freq:") {
            if let Some(freq) = leading_number(rest) {
                current.freq = freq as u32;
            }
        } else if let Some(rest) = line.strip_prefix("signal:") {
            if let Some(signal) = leading_number(rest) {
                current.signal = Some(signal as i32);
            }
        }
    }

    if let Some(done) = block.take() {
        push(done, &mut aps);
    }

    aps
}

/// Signal level for `interface` from `/proc/net/wireless`
///
/// ```text
/// Inter-| sta-|   Quality        |   Discarded packets
///  face | tus | link level noise |  nwid  crypt   frag
/// wlp2s0: 0000   54.  -56.  -256        0      0      0
/// ```
pub fn parse_proc_wireless(contents: &str, interface: &str) -> Option<i32> {
    let prefix = format!("{}:", interface);
    contents
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(&prefix))
        .and_then(|line| line.split_whitespace().nth(3))
        .and_then(|level| level.trim_end_matches('.').parse::<f64>().ok())
        .map(|level| level as i32)
}

/// First wifi device in `nmcli -t --escape no -f DEVICE,TYPE device status`
pub fn parse_wifi_device(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (device, kind) = line.trim().split_once(':')?;
        (kind == "wifi" && !device.is_empty()).then(|| device.to_string())
    })
}

/// `Power save: on` / `Power save: off` from `iw dev <if> get power_save`
pub fn parse_power_save(output: &str) -> Option<bool> {
    output.lines().find_map(|line| {
        let value = line.trim().strip_prefix("Power save:")?.trim();
        match value {
            "on" => Some(true),
            "off" => Some(false),
            _ => None,
        }
    })
}

fn leading_number(s: &str) -> Option<f64> {
    s.split_whitespace().next()?.parse().ok()
}
