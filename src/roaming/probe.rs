//! Fast link sampling for high-frequency polling

use super::{LinkSampler, LinkState};
use crate::platform::WirelessTools;
use crate::wifi::{parse_link, parse_link_bssid, parse_proc_wireless, NO_SIGNAL};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::trace;

pub const PROC_NET_WIRELESS: &str = "/proc/net/wireless";

/// Reads the signal from `/proc/net/wireless` and the BSSID from `iw link`
pub struct LinkProbe {
    tools: Arc<dyn WirelessTools>,
    interface: String,
    proc_path: PathBuf,
}

impl LinkProbe {
    pub fn new(tools: Arc<dyn WirelessTools>, interface: impl Into<String>) -> Self {
        Self::with_proc_path(tools, interface, PROC_NET_WIRELESS)
    }

    pub fn with_proc_path(
        tools: Arc<dyn WirelessTools>,
        interface: impl Into<String>,
        proc_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tools,
            interface: interface.into(),
            proc_path: proc_path.into(),
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Full `iw link` parse, used when the proc file can't be read
    fn sample_from_link(&self) -> LinkState {
        let output = match self.tools.link(&self.interface) {
            Ok(output) => output,
            Err(e) => {
                trace!("iw link failed: {}", e);
                return LinkState::Unknown;
            }
        };

        if output.contains("Not connected") {
            LinkState::Disconnected
        } else if output.contains("Connected to") {
            LinkState::Connected {
                bssid: parse_link_bssid(&output),
                signal: parse_link(&output).map_or(NO_SIGNAL, |link| link.signal),
            }
        } else {
            LinkState::Unknown
        }
    }
}

impl LinkSampler for LinkProbe {
    fn sample(&self) -> LinkState {
        let contents = match fs::read_to_string(&self.proc_path) {
            Ok(contents) => contents,
            Err(e) => {
                trace!("{} unreadable: {}", self.proc_path.display(), e);
                return self.sample_from_link();
            }
        };

        let Some(signal) = parse_proc_wireless(&contents, &self.interface) else {
            return LinkState::Disconnected;
        };

        match self.tools.link(&self.interface) {
            Ok(output) => match parse_link_bssid(&output) {
                Some(bssid) => LinkState::Connected {
                    bssid: Some(bssid),
                    signal,
                },
                None => LinkState::Disconnected,
            },
            Err(e) => {
                trace!("iw link failed: {}", e);
                LinkState::Unknown
            }
        }
    }
}
