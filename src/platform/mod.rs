//! Platform-specific access to wireless tooling

#[cfg(target_os = "linux")]
pub mod linux;

use crate::wifi::parse_wifi_device;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("Command `{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
    #[error("No wireless interface found")]
    NoWifiInterface,
    #[error("Unsupported platform")]
    UnsupportedPlatform,
}

/// Raw output of the wireless tools the analyzer depends on
///
/// Implementations return stdout untouched; parsing lives in
/// [`crate::wifi::parse`].
pub trait WirelessTools: Send + Sync {
    /// `iw dev <if> link`
    fn link(&self, interface: &str) -> Result<String, PlatformError>;
    /// `iw dev <if> scan`, flushing cached results when possible
    fn scan(&self, interface: &str) -> Result<String, PlatformError>;
    /// `iw dev <if> get power_save`
    fn power_save(&self, interface: &str) -> Result<String, PlatformError>;
    /// `iwconfig <if>`
    fn iwconfig(&self, interface: &str) -> Result<String, PlatformError>;
    /// `nmcli -t --escape no -f DEVICE,TYPE device status`
    fn device_status(&self) -> Result<String, PlatformError>;
    /// `lspci -k`
    fn pci_devices(&self) -> Result<String, PlatformError>;
}

/// Get the wireless tools for the current platform
pub fn get_wireless_tools() -> Result<Box<dyn WirelessTools>, PlatformError> {
    #[cfg(target_os = "linux")]
    {
        Ok(Box::new(linux::LinuxWirelessTools::new()))
    }

    #[cfg(not(target_os = "linux"))]
    {
        Err(PlatformError::UnsupportedPlatform)
    }
}

/// Find the wireless interface to analyze
///
/// NetworkManager is asked first; otherwise the first interface under
/// `sys_class_net` with a `wireless` directory is used.
pub fn detect_interface(
    tools: &dyn WirelessTools,
    sys_class_net: &Path,
) -> Result<String, PlatformError> {
    match tools.device_status() {
        Ok(output) => {
            if let Some(device) = parse_wifi_device(&output) {
                debug!("Detected wifi interface {} via nmcli", device);
                return Ok(device);
            }
        }
        Err(e) => debug!("nmcli unavailable: {}", e),
    }

    if let Ok(entries) = fs::read_dir(sys_class_net) {
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().join("wireless").is_dir())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        if let Some(first) = names.into_iter().next() {
            debug!("Detected wifi interface {} via sysfs", first);
            return Ok(first);
        }
    }

    Err(PlatformError::NoWifiInterface)
}

/// Shorten long command output for the performance log
pub fn truncate_output(output: &str) -> String {
    let count = output.chars().count();
    if count <= 1000 {
        return output.to_string();
    }
    let head: String = output.chars().take(500).collect();
    let tail: String = output.chars().skip(count - 500).collect();
    format!("{}...[truncated]...{}", head, tail)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{PlatformError, WirelessTools};

    /// Canned command output; `None` fails the command
    #[derive(Default, Clone)]
    pub struct FakeTools {
        pub link: Option<String>,
        pub scan: Option<String>,
        pub power_save: Option<String>,
        pub iwconfig: Option<String>,
        pub device_status: Option<String>,
        pub pci_devices: Option<String>,
    }

    fn canned(value: &Option<String>, command: &str) -> Result<String, PlatformError> {
        value.clone().ok_or_else(|| PlatformError::CommandFailed {
            command: command.to_string(),
            stderr: "not available".to_string(),
        })
    }

    impl WirelessTools for FakeTools {
        fn link(&self, _interface: &str) -> Result<String, PlatformError> {
            canned(&self.link, "iw link")
        }

        fn scan(&self, _interface: &str) -> Result<String, PlatformError> {
            canned(&self.scan, "iw scan")
        }

        fn power_save(&self, _interface: &str) -> Result<String, PlatformError> {
            canned(&self.power_save, "iw get power_save")
        }

        fn iwconfig(&self, _interface: &str) -> Result<String, PlatformError> {
            canned(&self.iwconfig, "iwconfig")
        }

        fn device_status(&self) -> Result<String, PlatformError> {
            canned(&self.device_status, "nmcli")
        }

        fn pci_devices(&self) -> Result<String, PlatformError> {
            canned(&self.pci_devices, "lspci")
        }
    }
}
