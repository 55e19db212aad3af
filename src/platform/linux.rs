//! Linux implementation backed by iw, nmcli, iwconfig and lspci

use super::{truncate_output, PlatformError, WirelessTools};
use crate::logs::PERFORMANCE;
use std::process::Command;
use std::time::Instant;
use tracing::debug;

pub struct LinuxWirelessTools;

impl LinuxWirelessTools {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<String, PlatformError> {
        let command = format!("{} {}", program, args.join(" "));
        let start = Instant::now();

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| PlatformError::Spawn {
                command: command.clone(),
                source: e,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(
            target: PERFORMANCE,
            "{} finished in {:.3}s (success: {}, {} bytes)",
            command,
            start.elapsed().as_secs_f64(),
            output.status.success(),
            stdout.len()
        );
        debug!(target: PERFORMANCE, "{} output: {}", command, truncate_output(&stdout));

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PlatformError::CommandFailed {
                command,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(stdout)
    }
}

impl Default for LinuxWirelessTools {
    fn default() -> Self {
        Self::new()
    }
}

impl WirelessTools for LinuxWirelessTools {
    fn link(&self, interface: &str) -> Result<String, PlatformError> {
        self.run("iw", &["dev", interface, "link"])
    }

    fn scan(&self, interface: &str) -> Result<String, PlatformError> {
        // `scan flush` needs root; fall back to a plain scan
        match self.run("iw", &["dev", interface, "scan", "flush"]) {
            Ok(output) if !output.trim().is_empty() => Ok(output),
            Ok(_) => self.run("iw", &["dev", interface, "scan"]),
            Err(e) => {
                debug!("Flushing scan failed, retrying without flush: {}", e);
                self.run("iw", &["dev", interface, "scan"])
            }
        }
    }

    fn power_save(&self, interface: &str) -> Result<String, PlatformError> {
        self.run("iw", &["dev", interface, "get", "power_save"])
    }

    fn iwconfig(&self, interface: &str) -> Result<String, PlatformError> {
        self.run("iwconfig", &[interface])
    }

    fn device_status(&self) -> Result<String, PlatformError> {
        self.run(
            "nmcli",
            &["-t", "--escape", "no", "-f", "DEVICE,TYPE", "device", "status"],
        )
    }

    fn pci_devices(&self) -> Result<String, PlatformError> {
        self.run("lspci", &["-k"])
    }
}
