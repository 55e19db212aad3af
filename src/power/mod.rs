//! Power management detective
//!
//! Looks for power saving settings that make a WiFi link drop or stall:
//! interface power save, USB autosuspend, PCIe ASPM, NetworkManager, TLP,
//! laptop-mode-tools, systemd sleep and driver module parameters.
//!
//! All files are read relative to a configurable root so the checks can run
//! against a fake sysfs tree.

mod drivers;

use crate::platform::WirelessTools;
use crate::severity::Severity;
use crate::wifi::parse_power_save;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

pub const DEFAULT_FIX_SCRIPT: &str = "/tmp/fix_wifi_power.sh";
const MONITOR_POLL: Duration = Duration::from_millis(500);

#[derive(Error, Debug)]
pub enum PowerError {
    #[error("Failed to write fix script {path}: {source}")]
    WriteScript { path: PathBuf, source: io::Error },
    #[error("Power monitor task failed: {0}")]
    Monitor(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerCategory {
    WifiPowerSave,
    UsbAutosuspend,
    PcieAspm,
    NetworkManager,
    Tlp,
    LaptopMode,
    SystemdSleep,
    DriverParams,
}

impl PowerCategory {
    pub fn title(&self) -> &'static str {
        match self {
            PowerCategory::WifiPowerSave => "WiFi Power Save",
            PowerCategory::UsbAutosuspend => "USB Autosuspend",
            PowerCategory::PcieAspm => "PCIe ASPM",
            PowerCategory::NetworkManager => "NetworkManager",
            PowerCategory::Tlp => "TLP",
            PowerCategory::LaptopMode => "Laptop Mode",
            PowerCategory::SystemdSleep => "Systemd Sleep",
            PowerCategory::DriverParams => "Driver Params",
        }
    }
}

impl fmt::Display for PowerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerIssue {
    pub severity: Severity,
    pub issue: String,
    pub impact: String,
    pub fix: Option<String>,
}

impl PowerIssue {
    fn new(severity: Severity, issue: impl Into<String>, impact: impl Into<String>) -> Self {
        Self {
            severity,
            issue: issue.into(),
            impact: impact.into(),
            fix: None,
        }
    }

    fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryFindings {
    pub category: PowerCategory,
    pub issues: Vec<PowerIssue>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PowerReport {
    pub categories: Vec<CategoryFindings>,
}

impl PowerReport {
    pub fn issues(&self) -> impl Iterator<Item = &PowerIssue> {
        self.categories.iter().flat_map(|c| c.issues.iter())
    }

    pub fn total(&self) -> usize {
        self.issues().count()
    }

    /// High severity issues
    pub fn critical(&self) -> usize {
        self.issues().filter(|i| i.severity == Severity::High).count()
    }

    pub fn severity_counts(&self) -> BTreeMap<Severity, usize> {
        let mut counts = BTreeMap::new();
        for issue in self.issues() {
            *counts.entry(issue.severity).or_insert(0) += 1;
        }
        counts
    }

    /// Fix commands for high and medium issues, in report order
    pub fn fixes(&self) -> Vec<&str> {
        self.issues()
            .filter(|i| i.severity >= Severity::Medium)
            .filter_map(|i| i.fix.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdapterBus {
    Usb,
    Pci,
    Unknown,
}

/// Runs every power check against one interface
pub struct PowerDetective {
    interface: String,
    root: PathBuf,
    tools: Arc<dyn WirelessTools>,
}

impl PowerDetective {
    pub fn new(tools: Arc<dyn WirelessTools>, interface: impl Into<String>) -> Self {
        Self::with_root(tools, interface, "/")
    }

    pub fn with_root(
        tools: Arc<dyn WirelessTools>,
        interface: impl Into<String>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            interface: interface.into(),
            root: root.into(),
            tools,
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    fn path(&self, absolute: &str) -> PathBuf {
        self.root.join(absolute.trim_start_matches('/'))
    }

    fn read(&self, absolute: &str) -> Option<String> {
        read_trimmed(&self.path(absolute))
    }

    fn device_dir(&self) -> String {
        format!("/sys/class/net/{}/device", self.interface)
    }

    /// Resolved sysfs device path of the adapter
    fn device_path(&self) -> Option<PathBuf> {
        fs::canonicalize(self.path(&self.device_dir())).ok()
    }

    fn canonical_root(&self) -> PathBuf {
        fs::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone())
    }

    fn adapter_bus(&self) -> AdapterBus {
        let root = self.canonical_root();
        let device = self.device_path().map(|path| {
            path.strip_prefix(&root)
                .map(|rel| rel.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        match device {
            Some(path) if path.contains("usb") => AdapterBus::Usb,
            Some(path) if path.contains("pci") => AdapterBus::Pci,
            _ => match self.tools.pci_devices() {
                Ok(out) if out.to_lowercase().contains("network controller") => AdapterBus::Pci,
                _ => AdapterBus::Unknown,
            },
        }
    }

    pub fn check_all(&self) -> PowerReport {
        let bus = self.adapter_bus();
        debug!("Adapter bus for {}: {:?}", self.interface, bus);

        let checks = [
            (PowerCategory::WifiPowerSave, self.check_wifi_power_save()),
            (PowerCategory::UsbAutosuspend, self.check_usb_autosuspend(bus)),
            (PowerCategory::PcieAspm, self.check_pcie_aspm(bus)),
            (PowerCategory::NetworkManager, self.check_network_manager()),
            (PowerCategory::Tlp, self.check_tlp()),
            (PowerCategory::LaptopMode, self.check_laptop_mode()),
            (PowerCategory::SystemdSleep, self.check_systemd_sleep()),
            (PowerCategory::DriverParams, self.check_driver_params()),
        ];

        let report = PowerReport {
            categories: checks
                .into_iter()
                .map(|(category, issues)| CategoryFindings { category, issues })
                .collect(),
        };
        info!(
            "Power check: {} issues ({} critical)",
            report.total(),
            report.critical()
        );
        report
    }

    fn check_wifi_power_save(&self) -> Vec<PowerIssue> {
        let mut issues = Vec::new();

        match self.tools.power_save(&self.interface) {
            Ok(out) if parse_power_save(&out) == Some(true) => issues.push(
                PowerIssue::new(
                    Severity::High,
                    "WiFi power saving is ON",
                    "Can cause periodic disconnects and latency spikes",
                )
                .with_fix(format!("iw dev {} set power_save off", self.interface)),
            ),
            Ok(_) => {}
            Err(e) => debug!("power_save query failed: {}", e),
        }

        match self.tools.iwconfig(&self.interface) {
            Ok(out) if out.contains("Power Management:on") => issues.push(
                PowerIssue::new(
                    Severity::High,
                    "iwconfig shows Power Management ON",
                    "Causes disconnects every 1-5 minutes",
                )
                .with_fix(format!("iwconfig {} power off", self.interface)),
            ),
            Ok(_) => {}
            Err(e) => debug!("iwconfig failed: {}", e),
        }

        issues
    }

    fn check_usb_autosuspend(&self, bus: AdapterBus) -> Vec<PowerIssue> {
        if bus != AdapterBus::Usb {
            return Vec::new();
        }
        let mut issues = vec![PowerIssue::new(
            Severity::Info,
            "USB WiFi adapter detected",
            "USB autosuspend can cause disconnects",
        )];

        const AUTOSUSPEND: &str = "/sys/module/usbcore/parameters/autosuspend";
        if let Some(value) = self.read(AUTOSUSPEND).filter(|v| v != "-1") {
            issues.push(
                PowerIssue::new(
                    Severity::High,
                    format!("USB autosuspend is enabled ({}s)", value),
                    "WiFi adapter suspends after inactivity",
                )
                .with_fix(format!("echo -1 > {}", AUTOSUSPEND)),
            );
        }

        // closest ancestor with power/control, inside the root
        let root = self.canonical_root();
        let control = self.device_path().and_then(|device| {
            device
                .ancestors()
                .skip(1)
                .take_while(|p| p.starts_with(&root))
                .map(|p| p.join("power/control"))
                .find(|p| p.is_file())
        });
        if let Some(control) = control.filter(|c| read_trimmed(c).as_deref() == Some("auto")) {
            issues.push(
                PowerIssue::new(
                    Severity::High,
                    "USB device power control set to auto",
                    "Device can sleep during use",
                )
                .with_fix(format!("echo on > {}", self.display_path(&control))),
            );
        }

        issues
    }

    fn check_pcie_aspm(&self, bus: AdapterBus) -> Vec<PowerIssue> {
        if bus != AdapterBus::Pci {
            return Vec::new();
        }
        let Some(policy) = self.read("/sys/module/pcie_aspm/parameters/policy") else {
            return Vec::new();
        };

        // the active policy is the bracketed one, e.g. "default [powersave]"
        let active = policy
            .split_whitespace()
            .find(|p| p.starts_with('['))
            .map(|p| p.trim_matches(|c| c == '[' || c == ']'))
            .unwrap_or(&policy);

        if active == "powersave" || active == "powersupersave" {
            vec![
                PowerIssue::new(
                    Severity::Medium,
                    format!("PCIe ASPM set to: {}", active),
                    "Can cause latency and brief disconnects",
                )
                .with_fix("echo performance > /sys/module/pcie_aspm/parameters/policy"),
            ]
        } else {
            Vec::new()
        }
    }

    fn check_network_manager(&self) -> Vec<PowerIssue> {
        let mut files: Vec<PathBuf> = fs::read_dir(self.path("/etc/NetworkManager/conf.d"))
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|e| e.path())
                    .filter(|p| p.extension().is_some_and(|ext| ext == "conf"))
                    .collect()
            })
            .unwrap_or_default();
        files.sort();
        files.push(self.path("/etc/NetworkManager/NetworkManager.conf"));

        files
            .iter()
            .filter(|path| {
                fs::read_to_string(path)
                    .ok()
                    .and_then(|content| config_value(&content, "wifi.powersave"))
                    .is_some_and(|v| v == "3")
            })
            .map(|path| {
                let shown = self.display_path(path);
                PowerIssue::new(
                    Severity::High,
                    "NetworkManager WiFi power saving enabled",
                    "Periodic disconnects and poor roaming",
                )
                .with_fix(format!(
                    "sed -i 's/^wifi.powersave *= *3/wifi.powersave = 2/' {}",
                    shown
                ))
            })
            .collect()
    }

    fn check_tlp(&self) -> Vec<PowerIssue> {
        let Some(content) = self.read("/etc/tlp.conf") else {
            return Vec::new();
        };
        let mut issues = Vec::new();

        if config_value(&content, "WIFI_PWR_ON_AC").as_deref() == Some("on") {
            issues.push(
                PowerIssue::new(
                    Severity::Medium,
                    "TLP WiFi power saving on AC",
                    "Power saving even when plugged in",
                )
                .with_fix("sed -i 's/^WIFI_PWR_ON_AC=.*/WIFI_PWR_ON_AC=off/' /etc/tlp.conf"),
            );
        }
        if config_value(&content, "USB_AUTOSUSPEND").as_deref() == Some("1") {
            issues.push(
                PowerIssue::new(
                    Severity::High,
                    "TLP USB autosuspend enabled",
                    "USB WiFi adapters will suspend",
                )
                .with_fix("sed -i 's/^USB_AUTOSUSPEND=.*/USB_AUTOSUSPEND=0/' /etc/tlp.conf"),
            );
        }

        issues
    }

    fn check_laptop_mode(&self) -> Vec<PowerIssue> {
        const CONF: &str = "/etc/laptop-mode/conf.d/wireless-power.conf";
        match self.read(CONF) {
            Some(content)
                if config_value(&content, "WIRELESS_AC_POWER_SAVING").as_deref() == Some("1") =>
            {
                vec![
                    PowerIssue::new(
                        Severity::Medium,
                        "Laptop-mode-tools WiFi power saving on AC",
                        "Unnecessary power saving when plugged in",
                    )
                    .with_fix(format!(
                        "sed -i 's/^WIRELESS_AC_POWER_SAVING=.*/WIRELESS_AC_POWER_SAVING=0/' {}",
                        CONF
                    )),
                ]
            }
            _ => Vec::new(),
        }
    }

    fn check_systemd_sleep(&self) -> Vec<PowerIssue> {
        match self.read("/etc/systemd/sleep.conf") {
            Some(content) => match config_value(&content, "HibernateDelaySec") {
                Some(delay) => vec![
                    PowerIssue::new(
                        Severity::Low,
                        format!("Hibernate delay configured ({})", delay),
                        "System may hibernate the network too quickly",
                    )
                    .with_fix("Increase HibernateDelaySec in /etc/systemd/sleep.conf"),
                ],
                None => Vec::new(),
            },
            None => Vec::new(),
        }
    }

    fn check_driver_params(&self) -> Vec<PowerIssue> {
        let link = self.path(&format!("{}/driver", self.device_dir()));
        let Ok(target) = fs::read_link(&link) else {
            return Vec::new();
        };
        let Some(driver) = target.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return Vec::new();
        };
        debug!("WiFi driver: {}", driver);

        let mut issues = drivers::check(self, &driver);
        issues.extend(drivers::check_generic(self));
        issues
    }

    /// `path` as it appears on the real system
    fn display_path(&self, path: &Path) -> String {
        let root = self.canonical_root();
        match path
            .strip_prefix(&root)
            .or_else(|_| path.strip_prefix(&self.root))
        {
            Ok(rel) => Path::new("/").join(rel).display().to_string(),
            Err(_) => path.display().to_string(),
        }
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

/// Value of the last active `key = value` line, unquoted
fn config_value(content: &str, key: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| line.split_once('='))
        .filter(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim().trim_matches('"').to_string())
        .last()
}

/// Shell script applying `fixes` in order
pub fn render_fix_script(fixes: &[&str]) -> String {
    let mut script = String::from(
        "#!/bin/bash\n# WiFi Power Management Fixes\n# Generated by mesh-analyzer\n\n\
         echo 'Applying WiFi power management fixes...'\n\n",
    );
    for fix in fixes {
        script.push_str(&format!("echo 'Running: {}'\n", fix.replace('\'', "'\\''")));
        script.push_str(fix);
        script.push_str("\n\n");
    }
    script.push_str(
        "echo 'Fixes applied! Restart WiFi or reboot to ensure all changes take effect.'\n",
    );
    script
}

/// Write the fix script for `report`; `None` when there is nothing to fix
pub fn write_fix_script(report: &PowerReport, path: &Path) -> Result<Option<PathBuf>, PowerError> {
    let fixes = report.fixes();
    if fixes.is_empty() {
        return Ok(None);
    }

    let to_err = |source| PowerError::WriteScript {
        path: path.to_path_buf(),
        source,
    };
    fs::write(path, render_fix_script(&fixes)).map_err(to_err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(to_err)?;
    }

    info!("Wrote fix script {} ({} fixes)", path.display(), fixes.len());
    Ok(Some(path.to_path_buf()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PowerEventKind {
    PowerSaveChanged { from: bool, to: bool },
    ConnectionLost,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: PowerEventKind,
}

impl fmt::Display for PowerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |b: bool| if b { "on" } else { "off" };
        match self.kind {
            PowerEventKind::PowerSaveChanged { from, to } => {
                write!(f, "Power save changed: {} -> {}", on_off(from), on_off(to))
            }
            PowerEventKind::ConnectionLost => {
                f.write_str("Connection lost (check if power-related)")
            }
        }
    }
}

/// Tracks power save and link state between polls
#[derive(Debug, Default)]
pub struct PowerEventTracker {
    power_save: Option<bool>,
    connected: Option<bool>,
}

impl PowerEventTracker {
    pub fn observe(
        &mut self,
        power_save: Option<bool>,
        connected: Option<bool>,
        now: DateTime<Utc>,
    ) -> Vec<PowerEvent> {
        let mut events = Vec::new();

        if let Some(to) = power_save {
            if let Some(from) = self.power_save.filter(|&from| from != to) {
                events.push(PowerEvent {
                    timestamp: now,
                    kind: PowerEventKind::PowerSaveChanged { from, to },
                });
            }
            self.power_save = Some(to);
        }

        if let Some(now_connected) = connected {
            if self.connected == Some(true) && !now_connected {
                events.push(PowerEvent {
                    timestamp: now,
                    kind: PowerEventKind::ConnectionLost,
                });
            }
            self.connected = Some(now_connected);
        }

        events
    }
}

/// Poll power save and link state every 0.5 s for `duration` or until
/// Ctrl+C
pub async fn monitor_power_events(
    tools: Arc<dyn WirelessTools>,
    interface: &str,
    duration: Duration,
) -> Result<Vec<PowerEvent>, PowerError> {
    let mut tracker = PowerEventTracker::default();
    let mut events = Vec::new();
    let mut ticker = interval(MONITOR_POLL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let stop = crate::roaming::timeout_or_interrupt(duration);
    tokio::pin!(stop);

    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = ticker.tick() => {
                let tools = Arc::clone(&tools);
                let iface = interface.to_string();
                let (power_save, connected) = tokio::task::spawn_blocking(move || {
                    let power_save = tools
                        .power_save(&iface)
                        .ok()
                        .and_then(|out| parse_power_save(&out));
                    let connected = tools
                        .link(&iface)
                        .ok()
                        .map(|out| !out.contains("Not connected"));
                    (power_save, connected)
                })
                .await?;

                for event in tracker.observe(power_save, connected, Utc::now()) {
                    println!("{}", event);
                    events.push(event);
                }
            }
        }
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::FakeTools;
    use tempfile::TempDir;

    pub(super) struct Fixture {
        pub tmp: TempDir,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                tmp: TempDir::new().unwrap(),
            }
        }

        pub fn write(&self, absolute: &str, contents: &str) {
            let path = self.tmp.path().join(absolute.trim_start_matches('/'));
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }

        /// Make `/sys/class/net/wlan0/device` point at `device` and the
        /// driver link at `driver`
        #[cfg(unix)]
        pub fn device(&self, device: &str, driver: &str) {
            let root = self.tmp.path();
            let device_dir = root.join(device.trim_start_matches('/'));
            fs::create_dir_all(&device_dir).unwrap();
            let net = root.join("sys/class/net/wlan0");
            fs::create_dir_all(&net).unwrap();
            std::os::unix::fs::symlink(&device_dir, net.join("device")).unwrap();
            std::os::unix::fs::symlink(
                root.join("sys/bus/drivers").join(driver),
                device_dir.join("driver"),
            )
            .unwrap();
        }

        pub fn detective(&self, tools: FakeTools) -> PowerDetective {
            PowerDetective::with_root(Arc::new(tools), "wlan0", self.tmp.path())
        }
    }

    fn category<'a>(report: &'a PowerReport, category: PowerCategory) -> &'a [PowerIssue] {
        &report
            .categories
            .iter()
            .find(|c| c.category == category)
            .unwrap()
            .issues
    }

    #[test]
    fn test_clean_system() {
        let fixture = Fixture::new();
        let tools = FakeTools {
            power_save: Some("Power save: off\n".to_string()),
            iwconfig: Some("wlan0  IEEE 802.11  Power Management:off\n".to_string()),
            ..Default::default()
        };
        let report = fixture.detective(tools).check_all();
        assert_eq!(report.total(), 0);
        assert_eq!(report.categories.len(), 8);
    }

    #[test]
    fn test_interface_power_save() {
        let fixture = Fixture::new();
        let tools = FakeTools {
            power_save: Some("Power save: on\n".to_string()),
            iwconfig: Some("wlan0  Power Management:on\n".to_string()),
            ..Default::default()
        };
        let report = fixture.detective(tools).check_all();
        let issues = category(&report, PowerCategory::WifiPowerSave);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[1].severity, Severity::High);
        assert_eq!(report.critical(), 2);
        assert_eq!(
            report.fixes(),
            vec!["iw dev wlan0 set power_save off", "iwconfig wlan0 power off"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_usb_adapter() {
        let fixture = Fixture::new();
        fixture.device("/sys/devices/pci0000:00/usb1/1-2/1-2:1.0", "rtl8xxxu_x");
        fixture.write("/sys/devices/pci0000:00/usb1/1-2/power/control", "auto\n");
        fixture.write("/sys/module/usbcore/parameters/autosuspend", "2\n");
        fixture.write("/etc/tlp.conf", "USB_AUTOSUSPEND=1\n#WIFI_PWR_ON_AC=on\n");

        let report = fixture.detective(FakeTools::default()).check_all();
        let usb = category(&report, PowerCategory::UsbAutosuspend);
        assert_eq!(usb.len(), 3);
        assert_eq!(usb[0].severity, Severity::Info);
        assert_eq!(usb[1].issue, "USB autosuspend is enabled (2s)");
        assert_eq!(
            usb[2].fix.as_deref(),
            Some("echo on > /sys/devices/pci0000:00/usb1/1-2/power/control")
        );

        let tlp = category(&report, PowerCategory::Tlp);
        assert_eq!(tlp.len(), 1);
        assert_eq!(tlp[0].severity, Severity::High);
        assert!(category(&report, PowerCategory::PcieAspm).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_pcie_aspm() {
        let fixture = Fixture::new();
        fixture.device("/sys/devices/pci0000:00/0000:00:1c.0/0000:02:00.0", "iwlwifi");
        fixture.write(
            "/sys/module/pcie_aspm/parameters/policy",
            "default performance [powersave] powersupersave\n",
        );
        let report = fixture.detective(FakeTools::default()).check_all();
        let aspm = category(&report, PowerCategory::PcieAspm);
        assert_eq!(aspm.len(), 1);
        assert_eq!(aspm[0].issue, "PCIe ASPM set to: powersave");
        assert!(category(&report, PowerCategory::UsbAutosuspend).is_empty());
    }

    #[test]
    fn test_network_manager_only_flags_enabled() {
        let fixture = Fixture::new();
        fixture.write(
            "/etc/NetworkManager/conf.d/default-wifi-powersave-on.conf",
            "[connection]\nwifi.powersave = 3\n",
        );
        fixture.write(
            "/etc/NetworkManager/conf.d/99-off.conf",
            "[connection]\nwifi.powersave = 2\n",
        );
        fixture.write("/etc/NetworkManager/NetworkManager.conf", "# wifi.powersave = 3\n");

        let report = fixture.detective(FakeTools::default()).check_all();
        let nm = category(&report, PowerCategory::NetworkManager);
        assert_eq!(nm.len(), 1);
        assert!(
            nm[0]
                .fix
                .as_deref()
                .unwrap()
                .ends_with("/etc/NetworkManager/conf.d/default-wifi-powersave-on.conf")
        );
    }

    #[test]
    fn test_tlp_laptop_mode_and_sleep() {
        let fixture = Fixture::new();
        fixture.write("/etc/tlp.conf", "WIFI_PWR_ON_AC = on\nUSB_AUTOSUSPEND=1\n");
        fixture.write(
            "/etc/laptop-mode/conf.d/wireless-power.conf",
            "WIRELESS_AC_POWER_SAVING=1\n",
        );
        fixture.write("/etc/systemd/sleep.conf", "[Sleep]\nHibernateDelaySec=20min\n");

        let report = fixture.detective(FakeTools::default()).check_all();
        let tlp = category(&report, PowerCategory::Tlp);
        // USB autosuspend is flagged whatever the adapter bus
        assert_eq!(tlp.len(), 2);
        assert_eq!(tlp[0].severity, Severity::Medium);
        assert_eq!(tlp[1].severity, Severity::High);
        assert_eq!(category(&report, PowerCategory::LaptopMode).len(), 1);

        let sleep = category(&report, PowerCategory::SystemdSleep);
        assert_eq!(sleep[0].severity, Severity::Low);
        // low severity fixes stay out of the script
        assert_eq!(report.fixes().len(), 3);
    }

    #[test]
    fn test_severity_counts() {
        let report = PowerReport {
            categories: vec![CategoryFindings {
                category: PowerCategory::DriverParams,
                issues: vec![
                    PowerIssue::new(Severity::High, "a", "x"),
                    PowerIssue::new(Severity::High, "b", "x"),
                    PowerIssue::new(Severity::Info, "c", "x"),
                ],
            }],
        };
        let counts = report.severity_counts();
        assert_eq!(counts.get(&Severity::High), Some(&2));
        assert_eq!(counts.get(&Severity::Info), Some(&1));
        assert_eq!(counts.get(&Severity::Medium), None);
    }

    #[test]
    fn test_render_fix_script_quotes() {
        let script = render_fix_script(&["sed -i 's/a/b/' /etc/x.conf"]);
        assert!(script.starts_with("#!/bin/bash\n"));
        assert!(script.contains("echo 'Running: sed -i '\\''s/a/b/'\\'' /etc/x.conf'\n"));
        assert!(script.contains("\nsed -i 's/a/b/' /etc/x.conf\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_fix_script() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fix.sh");

        assert!(write_fix_script(&PowerReport::default(), &path).unwrap().is_none());
        assert!(!path.exists());

        let report = PowerReport {
            categories: vec![CategoryFindings {
                category: PowerCategory::WifiPowerSave,
                issues: vec![
                    PowerIssue::new(Severity::High, "on", "drops").with_fix("iw dev wlan0 set power_save off"),
                ],
            }],
        };
        let written = write_fix_script(&report, &path).unwrap().unwrap();
        let mode = fs::metadata(&written).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert!(fs::read_to_string(&written).unwrap().contains("iw dev wlan0 set power_save off"));
    }

    #[test]
    fn test_power_event_tracker() {
        let mut tracker = PowerEventTracker::default();
        let now = Utc::now();
        assert!(tracker.observe(Some(false), Some(true), now).is_empty());

        let events = tracker.observe(Some(true), Some(false), now);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].to_string(), "Power save changed: off -> on");
        assert_eq!(events[1].kind, PowerEventKind::ConnectionLost);

        // still down: nothing new
        assert!(tracker.observe(Some(true), Some(false), now).is_empty());
        // failed queries keep the last known state
        assert!(tracker.observe(None, None, now).is_empty());
        assert_eq!(tracker.observe(Some(false), Some(true), now).len(), 1);
    }
}
