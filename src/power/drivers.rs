//! Driver module parameter checks

use super::{PowerDetective, PowerIssue};
use crate::severity::Severity;
use std::fs;

fn param(detective: &PowerDetective, module: &str, name: &str) -> Option<String> {
    detective.read(&format!("/sys/module/{}/parameters/{}", module, name))
}

/// Checks specific to `driver`
pub(super) fn check(detective: &PowerDetective, driver: &str) -> Vec<PowerIssue> {
    let mut issues = Vec::new();

    if driver == "iwlwifi" {
        issues.extend(intel(detective));
    } else if driver.starts_with("rtw") || driver.starts_with("r8") {
        issues.extend(realtek(detective, driver));
    } else if driver.starts_with("ath") {
        issues.extend(atheros(detective, driver));
        if matches!(driver, "ath10k_pci" | "ath11k_pci") {
            issues.extend(qualcomm(detective, driver));
        }
    } else if driver.starts_with("mt7") {
        issues.extend(mediatek(detective, driver));
    } else if driver.starts_with("qca") {
        issues.extend(qualcomm(detective, driver));
    } else if driver.starts_with("mwifiex") || driver.starts_with("mwl") {
        issues.extend(marvell(detective, driver));
    }

    issues
}

fn intel(detective: &PowerDetective) -> Vec<PowerIssue> {
    let mut issues = Vec::new();

    if param(detective, "iwlwifi", "power_save").as_deref() == Some("Y") {
        issues.push(
            PowerIssue::new(
                Severity::High,
                "Intel WiFi power_save enabled",
                "Causes disconnects and poor performance",
            )
            .with_fix("echo 'options iwlwifi power_save=0' > /etc/modprobe.d/iwlwifi-power.conf"),
        );
    }
    if let Some(level) = param(detective, "iwlwifi", "power_level").filter(|l| l != "0") {
        issues.push(
            PowerIssue::new(
                Severity::Medium,
                format!("Intel WiFi power_level={}", level),
                "Reduced performance for power saving",
            )
            .with_fix("Add iwlwifi.power_level=0 to kernel parameters"),
        );
    }

    issues
}

fn realtek(detective: &PowerDetective, driver: &str) -> Vec<PowerIssue> {
    if param(detective, driver, "disable_lps").as_deref() == Some("N") {
        vec![
            PowerIssue::new(
                Severity::High,
                "Realtek WiFi LPS (power save) enabled",
                "Known to cause frequent disconnects",
            )
            .with_fix(format!(
                "echo 'options {} disable_lps=1' > /etc/modprobe.d/{}-lps.conf",
                driver, driver
            )),
        ]
    } else {
        Vec::new()
    }
}

fn atheros(detective: &PowerDetective, driver: &str) -> Vec<PowerIssue> {
    if param(detective, driver, "ps_enable").as_deref() == Some("1") {
        vec![
            PowerIssue::new(
                Severity::Medium,
                "Atheros WiFi power save enabled",
                "May cause latency and disconnects",
            )
            .with_fix(format!(
                "echo 'options {} ps_enable=0' > /etc/modprobe.d/{}-ps.conf",
                driver, driver
            )),
        ]
    } else {
        Vec::new()
    }
}

fn mediatek(detective: &PowerDetective, driver: &str) -> Vec<PowerIssue> {
    let mut issues = Vec::new();
    let device = detective.device_dir();

    if detective
        .read(&format!("{}/power/runtime_status", device))
        .as_deref()
        == Some("suspended")
    {
        issues.push(
            PowerIssue::new(
                Severity::High,
                "MediaTek WiFi runtime suspended",
                "Device is currently suspended and will drop traffic",
            )
            .with_fix(format!("echo on > {}/power/control", device)),
        );
    }

    if param(detective, driver, "disable_deep_sleep").as_deref() == Some("N") {
        issues.push(
            PowerIssue::new(
                Severity::High,
                "MediaTek deep sleep enabled",
                "Causes 1-3 second reconnection delays",
            )
            .with_fix(format!(
                "echo Y > /sys/module/{}/parameters/disable_deep_sleep",
                driver
            )),
        );
    }

    // debugfs: /sys/kernel/debug/ieee80211/phy*/netdev:<if>/mt76/runtime-pm
    let debugfs = detective.path("/sys/kernel/debug/ieee80211");
    let runtime_pm_enabled = fs::read_dir(debugfs)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.file_name().to_string_lossy().starts_with("phy"))
                .map(|e| {
                    e.path()
                        .join(format!("netdev:{}", detective.interface))
                        .join("mt76/runtime-pm")
                })
                .filter_map(|p| fs::read_to_string(p).ok())
                .any(|content| content.contains("enable"))
        })
        .unwrap_or(false);
    if runtime_pm_enabled {
        issues.push(
            PowerIssue::new(
                Severity::Medium,
                "MT76 runtime PM enabled",
                "May cause latency spikes",
            )
            .with_fix("Disable via debugfs or module parameter"),
        );
    }

    issues
}

fn qualcomm(detective: &PowerDetective, driver: &str) -> Vec<PowerIssue> {
    let mut issues = Vec::new();

    if matches!(driver, "ath10k_pci" | "ath11k_pci") {
        let wowlan = format!("/sys/class/net/{}/phy80211/wowlan", detective.interface);
        if detective
            .read(&wowlan)
            .is_some_and(|w| w.contains("enabled"))
        {
            issues.push(
                PowerIssue::new(
                    Severity::Medium,
                    "QCA WoWLAN enabled",
                    "Can cause false wakeups and power issues",
                )
                .with_fix("iw phy phy0 wowlan disable"),
            );
        }

        if param(detective, driver, "fw_powersave").as_deref() == Some("1") {
            issues.push(
                PowerIssue::new(
                    Severity::High,
                    "QCA firmware power save enabled",
                    "Known to cause disconnects on QCA chips",
                )
                .with_fix(format!(
                    "echo 0 > /sys/module/{}/parameters/fw_powersave",
                    driver
                )),
            );
        }
    } else if param(detective, "wlan", "enable_ipa").as_deref() == Some("1") {
        issues.push(
            PowerIssue::new(
                Severity::Low,
                "QCA IPA power aggregation enabled",
                "May affect throughput for power saving",
            )
            .with_fix("Add wlan.enable_ipa=0 to kernel parameters"),
        );
    }

    issues
}

fn marvell(detective: &PowerDetective, driver: &str) -> Vec<PowerIssue> {
    let mut issues = Vec::new();

    let ps_mode = format!("/sys/kernel/debug/mwifiex/{}/ps_mode", detective.interface);
    if let Some(mode) = detective.read(&ps_mode).filter(|m| m != "0") {
        issues.push(
            PowerIssue::new(
                Severity::High,
                format!("Marvell PS mode {} active", mode),
                "Aggressive power saving causes drops",
            )
            .with_fix(format!("echo 0 > {}", ps_mode)),
        );
    }

    if matches!(param(detective, driver, "auto_ds").as_deref(), Some("1" | "Y")) {
        issues.push(
            PowerIssue::new(
                Severity::Medium,
                "Marvell auto deep sleep enabled",
                "Wake-up delays after idle",
            )
            .with_fix(format!(
                "echo 'options {} auto_ds=0' > /etc/modprobe.d/{}-ds.conf",
                driver, driver
            )),
        );
    }

    issues
}

/// Checks that apply to any driver
pub(super) fn check_generic(detective: &PowerDetective) -> Vec<PowerIssue> {
    let mut issues = Vec::new();
    let control = format!("{}/power/control", detective.device_dir());

    if detective.read(&control).as_deref() == Some("auto") {
        issues.push(
            PowerIssue::new(
                Severity::Medium,
                "Generic runtime PM set to auto",
                "Device may suspend unexpectedly",
            )
            .with_fix(format!("echo on > {}", control)),
        );
    }

    if detective.read("/proc/sys/kernel/nmi_watchdog").as_deref() == Some("0") {
        issues.push(
            PowerIssue::new(
                Severity::Info,
                "NMI watchdog disabled (laptop power saving)",
                "System may be in aggressive power save mode",
            )
            .with_fix("Consider if other subsystems are also affected"),
        );
    }

    issues
}

#[cfg(all(test, unix))]
mod tests {
    use super::super::tests::Fixture;
    use super::super::PowerCategory;
    use super::*;
    use crate::platform::testing::FakeTools;

    fn driver_issues(fixture: &Fixture) -> Vec<PowerIssue> {
        let report = fixture.detective(FakeTools::default()).check_all();
        report
            .categories
            .into_iter()
            .find(|c| c.category == PowerCategory::DriverParams)
            .map(|c| c.issues)
            .unwrap_or_default()
    }

    const PCI_DEVICE: &str = "/sys/devices/pci0000:00/0000:00:1c.0/0000:02:00.0";

    #[test]
    fn test_intel() {
        let fixture = Fixture::new();
        fixture.device(PCI_DEVICE, "iwlwifi");
        fixture.write("/sys/module/iwlwifi/parameters/power_save", "Y\n");
        fixture.write("/sys/module/iwlwifi/parameters/power_level", "3\n");

        let issues = driver_issues(&fixture);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[1].issue, "Intel WiFi power_level=3");
    }

    #[test]
    fn test_realtek_lps() {
        let fixture = Fixture::new();
        fixture.device(PCI_DEVICE, "rtw89_8852be");
        fixture.write("/sys/module/rtw89_8852be/parameters/disable_lps", "N\n");

        let issues = driver_issues(&fixture);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].fix.as_deref().unwrap().contains("rtw89_8852be disable_lps=1"));
    }

    #[test]
    fn test_ath10k_runs_atheros_and_qualcomm_checks() {
        let fixture = Fixture::new();
        fixture.device(PCI_DEVICE, "ath10k_pci");
        fixture.write("/sys/module/ath10k_pci/parameters/ps_enable", "1\n");
        fixture.write("/sys/module/ath10k_pci/parameters/fw_powersave", "1\n");
        fixture.write("/sys/class/net/wlan0/phy80211/wowlan", "WoWLAN is enabled:\n");

        let issues: Vec<(String, Severity)> = driver_issues(&fixture)
            .into_iter()
            .map(|i| (i.issue, i.severity))
            .collect();
        assert_eq!(
            issues,
            vec![
                ("Atheros WiFi power save enabled".to_string(), Severity::Medium),
                ("QCA WoWLAN enabled".to_string(), Severity::Medium),
                ("QCA firmware power save enabled".to_string(), Severity::High),
            ]
        );
    }

    #[test]
    fn test_mediatek() {
        let fixture = Fixture::new();
        fixture.device(PCI_DEVICE, "mt7921e");
        fixture.write(&format!("{}/power/runtime_status", PCI_DEVICE), "suspended\n");
        fixture.write("/sys/module/mt7921e/parameters/disable_deep_sleep", "N\n");
        fixture.write(
            "/sys/kernel/debug/ieee80211/phy0/netdev:wlan0/mt76/runtime-pm",
            "enable\n",
        );

        let issues = driver_issues(&fixture);
        let severities: Vec<Severity> = issues.iter().map(|i| i.severity).collect();
        assert_eq!(severities, vec![Severity::High, Severity::High, Severity::Medium]);
    }

    #[test]
    fn test_qca_wowlan_fix_in_script() {
        let fixture = Fixture::new();
        fixture.device(PCI_DEVICE, "ath11k_pci");
        fixture.write("/sys/class/net/wlan0/phy80211/wowlan", "WoWLAN is enabled:\n");

        let report = fixture.detective(FakeTools::default()).check_all();
        assert!(report.fixes().contains(&"iw phy phy0 wowlan disable"));
    }

    #[test]
    fn test_marvell() {
        let fixture = Fixture::new();
        fixture.device(PCI_DEVICE, "mwifiex_pcie");
        fixture.write("/sys/kernel/debug/mwifiex/wlan0/ps_mode", "1\n");
        fixture.write("/sys/module/mwifiex_pcie/parameters/auto_ds", "1\n");

        let issues = driver_issues(&fixture);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].issue, "Marvell PS mode 1 active");
        assert_eq!(issues[1].severity, Severity::Medium);
    }

    #[test]
    fn test_generic_checks() {
        let fixture = Fixture::new();
        fixture.device(PCI_DEVICE, "brcmfmac");
        fixture.write(&format!("{}/power/control", PCI_DEVICE), "auto\n");
        fixture.write("/proc/sys/kernel/nmi_watchdog", "0\n");

        let issues = driver_issues(&fixture);
        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[0].fix.as_deref(),
            Some("echo on > /sys/class/net/wlan0/device/power/control")
        );
        assert_eq!(issues[1].severity, Severity::Info);
    }
}
