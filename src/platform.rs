//! Machine identity detection
//!
//! The license is bound to a network adapter address. On Linux the kernel
//! exposes every adapter under /sys/class/net/<iface>/address, and only
//! physical adapters carry a `device` link. Elsewhere the address comes from
//! the `mac_address` crate.

use crate::license::LicenseError;
use log::{debug, warn};
use std::fs;
use std::path::PathBuf;

/// Source of the hardware identifier a license is bound to
pub trait MachineIdentity {
    /// Raw identifier of the current machine (not yet normalized)
    fn machine_id(&self) -> Result<String, LicenseError>;
}

/// Normalize a hardware identifier for comparison
///
/// Strips `:` and `-` separators and lowercases, so `AA:BB:CC:DD:EE:FF`,
/// `aa-bb-cc-dd-ee-ff` and `aabbccddeeff` are the same machine.
pub fn normalize_machine_id(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != ':' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

fn is_zero(normalized: &str) -> bool {
    normalized.is_empty() || normalized.chars().all(|c| c == '0')
}

/// Reads physical adapter addresses from sysfs
///
/// Bridges, veths and other virtual interfaces have no `device` entry and
/// are ignored, since their addresses change when they are recreated.
pub struct SysfsMachineId {
    root: PathBuf,
}

impl SysfsMachineId {
    /// Use the live /sys/class/net tree
    pub fn new() -> Self {
        Self::with_root("/sys/class/net")
    }

    /// Use an alternate tree laid out like /sys/class/net
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for SysfsMachineId {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineIdentity for SysfsMachineId {
    fn machine_id(&self) -> Result<String, LicenseError> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            LicenseError::MachineIdUnavailable(format!(
                "cannot list {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let mut interfaces: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name != "lo")
            .collect();
        interfaces.sort();

        for iface in interfaces {
            let dir = self.root.join(&iface);
            if !dir.join("device").exists() {
                debug!("Skipping virtual adapter {}", iface);
                continue;
            }
            let Ok(address) = fs::read_to_string(dir.join("address")) else {
                continue;
            };
            if is_zero(&normalize_machine_id(&address)) {
                continue;
            }
            debug!("Using adapter {} for machine identity", iface);
            return Ok(address.trim().to_string());
        }

        Err(LicenseError::MachineIdUnavailable(
            "no physical network adapter with a hardware address".to_string(),
        ))
    }
}

/// Machine identity for the running platform
///
/// Linux prefers a physical adapter from sysfs and falls back to the
/// first adapter the OS reports. Other platforms ask the OS directly.
#[derive(Default)]
pub struct SystemMachineId {
    sysfs: SysfsMachineId,
}

impl SystemMachineId {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MachineIdentity for SystemMachineId {
    fn machine_id(&self) -> Result<String, LicenseError> {
        if cfg!(target_os = "linux") {
            match self.sysfs.machine_id() {
                Ok(id) => return Ok(id),
                Err(e) => warn!("{}; asking the OS for an adapter instead", e),
            }
        }
        os_mac_address()
    }
}

fn os_mac_address() -> Result<String, LicenseError> {
    match mac_address::get_mac_address() {
        Ok(Some(mac)) if !is_zero(&normalize_machine_id(&mac.to_string())) => Ok(mac.to_string()),
        Ok(_) => Err(LicenseError::MachineIdUnavailable(
            "no network adapter with a hardware address".to_string(),
        )),
        Err(e) => Err(LicenseError::MachineIdUnavailable(e.to_string())),
    }
}

/// A pinned identifier
pub struct FixedMachineId(pub String);

impl MachineIdentity for FixedMachineId {
    fn machine_id(&self) -> Result<String, LicenseError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_iface(root: &std::path::Path, name: &str, address: &str, physical: bool) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("address"), format!("{}\n", address)).unwrap();
        if physical {
            fs::create_dir_all(dir.join("device")).unwrap();
        }
    }

    #[test]
    fn test_normalize_machine_id() {
        assert_eq!(normalize_machine_id("AA:BB:CC:DD:EE:FF"), "aabbccddeeff");
        assert_eq!(normalize_machine_id("aa-bb-cc-dd-ee-ff"), "aabbccddeeff");
        assert_eq!(normalize_machine_id(" aabbccddeeff \n"), "aabbccddeeff");
    }

    #[test]
    fn test_sysfs_skips_loopback_and_zero() {
        let dir = tempfile::tempdir().unwrap();
        add_iface(dir.path(), "lo", "00:00:00:00:00:00", false);
        add_iface(dir.path(), "dummy0", "00:00:00:00:00:00", true);
        add_iface(dir.path(), "eth0", "3c:22:fb:01:02:03", true);
        add_iface(dir.path(), "wlan0", "3c:22:fb:0a:0b:0c", true);

        let id = SysfsMachineId::with_root(dir.path()).machine_id().unwrap();
        assert_eq!(id, "3c:22:fb:01:02:03");
    }

    #[test]
    fn test_sysfs_prefers_physical_over_bridge() {
        let dir = tempfile::tempdir().unwrap();
        add_iface(dir.path(), "br-3f2a1c", "02:42:9a:11:22:33", false);
        add_iface(dir.path(), "docker0", "02:42:9a:44:55:66", false);
        add_iface(dir.path(), "eth0", "3c:22:fb:01:02:03", true);

        let id = SysfsMachineId::with_root(dir.path()).machine_id().unwrap();
        assert_eq!(id, "3c:22:fb:01:02:03");
    }

    #[test]
    fn test_sysfs_only_virtual_adapters() {
        let dir = tempfile::tempdir().unwrap();
        add_iface(dir.path(), "lo", "00:00:00:00:00:00", false);
        add_iface(dir.path(), "veth12ab", "02:42:9a:11:22:33", false);

        let result = SysfsMachineId::with_root(dir.path()).machine_id();
        assert!(matches!(result, Err(LicenseError::MachineIdUnavailable(_))));
    }

    #[test]
    fn test_sysfs_missing_root() {
        let result = SysfsMachineId::with_root("/nonexistent/voicebatch/net").machine_id();
        assert!(matches!(result, Err(LicenseError::MachineIdUnavailable(_))));
    }

    #[test]
    fn test_system_identity_is_normalizable() {
        // Hosts without any adapter legitimately report unavailable
        match SystemMachineId::new().machine_id() {
            Ok(id) => assert_eq!(normalize_machine_id(&id).len(), 12),
            Err(e) => assert!(matches!(e, LicenseError::MachineIdUnavailable(_))),
        }
    }
}
