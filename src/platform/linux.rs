use crate::error::{AppError, Result};
use crate::platform::{is_loopback_or_tunnel, CounterSource, CounterTotals};
use std::fs;
use std::path::{Path, PathBuf};

/// Counter source backed by `/proc/net/dev` and `/sys/class/net`.
///
/// The roots are injectable so tests can point at fixture trees.
pub struct LinuxCounters {
    proc_net_dev: PathBuf,
    sys_class_net: PathBuf,
}

impl Default for LinuxCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl LinuxCounters {
    pub fn new() -> Self {
        Self::with_roots("/proc/net/dev", "/sys/class/net")
    }

    pub fn with_roots<P: Into<PathBuf>, S: Into<PathBuf>>(proc_net_dev: P, sys_class_net: S) -> Self {
        Self {
            proc_net_dev: proc_net_dev.into(),
            sys_class_net: sys_class_net.into(),
        }
    }

    /// The good-interface rule: the interface must be operationally
    /// up; interfaces without a hardware backing are additionally
    /// rejected when they are loopback or tunnel devices.
    fn is_good_interface(&self, name: &str) -> bool {
        if !self.is_up(name) {
            return false;
        }
        if self.is_hardware(name) {
            return true;
        }
        !is_loopback_or_tunnel(name)
    }

    fn is_up(&self, name: &str) -> bool {
        let operstate = self.sys_class_net.join(name).join("operstate");
        match fs::read_to_string(operstate) {
            Ok(state) => state.trim() == "up",
            Err(_) => false,
        }
    }

    /// Physically-backed interfaces expose a `device` symlink in sysfs
    fn is_hardware(&self, name: &str) -> bool {
        self.sys_class_net.join(name).join("device").exists()
    }

    fn parse_and_sum(&self, content: &str) -> CounterTotals {
        let mut totals = CounterTotals {
            bytes_in: 0,
            bytes_out: 0,
        };

        // /proc/net/dev: two header lines, then
        //   <iface>: <rx bytes> <rx packets> ... <tx bytes (col 9)> ...
        for line in content.lines().skip(2) {
            let mut split = line.splitn(2, ':');
            let name = match split.next() {
                Some(name) => name.trim(),
                None => continue,
            };
            let rest = match split.next() {
                Some(rest) => rest,
                None => continue,
            };
            if name.is_empty() || !self.is_good_interface(name) {
                continue;
            }

            let fields: Vec<&str> = rest.split_whitespace().collect();
            let bytes_in: u64 = fields.first().and_then(|v| v.parse().ok()).unwrap_or(0);
            let bytes_out: u64 = fields.get(8).and_then(|v| v.parse().ok()).unwrap_or(0);
            totals.bytes_in += bytes_in;
            totals.bytes_out += bytes_out;
        }

        totals
    }
}

impl CounterSource for LinuxCounters {
    fn totals(&self) -> Result<CounterTotals> {
        let content = fs::read_to_string(&self.proc_net_dev).map_err(|e| {
            AppError::enumeration(format!(
                "Failed to read {}: {}",
                self.proc_net_dev.display(),
                e
            ))
        })?;
        Ok(self.parse_and_sum(&content))
    }

    fn is_available(&self) -> bool {
        Path::new(&self.proc_net_dev).exists()
    }
}
