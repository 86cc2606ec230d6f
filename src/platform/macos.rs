use crate::error::{AppError, Result};
use crate::platform::{is_loopback_or_tunnel, CounterSource, CounterTotals};
use std::process::Command;

/// Counter source backed by `netstat -inb`.
///
/// macOS exposes no /proc equivalent; parsing netstat's link-level
/// rows is the portable fallback short of raw sysctl work.
pub struct MacCounters;

impl Default for MacCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl MacCounters {
    pub fn new() -> Self {
        Self
    }

    fn parse_and_sum(&self, output: &str) -> CounterTotals {
        let mut totals = CounterTotals {
            bytes_in: 0,
            bytes_out: 0,
        };

        // netstat -inb: Name Mtu Network Address Ipkts Ierrs Ibytes
        // Opkts Oerrs Obytes Coll. Only the <Link#N> row carries the
        // per-interface counters; address-family rows repeat them.
        for line in output.lines().skip(1) {
            if !line.contains("<Link") {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 10 {
                continue;
            }
            let name = fields[0].trim_end_matches('*');
            if is_loopback_or_tunnel(name) || name.starts_with("utun") || name.starts_with("gif") {
                continue;
            }

            let bytes_in: u64 = fields[6].parse().unwrap_or(0);
            let bytes_out: u64 = fields[9].parse().unwrap_or(0);
            totals.bytes_in += bytes_in;
            totals.bytes_out += bytes_out;
        }

        totals
    }
}

impl CounterSource for MacCounters {
    fn totals(&self) -> Result<CounterTotals> {
        let output = Command::new("netstat")
            .args(["-inb"])
            .output()
            .map_err(|e| AppError::enumeration(format!("Failed to run netstat: {}", e)))?;

        if !output.status.success() {
            return Err(AppError::enumeration(format!(
                "netstat exited with status {}",
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(self.parse_and_sum(&stdout))
    }

    fn is_available(&self) -> bool {
        Command::new("netstat")
            .arg("-inb")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_NETSTAT: &str = "\
Name       Mtu   Network       Address            Ipkts Ierrs     Ibytes    Opkts Oerrs     Obytes  Coll
lo0        16384 <Link#1>                          1000     0     900000     1000     0     900000     0
lo0        16384 127           127.0.0.1           1000     -     900000     1000     -     900000     -
en0        1500  <Link#4>    aa:bb:cc:dd:ee:ff     5000     0    4000000     3000     0    2000000     0
en0        1500  192.168.1     192.168.1.10        5000     -    4000000     3000     -    2000000     -
utun0      1380  <Link#14>                          200     0     100000      200     0     100000     0
";

    #[test]
    fn test_sums_link_rows_excluding_loopback_and_tunnels() {
        let counters = MacCounters::new();
        let totals = counters.parse_and_sum(SAMPLE_NETSTAT);
        assert_eq!(totals.bytes_in, 4_000_000);
        assert_eq!(totals.bytes_out, 2_000_000);
    }

    #[test]
    fn test_address_family_rows_not_double_counted() {
        let counters = MacCounters::new();
        let totals = counters.parse_and_sum(SAMPLE_NETSTAT);
        // en0 appears twice; only the <Link#4> row counts.
        assert_eq!(totals.bytes_in, 4_000_000);
    }
}
