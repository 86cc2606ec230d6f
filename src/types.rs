//! Type definitions shared across the probes

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Outcome of a single bounded-time probe.
///
/// Tagging is exhaustive: a probe either produced its success payload
/// or a failure reason, never both and never neither. Probes contain
/// every fault into this shape; nothing propagates out of a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProbeOutcome<T> {
    /// The probe completed and produced its payload
    Ok(T),
    /// The probe failed; the string is a human-readable reason
    Failed(String),
}

impl<T> ProbeOutcome<T> {
    /// True when the probe succeeded
    pub fn is_ok(&self) -> bool {
        matches!(self, ProbeOutcome::Ok(_))
    }

    /// The success payload, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            ProbeOutcome::Ok(value) => Some(value),
            ProbeOutcome::Failed(_) => None,
        }
    }

    /// The failure reason, if any
    pub fn failure(&self) -> Option<&str> {
        match self {
            ProbeOutcome::Ok(_) => None,
            ProbeOutcome::Failed(reason) => Some(reason),
        }
    }

    /// Fold an application `Result` into an outcome, stringifying the error
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => ProbeOutcome::Ok(value),
            Err(error) => ProbeOutcome::Failed(error.to_string()),
        }
    }
}

/// Proxy mode in effect for the HTTPS probe.
///
/// Mirrors the access types a session can report: an explicitly
/// configured proxy, the system/environment default, a direct
/// connection, or unknown when the environment cannot be inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyMode {
    Direct,
    Named,
    Default,
    Unknown,
}

impl ProxyMode {
    /// Short label for display
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyMode::Direct => "Direct",
            ProxyMode::Named => "Named",
            ProxyMode::Default => "Default",
            ProxyMode::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ProxyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_tagging_is_exhaustive() {
        let ok: ProbeOutcome<u64> = ProbeOutcome::Ok(12);
        assert!(ok.is_ok());
        assert_eq!(ok.value(), Some(&12));
        assert_eq!(ok.failure(), None);

        let failed: ProbeOutcome<u64> = ProbeOutcome::Failed("no reply".to_string());
        assert!(!failed.is_ok());
        assert_eq!(failed.value(), None);
        assert_eq!(failed.failure(), Some("no reply"));
    }

    #[test]
    fn test_outcome_from_result() {
        let ok = ProbeOutcome::from_result(Ok(5u16));
        assert_eq!(ok, ProbeOutcome::Ok(5));

        let failed: ProbeOutcome<u16> =
            ProbeOutcome::from_result(Err(AppError::timeout("no reply within 1000 ms")));
        assert_eq!(
            failed.failure(),
            Some("Timeout error: no reply within 1000 ms")
        );
    }

    #[test]
    fn test_proxy_mode_labels() {
        assert_eq!(ProxyMode::Direct.as_str(), "Direct");
        assert_eq!(ProxyMode::Named.as_str(), "Named");
        assert_eq!(ProxyMode::Default.as_str(), "Default");
        assert_eq!(ProxyMode::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_outcome_serialization() {
        let ok: ProbeOutcome<u64> = ProbeOutcome::Ok(3);
        let json = serde_json::to_string(&ok).unwrap();
        assert!(json.contains("Ok"));

        let failed: ProbeOutcome<u64> = ProbeOutcome::Failed("boom".to_string());
        let json = serde_json::to_string(&failed).unwrap();
        assert!(json.contains("Failed"));
        assert!(json.contains("boom"));
    }
}
