// ── Online monitor ──

use serde::Serialize;

/// One reading of the WAN online monitor.
///
/// Histories are most-recent-first, one value per router sampling interval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OnlineMonitorSample {
    pub max_upstream: u64,
    pub max_downstream: u64,
    pub upstream_history: Vec<u64>,
    pub downstream_history: Vec<u64>,
}

impl OnlineMonitorSample {
    pub fn current_upstream(&self) -> u64 {
        self.upstream_history.first().copied().unwrap_or_default()
    }

    pub fn current_downstream(&self) -> u64 {
        self.downstream_history.first().copied().unwrap_or_default()
    }

    pub fn upstream_utilization(&self) -> f64 {
        utilization(self.current_upstream(), self.max_upstream)
    }

    pub fn downstream_utilization(&self) -> f64 {
        utilization(self.current_downstream(), self.max_downstream)
    }
}

/// `current / max`, or 0 when the line capacity is unknown.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn utilization(current: u64, max: u64) -> f64 {
    if max == 0 {
        0.0
    } else {
        current as f64 / max as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_max_is_zero_utilization() {
        assert!(utilization(1234, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn current_is_first_history_entry() {
        let sample = OnlineMonitorSample {
            max_upstream: 1000,
            max_downstream: 4000,
            upstream_history: vec![250, 900],
            downstream_history: vec![],
        };
        assert_eq!(sample.current_upstream(), 250);
        assert_eq!(sample.current_downstream(), 0);
        assert!((sample.upstream_utilization() - 0.25).abs() < f64::EPSILON);
    }
}
