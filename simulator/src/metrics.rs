//! Simulation metrics.

use std::collections::BTreeMap;

/// Simulation metrics.
#[derive(Debug, Clone)]
pub struct SimulationMetrics {
    /// Total operations attempted.
    pub total_operations: u64,
    /// Operations the ledger applied.
    pub applied_operations: u64,
    /// Operations the ledger rejected.
    pub rejected_operations: u64,
    /// Rejections grouped by error code.
    rejections_by_code: BTreeMap<&'static str, u64>,
}

impl SimulationMetrics {
    /// Create new metrics.
    pub fn new() -> Self {
        Self {
            total_operations: 0,
            applied_operations: 0,
            rejected_operations: 0,
            rejections_by_code: BTreeMap::new(),
        }
    }

    /// Record an applied operation.
    pub fn record_applied(&mut self) {
        self.total_operations += 1;
        self.applied_operations += 1;
    }

    /// Record a rejected operation.
    pub fn record_rejected(&mut self, error_code: &'static str) {
        self.total_operations += 1;
        self.rejected_operations += 1;
        *self.rejections_by_code.entry(error_code).or_insert(0) += 1;
    }

    /// Rejection counts grouped by error code.
    pub fn rejections_by_code(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.rejections_by_code
            .iter()
            .map(|(code, count)| (*code, *count))
    }

    /// Share of attempted operations the ledger applied.
    pub fn success_rate(&self) -> f64 {
        if self.total_operations == 0 {
            return 0.0;
        }

        self.applied_operations as f64 / self.total_operations as f64
    }
}

impl Default for SimulationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let mut metrics = SimulationMetrics::new();

        metrics.record_applied();
        metrics.record_applied();
        metrics.record_applied();
        metrics.record_rejected("ERC20InsufficientBalance");

        assert_eq!(metrics.total_operations, 4);
        assert_eq!(metrics.applied_operations, 3);
        assert_eq!(metrics.rejected_operations, 1);
        assert_eq!(metrics.success_rate(), 0.75);

        let rejections: Vec<_> = metrics.rejections_by_code().collect();
        assert_eq!(rejections, vec![("ERC20InsufficientBalance", 1)]);
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = SimulationMetrics::new();
        assert_eq!(metrics.success_rate(), 0.0);
        assert_eq!(metrics.rejections_by_code().count(), 0);
    }
}
