use std::fmt;

/// Pass/fail counters of an evaluation.
///
/// `num_valid <= num_total` always holds; only [`EvaluationState::record`]
/// moves the counters, and only forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvaluationState {
    num_valid: u64,
    num_total: u64,
}

impl EvaluationState {
    pub fn new() -> EvaluationState {
        EvaluationState::default()
    }

    /// sequences the oracle accepted
    pub fn num_valid(&self) -> u64 {
        self.num_valid
    }

    /// sequences asked about
    pub fn num_total(&self) -> u64 {
        self.num_total
    }

    pub fn num_invalid(&self) -> u64 {
        self.num_total - self.num_valid
    }

    /// 0 for an empty run.
    pub fn percentage(&self) -> f64 {
        if self.num_total == 0 {
            return 0.;
        }
        self.num_valid as f64 / self.num_total as f64 * 100.
    }

    pub(crate) fn record(&mut self, passed: bool) {
        self.num_total += 1;
        if passed {
            self.num_valid += 1;
        }
    }
}

/// `valid / total = percentage%`
impl fmt::Display for EvaluationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} = {:.2}%",
            self.num_valid,
            self.num_total,
            self.percentage()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_zero_percent() {
        let state = EvaluationState::new();
        assert_eq!(state.percentage(), 0.);
        assert_eq!(state.to_string(), "0 / 0 = 0.00%");
    }

    #[test]
    fn counts() {
        let mut state = EvaluationState::new();
        state.record(true);
        state.record(false);
        state.record(true);
        assert_eq!(state.num_valid(), 2);
        assert_eq!(state.num_total(), 3);
        assert_eq!(state.num_invalid(), 1);
        assert_eq!(state.to_string(), "2 / 3 = 66.67%");
    }

    #[test]
    fn full_support() {
        let mut state = EvaluationState::new();
        state.record(true);
        assert_eq!(state.percentage(), 100.);
        assert_eq!(state.to_string(), "1 / 1 = 100.00%");
    }
}
