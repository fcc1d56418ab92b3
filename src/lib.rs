use log::debug;
use std::collections::HashSet;

pub mod hex;
pub mod preset;
pub mod utils;

pub use preset::{
    build_element, build_preset, decode_preset, encode_preset, generate, ElementRecord,
    PresetRecord, PresetRequest, TargetSelection,
};
pub use utils::{bytes_label, parse_form, to_fixed1, FormValues, ValidationError};

/// Tolerance used to decide whether a countdown value is a whole second.
pub const INTEGER_EPSILON: f64 = 1e-9;

/// Decrement unit between two consecutive countdown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// Whole seconds (1.0)
    Whole,
    /// Tenths of a second (0.1)
    Tenth,
}

impl Granularity {
    pub fn as_f64(self) -> f64 {
        match self {
            Granularity::Whole => 1.0,
            Granularity::Tenth => 0.1,
        }
    }
}

/// One entry of the countdown display schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownStep {
    pub value: f64,
    pub granularity: Granularity,
}

impl CountdownStep {
    pub fn whole(value: f64) -> Self {
        Self {
            value,
            granularity: Granularity::Whole,
        }
    }

    pub fn tenth(value: f64) -> Self {
        Self {
            value,
            granularity: Granularity::Tenth,
        }
    }

    /// True when the value sits on a whole second.
    pub fn is_whole_value(&self) -> bool {
        (self.value - self.value.round()).abs() < INTEGER_EPSILON
    }
}

/// `Math.round` semantics: halves go toward positive infinity.
#[inline]
pub fn js_round(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round to one decimal place without accumulating binary drift.
#[inline]
pub fn round1(x: f64) -> f64 {
    js_round(x * 10.0) / 10.0
}

/// Builds the countdown schedule for `start_seconds`, switching to tenth-second
/// steps once the value reaches `sub_second_threshold`.
///
/// # Arguments
/// * `start_seconds` - First value shown; zero or negative yields an empty schedule
/// * `sub_second_threshold` - Cutoff for tenth-second steps; `None` or `<= 0` disables them
///
/// # Returns
/// Steps in strictly descending order. Whole steps come first, then tenth steps
/// from the cutoff down to 0.1.
pub fn build_countdown_values(
    start_seconds: i64,
    sub_second_threshold: Option<i64>,
) -> Vec<CountdownStep> {
    let start = start_seconds;
    let threshold = sub_second_threshold.unwrap_or(0).max(0);
    let mut out = Vec::new();

    if threshold == 0 {
        out.extend((1..=start).rev().map(|v| CountdownStep::whole(v as f64)));
        debug!("Built {} whole-second steps from {}", out.len(), start);
        return out;
    }

    let cutoff = threshold.min(start);
    if let Some(above_cutoff) = cutoff.checked_add(1) {
        out.extend(
            (above_cutoff.max(1)..=start)
                .rev()
                .map(|v| CountdownStep::whole(v as f64)),
        );
    }

    let mut x = cutoff as f64;
    while round1(x) >= 0.1 {
        let value = round1(x);
        out.push(CountdownStep::tenth(value));
        x = round1(x - 0.1);
        // At large magnitudes subtracting a tenth no longer changes the value
        if x >= value {
            break;
        }
    }

    // Both passes may meet at the cutoff; keep the first occurrence.
    let mut seen = HashSet::new();
    out.retain(|step| seen.insert((to_fixed1(step.value), step.granularity)));

    debug!(
        "Built {} steps from {} with sub-second cutoff {}",
        out.len(),
        start,
        cutoff
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(steps: &[CountdownStep]) -> Vec<f64> {
        steps.iter().map(|s| s.value).collect()
    }

    #[test]
    fn whole_seconds_only_without_threshold() {
        let steps = build_countdown_values(3, None);
        assert_eq!(
            steps,
            vec![
                CountdownStep::whole(3.0),
                CountdownStep::whole(2.0),
                CountdownStep::whole(1.0),
            ]
        );
        assert_eq!(build_countdown_values(3, Some(0)), steps);
    }

    #[test]
    fn non_positive_start_is_empty() {
        assert!(build_countdown_values(0, None).is_empty());
        assert!(build_countdown_values(-4, None).is_empty());
        assert!(build_countdown_values(0, Some(3)).is_empty());
    }

    #[test]
    fn negative_threshold_behaves_like_zero() {
        assert_eq!(
            build_countdown_values(4, Some(-2)),
            build_countdown_values(4, None)
        );
    }

    #[test]
    fn threshold_above_start_is_clamped() {
        let steps = build_countdown_values(2, Some(5));
        assert_eq!(steps.len(), 20);
        assert!(steps.iter().all(|s| s.granularity == Granularity::Tenth));
        assert_eq!(steps.first().map(|s| s.value), Some(2.0));
        assert_eq!(steps.last().map(|s| s.value), Some(0.1));
    }

    #[test]
    fn saturated_inputs_do_not_overflow_or_spin() {
        let steps = build_countdown_values(i64::MAX, Some(i64::MAX));
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].granularity, Granularity::Tenth);
        assert_eq!(steps[0].value, i64::MAX as f64);
    }

    #[test]
    fn mixed_schedule_switches_at_cutoff() {
        let steps = build_countdown_values(5, Some(1));
        let whole: Vec<_> = steps
            .iter()
            .filter(|s| s.granularity == Granularity::Whole)
            .collect();
        assert_eq!(whole.len(), 4);
        assert_eq!(
            values(&steps),
            vec![5.0, 4.0, 3.0, 2.0, 1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1]
        );
        assert_eq!(steps[4], CountdownStep::tenth(1.0));
    }

    #[test]
    fn tenth_values_do_not_drift() {
        let steps = build_countdown_values(10, Some(10));
        assert_eq!(steps.len(), 100);
        for (i, step) in steps.iter().enumerate() {
            let expected = (100 - i) as f64 / 10.0;
            assert_eq!(step.value, expected, "step {}", i);
        }
    }

    #[test]
    fn js_round_ties_toward_positive_infinity() {
        assert_eq!(js_round(2.5), 3.0);
        assert_eq!(js_round(-2.5), -2.0);
        assert_eq!(js_round(-0.4), -0.0);
        assert_eq!(js_round(0.49999999999999994), 0.0);
    }

    #[test]
    fn round1_removes_subtraction_error() {
        assert_eq!(round1(0.3 - 0.1), 0.2);
        assert_eq!(round1(1.0 - 0.1), 0.9);
        assert_eq!(round1(0.1 - 0.1), 0.0);
    }

    #[test]
    fn whole_value_detection() {
        assert!(CountdownStep::whole(3.0).is_whole_value());
        assert!(CountdownStep::tenth(2.0).is_whole_value());
        assert!(!CountdownStep::tenth(1.9).is_whole_value());
    }
}
