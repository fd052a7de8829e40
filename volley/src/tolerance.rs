use std::cmp::Ordering;

/// The default tolerance: 3 cm.
pub const EPSILON: f64 = 0.03;

// Absorbs the representation error of decimal inputs such as `1.03 - 1.0`,
// so that a gap of exactly one epsilon counts as "ordered".
const FLOAT_SLACK: f64 = 1e-9;

/// Epsilon-aware comparisons between coordinates (in meters).
///
/// All comparisons between coordinates go through this type instead of raw
/// `<`, `>` or `==`. Comparisons involving NaN are always `false`, so a NaN
/// coordinate never satisfies a rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    pub epsilon: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self { epsilon: EPSILON }
    }
}

impl Tolerance {
    pub const fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// `|a - b| <= ε`
    pub fn is_equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.epsilon
    }

    /// `a < b - ε`, i.e. `a` is less than `b` by more than the tolerance.
    pub fn is_less(&self, a: f64, b: f64) -> bool {
        a < b - self.epsilon
    }

    /// `a > b + ε`
    pub fn is_greater(&self, a: f64, b: f64) -> bool {
        a > b + self.epsilon
    }

    pub fn is_less_or_equal(&self, a: f64, b: f64) -> bool {
        a <= b + self.epsilon
    }

    pub fn is_greater_or_equal(&self, a: f64, b: f64) -> bool {
        a >= b - self.epsilon
    }

    /// Three-way comparison where values within ε of each other are equal.
    ///
    /// NaN compares as equal to everything, callers that care must check for it.
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        if self.is_less(a, b) {
            Ordering::Less
        } else if self.is_greater(a, b) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Whether `a` lies at least ε below `b`.
    ///
    /// This is the predicate behind the overlap rules: a gap of exactly ε
    /// is in order, anything smaller is not.
    pub fn is_ordered(&self, a: f64, b: f64) -> bool {
        b - a >= self.epsilon - FLOAT_SLACK
    }

    /// `min - ε <= value <= max + ε`
    pub fn is_within_range(&self, value: f64, min: f64, max: f64) -> bool {
        self.is_greater_or_equal(value, min) && self.is_less_or_equal(value, max)
    }

    /// Clamps `value` into `[min, max]`, leaving values within ε of the
    /// range untouched.
    ///
    /// A NaN value is mapped to `min`.
    pub fn clamp(&self, value: f64, min: f64, max: f64) -> f64 {
        if value.is_nan() || self.is_less(value, min) {
            min
        } else if self.is_greater(value, max) {
            max
        } else {
            value
        }
    }
}

pub fn is_equal(a: f64, b: f64) -> bool {
    Tolerance::default().is_equal(a, b)
}

pub fn is_less(a: f64, b: f64) -> bool {
    Tolerance::default().is_less(a, b)
}

pub fn is_greater(a: f64, b: f64) -> bool {
    Tolerance::default().is_greater(a, b)
}

pub fn is_less_or_equal(a: f64, b: f64) -> bool {
    Tolerance::default().is_less_or_equal(a, b)
}

pub fn is_greater_or_equal(a: f64, b: f64) -> bool {
    Tolerance::default().is_greater_or_equal(a, b)
}

pub fn compare(a: f64, b: f64) -> Ordering {
    Tolerance::default().compare(a, b)
}

pub fn is_ordered(a: f64, b: f64) -> bool {
    Tolerance::default().is_ordered(a, b)
}

pub fn is_within_range(value: f64, min: f64, max: f64) -> bool {
    Tolerance::default().is_within_range(value, min, max)
}

pub fn clamp_with_tolerance(value: f64, min: f64, max: f64) -> f64 {
    Tolerance::default().clamp(value, min, max)
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    quickcheck! {
        fn compare_is_consistent_with_predicates(a: f64, b: f64) -> bool {
            if a.is_nan() || b.is_nan() {
                return true;
            }
            match compare(a, b) {
                Ordering::Less => is_less(a, b) && !is_greater_or_equal(a, b),
                Ordering::Greater => is_greater(a, b) && !is_less_or_equal(a, b),
                Ordering::Equal => !is_less(a, b) && !is_greater(a, b),
            }
        }

        fn clamp_lands_in_range(value: f64) -> bool {
            is_within_range(clamp_with_tolerance(value, 0.0, 9.0), 0.0, 9.0)
        }
    }

    #[test]
    fn equality_within_epsilon() {
        assert!(is_equal(1.0, 1.02));
        assert!(is_equal(1.0, 0.98));
        assert!(!is_equal(1.0, 1.04));
    }

    #[test]
    fn is_less_requires_more_than_epsilon() {
        assert!(!is_less(1.0, 1.02));
        assert!(is_less(1.0, 1.05));
        assert!(!is_less(1.0, 1.0));
    }

    #[test]
    fn ordering_boundary_is_exactly_epsilon() {
        assert!(is_ordered(1.0, 1.03));
        assert!(is_ordered(4.5, 4.53));
        assert!(!is_ordered(1.0, 1.03 - 0.031));
        assert!(!is_ordered(1.0, 1.029));
        assert!(!is_ordered(f64::NAN, 1.0));
    }

    #[test]
    fn custom_epsilon_overrides_default() {
        let strict = Tolerance::new(0.0);
        assert!(!strict.is_equal(1.0, 1.01));
        assert!(strict.is_less(1.0, 1.01));
        let loose = Tolerance::new(0.5);
        assert!(loose.is_equal(1.0, 1.4));
    }

    #[test]
    fn clamp_leaves_near_values_untouched() {
        assert_eq!(clamp_with_tolerance(9.02, 0.0, 9.0), 9.02);
        assert_eq!(clamp_with_tolerance(9.5, 0.0, 9.0), 9.0);
        assert_eq!(clamp_with_tolerance(-1.0, 0.0, 9.0), 0.0);
        assert_eq!(clamp_with_tolerance(f64::NAN, 2.0, 9.0), 2.0);
    }

    #[test]
    fn compare_returns_ordering() {
        assert_eq!(compare(1.0, 2.0), Ordering::Less);
        assert_eq!(compare(2.0, 1.0), Ordering::Greater);
        assert_eq!(compare(1.0, 1.01), Ordering::Equal);
    }
}
