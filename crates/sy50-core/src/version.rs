//! Dotted version comparison.
//!
//! Versions reported by the software inventory are free-form strings such as
//! `"12.3.1"`. They are compared segment by segment as integers. The
//! comparison is deliberately lossy: a segment that does not parse as a
//! signed integer (empty, alphabetic, overflowing) counts as zero rather
//! than being rejected. A leading sign is honoured, so `"-1"` sorts below
//! `"0"`.

use serde::{Deserialize, Serialize};

/// Result of comparing an installed version against a target version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionComparison {
    /// The target is strictly newer than what is installed.
    TargetGreater,
    /// The installed version is equal to or newer than the target.
    TargetNotGreater,
}

impl VersionComparison {
    /// Compare `current` against `target`.
    pub fn of(current: &str, target: &str) -> Self {
        if is_target_greater(current, target) {
            Self::TargetGreater
        } else {
            Self::TargetNotGreater
        }
    }

    /// True when an update to the target is warranted.
    pub const fn is_update(self) -> bool {
        matches!(self, Self::TargetGreater)
    }
}

/// Returns `true` when `target` is a strictly greater version than `current`.
///
/// Overlapping segments are compared numerically; the first differing segment
/// decides. When every overlapping segment is equal, the string with more
/// segments wins, so `"1.2.0"` is greater than `"1.2"`.
///
/// ```
/// use sy50_core::version::is_target_greater;
///
/// assert!(is_target_greater("1.2", "1.2.0"));
/// assert!(!is_target_greater("01.2", "1.2"));
/// assert!(is_target_greater("", "1.0"));
/// ```
pub fn is_target_greater(current: &str, target: &str) -> bool {
    let current_parts: Vec<&str> = current.split('.').collect();
    let target_parts: Vec<&str> = target.split('.').collect();

    for (cur, tgt) in current_parts.iter().zip(target_parts.iter()) {
        let cur = segment_value(cur);
        let tgt = segment_value(tgt);
        if tgt != cur {
            return tgt > cur;
        }
    }

    target_parts.len() > current_parts.len()
}

/// Numeric value of one version segment; anything unparseable is zero.
fn segment_value(segment: &str) -> i64 {
    segment.parse::<i64>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Zero-pads both versions to the same segment count for equality checks.
    fn padded(a: &str, b: &str) -> (Vec<i64>, Vec<i64>) {
        let mut left: Vec<i64> = a.split('.').map(segment_value).collect();
        let mut right: Vec<i64> = b.split('.').map(segment_value).collect();
        let len = left.len().max(right.len());
        left.resize(len, 0);
        right.resize(len, 0);
        (left, right)
    }

    const SAMPLES: &[&str] = &[
        "", "0", "1", "1.0", "1.2", "1.2.0", "1.2.1", "1.10", "01.2", "2", "2.0.0.1", "12.3.1",
        "12.3.x", "abc", "1..3", "99999999999999999999999.1", "3.4.5.6.7", "-1", "1.-2", "+2",
    ];

    #[test]
    fn test_longer_equal_prefix_is_greater() {
        assert!(is_target_greater("1.2", "1.2.0"));
        assert!(!is_target_greater("1.2.0", "1.2"));
    }

    #[test]
    fn test_leading_zeros_are_ignored() {
        assert!(!is_target_greater("01.2", "1.2"));
        assert!(!is_target_greater("1.2", "01.2"));
    }

    #[test]
    fn test_empty_and_non_numeric_segments_are_zero() {
        assert!(is_target_greater("", "1.0"));
        assert!(is_target_greater("1.x", "1.1"));
        assert!(!is_target_greater("1.1", "1.beta"));
    }

    #[test]
    fn test_signed_segments() {
        assert!(is_target_greater("-1", "0"));
        assert!(!is_target_greater("0", "-1"));
        assert!(is_target_greater("1.-2", "1.0"));
        assert!(!is_target_greater("+2", "2"));
    }

    #[test]
    fn test_segments_compare_numerically_not_lexically() {
        assert!(is_target_greater("1.9", "1.10"));
        assert!(!is_target_greater("1.10", "1.9"));
        assert!(is_target_greater("12.3.1", "12.4"));
    }

    #[test]
    fn test_first_difference_decides() {
        assert!(!is_target_greater("2.0", "1.9.9.9"));
        assert!(is_target_greater("1.9.9.9", "2.0"));
    }

    #[test]
    fn test_equal_versions_are_not_greater() {
        for v in SAMPLES {
            assert!(!is_target_greater(v, v), "{v:?} compared against itself");
        }
    }

    #[test]
    fn test_antisymmetric_when_padded_values_differ() {
        for a in SAMPLES {
            for b in SAMPLES {
                let (left, right) = padded(a, b);
                if left == right {
                    continue;
                }
                assert_eq!(
                    is_target_greater(a, b),
                    !is_target_greater(b, a),
                    "a={a:?} b={b:?}"
                );
            }
        }
    }

    #[test]
    fn test_comparison_enum() {
        assert_eq!(
            VersionComparison::of("1.0.0", "1.5.0"),
            VersionComparison::TargetGreater
        );
        assert_eq!(
            VersionComparison::of("1.0.0", "1.0.0"),
            VersionComparison::TargetNotGreater
        );
        assert!(VersionComparison::of("1", "2").is_update());
        assert!(!VersionComparison::of("2", "1").is_update());
    }
}
