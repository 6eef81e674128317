//! Utility functions, used throughout the crate.

/// Truncate a geometry input towards zero. NaN becomes zero, infinities saturate.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn truncate(value: f32) -> i32 {
    value.trunc() as i32
}

/// `value`, or `fallback` if `value` is NaN or infinite.
#[must_use]
pub fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Greatest common divisor. `gcd(0, n) == n`.
#[must_use]
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple, or `None` on overflow. `lcm` with zero is zero.
#[must_use]
pub fn lcm(a: u64, b: u64) -> Option<u64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}

/// GCD of every value, or `None` if there are none.
pub fn gcd_all(values: impl IntoIterator<Item = u64>) -> Option<u64> {
    values.into_iter().reduce(gcd)
}

/// LCM of every value, or `None` if there are none or the result overflows.
pub fn lcm_all(values: impl IntoIterator<Item = u64>) -> Option<u64> {
    let mut values = values.into_iter();
    let first = values.next()?;
    values.try_fold(first, lcm)
}
