/// Numerical helpers shared by the grid builders
///
/// Finite differences, array derivations (widths, centers), and the
/// deviation assertion used across the test suites.

/// Assert that the deviation between two values is less than a threshold
///
/// Calculates the percentage deviation between `actual` and `expected`, then
/// asserts that this deviation is less than the specified `max_deviation`.
#[macro_export]
macro_rules! assert_deviation {
    ($actual:expr, $expected:expr, $max_deviation:expr) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.2}% >= {:.2}%\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, actual_val, expected_val
                );
            }
        }
    };
    ($actual:expr, $expected:expr, $max_deviation:expr, $($arg:tt)+) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.2}% >= {:.2}%: {}\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, format_args!($($arg)+), actual_val, expected_val
                );
            }
        }
    };
}

/// `count` evenly spaced values over `[start, stop]`, both ends exact.
///
/// # Examples
/// ```
/// use crater_grid::math_utils::linspace;
///
/// assert_eq!(linspace(0.0, 10.0, 3), vec![0.0, 5.0, 10.0]);
/// ```
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
            values[count - 1] = stop;
            values
        }
    }
}

/// Midpoint of two coordinates, halved before summing.
///
/// The halving order matters: refinement and smoothing both insert points
/// computed this way, so every caller must agree on it bit for bit.
#[inline]
pub fn midpoint(a: f64, b: f64) -> f64 {
    a / 2.0 + b / 2.0
}

/// Consecutive differences `x[i+1] - x[i]`.
pub fn diffs(x: &[f64]) -> Vec<f64> {
    x.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Cell centers `(x[i+1] + x[i]) / 2`.
pub fn centers(x: &[f64]) -> Vec<f64> {
    x.windows(2).map(|w| (w[1] + w[0]) / 2.0).collect()
}

/// `a / b`, or positive infinity when `b` is exactly zero.
pub fn div_or_inf(a: f64, b: f64) -> f64 {
    if b != 0.0 { a / b } else { f64::INFINITY }
}

/// Centered first difference of `f` at `x` with step `h`.
pub fn first_difference<F: Fn(f64) -> f64>(f: F, x: f64, h: f64) -> f64 {
    (f(x + h) - f(x - h)) / (2.0 * h)
}

/// Centered second difference of `f` at `x` with step `h`.
pub fn second_difference<F: Fn(f64) -> f64>(f: F, x: f64, h: f64) -> f64 {
    (f(x - h) - 2.0 * f(x) + f(x + h)) / (h * h)
}

/// True when every element is strictly greater than the one before it.
pub fn is_strictly_increasing(x: &[f64]) -> bool {
    x.windows(2).all(|w| w[1] > w[0])
}

/// Smallest value in a slice, `None` when empty.
pub fn min_value(x: &[f64]) -> Option<f64> {
    x.iter().copied().reduce(f64::min)
}

/// Calculate the percentage deviation between two values
///
/// Uses the expected value as the reference for the percentage.
///
/// # Examples
/// ```
/// use crater_grid::math_utils::deviation;
///
/// assert_eq!(deviation(105.0, 100.0), 5.0);
/// assert_eq!(deviation(95.0, 100.0), 5.0);
/// ```
pub fn deviation(actual: f64, expected: f64) -> f64 {
    if expected.abs() < f64::EPSILON {
        if actual.abs() < f64::EPSILON {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        ((actual - expected).abs() / expected.abs()) * 100.0
    }
}
