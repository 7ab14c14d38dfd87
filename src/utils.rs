/// Rounds `value` to `precision` decimal places, ties to even.
///
/// The rounding is decided on the exact binary value of the float, which is
/// what most dataframe libraries do. A naive
/// `(x * 10^p).round() / 10^p` rounds `2.675` up to `2.68`; the value actually
/// stored is slightly below the tie, so the correct answer is `2.67`.
pub(crate) fn round_half_even(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", precision as usize, value)
        .parse()
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_uses_exact_binary_value() {
        assert_eq!(round_half_even(2.675, 2), 2.67);
        assert_eq!(round_half_even(1.0051, 2), 1.01);
        assert_eq!(round_half_even(-3.14159, 3), -3.142);
    }

    #[test]
    fn test_round_ties_to_even_at_zero_precision() {
        assert_eq!(round_half_even(2.5, 0), 2.0);
        assert_eq!(round_half_even(3.5, 0), 4.0);
        assert_eq!(round_half_even(0.5, 0), 0.0);
    }

    #[test]
    fn test_round_keeps_non_finite_values() {
        assert!(round_half_even(f64::NAN, 2).is_nan());
        assert_eq!(round_half_even(f64::INFINITY, 1), f64::INFINITY);
    }
}
