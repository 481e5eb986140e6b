//! Fixed-point token amount rendering.

use alloy_primitives::U256;

/// Render a fixed-point integer `amount` with `decimals` decimal places as a
/// human-readable decimal string. Trailing zeros in the fractional part are
/// trimmed, so `1_500_000` with 6 decimals renders as `1.5`, not `1.500000`.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let scale = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / scale;
    let frac = amount % scale;

    if frac.is_zero() {
        return whole.to_string();
    }

    // Left-pad the fractional part to the full width before trimming.
    let digits = frac.to_string();
    let padded = format!("{}{digits}", "0".repeat(decimals as usize - digits.len()));
    format!("{whole}.{}", padded.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_zeros() {
        assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
    }

    #[test]
    fn whole_amounts_have_no_fraction() {
        assert_eq!(format_units(U256::from(1_000_000u64), 6), "1");
        assert_eq!(format_units(U256::ZERO, 6), "0");
    }

    #[test]
    fn small_amounts_keep_leading_zeros() {
        assert_eq!(format_units(U256::from(123u64), 6), "0.000123");
    }

    #[test]
    fn full_precision_is_preserved() {
        assert_eq!(format_units(U256::from(1_234_567u64), 6), "1.234567");
    }

    #[test]
    fn zero_decimals_is_identity() {
        assert_eq!(format_units(U256::from(42u64), 0), "42");
    }
}
