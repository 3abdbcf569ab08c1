use num_bigint::BigUint;
use num_traits::Zero;

/// Ratios are computed at this many fractional digits before truncation.
pub const RATIO_SCALE_DIGITS: u32 = 6;
pub const RATIO_DISPLAY_DIGITS: usize = 4;

/// `numerator / denominator` scaled by `10^scale_digits` and rendered with
/// `display_digits` fractional digits, truncating. `None` when the denominator
/// is zero.
pub fn scaled_ratio(
    numerator: &BigUint,
    denominator: &BigUint,
    scale_digits: u32,
    display_digits: usize,
) -> Option<String> {
    if denominator.is_zero() {
        return None;
    }
    let scale = BigUint::from(10u32).pow(scale_digits);
    let scaled = numerator * &scale / denominator;
    Some(render(&scaled, &scale, scale_digits as usize, display_digits))
}

/// The pool staking ratio: six-digit scaling, four digits shown.
pub fn ratio_4dp(numerator: &BigUint, denominator: &BigUint) -> Option<String> {
    scaled_ratio(
        numerator,
        denominator,
        RATIO_SCALE_DIGITS,
        RATIO_DISPLAY_DIGITS,
    )
}

/// Truncates like `ratio_4dp`, so `2 / 3` renders as `0.6`.
pub fn ratio_1dp(numerator: u64, denominator: u64) -> Option<String> {
    scaled_ratio(&BigUint::from(numerator), &BigUint::from(denominator), 1, 1)
}

/// `value / max(divisor, 1)`.
pub fn div_floor_one(value: &BigUint, divisor: &BigUint) -> BigUint {
    if divisor.is_zero() {
        value.clone()
    } else {
        value / divisor
    }
}

pub fn zero_ratio_4dp() -> String {
    format!("0.{}", "0".repeat(RATIO_DISPLAY_DIGITS))
}

fn render(scaled: &BigUint, scale: &BigUint, scale_digits: usize, display_digits: usize) -> String {
    let whole = scaled / scale;
    if display_digits == 0 {
        return whole.to_string();
    }
    let fraction = format!("{:0>width$}", (scaled % scale).to_string(), width = scale_digits);
    let shown = display_digits.min(scale_digits);
    format!("{}.{}", whole, &fraction[..shown])
}
