//! Rendering of raw token amounts.

/// Formats a raw amount with `decimals` decimal places, e.g. `1500000` with
/// six decimals becomes `1.500000`.
pub fn ui_amount(raw: u128, decimals: u8) -> String {
    if decimals == 0 {
        return raw.to_string();
    }
    let digits = format!("{:0>width$}", raw, width = decimals as usize + 1);
    let (whole, frac) = digits.split_at(digits.len() - decimals as usize);
    format!("{}.{}", whole, frac)
}
