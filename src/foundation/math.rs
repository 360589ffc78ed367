use std::f64::consts::TAU;

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Wrap an angle in radians into `[0, 2π)`.
///
/// `%` keeps the sign of the dividend, so negative remainders are shifted up by one turn.
/// A tiny negative input can round back up to exactly `2π`; that case collapses to zero.
pub fn normalize_angle(theta: f64) -> f64 {
    let mut t = theta % TAU;
    if t < 0.0 {
        t += TAU;
    }
    if t >= TAU { 0.0 } else { t }
}

/// Split a signed accumulator into its whole part and remainder, truncating toward zero.
///
/// The remainder keeps the accumulator's sign and has magnitude in `[0, 1)`, so
/// `whole + rem == acc` exactly for any accumulator below 2^52 in magnitude.
pub fn split_whole(acc: f64) -> (i64, f64) {
    let whole = acc.trunc();
    (whole as i64, acc - whole)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
