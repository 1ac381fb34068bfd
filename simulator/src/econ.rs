//! Present-value arithmetic.

/// Present value of a single payment made `periods` periods from now at
/// `rate` per period. Period counts beyond `i32::MAX` are clamped.
#[inline]
pub fn pv_single_payment(amount: f64, rate: f64, periods: u32) -> f64 {
    let periods = i32::try_from(periods).unwrap_or(i32::MAX);
    amount / (1.0 + rate).powi(periods)
}

/// Discount factor for an amount accrued during cycle `t` under the half-cycle
/// convention: the rate is split per half-cycle and the amount is placed at the
/// cycle midpoint, `2t + 1` half-cycles from time zero.
#[inline]
pub fn half_cycle_pv(amount: f64, annual_rate: f64, t: u32) -> f64 {
    pv_single_payment(amount, annual_rate / 2.0, t.saturating_mul(2).saturating_add(1))
}
