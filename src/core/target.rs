const MIN_WITHDRAWAL_RATE: f64 = 1e-9;

pub fn target_wealth(monthly_spend: f64, swr_pct: f64) -> f64 {
    (monthly_spend * 12.0) / (swr_pct / 100.0).max(MIN_WITHDRAWAL_RATE)
}

pub fn implied_swr_pct(wealth: f64, monthly_spend: f64) -> Option<f64> {
    if wealth <= 0.0 {
        return None;
    }
    Some(monthly_spend * 12.0 / wealth * 100.0)
}

pub fn sustainable_monthly_spend(wealth: f64, swr_pct: f64) -> f64 {
    (wealth * swr_pct / 100.0 / 12.0).max(0.0)
}
