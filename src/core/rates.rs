pub fn monthly_rate(annual_real_pct: f64) -> f64 {
    (1.0 + annual_real_pct / 100.0).powf(1.0 / 12.0) - 1.0
}
