use super::types::Runway;

/// Years a drawdown portfolio lasts under a constant real spend and return, in closed form.
///
/// Uses annual compounding, so for a positive return it is slightly more generous than the
/// monthly step-wise projection of the same plan.
pub fn years_of_runway(starting_wealth: f64, annual_spend: f64, real_return_pct: f64) -> Runway {
    if annual_spend <= 0.0 {
        return Runway::Perpetual;
    }

    let r = real_return_pct / 100.0;
    if r == 0.0 {
        return Runway::Years {
            years: starting_wealth / annual_spend,
        };
    }

    let ratio = 1.0 - (starting_wealth * r) / annual_spend;
    if ratio <= 0.0 {
        return Runway::Perpetual;
    }

    Runway::Years {
        years: -ratio.ln() / (1.0 + r).ln(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::{FullHorizon, project_full_horizon};
    use crate::core::rates::monthly_rate;
    use crate::core::schedule::LumpSumSchedule;

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn drawdown_only(wealth: f64, annual_spend: f64, return_pct: f64, months: u32) -> Option<u32> {
        let horizon = FullHorizon {
            accumulation_months: 0,
            total_months: months,
            periodic_flow: 0.0,
            accumulation_rate: 0.0,
            decumulation_rate: monthly_rate(return_pct),
            decumulation_flow: annual_spend / 12.0,
        };
        project_full_horizon(wealth, horizon, &LumpSumSchedule::empty()).first_depleted_month()
    }

    #[test]
    fn no_spending_is_perpetual() {
        assert_eq!(years_of_runway(1_000.0, 0.0, 3.0), Runway::Perpetual);
        assert_eq!(years_of_runway(1_000.0, -5.0, 0.0), Runway::Perpetual);
    }

    #[test]
    fn return_covering_spend_is_perpetual() {
        assert!(years_of_runway(1_000_000.0, 39_000.0, 4.0).is_perpetual());
        assert!(years_of_runway(1_000_000.0, 30_000.0, 5.0).is_perpetual());
    }

    #[test]
    fn zero_return_divides_wealth_by_spend() {
        assert_eq!(
            years_of_runway(900_000.0, 60_000.0, 0.0),
            Runway::Years { years: 15.0 }
        );
    }

    #[test]
    fn positive_return_extends_runway() {
        let years = years_of_runway(1_000_000.0, 60_000.0, 3.0)
            .years()
            .expect("finite");
        assert_approx_tol(years, 2f64.ln() / 1.03f64.ln(), 1e-12);
        assert!(years > 1_000_000.0 / 60_000.0);
    }

    #[test]
    fn negative_return_shortens_runway() {
        let years = years_of_runway(1_000_000.0, 60_000.0, -2.0)
            .years()
            .expect("finite");
        assert!(years < 1_000_000.0 / 60_000.0);
        assert!(years > 0.0);
    }

    #[test]
    fn empty_portfolio_has_no_runway() {
        assert_eq!(years_of_runway(0.0, 12_000.0, 5.0).years(), Some(0.0));
    }

    #[test]
    fn zero_return_runway_matches_stepwise_depletion_month() {
        let years = years_of_runway(1_200_000.0, 120_000.0, 0.0)
            .years()
            .expect("finite");
        let depleted = drawdown_only(1_200_000.0, 120_000.0, 0.0, 1_200).expect("depletes");
        assert!((years * 12.0 - f64::from(depleted)).abs() <= 1.0);
    }

    #[test]
    fn positive_return_runway_tracks_stepwise_depletion() {
        let closed_months = years_of_runway(1_000_000.0, 60_000.0, 3.0)
            .years()
            .expect("finite")
            * 12.0;
        let depleted = f64::from(drawdown_only(1_000_000.0, 60_000.0, 3.0, 1_200).expect("depletes"));
        assert!(depleted <= closed_months + 1.0);
        assert!(closed_months - depleted < 12.0);
    }

    #[test]
    fn perpetual_runway_never_depletes_stepwise() {
        assert!(years_of_runway(1_000_000.0, 20_000.0, 4.0).is_perpetual());
        assert_eq!(drawdown_only(1_000_000.0, 20_000.0, 4.0, 1_200), None);
    }

    #[test]
    fn finite_runway_depletes_stepwise_within_horizon() {
        for (wealth, spend, pct) in [
            (500_000.0, 50_000.0, 2.0),
            (2_000_000.0, 150_000.0, 5.0),
            (250_000.0, 30_000.0, -1.0),
        ] {
            let years = years_of_runway(wealth, spend, pct).years().expect("finite");
            let depleted = drawdown_only(wealth, spend, pct, 1_200).expect("depletes");
            assert!(f64::from(depleted) <= years * 12.0 + 1.0);
        }
    }
}
