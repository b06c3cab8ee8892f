use tracing::{debug, trace};

use super::engine::accumulation_end_wealth;
use super::rates::monthly_rate;
use super::schedule::LumpSumSchedule;
use super::types::RequiredReturn;

#[derive(Debug, Clone, Copy)]
pub struct AccumulationPlan<'a> {
    pub start_wealth: f64,
    pub periodic_flow: f64,
    pub months: u32,
    pub annual_return_pct: f64,
    pub schedule: &'a LumpSumSchedule,
}

impl AccumulationPlan<'_> {
    fn end_wealth_at(&self, annual_rate: f64) -> f64 {
        accumulation_end_wealth(
            self.start_wealth,
            self.periodic_flow,
            self.months,
            monthly_rate(annual_rate * 100.0),
            self.schedule,
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReturnSolveConfig {
    pub initial_low: f64,
    pub initial_high: f64,
    pub expansion_step: f64,
    pub search_cap: f64,
    pub rate_floor: f64,
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for ReturnSolveConfig {
    fn default() -> Self {
        Self {
            initial_low: -0.5,
            initial_high: 0.5,
            expansion_step: 0.25,
            search_cap: 3.0,
            rate_floor: -0.99,
            max_iterations: 40,
            tolerance: 1.0,
        }
    }
}

pub fn solve_required_return(plan: &AccumulationPlan<'_>, target: f64) -> RequiredReturn {
    solve_required_return_with(plan, target, ReturnSolveConfig::default())
}

/// Minimal annual accumulation return at which the plan reaches `target` by its last month.
///
/// Bisection is valid because end wealth is non-decreasing in the rate when every other input is
/// held fixed. That property is assumed here and covered by the engine's tests.
pub fn solve_required_return_with(
    plan: &AccumulationPlan<'_>,
    target: f64,
    config: ReturnSolveConfig,
) -> RequiredReturn {
    if plan.months == 0 {
        return RequiredReturn::NotApplicable;
    }

    let current = plan.end_wealth_at(plan.annual_return_pct / 100.0);
    if current >= target {
        return RequiredReturn::AlreadyMet;
    }

    let objective = |annual_rate: f64| plan.end_wealth_at(annual_rate) - target;

    let mut lo = config.initial_low.max(config.rate_floor);
    let mut hi = config.initial_high.min(config.search_cap);
    let mut f_lo = objective(lo);
    let mut f_hi = objective(hi);
    while !brackets_root(f_lo, f_hi) {
        if hi >= config.search_cap {
            debug!(
                target_wealth = target,
                months = plan.months,
                best_end_wealth = f_hi + target,
                "no return within the search cap reaches the target"
            );
            return RequiredReturn::Unsolvable;
        }
        lo = (lo - config.expansion_step).max(config.rate_floor);
        hi = (hi + config.expansion_step).min(config.search_cap);
        f_lo = objective(lo);
        f_hi = objective(hi);
    }

    for iteration in 1..=config.max_iterations {
        let mid = (lo + hi) * 0.5;
        let f_mid = objective(mid);
        trace!(iteration, lo, hi, mid, f_mid, "required return bisection");

        if f_mid.abs() < config.tolerance {
            return RequiredReturn::Solved { annual_rate: mid };
        }
        if same_sign(f_mid, f_lo) {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    RequiredReturn::Solved {
        annual_rate: (lo + hi) * 0.5,
    }
}

fn brackets_root(f_lo: f64, f_hi: f64) -> bool {
    (f_lo <= 0.0 && f_hi >= 0.0) || (f_lo >= 0.0 && f_hi <= 0.0)
}

fn same_sign(a: f64, b: f64) -> bool {
    (a < 0.0) == (b < 0.0)
}
