use super::engine::{FullHorizon, project_accumulation, project_full_horizon};
use super::goal::{DEFAULT_GOAL_CAP_MONTHS, months_to_goal};
use super::rates::monthly_rate;
use super::runway::years_of_runway;
use super::schedule::LumpSumSchedule;
use super::solver::{AccumulationPlan, solve_required_return};
use super::target::{implied_swr_pct, sustainable_monthly_spend, target_wealth};
use super::types::{LumpSum, PlanParameters, PlanSummary, ProjectionSeries};

#[derive(Debug, Clone, PartialEq)]
pub struct PlanProjection {
    pub series: ProjectionSeries,
    pub summary: PlanSummary,
}

pub fn run_plan(params: &PlanParameters, lump_sums: &[LumpSum]) -> PlanProjection {
    PlanProjection {
        series: run_full_projection(params, lump_sums),
        summary: summarize_plan(params, lump_sums),
    }
}

pub fn run_full_projection(params: &PlanParameters, lump_sums: &[LumpSum]) -> ProjectionSeries {
    let accumulation_months = params.accumulation_months();
    let schedule = LumpSumSchedule::build(lump_sums, accumulation_months);
    project_full_horizon(
        params.current_wealth,
        FullHorizon {
            accumulation_months,
            total_months: params.total_months(),
            periodic_flow: params.monthly_saving,
            accumulation_rate: monthly_rate(params.accumulation_return_pct),
            decumulation_rate: monthly_rate(params.retirement_return_pct),
            decumulation_flow: params.monthly_spend,
        },
        &schedule,
    )
}

pub fn summarize_plan(params: &PlanParameters, lump_sums: &[LumpSum]) -> PlanSummary {
    let accumulation_months = params.accumulation_months();
    let accumulation_rate = monthly_rate(params.accumulation_return_pct);
    let schedule = LumpSumSchedule::build(lump_sums, accumulation_months);

    let target = target_wealth(params.monthly_spend, params.swr_pct);
    let wealth_at_retirement = project_accumulation(
        params.current_wealth,
        params.monthly_saving,
        accumulation_months,
        accumulation_rate,
        &schedule,
    )
    .last_wealth()
    .unwrap_or(params.current_wealth);
    let gap = target - wealth_at_retirement;

    let required_return = solve_required_return(
        &AccumulationPlan {
            start_wealth: params.current_wealth,
            periodic_flow: params.monthly_saving,
            months: accumulation_months,
            annual_return_pct: params.accumulation_return_pct,
            schedule: &schedule,
        },
        target,
    );

    let runway = years_of_runway(
        wealth_at_retirement,
        params.monthly_spend * 12.0,
        params.retirement_return_pct,
    );

    let drawdown_start_age = params.current_age.max(params.retirement_age);

    let months_to_goal = months_to_goal(
        params.current_wealth,
        params.monthly_saving,
        accumulation_rate,
        &schedule,
        target,
        DEFAULT_GOAL_CAP_MONTHS,
    );

    PlanSummary {
        accumulation_months,
        total_months: params.total_months(),
        target_wealth: target,
        wealth_at_retirement,
        implied_swr_pct: implied_swr_pct(wealth_at_retirement, params.monthly_spend),
        sustainable_monthly_spend: sustainable_monthly_spend(wealth_at_retirement, params.swr_pct),
        gap,
        progress_pct: progress_pct(params.current_wealth, target),
        required_extra_monthly_saving: required_extra_monthly_saving(
            gap,
            accumulation_rate,
            accumulation_months,
        ),
        required_return,
        runway,
        runway_end_age: runway
            .years()
            .map(|years| f64::from(drawdown_start_age) + years),
        months_to_goal,
        goal_age: months_to_goal
            .months()
            .map(|months| f64::from(params.current_age) + f64::from(months) / 12.0),
    }
}

fn progress_pct(current_wealth: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 100.0;
    }
    (current_wealth / target * 100.0).clamp(0.0, 100.0)
}

fn required_extra_monthly_saving(gap: f64, monthly_rate: f64, months: u32) -> Option<f64> {
    if months == 0 {
        return None;
    }
    if gap <= 0.0 {
        return Some(0.0);
    }
    // End wealth is linear in the periodic flow, lump sums included.
    Some(gap / annuity_factor(monthly_rate, months))
}

fn annuity_factor(monthly_rate: f64, months: u32) -> f64 {
    if monthly_rate.abs() < 1e-12 {
        return f64::from(months);
    }
    ((1.0 + monthly_rate).powf(f64::from(months)) - 1.0) / monthly_rate
}
