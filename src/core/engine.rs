use super::schedule::LumpSumSchedule;
use super::types::ProjectionSeries;

pub(crate) fn accumulation_step(
    wealth: f64,
    monthly_rate: f64,
    periodic_flow: f64,
    schedule: &LumpSumSchedule,
    next_month: u32,
) -> f64 {
    wealth * (1.0 + monthly_rate) + periodic_flow + schedule.amount_at(next_month)
}

fn decumulation_step(wealth: f64, monthly_rate: f64, monthly_spend: f64) -> f64 {
    wealth * (1.0 + monthly_rate) - monthly_spend
}

pub fn project_accumulation(
    start_wealth: f64,
    periodic_flow: f64,
    months: u32,
    monthly_rate: f64,
    schedule: &LumpSumSchedule,
) -> ProjectionSeries {
    let mut series = ProjectionSeries::with_capacity(months as usize + 1);
    let mut wealth = start_wealth;
    for t in 0..=months {
        series.push(t, wealth);
        if t < months {
            wealth = accumulation_step(wealth, monthly_rate, periodic_flow, schedule, t + 1);
        }
    }
    series
}

pub(crate) fn accumulation_end_wealth(
    start_wealth: f64,
    periodic_flow: f64,
    months: u32,
    monthly_rate: f64,
    schedule: &LumpSumSchedule,
) -> f64 {
    (0..months).fold(start_wealth, |wealth, t| {
        accumulation_step(wealth, monthly_rate, periodic_flow, schedule, t + 1)
    })
}

#[derive(Debug, Clone, Copy)]
pub struct FullHorizon {
    pub accumulation_months: u32,
    pub total_months: u32,
    pub periodic_flow: f64,
    pub accumulation_rate: f64,
    pub decumulation_rate: f64,
    pub decumulation_flow: f64,
}

pub fn project_full_horizon(
    start_wealth: f64,
    horizon: FullHorizon,
    schedule: &LumpSumSchedule,
) -> ProjectionSeries {
    let mut series = ProjectionSeries::with_capacity(horizon.total_months as usize + 1);
    let mut wealth = start_wealth;
    for t in 0..=horizon.total_months {
        series.push(t, wealth.max(0.0));
        if t == horizon.total_months {
            break;
        }
        wealth = if t < horizon.accumulation_months {
            accumulation_step(
                wealth,
                horizon.accumulation_rate,
                horizon.periodic_flow,
                schedule,
                t + 1,
            )
        } else {
            decumulation_step(wealth, horizon.decumulation_rate, horizon.decumulation_flow)
        };
    }
    series
}
