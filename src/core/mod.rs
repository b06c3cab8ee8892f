mod engine;
mod goal;
mod rates;
mod runway;
mod schedule;
mod solver;
mod summary;
mod target;
mod types;

pub use engine::{FullHorizon, project_accumulation, project_full_horizon};
pub use goal::{DEFAULT_GOAL_CAP_MONTHS, months_to_goal};
pub use rates::monthly_rate;
pub use runway::years_of_runway;
pub use schedule::LumpSumSchedule;
pub use solver::{
    AccumulationPlan, ReturnSolveConfig, solve_required_return, solve_required_return_with,
};
pub use summary::{PlanProjection, run_full_projection, run_plan, summarize_plan};
pub use target::{implied_swr_pct, sustainable_monthly_spend, target_wealth};
pub use types::{
    GoalTime, HORIZON_AGE, LumpSum, PlanParameters, PlanSummary, ProjectionRow, ProjectionSeries,
    RequiredReturn, Runway,
};
