use super::engine::accumulation_step;
use super::schedule::LumpSumSchedule;
use super::types::GoalTime;

pub const DEFAULT_GOAL_CAP_MONTHS: u32 = 1_200;

pub fn months_to_goal(
    start_wealth: f64,
    periodic_flow: f64,
    monthly_rate: f64,
    schedule: &LumpSumSchedule,
    target: f64,
    cap_months: u32,
) -> GoalTime {
    if target <= 0.0 || start_wealth >= target {
        return GoalTime::Months { months: 0 };
    }

    let mut wealth = start_wealth;
    for month in 1..=cap_months {
        wealth = accumulation_step(wealth, monthly_rate, periodic_flow, schedule, month);
        if wealth >= target {
            return GoalTime::Months { months: month };
        }
    }
    GoalTime::Unreachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::project_accumulation;
    use crate::core::rates::monthly_rate;
    use crate::core::types::LumpSum;
    use proptest::prelude::{prop_assert, proptest};

    #[test]
    fn non_positive_target_is_met_immediately() {
        let schedule = LumpSumSchedule::empty();
        assert_eq!(
            months_to_goal(0.0, 0.0, 0.0, &schedule, 0.0, 10),
            GoalTime::Months { months: 0 }
        );
        assert_eq!(
            months_to_goal(-500.0, -10.0, 0.0, &schedule, -1.0, 10),
            GoalTime::Months { months: 0 }
        );
    }

    #[test]
    fn start_at_or_above_target_is_month_zero() {
        let schedule = LumpSumSchedule::empty();
        assert_eq!(
            months_to_goal(1_000.0, 0.0, 0.0, &schedule, 1_000.0, 10).months(),
            Some(0)
        );
    }

    #[test]
    fn linear_savings_reach_target_on_exact_month() {
        let schedule = LumpSumSchedule::empty();
        assert_eq!(
            months_to_goal(0.0, 250.0, 0.0, &schedule, 3_000.0, 1_200).months(),
            Some(12)
        );
        assert_eq!(
            months_to_goal(0.0, 250.0, 0.0, &schedule, 3_001.0, 1_200).months(),
            Some(13)
        );
    }

    #[test]
    fn lump_sum_can_pull_goal_forward() {
        let schedule = LumpSumSchedule::build(
            &[LumpSum {
                id: "sale".to_string(),
                month: 6,
                amount: 10_000.0,
            }],
            1_200,
        );
        assert_eq!(
            months_to_goal(0.0, 100.0, 0.0, &schedule, 10_500.0, 1_200).months(),
            Some(6)
        );
    }

    #[test]
    fn stalled_plan_is_unreachable_within_cap() {
        let schedule = LumpSumSchedule::empty();
        assert_eq!(
            months_to_goal(1_000.0, 0.0, 0.0, &schedule, 2_000.0, DEFAULT_GOAL_CAP_MONTHS),
            GoalTime::Unreachable
        );
        assert_eq!(
            months_to_goal(1_000.0, -10.0, monthly_rate(-3.0), &schedule, 2_000.0, 1_200),
            GoalTime::Unreachable
        );
    }

    #[test]
    fn growth_alone_doubles_in_expected_time() {
        let schedule = LumpSumSchedule::empty();
        let months = months_to_goal(1_000.0, 0.0, monthly_rate(7.2), &schedule, 2_000.0, 1_200)
            .months()
            .expect("reachable");
        let expected = (2f64.ln() / 1.072f64.ln() * 12.0).ceil() as u32;
        assert!(months.abs_diff(expected) <= 1, "got {months}, expected ~{expected}");
    }

    proptest! {
        #[test]
        fn prop_goal_month_is_first_projection_row_at_target(
            start in 0.0f64..1e6,
            flow in 1.0f64..1e4,
            annual_pct in -5.0f64..15.0,
            target in 1.0f64..5e6
        ) {
            let schedule = LumpSumSchedule::empty();
            let r = monthly_rate(annual_pct);
            let goal = months_to_goal(start, flow, r, &schedule, target, 600);
            let series = project_accumulation(start, flow, 600, r, &schedule);
            let first = series.rows.iter().find(|row| row.wealth >= target).map(|row| row.month);
            prop_assert!(goal.months() == first);
        }
    }
}
