use serde::{Deserialize, Serialize};

pub const HORIZON_AGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanParameters {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_wealth: f64,
    pub monthly_saving: f64,
    pub monthly_spend: f64,
    pub swr_pct: f64,
    pub accumulation_return_pct: f64,
    pub retirement_return_pct: f64,
}

impl PlanParameters {
    pub fn accumulation_months(&self) -> u32 {
        horizon_months(i64::from(self.retirement_age) - i64::from(self.current_age))
    }

    pub fn total_months(&self) -> u32 {
        horizon_months(i64::from(HORIZON_AGE) - i64::from(self.current_age))
    }
}

fn horizon_months(years: i64) -> u32 {
    u32::try_from(years.max(0) * 12).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LumpSum {
    pub id: String,
    pub month: i32,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRow {
    pub month: u32,
    pub wealth: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProjectionSeries {
    pub rows: Vec<ProjectionRow>,
}

impl ProjectionSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, month: u32, wealth: f64) {
        self.rows.push(ProjectionRow { month, wealth });
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn last_wealth(&self) -> Option<f64> {
        self.rows.last().map(|row| row.wealth)
    }

    pub fn first_depleted_month(&self) -> Option<u32> {
        self.rows
            .iter()
            .find(|row| row.wealth <= 0.0)
            .map(|row| row.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RequiredReturn {
    NotApplicable,
    AlreadyMet,
    #[serde(rename_all = "camelCase")]
    Solved { annual_rate: f64 },
    Unsolvable,
}

impl RequiredReturn {
    pub fn annual_rate(self) -> Option<f64> {
        match self {
            RequiredReturn::AlreadyMet => Some(0.0),
            RequiredReturn::Solved { annual_rate } => Some(annual_rate),
            RequiredReturn::NotApplicable | RequiredReturn::Unsolvable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Runway {
    Years { years: f64 },
    Perpetual,
}

impl Runway {
    pub fn years(self) -> Option<f64> {
        match self {
            Runway::Years { years } => Some(years),
            Runway::Perpetual => None,
        }
    }

    #[cfg(test)]
    pub fn is_perpetual(self) -> bool {
        matches!(self, Runway::Perpetual)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GoalTime {
    Months { months: u32 },
    Unreachable,
}

impl GoalTime {
    pub fn months(self) -> Option<u32> {
        match self {
            GoalTime::Months { months } => Some(months),
            GoalTime::Unreachable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub accumulation_months: u32,
    pub total_months: u32,
    pub target_wealth: f64,
    pub wealth_at_retirement: f64,
    pub implied_swr_pct: Option<f64>,
    pub sustainable_monthly_spend: f64,
    pub gap: f64,
    pub progress_pct: f64,
    pub required_extra_monthly_saving: Option<f64>,
    pub required_return: RequiredReturn,
    pub runway: Runway,
    pub runway_end_age: Option<f64>,
    pub months_to_goal: GoalTime,
    pub goal_age: Option<f64>,
}
