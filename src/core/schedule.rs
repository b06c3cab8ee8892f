use std::collections::BTreeMap;

use super::types::LumpSum;

/// One-time contributions aggregated by month and clipped to a horizon.
///
/// Month `t` is disbursed on the step that ends at row `t`. No step ends at row 0, so amounts
/// clipped to month 0 stay in the schedule but are never applied by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LumpSumSchedule {
    amounts: BTreeMap<u32, f64>,
}

impl LumpSumSchedule {
    pub fn build(lump_sums: &[LumpSum], horizon_months: u32) -> Self {
        let mut amounts = BTreeMap::new();
        for lump in lump_sums {
            let month = clip_month(lump.month, horizon_months);
            *amounts.entry(month).or_insert(0.0) += lump.amount;
        }
        Self { amounts }
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn amount_at(&self, month: u32) -> f64 {
        self.amounts.get(&month).copied().unwrap_or(0.0)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.amounts.iter().map(|(&month, &amount)| (month, amount))
    }
}

fn clip_month(month: i32, horizon_months: u32) -> u32 {
    if month <= 0 {
        0
    } else {
        (month as u32).min(horizon_months)
    }
}
