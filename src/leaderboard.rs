use itertools::Itertools;

use crate::game::AllTimeTotals;

/// One display row of the all-time leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub name: String,
    pub total: i64,
}

/// Totals in display order: highest total first, ties broken by ascending name
pub fn sorted_rows(totals: &AllTimeTotals) -> Vec<LeaderboardRow> {
    totals
        .iter()
        .map(|(name, total)| LeaderboardRow {
            name: name.clone(),
            total: *total,
        })
        .sorted_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)))
        .collect()
}
