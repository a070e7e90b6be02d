//! Cost ranking and display-tier classification of entries.

use std::fmt;

use serde::Serialize;

use super::consumption::cost_from_kwh;
use super::entry::ApplianceEntry;

/// Qualitative bucket for monthly consumption.
///
/// Boundaries are half-open: `< 10` Low, `[10, 30)` Medium, `>= 30` High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Low/Medium threshold (kWh per month).
    pub const MEDIUM_FROM_KWH: f64 = 10.0;
    /// Medium/High threshold (kWh per month).
    pub const HIGH_FROM_KWH: f64 = 30.0;

    pub fn from_kwh(kwh: f64) -> Self {
        if kwh < Self::MEDIUM_FROM_KWH {
            Self::Low
        } else if kwh < Self::HIGH_FROM_KWH {
            Self::Medium
        } else {
            Self::High
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(label)
    }
}

/// An entry together with its derived monthly consumption and cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// Position of the entry in the household list.
    pub index: usize,
    pub entry: ApplianceEntry,
    pub kwh: f64,
    pub cost: f64,
    pub severity: Severity,
}

/// Projects `entries` into a list sorted by monthly cost, highest first.
///
/// The sort is stable, so equal-cost entries keep their list order. The
/// input slice is not reordered.
pub fn rank_entries(entries: &[ApplianceEntry], price_per_kwh: f64) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = entries
        .iter()
        .enumerate()
        .map(|(index, e)| {
            let kwh = e.monthly_kwh();
            RankedEntry {
                index,
                entry: e.clone(),
                kwh,
                cost: cost_from_kwh(kwh, price_per_kwh),
                severity: Severity::from_kwh(kwh),
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.cost.total_cmp(&a.cost));
    ranked
}

/// Share of total consumption attributed to one entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownItem {
    pub index: usize,
    pub name: String,
    pub kwh: f64,
    /// Percentage of the household's total kWh.
    pub share_pct: f64,
    /// kWh relative to the largest consumer (0.0–1.0).
    pub relative_to_max: f64,
}

/// Top `limit` consumers by kWh with their share of the total.
///
/// Shares are computed against all entries, not just the ones returned.
pub fn consumption_breakdown(entries: &[ApplianceEntry], limit: usize) -> Vec<BreakdownItem> {
    let kwhs: Vec<f64> = entries.iter().map(ApplianceEntry::monthly_kwh).collect();
    let total: f64 = kwhs.iter().sum();
    let max = kwhs.iter().copied().fold(0.0_f64, f64::max);
    if total <= 0.0 || max <= 0.0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by(|&a, &b| kwhs[b].total_cmp(&kwhs[a]));
    order
        .into_iter()
        .take(limit)
        .map(|i| BreakdownItem {
            index: i,
            name: entries[i].name().to_string(),
            kwh: kwhs[i],
            share_pct: 100.0 * kwhs[i] / total,
            relative_to_max: kwhs[i] / max,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Entry whose monthly kWh equals `kwh` (1 kW for kwh/30 hours a day).
    fn entry_with_kwh(name: &str, kwh: f64) -> ApplianceEntry {
        ApplianceEntry::new(name, name, 1000.0, kwh / 30.0, 1).unwrap()
    }

    #[test]
    fn severity_boundaries_are_half_open() {
        assert_eq!(Severity::from_kwh(9.999), Severity::Low);
        assert_eq!(Severity::from_kwh(10.0), Severity::Medium);
        assert_eq!(Severity::from_kwh(29.999), Severity::Medium);
        assert_eq!(Severity::from_kwh(30.0), Severity::High);
        assert_eq!(Severity::from_kwh(0.0), Severity::Low);
    }

    #[test]
    fn ranks_by_cost_descending_with_stable_ties() {
        // rate 1.0 makes cost == kWh
        let entries = vec![
            entry_with_kwh("a", 10.0),
            entry_with_kwh("b", 30.0),
            entry_with_kwh("c", 30.0),
            entry_with_kwh("d", 5.0),
        ];
        let ranked = rank_entries(&entries, 1.0);
        let names: Vec<&str> = ranked.iter().map(|r| r.entry.name()).collect();
        assert_eq!(names, ["b", "c", "a", "d"]);
        let idx: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(idx, [1, 2, 0, 3]);
    }

    #[test]
    fn ranking_does_not_touch_input_order() {
        let entries = vec![entry_with_kwh("a", 1.0), entry_with_kwh("b", 2.0)];
        let before = entries.clone();
        let _ = rank_entries(&entries, 190.0);
        assert_eq!(entries, before);
    }

    #[test]
    fn ranked_entry_carries_cost_and_severity() {
        let entries = vec![entry_with_kwh("fridge", 108.0)];
        let ranked = rank_entries(&entries, 195.0);
        assert!((ranked[0].kwh - 108.0).abs() < 1e-9);
        assert!((ranked[0].cost - 108.0 * 195.0).abs() < 1e-6);
        assert_eq!(ranked[0].severity, Severity::High);
    }

    #[test]
    fn breakdown_takes_top_consumers() {
        let entries = vec![
            entry_with_kwh("a", 10.0),
            entry_with_kwh("b", 40.0),
            entry_with_kwh("c", 30.0),
            entry_with_kwh("d", 20.0),
        ];
        let top = consumption_breakdown(&entries, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "b");
        assert!((top[0].share_pct - 40.0).abs() < 1e-9);
        assert!((top[0].relative_to_max - 1.0).abs() < 1e-12);
        assert_eq!(top[1].name, "c");
        assert!((top[1].relative_to_max - 0.75).abs() < 1e-9);
    }

    #[test]
    fn breakdown_of_nothing_is_empty() {
        assert!(consumption_breakdown(&[], 5).is_empty());
    }
}
