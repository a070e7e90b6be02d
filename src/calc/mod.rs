//! Consumption, cost and emissions calculations.

/// Monthly totals and their annual projection.
pub mod aggregate;
/// Two-appliance efficiency comparison and payback period.
pub mod comparator;
pub mod consumption;
/// User-declared appliance usage.
pub mod entry;
/// Cost ranking, severity tiers and consumption breakdown.
pub mod ranking;
/// Savings-target projection and recommended measures.
pub mod savings;

pub use aggregate::{Totals, aggregate};
pub use comparator::{Comparison, compare, compare_watts};
pub use consumption::{DAYS_PER_MONTH, cost_from_kwh, emissions_from_kwh, monthly_kwh};
pub use entry::{ApplianceEntry, EntryUpdate};
pub use ranking::{BreakdownItem, RankedEntry, Severity, consumption_breakdown, rank_entries};
pub use savings::{SavingsMeasure, SavingsProjection, project_savings};
