//! Aggregate metric records, one shape per report kind.
//!
//! Every struct is a flat record of derived numeric fields. Rates are
//! percentages half-up rounded to 2 decimals; averages are day values with 2
//! decimals. A zero-valued instance (the `Default`) is what an empty scope
//! reports — fields are never absent or null.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ReportKind;

/// The two dimensions a burndown tracks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum BurnResource {
    /// Item count.
    Num,
    /// Estimated workload.
    Workload,
}

impl BurnResource {
    pub fn key(self) -> &'static str {
        match self {
            BurnResource::Num => "NUM",
            BurnResource::Workload => "WORKLOAD",
        }
    }
}

/// One day on a burndown axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BurndownPoint {
    pub remaining: f64,
    pub completed: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressCount {
    pub total: u64,
    pub completed: u64,
    pub completed_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BurndownCount {
    pub series: BTreeMap<BurnResource, BTreeMap<NaiveDate, BurndownPoint>>,
}

impl BurndownCount {
    /// The sentinel for an empty or unbounded scope: both resources present,
    /// no days.
    pub fn zero() -> Self {
        let mut series = BTreeMap::new();
        series.insert(BurnResource::Num, BTreeMap::new());
        series.insert(BurnResource::Workload, BTreeMap::new());
        Self { series }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadCount {
    pub eval_workload: f64,
    pub actual_workload: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverdueCount {
    pub total: u64,
    /// Items whose deadline is already behind the projected completion date.
    pub overdue: u64,
    pub overdue_rate: f64,
    /// Derived daily processed workload used for the projection.
    pub daily_workload: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreKpiCount {
    pub total: u64,
    pub completed: u64,
    pub completed_rate: f64,
    pub overdue: u64,
    pub overdue_rate: f64,
    pub eval_workload: f64,
    pub actual_workload: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BugsCount {
    pub total: u64,
    pub bug_count: u64,
    pub missing_bug_count: u64,
    pub bug_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HandlingEfficiencyCount {
    pub total: u64,
    pub completed: u64,
    pub completed_rate: f64,
    /// Mean created → completed time, in days.
    pub avg_lead_days: f64,
    /// Mean processed → completed time, in days.
    pub avg_handle_days: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewEfficiencyCount {
    pub total: u64,
    pub confirmed: u64,
    pub confirm_rate: f64,
    /// Mean created → confirmed time, in days.
    pub avg_confirm_days: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FailuresCount {
    /// Executions across the population (sum of per-item totals).
    pub executions: u64,
    pub failures: u64,
    pub fail_rate: f64,
    /// Items with at least one failed execution.
    pub failed_items: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BacklogCount {
    pub total: u64,
    pub backlog: u64,
    pub backlog_rate: f64,
    /// Open items whose deadline is already past.
    pub overdue_backlog: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentDeliveryCount {
    pub completed: u64,
    pub delivered_workload: f64,
    pub daily_avg: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadTimeCount {
    pub completed: u64,
    pub avg_days: f64,
    pub min_days: f64,
    pub max_days: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UnplannedWorkCount {
    pub total: u64,
    pub unplanned: u64,
    pub unplanned_rate: f64,
    pub unplanned_workload: f64,
    pub daily_workload: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthTrendCount {
    pub daily: BTreeMap<NaiveDate, u64>,
    pub cumulative: BTreeMap<NaiveDate, u64>,
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceCreationCount {
    /// Per-resource per-day creation counts, plus the merged `"TOTAL"` series.
    pub series: BTreeMap<String, BTreeMap<NaiveDate, u64>>,
    pub total: u64,
}

/// The aggregate metrics for one report kind over one population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum Count {
    Progress(ProgressCount),
    Burndown(BurndownCount),
    Workload(WorkloadCount),
    OverdueAssessment(OverdueCount),
    CoreKpi(CoreKpiCount),
    Bugs(BugsCount),
    HandlingEfficiency(HandlingEfficiencyCount),
    ReviewEfficiency(ReviewEfficiencyCount),
    Failures(FailuresCount),
    Backlog(BacklogCount),
    RecentDelivery(RecentDeliveryCount),
    LeadTime(LeadTimeCount),
    UnplannedWork(UnplannedWorkCount),
    GrowthTrend(GrowthTrendCount),
    ResourceCreation(ResourceCreationCount),
}

impl Count {
    pub fn kind(&self) -> ReportKind {
        match self {
            Count::Progress(_) => ReportKind::Progress,
            Count::Burndown(_) => ReportKind::Burndown,
            Count::Workload(_) => ReportKind::Workload,
            Count::OverdueAssessment(_) => ReportKind::OverdueAssessment,
            Count::CoreKpi(_) => ReportKind::CoreKpi,
            Count::Bugs(_) => ReportKind::Bugs,
            Count::HandlingEfficiency(_) => ReportKind::HandlingEfficiency,
            Count::ReviewEfficiency(_) => ReportKind::ReviewEfficiency,
            Count::Failures(_) => ReportKind::Failures,
            Count::Backlog(_) => ReportKind::Backlog,
            Count::RecentDelivery(_) => ReportKind::RecentDelivery,
            Count::LeadTime(_) => ReportKind::LeadTime,
            Count::UnplannedWork(_) => ReportKind::UnplannedWork,
            Count::GrowthTrend(_) => ReportKind::GrowthTrend,
            Count::ResourceCreation(_) => ReportKind::ResourceCreation,
        }
    }

    /// The zero-valued Count an empty scope reports for `kind`.
    pub fn zero(kind: ReportKind) -> Count {
        match kind {
            ReportKind::Progress => Count::Progress(ProgressCount::default()),
            ReportKind::Burndown => Count::Burndown(BurndownCount::zero()),
            ReportKind::Workload => Count::Workload(WorkloadCount::default()),
            ReportKind::OverdueAssessment => Count::OverdueAssessment(OverdueCount::default()),
            ReportKind::CoreKpi => Count::CoreKpi(CoreKpiCount::default()),
            ReportKind::Bugs => Count::Bugs(BugsCount::default()),
            ReportKind::HandlingEfficiency => {
                Count::HandlingEfficiency(HandlingEfficiencyCount::default())
            }
            ReportKind::ReviewEfficiency => {
                Count::ReviewEfficiency(ReviewEfficiencyCount::default())
            }
            ReportKind::Failures => Count::Failures(FailuresCount::default()),
            ReportKind::Backlog => Count::Backlog(BacklogCount::default()),
            ReportKind::RecentDelivery => Count::RecentDelivery(RecentDeliveryCount::default()),
            ReportKind::LeadTime => Count::LeadTime(LeadTimeCount::default()),
            ReportKind::UnplannedWork => Count::UnplannedWork(UnplannedWorkCount::default()),
            ReportKind::GrowthTrend => Count::GrowthTrend(GrowthTrendCount::default()),
            ReportKind::ResourceCreation => {
                Count::ResourceCreation(ResourceCreationCount::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_kind_matches_for_every_kind() {
        for kind in ReportKind::ALL {
            assert_eq!(Count::zero(kind).kind(), kind);
        }
    }

    #[test]
    fn test_burndown_zero_sentinel_has_both_resources() {
        let zero = BurndownCount::zero();
        assert!(zero.series.contains_key(&BurnResource::Num));
        assert!(zero.series.contains_key(&BurnResource::Workload));
        assert!(zero.series[&BurnResource::Num].is_empty());
        assert!(zero.series[&BurnResource::Workload].is_empty());
    }
}
