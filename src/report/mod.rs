pub mod assemble;
pub mod count;
pub mod series;

pub use count::*;

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::EfficiencySummary;
use crate::source::CreationSeries;

/// Fallback daily processed workload (hours) when the derived constant is
/// degenerate — zero processing days or zero processed workload.
pub const DEFAULT_DAILY_WORKLOAD: f64 = 8.0;

/// The closed set of analytics report types. Each kind maps to exactly one
/// assembler and one Count shape; `Registry::new()` builds the total mapping
/// and the tests prove it exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    Progress,
    Burndown,
    Workload,
    OverdueAssessment,
    CoreKpi,
    Bugs,
    HandlingEfficiency,
    ReviewEfficiency,
    Failures,
    Backlog,
    RecentDelivery,
    LeadTime,
    UnplannedWork,
    GrowthTrend,
    ResourceCreation,
}

impl ReportKind {
    pub const ALL: [ReportKind; 15] = [
        ReportKind::Progress,
        ReportKind::Burndown,
        ReportKind::Workload,
        ReportKind::OverdueAssessment,
        ReportKind::CoreKpi,
        ReportKind::Bugs,
        ReportKind::HandlingEfficiency,
        ReportKind::ReviewEfficiency,
        ReportKind::Failures,
        ReportKind::Backlog,
        ReportKind::RecentDelivery,
        ReportKind::LeadTime,
        ReportKind::UnplannedWork,
        ReportKind::GrowthTrend,
        ReportKind::ResourceCreation,
    ];

    /// Canonical key, used as the discriminator column next to persisted
    /// snapshots.
    pub fn key(&self) -> &'static str {
        match self {
            ReportKind::Progress => "PROGRESS",
            ReportKind::Burndown => "BURNDOWN",
            ReportKind::Workload => "WORKLOAD",
            ReportKind::OverdueAssessment => "OVERDUE_ASSESSMENT",
            ReportKind::CoreKpi => "CORE_KPI",
            ReportKind::Bugs => "BUGS",
            ReportKind::HandlingEfficiency => "HANDLING_EFFICIENCY",
            ReportKind::ReviewEfficiency => "REVIEW_EFFICIENCY",
            ReportKind::Failures => "FAILURES",
            ReportKind::Backlog => "BACKLOG",
            ReportKind::RecentDelivery => "RECENT_DELIVERY",
            ReportKind::LeadTime => "LEAD_TIME",
            ReportKind::UnplannedWork => "UNPLANNED_WORK",
            ReportKind::GrowthTrend => "GROWTH_TREND",
            ReportKind::ResourceCreation => "RESOURCE_CREATION",
        }
    }

    /// Parse a stored kind key. Accepts the legacy per-domain aliases
    /// (`SUBMITTED_BUGS`, `TESTING_EFFICIENCY`) that the collapsed engine
    /// maps onto one kind each.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "PROGRESS" => Ok(ReportKind::Progress),
            "BURNDOWN" => Ok(ReportKind::Burndown),
            "WORKLOAD" => Ok(ReportKind::Workload),
            "OVERDUE_ASSESSMENT" => Ok(ReportKind::OverdueAssessment),
            "CORE_KPI" => Ok(ReportKind::CoreKpi),
            "BUGS" | "SUBMITTED_BUGS" => Ok(ReportKind::Bugs),
            "HANDLING_EFFICIENCY" | "TESTING_EFFICIENCY" => Ok(ReportKind::HandlingEfficiency),
            "REVIEW_EFFICIENCY" => Ok(ReportKind::ReviewEfficiency),
            "FAILURES" => Ok(ReportKind::Failures),
            "BACKLOG" => Ok(ReportKind::Backlog),
            "RECENT_DELIVERY" => Ok(ReportKind::RecentDelivery),
            "LEAD_TIME" => Ok(ReportKind::LeadTime),
            "UNPLANNED_WORK" => Ok(ReportKind::UnplannedWork),
            "GROWTH_TREND" => Ok(ReportKind::GrowthTrend),
            "RESOURCE_CREATION" => Ok(ReportKind::ResourceCreation),
            other => Err(Error::Decode(format!("unrecognized report kind: {other}"))),
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Inputs shared by every assembler beyond the summary list itself.
#[derive(Debug, Clone)]
pub struct AssembleParams {
    /// Reference date for projections and aging; today in production, pinned
    /// in tests.
    pub as_of: NaiveDate,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Side collections; only resource-creation reads these.
    pub creation_series: Vec<CreationSeries>,
}

impl AssembleParams {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            start: None,
            end: None,
            creation_series: Vec::new(),
        }
    }

    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Whether a day falls inside the (possibly half-open) report window.
    pub fn in_window(&self, day: NaiveDate) -> bool {
        self.start.is_none_or(|s| day >= s) && self.end.is_none_or(|e| day <= e)
    }
}

/// A pure assembler: summary list in, aggregate Count out.
pub type AssemblerFn = fn(&[EfficiencySummary], &AssembleParams) -> Count;

/// Kind → assembler mapping, built once at startup and looked up by key.
pub struct Registry {
    assemblers: HashMap<ReportKind, AssemblerFn>,
}

impl Registry {
    pub fn new() -> Self {
        let mut assemblers: HashMap<ReportKind, AssemblerFn> = HashMap::new();
        assemblers.insert(ReportKind::Progress, assemble::progress as AssemblerFn);
        assemblers.insert(ReportKind::Burndown, series::burndown);
        assemblers.insert(ReportKind::Workload, assemble::workload);
        assemblers.insert(ReportKind::OverdueAssessment, assemble::overdue_assessment);
        assemblers.insert(ReportKind::CoreKpi, assemble::core_kpi);
        assemblers.insert(ReportKind::Bugs, assemble::bugs);
        assemblers.insert(ReportKind::HandlingEfficiency, assemble::handling_efficiency);
        assemblers.insert(ReportKind::ReviewEfficiency, assemble::review_efficiency);
        assemblers.insert(ReportKind::Failures, assemble::failures);
        assemblers.insert(ReportKind::Backlog, assemble::backlog);
        assemblers.insert(ReportKind::RecentDelivery, assemble::recent_delivery);
        assemblers.insert(ReportKind::LeadTime, assemble::lead_time);
        assemblers.insert(ReportKind::UnplannedWork, assemble::unplanned_work);
        assemblers.insert(ReportKind::GrowthTrend, series::growth_trend);
        assemblers.insert(ReportKind::ResourceCreation, series::resource_creation);
        Self { assemblers }
    }

    pub fn assembler(&self, kind: ReportKind) -> Option<AssemblerFn> {
        self.assemblers.get(&kind).copied()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
