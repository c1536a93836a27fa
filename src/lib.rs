pub mod date_util;
pub mod detail;
pub mod error;
pub mod grouping;
pub mod model;
pub mod overview;
pub mod report;
pub mod snapshot;
pub mod source;

#[cfg(test)]
pub(crate) mod testkit;

pub use detail::{DefaultMessages, Detail, Messages};
pub use error::{Error, Result};
pub use model::{
    DateRange, EfficiencySummary, ItemStatus, OrgFilter, OrgType, RequestContext, Scope, UserInfo,
};
pub use overview::{Analytics, Overview, OverviewFilter};
pub use report::{
    AssembleParams, AssemblerFn, Count, Registry, ReportKind, DEFAULT_DAILY_WORKLOAD,
};
pub use snapshot::{decode_snapshot, encode_snapshot};
pub use source::{CreationRecord, CreationSeries, DomainAdapter, SummarySource, UserDirectory};
