//! Collaborator traits at the engine boundary.
//!
//! The engine owns no storage: summaries, user metadata and the side
//! collections feeding resource-creation statistics all arrive through these
//! traits, already tenant-filtered by the implementation behind them.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{DateRange, EfficiencySummary, OrgFilter, RequestContext, Scope, UserInfo};

/// Supplies the flat per-item summary rows a report runs over.
#[async_trait]
pub trait SummarySource: Send + Sync {
    /// Fetch summaries for a scope, optionally bounded by a creation-date
    /// range and narrowed to a user-id set. `Some(empty set)` matches nothing
    /// (an org filter that resolved to no members), `None` means no filter.
    async fn find_summaries(
        &self,
        ctx: &RequestContext,
        scope: &Scope,
        range: &DateRange,
        user_ids: Option<&BTreeSet<String>>,
    ) -> Result<Vec<EfficiencySummary>>;
}

/// Resolves user display metadata and org membership.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn resolve_user_info(
        &self,
        ctx: &RequestContext,
        ids: &BTreeSet<String>,
    ) -> Result<BTreeMap<String, UserInfo>>;

    /// Resolve an org filter to its member user ids. An unknown org resolves
    /// to the empty set, not an error.
    async fn resolve_org_user_ids(
        &self,
        ctx: &RequestContext,
        filter: &OrgFilter,
    ) -> Result<BTreeSet<String>>;
}

/// One creation event from a side collection (a plan, review, baseline,
/// sprint, meeting or analysis record created inside the scope).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreationRecord {
    pub creator_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// All creation events for one resource type, labeled for the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreationSeries {
    pub resource: String,
    pub records: Vec<CreationRecord>,
}

impl CreationSeries {
    pub fn new(resource: impl Into<String>, records: Vec<CreationRecord>) -> Self {
        Self {
            resource: resource.into(),
            records,
        }
    }
}

/// The one seam between the two mirrored domains ("task" and "case").
///
/// Tasks group their breakdown by assignee, cases by tester; the summary
/// source already projects whichever applies into `owner_id`, so the default
/// `owner` implementation suits both. Resource-creation statistics differ in
/// which side collections feed them, which is what `creation_series` supplies.
#[async_trait]
pub trait DomainAdapter: Send + Sync {
    /// Domain label, used to tell the two engines apart in log output.
    fn domain(&self) -> &'static str;

    /// Grouping key for the per-user breakdown.
    fn owner<'a>(&self, summary: &'a EfficiencySummary) -> Option<&'a str> {
        summary.owner_id.as_deref()
    }

    /// Side collections for resource-creation statistics. Implementations may
    /// fan out their per-collection reads concurrently; the engine waits for
    /// the full set.
    async fn creation_series(
        &self,
        ctx: &RequestContext,
        scope: &Scope,
        range: &DateRange,
    ) -> Result<Vec<CreationSeries>>;
}
