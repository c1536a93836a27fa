//! The Overview composer: scope + filters in, full report container out.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::detail::{self, Detail, Messages};
use crate::error::{Error, Result};
use crate::grouping;
use crate::model::{DateRange, OrgFilter, OrgType, RequestContext, Scope, UserInfo};
use crate::report::{AssembleParams, Count, Registry, ReportKind};
use crate::source::{CreationSeries, DomainAdapter, SummarySource, UserDirectory};

/// The full result of composing one report kind: total Count, per-user
/// Counts, display metadata, and optional export rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub kind: ReportKind,
    pub total: Count,
    /// Per-user breakdown; empty unless requested.
    pub users: BTreeMap<String, Count>,
    pub user_info: BTreeMap<String, UserInfo>,
    pub details: Vec<Detail>,
    pub detail_titles: Vec<String>,
}

impl Overview {
    /// Zero-valued overview for an empty scope. Callers render this as a
    /// valid report with zeroes rather than branching on absence.
    pub fn empty(kind: ReportKind) -> Self {
        Self {
            kind,
            total: Count::zero(kind),
            users: BTreeMap::new(),
            user_info: BTreeMap::new(),
            details: Vec::new(),
            detail_titles: Vec::new(),
        }
    }
}

/// Caller-supplied narrowing for one composition.
#[derive(Debug, Clone, Default)]
pub struct OverviewFilter {
    pub range: DateRange,
    pub org: Option<OrgFilter>,
}

/// The analytics engine facade. Owns the collaborators and the assembler
/// registry; stateless across calls.
pub struct Analytics {
    source: Arc<dyn SummarySource>,
    directory: Arc<dyn UserDirectory>,
    adapter: Arc<dyn DomainAdapter>,
    messages: Arc<dyn Messages>,
    registry: Registry,
}

impl Analytics {
    pub fn new(
        source: Arc<dyn SummarySource>,
        directory: Arc<dyn UserDirectory>,
        adapter: Arc<dyn DomainAdapter>,
        messages: Arc<dyn Messages>,
    ) -> Self {
        Self {
            source,
            directory,
            adapter,
            messages,
            registry: Registry::new(),
        }
    }

    /// Compose an overview with `as_of` pinned to today.
    pub async fn compose(
        &self,
        ctx: &RequestContext,
        kind: ReportKind,
        scope: &Scope,
        filter: &OverviewFilter,
        join_user_detail: bool,
        join_data_detail: bool,
    ) -> Result<Overview> {
        let as_of = Utc::now().date_naive();
        self.compose_as_of(ctx, kind, scope, filter, join_user_detail, join_data_detail, as_of)
            .await
    }

    /// Compose an overview against an explicit reference date.
    #[allow(clippy::too_many_arguments)]
    pub async fn compose_as_of(
        &self,
        ctx: &RequestContext,
        kind: ReportKind,
        scope: &Scope,
        filter: &OverviewFilter,
        join_user_detail: bool,
        join_data_detail: bool,
        as_of: NaiveDate,
    ) -> Result<Overview> {
        if scope.project_id.is_empty() {
            return Err(Error::InvalidScope("project id is empty".into()));
        }

        // An org filter that resolves to nobody matches nothing; the fetch
        // below then returns the empty scope, which is not an error.
        let user_filter: Option<BTreeSet<String>> = match &filter.org {
            Some(org) => {
                let ids = self.directory.resolve_org_user_ids(ctx, org).await?;
                if ids.is_empty() {
                    log::warn!(
                        "org filter {:?}:{} resolved to no users",
                        org.org_type,
                        org.org_id
                    );
                }
                Some(ids)
            }
            None => None,
        };

        // Resource creation needs its side collections; they are independent
        // read-only queries, so issue them alongside the summary fetch. The
        // org filter narrows them by creator the same way it narrows the
        // summary population by owner.
        let (summaries, sides) = if kind == ReportKind::ResourceCreation {
            let (summaries, sides) = tokio::try_join!(
                self.source
                    .find_summaries(ctx, scope, &filter.range, user_filter.as_ref()),
                self.adapter.creation_series(ctx, scope, &filter.range),
            )?;
            let sides = match &user_filter {
                Some(members) => filter_series_by_members(sides, members),
                None => sides,
            };
            (summaries, sides)
        } else {
            let summaries = self
                .source
                .find_summaries(ctx, scope, &filter.range, user_filter.as_ref())
                .await?;
            (summaries, Vec::new())
        };

        let side_records: usize = sides.iter().map(|s| s.records.len()).sum();
        if summaries.is_empty() && side_records == 0 {
            log::debug!(
                "empty {} scope for {kind}, returning zero overview",
                self.adapter.domain()
            );
            return Ok(Overview::empty(kind));
        }

        let mut params = AssembleParams::new(as_of)
            .with_range(filter.range.start, filter.range.end.or(scope.deadline));
        params.creation_series = sides;

        let assemble = self
            .registry
            .assembler(kind)
            .ok_or_else(|| Error::Other(format!("no assembler registered for {kind}")))?;

        let total = assemble(&summaries, &params);

        let user_ids: BTreeSet<String> = if kind == ReportKind::ResourceCreation {
            params
                .creation_series
                .iter()
                .flat_map(|cs| cs.records.iter().filter_map(|r| r.creator_id.clone()))
                .collect()
        } else {
            grouping::distinct_owner_ids(self.adapter.as_ref(), &summaries)
        };
        let user_info = if user_ids.is_empty() {
            BTreeMap::new()
        } else {
            self.directory.resolve_user_info(ctx, &user_ids).await?
        };

        // With a single-user filter the total already is that user's
        // breakdown; a duplicate row would be redundant.
        let single_user = matches!(&filter.org, Some(org) if org.org_type == OrgType::User);
        let mut users = BTreeMap::new();
        if join_user_detail && !single_user {
            if kind == ReportKind::ResourceCreation {
                for uid in &user_ids {
                    let mut per_user = params.clone();
                    per_user.creation_series = filter_series_by_creator(&params.creation_series, uid);
                    users.insert(uid.clone(), assemble(&[], &per_user));
                }
            } else {
                for (uid, group) in grouping::group_by_user(self.adapter.as_ref(), &summaries) {
                    users.insert(uid, assemble(&group, &params));
                }
            }
        }

        let mut overview = Overview {
            kind,
            total,
            users,
            user_info,
            details: Vec::new(),
            detail_titles: Vec::new(),
        };

        if join_data_detail {
            let total_label = self.messages.text(&ctx.locale, "label.total");
            let mut details = detail::flatten(&total_label, &overview.total);
            for (uid, count) in &overview.users {
                let name = overview
                    .user_info
                    .get(uid)
                    .map(|u| u.name.clone())
                    .unwrap_or_else(|| uid.clone());
                details.extend(detail::flatten(&name, count));
            }
            overview.detail_titles =
                detail::titles(kind, &overview.total, self.messages.as_ref(), &ctx.locale);
            overview.details = details;
        }

        Ok(overview)
    }
}

fn filter_series_by_members(
    series: Vec<CreationSeries>,
    members: &BTreeSet<String>,
) -> Vec<CreationSeries> {
    series
        .into_iter()
        .map(|mut cs| {
            cs.records
                .retain(|r| r.creator_id.as_deref().is_some_and(|c| members.contains(c)));
            cs
        })
        .collect()
}

fn filter_series_by_creator(series: &[CreationSeries], creator: &str) -> Vec<CreationSeries> {
    series
        .iter()
        .map(|cs| CreationSeries {
            resource: cs.resource.clone(),
            records: cs
                .records
                .iter()
                .filter(|r| r.creator_id.as_deref() == Some(creator))
                .cloned()
                .collect(),
        })
        .collect()
}
