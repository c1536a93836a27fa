//! In-memory collaborators and fixture builders shared by the unit tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::detail::DefaultMessages;
use crate::error::{Error, Result};
use crate::model::{
    DateRange, EfficiencySummary, ItemStatus, OrgFilter, OrgType, RequestContext, Scope, UserInfo,
};
use crate::overview::Analytics;
use crate::source::{CreationSeries, DomainAdapter, SummarySource, UserDirectory};

/// One backend playing all three collaborator roles.
#[derive(Default)]
pub struct MemoryBackend {
    pub summaries: Vec<EfficiencySummary>,
    pub users: BTreeMap<String, UserInfo>,
    /// Department/group membership by org id.
    pub orgs: BTreeMap<String, BTreeSet<String>>,
    pub sides: Vec<CreationSeries>,
    pub fail_fetch: bool,
}

#[async_trait]
impl SummarySource for MemoryBackend {
    async fn find_summaries(
        &self,
        _ctx: &RequestContext,
        _scope: &Scope,
        range: &DateRange,
        user_ids: Option<&BTreeSet<String>>,
    ) -> Result<Vec<EfficiencySummary>> {
        if self.fail_fetch {
            return Err(Error::Fetch("summary source unavailable".into()));
        }
        Ok(self
            .summaries
            .iter()
            .filter(|s| range.contains(s.created_at.date_naive()))
            .filter(|s| match user_ids {
                None => true,
                Some(ids) => s.owner_id.as_deref().is_some_and(|o| ids.contains(o)),
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserDirectory for MemoryBackend {
    async fn resolve_user_info(
        &self,
        _ctx: &RequestContext,
        ids: &BTreeSet<String>,
    ) -> Result<BTreeMap<String, UserInfo>> {
        Ok(self
            .users
            .iter()
            .filter(|(id, _)| ids.contains(*id))
            .map(|(id, info)| (id.clone(), info.clone()))
            .collect())
    }

    async fn resolve_org_user_ids(
        &self,
        _ctx: &RequestContext,
        filter: &OrgFilter,
    ) -> Result<BTreeSet<String>> {
        match filter.org_type {
            OrgType::User => Ok([filter.org_id.clone()].into()),
            OrgType::Department | OrgType::Group => {
                Ok(self.orgs.get(&filter.org_id).cloned().unwrap_or_default())
            }
        }
    }
}

#[async_trait]
impl DomainAdapter for MemoryBackend {
    fn domain(&self) -> &'static str {
        "task"
    }

    async fn creation_series(
        &self,
        _ctx: &RequestContext,
        _scope: &Scope,
        _range: &DateRange,
    ) -> Result<Vec<CreationSeries>> {
        Ok(self.sides.clone())
    }
}

pub fn ts(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A summary created 2025-03-01 09:00 with the given owner and status.
pub fn summary(id: &str, owner: &str, status: ItemStatus) -> EfficiencySummary {
    let mut s = EfficiencySummary::new(id, ts(2025, 3, 1, 9));
    s.owner_id = Some(owner.to_string());
    s.status = status;
    s
}

pub fn ctx() -> RequestContext {
    RequestContext::new("tester", "tenant-1")
}

/// Wire one backend into an `Analytics` engine with the English catalog.
pub fn engine(backend: MemoryBackend) -> Analytics {
    let _ = env_logger::builder().is_test(true).try_init();
    let backend = Arc::new(backend);
    Analytics::new(
        backend.clone(),
        backend.clone(),
        backend,
        Arc::new(DefaultMessages),
    )
}
