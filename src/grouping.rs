//! Partitioning primitives shared by the assemblers and the composer.
//!
//! All group maps are `BTreeMap`s so iteration order is sorted by key, which
//! keeps per-user breakdown and export-row ordering reproducible.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::date_util::day_of;
use crate::model::EfficiencySummary;
use crate::source::DomainAdapter;

/// Partition summaries by the domain's grouping key (assignee or tester).
/// Items with no owner are left out — they have no breakdown row.
pub fn group_by_user(
    adapter: &dyn DomainAdapter,
    summaries: &[EfficiencySummary],
) -> BTreeMap<String, Vec<EfficiencySummary>> {
    let mut groups: BTreeMap<String, Vec<EfficiencySummary>> = BTreeMap::new();
    for summary in summaries {
        if let Some(owner) = adapter.owner(summary) {
            groups.entry(owner.to_string()).or_default().push(summary.clone());
        }
    }
    groups
}

/// Distinct grouping keys present in the summary list, sorted.
pub fn distinct_owner_ids(
    adapter: &dyn DomainAdapter,
    summaries: &[EfficiencySummary],
) -> BTreeSet<String> {
    summaries
        .iter()
        .filter_map(|s| adapter.owner(s).map(str::to_string))
        .collect()
}

/// Partition summaries by creation day.
pub fn group_by_day(
    summaries: &[EfficiencySummary],
) -> BTreeMap<NaiveDate, Vec<EfficiencySummary>> {
    let mut groups: BTreeMap<NaiveDate, Vec<EfficiencySummary>> = BTreeMap::new();
    for summary in summaries {
        groups
            .entry(day_of(summary.created_at))
            .or_default()
            .push(summary.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::model::{DateRange, RequestContext, Scope};
    use crate::source::CreationSeries;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    struct TaskAdapter;

    #[async_trait]
    impl DomainAdapter for TaskAdapter {
        fn domain(&self) -> &'static str {
            "task"
        }

        async fn creation_series(
            &self,
            _ctx: &RequestContext,
            _scope: &Scope,
            _range: &DateRange,
        ) -> Result<Vec<CreationSeries>> {
            Ok(Vec::new())
        }
    }

    fn summary(id: &str, owner: Option<&str>, day: u32) -> EfficiencySummary {
        let mut s = EfficiencySummary::new(id, Utc.with_ymd_and_hms(2025, 3, day, 10, 0, 0).unwrap());
        s.owner_id = owner.map(str::to_string);
        s
    }

    #[test]
    fn test_group_by_user_sorted_and_partitioned() {
        let summaries = vec![
            summary("t1", Some("zoe"), 1),
            summary("t2", Some("amy"), 2),
            summary("t3", Some("zoe"), 3),
            summary("t4", None, 4),
        ];
        let groups = group_by_user(&TaskAdapter, &summaries);

        let keys: Vec<&String> = groups.keys().collect();
        assert_eq!(keys, vec!["amy", "zoe"]);
        assert_eq!(groups["zoe"].len(), 2);
        assert_eq!(groups["amy"].len(), 1);
        // Ownerless items get no breakdown row
        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_distinct_owner_ids() {
        let summaries = vec![
            summary("t1", Some("b"), 1),
            summary("t2", Some("a"), 1),
            summary("t3", Some("b"), 1),
            summary("t4", None, 1),
        ];
        let ids: Vec<String> = distinct_owner_ids(&TaskAdapter, &summaries)
            .into_iter()
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_group_by_day() {
        let summaries = vec![
            summary("t1", None, 1),
            summary("t2", None, 1),
            summary("t3", None, 5),
        ];
        let groups = group_by_day(&summaries);
        assert_eq!(groups.len(), 2);
        let first = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(groups[&first].len(), 2);
    }

    #[test]
    fn test_group_empty_input() {
        assert!(group_by_user(&TaskAdapter, &[]).is_empty());
        assert!(group_by_day(&[]).is_empty());
    }
}
