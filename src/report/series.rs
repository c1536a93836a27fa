//! Time-series assemblers: burndown, growth trend, resource creation.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::date_util::{day_of, day_series};
use crate::model::EfficiencySummary;

use super::count::{
    BurnResource, BurndownCount, BurndownPoint, GrowthTrendCount, ResourceCreationCount,
};
use super::{AssembleParams, Count};

/// Merged-series key covering every resource type.
pub const TOTAL_SERIES: &str = "TOTAL";

/// Daily remaining/completed series for item count and estimated workload.
///
/// Bounds resolve defensively: window start, else the earliest creation day in
/// scope; window end comes from the caller (date range or scope deadline). If
/// either side is still missing, or start is past end, the zero sentinel is
/// returned instead of an error.
pub fn burndown(summaries: &[EfficiencySummary], params: &AssembleParams) -> Count {
    let valid: Vec<&EfficiencySummary> =
        summaries.iter().filter(|s| s.status.is_valid()).collect();

    let start = params
        .start
        .or_else(|| valid.iter().map(|s| day_of(s.created_at)).min());
    let (Some(start), Some(end)) = (start, params.end) else {
        return Count::Burndown(BurndownCount::zero());
    };
    let days = day_series(start, end);
    if days.is_empty() {
        return Count::Burndown(BurndownCount::zero());
    }

    let total_num = valid.len() as f64;
    let total_workload: f64 = valid.iter().map(|s| s.eval_workload).sum();

    let mut num_axis = BTreeMap::new();
    let mut workload_axis = BTreeMap::new();
    for day in days {
        let mut done_num = 0.0;
        let mut done_workload = 0.0;
        for s in &valid {
            if s.completed_at.map(day_of).is_some_and(|d| d <= day) {
                done_num += 1.0;
                done_workload += s.eval_workload;
            }
        }
        num_axis.insert(
            day,
            BurndownPoint {
                remaining: total_num - done_num,
                completed: done_num,
            },
        );
        // Unrounded, like every additive field; export formatting rounds.
        workload_axis.insert(
            day,
            BurndownPoint {
                remaining: total_workload - done_workload,
                completed: done_workload,
            },
        );
    }

    let mut series = BTreeMap::new();
    series.insert(BurnResource::Num, num_axis);
    series.insert(BurnResource::Workload, workload_axis);
    Count::Burndown(BurndownCount { series })
}

/// Per-day creation counts plus a running cumulative series. When the window
/// is fully bounded the series is gap-filled day by day; otherwise only
/// observed days appear.
pub fn growth_trend(summaries: &[EfficiencySummary], params: &AssembleParams) -> Count {
    let mut daily: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for s in summaries {
        let day = day_of(s.created_at);
        if params.in_window(day) {
            *daily.entry(day).or_insert(0) += 1;
        }
    }

    let axis: Vec<NaiveDate> = match (params.start, params.end) {
        (Some(start), Some(end)) => day_series(start, end),
        _ => daily.keys().copied().collect(),
    };

    let mut cumulative = BTreeMap::new();
    let mut running = 0u64;
    for day in axis {
        running += daily.get(&day).copied().unwrap_or(0);
        cumulative.insert(day, running);
        daily.entry(day).or_insert(0);
    }
    let total = daily.values().sum();

    Count::GrowthTrend(GrowthTrendCount {
        daily,
        cumulative,
        total,
    })
}

/// Day-bucketed creation counts across heterogeneous side collections, merged
/// into one `"TOTAL"` series. Ignores the summary list — the primary domain's
/// creations arrive as one of the series.
pub fn resource_creation(_summaries: &[EfficiencySummary], params: &AssembleParams) -> Count {
    let mut series: BTreeMap<String, BTreeMap<NaiveDate, u64>> = BTreeMap::new();
    let mut merged: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    let mut total = 0u64;

    for collection in &params.creation_series {
        let per_day = series.entry(collection.resource.clone()).or_default();
        for record in &collection.records {
            let day = day_of(record.created_at);
            if !params.in_window(day) {
                continue;
            }
            *per_day.entry(day).or_insert(0) += 1;
            *merged.entry(day).or_insert(0) += 1;
            total += 1;
        }
    }
    series.insert(TOTAL_SERIES.to_string(), merged);

    Count::ResourceCreation(ResourceCreationCount { series, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemStatus;
    use crate::source::{CreationRecord, CreationSeries};
    use chrono::{TimeZone, Utc};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    fn item(id: &str, created_day: u32, status: ItemStatus) -> EfficiencySummary {
        let mut s = EfficiencySummary::new(id, at(created_day, 9));
        s.status = status;
        s
    }

    fn params(as_of: u32) -> AssembleParams {
        AssembleParams::new(d(as_of))
    }

    #[test]
    fn test_burndown_basic() {
        let mut done = item("t1", 1, ItemStatus::Completed);
        done.completed_at = Some(at(2, 17));
        done.eval_workload = 4.0;
        let mut open = item("t2", 1, ItemStatus::Pending);
        open.eval_workload = 6.0;

        let p = params(5).with_range(Some(d(1)), Some(d(3)));
        let Count::Burndown(count) = burndown(&[done, open], &p) else {
            panic!("wrong count variant");
        };

        let num = &count.series[&BurnResource::Num];
        assert_eq!(num.len(), 3);
        assert_eq!(num[&d(1)], BurndownPoint { remaining: 2.0, completed: 0.0 });
        assert_eq!(num[&d(2)], BurndownPoint { remaining: 1.0, completed: 1.0 });
        assert_eq!(num[&d(3)], BurndownPoint { remaining: 1.0, completed: 1.0 });

        let workload = &count.series[&BurnResource::Workload];
        assert_eq!(workload[&d(1)], BurndownPoint { remaining: 10.0, completed: 0.0 });
        assert_eq!(workload[&d(3)], BurndownPoint { remaining: 6.0, completed: 4.0 });
    }

    #[test]
    fn test_burndown_excludes_canceled() {
        let mut open = item("t1", 1, ItemStatus::Pending);
        open.eval_workload = 5.0;
        let p = params(5).with_range(Some(d(1)), Some(d(2)));
        let baseline = burndown(std::slice::from_ref(&open), &p);

        let mut canceled = item("t2", 1, ItemStatus::Canceled);
        canceled.eval_workload = 50.0;
        let with_canceled = burndown(&[open, canceled], &p);

        assert_eq!(baseline, with_canceled);
    }

    #[test]
    fn test_burndown_reversed_bounds_yields_zero_sentinel() {
        let s = item("t1", 1, ItemStatus::Pending);
        let p = params(5).with_range(Some(d(10)), Some(d(2)));
        let Count::Burndown(count) = burndown(&[s], &p) else {
            panic!("wrong count variant");
        };
        assert_eq!(count, BurndownCount::zero());
    }

    #[test]
    fn test_burndown_start_derived_from_earliest_item() {
        let s = item("t1", 3, ItemStatus::Pending);
        let mut p = params(10);
        p.end = Some(d(4));
        let Count::Burndown(count) = burndown(&[s], &p) else {
            panic!("wrong count variant");
        };
        let num = &count.series[&BurnResource::Num];
        assert_eq!(num.len(), 2); // Mar 3 and Mar 4
        assert!(num.contains_key(&d(3)));
    }

    #[test]
    fn test_burndown_no_end_yields_zero_sentinel() {
        let s = item("t1", 3, ItemStatus::Pending);
        let Count::Burndown(count) = burndown(&[s], &params(10)) else {
            panic!("wrong count variant");
        };
        assert_eq!(count, BurndownCount::zero());
    }

    #[test]
    fn test_growth_trend_bounded_gap_fill() {
        let summaries = vec![
            item("t1", 1, ItemStatus::Pending),
            item("t2", 1, ItemStatus::Pending),
            item("t3", 3, ItemStatus::Canceled), // creations count regardless of later status
        ];
        let p = params(5).with_range(Some(d(1)), Some(d(3)));
        let Count::GrowthTrend(count) = growth_trend(&summaries, &p) else {
            panic!("wrong count variant");
        };

        assert_eq!(count.daily[&d(1)], 2);
        assert_eq!(count.daily[&d(2)], 0);
        assert_eq!(count.daily[&d(3)], 1);
        assert_eq!(count.cumulative[&d(1)], 2);
        assert_eq!(count.cumulative[&d(2)], 2);
        assert_eq!(count.cumulative[&d(3)], 3);
        assert_eq!(count.total, 3);
    }

    #[test]
    fn test_growth_trend_unbounded_uses_observed_days() {
        let summaries = vec![
            item("t1", 2, ItemStatus::Pending),
            item("t2", 9, ItemStatus::Pending),
        ];
        let Count::GrowthTrend(count) = growth_trend(&summaries, &params(10)) else {
            panic!("wrong count variant");
        };
        assert_eq!(count.daily.len(), 2); // no gap days
        assert_eq!(count.cumulative[&d(9)], 2);
        assert_eq!(count.total, 2);
    }

    #[test]
    fn test_growth_trend_window_excludes_outside_creations() {
        let summaries = vec![
            item("t1", 1, ItemStatus::Pending),
            item("t2", 20, ItemStatus::Pending),
        ];
        let p = params(25).with_range(Some(d(1)), Some(d(10)));
        let Count::GrowthTrend(count) = growth_trend(&summaries, &p) else {
            panic!("wrong count variant");
        };
        assert_eq!(count.total, 1);
    }

    #[test]
    fn test_resource_creation_merges_total() {
        let tasks = CreationSeries::new(
            "task",
            vec![
                CreationRecord { creator_id: Some("amy".into()), created_at: at(1, 9) },
                CreationRecord { creator_id: Some("bob".into()), created_at: at(2, 9) },
            ],
        );
        let sprints = CreationSeries::new(
            "sprint",
            vec![CreationRecord { creator_id: Some("amy".into()), created_at: at(1, 14) }],
        );

        let mut p = params(5);
        p.creation_series = vec![tasks, sprints];
        let Count::ResourceCreation(count) = resource_creation(&[], &p) else {
            panic!("wrong count variant");
        };

        assert_eq!(count.total, 3);
        assert_eq!(count.series["task"][&d(1)], 1);
        assert_eq!(count.series["task"][&d(2)], 1);
        assert_eq!(count.series["sprint"][&d(1)], 1);
        assert_eq!(count.series[TOTAL_SERIES][&d(1)], 2);
        assert_eq!(count.series[TOTAL_SERIES][&d(2)], 1);
    }

    #[test]
    fn test_resource_creation_respects_window() {
        let tasks = CreationSeries::new(
            "task",
            vec![
                CreationRecord { creator_id: None, created_at: at(1, 9) },
                CreationRecord { creator_id: None, created_at: at(20, 9) },
            ],
        );
        let mut p = params(25).with_range(Some(d(1)), Some(d(10)));
        p.creation_series = vec![tasks];
        let Count::ResourceCreation(count) = resource_creation(&[], &p) else {
            panic!("wrong count variant");
        };
        assert_eq!(count.total, 1);
        assert_eq!(count.series[TOTAL_SERIES].len(), 1);
    }
}
