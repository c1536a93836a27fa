//! Scalar metric assemblers.
//!
//! Each assembler is a pure function of the summary list plus the shared
//! params. Canceled items are excluded from valid populations up front, and
//! every rate goes through `percentage` so zero denominators yield `0.0`.

use chrono::Duration;

use crate::date_util::{day_of, mean_seconds_as_days, percentage, round2, seconds_as_days};
use crate::model::EfficiencySummary;

use super::{AssembleParams, Count, DEFAULT_DAILY_WORKLOAD};
use super::count::{
    BacklogCount, BugsCount, CoreKpiCount, FailuresCount, HandlingEfficiencyCount, LeadTimeCount,
    OverdueCount, ProgressCount, RecentDeliveryCount, ReviewEfficiencyCount, UnplannedWorkCount,
    WorkloadCount,
};

fn valid(summaries: &[EfficiencySummary]) -> impl Iterator<Item = &EfficiencySummary> {
    summaries.iter().filter(|s| s.status.is_valid())
}

/// Daily processed workload: total processed workload over distinct
/// processing days. Falls back to `DEFAULT_DAILY_WORKLOAD` when the scope has
/// no processing history yet.
pub(crate) fn daily_processed_workload(summaries: &[EfficiencySummary]) -> f64 {
    let mut days = std::collections::BTreeSet::new();
    let mut total = 0.0;
    for s in summaries {
        if let Some(processed) = s.processed_at {
            days.insert(day_of(processed));
            total += s.actual_workload;
        }
    }
    if days.is_empty() || total <= 0.0 {
        log::debug!("degenerate daily workload, falling back to {DEFAULT_DAILY_WORKLOAD}");
        return DEFAULT_DAILY_WORKLOAD;
    }
    total / days.len() as f64
}

pub fn progress(summaries: &[EfficiencySummary], _params: &AssembleParams) -> Count {
    let total = valid(summaries).count() as u64;
    let completed = valid(summaries).filter(|s| s.status.is_completed()).count() as u64;
    Count::Progress(ProgressCount {
        total,
        completed,
        completed_rate: percentage(completed as f64, total as f64),
    })
}

pub fn workload(summaries: &[EfficiencySummary], _params: &AssembleParams) -> Count {
    // Additive sums stay unrounded so per-user Counts reconstruct the total
    // exactly; rounding happens at export time.
    let eval: f64 = summaries.iter().map(|s| s.eval_workload).sum();
    let actual: f64 = summaries.iter().map(|s| s.actual_workload).sum();
    Count::Workload(WorkloadCount {
        eval_workload: eval,
        actual_workload: actual,
    })
}

pub fn overdue_assessment(summaries: &[EfficiencySummary], params: &AssembleParams) -> Count {
    let daily = daily_processed_workload(summaries);
    let mut total = 0u64;
    let mut overdue = 0u64;
    for s in valid(summaries) {
        total += 1;
        let Some(deadline) = s.deadline else { continue };
        if s.status.is_completed() {
            if s.completed_at.map(day_of).is_some_and(|d| d > deadline) {
                overdue += 1;
            }
        } else {
            // Project the completion date from the remaining workload at the
            // derived daily pace.
            let remaining = (s.eval_workload - s.actual_workload).max(0.0);
            let days_needed = (remaining / daily).ceil() as i64;
            let projected = params.as_of + Duration::days(days_needed);
            if projected > deadline {
                overdue += 1;
            }
        }
    }
    Count::OverdueAssessment(OverdueCount {
        total,
        overdue,
        overdue_rate: percentage(overdue as f64, total as f64),
        daily_workload: round2(daily),
    })
}

pub fn core_kpi(summaries: &[EfficiencySummary], params: &AssembleParams) -> Count {
    let mut total = 0u64;
    let mut completed = 0u64;
    let mut overdue = 0u64;
    let mut eval = 0.0;
    let mut actual = 0.0;
    for s in valid(summaries) {
        total += 1;
        eval += s.eval_workload;
        actual += s.actual_workload;
        if s.status.is_completed() {
            completed += 1;
        }
        if let Some(deadline) = s.deadline {
            let late_finish = s.completed_at.map(day_of).is_some_and(|d| d > deadline);
            let late_open = s.status.is_open() && params.as_of > deadline;
            if late_finish || late_open {
                overdue += 1;
            }
        }
    }
    Count::CoreKpi(CoreKpiCount {
        total,
        completed,
        completed_rate: percentage(completed as f64, total as f64),
        overdue,
        overdue_rate: percentage(overdue as f64, total as f64),
        eval_workload: eval,
        actual_workload: actual,
    })
}

pub fn bugs(summaries: &[EfficiencySummary], _params: &AssembleParams) -> Count {
    let total = valid(summaries).count() as u64;
    let bug_count = valid(summaries).filter(|s| s.is_bug).count() as u64;
    let missing_bug_count = valid(summaries).filter(|s| s.missing_bug).count() as u64;
    Count::Bugs(BugsCount {
        total,
        bug_count,
        missing_bug_count,
        bug_rate: percentage(bug_count as f64, total as f64),
    })
}

pub fn handling_efficiency(summaries: &[EfficiencySummary], _params: &AssembleParams) -> Count {
    let total = valid(summaries).count() as u64;
    let mut lead_secs = Vec::new();
    let mut handle_secs = Vec::new();
    for s in valid(summaries) {
        let Some(done) = s.completed_at else { continue };
        lead_secs.push((done - s.created_at).num_seconds());
        if let Some(processed) = s.processed_at {
            handle_secs.push((done - processed).num_seconds());
        }
    }
    let completed = lead_secs.len() as u64;
    Count::HandlingEfficiency(HandlingEfficiencyCount {
        total,
        completed,
        completed_rate: percentage(completed as f64, total as f64),
        avg_lead_days: mean_seconds_as_days(&lead_secs),
        avg_handle_days: mean_seconds_as_days(&handle_secs),
    })
}

pub fn review_efficiency(summaries: &[EfficiencySummary], _params: &AssembleParams) -> Count {
    let total = valid(summaries).count() as u64;
    let confirm_secs: Vec<i64> = valid(summaries)
        .filter_map(|s| s.confirmed_at.map(|c| (c - s.created_at).num_seconds()))
        .collect();
    let confirmed = confirm_secs.len() as u64;
    Count::ReviewEfficiency(ReviewEfficiencyCount {
        total,
        confirmed,
        confirm_rate: percentage(confirmed as f64, total as f64),
        avg_confirm_days: mean_seconds_as_days(&confirm_secs),
    })
}

pub fn failures(summaries: &[EfficiencySummary], _params: &AssembleParams) -> Count {
    let mut executions = 0u64;
    let mut fail_count = 0u64;
    let mut failed_items = 0u64;
    for s in valid(summaries) {
        executions += s.total_num;
        fail_count += s.fail_num;
        if s.fail_num > 0 {
            failed_items += 1;
        }
    }
    Count::Failures(FailuresCount {
        executions,
        failures: fail_count,
        fail_rate: percentage(fail_count as f64, executions as f64),
        failed_items,
    })
}

pub fn backlog(summaries: &[EfficiencySummary], params: &AssembleParams) -> Count {
    let total = valid(summaries).count() as u64;
    let mut open = 0u64;
    let mut overdue_backlog = 0u64;
    for s in valid(summaries) {
        if !s.status.is_open() {
            continue;
        }
        open += 1;
        if s.deadline.is_some_and(|d| d < params.as_of) {
            overdue_backlog += 1;
        }
    }
    Count::Backlog(BacklogCount {
        total,
        backlog: open,
        backlog_rate: percentage(open as f64, total as f64),
        overdue_backlog,
    })
}

pub fn recent_delivery(summaries: &[EfficiencySummary], params: &AssembleParams) -> Count {
    let end = params.end.unwrap_or(params.as_of);
    // Default window: the trailing week ending at as_of.
    let start = params.start.unwrap_or(end - Duration::days(6));
    if start > end {
        return Count::RecentDelivery(RecentDeliveryCount::default());
    }
    let mut completed = 0u64;
    let mut delivered = 0.0;
    for s in valid(summaries) {
        let Some(done) = s.completed_at.map(day_of) else { continue };
        if done >= start && done <= end {
            completed += 1;
            delivered += s.actual_workload;
        }
    }
    let days = (end - start).num_days() + 1;
    Count::RecentDelivery(RecentDeliveryCount {
        completed,
        delivered_workload: delivered,
        daily_avg: round2(delivered / days as f64),
    })
}

pub fn lead_time(summaries: &[EfficiencySummary], _params: &AssembleParams) -> Count {
    let secs: Vec<i64> = valid(summaries)
        .filter(|s| s.status.is_completed())
        .filter_map(|s| s.completed_at.map(|done| (done - s.created_at).num_seconds()))
        .collect();
    if secs.is_empty() {
        return Count::LeadTime(LeadTimeCount::default());
    }
    let min = secs.iter().copied().min().unwrap_or(0);
    let max = secs.iter().copied().max().unwrap_or(0);
    Count::LeadTime(LeadTimeCount {
        completed: secs.len() as u64,
        avg_days: mean_seconds_as_days(&secs),
        min_days: seconds_as_days(min),
        max_days: seconds_as_days(max),
    })
}

pub fn unplanned_work(summaries: &[EfficiencySummary], params: &AssembleParams) -> Count {
    let daily = daily_processed_workload(summaries);
    let mut total = 0u64;
    let mut unplanned = 0u64;
    let mut unplanned_workload = 0.0;
    for s in valid(summaries) {
        total += 1;
        let after_start = params
            .start
            .is_some_and(|start| day_of(s.created_at) > start);
        if s.deadline.is_none() || after_start {
            unplanned += 1;
            unplanned_workload += s.eval_workload;
        }
    }
    Count::UnplannedWork(UnplannedWorkCount {
        total,
        unplanned,
        unplanned_rate: percentage(unplanned as f64, total as f64),
        unplanned_workload,
        daily_workload: round2(daily),
    })
}
