//! Export-row flattening and localized column titles.
//!
//! A `Detail` is one export row: a display name followed by the Count's
//! fields as strings (or, for time-series kinds, one column per day bucket).
//! Column order here and title order in `titles` must stay in lockstep.

use serde::{Deserialize, Serialize};

use crate::report::count::{BurnResource, Count};
use crate::report::ReportKind;

/// A flattened, export-ready row derived from a Count plus a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    pub name: String,
    pub columns: Vec<String>,
}

/// Localized message lookup; the production catalog lives outside the engine.
pub trait Messages: Send + Sync {
    fn text(&self, locale: &str, key: &str) -> String;
}

/// Built-in English catalog, used as the fallback and by the tests.
pub struct DefaultMessages;

impl Messages for DefaultMessages {
    fn text(&self, _locale: &str, key: &str) -> String {
        let text = match key {
            "label.total" => "Total",
            "title.name" => "Name",
            "title.total" => "Total Items",
            "title.completed" => "Completed",
            "title.completed_rate" => "Completion Rate (%)",
            "title.eval_workload" => "Estimated Workload",
            "title.actual_workload" => "Actual Workload",
            "title.overdue" => "Overdue",
            "title.overdue_rate" => "Overdue Rate (%)",
            "title.daily_workload" => "Daily Workload",
            "title.bug_count" => "Bugs",
            "title.missing_bug_count" => "Missing Bugs",
            "title.bug_rate" => "Bug Rate (%)",
            "title.avg_lead_days" => "Avg Lead Time (days)",
            "title.avg_handle_days" => "Avg Handling Time (days)",
            "title.confirmed" => "Confirmed",
            "title.confirm_rate" => "Confirm Rate (%)",
            "title.avg_confirm_days" => "Avg Confirm Time (days)",
            "title.executions" => "Executions",
            "title.failures" => "Failures",
            "title.fail_rate" => "Failure Rate (%)",
            "title.failed_items" => "Failed Items",
            "title.backlog" => "Backlog",
            "title.backlog_rate" => "Backlog Rate (%)",
            "title.overdue_backlog" => "Overdue Backlog",
            "title.delivered_workload" => "Delivered Workload",
            "title.daily_avg" => "Daily Average",
            "title.avg_days" => "Avg Days",
            "title.min_days" => "Min Days",
            "title.max_days" => "Max Days",
            "title.unplanned" => "Unplanned",
            "title.unplanned_rate" => "Unplanned Rate (%)",
            "title.unplanned_workload" => "Unplanned Workload",
            // Unknown keys fall back to the key itself so a missing catalog
            // entry is visible in the export rather than silently blank.
            other => other,
        };
        text.to_string()
    }
}

fn int(v: u64) -> String {
    v.to_string()
}

fn num(v: f64) -> String {
    format!("{v:.2}")
}

/// Flatten one Count into export rows. Scalar kinds yield one row; burndown
/// yields one row per resource axis; resource creation one row per resource.
pub fn flatten(name: &str, count: &Count) -> Vec<Detail> {
    match count {
        Count::Progress(c) => row(
            name,
            vec![int(c.total), int(c.completed), num(c.completed_rate)],
        ),
        Count::Workload(c) => row(name, vec![num(c.eval_workload), num(c.actual_workload)]),
        Count::OverdueAssessment(c) => row(
            name,
            vec![
                int(c.total),
                int(c.overdue),
                num(c.overdue_rate),
                num(c.daily_workload),
            ],
        ),
        Count::CoreKpi(c) => row(
            name,
            vec![
                int(c.total),
                int(c.completed),
                num(c.completed_rate),
                int(c.overdue),
                num(c.overdue_rate),
                num(c.eval_workload),
                num(c.actual_workload),
            ],
        ),
        Count::Bugs(c) => row(
            name,
            vec![
                int(c.total),
                int(c.bug_count),
                int(c.missing_bug_count),
                num(c.bug_rate),
            ],
        ),
        Count::HandlingEfficiency(c) => row(
            name,
            vec![
                int(c.total),
                int(c.completed),
                num(c.completed_rate),
                num(c.avg_lead_days),
                num(c.avg_handle_days),
            ],
        ),
        Count::ReviewEfficiency(c) => row(
            name,
            vec![
                int(c.total),
                int(c.confirmed),
                num(c.confirm_rate),
                num(c.avg_confirm_days),
            ],
        ),
        Count::Failures(c) => row(
            name,
            vec![
                int(c.executions),
                int(c.failures),
                num(c.fail_rate),
                int(c.failed_items),
            ],
        ),
        Count::Backlog(c) => row(
            name,
            vec![
                int(c.total),
                int(c.backlog),
                num(c.backlog_rate),
                int(c.overdue_backlog),
            ],
        ),
        Count::RecentDelivery(c) => row(
            name,
            vec![
                int(c.completed),
                num(c.delivered_workload),
                num(c.daily_avg),
            ],
        ),
        Count::LeadTime(c) => row(
            name,
            vec![
                int(c.completed),
                num(c.avg_days),
                num(c.min_days),
                num(c.max_days),
            ],
        ),
        Count::UnplannedWork(c) => row(
            name,
            vec![
                int(c.total),
                int(c.unplanned),
                num(c.unplanned_rate),
                num(c.unplanned_workload),
                num(c.daily_workload),
            ],
        ),
        Count::Burndown(c) => {
            let mut rows = Vec::new();
            for (resource, axis) in &c.series {
                let columns = axis
                    .values()
                    .map(|p| format!("{}/{}", num(p.remaining), num(p.completed)))
                    .collect();
                rows.push(Detail {
                    name: format!("{name} ({})", resource.key()),
                    columns,
                });
            }
            rows
        }
        Count::GrowthTrend(c) => {
            let columns = c.cumulative.values().map(|v| int(*v)).collect();
            vec![Detail {
                name: name.to_string(),
                columns,
            }]
        }
        Count::ResourceCreation(c) => {
            // All rows share the TOTAL series' day axis so columns line up.
            let axis: Vec<_> = c
                .series
                .get(crate::report::series::TOTAL_SERIES)
                .map(|m| m.keys().copied().collect())
                .unwrap_or_default();
            let mut rows = Vec::new();
            for (resource, per_day) in &c.series {
                let columns = axis
                    .iter()
                    .map(|day| int(per_day.get(day).copied().unwrap_or(0)))
                    .collect();
                rows.push(Detail {
                    name: format!("{name} ({resource})"),
                    columns,
                });
            }
            rows
        }
    }
}

fn row(name: &str, columns: Vec<String>) -> Vec<Detail> {
    vec![Detail {
        name: name.to_string(),
        columns,
    }]
}

/// Export column headers for a kind: the name column, the kind's field titles,
/// and for time-series kinds one label per day bucket taken from the total
/// Count's axis.
pub fn titles(
    kind: ReportKind,
    total: &Count,
    messages: &dyn Messages,
    locale: &str,
) -> Vec<String> {
    let mut titles = vec![messages.text(locale, "title.name")];
    let keys: &[&str] = match kind {
        ReportKind::Progress => &["title.total", "title.completed", "title.completed_rate"],
        ReportKind::Workload => &["title.eval_workload", "title.actual_workload"],
        ReportKind::OverdueAssessment => &[
            "title.total",
            "title.overdue",
            "title.overdue_rate",
            "title.daily_workload",
        ],
        ReportKind::CoreKpi => &[
            "title.total",
            "title.completed",
            "title.completed_rate",
            "title.overdue",
            "title.overdue_rate",
            "title.eval_workload",
            "title.actual_workload",
        ],
        ReportKind::Bugs => &[
            "title.total",
            "title.bug_count",
            "title.missing_bug_count",
            "title.bug_rate",
        ],
        ReportKind::HandlingEfficiency => &[
            "title.total",
            "title.completed",
            "title.completed_rate",
            "title.avg_lead_days",
            "title.avg_handle_days",
        ],
        ReportKind::ReviewEfficiency => &[
            "title.total",
            "title.confirmed",
            "title.confirm_rate",
            "title.avg_confirm_days",
        ],
        ReportKind::Failures => &[
            "title.executions",
            "title.failures",
            "title.fail_rate",
            "title.failed_items",
        ],
        ReportKind::Backlog => &[
            "title.total",
            "title.backlog",
            "title.backlog_rate",
            "title.overdue_backlog",
        ],
        ReportKind::RecentDelivery => &[
            "title.completed",
            "title.delivered_workload",
            "title.daily_avg",
        ],
        ReportKind::LeadTime => &[
            "title.completed",
            "title.avg_days",
            "title.min_days",
            "title.max_days",
        ],
        ReportKind::UnplannedWork => &[
            "title.total",
            "title.unplanned",
            "title.unplanned_rate",
            "title.unplanned_workload",
            "title.daily_workload",
        ],
        ReportKind::Burndown | ReportKind::GrowthTrend | ReportKind::ResourceCreation => &[],
    };
    titles.extend(keys.iter().map(|key| messages.text(locale, key)));
    titles.extend(bucket_labels(total));
    titles
}

fn bucket_labels(total: &Count) -> Vec<String> {
    let fmt = |d: &chrono::NaiveDate| d.format("%Y-%m-%d").to_string();
    match total {
        Count::Burndown(c) => c
            .series
            .get(&BurnResource::Num)
            .map(|axis| axis.keys().map(|d| fmt(d)).collect())
            .unwrap_or_default(),
        Count::GrowthTrend(c) => c.cumulative.keys().map(|d| fmt(d)).collect(),
        Count::ResourceCreation(c) => c
            .series
            .get(crate::report::series::TOTAL_SERIES)
            .map(|axis| axis.keys().map(|d| fmt(d)).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}
