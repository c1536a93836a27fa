use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a work item, already normalized by the summary source.
///
/// `Canceled` is the terminal-invalid value: burndown, lead-time and other
/// "valid population" metrics exclude it from both numerator and denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    Pending,
    Processing,
    Completed,
    Canceled,
}

impl ItemStatus {
    /// Part of the valid population (everything except `Canceled`).
    pub fn is_valid(self) -> bool {
        self != ItemStatus::Canceled
    }

    pub fn is_completed(self) -> bool {
        self == ItemStatus::Completed
    }

    /// Still open: neither completed nor canceled.
    pub fn is_open(self) -> bool {
        matches!(self, ItemStatus::Pending | ItemStatus::Processing)
    }
}

/// A read-only per-item projection used only for analytics.
///
/// Fetched from the summary source already scoped and filtered; the engine
/// never mutates one. `owner_id` is the assignee for tasks and the tester for
/// functional cases — the summary source fills whichever the domain uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencySummary {
    pub id: String,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub deadline: Option<NaiveDate>,
    pub status: ItemStatus,
    pub eval_workload: f64,
    pub actual_workload: f64,
    /// Failed executions recorded against the item (cases only; 0 for tasks).
    pub fail_num: u64,
    /// Total executions recorded against the item.
    pub total_num: u64,
    pub priority: Option<String>,
    pub is_bug: bool,
    pub missing_bug: bool,
}

impl EfficiencySummary {
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            owner_id: None,
            created_at,
            processed_at: None,
            confirmed_at: None,
            completed_at: None,
            deadline: None,
            status: ItemStatus::Pending,
            eval_workload: 0.0,
            actual_workload: 0.0,
            fail_num: 0,
            total_num: 0,
            priority: None,
            is_bug: false,
            missing_bug: false,
        }
    }
}

/// Display metadata for a user represented in an overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

impl UserInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
        }
    }
}

/// The population a report runs over: a project, optionally narrowed to a
/// sprint or test plan. `deadline` is the default end of time-series axes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    pub project_id: String,
    pub sprint_id: Option<String>,
    pub plan_id: Option<String>,
    pub deadline: Option<NaiveDate>,
}

impl Scope {
    pub fn project(id: impl Into<String>) -> Self {
        Self {
            project_id: id.into(),
            ..Self::default()
        }
    }
}

/// Optional inclusive date bounds applied by the summary source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start.is_none_or(|s| day >= s) && self.end.is_none_or(|e| day <= e)
    }
}

/// The organizational unit an overview can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrgType {
    /// A single user. The per-user breakdown is skipped in this case since it
    /// would duplicate the total.
    User,
    Department,
    Group,
}

/// Org-membership filter, resolved to a user-id set by the user directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgFilter {
    pub org_type: OrgType,
    pub org_id: String,
}

/// Per-request caller identity, threaded explicitly into `compose` instead of
/// being read from ambient/global state.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub user_id: String,
    pub tenant_id: String,
    pub locale: String,
}

impl RequestContext {
    pub fn new(user_id: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            tenant_id: tenant_id.into(),
            locale: "en".to_string(),
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_classification() {
        assert!(ItemStatus::Pending.is_valid());
        assert!(ItemStatus::Completed.is_valid());
        assert!(!ItemStatus::Canceled.is_valid());

        assert!(ItemStatus::Completed.is_completed());
        assert!(!ItemStatus::Processing.is_completed());

        assert!(ItemStatus::Pending.is_open());
        assert!(ItemStatus::Processing.is_open());
        assert!(!ItemStatus::Completed.is_open());
        assert!(!ItemStatus::Canceled.is_open());
    }

    #[test]
    fn test_summary_defaults() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let s = EfficiencySummary::new("t1", created);
        assert_eq!(s.status, ItemStatus::Pending);
        assert!(s.owner_id.is_none());
        assert_eq!(s.eval_workload, 0.0);
        assert!(!s.is_bug);
    }

    #[test]
    fn test_date_range_contains() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        let range = DateRange::new(Some(d(5)), Some(d(10)));
        assert!(range.contains(d(5)));
        assert!(range.contains(d(10)));
        assert!(!range.contains(d(4)));
        assert!(!range.contains(d(11)));

        let open = DateRange::default();
        assert!(open.contains(d(1)));
    }
}
