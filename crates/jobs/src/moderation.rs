//! Admin moderation queue: filtering over all postings and dashboard counts.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::category::JobCategory;
use crate::record::{JobRecord, JobStatus};

/// Posting age window for the moderation queue.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DateRange {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateRange {
    fn max_age(&self) -> Option<Duration> {
        match self {
            DateRange::All => None,
            DateRange::Today => Some(Duration::days(1)),
            DateRange::Week => Some(Duration::days(7)),
            DateRange::Month => Some(Duration::days(30)),
        }
    }
}

/// Filters of the admin job table. Unset fields do not filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminJobFilter {
    pub only_live: bool,
    pub state: Option<String>,
    pub city: Option<String>,
    pub status: Option<JobStatus>,
    pub category: Option<JobCategory>,
    pub reported_only: bool,
    pub date_range: DateRange,
    pub search: Option<String>,
}

impl AdminJobFilter {
    pub fn matches(&self, job: &JobRecord, now: DateTime<Utc>) -> bool {
        if self.only_live && !job.is_live {
            return false;
        }
        if let Some(state) = non_blank(&self.state) {
            if job.location.state.as_deref() != Some(state) {
                return false;
            }
        }
        if let Some(city) = non_blank(&self.city) {
            if job.location.city.as_deref() != Some(city) {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != job.status) {
            return false;
        }
        if self.category.is_some_and(|c| c != job.category) {
            return false;
        }
        if self.reported_only && !job.is_reported {
            return false;
        }
        if let Some(max_age) = self.date_range.max_age() {
            if now - job.created_at > max_age {
                return false;
            }
        }
        if let Some(search) = non_blank(&self.search) {
            let s = search.to_lowercase();
            let hit = |v: &str| v.to_lowercase().contains(&s);
            return hit(job.display_role())
                || hit(&job.employer_name)
                || job.shop_name.as_deref().is_some_and(hit);
        }
        true
    }

    /// Matching jobs, newest first.
    pub fn apply<'a>(&self, jobs: &'a [JobRecord], now: DateTime<Utc>) -> Vec<&'a JobRecord> {
        let mut out: Vec<&JobRecord> = jobs.iter().filter(|j| self.matches(j, now)).collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Admin dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModerationStats {
    pub live: usize,
    pub pending: usize,
    pub employers: usize,
    pub reported: usize,
}

impl ModerationStats {
    pub fn from_jobs(jobs: &[JobRecord]) -> Self {
        let employers: HashSet<&str> = jobs.iter().map(|j| j.employer_id.as_str()).collect();
        Self {
            live: jobs.iter().filter(|j| j.is_displayable()).count(),
            pending: jobs
                .iter()
                .filter(|j| j.status == JobStatus::PendingApproval)
                .count(),
            employers: employers.len(),
            reported: jobs.iter().filter(|j| j.is_reported).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures::{job, t0};
    use nearbykaam_core::GeoPoint;

    fn sample() -> Vec<JobRecord> {
        let p = GeoPoint::new(12.97, 77.59);

        let mut a = job("a", p);
        a.location.city = Some("Bengaluru".into());
        a.location.state = Some("Karnataka".into());

        let mut b = job("b", p);
        b.status = JobStatus::PendingApproval;
        b.is_live = false;
        b.employer_id = "emp-2".into();
        b.employer_name = "Metro Garage".into();
        b.category = JobCategory::Garage;
        b.created_at = t0() - Duration::days(10);

        let mut c = job("c", p);
        c.is_reported = true;
        c.shop_name = Some("Lakshmi Stores".into());
        c.created_at = t0() - Duration::hours(3);

        vec![a, b, c]
    }

    fn ids<'a>(jobs: &[&'a JobRecord]) -> Vec<&'a str> {
        jobs.iter().map(|j| j.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_lists_everything_newest_first() {
        let jobs = sample();
        let out = AdminJobFilter::default().apply(&jobs, t0());
        assert_eq!(ids(&out), vec!["a", "c", "b"]);
    }

    #[test]
    fn status_and_live_filters() {
        let jobs = sample();
        let pending = AdminJobFilter {
            status: Some(JobStatus::PendingApproval),
            ..Default::default()
        };
        assert_eq!(ids(&pending.apply(&jobs, t0())), vec!["b"]);

        let live = AdminJobFilter {
            only_live: true,
            ..Default::default()
        };
        assert_eq!(live.apply(&jobs, t0()).len(), 2);
    }

    #[test]
    fn location_and_report_filters() {
        let jobs = sample();
        let city = AdminJobFilter {
            city: Some("Bengaluru".into()),
            ..Default::default()
        };
        assert_eq!(ids(&city.apply(&jobs, t0())), vec!["a"]);

        let reported = AdminJobFilter {
            reported_only: true,
            ..Default::default()
        };
        assert_eq!(ids(&reported.apply(&jobs, t0())), vec!["c"]);
    }

    #[test]
    fn date_range_excludes_old_postings() {
        let jobs = sample();
        let week = AdminJobFilter {
            date_range: DateRange::Week,
            ..Default::default()
        };
        assert_eq!(ids(&week.apply(&jobs, t0())), vec!["a", "c"]);
    }

    #[test]
    fn search_covers_role_employer_and_shop() {
        let jobs = sample();
        let by_shop = AdminJobFilter {
            search: Some("lakshmi".into()),
            ..Default::default()
        };
        assert_eq!(ids(&by_shop.apply(&jobs, t0())), vec!["c"]);

        let by_employer = AdminJobFilter {
            search: Some("GARAGE".into()),
            ..Default::default()
        };
        assert_eq!(ids(&by_employer.apply(&jobs, t0())), vec!["b"]);
    }

    #[test]
    fn stats_count_live_pending_employers_reported() {
        let stats = ModerationStats::from_jobs(&sample());
        assert_eq!(
            stats,
            ModerationStats {
                live: 2,
                pending: 1,
                employers: 2,
                reported: 1,
            }
        );
    }
}
