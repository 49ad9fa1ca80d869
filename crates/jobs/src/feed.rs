//! Worker job feed: filter pipeline + ranking.
//!
//! `compute_job_feed` is a pure function of a job snapshot and the caller's
//! criteria. It never fails and never mutates its input; distance annotation
//! happens on new [`FeedJob`] values.
//!
//! Pipeline (all filters ANDed, each a no-op when its criterion is unset):
//! 1. eligibility: `APPROVED` and live
//! 2. distance: only with a user location; annotate, keep `distance <= max`
//! 3. category: unless unset or `OTHER`
//! 4. experience bucket: unless `All`
//! 5. free text: case-insensitive substring
//!
//! Ranking: ascending distance with near-equal distances tied, then verified
//! first, then newest first.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use nearbykaam_core::{GeoPoint, JobId};

use crate::category::JobCategory;
use crate::experience::{ExperienceBucket, ExperienceTable};
use crate::record::JobRecord;

/// Default distance ceiling for the feed.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 30.0;

/// Distance choices offered by the client.
pub const DISTANCE_OPTIONS_KM: [f64; 6] = [1.0, 2.0, 5.0, 10.0, 20.0, 30.0];

/// Distances closer than this rank as equal.
pub const DEFAULT_TIE_WINDOW_KM: f64 = 0.1;

/// Rank position of jobs without a computed distance.
pub const MISSING_DISTANCE_KM: f64 = 9999.0;

// Annotated distances sit on a 0.1 km grid; adjacent grid points can differ by
// 0.0999.. in floating point and must not collapse into one tier.
const TIE_EPSILON_KM: f64 = 1e-9;

/// Caller-owned filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedCriteria {
    pub user_location: Option<GeoPoint>,
    pub max_distance_km: f64,
    /// `None` or `Some(OTHER)` both mean "all categories".
    pub category: Option<JobCategory>,
    pub experience: ExperienceBucket,
    pub search_text: String,
}

impl Default for FeedCriteria {
    fn default() -> Self {
        Self {
            user_location: None,
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            category: None,
            experience: ExperienceBucket::All,
            search_text: String::new(),
        }
    }
}

impl FeedCriteria {
    pub fn near(mut self, point: GeoPoint) -> Self {
        self.user_location = Some(point);
        self
    }

    pub fn within_km(mut self, max_distance_km: f64) -> Self {
        self.max_distance_km = max_distance_km;
        self
    }

    pub fn in_category(mut self, category: JobCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_experience(mut self, bucket: ExperienceBucket) -> Self {
        self.experience = bucket;
        self
    }

    pub fn matching(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    fn category_filter(&self) -> Option<JobCategory> {
        self.category.filter(|c| !c.is_sentinel())
    }

    fn normalized_query(&self) -> Option<String> {
        let q = self.search_text.trim();
        (!q.is_empty()).then(|| q.to_lowercase())
    }
}

/// A job as shown in the feed: the record plus its distance from the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedJob {
    #[serde(flatten)]
    pub job: JobRecord,
    /// Present only when the feed was computed with a user location.
    #[serde(rename = "distance", default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl FeedJob {
    fn unannotated(job: &JobRecord) -> Self {
        Self {
            job: job.clone(),
            distance_km: None,
        }
    }
}

/// Tunable constants of the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub tie_window_km: f64,
    pub missing_distance_km: f64,
    pub experience: ExperienceTable,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            tie_window_km: DEFAULT_TIE_WINDOW_KM,
            missing_distance_km: MISSING_DISTANCE_KM,
            experience: ExperienceTable::default(),
        }
    }
}

/// Result of a feed evaluation plus diagnostics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedOutcome {
    pub jobs: Vec<FeedJob>,
    /// Eligible jobs dropped because their stored coordinates are unusable.
    pub invalid_locations: Vec<JobId>,
}

/// Feed evaluator with its configuration.
#[derive(Debug, Clone, Default)]
pub struct JobFeed {
    config: FeedConfig,
}

impl JobFeed {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Filter and rank `jobs`.
    pub fn compute(&self, jobs: &[JobRecord], criteria: &FeedCriteria) -> Vec<FeedJob> {
        self.evaluate(jobs, criteria).jobs
    }

    pub fn evaluate(&self, jobs: &[JobRecord], criteria: &FeedCriteria) -> FeedOutcome {
        let mut invalid_locations = Vec::new();

        let eligible = jobs.iter().filter(|j| j.is_displayable());

        let located: Vec<FeedJob> = match criteria.user_location {
            Some(origin) => {
                if !origin.is_valid() {
                    warn!(lat = origin.lat, lng = origin.lng, "feed requested from an invalid location");
                }
                eligible
                    .filter_map(|job| {
                        let point = job.point();
                        if !point.is_valid() {
                            invalid_locations.push(job.id.clone());
                            return None;
                        }
                        let distance = origin.distance_km(&point);
                        // NaN never satisfies `<=`, so unusable distances drop out here.
                        (distance <= criteria.max_distance_km).then(|| FeedJob {
                            job: job.clone(),
                            distance_km: Some(distance),
                        })
                    })
                    .collect()
            }
            None => eligible.map(FeedJob::unannotated).collect(),
        };

        if !invalid_locations.is_empty() {
            warn!(
                count = invalid_locations.len(),
                job_ids = ?invalid_locations,
                "excluded jobs with invalid coordinates from the feed"
            );
        }

        let category = criteria.category_filter();
        let query = criteria.normalized_query();

        let filtered: Vec<FeedJob> = located
            .into_iter()
            .filter(|f| category.is_none_or(|c| f.job.category == c))
            .filter(|f| {
                self.config
                    .experience
                    .matches(criteria.experience, f.job.experience_level.as_deref())
            })
            .filter(|f| {
                query
                    .as_deref()
                    .is_none_or(|q| f.job.search_text().contains(q))
            })
            .collect();

        let ranked = self.rank(filtered);

        debug!(
            input = jobs.len(),
            output = ranked.len(),
            located = criteria.user_location.is_some(),
            "job feed evaluated"
        );

        FeedOutcome {
            jobs: ranked,
            invalid_locations,
        }
    }

    /// Order feed entries for display.
    ///
    /// Entries are sorted by distance, then split into tiers anchored on their
    /// nearest entry: a new tier starts once an entry is a full tie window
    /// beyond the anchor, so any two entries of a tier are less than a window
    /// apart. Within a tier verified postings come first, then newer ones;
    /// remaining ties keep distance order.
    pub fn rank(&self, mut jobs: Vec<FeedJob>) -> Vec<FeedJob> {
        jobs.sort_by(|a, b| self.rank_distance(a).total_cmp(&self.rank_distance(b)));

        let mut ranked = Vec::with_capacity(jobs.len());
        let mut tier: Vec<FeedJob> = Vec::new();
        let mut anchor: Option<f64> = None;

        for job in jobs {
            let d = self.rank_distance(&job);
            match anchor {
                Some(a) if self.is_tied(a, d) => {}
                _ => {
                    flush_tier(&mut tier, &mut ranked);
                    anchor = Some(d);
                }
            }
            tier.push(job);
        }
        flush_tier(&mut tier, &mut ranked);

        ranked
    }

    fn rank_distance(&self, job: &FeedJob) -> f64 {
        job.distance_km
            .filter(|d| !d.is_nan())
            .unwrap_or(self.config.missing_distance_km)
    }

    fn is_tied(&self, nearer: f64, farther: f64) -> bool {
        farther - nearer < self.config.tie_window_km - TIE_EPSILON_KM
    }
}

fn flush_tier(tier: &mut Vec<FeedJob>, ranked: &mut Vec<FeedJob>) {
    tier.sort_by(|a, b| {
        b.job
            .is_verified
            .cmp(&a.job.is_verified)
            .then_with(|| b.job.created_at.cmp(&a.job.created_at))
    });
    ranked.append(tier);
}

/// Filter and rank `jobs` with the default configuration.
pub fn compute_job_feed(jobs: &[JobRecord], criteria: &FeedCriteria) -> Vec<FeedJob> {
    JobFeed::default().compute(jobs, criteria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::JobStatus;
    use crate::record::fixtures::{job, t0};
    use chrono::Duration;
    use proptest::prelude::*;

    const HOME: GeoPoint = GeoPoint::new(12.9716, 77.5946);

    /// A point `km` kilometers due north of `HOME` (1° latitude ≈ 111.19 km).
    fn north_of_home(km: f64) -> GeoPoint {
        GeoPoint::new(HOME.lat + km / 111.194_926_6, HOME.lng)
    }

    fn ids(feed: &[FeedJob]) -> Vec<&str> {
        feed.iter().map(|f| f.job.id.as_str()).collect()
    }

    fn annotated(id: &str, distance: f64, verified: bool, age_days: i64) -> FeedJob {
        let mut j = job(id, HOME);
        j.is_verified = verified;
        j.created_at = t0() - Duration::days(age_days);
        FeedJob {
            job: j,
            distance_km: Some(distance),
        }
    }

    #[test]
    fn eligibility_gate_requires_approved_and_live() {
        let mut pending = job("pending", HOME);
        pending.status = JobStatus::PendingApproval;
        let mut paused = job("paused", HOME);
        paused.status = JobStatus::Paused;
        let mut not_live = job("not-live", HOME);
        not_live.is_live = false;
        let ok = job("ok", HOME);

        let feed = compute_job_feed(&[pending, paused, not_live, ok], &FeedCriteria::default());
        assert_eq!(ids(&feed), vec!["ok"]);
    }

    #[test]
    fn distance_boundary_is_inclusive() {
        let exact = job("exact", north_of_home(5.0));
        let beyond = job("beyond", north_of_home(5.1));

        let exact_d = HOME.distance_km(&exact.point());
        let beyond_d = HOME.distance_km(&beyond.point());
        assert_eq!(exact_d, 5.0);
        assert_eq!(beyond_d, 5.1);

        let feed = compute_job_feed(&[exact, beyond], &FeedCriteria::default().near(HOME).within_km(5.0));
        assert_eq!(ids(&feed), vec!["exact"]);
        assert_eq!(feed[0].distance_km, Some(5.0));
    }

    #[test]
    fn without_location_nothing_is_excluded_or_annotated() {
        let near = job("near", north_of_home(1.0));
        let far = job("far", GeoPoint::new(28.61, 77.21));

        let criteria = FeedCriteria::default().within_km(0.0);
        let feed = compute_job_feed(&[near, far], &criteria);

        assert_eq!(feed.len(), 2);
        assert!(feed.iter().all(|f| f.distance_km.is_none()));
        let json = serde_json::to_value(&feed[0]).unwrap();
        assert!(json.get("distance").is_none());
    }

    #[test]
    fn zero_distance_with_no_colocated_job_is_empty() {
        let jobs = vec![job("a", north_of_home(1.0)), job("b", north_of_home(3.0))];
        let feed = compute_job_feed(&jobs, &FeedCriteria::default().near(HOME).within_km(0.0));
        assert!(feed.is_empty());
    }

    #[test]
    fn other_and_unset_category_are_equivalent() {
        let mut shop = job("shop", HOME);
        shop.category = JobCategory::Shop;
        let hotel = job("hotel", HOME);
        let jobs = vec![shop, hotel];

        let unset = compute_job_feed(&jobs, &FeedCriteria::default());
        let other = compute_job_feed(&jobs, &FeedCriteria::default().in_category(JobCategory::Other));
        assert_eq!(unset, other);
        assert_eq!(unset.len(), 2);

        let only_shop = compute_job_feed(&jobs, &FeedCriteria::default().in_category(JobCategory::Shop));
        assert_eq!(ids(&only_shop), vec!["shop"]);
    }

    #[test]
    fn experience_bucket_filters_by_membership() {
        let mut fresher = job("fresher", HOME);
        fresher.experience_level = Some("Fresher".into());
        let mut senior = job("senior", HOME);
        senior.experience_level = Some("Senior".into());
        let unknown = job("unknown", HOME);
        let jobs = vec![fresher, senior, unknown];

        let entry = compute_job_feed(
            &jobs,
            &FeedCriteria::default().with_experience(ExperienceBucket::EntryLevel),
        );
        assert_eq!(ids(&entry), vec!["fresher"]);

        let all = compute_job_feed(&jobs, &FeedCriteria::default());
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut driver = job("driver", HOME);
        driver.title = "Delivery Driver Needed".into();
        let mut cook = job("cook", HOME);
        cook.title = "Cook".into();
        cook.description = Some("Must know DRIVING".into());
        let mut guard = job("guard", HOME);
        guard.title = "Guard".into();
        guard.job_role = Some("Night Watchman".into());

        let jobs = vec![driver, cook, guard];

        let feed = compute_job_feed(&jobs, &FeedCriteria::default().matching("driver"));
        assert_eq!(ids(&feed), vec!["driver"]);

        let feed = compute_job_feed(&jobs, &FeedCriteria::default().matching("  DRIV "));
        assert_eq!(feed.len(), 2);

        let feed = compute_job_feed(&jobs, &FeedCriteria::default().matching("watchman"));
        assert_eq!(ids(&feed), vec!["guard"]);

        let feed = compute_job_feed(&jobs, &FeedCriteria::default().matching("   "));
        assert_eq!(feed.len(), 3);
    }

    #[test]
    fn search_matches_employer_name() {
        let jobs = vec![job("a", HOME)];
        let feed = compute_job_feed(&jobs, &FeedCriteria::default().matching("sharma"));
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn ranking_ties_near_distances_and_prefers_verified() {
        let feed = JobFeed::default().rank(vec![
            annotated("2.0-unverified-yesterday", 2.0, false, 1),
            annotated("5.0-unverified-today", 5.0, false, 0),
            annotated("2.05-verified-today", 2.05, true, 0),
        ]);

        assert_eq!(
            ids(&feed),
            vec!["2.05-verified-today", "2.0-unverified-yesterday", "5.0-unverified-today"]
        );
    }

    #[test]
    fn ranking_breaks_remaining_ties_by_recency() {
        let feed = JobFeed::default().rank(vec![
            annotated("old", 3.0, false, 5),
            annotated("new", 3.0, false, 0),
            annotated("mid", 3.0, false, 2),
        ]);
        assert_eq!(ids(&feed), vec!["new", "mid", "old"]);
    }

    #[test]
    fn adjacent_grid_distances_are_not_tied() {
        let feed = JobFeed::default().rank(vec![
            annotated("0.3-verified", 0.3, true, 0),
            annotated("0.2-unverified", 0.2, false, 0),
        ]);
        assert_eq!(ids(&feed), vec!["0.2-unverified", "0.3-verified"]);
    }

    #[test]
    fn missing_distance_sorts_last() {
        let mut no_distance = annotated("none", 0.0, true, 0);
        no_distance.distance_km = None;
        let feed = JobFeed::default().rank(vec![no_distance, annotated("far", 29.0, false, 9)]);
        assert_eq!(ids(&feed), vec!["far", "none"]);
    }

    #[test]
    fn zero_distance_ranks_first() {
        let feed = JobFeed::default().rank(vec![
            annotated("one", 1.0, true, 0),
            annotated("here", 0.0, false, 3),
        ]);
        assert_eq!(ids(&feed), vec!["here", "one"]);
    }

    #[test]
    fn without_location_ranking_is_verified_then_recency() {
        let mut old_verified = job("old-verified", HOME);
        old_verified.is_verified = true;
        old_verified.created_at = t0() - Duration::days(10);
        let fresh = job("fresh", HOME);

        let feed = compute_job_feed(&[fresh, old_verified], &FeedCriteria::default());
        assert_eq!(ids(&feed), vec!["old-verified", "fresh"]);
    }

    #[test]
    fn invalid_job_coordinates_are_excluded_and_reported() {
        let broken = job("broken", GeoPoint::new(f64::NAN, 77.0));
        let out_of_range = job("out-of-range", GeoPoint::new(95.0, 77.0));
        let fine = job("fine", north_of_home(2.0));

        let outcome = JobFeed::default().evaluate(
            &[broken, out_of_range, fine],
            &FeedCriteria::default().near(HOME),
        );

        assert_eq!(ids(&outcome.jobs), vec!["fine"]);
        assert_eq!(
            outcome.invalid_locations,
            vec![JobId::from("broken"), JobId::from("out-of-range")]
        );
    }

    #[test]
    fn input_is_left_untouched() {
        let jobs = vec![job("a", north_of_home(1.0)), job("b", north_of_home(2.0))];
        let before = jobs.clone();
        let _ = compute_job_feed(&jobs, &FeedCriteria::default().near(HOME));
        assert_eq!(jobs, before);
    }

    #[test]
    fn custom_tie_window() {
        let feed = JobFeed::new(FeedConfig {
            tie_window_km: 1.0,
            ..FeedConfig::default()
        })
        .rank(vec![
            annotated("near", 2.0, false, 0),
            annotated("verified", 2.8, true, 0),
        ]);
        assert_eq!(ids(&feed), vec!["verified", "near"]);
    }

    #[test]
    fn tie_window_does_not_chain_across_near_neighbours() {
        let feed = JobFeed::default().rank(vec![
            annotated("2.00-unverified", 2.0, false, 0),
            annotated("2.09-unverified", 2.09, false, 0),
            annotated("2.18-verified", 2.18, true, 0),
        ]);
        assert_eq!(ids(&feed), vec!["2.00-unverified", "2.09-unverified", "2.18-verified"]);
    }

    #[test]
    fn wide_tie_window_is_anchored_on_nearest_entry() {
        let feed = JobFeed::new(FeedConfig {
            tie_window_km: 0.5,
            ..FeedConfig::default()
        })
        .rank(vec![
            annotated("1.0", 1.0, false, 0),
            annotated("1.4", 1.4, false, 0),
            annotated("1.8", 1.8, false, 0),
            annotated("2.2", 2.2, false, 0),
            annotated("2.6-verified", 2.6, true, 0),
        ]);
        // Tiers: [1.0, 1.4], [1.8, 2.2], [2.6].
        assert_eq!(ids(&feed), vec!["1.0", "1.4", "1.8", "2.2", "2.6-verified"]);
    }

    #[test]
    fn verified_wins_at_equal_rounded_distance_through_full_pipeline() {
        // Same point, so both round to the same distance from HOME.
        let spot = north_of_home(2.0);
        let mut unverified = job("unverified-newer", spot);
        unverified.created_at = t0();
        let mut verified = job("verified-older", spot);
        verified.is_verified = true;
        verified.created_at = t0() - Duration::days(3);
        let mut far = job("far-verified", north_of_home(5.0));
        far.is_verified = true;

        let feed = compute_job_feed(&[unverified, far, verified], &FeedCriteria::default().near(HOME));

        assert_eq!(ids(&feed), vec!["verified-older", "unverified-newer", "far-verified"]);
        assert_eq!(feed[0].distance_km, Some(2.0));
        assert_eq!(feed[1].distance_km, Some(2.0));
        assert_eq!(feed[2].distance_km, Some(5.0));
    }

    fn arb_job() -> impl Strategy<Value = JobRecord> {
        (
            "[a-z0-9]{1,8}",
            prop_oneof![
                Just(JobStatus::Approved),
                Just(JobStatus::PendingApproval),
                Just(JobStatus::Paused),
                Just(JobStatus::Rejected),
            ],
            any::<bool>(),
            any::<bool>(),
            (-0.3f64..0.3, -0.3f64..0.3),
            0i64..30,
            prop::sample::select(JobCategory::ALL.to_vec()),
            prop::option::of(prop::sample::select(vec!["Fresher", "Senior", "1-2 Years"])),
        )
            .prop_map(|(id, status, live, verified, (dlat, dlng), age, category, level)| {
                let mut j = job(&id, GeoPoint::new(HOME.lat + dlat, HOME.lng + dlng));
                j.status = status;
                j.is_live = live;
                j.is_verified = verified;
                j.created_at = t0() - Duration::days(age);
                j.category = category;
                j.experience_level = level.map(str::to_string);
                j
            })
    }

    fn arb_criteria() -> impl Strategy<Value = FeedCriteria> {
        (
            any::<bool>(),
            prop::sample::select(DISTANCE_OPTIONS_KM.to_vec()),
            prop::option::of(prop::sample::select(JobCategory::ALL.to_vec())),
            prop::sample::select(ExperienceBucket::OPTIONS.to_vec()),
            prop::sample::select(vec!["", "job", "SHARMA", "x"]),
        )
            .prop_map(|(located, max, category, experience, q)| FeedCriteria {
                user_location: located.then_some(HOME),
                max_distance_km: max,
                category,
                experience,
                search_text: q.to_string(),
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            .. ProptestConfig::default()
        })]

        /// Property: evaluating twice yields identical output, order included.
        #[test]
        fn feed_is_idempotent(
            jobs in prop::collection::vec(arb_job(), 0..24),
            criteria in arb_criteria()
        ) {
            let first = compute_job_feed(&jobs, &criteria);
            let second = compute_job_feed(&jobs, &criteria);
            prop_assert_eq!(first, second);
        }

        /// Property: nothing that is not approved and live ever shows up.
        #[test]
        fn only_displayable_jobs_are_returned(
            jobs in prop::collection::vec(arb_job(), 0..24),
            criteria in arb_criteria()
        ) {
            let feed = compute_job_feed(&jobs, &criteria);
            for f in &feed {
                prop_assert!(f.job.status == JobStatus::Approved && f.job.is_live);
            }
        }

        /// Property: without a location, distance never excludes or annotates.
        #[test]
        fn no_location_passthrough(
            jobs in prop::collection::vec(arb_job(), 0..24),
            max in 0.0f64..50.0
        ) {
            let criteria = FeedCriteria::default().within_km(max);
            let feed = compute_job_feed(&jobs, &criteria);
            let displayable = jobs.iter().filter(|j| j.is_displayable()).count();
            prop_assert_eq!(feed.len(), displayable);
            prop_assert!(feed.iter().all(|f| f.distance_km.is_none()));
        }

        /// Property: every returned distance respects the ceiling and only
        /// tied distances are reordered.
        #[test]
        fn located_feed_respects_ceiling_and_order(
            jobs in prop::collection::vec(arb_job(), 0..24),
            max in prop::sample::select(DISTANCE_OPTIONS_KM.to_vec())
        ) {
            let feed = compute_job_feed(&jobs, &FeedCriteria::default().near(HOME).within_km(max));
            for f in &feed {
                let d = f.distance_km.unwrap();
                prop_assert!(d <= max);
            }
            // Any pair shown out of distance order must be within one tie window.
            for (i, earlier) in feed.iter().enumerate() {
                for later in &feed[i + 1..] {
                    let (a, b) = (earlier.distance_km.unwrap(), later.distance_km.unwrap());
                    prop_assert!(a <= b || a - b < DEFAULT_TIE_WINDOW_KM);
                }
            }
        }
    }
}
