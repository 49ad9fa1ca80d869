use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, TimeZone, Utc};
use nearbykaam_core::{GeoPoint, JobId, Location};
use nearbykaam_jobs::{
    ContactInfo, FeedCriteria, JobCategory, JobFeed, JobRecord, JobStatus, SalaryType,
    compute_job_feed,
};

const HOME: GeoPoint = GeoPoint::new(12.9716, 77.5946);

/// Deterministic synthetic job set spread over ~60 km around `HOME`.
fn synthetic_jobs(n: usize) -> Vec<JobRecord> {
    let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let dlat = ((i * 37) % 541) as f64 / 1000.0 - 0.27;
            let dlng = ((i * 53) % 557) as f64 / 1000.0 - 0.278;
            JobRecord {
                id: JobId::from(format!("job-{i}")),
                title: if i % 5 == 0 { "Delivery Driver".into() } else { "Helper".into() },
                job_role: None,
                category: JobCategory::ALL[i % JobCategory::ALL.len()],
                industry: None,
                description: Some("Daily wage, immediate joining".into()),
                employer_id: format!("emp-{}", i % 97),
                employer_name: format!("Employer {}", i % 97),
                employer_first_name: None,
                shop_name: None,
                contact: ContactInfo::default(),
                shop_photo: None,
                location: Location::at(GeoPoint::new(HOME.lat + dlat, HOME.lng + dlng)),
                salary_amount: "700".into(),
                salary_type: SalaryType::Day,
                status: if i % 7 == 0 { JobStatus::PendingApproval } else { JobStatus::Approved },
                is_live: i % 11 != 0,
                is_verified: i % 3 == 0,
                is_promoted: false,
                is_reported: false,
                approved_at: None,
                approved_by: None,
                admin_note: None,
                call_count: 0,
                whatsapp_count: 0,
                created_at: t0 - Duration::hours((i % 500) as i64),
                expiry_days: 15,
                experience_level: Some(if i % 2 == 0 { "Fresher".into() } else { "Senior".into() }),
                employment_type: None,
                work_mode: None,
            }
        })
        .collect()
}

fn bench_feed_located(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed_located");
    let criteria = FeedCriteria::default().near(HOME);

    for size in [100usize, 1_000, 10_000] {
        let jobs = synthetic_jobs(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &jobs, |b, jobs| {
            b.iter(|| compute_job_feed(black_box(jobs), black_box(&criteria)));
        });
    }

    group.finish();
}

fn bench_feed_text_search(c: &mut Criterion) {
    let jobs = synthetic_jobs(1_000);
    let feed = JobFeed::default();
    let criteria = FeedCriteria::default().near(HOME).matching("driver");

    c.bench_function("feed_text_search_1000", |b| {
        b.iter(|| feed.compute(black_box(&jobs), black_box(&criteria)));
    });
}

criterion_group!(benches, bench_feed_located, bench_feed_text_search);
criterion_main!(benches);
