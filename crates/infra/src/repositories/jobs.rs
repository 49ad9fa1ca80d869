use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use nearbykaam_core::{Aggregate, DomainError, JobId};
use nearbykaam_jobs::{Job, JobAction, JobCommand, JobEvent, JobRecord};

use super::{RepositoryError, RepositoryResult, load, save};
use crate::store::{KeyValueStore, keys};

/// All postings, stored as one document under [`keys::JOBS`].
///
/// Readers take a whole-list snapshot. Writers serialize on an internal
/// mutex so a command's load, decide and save cannot interleave with another.
pub struct JobRepository {
    store: Arc<dyn KeyValueStore>,
    write: Mutex<()>,
}

impl JobRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write: Mutex::new(()),
        }
    }

    /// One consistent copy of every posting.
    pub fn snapshot(&self) -> RepositoryResult<Vec<JobRecord>> {
        Ok(load(self.store.as_ref(), keys::JOBS)?.unwrap_or_default())
    }

    pub fn get(&self, id: &JobId) -> RepositoryResult<Option<JobRecord>> {
        Ok(self.snapshot()?.into_iter().find(|j| &j.id == id))
    }

    /// Postings of one employer, newest first.
    pub fn by_employer(&self, employer_id: &str) -> RepositoryResult<Vec<JobRecord>> {
        let mut jobs: Vec<JobRecord> = self
            .snapshot()?
            .into_iter()
            .filter(|j| j.employer_id == employer_id)
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    /// Replace the whole list (seeding and imports).
    pub fn replace_all(&self, jobs: &[JobRecord]) -> RepositoryResult<()> {
        let _guard = self.write.lock().map_err(|_| RepositoryError::Poisoned)?;
        save(self.store.as_ref(), keys::JOBS, &jobs)
    }

    pub fn remove(&self, id: &JobId) -> RepositoryResult<bool> {
        let _guard = self.write.lock().map_err(|_| RepositoryError::Poisoned)?;
        let mut jobs = self.snapshot()?;
        let before = jobs.len();
        jobs.retain(|j| &j.id != id);
        let removed = jobs.len() != before;
        if removed {
            save(self.store.as_ref(), keys::JOBS, &jobs)?;
            info!(job_id = %id, "job removed");
        }
        Ok(removed)
    }

    /// Run a lifecycle command: load, decide, apply, save.
    ///
    /// Returns the updated record and the events that produced it.
    pub fn execute(&self, command: JobCommand) -> RepositoryResult<(JobRecord, Vec<JobEvent>)> {
        let _guard = self.write.lock().map_err(|_| RepositoryError::Poisoned)?;
        let mut jobs = self.snapshot()?;
        let id = command.job_id().clone();
        let position = jobs.iter().position(|j| j.id == id);

        let mut job = match (position, command.is_post()) {
            (Some(_), true) => {
                return Err(DomainError::conflict(format!("job {id} already exists")).into());
            }
            (Some(i), false) => Job::from_record(jobs[i].clone()),
            (None, true) => Job::empty(id.clone()),
            (None, false) => return Err(DomainError::not_found().into()),
        };

        let events = job.execute(&command)?;
        let record = job
            .into_record()
            .ok_or_else(|| DomainError::invariant("command left the job without a record"))?;

        match position {
            Some(i) => jobs[i] = record.clone(),
            // New postings go first, matching the client's list order.
            None => jobs.insert(0, record.clone()),
        }
        save(self.store.as_ref(), keys::JOBS, &jobs)?;

        for event in &events {
            debug!(job_id = %id, event_type = event.event_type(), "job event applied");
        }
        Ok((record, events))
    }

    /// Expire every displayable posting whose expiry window has passed.
    pub fn expire_due(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<JobId>> {
        let due: Vec<JobId> = self
            .snapshot()?
            .into_iter()
            .filter(|j| j.is_displayable() && j.is_past_expiry(now))
            .map(|j| j.id)
            .collect();

        let mut expired = Vec::with_capacity(due.len());
        for job_id in due {
            let cmd = JobCommand::ExpireJob(JobAction {
                job_id: job_id.clone(),
                occurred_at: now,
            });
            match self.execute(cmd) {
                Ok(_) => expired.push(job_id),
                // Changed concurrently; the next sweep sees its new state.
                Err(RepositoryError::Domain(e)) => debug!(job_id = %job_id, error = %e, "skipped expiry"),
                Err(e) => return Err(e),
            }
        }
        if !expired.is_empty() {
            info!(count = expired.len(), "expired postings");
        }
        Ok(expired)
    }
}
