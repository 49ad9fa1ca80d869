//! Job posting lifecycle (moderation, publishing, engagement counters).
//!
//! Implemented as a pure aggregate: `handle` decides, `apply` evolves. The
//! storage layer rehydrates a `Job` from its last saved [`JobRecord`] snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nearbykaam_core::{
    Aggregate, AggregateRoot, DomainError, GeoPoint, JobId, Location, normalize_mobile,
};

use crate::category::JobCategory;
use crate::record::{ContactInfo, DEFAULT_EXPIRY_DAYS, JobRecord, JobStatus, SalaryType, ShopPhoto};

/// Aggregate root: a job posting.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    id: JobId,
    record: Option<JobRecord>,
    version: u64,
}

impl Job {
    /// Create an empty, not-yet-posted aggregate instance.
    pub fn empty(id: JobId) -> Self {
        Self {
            id,
            record: None,
            version: 0,
        }
    }

    /// Rehydrate from a stored snapshot.
    pub fn from_record(record: JobRecord) -> Self {
        Self {
            id: record.id.clone(),
            record: Some(record),
            version: 0,
        }
    }

    pub fn record(&self) -> Option<&JobRecord> {
        self.record.as_ref()
    }

    pub fn into_record(self) -> Option<JobRecord> {
        self.record
    }
}

impl AggregateRoot for Job {
    type Id = JobId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Which contact button a worker pressed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContactChannel {
    Call,
    Whatsapp,
}

/// Command: PostJob (employer submits a posting for review).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostJob {
    pub job_id: JobId,
    pub employer_id: String,
    pub employer_name: String,
    pub employer_first_name: Option<String>,
    pub shop_name: Option<String>,
    pub title: String,
    pub job_role: Option<String>,
    pub category: JobCategory,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub call_number: String,
    /// Empty or missing means "same as call number".
    pub whatsapp_number: Option<String>,
    pub shop_photo: Option<ShopPhoto>,
    pub location: Location,
    pub salary_amount: String,
    pub salary_type: SalaryType,
    pub expiry_days: Option<u32>,
    pub experience_level: Option<String>,
    pub employment_type: Option<String>,
    pub work_mode: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ApproveJob (admin accepts and switches the posting live).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveJob {
    pub job_id: JobId,
    pub admin_id: String,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RejectJob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectJob {
    pub job_id: JobId,
    pub admin_id: String,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordContact (worker called or messaged the employer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordContact {
    pub job_id: JobId,
    pub channel: ContactChannel,
    pub occurred_at: DateTime<Utc>,
}

/// Payload shared by commands that carry nothing but the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAction {
    pub job_id: JobId,
    pub occurred_at: DateTime<Utc>,
}

impl JobAction {
    pub fn now(job_id: JobId) -> Self {
        Self {
            job_id,
            occurred_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JobCommand {
    PostJob(PostJob),
    ApproveJob(ApproveJob),
    RejectJob(RejectJob),
    PauseJob(JobAction),
    ResumeJob(JobAction),
    ExpireJob(JobAction),
    ReportJob(JobAction),
    ClearReport(JobAction),
    VerifyEmployer(JobAction),
    RecordContact(RecordContact),
}

impl JobCommand {
    /// The posting this command targets.
    pub fn job_id(&self) -> &JobId {
        match self {
            JobCommand::PostJob(c) => &c.job_id,
            JobCommand::ApproveJob(c) => &c.job_id,
            JobCommand::RejectJob(c) => &c.job_id,
            JobCommand::RecordContact(c) => &c.job_id,
            JobCommand::PauseJob(c)
            | JobCommand::ResumeJob(c)
            | JobCommand::ExpireJob(c)
            | JobCommand::ReportJob(c)
            | JobCommand::ClearReport(c)
            | JobCommand::VerifyEmployer(c) => &c.job_id,
        }
    }

    pub fn is_post(&self) -> bool {
        matches!(self, JobCommand::PostJob(_))
    }
}

/// Event: JobPosted (carries the full initial record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosted {
    pub record: JobRecord,
}

/// Event: JobApproved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApproved {
    pub job_id: JobId,
    pub approved_by: String,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: JobRejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRejected {
    pub job_id: JobId,
    pub rejected_by: String,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ContactRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecorded {
    pub job_id: JobId,
    pub channel: ContactChannel,
    pub occurred_at: DateTime<Utc>,
}

/// Payload shared by events that carry nothing but the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobChanged {
    pub job_id: JobId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JobEvent {
    JobPosted(JobPosted),
    JobApproved(JobApproved),
    JobRejected(JobRejected),
    JobPaused(JobChanged),
    JobResumed(JobChanged),
    JobExpired(JobChanged),
    JobReported(JobChanged),
    JobReportCleared(JobChanged),
    EmployerVerified(JobChanged),
    ContactRecorded(ContactRecorded),
}

impl JobEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            JobEvent::JobPosted(_) => "jobs.job.posted",
            JobEvent::JobApproved(_) => "jobs.job.approved",
            JobEvent::JobRejected(_) => "jobs.job.rejected",
            JobEvent::JobPaused(_) => "jobs.job.paused",
            JobEvent::JobResumed(_) => "jobs.job.resumed",
            JobEvent::JobExpired(_) => "jobs.job.expired",
            JobEvent::JobReported(_) => "jobs.job.reported",
            JobEvent::JobReportCleared(_) => "jobs.job.report_cleared",
            JobEvent::EmployerVerified(_) => "jobs.employer.verified",
            JobEvent::ContactRecorded(_) => "jobs.job.contacted",
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            JobEvent::JobPosted(e) => e.record.created_at,
            JobEvent::JobApproved(e) => e.occurred_at,
            JobEvent::JobRejected(e) => e.occurred_at,
            JobEvent::JobPaused(e)
            | JobEvent::JobResumed(e)
            | JobEvent::JobExpired(e)
            | JobEvent::JobReported(e)
            | JobEvent::JobReportCleared(e)
            | JobEvent::EmployerVerified(e) => e.occurred_at,
            JobEvent::ContactRecorded(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Job {
    type Command = JobCommand;
    type Event = JobEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        if let JobEvent::JobPosted(e) = event {
            self.id = e.record.id.clone();
            self.record = Some(e.record.clone());
            self.version += 1;
            return;
        }

        let Some(r) = self.record.as_mut() else {
            return;
        };

        match event {
            JobEvent::JobPosted(_) => {}
            JobEvent::JobApproved(e) => {
                r.status = JobStatus::Approved;
                r.is_live = true;
                r.approved_at = Some(e.occurred_at);
                r.approved_by = Some(e.approved_by.clone());
                if e.note.is_some() {
                    r.admin_note = e.note.clone();
                }
            }
            JobEvent::JobRejected(e) => {
                r.status = JobStatus::Rejected;
                r.is_live = false;
                if e.note.is_some() {
                    r.admin_note = e.note.clone();
                }
            }
            JobEvent::JobPaused(_) => {
                r.status = JobStatus::Paused;
                r.is_live = false;
            }
            JobEvent::JobResumed(_) => {
                r.status = JobStatus::Approved;
                r.is_live = true;
            }
            JobEvent::JobExpired(_) => {
                r.status = JobStatus::Expired;
                r.is_live = false;
            }
            JobEvent::JobReported(_) => r.is_reported = true,
            JobEvent::JobReportCleared(_) => r.is_reported = false,
            JobEvent::EmployerVerified(_) => r.is_verified = true,
            JobEvent::ContactRecorded(e) => match e.channel {
                ContactChannel::Call => r.call_count += 1,
                ContactChannel::Whatsapp => r.whatsapp_count += 1,
            },
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            JobCommand::PostJob(cmd) => self.handle_post(cmd),
            JobCommand::ApproveJob(cmd) => self.handle_approve(cmd),
            JobCommand::RejectJob(cmd) => self.handle_reject(cmd),
            JobCommand::PauseJob(cmd) => self.handle_pause(cmd),
            JobCommand::ResumeJob(cmd) => self.handle_resume(cmd),
            JobCommand::ExpireJob(cmd) => self.handle_expire(cmd),
            JobCommand::ReportJob(cmd) => {
                let r = self.existing(&cmd.job_id)?;
                if r.is_reported {
                    return Err(DomainError::conflict("job is already reported"));
                }
                Ok(vec![JobEvent::JobReported(changed(cmd))])
            }
            JobCommand::ClearReport(cmd) => {
                let r = self.existing(&cmd.job_id)?;
                if !r.is_reported {
                    return Err(DomainError::conflict("job has no open report"));
                }
                Ok(vec![JobEvent::JobReportCleared(changed(cmd))])
            }
            JobCommand::VerifyEmployer(cmd) => {
                let r = self.existing(&cmd.job_id)?;
                if r.is_verified {
                    return Err(DomainError::conflict("employer is already verified"));
                }
                Ok(vec![JobEvent::EmployerVerified(changed(cmd))])
            }
            JobCommand::RecordContact(cmd) => {
                let r = self.existing(&cmd.job_id)?;
                if !r.is_displayable() {
                    return Err(DomainError::invariant("job is not live"));
                }
                Ok(vec![JobEvent::ContactRecorded(ContactRecorded {
                    job_id: cmd.job_id.clone(),
                    channel: cmd.channel,
                    occurred_at: cmd.occurred_at,
                })])
            }
        }
    }
}

fn changed(cmd: &JobAction) -> JobChanged {
    JobChanged {
        job_id: cmd.job_id.clone(),
        occurred_at: cmd.occurred_at,
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl Job {
    fn existing(&self, job_id: &JobId) -> Result<&JobRecord, DomainError> {
        let record = self.record.as_ref().ok_or_else(DomainError::not_found)?;
        if &self.id != job_id {
            return Err(DomainError::invariant("job_id mismatch"));
        }
        Ok(record)
    }

    fn handle_post(&self, cmd: &PostJob) -> Result<Vec<JobEvent>, DomainError> {
        if self.record.is_some() {
            return Err(DomainError::conflict("job already exists"));
        }

        let job_role = non_empty(cmd.job_role.as_ref());
        let title = match (cmd.title.trim(), job_role.as_deref()) {
            ("", Some(role)) => role.to_string(),
            ("", None) => return Err(DomainError::validation("title cannot be empty")),
            (title, _) => title.to_string(),
        };

        if cmd.employer_name.trim().is_empty() {
            return Err(DomainError::validation("employer name cannot be empty"));
        }

        let call_number = normalize_mobile(&cmd.call_number)?;
        let whatsapp_number = match non_empty(cmd.whatsapp_number.as_ref()) {
            Some(n) => normalize_mobile(&n)?,
            None => call_number.clone(),
        };

        let salary = cmd.salary_amount.trim();
        match salary.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => {}
            _ => {
                return Err(DomainError::validation(format!(
                    "salary amount must be a positive number, got '{}'",
                    cmd.salary_amount
                )));
            }
        }

        GeoPoint::new(cmd.location.lat, cmd.location.lng).validate()?;

        let expiry_days = cmd.expiry_days.unwrap_or(DEFAULT_EXPIRY_DAYS);
        if expiry_days == 0 {
            return Err(DomainError::validation("expiry days must be at least 1"));
        }

        let record = JobRecord {
            id: cmd.job_id.clone(),
            title,
            job_role,
            category: cmd.category,
            industry: non_empty(cmd.industry.as_ref()),
            description: non_empty(cmd.description.as_ref()),
            employer_id: cmd.employer_id.clone(),
            employer_name: cmd.employer_name.trim().to_string(),
            employer_first_name: non_empty(cmd.employer_first_name.as_ref()),
            shop_name: non_empty(cmd.shop_name.as_ref()),
            contact: ContactInfo {
                call_number,
                whatsapp_number,
            },
            shop_photo: cmd.shop_photo.clone(),
            location: cmd.location.clone(),
            salary_amount: salary.to_string(),
            salary_type: cmd.salary_type,
            status: JobStatus::PendingApproval,
            is_live: false,
            is_verified: false,
            is_promoted: false,
            is_reported: false,
            approved_at: None,
            approved_by: None,
            admin_note: None,
            call_count: 0,
            whatsapp_count: 0,
            created_at: cmd.occurred_at,
            expiry_days,
            experience_level: non_empty(cmd.experience_level.as_ref()),
            employment_type: non_empty(cmd.employment_type.as_ref()),
            work_mode: non_empty(cmd.work_mode.as_ref()),
        };

        Ok(vec![JobEvent::JobPosted(JobPosted { record })])
    }

    fn handle_approve(&self, cmd: &ApproveJob) -> Result<Vec<JobEvent>, DomainError> {
        let r = self.existing(&cmd.job_id)?;
        match r.status {
            JobStatus::Approved if r.is_live => {
                return Err(DomainError::conflict("job is already approved"));
            }
            JobStatus::Expired => {
                return Err(DomainError::invariant("expired jobs cannot be approved"));
            }
            _ => {}
        }

        Ok(vec![JobEvent::JobApproved(JobApproved {
            job_id: cmd.job_id.clone(),
            approved_by: cmd.admin_id.clone(),
            note: non_empty(cmd.note.as_ref()),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reject(&self, cmd: &RejectJob) -> Result<Vec<JobEvent>, DomainError> {
        let r = self.existing(&cmd.job_id)?;
        if r.status == JobStatus::Rejected {
            return Err(DomainError::conflict("job is already rejected"));
        }

        Ok(vec![JobEvent::JobRejected(JobRejected {
            job_id: cmd.job_id.clone(),
            rejected_by: cmd.admin_id.clone(),
            note: non_empty(cmd.note.as_ref()),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_pause(&self, cmd: &JobAction) -> Result<Vec<JobEvent>, DomainError> {
        let r = self.existing(&cmd.job_id)?;
        if r.status == JobStatus::Paused {
            return Err(DomainError::conflict("job is already paused"));
        }
        if !r.is_displayable() {
            return Err(DomainError::invariant("only live approved jobs can be paused"));
        }
        Ok(vec![JobEvent::JobPaused(changed(cmd))])
    }

    fn handle_resume(&self, cmd: &JobAction) -> Result<Vec<JobEvent>, DomainError> {
        let r = self.existing(&cmd.job_id)?;
        if r.is_displayable() {
            return Err(DomainError::conflict("job is already live"));
        }
        if r.status != JobStatus::Paused {
            return Err(DomainError::invariant("only paused jobs can be resumed"));
        }
        Ok(vec![JobEvent::JobResumed(changed(cmd))])
    }

    fn handle_expire(&self, cmd: &JobAction) -> Result<Vec<JobEvent>, DomainError> {
        let r = self.existing(&cmd.job_id)?;
        if r.status == JobStatus::Expired {
            return Err(DomainError::conflict("job is already expired"));
        }
        Ok(vec![JobEvent::JobExpired(changed(cmd))])
    }
}
