//! Manages the state of long-running, asynchronous background jobs.
//!
//! Photo extraction runs outside the request/response cycle: fetching a
//! tracking page, classifying its images and persisting the results can take
//! seconds. This module tracks those jobs.
//!
//! The main components are:
//! - `JobsState`: A clonable, thread-safe struct that holds the status of all
//!   jobs and the tokens that currently have an extraction in flight. It is
//!   injected into the Actix application state in `main.rs`.
//! - `JobUpdate`: A message struct used to communicate status changes from a
//!   background job back to the central state manager.
//! - `start_job_updater`: A long-running task that listens for `JobUpdate`
//!   messages on an MPSC channel and updates the shared `JobsState` accordingly.

use common::jobs::JobStatus;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex, RwLock};
use uuid::Uuid;

/// How long a finished job stays pollable.
pub const FINISHED_JOB_RETENTION: Duration = Duration::from_secs(30 * 60);

/// A thread-safe, shareable container for the state of all background jobs.
#[derive(Clone)]
pub struct JobsState {
    /// A map from a unique job ID to its current `JobStatus`.
    ///
    /// Read by the `/api/pod/status/{job_id}` endpoint, written by the
    /// `start_job_updater` task and by `claim` when a job is registered.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,

    /// Tracking token -> job ID of the extraction currently running for it.
    ///
    /// Guarantees at most one in-flight fetch per token.
    pub in_flight: Arc<Mutex<HashMap<String, String>>>,

    /// Background tasks push `JobUpdate` messages through this sender instead
    /// of writing the `jobs` map themselves, which keeps updates ordered.
    pub tx: mpsc::Sender<JobUpdate>,

    /// Completed and failed jobs are dropped from `jobs` after this long.
    pub retention: Duration,
}

/// Represents a status update for a specific background job.
#[derive(Debug)]
pub struct JobUpdate {
    /// The unique identifier of the job being updated.
    pub(crate) job_id: String,
    /// The new status of the job.
    pub(crate) status: JobStatus,
}

impl JobUpdate {
    pub fn new(job_id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status,
        }
    }
}

/// Result of asking for a job slot for a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// A new job was registered as `Pending`.
    New(String),
    /// A job for this token is already running.
    Existing(String),
}

impl JobsState {
    pub fn new(tx: mpsc::Sender<JobUpdate>) -> Self {
        Self::with_retention(tx, FINISHED_JOB_RETENTION)
    }

    pub fn with_retention(tx: mpsc::Sender<JobUpdate>, retention: Duration) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            tx,
            retention,
        }
    }

    /// Job ID of the extraction currently running for `token`, if any.
    pub async fn running(&self, token: &str) -> Option<String> {
        self.in_flight.lock().await.get(token).cloned()
    }

    /// Registers a job for `token` unless one is already in flight.
    ///
    /// The in-flight lock is held while the job is registered, so two
    /// concurrent claims for one token never both get `Claim::New`.
    pub async fn claim(&self, token: &str) -> Claim {
        let mut in_flight = self.in_flight.lock().await;
        if let Some(job_id) = in_flight.get(token) {
            return Claim::Existing(job_id.clone());
        }
        let job_id = Uuid::new_v4().to_string();
        self.jobs
            .write()
            .await
            .insert(job_id.clone(), JobStatus::Pending);
        in_flight.insert(token.to_string(), job_id.clone());
        Claim::New(job_id)
    }

    /// Frees the token so the next request schedules a fresh job.
    pub async fn release(&self, token: &str) {
        self.in_flight.lock().await.remove(token);
    }

    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().await.get(job_id).cloned()
    }
}

/// Starts the central job state updater task.
///
/// This function should be spawned as a long-running background task (as seen in `main.rs`).
/// It continuously listens for `JobUpdate` messages on the provided `rx` receiver and
/// stores the new status for the corresponding `job_id`. Each message also evicts
/// the finished jobs that are older than `state.retention`.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    let mut finished: VecDeque<(Instant, String)> = VecDeque::new();
    while let Some(update) = rx.recv().await {
        let now = Instant::now();
        let mut jobs = state.jobs.write().await;

        while finished
            .front()
            .is_some_and(|(at, _)| now.duration_since(*at) >= state.retention)
        {
            if let Some((_, job_id)) = finished.pop_front() {
                jobs.remove(&job_id);
            }
        }

        if matches!(update.status, JobStatus::Completed(_) | JobStatus::Failed(_)) {
            finished.push_back((now, update.job_id.clone()));
        }
        jobs.insert(update.job_id, update.status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_claim_for_token_is_deduplicated() {
        let (tx, _rx) = mpsc::channel(8);
        let state = JobsState::new(tx);

        let Claim::New(job_id) = state.claim("T1").await else {
            panic!("first claim must create a job");
        };
        assert_eq!(state.claim("T1").await, Claim::Existing(job_id.clone()));
        assert_eq!(state.status(&job_id).await, Some(JobStatus::Pending));

        assert!(matches!(state.claim("T2").await, Claim::New(_)));
        assert_eq!(state.running("T1").await, Some(job_id.clone()));

        state.release("T1").await;
        assert_eq!(state.running("T1").await, None);
        assert!(matches!(state.claim("T1").await, Claim::New(id) if id != job_id));
    }

    #[tokio::test]
    async fn updater_applies_messages_in_order() {
        let (tx, rx) = mpsc::channel(8);
        let state = JobsState::new(tx.clone());
        let updater = tokio::spawn(start_job_updater(state.clone(), rx));

        tx.send(JobUpdate::new("J", JobStatus::InProgress(50))).await.unwrap();
        tx.send(JobUpdate::new("J", JobStatus::Completed("done".to_string())))
            .await
            .unwrap();

        tokio::time::timeout(Duration::from_secs(1), async {
            while state.status("J").await != Some(JobStatus::Completed("done".to_string())) {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        updater.abort();
    }

    #[tokio::test]
    async fn finished_jobs_are_evicted_after_retention() {
        let (tx, rx) = mpsc::channel(8);
        let state = JobsState::with_retention(tx.clone(), Duration::ZERO);
        let updater = tokio::spawn(start_job_updater(state.clone(), rx));

        tx.send(JobUpdate::new("A", JobStatus::Failed("boom".to_string())))
            .await
            .unwrap();
        tx.send(JobUpdate::new("B", JobStatus::InProgress(10))).await.unwrap();

        tokio::time::timeout(Duration::from_secs(1), async {
            while state.status("B").await.is_none() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert_eq!(state.status("A").await, None);
        assert_eq!(state.status("B").await, Some(JobStatus::InProgress(10)));
        updater.abort();
    }
}
