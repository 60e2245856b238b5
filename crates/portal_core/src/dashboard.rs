use crate::{CoreError, JobReceipt, RemoteFailure, RequestSeq, Sequencer, StatsSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Success { accepted: u64 },
    Failure,
}

/// Lifecycle of the remote scraping job as seen by this client.
///
/// `Settled` is transient: it lasts until the stats refresh that follows a
/// successful job has settled, then folds back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobRunState {
    #[default]
    Idle,
    Running,
    Settled(JobOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSettlement {
    /// No job was running; the response is ignored.
    Ignored,
    /// The job succeeded and a full stats refresh was issued.
    Succeeded { accepted: u64, stats_seq: RequestSeq },
    Failed(RemoteFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsApplied {
    Stale,
    Loaded,
    Failed(RemoteFailure),
}

/// Job trigger and stats reconciler of the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dashboard {
    job: JobRunState,
    stats: Option<StatsSnapshot>,
    sequencer: Sequencer,
    refresh_after_job: Option<RequestSeq>,
    last_outcome: Option<JobOutcome>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job_state(&self) -> JobRunState {
        self.job
    }

    pub fn stats(&self) -> Option<&StatsSnapshot> {
        self.stats.as_ref()
    }

    pub fn last_outcome(&self) -> Option<JobOutcome> {
        self.last_outcome
    }

    pub fn is_loading_stats(&self) -> bool {
        self.sequencer.is_pending()
    }

    /// Issues a stats fetch. Mount-time and post-job fetches share this path.
    pub fn request_stats(&mut self) -> RequestSeq {
        self.sequencer.issue()
    }

    /// Idle -> Running. Anything else is a duplicate trigger.
    pub fn run_job(&mut self) -> Result<(), CoreError> {
        if self.job != JobRunState::Idle {
            return Err(CoreError::JobAlreadyRunning);
        }
        self.job = JobRunState::Running;
        Ok(())
    }

    pub fn settle_job(&mut self, result: Result<JobReceipt, RemoteFailure>) -> JobSettlement {
        if self.job != JobRunState::Running {
            return JobSettlement::Ignored;
        }
        match result {
            Ok(receipt) => {
                let outcome = JobOutcome::Success {
                    accepted: receipt.accepted_count,
                };
                self.job = JobRunState::Settled(outcome);
                self.last_outcome = Some(outcome);
                // The receipt only carries a delta; the snapshot is always refetched.
                let stats_seq = self.request_stats();
                self.refresh_after_job = Some(stats_seq);
                JobSettlement::Succeeded {
                    accepted: receipt.accepted_count,
                    stats_seq,
                }
            }
            Err(failure) => {
                self.last_outcome = Some(JobOutcome::Failure);
                self.job = JobRunState::Idle;
                JobSettlement::Failed(failure)
            }
        }
    }

    pub fn apply_stats(
        &mut self,
        seq: RequestSeq,
        result: Result<StatsSnapshot, RemoteFailure>,
    ) -> StatsApplied {
        if let Some(refresh_seq) = self.refresh_after_job {
            if seq >= refresh_seq {
                self.refresh_after_job = None;
                self.job = JobRunState::Idle;
            }
        }
        if !self.sequencer.accept(seq) {
            return StatsApplied::Stale;
        }
        match result {
            Ok(snapshot) => {
                self.stats = Some(snapshot);
                StatsApplied::Loaded
            }
            Err(failure) => StatsApplied::Failed(failure),
        }
    }
}
