//! Life cycle of a single diagnostics request.
//!
//! A request starts as `Draft` while the form is being filled in, becomes `Submitted` once the
//! request is sent and ends as `Resolved` or `Failed`, driven by the host's job polling.

use anyhow::{bail, Error};

use diag_api_types::{AsyncJobRef, AsyncJobResult, AsyncJobStatus};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestState {
    Draft,
    Submitted,
    Resolved,
    Failed(String),
}

impl RequestState {
    pub fn is_final(&self) -> bool {
        matches!(self, RequestState::Resolved | RequestState::Failed(_))
    }
}

#[derive(Clone, Debug)]
pub struct RequestTracker {
    state: RequestState,
    job: Option<AsyncJobRef>,
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestTracker {
    pub fn new() -> Self {
        Self {
            state: RequestState::Draft,
            job: None,
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// The job the server created for this request, once known.
    pub fn job(&self) -> Option<&AsyncJobRef> {
        self.job.as_ref()
    }

    /// The request is being sent.
    pub fn submit(&mut self) -> Result<(), Error> {
        if self.state != RequestState::Draft {
            bail!("cannot submit request in state {:?}", self.state);
        }
        self.state = RequestState::Submitted;
        Ok(())
    }

    /// The server accepted the request and started a job.
    pub fn accepted(&mut self, job: AsyncJobRef) -> Result<(), Error> {
        if self.state != RequestState::Submitted || self.job.is_some() {
            bail!("unexpected job {} in state {:?}", job.jobid, self.state);
        }
        self.job = Some(job);
        Ok(())
    }

    /// Sending the request or running the job failed.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), Error> {
        if self.state != RequestState::Submitted {
            bail!("cannot fail request in state {:?}", self.state);
        }
        self.state = RequestState::Failed(message.into());
        Ok(())
    }

    /// Apply a poll result for our job.
    pub fn poll_result(&mut self, result: &AsyncJobResult) -> Result<&RequestState, Error> {
        let Some(job) = &self.job else {
            bail!("no job to poll in state {:?}", self.state);
        };
        if job.jobid != result.jobid {
            bail!("poll result for job {} does not match {}", result.jobid, job.jobid);
        }
        if self.state != RequestState::Submitted {
            bail!("job {} already finished", job.jobid);
        }

        match result.jobstatus {
            AsyncJobStatus::Pending => (),
            AsyncJobStatus::Succeeded => self.state = RequestState::Resolved,
            AsyncJobStatus::Failed => {
                let message = result.error_text().unwrap_or("diagnostics job failed");
                self.state = RequestState::Failed(message.to_string());
            }
        }

        Ok(&self.state)
    }
}
