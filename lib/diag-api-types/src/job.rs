use std::collections::HashMap;
use std::fmt;

use anyhow::{bail, Error};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference to a server side async job, as returned by async commands.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AsyncJobRef {
    pub jobid: String,
}

/// State of an async job as reported by `queryAsyncJobResult`.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum AsyncJobStatus {
    Pending,
    Succeeded,
    Failed,
}

impl AsyncJobStatus {
    pub fn is_finished(self) -> bool {
        self != AsyncJobStatus::Pending
    }
}

impl TryFrom<u8> for AsyncJobStatus {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        Ok(match value {
            0 => AsyncJobStatus::Pending,
            1 => AsyncJobStatus::Succeeded,
            2 => AsyncJobStatus::Failed,
            other => bail!("invalid async job status {other}"),
        })
    }
}

impl From<AsyncJobStatus> for u8 {
    fn from(value: AsyncJobStatus) -> Self {
        match value {
            AsyncJobStatus::Pending => 0,
            AsyncJobStatus::Succeeded => 1,
            AsyncJobStatus::Failed => 2,
        }
    }
}

impl fmt::Display for AsyncJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            AsyncJobStatus::Pending => "pending",
            AsyncJobStatus::Succeeded => "succeeded",
            AsyncJobStatus::Failed => "failed",
        })
    }
}

/// Keys the server may wrap a diagnostics job result in.
const DIAGNOSTICS_RESPONSE_NAMES: &[&str] =
    &["retrievediagnostics", "retrievediagnosticsresponse"];

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct AsyncJobResult {
    pub jobid: String,

    pub jobstatus: AsyncJobStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobresultcode: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobresult: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,
}

impl AsyncJobResult {
    /// The error text of a failed job, if the server included one.
    pub fn error_text(&self) -> Option<&str> {
        if self.jobstatus != AsyncJobStatus::Failed {
            return None;
        }
        self.jobresult.as_ref()?.get("errortext")?.as_str()
    }

    /// Decode the result of a finished diagnostics job.
    ///
    /// The server wraps the payload in an object keyed by the response name, a bare payload is
    /// accepted as well.
    pub fn diagnostics_result(&self) -> Result<Option<DiagnosticsResult>, Error> {
        if self.jobstatus != AsyncJobStatus::Succeeded {
            return Ok(None);
        }

        let Some(Value::Object(map)) = &self.jobresult else {
            return Ok(None);
        };

        let wrapped = DIAGNOSTICS_RESPONSE_NAMES
            .iter()
            .find_map(|name| map.get(*name).filter(|inner| inner.is_object()));

        let payload = match wrapped {
            Some(inner) if map.len() == 1 => inner.clone(),
            _ => Value::Object(map.clone()),
        };

        Ok(Some(serde_json::from_value(payload)?))
    }
}

/// Outcome of a diagnostics retrieval job.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct DiagnosticsResult {
    /// Whether the files were copied successfully.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numberoffilescopied: Option<u64>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
}
