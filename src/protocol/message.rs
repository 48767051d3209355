use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::error::{MiniqError, Result};

/// Status value a successful reply carries. Comparison is exact.
pub const STATUS_OK: &str = "OK";

/// A request frame, serialized as a single JSON object with an `action` tag.
///
/// Field names and the tag values are the wire contract; the server matches
/// on them literally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Request {
    Submit {
        script: PathBuf,
        minutes: u32,
        num_nodes: u32,
        cwd: PathBuf,
    },
    Status {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
    },
    Delete {
        id: u64,
    },
}

impl Request {
    /// Wire name of this request's action.
    pub fn action(&self) -> &'static str {
        match self {
            Request::Submit { .. } => "submit",
            Request::Status { .. } => "status",
            Request::Delete { .. } => "delete",
        }
    }
}

/// A reply frame. `status` is mandatory; everything else the server sent is
/// kept verbatim in `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: String,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, Value>,
}

impl Response {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{self:?}"),
        }
    }
}

/// One job's state as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobState {
    pub job_id: u64,
    pub state: String,
}

/// The aligned status row: id right-aligned to 4 columns, state to 12.
impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>4} {:>12}", self.job_id, self.state)
    }
}

/// Extract the job list from a status reply.
///
/// The server is loose about the `job_state` field: it may be absent, null,
/// a single object, or a list that can contain nulls. All shapes normalize
/// to a flat list with nulls dropped and order preserved.
pub fn job_states(response: &Response) -> Result<Vec<JobState>> {
    let field = match response.payload.get("job_state") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(value) => value,
    };

    match field {
        Value::Array(_) => {
            let entries: Vec<Option<JobState>> = serde_json::from_value(field.clone())
                .map_err(|err| MiniqError::Protocol(format!("malformed job_state entry: {err}")))?;
            Ok(entries.into_iter().flatten().collect())
        }
        Value::Object(_) => {
            let entry: JobState = serde_json::from_value(field.clone())
                .map_err(|err| MiniqError::Protocol(format!("malformed job_state entry: {err}")))?;
            Ok(vec![entry])
        }
        other => Err(MiniqError::Protocol(format!(
            "job_state has unexpected shape: {other}"
        ))),
    }
}
