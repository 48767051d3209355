//! The three queue operations: input validation, request building, and
//! projection of the reply into printable output.

use std::env;
use std::path::{self, PathBuf};

use crate::error::{MiniqError, Result};
use crate::protocol::{job_states, JobState, QueueClient, Request, Response};

/// A queue operation as requested on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Submit {
        script: PathBuf,
        minutes: u32,
        num_nodes: u32,
    },
    Status {
        id: Option<u64>,
    },
    Delete {
        id: u64,
    },
}

/// What a completed operation prints.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// The server reply, rendered as one JSON line.
    Raw(Response),
    /// Job states, rendered one aligned row per job.
    Jobs(Vec<JobState>),
}

impl Command {
    /// Build the wire request for this command.
    ///
    /// Submit resolves the script path lexically, requires it to name an
    /// existing regular file, and captures the working directory. All of
    /// that happens before any network activity.
    pub fn to_request(&self) -> Result<Request> {
        match self {
            Command::Submit {
                script,
                minutes,
                num_nodes,
            } => {
                let script = path::absolute(script).map_err(|err| {
                    MiniqError::Validation(format!("cannot resolve {}: {err}", script.display()))
                })?;
                if !script.is_file() {
                    return Err(MiniqError::Validation(format!(
                        "{} is not a file",
                        script.display()
                    )));
                }
                let cwd = env::current_dir().map_err(|err| {
                    MiniqError::Validation(format!("cannot determine working directory: {err}"))
                })?;
                Ok(Request::Submit {
                    script,
                    minutes: *minutes,
                    num_nodes: *num_nodes,
                    cwd,
                })
            }
            Command::Status { id } => Ok(Request::Status { id: *id }),
            Command::Delete { id } => Ok(Request::Delete { id: *id }),
        }
    }
}

/// Run one command against the server and shape its output.
pub async fn dispatch(client: &QueueClient, command: &Command) -> Result<Output> {
    let request = command.to_request()?;
    let response = client.execute(&request).await?;

    match command {
        Command::Status { .. } => Ok(Output::Jobs(job_states(&response)?)),
        Command::Submit { .. } | Command::Delete { .. } => Ok(Output::Raw(response)),
    }
}
