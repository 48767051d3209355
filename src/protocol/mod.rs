//! Wire protocol for the queue server: JSON frames over WebSocket, one
//! request/response exchange per connection.

pub mod client;
pub mod message;

pub use client::QueueClient;
pub use message::{job_states, JobState, Request, Response, STATUS_OK};
