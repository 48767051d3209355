//! End-to-end tests for the submit, status, and delete commands.


use std::env;
use std::path::{self, PathBuf};

use serde_json::json;
use tempfile::NamedTempFile;

use miniq::command::{self, Command, Output};
use miniq::error::MiniqError;
use miniq::protocol::{JobState, QueueClient};
use test_harness::MockServer;

/// Test 1: submit sends exactly the documented fields.
#[tokio::test]
async fn test_submit_sends_the_documented_fields() {
    let mut server = MockServer::start(json!({"status": "OK", "id": 1})).await;
    let client = QueueClient::new(server.client_config());

    let script = NamedTempFile::new().expect("temp script");
    let command = Command::Submit {
        script: script.path().to_path_buf(),
        minutes: 30,
        num_nodes: 4,
    };

    let output = command::dispatch(&client, &command)
        .await
        .expect("submit should succeed");

    let frame = server.received().expect("server should record the request");
    assert_eq!(frame["action"], json!("submit"));
    assert_eq!(frame["minutes"], json!(30));
    assert_eq!(frame["num_nodes"], json!(4));
    assert_eq!(
        frame["script"],
        json!(path::absolute(script.path()).unwrap().to_string_lossy())
    );
    assert_eq!(
        frame["cwd"],
        json!(env::current_dir().unwrap().to_string_lossy())
    );
    assert_eq!(
        frame.as_object().unwrap().len(),
        5,
        "submit should send no undocumented fields"
    );

    match output {
        Output::Raw(response) => {
            assert_eq!(response.payload.get("id"), Some(&json!(1)));
        }
        other => panic!("expected raw output, got {other:?}"),
    }
}

/// Test 2: a missing script fails validation before any connection.
#[tokio::test]
async fn test_submit_with_missing_script_never_connects() {
    let server = MockServer::start(json!({"status": "OK"})).await;
    let client = QueueClient::new(server.client_config());

    let command = Command::Submit {
        script: PathBuf::from("missing.sh"),
        minutes: 1,
        num_nodes: 1,
    };

    let err = command::dispatch(&client, &command)
        .await
        .expect_err("a missing script should fail validation");

    match &err {
        MiniqError::Validation(message) => {
            let expected = format!(
                "{} is not a file",
                env::current_dir().unwrap().join("missing.sh").display()
            );
            assert_eq!(message, &expected);
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert_eq!(
        server.connections(),
        0,
        "validation must fail before any connection is opened"
    );
}

/// Test 3: status projects job rows and skips null entries.
#[tokio::test]
async fn test_status_projects_rows_and_skips_nulls() {
    let server = MockServer::start(json!({
        "status": "OK",
        "job_state": [null, {"job_id": 7, "state": "running"}],
    }))
    .await;
    let client = QueueClient::new(server.client_config());

    let output = command::dispatch(&client, &Command::Status { id: None })
        .await
        .expect("status should succeed");

    match output {
        Output::Jobs(jobs) => {
            assert_eq!(
                jobs,
                vec![JobState {
                    job_id: 7,
                    state: "running".to_string(),
                }]
            );
            assert_eq!(jobs[0].to_string(), "   7      running");
        }
        other => panic!("expected job rows, got {other:?}"),
    }
}

/// Test 4: querying an unknown job id yields an empty listing.
#[tokio::test]
async fn test_status_for_unknown_id_yields_no_rows() {
    let mut server = MockServer::start(json!({"status": "OK", "job_state": null})).await;
    let client = QueueClient::new(server.client_config());

    let output = command::dispatch(&client, &Command::Status { id: Some(999) })
        .await
        .expect("status should succeed");

    assert_eq!(output, Output::Jobs(Vec::new()));

    let frame = server.received().expect("server should record the request");
    assert_eq!(frame, json!({"action": "status", "id": 999}));
}

/// Test 5: a status query without an id sends no id field at all.
#[tokio::test]
async fn test_status_without_id_omits_the_field() {
    let mut server = MockServer::start(json!({"status": "OK"})).await;
    let client = QueueClient::new(server.client_config());

    command::dispatch(&client, &Command::Status { id: None })
        .await
        .expect("status should succeed");

    let frame = server.received().expect("server should record the request");
    assert_eq!(frame, json!({"action": "status"}));
}

/// Test 6: a bare-object job_state renders as a single row.
#[tokio::test]
async fn test_status_wraps_a_bare_object_reply() {
    let server = MockServer::start(json!({
        "status": "OK",
        "job_state": {"job_id": 2, "state": "queued"},
    }))
    .await;
    let client = QueueClient::new(server.client_config());

    let output = command::dispatch(&client, &Command::Status { id: None })
        .await
        .expect("status should succeed");

    match output {
        Output::Jobs(jobs) => {
            assert_eq!(jobs.len(), 1);
            assert_eq!(jobs[0].job_id, 2);
        }
        other => panic!("expected job rows, got {other:?}"),
    }
}

/// Test 7: repeating a status query gives the same result each time.
#[tokio::test]
async fn test_status_is_idempotent() {
    let server = MockServer::start(json!({
        "status": "OK",
        "job_state": [{"job_id": 1, "state": "queued"}],
    }))
    .await;
    let client = QueueClient::new(server.client_config());

    let first = command::dispatch(&client, &Command::Status { id: None })
        .await
        .expect("first status should succeed");
    let second = command::dispatch(&client, &Command::Status { id: None })
        .await
        .expect("second status should succeed");

    assert_eq!(first, second);
    assert_eq!(
        server.connections(),
        2,
        "each query should use its own connection"
    );
}

/// Test 8: deleting a missing job surfaces the server reply verbatim.
#[tokio::test]
async fn test_delete_of_missing_job_reports_the_server_reply() {
    let mut server =
        MockServer::start(json!({"status": "ERROR", "message": "no such job"})).await;
    let client = QueueClient::new(server.client_config());

    let err = command::dispatch(&client, &Command::Delete { id: 99 })
        .await
        .expect_err("deleting a missing job should fail");

    let frame = server.received().expect("server should record the request");
    assert_eq!(frame, json!({"action": "delete", "id": 99}));

    let rendered = err.to_string();
    assert!(
        rendered.contains(r#""message":"no such job""#),
        "the reply payload should be visible in the error: {rendered}"
    );
}
