mod common;

use common::*;
use report_api::{
    process_bulk_and_wait, BulkStatusPoller, ItemStatus, PollEvent, PollOutcome, PollSchedule,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn immediate(max_attempts: u32) -> PollSchedule {
    PollSchedule {
        initial_delay: Duration::ZERO,
        interval: Duration::from_millis(10),
        max_attempts,
    }
}

async fn mount_status(server: &MockServer, batch_id: &str, body: serde_json::Value, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/bulk-status/{batch_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(body)))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_submit_and_wait_for_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-bulk-reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "batch_id": "b-1",
            "total_reports": 2
        }))))
        .expect(1)
        .mount(&server)
        .await;
    mount_status(&server, "b-1", json!({ "status": "processing", "total": 2, "processed": 0 }), 2).await;
    mount_status(
        &server,
        "b-1",
        json!({
            "status": "completed",
            "total": 2,
            "processed": 2,
            "results": [
                { "report_name": "Report_1", "status": "success", "report_id": 501 },
                { "report_name": "Report_2", "status": "failed", "error": "No data found" }
            ]
        }),
        1,
    )
    .await;

    let config = config_for(&server);
    let (submission, outcome) = process_bulk_and_wait(&config, &["Report_1", "Report_2"])
        .await
        .unwrap();

    assert_eq!(submission.batch_id, "b-1");
    assert_eq!(outcome.attempts(), 3);
    let status = outcome.last_status().unwrap();
    assert_eq!(status.succeeded(), 1);
    assert_eq!(status.failed(), 1);
    assert_eq!(status.results[1].status, ItemStatus::Failed);
}

#[tokio::test]
async fn test_http_errors_are_reported_and_polling_continues() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bulk-status/b-2"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_status(&server, "b-2", json!({ "status": "completed", "results": [] }), 1).await;

    let events = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&events);
    let poller = BulkStatusPoller::with_schedule(client_for(&server), immediate(5)).on_event(
        move |event| {
            let label = match event {
                PollEvent::Status { .. } => "status",
                PollEvent::Failed { .. } => "failed",
            };
            seen.lock().unwrap().push((event.attempt(), label));
        },
    );

    let outcome = poller.poll("b-2").await.unwrap();
    assert!(outcome.is_completed());
    assert_eq!(*events.lock().unwrap(), vec![(1, "failed"), (2, "status")]);
}

#[tokio::test]
async fn test_stuck_batch_exhausts_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bulk-status/b-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "status": "processing",
            "total": 5,
            "processed": 4
        }))))
        .expect(3)
        .mount(&server)
        .await;

    let poller = BulkStatusPoller::with_schedule(client_for(&server), immediate(3));
    let outcome = poller.poll("b-3").await.unwrap();

    match outcome {
        PollOutcome::Exhausted { attempts, last_status } => {
            assert_eq!(attempts, 3);
            assert_eq!(last_status.unwrap().processed, Some(4));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}
