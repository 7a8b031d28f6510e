// SPDX-License-Identifier: Apache-2.0

//! End-to-end harness runs against an in-process mock of the target
//! service: stateful enough to reject double-booking, so the tests prove
//! the per-trial reseed discipline is what keeps repeated reservations of
//! the same ticket succeeding.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tempfile::TempDir;

use ticket_bench::{
    BenchClient, BenchConfig, CsvReporter, ReservationDriver, ReserveMode, ReserveRequest,
    StoreError, TicketRecord, TrialHarness,
};

#[derive(Clone, Default)]
struct MockTicketService {
    tickets: Arc<Mutex<HashMap<u64, TicketRecord>>>,
    rejected: Arc<Mutex<u32>>,
    /// Ticket ids of reserve requests, in arrival order.
    received: Arc<Mutex<Vec<u64>>>,
}

impl MockTicketService {
    fn router(&self) -> Router {
        Router::new()
            .route("/", get(list))
            .route("/populate_tickets", post(populate))
            .route("/get_ticket/{i}", get(get_ticket))
            .route("/reserve", post(reserve))
            .route("/clear_cache", post(clear_cache))
            .with_state(self.clone())
    }

    async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = self.router();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

async fn list(State(svc): State<MockTicketService>) -> String {
    let tickets = svc.tickets.lock().unwrap();
    format!("{} tickets", tickets.len())
}

async fn populate(State(svc): State<MockTicketService>, body: String) -> Result<(), StatusCode> {
    let n: u64 = body.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    let mut tickets = svc.tickets.lock().unwrap();
    tickets.clear();
    for i in 0..n {
        tickets.insert(i, TicketRecord::fresh(i));
    }
    Ok(())
}

async fn get_ticket(
    State(svc): State<MockTicketService>,
    Path(i): Path<u64>,
) -> Result<Json<TicketRecord>, StatusCode> {
    let tickets = svc.tickets.lock().unwrap();
    tickets.get(&i).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn reserve(
    State(svc): State<MockTicketService>,
    Json(envelope): Json<ReserveRequest>,
) -> Result<String, StatusCode> {
    svc.received.lock().unwrap().push(envelope.args.id);
    let mut tickets = svc.tickets.lock().unwrap();
    let Some(record) = tickets.get_mut(&envelope.args.id) else {
        return Err(StatusCode::NOT_FOUND);
    };
    if record.taken {
        *svc.rejected.lock().unwrap() += 1;
        return Err(StatusCode::CONFLICT);
    }
    record.taken = true;
    record.version += 1;
    record.res_email = Some(envelope.args.fields.res_email.clone());
    record.res_name = Some(envelope.args.fields.res_name.clone());
    record.res_card = Some(envelope.args.fields.res_card.clone());
    Ok("{\"success\":true}".to_string())
}

async fn clear_cache(State(svc): State<MockTicketService>) -> String {
    let mut tickets = svc.tickets.lock().unwrap();
    let evicted = tickets.len();
    tickets.clear();
    format!("cleared {}", evicted)
}

/// Provisioner stand-in; the mock keeps durable state inside the service.
#[derive(Default, Clone)]
struct NoopStore;

impl ticket_bench::Provisioner for NoopStore {
    async fn reset(&self, _n: u64) -> Result<(), StoreError> {
        Ok(())
    }
}

fn orchestrated(base: String) -> ReservationDriver {
    ReservationDriver::new(
        BenchClient::new(base).unwrap(),
        ReserveMode::Orchestrated {
            callback_url: "http://check.example".to_string(),
            backup_url: "http://backup.example".to_string(),
        },
    )
}

fn config(tickets: u64, trials: u32) -> BenchConfig {
    let mut config = BenchConfig::for_env(true);
    config.tickets = tickets;
    config.trials = trials;
    config.settle_delay_ms = 0;
    config
}

#[tokio::test]
async fn reseeding_between_trials_allows_repeat_reservations() {
    // n=3, trials=2: ticket 1 is reserved once per trial; the per-trial
    // populate resets the store, so both must succeed with two independent
    // non-negative samples.
    let service = MockTicketService::default();
    let base = service.spawn().await;

    let harness = TrialHarness::new(orchestrated(base), NoopStore, &config(3, 2));
    let matrix = harness.run().await.unwrap();

    assert_eq!(matrix.rows().len(), 2);
    assert_eq!(matrix.completed_count(), 2);
    for row in matrix.rows() {
        assert_eq!(row.samples().len(), 3);
        assert!(row.samples().iter().all(|&ms| ms >= 0.0));
    }
    assert_eq!(*service.rejected.lock().unwrap(), 0);
    // reservations arrived in ticket-id order within each trial
    assert_eq!(*service.received.lock().unwrap(), vec![0, 1, 2, 0, 1, 2]);
}

#[tokio::test]
async fn double_booking_without_reseed_is_rejected_but_timed() {
    let service = MockTicketService::default();
    let base = service.spawn().await;
    let driver = orchestrated(base.clone());

    driver.client().populate_tickets(2).await.unwrap();

    let first = driver.reserve_ticket(1).await;
    assert!(first.is_success());

    let second = driver.reserve_ticket(1).await;
    assert_eq!(second.status, Some(409));
    assert!(second.latency_ms >= 0.0);
    assert_eq!(*service.rejected.lock().unwrap(), 1);
}

#[tokio::test]
async fn reservation_writes_derived_purchaser_fields() {
    let service = MockTicketService::default();
    let base = service.spawn().await;
    let driver = orchestrated(base);

    driver.client().populate_tickets(5).await.unwrap();
    assert!(driver.reserve_ticket(4).await.is_success());

    let body = driver.client().get_ticket(4).await.unwrap();
    let record: TicketRecord = serde_json::from_str(&body).unwrap();
    assert!(record.taken);
    assert_eq!(record.res_email.as_deref(), Some("test_4@test.com"));
    assert_eq!(record.res_name.as_deref(), Some("Test Name4"));
    assert_eq!(record.res_card.as_deref(), Some("4xxxx1234"));
}

#[tokio::test]
async fn clear_cache_on_unseeded_store_is_a_no_op() {
    let service = MockTicketService::default();
    let base = service.spawn().await;
    let client = BenchClient::new(base).unwrap();

    let body = client.clear_cache().await.unwrap();
    assert_eq!(body, "cleared 0");
}

#[tokio::test]
async fn full_run_exports_expected_csv() {
    let service = MockTicketService::default();
    let base = service.spawn().await;

    let config = config(3, 2);
    let harness = TrialHarness::new(orchestrated(base), NoopStore, &config);
    let matrix = harness.run().await.unwrap();

    let temp_dir = TempDir::new().unwrap();
    let reporter = CsvReporter::new(temp_dir.path()).unwrap();
    let path = reporter.save(&matrix, "anti_fraud", &config.env_name).unwrap();

    assert!(path.ends_with("anti_fraud_local_3tickets_2trials.csv"));
    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "trial,ticket0_ms,ticket1_ms,ticket2_ms");
    assert!(lines[1].starts_with("0,"));
    assert!(lines[2].starts_with("1,"));
}
