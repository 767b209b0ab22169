use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use client_core::{
    ClockService, Coordinate, HttpClockService, InteractionController, NotificationCenter,
    OperationError, RefreshTarget, ServiceError,
};
use shared::{
    domain::{Event, Process, ProcessId, Severity},
    protocol::{CreateProcessRequest, EventCreated, MessageDelivered, SendMessageRequest},
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Default)]
struct MockClock {
    processes: Vec<Process>,
    events: Vec<Event>,
    last_message: Option<SendMessageRequest>,
}

type Shared = Arc<Mutex<MockClock>>;

async fn list_processes(State(state): State<Shared>) -> Json<Vec<Process>> {
    Json(state.lock().await.processes.clone())
}

async fn create_process(
    State(state): State<Shared>,
    Json(body): Json<CreateProcessRequest>,
) -> Result<(StatusCode, Json<Process>), StatusCode> {
    if body.name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut state = state.lock().await;
    let process = Process {
        id: ProcessId(state.processes.len() as i64 + 1),
        name: body.name,
        logical_clock: 0,
    };
    state.processes.push(process.clone());
    Ok((StatusCode::CREATED, Json(process)))
}

async fn create_event(
    State(state): State<Shared>,
    Path(id): Path<i64>,
) -> Result<Json<EventCreated>, StatusCode> {
    let mut state = state.lock().await;
    let process = state
        .processes
        .iter_mut()
        .find(|p| p.id.0 == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    process.logical_clock += 1;
    let clock = process.logical_clock;
    let description = format!("Local event on process {id}");
    let event_id = state.events.len() as i64 + 1;
    state.events.push(Event {
        process_id: ProcessId(id),
        logical_clock: clock,
        description: description.clone(),
    });
    Ok(Json(EventCreated {
        description,
        id: Some(event_id),
        process_id: Some(ProcessId(id)),
        logical_clock: Some(clock),
    }))
}

async fn send_message(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<MessageDelivered>, StatusCode> {
    let mut state = state.lock().await;
    let destination = body.destination_id;
    if !state.processes.iter().any(|p| p.id == destination) {
        return Err(StatusCode::NOT_FOUND);
    }
    let source = state
        .processes
        .iter_mut()
        .find(|p| p.id.0 == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    source.logical_clock += 1;
    let source_clock = source.logical_clock;
    let receiver = state
        .processes
        .iter_mut()
        .find(|p| p.id == destination)
        .ok_or(StatusCode::NOT_FOUND)?;
    receiver.logical_clock = receiver.logical_clock.max(source_clock) + 1;
    let receive_clock = receiver.logical_clock;

    state.events.push(Event {
        process_id: ProcessId(id),
        logical_clock: source_clock,
        description: format!("Send to {destination}: {}", body.message),
    });
    state.events.push(Event {
        process_id: destination,
        logical_clock: receive_clock,
        description: format!("Receive from {id}: {}", body.message),
    });
    let message = body.message.clone();
    state.last_message = Some(body);

    Ok(Json(MessageDelivered {
        message,
        id: Some(1),
        source_id: Some(ProcessId(id)),
        destination_id: Some(destination),
        logical_clock: Some(receive_clock),
    }))
}

async fn list_events(State(state): State<Shared>) -> Json<Vec<Event>> {
    Json(state.lock().await.events.clone())
}

async fn spawn_clock_server() -> Result<(String, Shared)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state: Shared = Arc::new(Mutex::new(MockClock::default()));
    let app = Router::new()
        .route("/api/v1/process", get(list_processes).post(create_process))
        .route("/api/v1/process/:id/event", post(create_event))
        .route("/api/v1/process/:id/message", post(send_message))
        .route("/api/v1/events", get(list_events))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/api/v1"), state))
}

fn controller_for(base_url: &str) -> InteractionController {
    let service = HttpClockService::new(base_url).expect("service");
    InteractionController::new(Arc::new(service), NotificationCenter::new(Duration::from_secs(10)))
}

#[tokio::test]
async fn full_session_produces_lamport_timeline() {
    let (base_url, state) = spawn_clock_server().await.expect("spawn server");
    let controller = controller_for(&base_url);
    controller.load().await.expect("initial load");
    assert!(controller.processes().await.is_empty());

    controller.create_process("Alice").await.expect("alice");
    controller.create_process("Bob").await.expect("bob");
    controller.create_event(ProcessId(1)).await.expect("event");

    controller.select_sender(ProcessId(1)).await;
    controller.select_receiver(ProcessId(2)).await;
    controller.set_message_content("ping").await;
    let delivered = controller.send_message().await.expect("send");
    assert_eq!(delivered.message, "ping");
    assert_eq!(delivered.logical_clock, Some(3));

    let last = state.lock().await.last_message.clone().expect("message body");
    assert_eq!(last.destination_id, ProcessId(2));
    assert_eq!(last.message, "ping");

    let clocks: Vec<(i64, u64)> = controller
        .processes()
        .await
        .iter()
        .map(|p| (p.id.0, p.logical_clock))
        .collect();
    assert_eq!(clocks, vec![(1, 2), (2, 3)]);

    let timeline = controller.timeline().await;
    assert_eq!(timeline.points.len(), 3);
    assert_eq!(timeline.x_ticks, vec![1, 2, 3]);
    assert_eq!(timeline.y_ticks, vec![ProcessId(1), ProcessId(2)]);
    assert_eq!(timeline.x_axis_upper_bound, 4);
    assert_eq!(timeline.y_axis_upper_bound, 3);
    assert_eq!(
        timeline.describe(Coordinate::new(3, ProcessId(2))),
        "Receive from 1: ping"
    );

    let alert = controller.notifications().current().expect("alert");
    assert_eq!(alert.severity, Severity::Success);
    assert_eq!(alert.message, "Message sent: ping");
}

#[tokio::test]
async fn non_success_status_surfaces_as_danger() {
    let (base_url, _state) = spawn_clock_server().await.expect("spawn server");
    let controller = controller_for(&base_url);

    let err = controller
        .create_event(ProcessId(99))
        .await
        .expect_err("unknown process");

    match err {
        OperationError::Remote(ServiceError::Status { status, .. }) => {
            assert_eq!(status.as_u16(), 404);
        }
        other => panic!("unexpected error: {other}"),
    }
    let alert = controller.notifications().current().expect("alert");
    assert_eq!(alert.severity, Severity::Danger);
    assert_eq!(alert.message, "Failed to create event!");
}

#[tokio::test]
async fn unreachable_service_reports_fetch_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let service = HttpClockService::new(&format!("http://{addr}/api/v1")).expect("service");
    let direct = service.list_events().await.expect_err("connection refused");
    assert!(matches!(direct, ServiceError::Transport { .. }));

    let controller = InteractionController::new(
        Arc::new(service),
        NotificationCenter::new(Duration::from_secs(10)),
    );
    let err = controller.load().await.expect_err("must fail");
    assert!(matches!(
        err,
        OperationError::Fetch {
            target: RefreshTarget::Processes,
            ..
        }
    ));
    assert_eq!(
        controller.notifications().current().map(|a| a.severity),
        Some(Severity::Danger)
    );
}

#[test]
fn rejects_malformed_base_url() {
    let err = HttpClockService::new("not a url").err().expect("must fail");
    assert!(matches!(err, ServiceError::Url { .. }));

    let service = HttpClockService::new("http://localhost:5000/api/v1/").expect("service");
    assert_eq!(service.base_url(), "http://localhost:5000/api/v1");
}
