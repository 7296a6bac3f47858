//! Scheduler scenarios against a local fake controller

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakeController, Received, Reply, closed_port, control_config, line};
use drift_config::{ControlConfig, HookingMethod};
use drift_control::{HttpChannel, OfflineLatch, Scheduler, SessionId};
use drift_model::Planar;
use drift_session::{LogSink, PlaybackSettings, PlaybackState, SessionStatus};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

fn settings() -> PlaybackSettings {
    PlaybackSettings::default()
        .with_projector(Arc::new(Planar))
        .with_ticks(Duration::from_millis(20), Duration::from_millis(10))
        .with_salt(0.0)
}

struct Running {
    state: Arc<PlaybackState>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Running {
    async fn shutdown(self) -> Arc<PlaybackState> {
        self.cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .expect("scheduler did not shut down")
            .unwrap();
        self.state
    }
}

fn spawn_scheduler(config: &ControlConfig, method: HookingMethod) -> Running {
    let channel = Arc::new(HttpChannel::new(config, SessionId::new()).unwrap());
    let state = Arc::new(PlaybackState::new());
    let scheduler = Scheduler::new(channel, settings(), Arc::clone(&state), Arc::new(LogSink))
        .with_method(method)
        .with_reconnect_interval(config.reconnect_interval);

    let cancel = CancellationToken::new();
    let task = tokio::spawn(scheduler.run(cancel.clone()));
    Running {
        state,
        cancel,
        task,
    }
}

async fn serve() -> (Arc<FakeController>, ControlConfig) {
    let fake = FakeController::new();
    let addr = fake.spawn().await;
    (fake, control_config(addr))
}

// =============================================================================
// Playback
// =============================================================================

#[tokio::test]
async fn test_unit_line_reports_running_progress_stopped() {
    let (fake, config) = serve().await;
    fake.push(Reply::Start(line(1.0)));

    let running = spawn_scheduler(&config, HookingMethod::Direct);
    fake.wait_for("stopped report", |f| f.stopped_count() == 1)
        .await;
    running.shutdown().await;

    let received = fake.received();
    let Some(Received::Running(info)) = received.first() else {
        panic!("first report is not running: {received:?}");
    };
    assert!((info.duration - 1.0).abs() < 1e-9);
    assert!((info.length - 1.0).abs() < 1e-9);
    assert_eq!(info.package, "drift");

    assert_eq!(received.last(), Some(&Received::Stopped));
    assert_eq!(fake.running_count(), 1);

    let progress: Vec<f64> = received
        .iter()
        .filter_map(|r| match r {
            Received::Intermediate(i) => Some(i.progress),
            _ => None,
        })
        .collect();
    assert!(progress.len() >= 2, "too few intermediates: {progress:?}");
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert!(progress.first() < progress.last());
    assert!(progress.iter().all(|p| (0.0..=1.0).contains(p)));
}

#[tokio::test]
async fn test_resumes_active_emulation_on_connect() {
    let (fake, config) = serve().await;
    fake.set_current(Some(line(100.0)));

    let running = spawn_scheduler(&config, HookingMethod::Direct);
    fake.wait_for("running report", |f| f.running_count() == 1)
        .await;
    assert!(running.state.is_hooking());

    // The resumed session is owned by the scheduler: Stop cancels it
    fake.push(Reply::Stop);
    fake.wait_for("stopped report", |f| f.stopped_count() == 1)
        .await;
    assert!(!running.state.is_hooking());
    running.shutdown().await;
}

#[tokio::test]
async fn test_stop_cancels_running_session() {
    let (fake, config) = serve().await;
    fake.push(Reply::Start(line(100.0)));

    let running = spawn_scheduler(&config, HookingMethod::Hybrid);
    fake.wait_for("running report", |f| f.running_count() == 1)
        .await;

    fake.push(Reply::Stop);
    fake.wait_for("stopped report", |f| f.stopped_count() == 1)
        .await;

    let state = running.shutdown().await;
    assert!(!state.is_hooking());
    assert_eq!(state.status(), SessionStatus::Stopped);
}

#[tokio::test]
async fn test_start_while_running_is_rejected() {
    let (fake, config) = serve().await;
    fake.push(Reply::Start(line(100.0)));

    let running = spawn_scheduler(&config, HookingMethod::Direct);
    fake.wait_for("running report", |f| f.running_count() == 1)
        .await;

    fake.push(Reply::Start(line(5.0)));
    fake.push(Reply::Stop);
    fake.wait_for("stopped report", |f| f.stopped_count() == 1)
        .await;
    running.shutdown().await;

    assert_eq!(fake.running_count(), 1);
}

#[tokio::test]
async fn test_malformed_command_is_dropped() {
    let (fake, config) = serve().await;
    fake.push(Reply::Raw("not an emulation"));
    fake.push(Reply::Start(line(100.0)));

    let running = spawn_scheduler(&config, HookingMethod::Direct);
    fake.wait_for("running report", |f| f.running_count() == 1)
        .await;
    running.shutdown().await;
}

#[tokio::test]
async fn test_invalid_emulation_is_dropped() {
    let (fake, config) = serve().await;
    let mut invalid = line(1.0);
    invalid.repeat = 0;
    fake.push(Reply::Start(invalid));
    fake.push(Reply::Start(line(100.0)));

    let running = spawn_scheduler(&config, HookingMethod::Direct);
    fake.wait_for("running report", |f| f.running_count() == 1)
        .await;
    running.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_cancels_active_session() {
    let (fake, config) = serve().await;
    fake.push(Reply::Start(line(100.0)));

    let running = spawn_scheduler(&config, HookingMethod::Direct);
    fake.wait_for("running report", |f| f.running_count() == 1)
        .await;

    let state = running.shutdown().await;
    assert!(!state.is_hooking());
    assert_eq!(state.status(), SessionStatus::Stopped);
    assert_eq!(fake.stopped_count(), 1);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_offline_controller_logged_once() {
    let config = ControlConfig {
        host: "127.0.0.1".to_string(),
        port: closed_port().await,
        reconnect_interval: Duration::from_millis(20),
        request_timeout: Duration::from_secs(1),
        ..ControlConfig::default()
    };
    let channel = Arc::new(HttpChannel::new(&config, SessionId::new()).unwrap());
    let latch = Arc::new(OfflineLatch::new());
    let scheduler = Scheduler::new(
        channel,
        settings(),
        Arc::new(PlaybackState::new()),
        Arc::new(LogSink),
    )
    .with_reconnect_interval(config.reconnect_interval)
    .with_offline_latch(Arc::clone(&latch));

    let cancel = CancellationToken::new();
    let task = tokio::spawn(scheduler.run(cancel.clone()));

    tokio::time::sleep(Duration::from_millis(300)).await;
    cancel.cancel();
    task.await.unwrap();

    assert!(latch.is_offline());
    assert_eq!(latch.notices(), 1);
    assert!(latch.total_failures() >= 3, "{}", latch.total_failures());
}

fn spawn_with_latch(config: &ControlConfig, latch: &Arc<OfflineLatch>) -> Running {
    let channel = Arc::new(HttpChannel::new(config, SessionId::new()).unwrap());
    let state = Arc::new(PlaybackState::new());
    let scheduler = Scheduler::new(channel, settings(), Arc::clone(&state), Arc::new(LogSink))
        .with_reconnect_interval(config.reconnect_interval)
        .with_offline_latch(Arc::clone(latch));

    let cancel = CancellationToken::new();
    let task = tokio::spawn(scheduler.run(cancel.clone()));
    Running {
        state,
        cancel,
        task,
    }
}

#[tokio::test]
async fn test_failing_next_logged_once() {
    // `current` answers, every `next` fails
    let (fake, config) = serve().await;
    for _ in 0..1000 {
        fake.push(Reply::Status(500));
    }
    let latch = Arc::new(OfflineLatch::new());

    let running = spawn_with_latch(&config, &latch);
    tokio::time::sleep(Duration::from_millis(300)).await;
    running.shutdown().await;

    assert!(latch.is_offline());
    assert_eq!(latch.notices(), 1);
    assert!(latch.total_failures() >= 3, "{}", latch.total_failures());
}

#[tokio::test]
async fn test_command_closes_offline_streak() {
    let (fake, config) = serve().await;
    for _ in 0..3 {
        fake.push(Reply::Status(500));
    }
    fake.push(Reply::Start(line(100.0)));
    let latch = Arc::new(OfflineLatch::new());

    let running = spawn_with_latch(&config, &latch);
    fake.wait_for("running report", |f| f.running_count() == 1)
        .await;
    assert!(!latch.is_offline());
    assert_eq!(latch.notices(), 1);
    assert_eq!(latch.total_failures(), 3);
    running.shutdown().await;
}

#[tokio::test]
async fn test_test_provider_only_exits_immediately() {
    let (fake, config) = serve().await;
    let channel = Arc::new(HttpChannel::new(&config, SessionId::new()).unwrap());
    let scheduler = Scheduler::new(
        channel,
        settings(),
        Arc::new(PlaybackState::new()),
        Arc::new(LogSink),
    )
    .with_method(HookingMethod::TestProviderOnly);

    tokio::time::timeout(
        Duration::from_millis(500),
        scheduler.run(CancellationToken::new()),
    )
    .await
    .expect("scheduler kept running");
    assert!(fake.ids().is_empty());
}
