#![allow(clippy::disallowed_methods)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use actors::{
    FnSource, SnapshotSource, SourceError, SourceFuture, WatcherArgs, WatcherConfig, WatcherRegistry,
    client, start_watcher,
};
use portal_core::{Appointment, PortalEvent, QueueId, QueueState, QueueStatus, Ticket};
use tokio::sync::broadcast;

/// A source serving fixed snapshots, with a switch to make it fail.
struct FakeBackend {
    statuses: Vec<QueueStatus>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl FakeBackend {
    fn new(statuses: Vec<QueueStatus>) -> Arc<Self> {
        Arc::new(Self {
            statuses,
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn source(self: &Arc<Self>) -> Arc<dyn SnapshotSource> {
        let backend = self.clone();
        Arc::new(FnSource::new(move |ids: Vec<QueueId>| -> SourceFuture {
            backend.calls.fetch_add(1, Ordering::SeqCst);
            let failing = backend.failing.load(Ordering::SeqCst);
            let statuses: Vec<QueueStatus> = backend
                .statuses
                .iter()
                .filter(|s| ids.contains(&s.queue_id))
                .cloned()
                .collect();
            Box::pin(async move {
                if failing {
                    Err(SourceError::Unavailable("connection refused".into()))
                } else {
                    Ok(statuses)
                }
            })
        }))
    }
}

fn default_config() -> WatcherConfig {
    WatcherConfig::default()
}

/// Checks every 20 ms, stops after 100 ms without activity.
fn short_lease() -> WatcherConfig {
    WatcherConfig::default()
        .with_check_interval(Duration::from_millis(20))
        .with_idle_timeout(Duration::from_millis(100))
}

fn drain(rx: &mut broadcast::Receiver<PortalEvent>) -> Vec<PortalEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn refresh_projects_live_progress() -> Result<(), Box<dyn std::error::Error>> {
    let queue = QueueId::new();
    let backend = FakeBackend::new(vec![
        QueueStatus::new(queue).with_counters(1, 6),
    ]);
    let appointment = Appointment::new("citizen-a", "Vaccination", Ticket::new(queue, 3, 3));

    let args = WatcherArgs::new("live-progress", backend.source())
        .with_queues(vec![queue])
        .with_config(default_config());
    let (watcher, _handle) = start_watcher(args).await?;

    client::refresh(&watcher).await?;
    let projected = client::project(&watcher, vec![appointment.clone()]).await?;
    assert_eq!(projected.len(), 1);
    let progress = projected[0].progress;
    assert_eq!(progress.current_serving, 1);
    assert_eq!(progress.patients_ahead, 2);
    assert_eq!(progress.estimated_wait_minutes, 30);
    assert!(progress.is_active);
    assert_eq!(projected[0].appointment, appointment);

    let cached = client::cached_status(&watcher, queue).await?;
    assert_eq!(cached.map(|s| s.next_number), Some(6));

    watcher
        .stop_and_wait(None, None)
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

#[tokio::test]
async fn custom_policy_is_applied() -> Result<(), Box<dyn std::error::Error>> {
    let queue = QueueId::new();
    let backend = FakeBackend::new(vec![QueueStatus::new(queue).with_counters(2, 9)]);

    let args = WatcherArgs::new("custom-policy", backend.source())
        .with_queues(vec![queue])
        .with_config(default_config().with_minutes_per_patient(5));
    let (watcher, _handle) = start_watcher(args).await?;

    client::refresh(&watcher).await?;
    let projected = client::project(
        &watcher,
        vec![Appointment::new("citizen-b", "Lab", Ticket::new(queue, 6, 4))],
    )
    .await?;
    assert_eq!(projected[0].progress.estimated_wait_minutes, 20);

    watcher
        .stop_and_wait(None, None)
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

#[tokio::test]
async fn failed_refresh_falls_back_and_notifies() -> Result<(), Box<dyn std::error::Error>> {
    let queue = QueueId::new();
    let backend = FakeBackend::new(vec![QueueStatus::new(queue).with_counters(4, 10)]);
    let appointment = Appointment::new("citizen-c", "Dermatology", Ticket::new(queue, 7, 5));
    let (tx, mut rx) = broadcast::channel(64);

    let args = WatcherArgs::new("fallback", backend.source())
        .with_queues(vec![queue])
        .with_config(default_config())
        .with_event_tx(tx);
    let (watcher, _handle) = start_watcher(args).await?;

    let refreshed = client::refresh(&watcher).await?;
    assert!(matches!(refreshed, Some(PortalEvent::SnapshotRefreshed { .. })));
    let live = client::project(&watcher, vec![appointment.clone()]).await?;
    assert_eq!(live[0].progress.patients_ahead, 3);
    assert!(
        drain(&mut rx)
            .iter()
            .any(|e| matches!(e, PortalEvent::SnapshotRefreshed { queues, .. } if queues == &vec![queue]))
    );

    backend.failing.store(true, Ordering::SeqCst);
    let failed = client::refresh(&watcher).await?;
    assert!(matches!(failed, Some(PortalEvent::RefreshFailed { .. })));

    let fallback = client::project(&watcher, vec![appointment]).await?;
    assert_eq!(fallback[0].progress.patients_ahead, 4);
    assert_eq!(fallback[0].progress.current_serving, 0);
    assert!(!fallback[0].progress.is_active);
    assert!(client::cached_status(&watcher, queue).await?.is_none());

    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(
        e,
        PortalEvent::RefreshFailed { watcher, error, .. }
            if watcher == "fallback" && error.contains("connection refused")
    )));

    watcher
        .stop_and_wait(None, None)
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

#[tokio::test]
async fn unknown_queue_projects_booking_position() -> Result<(), Box<dyn std::error::Error>> {
    let known = QueueId::new();
    let unknown = QueueId::new();
    let backend = FakeBackend::new(vec![
        QueueStatus::new(known)
            .with_counters(3, 4)
            .with_state(QueueState::Paused),
    ]);

    let args = WatcherArgs::new("unknown-queue", backend.source())
        .with_queues(vec![known, unknown])
        .with_config(default_config());
    let (watcher, _handle) = start_watcher(args).await?;
    client::refresh(&watcher).await?;

    let projected = client::project(
        &watcher,
        vec![
            Appointment::new("citizen-d", "Paused desk", Ticket::new(known, 5, 2)),
            Appointment::new("citizen-d", "Unlisted desk", Ticket::new(unknown, 5, 2)),
        ],
    )
    .await?;

    assert_eq!(projected[0].progress.current_serving, 3);
    assert_eq!(projected[0].progress.progress_fraction, 0.0);
    assert!(!projected[0].progress.is_active);
    assert_eq!(projected[1].progress.current_serving, 0);
    assert_eq!(projected[1].progress.patients_ahead, 1);

    watcher
        .stop_and_wait(None, None)
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

#[tokio::test]
async fn watch_switches_visible_queues() -> Result<(), Box<dyn std::error::Error>> {
    let first = QueueId::new();
    let second = QueueId::new();
    let backend = FakeBackend::new(vec![
        QueueStatus::new(first).with_counters(1, 2),
        QueueStatus::new(second).with_counters(8, 12),
    ]);

    let args = WatcherArgs::new("switch", backend.source())
        .with_queues(vec![first])
        .with_config(default_config());
    let (watcher, _handle) = start_watcher(args).await?;
    client::refresh(&watcher).await?;
    assert!(client::cached_status(&watcher, second).await?.is_none());

    client::watch(&watcher, vec![second])?;
    client::refresh(&watcher).await?;

    let cached = client::cached_statuses(&watcher).await?;
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].queue_id, second);

    watcher
        .stop_and_wait(None, None)
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

#[tokio::test]
async fn watcher_only_fetches_when_asked() -> Result<(), Box<dyn std::error::Error>> {
    let queue = QueueId::new();
    let backend = FakeBackend::new(vec![QueueStatus::new(queue)]);

    let args = WatcherArgs::new("on-demand", backend.source())
        .with_queues(vec![queue])
        .with_config(short_lease());
    let (watcher, _handle) = start_watcher(args).await?;

    // Idle checks run, but never fetch
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(backend.calls(), 0);

    client::refresh(&watcher).await?;
    client::refresh(&watcher).await?;
    assert_eq!(backend.calls(), 2);

    watcher
        .stop_and_wait(None, None)
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

#[tokio::test]
async fn stopped_watcher_rejects_requests() -> Result<(), Box<dyn std::error::Error>> {
    let queue = QueueId::new();
    let backend = FakeBackend::new(vec![QueueStatus::new(queue)]);
    let (tx, mut rx) = broadcast::channel(64);

    let args = WatcherArgs::new("teardown", backend.source())
        .with_queues(vec![queue])
        .with_config(default_config())
        .with_event_tx(tx);
    let (watcher, _handle) = start_watcher(args).await?;
    client::refresh(&watcher).await?;

    watcher
        .stop_and_wait(None, None)
        .await
        .map_err(|e| e.to_string())?;
    let after_stop = backend.calls();

    assert!(client::refresh(&watcher).await.is_err());
    assert!(client::project(&watcher, Vec::new()).await.is_err());
    assert_eq!(backend.calls(), after_stop);
    assert!(
        drain(&mut rx)
            .iter()
            .any(|e| matches!(e, PortalEvent::WatcherStopped { watcher, .. } if watcher == "teardown"))
    );
    Ok(())
}

#[tokio::test]
async fn unreleased_watchers_stop_when_idle() -> Result<(), Box<dyn std::error::Error>> {
    let queue = QueueId::new();
    let backend = FakeBackend::new(vec![QueueStatus::new(queue).with_counters(2, 5)]);
    let registry = WatcherRegistry::new();

    for i in 0..20 {
        let name = format!("abandoned-{}", i);
        let watcher = registry
            .get_or_start(&name, || {
                WatcherArgs::new("ignored", backend.source())
                    .with_queues(vec![queue])
                    .with_config(short_lease().with_idle_timeout(Duration::from_millis(250)))
            })
            .await?;
        client::refresh(&watcher).await?;
    }
    assert_eq!(registry.list().len(), 20);
    assert_eq!(backend.calls(), 20);

    // Nobody refreshes or projects any more
    tokio::time::sleep(Duration::from_millis(700)).await;

    assert!(registry.list().is_empty());
    assert!(registry.get("abandoned-0").is_none());
    assert_eq!(backend.calls(), 20);
    Ok(())
}

#[tokio::test]
async fn active_watcher_outlives_idle_timeout() -> Result<(), Box<dyn std::error::Error>> {
    let queue = QueueId::new();
    let backend = FakeBackend::new(vec![QueueStatus::new(queue).with_counters(1, 3)]);
    let appointment = Appointment::new("citizen-e", "Passport", Ticket::new(queue, 2, 2));

    let args = WatcherArgs::new("busy-view", backend.source())
        .with_queues(vec![queue])
        .with_config(short_lease());
    let (watcher, _handle) = start_watcher(args).await?;

    // Refresh well inside the idle timeout for longer than the timeout
    for _ in 0..10 {
        client::refresh(&watcher).await?;
        tokio::time::sleep(Duration::from_millis(30)).await;
    }

    let projected = client::project(&watcher, vec![appointment]).await?;
    assert_eq!(projected[0].progress.patients_ahead, 1);

    watcher
        .stop_and_wait(None, None)
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

#[tokio::test]
async fn registry_reuses_and_stops_watchers() -> Result<(), Box<dyn std::error::Error>> {
    let backend = FakeBackend::new(Vec::new());
    let registry = WatcherRegistry::new();

    let make_args = || WatcherArgs::new("ignored", backend.source()).with_config(default_config());
    let first = registry.get_or_start("registry-user", make_args).await?;
    let again = registry.get_or_start("registry-user", make_args).await?;
    assert_eq!(first.get_id(), again.get_id());
    assert_eq!(registry.list(), vec!["registry-user".to_string()]);

    registry.stop("registry-user").await?;
    assert!(registry.get("registry-user").is_none());
    assert!(registry.list().is_empty());
    assert!(registry.stop("registry-user").await.is_err());

    // a fresh view gets a fresh watcher
    let restarted = registry.get_or_start("registry-user", make_args).await?;
    assert_ne!(restarted.get_id(), first.get_id());

    registry.stop_all().await;
    assert!(registry.list().is_empty());
    Ok(())
}

#[tokio::test]
async fn registry_skips_views_with_nothing_to_watch() -> Result<(), Box<dyn std::error::Error>> {
    let queue = QueueId::new();
    let backend = FakeBackend::new(vec![QueueStatus::new(queue).with_counters(1, 4)]);
    let registry = WatcherRegistry::new();
    let make_args = || WatcherArgs::new("ignored", backend.source()).with_config(default_config());

    assert!(registry.watch("no-bookings", Vec::new(), make_args).await?.is_none());
    assert!(registry.list().is_empty());

    let watcher = registry
        .watch("no-bookings", vec![queue], make_args)
        .await?
        .ok_or("watcher should start once there is a queue")?;
    client::refresh(&watcher).await?;
    assert_eq!(client::cached_statuses(&watcher).await?.len(), 1);

    // Last booking cancelled: the watcher goes away
    assert!(registry.watch("no-bookings", Vec::new(), make_args).await?.is_none());
    assert!(registry.get("no-bookings").is_none());
    assert_eq!(backend.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn registry_publishes_watcher_events() -> Result<(), Box<dyn std::error::Error>> {
    let queue = QueueId::new();
    let backend = FakeBackend::new(vec![QueueStatus::new(queue).with_counters(3, 8)]);
    let registry = WatcherRegistry::new();
    let mut rx = registry.subscribe();

    let watcher = registry
        .watch("subscribed-view", vec![queue], || {
            WatcherArgs::new("ignored", backend.source()).with_config(default_config())
        })
        .await?
        .ok_or("watcher should start")?;
    client::refresh(&watcher).await?;
    registry.stop("subscribed-view").await?;

    let events = drain(&mut rx);
    assert!(matches!(
        events.first(),
        Some(PortalEvent::SnapshotRefreshed { watcher, .. }) if watcher == "subscribed-view"
    ));
    assert!(matches!(
        events.last(),
        Some(PortalEvent::WatcherStopped { watcher, .. }) if watcher == "subscribed-view"
    ));
    Ok(())
}
