//! Queue watcher actor: one per hosting view.
//!
//! Owns the view's [`SnapshotCache`]. The view drives every fetch through
//! `Refresh`, both on its 30 second tick and on manual refresh. The watcher's
//! own timer only checks for activity: once no refresh or projection has
//! arrived for `idle_timeout` the watcher stops itself. `post_stop` aborts the
//! timer and closes the cache so fetches still in flight are dropped when they
//! land.

use std::sync::Arc;

use chrono::Utc;
use portal_core::{PortalEvent, QueueId, SnapshotCache};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::WatcherConfig;
use crate::messages::WatcherMessage;
use crate::source::{SnapshotSource, SourceResult};

/// Watcher actor arguments.
pub struct WatcherArgs {
    /// Name of the owning view, e.g. the signed-in user's ID.
    pub name: String,
    /// Queues visible in the view.
    pub queue_ids: Vec<QueueId>,
    pub source: Arc<dyn SnapshotSource>,
    pub config: WatcherConfig,
    pub event_tx: Option<broadcast::Sender<PortalEvent>>,
}

impl WatcherArgs {
    pub fn new(name: impl Into<String>, source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            name: name.into(),
            queue_ids: Vec::new(),
            source,
            config: WatcherConfig::default(),
            event_tx: None,
        }
    }

    pub fn with_queues(mut self, queue_ids: Vec<QueueId>) -> Self {
        self.queue_ids = queue_ids;
        self
    }

    pub fn with_config(mut self, config: WatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_event_tx(mut self, tx: broadcast::Sender<PortalEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }
}

/// State for the watcher actor.
pub struct WatcherState {
    pub name: String,
    queue_ids: Vec<QueueId>,
    source: Arc<dyn SnapshotSource>,
    config: WatcherConfig,
    event_tx: Option<broadcast::Sender<PortalEvent>>,
    cache: SnapshotCache,
    timer: Option<JoinHandle<()>>,
    last_active: Instant,
}

impl WatcherState {
    fn new(args: WatcherArgs) -> Self {
        Self {
            name: args.name,
            queue_ids: args.queue_ids,
            source: args.source,
            config: args.config,
            event_tx: args.event_tx,
            cache: SnapshotCache::new(),
            timer: None,
            last_active: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    fn is_idle(&self) -> bool {
        self.last_active.elapsed() >= self.config.idle_timeout
    }

    fn broadcast(&self, event: &PortalEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event.clone());
        }
    }

    /// Kick off a fetch for the visible queues. Runs outside the mailbox so
    /// overlapping refreshes are not serialized.
    fn start_fetch(
        &self,
        myself: &ActorRef<WatcherMessage>,
        reply: Option<RpcReplyPort<Option<PortalEvent>>>,
    ) {
        let generation = self.cache.begin();
        let fetch = self.source.fetch(self.queue_ids.clone());
        let myself = myself.clone();

        tracing::debug!(
            "Watcher {} fetching {} queue(s), generation {}",
            self.name,
            self.queue_ids.len(),
            generation
        );

        tokio::spawn(async move {
            let result = fetch.await;
            // A stopped watcher has nobody left to tell.
            let _ = myself.send_message(WatcherMessage::SnapshotLoaded {
                generation,
                result,
                reply,
            });
        });
    }

    /// Apply a finished fetch. Returns the event it produced, if it was current.
    fn apply(&mut self, generation: u64, result: SourceResult) -> Option<PortalEvent> {
        let event = match result {
            Ok(statuses) => {
                let queues = statuses.iter().map(|s| s.queue_id).collect();
                if !self.cache.apply(generation, statuses) {
                    tracing::debug!("Watcher {} dropped stale snapshot", self.name);
                    return None;
                }
                PortalEvent::SnapshotRefreshed {
                    watcher: self.name.clone(),
                    queues,
                    timestamp: Utc::now(),
                }
            }
            Err(e) => {
                if !self.cache.apply_failure(generation) {
                    tracing::debug!("Watcher {} dropped stale failure: {}", self.name, e);
                    return None;
                }
                tracing::warn!("Watcher {} refresh failed: {}", self.name, e);
                PortalEvent::RefreshFailed {
                    watcher: self.name.clone(),
                    error: e.to_string(),
                    timestamp: Utc::now(),
                }
            }
        };

        self.broadcast(&event);
        Some(event)
    }
}

/// Watcher actor that keeps one view's snapshots fresh.
pub struct QueueWatcher;

impl Actor for QueueWatcher {
    type Msg = WatcherMessage;
    type State = WatcherState;
    type Arguments = WatcherArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!(
            "Starting queue watcher {} (idle after {:?})",
            args.name,
            args.config.idle_timeout
        );

        let mut state = WatcherState::new(args);

        let period = state.config.check_interval;
        let myself_clone = myself.clone();
        state.timer = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Skip the immediate first tick
            interval.tick().await;
            loop {
                interval.tick().await;
                if myself_clone.send_message(WatcherMessage::Tick).is_err() {
                    break;
                }
            }
        }));

        Ok(state)
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            WatcherMessage::Tick => {
                if state.is_idle() {
                    tracing::info!("Queue watcher {} idle, stopping", state.name);
                    myself.stop(Some("idle".to_string()));
                }
            }

            WatcherMessage::Refresh { reply } => {
                tracing::debug!("Refresh for watcher {}", state.name);
                state.touch();
                state.start_fetch(&myself, reply);
            }

            WatcherMessage::SnapshotLoaded {
                generation,
                result,
                reply,
            } => {
                let event = state.apply(generation, result);
                if let Some(reply) = reply {
                    let _ = reply.send(event);
                }
            }

            WatcherMessage::Watch { queue_ids } => {
                state.touch();
                if queue_ids != state.queue_ids {
                    state.queue_ids = queue_ids;
                    state.cache.invalidate();
                }
            }

            WatcherMessage::Project {
                appointments,
                reply,
            } => {
                state.touch();
                let projected = state.cache.project(&appointments, &state.config.policy);
                let _ = reply.send(projected);
            }

            WatcherMessage::GetStatus { queue_id, reply } => {
                let _ = reply.send(state.cache.status(&queue_id).cloned());
            }

            WatcherMessage::ListStatuses { reply } => {
                let _ = reply.send(state.cache.statuses());
            }
        }

        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.cache.close();

        state.broadcast(&PortalEvent::WatcherStopped {
            watcher: state.name.clone(),
            timestamp: Utc::now(),
        });
        tracing::info!("Queue watcher {} stopped", state.name);
        Ok(())
    }
}

/// Start a watcher with the given arguments.
pub async fn start_watcher(
    args: WatcherArgs,
) -> Result<(ActorRef<WatcherMessage>, tokio::task::JoinHandle<()>), ractor::SpawnErr> {
    let name = format!("watcher-{}", args.name);
    let (actor, handle) = Actor::spawn(Some(name), QueueWatcher, args).await?;

    Ok((actor, handle))
}
