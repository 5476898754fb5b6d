//! Registry of running watchers, keyed by view name.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use ractor::{ActorRef, ActorStatus};
use tokio::sync::broadcast;

use portal_core::{PortalEvent, QueueId};

use crate::client;
use crate::messages::{WatcherError, WatcherMessage};
use crate::watcher::{WatcherArgs, start_watcher};

/// Global registry for discovering watchers.
///
/// This provides a way to look up a view's watcher by name without passing
/// references through the entire call stack. Watchers started here publish
/// their [`PortalEvent`]s on the registry's channel.
pub struct WatcherRegistry {
    watchers: RwLock<HashMap<String, ActorRef<WatcherMessage>>>,
    events: broadcast::Sender<PortalEvent>,
}

/// Events buffered per subscriber before it starts lagging.
const EVENT_CAPACITY: usize = 64;

fn is_live(watcher: &ActorRef<WatcherMessage>) -> bool {
    !matches!(
        watcher.get_status(),
        ActorStatus::Stopping | ActorStatus::Stopped
    )
}

impl WatcherRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            watchers: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Receive events from every watcher this registry starts.
    pub fn subscribe(&self) -> broadcast::Receiver<PortalEvent> {
        self.events.subscribe()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ActorRef<WatcherMessage>>> {
        self.watchers.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ActorRef<WatcherMessage>>> {
        self.watchers.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Drop watchers that have stopped, e.g. after going idle.
    fn prune(&self) -> Vec<(String, ActorRef<WatcherMessage>)> {
        let mut watchers = self.write();
        let dead: Vec<String> = watchers
            .iter()
            .filter(|(_, w)| !is_live(w))
            .map(|(name, _)| name.clone())
            .collect();
        dead.into_iter()
            .filter_map(|name| watchers.remove(&name).map(|w| (name, w)))
            .collect()
    }

    /// Get a live watcher by name.
    pub fn get(&self, name: &str) -> Option<ActorRef<WatcherMessage>> {
        self.read().get(name).filter(|w| is_live(w)).cloned()
    }

    /// Return the named watcher, starting one from `args` if none is running.
    pub async fn get_or_start(
        &self,
        name: &str,
        args: impl FnOnce() -> WatcherArgs,
    ) -> Result<ActorRef<WatcherMessage>, WatcherError> {
        if let Some(watcher) = self.get(name) {
            return Ok(watcher);
        }

        let mut args = args();
        args.name = name.to_string();
        if args.event_tx.is_none() {
            args.event_tx = Some(self.events.clone());
        }

        // A dead watcher may still hold the actor name until it finishes stopping.
        for (stale_name, stale) in self.prune() {
            if stale_name == name {
                let _ = stale.stop_and_wait(None, None).await;
            }
        }

        let watcher = match start_watcher(args).await {
            Ok((watcher, _handle)) => watcher,
            Err(e) => {
                // Another caller may have started it under the same actor name.
                return self
                    .get(name)
                    .ok_or_else(|| WatcherError::Spawn(e.to_string()));
            }
        };

        let mut watchers = self.write();
        match watchers.entry(name.to_string()) {
            Entry::Occupied(existing) if is_live(existing.get()) => {
                // Lost a race with another caller; keep theirs.
                watcher.stop(None);
                Ok(existing.get().clone())
            }
            Entry::Occupied(mut existing) => {
                existing.insert(watcher.clone());
                Ok(watcher)
            }
            Entry::Vacant(slot) => {
                slot.insert(watcher.clone());
                Ok(watcher)
            }
        }
    }

    /// Point the named watcher at `queue_ids`, starting it if needed.
    ///
    /// A view with nothing to watch gets no watcher: an empty set stops any
    /// existing one and returns `None`.
    pub async fn watch(
        &self,
        name: &str,
        queue_ids: Vec<QueueId>,
        args: impl FnOnce() -> WatcherArgs,
    ) -> Result<Option<ActorRef<WatcherMessage>>, WatcherError> {
        if queue_ids.is_empty() {
            match self.stop(name).await {
                Ok(()) | Err(WatcherError::NotFound(_)) => return Ok(None),
                Err(e) => return Err(e),
            }
        }

        let watcher = self.get_or_start(name, args).await?;
        client::watch(&watcher, queue_ids)?;
        Ok(Some(watcher))
    }

    /// Stop and forget the named watcher.
    pub async fn stop(&self, name: &str) -> Result<(), WatcherError> {
        let watcher = self
            .write()
            .remove(name)
            .ok_or_else(|| WatcherError::NotFound(name.to_string()))?;

        watcher
            .stop_and_wait(None, None)
            .await
            .map_err(|e| WatcherError::Actor(e.to_string()))
    }

    /// Stop every registered watcher.
    pub async fn stop_all(&self) {
        let watchers: Vec<_> = self.write().drain().collect();
        for (name, watcher) in watchers {
            if let Err(e) = watcher.stop_and_wait(None, None).await {
                tracing::warn!("Failed to stop watcher {}: {}", name, e);
            }
        }
    }

    /// List the names of all live watchers.
    pub fn list(&self) -> Vec<String> {
        self.prune();
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for WatcherRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global registry instance.
static REGISTRY: std::sync::LazyLock<WatcherRegistry> =
    std::sync::LazyLock::new(WatcherRegistry::new);

/// Get the global watcher registry.
pub fn global_watchers() -> &'static WatcherRegistry {
    &REGISTRY
}
