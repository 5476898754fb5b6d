//! Actor system for queue snapshot refresh.
//!
//! This crate provides the Ractor-based watchers that keep each view's
//! queue snapshots up to date.
//!
//! # Architecture
//!
//! - `QueueWatcher` - Owns one view's snapshot cache and its refresh timer
//! - `SnapshotSource` - Where snapshots come from (the database in production)
//! - `WatcherRegistry` - Finds a view's watcher by name
//!
//! # Usage
//!
//! ```ignore
//! use actors::{DbSnapshotSource, WatcherArgs, client, global_watchers};
//!
//! let watcher = global_watchers()
//!     .get_or_start("user-42", || WatcherArgs::new("user-42", Arc::new(DbSnapshotSource)))
//!     .await?;
//! client::watch(&watcher, queue_ids)?;
//! let progress = client::project(&watcher, appointments).await?;
//! ```

pub mod client;
mod config;
mod messages;
pub mod registry;
mod source;
mod watcher;

pub use config::{DEFAULT_CHECK_INTERVAL, DEFAULT_IDLE_TIMEOUT, WatcherConfig};
pub use messages::{WatcherError, WatcherMessage};
pub use registry::{WatcherRegistry, global_watchers};
pub use source::{DbSnapshotSource, FnSource, SnapshotSource, SourceError, SourceFuture, SourceResult};
pub use watcher::{QueueWatcher, WatcherArgs, start_watcher};

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef, RpcReplyPort, concurrency};
