//! Room module providing multi-room support with an async actor model.
//!
//! ## Architecture
//!
//! Each room runs in a separate Tokio task with an mpsc message inbox and
//! owns its [`crate::game::Room`] exclusively. The [`RoomManager`] spawns
//! room actors, routes requests to them by room id, tracks which rooms each
//! connection sits in, and deletes a room as soon as its last player leaves.
//!
//! Connections subscribe to a room when they create or join it and receive
//! [`RoomEvent`]s on their own channel: the public `room_state` for
//! everyone and `your_hand` for the owning player only.
//!
//! ## Example
//!
//! ```ignore
//! use bluff::room::{RoomConfig, RoomManager};
//! use bluff::game::entities::ConnectionId;
//!
//! let manager = RoomManager::new(RoomConfig::default());
//! let (tx, mut rx) = tokio::sync::mpsc::channel(64);
//! let seat = manager
//!     .create_room(None, ConnectionId::new(), "alice".into(), tx)
//!     .await?;
//! while let Some(event) = rx.recv().await {
//!     println!("{}", serde_json::to_string(&event)?);
//! }
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod manager;
pub mod messages;

pub use actor::{RoomActor, RoomHandle};
pub use config::{DeckPreset, RoomConfig};
pub use errors::{RegistryError, RegistryResult};
pub use manager::{RoomManager, Seat};
pub use messages::{HandUpdate, LeaveResponse, RoomEvent, RoomMessage};
