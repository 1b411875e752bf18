// Favorability scores: storage, bounds and tiering

pub mod config;
pub mod error;
pub mod host;
pub mod storage;
pub mod tier;

pub use config::{FavorConfig, StorageConfig};
pub use error::{FavorError, FavorResult};
pub use host::{InstructionPayload, MessageEvent, ProviderRequest, Role, SimpleEvent};
pub use storage::{Adjustment, FavorStore, JsonFileStore};
pub use tier::{directive, format_fraction, Tier};
