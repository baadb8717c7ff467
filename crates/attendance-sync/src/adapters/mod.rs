//! # Adapters
//!
//! In-memory implementations of the outbound ports, used by tests and by
//! embedders that wire the core before real backends are available.

pub mod memory_mirror;
pub mod memory_remote;
pub mod memory_role_cache;
pub mod recording_push;

pub use memory_mirror::InMemoryLocalMirror;
pub use memory_remote::InMemoryRemoteStore;
pub use memory_role_cache::InMemoryRoleCacheStore;
pub use recording_push::RecordingPushDispatch;
