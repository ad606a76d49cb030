//! Turn-based naval combat engine: boards, random fleet placement, a
//! three-tier computer opponent, and snapshots for save/resume and replay.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod ai;
mod board;
mod clock;
mod common;
mod config;
#[cfg(feature = "std")]
mod logging;
mod placement;
mod position;
pub mod replay;
mod session;
mod snapshot;
#[cfg(feature = "std")]
pub mod store;
pub mod view;

pub use ai::*;
pub use board::*;
pub use clock::*;
pub use common::*;
pub use config::*;
#[cfg(feature = "std")]
pub use logging::init_logging;
pub use placement::*;
pub use position::Position;
pub use replay::{Replay, Side};
pub use session::*;
pub use snapshot::*;
#[cfg(feature = "std")]
pub use store::{DirStore, MemoryStore, SnapshotStore};
