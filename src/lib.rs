//! World orchestration: chunk ownership, scheduling, and mesh handoff.
#![forbid(unsafe_code)]

mod sink;
mod world_manager;

pub use sink::{MeshSink, NullSink};
pub use world_manager::{ChunkEntry, MeshTotals, WorldManager};
