//! Deterministic seed-driven terrain and world coordinate math.
#![forbid(unsafe_code)]

/// Default chunk edge length in voxels. The chunk and world layers accept
/// other sizes at construction time; this is the conventional one.
pub const CHUNK_SIZE: usize = 16;

mod chunk_coord;
mod generator;
mod params;

pub use chunk_coord::ChunkCoord;
pub use generator::TerrainGenerator;
pub use params::GenParams;
