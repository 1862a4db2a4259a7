//! CPU mesh extraction: per-face visibility culling over a chunk's voxels.
#![forbid(unsafe_code)]

mod build;
mod chunk_mesh;
mod face;
mod mesh_build;

pub use build::{VoxelSource, build_chunk_mesh};
pub use chunk_mesh::ChunkMesh;
pub use face::{FACES, Face};
pub use mesh_build::MeshBuild;
