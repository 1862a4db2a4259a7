use loam_mesh::ChunkMesh;
use loam_world::ChunkCoord;

/// The rendering collaborator's side of the mesh handoff. `upload` is
/// called whenever a chunk's mesh is (re)built, `remove` when a mesh is
/// replaced by nothing or its chunk is disposed.
pub trait MeshSink {
    fn upload(&mut self, coord: ChunkCoord, mesh: &ChunkMesh);
    fn remove(&mut self, coord: ChunkCoord);
}

/// Sink that drops everything; used headless and in tests.
pub struct NullSink;

impl MeshSink for NullSink {
    fn upload(&mut self, _coord: ChunkCoord, _mesh: &ChunkMesh) {}
    fn remove(&mut self, _coord: ChunkCoord) {}
}
