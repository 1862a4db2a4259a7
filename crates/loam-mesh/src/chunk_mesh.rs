use loam_geom::Aabb;
use loam_world::ChunkCoord;

use crate::mesh_build::MeshBuild;

/// Finished triangulated surface for one chunk, ready to hand to a
/// rendering collaborator.
#[derive(Clone, Debug)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    pub bbox: Aabb,
    pub build: MeshBuild,
}

impl ChunkMesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.build.vertex_count()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.build.quad_count()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.build.triangle_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.build.idx.is_empty()
    }
}
