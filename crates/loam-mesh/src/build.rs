use std::time::Instant;

use log::debug;

use loam_chunk::Chunk;
use loam_geom::{Aabb, Vec3};
use loam_voxel::VoxelType;
use loam_world::TerrainGenerator;

use crate::chunk_mesh::ChunkMesh;
use crate::face::FACES;
use crate::mesh_build::MeshBuild;

/// Neighbor sampling seam for cross-chunk face visibility.
///
/// `None` means "no chunk generated there"; the mesher treats that as air
/// and emits the face. The world layer re-dirties boundary chunks when a
/// missing neighbor later appears, so seams heal on the next update.
pub trait VoxelSource {
    fn voxel_at(&self, wx: i32, wy: i32, wz: i32) -> Option<VoxelType>;
}

/// The pure terrain oracle as a source: background generation meshes
/// against the terrain that will exist, with no world access at all.
impl VoxelSource for TerrainGenerator {
    #[inline]
    fn voxel_at(&self, wx: i32, wy: i32, wz: i32) -> Option<VoxelType> {
        Some(TerrainGenerator::voxel_at(self, wx, wy, wz))
    }
}

#[inline]
fn occludes(neighbor: Option<VoxelType>) -> bool {
    neighbor.is_some_and(|v| v.occludes())
}

/// Builds the visible surface of one chunk: every face of every non-air
/// voxel whose neighbor does not occlude it, as naive unit quads. In-chunk
/// neighbors are read locally; neighbors across the chunk boundary go
/// through `source`. O(size³) per call.
pub fn build_chunk_mesh(chunk: &Chunk, source: &dyn VoxelSource) -> ChunkMesh {
    let t0 = Instant::now();
    let size = chunk.size() as i32;
    let (bx, by, bz) = chunk.world_base();
    let mut build = MeshBuild::default();

    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                let v = chunk.get(x, y, z);
                if v.is_air() {
                    continue;
                }
                for face in FACES {
                    let (dx, dy, dz) = face.delta();
                    let (nx, ny, nz) = (x + dx, y + dy, z + dz);
                    let inside =
                        (0..size).contains(&nx) && (0..size).contains(&ny) && (0..size).contains(&nz);
                    let neighbor = if inside {
                        Some(chunk.get(nx, ny, nz))
                    } else {
                        source.voxel_at(bx + nx, by + ny, bz + nz)
                    };
                    if occludes(neighbor) {
                        continue;
                    }
                    build.push_face(face, bx + x, by + y, bz + z, v.color(face.role()));
                }
            }
        }
    }

    let mesh = ChunkMesh {
        coord: chunk.coord(),
        bbox: Aabb::new(
            Vec3::new(bx as f32, by as f32, bz as f32),
            Vec3::new(
                (bx + size) as f32,
                (by + size) as f32,
                (bz + size) as f32,
            ),
        ),
        build,
    };
    debug!(
        "meshed chunk {:?}: {} quads in {:?}",
        chunk.coord(),
        mesh.quad_count(),
        t0.elapsed()
    );
    mesh
}
