use loam::{MeshSink, NullSink, WorldManager};
use loam_mesh::ChunkMesh;
use loam_voxel::VoxelType;
use loam_world::{CHUNK_SIZE, ChunkCoord, GenParams};

/// Sink that records every handoff so tests can assert on upload order
/// and removal.
#[derive(Default)]
struct RecordingSink {
    uploads: Vec<(ChunkCoord, usize)>,
    removes: Vec<ChunkCoord>,
}

impl MeshSink for RecordingSink {
    fn upload(&mut self, coord: ChunkCoord, mesh: &ChunkMesh) {
        self.uploads.push((coord, mesh.quad_count()));
    }
    fn remove(&mut self, coord: ChunkCoord) {
        self.removes.push(coord);
    }
}

/// Flat terrain at y = 2 with crystals disabled, so tests know exactly
/// where air starts.
fn flat_params() -> GenParams {
    let mut p = GenParams::default();
    p.height.base = 2;
    p.height.amplitude = 0.0;
    p.crystal.threshold = 2.0;
    p
}

/// Quads of `mesh` lying on the plane `x == plane` inside the unit cell
/// spanning `[y0, y0+1] x [z0, z0+1]`.
fn quads_on_x_plane(mesh: &ChunkMesh, plane: f32, y0: f32, z0: f32) -> usize {
    let pos = &mesh.build.pos;
    let mut n = 0;
    for q in 0..mesh.quad_count() {
        let verts: Vec<[f32; 3]> = (0..4)
            .map(|v| {
                let i = (q * 4 + v) * 3;
                [pos[i], pos[i + 1], pos[i + 2]]
            })
            .collect();
        let on_plane = verts.iter().all(|p| {
            p[0] == plane && p[1] >= y0 && p[1] <= y0 + 1.0 && p[2] >= z0 && p[2] <= z0 + 1.0
        });
        if on_plane {
            n += 1;
        }
    }
    n
}

/// Quads of `mesh` lying anywhere on the plane `x == plane`.
fn quads_on_full_x_plane(mesh: &ChunkMesh, plane: f32) -> usize {
    let pos = &mesh.build.pos;
    (0..mesh.quad_count())
        .filter(|q| (0..4).all(|v| pos[(q * 4 + v) * 3] == plane))
        .count()
}

#[test]
fn same_seed_builds_byte_identical_worlds() {
    let mut a = WorldManager::new(12_345_678, GenParams::default());
    let mut b = WorldManager::new(12_345_678, GenParams::default());
    a.generate_initial_chunks(1);
    b.generate_initial_chunks(1);

    assert_eq!(a.chunk_count(), b.chunk_count());
    for cy in 0..3 {
        for cz in -1..=1 {
            for cx in -1..=1 {
                let c = ChunkCoord::new(cx, cy, cz);
                let ca = a.chunk(c).expect("chunk loaded");
                let cb = b.chunk(c).expect("chunk loaded");
                assert_eq!(ca.voxels(), cb.voxels(), "chunk {c:?} diverged");
            }
        }
    }
}

#[test]
fn background_generation_matches_synchronous() {
    let mut sync = WorldManager::new(9_090_909, GenParams::default());
    let mut bg = WorldManager::new(9_090_909, GenParams::default()).with_runtime(3);
    sync.generate_initial_chunks(1);
    bg.generate_initial_chunks(1);

    assert_eq!(sync.chunk_count(), bg.chunk_count());
    for cy in 0..3 {
        for cz in -1..=1 {
            for cx in -1..=1 {
                let c = ChunkCoord::new(cx, cy, cz);
                assert_eq!(
                    sync.chunk(c).expect("loaded").voxels(),
                    bg.chunk(c).expect("loaded").voxels(),
                );
            }
        }
    }
}

#[test]
fn border_edit_heals_the_seam() {
    let mut world = WorldManager::new(1, flat_params());
    world.generate_initial_chunks(1);
    world.update(&mut NullSink);

    // Both sides of the x = 16 plane are air at y = 5, so neither mesh
    // carries a quad in that cell yet.
    let east = world.mesh(ChunkCoord::new(1, 0, 0)).expect("east mesh");
    let west = world.mesh(ChunkCoord::new(0, 0, 0)).expect("west mesh");
    assert_eq!(quads_on_x_plane(east, 16.0, 5.0, 5.0), 0);
    assert_eq!(quads_on_x_plane(west, 16.0, 5.0, 5.0), 0);

    // Place a stone voxel at local x = 0 of the east chunk.
    assert!(world.set_voxel(16, 5, 5, VoxelType::Stone));
    assert!(world.chunk(ChunkCoord::new(1, 0, 0)).expect("east").is_dirty());
    assert!(world.chunk(ChunkCoord::new(0, 0, 0)).expect("west").is_dirty());

    let mut sink = RecordingSink::default();
    world.update(&mut sink);
    let rebuilt: Vec<ChunkCoord> = sink.uploads.iter().map(|(c, _)| *c).collect();
    assert!(rebuilt.contains(&ChunkCoord::new(1, 0, 0)));
    assert!(rebuilt.contains(&ChunkCoord::new(0, 0, 0)));

    // Exactly one face sits on the shared plane: the stone voxel's west
    // face, owned by the east chunk.
    let east = world.mesh(ChunkCoord::new(1, 0, 0)).expect("east mesh");
    let west = world.mesh(ChunkCoord::new(0, 0, 0)).expect("west mesh");
    let total = quads_on_x_plane(east, 16.0, 5.0, 5.0) + quads_on_x_plane(west, 16.0, 5.0, 5.0);
    assert_eq!(total, 1);
}

#[test]
fn growing_the_region_heals_existing_seams() {
    let mut world = WorldManager::new(3, flat_params());
    world.generate_initial_chunks(0);
    world.update(&mut NullSink);

    // With no east neighbor, the center chunk renders its whole x = 16
    // wall: 16 columns of 3 solid voxels.
    let center = world.mesh(ChunkCoord::new(0, 0, 0)).expect("center mesh");
    assert_eq!(quads_on_full_x_plane(center, 16.0), 48);

    world.generate_initial_chunks(1);
    world.update(&mut NullSink);

    // The east chunk is solid at the same heights, so every wall face is
    // now buried; neither side contributes anything to the shared plane.
    let center = world.mesh(ChunkCoord::new(0, 0, 0)).expect("center mesh");
    let east = world.mesh(ChunkCoord::new(1, 0, 0)).expect("east mesh");
    assert_eq!(quads_on_full_x_plane(center, 16.0), 0);
    assert_eq!(quads_on_full_x_plane(east, 16.0), 0);
}

#[test]
fn background_region_growth_rebuilds_border_chunks() {
    let mut world = WorldManager::new(3, flat_params()).with_runtime(2);
    world.generate_initial_chunks(0);
    world.update(&mut NullSink);

    world.generate_initial_chunks(1);
    let mut sink = RecordingSink::default();
    world.update(&mut sink);

    let rebuilt: Vec<ChunkCoord> = sink.uploads.iter().map(|(c, _)| *c).collect();
    assert!(rebuilt.contains(&ChunkCoord::new(0, 0, 0)));
    let center = world.mesh(ChunkCoord::new(0, 0, 0)).expect("center mesh");
    let east = world.mesh(ChunkCoord::new(1, 0, 0)).expect("east mesh");
    assert_eq!(quads_on_full_x_plane(center, 16.0), 0);
    assert_eq!(quads_on_full_x_plane(east, 16.0), 0);
}

#[test]
fn redundant_write_rebuilds_nothing() {
    let mut world = WorldManager::new(7, flat_params());
    world.generate_initial_chunks(0);
    world.update(&mut NullSink);

    // (5, 5, 5) is already air in flat terrain.
    assert!(!world.set_voxel(5, 5, 5, VoxelType::Air));
    assert!(!world.chunk(ChunkCoord::new(0, 0, 0)).expect("chunk").is_dirty());

    let mut sink = RecordingSink::default();
    world.update(&mut sink);
    assert!(sink.uploads.is_empty());
    assert!(sink.removes.is_empty());
}

#[test]
fn voxel_distinguishes_unloaded_from_air() {
    let mut world = WorldManager::new(7, flat_params());
    world.generate_initial_chunks(0);

    assert_eq!(world.voxel(5, 10, 5), Some(VoxelType::Air));
    assert_eq!(world.voxel(5, 0, 5), Some(VoxelType::Bedrock));
    // cx = 40 / 16 = 2, outside the generated region.
    assert_eq!(world.voxel(40, 10, 5), None);
    assert_eq!(world.voxel_or_air(40, 10, 5), VoxelType::Air);
}

#[test]
fn set_voxel_creates_the_containing_chunk() {
    let mut world = WorldManager::new(7, flat_params());
    assert_eq!(world.chunk_count(), 0);
    assert!(world.set_voxel(100, 5, -40, VoxelType::Dirt));
    let coord = ChunkCoord::containing(100, 5, -40, CHUNK_SIZE);
    assert!(world.is_loaded(coord));
    assert_eq!(world.voxel(100, 5, -40), Some(VoxelType::Dirt));
}

#[test]
fn height_tracks_topmost_solid_voxel() {
    let mut world = WorldManager::new(7, flat_params());
    world.generate_initial_chunks(0);

    assert_eq!(world.height_at(3, 7), 2);
    // No chunk loaded in that column at all.
    assert_eq!(world.height_at(200, 200), 0);

    world.set_voxel(3, 5, 7, VoxelType::Stone);
    assert_eq!(world.height_at(3, 7), 5);
    world.set_voxel(3, 5, 7, VoxelType::Air);
    assert_eq!(world.height_at(3, 7), 2);
}

#[test]
fn reseed_matches_a_fresh_world() {
    let mut world = WorldManager::new(1_111_111, GenParams::default()).with_runtime(2);
    world.generate_initial_chunks(1);
    world.update(&mut NullSink);
    let epoch_before = world.epoch();

    world.reseed(2_222_222, &mut NullSink);
    world.update(&mut NullSink);
    assert_eq!(world.seed(), 2_222_222);
    assert_eq!(world.epoch(), epoch_before + 1);

    let mut fresh = WorldManager::new(2_222_222, GenParams::default());
    fresh.generate_initial_chunks(1);
    assert_eq!(world.chunk_count(), fresh.chunk_count());
    for cy in 0..3 {
        for cz in -1..=1 {
            for cx in -1..=1 {
                let c = ChunkCoord::new(cx, cy, cz);
                assert_eq!(
                    world.chunk(c).expect("loaded").voxels(),
                    fresh.chunk(c).expect("loaded").voxels(),
                );
            }
        }
    }
}

#[test]
fn dispose_releases_chunks_and_meshes() {
    let mut world = WorldManager::new(7, flat_params());
    world.generate_initial_chunks(0);
    world.update(&mut NullSink);
    assert!(world.mesh(ChunkCoord::new(0, 0, 0)).is_some());

    let mut sink = RecordingSink::default();
    world.dispose(&mut sink);
    assert_eq!(world.chunk_count(), 0);
    assert!(sink.removes.contains(&ChunkCoord::new(0, 0, 0)));
    assert_eq!(world.height_at(0, 0), 0);
}

#[test]
fn mesh_totals_count_only_meshed_chunks() {
    let mut world = WorldManager::new(7, flat_params());
    world.generate_initial_chunks(0);
    world.update(&mut NullSink);

    let totals = world.mesh_totals();
    // Flat terrain: only the cy = 0 chunk has content; cy = 1..3 are air.
    assert_eq!(totals.chunks, 3);
    assert_eq!(totals.meshes, 1);
    let m = world.mesh(ChunkCoord::new(0, 0, 0)).expect("mesh");
    assert_eq!(totals.triangles, m.triangle_count());
    assert_eq!(totals.vertices, m.vertex_count());
    assert!(totals.vertices > 0);
}
