use loam_chunk::{Chunk, generate_chunk};
use loam_voxel::VoxelType;
use loam_world::{ChunkCoord, GenParams, TerrainGenerator};
use proptest::prelude::*;

fn dim() -> impl Strategy<Value = usize> {
    1usize..=8
}

fn voxel() -> impl Strategy<Value = VoxelType> {
    prop::sample::select(VoxelType::ALL.to_vec())
}

fn coord() -> impl Strategy<Value = ChunkCoord> {
    (-1000i32..1000, -1000i32..1000, -1000i32..1000)
        .prop_map(|(cx, cy, cz)| ChunkCoord::new(cx, cy, cz))
}

proptest! {
    // Reads clamp to Air for every out-of-range component.
    #[test]
    fn out_of_range_reads_are_air(c in coord(), size in dim(), p in -20i32..20) {
        let chunk = Chunk::new(c, size);
        let s = size as i32;
        let outside = [-1, s, p.clamp(-20, -1), s + p.abs()];
        for &bad in &outside {
            prop_assert_eq!(chunk.get(bad, 0, 0), VoxelType::Air);
            prop_assert_eq!(chunk.get(0, bad, 0), VoxelType::Air);
            prop_assert_eq!(chunk.get(0, 0, bad), VoxelType::Air);
        }
    }

    // Out-of-range writes store nothing and never dirty a clean chunk.
    #[test]
    fn out_of_range_writes_are_noops(c in coord(), size in dim(), v in voxel()) {
        let mut chunk = Chunk::new(c, size);
        chunk.mark_clean();
        let s = size as i32;
        prop_assert!(!chunk.set(-1, 0, 0, v));
        prop_assert!(!chunk.set(0, s, 0, v));
        prop_assert!(!chunk.set(0, 0, s, v));
        prop_assert!(!chunk.is_dirty());
    }

    // A changing write round-trips, reports the change, and dirties the
    // chunk; a same-value write does neither.
    #[test]
    fn set_tracks_changes_and_dirt(c in coord(), size in dim(), v in voxel(),
                                   x in 0i32..8, y in 0i32..8, z in 0i32..8) {
        let s = size as i32;
        let (x, y, z) = (x % s, y % s, z % s);
        let mut chunk = Chunk::new(c, size);
        chunk.mark_clean();

        let was = chunk.get(x, y, z);
        let changed = chunk.set(x, y, z, v);
        prop_assert_eq!(changed, was != v);
        prop_assert_eq!(chunk.get(x, y, z), v);
        prop_assert_eq!(chunk.is_dirty(), changed);

        // Writing the same value again is a no-op.
        chunk.mark_clean();
        prop_assert!(!chunk.set(x, y, z, v));
        prop_assert!(!chunk.is_dirty());
    }
}

#[test]
fn new_chunk_is_dirty_and_all_air() {
    let chunk = Chunk::new(ChunkCoord::new(2, -1, 0), 16);
    assert!(chunk.is_dirty());
    assert!(chunk.is_all_air());
    assert_eq!(chunk.voxels().len(), 16 * 16 * 16);
}

#[test]
fn generate_matches_the_oracle_pointwise() {
    let g = TerrainGenerator::new(12_345_678, GenParams::default());
    for coord in [ChunkCoord::new(0, 0, 0), ChunkCoord::new(-1, 1, 2)] {
        let out = generate_chunk(&g, coord, 16);
        assert!(out.chunk.is_dirty());
        let (bx, by, bz) = out.chunk.world_base();
        let mut non_air = false;
        for z in 0..16 {
            for y in 0..16 {
                for x in 0..16 {
                    let v = out.chunk.get(x, y, z);
                    assert_eq!(v, g.voxel_at(bx + x, by + y, bz + z));
                    non_air |= !v.is_air();
                }
            }
        }
        assert_eq!(out.occupancy.has_blocks(), non_air);
    }
}
