//! Chunk voxel cube: storage, dirty tracking, and generation fill.
#![forbid(unsafe_code)]

use loam_voxel::VoxelType;
use loam_world::{ChunkCoord, TerrainGenerator};

/// One cube of voxels. Knows nothing about neighboring chunks; reads
/// outside `[0, size)` clamp to `Air` and writes there are no-ops.
#[derive(Clone, Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    size: usize,
    voxels: Vec<VoxelType>,
    dirty: bool,
}

impl Chunk {
    /// Fresh all-air chunk. Starts dirty: a chunk that has never been
    /// meshed needs its first rebuild.
    pub fn new(coord: ChunkCoord, size: usize) -> Self {
        Self {
            coord,
            size,
            voxels: vec![VoxelType::Air; size * size * size],
            dirty: true,
        }
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.size + z) * self.size + x
    }

    #[inline]
    fn in_range(&self, x: i32, y: i32, z: i32) -> bool {
        let s = self.size as i32;
        (0..s).contains(&x) && (0..s).contains(&y) && (0..s).contains(&z)
    }

    /// Voxel at a local coordinate; `Air` for anything out of range.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> VoxelType {
        if !self.in_range(x, y, z) {
            return VoxelType::Air;
        }
        self.voxels[self.idx(x as usize, y as usize, z as usize)]
    }

    /// Stores `v` at a local coordinate. Returns whether the stored value
    /// changed; only a changing write marks the chunk dirty. Out-of-range
    /// writes store nothing and return `false`.
    pub fn set(&mut self, x: i32, y: i32, z: i32, v: VoxelType) -> bool {
        if !self.in_range(x, y, z) {
            return false;
        }
        let i = self.idx(x as usize, y as usize, z as usize);
        if self.voxels[i] == v {
            return false;
        }
        self.voxels[i] = v;
        self.dirty = true;
        true
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called by the owner once a rebuilt mesh has been stored.
    #[inline]
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Forces a mesh rebuild on the next update pass, e.g. when a border
    /// voxel of a neighboring chunk changed.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.voxels.iter().any(|v| !v.is_air())
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_non_air()
    }

    /// Raw voxel storage, `(y * size + z) * size + x` order. Used for
    /// byte-identical content comparisons.
    #[inline]
    pub fn voxels(&self) -> &[VoxelType] {
        &self.voxels
    }

    /// World-space coordinate of this chunk's minimum corner.
    #[inline]
    pub fn world_base(&self) -> (i32, i32, i32) {
        self.coord.base(self.size)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOccupancy {
    Empty,
    Populated,
}

impl ChunkOccupancy {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, ChunkOccupancy::Empty)
    }

    #[inline]
    pub fn has_blocks(self) -> bool {
        matches!(self, ChunkOccupancy::Populated)
    }
}

#[derive(Clone, Debug)]
pub struct ChunkGenerateResult {
    pub chunk: Chunk,
    pub occupancy: ChunkOccupancy,
}

/// Fills a chunk from the terrain oracle, one world coordinate per cell.
/// The result is dirty and has never been meshed.
pub fn generate_chunk(
    generator: &TerrainGenerator,
    coord: ChunkCoord,
    size: usize,
) -> ChunkGenerateResult {
    let mut chunk = Chunk::new(coord, size);
    let (bx, by, bz) = coord.base(size);
    let mut has_blocks = false;
    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                let v =
                    generator.voxel_at(bx + x as i32, by + y as i32, bz + z as i32);
                if !v.is_air() {
                    has_blocks = true;
                    let i = chunk.idx(x, y, z);
                    chunk.voxels[i] = v;
                }
            }
        }
    }
    ChunkGenerateResult {
        chunk,
        occupancy: if has_blocks {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        },
    }
}
