use serde::{Deserialize, Serialize};

/// Integer coordinate of a chunk in the chunk lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// Chunk containing the world-space voxel `(wx, wy, wz)` for edge
    /// length `size`. Floor division, so negative coordinates land in the
    /// expected chunk instead of rounding toward zero.
    #[inline]
    pub fn containing(wx: i32, wy: i32, wz: i32, size: usize) -> Self {
        let s = size as i32;
        Self {
            cx: wx.div_euclid(s),
            cy: wy.div_euclid(s),
            cz: wz.div_euclid(s),
        }
    }

    /// World-space coordinate of this chunk's minimum corner.
    #[inline]
    pub fn base(self, size: usize) -> (i32, i32, i32) {
        let s = size as i32;
        (self.cx * s, self.cy * s, self.cz * s)
    }

    /// Local coordinate of a world voxel inside this chunk. Components are
    /// in `[0, size)` whenever the voxel actually lies in this chunk.
    #[inline]
    pub fn local_of(self, wx: i32, wy: i32, wz: i32, size: usize) -> (i32, i32, i32) {
        let (bx, by, bz) = self.base(size);
        (wx - bx, wy - by, wz - bz)
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}
