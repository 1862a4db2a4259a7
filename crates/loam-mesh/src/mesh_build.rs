use crate::face::Face;

/// Flat vertex/index buffers under assembly. Positions and normals are
/// interleaved xyz triples, UVs xy pairs, colors RGBA bytes; indices are
/// `u32` so a worst-case chunk cannot overflow them.
#[derive(Default, Clone, Debug)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub col: Vec<u8>,
    pub idx: Vec<u32>,
}

impl MeshBuild {
    /// Clears all buffers but keeps their capacity for reuse.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.col.clear();
        self.idx.clear();
    }

    /// Pre-reserves room for `n` quads (4 vertices, 6 indices each).
    #[inline]
    pub fn reserve_quads(&mut self, n: usize) {
        self.pos.reserve(n * 4 * 3);
        self.norm.reserve(n * 4 * 3);
        self.uv.reserve(n * 4 * 2);
        self.col.reserve(n * 4 * 4);
        self.idx.reserve(n * 6);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.idx.len() / 6
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    /// Appends one unit quad (two triangles) for `face` of the voxel whose
    /// minimum corner sits at world `(wx, wy, wz)`.
    pub fn push_face(&mut self, face: Face, wx: i32, wy: i32, wz: i32, rgba: [u8; 4]) {
        let base = self.vertex_count() as u32;
        let n = face.normal();
        for c in face.corners() {
            let (px, py, pz) = (wx as f32 + c[0], wy as f32 + c[1], wz as f32 + c[2]);
            self.pos.extend_from_slice(&[px, py, pz]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            // Planar projection of the world position onto the face plane.
            let (u, v) = match face {
                Face::PosY | Face::NegY => (px, pz),
                Face::PosX | Face::NegX => (pz, py),
                Face::PosZ | Face::NegZ => (px, py),
            };
            self.uv.extend_from_slice(&[u, v]);
            self.col.extend_from_slice(&rgba);
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn positions(&self) -> &[f32] {
        &self.pos
    }

    pub fn normals(&self) -> &[f32] {
        &self.norm
    }
}
