use std::sync::Arc;
use std::time::Instant;

use hashbrown::HashMap;
use log::{debug, info};

use loam_chunk::{Chunk, generate_chunk};
use loam_mesh::{ChunkMesh, VoxelSource, build_chunk_mesh};
use loam_runtime::{GenJob, JobOut, Runtime};
use loam_voxel::VoxelType;
use loam_world::{CHUNK_SIZE, ChunkCoord, GenParams, TerrainGenerator};

use crate::sink::MeshSink;

/// A live chunk paired with its most recently built mesh (`None` until the
/// first rebuild, or while the chunk is entirely air).
pub struct ChunkEntry {
    pub chunk: Chunk,
    pub mesh: Option<ChunkMesh>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshTotals {
    pub chunks: usize,
    pub meshes: usize,
    pub vertices: usize,
    pub triangles: usize,
}

/// Owns every live chunk, drives generation and mesh rebuilds, and
/// answers world-space queries.
///
/// Single mutator: all state changes go through `&mut self`, so readers
/// never observe a world mixed between two seeds. Background workers only
/// share the immutable terrain oracle; their results are tagged with the
/// epoch current at submit time and stale ones are discarded at the one
/// integration point.
pub struct WorldManager {
    chunk_size: usize,
    chunks_y: usize,
    seed: i32,
    params: GenParams,
    epoch: u64,
    next_job_id: u64,
    generator: Arc<TerrainGenerator>,
    chunks: HashMap<ChunkCoord, ChunkEntry>,
    runtime: Option<Runtime>,
    region_radius: Option<i32>,
    pending_upload: Vec<ChunkCoord>,
}

/// Read-only view of the chunk map for cross-boundary neighbor sampling
/// during rebuilds. Absent chunks read as `None` (face rendered).
struct MapSource<'a> {
    chunks: &'a HashMap<ChunkCoord, ChunkEntry>,
    size: usize,
}

fn sample(
    chunks: &HashMap<ChunkCoord, ChunkEntry>,
    size: usize,
    wx: i32,
    wy: i32,
    wz: i32,
) -> Option<VoxelType> {
    let coord = ChunkCoord::containing(wx, wy, wz, size);
    chunks.get(&coord).map(|e| {
        let (lx, ly, lz) = coord.local_of(wx, wy, wz, size);
        e.chunk.get(lx, ly, lz)
    })
}

impl VoxelSource for MapSource<'_> {
    fn voxel_at(&self, wx: i32, wy: i32, wz: i32) -> Option<VoxelType> {
        sample(self.chunks, self.size, wx, wy, wz)
    }
}

impl VoxelSource for WorldManager {
    fn voxel_at(&self, wx: i32, wy: i32, wz: i32) -> Option<VoxelType> {
        sample(&self.chunks, self.chunk_size, wx, wy, wz)
    }
}

impl WorldManager {
    pub fn new(seed: i32, params: GenParams) -> Self {
        let generator = Arc::new(TerrainGenerator::new(seed, params.clone()));
        Self {
            chunk_size: CHUNK_SIZE,
            chunks_y: 3,
            seed,
            params,
            epoch: 0,
            next_job_id: 0,
            generator,
            chunks: HashMap::new(),
            runtime: None,
            region_radius: None,
            pending_upload: Vec::new(),
        }
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        assert!(size > 0, "chunk size must be positive");
        self.chunk_size = size;
        self
    }

    /// Vertical extent of generated regions, in chunks above y = 0.
    pub fn with_chunks_y(mut self, chunks_y: usize) -> Self {
        self.chunks_y = chunks_y.max(1);
        self
    }

    /// Attaches a background worker pool; 0 threads means one per core.
    pub fn with_runtime(mut self, threads: usize) -> Self {
        self.runtime = Some(Runtime::new(threads));
        self
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord).map(|e| &e.chunk)
    }

    pub fn mesh(&self, coord: ChunkCoord) -> Option<&ChunkMesh> {
        self.chunks.get(&coord).and_then(|e| e.mesh.as_ref())
    }

    pub fn mesh_totals(&self) -> MeshTotals {
        let mut t = MeshTotals {
            chunks: self.chunks.len(),
            ..MeshTotals::default()
        };
        for e in self.chunks.values() {
            if let Some(m) = &e.mesh {
                t.meshes += 1;
                t.vertices += m.vertex_count();
                t.triangles += m.triangle_count();
            }
        }
        t
    }

    /// Returns the chunk at `coord`, generating and inserting it first if
    /// needed. A newly created chunk starts dirty, and already-loaded face
    /// neighbors are re-dirtied so their seam faces get re-culled against
    /// the new content.
    pub fn get_or_create_chunk(&mut self, coord: ChunkCoord) -> &Chunk {
        if !self.chunks.contains_key(&coord) {
            let generated = generate_chunk(&self.generator, coord, self.chunk_size);
            debug!("created chunk {coord:?}");
            self.chunks.insert(
                coord,
                ChunkEntry {
                    chunk: generated.chunk,
                    mesh: None,
                },
            );
            self.mark_neighbors_dirty(coord);
        }
        &self.chunks[&coord].chunk
    }

    /// Voxel at a world coordinate; `None` means the containing chunk has
    /// not been generated (distinct from generated-and-air).
    pub fn voxel(&self, wx: i32, wy: i32, wz: i32) -> Option<VoxelType> {
        sample(&self.chunks, self.chunk_size, wx, wy, wz)
    }

    pub fn voxel_or_air(&self, wx: i32, wy: i32, wz: i32) -> VoxelType {
        self.voxel(wx, wy, wz).unwrap_or(VoxelType::Air)
    }

    /// Writes a voxel, generating the containing chunk if needed so edits
    /// are never dropped. A changing write dirties the chunk; if it
    /// touches a chunk border, loaded neighbors on that border are
    /// dirtied too so both sides of the seam rebuild consistently.
    pub fn set_voxel(&mut self, wx: i32, wy: i32, wz: i32, v: VoxelType) -> bool {
        let coord = ChunkCoord::containing(wx, wy, wz, self.chunk_size);
        self.get_or_create_chunk(coord);
        let (lx, ly, lz) = coord.local_of(wx, wy, wz, self.chunk_size);
        let changed = match self.chunks.get_mut(&coord) {
            Some(e) => e.chunk.set(lx, ly, lz, v),
            None => false,
        };
        if changed {
            self.bump_border_neighbors(coord, lx, ly, lz);
        }
        changed
    }

    /// Surface height of the column at `(wx, wz)`: the y of the topmost
    /// non-air voxel among loaded chunks. Returns 0 when no chunk in the
    /// column is loaded or the whole column is air; callers treat 0 as
    /// "no ground found" (the bedrock floor sits at y = 0).
    pub fn height_at(&self, wx: i32, wz: i32) -> i32 {
        let s = self.chunk_size as i32;
        let ccx = wx.div_euclid(s);
        let ccz = wz.div_euclid(s);
        let top_cy = self
            .chunks
            .keys()
            .filter(|c| c.cx == ccx && c.cz == ccz)
            .map(|c| c.cy)
            .max();
        let Some(top_cy) = top_cy else {
            return 0;
        };
        let mut wy = (top_cy + 1) * s - 1;
        while wy >= 0 {
            let coord = ChunkCoord::containing(wx, wy, wz, self.chunk_size);
            match self.chunks.get(&coord) {
                Some(e) => {
                    let (lx, ly, lz) = coord.local_of(wx, wy, wz, self.chunk_size);
                    if !e.chunk.get(lx, ly, lz).is_air() {
                        return wy;
                    }
                    wy -= 1;
                }
                // Unloaded chunk: skip the whole slab.
                None => wy = coord.cy * s - 1,
            }
        }
        0
    }

    /// Bootstrap: generates every chunk with `cx, cz` within `radius` of
    /// the origin and `cy` in `[0, chunks_y)`. Synchronous from the
    /// caller's view; with a runtime attached the work fans out to the
    /// pool and results are drained to completion in job-id order.
    pub fn generate_initial_chunks(&mut self, radius: i32) {
        self.region_radius = Some(radius);
        let t0 = Instant::now();

        let mut coords = Vec::new();
        for cy in 0..self.chunks_y as i32 {
            for cz in -radius..=radius {
                for cx in -radius..=radius {
                    let c = ChunkCoord::new(cx, cy, cz);
                    if !self.chunks.contains_key(&c) {
                        coords.push(c);
                    }
                }
            }
        }
        let created = coords.len();

        let outs = if let Some(rt) = &self.runtime {
            let mut expected = 0usize;
            for c in &coords {
                let job_id = self.next_job_id;
                self.next_job_id += 1;
                rt.submit(GenJob {
                    coord: *c,
                    size: self.chunk_size,
                    epoch: self.epoch,
                    job_id,
                    generator: Arc::clone(&self.generator),
                });
                expected += 1;
            }
            let mut outs = Vec::with_capacity(expected);
            while outs.len() < expected {
                match rt.recv_result() {
                    // Stale-epoch results do not count toward this batch.
                    Some(o) if o.epoch == self.epoch => outs.push(o),
                    Some(o) => {
                        debug!(
                            "discarding stale chunk {:?} (epoch {} != {})",
                            o.chunk.coord(),
                            o.epoch,
                            self.epoch
                        );
                    }
                    None => break,
                }
            }
            outs.sort_by_key(|o| o.job_id);
            outs
        } else {
            for c in coords {
                let generated = generate_chunk(&self.generator, c, self.chunk_size);
                self.chunks.insert(
                    c,
                    ChunkEntry {
                        chunk: generated.chunk,
                        mesh: None,
                    },
                );
                self.mark_neighbors_dirty(c);
            }
            Vec::new()
        };
        for out in outs {
            self.integrate(out);
        }

        info!(
            "generated {created} chunks (radius {radius}, seed {}) in {:?}",
            self.seed,
            t0.elapsed()
        );
    }

    /// One update pass: drain background results, flush pending uploads,
    /// then rebuild every dirty chunk's mesh on this thread.
    pub fn update(&mut self, sink: &mut dyn MeshSink) {
        let mut outs = match &self.runtime {
            Some(rt) => rt.drain_results(),
            None => Vec::new(),
        };
        outs.sort_by_key(|o| o.job_id);
        for out in outs {
            self.integrate(out);
        }

        for coord in std::mem::take(&mut self.pending_upload) {
            if let Some(mesh) = self.chunks.get(&coord).and_then(|e| e.mesh.as_ref()) {
                sink.upload(coord, mesh);
            }
        }

        let mut dirty: Vec<ChunkCoord> = self
            .chunks
            .iter()
            .filter(|(_, e)| e.chunk.is_dirty())
            .map(|(c, _)| *c)
            .collect();
        if dirty.is_empty() {
            return;
        }
        // Fixed rebuild order keeps upload sequences reproducible.
        dirty.sort_by_key(|c| (c.cy, c.cz, c.cx));

        let mut built: Vec<(ChunkCoord, Option<ChunkMesh>)> = Vec::with_capacity(dirty.len());
        {
            let source = MapSource {
                chunks: &self.chunks,
                size: self.chunk_size,
            };
            for c in &dirty {
                let e = &self.chunks[c];
                if e.chunk.is_all_air() {
                    built.push((*c, None));
                } else {
                    built.push((*c, Some(build_chunk_mesh(&e.chunk, &source))));
                }
            }
        }
        for (coord, mesh) in built {
            let Some(e) = self.chunks.get_mut(&coord) else {
                continue;
            };
            match mesh {
                Some(m) => {
                    sink.upload(coord, &m);
                    e.mesh = Some(m);
                }
                None => {
                    if e.mesh.take().is_some() {
                        sink.remove(coord);
                    }
                }
            }
            e.chunk.mark_clean();
        }
    }

    /// Discards the whole world, rebuilds the terrain oracle from
    /// `seed`, and regenerates the last requested region. Results still
    /// in flight from before the reseed carry an older epoch and are
    /// dropped when drained.
    pub fn reseed(&mut self, seed: i32, sink: &mut dyn MeshSink) {
        self.epoch += 1;
        self.clear_chunks(sink);
        self.seed = seed;
        self.generator = Arc::new(TerrainGenerator::new(seed, self.params.clone()));
        info!("reseeded world to {seed} (epoch {})", self.epoch);
        if let Some(radius) = self.region_radius {
            self.generate_initial_chunks(radius);
        }
    }

    /// Regenerates the world from the current seed.
    pub fn regenerate(&mut self, sink: &mut dyn MeshSink) {
        self.reseed(self.seed, sink);
    }

    /// Releases every chunk and mesh. The manager stays usable.
    pub fn dispose(&mut self, sink: &mut dyn MeshSink) {
        self.clear_chunks(sink);
        self.region_radius = None;
    }

    fn clear_chunks(&mut self, sink: &mut dyn MeshSink) {
        for (coord, entry) in self.chunks.drain() {
            if entry.mesh.is_some() {
                sink.remove(coord);
            }
        }
        self.pending_upload.clear();
    }

    fn integrate(&mut self, out: JobOut) {
        if out.epoch != self.epoch {
            debug!(
                "discarding stale chunk {:?} (epoch {} != {})",
                out.chunk.coord(),
                out.epoch,
                self.epoch
            );
            return;
        }
        let mut chunk = out.chunk;
        let coord = chunk.coord();
        // Background jobs arrive already meshed (or provably empty).
        chunk.mark_clean();
        let has_mesh = out.mesh.is_some();
        self.chunks.insert(
            coord,
            ChunkEntry {
                chunk,
                mesh: out.mesh,
            },
        );
        if has_mesh {
            self.pending_upload.push(coord);
        }
        // A chunk appearing changes what its already-meshed neighbors see
        // across the seam; they re-cull on the next update.
        self.mark_neighbors_dirty(coord);
    }

    fn mark_neighbors_dirty(&mut self, coord: ChunkCoord) {
        for (dx, dy, dz) in [
            (1, 0, 0),
            (-1, 0, 0),
            (0, 1, 0),
            (0, -1, 0),
            (0, 0, 1),
            (0, 0, -1),
        ] {
            if let Some(e) = self.chunks.get_mut(&coord.offset(dx, dy, dz)) {
                e.chunk.mark_dirty();
            }
        }
    }

    /// Dirties loaded chunks that share the border the edit touched, so
    /// their seam faces rebuild against the new value.
    fn bump_border_neighbors(&mut self, coord: ChunkCoord, lx: i32, ly: i32, lz: i32) {
        let s = self.chunk_size as i32;
        let mut offsets_x = vec![0];
        let mut offsets_y = vec![0];
        let mut offsets_z = vec![0];
        if lx == 0 {
            offsets_x.push(-1);
        }
        if lx == s - 1 {
            offsets_x.push(1);
        }
        if ly == 0 {
            offsets_y.push(-1);
        }
        if ly == s - 1 {
            offsets_y.push(1);
        }
        if lz == 0 {
            offsets_z.push(-1);
        }
        if lz == s - 1 {
            offsets_z.push(1);
        }
        for &dx in &offsets_x {
            for &dy in &offsets_y {
                for &dz in &offsets_z {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    if let Some(e) = self.chunks.get_mut(&coord.offset(dx, dy, dz)) {
                        e.chunk.mark_dirty();
                    }
                }
            }
        }
    }
}
