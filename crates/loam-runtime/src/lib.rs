//! Background chunk generation and meshing on a bounded worker pool.
//!
//! Jobs carry everything a worker needs (terrain oracle, coordinate,
//! epoch); workers never touch the world map. Results come back through a
//! single channel and the consumer integrates them in job-id order, so a
//! run is reproducible regardless of worker scheduling.
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use loam_chunk::{Chunk, ChunkOccupancy, generate_chunk};
use loam_mesh::{ChunkMesh, build_chunk_mesh};
use loam_world::{ChunkCoord, TerrainGenerator};
use rayon::{ThreadPool, ThreadPoolBuilder};

#[derive(Clone)]
pub struct GenJob {
    pub coord: ChunkCoord,
    pub size: usize,
    /// World epoch at submit time; the consumer discards results whose
    /// epoch no longer matches (a reseed happened in between).
    pub epoch: u64,
    /// Monotone id assigned by the submitter; defines integration order.
    pub job_id: u64,
    pub generator: Arc<TerrainGenerator>,
}

pub struct JobOut {
    pub chunk: Chunk,
    /// `None` when the chunk is entirely air.
    pub mesh: Option<ChunkMesh>,
    pub occupancy: ChunkOccupancy,
    pub epoch: u64,
    pub job_id: u64,
    pub t_gen_ms: u32,
    pub t_mesh_ms: u32,
}

#[inline]
fn elapsed_ms(since: Instant) -> u32 {
    since.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

fn process_gen_job(job: GenJob, tx: &Sender<JobOut>) {
    let GenJob {
        coord,
        size,
        epoch,
        job_id,
        generator,
    } = job;

    let t0 = Instant::now();
    let generated = generate_chunk(&generator, coord, size);
    let t_gen_ms = elapsed_ms(t0);

    let (mesh, t_mesh_ms) = if generated.occupancy.has_blocks() {
        let t1 = Instant::now();
        // The pure oracle answers neighbor queries across the boundary, so
        // the mesh matches the terrain that will exist there.
        let mesh = build_chunk_mesh(&generated.chunk, &*generator);
        (Some(mesh), elapsed_ms(t1))
    } else {
        (None, 0)
    };

    let _ = tx.send(JobOut {
        chunk: generated.chunk,
        mesh,
        occupancy: generated.occupancy,
        epoch,
        job_id,
        t_gen_ms,
        t_mesh_ms,
    });
}

pub struct Runtime {
    job_tx: Sender<GenJob>,
    res_rx: Receiver<JobOut>,
    _pool: Arc<ThreadPool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    pub workers: usize,
}

impl Runtime {
    /// Builds a pool of `threads` workers; 0 means one per available core.
    pub fn new(threads: usize) -> Self {
        let workers = if threads > 0 {
            threads
        } else {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
        };
        let (job_tx, job_rx) = unbounded::<GenJob>();
        let (res_tx, res_rx) = unbounded::<JobOut>();
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("loam-gen-{i}"))
                .build()
                .expect("gen pool"),
        );
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let queued = queued.clone();
            let inflight = inflight.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_gen_job(job, &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }

        Self {
            job_tx,
            res_rx,
            _pool: pool,
            queued,
            inflight,
            workers,
        }
    }

    pub fn submit(&self, job: GenJob) {
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send(job).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// All results completed so far, without blocking. Callers sort by
    /// `job_id` before integrating.
    pub fn drain_results(&self) -> Vec<JobOut> {
        self.res_rx.try_iter().collect()
    }

    /// Blocks for the next result; `None` once all senders are gone.
    pub fn recv_result(&self) -> Option<JobOut> {
        self.res_rx.recv().ok()
    }

    pub fn queue_debug_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }
}
