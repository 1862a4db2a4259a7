use fastnoise_lite::{FastNoiseLite, NoiseType};
use loam_voxel::VoxelType;

use crate::params::GenParams;

/// Deterministic terrain oracle: voxel content anywhere in the world as a
/// pure function of `(seed, coordinate)`.
///
/// Each noise channel is an independently salted, seeded lattice; the set
/// of channels is immutable after construction, so sampling never mutates
/// state and results are independent of call order and chunk boundaries.
pub struct TerrainGenerator {
    seed: i32,
    params: GenParams,
    height: FastNoiseLite,
    biome: FastNoiseLite,
    moisture: FastNoiseLite,
    vein: FastNoiseLite,
    core: FastNoiseLite,
    crystal: FastNoiseLite,
}

const SALT_BIOME: i32 = 0x1203_5F31;
const SALT_MOISTURE: i32 = 0x2E3A_1B27;
const SALT_VEIN: i32 = 0x0041_337F;
const SALT_CORE: i32 = 0x0663_9D15;
const SALT_CRYSTAL: i32 = 0x7A1C_4E09;

fn channel(seed: i32) -> FastNoiseLite {
    let mut n = FastNoiseLite::with_seed(seed);
    n.set_noise_type(Some(NoiseType::OpenSimplex2));
    // Scale is applied to the input coordinates; keep the lattice at unit frequency.
    n.set_frequency(Some(1.0));
    n
}

/// Multi-octave 2D sample in `[-1, 1]`: amplitude halves and frequency
/// doubles per octave, normalized by total amplitude.
fn fbm2(noise: &FastNoiseLite, x: f32, z: f32, octaves: u32) -> f32 {
    let mut amp = 1.0_f32;
    let mut freq = 1.0_f32;
    let mut sum = 0.0_f32;
    let mut max_amp = 0.0_f32;
    for _ in 0..octaves.max(1) {
        sum += noise.get_noise_2d(x * freq, z * freq) * amp;
        max_amp += amp;
        amp *= 0.5;
        freq *= 2.0;
    }
    if max_amp > 0.0 { sum / max_amp } else { sum }
}

#[inline]
fn unit(sample: f32) -> f32 {
    ((sample + 1.0) * 0.5).clamp(0.0, 1.0)
}

impl TerrainGenerator {
    pub fn new(seed: i32, params: GenParams) -> Self {
        Self {
            seed,
            height: channel(seed),
            biome: channel(seed ^ SALT_BIOME),
            moisture: channel(seed ^ SALT_MOISTURE),
            vein: channel(seed ^ SALT_VEIN),
            core: channel(seed ^ SALT_CORE),
            crystal: channel(seed ^ SALT_CRYSTAL),
            params,
        }
    }

    /// Replaces every noise channel with ones derived from `seed`. The
    /// owning world is responsible for discarding chunks generated under
    /// the previous seed.
    pub fn reseed(&mut self, seed: i32) {
        *self = Self::new(seed, self.params.clone());
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    #[inline]
    pub fn params(&self) -> &GenParams {
        &self.params
    }

    /// Surface elevation of the column at `(wx, wz)`, always at least 1 so
    /// the bedrock layer at `y == 0` is never the surface.
    pub fn height_at(&self, wx: i32, wz: i32) -> i32 {
        let h = &self.params.height;
        let n = fbm2(
            &self.height,
            wx as f32 / h.scale,
            wz as f32 / h.scale,
            h.octaves,
        );
        (h.base + (h.amplitude * n).round() as i32).max(1)
    }

    /// Biome channel in `[0, 1]`; picks the surface material, never geometry.
    pub fn biome_at(&self, wx: i32, wz: i32) -> f32 {
        let s = self.params.surface.biome_scale;
        unit(self.biome.get_noise_2d(wx as f32 / s, wz as f32 / s))
    }

    /// Moisture channel in `[0, 1]`; gates crystal growth.
    pub fn moisture_at(&self, wx: i32, wz: i32) -> f32 {
        let s = self.params.surface.moisture_scale;
        unit(self.moisture.get_noise_2d(wx as f32 / s, wz as f32 / s))
    }

    fn deep_voxel(&self, wx: i32, wy: i32, wz: i32) -> VoxelType {
        let ore = &self.params.ore;
        let broad = self.vein.get_noise_3d(
            wx as f32 / ore.vein_scale,
            wy as f32 / ore.vein_scale,
            wz as f32 / ore.vein_scale,
        );
        if broad > ore.vein_threshold {
            let fine = self.core.get_noise_3d(
                wx as f32 / ore.core_scale,
                wy as f32 / ore.core_scale,
                wz as f32 / ore.core_scale,
            );
            if fine > ore.core_threshold {
                return VoxelType::Ore;
            }
        }
        VoxelType::Stone
    }

    fn surface_voxel(&self, wx: i32, wz: i32) -> VoxelType {
        let s = &self.params.surface;
        let b = self.biome_at(wx, wz);
        if b < s.grass_max {
            VoxelType::Grass
        } else if b < s.stone_max {
            VoxelType::Stone
        } else {
            VoxelType::Dirt
        }
    }

    fn crystal_above(&self, wx: i32, wz: i32) -> bool {
        let c = &self.params.crystal;
        if self.moisture_at(wx, wz) <= c.moisture_min {
            return false;
        }
        let n = self
            .crystal
            .get_noise_2d(wx as f32 / c.scale, wz as f32 / c.scale);
        n > c.threshold
    }

    /// Voxel content at a world coordinate. Layering, bottom to top:
    /// bedrock floor, stone with clustered ore veins, a dirt blanket, a
    /// biome-picked surface voxel, and optionally a crystal one above it.
    pub fn voxel_at(&self, wx: i32, wy: i32, wz: i32) -> VoxelType {
        if wy < 0 {
            return VoxelType::Air;
        }
        if wy == 0 {
            return VoxelType::Bedrock;
        }
        let h = self.height_at(wx, wz);
        let dirt_top = h - self.params.surface.dirt_depth;
        if wy < dirt_top {
            self.deep_voxel(wx, wy, wz)
        } else if wy < h {
            VoxelType::Dirt
        } else if wy == h {
            self.surface_voxel(wx, wz)
        } else if wy == h + 1 && self.crystal_above(wx, wz) {
            VoxelType::Crystal
        } else {
            VoxelType::Air
        }
    }
}
