use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Terrain shaping tunables. Every field has a default so a params file
/// only needs to name what it overrides.
#[derive(Clone, Debug, Deserialize)]
pub struct GenParams {
    #[serde(default)]
    pub height: Height,
    #[serde(default)]
    pub surface: Surface,
    #[serde(default)]
    pub ore: Ore,
    #[serde(default)]
    pub crystal: Crystal,
}

impl Default for GenParams {
    fn default() -> Self {
        Self {
            height: Height::default(),
            surface: Surface::default(),
            ore: Ore::default(),
            crystal: Crystal::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Height {
    /// Mean surface elevation before noise displacement.
    #[serde(default = "default_base_height")]
    pub base: i32,
    /// Peak-to-mean displacement applied to the fractal sample.
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
    /// World units per noise unit; larger values give broader hills.
    #[serde(default = "default_height_scale")]
    pub scale: f32,
    #[serde(default = "default_octaves")]
    pub octaves: u32,
}
fn default_base_height() -> i32 {
    24
}
fn default_amplitude() -> f32 {
    14.0
}
fn default_height_scale() -> f32 {
    96.0
}
fn default_octaves() -> u32 {
    4
}
impl Default for Height {
    fn default() -> Self {
        Self {
            base: default_base_height(),
            amplitude: default_amplitude(),
            scale: default_height_scale(),
            octaves: default_octaves(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Surface {
    /// Dirt layer thickness between stone and the surface voxel.
    #[serde(default = "default_dirt_depth")]
    pub dirt_depth: i32,
    #[serde(default = "default_biome_scale")]
    pub biome_scale: f32,
    #[serde(default = "default_moisture_scale")]
    pub moisture_scale: f32,
    /// Biome value below which the surface voxel is grass.
    #[serde(default = "default_grass_max")]
    pub grass_max: f32,
    /// Biome value below which (and above `grass_max`) the surface is stone.
    #[serde(default = "default_stone_max")]
    pub stone_max: f32,
}
fn default_dirt_depth() -> i32 {
    4
}
fn default_biome_scale() -> f32 {
    180.0
}
fn default_moisture_scale() -> f32 {
    220.0
}
fn default_grass_max() -> f32 {
    0.4
}
fn default_stone_max() -> f32 {
    0.7
}
impl Default for Surface {
    fn default() -> Self {
        Self {
            dirt_depth: default_dirt_depth(),
            biome_scale: default_biome_scale(),
            moisture_scale: default_moisture_scale(),
            grass_max: default_grass_max(),
            stone_max: default_stone_max(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Ore {
    /// Broad vein field: world units per noise unit.
    #[serde(default = "default_vein_scale")]
    pub vein_scale: f32,
    /// Broad threshold: below this no vein is possible.
    #[serde(default = "default_vein_threshold")]
    pub vein_threshold: f32,
    /// Fine core field sampled inside candidate veins.
    #[serde(default = "default_core_scale")]
    pub core_scale: f32,
    /// Tighter threshold that carves the actual ore cells out of a vein.
    #[serde(default = "default_core_threshold")]
    pub core_threshold: f32,
}
fn default_vein_scale() -> f32 {
    28.0
}
fn default_vein_threshold() -> f32 {
    0.4
}
fn default_core_scale() -> f32 {
    9.0
}
fn default_core_threshold() -> f32 {
    0.55
}
impl Default for Ore {
    fn default() -> Self {
        Self {
            vein_scale: default_vein_scale(),
            vein_threshold: default_vein_threshold(),
            core_scale: default_core_scale(),
            core_threshold: default_core_threshold(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Crystal {
    /// Crystals only sprout where moisture exceeds this.
    #[serde(default = "default_crystal_moisture_min")]
    pub moisture_min: f32,
    #[serde(default = "default_crystal_scale")]
    pub scale: f32,
    #[serde(default = "default_crystal_threshold")]
    pub threshold: f32,
}
fn default_crystal_moisture_min() -> f32 {
    0.7
}
fn default_crystal_scale() -> f32 {
    3.0
}
fn default_crystal_threshold() -> f32 {
    0.8
}
impl Default for Crystal {
    fn default() -> Self {
        Self {
            moisture_min: default_crystal_moisture_min(),
            scale: default_crystal_scale(),
            threshold: default_crystal_threshold(),
        }
    }
}

impl GenParams {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let p = GenParams::from_toml_str("").unwrap();
        assert_eq!(p.height.base, 24);
        assert_eq!(p.height.octaves, 4);
        assert_eq!(p.surface.dirt_depth, 4);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let p = GenParams::from_toml_str("[height]\nbase = 8\namplitude = 3.0\n").unwrap();
        assert_eq!(p.height.base, 8);
        assert_eq!(p.height.amplitude, 3.0);
        assert_eq!(p.height.scale, default_height_scale());
        assert_eq!(p.surface.grass_max, 0.4);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(GenParams::from_toml_str("[height\nbase=").is_err());
    }
}
