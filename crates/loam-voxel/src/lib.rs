//! Voxel material tags and their trait table.
//!
//! Every visibility, destructibility, and emission decision in the engine
//! goes through the methods on [`VoxelType`]; there is exactly one table
//! and it is exhaustive over the closed tag set.
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Closed set of voxel materials. `Air` is the empty sentinel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum VoxelType {
    #[default]
    Air = 0,
    Dirt,
    Grass,
    Stone,
    Ore,
    Crystal,
    Bedrock,
}

/// Which side of a voxel a face belongs to, for material/color lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceRole {
    Top,
    Bottom,
    Side,
}

impl VoxelType {
    /// All variants, in tag order. Handy for exhaustive table tests.
    pub const ALL: [VoxelType; 7] = [
        VoxelType::Air,
        VoxelType::Dirt,
        VoxelType::Grass,
        VoxelType::Stone,
        VoxelType::Ore,
        VoxelType::Crystal,
        VoxelType::Bedrock,
    ];

    #[inline]
    pub fn is_air(self) -> bool {
        matches!(self, VoxelType::Air)
    }

    /// Whether the voxel blocks visibility through it. Crystal is the one
    /// translucent solid: faces behind it stay visible.
    #[inline]
    pub fn is_opaque(self) -> bool {
        match self {
            VoxelType::Air | VoxelType::Crystal => false,
            VoxelType::Dirt
            | VoxelType::Grass
            | VoxelType::Stone
            | VoxelType::Ore
            | VoxelType::Bedrock => true,
        }
    }

    /// The mesher's neighbor test: a neighbor occludes a face iff it is opaque.
    #[inline]
    pub fn occludes(self) -> bool {
        self.is_opaque()
    }

    /// Bedrock is the immutable floor layer; air has nothing to destroy.
    #[inline]
    pub fn is_destructible(self) -> bool {
        match self {
            VoxelType::Air | VoxelType::Bedrock => false,
            VoxelType::Dirt
            | VoxelType::Grass
            | VoxelType::Stone
            | VoxelType::Ore
            | VoxelType::Crystal => true,
        }
    }

    /// Light emission in `[0, 255]`; only glowing materials are non-zero.
    #[inline]
    pub fn emission(self) -> u8 {
        match self {
            VoxelType::Ore => 40,
            VoxelType::Crystal => 180,
            VoxelType::Air
            | VoxelType::Dirt
            | VoxelType::Grass
            | VoxelType::Stone
            | VoxelType::Bedrock => 0,
        }
    }

    /// Per-vertex RGBA baked into the mesh color buffer.
    pub fn color(self, role: FaceRole) -> [u8; 4] {
        match self {
            // Air never reaches the mesher, but the table stays total.
            VoxelType::Air => [0, 0, 0, 0],
            VoxelType::Dirt => [121, 85, 58, 255],
            VoxelType::Grass => match role {
                FaceRole::Top => [96, 160, 66, 255],
                FaceRole::Bottom => [121, 85, 58, 255],
                FaceRole::Side => [110, 120, 62, 255],
            },
            VoxelType::Stone => [128, 128, 132, 255],
            VoxelType::Ore => [196, 152, 72, 255],
            VoxelType::Crystal => [150, 210, 235, 180],
            VoxelType::Bedrock => [48, 48, 52, 255],
        }
    }
}
