//! Block payloads stored in a chunk cell.
//!
//! An empty cell is air; a present [`Block`] carries its material tag and any
//! side resource (currently a static physics collider) attached to it.

use serde::{Deserialize, Serialize};

/// Number of tiles in the single-row terrain texture atlas.
pub const ATLAS_TILES: u32 = 6;

/// Opaque handle to a per-block collider owned by the physics collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u64);

/// Material tag for a solid block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockKind {
    Bedrock = 0,
    Stone = 1,
    Dirt = 2,
    Grass = 3,
    Sand = 4,
    Snow = 5,
}

impl BlockKind {
    /// All kinds, in atlas order.
    pub const ALL: [BlockKind; 6] = [
        Self::Bedrock,
        Self::Stone,
        Self::Dirt,
        Self::Grass,
        Self::Sand,
        Self::Snow,
    ];

    /// Column of this kind in the texture atlas.
    pub fn atlas_tile(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bedrock => "bedrock",
            Self::Stone => "stone",
            Self::Dirt => "dirt",
            Self::Grass => "grass",
            Self::Sand => "sand",
            Self::Snow => "snow",
        }
    }
}

/// A solid block occupying one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    /// Material tag.
    pub kind: BlockKind,
    /// Static collider created for this block, if any.
    pub collider: Option<ColliderId>,
}

impl Block {
    /// A block with no side resources attached.
    pub const fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            collider: None,
        }
    }

    /// Returns the block with the given collider attached.
    pub const fn with_collider(self, collider: ColliderId) -> Self {
        Self {
            kind: self.kind,
            collider: Some(collider),
        }
    }
}
