//! Block face directions and sets of them.

use lattice_voxel::VoxelCoord;

/// Direction a block face points in. The discriminant is the face's bit in a [`FaceSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FaceDirection {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl FaceDirection {
    pub const ALL: [FaceDirection; 6] = [
        Self::PosX,
        Self::NegX,
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
    ];

    /// Unit step toward the cell this face touches.
    pub fn delta(self) -> [i32; 3] {
        match self {
            Self::PosX => [1, 0, 0],
            Self::NegX => [-1, 0, 0],
            Self::PosY => [0, 1, 0],
            Self::NegY => [0, -1, 0],
            Self::PosZ => [0, 0, 1],
            Self::NegZ => [0, 0, -1],
        }
    }

    pub fn normal(self) -> [f32; 3] {
        self.delta().map(|d| d as f32)
    }

    /// Cell on the other side of this face of `at`, possibly outside the chunk.
    pub fn neighbor_cell(self, at: VoxelCoord) -> [i32; 3] {
        let [dx, dy, dz] = self.delta();
        [at.x as i32 + dx, at.y as i32 + dy, at.z as i32 + dz]
    }

    /// `(normal_axis, u_axis, v_axis)` with `u × v` along the positive normal
    /// axis (0 = X, 1 = Y, 2 = Z).
    pub fn quad_axes(self) -> (usize, usize, usize) {
        match self {
            Self::PosX | Self::NegX => (0, 1, 2),
            Self::PosY | Self::NegY => (1, 2, 0),
            Self::PosZ | Self::NegZ => (2, 0, 1),
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, Self::PosX | Self::PosY | Self::PosZ)
    }
}

/// The visible faces of one block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceSet(u8);

impl FaceSet {
    pub const EMPTY: Self = Self(0);
    pub const FULL: Self = Self(0b11_1111);

    pub fn contains(self, direction: FaceDirection) -> bool {
        self.0 & (1 << direction as u8) != 0
    }

    pub fn insert(&mut self, direction: FaceDirection) {
        self.0 |= 1 << direction as u8;
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in [`FaceDirection::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = FaceDirection> {
        FaceDirection::ALL
            .into_iter()
            .filter(move |dir| self.contains(*dir))
    }
}

impl FromIterator<FaceDirection> for FaceSet {
    fn from_iter<I: IntoIterator<Item = FaceDirection>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for dir in iter {
            set.insert(dir);
        }
        set
    }
}
