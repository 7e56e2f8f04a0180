use glam::{DQuat, DVec3};

/// Stable handle into an externally owned body registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub usize);

impl BodyHandle {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Identifier of a track shoe within one gear/shoe-chain pairing.
///
/// Equal to the shoe's position in the list handed to the collision driver,
/// so it stays stable for the lifetime of that driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShoeId(pub usize);

impl ShoeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// World-space pose of a rigid body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pose {
    pub position: DVec3,
    pub rotation: DQuat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    #[must_use]
    pub const fn new(position: DVec3, rotation: DQuat) -> Self {
        Self { position, rotation }
    }

    #[must_use]
    pub const fn from_position(position: DVec3) -> Self {
        Self {
            position,
            rotation: DQuat::IDENTITY,
        }
    }

    /// Maps a point from the body frame to world space.
    #[must_use]
    pub fn transform_point(&self, local: DVec3) -> DVec3 {
        self.position + self.rotation * local
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Prior-step reaction impulses used to warm-start the contact solver.
///
/// Slot layout follows the solver's persistent-manifold cache: three
/// force components followed by three torque components.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Reactions(pub [f32; 6]);

impl Reactions {
    pub const SLOTS: usize = 6;
    pub const ZERO: Self = Self([0.0; 6]);

    #[must_use]
    pub const fn new(slots: [f32; 6]) -> Self {
        Self(slots)
    }

    #[must_use]
    pub fn force(&self) -> [f32; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    #[must_use]
    pub fn torque(&self) -> [f32; 3] {
        [self.0[3], self.0[4], self.0[5]]
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    /// Contiguous byte view of a run of warm-start records, ready for upload
    /// to a solver backend.
    #[must_use]
    pub fn slice_as_bytes(records: &[Self]) -> &[u8] {
        bytemuck::cast_slice(records)
    }
}
