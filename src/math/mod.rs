pub mod intersect_3d;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Length unit a mesh is modelled in.
///
/// Tank meshes arrive in whatever unit the CAD export used; the unit decides
/// how a voxel volume maps to liters (one liter is one cubic decimeter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthUnit {
    Meter,
    Decimeter,
    Centimeter,
    Millimeter,
}

impl LengthUnit {
    /// Length of one unit in meters.
    #[must_use]
    pub fn meters(self) -> f64 {
        match self {
            Self::Meter => 1.0,
            Self::Decimeter => 0.1,
            Self::Centimeter => 0.01,
            Self::Millimeter => 0.001,
        }
    }

    /// Length of one unit in decimeters.
    #[must_use]
    pub fn decimeters(self) -> f64 {
        match self {
            Self::Meter => 10.0,
            Self::Decimeter => 1.0,
            Self::Centimeter => 0.1,
            Self::Millimeter => 0.01,
        }
    }

    /// Volume in liters of a cube with the given edge length in this unit.
    #[must_use]
    pub fn cube_liters(self, edge: f64) -> f64 {
        let dm = edge * self.decimeters();
        dm * dm * dm
    }
}
