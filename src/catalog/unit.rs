use crate::error::{CatalogError, Result};

/// The smallest independently measured tank shape.
///
/// A unit is either a whole tank or one structural part of a composite
/// tank. The display name defaults to the nominal volume.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitDescriptor {
    /// Product line the unit belongs to.
    pub system: String,
    /// Manufacturer-declared volume in liters.
    pub volume_l: u32,
    /// Display name, used with `system` to find the mesh and label output.
    pub name: String,
    /// Rescale the measured curve so it ends at `volume_l`.
    pub scale_to_volume: bool,
}

impl UnitDescriptor {
    /// Creates a descriptor named after its volume, without rescaling.
    #[must_use]
    pub fn new(system: impl Into<String>, volume_l: u32) -> Self {
        Self {
            system: system.into(),
            volume_l,
            name: volume_l.to_string(),
            scale_to_volume: false,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_scale_to_volume(mut self, scale: bool) -> Self {
        self.scale_to_volume = scale;
        self
    }

    /// Identity of the unit for caching.
    #[must_use]
    pub fn key(&self) -> UnitKey {
        UnitKey {
            system: self.system.clone(),
            volume_l: self.volume_l,
            name: self.name.clone(),
        }
    }

    /// Composite name used for output rows: system followed by display name.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}{}", self.system, self.name)
    }
}

/// Structural identity of a unit: system, nominal volume and display name.
///
/// The scale-to-volume flag is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitKey {
    pub system: String,
    pub volume_l: u32,
    pub name: String,
}

/// A unit used `count` times in a composite tank.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Part {
    pub unit: UnitDescriptor,
    pub count: u32,
}

impl Part {
    #[must_use]
    pub fn new(unit: UnitDescriptor, count: u32) -> Self {
        Self { unit, count }
    }
}

/// A tank model: a unit, optionally assembled from parts.
///
/// Without parts the tank is itself a measured unit. With parts its curve
/// is the sum of the part curves weighted by their counts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TankDefinition {
    pub unit: UnitDescriptor,
    pub parts: Vec<Part>,
}

impl TankDefinition {
    /// A tank measured as a single unit.
    #[must_use]
    pub fn single(unit: UnitDescriptor) -> Self {
        Self {
            unit,
            parts: Vec::new(),
        }
    }

    /// A tank assembled from the given parts.
    #[must_use]
    pub fn assembled(unit: UnitDescriptor, parts: Vec<Part>) -> Self {
        Self { unit, parts }
    }

    /// A long tank built from two end caps and as many middle segments as
    /// the declared volume needs.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidAssembly`] if the declared volume is
    /// not two end caps plus a whole number of middles.
    pub fn segmented(
        unit: UnitDescriptor,
        end_cap: UnitDescriptor,
        middle: UnitDescriptor,
    ) -> Result<Self> {
        let caps = 2 * u64::from(end_cap.volume_l);
        let total = u64::from(unit.volume_l);
        let per_middle = u64::from(middle.volume_l);

        let invalid = |reason: &str| -> crate::error::TankfillError {
            CatalogError::InvalidAssembly(format!("{}: {reason}", unit.label())).into()
        };
        if per_middle == 0 {
            return Err(invalid("middle segment has no volume"));
        }
        let Some(rest) = total.checked_sub(caps) else {
            return Err(invalid("end caps alone exceed the declared volume"));
        };
        if rest % per_middle != 0 {
            return Err(invalid("declared volume is not a whole number of middle segments"));
        }
        let middles = u32::try_from(rest / per_middle)
            .map_err(|_| invalid("too many middle segments"))?;

        let mut parts = vec![Part::new(end_cap, 2)];
        if middles > 0 {
            parts.push(Part::new(middle, middles));
        }
        Ok(Self::assembled(unit, parts))
    }

    #[must_use]
    pub fn is_composite(&self) -> bool {
        !self.parts.is_empty()
    }

    /// Sum of the parts' declared volumes, weighted by count.
    #[must_use]
    pub fn assembled_volume_l(&self) -> u64 {
        self.parts
            .iter()
            .map(|p| u64::from(p.unit.volume_l) * u64::from(p.count))
            .sum()
    }

    /// Checks that the definition can produce a meaningful curve.
    ///
    /// Part counts must be at least one and, for composite tanks, the parts
    /// must add up to the declared volume within the relative `tolerance`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidAssembly`] or
    /// [`CatalogError::Irreconcilable`].
    pub fn validate(&self, tolerance: f64) -> Result<()> {
        if self.unit.volume_l == 0 {
            return Err(CatalogError::InvalidAssembly(format!(
                "{}: declared volume is zero",
                self.unit.label()
            ))
            .into());
        }
        if let Some(part) = self.parts.iter().find(|p| p.count == 0) {
            return Err(CatalogError::InvalidAssembly(format!(
                "{}: part {} has a zero count",
                self.unit.label(),
                part.unit.label()
            ))
            .into());
        }
        if !self.is_composite() {
            return Ok(());
        }

        let declared = self.unit.volume_l;
        let assembled = self.assembled_volume_l();
        #[allow(clippy::cast_precision_loss)]
        let deviation = (assembled as f64 - f64::from(declared)).abs() / f64::from(declared);
        if deviation > tolerance {
            return Err(CatalogError::Irreconcilable {
                tank: self.unit.label(),
                declared,
                assembled,
            }
            .into());
        }
        Ok(())
    }
}
