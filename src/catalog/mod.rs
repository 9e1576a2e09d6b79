pub mod cache;
pub mod unit;

pub use cache::UnitCache;
pub use unit::{Part, TankDefinition, UnitDescriptor, UnitKey};

use crate::error::CatalogError;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Unique identifier for a tank in the catalog.
    pub struct TankId;
}

/// The tank models of one batch run.
///
/// Tanks are referenced by typed IDs and iterated in insertion order, which
/// is also the order of the output rows.
#[derive(Debug, Default)]
pub struct TankCatalog {
    tanks: SlotMap<TankId, TankDefinition>,
    order: Vec<TankId>,
}

impl TankCatalog {
    /// Creates a new, empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tank and returns its ID.
    pub fn add(&mut self, tank: TankDefinition) -> TankId {
        let id = self.tanks.insert(tank);
        self.order.push(id);
        id
    }

    /// Returns a reference to the tank, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID does not belong to this catalog.
    pub fn tank(&self, id: TankId) -> Result<&TankDefinition, CatalogError> {
        self.tanks
            .get(id)
            .ok_or_else(|| CatalogError::TankNotFound(format!("{id:?}")))
    }

    /// Finds a tank by its output label (system followed by name).
    #[must_use]
    pub fn find(&self, label: &str) -> Option<TankId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.tanks[id].unit.label() == label)
    }

    /// Iterates over the tanks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (TankId, &TankDefinition)> {
        self.order.iter().map(move |&id| (id, &self.tanks[id]))
    }

    /// Distinct units that will be measured, in first-use order.
    #[must_use]
    pub fn measured_units(&self) -> Vec<&UnitDescriptor> {
        let mut seen = std::collections::HashSet::new();
        let mut units = Vec::new();
        for (_, tank) in self.iter() {
            let candidates: Vec<&UnitDescriptor> = if tank.is_composite() {
                tank.parts.iter().map(|p| &p.unit).collect()
            } else {
                vec![&tank.unit]
            };
            for unit in candidates {
                if seen.insert(unit.key()) {
                    units.push(unit);
                }
            }
        }
        units
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tanks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_catalog() -> TankCatalog {
        let end_cap = UnitDescriptor::new("CisternXL", 3750);
        let middle = UnitDescriptor::new("CisternXL", 2500);
        let mut catalog = TankCatalog::new();
        catalog.add(TankDefinition::single(UnitDescriptor::new("Cistern", 1500)));
        for total in [10_000, 15_000] {
            catalog.add(
                TankDefinition::segmented(
                    UnitDescriptor::new("CisternXL", total),
                    end_cap.clone(),
                    middle.clone(),
                )
                .unwrap(),
            );
        }
        catalog
    }

    #[test]
    fn iterates_in_insertion_order() {
        let catalog = sample_catalog();
        let labels: Vec<String> = catalog.iter().map(|(_, t)| t.unit.label()).collect();
        assert_eq!(labels, vec!["Cistern1500", "CisternXL10000", "CisternXL15000"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn lookup_by_id_and_label() {
        let catalog = sample_catalog();
        let id = catalog.find("CisternXL15000").unwrap();
        assert_eq!(catalog.tank(id).unwrap().unit.volume_l, 15_000);
        assert!(catalog.find("Nope").is_none());

        let other = TankCatalog::new();
        assert!(other.tank(id).is_err());
    }

    #[test]
    fn shared_parts_are_measured_once() {
        let catalog = sample_catalog();
        let labels: Vec<String> = catalog.measured_units().iter().map(|u| u.label()).collect();
        assert_eq!(labels, vec!["Cistern1500", "CisternXL3750", "CisternXL2500"]);
    }
}
