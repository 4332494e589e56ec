//! The set of type ids that need a catalog entry.
//!
//! This is a single-level union over the reprocessing and blueprint data:
//! a material's own reprocessing chain is not followed unless that material
//! is itself a reprocessing source or blueprint participant.

use std::collections::BTreeSet;

use crate::parser::{BlueprintData, ReprocessingData, TypeId};

/// Every id that is a reprocessing source, a reprocessing material, a
/// blueprint, a blueprint product or a blueprint material.
pub fn relevant_ids(reprocessing: &ReprocessingData, blueprints: &BlueprintData) -> BTreeSet<TypeId> {
    let mut ids: BTreeSet<TypeId> = reprocessing.materials.keys().copied().collect();
    ids.extend(reprocessing.material_ids());
    ids.extend(blueprints.blueprints.keys().copied());
    ids.extend(blueprints.product_ids());
    ids.extend(blueprints.material_ids());
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{BlueprintEntry, MaterialEntry};

    fn material(id: Option<TypeId>, quantity: i64) -> MaterialEntry {
        MaterialEntry {
            material_type_id: id,
            quantity: Some(quantity),
        }
    }

    #[test]
    fn test_union_of_all_roles() {
        let mut reprocessing = ReprocessingData::default();
        reprocessing
            .materials
            .insert(34, vec![material(Some(35), 100), material(None, 3)]);

        let mut blueprints = BlueprintData::default();
        blueprints.blueprints.insert(
            681,
            BlueprintEntry {
                product_type_id: 165,
                manufacturing_time: 600,
                materials: vec![material(Some(34), 86), material(Some(36), 0)],
            },
        );

        let ids = relevant_ids(&reprocessing, &blueprints);
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![34, 35, 36, 165, 681]);
    }

    #[test]
    fn test_empty_inputs() {
        let ids = relevant_ids(&ReprocessingData::default(), &BlueprintData::default());
        assert!(ids.is_empty());
    }
}
