//! Mapping intermediate records onto catalog rows

use crate::parser::{
    BlueprintData, MaterialEntry, ReprocessingData, TypeCatalog, TypeId, TypeMeta,
};

/// Category written for every type.
///
/// No group to category lookup is performed; every type lands in category 6.
pub const PLACEHOLDER_CATEGORY_ID: i64 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct TypeRow {
    pub type_id: TypeId,
    pub name: String,
    pub description: Option<String>,
    pub group_id: i64,
    pub category_id: i64,
    pub volume: Option<f64>,
    pub base_price: Option<f64>,
    pub market_group_id: Option<TypeId>,
    pub portion_size: Option<i64>,
}

impl TypeRow {
    fn from_meta(type_id: TypeId, meta: &TypeMeta) -> Self {
        Self {
            type_id,
            name: meta.name.clone(),
            description: meta.description.clone(),
            group_id: meta.group_id,
            category_id: PLACEHOLDER_CATEGORY_ID,
            volume: meta.volume,
            base_price: meta.base_price,
            market_group_id: meta.market_group_id,
            portion_size: meta.portion_size,
        }
    }
}

/// `source_type_id` reprocesses into `quantity` units of `material_type_id`
#[derive(Debug, Clone, PartialEq)]
pub struct ReprocessingRow {
    pub source_type_id: TypeId,
    pub material_type_id: TypeId,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlueprintRow {
    pub blueprint_type_id: TypeId,
    pub product_type_id: TypeId,
    pub manufacturing_time: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlueprintMaterialRow {
    pub blueprint_type_id: TypeId,
    pub material_type_id: TypeId,
    pub quantity: i64,
}

/// Why a relevant id got no type row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    NoMetadata,
    Unpublished,
}

/// All rows produced for one relevant id, in write order
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub type_id: TypeId,
    /// `Ok` with the type row, or why there is none
    pub type_row: Result<TypeRow, SkipReason>,
    pub reprocessing: Vec<ReprocessingRow>,
    pub blueprint: Option<BlueprintRow>,
    pub blueprint_materials: Vec<BlueprintMaterialRow>,
}

impl NormalizedRecord {
    pub fn skip_reason(&self) -> Option<SkipReason> {
        self.type_row.as_ref().err().copied()
    }

    /// Name for log messages, falling back to the id placeholder
    pub fn display_name(&self) -> String {
        match &self.type_row {
            Ok(row) => row.name.clone(),
            Err(_) => crate::parser::placeholder_name(self.type_id),
        }
    }
}

/// Builds [`NormalizedRecord`]s from the loaded source data
pub struct RecordTransformer<'a> {
    reprocessing: &'a ReprocessingData,
    blueprints: &'a BlueprintData,
    types: &'a TypeCatalog,
    published_only: bool,
}

impl<'a> RecordTransformer<'a> {
    pub fn new(
        reprocessing: &'a ReprocessingData,
        blueprints: &'a BlueprintData,
        types: &'a TypeCatalog,
    ) -> Self {
        Self {
            reprocessing,
            blueprints,
            types,
            published_only: false,
        }
    }

    /// Withhold type rows for unpublished types
    pub fn published_only(self, published_only: bool) -> Self {
        Self {
            published_only,
            ..self
        }
    }

    pub fn transform(&self, type_id: TypeId) -> NormalizedRecord {
        let type_row = match self.types.get(&type_id) {
            None => Err(SkipReason::NoMetadata),
            Some(meta) if self.published_only && !meta.published => Err(SkipReason::Unpublished),
            Some(meta) => Ok(TypeRow::from_meta(type_id, meta)),
        };

        let reprocessing = self
            .reprocessing
            .materials
            .get(&type_id)
            .map(|materials| {
                valid_materials(materials)
                    .map(|(material_type_id, quantity)| ReprocessingRow {
                        source_type_id: type_id,
                        material_type_id,
                        quantity,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let (blueprint, blueprint_materials) = match self.blueprints.blueprints.get(&type_id) {
            Some(entry) => (
                Some(BlueprintRow {
                    blueprint_type_id: type_id,
                    product_type_id: entry.product_type_id,
                    manufacturing_time: entry.manufacturing_time,
                }),
                valid_materials(&entry.materials)
                    .map(|(material_type_id, quantity)| BlueprintMaterialRow {
                        blueprint_type_id: type_id,
                        material_type_id,
                        quantity,
                    })
                    .collect(),
            ),
            None => (None, Vec::new()),
        };

        NormalizedRecord {
            type_id,
            type_row,
            reprocessing,
            blueprint,
            blueprint_materials,
        }
    }
}

/// Entries with a material id and a positive quantity
fn valid_materials(materials: &[MaterialEntry]) -> impl Iterator<Item = (TypeId, i64)> + '_ {
    materials.iter().filter_map(|m| match (m.material_type_id, m.quantity) {
        (Some(id), Some(quantity)) if quantity > 0 => Some((id, quantity)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::BlueprintEntry;

    fn meta(name: &str, published: bool) -> TypeMeta {
        TypeMeta {
            name: name.to_string(),
            group_id: 18,
            published,
            description: None,
            volume: None,
            base_price: None,
            market_group_id: None,
            portion_size: None,
        }
    }

    fn entry(id: Option<TypeId>, quantity: Option<i64>) -> MaterialEntry {
        MaterialEntry {
            material_type_id: id,
            quantity,
        }
    }

    #[test]
    fn test_reprocessing_rows_drop_invalid_quantities() {
        let mut reprocessing = ReprocessingData::default();
        reprocessing.materials.insert(
            34,
            vec![
                entry(Some(35), Some(100)),
                entry(Some(36), Some(0)),
                entry(Some(37), Some(-4)),
                entry(Some(38), None),
                entry(None, Some(10)),
            ],
        );
        let mut types = TypeCatalog::new();
        types.insert(34, meta("Veldspar", true));
        let blueprints = BlueprintData::default();

        let record = RecordTransformer::new(&reprocessing, &blueprints, &types).transform(34);

        assert_eq!(
            record.reprocessing,
            vec![ReprocessingRow {
                source_type_id: 34,
                material_type_id: 35,
                quantity: 100
            }]
        );
        let row = record.type_row.unwrap();
        assert_eq!(row.category_id, PLACEHOLDER_CATEGORY_ID);
        assert_eq!(row.group_id, 18);
    }

    #[test]
    fn test_blueprint_rows() {
        let mut blueprints = BlueprintData::default();
        blueprints.blueprints.insert(
            681,
            BlueprintEntry {
                product_type_id: 165,
                manufacturing_time: 600,
                materials: vec![entry(Some(34), Some(86)), entry(Some(35), Some(0))],
            },
        );
        let reprocessing = ReprocessingData::default();
        let types = TypeCatalog::new();

        let record = RecordTransformer::new(&reprocessing, &blueprints, &types).transform(681);

        assert_eq!(
            record.blueprint,
            Some(BlueprintRow {
                blueprint_type_id: 681,
                product_type_id: 165,
                manufacturing_time: 600
            })
        );
        assert_eq!(record.blueprint_materials.len(), 1);
        assert_eq!(record.blueprint_materials[0].material_type_id, 34);
        // No metadata: skipped, but dependent rows are still produced
        assert_eq!(record.skip_reason(), Some(SkipReason::NoMetadata));
        assert_eq!(record.display_name(), "Unknown_681");
    }

    #[test]
    fn test_published_only() {
        let reprocessing = ReprocessingData::default();
        let blueprints = BlueprintData::default();
        let mut types = TypeCatalog::new();
        types.insert(34, meta("Tritanium", true));
        types.insert(99, meta("Test Item", false));

        let all = RecordTransformer::new(&reprocessing, &blueprints, &types);
        assert!(all.transform(99).type_row.is_ok());

        let published = all.published_only(true);
        assert!(published.transform(34).type_row.is_ok());
        assert_eq!(published.transform(99).skip_reason(), Some(SkipReason::Unpublished));
    }

    #[test]
    fn test_material_only_id() {
        let reprocessing = ReprocessingData::default();
        let blueprints = BlueprintData::default();
        let mut types = TypeCatalog::new();
        types.insert(35, meta("Tritanium", true));

        let record = RecordTransformer::new(&reprocessing, &blueprints, &types).transform(35);
        assert!(record.type_row.is_ok());
        assert!(record.reprocessing.is_empty());
        assert!(record.blueprint.is_none());
        assert!(record.blueprint_materials.is_empty());
    }
}
