//! Typed intermediate records parsed from raw SDE entries.
//!
//! Every `parse_*` function returns `None` for an entry that does not have
//! the expected shape instead of failing; the `extract_*` functions apply
//! them across a whole [`RawMapping`].

use serde_json::Value;
use std::collections::BTreeMap;

use super::source::RawMapping;
use super::TypeId;

/// One material line of a reprocessing or manufacturing recipe.
///
/// Both fields stay optional here; rows are only produced for entries
/// carrying a material id and a positive quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialEntry {
    pub material_type_id: Option<TypeId>,
    pub quantity: Option<i64>,
}

impl MaterialEntry {
    fn from_value(value: &Value, id_field: &str) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            material_type_id: obj.get(id_field).and_then(as_type_id),
            quantity: obj.get("quantity").and_then(Value::as_i64),
        })
    }
}

/// Reprocessing yields keyed by source type id
#[derive(Debug, Clone, Default)]
pub struct ReprocessingData {
    pub materials: BTreeMap<TypeId, Vec<MaterialEntry>>,
}

impl ReprocessingData {
    /// Every material id referenced by any reprocessing entry
    pub fn material_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.materials
            .values()
            .flatten()
            .filter_map(|m| m.material_type_id)
    }
}

/// The manufacturing activity of one blueprint
#[derive(Debug, Clone, PartialEq)]
pub struct BlueprintEntry {
    /// First listed product; further products are ignored
    pub product_type_id: TypeId,
    /// Seconds, 0 when absent
    pub manufacturing_time: i64,
    pub materials: Vec<MaterialEntry>,
}

/// Manufacturing blueprints keyed by blueprint type id
#[derive(Debug, Clone, Default)]
pub struct BlueprintData {
    pub blueprints: BTreeMap<TypeId, BlueprintEntry>,
}

impl BlueprintData {
    pub fn product_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.blueprints.values().map(|b| b.product_type_id)
    }

    pub fn material_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.blueprints
            .values()
            .flat_map(|b| b.materials.iter())
            .filter_map(|m| m.material_type_id)
    }
}

/// Type metadata needed for a catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMeta {
    pub name: String,
    pub group_id: i64,
    pub published: bool,
    pub description: Option<String>,
    pub volume: Option<f64>,
    pub base_price: Option<f64>,
    pub market_group_id: Option<TypeId>,
    pub portion_size: Option<i64>,
}

pub type TypeCatalog = BTreeMap<TypeId, TypeMeta>;

/// Name used when the source has none for a type
pub fn placeholder_name(type_id: TypeId) -> String {
    format!("Unknown_{}", type_id)
}

/// Parse `{materials: [{materialTypeID, quantity}, ...]}`.
///
/// Returns `None` when the record is not a mapping or has no non-empty
/// `materials` sequence.
pub fn parse_reprocessing(record: &Value) -> Option<Vec<MaterialEntry>> {
    let materials = record.get("materials")?.as_array()?;
    if materials.is_empty() {
        return None;
    }

    Some(
        materials
            .iter()
            .filter_map(|m| MaterialEntry::from_value(m, "materialTypeID"))
            .collect(),
    )
}

/// Parse the manufacturing activity out of a blueprint record.
///
/// Returns `None` when there is no manufacturing activity, when its product
/// or material list is empty, or when the first product has no type id.
pub fn parse_blueprint(record: &Value) -> Option<BlueprintEntry> {
    let manufacturing = record.get("activities")?.get("manufacturing")?.as_object()?;

    let products = manufacturing.get("products")?.as_array()?;
    let materials = manufacturing.get("materials")?.as_array()?;
    if products.is_empty() || materials.is_empty() {
        return None;
    }

    let product_type_id = products[0].get("typeID").and_then(as_type_id)?;
    let manufacturing_time = manufacturing
        .get("time")
        .and_then(Value::as_i64)
        .filter(|t| *t >= 0)
        .unwrap_or(0);

    Some(BlueprintEntry {
        product_type_id,
        manufacturing_time,
        materials: materials
            .iter()
            .filter_map(|m| MaterialEntry::from_value(m, "typeID"))
            .collect(),
    })
}

/// Parse type metadata, resolving the display name for `locale`.
///
/// The name falls back from the localized mapping to a plain name value and
/// finally to [`placeholder_name`].
pub fn parse_type(type_id: TypeId, record: &Value, locale: &str) -> Option<TypeMeta> {
    let obj = record.as_object()?;

    let name = match obj.get("name") {
        Some(Value::Object(names)) => names.get(locale).and_then(Value::as_str).map(str::to_string),
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
    .unwrap_or_else(|| placeholder_name(type_id));

    let description = match obj.get("description") {
        Some(Value::Object(texts)) => texts.get(locale).and_then(Value::as_str).map(str::to_string),
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    };

    Some(TypeMeta {
        name,
        group_id: obj.get("groupID").and_then(Value::as_i64).unwrap_or(0),
        published: obj.get("published").and_then(Value::as_bool).unwrap_or(false),
        description,
        volume: obj.get("volume").and_then(Value::as_f64),
        base_price: obj.get("basePrice").and_then(Value::as_f64),
        market_group_id: obj.get("marketGroupID").and_then(as_type_id),
        portion_size: obj.get("portionSize").and_then(Value::as_i64),
    })
}

pub fn extract_reprocessing(raw: &RawMapping) -> ReprocessingData {
    ReprocessingData {
        materials: raw
            .iter()
            .filter_map(|(id, record)| parse_reprocessing(record).map(|m| (*id, m)))
            .collect(),
    }
}

pub fn extract_blueprints(raw: &RawMapping) -> BlueprintData {
    BlueprintData {
        blueprints: raw
            .iter()
            .filter_map(|(id, record)| parse_blueprint(record).map(|b| (*id, b)))
            .collect(),
    }
}

pub fn extract_types(raw: &RawMapping, locale: &str) -> TypeCatalog {
    raw.iter()
        .filter_map(|(id, record)| parse_type(*id, record, locale).map(|t| (*id, t)))
        .collect()
}

/// Type ids must be positive integers; zero counts as absent
fn as_type_id(value: &Value) -> Option<TypeId> {
    value.as_i64().filter(|id| *id > 0)
}
