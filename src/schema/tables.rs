//! Table definitions for the catalog consumed by the serving application.
//!
//! Type references between tables are deliberately not foreign keys: the
//! importer may write material and blueprint rows for ids it has no type
//! metadata for.

use super::types::*;

pub static EVE_TYPES: TableSchema = TableSchema {
    name: "eve_types",
    columns: &[
        Column::key("type_id"),
        Column::required("name", ColumnType::Text),
        Column::new("description", ColumnType::Text),
        Column::required("group_id", ColumnType::Integer),
        Column::required("category_id", ColumnType::Integer),
        Column::new("volume", ColumnType::Real),
        Column::new("base_price", ColumnType::Real),
        Column::new("market_group_id", ColumnType::Integer),
        Column::new("portion_size", ColumnType::Integer),
    ],
    indexes: &[Index::on(&["group_id"])],
};

pub static MATERIAL_REPROCESSING: TableSchema = TableSchema {
    name: "material_reprocessing",
    columns: &[
        Column::required("source_type_id", ColumnType::Integer),
        Column::required("material_type_id", ColumnType::Integer),
        Column::required("quantity", ColumnType::Integer).check("quantity > 0"),
    ],
    indexes: &[
        Index::unique(&["source_type_id", "material_type_id"]),
        Index::on(&["material_type_id"]),
    ],
};

pub static BLUEPRINTS: TableSchema = TableSchema {
    name: "blueprints",
    columns: &[
        Column::key("blueprint_type_id"),
        Column::required("product_type_id", ColumnType::Integer),
        Column::required("manufacturing_time", ColumnType::Integer)
            .check("manufacturing_time >= 0"),
    ],
    indexes: &[Index::on(&["product_type_id"])],
};

pub static BLUEPRINT_MATERIALS: TableSchema = TableSchema {
    name: "blueprint_materials",
    columns: &[
        Column::required("blueprint_type_id", ColumnType::Integer),
        Column::required("material_type_id", ColumnType::Integer),
        Column::required("quantity", ColumnType::Integer).check("quantity > 0"),
    ],
    indexes: &[
        Index::unique(&["blueprint_type_id", "material_type_id"]),
        Index::on(&["material_type_id"]),
    ],
};

/// All managed tables, in write order
pub static ALL_TABLES: &[&TableSchema] = &[
    &EVE_TYPES,
    &MATERIAL_REPROCESSING,
    &BLUEPRINTS,
    &BLUEPRINT_MATERIALS,
];

pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}
