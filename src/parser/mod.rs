pub mod record;
pub mod source;

pub use record::*;
pub use source::{load_mapping, RawMapping};

/// Integer identifier of an item or blueprint definition in the SDE
pub type TypeId = i64;
