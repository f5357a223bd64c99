pub mod domain;
pub mod query;
pub mod reference;

pub use reference::ReferenceTables;
