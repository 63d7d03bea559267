//! # alba-shared
//!
//! Types and pure logic shared by every Alba crate: the tea/filter/profile
//! enums, identifier generation, the declarative form engine with the tea
//! form schema, and the weather payload with its suggestion rules.

pub mod constants;
pub mod error;
pub mod form;
pub mod ids;
pub mod tea_form;
pub mod types;
pub mod weather;

pub use error::ValidationErrors;
pub use types::{Coordinates, ProfileLevel, TeaFilter, TeaId, TeaType};
