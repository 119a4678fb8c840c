//! Entity ID struct synthesis
//!
//! Given a struct marked with `[EntityId]`, generates a strongly typed ID
//! struct from the bundled templates, optionally with a `TypeConverter` and a
//! JSON.NET converter, nested back inside the struct's original scopes.

pub mod backing;
pub mod context;
pub mod error;
pub mod generator;
pub mod host;
pub mod marker;
pub mod settings;
pub mod templates;

// Re-export public API
pub use backing::BackingKind;
pub use context::GenerationContext;
pub use error::{EntityIdError, Result};
pub use generator::EntityIdSyntaxGenerator;
pub use host::{discover, EntityIdGenerator, MarkedSubject};
pub use marker::MarkerConfig;
pub use settings::{GeneratorSettings, SettingsLoader};
pub use templates::bundled_templates;
