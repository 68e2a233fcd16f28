//! Template-based prompt generation library.
//!
//! This crate provides the prompt crafting engine, including:
//! - Weighted, non-repeating value pools per category
//! - Even allocation of requested prompts over a style's templates
//! - Uniqueness of renderings up to each template's capacity
//! - Configuration loading from JSON and `.dat` value files

/// Engine and its building blocks.
pub mod model;

/// Declarative configuration (styles, categories) and loaders.
pub mod config;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use config::{CategoryEntry, CrafterConfig};
pub use error::{CrafterError, Result};
pub use model::crafter::PromptCrafter;
pub use model::request::GenerationRequest;
