use serde_json::Value;

use super::pools::Pools;
use crate::error::{CrafterError, Result};

/// Default location of the template text inside a style record.
pub const DEFAULT_TEXT_POINTER: &str = "/prompt/positive";

/// A template record of a style.
///
/// The record is an opaque JSON payload (resolution, steps, guidance,
/// negative prompt, seed...). Only the string found at the text pointer is
/// ever rewritten.
///
/// # Invariants
/// - Every `{token}` in `text` resolves to a known category
/// - `references` lists categories in order of first appearance
#[derive(Clone, Debug)]
pub struct Template {
	record: Value,
	pointer: String,
	text: String,
	/// (category name, number of marker occurrences)
	references: Vec<(String, usize)>,
}

/// Returns the tokens of all `{token}` markers in `text`, in order.
///
/// A token is a non-empty run of ASCII alphanumerics, `_` or `-`; other
/// brace pairs are left alone.
pub fn marker_tokens(text: &str) -> Vec<&str> {
	let mut tokens = Vec::new();
	let mut rest = text;
	while let Some(open) = rest.find('{') {
		let after = &rest[open + 1..];
		let end = after
			.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
			.unwrap_or(after.len());
		if end > 0 && after[end..].starts_with('}') {
			tokens.push(&after[..end]);
			rest = &after[end + 1..];
		} else {
			rest = after;
		}
	}
	tokens
}

impl Template {
	/// Builds a template from a style record.
	///
	/// # Errors
	/// - `MissingText` if the record has no string at `pointer`
	/// - `UnknownCategory` if a marker does not match any category
	pub fn new(record: Value, pointer: &str, style: &str, index: usize, pools: &Pools) -> Result<Self> {
		let text = record
			.pointer(pointer)
			.and_then(Value::as_str)
			.ok_or_else(|| CrafterError::MissingText {
				style: style.to_owned(),
				index,
				pointer: pointer.to_owned(),
			})?
			.to_owned();

		let mut references: Vec<(String, usize)> = Vec::new();
		for token in marker_tokens(&text) {
			let (category, _) = pools.resolve_marker(token).ok_or_else(|| CrafterError::UnknownCategory {
				category: token.to_owned(),
				context: format!("template {index} of style '{style}'"),
			})?;
			match references.iter_mut().find(|(name, _)| name == category) {
				Some((_, count)) => *count += 1,
				None => references.push((category.to_owned(), 1)),
			}
		}

		Ok(Self { record, pointer: pointer.to_owned(), text, references })
	}

	/// Raw template text, markers included.
	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn record(&self) -> &Value {
		&self.record
	}

	pub fn references(&self) -> &[(String, usize)] {
		&self.references
	}

	/// Theoretical number of distinct renderings.
	///
	/// Product of the referenced categories' expanded pool sizes, once per
	/// marker occurrence. Saturates instead of overflowing; a template
	/// without markers has a capacity of 1.
	///
	/// # Errors
	/// Returns `UnknownCategory` if a referenced category vanished.
	pub fn capacity(&self, pools: &Pools) -> Result<usize> {
		let mut capacity: usize = 1;
		for (name, count) in &self.references {
			let size = pools.get(name)?.pool_size();
			for _ in 0..*count {
				capacity = capacity.saturating_mul(size);
			}
		}
		Ok(capacity)
	}

	/// Returns a copy of the record with `text` at the text pointer.
	pub fn with_text(&self, text: String) -> Value {
		let mut record = self.record.clone();
		if let Some(slot) = record.pointer_mut(&self.pointer) {
			*slot = Value::String(text);
		}
		record
	}
}
