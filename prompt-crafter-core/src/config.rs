use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{CrafterError, Result};
use crate::io;
use crate::model::template::DEFAULT_TEXT_POINTER;

/// Name of the style file inside a data folder.
pub const STYLES_FILE: &str = "styles.json";

/// Extension of category files inside a data folder.
pub const CATEGORY_EXTENSION: &str = "dat";

/// Configured values of one category.
///
/// Either a plain list of raw values (`["cat:2", "dog"]`) or a detailed
/// entry overriding the singular marker token.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum CategoryEntry {
	Values(Vec<String>),
	Detailed {
		#[serde(default)]
		singular: Option<String>,
		values: Vec<String>,
	},
}

impl CategoryEntry {
	pub fn singular(&self) -> Option<&str> {
		match self {
			CategoryEntry::Values(_) => None,
			CategoryEntry::Detailed { singular, .. } => singular.as_deref(),
		}
	}

	pub fn values(&self) -> &[String] {
		match self {
			CategoryEntry::Values(values) => values,
			CategoryEntry::Detailed { values, .. } => values,
		}
	}
}

/// Declarative configuration of a `PromptCrafter`.
///
/// - `styles`: style name → ordered template records
/// - `categories`: category name → raw values
/// - `text_pointer`: JSON pointer of the template text inside a record
/// - `seed`: optional initial seed
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CrafterConfig {
	#[serde(default)]
	pub styles: BTreeMap<String, Vec<Value>>,

	#[serde(default)]
	pub categories: BTreeMap<String, CategoryEntry>,

	#[serde(default = "default_text_pointer")]
	pub text_pointer: String,

	#[serde(default)]
	pub seed: Option<u64>,
}

fn default_text_pointer() -> String {
	DEFAULT_TEXT_POINTER.to_owned()
}

impl Default for CrafterConfig {
	fn default() -> Self {
		Self {
			styles: BTreeMap::new(),
			categories: BTreeMap::new(),
			text_pointer: default_text_pointer(),
			seed: None,
		}
	}
}

impl CrafterConfig {
	/// Parses a configuration from a JSON string.
	pub fn from_json_str(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Reads a configuration from a JSON file.
	pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let contents = fs::read_to_string(path)?;
		Self::from_json_str(&contents)
	}

	/// Loads a configuration from a data folder.
	///
	/// # Behavior
	/// - Reads `styles.json` (a full `CrafterConfig`, usually only `styles`).
	/// - Adds one category per `*.dat` file, named after the file stem,
	///   one raw value per line.
	///
	/// # Errors
	/// - The path is not a directory or a file cannot be read
	/// - A category is defined both in `styles.json` and as a `.dat` file
	pub fn from_folder<P: AsRef<Path>>(path: P) -> Result<Self> {
		let folder = io::normalize_folder(path.as_ref());
		if !folder.is_dir() {
			return Err(CrafterError::InvalidConfig(format!("expected a directory, got: {}", folder.display())));
		}

		let mut config = Self::from_json_file(folder.join(STYLES_FILE))?;
		for file in io::list_files(&folder, CATEGORY_EXTENSION)? {
			let full_path = folder.join(&file);
			let name = io::get_filename(&full_path)?;
			if config.categories.contains_key(&name) {
				return Err(CrafterError::InvalidConfig(format!("category '{name}' is defined twice")));
			}
			let values = io::read_values(&full_path)?;
			debug!("Loaded category '{}' ({} values) from {}", name, values.len(), full_path.display());
			config.categories.insert(name, CategoryEntry::Values(values));
		}

		Ok(config)
	}

	/// Adds or replaces a category.
	pub fn with_category(mut self, name: &str, values: &[&str]) -> Self {
		let values = values.iter().map(|v| (*v).to_owned()).collect();
		self.categories.insert(name.to_owned(), CategoryEntry::Values(values));
		self
	}

	/// Adds or replaces a style.
	pub fn with_style(mut self, name: &str, records: Vec<Value>) -> Self {
		self.styles.insert(name.to_owned(), records);
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn parses_plain_and_detailed_categories() {
		let config = CrafterConfig::from_json_str(
			r#"{
				"styles": { "general": [ { "prompt": { "positive": "A {mouse}" } } ] },
				"categories": {
					"colors": ["red:2", "blue"],
					"mice": { "singular": "mouse", "values": ["field mouse"] }
				}
			}"#,
		)
		.unwrap();

		assert_eq!(config.text_pointer, DEFAULT_TEXT_POINTER);
		assert_eq!(config.categories["colors"].values(), ["red:2".to_owned(), "blue".to_owned()]);
		assert_eq!(config.categories["colors"].singular(), None);
		assert_eq!(config.categories["mice"].singular(), Some("mouse"));
		assert_eq!(config.styles["general"].len(), 1);
	}

	#[test]
	fn loads_a_data_folder() {
		let dir = tempfile::tempdir().unwrap();
		let styles = json!({ "styles": { "general": [ { "prompt": { "positive": "A {color} box." } } ] } });
		fs::write(dir.path().join(STYLES_FILE), styles.to_string()).unwrap();
		fs::write(dir.path().join("colors.dat"), "red\nblue\n").unwrap();

		let config = CrafterConfig::from_folder(dir.path()).unwrap();
		assert_eq!(config.categories["colors"].values(), ["red".to_owned(), "blue".to_owned()]);
		assert!(config.styles.contains_key("general"));
	}

	#[test]
	fn category_defined_twice_is_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let styles = json!({ "styles": {}, "categories": { "colors": ["red"] } });
		fs::write(dir.path().join(STYLES_FILE), styles.to_string()).unwrap();
		fs::write(dir.path().join("colors.dat"), "blue\n").unwrap();

		assert!(matches!(CrafterConfig::from_folder(dir.path()), Err(CrafterError::InvalidConfig(_))));
	}

	#[test]
	fn missing_folder_is_rejected() {
		assert!(matches!(
			CrafterConfig::from_folder("/definitely/not/here"),
			Err(CrafterError::InvalidConfig(_))
		));
	}
}
