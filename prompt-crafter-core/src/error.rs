use thiserror::Error;

/// Result type for prompt crafting operations.
pub type Result<T> = std::result::Result<T, CrafterError>;

/// Errors raised while configuring the engine or generating prompts.
///
/// Every variant except `Io` and `Json` is a configuration error: the
/// style or category data is wrong and retrying will not help.
#[derive(Error, Debug)]
pub enum CrafterError {
	#[error("'{0}' is not a valid style key")]
	UnknownStyle(String),

	#[error("unknown category '{category}' referenced in {context}")]
	UnknownCategory { category: String, context: String },

	#[error("category '{0}' has no values to sample from")]
	EmptyPool(String),

	#[error("invalid weight in '{value}': {reason}")]
	InvalidWeight { value: String, reason: String },

	#[error("value '{value}' of category '{category}' must not contain braces")]
	InvalidValue { category: String, value: String },

	#[error("template {index} of style '{style}' has no text at '{pointer}'")]
	MissingText { style: String, index: usize, pointer: String },

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}
