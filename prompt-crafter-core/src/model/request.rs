use serde::{Deserialize, Serialize};

/// A request for `count` prompts of one style.
///
/// Consumed synchronously by `PromptCrafter::generate`. The alias
/// `num_images` matches the body of the `text_to_style` endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
	/// Style key in the style configuration.
	pub style: String,

	/// Number of prompt records to return.
	#[serde(default = "default_count", alias = "num_images")]
	pub count: usize,
}

fn default_count() -> usize {
	1
}

impl GenerationRequest {
	pub fn new(style: &str, count: usize) -> Self {
		Self { style: style.to_owned(), count }
	}
}
