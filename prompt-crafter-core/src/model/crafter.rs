use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::category::Category;
use super::filler::fill_placeholder;
use super::pools::Pools;
use super::quota::{allocate_slots, slot_counts};
use super::request::GenerationRequest;
use super::template::Template;
use crate::config::CrafterConfig;
use crate::error::{CrafterError, Result};

/// Retry ceiling per slot.
pub const MAX_ATTEMPTS: usize = 10_000;

/// Prompt generation engine.
///
/// # Responsibilities
/// - Own every category pool and the style → templates map
/// - Spread requested prompts evenly over a style's templates
/// - Fill placeholders until each rendering is new for its template,
///   as long as the template's capacity allows it
///
/// # Concurrency
/// Generation mutates the pools, hence `&mut self`. Use one engine per
/// worker, or guard a shared one with a lock so that anti-repetition
/// spans requests.
#[derive(Debug)]
pub struct PromptCrafter {
	pools: Pools,
	styles: BTreeMap<String, Vec<Template>>,
	rng: StdRng,
	seed: u64,
}

impl PromptCrafter {
	/// Builds an engine from a configuration.
	///
	/// # Errors
	/// - Invalid category values or weights
	/// - Templates without text, or referencing unknown categories
	pub fn new(config: CrafterConfig) -> Result<Self> {
		info!("Initializing PromptCrafter...");

		let mut pools = Pools::new();
		for (name, entry) in &config.categories {
			pools.insert(Category::new(name, entry.singular(), entry.values().to_vec())?)?;
		}

		let mut styles = BTreeMap::new();
		for (style, records) in config.styles {
			let templates = records
				.into_iter()
				.enumerate()
				.map(|(index, record)| Template::new(record, &config.text_pointer, &style, index, &pools))
				.collect::<Result<Vec<_>>>()?;
			styles.insert(style, templates);
		}

		debug!("Loaded styles: {:?}", styles.keys().collect::<Vec<_>>());
		debug!("Loaded categories: {:?}", pools.iter().map(Category::name).collect::<Vec<_>>());

		let mut crafter = Self { pools, styles, rng: StdRng::seed_from_u64(0), seed: 0 };
		crafter.set_seed(config.seed);
		Ok(crafter)
	}

	/// Builds an engine from a data folder (`styles.json` + `*.dat` files).
	pub fn from_folder<P: AsRef<Path>>(path: P) -> Result<Self> {
		Self::new(CrafterConfig::from_folder(path)?)
	}

	/// Reseeds the random source and returns the seed in use.
	///
	/// `None` derives the seed from the current time. Pools already
	/// materialized are left as they are.
	pub fn set_seed(&mut self, seed: Option<u64>) -> u64 {
		let seed = seed.unwrap_or_else(|| {
			SystemTime::now()
				.duration_since(UNIX_EPOCH)
				.map(|elapsed| elapsed.as_secs())
				.unwrap_or_default()
		});
		self.rng = StdRng::seed_from_u64(seed);
		self.seed = seed;
		info!("Set seed: {}", seed);
		seed
	}

	pub fn seed(&self) -> u64 {
		self.seed
	}

	pub fn style_names(&self) -> Vec<String> {
		self.styles.keys().cloned().collect()
	}

	pub fn category_names(&self) -> Vec<String> {
		self.pools.iter().map(|category| category.name().to_owned()).collect()
	}

	/// Expanded pool size of every category, by name.
	pub fn category_sizes(&self) -> BTreeMap<String, usize> {
		self.pools
			.iter()
			.map(|category| (category.name().to_owned(), category.pool_size()))
			.collect()
	}

	pub fn pools(&self) -> &Pools {
		&self.pools
	}

	/// Returns the templates of a style.
	///
	/// # Errors
	/// Returns `UnknownStyle` if the style is not configured.
	pub fn templates(&self, style: &str) -> Result<&[Template]> {
		self.styles
			.get(style)
			.map(Vec::as_slice)
			.ok_or_else(|| CrafterError::UnknownStyle(style.to_owned()))
	}

	/// Capacity of the `index`-th template of `style`.
	pub fn capacity(&self, style: &str, index: usize) -> Result<usize> {
		let template = self
			.templates(style)?
			.get(index)
			.ok_or_else(|| CrafterError::InvalidConfig(format!("style '{style}' has no template {index}")))?;
		template.capacity(&self.pools)
	}

	/// Pops one value of a category from its working pool.
	pub fn take_one(&mut self, category: &str) -> Result<String> {
		self.pools.take_one(category, &mut self.rng)
	}

	/// Pops a plural list of distinct values of a category.
	pub fn take_many(&mut self, category: &str) -> Result<Vec<String>> {
		self.pools.take_many(category, &mut self.rng)
	}

	pub fn generate(&mut self, request: &GenerationRequest) -> Result<Vec<Value>> {
		self.generate_prompts(&request.style, request.count)
	}

	/// Generates `count` prompt records for a style.
	///
	/// # Behavior
	/// - Allocates slots evenly over the style's templates
	/// - For each slot, fills the template until the rendering is new for
	///   that template in this batch, or its capacity is used up
	/// - Returns copies of the template records with only the text replaced
	///
	/// # Errors
	/// - `UnknownStyle` if the style is not configured
	/// - `EmptyPool` if a referenced category has no values
	pub fn generate_prompts(&mut self, style: &str, count: usize) -> Result<Vec<Value>> {
		info!("Generating {} prompts for style key: {}", count, style);

		let Self { pools, styles, rng, .. } = self;
		let templates = styles.get(style).ok_or_else(|| {
			error!("'{}' is not a valid style key.", style);
			CrafterError::UnknownStyle(style.to_owned())
		})?;

		if templates.is_empty() || count == 0 {
			warn!("Empty template list or zero prompts requested for style '{}'", style);
			return Ok(Vec::new());
		}

		let slots = allocate_slots(templates.len(), count, rng);
		let counts = slot_counts(&slots, templates.len());
		info!("Template usage counts: {:?}", counts);

		let mut capacities = Vec::with_capacity(templates.len());
		for (template, quota) in templates.iter().zip(&counts) {
			let capacity = template.capacity(pools)?;
			if capacity < *quota {
				warn!(
					"Not enough unique combinations for template '{}' ({} < {}). Duplicates will be allowed.",
					template.text(),
					capacity,
					quota
				);
			}
			capacities.push(capacity);
		}

		let mut accepted: Vec<HashSet<String>> = vec![HashSet::new(); templates.len()];
		let mut prompts = Vec::with_capacity(slots.len());
		for slot in slots {
			let template = &templates[slot];
			let text = render_unique(template, capacities[slot], counts[slot], &mut accepted[slot], pools, rng)?;
			prompts.push(template.with_text(text));
		}

		Ok(prompts)
	}
}

/// Fills every marker of a template once.
fn render(template: &Template, pools: &mut Pools, rng: &mut StdRng) -> Result<String> {
	let mut text = template.text().to_owned();
	for (category, _) in template.references() {
		text = fill_placeholder(&text, category, pools, rng)?;
	}
	Ok(text)
}

/// Renders a template until the result is not in `accepted`.
///
/// - `quota <= capacity`: retries up to `MAX_ATTEMPTS`, so every slot gets
///   a new rendering while one can still be produced
/// - `quota > capacity`: retries at most `capacity` times, duplicates are
///   expected anyway
///
/// Stops right away once `accepted` already holds `capacity` renderings,
/// and keeps the last rendering as a duplicate when attempts run out.
fn render_unique(
	template: &Template,
	capacity: usize,
	quota: usize,
	accepted: &mut HashSet<String>,
	pools: &mut Pools,
	rng: &mut StdRng,
) -> Result<String> {
	let attempts = if quota <= capacity { MAX_ATTEMPTS } else { capacity.clamp(1, MAX_ATTEMPTS) };
	let mut rendered = render(template, pools, rng)?;
	let mut attempt = 1;
	while accepted.contains(&rendered) && accepted.len() < capacity && attempt < attempts {
		rendered = render(template, pools, rng)?;
		attempt += 1;
	}

	if accepted.contains(&rendered) {
		debug!("Accepting duplicate after {} attempt(s): {}", attempt, rendered);
	}
	accepted.insert(rendered.clone());
	Ok(rendered)
}
