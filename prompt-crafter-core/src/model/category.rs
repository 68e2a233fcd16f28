use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use super::scatter::scatter;
use super::weight::expand_weighted;
use crate::error::{CrafterError, Result};

/// A named group of substitutable values.
///
/// A `Category` keeps the raw configured values, their weighted expansion,
/// and the depletable working pool that values are popped from.
///
/// ## Invariants
/// - `working` is always a partially consumed, scatter-ordered permutation
///   of `expanded`
/// - No value contains `{` or `}`
#[derive(Clone, Debug)]
pub struct Category {
	/// Plural name, also the plural marker token (`{characters}`).
	name: String,
	/// Singular marker token (`{character}`).
	singular: String,
	/// Raw values as configured, with optional `:weight` suffixes.
	original_values: Vec<String>,
	/// Base values repeated according to their weights.
	expanded: Vec<String>,
	/// Values still available in the current refill cycle.
	working: Vec<String>,
	/// Number of distinct base values.
	distinct: usize,
}

/// Derives the singular token of a category name by dropping one trailing `s`.
pub fn default_singular(name: &str) -> &str {
	match name.strip_suffix('s') {
		Some(stem) if !stem.is_empty() => stem,
		_ => name,
	}
}

impl Category {
	/// Builds a category from its raw values.
	///
	/// # Errors
	/// Returns an error if a weight marker is invalid or a value
	/// contains braces.
	pub fn new(name: &str, singular: Option<&str>, original_values: Vec<String>) -> Result<Self> {
		if let Some(value) = original_values.iter().find(|v| v.contains(['{', '}'])) {
			return Err(CrafterError::InvalidValue { category: name.to_owned(), value: value.clone() });
		}

		let expanded = expand_weighted(&original_values)?;
		let distinct = expanded.iter().collect::<HashSet<_>>().len();

		Ok(Self {
			name: name.to_owned(),
			singular: singular.unwrap_or_else(|| default_singular(name)).to_owned(),
			original_values,
			expanded,
			working: Vec::new(),
			distinct,
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn singular(&self) -> &str {
		&self.singular
	}

	/// `{singular}`
	pub fn singular_marker(&self) -> String {
		format!("{{{}}}", self.singular)
	}

	/// `{name}`
	pub fn plural_marker(&self) -> String {
		format!("{{{}}}", self.name)
	}

	pub fn original_values(&self) -> &[String] {
		&self.original_values
	}

	pub fn expanded(&self) -> &[String] {
		&self.expanded
	}

	/// Size of the expanded multiset, used for capacity computation.
	pub fn pool_size(&self) -> usize {
		self.expanded.len()
	}

	pub fn distinct(&self) -> usize {
		self.distinct
	}

	/// Values left before the next refill.
	pub fn remaining(&self) -> usize {
		self.working.len()
	}

	/// Replaces the working pool with a freshly scattered copy of `expanded`.
	pub fn refill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
		self.working = scatter(&self.expanded, rng);
		debug!("Refilled '{}' with {} values", self.name, self.working.len());
	}

	/// Pops one value, refilling the working pool first if it is exhausted.
	///
	/// # Errors
	/// Returns `EmptyPool` if the category has no configured values.
	pub fn take<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String> {
		if self.working.is_empty() {
			if self.expanded.is_empty() {
				return Err(CrafterError::EmptyPool(self.name.clone()));
			}
			self.refill(rng);
		}
		self.working
			.pop()
			.ok_or_else(|| CrafterError::EmptyPool(self.name.clone()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn category(name: &str, values: &[&str]) -> Category {
		Category::new(name, None, values.iter().map(|s| s.to_string()).collect()).unwrap()
	}

	#[test]
	fn singular_is_derived_from_the_name() {
		assert_eq!(default_singular("characters"), "character");
		assert_eq!(default_singular("sheep"), "sheep");
		assert_eq!(default_singular("s"), "s");

		let c = category("settings", &["forest"]);
		assert_eq!(c.singular_marker(), "{setting}");
		assert_eq!(c.plural_marker(), "{settings}");
	}

	#[test]
	fn explicit_singular_overrides_the_default() {
		let c = Category::new("mice", Some("mouse"), vec!["field mouse".into()]).unwrap();
		assert_eq!(c.singular_marker(), "{mouse}");
	}

	#[test]
	fn values_with_braces_are_rejected() {
		let err = Category::new("themes", None, vec!["{oops}".into()]).unwrap_err();
		assert!(matches!(err, CrafterError::InvalidValue { .. }));
	}

	#[test]
	fn weights_expand_while_raw_values_are_kept() {
		let c = category("colors", &["red:2", "blue"]);
		assert_eq!(c.original_values(), ["red:2", "blue"]);
		let mut expanded = c.expanded().to_vec();
		expanded.sort();
		assert_eq!(expanded, ["blue", "red", "red"]);
		assert_eq!(c.pool_size(), 3);
		assert_eq!(c.distinct(), 2);
	}

	#[test]
	fn one_cycle_has_no_adjacent_repeats() {
		let mut rng = StdRng::seed_from_u64(42);
		let mut c = category("colors", &["red:2", "blue:2", "green:1", "black"]);
		for _ in 0..100 {
			c.refill(&mut rng);
			let cycle: Vec<String> = (0..c.remaining()).map(|_| c.take(&mut rng).unwrap()).collect();
			assert!(cycle.windows(2).all(|w| w[0] != w[1]), "{cycle:?}");
		}
	}

	#[test]
	fn take_refills_when_exhausted() {
		let mut rng = StdRng::seed_from_u64(1);
		let mut c = category("colors", &["red", "blue"]);
		let drawn: Vec<String> = (0..10).map(|_| c.take(&mut rng).unwrap()).collect();
		assert_eq!(drawn.iter().filter(|v| *v == "red").count(), 5);
		assert_eq!(drawn.iter().filter(|v| *v == "blue").count(), 5);
	}

	#[test]
	fn empty_category_fails_on_take() {
		let mut rng = StdRng::seed_from_u64(1);
		let mut c = category("nothing", &[]);
		assert!(matches!(c.take(&mut rng), Err(CrafterError::EmptyPool(_))));
	}
}
