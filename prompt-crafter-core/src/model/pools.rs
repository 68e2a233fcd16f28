use std::collections::{BTreeMap, HashMap};

use rand::Rng;

use super::category::Category;
use crate::error::{CrafterError, Result};

/// Kind of placeholder a marker token stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerKind {
	/// `{character}`: one value.
	Singular,
	/// `{characters}`: a comma-joined list of 2 to 4 values.
	Plural,
}

/// Owns every category and the marker table resolving `{token}`s to them.
#[derive(Clone, Debug, Default)]
pub struct Pools {
	categories: BTreeMap<String, Category>,
	/// Marker token (without braces) → (category name, kind).
	markers: HashMap<String, (String, MarkerKind)>,
}

impl Pools {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a category and its marker tokens.
	///
	/// A category whose singular equals its name only gets the singular
	/// marker.
	///
	/// # Errors
	/// - The category name is already registered
	/// - One of its tokens is already a marker of another category
	pub fn insert(&mut self, category: Category) -> Result<()> {
		let name = category.name().to_owned();
		if self.categories.contains_key(&name) {
			return Err(CrafterError::InvalidConfig(format!("category '{name}' is defined twice")));
		}
		for token in [category.singular(), name.as_str()] {
			if let Some((owner, _)) = self.markers.get(token) {
				return Err(CrafterError::InvalidConfig(format!(
					"marker '{{{token}}}' of category '{name}' is already used by category '{owner}'"
				)));
			}
		}

		self.markers
			.insert(category.singular().to_owned(), (name.clone(), MarkerKind::Singular));
		self.markers
			.entry(name.clone())
			.or_insert_with(|| (name.clone(), MarkerKind::Plural));
		self.categories.insert(name, category);
		Ok(())
	}

	/// Resolves a marker token (without braces) to its category and kind.
	pub fn resolve_marker(&self, token: &str) -> Option<(&str, MarkerKind)> {
		self.markers.get(token).map(|(name, kind)| (name.as_str(), *kind))
	}

	pub fn contains(&self, name: &str) -> bool {
		self.categories.contains_key(name)
	}

	/// Returns a category by name.
	///
	/// # Errors
	/// Returns `UnknownCategory` if the name is not configured.
	pub fn get(&self, name: &str) -> Result<&Category> {
		self.categories.get(name).ok_or_else(|| unknown(name))
	}

	fn get_mut(&mut self, name: &str) -> Result<&mut Category> {
		self.categories.get_mut(name).ok_or_else(|| unknown(name))
	}

	/// Iterates over categories in name order.
	pub fn iter(&self) -> impl Iterator<Item = &Category> {
		self.categories.values()
	}

	/// Forces a fresh scatter of a category's working pool.
	pub fn refill<R: Rng + ?Sized>(&mut self, name: &str, rng: &mut R) -> Result<()> {
		self.get_mut(name)?.refill(rng);
		Ok(())
	}

	/// Pops a single value from a category.
	///
	/// # Errors
	/// Returns `UnknownCategory` or `EmptyPool`.
	pub fn take_one<R: Rng + ?Sized>(&mut self, name: &str, rng: &mut R) -> Result<String> {
		self.get_mut(name)?.take(rng)
	}

	/// Pops a list of distinct values for a plural marker.
	///
	/// The list length is `min(distinct values, uniform 2..=4)`. A draw that
	/// repeats a value already in the list is consumed and skipped. Every
	/// refill cycle holds each distinct value at least once, so this ends
	/// within two refills.
	///
	/// # Errors
	/// Returns `UnknownCategory` or `EmptyPool`.
	pub fn take_many<R: Rng + ?Sized>(&mut self, name: &str, rng: &mut R) -> Result<Vec<String>> {
		let category = self.get_mut(name)?;
		let k = category.distinct().min(rng.random_range(2..=4));
		if k == 0 {
			return Err(CrafterError::EmptyPool(name.to_owned()));
		}

		let mut values: Vec<String> = Vec::with_capacity(k);
		while values.len() < k {
			let value = category.take(rng)?;
			if !values.contains(&value) {
				values.push(value);
			}
		}
		Ok(values)
	}
}

fn unknown(name: &str) -> CrafterError {
	CrafterError::UnknownCategory { category: name.to_owned(), context: "pool lookup".to_owned() }
}
