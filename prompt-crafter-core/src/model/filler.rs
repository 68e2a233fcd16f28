use rand::Rng;
use tracing::debug;

use super::pools::Pools;
use crate::error::Result;

/// Replaces the markers of one category in `text`.
///
/// - Each `{singular}` occurrence gets its own independently drawn value.
/// - Each `{plural}` occurrence gets a `", "`-joined list of distinct values.
///
/// The text is scanned left to right and inserted values are never
/// rescanned. When the singular and plural tokens are the same string the
/// marker is treated as singular.
///
/// # Errors
/// Returns `UnknownCategory` or `EmptyPool` from the pool manager.
pub fn fill_placeholder<R: Rng + ?Sized>(
	text: &str,
	category: &str,
	pools: &mut Pools,
	rng: &mut R,
) -> Result<String> {
	let (singular, plural) = {
		let category = pools.get(category)?;
		(category.singular_marker(), category.plural_marker())
	};

	let mut filled = String::with_capacity(text.len());
	let mut rest = text;
	loop {
		let next_singular = rest.find(&singular);
		let next_plural = rest.find(&plural);

		let (index, is_singular) = match (next_singular, next_plural) {
			(None, None) => break,
			(Some(s), None) => (s, true),
			(None, Some(p)) => (p, false),
			(Some(s), Some(p)) => if s <= p { (s, true) } else { (p, false) },
		};

		filled.push_str(&rest[..index]);
		if is_singular {
			filled.push_str(&pools.take_one(category, rng)?);
			rest = &rest[index + singular.len()..];
		} else {
			filled.push_str(&pools.take_many(category, rng)?.join(", "));
			rest = &rest[index + plural.len()..];
		}
	}
	filled.push_str(rest);

	debug!("Filled placeholders for '{}': {}", category, filled);
	Ok(filled)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::category::Category;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn pools() -> Pools {
		let mut pools = Pools::new();
		let values = vec!["character1".into(), "character2".into(), "character3".into()];
		pools.insert(Category::new("characters", None, values).unwrap()).unwrap();
		let values = vec!["setting1".into(), "setting2".into(), "setting3".into()];
		pools.insert(Category::new("settings", None, values).unwrap()).unwrap();
		pools
	}

	#[test]
	fn fills_singular_marker() {
		let mut rng = StdRng::seed_from_u64(12345);
		let mut pools = pools();
		let filled = fill_placeholder("A {character} in a {setting}.", "characters", &mut pools, &mut rng).unwrap();
		assert!(!filled.contains("{character}"));
		assert!(filled.contains("{setting}"));
		let word = filled.split(' ').nth(1).unwrap();
		assert!(["character1", "character2", "character3"].contains(&word));
	}

	#[test]
	fn fills_plural_marker_with_a_list() {
		let mut rng = StdRng::seed_from_u64(1);
		let mut pools = pools();
		let filled = fill_placeholder("Some {characters}.", "characters", &mut pools, &mut rng).unwrap();
		assert!(!filled.contains("{characters}"));
		let list = filled.trim_start_matches("Some ").trim_end_matches('.');
		let items: Vec<&str> = list.split(", ").collect();
		assert!((2..=3).contains(&items.len()));
	}

	#[test]
	fn repeated_singular_markers_are_drawn_independently() {
		let mut rng = StdRng::seed_from_u64(3);
		let mut pools = pools();
		// Within one refill cycle the pool has no adjacent repeats, so the
		// two draws always differ.
		pools.refill("characters", &mut rng).unwrap();
		let filled = fill_placeholder("A {character} and another {character}.", "characters", &mut pools, &mut rng)
			.unwrap();
		let words: Vec<&str> = filled.trim_end_matches('.').split(' ').collect();
		assert_eq!(words.len(), 5);
		assert_ne!(words[1], words[4]);
	}

	#[test]
	fn text_without_markers_is_unchanged() {
		let mut rng = StdRng::seed_from_u64(3);
		let mut pools = pools();
		let filled = fill_placeholder("plain prompt", "characters", &mut pools, &mut rng).unwrap();
		assert_eq!(filled, "plain prompt");
	}
}
