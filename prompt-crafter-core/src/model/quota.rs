use rand::Rng;
use rand::seq::SliceRandom;

/// Assigns each of `count` generation slots to one of `template_count` templates.
///
/// Returns the template index of every slot.
///
/// - `count >= template_count`: every template gets `count / template_count`
///   slots, then the `count % template_count` extra slots go to the first
///   templates of a shuffled order.
/// - `count < template_count`: a shuffled selection of `count` distinct
///   templates, one slot each.
/// - Either value at zero: no slots.
pub fn allocate_slots<R: Rng + ?Sized>(template_count: usize, count: usize, rng: &mut R) -> Vec<usize> {
	if template_count == 0 || count == 0 {
		return Vec::new();
	}

	let mut order: Vec<usize> = (0..template_count).collect();
	order.shuffle(rng);

	if count < template_count {
		order.truncate(count);
		return order;
	}

	let base = count / template_count;
	let remainder = count % template_count;

	let mut slots = Vec::with_capacity(count);
	for index in 0..template_count {
		slots.extend(std::iter::repeat_n(index, base));
	}
	slots.extend_from_slice(&order[..remainder]);
	slots
}

/// Counts how many slots each template received.
pub fn slot_counts(slots: &[usize], template_count: usize) -> Vec<usize> {
	let mut counts = vec![0; template_count];
	for &slot in slots {
		if let Some(count) = counts.get_mut(slot) {
			*count += 1;
		}
	}
	counts
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn empty_inputs_give_no_slots() {
		let mut rng = StdRng::seed_from_u64(0);
		assert!(allocate_slots(0, 5, &mut rng).is_empty());
		assert!(allocate_slots(3, 0, &mut rng).is_empty());
	}

	#[test]
	fn three_templates_ten_slots_is_even() {
		let mut rng = StdRng::seed_from_u64(0);
		for _ in 0..100 {
			let slots = allocate_slots(3, 10, &mut rng);
			assert_eq!(slots.len(), 10);
			let counts = slot_counts(&slots, 3);
			assert_eq!(counts.iter().sum::<usize>(), 10);
			assert!(counts.iter().all(|c| (3..=4).contains(c)), "{counts:?}");
		}
	}

	#[test]
	fn coverage_never_differs_by_more_than_one() {
		let mut rng = StdRng::seed_from_u64(17);
		for templates in 1..8 {
			for count in templates..40 {
				let counts = slot_counts(&allocate_slots(templates, count, &mut rng), templates);
				let base = count / templates;
				assert_eq!(counts.iter().sum::<usize>(), count);
				assert!(counts.iter().all(|c| *c == base || *c == base + 1));
			}
		}
	}

	#[test]
	fn fewer_slots_than_templates_picks_distinct_templates() {
		let mut rng = StdRng::seed_from_u64(4);
		let slots = allocate_slots(4, 2, &mut rng);
		assert_eq!(slots.len(), 2);
		assert_ne!(slots[0], slots[1]);
		assert!(slots.iter().all(|s| *s < 4));
	}

	#[test]
	fn remainder_is_spread_across_templates() {
		let mut rng = StdRng::seed_from_u64(8);
		let mut extra = [0usize; 3];
		for _ in 0..300 {
			let counts = slot_counts(&allocate_slots(3, 4, &mut rng), 3);
			for (index, count) in counts.iter().enumerate() {
				if *count == 2 {
					extra[index] += 1;
				}
			}
		}
		assert!(extra.iter().all(|e| *e > 50), "{extra:?}");
	}
}
