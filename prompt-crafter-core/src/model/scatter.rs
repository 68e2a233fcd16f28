use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::warn;

/// Reorders a multiset so that no two adjacent elements are equal.
///
/// The multiset is shuffled uniformly, then scanned greedily: an element is
/// placed only if it differs from the last placed one, otherwise it is kept
/// for the next pass. Passes repeat until everything is placed or a pass
/// places nothing.
///
/// # Notes
/// - When one value holds more than half of the multiset, the remainder of
///   the last pass (copies of that value) is dropped and the output is
///   shorter than the input.
/// - A multiset with fewer than 2 distinct values is returned shuffled and
///   complete, since there is nothing to scatter.
pub fn scatter<R: Rng + ?Sized>(multiset: &[String], rng: &mut R) -> Vec<String> {
	let mut remaining = multiset.to_vec();
	remaining.shuffle(rng);

	let distinct = remaining.iter().collect::<HashSet<_>>().len();
	if distinct < 2 {
		return remaining;
	}

	let mut output: Vec<String> = Vec::with_capacity(remaining.len());
	while !remaining.is_empty() {
		let mut leftover = Vec::new();
		let before = output.len();

		for value in remaining {
			if output.last() != Some(&value) {
				output.push(value);
			} else {
				leftover.push(value);
			}
		}

		if output.len() == before {
			warn!("Scatter dropped {} trailing duplicate(s)", leftover.len());
			break;
		}
		remaining = leftover;
	}

	output
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use std::io::Write;
	use std::sync::{Arc, Mutex};

	fn strings(values: &[&str]) -> Vec<String> {
		values.iter().map(|s| s.to_string()).collect()
	}

	fn has_adjacent_repeat(values: &[String]) -> bool {
		values.windows(2).any(|w| w[0] == w[1])
	}

	#[test]
	fn balanced_multiset_is_kept_whole_without_repeats() {
		let mut rng = StdRng::seed_from_u64(7);
		let multiset = strings(&["a", "a", "b", "b", "c", "c", "d"]);
		for _ in 0..200 {
			let out = scatter(&multiset, &mut rng);
			assert!(!has_adjacent_repeat(&out));
			assert!(out.len() >= multiset.len() - 1);
		}
	}

	#[test]
	fn output_is_a_sub_multiset_of_the_input() {
		let mut rng = StdRng::seed_from_u64(11);
		let multiset = strings(&["x", "y", "y", "z", "z", "z"]);
		for _ in 0..200 {
			let out = scatter(&multiset, &mut rng);
			for value in ["x", "y", "z"] {
				let got = out.iter().filter(|v| *v == value).count();
				let max = multiset.iter().filter(|v| *v == value).count();
				assert!(got <= max);
				assert!(got >= 1, "every distinct value survives a refill");
			}
		}
	}

	#[test]
	fn single_value_multiset_is_not_trimmed() {
		let mut rng = StdRng::seed_from_u64(3);
		let out = scatter(&strings(&["only", "only", "only"]), &mut rng);
		assert_eq!(out.len(), 3);
	}

	#[test]
	fn dominated_multiset_under_fills_within_bounds() {
		// "a" holds 4 of 5 slots: at most "a b a" survives plus trailing drops.
		let mut rng = StdRng::seed_from_u64(5);
		let multiset = strings(&["a", "a", "a", "a", "b"]);
		let mut total_a = 0;
		let mut total_b = 0;
		for _ in 0..500 {
			let out = scatter(&multiset, &mut rng);
			assert!(!has_adjacent_repeat(&out));
			assert!(out.len() >= 2 && out.len() <= 3);
			total_a += out.iter().filter(|v| *v == "a").count();
			total_b += out.iter().filter(|v| *v == "b").count();
		}
		assert_eq!(total_b, 500);
		assert!(total_a >= 500 && total_a <= 1000);
	}

	/// Collects formatted log lines.
	#[derive(Clone, Default)]
	struct Captured(Arc<Mutex<Vec<u8>>>);

	impl Write for Captured {
		fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
			self.0.lock().unwrap().extend_from_slice(buf);
			Ok(buf.len())
		}

		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn under_fill_is_logged_as_a_warning() {
		let captured = Captured::default();
		let writer = captured.clone();
		let subscriber = tracing_subscriber::fmt()
			.with_max_level(tracing::Level::WARN)
			.with_ansi(false)
			.with_writer(move || writer.clone())
			.finish();

		let mut rng = StdRng::seed_from_u64(5);
		let out = tracing::subscriber::with_default(subscriber, || {
			scatter(&strings(&["a", "a", "a", "a", "b"]), &mut rng)
		});
		assert!(out.len() < 5);

		let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
		assert!(logs.contains("WARN"), "{logs}");
		assert!(logs.contains("Scatter dropped"), "{logs}");
	}

	#[test]
	fn empty_multiset_stays_empty() {
		let mut rng = StdRng::seed_from_u64(1);
		assert!(scatter(&[], &mut rng).is_empty());
	}
}
