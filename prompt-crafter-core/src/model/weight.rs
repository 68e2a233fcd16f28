use crate::error::{CrafterError, Result};

/// Upper bound on the size of one expanded category multiset.
const MAX_EXPANDED_LEN: u64 = 1_000_000;

/// Exact, reduced, strictly positive rational weight of a category value.
///
/// Weights are kept as fractions so that markers such as `0.25` or `1/3`
/// expand to integer multiplicities without rounding drift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weight {
	numerator: u64,
	denominator: u64,
}

impl Weight {
	/// Implicit weight of a value without marker.
	pub const ONE: Weight = Weight { numerator: 1, denominator: 1 };

	/// Creates a reduced weight, or `None` if either part is zero.
	pub fn new(numerator: u64, denominator: u64) -> Option<Self> {
		if numerator == 0 || denominator == 0 {
			return None;
		}
		let g = gcd(numerator, denominator);
		Some(Self { numerator: numerator / g, denominator: denominator / g })
	}

	pub fn numerator(&self) -> u64 {
		self.numerator
	}

	pub fn denominator(&self) -> u64 {
		self.denominator
	}
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
	while b != 0 {
		(a, b) = (b, a % b);
	}
	a
}

fn lcm(a: u64, b: u64) -> Option<u64> {
	(a / gcd(a, b)).checked_mul(b)
}

fn is_digits(s: &str) -> bool {
	!s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn invalid(raw: &str, reason: &str) -> CrafterError {
	CrafterError::InvalidWeight { value: raw.to_owned(), reason: reason.to_owned() }
}

/// Parses a numeric weight marker.
///
/// Accepted forms are `3`, `0.25` and `1/3`. Returns `Ok(None)` when the
/// suffix is not numeric at all, so the caller keeps it as part of the value.
///
/// # Errors
/// Returns an error if the number is zero or does not fit in 64 bits.
fn parse_number(raw: &str, suffix: &str) -> Result<Option<Weight>> {
	let suffix = suffix.trim();
	let parse = |digits: &str| digits.parse::<u64>().map_err(|_| invalid(raw, "number too large"));

	let (numerator, denominator) = if let Some((n, d)) = suffix.split_once('/') {
		if !is_digits(n) || !is_digits(d) {
			return Ok(None);
		}
		(parse(n)?, parse(d)?)
	} else if let Some((int, frac)) = suffix.split_once('.') {
		if !is_digits(int) || !is_digits(frac) {
			return Ok(None);
		}
		let exponent = u32::try_from(frac.len()).map_err(|_| invalid(raw, "too many decimals"))?;
		let denominator = 10u64
			.checked_pow(exponent)
			.ok_or_else(|| invalid(raw, "too many decimals"))?;
		(parse(&format!("{int}{frac}"))?, denominator)
	} else if is_digits(suffix) {
		(parse(suffix)?, 1)
	} else {
		return Ok(None);
	};

	Weight::new(numerator, denominator)
		.map(Some)
		.ok_or_else(|| invalid(raw, "weight must be strictly positive"))
}

/// Splits a raw category value into its base text and weight.
///
/// - `"cat:2"` → `("cat", 2)`
/// - `"mist:0.5"` → `("mist", 1/2)`
/// - `"cat"` or `"time:noon"` → whole string, weight 1
///
/// # Errors
/// Returns an error on zero weights, overflowing numbers or an empty base.
pub fn parse_weighted_value(raw: &str) -> Result<(String, Weight)> {
	let (base, weight) = match raw.rsplit_once(':') {
		Some((base, suffix)) => match parse_number(raw, suffix)? {
			Some(weight) => (base.trim_end(), weight),
			None => (raw, Weight::ONE),
		},
		None => (raw, Weight::ONE),
	};

	if base.trim().is_empty() {
		return Err(invalid(raw, "value is empty"));
	}
	Ok((base.to_owned(), weight))
}

/// Expands raw category values into a multiset reflecting their weights.
///
/// All weights are scaled by the least common multiple of their
/// denominators; each base value is then emitted `numerator * lcm / denominator`
/// times. An empty input yields an empty multiset.
///
/// # Errors
/// Returns an error if a value fails to parse or the expansion overflows.
pub fn expand_weighted(values: &[String]) -> Result<Vec<String>> {
	let parsed = values
		.iter()
		.map(|raw| parse_weighted_value(raw))
		.collect::<Result<Vec<_>>>()?;

	let common = parsed.iter().try_fold(1u64, |acc, (base, weight)| {
		lcm(acc, weight.denominator()).ok_or_else(|| invalid(base, "denominators overflow"))
	})?;

	let mut total: u64 = 0;
	let mut multiplicities = Vec::with_capacity(parsed.len());
	for (base, weight) in &parsed {
		let count = weight
			.numerator()
			.checked_mul(common / weight.denominator())
			.ok_or_else(|| invalid(base, "multiplicity overflows"))?;
		total = total.saturating_add(count);
		if total > MAX_EXPANDED_LEN {
			return Err(invalid(base, "expanded pool is too large"));
		}
		multiplicities.push(count);
	}

	let mut expanded = Vec::with_capacity(total as usize);
	for ((base, _), count) in parsed.into_iter().zip(multiplicities) {
		for _ in 0..count {
			expanded.push(base.clone());
		}
	}
	Ok(expanded)
}
