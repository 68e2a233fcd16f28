//! Top-level module for the prompt generation engine.
//!
//! Leaf-first:
//! - Weighted expansion of raw category values (`weight`)
//! - No-adjacent-repeat shuffling (`scatter`)
//! - Depletable category pools (`category`, `pools`)
//! - Marker substitution (`filler`) and template parsing (`template`)
//! - Even slot allocation over templates (`quota`)
//! - The `PromptCrafter` engine (`crafter`)

/// High-level engine: owns pools and styles, generates prompt records.
pub mod crafter;

/// A single category: raw values, expanded multiset, working pool.
pub mod category;

/// Placeholder filler for one category.
pub mod filler;

/// Pool manager: category registry, marker table, `take_one` / `take_many`.
pub mod pools;

/// Template slot allocation.
pub mod quota;

/// Generation request accepted by the engine and the HTTP layer.
pub mod request;

/// Scatter sampler.
pub mod scatter;

/// Template records, marker parsing and capacity.
pub mod template;

/// Weight marker parsing and multiset expansion.
pub mod weight;
