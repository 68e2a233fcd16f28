use prompt_crafter_core::{CrafterConfig, GenerationRequest, PromptCrafter};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log engine activity (RUST_LOG=debug shows every fill and refill)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prompt_crafter_core=info".into()),
        )
        .init();

    // Load styles.json and every .dat category file from the "data" directory
    let mut crafter = PromptCrafter::from_folder("./data")?;

    // Fixed seed: the same prompts on every run
    crafter.set_seed(Some(42));

    for style in crafter.style_names() {
        println!("Style '{}' has {} template(s)", style, crafter.templates(&style)?.len());
    }

    // Weighted values are expanded into pools, their size drives the capacity
    for category in crafter.pools().iter() {
        println!("{}: {} values in pool ({} distinct)", category.name(), category.pool_size(), category.distinct());
    }

    // Requesting an unknown style is a configuration error
    match crafter.generate_prompts("unknown", 1) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{}", e),
    }

    // Generate 6 prompts spread evenly over the 3 "general" templates
    let prompts = crafter.generate(&GenerationRequest::new("general", 6))?;
    for (i, prompt) in prompts.iter().enumerate() {
        println!("Prompt {}: {}", i + 1, prompt["prompt"]["positive"]);
    }

    // The full record travels with the text, ready for the inference caller
    if let Some(first) = prompts.first() {
        println!("{}", serde_json::to_string_pretty(first)?);
    }

    // More prompts than the template can produce uniquely: duplicates with a warning
    let config = CrafterConfig::default()
        .with_category("colors", &["red", "blue"])
        .with_style("boxes", vec![json!({ "prompt": { "positive": "A {color} box." } })]);
    let mut small = PromptCrafter::new(config)?;
    for prompt in small.generate_prompts("boxes", 4)? {
        println!("{}", prompt["prompt"]["positive"]);
    }

    Ok(())
}
