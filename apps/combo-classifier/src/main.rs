//! Combo Classifier Binary
//!
//! Classifies a basket of legs against the configured combination library
//! and prints the result as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Classify the built-in demo basket (eight quarterly futures)
//! cargo run --bin combo-classifier
//!
//! # Classify legs given as arguments
//! cargo run --bin combo-classifier -- "C 1 100 2010-09-17" "P 1 100 2010-09-17"
//! ```
//!
//! # Environment Variables
//!
//! - `COMBO_CONFIG`: Config file path (default: config.yaml, built-in
//!   defaults if that file is absent)
//! - `RUST_LOG`: Log level (default: from config, `info`)

use anyhow::Context;

use combo_classifier::config::{Config, ConfigError, load_config};
use combo_classifier::telemetry::init_tracing;
use combo_classifier::{Classifier, Component};

/// Basket classified when no legs are given on the command line.
const DEMO_BASKET: [&str; 8] = [
    "F 1 2010-09-01",
    "F 1 2010-06-01",
    "F 1 2010-03-01",
    "F 1 2010-03-01",
    "F 1 2010-09-01",
    "F 1 2010-12-01",
    "F 1 2010-12-01",
    "F 1 2010-06-01",
];

fn main() -> anyhow::Result<()> {
    let config = read_config()?;
    init_tracing(&config.observability.logging).context("failed to initialize tracing")?;

    let classifier = Classifier::load_or_empty(&config.library.path)
        .with_max_legs(config.classifier.max_legs);
    tracing::info!(
        library = %config.library.path,
        templates = classifier.len(),
        max_legs = config.classifier.max_legs,
        "Combination library ready"
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let components = if args.is_empty() {
        parse_legs(&DEMO_BASKET)?
    } else {
        parse_legs(&args)?
    };

    let classification = classifier.classify(&components);
    tracing::info!(
        legs = components.len(),
        combination = classification.name(),
        "Basket classified"
    );

    println!("{}", serde_json::to_string_pretty(&classification)?);
    Ok(())
}

/// Load config from `COMBO_CONFIG`, or `config.yaml` if present.
fn read_config() -> anyhow::Result<Config> {
    let explicit = std::env::var("COMBO_CONFIG").ok();
    match load_config(explicit.as_deref()) {
        Ok(config) => Ok(config),
        Err(ConfigError::ReadError { .. }) if explicit.is_none() => Ok(Config::default()),
        Err(e) => Err(e.into()),
    }
}

fn parse_legs<S: AsRef<str>>(legs: &[S]) -> anyhow::Result<Vec<Component>> {
    legs.iter()
        .map(|leg| {
            let leg = leg.as_ref();
            leg.parse::<Component>()
                .with_context(|| format!("invalid leg '{leg}'"))
        })
        .collect()
}
