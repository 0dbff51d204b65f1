//! Signal listing command implementation.

use apogee_signals::registry::{DEFAULT_SIGNAL, available_categories, signals_by_category};

/// List available signals, optionally with details.
pub(crate) fn list_signals(verbose: bool) {
    println!("\nAvailable signals:\n");

    for category in available_categories() {
        println!("{category:?}:");
        if verbose {
            println!("  {}", category.description());
        }
        println!("{}", "-".repeat(60));

        for info in signals_by_category(&category) {
            if verbose {
                println!(
                    "  {:36} - {} (warm-up: {} periods, metrics: {})",
                    info.name,
                    info.description,
                    info.warmup,
                    info.metrics.join(", ")
                );
            } else {
                println!("  {}", info.name);
            }
        }
        println!();
    }

    println!("Ranked strategies use {DEFAULT_SIGNAL} unless --signal is given.");
    if !verbose {
        println!("Use --verbose for detailed signal descriptions.");
    }
    println!();
}
