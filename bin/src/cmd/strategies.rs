//! Strategy listing command implementation.

use apogee_eval::StrategyKind;

/// List the built-in strategies.
pub(crate) fn list_strategies() {
    println!("\nAvailable strategies:");
    println!("{}", "-".repeat(60));
    for kind in StrategyKind::ALL {
        println!("  {:15} - {}", kind.name(), kind.description());
    }
    println!();
    println!("Class-style names such as LongShortBPStrategy are accepted too.\n");
}
