//! Layers command - list the built-in imagery layers.

use console::style;
use terrascope::layer::LayerRegistry;

use crate::error::CliError;

/// Run the layers command.
pub fn run() -> Result<(), CliError> {
    let registry = LayerRegistry::builtin();
    let width = registry.iter().map(|l| l.id.len()).max().unwrap_or(0);

    println!("Available Layers");
    println!("================");
    println!();
    for layer in registry.iter() {
        println!(
            "  {:<width$}  {} - {}",
            style(layer.id).cyan(),
            layer.name,
            layer.description,
            width = width
        );
    }
    Ok(())
}
