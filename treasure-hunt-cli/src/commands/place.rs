//! `place` - hide a treasure at a coordinate.

use treasure_hunt::location::RawFix;
use treasure_hunt::place::place_treasure;

use super::common::Context;
use crate::error::CliError;

/// Hide a treasure named `name` at the given position.
pub fn run(
    ctx: &Context,
    name: &str,
    lat: f64,
    lon: f64,
    accuracy: Option<f64>,
) -> Result<(), CliError> {
    let store = ctx.open_store();
    let fix = RawFix {
        accuracy,
        ..RawFix::new(lat, lon)
    };

    let treasure = place_treasure(&store, name, fix)?;

    println!("Treasure placed!");
    println!("  Name:     {}", treasure.id);
    println!("  Location: {}", treasure.coordinate());
    if let Some(accuracy) = accuracy {
        println!("  Accuracy: ±{:.1} m", accuracy);
    }
    Ok(())
}
