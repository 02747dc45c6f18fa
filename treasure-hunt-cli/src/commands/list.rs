//! `list` - show placed treasures.

use treasure_hunt::store::{Treasure, TreasureStore};

use super::common::Context;
use crate::error::CliError;

/// Print unfound treasures, or every treasure with `all`.
pub fn run(ctx: &Context, all: bool) -> Result<(), CliError> {
    let store = ctx.open_store();
    let treasures = store.load_all()?;
    let remaining = treasures.iter().filter(|t| !t.found).count();

    if treasures.is_empty() {
        println!("No treasures placed yet.");
        return Ok(());
    }

    println!(
        "{} of {} treasures remaining ({})",
        remaining,
        treasures.len(),
        store.path().display()
    );
    println!();

    for treasure in treasures.iter().filter(|t| all || !t.found) {
        println!("{}", format_row(treasure));
    }
    Ok(())
}

fn format_row(treasure: &Treasure) -> String {
    let mark = if treasure.found { "x" } else { " " };
    format!(
        "  [{}] {:<24} {}",
        mark,
        treasure.id,
        treasure.coordinate()
    )
}
