//! `clear` - remove every treasure from the store.

use treasure_hunt::store::TreasureStore;

use super::common::Context;
use crate::error::CliError;

/// Delete all treasures. Requires `yes` to be set.
pub fn run(ctx: &Context, yes: bool) -> Result<(), CliError> {
    let store = ctx.open_store();

    if !yes {
        return Err(CliError::NotConfirmed(format!(
            "This deletes every treasure in {}",
            store.path().display()
        )));
    }

    let count = store.load_all()?.len();
    store.clear()?;

    println!("Cleared {} treasure(s).", count);
    Ok(())
}
