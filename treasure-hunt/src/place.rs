//! Hiding new treasures at the player's position.

use thiserror::Error;

use crate::location::{FixError, LocationFix, RawFix};
use crate::store::{StoreError, Treasure, TreasureStore};

/// Errors that can occur while placing a treasure.
#[derive(Debug, Error)]
pub enum PlaceError {
    /// The treasure name was empty or whitespace.
    #[error("Please enter a treasure name")]
    EmptyName,

    /// No usable location fix is available.
    #[error("Location not available: {0}")]
    Location(#[from] FixError),

    /// The store rejected the new treasure.
    #[error("Failed to save treasure: {0}")]
    Store(#[from] StoreError),
}

/// Hide a treasure at the given fix.
///
/// The name is trimmed and becomes the treasure's id. The fix must carry
/// valid coordinates. Names already in use are rejected by the store.
pub fn place_treasure(
    store: &dyn TreasureStore,
    name: &str,
    fix: RawFix,
) -> Result<Treasure, PlaceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PlaceError::EmptyName);
    }

    let fix = LocationFix::try_from(fix)?;
    let treasure = Treasure::new(name, fix.latitude, fix.longitude);

    store.append(treasure.clone())?;

    tracing::info!(
        treasure = %treasure.id,
        latitude = treasure.latitude,
        longitude = treasure.longitude,
        accuracy_m = fix.accuracy,
        "Treasure placed"
    );

    Ok(treasure)
}
