//! The proximity tracker state machine.

use std::sync::Arc;
use std::time::Instant;

use super::clock::{Clock, SystemClock};
use super::config::TrackerConfig;
use super::state::{HuntPhase, ProximityHint, TrackerError, UpdateOutcome};
use crate::geo::haversine_distance;
use crate::location::{LocationFix, RawFix};
use crate::store::{StoreResult, Treasure, TreasureStore};

/// Reconciles location fixes against the active treasures of a hunt.
///
/// Holds a transient copy of the unfound treasures (insertion ordered) and
/// raises a one-shot found transition when a fix lands within the find
/// radius of one of them. While a found treasure is pending, fixes are
/// ignored until [`acknowledge_found`](Self::acknowledge_found) is called.
///
/// # Matching policy
///
/// Treasures are compared in insertion order and the **first** one within
/// the find radius wins, even if a later one is closer. The rest of that
/// pass is skipped.
///
/// # Usage
///
/// ```ignore
/// let mut tracker = ProximityTracker::new(store);
/// tracker.load_from_store()?;
///
/// match tracker.on_location_update(fix) {
///     UpdateOutcome::Found { treasure, .. } => show_overlay(&treasure),
///     UpdateOutcome::Evaluated { nearest_distance } => show_distance(nearest_distance),
///     _ => {}
/// }
/// ```
pub struct ProximityTracker {
    config: TrackerConfig,
    store: Arc<dyn TreasureStore>,
    clock: Arc<dyn Clock>,
    /// Unfound treasures for this session (insertion order).
    active: Vec<Treasure>,
    nearest_distance: Option<f64>,
    found: Option<Treasure>,
    /// When the last evaluation pass ran (for debouncing).
    last_evaluation: Option<Instant>,
}

impl ProximityTracker {
    /// Create an idle tracker with default configuration and the system clock.
    pub fn new(store: Arc<dyn TreasureStore>) -> Self {
        Self::with_config(store, Arc::new(SystemClock), TrackerConfig::default())
    }

    /// Create an idle tracker with explicit clock and configuration.
    pub fn with_config(
        store: Arc<dyn TreasureStore>,
        clock: Arc<dyn Clock>,
        config: TrackerConfig,
    ) -> Self {
        Self {
            config,
            store,
            clock,
            active: Vec::new(),
            nearest_distance: None,
            found: None,
            last_evaluation: None,
        }
    }

    /// Seed the hunt with a set of treasures.
    ///
    /// Only unfound treasures are kept, in the given order; a repeated id
    /// keeps its first occurrence. Clears any pending found treasure and the
    /// nearest distance.
    pub fn initialize(&mut self, treasures: impl IntoIterator<Item = Treasure>) {
        let mut active: Vec<Treasure> = Vec::new();
        for treasure in treasures {
            if treasure.found || active.iter().any(|t| t.id == treasure.id) {
                continue;
            }
            active.push(treasure);
        }

        self.active = active;
        self.found = None;
        self.nearest_distance = None;

        tracing::info!(count = self.active.len(), "Hunt initialized");
    }

    /// Seed the hunt from the store's unfound treasures.
    ///
    /// On failure the current state is left untouched and the error is
    /// returned for the caller to surface.
    pub fn load_from_store(&mut self) -> StoreResult<usize> {
        match self.store.load_unfound() {
            Ok(treasures) => {
                self.initialize(treasures);
                Ok(self.active.len())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load treasures, keeping current hunt");
                Err(e)
            }
        }
    }

    /// Process a fix as delivered by a location provider.
    ///
    /// Fixes with missing or invalid coordinates are logged and rejected.
    pub fn on_raw_fix(&mut self, raw: RawFix) -> UpdateOutcome {
        match LocationFix::try_from(raw) {
            Ok(fix) => self.on_location_update(fix),
            Err(e) => {
                tracing::warn!(error = %e, "Rejected malformed location fix");
                UpdateOutcome::Rejected(e)
            }
        }
    }

    /// Process a location fix.
    ///
    /// Evaluation is skipped when the fix is invalid, no treasures are
    /// loaded, a found treasure awaits acknowledgment, or the previous pass
    /// ran less than the debounce interval ago.
    pub fn on_location_update(&mut self, fix: LocationFix) -> UpdateOutcome {
        if let Err(e) = fix.validate() {
            tracing::warn!(error = %e, "Rejected invalid location fix");
            return UpdateOutcome::Rejected(e);
        }

        match self.phase() {
            HuntPhase::Idle => return UpdateOutcome::Idle,
            HuntPhase::Found => return UpdateOutcome::Paused,
            HuntPhase::Hunting => {}
        }

        let now = self.clock.now();
        if let Some(last) = self.last_evaluation {
            if now.saturating_duration_since(last) < self.config.debounce_interval {
                return UpdateOutcome::Debounced;
            }
        }
        self.last_evaluation = Some(now);

        self.evaluate(&fix)
    }

    /// One evaluation pass over the active treasures.
    fn evaluate(&mut self, fix: &LocationFix) -> UpdateOutcome {
        let mut nearest = f64::INFINITY;
        let mut hit: Option<(usize, f64)> = None;

        for (index, treasure) in self.active.iter().enumerate() {
            let distance =
                haversine_distance(fix.latitude, fix.longitude, treasure.latitude, treasure.longitude);

            tracing::debug!(treasure = %treasure.id, distance_m = distance, "Distance to treasure");

            if distance < nearest {
                nearest = distance;
            }

            if distance <= self.config.find_radius_m {
                hit = Some((index, distance));
                break;
            }
        }

        self.nearest_distance = Some(nearest);

        let Some((index, distance)) = hit else {
            return UpdateOutcome::Evaluated {
                nearest_distance: nearest,
            };
        };

        let treasure = self.active[index].clone();
        tracing::info!(
            treasure = %treasure.id,
            distance_m = distance,
            accuracy_m = fix.accuracy,
            "Treasure found"
        );
        self.found = Some(treasure.clone());

        let persisted = match self.store.mark_found(&treasure.id) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    treasure = %treasure.id,
                    error = %e,
                    "Failed to mark treasure as found, continuing hunt"
                );
                false
            }
        };

        UpdateOutcome::Found {
            treasure,
            distance,
            persisted,
        }
    }

    /// Dismiss the found treasure and resume hunting.
    ///
    /// Removes the found treasure from the active set and clears the nearest
    /// distance (recomputed on the next evaluated fix).
    ///
    /// # Errors
    ///
    /// [`TrackerError::NothingFound`] if no found treasure is pending. The
    /// tracker state is not changed in that case.
    pub fn acknowledge_found(&mut self) -> Result<Treasure, TrackerError> {
        let treasure = self.found.take().ok_or(TrackerError::NothingFound)?;

        self.active.retain(|t| t.id != treasure.id);
        self.nearest_distance = None;

        tracing::info!(
            treasure = %treasure.id,
            remaining = self.active.len(),
            "Found treasure acknowledged"
        );

        Ok(treasure)
    }

    /// Clear all state, returning to `Idle`.
    pub fn reset(&mut self) {
        self.active.clear();
        self.nearest_distance = None;
        self.found = None;
        self.last_evaluation = None;
        tracing::debug!("Tracker reset");
    }

    /// Current hunt phase.
    pub fn phase(&self) -> HuntPhase {
        if self.found.is_some() {
            HuntPhase::Found
        } else if self.active.is_empty() {
            HuntPhase::Idle
        } else {
            HuntPhase::Hunting
        }
    }

    /// Distance to the nearest active treasure from the last evaluated fix.
    pub fn nearest_distance(&self) -> Option<f64> {
        self.nearest_distance
    }

    /// The found treasure awaiting acknowledgment.
    pub fn found_treasure(&self) -> Option<&Treasure> {
        self.found.as_ref()
    }

    /// Active treasures in insertion order.
    pub fn active_treasures(&self) -> &[Treasure] {
        &self.active
    }

    /// Number of treasures left, including a found one not yet acknowledged.
    pub fn remaining(&self) -> usize {
        self.active.len()
    }

    /// Proximity hint for the current nearest distance.
    pub fn hint(&self) -> Option<ProximityHint> {
        self.nearest_distance.map(|d| {
            ProximityHint::from_distance(d, self.config.find_radius_m, self.config.warm_radius_m)
        })
    }

    /// Tracker configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

impl std::fmt::Debug for ProximityTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProximityTracker")
            .field("phase", &self.phase())
            .field("active", &self.active.len())
            .field("nearest_distance", &self.nearest_distance)
            .field("found", &self.found.as_ref().map(|t| &t.id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::CoordError;
    use crate::location::FixError;
    use crate::store::MemoryStore;
    use crate::tracker::ManualClock;

    struct Harness {
        tracker: ProximityTracker,
        clock: Arc<ManualClock>,
        store: Arc<MemoryStore>,
    }

    fn harness(treasures: Vec<Treasure>) -> Harness {
        let store = Arc::new(MemoryStore::with_treasures(treasures.clone()));
        let clock = Arc::new(ManualClock::new());
        let mut tracker =
            ProximityTracker::with_config(store.clone(), clock.clone(), TrackerConfig::default());
        tracker.initialize(treasures);
        Harness {
            tracker,
            clock,
            store,
        }
    }

    fn fix(lat: f64, lon: f64) -> LocationFix {
        LocationFix::at(lat, lon, 0)
    }

    #[test]
    fn test_new_tracker_is_idle() {
        let tracker = ProximityTracker::new(Arc::new(MemoryStore::new()));
        assert_eq!(tracker.phase(), HuntPhase::Idle);
        assert!(tracker.nearest_distance().is_none());
        assert!(tracker.found_treasure().is_none());
    }

    #[test]
    fn test_fix_on_treasure_finds_it() {
        let mut h = harness(vec![Treasure::new("A", 0.0, 0.0)]);

        let outcome = h.tracker.on_location_update(fix(0.0, 0.0));

        assert_eq!(outcome.found().map(|t| t.id.as_str()), Some("A"));
        assert_eq!(h.tracker.found_treasure().unwrap().id, "A");
        assert_eq!(h.tracker.nearest_distance(), Some(0.0));
        assert_eq!(h.tracker.phase(), HuntPhase::Found);
    }

    #[test]
    fn test_fix_out_of_range_updates_nearest_only() {
        let mut h = harness(vec![Treasure::new("A", 0.0, 0.0)]);

        let outcome = h.tracker.on_location_update(fix(0.0, 0.001));

        assert!(matches!(outcome, UpdateOutcome::Evaluated { .. }));
        assert!(h.tracker.found_treasure().is_none());
        let nearest = h.tracker.nearest_distance().unwrap();
        assert!((nearest - 111.19).abs() < 0.1, "got {}m", nearest);
        assert_eq!(h.tracker.phase(), HuntPhase::Hunting);
    }

    #[test]
    fn test_found_marks_store() {
        let mut h = harness(vec![Treasure::new("A", 0.0, 0.0)]);

        let outcome = h.tracker.on_location_update(fix(0.0, 0.0));

        assert!(matches!(outcome, UpdateOutcome::Found { persisted: true, .. }));
        assert!(h.store.load_unfound().unwrap().is_empty());
        // Still active until acknowledged
        assert_eq!(h.tracker.remaining(), 1);
    }

    #[test]
    fn test_store_failure_is_not_fatal() {
        let store = Arc::new(
            MemoryStore::with_treasures([Treasure::new("A", 0.0, 0.0)]).failing_writes(),
        );
        let mut tracker = ProximityTracker::with_config(
            store,
            Arc::new(ManualClock::new()),
            TrackerConfig::default(),
        );
        tracker.load_from_store().unwrap();

        let outcome = tracker.on_location_update(fix(0.0, 0.0));

        assert!(matches!(
            outcome,
            UpdateOutcome::Found {
                persisted: false,
                ..
            }
        ));
        assert_eq!(tracker.phase(), HuntPhase::Found);
    }

    #[test]
    fn test_first_match_policy() {
        // Both within 1m; B is closer but A comes first
        let mut h = harness(vec![
            Treasure::new("A", 0.0, 0.000008),
            Treasure::new("B", 0.0, 0.0),
        ]);

        let outcome = h.tracker.on_location_update(fix(0.0, 0.0));

        assert_eq!(outcome.found().unwrap().id, "A");
        // B was never compared, so nearest is A's distance
        let nearest = h.tracker.nearest_distance().unwrap();
        assert!(nearest > 0.5 && nearest < 1.0, "got {}m", nearest);
    }

    #[test]
    fn test_nearest_covers_treasures_before_match() {
        let mut h = harness(vec![
            Treasure::new("far", 0.0, 0.01),
            Treasure::new("near", 0.0, 0.0),
        ]);

        h.tracker.on_location_update(fix(0.0, 0.0));

        assert_eq!(h.tracker.found_treasure().unwrap().id, "near");
        assert_eq!(h.tracker.nearest_distance(), Some(0.0));
    }

    #[test]
    fn test_debounce_window() {
        let mut h = harness(vec![Treasure::new("A", 0.0, 0.0)]);

        let first = h.tracker.on_location_update(fix(0.0, 0.01));
        assert!(first.was_evaluated());
        let after_first = h.tracker.nearest_distance();

        h.clock.advance_ms(199);
        assert_eq!(
            h.tracker.on_location_update(fix(0.0, 0.001)),
            UpdateOutcome::Debounced
        );
        assert_eq!(h.tracker.nearest_distance(), after_first);

        h.clock.advance_ms(1);
        assert!(h.tracker.on_location_update(fix(0.0, 0.001)).was_evaluated());
        assert_ne!(h.tracker.nearest_distance(), after_first);
    }

    #[test]
    fn test_debounced_fix_does_not_extend_window() {
        let mut h = harness(vec![Treasure::new("A", 0.0, 0.0)]);

        h.tracker.on_location_update(fix(0.0, 0.01));
        h.clock.advance_ms(150);
        assert_eq!(
            h.tracker.on_location_update(fix(0.0, 0.01)),
            UpdateOutcome::Debounced
        );
        // 200ms after the last *processed* fix, not the last delivered one
        h.clock.advance_ms(50);
        assert!(h.tracker.on_location_update(fix(0.0, 0.01)).was_evaluated());
    }

    #[test]
    fn test_found_state_freezes_outputs() {
        let mut h = harness(vec![
            Treasure::new("A", 0.0, 0.0),
            Treasure::new("B", 1.0, 1.0),
        ]);
        h.tracker.on_location_update(fix(0.0, 0.0));

        for _ in 0..5 {
            h.clock.advance_ms(500);
            assert_eq!(
                h.tracker.on_location_update(fix(1.0, 1.0)),
                UpdateOutcome::Paused
            );
            assert_eq!(h.tracker.found_treasure().unwrap().id, "A");
            assert_eq!(h.tracker.nearest_distance(), Some(0.0));
        }
    }

    #[test]
    fn test_acknowledge_removes_found() {
        let mut h = harness(vec![
            Treasure::new("A", 0.0, 0.0),
            Treasure::new("B", 1.0, 1.0),
        ]);
        h.tracker.on_location_update(fix(0.0, 0.0));

        let acknowledged = h.tracker.acknowledge_found().unwrap();

        assert_eq!(acknowledged.id, "A");
        assert!(h.tracker.found_treasure().is_none());
        assert!(h.tracker.nearest_distance().is_none());
        assert_eq!(h.tracker.remaining(), 1);
        assert_eq!(h.tracker.active_treasures()[0].id, "B");
        assert_eq!(h.tracker.phase(), HuntPhase::Hunting);

        // Hunting resumes
        h.clock.advance_ms(200);
        let outcome = h.tracker.on_location_update(fix(1.0, 1.0));
        assert_eq!(outcome.found().unwrap().id, "B");
    }

    #[test]
    fn test_acknowledge_last_goes_idle() {
        let mut h = harness(vec![Treasure::new("A", 0.0, 0.0)]);
        h.tracker.on_location_update(fix(0.0, 0.0));

        h.tracker.acknowledge_found().unwrap();
        assert_eq!(h.tracker.phase(), HuntPhase::Idle);

        h.tracker.initialize(Vec::new());
        assert_eq!(h.tracker.phase(), HuntPhase::Idle);
        assert_eq!(
            h.tracker.on_location_update(fix(0.0, 0.0)),
            UpdateOutcome::Idle
        );
    }

    #[test]
    fn test_acknowledge_without_found_is_error() {
        let mut h = harness(vec![Treasure::new("A", 0.0, 0.0)]);
        h.tracker.on_location_update(fix(0.0, 0.01));
        let nearest = h.tracker.nearest_distance();

        assert_eq!(
            h.tracker.acknowledge_found(),
            Err(TrackerError::NothingFound)
        );
        assert_eq!(h.tracker.remaining(), 1);
        assert_eq!(h.tracker.nearest_distance(), nearest);
    }

    #[test]
    fn test_initialize_filters_found_and_duplicates() {
        let mut found = Treasure::new("B", 0.0, 0.0);
        found.found = true;
        let h = harness(vec![
            Treasure::new("A", 0.0, 0.0),
            found,
            Treasure::new("C", 2.0, 2.0),
            Treasure::new("A", 9.0, 9.0),
        ]);

        let ids: Vec<_> = h
            .tracker
            .active_treasures()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "C"]);
        assert_eq!(h.tracker.active_treasures()[0].latitude, 0.0);
    }

    #[test]
    fn test_reinitialize_clears_found() {
        let mut h = harness(vec![Treasure::new("A", 0.0, 0.0)]);
        h.tracker.on_location_update(fix(0.0, 0.0));

        h.tracker.initialize(vec![Treasure::new("B", 5.0, 5.0)]);

        assert_eq!(h.tracker.phase(), HuntPhase::Hunting);
        assert!(h.tracker.found_treasure().is_none());
        assert!(h.tracker.nearest_distance().is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut h = harness(vec![Treasure::new("A", 0.0, 0.0)]);
        h.tracker.on_location_update(fix(0.0, 0.0));

        h.tracker.reset();

        assert_eq!(h.tracker.phase(), HuntPhase::Idle);
        assert!(h.tracker.found_treasure().is_none());
        assert!(h.tracker.nearest_distance().is_none());

        // Debounce window is cleared too: an immediate fix is evaluated
        h.tracker.initialize(vec![Treasure::new("B", 0.0, 0.01)]);
        assert!(h.tracker.on_location_update(fix(0.0, 0.0)).was_evaluated());
    }

    #[test]
    fn test_malformed_raw_fix_rejected() {
        let mut h = harness(vec![Treasure::new("A", 0.0, 0.0)]);
        h.tracker.on_location_update(fix(0.0, 0.01));
        let nearest = h.tracker.nearest_distance();
        h.clock.advance_ms(500);

        let outcome = h.tracker.on_raw_fix(RawFix {
            latitude: None,
            longitude: Some(0.0),
            ..Default::default()
        });

        assert_eq!(outcome, UpdateOutcome::Rejected(FixError::MissingLatitude));
        assert_eq!(h.tracker.nearest_distance(), nearest);
        // The rejected fix did not consume the debounce window
        assert!(h.tracker.on_raw_fix(RawFix::new(0.0, 0.0)).was_evaluated());
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let mut h = harness(vec![Treasure::new("A", 0.0, 0.0)]);

        let outcome = h.tracker.on_location_update(fix(f64::NAN, 0.0));

        assert!(matches!(
            outcome,
            UpdateOutcome::Rejected(FixError::InvalidCoordinate(CoordError::InvalidLatitude(_)))
        ));
        assert!(h.tracker.nearest_distance().is_none());
    }

    #[test]
    fn test_invalid_accuracy_rejected_on_both_entry_points() {
        let mut h = harness(vec![Treasure::new("A", 0.0, 0.0)]);

        let outcome = h.tracker.on_location_update(fix(0.0, 0.0).with_accuracy(-3.0));
        assert_eq!(outcome, UpdateOutcome::Rejected(FixError::InvalidAccuracy(-3.0)));

        let raw = RawFix {
            accuracy: Some(-3.0),
            ..RawFix::new(0.0, 0.0)
        };
        assert_eq!(
            h.tracker.on_raw_fix(raw),
            UpdateOutcome::Rejected(FixError::InvalidAccuracy(-3.0))
        );

        assert_eq!(h.tracker.phase(), HuntPhase::Hunting);
        assert!(h.tracker.nearest_distance().is_none());
    }

    #[test]
    fn test_hint_follows_nearest() {
        let mut h = harness(vec![Treasure::new("A", 0.0, 0.0)]);
        assert!(h.tracker.hint().is_none());

        // ~11m away
        h.tracker.on_location_update(fix(0.0, 0.0001));
        assert_eq!(h.tracker.hint(), Some(ProximityHint::Warmer));

        // ~111m away
        h.clock.advance_ms(200);
        h.tracker.on_location_update(fix(0.0, 0.001));
        assert_eq!(h.tracker.hint(), Some(ProximityHint::Cold));
    }

    #[test]
    fn test_load_from_store_failure_keeps_state() {
        struct BrokenStore;
        impl TreasureStore for BrokenStore {
            fn load_unfound(&self) -> StoreResult<Vec<Treasure>> {
                Err(crate::store::StoreError::Unavailable("offline".into()))
            }
            fn mark_found(&self, _id: &str) -> StoreResult<()> {
                Ok(())
            }
            fn load_all(&self) -> StoreResult<Vec<Treasure>> {
                Ok(Vec::new())
            }
            fn append(&self, _treasure: Treasure) -> StoreResult<()> {
                Ok(())
            }
            fn clear(&self) -> StoreResult<()> {
                Ok(())
            }
        }

        let mut tracker = ProximityTracker::new(Arc::new(BrokenStore));
        tracker.initialize(vec![Treasure::new("A", 0.0, 0.0)]);

        assert!(tracker.load_from_store().is_err());
        assert_eq!(tracker.remaining(), 1);
    }
}
