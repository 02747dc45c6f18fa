//! Hunt sessions.
//!
//! A [`HuntSession`] owns a [`ProximityTracker`](crate::tracker::ProximityTracker)
//! and drives it from a channel of fixes, so any UI layer can run a hunt by
//! message passing:
//!
//! ```text
//!   LocationSource ──RawFix──► HuntSession ──HuntEvent──► UI subscribers
//!                                  ▲
//!                 HuntCommand ─────┘  (acknowledge, reload, reset, shutdown)
//! ```
//!
//! Fixes are fire-and-forget from the provider's point of view; persistence
//! failures reported by a `BackgroundStore` surface as
//! [`HuntEvent::StoreFailed`] without stopping the hunt.

mod events;
#[allow(clippy::module_inception)]
mod session;

pub use events::{HuntCommand, HuntEvent, HuntSummary};
pub use session::{HuntHandle, HuntSession, HuntSessionConfig, DEFAULT_EVENT_CAPACITY};
