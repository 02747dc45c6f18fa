//! Location fixes and the providers that deliver them.
//!
//! - `fix` - `RawFix` (as delivered) and `LocationFix` (validated)
//! - `source` - `LocationSource` trait and the JSON-lines replay provider

mod fix;
mod source;

pub use fix::{FixError, LocationFix, RawFix};
pub use source::{
    forward_fixes, forward_fixes_paced, JsonLinesSource, LocationSource, ReplayPace,
};
