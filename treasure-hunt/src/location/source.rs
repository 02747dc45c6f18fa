//! Location providers.
//!
//! Providers deliver fixes at irregular intervals. The only in-tree provider
//! replays newline-delimited JSON fixes, one object per line:
//!
//! ```text
//! {"latitude": 37.7749, "longitude": -122.4194, "accuracy": 5.0}
//! {"latitude": 37.7750, "longitude": -122.4195}
//! ```

use std::io::BufRead;
use std::time::Duration;

use tokio::sync::mpsc;

use super::fix::{FixError, RawFix};

/// A pull-based source of raw location fixes.
pub trait LocationSource: Send {
    /// Get the next fix.
    ///
    /// Returns `None` once the source is exhausted. An `Err` item means a
    /// single delivery was unusable; the source may still yield more fixes.
    fn next_fix(&mut self) -> Option<Result<RawFix, FixError>>;
}

/// Reads one JSON-encoded [`RawFix`] per line.
///
/// Blank lines are skipped. Lines that fail to decode yield
/// [`FixError::Parse`] without ending the stream.
pub struct JsonLinesSource<R> {
    reader: R,
    line: String,
    line_number: usize,
}

impl<R: BufRead> JsonLinesSource<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_number: 0,
        }
    }
}

impl<R: BufRead + Send> LocationSource for JsonLinesSource<R> {
    fn next_fix(&mut self) -> Option<Result<RawFix, FixError>> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let trimmed = self.line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    return Some(serde_json::from_str(trimmed).map_err(|e| {
                        FixError::Parse(format!("line {}: {}", self.line_number, e))
                    }));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Location source read failed");
                    return None;
                }
            }
        }
    }
}

impl<R: BufRead + Send> Iterator for JsonLinesSource<R> {
    type Item = Result<RawFix, FixError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_fix()
    }
}

/// Delivery pacing for replayed fixes.
///
/// A live provider delivers fixes as they happen; a recorded file would
/// otherwise arrive all at once and fall inside the tracker's debounce
/// window. Consecutive fixes that both carry `timestamp_ms` are spaced by
/// their recorded gap. Any other pair is spaced by `default_gap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayPace {
    /// Gap used when either fix has no timestamp.
    pub default_gap: Duration,
}

impl ReplayPace {
    /// Create a pace with the given fallback gap.
    pub fn new(default_gap: Duration) -> Self {
        Self { default_gap }
    }

    /// How long to wait before delivering `next` after `previous`.
    pub fn delay(&self, previous: Option<&RawFix>, next: &RawFix) -> Duration {
        let Some(previous) = previous else {
            return Duration::ZERO;
        };

        match (previous.timestamp_ms, next.timestamp_ms) {
            (Some(from), Some(to)) => Duration::from_millis(to.saturating_sub(from).max(0) as u64),
            _ => self.default_gap,
        }
    }
}

/// Drain a source into a fix channel, skipping undecodable deliveries.
///
/// Blocking; run it on a dedicated thread or via `spawn_blocking`. Returns
/// the number of fixes forwarded. Stops early if the receiver is dropped.
pub fn forward_fixes<S: LocationSource>(source: S, tx: mpsc::Sender<RawFix>) -> usize {
    forward(source, tx, None)
}

/// Like [`forward_fixes`], sleeping between deliveries according to `pace`.
pub fn forward_fixes_paced<S: LocationSource>(
    source: S,
    tx: mpsc::Sender<RawFix>,
    pace: ReplayPace,
) -> usize {
    forward(source, tx, Some(pace))
}

fn forward<S: LocationSource>(
    mut source: S,
    tx: mpsc::Sender<RawFix>,
    pace: Option<ReplayPace>,
) -> usize {
    let mut forwarded = 0;
    let mut previous: Option<RawFix> = None;

    while let Some(item) = source.next_fix() {
        match item {
            Ok(fix) => {
                if let Some(pace) = &pace {
                    let delay = pace.delay(previous.as_ref(), &fix);
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    previous = Some(fix.clone());
                }

                if tx.blocking_send(fix).is_err() {
                    tracing::debug!("Fix receiver closed, stopping location source");
                    break;
                }
                forwarded += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable location fix");
            }
        }
    }

    forwarded
}
