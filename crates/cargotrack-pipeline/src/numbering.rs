//! # Sequence Numbering
//!
//! Human-legible numbers for consolidations (`CONS-<year>-<n>`) and
//! shipments (`PL-<year>-<id>`).
//!
//! The consolidation ordinal comes from a [`SequenceSource`] — the one
//! shared mutable resource this core owns. Two racing creations must
//! receive distinct numbers. When the source is unavailable the generator
//! degrades to a collision-resistant timestamp+random suffix, trading
//! strict sequentiality for availability; the degradation is logged and
//! never surfaced to the caller as a failure.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Datelike, Utc};
use rand::Rng;
use thiserror::Error;
use tracing::warn;

use cargotrack_core::ShipmentId;

/// The sequence source could not produce a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("sequence source unavailable: {0}")]
pub struct SequenceError(pub String);

/// A monotonic ordinal source for consolidation numbering.
///
/// Implementations back this with whatever the deployment offers: a
/// database sequence, a counter service, or the in-process
/// [`AtomicSequence`] used here and in tests.
pub trait SequenceSource: Send + Sync {
    /// Produce the next ordinal. Every successful call returns a value
    /// strictly greater than any previously returned by this source.
    fn next_value(&self) -> Result<u64, SequenceError>;
}

/// In-process atomic sequence. Safe under concurrent creation.
#[derive(Debug, Default)]
pub struct AtomicSequence {
    counter: AtomicU64,
}

impl AtomicSequence {
    /// A sequence starting at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sequence whose next value is `start`.
    pub fn starting_at(start: u64) -> Self {
        Self {
            counter: AtomicU64::new(start.saturating_sub(1)),
        }
    }
}

impl SequenceSource for AtomicSequence {
    fn next_value(&self) -> Result<u64, SequenceError> {
        Ok(self.counter.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Generator for `CONS-<year>-<n>` consolidation numbers.
#[derive(Debug)]
pub struct ConsNumberGenerator<S: SequenceSource = AtomicSequence> {
    source: S,
}

impl Default for ConsNumberGenerator<AtomicSequence> {
    fn default() -> Self {
        Self::new(AtomicSequence::new())
    }
}

impl<S: SequenceSource> ConsNumberGenerator<S> {
    /// Wrap a sequence source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Produce the next consolidation number for the current year.
    pub fn next_number(&self) -> String {
        self.next_number_for_year(Utc::now().year())
    }

    /// Produce the next consolidation number for an explicit year.
    pub fn next_number_for_year(&self, year: i32) -> String {
        match self.source.next_value() {
            Ok(n) => format!("CONS-{year}-{n}"),
            Err(err) => {
                warn!(%err, "sequence source failed, falling back to timestamp numbering");
                fallback_number(year)
            }
        }
    }
}

/// Collision-resistant fallback: last seven digits of the epoch millis
/// plus a three-digit random suffix. Unique enough under contention,
/// still legible to operators.
fn fallback_number(year: i32) -> String {
    let millis = Utc::now().timestamp_millis().to_string();
    let tail_start = millis.len().saturating_sub(7);
    let tail = &millis[tail_start..];
    let suffix: u16 = rand::thread_rng().gen_range(100..1000);
    format!("CONS-{year}-{tail}{suffix}")
}

/// The shipment number assigned at creation: `PL-<year>-<id>`.
pub fn shipment_number(year: i32, id: ShipmentId) -> String {
    format!("PL-{year}-{id}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    /// A source that always fails, forcing the fallback path.
    struct BrokenSequence;

    impl SequenceSource for BrokenSequence {
        fn next_value(&self) -> Result<u64, SequenceError> {
            Err(SequenceError("counter offline".to_string()))
        }
    }

    #[test]
    fn sequential_numbers_in_order() {
        let generator = ConsNumberGenerator::default();
        assert_eq!(generator.next_number_for_year(2026), "CONS-2026-1");
        assert_eq!(generator.next_number_for_year(2026), "CONS-2026-2");
        assert_eq!(generator.next_number_for_year(2026), "CONS-2026-3");
    }

    #[test]
    fn starting_at_resumes_a_sequence() {
        let generator = ConsNumberGenerator::new(AtomicSequence::starting_at(41));
        assert_eq!(generator.next_number_for_year(2026), "CONS-2026-41");
        assert_eq!(generator.next_number_for_year(2026), "CONS-2026-42");
    }

    #[test]
    fn concurrent_numbers_are_distinct() {
        let generator = Arc::new(ConsNumberGenerator::default());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let generator = Arc::clone(&generator);
            handles.push(std::thread::spawn(move || {
                (0..50)
                    .map(|_| generator.next_number_for_year(2026))
                    .collect::<Vec<_>>()
            }));
        }
        let mut seen = HashSet::new();
        for handle in handles {
            for number in handle.join().expect("thread") {
                assert!(seen.insert(number.clone()), "duplicate number {number}");
            }
        }
        assert_eq!(seen.len(), 400);
    }

    #[test]
    fn fallback_keeps_the_cons_prefix_and_year() {
        let generator = ConsNumberGenerator::new(BrokenSequence);
        let number = generator.next_number_for_year(2026);
        assert!(number.starts_with("CONS-2026-"));
        let ordinal = number.trim_start_matches("CONS-2026-");
        assert!(ordinal.len() >= 10, "timestamp+random suffix expected: {number}");
        assert!(ordinal.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn shipment_number_format() {
        assert_eq!(shipment_number(2026, ShipmentId(17)), "PL-2026-17");
    }
}
