//! Time and identifier sources consumed when recording transactions.
//!
//! The store asks each source exactly once per recorded transaction.
//! Production code uses [`SystemClock`] and [`UuidGenerator`]; tests and
//! demos swap in [`FixedClock`] and [`SequentialIds`] for repeatable output.

use chrono::{DateTime, Utc};
use std::cell::Cell;
use uuid::Uuid;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Generator of transaction identifiers.
///
/// Identifiers must be unique for the lifetime of the process.
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Wall clock backed by `chrono::Utc::now`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Random v4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Clock that always reports the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Deterministic ids of the form `<prefix>-<n>`, counting from 1.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: Cell<u64>,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Cell::new(0),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("tx")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let next = self.counter.get() + 1;
        self.counter.set(next);
        format!("{}-{}", self.prefix, next)
    }
}
