//! ID generation utilities.

use std::sync::{Arc, Mutex, PoisonError};

use ulid::{Generator, Ulid};
use uuid::Uuid;

/// ID generator for entities and outbox keys.
#[derive(Clone)]
pub struct IdGenerator {
    generator: Arc<Mutex<Generator>>,
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            generator: Arc::new(Mutex::new(Generator::new())),
        }
    }

    /// Generate a new ULID-based ID.
    ///
    /// IDs from one generator are strictly increasing, including within a
    /// single millisecond. The outbox relies on this for its oldest-first
    /// flush order.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut generator = self
            .generator
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        generator
            .generate()
            .unwrap_or_else(|_| Ulid::new())
            .to_string()
            .to_lowercase()
    }

    /// Generate a new random UUID v4.
    #[must_use]
    pub fn generate_uuid_v4(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}
