//! Id generators.
//!
//! Node and edge ids come from a generator handed to the [`crate::Editor`],
//! never from process-wide state.

use uuid::Uuid;

use crate::config::{IdStrategy, IdsConfig};

pub trait IdGenerator: Send {
    /// Returns a fresh id.
    fn next_id(&mut self) -> String;
}

impl<F> IdGenerator for F
where
    F: FnMut() -> String + Send,
{
    fn next_id(&mut self) -> String {
        self()
    }
}

/// Monotonic `<prefix><n>` ids, `node_0`, `node_1`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("node_")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// 21-character nanoid ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct NanoIds;

impl IdGenerator for NanoIds {
    fn next_id(&mut self) -> String {
        nanoid::nanoid!()
    }
}

/// Random v4 uuids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

pub fn from_config(config: &IdsConfig) -> Box<dyn IdGenerator> {
    match config.strategy {
        IdStrategy::Sequential => Box::new(SequentialIds::new(config.prefix.clone())),
        IdStrategy::Nanoid => Box::new(NanoIds),
        IdStrategy::Uuid => Box::new(UuidIds),
    }
}
