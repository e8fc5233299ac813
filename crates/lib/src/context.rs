//! Per-call execution context.
//!
//! A [`Context`] identifies the caller of repository operations. It is created
//! by the caller and handed explicitly to
//! [`Repository::start_transaction`](crate::Repository::start_transaction);
//! there is no ambient per-thread session state anywhere in the library.

use uuid::Uuid;

/// Identifies one caller session across repository and transaction calls.
///
/// The session id tags tracing events emitted while a transaction runs, and
/// the optional actor name makes those events attributable in multi-writer
/// embeddings.
#[derive(Debug, Clone)]
pub struct Context {
    id: Uuid,
    actor: Option<String>,
}

impl Context {
    /// Creates a context with a fresh session id and no actor name.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            actor: None,
        }
    }

    /// Creates a context tagged with an actor name.
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor: Some(actor.into()),
        }
    }

    /// The unique id of this session.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The actor name, if one was set.
    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.actor {
            Some(actor) => write!(f, "{actor}@{}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}
