//! Liveness tokens for async continuations.
//!
//! A component owns a [`Liveness`]; every async task it starts gets a
//! [`LivenessToken`]. When the component is torn down (explicitly or by
//! dropping the owner) the tokens report dead, and continuations must discard
//! their results instead of applying them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Owner side. Dropping it tears the component down.
#[derive(Debug)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

/// Cheap, cloneable view checked before applying an async result.
#[derive(Debug, Clone)]
pub struct LivenessToken {
    alive: Arc<AtomicBool>,
}

impl Liveness {
    #[must_use]
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Hand out a token for an async continuation.
    #[must_use]
    pub fn token(&self) -> LivenessToken {
        LivenessToken {
            alive: Arc::clone(&self.alive),
        }
    }

    /// Mark the component as gone.
    pub fn teardown(&self) {
        self.alive.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Liveness {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl LivenessToken {
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Run `apply` only while the owner is alive.
    pub fn apply<T>(&self, apply: impl FnOnce() -> T) -> Option<T> {
        if self.is_alive() {
            Some(apply())
        } else {
            tracing::debug!("Discarding result for torn-down component");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teardown_kills_tokens() {
        let owner = Liveness::new();
        let token = owner.token();
        assert_eq!(token.apply(|| 1), Some(1));

        owner.teardown();
        assert!(!token.is_alive());
        assert_eq!(token.apply(|| 1), None);
    }

    #[test]
    fn test_drop_kills_tokens() {
        let token = {
            let owner = Liveness::new();
            owner.token()
        };
        assert!(!token.is_alive());
    }
}
