//! Incremental (infinite-scroll) reveal of an in-memory collection.
//!
//! The whole sorted/filtered collection is already loaded; the loader only
//! decides how long a prefix of it is shown. The state machine is:
//!
//! ```text
//!            trigger()                 complete()
//!   Idle ───────────────▶ LoadingMore ───────────▶ Idle
//!     ▲                                   │
//!     │ reset()                           │ prefix covers everything
//!     │                                   ▼
//!     └──────────────────────────────  Exhausted
//! ```
//!
//! `trigger()` is what the sentinel's viewport-intersection callback calls.
//! While a page advance is pending further triggers are ignored;
//! `abandon()` (or dropping a `load_more()` future) returns to `Idle`. The pause
//! between trigger and completion is a pacing device for the loading
//! indicator, not I/O.

use std::time::Duration;

use tracing::debug;

use crate::lifecycle::LivenessToken;

/// Items revealed per page.
pub const PAGE_SIZE: usize = 16;

/// Default pause between trigger and reveal.
pub const DEFAULT_PACING: Duration = Duration::from_millis(600);

/// Loader state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    /// Waiting for the sentinel to become visible.
    Idle,
    /// A page advance is pending.
    LoadingMore,
    /// Everything is shown; nothing is observed any more.
    Exhausted,
}

/// Ticket for a pending page advance, returned by [`IncrementalLoader::trigger`].
///
/// Tickets issued before a [`IncrementalLoader::reset`] are stale and
/// completing them does nothing.
#[derive(Debug)]
#[must_use = "a pending advance must be completed or abandoned"]
pub struct PendingAdvance {
    generation: u64,
}

/// Growing prefix over a fixed collection.
#[derive(Debug)]
pub struct IncrementalLoader<T> {
    items: Vec<T>,
    shown: usize,
    state: LoaderState,
    page_size: usize,
    pacing: Duration,
    generation: u64,
    owner: Option<LivenessToken>,
}

impl<T> IncrementalLoader<T> {
    /// Loader over `items` with the standard page size.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self::with_page_size(items, PAGE_SIZE)
    }

    /// Loader with a custom page size (minimum 1).
    #[must_use]
    pub fn with_page_size(items: Vec<T>, page_size: usize) -> Self {
        let mut loader = Self {
            items: Vec::new(),
            shown: 0,
            state: LoaderState::Idle,
            page_size: page_size.max(1),
            pacing: DEFAULT_PACING,
            generation: 0,
            owner: None,
        };
        loader.reset(items);
        loader
    }

    /// Set the pause used by [`Self::load_more`].
    #[must_use]
    pub const fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Tie the loader to a component; once it is torn down the loader stops
    /// observing and discards pending advances.
    #[must_use]
    pub fn owned_by(mut self, token: LivenessToken) -> Self {
        self.owner = Some(token);
        self
    }

    /// Replace the collection and start again from the first page.
    ///
    /// No diffing is attempted; any pending advance becomes stale.
    pub fn reset(&mut self, items: Vec<T>) {
        self.generation += 1;
        self.shown = items.len().min(self.page_size);
        self.items = items;
        self.state = if self.shown == self.items.len() {
            LoaderState::Exhausted
        } else {
            LoaderState::Idle
        };
        debug!(
            total = self.items.len(),
            shown = self.shown,
            "Loader reset"
        );
    }

    #[must_use]
    pub const fn state(&self) -> LoaderState {
        self.state
    }

    /// The currently shown prefix.
    #[must_use]
    pub fn visible(&self) -> &[T] {
        self.items.get(..self.shown).unwrap_or(&[])
    }

    /// Length of the shown prefix.
    #[must_use]
    pub const fn shown(&self) -> usize {
        self.shown
    }

    /// Length of the whole collection.
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.shown < self.items.len()
    }

    fn is_owner_alive(&self) -> bool {
        self.owner.as_ref().is_none_or(LivenessToken::is_alive)
    }

    /// Index of the sentinel item to observe, if observation is active.
    ///
    /// `None` once exhausted or after the owner was torn down.
    #[must_use]
    pub fn sentinel(&self) -> Option<usize> {
        if self.state == LoaderState::Exhausted || !self.is_owner_alive() {
            return None;
        }
        self.shown.checked_sub(1)
    }

    /// The sentinel became visible.
    ///
    /// Returns a ticket when a page advance starts; `None` when one is
    /// already pending, nothing is left, or the owner is gone.
    pub fn trigger(&mut self) -> Option<PendingAdvance> {
        if self.state != LoaderState::Idle || !self.has_more() || !self.is_owner_alive() {
            return None;
        }
        self.state = LoaderState::LoadingMore;
        Some(PendingAdvance {
            generation: self.generation,
        })
    }

    /// Reveal the next page. Returns `false` for a stale ticket.
    pub fn complete(&mut self, pending: PendingAdvance) -> bool {
        if pending.generation != self.generation || self.state != LoaderState::LoadingMore {
            debug!("Ignoring stale page advance");
            return false;
        }
        self.shown = (self.shown + self.page_size).min(self.items.len());
        self.state = if self.has_more() {
            LoaderState::Idle
        } else {
            LoaderState::Exhausted
        };
        debug!(shown = self.shown, total = self.items.len(), "Revealed page");
        true
    }

    /// Give up a pending advance without revealing anything.
    ///
    /// The loader goes back to `Idle` so the next trigger can start again.
    /// Stale tickets are ignored.
    pub fn abandon(&mut self, pending: PendingAdvance) {
        if pending.generation == self.generation && self.state == LoaderState::LoadingMore {
            debug!("Page advance abandoned");
            self.state = LoaderState::Idle;
        }
    }

    /// Trigger, wait the pacing delay, then complete.
    ///
    /// Returns `true` if a page was revealed. Nothing is applied if the owner
    /// was torn down while waiting. Dropping the future before it finishes
    /// abandons the advance.
    pub async fn load_more(&mut self) -> bool {
        let Some(pending) = self.trigger() else {
            return false;
        };
        let mut guard = AdvanceGuard {
            loader: self,
            pending: Some(pending),
        };
        if !guard.loader.pacing.is_zero() {
            tokio::time::sleep(guard.loader.pacing).await;
        }

        let Some(pending) = guard.pending.take() else {
            return false;
        };
        let loader = &mut *guard.loader;
        match loader.owner.clone() {
            Some(owner) => owner.apply(|| loader.complete(pending)).unwrap_or(false),
            None => loader.complete(pending),
        }
    }
}

/// Abandons a paced advance that never got to complete.
struct AdvanceGuard<'a, T> {
    loader: &'a mut IncrementalLoader<T>,
    pending: Option<PendingAdvance>,
}

impl<T> Drop for AdvanceGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.loader.abandon(pending);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::lifecycle::Liveness;

    fn loader(n: usize) -> IncrementalLoader<usize> {
        IncrementalLoader::new((0..n).collect()).with_pacing(Duration::ZERO)
    }

    #[test]
    fn test_forty_items_three_pages() {
        let mut loader = loader(40);
        assert_eq!(loader.shown(), 16);
        assert_eq!(loader.state(), LoaderState::Idle);

        let pending = loader.trigger().unwrap();
        assert!(loader.complete(pending));
        assert_eq!(loader.shown(), 32);
        assert_eq!(loader.state(), LoaderState::Idle);

        let pending = loader.trigger().unwrap();
        assert!(loader.complete(pending));
        assert_eq!(loader.shown(), 40);
        assert_eq!(loader.state(), LoaderState::Exhausted);

        assert!(loader.trigger().is_none());
        assert_eq!(loader.shown(), 40);
        assert!(loader.sentinel().is_none());
    }

    #[test]
    fn test_small_collection_starts_exhausted() {
        let loader = loader(5);
        assert_eq!(loader.visible(), &[0, 1, 2, 3, 4]);
        assert_eq!(loader.state(), LoaderState::Exhausted);

        let empty = super::IncrementalLoader::<usize>::new(Vec::new());
        assert_eq!(empty.state(), LoaderState::Exhausted);
        assert!(empty.sentinel().is_none());
    }

    #[test]
    fn test_triggers_while_loading_are_ignored() {
        let mut loader = loader(40);
        let pending = loader.trigger().unwrap();
        assert_eq!(loader.state(), LoaderState::LoadingMore);
        assert!(loader.trigger().is_none());
        assert!(loader.complete(pending));
        assert_eq!(loader.shown(), 32);
    }

    #[test]
    fn test_sentinel_is_last_shown_item() {
        let loader = loader(40);
        assert_eq!(loader.sentinel(), Some(15));
    }

    #[test]
    fn test_reset_discards_pending_advance() {
        let mut loader = loader(40);
        let pending = loader.trigger().unwrap();
        loader.reset((0..20).collect());
        assert_eq!(loader.state(), LoaderState::Idle);
        assert!(!loader.complete(pending));
        assert_eq!(loader.shown(), 16);
    }

    #[test]
    fn test_abandon_returns_to_idle() {
        let mut loader = loader(40);
        let pending = loader.trigger().unwrap();
        loader.abandon(pending);
        assert_eq!(loader.state(), LoaderState::Idle);
        assert_eq!(loader.shown(), 16);

        let pending = loader.trigger().unwrap();
        assert!(loader.complete(pending));
        assert_eq!(loader.shown(), 32);
    }

    #[tokio::test]
    async fn test_cancelled_load_more_can_retry() {
        let mut loader = IncrementalLoader::new((0..40).collect::<Vec<usize>>())
            .with_pacing(Duration::from_millis(50));

        let cancelled = tokio::time::timeout(Duration::from_millis(5), loader.load_more()).await;
        assert!(cancelled.is_err());
        assert_eq!(loader.state(), LoaderState::Idle);
        assert_eq!(loader.shown(), 16);
        assert_eq!(loader.sentinel(), Some(15));

        assert!(loader.load_more().await);
        assert_eq!(loader.shown(), 32);
    }

    #[tokio::test]
    async fn test_load_more_until_exhausted() {
        let mut loader = loader(40);
        assert!(loader.load_more().await);
        assert!(loader.load_more().await);
        assert!(!loader.load_more().await);
        assert_eq!(loader.shown(), 40);
    }

    #[tokio::test]
    async fn test_teardown_during_pacing_discards_page() {
        let owner = Liveness::new();
        let mut loader = IncrementalLoader::new((0..40).collect::<Vec<usize>>())
            .with_pacing(Duration::from_millis(20))
            .owned_by(owner.token());

        let (revealed, ()) = tokio::join!(loader.load_more(), async { owner.teardown() });
        assert!(!revealed);
        assert_eq!(loader.shown(), 16);
        assert!(loader.sentinel().is_none());
        assert!(loader.trigger().is_none());
    }
}
