//! Recursion guard for both graph traversals.
//!
//! The type graph handed to the extractor may contain cycles that no named
//! symbol interrupts (two anonymous object shapes pointing at each other), and
//! arbitrarily deep anonymous nesting. `RecursionGuard` turns both into a
//! structured answer instead of stack growth:
//!
//! 1. **Cycle detection** via the set of keys on the current path
//! 2. **Depth limiting** on the length of that path
//! 3. **Iteration bounding** on the total number of enter attempts
//!
//! Named cycles never reach the guard: the symbol memo (synthesis) and the
//! visited-symbol set (closure) answer them first.

use phero_common::limits::{
    MAX_CLOSURE_DEPTH, MAX_EXTRACTION_ITERATIONS, MAX_SYNTHESIS_DEPTH, MAX_VISITING_SET_SIZE,
};
use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Named limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Parser-model synthesis.
    ///
    /// depth = 200, iterations = 100,000
    Synthesis,

    /// Declaration closure walk.
    ///
    /// depth = 500, iterations = 100,000
    Closure,

    /// Limits taken from `ExtractOptions` or a test.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::Synthesis => MAX_SYNTHESIS_DEPTH,
            Self::Closure => MAX_CLOSURE_DEPTH,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::Synthesis | Self::Closure => MAX_EXTRACTION_ITERATIONS,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

/// Outcome of [`RecursionGuard::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The key is already on the current path.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::DepthExceeded | Self::IterationExceeded)
    }

    /// Reason text used in `RecursionLimit` diagnostics.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Entered => "entered",
            Self::Cycle => "circular without a named type",
            Self::DepthExceeded => "nested too deeply",
            Self::IterationExceeded => "too large to expand",
        }
    }
}

/// Path-based cycle and depth tracking.
///
/// Every successful [`enter`](Self::enter) must be paired with exactly one
/// [`leave`](Self::leave) on the same key, including on error paths. Debug
/// builds panic when a guard is dropped with keys still on the path.
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    max_visiting: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
            max_visiting: MAX_VISITING_SET_SIZE,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    pub fn with_max_visiting(mut self, max_visiting: u32) -> Self {
        self.max_visiting = max_visiting;
        self
    }

    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            self.exceeded = true;
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }
        if self.visiting.contains(&key) {
            return RecursionResult::Cycle;
        }
        if self.visiting.len() as u32 >= self.max_visiting {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }

        self.visiting.insert(key);
        self.depth += 1;
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);
        debug_assert!(
            was_present,
            "RecursionGuard::leave() called for a key that is not on the path"
        );
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Sticky: stays set once any limit was hit.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} keys still on the path",
                self.visiting.len(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_read_central_limits() {
        assert_eq!(RecursionProfile::Synthesis.max_depth(), MAX_SYNTHESIS_DEPTH);
        assert_eq!(RecursionProfile::Closure.max_depth(), MAX_CLOSURE_DEPTH);
        let custom = RecursionProfile::Custom {
            max_depth: 3,
            max_iterations: 9,
        };
        assert_eq!(custom.max_depth(), 3);
        assert_eq!(custom.max_iterations(), 9);
    }

    #[test]
    fn enter_leave_tracks_path() {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::Synthesis);
        assert_eq!(guard.enter((7u32, false)), RecursionResult::Entered);
        assert_eq!(guard.enter((7u32, true)), RecursionResult::Entered);
        assert!(guard.is_visiting(&(7, false)));
        assert_eq!(guard.depth(), 2);

        guard.leave((7, true));
        guard.leave((7, false));
        assert_eq!(guard.depth(), 0);
        assert_eq!(guard.iterations(), 2);
    }

    #[test]
    fn same_key_on_path_is_a_cycle() {
        let mut guard = RecursionGuard::new(10, 100);
        assert_eq!(guard.enter(1u32), RecursionResult::Entered);
        assert_eq!(guard.enter(2u32), RecursionResult::Entered);
        assert_eq!(guard.enter(1u32), RecursionResult::Cycle);
        assert!(!guard.is_exceeded());
        guard.leave(2);
        guard.leave(1);

        // Off the path again: shared sub-graphs may be revisited.
        assert_eq!(guard.enter(1u32), RecursionResult::Entered);
        guard.leave(1);
    }

    #[test]
    fn depth_limit_is_sticky() {
        let mut guard = RecursionGuard::new(1, 100);
        assert_eq!(guard.enter(1u32), RecursionResult::Entered);
        let denied = guard.enter(2u32);
        assert_eq!(denied, RecursionResult::DepthExceeded);
        assert!(denied.is_exceeded());
        guard.leave(1);
        assert!(guard.is_exceeded());
    }

    #[test]
    fn iteration_budget_counts_denied_attempts() {
        let mut guard = RecursionGuard::new(10, 2);
        assert_eq!(guard.enter(1u32), RecursionResult::Entered);
        assert_eq!(guard.enter(1u32), RecursionResult::Cycle);
        assert_eq!(guard.enter(2u32), RecursionResult::IterationExceeded);
        guard.leave(1);
    }

    #[test]
    fn visiting_set_cap_reports_depth() {
        let mut guard = RecursionGuard::new(100, 100).with_max_visiting(1);
        assert_eq!(guard.enter(1u32), RecursionResult::Entered);
        assert_eq!(guard.enter(2u32), RecursionResult::DepthExceeded);
        guard.leave(1);
    }
}
