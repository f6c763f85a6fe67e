//! Recursion guard for cycle detection, depth limiting and work bounding
//! in the unifier and the supertype closure.
//!
//! # Design
//!
//! The unifier recurses through generic arguments and climbs supertypes.
//! For well-formed, acyclic metadata that always terminates, but a provider
//! can report structures that grow without bound (an interface parameterized
//! by a deeper instantiation of itself). `RecursionGuard` turns that into a
//! deterministic result instead of a stack overflow:
//!
//! 1. **Cycle detection** via a visiting set (`FxHashSet<K>`)
//! 2. **Depth limiting** to bound stack use
//! 3. **Iteration bounding** to bound total work
//!
//! # Profiles
//!
//! [`RecursionProfile`] names each preset so the limits live in one place:
//!
//! ```ignore
//! let guard = RecursionGuard::with_profile(RecursionProfile::Unification);
//! ```
//!
//! # Safety
//!
//! - **Debug leak detection**: In debug builds, dropping a guard with active
//!   entries panics, catching forgotten `leave()` calls.
//! - **Debug double-leave detection**: In debug builds, leaving a key that is
//!   not being visited panics.

use rustc_hash::FxHashSet;
use std::hash::Hash;

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecursionProfile {
    /// Unification of two type references.
    ///
    /// Depth covers generic nesting plus inheritance height; real hierarchies
    /// stay far below it.
    ///
    /// depth = 64, iterations = 100,000
    #[default]
    Unification,

    /// Walking a base-type chain or flattening interface inheritance.
    ///
    /// Depth bounds the height of the base chain and the nesting of
    /// interface inheritance. Iterations bound the declarations visited
    /// while flattening.
    ///
    /// depth = 64, iterations = 10,000
    SupertypeClosure,

    /// Custom limits for callers with unusual metadata, or tests.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::Unification => 64,
            Self::SupertypeClosure => 64,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::Unification => 100_000,
            Self::SupertypeClosure => 10_000,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }

    /// Limits for the supertype walks a query under this profile performs.
    ///
    /// The named profiles map to [`SupertypeClosure`](Self::SupertypeClosure);
    /// custom limits apply to the walks unchanged, so raising them lets a
    /// query climb taller hierarchies.
    pub const fn closure(self) -> Self {
        match self {
            Self::Unification | Self::SupertypeClosure => Self::SupertypeClosure,
            custom @ Self::Custom { .. } => custom,
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already on the active stack.
    Cycle,
    /// Maximum recursion depth exceeded.
    DepthExceeded,
    /// Maximum iteration count exceeded.
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }

    #[inline]
    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::DepthExceeded | Self::IterationExceeded)
    }
}

// ---------------------------------------------------------------------------
// RecursionGuard
// ---------------------------------------------------------------------------

/// Tracks the active stack of keys, the nesting depth and the total number
/// of entry attempts.
///
/// # Usage
///
/// ```ignore
/// match guard.enter(key.clone()) {
///     RecursionResult::Entered => {
///         let result = do_work();
///         guard.leave(&key);
///         result
///     }
///     RecursionResult::Cycle => handle_cycle(),
///     RecursionResult::DepthExceeded
///     | RecursionResult::IterationExceeded => handle_exceeded(),
/// }
/// ```
pub struct RecursionGuard<K: Hash + Eq + Clone> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Clone> RecursionGuard<K> {
    /// Create a guard with explicit limits.
    ///
    /// Prefer [`with_profile`](Self::with_profile) for standard use cases.
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to enter a recursive computation for `key`.
    ///
    /// On [`RecursionResult::Entered`] the caller **must** call
    /// [`leave`](Self::leave) with the same key when done. Any other result
    /// means nothing was recorded.
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

        self.visiting.insert(key);
        self.depth += 1;
        RecursionResult::Entered
    }

    /// Leave a computation previously entered with `key`.
    ///
    /// # Debug panics
    ///
    /// Panics in debug builds if `key` is not being visited.
    pub fn leave(&mut self, key: &K) {
        let was_present = self.visiting.remove(key);

        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not in the visiting set"
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

    /// Total enter attempts so far (successful or not).
    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Sticky: stays `true` until [`reset`](Self::reset).
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }

    /// Clear all counters while keeping the configured limits.
    ///
    /// # Debug panics
    ///
    /// Panics in debug builds if called while entries are still active.
    pub fn reset(&mut self) {
        debug_assert!(
            self.visiting.is_empty(),
            "RecursionGuard::reset() called with active entries"
        );
        self.visiting.clear();
        self.depth = 0;
        self.iterations = 0;
        self.exceeded = false;
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Clone> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} active entries still in the visiting set",
                self.visiting.len(),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_limits() {
        assert_eq!(RecursionProfile::Unification.max_depth(), 64);
        assert_eq!(RecursionProfile::Unification.max_iterations(), 100_000);
        assert_eq!(RecursionProfile::SupertypeClosure.max_iterations(), 10_000);

        let custom = RecursionProfile::Custom {
            max_depth: 7,
            max_iterations: 42,
        };
        assert_eq!(custom.max_depth(), 7);
        assert_eq!(custom.max_iterations(), 42);
    }

    #[test]
    fn closure_profiles() {
        assert_eq!(
            RecursionProfile::Unification.closure(),
            RecursionProfile::SupertypeClosure
        );
        assert_eq!(
            RecursionProfile::SupertypeClosure.closure(),
            RecursionProfile::SupertypeClosure
        );
        let custom = RecursionProfile::Custom {
            max_depth: 500,
            max_iterations: 1_000_000,
        };
        assert_eq!(custom.closure(), custom);
    }

    #[test]
    fn enter_leave_tracks_depth() {
        let mut guard = RecursionGuard::<u32>::with_profile(RecursionProfile::Unification);
        assert!(guard.enter(1).is_entered());
        assert!(guard.enter(2).is_entered());
        assert_eq!(guard.depth(), 2);
        assert!(guard.is_visiting(&1));

        guard.leave(&2);
        guard.leave(&1);
        assert_eq!(guard.depth(), 0);
        assert_eq!(guard.iterations(), 2);
    }

    #[test]
    fn reentering_active_key_is_cycle() {
        let mut guard = RecursionGuard::<(u32, u32)>::new(10, 100);
        assert!(guard.enter((1, 2)).is_entered());
        let again = guard.enter((1, 2));
        assert!(again.is_cycle());
        assert!(!again.is_exceeded());
        assert!(!guard.is_exceeded());
        guard.leave(&(1, 2));
    }

    #[test]
    fn depth_limit_is_sticky() {
        let mut guard = RecursionGuard::<u32>::new(2, 100);
        assert!(guard.enter(1).is_entered());
        assert!(guard.enter(2).is_entered());
        assert_eq!(guard.enter(3), RecursionResult::DepthExceeded);
        guard.leave(&2);
        guard.leave(&1);
        assert!(guard.is_exceeded());

        guard.reset();
        assert!(!guard.is_exceeded());
        assert_eq!(guard.iterations(), 0);
    }

    #[test]
    fn iteration_budget() {
        let mut guard = RecursionGuard::<u32>::new(100, 3);
        for key in 0..3 {
            assert!(guard.enter(key).is_entered());
            guard.leave(&key);
        }
        assert_eq!(guard.enter(9), RecursionResult::IterationExceeded);
        assert!(guard.is_exceeded());
    }

    #[test]
    fn owned_keys_are_supported() {
        let mut guard = RecursionGuard::<String>::new(4, 10);
        let key = "List<Int32>".to_string();
        assert!(guard.enter(key.clone()).is_entered());
        assert!(guard.enter(key.clone()).is_cycle());
        guard.leave(&key);
    }
}
