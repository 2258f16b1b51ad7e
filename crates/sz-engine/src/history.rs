//! The undo stack of a session.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use tracing::debug;

use sz_core::State;

use crate::error::{EngineError, EngineResult};

/// Ordered states of a session, oldest first. Never empty.
#[derive(Debug, Clone)]
pub struct History<S> {
    states: Vec<S>,
    seen: HashMap<u64, usize>,
}

impl<S: State> History<S> {
    /// Start a history at `initial`.
    pub fn new(initial: S) -> Self {
        let mut seen = HashMap::new();
        seen.insert(fingerprint(&initial), 1);
        Self {
            states: vec![initial],
            seen,
        }
    }

    /// The state on top of the stack.
    pub fn current(&self) -> &S {
        // `states` always holds the initial state
        &self.states[self.states.len() - 1]
    }

    /// Push the result of a successful move.
    pub fn push(&mut self, state: S) {
        let count = self.seen.entry(fingerprint(&state)).or_insert(0);
        *count += 1;
        if *count > 1 {
            debug!(
                depth = self.states.len(),
                occurrences = *count,
                "state revisited"
            );
        }
        self.states.push(state);
    }

    /// Pop the last move, returning the restored state.
    pub fn undo(&mut self) -> EngineResult<&S> {
        if self.states.len() == 1 {
            return Err(EngineError::AlreadyAtStart);
        }
        if let Some(popped) = self.states.pop() {
            let key = fingerprint(&popped);
            if let Some(count) = self.seen.get_mut(&key) {
                *count -= 1;
                if *count == 0 {
                    self.seen.remove(&key);
                }
            }
        }
        Ok(self.current())
    }

    /// Number of moves above the initial state.
    pub fn depth(&self) -> usize {
        self.states.len() - 1
    }

    /// Number of states, including the initial one.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the history is empty. Never true.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// How many times `state` appears on the stack beyond its first visit.
    pub fn revisits(&self, state: &S) -> usize {
        self.seen
            .get(&fingerprint(state))
            .map_or(0, |n| n.saturating_sub(1))
    }
}

fn fingerprint<S: Hash>(state: &S) -> u64 {
    let mut hasher = DefaultHasher::new();
    state.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Pos(i32, i32);

    impl fmt::Display for Pos {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "({}, {})", self.0, self.1)
        }
    }

    impl State for Pos {
        fn is_goal(&self) -> bool {
            false
        }
    }

    #[test]
    fn starts_at_depth_zero() {
        let h = History::new(Pos(0, 0));
        assert_eq!(h.depth(), 0);
        assert_eq!(h.len(), 1);
        assert_eq!(h.current(), &Pos(0, 0));
    }

    #[test]
    fn undo_at_start_is_rejected() {
        let mut h = History::new(Pos(0, 0));
        assert!(matches!(h.undo(), Err(EngineError::AlreadyAtStart)));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn push_then_undo_restores() {
        let mut h = History::new(Pos(0, 0));
        h.push(Pos(1, 0));
        h.push(Pos(1, 1));
        assert_eq!(h.depth(), 2);
        assert_eq!(h.undo().unwrap(), &Pos(1, 0));
        assert_eq!(h.undo().unwrap(), &Pos(0, 0));
        assert_eq!(h.depth(), 0);
    }

    #[test]
    fn duplicates_are_kept_and_counted() {
        let mut h = History::new(Pos(0, 0));
        h.push(Pos(1, 0));
        h.push(Pos(0, 0));
        assert_eq!(h.len(), 3);
        assert_eq!(h.revisits(&Pos(0, 0)), 1);
        assert_eq!(h.revisits(&Pos(1, 0)), 0);
        h.undo().unwrap();
        assert_eq!(h.revisits(&Pos(0, 0)), 0);
    }

    fn step(p: &Pos, dir: u8) -> Pos {
        match dir % 4 {
            0 => Pos(p.0 + 1, p.1),
            1 => Pos(p.0 - 1, p.1),
            2 => Pos(p.0, p.1 + 1),
            _ => Pos(p.0, p.1 - 1),
        }
    }

    proptest! {
        #[test]
        fn undo_restores_prior_state(moves in proptest::collection::vec(any::<u8>(), 1..40)) {
            let mut h = History::new(Pos(0, 0));
            let mut trail = vec![Pos(0, 0)];
            for dir in &moves {
                let next = step(h.current(), *dir);
                h.push(next.clone());
                trail.push(next);
            }
            while h.depth() > 0 {
                trail.pop();
                let restored = h.undo().unwrap().clone();
                prop_assert_eq!(Some(&restored), trail.last());
            }
            prop_assert_eq!(h.current(), &Pos(0, 0));
        }
    }
}
