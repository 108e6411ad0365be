use std::ops::ControlFlow;

use log::{debug, warn};

use crate::error::MatchError;
use crate::pattern::Pattern;
use crate::replace::{self, ReplaceMode, ReplaceState};
use crate::search::{self, Match, PullCursor, SearchCursor, SearchOutcome};
use crate::trie::Trie;
use crate::Symbol;

/// A multi-pattern matching and replacement automaton.
///
/// Lifecycle: register patterns with [`Automaton::add`], call
/// [`Automaton::finalize`] once, then drive any number of searches or
/// replacements over chunked input. `add` after `finalize` is rejected with
/// [`MatchError::AutomataClosed`].
pub struct Automaton<'p, A> {
    trie: Trie<'p, A>,
    open: bool,
    cursor: SearchCursor,
    replace_state: ReplaceState<A>,
}

impl<'p, A: Symbol> Automaton<'p, A> {
    pub fn new() -> Self {
        debug!("constructing new automaton");
        Automaton {
            trie: Trie::new(),
            open: true,
            cursor: SearchCursor::new(),
            replace_state: ReplaceState::new(),
        }
    }

    /// Registers a pattern. `copy = true` clones `pattern`'s text into an
    /// owned buffer so the automaton no longer borrows from the caller;
    /// `copy = false` keeps the borrow, which the `'p` lifetime parameter
    /// ties to the automaton's own lifetime.
    pub fn add(&mut self, pattern: Pattern<'p, A>, copy: bool) -> Result<(), MatchError> {
        if !self.open {
            return Err(MatchError::AutomataClosed);
        }

        let pattern = if copy { pattern.into_owned() } else { pattern };

        match self.trie.add(pattern) {
            Ok(()) => Ok(()),
            Err(MatchError::DuplicatePattern) => {
                warn!("duplicate pattern rejected");
                Err(MatchError::DuplicatePattern)
            }
            Err(e) => Err(e),
        }
    }

    /// Computes failure links, aggregates matches along them, sorts each
    /// node's outgoing edges, and books the replacement bindings. Clears
    /// the `open` flag; calling `finalize` again is a no-op.
    pub fn finalize(&mut self) {
        if !self.open {
            return;
        }
        self.trie.finalize();
        self.open = false;
        debug!(
            "finalized automaton with {} nodes, {} patterns",
            self.trie.node_count(),
            self.trie.pattern_count()
        );
    }

    /// Searches `text`, invoking `callback` once per match in ascending
    /// position order. `keep = true` resumes from this automaton's default
    /// cursor (persisting it across chunked calls); `keep = false` restarts
    /// from the root.
    ///
    /// If the callback returns `ControlFlow::Break`, the search stops and
    /// the default cursor is left exactly as it was before this call — see
    /// `DESIGN.md` for why a stopped search does not persist partial
    /// progress.
    pub fn search(
        &mut self,
        text: &[A],
        keep: bool,
        callback: impl FnMut(Match<'_, 'p, A>) -> ControlFlow<()>,
    ) -> Result<SearchOutcome, MatchError> {
        if self.open {
            return Err(MatchError::NotFinalized);
        }
        Ok(search::run_search(&self.trie, &mut self.cursor, text, keep, callback))
    }

    /// Like [`Automaton::search`], but against an explicit `cursor` instead
    /// of the automaton's own, so one finalized automaton can be driven by
    /// many threads concurrently, each owning its own `SearchCursor`.
    pub fn search_thread_safe(
        &self,
        cursor: &mut SearchCursor,
        text: &[A],
        keep: bool,
        callback: impl FnMut(Match<'_, 'p, A>) -> ControlFlow<()>,
    ) -> Result<SearchOutcome, MatchError> {
        if self.open {
            return Err(MatchError::NotFinalized);
        }
        Ok(search::run_search(&self.trie, cursor, text, keep, callback))
    }

    /// Switches to pull-style matching: repeated calls to the returned
    /// cursor's `find_next` return one match at a time from `text`.
    /// `keep` controls whether the default cursor's `node`/`base_position`
    /// carry over from the previous `set_text`; the relative position
    /// within `text` itself always restarts at zero.
    pub fn set_text<'t>(&'t mut self, text: &'t [A], keep: bool) -> PullCursor<'t, 'p, A> {
        if !keep {
            self.cursor = SearchCursor::new();
        }
        PullCursor {
            trie: &self.trie,
            cursor: &mut self.cursor,
            text,
            pos: 0,
        }
    }

    /// Streams a replacement pass over `text`, invoking `callback` whenever
    /// the internal output buffer fills. Call [`Automaton::flush`] once the
    /// input is exhausted to emit what's left buffered.
    pub fn replace(
        &mut self,
        text: &[A],
        mode: ReplaceMode,
        callback: impl FnMut(&[A]),
    ) -> Result<(), MatchError> {
        if self.open {
            return Err(MatchError::NotFinalized);
        }
        if !self.trie.has_replacement {
            return Err(MatchError::NoReplacement);
        }
        replace::replace_chunk(&self.trie, &mut self.cursor, &mut self.replace_state, text, mode, callback);
        Ok(())
    }

    /// Emits any replacement output still buffered and resets the
    /// replacement session (backlog, pending nominees, and the default
    /// cursor).
    pub fn flush(&mut self, callback: impl FnMut(&[A])) {
        debug!("flushing replacement buffers");
        replace::flush(&self.trie, &mut self.cursor, &mut self.replace_state, callback);
    }

    /// Consumes the automaton. Provided for parity with the original API's
    /// explicit release call; dropping `self` directly has the same effect,
    /// since every buffer here is a plain owned `Vec`.
    pub fn release(self) {
        debug!("releasing automaton");
    }
}

impl<'p, A: Symbol> Default for Automaton<'p, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // S6: adding the same pattern twice is rejected; the pattern count
    // after finalize reflects only the first registration.
    #[test]
    fn s6_duplicate_pattern() {
        let mut automaton: Automaton<u8> = Automaton::new();
        automaton.add(Pattern::new(b"foo", 1i64), false).unwrap();
        let err = automaton.add(Pattern::new(b"foo", 2i64), false).unwrap_err();
        assert_eq!(err, MatchError::DuplicatePattern);

        automaton.finalize();
        assert_eq!(automaton.trie.pattern_count(), 1);
    }

    #[test]
    fn search_before_finalize_is_rejected() {
        let mut automaton: Automaton<u8> = Automaton::new();
        automaton.add(Pattern::new(b"foo", 1i64), false).unwrap();
        let result = automaton.search(b"foobar", false, |_| ControlFlow::Continue(()));
        assert_eq!(result.unwrap_err(), MatchError::NotFinalized);
    }

    #[test]
    fn add_after_finalize_is_rejected() {
        let mut automaton: Automaton<u8> = Automaton::new();
        automaton.finalize();
        let err = automaton.add(Pattern::new(b"foo", 1i64), false).unwrap_err();
        assert_eq!(err, MatchError::AutomataClosed);
    }

    #[test]
    fn finalize_twice_is_a_no_op() {
        let mut automaton: Automaton<u8> = Automaton::new();
        automaton.add(Pattern::new(b"foo", 1i64), false).unwrap();
        automaton.finalize();
        let node_count = automaton.trie.node_count();
        automaton.finalize();
        assert_eq!(automaton.trie.node_count(), node_count);
    }

    #[test]
    fn replace_without_replacement_patterns_is_rejected() {
        let mut automaton: Automaton<u8> = Automaton::new();
        automaton.add(Pattern::new(b"foo", 1i64), false).unwrap();
        automaton.finalize();
        let err = automaton.replace(b"foobar", ReplaceMode::Normal, |_| {}).unwrap_err();
        assert_eq!(err, MatchError::NoReplacement);
    }

    #[test]
    fn copy_true_detaches_from_caller_buffer() {
        let mut buf = vec![b'f', b'o', b'o'];
        let mut automaton: Automaton<u8> = Automaton::new();
        automaton.add(Pattern::new(&buf, 1i64), true).unwrap();
        buf[0] = b'z'; // mutated after add; the automaton's own copy must be unaffected
        automaton.finalize();

        let mut hits = 0;
        automaton
            .search(b"a foo bar", false, |_| {
                hits += 1;
                ControlFlow::Continue(())
            })
            .unwrap();
        assert_eq!(hits, 1);
    }
}
