use std::ops::ControlFlow;

use crate::node::NodeId;
use crate::pattern::{Pattern, PatternId};
use crate::trie::Trie;
use crate::Symbol;

/// One match event: an end-exclusive `position` in the global input stream
/// (counting all chunks seen so far) and every pattern that ends there.
///
/// Borrowed rather than allocated: `patterns()` walks straight into the
/// trie's aggregated match list for the node the match was reported on.
pub struct Match<'a, 'p, A> {
    position: usize,
    trie: &'a Trie<'p, A>,
    pattern_indices: &'a [usize],
}

impl<'a, 'p, A: Symbol> Match<'a, 'p, A> {
    pub(crate) fn new(trie: &'a Trie<'p, A>, position: usize, pattern_indices: &'a [usize]) -> Self {
        Match {
            position,
            trie,
            pattern_indices,
        }
    }

    /// One past the last matched symbol in the global stream.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of patterns ending at this position.
    pub fn size(&self) -> usize {
        self.pattern_indices.len()
    }

    /// The patterns that end here, in the order they were registered:
    /// the node's own pattern (if any) first, then everything inherited
    /// through the failure chain.
    pub fn patterns(&self) -> impl Iterator<Item = &'a Pattern<'p, A>> + '_ {
        self.pattern_indices.iter().map(move |&i| self.trie.pattern(i))
    }

    pub fn pattern_ids(&self) -> impl Iterator<Item = &'a PatternId> + '_ {
        self.patterns().map(|p| p.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The input was searched to the end.
    Completed,
    /// The callback returned `ControlFlow::Break`; the cursor was not
    /// advanced for any symbols still unconsumed in this call, and (per the
    /// original automaton's literal behavior) not even for the symbols that
    /// were consumed before the stop — a later `keep = true` call resumes
    /// from the state as of the start of *this* call.
    Stopped,
}

/// `(current_node, base_position)` — the persistent state that lets a
/// search resume across chunks. The default (non-thread-safe) API keeps one
/// of these inside `Automaton`; concurrent callers keep one per thread and
/// pass it to `Automaton::search_thread_safe` explicitly.
#[derive(Debug, Clone, Copy)]
pub struct SearchCursor {
    pub(crate) node: NodeId,
    pub(crate) base_position: usize,
}

impl SearchCursor {
    pub fn new() -> Self {
        SearchCursor {
            node: NodeId::ROOT,
            base_position: 0,
        }
    }

    /// Total number of symbols consumed across all chunks so far.
    pub fn base_position(&self) -> usize {
        self.base_position
    }
}

impl Default for SearchCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// The core Aho-Corasick stepping loop, shared by `Automaton::search` and
/// `Automaton::search_thread_safe`.
///
/// A report is only emitted right after a `goto` transition, never right
/// after following a failure link — the failure destination's matches were
/// already reported on whatever node first aggregated them, so reporting
/// again here would double-count them.
pub(crate) fn run_search<'p, A: Symbol>(
    trie: &Trie<'p, A>,
    cursor: &mut SearchCursor,
    text: &[A],
    keep: bool,
    mut callback: impl FnMut(Match<'_, 'p, A>) -> ControlFlow<()>,
) -> SearchOutcome {
    if !keep {
        *cursor = SearchCursor::new();
    }

    let mut current = cursor.node;
    let mut pos = 0usize;

    while pos < text.len() {
        let sym = text[pos];
        let next = trie.goto(current, sym);
        match next {
            Some(n) => {
                current = n;
                pos += 1;
            }
            None => match trie.node(current).failure {
                Some(f) => current = f,
                None => pos += 1,
            },
        }

        if next.is_some() {
            let node = trie.node(current);
            if node.is_final {
                let m = Match::new(trie, cursor.base_position + pos, &node.matched);
                if callback(m).is_break() {
                    return SearchOutcome::Stopped;
                }
            }
        }
    }

    cursor.node = current;
    cursor.base_position += pos;
    SearchOutcome::Completed
}

/// A pull-style cursor returned by `Automaton::set_text`: repeated calls to
/// `find_next` return one match at a time instead of driving a callback.
///
/// Mirrors `ac_automata_settext`/`ac_automata_findnext`: `base_position`
/// only advances once the whole text has been consumed without yielding a
/// trailing match; the relative position within *this* text lives in `pos`
/// and is reset on every new `set_text` call regardless of `keep`.
pub struct PullCursor<'a, 'p, A> {
    pub(crate) trie: &'a Trie<'p, A>,
    pub(crate) cursor: &'a mut SearchCursor,
    pub(crate) text: &'a [A],
    pub(crate) pos: usize,
}

impl<'a, 'p, A: Symbol> PullCursor<'a, 'p, A> {
    pub fn find_next(&mut self) -> Option<Match<'a, 'p, A>> {
        let mut current = self.cursor.node;
        let mut result: Option<(usize, &'a [usize])> = None;

        while self.pos < self.text.len() {
            let sym = self.text[self.pos];
            let next = self.trie.goto(current, sym);
            match next {
                Some(n) => {
                    current = n;
                    self.pos += 1;
                }
                None => match self.trie.node(current).failure {
                    Some(f) => current = f,
                    None => self.pos += 1,
                },
            }

            if next.is_some() {
                let node = self.trie.node(current);
                if node.is_final {
                    result = Some((self.cursor.base_position + self.pos, &node.matched));
                    break;
                }
            }
        }

        self.cursor.node = current;
        if result.is_none() {
            self.cursor.base_position += self.pos;
        }

        result.map(|(position, patterns)| Match::new(self.trie, position, patterns))
    }
}

impl<'a, 'p, A: Symbol> Iterator for PullCursor<'a, 'p, A> {
    type Item = Match<'a, 'p, A>;

    fn next(&mut self) -> Option<Self::Item> {
        self.find_next()
    }
}
