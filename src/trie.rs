use std::collections::VecDeque;

use crate::error::MatchError;
use crate::node::{Node, NodeId};
use crate::pattern::Pattern;
use crate::{Symbol, MAX_PATTERN_LEN};

/// Owns the node arena and the pattern registry for a single automaton.
///
/// `Trie` is the part of `Automaton` that becomes immutable once finalized;
/// splitting it out as its own type lets `search`/`search_thread_safe` hold
/// an immutable borrow of it while mutating a separate cursor field (see
/// `src/automaton.rs`).
#[derive(Clone)]
pub(crate) struct Trie<'p, A> {
    nodes: Vec<Node<A>>,
    patterns: Vec<Pattern<'p, A>>,
    pub(crate) has_replacement: bool,
}

impl<'p, A: Symbol> Trie<'p, A> {
    pub(crate) fn new() -> Self {
        Trie {
            nodes: vec![Node::root()],
            patterns: Vec::new(),
            has_replacement: false,
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<A> {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<A> {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn pattern(&self, idx: usize) -> &Pattern<'p, A> {
        &self.patterns[idx]
    }

    pub(crate) fn patterns(&self) -> &[Pattern<'p, A>] {
        &self.patterns
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Binary search over a node's sorted outgoing edges. Only valid after
    /// `finalize`.
    pub(crate) fn goto(&self, from: NodeId, sym: A) -> Option<NodeId> {
        self.node(from).find_edge_sorted(sym)
    }

    /// Walk the trie from the root, consuming `pattern.ptext()`, allocating
    /// child nodes as needed. Mirrors `ac_automata_add`'s construction loop.
    pub(crate) fn add(&mut self, pattern: Pattern<'p, A>) -> Result<(), MatchError> {
        if pattern.ptext().is_empty() {
            return Err(MatchError::ZeroPattern);
        }
        if pattern.ptext().len() > MAX_PATTERN_LEN {
            return Err(MatchError::LongPattern);
        }

        let mut current = NodeId::ROOT;
        for &sym in pattern.ptext() {
            current = match self.node(current).find_edge_unsorted(sym) {
                Some(next) => next,
                None => {
                    let depth = self.node(current).depth + 1;
                    let id = NodeId(self.nodes.len() as u32);
                    self.nodes.push(Node::child(depth));
                    self.node_mut(current).outgoing.push((sym, id));
                    id
                }
            };
        }

        if self.node(current).own_pattern.is_some() {
            return Err(MatchError::DuplicatePattern);
        }

        let pattern_idx = self.patterns.len();
        let node = self.node_mut(current);
        node.own_pattern = Some(pattern_idx);
        node.matched.push(pattern_idx);
        node.is_final = true;
        self.patterns.push(pattern);

        Ok(())
    }

    /// Failure-link BFS + match aggregation + edge sort + replacement
    /// bookkeeping, in that order.
    ///
    /// The BFS processes nodes in strictly increasing depth order, so by
    /// the time a node's `matched` set is computed, its failure target's
    /// `matched` set is already complete — one pass suffices.
    pub(crate) fn finalize(&mut self) {
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        let root_edges: Vec<(A, NodeId)> = self.node(NodeId::ROOT).outgoing.clone();
        for &(_, child) in &root_edges {
            self.node_mut(child).failure = Some(NodeId::ROOT);
            queue.push_back(child);
        }

        while let Some(id) = queue.pop_front() {
            let edges = self.node(id).outgoing.clone();
            for (sym, child) in edges {
                let failure = self.compute_failure(id, sym);
                self.node_mut(child).failure = Some(failure);

                let inherited = self.node(failure).matched.clone();
                let child_node = self.node_mut(child);
                child_node.matched.extend(inherited);
                // Equivalent to "final if any node on the failure chain is
                // final": matched is empty iff no node in the chain (this
                // one included) terminates a pattern.
                child_node.is_final = !child_node.matched.is_empty();

                queue.push_back(child);
            }
        }

        for node in &mut self.nodes {
            node.sort_edges();
        }

        self.book_replacements();
    }

    /// Finds `failure(child)` where `child` is reached from `parent` via
    /// `sym`: follow `parent`'s own failure chain until a node with an
    /// outgoing edge on `sym` is found, or fall back to the root.
    fn compute_failure(&self, parent: NodeId, sym: A) -> NodeId {
        let mut f = match self.node(parent).failure {
            Some(f) => f,
            None => NodeId::ROOT, // parent is root
        };
        loop {
            if let Some(next) = self.node(f).find_edge_unsorted(sym) {
                return next;
            }
            if f == NodeId::ROOT {
                return NodeId::ROOT;
            }
            f = self.node(f).failure.unwrap_or(NodeId::ROOT);
        }
    }

    fn book_replacements(&mut self) {
        for i in 0..self.nodes.len() {
            let mut best: Option<(usize, usize)> = None; // (pattern_idx, ptext_len)
            for &pat_idx in &self.nodes[i].matched {
                let pat = &self.patterns[pat_idx];
                if !pat.has_replacement() {
                    continue;
                }
                let len = pat.ptext_len();
                if best.map_or(true, |(_, best_len)| len > best_len) {
                    best = Some((pat_idx, len));
                }
            }
            self.nodes[i].to_be_replaced = best.map(|(idx, _)| idx);
        }
        self.has_replacement = self.patterns.iter().any(|p| p.has_replacement());
    }
}
