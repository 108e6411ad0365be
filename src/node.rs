/// Index of a node in the trie's arena. The root is always [`NodeId::ROOT`].
///
/// A single concrete width rather than a pluggable `u8`/`u16`/`u32`/`u64`
/// state-id type: this trie never needs to trade memory for a narrower id,
/// so there's no reason to keep that knob generic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single trie vertex.
///
/// `outgoing` is unsorted (append-only, linear-scanned) while the trie is
/// open, and sorted ascending by symbol once `finalize` runs so lookups can
/// binary search.
#[derive(Clone, Debug)]
pub(crate) struct Node<A> {
    pub(crate) depth: u32,
    pub(crate) outgoing: Vec<(A, NodeId)>,
    /// The pattern that terminates at this node, if any, set by `add`
    /// before aggregation. At most one: a second pattern landing here is
    /// rejected as a duplicate.
    pub(crate) own_pattern: Option<usize>,
    /// The node's own terminal pattern plus everything inherited through
    /// the failure chain, in order of first appearance. Empty until
    /// `finalize` runs (aside from holding `own_pattern` pre-finalize).
    pub(crate) matched: Vec<usize>,
    pub(crate) is_final: bool,
    /// `None` only for the root; every other node gets a failure link once
    /// finalized, possibly pointing at the root itself.
    pub(crate) failure: Option<NodeId>,
    /// The single "best" replacement pattern for this node, chosen at
    /// finalize: the longest pattern in `matched` with non-empty `rtext`,
    /// ties broken toward `own_pattern`.
    pub(crate) to_be_replaced: Option<usize>,
}

impl<A> Node<A> {
    pub(crate) fn root() -> Self {
        Node {
            depth: 0,
            outgoing: Vec::new(),
            own_pattern: None,
            matched: Vec::new(),
            is_final: false,
            failure: None,
            to_be_replaced: None,
        }
    }

    pub(crate) fn child(depth: u32) -> Self {
        Node {
            depth,
            outgoing: Vec::new(),
            own_pattern: None,
            matched: Vec::new(),
            is_final: false,
            failure: None,
            to_be_replaced: None,
        }
    }
}

impl<A: Copy + Eq> Node<A> {
    /// Linear scan used while the trie is still open (edges aren't sorted
    /// yet, and there are usually few enough outgoing edges per node that
    /// this beats maintaining sort order on every insert).
    pub(crate) fn find_edge_unsorted(&self, sym: A) -> Option<NodeId> {
        self.outgoing
            .iter()
            .find(|(s, _)| *s == sym)
            .map(|(_, id)| *id)
    }
}

impl<A: Ord + Copy> Node<A> {
    pub(crate) fn sort_edges(&mut self) {
        self.outgoing.sort_by(|(a, _), (b, _)| a.cmp(b));
    }

    /// Binary search used post-finalize.
    pub(crate) fn find_edge_sorted(&self, sym: A) -> Option<NodeId> {
        self.outgoing
            .binary_search_by(|(s, _)| s.cmp(&sym))
            .ok()
            .map(|i| self.outgoing[i].1)
    }
}
