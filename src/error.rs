use thiserror::Error;

/// Every failure mode a caller of [`crate::Automaton`] can observe.
///
/// These mirror the status codes of the original automaton one-for-one;
/// `Success` isn't a variant here because it's just `Ok(())`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// `add` was called after `finalize`.
    #[error("automaton is already finalized; no more patterns can be added")]
    AutomataClosed,

    /// The pattern's `ptext` had zero length.
    #[error("pattern text must not be empty")]
    ZeroPattern,

    /// The pattern's `ptext` was longer than [`crate::MAX_PATTERN_LEN`].
    #[error("pattern length exceeds the maximum of {} symbols", crate::MAX_PATTERN_LEN)]
    LongPattern,

    /// Another pattern already terminates at the same trie node.
    #[error("a pattern already terminates at this node")]
    DuplicatePattern,

    /// `search`/`replace` were called before `finalize`.
    #[error("automaton has not been finalized yet")]
    NotFinalized,

    /// `replace` was called on an automaton with no replacement patterns.
    #[error("automaton has no replacement patterns")]
    NoReplacement,
}
