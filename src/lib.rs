//! A streaming Aho-Corasick multi-pattern matching and replacement engine.
//!
//! Register a set of patterns, `finalize` the automaton once, then run any
//! number of searches or replacements over chunked input. The trie is a flat
//! arena (`Vec<Node<A>>`) rather than a web of owned pointers, which turns
//! the usual "failure links form a cycle over a tree" ownership headache
//! into a plain lifetime/index question — see `DESIGN.md`.
//!
//! The alphabet is an opaque symbol type: anything `Copy + Eq + Ord` works,
//! typically `u8`. This crate does not understand regular-expression
//! features, approximate matching, or Unicode normalization — patterns are
//! matched exactly, symbol for symbol.
//!
//! A text file with one `pattern|id` entry per line is a common way to feed
//! patterns into [`Automaton::add`] in bulk; parsing such a file is left to
//! the caller (this crate has no file I/O).

mod automaton;
mod error;
mod node;
mod pattern;
mod replace;
mod search;
mod trie;

pub use crate::automaton::Automaton;
pub use crate::error::MatchError;
pub use crate::pattern::{Pattern, PatternId};
pub use crate::replace::ReplaceMode;
pub use crate::search::{Match, PullCursor, SearchCursor, SearchOutcome};

/// Patterns longer than this are rejected with [`MatchError::LongPattern`].
pub const MAX_PATTERN_LEN: usize = 1024;

/// Size of the replacement engine's output buffer, in symbols, before it is
/// flushed to the caller's callback.
pub const REPLACE_BUFFER_SIZE: usize = 4096;

/// The bound every alphabet symbol must satisfy: matching only ever needs
/// equality and a strict total order (for sorting/binary-searching edges).
pub trait Symbol: Copy + Eq + Ord {}

impl<T: Copy + Eq + Ord> Symbol for T {}
