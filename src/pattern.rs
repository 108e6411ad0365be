/// A pattern's identifier, opaque to the matching engine and echoed back to
/// callbacks verbatim.
///
/// Mirrors the tagged union the original automaton uses for pattern ids
/// (a plain number or a caller-supplied string tag).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PatternId {
    Numeric(i64),
    Name(String),
}

impl From<i64> for PatternId {
    fn from(n: i64) -> Self {
        PatternId::Numeric(n)
    }
}

impl From<String> for PatternId {
    fn from(s: String) -> Self {
        PatternId::Name(s)
    }
}

impl From<&str> for PatternId {
    fn from(s: &str) -> Self {
        PatternId::Name(s.to_owned())
    }
}

/// Either a borrowed reference into the caller's pattern buffer, or an owned
/// copy the automaton took when `add`'s `copy` flag was set.
#[derive(Clone, Debug)]
pub(crate) enum Storage<'p, A> {
    Owned(Vec<A>),
    Borrowed(&'p [A]),
}

impl<'p, A> Storage<'p, A> {
    pub(crate) fn as_slice(&self) -> &[A] {
        match self {
            Storage::Owned(v) => v.as_slice(),
            Storage::Borrowed(s) => s,
        }
    }

    fn into_owned(self) -> Storage<'p, A>
    where
        A: Clone,
    {
        Storage::Owned(self.as_slice().to_vec())
    }
}

/// An immutable pattern: the text to match, an optional replacement, and an
/// opaque identifier.
///
/// An empty `rtext` means "match only" — no replacement is registered for
/// this pattern.
#[derive(Clone, Debug)]
pub struct Pattern<'p, A> {
    pub(crate) ptext: Storage<'p, A>,
    pub(crate) rtext: Storage<'p, A>,
    pub(crate) id: PatternId,
}

impl<'p, A> Pattern<'p, A> {
    /// A match-only pattern with no replacement text.
    pub fn new(ptext: &'p [A], id: impl Into<PatternId>) -> Self {
        Pattern {
            ptext: Storage::Borrowed(ptext),
            rtext: Storage::Borrowed(&[]),
            id: id.into(),
        }
    }

    /// A pattern with an associated replacement text.
    pub fn with_replacement(ptext: &'p [A], rtext: &'p [A], id: impl Into<PatternId>) -> Self {
        Pattern {
            ptext: Storage::Borrowed(ptext),
            rtext: Storage::Borrowed(rtext),
            id: id.into(),
        }
    }

    pub fn ptext(&self) -> &[A] {
        self.ptext.as_slice()
    }

    pub(crate) fn ptext_len(&self) -> usize {
        self.ptext.as_slice().len()
    }

    pub fn rtext(&self) -> &[A] {
        self.rtext.as_slice()
    }

    pub fn id(&self) -> &PatternId {
        &self.id
    }

    pub fn has_replacement(&self) -> bool {
        !self.rtext.as_slice().is_empty()
    }

    /// Clones the underlying text into owned buffers, detaching the pattern
    /// from the lifetime of the caller's slices. Used by `Automaton::add`
    /// when `copy` is `true`.
    pub(crate) fn into_owned(self) -> Pattern<'p, A>
    where
        A: Clone,
    {
        Pattern {
            ptext: self.ptext.into_owned(),
            rtext: self.rtext.into_owned(),
            id: self.id,
        }
    }
}
