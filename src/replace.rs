use std::collections::VecDeque;

use crate::pattern::Pattern;
use crate::search::SearchCursor;
use crate::trie::Trie;
use crate::{Symbol, MAX_PATTERN_LEN, REPLACE_BUFFER_SIZE};

/// Overlap resolution policy for `Automaton::replace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceMode {
    /// Greedy "longest wins": a nominee whose window starts at or before an
    /// already-booked nominee's start evicts it. Patterns that turn out to
    /// be factors of a longer match are dropped.
    Normal,
    /// Left-to-right, non-overlapping: a nominee is rejected if its window
    /// starts before either the output cursor or the end of the last
    /// accepted nominee.
    Lazy,
}

impl Default for ReplaceMode {
    fn default() -> Self {
        ReplaceMode::Normal
    }
}

/// A replacement awaiting emission: which pattern, and the end position
/// (global coordinates) its match window closes at. The start is derived as
/// `end_position - pattern.ptext().len()`.
#[derive(Debug, Clone, Copy)]
struct Nominee {
    pattern: usize,
    end_position: usize,
}

/// The replacement engine's persistent state: the output buffer, the
/// cross-chunk backlog, and the pending nominee queue.
///
/// Belongs to one `Automaton` and drives at most one replacement stream at
/// a time; callers needing more parallelism should use one engine instance
/// per thread.
pub(crate) struct ReplaceState<A> {
    output: Vec<A>,
    backlog: Vec<A>,
    /// A `VecDeque` instead of a realloc'd array with a left-shift after
    /// every flush.
    noms: VecDeque<Nominee>,
    /// The global position up to which output has been emitted.
    cursor: usize,
    mode: ReplaceMode,
}

impl<A: Copy> ReplaceState<A> {
    pub(crate) fn new() -> Self {
        ReplaceState {
            output: Vec::with_capacity(REPLACE_BUFFER_SIZE),
            backlog: Vec::with_capacity(MAX_PATTERN_LEN),
            noms: VecDeque::new(),
            cursor: 0,
            mode: ReplaceMode::Normal,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.output.clear();
        self.backlog.clear();
        self.noms.clear();
        self.cursor = 0;
    }

    fn book_nominee<'p>(&mut self, pattern: usize, end_position: usize, patterns: &[Pattern<'p, A>]) {
        let start_position = end_position - patterns[pattern].ptext_len();

        match self.mode {
            ReplaceMode::Lazy => {
                if start_position < self.cursor {
                    return; // overlaps with what's already been emitted
                }
                if let Some(prev) = self.noms.back() {
                    if start_position < prev.end_position {
                        return; // overlaps with the last accepted nominee
                    }
                }
            }
            ReplaceMode::Normal => {
                while let Some(prev) = self.noms.back() {
                    let prev_start = prev.end_position - patterns[prev.pattern].ptext_len();
                    if start_position <= prev_start {
                        self.noms.pop_back(); // prev is a factor of the new match
                    } else {
                        break;
                    }
                }
            }
        }

        self.noms.push_back(Nominee { pattern, end_position });
    }

    /// Appends `text` to the output buffer, flushing whenever it fills.
    fn append_text(output: &mut Vec<A>, text: &[A], flush: &mut impl FnMut(&[A])) {
        let mut i = 0;
        while i < text.len() {
            let space = REPLACE_BUFFER_SIZE - output.len();
            let take = space.min(text.len() - i);
            output.extend_from_slice(&text[i..i + take]);
            i += take;
            if output.len() == REPLACE_BUFFER_SIZE {
                flush(output);
                output.clear();
            }
        }
    }

    /// Appends the global range `[from, to)`, resolving it against the
    /// backlog and/or the current chunk, possibly splitting across both.
    fn append_factor(&mut self, base_position: usize, current_chunk: &[A], from: usize, to: usize, flush: &mut impl FnMut(&[A])) {
        if to < from {
            return;
        }

        if base_position <= from {
            let s = from - base_position;
            let e = to - base_position;
            Self::append_text(&mut self.output, &current_chunk[s..e], flush);
            return;
        }

        let backlog_base = base_position - self.backlog.len();
        if from < backlog_base {
            return; // shouldn't happen
        }

        if to < base_position {
            let s = from - backlog_base;
            let e = to - backlog_base;
            Self::append_text(&mut self.output, &self.backlog[s..e], flush);
        } else {
            let s = from - backlog_base;
            Self::append_text(&mut self.output, &self.backlog[s..], flush);
            let e = to - base_position;
            Self::append_text(&mut self.output, &current_chunk[..e], flush);
        }
    }

    /// Emits everything decidable up to `to_position`: replacing booked
    /// nominees whose window has fully closed, then the gap up to
    /// `to_position`. Consumed nominees are popped off the front.
    fn do_replace<'p>(&mut self, to_position: usize, base_position: usize, patterns: &[Pattern<'p, A>], current_chunk: &[A], flush: &mut impl FnMut(&[A])) {
        if to_position < base_position {
            return;
        }

        while let Some(nom) = self.noms.front().copied() {
            let start = nom.end_position - patterns[nom.pattern].ptext_len();
            if to_position <= start {
                break;
            }

            self.append_factor(base_position, current_chunk, self.cursor, start, flush);
            Self::append_text(&mut self.output, patterns[nom.pattern].rtext(), flush);
            self.cursor = nom.end_position;
            self.noms.pop_front();
        }

        if to_position > self.cursor {
            self.append_factor(base_position, current_chunk, self.cursor, to_position, flush);
            self.cursor = to_position;
        }

        if base_position <= self.cursor {
            // We consumed the whole backlog, or never needed any of it.
            self.backlog.clear();
        }
    }

    /// Saves the suffix of `(backlog ++ current_chunk)` starting at
    /// `bg_pos` (global coordinates) for the next chunk to resolve.
    fn save_to_backlog(&mut self, bg_pos: usize, base_position: usize, current_chunk: &[A]) {
        let bg_pos_r = if base_position < bg_pos {
            bg_pos - base_position
        } else {
            0
        };

        if current_chunk.len() <= bg_pos_r {
            return;
        }

        self.backlog.extend_from_slice(&current_chunk[bg_pos_r..]);
    }
}

/// Replaces matched patterns in `text` with their registered replacement
/// text, streaming output to `callback` as the buffer fills.
///
/// Returns `Err(MatchError::NoReplacement)` if the trie has no pattern with
/// a non-empty `rtext`. Call `flush` once the input is exhausted to emit
/// whatever is left buffered.
pub(crate) fn replace_chunk<'p, A: Symbol>(
    trie: &Trie<'p, A>,
    cursor: &mut SearchCursor,
    state: &mut ReplaceState<A>,
    text: &[A],
    mode: ReplaceMode,
    mut callback: impl FnMut(&[A]),
) {
    state.mode = mode;

    let base_position = cursor.base_position;
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
                if let Some(pattern) = node.to_be_replaced {
                    let end_position = base_position + pos;
                    state.book_nominee(pattern, end_position, trie.patterns());
                }
            }
        }
    }

    let backlog_pos = base_position + text.len() - trie.node(current).depth as usize;

    state.do_replace(backlog_pos, base_position, trie.patterns(), text, &mut callback);
    state.save_to_backlog(backlog_pos, base_position, text);

    cursor.node = current;
    cursor.base_position += pos;
}

/// Flushes all remaining buffered nominees and output, then resets the
/// replacement session (cursor, backlog, noms, and the search cursor).
pub(crate) fn flush<'p, A: Symbol>(
    trie: &Trie<'p, A>,
    cursor: &mut SearchCursor,
    state: &mut ReplaceState<A>,
    mut callback: impl FnMut(&[A]),
) {
    let base = cursor.base_position;
    state.do_replace(base, base, trie.patterns(), &[], &mut callback);
    callback(&state.output);
    state.output.clear();
    state.reset();
    *cursor = SearchCursor::new();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;
    use crate::trie::Trie;

    fn build(patterns: &[(&'static [u8], &'static [u8])]) -> Trie<'static, u8> {
        let mut trie = Trie::new();
        for (i, (ptext, rtext)) in patterns.iter().enumerate() {
            trie.add(Pattern::with_replacement(ptext, rtext, i as i64)).unwrap();
        }
        trie.finalize();
        trie
    }

    fn run_replace(trie: &Trie<'static, u8>, text: &[u8], mode: ReplaceMode) -> Vec<u8> {
        let mut cursor = SearchCursor::new();
        let mut state = ReplaceState::new();
        let mut out = Vec::new();
        replace_chunk(trie, &mut cursor, &mut state, text, mode, |chunk| out.extend_from_slice(chunk));
        flush(trie, &mut cursor, &mut state, |chunk| out.extend_from_slice(chunk));
        out
    }

    // S4: NORMAL mode. "ab"->"X", "abc"->"Y" over "abcab": "abc" evicts "ab"
    // at position 2, leaving the trailing "ab" at position 5 to replace on
    // its own.
    #[test]
    fn s4_normal_eviction() {
        let trie = build(&[(b"ab" as &[u8], b"X" as &[u8]), (b"abc", b"Y")]);
        let out = run_replace(&trie, b"abcab", ReplaceMode::Normal);
        assert_eq!(out, b"YX");
    }

    // S5: LAZY mode. "ab"->"X", "abc"->"Y" over "abc": the earlier,
    // shorter match wins because "abc" starts before the cursor position
    // left by the accepted "ab" nominee.
    #[test]
    fn s5_lazy_left_to_right() {
        let trie = build(&[(b"ab" as &[u8], b"X" as &[u8]), (b"abc", b"Y")]);
        let out = run_replace(&trie, b"abc", ReplaceMode::Lazy);
        assert_eq!(out, b"Xc");
    }

    #[test]
    fn no_match_passes_text_through() {
        let trie = build(&[(b"zzz" as &[u8], b"Q" as &[u8])]);
        let out = run_replace(&trie, b"hello world", ReplaceMode::Normal);
        assert_eq!(out, b"hello world");
    }

    #[test]
    fn replacement_spanning_chunk_boundary() {
        let trie = build(&[(b"abc" as &[u8], b"X" as &[u8])]);
        let mut cursor = SearchCursor::new();
        let mut state = ReplaceState::new();
        let mut out = Vec::new();

        replace_chunk(&trie, &mut cursor, &mut state, b"xxa", ReplaceMode::Normal, |c| out.extend_from_slice(c));
        replace_chunk(&trie, &mut cursor, &mut state, b"bcyy", ReplaceMode::Normal, |c| out.extend_from_slice(c));
        flush(&trie, &mut cursor, &mut state, |c| out.extend_from_slice(c));

        assert_eq!(out, b"xxXyy");
    }

    // Identity replacements (rtext == ptext) must reproduce the input
    // exactly, whether fed as one chunk or split across several.
    #[test]
    fn identity_replacement_round_trips_single_chunk() {
        let trie = build(&[(b"he" as &[u8], b"he" as &[u8]), (b"she", b"she"), (b"hers", b"hers")]);
        let out = run_replace(&trie, b"ushers", ReplaceMode::Normal);
        assert_eq!(out, b"ushers");
    }

    #[test]
    fn identity_replacement_round_trips_chunked() {
        let trie = build(&[
            (b"experience" as &[u8], b"experience" as &[u8]),
            (b"simplicity", b"simplicity"),
            (b"whatever", b"whatever"),
        ]);
        let text = b"experience the ease and simplicity of multifast. whatever you are";

        let mut cursor = SearchCursor::new();
        let mut state = ReplaceState::new();
        let mut out = Vec::new();
        for chunk in text.chunks(7) {
            replace_chunk(&trie, &mut cursor, &mut state, chunk, ReplaceMode::Normal, |c| out.extend_from_slice(c));
        }
        flush(&trie, &mut cursor, &mut state, |c| out.extend_from_slice(c));

        assert_eq!(out, text.to_vec());
    }
}
