use ac_trie::Automaton;
use std::ops::ControlFlow;
use proptest::prelude::*;

fn search_whole(patterns: &[&str], text: &[u8]) -> Vec<(usize, usize)> {
    let mut automaton: Automaton<u8> = Automaton::new();
    for (i, p) in patterns.iter().enumerate() {
        let _ = automaton.add(ac_trie::Pattern::new(p.as_bytes(), i as i64), false);
    }
    automaton.finalize();

    let mut out = Vec::new();
    automaton
        .search(text, false, |m| {
            out.push((m.position(), m.size()));
            ControlFlow::Continue(())
        })
        .unwrap();
    out
}

fn search_chunked(patterns: &[&str], chunks: &[&[u8]]) -> Vec<(usize, usize)> {
    let mut automaton: Automaton<u8> = Automaton::new();
    for (i, p) in patterns.iter().enumerate() {
        let _ = automaton.add(ac_trie::Pattern::new(p.as_bytes(), i as i64), false);
    }
    automaton.finalize();

    let mut out = Vec::new();
    for (i, chunk) in chunks.iter().enumerate() {
        automaton
            .search(chunk, i > 0, |m| {
                out.push((m.position(), m.size()));
                ControlFlow::Continue(())
            })
            .unwrap();
    }
    out
}

proptest! {
    // Invariant 4: splitting the input into any number of chunks and
    // feeding them through with keep=true yields exactly the same match
    // sequence as searching the concatenation in one call.
    #[test]
    fn chunk_split_equivalence(
        text in "[a-c]{0,40}",
        split_at in proptest::collection::vec(0usize..40, 0..4),
    ) {
        let patterns = ["a", "ab", "bc", "abc", "cab", "ca"];
        let bytes = text.as_bytes();

        let mut cuts: Vec<usize> = split_at.into_iter().filter(|&p| p <= bytes.len()).collect();
        cuts.push(0);
        cuts.push(bytes.len());
        cuts.sort_unstable();
        cuts.dedup();

        let chunks: Vec<&[u8]> = cuts.windows(2).map(|w| &bytes[w[0]..w[1]]).collect();

        let whole = search_whole(&patterns, bytes);
        let chunked = search_chunked(&patterns, &chunks);

        prop_assert_eq!(whole, chunked);
    }
}
