use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use permdex::config::PermutermConfig;
use permdex::document::DocumentRecord;
use permdex::error::PermdexError;
use permdex::lexical::InvertedIndex;
use permdex::permuterm::{PermutermIndex, TwoThreeTree, WildcardPattern, rotations};

const ALPHABET: &[char] = &['a', 'b', 'c', 'd', 'o', 'g'];

fn random_term(rng: &mut StdRng) -> String {
    let len = rng.random_range(1..=6);
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
        .collect()
}

fn random_index(rng: &mut StdRng, documents: usize) -> InvertedIndex {
    (0..documents)
        .map(|i| {
            let count = rng.random_range(0..8);
            let tokens: Vec<String> = (0..count).map(|_| random_term(rng)).collect();
            DocumentRecord::new(format!("doc{i:03}"), tokens)
        })
        .collect()
}

/// Every pattern shape over the given fragments.
fn patterns(fragments: &[&str]) -> Vec<String> {
    let mut patterns = vec!["*".to_string()];
    for &a in fragments {
        patterns.push(a.to_string());
        patterns.push(format!("{a}*"));
        patterns.push(format!("*{a}"));
        for &b in fragments {
            patterns.push(format!("{a}*{b}"));
        }
    }
    patterns
}

#[test]
fn test_wildcard_matches_brute_force() {
    let fragments = ["a", "d", "g", "do", "og", "ab", "cab", "gg"];

    for seed in 0..8u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let index = random_index(&mut rng, 40);
        let permuterm = PermutermIndex::new(index.clone(), PermutermConfig::default()).unwrap();
        permuterm.tree().check_invariants().unwrap();

        for pattern in patterns(&fragments) {
            let parsed = WildcardPattern::parse(&pattern, permuterm.config()).unwrap();
            let expected: Vec<&str> = index.terms().filter(|t| parsed.matches(t)).collect();
            let actual = permuterm.matching_terms(&pattern).unwrap();
            assert_eq!(actual, expected, "seed {seed}, pattern '{pattern}'");
        }
    }
}

#[test]
fn test_hits_follow_postings() {
    let mut rng = StdRng::seed_from_u64(42);
    let index = random_index(&mut rng, 60);
    let permuterm = PermutermIndex::new(index.clone(), PermutermConfig::default()).unwrap();

    let hits = permuterm.resolve("*o").unwrap();
    let expected: usize = index
        .iter()
        .filter(|(term, _)| term.ends_with('o'))
        .map(|(_, list)| list.len())
        .sum();
    assert_eq!(hits.len(), expected);

    for hit in &hits {
        assert!(hit.term.ends_with('o'));
        assert!(index.lookup(hit.term).unwrap().contains(hit.doc_id));
    }

    let terms: Vec<&str> = hits.iter().map(|h| h.term).collect();
    let mut sorted = terms.clone();
    sorted.sort();
    assert_eq!(terms, sorted, "hits grouped by ascending term");
}

#[test]
fn test_exact_query_finds_every_term() {
    let mut rng = StdRng::seed_from_u64(7);
    let index = random_index(&mut rng, 30);
    let permuterm = PermutermIndex::new(index.clone(), PermutermConfig::default()).unwrap();

    for (term, list) in index.iter() {
        let found = permuterm.matching_postings(term).unwrap();
        assert_eq!(found, vec![(term, list)]);
    }
}

#[test]
fn test_tree_is_insertion_order_independent() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut terms: Vec<String> = (0..300).map(|_| random_term(&mut rng)).collect();
    terms.sort();
    terms.dedup();

    let keys: Vec<(String, usize)> = terms
        .iter()
        .enumerate()
        .flat_map(|(id, term)| rotations(term, '$').into_iter().map(move |r| (r, id)))
        .collect();

    let reference: TwoThreeTree<usize> = keys.iter().cloned().collect();
    reference.check_invariants().unwrap();

    for _ in 0..5 {
        let mut shuffled = keys.clone();
        shuffled.shuffle(&mut rng);
        let tree: TwoThreeTree<usize> = shuffled.into_iter().collect();
        tree.check_invariants().unwrap();

        assert_eq!(tree.len(), reference.len());
        assert!(tree.iter().eq(reference.iter()));

        for prefix in ["$", "a$", "g$d", "og", "$ab", "zz"] {
            assert_eq!(tree.search(prefix), reference.search(prefix));
        }
    }
}

#[test]
fn test_tree_height_is_logarithmic() {
    let mut tree = TwoThreeTree::new();
    for i in 0..10_000u32 {
        tree.insert(format!("{i:06}"), i);
    }
    tree.check_invariants().unwrap();

    // A 2-3 tree with n leaf entries (at most 3 per leaf) has height at most
    // log2(n) + 1.
    let bound = (10_000f64).log2().ceil() as usize + 1;
    assert!(tree.height() <= bound, "height {} > {}", tree.height(), bound);
}

#[test]
fn test_queries_with_custom_markers() {
    let index: InvertedIndex = vec![
        DocumentRecord::new("a", ["us$", "usd"]),
        DocumentRecord::new("b", ["usa"]),
    ]
    .into_iter()
    .collect();

    let config = PermutermConfig {
        sentinel: '\u{1}',
        wildcard: '?',
    };
    let permuterm = PermutermIndex::new(index, config).unwrap();

    assert_eq!(permuterm.matching_terms("us?").unwrap(), vec!["us$", "usa", "usd"]);
    assert_eq!(permuterm.matching_terms("?$").unwrap(), vec!["us$"]);
    assert!(matches!(
        permuterm.matching_terms("u?s?"),
        Err(PermdexError::InvalidQuery { .. })
    ));
}

#[test]
fn test_distinct_terms_never_repeat() {
    // "abab" has repeated rotation substrings; each term must still be
    // reported once.
    let index: InvertedIndex = vec![DocumentRecord::new("d", ["abab", "ab", "b"])]
        .into_iter()
        .collect();
    let permuterm = PermutermIndex::new(index, PermutermConfig::default()).unwrap();

    let terms = permuterm.matching_terms("*b").unwrap();
    let unique: BTreeSet<&str> = terms.iter().copied().collect();
    assert_eq!(terms.len(), unique.len());
    assert_eq!(terms, vec!["ab", "abab", "b"]);
}
