//! Sequence-matching similarity between a submitted and an expected answer.
//!
//! Implements the Ratcliff/Obershelp ratio: recursively find the longest
//! common block, then match the pieces to its left and right. The ratio is
//! `2 * M / T` where `M` is the total matched character count and `T` the
//! combined length of both normalized strings.

use std::collections::HashMap;

use crate::normalize::normalize;

/// Similarity between two raw strings, in `[0, 1]`.
///
/// Both inputs are normalized first. The score is 1.0 iff the normalized
/// strings are identical and 0.0 when no characters align. Symmetric:
/// `similarity(a, b) == similarity(b, a)`.
pub fn similarity(a: &str, b: &str) -> f64 {
    ratio(&normalize(a), &normalize(b))
}

/// The matching ratio of two already-normalized strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Block matching prefers the earliest match in the first argument, so a
    // fixed argument order keeps the score symmetric.
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let x: Vec<char> = first.chars().collect();
    let y: Vec<char> = second.chars().collect();

    let matched = matched_total(&x, 0, x.len(), &y, 0, y.len());
    2.0 * matched as f64 / (x.len() + y.len()) as f64
}

/// Total matched character count across all matching blocks in
/// `a[alo..ahi]` vs `b[blo..bhi]`.
fn matched_total(a: &[char], alo: usize, ahi: usize, b: &[char], blo: usize, bhi: usize) -> usize {
    let (i, j, size) = longest_match(a, alo, ahi, b, blo, bhi);
    if size == 0 {
        return 0;
    }
    size + matched_total(a, alo, i, b, blo, j) + matched_total(a, i + size, ahi, b, j + size, bhi)
}

/// Longest matching block in `a[alo..ahi]` vs `b[blo..bhi]`, preferring the
/// earliest occurrence in `a`, then in `b`.
fn longest_match(
    a: &[char],
    alo: usize,
    ahi: usize,
    b: &[char],
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best_i = alo;
    let mut best_j = blo;
    let mut best_size = 0usize;

    // j2len maps an end index in b to the length of the match ending there
    // for the previous i.
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = if j > blo {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                new_j2len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = new_j2len;
    }

    (best_i, best_j, best_size)
}
