//! Header row recognition.
//!
//! A header row is any row whose joined text contains every required label,
//! in any relative order, with arbitrary text around them. The rule is
//! compiled once into a regex alternation over every ordering of the labels.

use regex::Regex;

/// Precompiled matcher for one set of required labels.
#[derive(Debug, Clone)]
pub struct HeaderPattern {
    labels: Vec<String>,
    re: Regex,
}

impl HeaderPattern {
    /// Build a matcher for `labels`. Labels are matched literally and
    /// case-sensitively. Duplicate labels are collapsed. Fails only when the
    /// label set is too large for the compiled alternation.
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Result<Self, regex::Error> {
        let mut unique: Vec<String> = Vec::with_capacity(labels.len());
        for l in labels {
            let l = l.as_ref();
            if !unique.iter().any(|u| u == l) {
                unique.push(l.to_string());
            }
        }

        let escaped: Vec<String> = unique.iter().map(|l| regex::escape(l)).collect();
        let alternation = permutations(escaped.len())
            .into_iter()
            .map(|order| {
                order
                    .into_iter()
                    .map(|i| escaped[i].as_str())
                    .collect::<Vec<_>>()
                    .join(".*")
            })
            .collect::<Vec<_>>()
            .join("|");
        // (?s) lets `.*` cross newlines embedded in quoted header cells.
        let re = Regex::new(&format!("(?s)(?:{})", alternation))?;

        Ok(Self { labels: unique, re })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// True if `text` contains every required label as a non-overlapping
    /// substring, in any order.
    pub fn is_valid_header_row(&self, text: &str) -> bool {
        self.re.is_match(text)
    }

    /// Join a row's cells the way they appear in the file and test it.
    pub fn matches_row<S: AsRef<str>>(&self, cells: &[S]) -> bool {
        let text = cells
            .iter()
            .map(|c| c.as_ref())
            .collect::<Vec<_>>()
            .join(",");
        self.is_valid_header_row(&text)
    }
}

/// All orderings of `0..n` (n! results; label sets are tiny).
fn permutations(n: usize) -> Vec<Vec<usize>> {
    if n == 0 {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for shorter in permutations(n - 1) {
        // Insert the new index at every position of each shorter ordering.
        for pos in 0..=shorter.len() {
            let mut order = shorter.clone();
            order.insert(pos, n - 1);
            out.push(order);
        }
    }
    out
}
