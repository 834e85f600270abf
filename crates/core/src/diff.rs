//! Line diff producing tagged tokens
//!
//! Wraps `similar` to compare the formatter's expected lines against the
//! actual file lines. Replaced blocks are refined by pairing up similar lines,
//! so a one-line edit shows up as an adjacent removed/added pair instead of
//! being folded into one large block.

use similar::{Algorithm, DiffTag, TextDiff};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use std::ops::Range;

/// Two lines at least this similar are rendered as a changed pair
const SIMILARITY_CUTOFF: f32 = 0.75;

/// A tagged line produced by [`line_diff`]
///
/// Order is meaningful: adjacent tokens belong to the same hunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffToken {
    /// Present in actual but not in expected
    Added(String),
    /// Present in expected but not in actual
    Removed(String),
    /// Present in both
    Common(String),
    /// Intraline guide for the preceding changed line
    Hint(String),
}

impl DiffToken {
    /// Whether this token marks a difference between the two sides
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Added(_) | Self::Removed(_))
    }
}

/// Compare `expected` (formatter output) with `actual` (file contents)
///
/// Lines only in `expected` become [`DiffToken::Removed`], lines only in
/// `actual` become [`DiffToken::Added`].
pub fn line_diff<S: AsRef<str>>(expected: &[S], actual: &[S]) -> Vec<DiffToken> {
    let expected: Vec<&str> = expected.iter().map(AsRef::as_ref).collect();
    let actual: Vec<&str> = actual.iter().map(AsRef::as_ref).collect();

    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_slices(&expected, &actual);

    let mut differ = Differ {
        expected: &expected,
        actual: &actual,
        tokens: Vec::new(),
    };

    // Adjacent delete/insert ops form one replaced block
    let mut pending: Option<(Range<usize>, Range<usize>)> = None;
    for op in diff.ops() {
        let (tag, old, new) = op.as_tag_tuple();
        if tag == DiffTag::Equal {
            if let Some((old_block, new_block)) = pending.take() {
                differ.replace(old_block, new_block);
            }
            differ.common(old);
            continue;
        }

        pending = Some(match pending.take() {
            Some((old_block, new_block)) => {
                (old_block.start..old.end, new_block.start..new.end)
            }
            None => (old, new),
        });
    }
    if let Some((old_block, new_block)) = pending {
        differ.replace(old_block, new_block);
    }

    differ.tokens
}

struct Differ<'a> {
    expected: &'a [&'a str],
    actual: &'a [&'a str],
    tokens: Vec<DiffToken>,
}

impl Differ<'_> {
    fn common(&mut self, range: Range<usize>) {
        for line in &self.expected[range] {
            self.tokens.push(DiffToken::Common((*line).to_string()));
        }
    }

    fn removed(&mut self, range: Range<usize>) {
        for line in &self.expected[range] {
            self.tokens.push(DiffToken::Removed((*line).to_string()));
        }
    }

    fn added(&mut self, range: Range<usize>) {
        for line in &self.actual[range] {
            self.tokens.push(DiffToken::Added((*line).to_string()));
        }
    }

    /// Dispatch a block that may be empty on either side
    fn replace(&mut self, old: Range<usize>, new: Range<usize>) {
        if old.is_empty() || new.is_empty() {
            self.plain_replace(old, new);
        } else {
            self.refine(old, new);
        }
    }

    /// Emit a replaced block as similar pairs with the gaps between them
    ///
    /// Equivalent to repeatedly taking the most similar pair (earliest actual
    /// line, then earliest expected line, on ties) and recursing on both sides
    /// of it, without rescanning the block at every level.
    fn refine(&mut self, old: Range<usize>, new: Range<usize>) {
        let pairs = self.similar_pairs(old.clone(), new.clone());

        let (mut i0, mut j0) = (old.start, new.start);
        for (i, j) in pairs {
            self.anchor_identical(i0..i, j0..j);
            self.changed_pair(self.expected[i], self.actual[j]);
            (i0, j0) = (i + 1, j + 1);
        }
        self.anchor_identical(i0..old.end, j0..new.end);
    }

    /// Chain of line pairs at least [`SIMILARITY_CUTOFF`] alike
    fn similar_pairs(&self, old: Range<usize>, new: Range<usize>) -> Vec<(usize, usize)> {
        let old_chars: Vec<Vec<char>> = self.expected[old.clone()]
            .iter()
            .map(|line| sorted_chars(line))
            .collect();
        let new_chars: Vec<Vec<char>> = self.actual[new.clone()]
            .iter()
            .map(|line| sorted_chars(line))
            .collect();

        let mut heap = BinaryHeap::new();
        for (j, b) in new.zip(&new_chars) {
            for (i, a) in old.clone().zip(&old_chars) {
                if self.expected[i] == self.actual[j] {
                    continue;
                }
                let bound = match_ratio(multiset_overlap(a, b), a.len() + b.len());
                if bound >= SIMILARITY_CUTOFF {
                    heap.push(Candidate {
                        ratio: bound,
                        exact: false,
                        i,
                        j,
                    });
                }
            }
        }

        let mut chain = Chain::default();
        while let Some(candidate) = heap.pop() {
            let Candidate { i, j, exact, .. } = candidate;
            if !chain.admits(i, j) {
                continue;
            }
            if exact {
                chain.insert(i, j);
                continue;
            }

            let ratio = TextDiff::from_chars(self.expected[i], self.actual[j]).ratio();
            if ratio >= SIMILARITY_CUTOFF {
                heap.push(Candidate {
                    ratio,
                    exact: true,
                    i,
                    j,
                });
            }
        }

        chain.into_pairs()
    }

    /// Emit a block with no similar pairs, anchored on identical lines
    fn anchor_identical(&mut self, old: Range<usize>, new: Range<usize>) {
        let mut chain = Chain::default();
        for j in new.clone() {
            for i in old.clone() {
                if self.expected[i] == self.actual[j] {
                    chain.insert(i, j);
                }
            }
        }

        let (mut i0, mut j0) = (old.start, new.start);
        for (i, j) in chain.into_pairs() {
            self.plain_replace(i0..i, j0..j);
            self.tokens
                .push(DiffToken::Common(self.expected[i].to_string()));
            (i0, j0) = (i + 1, j + 1);
        }
        self.plain_replace(i0..old.end, j0..new.end);
    }

    /// Dump an unpaired block, shorter side first
    fn plain_replace(&mut self, old: Range<usize>, new: Range<usize>) {
        if new.len() < old.len() {
            self.added(new);
            self.removed(old);
        } else {
            self.removed(old);
            self.added(new);
        }
    }

    fn changed_pair(&mut self, a: &str, b: &str) {
        let (a_guide, b_guide) = intraline_guides(a, b);

        self.tokens.push(DiffToken::Removed(a.to_string()));
        if !a_guide.is_empty() {
            self.tokens.push(DiffToken::Hint(a_guide));
        }
        self.tokens.push(DiffToken::Added(b.to_string()));
        if !b_guide.is_empty() {
            self.tokens.push(DiffToken::Hint(b_guide));
        }
    }
}

/// Pair of line indices waiting in the best-first queue
///
/// `exact` is false while `ratio` is only an upper bound. At equal ratios
/// bounds come out first, then earlier actual lines, then earlier expected
/// lines.
struct Candidate {
    ratio: f32,
    exact: bool,
    i: usize,
    j: usize,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ratio
            .total_cmp(&other.ratio)
            .then(other.exact.cmp(&self.exact))
            .then(other.j.cmp(&self.j))
            .then(other.i.cmp(&self.i))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Pairs increasing on both sides, keyed by expected index
#[derive(Default)]
struct Chain(BTreeMap<usize, usize>);

impl Chain {
    /// Whether `(i, j)` keeps the chain increasing
    fn admits(&self, i: usize, j: usize) -> bool {
        !self.0.contains_key(&i)
            && self.0.range(..i).next_back().is_none_or(|(_, &b)| b < j)
            && self.0.range(i + 1..).next().is_none_or(|(_, &b)| b > j)
    }

    fn insert(&mut self, i: usize, j: usize) {
        if self.admits(i, j) {
            self.0.insert(i, j);
        }
    }

    fn into_pairs(self) -> Vec<(usize, usize)> {
        self.0.into_iter().collect()
    }
}

fn sorted_chars(line: &str) -> Vec<char> {
    let mut chars: Vec<char> = line.chars().collect();
    chars.sort_unstable();
    chars
}

/// Characters two sorted sequences share, counted with multiplicity
fn multiset_overlap(a: &[char], b: &[char]) -> usize {
    let (mut x, mut y, mut shared) = (0, 0, 0);
    while x < a.len() && y < b.len() {
        match a[x].cmp(&b[y]) {
            Ordering::Less => x += 1,
            Ordering::Greater => y += 1,
            Ordering::Equal => {
                shared += 1;
                x += 1;
                y += 1;
            }
        }
    }
    shared
}

/// Same formula as `TextDiff::ratio`, so a multiset bound never undercuts it
#[allow(clippy::cast_precision_loss)]
fn match_ratio(matches: usize, total: usize) -> f32 {
    if total == 0 {
        return 1.0;
    }
    2.0 * matches as f32 / total as f32
}

/// Character guides marking `-` deleted, `+` inserted and `^` replaced text
fn intraline_guides(a: &str, b: &str) -> (String, String) {
    let mut a_guide = String::new();
    let mut b_guide = String::new();

    for op in TextDiff::from_chars(a, b).ops() {
        let (tag, old, new) = op.as_tag_tuple();
        let (a_mark, b_mark) = match tag {
            DiffTag::Equal => (' ', ' '),
            DiffTag::Delete => ('-', ' '),
            DiffTag::Insert => (' ', '+'),
            DiffTag::Replace => ('^', '^'),
        };
        a_guide.extend(std::iter::repeat_n(a_mark, old.len()));
        b_guide.extend(std::iter::repeat_n(b_mark, new.len()));
    }

    (
        a_guide.trim_end().to_string(),
        b_guide.trim_end().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changes(tokens: &[DiffToken]) -> Vec<&DiffToken> {
        tokens.iter().filter(|t| t.is_change()).collect()
    }

    #[test]
    fn test_identical_input_has_no_changes() {
        let lines = ["a", "b", "c"];
        let tokens = line_diff(&lines, &lines);

        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(|t| matches!(t, DiffToken::Common(_))));
    }

    #[test]
    fn test_empty_inputs() {
        let empty: [&str; 0] = [];
        assert!(line_diff(&empty, &empty).is_empty());
    }

    #[test]
    fn test_expected_only_line_is_removed() {
        let tokens = line_diff(&["a", "b", "c"], &["a", "c"]);
        assert_eq!(changes(&tokens), vec![&DiffToken::Removed("b".to_string())]);
    }

    #[test]
    fn test_actual_only_line_is_added() {
        let tokens = line_diff(&["a", "c"], &["a", "b", "c"]);
        assert_eq!(changes(&tokens), vec![&DiffToken::Added("b".to_string())]);
    }

    #[test]
    fn test_similar_lines_are_paired() {
        let expected = ["int main(){", "return 0;", "}"];
        let actual = ["int main() {", "  return 0;", "}"];
        let tokens = line_diff(&expected, &actual);

        assert_eq!(
            changes(&tokens),
            vec![
                &DiffToken::Removed("int main(){".to_string()),
                &DiffToken::Added("int main() {".to_string()),
                &DiffToken::Removed("return 0;".to_string()),
                &DiffToken::Added("  return 0;".to_string()),
            ]
        );
        assert_eq!(tokens.last(), Some(&DiffToken::Common("}".to_string())));
    }

    #[test]
    fn test_paired_lines_carry_hints() {
        let tokens = line_diff(&["int main(){"], &["int main() {"]);

        assert!(tokens.iter().any(|t| matches!(t, DiffToken::Hint(_))));
        let hint = tokens.iter().find_map(|t| match t {
            DiffToken::Hint(h) => Some(h.as_str()),
            _ => None,
        });
        assert_eq!(hint, Some("          +"));
    }

    #[test]
    fn test_dissimilar_block_dumps_shorter_side_first() {
        let tokens = line_diff(&["alpha", "beta", "gamma"], &["zzz"]);

        assert_eq!(
            changes(&tokens),
            vec![
                &DiffToken::Added("zzz".to_string()),
                &DiffToken::Removed("alpha".to_string()),
                &DiffToken::Removed("beta".to_string()),
                &DiffToken::Removed("gamma".to_string()),
            ]
        );
    }

    #[test]
    fn test_dissimilar_block_equal_length_dumps_expected_first() {
        let tokens = line_diff(&["alpha"], &["zzz"]);

        assert_eq!(
            changes(&tokens),
            vec![
                &DiffToken::Removed("alpha".to_string()),
                &DiffToken::Added("zzz".to_string()),
            ]
        );
    }

    #[test]
    fn test_equally_similar_lines_pair_with_earliest() {
        let tokens = line_diff(&["abcd"], &["abcx", "abcy"]);

        assert_eq!(
            changes(&tokens),
            vec![
                &DiffToken::Removed("abcd".to_string()),
                &DiffToken::Added("abcx".to_string()),
                &DiffToken::Added("abcy".to_string()),
            ]
        );
    }

    #[test]
    fn test_reindented_file_pairs_every_line() {
        let n = 400;
        let expected: Vec<String> = (0..n)
            .map(|i| format!("value_{i} = compute({i},{i});"))
            .collect();
        let actual: Vec<String> = (0..n)
            .map(|i| format!("  value_{i} = compute({i}, {i});"))
            .collect();

        let tokens = line_diff(&expected, &actual);
        let changes = changes(&tokens);

        assert_eq!(changes.len(), 2 * n);
        for (i, pair) in changes.chunks(2).enumerate() {
            assert_eq!(pair[0], &DiffToken::Removed(expected[i].clone()));
            assert_eq!(pair[1], &DiffToken::Added(actual[i].clone()));
        }
    }

    #[test]
    fn test_multiset_overlap() {
        let a = sorted_chars("hello");
        let b = sorted_chars("yellow");
        assert_eq!(multiset_overlap(&a, &b), 4);
        let exact = TextDiff::from_chars("hello", "yellow").ratio();
        assert!(match_ratio(4, a.len() + b.len()) >= exact);
    }

    #[test]
    fn test_intraline_guides() {
        let (a, b) = intraline_guides("abc", "abXc");
        assert_eq!(a, "");
        assert_eq!(b, "  +");
    }
}
