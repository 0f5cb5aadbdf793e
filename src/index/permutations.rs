//! Facet-subset enumeration for the permutation indexer.
//!
//! For sorted facets `F = [f0..fn)` the generator yields the empty set, then
//! for each anchor `f_i` in ascending order: `{f_i}` followed by
//! `{f_i} ∪ F[start..start+len)` for every `start > i` and every `len` that
//! stays in bounds. Only contiguous runs after the anchor are combined, so
//! gapped subsets are not produced: with `A < B < C < D`, `{A, D}` is
//! generated but `{A, B, D}` is not. Filters naming a gapped combination
//! therefore match no aggregation.

/// Lazy subset generator over a sorted, deduplicated facet slice.
pub struct Permutations<'a> {
    facets: &'a [u16],
    emitted_empty: bool,
    anchor: usize,
    run: Option<(usize, usize)>,
}

pub fn permutations(facets: &[u16]) -> Permutations<'_> {
    debug_assert!(facets.windows(2).all(|w| w[0] < w[1]));
    Permutations {
        facets,
        emitted_empty: false,
        anchor: 0,
        run: None,
    }
}

/// Number of subsets [`permutations`] yields for `n` facets, empty set included.
pub fn subset_count(n: usize) -> usize {
    // 1 (empty) + n (singletons) + C(n+1, 3) (anchor plus a non-empty run)
    1 + n + (n + 1) * n * n.saturating_sub(1) / 6
}

impl Iterator for Permutations<'_> {
    type Item = Vec<u16>;

    fn next(&mut self) -> Option<Vec<u16>> {
        if !self.emitted_empty {
            self.emitted_empty = true;
            return Some(Vec::new());
        }

        let n = self.facets.len();
        loop {
            if self.anchor >= n {
                return None;
            }
            let anchor = self.facets[self.anchor];
            match self.run {
                None => {
                    self.run = Some((self.anchor + 1, 1));
                    return Some(vec![anchor]);
                }
                Some((start, _)) if start >= n => {
                    self.anchor += 1;
                    self.run = None;
                }
                Some((start, len)) if start + len > n => {
                    self.run = Some((start + 1, 1));
                }
                Some((start, len)) => {
                    self.run = Some((start, len + 1));
                    let mut subset = Vec::with_capacity(len + 1);
                    subset.push(anchor);
                    subset.extend_from_slice(&self.facets[start..start + len]);
                    return Some(subset);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_no_facets_yields_only_empty_set() {
        let subsets: Vec<Vec<u16>> = permutations(&[]).collect();
        assert_eq!(subsets, vec![Vec::<u16>::new()]);
    }

    #[test]
    fn test_enumeration_order_for_three_facets() {
        let subsets: Vec<Vec<u16>> = permutations(&[1, 2, 3]).collect();
        assert_eq!(
            subsets,
            vec![
                vec![],
                vec![1],
                vec![1, 2],
                vec![1, 2, 3],
                vec![1, 3],
                vec![2],
                vec![2, 3],
                vec![3],
            ]
        );
    }

    #[test]
    fn test_gapped_combinations_are_skipped() {
        let subsets: HashSet<Vec<u16>> = permutations(&[1, 2, 3, 4]).collect();
        assert!(subsets.contains(&vec![1, 4]));
        assert!(subsets.contains(&vec![1, 3, 4]));
        assert!(!subsets.contains(&vec![1, 2, 4]));
        assert_eq!(subsets.len(), 15);
    }

    #[test]
    fn test_subsets_are_distinct_sorted_and_counted() {
        for n in 0..9u16 {
            let facets: Vec<u16> = (1..=n).collect();
            let subsets: Vec<Vec<u16>> = permutations(&facets).collect();
            let unique: HashSet<&Vec<u16>> = subsets.iter().collect();
            assert_eq!(subsets.len(), subset_count(n as usize), "n={}", n);
            assert_eq!(unique.len(), subsets.len(), "n={}", n);
            assert!(subsets.iter().all(|s| s.windows(2).all(|w| w[0] < w[1])));
            if n >= 4 {
                assert!(subsets.len() < 1 << n);
            }
        }
    }

    #[test]
    fn test_small_sets_are_full_power_sets() {
        assert_eq!(subset_count(1), 2);
        assert_eq!(subset_count(2), 4);
        assert_eq!(subset_count(3), 8);
        assert_eq!(subset_count(4), 15);
    }
}
