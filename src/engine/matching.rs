//! engine::matching
//!
//! Neighbor matching: how many ties of the left node find a partner among
//! the ties of the right node.
//!
//! # Modes
//!
//! - [`Matching::Set`]: a tie is matched when any compatible partner
//!   exists; partners may be reused
//! - [`Matching::Multiset`]: maximum bipartite matching, every partner
//!   used at most once
//! - [`Matching::ClassSet`]: ties are first grouped by the class of their
//!   target; groups are matched one-to-one

use std::collections::HashMap;

use crate::core::network::Tie;

/// How ties of two nodes are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Matching {
    Set,
    Multiset,
    ClassSet,
}

/// Count the items of `lhs` left unmatched.
///
/// Counting stops as soon as the count exceeds `limit`; the returned value
/// is then only known to be greater than `limit`. For
/// [`Matching::ClassSet`] the count is in groups, not ties.
pub(crate) fn unmatched(
    mode: Matching,
    lhs: &[Tie],
    rhs: &[Tie],
    class_of: impl Fn(usize) -> usize,
    compatible: impl Fn(&Tie, &Tie) -> bool,
    limit: usize,
) -> usize {
    match mode {
        Matching::Set => {
            let mut failures = 0;
            for x in lhs {
                if !rhs.iter().any(|y| compatible(x, y)) {
                    failures += 1;
                    if failures > limit {
                        break;
                    }
                }
            }
            failures
        }
        Matching::Multiset => {
            if lhs.len() > rhs.len() + limit {
                return lhs.len() - rhs.len();
            }
            let adjacency: Vec<Vec<usize>> = lhs
                .iter()
                .map(|x| {
                    rhs.iter()
                        .enumerate()
                        .filter(|(_, y)| compatible(x, y))
                        .map(|(index, _)| index)
                        .collect()
                })
                .collect();
            lhs.len() - maximum_matching(&adjacency, rhs.len())
        }
        Matching::ClassSet => {
            let left = group_by_class(lhs, &class_of);
            let right = group_by_class(rhs, &class_of);
            if left.len() > right.len() + limit {
                return left.len() - right.len();
            }
            let adjacency: Vec<Vec<usize>> = left
                .iter()
                .map(|g| {
                    right
                        .iter()
                        .enumerate()
                        .filter(|(_, h)| g.iter().any(|x| h.iter().any(|y| compatible(x, y))))
                        .map(|(index, _)| index)
                        .collect()
                })
                .collect();
            left.len() - maximum_matching(&adjacency, right.len())
        }
    }
}

/// Group ties by the class of their target, groups in order of first
/// appearance.
pub(crate) fn group_by_class<'t>(ties: &'t [Tie], class_of: &impl Fn(usize) -> usize) -> Vec<Vec<&'t Tie>> {
    let mut index: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<&Tie>> = Vec::new();
    for tie in ties {
        let class = class_of(tie.target);
        let slot = *index.entry(class).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(tie);
    }
    groups
}

/// Size of a maximum matching in a bipartite graph (augmenting paths).
///
/// `adjacency[l]` lists the right vertices `0..right` adjacent to left
/// vertex `l`.
pub(crate) fn maximum_matching(adjacency: &[Vec<usize>], right: usize) -> usize {
    let mut owner: Vec<Option<usize>> = vec![None; right];
    let mut size = 0;
    for left in 0..adjacency.len() {
        let mut seen = vec![false; right];
        if augment(left, adjacency, &mut owner, &mut seen) {
            size += 1;
        }
    }
    size
}

fn augment(
    left: usize,
    adjacency: &[Vec<usize>],
    owner: &mut [Option<usize>],
    seen: &mut [bool],
) -> bool {
    for &right in &adjacency[left] {
        if seen[right] {
            continue;
        }
        seen[right] = true;
        let free = match owner[right] {
            None => true,
            Some(other) => augment(other, adjacency, owner, seen),
        };
        if free {
            owner[right] = Some(left);
            return true;
        }
    }
    false
}
