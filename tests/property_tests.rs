//! Property-based tests for lattices and role operators.
//!
//! These tests use proptest to verify algebraic laws across randomly
//! generated networks and lattice values.

use proptest::prelude::*;

use rolework::core::lattice::{BinaryRelation, Lattice, Partition, Ranking};
use rolework::core::network::{Direction, Network, Tie};
use rolework::core::verify::verify_value;
use rolework::engine::{RoleOperator, BINARYRELATION, EQUIVALENCE, RANKING};

/// Strategy for small networks, directed or not.
fn network() -> impl Strategy<Value = Network> {
    (1usize..7, any::<bool>()).prop_flat_map(|(n, directed)| {
        prop::collection::vec(prop::bool::weighted(0.35), n * n).prop_map(move |bits| {
            let mut net = if directed {
                Network::directed(n)
            } else {
                Network::undirected(n)
            };
            for i in 0..n {
                for j in 0..n {
                    if bits[i * n + j] && (directed || i <= j) {
                        net.add_edge(i, j).unwrap();
                    }
                }
            }
            net
        })
    })
}

/// Strategy for symmetric networks: undirected, or directed with every
/// edge reciprocated.
fn symmetric_network() -> impl Strategy<Value = Network> {
    (1usize..7, any::<bool>()).prop_flat_map(|(n, directed)| {
        prop::collection::vec(prop::bool::weighted(0.35), n * n).prop_map(move |bits| {
            let mut net = if directed {
                Network::directed(n)
            } else {
                Network::undirected(n)
            };
            for i in 0..n {
                for j in i..n {
                    if bits[i * n + j] {
                        net.add_edge(i, j).unwrap();
                        if directed && i != j {
                            net.add_edge(j, i).unwrap();
                        }
                    }
                }
            }
            net
        })
    })
}

/// Strategy for a symmetric network, a view direction and a partition.
fn symmetric_network_and_partition() -> impl Strategy<Value = (Network, Direction, Partition)> {
    let directions = vec![Direction::Outgoing, Direction::Incoming, Direction::Both];
    (symmetric_network(), prop::sample::select(directions)).prop_flat_map(|(net, direction)| {
        let n = net.node_count();
        (Just(net), Just(direction), prop::collection::vec(0..n, n))
            .prop_map(|(net, direction, labels)| (net, direction, Partition::new(&labels)))
    })
}

/// Relative, interior and closure of two operators agree on `value`.
fn agree<L: Lattice>(
    plain: &RoleOperator<'_, L>,
    swapping: &RoleOperator<'_, L>,
    value: &L,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(plain.relative(value), swapping.relative(value));
    prop_assert_eq!(plain.interior(value), swapping.interior(value));
    prop_assert_eq!(plain.closure(value), swapping.closure(value));
    Ok(())
}

/// Strategy for a network together with two partitions of its nodes.
fn network_and_partitions() -> impl Strategy<Value = (Network, Partition, Partition)> {
    network().prop_flat_map(|net| {
        let n = net.node_count();
        let labels = prop::collection::vec(0..n, n);
        (Just(net), labels.clone(), labels).prop_map(|(net, a, b)| {
            (net, Partition::new(&a), Partition::new(&b))
        })
    })
}

/// Strategy for rankings: closures of random relations.
fn ranking(n: usize) -> impl Strategy<Value = Ranking> {
    prop::collection::vec(prop::bool::weighted(0.3), n * n)
        .prop_map(move |bits| Ranking::from_pairwise(n, |i, j| bits[i * n + j]))
}

proptest! {
    /// Partition meet and join are the lattice bounds.
    #[test]
    fn partition_meet_join_bounds((_, a, b) in network_and_partitions()) {
        let meet = a.infimum(&b);
        let join = a.supremum(&b);
        prop_assert!(meet.is_below(&a) && meet.is_below(&b));
        prop_assert!(a.is_below(&join) && b.is_below(&join));
        prop_assert_eq!(a.infimum(&join), a.clone());
        prop_assert!(verify_value(&join).ok);
    }

    /// Ranking joins stay transitive.
    #[test]
    fn ranking_join_is_a_preorder(a in ranking(5), b in ranking(5)) {
        let join = a.supremum(&b);
        prop_assert!(verify_value(&join).ok);
        prop_assert!(a.is_below(&join));
        prop_assert!(BinaryRelation::from_ranking(&join).is_preorder());
    }

    /// Interior and closure are idempotent.
    #[test]
    fn fixpoints_are_idempotent((net, p, _) in network_and_partitions()) {
        let regular = EQUIVALENCE.regular().of(net.view(Direction::Outgoing)).make().unwrap();
        let interior = regular.interior(&p);
        prop_assert_eq!(regular.interior(&interior), interior.clone());
        let closure = regular.closure(&p);
        prop_assert_eq!(regular.closure(&closure), closure);
    }

    /// interior(x) <= x <= closure(x).
    #[test]
    fn fixpoints_sandwich_the_input((net, p, _) in network_and_partitions()) {
        let equitable = EQUIVALENCE.equitable().of(net.view(Direction::Incoming)).make().unwrap();
        prop_assert!(equitable.interior(&p).is_below(&p));
        prop_assert!(p.is_below(&equitable.closure(&p)));
    }

    /// Regular interior is isotone.
    #[test]
    fn regular_interior_is_isotone((net, p, q) in network_and_partitions()) {
        let regular = EQUIVALENCE.regular().of(net.view(Direction::Both)).make().unwrap();
        let lower = p.clone();
        let upper = p.supremum(&q);
        prop_assert!(regular.apply(&lower).is_below(&regular.apply(&upper)));
    }

    /// Counting ties refines more than matching them.
    #[test]
    fn equitable_is_finer_than_regular((net, p, _) in network_and_partitions()) {
        let view = net.view(Direction::Outgoing);
        let regular = EQUIVALENCE.regular().of(view).make().unwrap();
        let equitable = EQUIVALENCE.equitable().of(view).make().unwrap();
        prop_assert!(equitable.apply(&p).is_below(&regular.apply(&p)));
    }

    /// Weak and structural operators ignore their input.
    #[test]
    fn constant_operators_ignore_input((net, p, q) in network_and_partitions()) {
        let weak = EQUIVALENCE.weak().of(net.view(Direction::Outgoing)).make().unwrap();
        prop_assert!(weak.is_constant());
        prop_assert_eq!(weak.apply(&p), weak.apply(&q));

        let structural = RANKING.strong_structural().of(net.view(Direction::Incoming)).make().unwrap();
        let rp = Ranking::from_partition(&p);
        let rq = Ranking::from_partition(&q);
        prop_assert_eq!(structural.apply(&rp), structural.apply(&rq));
    }

    /// On symmetric networks, swapping views agree with plain views.
    #[test]
    fn swapping_agrees_on_symmetric_networks((net, direction, p) in symmetric_network_and_partition()) {
        prop_assert!(net.is_symmetric());
        let plain = net.view(direction);
        let swap = net.transposable_view(direction);
        let r = Ranking::from_partition(&p);

        agree(
            &EQUIVALENCE.regular().of(plain).make().unwrap(),
            &EQUIVALENCE.regular().of_transposable(swap).make().unwrap(),
            &p,
        )?;
        agree(
            &RANKING.regular().of(plain).make().unwrap(),
            &RANKING.regular().of_transposable(swap).make().unwrap(),
            &r,
        )?;
        agree(
            &EQUIVALENCE.equitable().of(plain).make().unwrap(),
            &EQUIVALENCE.equitable().of_transposable(swap).make().unwrap(),
            &p,
        )?;
        agree(
            &RANKING.equitable().of(plain).make().unwrap(),
            &RANKING.equitable().of_transposable(swap).make().unwrap(),
            &r,
        )?;
        agree(
            &EQUIVALENCE.strong_structural().of(plain).make().unwrap(),
            &EQUIVALENCE.strong_structural().of_transposable(swap).make().unwrap(),
            &p,
        )?;
        agree(
            &RANKING.strong_structural().of(plain).make().unwrap(),
            &RANKING.strong_structural().of_transposable(swap).make().unwrap(),
            &r,
        )?;

        let by_edge = |x: &Tie, y: &Tie| (x.index % 2).cmp(&(y.index % 2));
        agree(
            &RANKING.weak().of(plain).comp_weak(by_edge).make().unwrap(),
            &RANKING.weak().of_transposable(swap).comp_weak(by_edge).make().unwrap(),
            &r,
        )?;
    }

    /// Ranking and relation fixpoints are idempotent and sandwich the input.
    #[test]
    fn ordered_fixpoints_are_idempotent_and_sandwich((net, p, q) in network_and_partitions()) {
        let view = net.view(Direction::Outgoing);
        let r = Ranking::from_partition(&p).supremum(&Ranking::from_partition(&q));
        let b = BinaryRelation::from_partition(&p).supremum(&BinaryRelation::from_ranking(&r).invert());

        let rankings = [
            RANKING.regular().of(view).make().unwrap(),
            RANKING.equitable().of(view).make().unwrap(),
            RANKING.weakly_equitable().of(view).make().unwrap(),
        ];
        for op in &rankings {
            let interior = op.interior(&r);
            let closure = op.closure(&r);
            prop_assert!(interior.is_below(&r) && r.is_below(&closure));
            prop_assert_eq!(op.interior(&interior), interior.clone());
            prop_assert_eq!(op.closure(&closure), closure.clone());
            prop_assert!(verify_value(&interior).ok && verify_value(&closure).ok);
        }

        let relations = [
            BINARYRELATION.regular().of(view).make().unwrap(),
            BINARYRELATION.equitable().of(view).make().unwrap(),
            BINARYRELATION.weakly_equitable().of(view).make().unwrap(),
        ];
        for op in &relations {
            let interior = op.interior(&b);
            let closure = op.closure(&b);
            prop_assert!(interior.is_below(&b) && b.is_below(&closure));
            prop_assert_eq!(op.interior(&interior), interior.clone());
            prop_assert_eq!(op.closure(&closure), closure.clone());
        }
    }

    /// Operator outputs always satisfy the lattice axioms.
    #[test]
    fn outputs_are_valid_values((net, p, _) in network_and_partitions()) {
        let op = RANKING.regular().of(net.view(Direction::Outgoing)).make().unwrap();
        let r = op.apply(&Ranking::from_partition(&p));
        prop_assert!(verify_value(&r).ok);
        prop_assert!(r.is_below(&Ranking::from_partition(&p)));
    }
}
