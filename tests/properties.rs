//! Property testing for IntervalSet.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::ops::RangeInclusive;

use ivset::IntervalSet;
use proptest::{
    arbitrary::any, prop_assert, prop_assert_eq, prop_oneof, proptest, strategy::Strategy,
    test_runner::Config as ProptestConfig,
};

/// 狭い範囲に集中させ、重なりや隣接が頻繁に起きるようにする。
fn dense_range() -> impl Strategy<Value = RangeInclusive<i64>> {
    (-50_i64..50, 0_i64..8).prop_map(|(start, len)| start..=start + len)
}

/// `i64` 全域 (端点を含む) から取る。
fn wide_range() -> impl Strategy<Value = RangeInclusive<i64>> {
    prop_oneof![
        any::<(i64, i64)>().prop_map(|(p1, p2)| p1.min(p2)..=p1.max(p2)),
        (0_i64..4).prop_map(|d| i64::MAX - d..=i64::MAX),
        (0_i64..4).prop_map(|d| i64::MIN..=i64::MIN + d),
    ]
}

fn ranges(
    range: impl Strategy<Value = RangeInclusive<i64>>,
) -> impl Strategy<Value = Vec<RangeInclusive<i64>>> {
    proptest::collection::vec(range, 0..8)
}

fn dense_set() -> impl Strategy<Value = IntervalSet> {
    ranges(dense_range()).prop_map(|rs| IntervalSet::try_from_ranges(rs).unwrap())
}

fn wide_set() -> impl Strategy<Value = IntervalSet> {
    ranges(wide_range()).prop_map(|rs| IntervalSet::try_from_ranges(rs).unwrap())
}

fn is_canonical(set: &IntervalSet) -> bool {
    let pieces: Vec<_> = set.iter_pieces().collect();

    pieces.iter().all(|p| p.start() <= p.end())
        && pieces
            .windows(2)
            .all(|w| i128::from(*w[0].end()) + 1 < i128::from(*w[1].start()))
}

fn std_hash(set: &IntervalSet) -> u64 {
    let mut hasher = DefaultHasher::new();
    set.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn results_are_canonical(a in dense_set(), b in dense_set()) {
        prop_assert!(is_canonical(&a));
        prop_assert!(is_canonical(&a.union(&b)));
        prop_assert!(is_canonical(&a.intersection(&b)));
    }

    #[test]
    fn results_are_canonical_wide(a in wide_set(), b in wide_set()) {
        prop_assert!(is_canonical(&a.union(&b)));
        prop_assert!(is_canonical(&a.intersection(&b)));
    }

    #[test]
    fn commutativity(a in dense_set(), b in dense_set()) {
        prop_assert_eq!(a.union(&b), b.union(&a));
        prop_assert_eq!(a.intersection(&b), b.intersection(&a));
    }

    #[test]
    fn idempotence(a in wide_set()) {
        prop_assert_eq!(a.union(&a), a.clone());
        prop_assert_eq!(a.intersection(&a), a);
    }

    #[test]
    fn membership(a in dense_set(), b in dense_set()) {
        let u = &a | &b;
        let i = &a & &b;
        for x in -60..=60 {
            prop_assert_eq!(u.contains(x), a.contains(x) || b.contains(x), "x = {}", x);
            prop_assert_eq!(i.contains(x), a.contains(x) && b.contains(x), "x = {}", x);
        }
    }

    #[test]
    fn empty_set_laws(a in wide_set()) {
        let empty = IntervalSet::empty();
        prop_assert_eq!(a.union(&empty), a.clone());
        prop_assert_eq!(a.intersection(&empty), empty);
    }

    #[test]
    fn from_ranges_matches_union_fold(rs in ranges(dense_range())) {
        let folded = rs
            .iter()
            .map(|r| IntervalSet::try_from(r.clone()).unwrap())
            .fold(IntervalSet::empty(), |acc, s| acc.union(&s));
        prop_assert_eq!(IntervalSet::try_from_ranges(rs).unwrap(), folded);
    }

    #[test]
    fn element_count_matches_membership(a in dense_set()) {
        let n = (-60..=60).filter(|&x| a.contains(x)).count();
        prop_assert_eq!(a.element_count(), n as u128);
    }

    #[test]
    fn display_round_trip(a in wide_set()) {
        let parsed: IntervalSet = a.to_string().parse().unwrap();
        prop_assert_eq!(parsed, a);
    }

    #[test]
    fn equal_sets_hash_equally(rs in ranges(dense_range())) {
        // 同じ集合を異なる手順で構築する。
        let a = IntervalSet::try_from_ranges(rs.iter().cloned()).unwrap();
        let b = IntervalSet::try_from_ranges(rs.iter().rev().cloned()).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.stable_hash(), b.stable_hash());
        prop_assert_eq!(std_hash(&a), std_hash(&b));
    }
}
