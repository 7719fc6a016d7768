use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(Key),
    Delete(Key),
    Contains(Key),
}

// A narrow key range so duplicates and repeated deletes are common
fn key_strategy() -> impl Strategy<Value = Key> + Clone {
    prop_oneof![
        4 => 0..64u16,
        1 => any::<Key>(),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => key.clone().prop_map(Op::Insert),
        35 => key.clone().prop_map(Op::Delete),
        15 => key.prop_map(Op::Contains),
    ];
    prop::collection::vec(op, 0..=400)
}

fn expand(model: &BTreeMap<Key, usize>) -> Vec<Key> {
    model
        .iter()
        .flat_map(|(&key, &count)| std::iter::repeat(key).take(count))
        .collect()
}

fn height_bound(len: usize) -> f64 {
    2.0 * ((len + 1) as f64).log2()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_matches_multiset(ops in ops_strategy()) {
        let mut tree = Tree::new();
        let mut model: BTreeMap<Key, usize> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key) => {
                    tree.insert(key);
                    *model.entry(key).or_insert(0) += 1;
                }
                Op::Delete(key) => {
                    let expected = match model.get_mut(&key) {
                        Some(count) => {
                            *count -= 1;
                            if *count == 0 {
                                model.remove(&key);
                            }
                            true
                        }
                        None => false,
                    };
                    prop_assert_eq!(tree.delete(key), expected);
                }
                Op::Contains(key) => {
                    prop_assert_eq!(tree.contains(key), model.contains_key(&key));
                }
            }

            tree.check_invariants();
            prop_assert!(tree.height() as f64 <= height_bound(tree.len()));
        }

        let got: Vec<Key> = tree.traverse().map(|entry| entry.key).collect();
        prop_assert_eq!(got, expand(&model));
    }

    #[test]
    fn prop_distinct_inserts_then_drain(keys in prop::collection::btree_set(any::<Key>(), 0..300)) {
        let mut tree = Tree::new();
        for &key in keys.iter() {
            tree.insert(key);
        }
        tree.check_invariants();
        prop_assert_eq!(tree.len(), keys.len());
        let got: Vec<Key> = tree.traverse().map(|entry| entry.key).collect();
        let expected: Vec<Key> = keys.iter().copied().collect();
        prop_assert_eq!(got, expected);

        for &key in keys.iter().rev() {
            prop_assert!(tree.delete(key));
            prop_assert!(!tree.contains(key));
            tree.check_invariants();
        }
        prop_assert!(tree.is_empty());
    }
}
