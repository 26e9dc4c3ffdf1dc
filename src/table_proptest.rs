#![cfg(test)]

// Property tests for Table kept inside the crate so they can inspect
// capacity and tombstone bookkeeping alongside the public behavior.

use crate::table::{Table, INITIAL_CAPACITY, MAX_LOAD_FACTOR};
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario(pool_max: usize, ops_max: usize) -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,6}", 1..=pool_max).prop_flat_map(move |pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,6}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..ops_max).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `get`/`contains_key` parity with the model for live and missing keys.
// - Overwrite keeps `len` and passes exactly the old value to the destructor.
// - `remove` moves the model's value out and never calls the destructor.
// - Iteration yields each live key exactly once.
// - Capacity stays >= INITIAL_CAPACITY and live load stays <= MAX_LOAD_FACTOR.
// - Dropping the table releases exactly the values still present.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(48, 200)) {
        let released: Rc<RefCell<Vec<i32>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = released.clone();
        let mut sut = Table::with_destructor(move |v: i32| sink.borrow_mut().push(v));
        let mut model: HashMap<String, i32> = HashMap::new();
        let mut expected_released: Vec<i32> = Vec::new();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = &pool[i];
                    let prev = model.insert(k.clone(), v);
                    prop_assert!(sut.insert(k, v).is_ok());
                    if let Some(old) = prev {
                        expected_released.push(old);
                    }
                    prop_assert_eq!(sut.get(k), Some(&v));
                }
                OpI::Remove(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.remove(k), model.remove(k));
                    prop_assert!(!sut.contains_key(k));
                }
                OpI::Get(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.get(k), model.get(k));
                }
                OpI::Contains(s) => {
                    prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
                }
                OpI::Mutate(i, d) => {
                    let k = &pool[i];
                    match (sut.get_mut(k), model.get_mut(k)) {
                        (Some(sv), Some(mv)) => {
                            *sv = sv.wrapping_add(d);
                            *mv = mv.wrapping_add(d);
                        }
                        (None, None) => {}
                        (s, m) => {
                            prop_assert!(false, "get_mut mismatch: {:?} vs {:?}", s, m);
                        }
                    }
                }
                OpI::Iterate => {
                    let s_keys: Vec<&str> = sut.keys().collect();
                    let unique: BTreeSet<&str> = s_keys.iter().copied().collect();
                    prop_assert_eq!(unique.len(), s_keys.len(), "iteration repeated a key");
                    let m_keys: BTreeSet<&str> = model.keys().map(String::as_str).collect();
                    prop_assert_eq!(unique, m_keys);
                }
            }

            // Post-conditions after each op
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            prop_assert!(sut.capacity() >= INITIAL_CAPACITY);
            prop_assert!(sut.load_factor() <= MAX_LOAD_FACTOR);
            prop_assert_eq!(&*released.borrow(), &expected_released);
        }

        let mut remaining: Vec<i32> = model.values().copied().collect();
        drop(sut);
        let mut on_drop: Vec<i32> = released.borrow()[expected_released.len()..].to_vec();
        remaining.sort_unstable();
        on_drop.sort_unstable();
        prop_assert_eq!(on_drop, remaining);
    }
}

// Property: bulk insert then bulk remove walks the table up through several
// grows and back down through shrinks without losing an entry.
proptest! {
    #![proptest_config(ProptestConfig { cases: 16, .. ProptestConfig::default() })]
    #[test]
    fn prop_grow_then_drain(n in 1usize..2_000, seed in any::<u64>()) {
        let keys: Vec<String> = (0..n).map(|i| format!("{:x}-{}", seed, i)).collect();
        let mut t = Table::new();
        for (i, k) in keys.iter().enumerate() {
            prop_assert!(t.insert(k, i).is_ok());
        }
        prop_assert_eq!(t.len(), n);
        prop_assert_eq!(t.iter().count(), n);
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(t.get(k), Some(&i));
        }
        let peak = t.capacity();
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(t.remove(k), Some(i));
            for (j, rest) in keys.iter().enumerate().skip(i + 1).step_by(97) {
                prop_assert_eq!(t.get(rest), Some(&j));
            }
        }
        prop_assert!(t.is_empty());
        prop_assert!(t.capacity() <= peak);
        prop_assert!(t.capacity() >= INITIAL_CAPACITY);
    }
}
