#![cfg(test)]

// Property tests for HashTable and MultiValueHashTable kept inside the crate
// so they can inspect bucket occupancy alongside the public surface.

use crate::behavior::{KeyHasher, Standard, StdHash};
use crate::error::Error;
use crate::hash_table::HashTable;
use crate::instrumented::Instrumented;
use crate::multi_value_hash_table::MultiValueHashTable;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeMap, BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Lookup(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Lookup),
            prop_oneof![contains_pool, "[a-z]{0,5}".prop_map(|s| s)].prop_map(OpI::Contains),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives one table through `ops` in lockstep with a std HashMap model.
fn run_state_machine<H>(
    sut: &mut HashTable<String, i32, Standard, Standard, H>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    H: KeyHasher<String>,
{
    let mut model: HashMap<String, i32> = HashMap::new();
    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                match sut.insert(k, &v) {
                    Ok(()) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        model.insert(k.clone(), v);
                    }
                    Err(Error::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                    }
                    Err(e) => prop_assert!(false, "unexpected error {:?}", e),
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                match sut.remove(k) {
                    Ok(()) => prop_assert!(model.remove(k).is_some()),
                    Err(Error::NotFound) => prop_assert!(!model.contains_key(k)),
                    Err(e) => prop_assert!(false, "unexpected error {:?}", e),
                }
            }
            OpI::Lookup(i) => {
                let k = &pool[i];
                let got = sut.lookup(k).map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert_eq!(got, model.get(k).copied());
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k) {
                    *v = v.saturating_add(d);
                }
                if let Some(mv) = model.get_mut(k) {
                    *mv = mv.saturating_add(d);
                }
            }
            OpI::Iterate => {
                let s: BTreeMap<_, _> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let m: BTreeMap<_, _> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s.len(), sut.len(), "iter yields each entry once");
                prop_assert_eq!(s, m);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.occupied_buckets() <= sut.len());
        prop_assert_eq!(sut.occupied_buckets() == 0, model.is_empty());
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// - Duplicate keys are rejected and leave the stored value untouched.
// - `lookup`/`contains_key` parity; `remove` reports NotFound exactly when
//   the model lacks the key.
// - `iter` yields each live entry exactly once.
// - No bucket stays occupied once the table is empty.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), buckets in 1usize..13) {
        let mut sut = HashTable::new(Standard, Standard, StdHash::new(), buckets).unwrap();
        run_state_machine(&mut sut, &pool, ops)?;
    }
}

// Property: same invariants with every key hashed to one bucket, so all
// resolution happens by key equality inside a single chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let mut sut = HashTable::new(Standard, Standard, |_: &String| 0u64, 7).unwrap();
        run_state_machine(&mut sut, &pool, ops)?;
        prop_assert!(sut.occupied_buckets() <= 1);
    }
}

#[derive(Clone, Debug)]
enum MultiOp {
    Add(usize, u8),
    Remove(usize, u8),
}

fn arb_multi_scenario() -> impl Strategy<Value = (usize, Vec<MultiOp>)> {
    (1usize..=6).prop_flat_map(|keys| {
        let op = prop_oneof![
            (0..keys, 0u8..4).prop_map(|(k, v)| MultiOp::Add(k, v)),
            (0..keys, 0u8..4).prop_map(|(k, v)| MultiOp::Remove(k, v)),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (keys, ops))
    })
}

// Property: MultiValueHashTable matches a map of Vecs, where remove takes out
// the first equal value and a key disappears with its last value. Dropping the
// table frees every key and value copy it made.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_multi_value_matches_model((keys, ops) in arb_multi_scenario()) {
        let kb = Instrumented::new(Standard);
        let vb = Instrumented::new(Standard);
        let names: Vec<String> = (0..keys).map(|i| format!("key{}", i)).collect();
        {
            let mut sut = MultiValueHashTable::new(kb.clone(), vb.clone(), StdHash::new(), 3).unwrap();
            let mut model: BTreeMap<String, Vec<u8>> = BTreeMap::new();
            for op in ops {
                match op {
                    MultiOp::Add(k, v) => {
                        prop_assert!(sut.add(&names[k], &v).is_ok());
                        model.entry(names[k].clone()).or_default().push(v);
                    }
                    MultiOp::Remove(k, v) => {
                        let in_model = model
                            .get(&names[k])
                            .and_then(|vals| vals.iter().position(|x| *x == v));
                        match (sut.remove(&names[k], &v), in_model) {
                            (Ok(()), Some(pos)) => {
                                let vals = model.get_mut(&names[k]).unwrap();
                                vals.remove(pos);
                                if vals.is_empty() {
                                    model.remove(&names[k]);
                                }
                            }
                            (Err(Error::NotFound), None) => {}
                            (r, m) => prop_assert!(false, "remove mismatch: {:?} vs {:?}", r, m),
                        }
                    }
                }
                prop_assert_eq!(sut.len(), model.len());
                prop_assert_eq!(sut.value_count(), model.values().map(Vec::len).sum::<usize>());
            }
            for (k, vals) in &model {
                let list = sut.lookup(k);
                prop_assert!(list.is_some());
                let got: Vec<u8> = list.map(|l| l.iter().copied().collect()).unwrap_or_default();
                prop_assert_eq!(&got, vals);
            }
            let keys_seen: BTreeSet<String> = sut.iter().map(|(k, _)| k.clone()).collect();
            prop_assert_eq!(keys_seen, model.keys().cloned().collect::<BTreeSet<_>>());
        }
        prop_assert_eq!(kb.counts().outstanding(), 0);
        prop_assert_eq!(vb.counts().outstanding(), 0);
    }
}
