// HashTable integration suite.
//
// Exercises the public surface with a caller-defined element type and
// behavior tables, the way a host program would use the crate. Core
// invariants exercised:
// - Ownership: the table keeps its own copies; callers' originals are free
//   to go away after insert.
// - Uniqueness: duplicate keys are rejected without copying anything.
// - Buckets: index is hash mod bucket count; emptied buckets go away.
// - Teardown: every copy is released once through its table.
use chained_hashtable::instrumented::Instrumented;
use chained_hashtable::{Behavior, CopyError, Error, HashTable, Standard, StdHash, TableConfig};
use std::fmt;

fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

// A record that is deliberately not `Clone`: the only way to duplicate it is
// through its behavior table.
#[derive(Debug, PartialEq)]
struct Planet {
    name: String,
    coords: (f32, f32, f32),
}

#[derive(Clone, Default)]
struct Planets;

impl Behavior<Planet> for Planets {
    fn copy(&self, p: &Planet) -> Result<Planet, CopyError> {
        Ok(Planet {
            name: p.name.clone(),
            coords: p.coords,
        })
    }

    fn equal(&self, a: &Planet, b: &Planet) -> bool {
        a.name == b.name
    }

    fn print(&self, p: &Planet, out: &mut dyn fmt::Write) -> fmt::Result {
        let (x, y, z) = p.coords;
        writeln!(out, "Planet : {} {:.2},{:.2},{:.2}", p.name, x, y, z)
    }
}

fn planet(name: &str, x: f32) -> Planet {
    Planet {
        name: name.to_string(),
        coords: (x, 0.0, 0.0),
    }
}

// Sums letter codes and digit values of an id. Ids that are permutations of
// each other always collide.
fn id_sum(id: &String) -> u64 {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphabetic() {
                c as u64
            } else {
                c.to_digit(10).map(u64::from).unwrap_or(0)
            }
        })
        .sum()
}

// Test: values live independently of the caller's originals.
// Assumes: insert copies through the value table.
// Verifies: lookup after the original is dropped returns an equal copy.
#[test]
fn stores_copies_of_custom_records() {
    init_logger();
    let mut t = HashTable::new(Standard, Planets, id_sum, 7).unwrap();
    let earth = planet("Earth", 1.0);
    t.insert(&"C-137".to_string(), &earth).unwrap();
    drop(earth);

    let got = t.lookup(&"C-137".to_string()).unwrap();
    assert_eq!(got, Some(planet("Earth", 1.0)));
    assert_eq!(t.get(&"C-137".to_string()).map(|p| p.name.as_str()), Some("Earth"));
}

// Test: the a/b/c scenario over five buckets.
// Assumes: keys are unique and remove frees the pair.
// Verifies: removed key is gone, the others remain reachable.
#[test]
fn five_bucket_scenario() {
    init_logger();
    let mut t: HashTable<String, i32> = HashTable::with_buckets(5).unwrap();
    t.insert(&"a".to_string(), &1).unwrap();
    t.insert(&"b".to_string(), &2).unwrap();
    t.insert(&"c".to_string(), &3).unwrap();
    assert_eq!(t.lookup(&"b".to_string()).unwrap(), Some(2));

    t.remove(&"b".to_string()).unwrap();
    assert_eq!(t.lookup(&"b".to_string()).unwrap(), None);
    assert_eq!(t.lookup(&"a".to_string()).unwrap(), Some(1));
    assert_eq!(t.lookup(&"c".to_string()).unwrap(), Some(3));
    assert_eq!(t.len(), 2);
}

// Test: duplicate insert.
// Assumes: the duplicate check happens before any copy.
// Verifies: DuplicateKey error; no copy made; original value kept.
#[test]
fn duplicate_insert_rejected_without_copies() {
    let vb = Instrumented::new(Planets);
    let mut t = HashTable::new(Standard, vb.clone(), id_sum, 3).unwrap();
    t.insert(&"X1".to_string(), &planet("Earth", 1.0)).unwrap();
    match t.insert(&"X1".to_string(), &planet("Mars", 2.0)) {
        Err(Error::DuplicateKey) => {}
        other => panic!("expected DuplicateKey, got {:?}", other),
    }
    assert_eq!(vb.counts().copies(), 1);
    assert_eq!(t.get(&"X1".to_string()).map(|p| p.name.as_str()), Some("Earth"));
}

// Test: collisions through the letter-sum hash.
// Assumes: "ab1" and "ba1" hash identically.
// Verifies: both coexist in one bucket; removing one leaves the other.
#[test]
fn colliding_ids_share_a_bucket() {
    let mut t = HashTable::new(Standard, Standard, id_sum, 11).unwrap();
    t.insert(&"ab1".to_string(), &"first".to_string()).unwrap();
    t.insert(&"ba1".to_string(), &"second".to_string()).unwrap();
    assert_eq!(t.occupied_buckets(), 1);

    t.remove(&"ab1".to_string()).unwrap();
    assert_eq!(t.occupied_buckets(), 1);
    assert_eq!(t.lookup(&"ba1".to_string()).unwrap().as_deref(), Some("second"));
    t.remove(&"ba1".to_string()).unwrap();
    assert_eq!(t.occupied_buckets(), 0);
}

// Test: display_all output.
// Assumes: a single bucket keeps insertion order.
// Verifies: each pair prints key then value through the tables.
#[test]
fn display_all_prints_key_then_value() {
    let mut t = HashTable::new(Standard, Planets, |_: &String| 0u64, 1).unwrap();
    t.insert(&"p1".to_string(), &planet("Earth", 1.0)).unwrap();
    t.insert(&"p2".to_string(), &planet("Mars", 2.5)).unwrap();
    let mut out = String::new();
    t.display_all(&mut out).unwrap();
    assert_eq!(
        out,
        "p1\nPlanet : Earth 1.00,0.00,0.00\np2\nPlanet : Mars 2.50,0.00,0.00\n"
    );
}

// Test: teardown of a populated table.
// Assumes: Drop frees every owned key and value copy.
// Verifies: copies equal frees for both roles after drop.
#[test]
fn drop_releases_every_copy() {
    init_logger();
    let kb = Instrumented::new(Standard);
    let vb = Instrumented::new(Planets);
    {
        let mut t = HashTable::with_config(
            kb.clone(),
            vb.clone(),
            StdHash::new(),
            TableConfig::for_expected_entries(50),
        )
        .unwrap();
        for i in 0..50 {
            t.insert(&format!("id{}", i), &planet("P", i as f32)).unwrap();
        }
        for i in (0..50).step_by(3) {
            t.remove(&format!("id{}", i)).unwrap();
        }
        assert_eq!(kb.counts().outstanding(), t.len() as isize);
    }
    assert_eq!(kb.counts().copies(), 50);
    assert_eq!(kb.counts().outstanding(), 0);
    assert_eq!(vb.counts().copies(), 50);
    assert_eq!(vb.counts().outstanding(), 0);
}

// Test: invalid bucket count.
// Verifies: creation fails with InvalidArgument.
#[test]
fn zero_buckets_is_invalid() {
    let r = HashTable::<String, i32>::with_buckets(0);
    assert!(matches!(r, Err(Error::InvalidArgument(_))));
}
