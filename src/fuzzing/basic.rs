use std::collections::HashMap;

use super::*;
use crate::test::invariants_hold;

qc!(lookup_is_longest_match, _lookup_is_longest_match);
fn _lookup_is_longest_match(list: Vec<(TestPrefix, u32)>) -> bool {
    let mut trie = PatriciaTrie::new();
    let mut hmap = HashMap::new();

    for (TestPrefix(p), t) in list.iter().copied() {
        trie.insert_value(p.addr(), p.prefix_len(), t);
        hmap.insert(p, t);
    }

    probes(&list).into_iter().all(|a| {
        let expected = naive_lookup(&hmap, a);
        trie.lookup(a) == expected
            && trie.matches(a) == expected.is_some()
            && trie.lookup_raw(a) == expected.unwrap_or(NO_VALUE)
    })
}

qc!(lookup_prefix_is_longest, _lookup_prefix_is_longest);
fn _lookup_prefix_is_longest(list: Vec<(TestPrefix, ())>) -> bool {
    let trie: PatriciaTrie = list.iter().map(|(TestPrefix(p), _)| *p).collect();

    probes(&list).into_iter().all(|a| {
        let expected = list
            .iter()
            .map(|(TestPrefix(p), _)| *p)
            .filter(|p| p.contains_addr(a))
            .max_by_key(|p| p.prefix_len());
        // nothing carries a value
        trie.lookup_prefix(a) == expected && trie.lookup(a).is_none()
    })
}

qc!(contains_exactly_inserted, _contains_exactly_inserted);
fn _contains_exactly_inserted((inserted, other): (Vec<TestPrefix>, Vec<TestPrefix>)) -> bool {
    let trie: PatriciaTrie = inserted.iter().map(|TestPrefix(p)| *p).collect();
    inserted.iter().all(|TestPrefix(p)| trie.contains(p))
        && other
            .iter()
            .all(|p| trie.contains(&p.0) == inserted.contains(p))
}

qc!(invariants, _invariants);
fn _invariants(list: Vec<TestPrefix>) -> bool {
    let mut trie = PatriciaTrie::new();
    for TestPrefix(p) in list {
        trie.insert(p.addr(), p.prefix_len());
        if !invariants_hold(&trie) {
            return false;
        }
    }
    // each insert adds at most one leaf and one branch node
    trie.size() <= 2 * trie.len() + 1
}

qc!(idempotence, _idempotence);
fn _idempotence(list: Vec<(TestPrefix, u32)>) -> bool {
    let mut trie = PatriciaTrie::new();
    let mut last = HashMap::new();
    for (TestPrefix(p), t) in list.iter().copied() {
        trie.insert_value(p.addr(), p.prefix_len(), t);
        last.insert(p, t);
    }
    let size = trie.size();
    let len = trie.len();
    let repr = format!("{trie:?}");

    for (TestPrefix(p), _) in list.iter().copied() {
        let idx = trie.insert(p.addr(), p.prefix_len());
        if trie.prefix(idx) != p || !trie.is_terminal(idx) || trie.value(idx) != last.get(&p).copied()
        {
            return false;
        }
    }

    trie.size() == size && trie.len() == len && format!("{trie:?}") == repr
}

qc!(order_independence, _order_independence);
fn _order_independence(list: Vec<(TestPrefix, u32)>) -> bool {
    // one value per prefix, the last one written
    let unique: HashMap<Ipv4Prefix, u32> = list.iter().map(|(TestPrefix(p), t)| (*p, *t)).collect();
    let mut items: Vec<(Ipv4Prefix, u32)> = unique.into_iter().collect();

    items.sort();
    let forward: PatriciaTrie = items.iter().copied().collect();
    items.reverse();
    let backward: PatriciaTrie = items.iter().copied().collect();
    items.sort_by_key(|(p, _)| (p.prefix_len(), p.addr()));
    let by_len: PatriciaTrie = items.iter().copied().collect();

    let repr = format!("{forward:?}");
    repr == format!("{backward:?}")
        && repr == format!("{by_len:?}")
        && forward.size() == backward.size()
        && forward.size() == by_len.size()
}

qc!(block_size, _block_size);
fn _block_size((list, block): (Vec<TestPrefix>, u8)) -> bool {
    let mut small = PatriciaTrie::with_block_size(block as usize);
    let mut large = PatriciaTrie::new();
    for TestPrefix(p) in list {
        small.insert_prefix(p);
        large.insert_prefix(p);
    }
    format!("{small:?}") == format!("{large:?}") && small.size() == large.size()
}
