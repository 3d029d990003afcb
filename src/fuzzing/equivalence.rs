use super::*;

qc!(bit_trie_is_longest_match, _bit_trie_is_longest_match);
fn _bit_trie_is_longest_match(list: Vec<(TestPrefix, u32)>) -> bool {
    let mut trie = BitTrie::new();
    let mut hmap = HashMap::new();

    for (TestPrefix(p), t) in list.iter().copied() {
        let t = t % NULL;
        trie.insert_value(p.addr(), p.prefix_len(), t);
        hmap.insert(p, t);
    }

    probes(&list)
        .into_iter()
        .all(|a| trie.lookup(a) == naive_lookup(&hmap, a))
}

qc!(representations_agree, _representations_agree);
fn _representations_agree(list: Vec<(TestPrefix, u32)>) -> bool {
    let mut patricia = PatriciaTrie::new();
    let mut bitwise = BitTrie::new();

    for (TestPrefix(p), t) in list.iter().copied() {
        let t = t % NULL;
        LongestPrefixMatch::insert_value(&mut patricia, p, t);
        LongestPrefixMatch::insert_value(&mut bitwise, p, t);
    }

    // every node of the compressed trie has a counterpart in the uncompressed one
    LongestPrefixMatch::size(&patricia) <= LongestPrefixMatch::size(&bitwise)
        && probes(&list).into_iter().all(|a| {
            patricia.matches(a) == bitwise.matches(a) && patricia.lookup(a) == bitwise.lookup(a)
        })
}
