//! Module for testing using fuzzing (quickcheck)

use std::collections::HashMap;
use std::fmt::Debug;

use crate::*;
use quickcheck::Arbitrary;

mod basic;
mod equivalence;

#[cfg(miri)]
const DEFAULT_NUM_TESTS: usize = 10;
#[cfg(not(miri))]
const DEFAULT_NUM_TESTS: usize = 2000;
const DEFAULT_GEN_SIZE: usize = 100;

fn proptest_runner<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F) {
    let num_tests: usize = std::env::var("QUICKCHECK_TESTS")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_NUM_TESTS);

    let gen_size: usize = std::env::var("QUICKCHECK_GENERATOR_SIZE")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_GEN_SIZE);

    let mut gen = quickcheck::Gen::new(gen_size);

    // sample all inputs
    for _ in 0..num_tests {
        let input = A::arbitrary(&mut gen);
        let input_c = input.clone();
        let success = f(input_c);
        if !success {
            shrink_failure(f, input)
        }
    }
}

fn shrink_failure<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F, input: A) -> ! {
    for i in input.shrink() {
        let i_c = i.clone();
        let success = f(i_c);
        if !success {
            shrink_failure(f, i)
        }
    }
    // all shrunken inputs pass, so `input` is minimal
    panic!(
        "[QUICKCHECK] Test case failed!\n  Minimal input:\n    {:?}",
        input
    );
}

#[allow(missing_docs)]
#[macro_export]
macro_rules! qc {
    ($name:ident, $f:ident) => {
        #[test]
        fn $name() {
            proptest_runner($f)
        }
    };
}

/// Prefix of any length, biased towards short ones so that randomly generated prefixes overlap
/// often.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
struct TestPrefix(Ipv4Prefix);

impl Arbitrary for TestPrefix {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        #[rustfmt::skip]
        let len: u8 = *g
            .choose(&[
                0,
                1, 1,
                2, 2, 2,
                3, 3, 3, 3,
                4, 4, 4, 4, 4,
                5, 5, 5, 5, 5, 5,
                6, 6, 6, 6, 6, 6, 6,
                7, 7, 7, 7, 7, 7, 7, 7,
                8, 8, 8, 8, 8, 8, 8, 8, 8,
                9, 9, 9, 9, 9, 9, 9, 9, 9, 9,
                10, 10, 10, 11, 11, 12,
                13, 14, 15, 16, 16, 17, 18, 19, 20, 21, 22, 23,
                24, 24, 24, 25, 26, 27, 28, 29, 30, 30, 31,
                32, 32, 32,
            ])
            .unwrap();
        // few free bits in each octet, such that long prefixes still share paths with each other
        let x = u32::arbitrary(g) & 0xf0c3_8703;
        Self(Ipv4Prefix::new(x, len))
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        if self.0.prefix_len() == 0 {
            quickcheck::empty_shrinker()
        } else {
            let len = self.0.prefix_len() - 1;
            quickcheck::single_shrinker(Self(Ipv4Prefix::new(self.0.addr(), len)))
        }
    }
}

/// Addresses on and around the boundaries of every prefix in `list`, plus some fixed extremes.
fn probes<T>(list: &[(TestPrefix, T)]) -> Vec<u32> {
    let mut probes = vec![0, 1, 0x7fff_ffff, 0x8000_0000, u32::MAX];
    for (TestPrefix(p), _) in list {
        let first = p.addr();
        let last = first | !p.mask();
        probes.extend([
            first,
            last,
            first.wrapping_sub(1),
            last.wrapping_add(1),
            first | (!p.mask() & 0x5555_5555),
        ]);
    }
    probes
}

/// Longest-prefix match by scanning all stored prefixes.
fn naive_lookup(map: &HashMap<Ipv4Prefix, u32>, addr: u32) -> Option<u32> {
    map.iter()
        .filter(|(p, _)| p.contains_addr(addr))
        .max_by_key(|(p, _)| p.prefix_len())
        .map(|(_, v)| *v)
}
