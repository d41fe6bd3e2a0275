//! Model-based property testing using quickcheck.
#![allow(clippy::type_complexity)]

use std::fmt::Debug;
use std::net::Ipv4Addr;

use ipnet::{IpNet, Ipv4Net};
use quickcheck::Arbitrary;

use crate::*;

#[cfg(miri)]
const DEFAULT_NUM_TESTS: usize = 10;
#[cfg(not(miri))]
const DEFAULT_NUM_TESTS: usize = 1000;
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

    for _ in 0..num_tests {
        let input = A::arbitrary(&mut gen);
        let input_c = input.clone();
        if !f(input_c) {
            shrink_failure(f, input)
        }
    }
}

fn shrink_failure<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F, input: A) -> ! {
    for i in input.shrink() {
        let i_c = i.clone();
        if !f(i_c) {
            shrink_failure(f, i)
        }
    }
    // all shrunken inputs pass, so `input` is a minimal counterexample
    panic!(
        "[QUICKCHECK] Test case failed!\n  Minimal input:\n    {:?}",
        input
    );
}

macro_rules! qc {
    ($name:ident, $f:ident) => {
        #[test]
        fn $name() {
            proptest_runner($f)
        }
    };
}

mod set_ops;
mod traversals;

/// A small, heavily colliding prefix universe: IPv4 prefixes with short,
/// triangularly weighted lengths, so that generated collections contain
/// plenty of nesting and shared paths.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
struct TestNet(IpNet);

impl Debug for TestNet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl TestNet {
    fn new(addr: u32, len: u8) -> Self {
        let net = Ipv4Net::new(Ipv4Addr::from(addr), len).unwrap().trunc();
        TestNet(IpNet::V4(net))
    }
}

impl Arbitrary for TestNet {
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
            ])
            .unwrap();
        Self::new(u32::arbitrary(g), len)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        if self.0.prefix_len() == 0 {
            quickcheck::empty_shrinker()
        } else {
            let addr = match self.0.network() {
                std::net::IpAddr::V4(a) => u32::from(a),
                std::net::IpAddr::V6(_) => unreachable!(),
            };
            quickcheck::single_shrinker(Self::new(addr, self.0.prefix_len() - 1))
        }
    }
}

fn build_set(prefixes: &[TestNet]) -> PrefixSet {
    prefixes.iter().map(|p| p.0).collect()
}

fn build_map(entries: &[(TestNet, i32)]) -> PrefixMap<i32> {
    entries.iter().map(|(p, v)| (p.0, *v)).collect()
}

/// Whether `a` encompasses `b`: same address family, and `b`'s network
/// sits inside `a`.
fn covers(a: IpNet, b: IpNet) -> bool {
    a.prefix_len() <= b.prefix_len() && a.contains(&b)
}
