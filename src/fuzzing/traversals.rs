use itertools::Itertools;

use super::*;

qc!(encompasses_definition, _encompasses_definition);
fn _encompasses_definition((entries, probes): (Vec<TestNet>, Vec<TestNet>)) -> bool {
    let set = build_set(&entries);
    let prefixes = set.prefixes().collect::<Vec<_>>();
    probes.iter().map(|p| p.0).all(|p| {
        set.encompasses(p) == prefixes.iter().any(|e| covers(*e, p))
            && set.encompasses_strict(p)
                == prefixes.iter().any(|e| covers(*e, p) && *e != p)
    })
}

qc!(overlaps_definition, _overlaps_definition);
fn _overlaps_definition((entries, probes): (Vec<TestNet>, Vec<TestNet>)) -> bool {
    let set = build_set(&entries);
    let prefixes = set.prefixes().collect::<Vec<_>>();
    probes.iter().map(|p| p.0).all(|p| {
        set.overlaps_prefix(p) == prefixes.iter().any(|e| covers(*e, p) || covers(p, *e))
    })
}

qc!(parent_of_is_longest_ancestor, _parent_of_is_longest_ancestor);
fn _parent_of_is_longest_ancestor((entries, probes): (Vec<TestNet>, Vec<TestNet>)) -> bool {
    let set = build_set(&entries);
    let prefixes = set.prefixes().collect::<Vec<_>>();
    probes.iter().map(|p| p.0).all(|p| {
        let want = prefixes
            .iter()
            .filter(|e| covers(**e, p))
            .max_by_key(|e| e.prefix_len())
            .copied();
        set.parent_of(p) == want
    })
}

qc!(root_of_is_shortest_ancestor, _root_of_is_shortest_ancestor);
fn _root_of_is_shortest_ancestor((entries, probes): (Vec<TestNet>, Vec<TestNet>)) -> bool {
    let set = build_set(&entries);
    let prefixes = set.prefixes().collect::<Vec<_>>();
    probes.iter().map(|p| p.0).all(|p| {
        let want = prefixes
            .iter()
            .filter(|e| covers(**e, p))
            .min_by_key(|e| e.prefix_len())
            .copied();
        set.root_of(p) == want
    })
}

qc!(descendants_are_the_covered_entries, _descendants_are_the_covered_entries);
fn _descendants_are_the_covered_entries((entries, probe): (Vec<TestNet>, TestNet)) -> bool {
    let set = build_set(&entries);
    let got = set
        .descendants_of(probe.0)
        .prefixes()
        .sorted()
        .collect::<Vec<_>>();
    let want = set
        .prefixes()
        .filter(|e| covers(probe.0, *e))
        .sorted()
        .collect::<Vec<_>>();
    got == want
}

qc!(ancestors_are_the_covering_entries, _ancestors_are_the_covering_entries);
fn _ancestors_are_the_covering_entries((entries, probe): (Vec<TestNet>, TestNet)) -> bool {
    let set = build_set(&entries);
    let got = set
        .ancestors_of(probe.0)
        .prefixes()
        .sorted()
        .collect::<Vec<_>>();
    let want = set
        .prefixes()
        .filter(|e| covers(*e, probe.0))
        .sorted()
        .collect::<Vec<_>>();
    got == want
}

qc!(compact_is_the_antichain_of_roots, _compact_is_the_antichain_of_roots);
fn _compact_is_the_antichain_of_roots(entries: Vec<TestNet>) -> bool {
    let set = build_set(&entries);
    let got = set.prefixes_compact().sorted().collect::<Vec<_>>();
    let all = set.prefixes().collect::<Vec<_>>();
    let want = all
        .iter()
        .filter(|e| !all.iter().any(|r| covers(*r, **e) && *r != **e))
        .copied()
        .sorted()
        .collect::<Vec<_>>();
    got == want
}

qc!(descendant_sets_answer_queries, _descendant_sets_answer_queries);
fn _descendant_sets_answer_queries((entries, probe, queries): (Vec<TestNet>, TestNet, Vec<TestNet>)) -> bool {
    // a rerooted subtree behaves like a set built from its own prefixes
    let set = build_set(&entries);
    let sub = set.descendants_of(probe.0);
    let rebuilt: PrefixSet = sub.prefixes().collect();
    sub.len() == rebuilt.len()
        && queries.iter().map(|q| q.0).all(|q| {
            sub.contains(q) == rebuilt.contains(q)
                && sub.encompasses(q) == rebuilt.encompasses(q)
                && sub.parent_of(q) == rebuilt.parent_of(q)
        })
}
