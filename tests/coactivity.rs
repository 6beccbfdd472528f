use proptest::prelude::*;
use rnet::{
    build_coactivity_graph, resolve_actor_sets, shared_actor_count, ActivityRecord, CommunityActorSets,
};
use std::collections::BTreeSet;

#[test]
fn shared_actors_become_edge_weights() {
    let sets: CommunityActorSets =
        [("A", "u1"), ("A", "u2"), ("B", "u2"), ("B", "u3"), ("C", "u4")].into_iter().collect();
    let g = build_coactivity_graph(&sets);

    assert_eq!(g.nodes().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    assert_eq!(g.edges().collect::<Vec<_>>(), vec![("A", "B", 1)]);
    assert_eq!(g.weight("B", "A"), Some(1));
    assert_eq!(g.degree("C"), 0, "C shares nobody and stays isolated");
}

#[test]
fn actor_sets_union_both_streams() {
    let subs = vec![
        ActivityRecord::submission("rust", "alice", "s1"),
        ActivityRecord::submission("go", "bob", "s2"),
    ];
    let comments = vec![
        ActivityRecord::comment("rust", "bob", "c1", "t3_s1"),
        ActivityRecord::comment("rust", "alice", "c2", "t3_s1"),
        ActivityRecord::comment("go", "carol", "c3", "t3_s2"),
    ];
    let sets = resolve_actor_sets(&subs, &comments);
    let rust: Vec<&str> = sets.actors("rust").unwrap().iter().map(String::as_str).collect();
    assert_eq!(rust, vec!["alice", "bob"]);

    let g = build_coactivity_graph(&sets);
    assert_eq!(g.weight("go", "rust"), Some(1));
}

#[test]
fn community_without_actors_is_an_isolated_node() {
    let mut sets = CommunityActorSets::default();
    sets.insert_community("empty");
    sets.insert("full", "u1");
    let g = build_coactivity_graph(&sets);
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn rebuilding_yields_the_same_graph() {
    let sets: CommunityActorSets = [("x", "a"), ("y", "a"), ("y", "b"), ("z", "b"), ("z", "a")].into_iter().collect();
    assert_eq!(build_coactivity_graph(&sets), build_coactivity_graph(&sets));
}

proptest! {
    #[test]
    fn weights_equal_intersection_sizes(pairs in prop::collection::vec((0u8..6, 0u8..12), 0..60)) {
        let sets: CommunityActorSets =
            pairs.iter().map(|(c, a)| (format!("c{c}"), format!("u{a}"))).collect();
        let g = build_coactivity_graph(&sets);
        let names: Vec<&str> = sets.communities().collect();
        prop_assert_eq!(g.node_count(), names.len());
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                let sa: &BTreeSet<String> = sets.actors(a).unwrap();
                let sb: &BTreeSet<String> = sets.actors(b).unwrap();
                let expected = sa.intersection(sb).count() as u64;
                prop_assert_eq!(shared_actor_count(sa, sb), expected);
                let got = g.weight(a, b);
                if expected == 0 {
                    prop_assert_eq!(got, None);
                } else {
                    prop_assert_eq!(got, Some(expected));
                }
            }
        }
    }
}
