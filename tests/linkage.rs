#[path = "common/mod.rs"]
mod common;

use common::*;
use proptest::prelude::*;
use rnet::{
    assign_heights, build_dendrogram, build_merge_tree, normalize, Dendrogram, HierarchyError, LinkageRow,
    Partition, PartitionSequence, SubsetRegistry,
};

fn row(left: usize, right: usize, height: f64, leaf_count: usize) -> LinkageRow {
    LinkageRow { left, right, height, leaf_count }
}

#[test]
fn xyzw_registry_ranks_finest_first() {
    let reg = normalize(&xyzw_sequence()).unwrap();
    let s = |v: &[&str]| v.iter().map(|x| x.to_string()).collect::<Vec<_>>();
    assert_eq!(reg.len(), 7);
    assert_eq!(reg.rank_of(&s(&["w"])), Some(0));
    assert_eq!(reg.rank_of(&s(&["z"])), Some(3));
    assert_eq!(reg.rank_of(&s(&["w", "z"])), Some(4));
    assert_eq!(reg.rank_of(&s(&["x", "y"])), Some(5));
    assert_eq!(reg.rank_of(&s(&["w", "x", "y", "z"])), Some(6));
    assert_eq!(reg.universe(), s(&["w", "x", "y", "z"]).as_slice());
}

#[test]
fn xyzw_merge_tree_has_expected_shape() {
    let reg = normalize(&xyzw_sequence()).unwrap();
    let tree = build_merge_tree(&reg).unwrap();

    let root = tree.node(tree.root());
    assert_eq!(root.subset(), reg.universe());
    assert_eq!(root.children(), Some((4, 5)));
    assert_eq!(tree.node(5).children(), Some((1, 2)), "{{x,y}} splits into {{x}} and {{y}}");
    assert_eq!(tree.node(4).children(), Some((0, 3)), "{{z,w}} merges leaves w and z");
    for (id, node) in tree.nodes() {
        if id == tree.root() {
            assert_eq!(node.parent(), None);
        } else {
            assert!(node.parent().is_some(), "subset {:?} has no parent", node.subset());
        }
    }
    assert_eq!(tree.leaf_ids().count(), 4);
}

#[test]
fn xyzw_end_to_end_linkage() {
    let d = build_dendrogram(&xyzw_sequence()).unwrap();
    assert_eq!(d.labels, vec!["w", "x", "y", "z"]);
    assert_eq!(d.rows, vec![row(0, 3, 2.0, 2), row(1, 2, 2.8, 2), row(4, 5, 4.0, 4)]);
}

#[test]
fn heights_follow_size_then_rank() {
    let reg = normalize(&xyzw_sequence()).unwrap();
    let tree = build_merge_tree(&reg).unwrap();
    let h = assign_heights(&tree, &reg).unwrap();
    assert_eq!(h[0], None, "leaves have no height");
    assert_eq!(h[4], Some(2.0));
    assert_eq!(h[5], Some(2.8));
    assert_eq!(h[6], Some(4.0));
}

#[test]
fn repeated_partitions_are_accepted() {
    let s = seq(&[
        &[&["a", "b"]],
        &[&["a", "b"]],
        &[&["b"], &["a"]],
        &[&["a"], &["b"]],
    ]);
    let d = build_dendrogram(&s).unwrap();
    assert_eq!(d.labels, vec!["a", "b"]);
    assert_eq!(d.rows, vec![row(0, 1, 2.0, 2)]);
}

#[test]
fn single_leaf_universe_emits_no_rows() {
    let d = build_dendrogram(&seq(&[&[&["solo"]]])).unwrap();
    assert_eq!(d.labels, vec!["solo"]);
    assert!(d.rows.is_empty());
}

#[test]
fn coarse_finest_partition_labels_joined_leaves() {
    let s = seq(&[&[&["a", "b", "c"]], &[&["c"], &["b", "a"]]]);
    let d = build_dendrogram(&s).unwrap();
    assert_eq!(d.labels, vec!["a+b", "c"]);
    assert_eq!(d.rows, vec![row(0, 1, 3.0, 2)]);
}

#[test]
fn universe_is_synthesised_when_first_partition_is_split() {
    let s = seq(&[&[&["a", "b"], &["c"]], &[&["a"], &["b"], &["c"]]]);
    let reg = normalize(&s).unwrap();
    assert_eq!(reg.rank(reg.len() - 1), reg.len() - 1);
    assert_eq!(reg.subset(reg.len() - 1), reg.universe());
    let d = build_dendrogram(&s).unwrap();
    assert_eq!(d.rows.len(), 2);
    assert_eq!(d.rows.last().unwrap().leaf_count, 3);
}

#[test]
fn foreign_leaf_is_malformed_and_emits_nothing() {
    let s = seq(&[&[&["x", "y"]], &[&["x"], &["q"]]]);
    match build_dendrogram(&s) {
        Err(HierarchyError::MalformedSequence { step, .. }) => assert_eq!(step, 1),
        other => panic!("expected MalformedSequence, got {other:?}"),
    }
}

#[test]
fn structural_violations_are_malformed() {
    let cases: Vec<(PartitionSequence, usize)> = vec![
        (PartitionSequence::default(), 0),
        (seq(&[&[]]), 0),
        (seq(&[&[&["a", "a"]]]), 0),
        (seq(&[&[&["a"], &[]]]), 0),
        (seq(&[&[&["a", "b"]], &[&["a"]]]), 1),
        (seq(&[&[&["a", "b", "c", "d"]], &[&["a"], &["b"], &["c", "d"]]]), 1),
        (seq(&[&[&["a", "b", "c"]], &[&["a", "b"], &["c"]], &[&["a", "c"], &["b"]]]), 2),
    ];
    for (s, expected_step) in cases {
        match normalize(&s) {
            Err(HierarchyError::MalformedSequence { step, detail }) => {
                assert_eq!(step, expected_step, "{detail}");
            }
            other => panic!("expected MalformedSequence for {s:?}, got {other:?}"),
        }
    }
}

#[test]
fn ambiguous_decomposition_keeps_the_first_pair() {
    // {a,b,c} = {a} ∪ {b,c} (ids 0, 1) = {a,b} ∪ {c} (ids 2, 3); (0, 1) comes first.
    let reg = SubsetRegistry::from_subsets(vec![
        vec!["a"],
        vec!["b", "c"],
        vec!["a", "b"],
        vec!["c"],
        vec!["a", "b", "c"],
    ]);
    match build_merge_tree(&reg) {
        Err(HierarchyError::DisconnectedHierarchy { detail }) => {
            assert!(detail.contains(r#"["a", "b"], ["c"]"#), "losing pair is orphaned: {detail}");
        }
        other => panic!("expected DisconnectedHierarchy, got {other:?}"),
    }
}

#[test]
fn disjoint_roots_are_disconnected() {
    let reg = SubsetRegistry::from_subsets(vec![vec!["a"], vec!["b"], vec!["c"], vec!["a", "b"]]);
    assert!(matches!(build_merge_tree(&reg), Err(HierarchyError::DisconnectedHierarchy { .. })));
    let empty = SubsetRegistry::from_subsets(Vec::<Vec<String>>::new());
    assert!(matches!(build_merge_tree(&empty), Err(HierarchyError::DisconnectedHierarchy { .. })));
}

#[test]
fn dendrogram_json_uses_linkage_tuples() {
    let d = build_dendrogram(&xyzw_sequence()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("xyzw.json");
    d.write_json(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["labels"], serde_json::json!(["w", "x", "y", "z"]));
    assert_eq!(v["rows"][2], serde_json::json!([4, 5, 4.0, 4]));
    let back: Dendrogram = serde_json::from_str(&text).unwrap();
    assert_eq!(back, d);
    assert!(!path.with_extension("json.inprogress").exists());
}

/// Coarsest-to-finest sequence from repeatedly splitting one part in two.
fn split_sequence(n: usize, choices: &[(usize, usize)]) -> PartitionSequence {
    let mut parts: Vec<Vec<String>> = vec![(0..n).map(|i| format!("l{i:02}")).collect()];
    let mut out = vec![Partition::new(parts.clone())];
    let mut k = 0;
    while parts.iter().any(|p| p.len() > 1) {
        let (pick, cut) = choices.get(k % choices.len().max(1)).copied().unwrap_or((0, 0));
        k += 1;
        let splittable: Vec<usize> = (0..parts.len()).filter(|&i| parts[i].len() > 1).collect();
        let idx = splittable[pick % splittable.len()];
        let part = parts.remove(idx);
        let at = 1 + cut % (part.len() - 1);
        parts.push(part[..at].to_vec());
        parts.push(part[at..].to_vec());
        out.push(Partition::new(parts.clone()));
    }
    PartitionSequence::new(out)
}

proptest! {
    #[test]
    fn linkage_invariants_hold_for_any_binary_split_sequence(
        n in 1usize..12,
        choices in prop::collection::vec((0usize..16, 0usize..16), 1..16),
    ) {
        let d = build_dendrogram(&split_sequence(n, &choices)).unwrap();
        prop_assert_eq!(d.labels.len(), n);
        prop_assert_eq!(d.rows.len(), n - 1);
        for w in d.rows.windows(2) {
            prop_assert!(w[0].height < w[1].height);
        }
        for (k, r) in d.rows.iter().enumerate() {
            prop_assert!(r.left < n + k && r.right < n + k);
        }
        if let Some(last) = d.rows.last() {
            prop_assert_eq!(last.leaf_count, n);
        }
    }

    #[test]
    fn smaller_subtrees_sit_lower(
        n in 2usize..10,
        choices in prop::collection::vec((0usize..16, 0usize..16), 1..12),
    ) {
        let reg = normalize(&split_sequence(n, &choices)).unwrap();
        let tree = build_merge_tree(&reg).unwrap();
        let h = assign_heights(&tree, &reg).unwrap();
        let internal: Vec<(usize, f64)> =
            tree.internal_ids().map(|id| (tree.node(id).subset().len(), h[id].unwrap())).collect();
        for a in &internal {
            for b in &internal {
                if a.0 < b.0 {
                    prop_assert!(a.1 < b.1);
                }
            }
        }
    }
}
