#[path = "common/mod.rs"]
mod common;

use common::*;
use rnet::{
    pearson, ActivityBatch, ActivityRecord, ActivityStats, DivisiveDetector, PartitionSequence,
    PrecomputedPartitions, RedditNetworks, SubmissionSummary, UndirectedGraph,
};

fn batch() -> ActivityBatch {
    let s = |sub: &str, a: &str, id: &str| ActivityRecord::submission(sub, a, id);
    let c = |sub: &str, a: &str, id: &str| ActivityRecord::comment(sub, a, id, "t3_s1");
    ActivityBatch::new(
        vec![s("rust", "ann", "s1"), s("rust", "ann", "s2"), s("go", "ann", "s3"), s("go", "bo", "s4")],
        vec![
            c("rust", "bo", "c1"),
            c("rust", "cy", "c2"),
            c("rust", "cy", "c3"),
            c("zig", "cy", "c4"),
            c("go", "ann", "c5"),
        ],
    )
}

#[test]
fn rankings_and_means() {
    let st = ActivityStats::from_batch(&batch());
    assert_eq!(st.unique_communities, 3);
    // rust {ann, bo, cy}, go {ann, bo}, zig {cy}
    assert_eq!(
        st.top_communities_by_actors,
        vec![("rust".to_string(), 3), ("go".to_string(), 2), ("zig".to_string(), 1)]
    );
    assert!((st.mean_actors_per_community - 2.0).abs() < 1e-12);
    assert_eq!(st.top_actors_by_submissions, vec![("ann".to_string(), 3), ("bo".to_string(), 1)]);
    assert_eq!(
        st.top_actors_by_comments,
        vec![("cy".to_string(), 3), ("ann".to_string(), 1), ("bo".to_string(), 1)],
        "ties break by name"
    );
    assert_eq!(st.top_actors_by_communities[0], ("ann".to_string(), 2));
}

#[test]
fn correlation_counts_missing_activity_as_zero() {
    // submissions (ann 3, bo 1, cy 0) vs comments (ann 1, bo 1, cy 3)
    let st = ActivityStats::from_batch(&batch());
    let expected = pearson(&[(3.0, 1.0), (1.0, 1.0), (0.0, 3.0)]).unwrap();
    let got = st.submission_comment_correlation.unwrap();
    assert!((got - expected).abs() < 1e-12);
    assert!(got < 0.0);

    assert_eq!(pearson(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]), Some(1.0));
    assert_eq!(pearson(&[(1.0, 5.0), (2.0, 5.0)]), None);
    assert_eq!(pearson(&[(1.0, 1.0)]), None);
}

#[test]
fn top_n_truncates() {
    let st = ActivityStats::from_batch_top(&batch(), 1);
    assert_eq!(st.top_communities_by_actors, vec![("rust".to_string(), 3)]);
    assert_eq!(ActivityStats::from_batch(&ActivityBatch::default()).mean_actors_per_community, 0.0);
}

fn listed_batch() -> ActivityBatch {
    let s = |sub: &str, id: &str| ActivityRecord::submission(sub, "ann", id);
    ActivityBatch::new(
        vec![
            s("rust", "s1").with_listing(40, false, "self.rust"),
            s("rust", "s2").with_listing(5, false, "github.com"),
            s("go", "s3").with_listing(30, false, "go.dev"),
            s("go", "s4").with_listing(90, true, "nsfw.example"),
            s("zig", "s5").with_listing(40, false, "ziglang.org"),
            s("zig", "s6"),
        ],
        vec![ActivityRecord::comment("rust", "bo", "c1", "t3_s1")],
    )
}

#[test]
fn communities_rank_by_summed_comment_counts() {
    let st = ActivityStats::from_batch(&listed_batch());
    // go 30 + 90, rust 40 + 5, zig 40 + missing
    assert_eq!(
        st.top_communities_by_comments,
        vec![("go".to_string(), 120), ("rust".to_string(), 45), ("zig".to_string(), 40)]
    );
}

#[test]
fn top_submissions_skip_nsfw_and_unlabelled_records() {
    let st = ActivityStats::from_batch_top(&listed_batch(), 3);
    let summary = |id: &str, community: &str, domain: &str, n: u64| SubmissionSummary {
        id: id.to_string(),
        community: community.to_string(),
        domain: Some(domain.to_string()),
        num_comments: n,
    };
    assert_eq!(
        st.top_sfw_submissions_by_comments,
        vec![
            summary("s1", "rust", "self.rust", 40),
            summary("s5", "zig", "ziglang.org", 40),
            summary("s3", "go", "go.dev", 30),
        ],
        "ties break by community"
    );
}

#[test]
fn listing_fields_are_read_from_the_corpus() {
    let base = make_corpus_basic();
    let jan = rnet::YearMonth::new(2006, 1);
    let nets = RedditNetworks::new().base_dir(&base).date_range(Some(jan), Some(jan)).progress(false);
    let batch = nets.load_activity().unwrap();
    assert!(batch
        .submissions
        .iter()
        .all(|r| r.num_comments == Some(1) && r.over_18 == Some(false) && r.domain.as_deref() == Some("example.com")));
    assert!(batch.comments.iter().all(|r| r.num_comments.is_none() && r.domain.is_none()));

    let st = nets.stats(&batch);
    assert_eq!(
        st.top_communities_by_comments,
        vec![("programming".to_string(), 2), ("science".to_string(), 1)]
    );
    let ids: Vec<&str> = st.top_sfw_submissions_by_comments.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s3", "s2"]);
}

fn xyzw_graph() -> UndirectedGraph {
    let mut g = UndirectedGraph::new();
    g.add_edge("x", "y", 3);
    g.add_edge("z", "w", 2);
    g.add_edge("y", "z", 1);
    g
}

#[test]
fn precomputed_partitions_must_cover_the_graph() {
    let detector = PrecomputedPartitions::new(xyzw_sequence());
    assert_eq!(detector.partitions(&xyzw_graph()).unwrap(), xyzw_sequence());

    let mut bigger = xyzw_graph();
    bigger.add_node("extra");
    let err = detector.partitions(&bigger).unwrap_err();
    assert!(err.to_string().contains("1 uncovered"), "{err}");
}

#[test]
fn partitions_load_from_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("parts.json");
    std::fs::write(&path, r#"[[["x","y","z","w"]],[["x","y"],["z","w"]],[["x"],["y"],["z","w"]],[["x"],["y"],["z"],["w"]]]"#)
        .unwrap();
    let detector = PrecomputedPartitions::from_json_file(&path).unwrap();
    assert_eq!(detector.sequence(), &xyzw_sequence());
}

#[test]
fn facade_builds_and_writes_dendrograms_with_any_detector() {
    let dir = tempfile::tempdir().unwrap();
    let nets = RedditNetworks::new().dendrograms_dir(dir.path()).progress(false);

    let splitter = |g: &UndirectedGraph| -> anyhow::Result<PartitionSequence> {
        let all: Vec<&str> = g.nodes().collect();
        let (first, rest) = all.split_at(1);
        Ok(seq(&[&[all.as_slice()], &[first, rest]]))
    };
    let mut g = UndirectedGraph::new();
    g.add_edge("a", "b", 1);
    let d = nets.dendrogram(&g, &splitter).unwrap();
    assert_eq!(d.labels, vec!["a", "b"]);
    assert_eq!(d.rows.len(), 1);

    let path = nets.write_dendrogram(&d, "ab").unwrap();
    assert_eq!(path, dir.path().join("ab.json"));
    assert!(path.exists());

    let broken = |_: &UndirectedGraph| -> anyhow::Result<PartitionSequence> { Ok(PartitionSequence::default()) };
    let err = nets.dendrogram(&g, &broken).unwrap_err();
    assert!(err.chain().any(|e| e.to_string().contains("malformed partition sequence")), "{err:#}");
}
