#![allow(dead_code)]

use rnet::{Partition, PartitionSequence};
use serde_json::json;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write a compressed `.zst` file containing the provided JSONL lines.
/// This mirrors the corpus's RC_/RS_ monthly files but with tiny content.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Plain (uncompressed) JSONL file.
pub fn write_plain_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

pub fn submission_line(sub: &str, author: &str, id: &str, ts: i64) -> String {
    json!({
        "archived": false, "author": author, "created_utc": ts,
        "domain": "example.com", "id": id, "is_self": false, "num_comments": 1,
        "over_18": false, "score": 10, "title": "t", "subreddit": sub, "subreddit_id": "t5_x",
    })
    .to_string()
}

pub fn comment_line(sub: &str, author: &str, id: &str, parent: &str, ts: i64) -> String {
    json!({
        "controversiality": 0, "body": "b", "subreddit_id": "t5_x", "link_id": "t3_s1",
        "subreddit": sub, "score": 1, "author": author, "id": id, "parent_id": parent,
        "created_utc": ts, "retrieved_on": ts + 1000,
    })
    .to_string()
}

pub const JAN_2006: i64 = 1_136_073_600;
pub const FEB_2006: i64 = 1_138_800_000;

/// Build a tiny corpus under a temp dir:
/// - RS_2006-01: s1 (bob, programming), s2 (dave, science), s3 (erin, programming).
/// - RC_2006-01 (programming): c1 alice -> s1, c2 charlie -> c1 (row duplicated),
///   c3 `[deleted]` -> s1, plus one malformed line.
/// - RC_2006-01 (science): c4 alice -> s2, c5 bob -> c4, c6 frank -> a parent outside the corpus.
///   c4 carries its timestamp as a string.
/// - RC_2006-02: c7 alice -> s1 in programming.
///
/// For January with pseudo users filtered: programming = {alice, bob, charlie, erin},
/// science = {alice, bob, dave, frank}; replies alice->bob, charlie->alice,
/// alice->dave, bob->alice.
pub fn make_corpus_basic() -> PathBuf {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.keep();

    let rs = vec![
        submission_line("programming", "bob", "s1", JAN_2006),
        submission_line("science", "dave", "s2", JAN_2006 + 10),
        submission_line("programming", "erin", "s3", JAN_2006 + 20),
    ];
    write_zst_lines(&base.join("submissions").join("RS_2006-01.zst"), &rs);

    let rc = vec![
        comment_line("programming", "alice", "c1", "t3_s1", JAN_2006 + 100),
        comment_line("programming", "charlie", "c2", "t1_c1", JAN_2006 + 200),
        comment_line("programming", "charlie", "c2", "t1_c1", JAN_2006 + 200),
        comment_line("programming", "[deleted]", "c3", "t3_s1", JAN_2006 + 300),
        "{not json".to_string(),
        json!({
            "subreddit": "science", "author": "alice", "id": "c4", "parent_id": "t3_s2",
            "created_utc": (JAN_2006 + 400).to_string(),
        })
        .to_string(),
        comment_line("science", "bob", "c5", "t1_c4", JAN_2006 + 500),
        comment_line("science", "frank", "c6", "t3_zz", JAN_2006 + 600),
    ];
    write_zst_lines(&base.join("comments").join("RC_2006-01.zst"), &rc);

    let rc_feb = vec![comment_line("programming", "alice", "c7", "t3_s1", FEB_2006)];
    write_zst_lines(&base.join("comments").join("RC_2006-02.zst"), &rc_feb);

    base
}

/// Replace RC_2006-02.zst with plain text so decoding fails.
pub fn add_corrupt_month(base: &Path) {
    let corrupt = base.join("comments").join("RC_2006-02.zst");
    fs::create_dir_all(corrupt.parent().unwrap()).unwrap();
    let mut f = File::create(corrupt).unwrap();
    writeln!(&mut f, "{{\"id\":\"bad\",\"author\":\"mallory\",\"subreddit\":\"programming\"}}").unwrap();
}

/// Shorthand for a partition sequence from nested string slices.
pub fn seq(parts: &[&[&[&str]]]) -> PartitionSequence {
    parts.iter().map(|p| Partition::new(p.iter().map(|part| part.iter().copied()))).collect()
}

/// The `{x, y, z, w}` example: universe, `{x,y} | {z,w}`, `{x} | {y} | {z,w}`, singletons.
pub fn xyzw_sequence() -> PartitionSequence {
    seq(&[
        &[&["x", "y", "z", "w"]],
        &[&["x", "y"], &["z", "w"]],
        &[&["x"], &["y"], &["z", "w"]],
        &[&["x"], &["y"], &["z"], &["w"]],
    ])
}
