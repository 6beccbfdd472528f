use anyhow::Result;
use rnet::{
    PrecomputedPartitions, RedditNetworks, Sources, YearMonth, DEFAULT_EDGE_WEIGHT_THRESHOLD,
    DEFAULT_TARGET_SUBREDDITS,
};
use std::path::PathBuf;

const DATA_ROOT: &str = "./data";
const GRAPHS_ROOT: &str = "./graphs";
const DENDROGRAMS_ROOT: &str = "./dendrograms";
// Partition sequence for snett from an external Girvan-Newman run; skipped when absent.
const SNETT_PARTITIONS: &str = "./dendrograms/snett_partitions.json";

fn main() -> Result<()> {
    let hw = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(8);

    let start = YearMonth::new(2006, 1);
    let end   = YearMonth::new(2008, 12);

    let nets = RedditNetworks::new()
        .base_dir(DATA_ROOT)
        .graphs_dir(GRAPHS_ROOT)
        .dendrograms_dir(DENDROGRAMS_ROOT)
        .parallelism(hw)
        .file_concurrency(2)
        .sources(Sources::Both)
        .date_range(Some(start), Some(end))
        .progress(true)
        .progress_label("Loading activity");

    let batch = nets.load_activity()?;
    println!("Loaded {} submissions and {} comments", batch.submissions.len(), batch.comments.len());

    let stats = nets.stats(&batch);
    println!("{}", serde_json::to_string_pretty(&stats)?);

    let snet = nets.build_snet(&batch);
    nets.write_graph(&snet, "snet")?;

    let snetf = snet.without_light_edges(DEFAULT_EDGE_WEIGHT_THRESHOLD);
    nets.write_graph(&snetf, "snetf")?;

    let snett = snet.subgraph(DEFAULT_TARGET_SUBREDDITS);
    nets.write_graph(&snett, "snett")?;

    let snetf_dominant = snetf.dominant_component();
    nets.write_graph(&snetf_dominant, "snetf_dominant")?;

    let usernet = nets.build_usernet(&batch);
    nets.write_graph(&usernet, "usernet")?;

    println!(
        "snet: {} nodes / {} edges, snetf: {} edges, snett: {} nodes, usernet: {} nodes / {} edges",
        snet.node_count(),
        snet.edge_count(),
        snetf.edge_count(),
        snett.node_count(),
        usernet.node_count(),
        usernet.edge_count()
    );

    let partitions = PathBuf::from(SNETT_PARTITIONS);
    if partitions.exists() {
        let detector = PrecomputedPartitions::from_json_file(&partitions)?;
        let dendrogram = nets.dendrogram(&snett, &detector)?;
        let out = nets.write_dendrogram(&dendrogram, "snett")?;
        println!("Wrote dendrogram with {} leaves to {}", dendrogram.leaf_count(), out.display());
    }

    Ok(())
}
