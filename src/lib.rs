mod config;
mod date;
mod paths;
mod zstd_jsonl;
mod records;

mod filters;
mod progress;
mod concurrency;
mod util;
mod mem;
mod ingest;
mod pipeline;

mod activity;
mod graph;
mod coactivity;
mod interaction;
mod gml;
mod stats;

mod error;
mod partition;
mod merge_tree;
mod heights;
mod linkage;
mod detection;

pub use crate::config::{
    normalize_name, InputSource, NetworkOptions, Sources, DEFAULT_EDGE_WEIGHT_THRESHOLD, DEFAULT_IO_BUFFER,
    DEFAULT_TARGET_SUBREDDITS,
};
pub use crate::date::YearMonth;
pub use crate::pipeline::RedditNetworks;
pub use crate::records::{ActivityBatch, ActivityRecord};
pub use crate::ingest::load_activity;
pub use crate::filters::is_pseudo_user;

// Graph construction.
pub use crate::activity::{resolve_actor_sets, CommunityActorSets, RecordIndex};
pub use crate::graph::{DirectedGraph, UndirectedGraph};
pub use crate::coactivity::{build_coactivity_graph, build_coactivity_graph_with_progress, shared_actor_count};
pub use crate::interaction::{build_interaction_graph, resolve_parent, strip_type_prefix, PARENT_PREFIX_LEN};
pub use crate::gml::{escape_label, render_gml, to_gml, write_gml, write_gml_buffered, GmlGraph};
pub use crate::stats::{pearson, ActivityStats, SubmissionSummary, DEFAULT_TOP_N};

// Partition sequence -> linkage.
pub use crate::error::HierarchyError;
pub use crate::partition::{normalize, Partition, PartitionSequence, Subset, SubsetRegistry};
pub use crate::merge_tree::{build_merge_tree, MergeNode, MergeTree};
pub use crate::heights::{assign_heights, RANK_SPREAD};
pub use crate::linkage::{build_dendrogram, emit_linkage, Dendrogram, LinkageRow};
pub use crate::detection::{DivisiveDetector, PrecomputedPartitions};

// Expose multiprogress and progress helpers.
pub use crate::progress::{make_count_progress, make_progress_bar_labeled, set_global_multiprogress};

// Expose memory helpers for adaptive throttling from the binary.
pub use crate::mem::{available_memory_fraction, maybe_throttle_low_memory};

//export robust file ops and runtime setup so binaries can import from crate root.
pub use crate::util::{configure_thread_pool, create_with_backoff, init_tracing_once, open_with_backoff, replace_file_atomic_backoff};
