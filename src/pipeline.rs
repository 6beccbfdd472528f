use crate::activity::{resolve_actor_sets, RecordIndex};
use crate::coactivity::build_coactivity_graph_with_progress;
use crate::config::{InputSource, NetworkOptions, Sources};
use crate::date::YearMonth;
use crate::detection::DivisiveDetector;
use crate::gml::{write_gml_buffered, GmlGraph};
use crate::graph::{DirectedGraph, UndirectedGraph};
use crate::interaction::build_interaction_graph;
use crate::linkage::{build_dendrogram, Dendrogram};
use crate::progress::make_count_progress;
use crate::records::ActivityBatch;
use crate::stats::ActivityStats;
use crate::util::{configure_thread_pool, init_tracing_once};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Entry point: configure once, then load activity, build graphs and dendrograms.
#[derive(Clone, Debug, Default)]
pub struct RedditNetworks {
    pub(crate) opts: NetworkOptions,
}

impl RedditNetworks {
    pub fn new() -> Self {
        Self { opts: NetworkOptions::default() }
    }

    pub fn from_options(opts: NetworkOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &NetworkOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn base_dir(mut self, base: impl AsRef<Path>) -> Self { self.opts = self.opts.with_base_dir(base); self }
    pub fn input(mut self, input: InputSource) -> Self { self.opts = self.opts.with_input(input); self }
    pub fn sources(mut self, sources: Sources) -> Self { self.opts = self.opts.with_sources(sources); self }
    pub fn date_range(mut self, start: Option<YearMonth>, end: Option<YearMonth>) -> Self { self.opts = self.opts.with_date_range(start, end); self }
    pub fn subreddits<I, S>(mut self, subs: I) -> Self where I: IntoIterator<Item = S>, S: AsRef<str> { self.opts = self.opts.with_subreddits(subs); self }
    pub fn exclude_authors<I, S>(mut self, authors: I) -> Self where I: IntoIterator<Item = S>, S: AsRef<str> { self.opts = self.opts.with_excluded_authors(authors); self }
    pub fn allow_pseudo_users(mut self, yes: bool) -> Self { self.opts = self.opts.with_pseudo_user_filter(!yes); self }
    pub fn graphs_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_graphs_dir(dir); self }
    pub fn dendrograms_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_dendrograms_dir(dir); self }
    pub fn parallelism(mut self, threads: usize) -> Self { self.opts = self.opts.with_parallelism(threads); self }
    pub fn file_concurrency(mut self, n: usize) -> Self { self.opts = self.opts.with_file_concurrency(n); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }
    pub fn io_write_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_write_buffer(bytes); self }

    // -------- Operations --------

    fn prepare(&self) {
        init_tracing_once();
        configure_thread_pool(self.opts.parallelism);
    }

    /// Stream the configured inputs into a sorted activity batch.
    pub fn load_activity(&self) -> Result<ActivityBatch> {
        self.prepare();
        crate::ingest::load_activity(&self.opts)
    }

    /// Subreddit co-activity network (`snet`).
    pub fn build_snet(&self, batch: &ActivityBatch) -> UndirectedGraph {
        self.prepare();
        let sets = resolve_actor_sets(&batch.submissions, &batch.comments);
        let pb = self.opts.progress.then(|| make_count_progress(sets.len() as u64, "Co-activity rows"));
        let graph = build_coactivity_graph_with_progress(&sets, pb.as_ref());
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        tracing::info!(nodes = graph.node_count(), edges = graph.edge_count(), "snet built");
        graph
    }

    /// Directed user reply network (`usernet`).
    pub fn build_usernet(&self, batch: &ActivityBatch) -> DirectedGraph {
        self.prepare();
        let index = RecordIndex::from_streams(&batch.submissions, &batch.comments);
        let graph = build_interaction_graph(&batch.comments, &index);
        tracing::info!(nodes = graph.node_count(), edges = graph.edge_count(), "usernet built");
        graph
    }

    /// Write `<graphs_dir>/<name>.gml` and return its path.
    pub fn write_graph<G: GmlGraph + ?Sized>(&self, graph: &G, name: &str) -> Result<PathBuf> {
        let path = self.opts.graphs_dir.join(format!("{name}.gml"));
        write_gml_buffered(graph, &path, self.opts.write_buffer_bytes)
            .with_context(|| format!("writing graph {name}"))?;
        Ok(path)
    }

    /// Run `detector` on `graph` and turn its partition sequence into linkage.
    pub fn dendrogram<D: DivisiveDetector + ?Sized>(&self, graph: &UndirectedGraph, detector: &D) -> Result<Dendrogram> {
        self.prepare();
        let sequence = detector.partitions(graph).context("community detection failed")?;
        let dendrogram = build_dendrogram(&sequence).context("partition sequence rejected")?;
        tracing::info!(leaves = dendrogram.leaf_count(), rows = dendrogram.rows.len(), "dendrogram built");
        Ok(dendrogram)
    }

    /// Write `<dendrograms_dir>/<name>.json` and return its path.
    pub fn write_dendrogram(&self, dendrogram: &Dendrogram, name: &str) -> Result<PathBuf> {
        let path = self.opts.dendrograms_dir.join(format!("{name}.json"));
        dendrogram
            .write_json_buffered(&path, self.opts.write_buffer_bytes)
            .with_context(|| format!("writing dendrogram {name}"))?;
        Ok(path)
    }

    pub fn stats(&self, batch: &ActivityBatch) -> ActivityStats {
        ActivityStats::from_batch(batch)
    }
}
