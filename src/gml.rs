//! GML export for the activity graphs.

use crate::config::DEFAULT_IO_BUFFER;
use crate::graph::{DirectedGraph, UndirectedGraph};
use crate::util::{create_with_backoff, replace_file_atomic_backoff};
use ahash::AHashMap;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Graph shape the GML writer needs.
pub trait GmlGraph {
    fn is_directed(&self) -> bool;
    /// Nodes in sorted order.
    fn gml_nodes(&self) -> Vec<&str>;
    fn gml_edges(&self) -> Vec<(&str, &str, u64)>;
}

impl GmlGraph for UndirectedGraph {
    fn is_directed(&self) -> bool {
        false
    }
    fn gml_nodes(&self) -> Vec<&str> {
        self.nodes().collect()
    }
    fn gml_edges(&self) -> Vec<(&str, &str, u64)> {
        self.edges().collect()
    }
}

impl GmlGraph for DirectedGraph {
    fn is_directed(&self) -> bool {
        true
    }
    fn gml_nodes(&self) -> Vec<&str> {
        self.nodes().collect()
    }
    fn gml_edges(&self) -> Vec<(&str, &str, u64)> {
        self.edges().collect()
    }
}

/// Quote-safe label: `"` and `&` become entities, non-ASCII becomes `&#N;`.
pub fn escape_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            c if c.is_ascii() => out.push(c),
            c => {
                let _ = write!(out, "&#{};", c as u32);
            }
        }
    }
    out
}

/// Stream a graph as GML into `w`.
pub fn render_gml<G: GmlGraph + ?Sized, W: Write>(graph: &G, w: &mut W) -> io::Result<()> {
    let nodes = graph.gml_nodes();
    let ids: AHashMap<&str, usize> = nodes.iter().enumerate().map(|(i, n)| (*n, i)).collect();
    w.write_all(b"graph [\n")?;
    if graph.is_directed() {
        w.write_all(b"  directed 1\n")?;
    }
    for (id, label) in nodes.iter().enumerate() {
        write!(w, "  node [\n    id {id}\n    label \"{}\"\n  ]\n", escape_label(label))?;
    }
    for (source, target, weight) in graph.gml_edges() {
        let (Some(s), Some(t)) = (ids.get(source), ids.get(target)) else { continue };
        write!(w, "  edge [\n    source {s}\n    target {t}\n    weight {weight}\n  ]\n")?;
    }
    w.write_all(b"]\n")
}

/// Render a graph as GML text.
pub fn to_gml<G: GmlGraph + ?Sized>(graph: &G) -> String {
    let mut buf = Vec::new();
    // writing into a Vec cannot fail
    let _ = render_gml(graph, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write `graph` to `path` as GML, replacing any existing file atomically.
pub fn write_gml<G: GmlGraph + ?Sized>(graph: &G, path: &Path) -> Result<()> {
    write_gml_buffered(graph, path, DEFAULT_IO_BUFFER)
}

pub fn write_gml_buffered<G: GmlGraph + ?Sized>(graph: &G, path: &Path, write_buf: usize) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let tmp = path.with_extension("gml.inprogress");
    let out = create_with_backoff(&tmp).with_context(|| format!("create {}", tmp.display()))?;
    let mut w = BufWriter::with_capacity(write_buf, out);
    render_gml(graph, &mut w).with_context(|| format!("write {}", tmp.display()))?;
    w.flush()?;
    drop(w);
    replace_file_atomic_backoff(&tmp, path)?;
    tracing::info!(path = %path.display(), "graph written");
    Ok(())
}
