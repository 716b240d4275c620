//! Graphviz DOT assembly for containerlab-style topology manifests.

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("failed to parse topology manifest: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("no topology found in manifest")]
    Missing,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    topology: Option<Topology>,
}

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(default)]
    nodes: Option<BTreeMap<String, serde_yaml::Value>>,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(default)]
    endpoints: Vec<String>,
}

/// Build a `strict graph` DOT document from a topology manifest.
///
/// Node attributes follow the dashboard's dark theme. The pseudo-node
/// `bridges` holds host bridge config and is not drawn.
pub fn topology_dot(manifest: &str) -> Result<String, TopologyError> {
    let parsed: Manifest = serde_yaml::from_str(manifest)?;
    let topology = parsed.topology.ok_or(TopologyError::Missing)?;
    let nodes = topology.nodes.ok_or(TopologyError::Missing)?;

    let mut lines = Vec::new();
    lines.push("bgcolor=\"transparent\";".to_string());
    lines.push("rankdir=LR;".to_string());
    lines.push("nodesep=2.0;".to_string());
    lines.push("ranksep=1.5;".to_string());
    lines.push(
        "node [shape=rect, style=\"filled,rounded\", fillcolor=\"#1e1e2e\", color=\"#89b4fa\", penwidth=2, fontname=\"sans-serif\", fontcolor=\"#cdd6f4\", margin=0.2];"
            .to_string(),
    );
    lines.push(
        "edge [fontname=\"sans-serif\", fontsize=10, fontcolor=\"#a6adc8\", color=\"#585b70\"];"
            .to_string(),
    );

    for name in nodes.keys() {
        if name != "bridges" {
            lines.push(format!("\"{name}\" [label=\"{name}\"];"));
        }
    }

    for link in &topology.links {
        let [src, tgt] = match link.endpoints.as_slice() {
            [src, tgt, ..] => [src, tgt],
            _ => continue,
        };
        let (src_node, src_iface) = split_endpoint(src);
        let (tgt_node, tgt_iface) = split_endpoint(tgt);
        if src_node.is_empty() || tgt_node.is_empty() {
            continue;
        }
        lines.push(format!(
            "\"{src_node}\" -- \"{tgt_node}\" [taillabel=\"{src_iface}\", headlabel=\"{tgt_iface}\", labeldistance=2.0];"
        ));
    }

    Ok(format!("strict graph G {{\n{}\n}}", lines.join("\n")))
}

fn split_endpoint(endpoint: &str) -> (&str, &str) {
    match endpoint.split_once(':') {
        Some((node, iface)) => (node, iface),
        None => (endpoint, ""),
    }
}
