//! Mermaid flowchart export.
//!
//! Turns an assembled [`NodeGraph`] into `flowchart` text that can be pasted
//! into any Mermaid renderer. Node shapes and colours follow the resource
//! kind; edge labels are copied verbatim (escaped).

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use flowmap_core::ResourceKind;

use crate::graph::NodeGraph;

/// Flowchart direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    LR,
    TB,
    RL,
    BT,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Direction::LR => "LR",
            Direction::TB => "TB",
            Direction::RL => "RL",
            Direction::BT => "BT",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MermaidOptions {
    pub direction: Direction,
    /// Emit a `classDef` per node type and tag nodes with it.
    pub include_styles: bool,
}

impl Default for MermaidOptions {
    fn default() -> Self {
        MermaidOptions {
            direction: Direction::LR,
            include_styles: true,
        }
    }
}

fn shape(kind: ResourceKind) -> (&'static str, &'static str) {
    match kind {
        ResourceKind::Service | ResourceKind::DataProduct => ("[[", "]]"),
        ResourceKind::Event | ResourceKind::Command => (">", "]"),
        ResourceKind::Query => ("{{", "}}"),
        ResourceKind::Channel => ("[(", ")]"),
    }
}

fn style(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Service => "fill:#ec4899,stroke:#be185d,color:#fff",
        ResourceKind::Event => "fill:#f97316,stroke:#c2410c,color:#fff",
        ResourceKind::Command => "fill:#3b82f6,stroke:#1d4ed8,color:#fff",
        ResourceKind::Query => "fill:#22c55e,stroke:#15803d,color:#fff",
        ResourceKind::Channel => "fill:#6b7280,stroke:#374151,color:#fff",
        ResourceKind::DataProduct => "fill:#6366f1,stroke:#4338ca,color:#fff",
    }
}

/// Replaces every character outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Escapes text for use inside a quoted Mermaid label.
pub fn escape_label(text: &str) -> String {
    text.replace('"', "#quot;").replace('\n', "<br/>")
}

/// Renders `graph` as a Mermaid flowchart.
pub fn to_mermaid(graph: &NodeGraph, options: &MermaidOptions) -> String {
    let mut lines = vec![format!("flowchart {}", options.direction), String::new()];

    if options.include_styles {
        let used: IndexSet<ResourceKind> = graph.nodes.iter().map(|n| n.kind).collect();
        lines.push("    %% Style definitions".to_string());
        for kind in used {
            lines.push(format!(
                "    classDef {} {}",
                sanitize_id(kind.collection()),
                style(kind)
            ));
        }
        lines.push(String::new());
    }

    lines.push("    %% Nodes".to_string());
    for node in &graph.nodes {
        let resource = node.resource();
        let label = escape_label(&format!("{} ({})", resource.display_name(), resource.version()));
        let (open, close) = shape(node.kind);
        let class = if options.include_styles {
            format!(":::{}", sanitize_id(node.kind.collection()))
        } else {
            String::new()
        };
        lines.push(format!(
            "    {}{open}\"{label}\"{close}{class}",
            sanitize_id(node.id.as_str())
        ));
    }

    if !graph.edges.is_empty() {
        lines.push(String::new());
        lines.push("    %% Edges".to_string());
        for edge in &graph.edges {
            lines.push(format!(
                "    {} -->|\"{}\"| {}",
                sanitize_id(edge.source.as_str()),
                escape_label(&edge.label),
                sanitize_id(edge.target.as_str())
            ));
        }
    }

    lines.join("\n")
}

impl NodeGraph {
    /// See [`to_mermaid`].
    pub fn to_mermaid(&self, options: &MermaidOptions) -> String {
        to_mermaid(self, options)
    }
}
