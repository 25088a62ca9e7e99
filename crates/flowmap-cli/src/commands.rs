//! Subcommand execution.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use flowmap_core::{Catalog, MessageKind};
use flowmap_graph::{GraphAssembler, NodeGraph};

use crate::args::{Cli, Commands, Format, RenderArgs};

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Text for stdout.
    pub output: String,
    /// False when the command found problems (lint findings). The binary
    /// exits non-zero in that case.
    pub clean: bool,
}

impl Report {
    fn clean(output: String) -> Self {
        Report {
            output,
            clean: true,
        }
    }
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog '{}'", path.display()))?;
    let catalog = Catalog::from_json(&json)
        .with_context(|| format!("failed to load catalog '{}'", path.display()))?;
    Ok(catalog)
}

/// Runs the parsed command line against the catalog it names.
pub fn run(cli: &Cli) -> Result<Report> {
    let catalog = load_catalog(&cli.catalog)?;

    match &cli.command {
        Commands::Message {
            kind,
            id,
            version,
            render,
        } => {
            let kind = MessageKind::from(*kind);
            let assembler = GraphAssembler::with_options(&catalog, render.assembly_options());
            let graph = assembler.message_graph(kind, id, version);
            if graph.is_empty() {
                warn!("{kind} '{id}' version '{version}' not found");
            }
            render_graph(&graph, render).map(Report::clean)
        }
        Commands::Service {
            id,
            version,
            render,
        } => {
            let assembler = GraphAssembler::with_options(&catalog, render.assembly_options());
            let graph = assembler.service_graph(id, version);
            if graph.is_empty() {
                warn!("service '{id}' version '{version}' not found");
            }
            render_graph(&graph, render).map(Report::clean)
        }
        Commands::DataProduct {
            id,
            version,
            render,
        } => {
            let assembler = GraphAssembler::with_options(&catalog, render.assembly_options());
            let graph = assembler.data_product_graph(id, version);
            if graph.is_empty() {
                warn!("data product '{id}' version '{version}' not found");
            }
            render_graph(&graph, render).map(Report::clean)
        }
        Commands::Lint => Ok(lint(&catalog)),
    }
}

fn render_graph(graph: &NodeGraph, render: &RenderArgs) -> Result<String> {
    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "assembled graph"
    );
    match render.format {
        Format::Json => serde_json::to_string_pretty(graph).context("failed to encode graph"),
        Format::Mermaid => Ok(graph.to_mermaid(&render.mermaid_options())),
    }
}

fn lint(catalog: &Catalog) -> Report {
    let dangling = catalog.dangling_references();
    if dangling.is_empty() {
        return Report::clean("no dangling references".to_string());
    }

    let mut lines: Vec<String> = dangling.iter().map(ToString::to_string).collect();
    lines.push(format!("{} dangling reference(s)", dangling.len()));
    Report {
        output: lines.join("\n"),
        clean: false,
    }
}
