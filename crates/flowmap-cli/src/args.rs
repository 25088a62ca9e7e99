//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use flowmap_core::MessageKind;
use flowmap_graph::{AssemblyOptions, Direction, MermaidOptions, RenderMode};

/// Relationship and channel graphs for event catalogs.
#[derive(Parser, Debug)]
#[command(
    name = "flowmap",
    version,
    about = "Relationship and channel graphs for event catalogs"
)]
pub struct Cli {
    /// Path to the catalog snapshot (JSON).
    #[arg(short, long, env = "FLOWMAP_CATALOG")]
    pub catalog: PathBuf,

    /// Log at debug level unless FLOWMAP_LOG is set.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Graph a message with its producers, consumers and channels.
    Message {
        /// Collection the message lives in.
        #[arg(short, long, value_enum, default_value_t = KindArg::Event)]
        kind: KindArg,

        /// Message id.
        id: String,

        /// Exact message version.
        version: String,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Graph everything a service sends and receives.
    Service {
        /// Service id.
        id: String,

        /// Exact service version.
        version: String,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Graph a data product's inputs and outputs.
    DataProduct {
        /// Data product id.
        id: String,

        /// Exact data product version.
        version: String,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// List relationships that point at nothing in the catalog.
    Lint,
}

/// Output options shared by the graph subcommands.
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// Render mode copied into every node.
    #[arg(short, long, value_enum, default_value_t = ModeArg::Simple)]
    pub mode: ModeArg,

    /// Show every matching consumer version, not just the latest.
    #[arg(long)]
    pub all_consumer_versions: bool,

    /// Flowchart direction (mermaid only).
    #[arg(short, long, value_enum, default_value_t = DirectionArg::Lr)]
    pub direction: DirectionArg,

    /// Leave out classDef styling (mermaid only).
    #[arg(long)]
    pub no_styles: bool,
}

impl RenderArgs {
    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            mode: self.mode.into(),
            latest_consumers_only: !self.all_consumer_versions,
        }
    }

    pub fn mermaid_options(&self) -> MermaidOptions {
        MermaidOptions {
            direction: self.direction.into(),
            include_styles: !self.no_styles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Mermaid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Event,
    Command,
    Query,
}

impl From<KindArg> for MessageKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Event => MessageKind::Event,
            KindArg::Command => MessageKind::Command,
            KindArg::Query => MessageKind::Query,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Simple,
    Full,
}

impl From<ModeArg> for RenderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Simple => RenderMode::Simple,
            ModeArg::Full => RenderMode::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    Lr,
    Tb,
    Rl,
    Bt,
}

impl From<DirectionArg> for Direction {
    fn from(direction: DirectionArg) -> Self {
        match direction {
            DirectionArg::Lr => Direction::LR,
            DirectionArg::Tb => Direction::TB,
            DirectionArg::Rl => Direction::RL,
            DirectionArg::Bt => Direction::BT,
        }
    }
}
