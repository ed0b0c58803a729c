//! CLI argument parsing using clap derive

use bizsvc_core::domain::request::ClocOrder;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// bizsvc - inspect and exercise the defect business-service catalog
#[derive(Parser, Debug)]
#[command(name = "bizsvc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Wiring config (TOML) with fallback policies and expected categories
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List registered (category, tool) pairs
    Catalog {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show which implementation a (category, tool) pair resolves to
    Resolve {
        #[arg(long, value_enum)]
        capability: CapabilityArg,

        #[arg(long)]
        category: String,

        #[arg(long)]
        tool: String,
    },

    /// Run a warning-page query for a tool
    Query {
        #[arg(long)]
        tool: String,

        #[arg(long, default_value_t = 1)]
        task_id: i64,

        /// Comma-separated status filter (e.g. NEW,FIXED)
        #[arg(long)]
        status: Option<String>,
    },

    /// List line counts of the CLOC tool
    Cloc {
        #[arg(long, default_value = "CLOC")]
        tool: String,

        #[arg(long, default_value_t = 1)]
        task_id: i64,

        #[arg(long, value_enum)]
        order: Option<OrderArg>,
    },

    /// Run a batch defect operation
    Batch {
        #[arg(long)]
        tool: String,

        /// Batch family, e.g. IGNORE or ASSIGN
        #[arg(long)]
        biz_type: String,

        #[arg(long, default_value_t = 1)]
        task_id: i64,

        #[arg(long, default_value = "admin")]
        user: String,

        /// Defect key (repeatable)
        #[arg(long = "defect")]
        defects: Vec<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityArg {
    QueryWarning,
    DefectOperate,
    BatchProcess,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    Language,
    FilePath,
}

impl From<OrderArg> for ClocOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Language => ClocOrder::Language,
            OrderArg::FilePath => ClocOrder::FilePath,
        }
    }
}
