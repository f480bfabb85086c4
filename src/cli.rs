//! 命令行界面定义
//!
//! 定义了主程序的命令行参数和选项
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sfukit")]
#[command(version)]
#[command(about = "Runtime configuration resolver and brand sync tool for a mediasoup SFU")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Overrides file path (defaults to searching standard locations)
    #[arg(short, long, global = true)]
    pub(crate) config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Assemble the configuration and report problems
    Check {
        /// Overrides file path (optional, defaults to --config or standard locations)
        #[arg(index = 1)]
        config_file: Option<PathBuf>,
    },

    /// Print the assembled configuration as JSON
    Show,

    /// Fetch the brand document from a running server
    Brand {
        /// Server base URL, e.g. http://127.0.0.1:3010
        #[arg(index = 1)]
        endpoint: String,

        /// Request timeout in milliseconds
        #[arg(long, default_value_t = 5000)]
        timeout_ms: u64,
    },
}
