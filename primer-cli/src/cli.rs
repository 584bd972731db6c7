use std::path::PathBuf;

use clap::{Parser, Subcommand};
use primer_agents::react::DEFAULT_QUERY;
use primer_model::DEFAULT_GEMINI_MODEL;

#[derive(Parser, Debug)]
#[command(name = "primer")]
#[command(about = "Run the agent-primer tutorials against Gemini", long_about = None)]
pub struct Cli {
    /// Gemini chat model
    #[arg(long, global = true, env = "PRIMER_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub model: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Chat with memory, then dump the conversation to a file
    Chat {
        /// Transcript written when the chat ends
        #[arg(long, default_value = "logging.txt")]
        log_file: PathBuf,
    },

    /// Answer an arithmetic question with add/subtract/multiply tools
    React {
        #[arg(long, default_value = DEFAULT_QUERY)]
        query: String,
    },

    /// Draft a document with update and save tools
    Drafter {
        /// Directory saved documents are written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Ask questions about a PDF
    Rag {
        #[arg(long, default_value = "materials/Stock_Market_Performance_2024.pdf")]
        pdf: PathBuf,

        /// Directory holding the vector store collections
        #[arg(long, default_value = "./output")]
        persist_dir: PathBuf,

        #[arg(long, default_value = "stock_market")]
        collection: String,
    },
}
