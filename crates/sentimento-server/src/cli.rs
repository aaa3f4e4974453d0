use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sentimento-server")]
#[command(author, version, about = "Multilingual sentiment inference service")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        env = "SENTIMENTO_CONFIG",
        default_value = "sentimento.yaml"
    )]
    pub config: PathBuf,

    /// Directory holding the model artifacts
    #[arg(short, long, global = true, env = "SENTIMENTO_MODELS_DIR")]
    pub models_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP service
    Serve {
        /// Listen address
        #[arg(short, long)]
        listen: Option<String>,

        /// Listen port
        #[arg(short = 'P', long)]
        port: Option<u16>,
    },

    /// Classify one text and print the prediction as JSON
    Predict {
        /// Text to classify
        #[arg(short, long)]
        text: String,

        /// Algorithm: svm, nb or lr
        #[arg(short, long, default_value = "svm")]
        algorithm: String,
    },

    /// Classify one text with every algorithm loaded for its language
    Compare {
        /// Text to classify
        #[arg(short, long)]
        text: String,
    },

    /// List loaded models and artifact load failures
    Models,
}
