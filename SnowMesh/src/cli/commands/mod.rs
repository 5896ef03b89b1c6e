pub mod model;

use clap::Subcommand;
use std::path::PathBuf;

use crate::formats::meshes::DecodeOptions;

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect a model file and display its structure
    Inspect {
        /// Model file to inspect
        path: PathBuf,

        /// Write the summary as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dump the full decoded document as JSON
    Dump {
        /// Model file to decode
        path: PathBuf,

        /// Output JSON file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print every decoded field with its offset
    Trace {
        /// Model file to decode
        path: PathBuf,

        /// Output text file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the material definitions from the model header
    Materials {
        /// Model file to read
        path: PathBuf,

        /// Directory to search for the referenced textures
        #[arg(long)]
        textures: Option<PathBuf>,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self, options: &DecodeOptions) -> anyhow::Result<()> {
        match self {
            Commands::Inspect { path, output } => model::inspect(path, output.as_deref(), options),
            Commands::Dump { path, output } => model::dump(path, output.as_deref(), options),
            Commands::Trace { path, output } => model::trace(path, output.as_deref(), options),
            Commands::Materials { path, textures } => {
                model::materials(path, textures.as_deref(), options)
            }
        }
    }
}
