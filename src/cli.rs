use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "plant-doctor")]
#[command(about = "AI plant health diagnosis, soil analysis and care tips", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Diagnose a plant photo and save the result to history
    Scan {
        /// Image file (jpg/png/webp/gif) or a base64 data URI
        #[arg(required = true)]
        image: String,

        /// Translate the result into this language
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Analyze a soil photo and suggest plants for it
    Soil {
        /// Image file (jpg/png/webp/gif) or a base64 data URI
        #[arg(required = true)]
        image: String,

        /// Translate the result into this language
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Show general plant care tips
    Tips {
        /// Translate the tips into this language
        #[arg(short, long)]
        language: Option<String>,
    },

    /// List, view or clear past plant analyses
    History {
        /// Show one analysis by id
        #[arg(long, conflicts_with = "clear")]
        show: Option<String>,

        /// Delete the whole history
        #[arg(long)]
        clear: bool,

        /// Skip the confirmation prompt when clearing
        #[arg(short, long, requires = "clear")]
        yes: bool,

        /// Translate the shown analysis into this language
        #[arg(short, long, requires = "show")]
        language: Option<String>,
    },

    /// Show or edit settings
    Config {
        /// Set the Gemini API key
        #[arg(long)]
        set_api_key: Option<String>,

        /// Set the Gemini model name
        #[arg(long)]
        set_model: Option<String>,

        /// Show current settings
        #[arg(long)]
        show: bool,
    },

    /// Interactive menu
    Interactive,
}
