use clap::{Parser, Subcommand};

/// Tools for converting Truevision TGA images to and from PNG.
#[derive(Parser, Debug)]
#[clap(args_conflicts_with_subcommands = true)]
#[command(version, about, long_about = None)]
pub struct Arg {
    #[clap(subcommand)]
    /// Subcommands
    pub command: Option<Command>,
    #[clap(flatten)]
    pub auto: Option<AutoArgs>,
}

#[derive(Subcommand, Debug)]
/// Commands
pub enum Command {
    /// Export TGA files to PNG
    Export {
        /// Input TGA file
        input: String,
        /// Output path to exported PNG file
        output: String,
    },
    /// Import PNG files to TGA
    Import {
        /// PNG file to import
        input: String,
        /// Output path for the new TGA file
        output: String,
        /// Write run-length compressed pixel data
        #[clap(short, long)]
        compress: bool,
    },
}

#[derive(Parser, Debug)]
pub struct AutoArgs {
    /// Export/Import TGA files
    pub input: String,
    /// Write run-length compressed pixel data when producing TGA
    #[clap(short, long)]
    pub compress: bool,
}

impl Arg {
    /// Parse command line arguments
    pub fn parse() -> Self {
        clap::Parser::parse()
    }
}
