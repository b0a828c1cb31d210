use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod emit;
pub mod layout;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write JPEG files to stdout as a frame feed.
    Emit(EmitArgs),
    /// Show the byte layout of one frame message.
    Layout(LayoutArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Emit(args) => emit::run(args),
        Command::Layout(args) => layout::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EmitArgs {
    /// JPEG files, emitted in the order given.
    #[arg(required = true, value_name = "JPEG")]
    pub inputs: Vec<PathBuf>,
    /// Timestamp of the first frame.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub pts_start: i64,
    /// Timestamp increment between consecutive frames.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub pts_step: i64,
    /// Delay between frames (e.g. 40ms, 1s).
    #[arg(long)]
    pub interval: Option<String>,
    /// Replay the file list until interrupted or the reader goes away.
    #[arg(long = "loop")]
    pub repeat: bool,
    /// Write frames to a file instead of stdout.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
    /// Reject frames whose document would exceed this many bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_document_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Image size in bytes.
    #[arg(long, default_value_t = 0)]
    pub jpeg_size: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
