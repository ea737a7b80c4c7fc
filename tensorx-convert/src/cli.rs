use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::ValueHint};

/// Command-line arguments for tensorx-convert.
#[derive(Parser, Debug)]
#[command(
    name = "tensorx-convert",
    about = "Convert RGB images to and from the tensor exchange format.",
    author,
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a PNG/JPEG image as a 3-channel f16 tensor
    Encode(EncodeArgs),
    /// Decode a tensor (RGB or 4-channel latent) to an image
    Decode(DecodeArgs),
    /// Print the tensor header without converting the payload
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Source image (any format the image crate reads)
    #[arg(value_name = "IMAGE", value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output tensor path (defaults to <input stem>.tensor)
    #[arg(long, short = 'o', value_hint = ValueHint::FilePath, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Tensor exchange file
    #[arg(value_name = "TENSOR", value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output image path; format follows the extension (defaults to <input stem>.png)
    #[arg(long, short = 'o', value_hint = ValueHint::FilePath, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Tensor exchange file
    #[arg(value_name = "TENSOR", value_hint = ValueHint::FilePath)]
    pub input: PathBuf,
}
