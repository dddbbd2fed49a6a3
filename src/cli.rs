use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sb2gs",
    about = "Decompiles Scratch 3 (.sb3) projects into goboscript source."
)]
pub struct Args {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Defaults to the input path with its extension removed.
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Overwrite the output directory even if it is not empty.")]
    pub force: bool,

    #[arg(long, help = "Build the decompiled project with goboscript afterwards.")]
    pub verify: bool,
}
