pub mod assets;
pub mod builder;
pub mod canonicalize;
pub mod cli;
pub mod config;
pub mod decompile;
mod expr;
pub mod sb3;
pub mod signatures;
pub mod sprite;
mod stmt;
pub mod syntax;
pub mod verify;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub fn run_cli(args: &cli::Args) -> Result<()> {
    let input = canonicalize_file(&args.input)?;
    let output = match &args.output {
        Some(path) => path.clone(),
        None => input.with_extension(""),
    };
    decompile::decompile_sb3(&input, &output, args.force)?;
    if args.verify {
        verify::verify(&output)?;
    }
    Ok(())
}

pub fn canonicalize_file(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(anyhow::anyhow!(
            "input file not found: '{}'",
            path.display()
        ));
    }
    Ok(path.canonicalize()?)
}
