//! Optional post-pass that feeds the decompiled tree back through the
//! goboscript compiler to prove it builds.

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::info;

pub fn verify(output: &Path) -> Result<()> {
    info!(path = %output.display(), "building decompiled project with goboscript");
    let status = Command::new("goboscript")
        .arg("build")
        .arg("-i")
        .arg(output)
        .status()
        .context(
            "failed to run goboscript; install it from https://aspizu.github.io/goboscript/install",
        )?;
    if !status.success() {
        bail!("goboscript verification failed; the decompiled project does not build");
    }
    Ok(())
}
