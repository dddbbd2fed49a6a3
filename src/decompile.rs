//! End-to-end driver: reads the .sb3 archive, gates on the project
//! version, extracts assets, and writes one goboscript file per target.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use tracing::info;
use zip::ZipArchive;

use crate::assets;
use crate::canonicalize::canonicalize;
use crate::config;
use crate::sb3::Target;
use crate::sprite;

pub fn decompile_sb3(input: &Path, output: &Path, force: bool) -> Result<()> {
    let (project, files) = read_sb3(input)?;
    check_meta(&project)?;
    let raw_targets = project
        .get("targets")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("invalid project.json: missing 'targets' array"))?;

    prepare_output(output, force)?;
    let assets_dir = output.join("assets");
    fs::create_dir_all(&assets_dir)
        .with_context(|| format!("failed to create '{}'", assets_dir.display()))?;
    for (name, bytes) in &files {
        fs::write(assets_dir.join(name), bytes)
            .with_context(|| format!("failed to extract asset '{}'", name))?;
    }

    config::decompile_config(&project, output)?;

    let mut recentered = HashSet::new();
    for raw in raw_targets {
        let mut target = Target::parse(raw)?;
        let file_name = source_file_name(&target)?;
        canonicalize(&mut target.blocks);
        let text = sprite::decompile_target(&target)?;
        fs::write(output.join(&file_name), text)
            .with_context(|| format!("failed to write '{}'", file_name))?;
        info!(sprite = %target.name, file = %file_name, "decompiled target");
        for costume in &target.costumes {
            assets::fix_center(costume, &assets_dir.join(&costume.md5ext), &mut recentered)?;
        }
    }
    Ok(())
}

/// The stage always maps to `stage.gs`; sprite names become file names
/// and so must not collide with it or escape the directory.
fn source_file_name(target: &Target) -> Result<String> {
    if target.is_stage {
        return Ok("stage.gs".to_string());
    }
    if target.name.contains('/') || target.name.contains('\\') {
        bail!("sprite name '{}' cannot be used as a file name", target.name);
    }
    if target.name.eq_ignore_ascii_case("stage") {
        bail!("sprite name '{}' collides with the stage file", target.name);
    }
    Ok(format!("{}.gs", target.name))
}

fn check_meta(project: &Value) -> Result<()> {
    let semver = project
        .pointer("/meta/semver")
        .and_then(Value::as_str)
        .unwrap_or("");
    if semver != "3.0.0" {
        bail!("unsupported project version '{}'", semver);
    }
    let vm = project
        .pointer("/meta/vm")
        .and_then(Value::as_str)
        .unwrap_or("");
    if vm != "0.2.0" {
        bail!("unsupported virtual machine version '{}'", vm);
    }
    Ok(())
}

/// An existing output directory is only replaced when it is empty, looks
/// like a previous run (has a `stage.gs`), or `--force` was given.
fn prepare_output(output: &Path, force: bool) -> Result<()> {
    if output.exists() {
        let occupied = fs::read_dir(output)
            .with_context(|| format!("failed to read '{}'", output.display()))?
            .next()
            .is_some();
        if occupied && !force && !output.join("stage.gs").is_file() {
            bail!(
                "output directory '{}' is not empty; pass --force to overwrite it",
                output.display()
            );
        }
        fs::remove_dir_all(output)
            .with_context(|| format!("failed to clear '{}'", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create '{}'", output.display()))?;
    Ok(())
}

fn read_sb3(input: &Path) -> Result<(Value, HashMap<String, Vec<u8>>)> {
    let file = fs::File::open(input)
        .with_context(|| format!("failed to open '{}'", input.display()))?;
    let mut zip = ZipArchive::new(file)
        .with_context(|| format!("'{}' is not a valid zip/.sb3 file", input.display()))?;

    let mut project_json = String::new();
    {
        let mut entry = zip
            .by_name("project.json")
            .map_err(|_| anyhow!("project.json not found in '{}'", input.display()))?;
        entry.read_to_string(&mut project_json)?;
    }
    let project: Value = serde_json::from_str(&project_json)
        .with_context(|| format!("invalid project.json inside '{}'", input.display()))?;

    let mut files = HashMap::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let name = entry.name().to_string();
        if name == "project.json" || name.ends_with('/') || name.contains('/') {
            continue;
        }
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        files.insert(name, bytes);
    }

    Ok((project, files))
}
