//! Project settings. TurboWarp stores its runtime settings as a JSON
//! blob inside a specially tagged stage comment; the build tool expects
//! the same settings as a flat `goboscript.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

const CONFIG_COMMENT_SUFFIX: &str = "_twconfig_";

pub fn decompile_config(project: &Value, output: &Path) -> Result<()> {
    let data = turbowarp_config(project).unwrap_or(Value::Null);
    let runtime = data.get("runtimeOptions").cloned().unwrap_or(Value::Null);

    let mut toml = String::new();
    toml.push_str("bitmap_resolution = 2\n");
    if let Some(rate) = data.get("framerate").and_then(Value::as_i64) {
        toml.push_str(&format!("frame_rate = {rate}\n"));
    }
    if let Some(clones) = runtime.get("maxClones").and_then(Value::as_f64) {
        toml.push_str(&format!("max_clones = {clones}\n"));
    }
    push_flag(
        &mut toml,
        "no_miscellaneous_limits",
        runtime.get("miscLimits") == Some(&Value::Bool(false)),
    );
    push_flag(
        &mut toml,
        "no_sprite_fencing",
        runtime.get("fencing") == Some(&Value::Bool(false)),
    );
    push_flag(
        &mut toml,
        "frame_interpolation",
        data.get("interpolation") == Some(&Value::Bool(true)),
    );
    push_flag(
        &mut toml,
        "high_quality_pen",
        data.get("hq") == Some(&Value::Bool(true)),
    );
    if let Some(width) = data.get("width").and_then(Value::as_i64) {
        toml.push_str(&format!("stage_width = {width}\n"));
    }
    if let Some(height) = data.get("height").and_then(Value::as_i64) {
        toml.push_str(&format!("stage_height = {height}\n"));
    }

    let path = output.join("goboscript.toml");
    fs::write(&path, toml).with_context(|| format!("failed to write '{}'", path.display()))
}

fn push_flag(toml: &mut String, key: &str, value: bool) {
    toml.push_str(&format!("{key} = {value}\n"));
}

/// Finds the tagged comment on the stage and parses the JSON object
/// embedded in it. Anything malformed degrades to defaults.
fn turbowarp_config(project: &Value) -> Option<Value> {
    let targets = project.get("targets")?.as_array()?;
    let stage = targets
        .iter()
        .find(|t| t.get("isStage").and_then(Value::as_bool) == Some(true))?;
    let comments = stage.get("comments")?.as_object()?;
    let text = comments.values().find_map(|comment| {
        let text = comment.get("text")?.as_str()?;
        text.ends_with(CONFIG_COMMENT_SUFFIX).then_some(text)
    })?;
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    serde_json::from_str(&text[start..=end]).ok()
}
