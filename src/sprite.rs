//! Per-target rendering: properties, asset and data declarations, then
//! every top-level script in canvas order.

use anyhow::{bail, Result};
use serde_json::Value;
use tracing::warn;

use crate::builder::SourceBuilder;
use crate::sb3::{Asset, Block, Target};
use crate::syntax;

/// Editor graphs nest shallowly in practice; anything deeper than this
/// is a malformed or adversarial input, not a real project.
const MAX_DEPTH: usize = 512;

/// Rendering context for one target. Expression and statement
/// reconstruction hang further methods off this in their own modules.
pub struct Ctx<'a> {
    pub target: &'a Target,
    pub out: SourceBuilder,
    pub depth: usize,
}

pub fn decompile_target(target: &Target) -> Result<String> {
    let mut ctx = Ctx { target, out: SourceBuilder::new(), depth: 0 };
    ctx.properties();
    ctx.asset_declarations("costumes", &target.costumes);
    ctx.asset_declarations("sounds", &target.sounds);
    ctx.data_declarations();
    ctx.scripts()?;
    Ok(ctx.out.into_string())
}

impl Ctx<'_> {
    pub(crate) fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            bail!(
                "block nesting exceeds {} levels in sprite '{}'",
                MAX_DEPTH,
                self.target.name
            );
        }
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.depth -= 1;
    }

    /// Non-default target state becomes leading property statements, so
    /// building the output reproduces the saved pose.
    fn properties(&mut self) {
        let target = self.target;
        if target.volume != 100.0 {
            self.out
                .iprintln(&format!("set_volume {};", syntax::number(target.volume)));
        }
        if target.is_stage {
            return;
        }
        if !target.visible {
            self.out.iprintln("hide;");
        }
        if target.x != 0.0 {
            self.out.iprintln(&format!("set_x {};", syntax::number(target.x)));
        }
        if target.y != 0.0 {
            self.out.iprintln(&format!("set_y {};", syntax::number(target.y)));
        }
        if target.size != 100.0 {
            self.out
                .iprintln(&format!("set_size {};", syntax::number(target.size)));
        }
        if target.direction != 90.0 {
            self.out.iprintln(&format!(
                "point_in_direction {};",
                syntax::number(target.direction)
            ));
        }
        match target.rotation_style.as_str() {
            "left-right" => self.out.iprintln("set_rotation_style_left_right;"),
            "don't rotate" => self.out.iprintln("set_rotation_style_do_not_rotate;"),
            _ => {}
        }
        if target.draggable {
            self.out.iprintln("set_drag_mode_draggable;");
        }
        if target.layer_order != 1 {
            self.out
                .iprintln(&format!("set_layer_order {};", target.layer_order));
        }
    }

    fn asset_declarations(&mut self, keyword: &str, assets: &[Asset]) {
        if assets.is_empty() {
            return;
        }
        self.out.iprint(keyword);
        for (i, asset) in assets.iter().enumerate() {
            self.out.print(if i == 0 { " " } else { ", " });
            self.out
                .print(&syntax::string(&format!("assets/{}", asset.md5ext)));
            self.out.print(" as ");
            self.out.print(&syntax::string(&asset.name));
        }
        self.out.println(";");
    }

    fn data_declarations(&mut self) {
        let target = self.target;
        for variable in &target.variables {
            self.out.iprintln(&format!(
                "var {} = {};",
                syntax::identifier(&variable.name),
                constexpr(&variable.default)
            ));
        }
        for list in &target.lists {
            let name = syntax::identifier(&list.name);
            if list.defaults.is_empty() {
                self.out.iprintln(&format!("list {};", name));
            } else {
                let items: Vec<String> = list.defaults.iter().map(constexpr).collect();
                self.out
                    .iprintln(&format!("list {} = [{}];", name, items.join(", ")));
            }
        }
    }

    /// Scripts are emitted in reading order of the editor canvas: top to
    /// bottom, then left to right, with the block id as a tiebreaker so
    /// the output is stable across runs.
    fn scripts(&mut self) -> Result<()> {
        let target = self.target;
        let mut heads: Vec<(&String, &Block)> = target
            .blocks
            .iter()
            .filter(|(_, block)| block.top_level && is_script_head(&block.opcode))
            .collect();
        heads.sort_by_key(|(id, block)| (block.y, block.x, (*id).clone()));
        for (_, block) in heads {
            if !self.out.is_empty() {
                self.out.println("");
            }
            self.script(block)?;
        }
        Ok(())
    }
}

fn is_script_head(opcode: &str) -> bool {
    // event_broadcast/event_broadcastandwait are statements, so only the
    // hat-shaped `event_when*` family starts a script here.
    opcode.starts_with("event_when")
        || opcode == "control_start_as_clone"
        || opcode == "procedures_definition"
}

/// Declared defaults are JSON scalars, not input payloads: numbers stay
/// numbers, strings get the literal/quoting treatment, anything odd
/// degrades to an empty string.
fn constexpr(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => syntax::value(s),
        Value::Bool(b) => syntax::string(&b.to_string()),
        other => {
            warn!(?other, "unrepresentable declaration default");
            syntax::string("")
        }
    }
}
