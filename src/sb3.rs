//! In-memory model of a Scratch 3 project: targets, blocks, input slots,
//! fields and procedure mutations, built by hand from `project.json`.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use serde_json::Value;

/// A value attached to an input slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Immediate value, carried as the raw text from the project file.
    Literal(String),
    /// The slot is produced by evaluating another block.
    Block(String),
    Variable(String),
    List(String),
    /// Slot present but unset; reads as boolean false.
    Empty,
}

impl Input {
    pub fn block_id(&self) -> Option<&str> {
        match self {
            Input::Block(id) => Some(id),
            _ => None,
        }
    }

    pub fn literal(&self) -> Option<&str> {
        match self {
            Input::Literal(raw) => Some(raw),
            _ => None,
        }
    }

    pub fn variable(&self) -> Option<&str> {
        match self {
            Input::Variable(name) => Some(name),
            _ => None,
        }
    }
}

/// Dropdown/immediate data attached directly to a block.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub value: String,
    pub id: Option<String>,
}

/// Extra data on custom-procedure call/definition blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    /// Template string with positional `%s`/`%b` placeholders.
    pub proccode: String,
    pub argument_ids: Vec<String>,
    pub argument_names: Vec<String>,
    pub warp: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub opcode: String,
    pub next: Option<String>,
    pub inputs: HashMap<String, Input>,
    pub fields: HashMap<String, Field>,
    pub mutation: Option<Mutation>,
    pub shadow: bool,
    pub top_level: bool,
    pub x: i64,
    pub y: i64,
}

impl Block {
    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.get(name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// A menu is a shadow block whose only purpose is to carry one field
    /// value into its parent's input slot.
    pub fn is_menu(&self) -> bool {
        self.shadow && self.inputs.is_empty() && self.fields.len() == 1
    }
}

#[derive(Debug, Clone)]
pub struct Asset {
    pub name: String,
    pub md5ext: String,
    pub data_format: String,
    pub rotation_center_x: f64,
    pub rotation_center_y: f64,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub default: Value,
}

#[derive(Debug, Clone)]
pub struct List {
    pub name: String,
    pub defaults: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct Target {
    pub name: String,
    pub is_stage: bool,
    pub blocks: HashMap<String, Block>,
    pub variables: Vec<Variable>,
    pub lists: Vec<List>,
    pub costumes: Vec<Asset>,
    pub sounds: Vec<Asset>,
    pub volume: f64,
    pub layer_order: i64,
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub direction: f64,
    pub draggable: bool,
    pub rotation_style: String,
}

impl Target {
    /// Fallible block lookup; a dangling reference is a malformed graph,
    /// not an expected omission.
    pub fn block(&self, id: &str) -> Result<&Block> {
        self.blocks
            .get(id)
            .ok_or_else(|| anyhow!("missing block '{}' in sprite '{}'", id, self.name))
    }

    pub fn parse(target: &Value) -> Result<Target> {
        let name = target
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("target missing 'name'"))?
            .to_string();
        let is_stage = target
            .get("isStage")
            .and_then(Value::as_bool)
            .ok_or_else(|| anyhow!("target '{}' missing isStage", name))?;

        let mut blocks = HashMap::new();
        if let Some(table) = target.get("blocks").and_then(Value::as_object) {
            for (id, raw) in table {
                // Top-level floating reporters are stored as bare arrays;
                // they carry no statements and are skipped.
                if let Some(block) = parse_block(raw) {
                    blocks.insert(id.clone(), block);
                }
            }
        }

        Ok(Target {
            is_stage,
            blocks,
            variables: parse_variables(target.get("variables")),
            lists: parse_lists(target.get("lists")),
            costumes: parse_assets(target.get("costumes")),
            sounds: parse_assets(target.get("sounds")),
            volume: num_or(target.get("volume"), 100.0),
            layer_order: target
                .get("layerOrder")
                .and_then(Value::as_i64)
                .unwrap_or(0),
            visible: target.get("visible").and_then(Value::as_bool).unwrap_or(true),
            x: num_or(target.get("x"), 0.0),
            y: num_or(target.get("y"), 0.0),
            size: num_or(target.get("size"), 100.0),
            direction: num_or(target.get("direction"), 90.0),
            draggable: target
                .get("draggable")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            rotation_style: target
                .get("rotationStyle")
                .and_then(Value::as_str)
                .unwrap_or("all around")
                .to_string(),
            name,
        })
    }
}

fn num_or(node: Option<&Value>, default: f64) -> f64 {
    node.and_then(Value::as_f64).unwrap_or(default)
}

fn parse_block(raw: &Value) -> Option<Block> {
    let obj = raw.as_object()?;
    let opcode = obj.get("opcode")?.as_str()?.to_string();

    let mut inputs = HashMap::new();
    if let Some(map) = obj.get("inputs").and_then(Value::as_object) {
        for (slot, value) in map {
            inputs.insert(slot.clone(), parse_input(value));
        }
    }

    let mut fields = HashMap::new();
    if let Some(map) = obj.get("fields").and_then(Value::as_object) {
        for (slot, value) in map {
            if let Some(arr) = value.as_array() {
                fields.insert(
                    slot.clone(),
                    Field {
                        value: stringify(arr.first()),
                        id: arr.get(1).and_then(Value::as_str).map(ToString::to_string),
                    },
                );
            }
        }
    }

    Some(Block {
        opcode,
        next: obj.get("next").and_then(Value::as_str).map(ToString::to_string),
        inputs,
        fields,
        mutation: obj.get("mutation").and_then(parse_mutation),
        shadow: obj.get("shadow").and_then(Value::as_bool).unwrap_or(false),
        top_level: obj.get("topLevel").and_then(Value::as_bool).unwrap_or(false),
        x: obj.get("x").and_then(Value::as_i64).unwrap_or(0),
        y: obj.get("y").and_then(Value::as_i64).unwrap_or(0),
    })
}

/// Inputs are `[shadow, payload, ...]` arrays. The payload is either a
/// nested block id (string) or a `[type, value, ...]` literal descriptor.
fn parse_input(value: &Value) -> Input {
    let Some(arr) = value.as_array() else {
        // Tolerate a bare block-id string.
        return match value.as_str() {
            Some(id) => Input::Block(id.to_string()),
            None => Input::Empty,
        };
    };
    let Some(payload) = arr.get(1) else {
        return Input::Empty;
    };
    if let Some(id) = payload.as_str() {
        return Input::Block(id.to_string());
    }
    let Some(desc) = payload.as_array() else {
        return Input::Empty;
    };
    let kind = desc.first().and_then(Value::as_i64).unwrap_or(0);
    match kind {
        // 4..=10 are the numeric/text shadow kinds, 11 is a broadcast.
        4..=11 => Input::Literal(stringify(desc.get(1))),
        12 => Input::Variable(stringify(desc.get(1))),
        13 => Input::List(stringify(desc.get(1))),
        _ => Input::Empty,
    }
}

fn parse_mutation(raw: &Value) -> Option<Mutation> {
    let obj = raw.as_object()?;
    let proccode = obj.get("proccode")?.as_str()?.to_string();
    Some(Mutation {
        proccode,
        argument_ids: parse_id_list(obj.get("argumentids")),
        argument_names: parse_id_list(obj.get("argumentnames")),
        warp: match obj.get("warp") {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        },
    })
}

/// argumentids/argumentnames are JSON arrays serialized into strings.
fn parse_id_list(node: Option<&Value>) -> Vec<String> {
    node.and_then(Value::as_str)
        .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
        .unwrap_or_default()
}

fn parse_variables(node: Option<&Value>) -> Vec<Variable> {
    let mut out = Vec::new();
    let Some(map) = node.and_then(Value::as_object) else {
        return out;
    };
    for entry in map.values() {
        if let Some(arr) = entry.as_array() {
            out.push(Variable {
                name: stringify(arr.first()),
                default: arr.get(1).cloned().unwrap_or(Value::Null),
            });
        }
    }
    out
}

fn parse_lists(node: Option<&Value>) -> Vec<List> {
    let mut out = Vec::new();
    let Some(map) = node.and_then(Value::as_object) else {
        return out;
    };
    for entry in map.values() {
        if let Some(arr) = entry.as_array() {
            out.push(List {
                name: stringify(arr.first()),
                defaults: arr
                    .get(1)
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
            });
        }
    }
    out
}

fn parse_assets(node: Option<&Value>) -> Vec<Asset> {
    let mut out = Vec::new();
    let Some(arr) = node.and_then(Value::as_array) else {
        return out;
    };
    for raw in arr {
        let Some(md5ext) = raw.get("md5ext").and_then(Value::as_str) else {
            continue;
        };
        out.push(Asset {
            name: stringify(raw.get("name")),
            md5ext: md5ext.to_string(),
            data_format: stringify(raw.get("dataFormat")),
            rotation_center_x: num_or(raw.get("rotationCenterX"), 0.0),
            rotation_center_y: num_or(raw.get("rotationCenterY"), 0.0),
        });
    }
    out
}

/// Field and literal payloads may be stored as strings or bare numbers.
fn stringify(node: Option<&Value>) -> String {
    match node {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_input_shapes() {
        assert_eq!(parse_input(&json!([1, [4, "10"]])), Input::Literal("10".into()));
        assert_eq!(parse_input(&json!([1, [4, 10]])), Input::Literal("10".into()));
        assert_eq!(parse_input(&json!([1, [10, "hi"]])), Input::Literal("hi".into()));
        assert_eq!(parse_input(&json!([2, "blockid"])), Input::Block("blockid".into()));
        assert_eq!(
            parse_input(&json!([3, [12, "score", "varid"], [4, "0"]])),
            Input::Variable("score".into())
        );
        assert_eq!(
            parse_input(&json!([1, [13, "items", "listid"]])),
            Input::List("items".into())
        );
        assert_eq!(parse_input(&json!([1, null])), Input::Empty);
    }

    #[test]
    fn missing_block_lookup_is_an_error() {
        let target = Target::parse(&json!({
            "name": "Sprite1",
            "isStage": false,
            "blocks": {},
        }))
        .unwrap();
        assert!(target.block("nope").is_err());
    }

    #[test]
    fn parses_mutation_argument_lists() {
        let block = parse_block(&json!({
            "opcode": "procedures_call",
            "next": null,
            "inputs": {},
            "fields": {},
            "mutation": {
                "proccode": "greet %s",
                "argumentids": "[\"arg1\"]",
                "argumentnames": "[\"name\"]",
                "warp": "false"
            }
        }))
        .unwrap();
        let mutation = block.mutation.unwrap();
        assert_eq!(mutation.proccode, "greet %s");
        assert_eq!(mutation.argument_ids, vec!["arg1"]);
        assert_eq!(mutation.argument_names, vec!["name"]);
        assert!(!mutation.warp);
    }
}
