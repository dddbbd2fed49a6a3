//! Pre-reconstruction pass that rewrites raw block patterns into the
//! shorthand forms the target language has syntax for: unary negation,
//! augmented variable assignment and compound list updates.
//!
//! Each rule triggers on one opcode and a structural predicate over the
//! block's inputs, fires at most once per block, and is idempotent: after
//! a rewrite the block carries a synthetic opcode no rule matches.

use std::collections::HashMap;

use crate::sb3::{Block, Field, Input};
use crate::signatures;

/// Synthetic opcode for `x op= value`.
pub const AUGMENTED_VARIABLE: &str = "data_augmentedvariable";
/// Synthetic opcode for `list[index] op= value`.
pub const AUGMENTED_LIST_ITEM: &str = "data_augmentedlistitem";
/// Synthetic opcode for unary minus; rendered through the operator table.
pub const NEGATIVE: &str = "negative";

pub fn canonicalize(blocks: &mut HashMap<String, Block>) {
    let ids: Vec<String> = blocks.keys().cloned().collect();
    for id in &ids {
        let Some(rewrite) = plan(blocks, id) else {
            continue;
        };
        apply(blocks.get_mut(id).expect("planned id exists"), rewrite);
    }
}

enum Rewrite {
    /// `0 - x` → `-x`.
    Negate,
    /// `set x to (x op y)` → `x op= y`.
    AugmentVariable { symbol: &'static str, value: Input },
    /// `change x by -(y)` → `x -= y`.
    SignedChange { value: Input },
    /// `replace list[i] with (list[i] op y)` → `list[i] op= y`.
    AugmentListItem { symbol: &'static str, value: Input },
}

fn plan(blocks: &HashMap<String, Block>, id: &str) -> Option<Rewrite> {
    let block = blocks.get(id)?;
    match block.opcode.as_str() {
        "operator_subtract" => {
            if is_literal_zero(block.input("NUM1")?) {
                return Some(Rewrite::Negate);
            }
            None
        }
        "data_setvariableto" => {
            let variable = &block.field("VARIABLE")?.value;
            let value = blocks.get(block.input("VALUE")?.block_id()?)?;
            let symbol = signatures::augmentable_symbol(&value.opcode)?;
            let lhs = value.input(signatures::augmentable_lhs(&value.opcode)?)?;
            if lhs.variable() != Some(variable.as_str()) {
                return None;
            }
            Some(Rewrite::AugmentVariable {
                symbol,
                value: rhs_of(value).cloned().unwrap_or(Input::Empty),
            })
        }
        "data_changevariableby" => {
            let delta = blocks.get(block.input("VALUE")?.block_id()?)?;
            let negated = match delta.opcode.as_str() {
                NEGATIVE => true,
                "operator_subtract" => delta.input("NUM1").is_some_and(is_literal_zero),
                _ => false,
            };
            if !negated {
                return None;
            }
            Some(Rewrite::SignedChange {
                value: delta.input("NUM2").cloned().unwrap_or(Input::Empty),
            })
        }
        "data_replaceitemoflist" => {
            let list = &block.field("LIST")?.value;
            let value = blocks.get(block.input("ITEM")?.block_id()?)?;
            let symbol = signatures::augmentable_symbol(&value.opcode)?;
            let lhs = blocks.get(
                value
                    .input(signatures::augmentable_lhs(&value.opcode)?)?
                    .block_id()?,
            )?;
            if lhs.opcode != "data_itemoflist" || lhs.field("LIST").map(|f| &f.value) != Some(list)
            {
                return None;
            }
            if !inputs_equivalent(blocks, lhs.input("INDEX")?, block.input("INDEX")?) {
                return None;
            }
            Some(Rewrite::AugmentListItem {
                symbol,
                value: rhs_of(value).cloned().unwrap_or(Input::Empty),
            })
        }
        _ => None,
    }
}

fn apply(block: &mut Block, rewrite: Rewrite) {
    match rewrite {
        Rewrite::Negate => {
            block.opcode = NEGATIVE.to_string();
            block.inputs.remove("NUM1");
        }
        Rewrite::AugmentVariable { symbol, value } => {
            block.opcode = AUGMENTED_VARIABLE.to_string();
            block.fields.insert("OPERATOR".to_string(), operator_field(symbol));
            block.inputs.insert("VALUE".to_string(), value);
        }
        Rewrite::SignedChange { value } => {
            block.opcode = AUGMENTED_VARIABLE.to_string();
            block.fields.insert("OPERATOR".to_string(), operator_field("-"));
            block.inputs.insert("VALUE".to_string(), value);
        }
        Rewrite::AugmentListItem { symbol, value } => {
            block.opcode = AUGMENTED_LIST_ITEM.to_string();
            block.fields.insert("OPERATOR".to_string(), operator_field(symbol));
            block.inputs.insert("ITEM".to_string(), value);
        }
    }
}

fn operator_field(symbol: &str) -> Field {
    Field { value: symbol.to_string(), id: None }
}

fn rhs_of(block: &Block) -> Option<&Input> {
    block.input(signatures::augmentable_rhs(&block.opcode)?)
}

/// The visual editor leaves subtraction's left socket as `""` when the
/// user builds a negation; `"0"`/`"0.0"` come from explicit zeroes. Other
/// numeric spellings are kept as written.
fn is_literal_zero(input: &Input) -> bool {
    matches!(input.literal(), Some("" | "0" | "0.0"))
}

/// Structural expression equivalence: equal opcodes and fields, and every
/// input slot present on either side present on both with recursively
/// equivalent values.
pub fn inputs_equivalent(blocks: &HashMap<String, Block>, a: &Input, b: &Input) -> bool {
    match (a, b) {
        (Input::Literal(x), Input::Literal(y)) => x == y,
        (Input::Variable(x), Input::Variable(y)) => x == y,
        (Input::List(x), Input::List(y)) => x == y,
        (Input::Empty, Input::Empty) => true,
        (Input::Block(x), Input::Block(y)) => match (blocks.get(x), blocks.get(y)) {
            (Some(x), Some(y)) => blocks_equivalent(blocks, x, y),
            _ => false,
        },
        _ => false,
    }
}

fn blocks_equivalent(blocks: &HashMap<String, Block>, a: &Block, b: &Block) -> bool {
    a.opcode == b.opcode
        && a.fields == b.fields
        && a.inputs.len() == b.inputs.len()
        && a.inputs
            .iter()
            .all(|(slot, input)| match b.inputs.get(slot) {
                Some(other) => inputs_equivalent(blocks, input, other),
                None => false,
            })
}
