//! Expression reconstruction: literals, variables, operator trees and
//! reporter calls, with the minimal parenthesization that preserves the
//! evaluation order encoded in the block graph.

use anyhow::{bail, Result};
use tracing::warn;

use crate::sb3::{Block, Input};
use crate::signatures::{self, Arg, Operator, Shape, Side};
use crate::sprite::Ctx;
use crate::syntax;

impl Ctx<'_> {
    /// Renders the named input slot. Condition sockets may legitimately
    /// be left unplugged and read as false; any other absent slot is a
    /// malformed block.
    pub(crate) fn input(&mut self, block: &Block, slot: &str) -> Result<()> {
        let target = self.target;
        match block.input(slot) {
            None if slot.starts_with("CONDITION") => {
                self.out.print("false");
                Ok(())
            }
            None => bail!(
                "missing input '{}' on '{}' in sprite '{}'",
                slot,
                block.opcode,
                target.name
            ),
            Some(Input::Empty) => {
                self.out.print("false");
                Ok(())
            }
            Some(Input::Literal(raw)) => {
                self.out.print(&syntax::value(raw));
                Ok(())
            }
            Some(Input::Variable(name)) | Some(Input::List(name)) => {
                self.out.print(&syntax::identifier(name));
                Ok(())
            }
            Some(Input::Block(id)) => {
                let nested = target.block(id)?;
                self.expr(nested)
            }
        }
    }

    /// Operator operands tolerate a missing slot; the editor produces
    /// such holes when a block is torn out of a boolean socket.
    fn input_or_false(&mut self, block: &Block, slot: &str) -> Result<()> {
        if block.input(slot).is_none() {
            self.out.print("false");
            return Ok(());
        }
        self.input(block, slot)
    }

    pub(crate) fn expr(&mut self, block: &Block) -> Result<()> {
        self.descend()?;
        let result = self.expr_inner(block);
        self.ascend();
        result
    }

    fn expr_inner(&mut self, block: &Block) -> Result<()> {
        let target = self.target;
        // `not` over a bare comparison folds into the inverted
        // comparison symbol instead of prefixing the operator.
        if block.opcode == "operator_not" {
            if let Some(comparison) = block
                .input("OPERAND")
                .and_then(Input::block_id)
                .and_then(|id| target.blocks.get(id))
            {
                if let Some(op) = signatures::negated_comparison(&comparison.opcode) {
                    return self.operator_expr(comparison, op);
                }
            }
        }
        if let Some(op) = signatures::operator(&block.opcode) {
            return self.operator_expr(block, op);
        }
        match block.opcode.as_str() {
            "argument_reporter_string_number" | "argument_reporter_boolean" => {
                let name = block.field("VALUE").map(|f| f.value.as_str()).unwrap_or("");
                self.out.print("$");
                self.out.print(&syntax::identifier(name));
                Ok(())
            }
            "data_itemoflist" => {
                self.out.print(&self.list_name(block));
                self.out.print("[");
                self.input(block, "INDEX")?;
                self.out.print("]");
                Ok(())
            }
            "data_lengthoflist" => {
                self.out.print("length(");
                self.out.print(&self.list_name(block));
                self.out.print(")");
                Ok(())
            }
            "data_listcontainsitem" => {
                // Parenthesized as a unit; the item side additionally
                // follows the containment operator's binding rules.
                let in_op = signatures::operator("operator_contains")
                    .expect("containment operator is in the table");
                self.out.print("(");
                self.operand(block, in_op, "ITEM", Side::Left)?;
                self.out.print(" in ");
                self.out.print(&self.list_name(block));
                self.out.print(")");
                Ok(())
            }
            _ => {
                if let Some(resolved) = signatures::resolve_reporter(&target.blocks, block) {
                    self.out.print(resolved.name);
                    self.out.print("(");
                    self.resolved_args(block, &resolved.args)?;
                    self.out.print(")");
                    Ok(())
                } else {
                    warn!(
                        opcode = %block.opcode,
                        sprite = %target.name,
                        "substituting false for unsupported reporter"
                    );
                    self.out.print("false");
                    Ok(())
                }
            }
        }
    }

    pub(crate) fn resolved_args(&mut self, block: &Block, args: &[Arg]) -> Result<()> {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.print(", ");
            }
            match arg {
                Arg::Slot(slot) => self.input(block, slot)?,
                Arg::Literal(text) => self.out.print(&syntax::value(text)),
            }
        }
        Ok(())
    }

    fn operator_expr(&mut self, block: &Block, op: &Operator) -> Result<()> {
        match op.shape {
            Shape::Infix { left, right } => {
                self.operand(block, op, left, Side::Left)?;
                self.out.print(" ");
                self.out.print(op.symbol);
                self.out.print(" ");
                self.operand(block, op, right, Side::Right)
            }
            Shape::Prefix { operand, side } => {
                self.out.print(op.symbol);
                if op.symbol.chars().all(|c| c.is_ascii_alphabetic()) {
                    self.out.print(" ");
                }
                self.operand(block, op, operand, side)
            }
            Shape::Index { index, subject } => {
                self.operand(block, op, subject, Side::Left)?;
                self.out.print("[");
                self.input(block, index)?;
                self.out.print("]");
                Ok(())
            }
        }
    }

    /// An operand is wrapped in parentheses when it binds looser than its
    /// parent, or equally tight on the side the parent does not associate
    /// toward. Everything else reads back unambiguously bare.
    pub(crate) fn operand(
        &mut self,
        block: &Block,
        parent: &Operator,
        slot: &str,
        side: Side,
    ) -> Result<()> {
        let target = self.target;
        let child = block
            .input(slot)
            .and_then(Input::block_id)
            .and_then(|id| target.blocks.get(id))
            .and_then(|nested| signatures::operator(&nested.opcode));
        let parens = child.is_some_and(|child| {
            child.precedence > parent.precedence
                || (child.precedence == parent.precedence && side != parent.assoc)
        });
        if parens {
            self.out.print("(");
        }
        self.input_or_false(block, slot)?;
        if parens {
            self.out.print(")");
        }
        Ok(())
    }

    fn list_name(&self, block: &Block) -> String {
        syntax::identifier(block.field("LIST").map(|f| f.value.as_str()).unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::builder::SourceBuilder;
    use crate::sb3::Target;

    /// Builds a sprite around the given block table and renders the block
    /// registered under `"e"` as an expression.
    fn render(blocks: Value) -> String {
        let target = Target::parse(&json!({
            "name": "Sprite1",
            "isStage": false,
            "blocks": blocks,
        }))
        .unwrap();
        let mut ctx = Ctx { target: &target, out: SourceBuilder::new(), depth: 0 };
        let root = target.block("e").unwrap();
        ctx.expr(root).unwrap();
        ctx.out.into_string()
    }

    fn op(opcode: &str, lhs: Value, rhs: Value) -> Value {
        let (a, b) = match opcode {
            "operator_and" | "operator_or" | "operator_equals" | "operator_lt"
            | "operator_gt" => ("OPERAND1", "OPERAND2"),
            "operator_join" | "operator_contains" => ("STRING1", "STRING2"),
            _ => ("NUM1", "NUM2"),
        };
        json!({
            "opcode": opcode, "next": null, "fields": {},
            "inputs": {a: lhs, b: rhs},
        })
    }

    fn lit(raw: &str) -> Value {
        json!([1, [10, raw]])
    }

    fn var(name: &str) -> Value {
        json!([3, [12, name, "id"], [4, "0"]])
    }

    fn blk(id: &str) -> Value {
        json!([3, id, [4, "0"]])
    }

    #[test]
    fn tighter_children_stay_bare() {
        let text = render(json!({
            "e": op("operator_add", var("a"), blk("m")),
            "m": op("operator_multiply", var("b"), lit("2")),
        }));
        assert_eq!(text, "a + b * 2");
    }

    #[test]
    fn looser_children_get_parenthesized() {
        let text = render(json!({
            "e": op("operator_multiply", blk("s"), var("c")),
            "s": op("operator_add", var("a"), var("b")),
        }));
        assert_eq!(text, "(a + b) * c");
    }

    #[test]
    fn right_nested_subtraction_keeps_its_grouping() {
        let text = render(json!({
            "e": op("operator_subtract", var("a"), blk("s")),
            "s": op("operator_subtract", var("b"), var("c")),
        }));
        assert_eq!(text, "a - (b - c)");
    }

    #[test]
    fn left_nested_subtraction_stays_bare() {
        let text = render(json!({
            "e": op("operator_subtract", blk("s"), var("c")),
            "s": op("operator_subtract", var("a"), var("b")),
        }));
        assert_eq!(text, "a - b - c");
    }

    #[test]
    fn not_wraps_looser_conjunctions() {
        let text = render(json!({
            "e": {"opcode": "operator_not", "next": null, "fields": {},
                  "inputs": {"OPERAND": blk("c")}},
            "c": op("operator_and", var("a"), var("b")),
        }));
        assert_eq!(text, "not (a and b)");
    }

    #[test]
    fn not_over_a_comparison_folds_to_the_inverted_symbol() {
        for (opcode, expected) in [
            ("operator_equals", "a != b"),
            ("operator_lt", "a >= b"),
            ("operator_gt", "a <= b"),
        ] {
            let text = render(json!({
                "e": {"opcode": "operator_not", "next": null, "fields": {},
                      "inputs": {"OPERAND": blk("c")}},
                "c": op(opcode, var("a"), var("b")),
            }));
            assert_eq!(text, expected, "for {opcode}");
        }
    }

    #[test]
    fn folded_comparison_keeps_operand_grouping() {
        let text = render(json!({
            "e": {"opcode": "operator_not", "next": null, "fields": {},
                  "inputs": {"OPERAND": blk("c")}},
            "c": op("operator_equals", blk("j"), var("b")),
            "j": op("operator_join", var("x"), var("y")),
        }));
        assert_eq!(text, "x & y != b");
    }

    #[test]
    fn unplugged_boolean_socket_reads_false() {
        let text = render(json!({
            "e": {"opcode": "operator_not", "next": null, "fields": {}, "inputs": {}},
        }));
        assert_eq!(text, "not false");
    }

    #[test]
    fn string_containment_swaps_operand_order() {
        let text = render(json!({
            "e": op("operator_contains", lit("haystack"), var("needle")),
        }));
        assert_eq!(text, "needle in \"haystack\"");
    }

    #[test]
    fn letter_of_renders_as_index() {
        let text = render(json!({
            "e": {"opcode": "operator_letter_of", "next": null, "fields": {},
                  "inputs": {"LETTER": lit("1"), "STRING": var("word")}},
        }));
        assert_eq!(text, "word[1]");
    }

    #[test]
    fn indexed_expression_subject_is_parenthesized() {
        let text = render(json!({
            "e": {"opcode": "operator_letter_of", "next": null, "fields": {},
                  "inputs": {"LETTER": lit("1"), "STRING": blk("j")}},
            "j": op("operator_join", var("a"), var("b")),
        }));
        assert_eq!(text, "(a & b)[1]");
    }

    #[test]
    fn nested_negation_is_disambiguated() {
        let text = render(json!({
            "e": {"opcode": "operator_subtract", "next": null, "fields": {},
                  "inputs": {"NUM1": lit("0"), "NUM2": blk("n")}},
            "n": {"opcode": "operator_subtract", "next": null, "fields": {},
                  "inputs": {"NUM1": lit("0"), "NUM2": var("x")}},
        }));
        // The canonicalization pass normally retags these; the raw form
        // must still render with the same grouping.
        assert_eq!(text, "0 - (0 - x)");
    }

    #[test]
    fn procedure_arguments_render_with_sigil() {
        let text = render(json!({
            "e": {"opcode": "argument_reporter_string_number", "next": null,
                  "fields": {"VALUE": ["loop count", null]}, "inputs": {}},
        }));
        assert_eq!(text, "$loop_count");
    }

    #[test]
    fn list_reporters_use_index_and_length_forms() {
        let text = render(json!({
            "e": {"opcode": "data_itemoflist", "next": null,
                  "fields": {"LIST": ["scores", "id"]},
                  "inputs": {"INDEX": blk("l")}},
            "l": {"opcode": "data_lengthoflist", "next": null,
                  "fields": {"LIST": ["scores", "id"]}, "inputs": {}},
        }));
        assert_eq!(text, "scores[length(scores)]");
    }

    #[test]
    fn list_containment_parenthesizes_as_a_unit() {
        let text = render(json!({
            "e": {"opcode": "data_listcontainsitem", "next": null,
                  "fields": {"LIST": ["names", "id"]},
                  "inputs": {"ITEM": lit("bob")}},
        }));
        assert_eq!(text, "(\"bob\" in names)");
    }

    #[test]
    fn reporters_resolve_through_signature_tables() {
        let text = render(json!({
            "e": {"opcode": "operator_mathop", "next": null,
                  "fields": {"OPERATOR": ["ceiling", null]},
                  "inputs": {"NUM": var("x")}},
        }));
        assert_eq!(text, "ceil(x)");
    }

    #[test]
    fn unsupported_reporter_degrades_to_false() {
        let text = render(json!({
            "e": {"opcode": "sensing_userid", "next": null, "fields": {}, "inputs": {}},
        }));
        assert_eq!(text, "false");
    }

    #[test]
    fn pathological_nesting_is_rejected() {
        let mut blocks = serde_json::Map::new();
        for i in 0..600 {
            blocks.insert(
                format!("n{i}"),
                json!({
                    "opcode": "operator_not", "next": null, "fields": {},
                    "inputs": {"OPERAND": [2, format!("n{}", i + 1)]},
                }),
            );
        }
        blocks.insert(
            "n600".to_string(),
            json!({"opcode": "sensing_mousedown", "next": null, "fields": {}, "inputs": {}}),
        );
        let target = Target::parse(&json!({
            "name": "Sprite1",
            "isStage": false,
            "blocks": Value::Object(blocks),
        }))
        .unwrap();
        let mut ctx = Ctx { target: &target, out: SourceBuilder::new(), depth: 0 };
        let root = target.block("n0").unwrap();
        assert!(ctx.expr(root).is_err());
    }

    #[test]
    fn missing_non_condition_input_is_fatal() {
        let target = Target::parse(&json!({
            "name": "Sprite1",
            "isStage": false,
            "blocks": {
                "e": {"opcode": "motion_movesteps", "next": null, "fields": {}, "inputs": {}},
            },
        }))
        .unwrap();
        let mut ctx = Ctx { target: &target, out: SourceBuilder::new(), depth: 0 };
        let block = target.block("e").unwrap();
        assert!(ctx.input(block, "STEPS").is_err());
    }
}
