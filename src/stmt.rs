//! Statement and control-flow reconstruction: stack walking, block
//! statements, loop and branch forms, procedure definitions and calls,
//! and the hat headers that open each script.

use std::collections::HashSet;
use std::sync::LazyLock;

use anyhow::{anyhow, bail, Result};
use regex::Regex;
use tracing::warn;

use crate::canonicalize::{AUGMENTED_LIST_ITEM, AUGMENTED_VARIABLE};
use crate::sb3::{Block, Input};
use crate::signatures::{self, Side};
use crate::sprite::Ctx;
use crate::syntax;

static PROCCODE_ARGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%[sb]").unwrap());

/// Strips the positional placeholders out of a procedure template and
/// sanitizes what is left: `"greet %s and %s"` becomes `greet_and`.
fn proc_name(proccode: &str) -> String {
    syntax::identifier(PROCCODE_ARGS.replace_all(proccode, "").trim())
}

impl Ctx<'_> {
    /// Renders one top-level script: hat header plus its braced stack.
    pub(crate) fn script(&mut self, block: &Block) -> Result<()> {
        match block.opcode.as_str() {
            "event_whenflagclicked" => {
                self.out.iprint("onflag ");
                self.stack(block.next.as_deref())
            }
            "event_whenbroadcastreceived" => {
                self.out.iprint("on ");
                self.out.print(&syntax::value(self.field_value(block, "BROADCAST_OPTION")));
                self.out.print(" ");
                self.stack(block.next.as_deref())
            }
            "event_whenkeypressed" => {
                self.out.iprint("onkey ");
                self.out
                    .print(&syntax::string(self.field_value(block, "KEY_OPTION")));
                self.out.print(" ");
                self.stack(block.next.as_deref())
            }
            "event_whenbackdropswitchesto" => {
                self.out.iprint("onbackdrop ");
                self.out.print(&syntax::value(self.field_value(block, "BACKDROP")));
                self.out.print(" ");
                self.stack(block.next.as_deref())
            }
            "event_whengreaterthan" => {
                let hat = match self.field_value(block, "WHENGREATERTHANMENU") {
                    "TIMER" => "ontimer ",
                    _ => "onloudness ",
                };
                self.out.iprint(hat);
                self.input(block, "VALUE")?;
                self.out.print(" ");
                self.stack(block.next.as_deref())
            }
            "event_whenthisspriteclicked" | "event_whenstageclicked" => {
                self.out.iprint("onclick ");
                self.stack(block.next.as_deref())
            }
            "control_start_as_clone" => {
                self.out.iprint("onclone ");
                self.stack(block.next.as_deref())
            }
            "procedures_definition" => self.procedures_definition(block),
            _ => {
                warn!(
                    opcode = %block.opcode,
                    sprite = %self.target.name,
                    "skipping unsupported hat block"
                );
                Ok(())
            }
        }
    }

    /// Walks a `next` chain and renders it as a braced body. A missing
    /// start renders as `{}`; a dangling link mid-chain truncates the
    /// body rather than aborting the sprite.
    pub(crate) fn stack(&mut self, start: Option<&str>) -> Result<()> {
        let target = self.target;
        let head = start.filter(|id| {
            let known = target.blocks.contains_key(*id);
            if !known {
                warn!(id, sprite = %target.name, "script body points at a missing block");
            }
            known
        });
        let Some(head) = head else {
            self.out.println("{}");
            return Ok(());
        };
        self.out.println("{");
        self.out.indent();
        let mut visited = HashSet::new();
        let mut current = Some(head.to_string());
        while let Some(id) = current {
            if !visited.insert(id.clone()) {
                warn!(id = %id, sprite = %target.name, "statement chain loops back on itself");
                break;
            }
            let Some(block) = target.blocks.get(&id) else {
                warn!(id = %id, sprite = %target.name, "statement chain points at a missing block");
                break;
            };
            self.statement(block)?;
            current = block.next.clone();
        }
        self.out.dedent();
        self.out.iprintln("}");
        Ok(())
    }

    fn substack(&mut self, block: &Block, slot: &str) -> Result<()> {
        let id = block
            .input(slot)
            .and_then(Input::block_id)
            .map(str::to_string);
        self.descend()?;
        let result = self.stack(id.as_deref());
        self.ascend();
        result
    }

    fn statement(&mut self, block: &Block) -> Result<()> {
        match block.opcode.as_str() {
            "control_if" => self.if_statement(block, false),
            "control_if_else" => self.if_else_statement(block, false),
            "control_forever" => {
                self.out.iprint("forever ");
                self.substack(block, "SUBSTACK")
            }
            "control_repeat" => {
                self.out.iprint("repeat ");
                self.input(block, "TIMES")?;
                self.out.print(" ");
                self.substack(block, "SUBSTACK")
            }
            "control_repeat_until" => {
                self.out.iprint("until ");
                self.input(block, "CONDITION")?;
                self.out.print(" ");
                self.substack(block, "SUBSTACK")
            }
            // No while form in the output grammar; the condition is
            // inverted instead.
            "control_while" => {
                let not_op = signatures::operator("operator_not")
                    .expect("negation operator is in the table");
                self.out.iprint("until not ");
                self.operand(block, not_op, "CONDITION", Side::Left)?;
                self.out.print(" ");
                self.substack(block, "SUBSTACK")
            }
            "data_setvariableto" => {
                self.out
                    .iprint(&format!("{} = ", self.variable_name(block)));
                self.input(block, "VALUE")?;
                self.out.println(";");
                Ok(())
            }
            "data_changevariableby" => {
                self.out
                    .iprint(&format!("{} += ", self.variable_name(block)));
                self.input(block, "VALUE")?;
                self.out.println(";");
                Ok(())
            }
            AUGMENTED_VARIABLE => {
                let op = self.field_value(block, "OPERATOR").to_string();
                self.out
                    .iprint(&format!("{} {}= ", self.variable_name(block), op));
                self.input(block, "VALUE")?;
                self.out.println(";");
                Ok(())
            }
            "data_showvariable" => {
                self.out
                    .iprintln(&format!("show {};", self.variable_name(block)));
                Ok(())
            }
            "data_hidevariable" => {
                self.out
                    .iprintln(&format!("hide {};", self.variable_name(block)));
                Ok(())
            }
            "data_addtolist" => {
                self.out.iprint("add ");
                self.input(block, "ITEM")?;
                self.out.print(" to ");
                self.out.print(&self.list_decl_name(block));
                self.out.println(";");
                Ok(())
            }
            "data_deleteoflist" => {
                self.out.iprint("delete ");
                self.out.print(&self.list_decl_name(block));
                self.out.print("[");
                self.input(block, "INDEX")?;
                self.out.println("];");
                Ok(())
            }
            "data_deletealloflist" => {
                self.out
                    .iprintln(&format!("delete {};", self.list_decl_name(block)));
                Ok(())
            }
            "data_insertatlist" => {
                self.out.iprint("insert ");
                self.input(block, "ITEM")?;
                self.out.print(" at ");
                self.out.print(&self.list_decl_name(block));
                self.out.print("[");
                self.input(block, "INDEX")?;
                self.out.println("];");
                Ok(())
            }
            "data_replaceitemoflist" => {
                self.out.iprint(&self.list_decl_name(block));
                self.out.print("[");
                self.input(block, "INDEX")?;
                self.out.print("] = ");
                self.input(block, "ITEM")?;
                self.out.println(";");
                Ok(())
            }
            AUGMENTED_LIST_ITEM => {
                let op = self.field_value(block, "OPERATOR").to_string();
                self.out.iprint(&self.list_decl_name(block));
                self.out.print("[");
                self.input(block, "INDEX")?;
                self.out.print(&format!("] {}= ", op));
                self.input(block, "ITEM")?;
                self.out.println(";");
                Ok(())
            }
            "data_showlist" => {
                self.out
                    .iprintln(&format!("show {};", self.list_decl_name(block)));
                Ok(())
            }
            "data_hidelist" => {
                self.out
                    .iprintln(&format!("hide {};", self.list_decl_name(block)));
                Ok(())
            }
            "procedures_call" => self.procedures_call(block),
            _ => {
                let target = self.target;
                if let Some(resolved) = signatures::resolve_statement(&target.blocks, block) {
                    self.out.iprint(resolved.name);
                    if !resolved.args.is_empty() {
                        self.out.print(" ");
                        self.resolved_args(block, &resolved.args)?;
                    }
                    self.out.println(";");
                    Ok(())
                } else {
                    warn!(
                        opcode = %block.opcode,
                        sprite = %target.name,
                        "skipping unsupported statement"
                    );
                    Ok(())
                }
            }
        }
    }

    fn if_statement(&mut self, block: &Block, elif: bool) -> Result<()> {
        self.out.iprint(if elif { "elif " } else { "if " });
        self.input(block, "CONDITION")?;
        self.out.print(" ");
        self.substack(block, "SUBSTACK")
    }

    /// An else branch holding exactly one conditional and nothing after
    /// it flattens into an `elif` chain.
    fn if_else_statement(&mut self, block: &Block, elif: bool) -> Result<()> {
        self.if_statement(block, elif)?;
        let target = self.target;
        if let Some(inner) = block
            .input("SUBSTACK2")
            .and_then(Input::block_id)
            .and_then(|id| target.blocks.get(id))
        {
            if inner.next.is_none() {
                match inner.opcode.as_str() {
                    "control_if" => return self.if_statement(inner, true),
                    "control_if_else" => return self.if_else_statement(inner, true),
                    _ => {}
                }
            }
        }
        self.out.iprint("else ");
        self.substack(block, "SUBSTACK2")
    }

    fn procedures_call(&mut self, block: &Block) -> Result<()> {
        let Some(mutation) = &block.mutation else {
            bail!(
                "procedure call without mutation data in sprite '{}'",
                self.target.name
            );
        };
        if let Some(name) = signatures::instrumentation(&mutation.proccode) {
            if name == "breakpoint" {
                self.out.iprintln("breakpoint;");
                return Ok(());
            }
            self.out.iprint(name);
            self.out.print(" ");
            match mutation.argument_ids.first() {
                Some(id) if block.input(id).is_some() => self.input(block, id)?,
                _ => self.out.print("false"),
            }
            self.out.println(";");
            return Ok(());
        }
        self.out.iprint(&proc_name(&mutation.proccode));
        if !mutation.argument_ids.is_empty() {
            self.out.print(" ");
        }
        for (i, id) in mutation.argument_ids.iter().enumerate() {
            if i > 0 {
                self.out.print(", ");
            }
            // A socket the caller never filled reads as false.
            if block.input(id).is_some() {
                self.input(block, id)?;
            } else {
                self.out.print("false");
            }
        }
        self.out.println(";");
        Ok(())
    }

    fn procedures_definition(&mut self, block: &Block) -> Result<()> {
        let target = self.target;
        let prototype_id = block
            .input("custom_block")
            .and_then(Input::block_id)
            .ok_or_else(|| {
                anyhow!(
                    "procedure definition without a prototype in sprite '{}'",
                    target.name
                )
            })?;
        let prototype = target.block(prototype_id)?;
        let Some(mutation) = &prototype.mutation else {
            bail!(
                "procedure prototype without mutation data in sprite '{}'",
                target.name
            );
        };
        self.out
            .iprint(if mutation.warp { "proc " } else { "nowarp proc " });
        self.out.print(&proc_name(&mutation.proccode));
        let params: Vec<String> = mutation
            .argument_names
            .iter()
            .map(|name| syntax::identifier(name))
            .collect();
        if !params.is_empty() {
            self.out.print(" ");
            self.out.print(&params.join(", "));
        }
        self.out.print(" ");
        self.stack(block.next.as_deref())
    }

    fn variable_name(&self, block: &Block) -> String {
        syntax::identifier(self.field_value(block, "VARIABLE"))
    }

    fn list_decl_name(&self, block: &Block) -> String {
        syntax::identifier(self.field_value(block, "LIST"))
    }

    fn field_value<'b>(&self, block: &'b Block, name: &str) -> &'b str {
        block.field(name).map(|f| f.value.as_str()).unwrap_or("")
    }
}
