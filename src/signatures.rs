//! Static decompilation rules: opcode → output name and argument shape.
//!
//! The sb3 format encodes "which variant of this operation" three ways: a
//! menu sub-block referenced through an input slot, a field directly on
//! the block, and (for the instrumentation statements) a procedure-call
//! template string. Resolution normalizes all three into a display name
//! plus an ordered argument list.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::sb3::Block;

#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub name: &'static str,
    /// Ordered argument slots. May contain the discriminant field's name
    /// as a pseudo-slot; resolution replaces or drops it.
    pub inputs: &'static [&'static str],
    /// Input slot holding a menu sub-block to flatten.
    pub menu: Option<&'static str>,
    /// Field whose value selects an overload.
    pub field: Option<&'static str>,
    /// Discriminant value → alternate display name.
    pub overloads: &'static [(&'static str, &'static str)],
}

const fn sig(name: &'static str, inputs: &'static [&'static str]) -> Signature {
    Signature { name, inputs, menu: None, field: None, overloads: &[] }
}

/// Variant selected through a menu sub-block on `slot`.
const fn menu_sig(
    name: &'static str,
    inputs: &'static [&'static str],
    slot: &'static str,
    overloads: &'static [(&'static str, &'static str)],
) -> Signature {
    Signature { name, inputs, menu: Some(slot), field: Some(slot), overloads }
}

/// Variant selected through a field carried directly on the block.
const fn field_sig(
    name: &'static str,
    inputs: &'static [&'static str],
    field: &'static str,
    overloads: &'static [(&'static str, &'static str)],
) -> Signature {
    Signature { name, inputs, menu: None, field: Some(field), overloads }
}

static STATEMENTS: LazyLock<HashMap<&'static str, Signature>> = LazyLock::new(|| {
    HashMap::from([
        // Motion
        ("motion_movesteps", sig("move", &["STEPS"])),
        ("motion_turnleft", sig("turn_left", &["DEGREES"])),
        ("motion_turnright", sig("turn_right", &["DEGREES"])),
        (
            "motion_goto",
            menu_sig("goto", &["TO"], "TO", &[
                ("_random_", "goto_random_position"),
                ("_mouse_", "goto_mouse_pointer"),
            ]),
        ),
        ("motion_gotoxy", sig("goto", &["X", "Y"])),
        (
            "motion_glideto",
            menu_sig("glide", &["TO", "SECS"], "TO", &[
                ("_random_", "glide_to_random_position"),
                ("_mouse_", "glide_to_mouse_pointer"),
            ]),
        ),
        ("motion_glidesecstoxy", sig("glide", &["X", "Y", "SECS"])),
        ("motion_pointindirection", sig("point_in_direction", &["DIRECTION"])),
        (
            "motion_pointtowards",
            menu_sig("point_towards", &["TOWARDS"], "TOWARDS", &[
                ("_mouse_", "point_towards_mouse_pointer"),
                ("_random_", "point_towards_random_direction"),
            ]),
        ),
        ("motion_changexby", sig("change_x", &["DX"])),
        ("motion_setx", sig("set_x", &["X"])),
        ("motion_changeyby", sig("change_y", &["DY"])),
        ("motion_sety", sig("set_y", &["Y"])),
        ("motion_ifonedgebounce", sig("if_on_edge_bounce", &[])),
        (
            "motion_setrotationstyle",
            field_sig("set_rotation_style", &["STYLE"], "STYLE", &[
                ("left-right", "set_rotation_style_left_right"),
                ("don't rotate", "set_rotation_style_do_not_rotate"),
                ("all around", "set_rotation_style_all_around"),
            ]),
        ),
        // Looks
        ("looks_sayforsecs", sig("say", &["MESSAGE", "SECS"])),
        ("looks_say", sig("say", &["MESSAGE"])),
        ("looks_thinkforsecs", sig("think", &["MESSAGE", "SECS"])),
        ("looks_think", sig("think", &["MESSAGE"])),
        (
            "looks_switchcostumeto",
            menu_sig("switch_costume", &["COSTUME"], "COSTUME", &[]),
        ),
        ("looks_nextcostume", sig("next_costume", &[])),
        (
            "looks_switchbackdropto",
            menu_sig("switch_backdrop", &["BACKDROP"], "BACKDROP", &[]),
        ),
        ("looks_nextbackdrop", sig("next_backdrop", &[])),
        ("looks_setsizeto", sig("set_size", &["SIZE"])),
        ("looks_changesizeby", sig("change_size", &["CHANGE"])),
        (
            "looks_changeeffectby",
            field_sig("change_effect", &["EFFECT", "CHANGE"], "EFFECT", &[
                ("COLOR", "change_color_effect"),
                ("FISHEYE", "change_fisheye_effect"),
                ("WHIRL", "change_whirl_effect"),
                ("PIXELATE", "change_pixelate_effect"),
                ("MOSAIC", "change_mosaic_effect"),
                ("BRIGHTNESS", "change_brightness_effect"),
                ("GHOST", "change_ghost_effect"),
            ]),
        ),
        (
            "looks_seteffectto",
            field_sig("set_effect", &["EFFECT", "VALUE"], "EFFECT", &[
                ("COLOR", "set_color_effect"),
                ("FISHEYE", "set_fisheye_effect"),
                ("WHIRL", "set_whirl_effect"),
                ("PIXELATE", "set_pixelate_effect"),
                ("MOSAIC", "set_mosaic_effect"),
                ("BRIGHTNESS", "set_brightness_effect"),
                ("GHOST", "set_ghost_effect"),
            ]),
        ),
        ("looks_cleargraphiceffects", sig("clear_graphic_effects", &[])),
        ("looks_show", sig("show", &[])),
        ("looks_hide", sig("hide", &[])),
        (
            "looks_gotofrontback",
            field_sig("goto_layer", &["FRONT_BACK"], "FRONT_BACK", &[
                ("front", "goto_front"),
                ("back", "goto_back"),
            ]),
        ),
        (
            "looks_goforwardbackwardlayers",
            field_sig("go_layers", &["FORWARD_BACKWARD", "NUM"], "FORWARD_BACKWARD", &[
                ("forward", "go_forward"),
                ("backward", "go_backward"),
            ]),
        ),
        // Sound
        (
            "sound_playuntildone",
            menu_sig("play_sound_until_done", &["SOUND_MENU"], "SOUND_MENU", &[]),
        ),
        ("sound_play", menu_sig("start_sound", &["SOUND_MENU"], "SOUND_MENU", &[])),
        ("sound_stopallsounds", sig("stop_all_sounds", &[])),
        (
            "sound_changeeffectby",
            field_sig("change_sound_effect", &["EFFECT", "VALUE"], "EFFECT", &[
                ("PITCH", "change_pitch_effect"),
                ("PAN", "change_pan_effect"),
            ]),
        ),
        (
            "sound_seteffectto",
            field_sig("set_sound_effect", &["EFFECT", "VALUE"], "EFFECT", &[
                ("PITCH", "set_pitch_effect"),
                ("PAN", "set_pan_effect"),
            ]),
        ),
        ("sound_cleareffects", sig("clear_sound_effects", &[])),
        ("sound_changevolumeby", sig("change_volume", &["VOLUME"])),
        ("sound_setvolumeto", sig("set_volume", &["VOLUME"])),
        // Events
        ("event_broadcast", sig("broadcast", &["BROADCAST_INPUT"])),
        ("event_broadcastandwait", sig("broadcast_and_wait", &["BROADCAST_INPUT"])),
        // Control
        ("control_wait", sig("wait", &["DURATION"])),
        ("control_wait_until", sig("wait_until", &["CONDITION"])),
        (
            "control_stop",
            field_sig("stop", &["STOP_OPTION"], "STOP_OPTION", &[
                ("all", "stop_all"),
                ("this script", "stop_this_script"),
                ("other scripts in sprite", "stop_other_scripts"),
            ]),
        ),
        ("control_delete_this_clone", sig("delete_this_clone", &[])),
        (
            "control_create_clone_of",
            menu_sig("clone", &["CLONE_OPTION"], "CLONE_OPTION", &[("_myself_", "clone")]),
        ),
        // Sensing
        ("sensing_askandwait", sig("ask", &["QUESTION"])),
        ("sensing_resettimer", sig("reset_timer", &[])),
        (
            "sensing_setdragmode",
            field_sig("set_drag_mode", &["DRAG_MODE"], "DRAG_MODE", &[
                ("draggable", "set_drag_mode_draggable"),
                ("not draggable", "set_drag_mode_not_draggable"),
            ]),
        ),
        // Pen
        ("pen_clear", sig("erase_all", &[])),
        ("pen_stamp", sig("stamp", &[])),
        ("pen_penDown", sig("pen_down", &[])),
        ("pen_penUp", sig("pen_up", &[])),
        ("pen_setPenColorToColor", sig("set_pen_color", &["COLOR"])),
        ("pen_changePenSizeBy", sig("change_pen_size", &["SIZE"])),
        ("pen_setPenSizeTo", sig("set_pen_size", &["SIZE"])),
        (
            "pen_setPenColorParamTo",
            menu_sig("set_pen_param", &["COLOR_PARAM", "VALUE"], "COLOR_PARAM", &[
                ("color", "set_pen_hue"),
                ("saturation", "set_pen_saturation"),
                ("brightness", "set_pen_brightness"),
                ("transparency", "set_pen_transparency"),
            ]),
        ),
        (
            "pen_changePenColorParamBy",
            menu_sig("change_pen_param", &["COLOR_PARAM", "VALUE"], "COLOR_PARAM", &[
                ("color", "change_pen_hue"),
                ("saturation", "change_pen_saturation"),
                ("brightness", "change_pen_brightness"),
                ("transparency", "change_pen_transparency"),
            ]),
        ),
        // Music
        ("music_restForBeats", sig("rest", &["BEATS"])),
        ("music_setTempo", sig("set_tempo", &["TEMPO"])),
        ("music_changeTempo", sig("change_tempo", &["TEMPO"])),
    ])
});

static REPORTERS: LazyLock<HashMap<&'static str, Signature>> = LazyLock::new(|| {
    HashMap::from([
        ("motion_xposition", sig("x_position", &[])),
        ("motion_yposition", sig("y_position", &[])),
        ("motion_direction", sig("direction", &[])),
        ("looks_size", sig("size", &[])),
        (
            "looks_costumenumbername",
            field_sig("costume", &["NUMBER_NAME"], "NUMBER_NAME", &[
                ("number", "costume_number"),
                ("name", "costume_name"),
            ]),
        ),
        (
            "looks_backdropnumbername",
            field_sig("backdrop", &["NUMBER_NAME"], "NUMBER_NAME", &[
                ("number", "backdrop_number"),
                ("name", "backdrop_name"),
            ]),
        ),
        ("sound_volume", sig("volume", &[])),
        (
            "sensing_touchingobject",
            menu_sig("touching", &["TOUCHINGOBJECTMENU"], "TOUCHINGOBJECTMENU", &[
                ("_mouse_", "touching_mouse_pointer"),
                ("_edge_", "touching_edge"),
            ]),
        ),
        ("sensing_touchingcolor", sig("touching_color", &["COLOR"])),
        (
            "sensing_coloristouchingcolor",
            sig("color_is_touching_color", &["COLOR", "COLOR2"]),
        ),
        (
            "sensing_distanceto",
            menu_sig("distance_to", &["DISTANCETOMENU"], "DISTANCETOMENU", &[
                ("_mouse_", "distance_to_mouse_pointer"),
            ]),
        ),
        ("sensing_answer", sig("answer", &[])),
        (
            "sensing_keypressed",
            menu_sig("key_pressed", &["KEY_OPTION"], "KEY_OPTION", &[]),
        ),
        ("sensing_mousedown", sig("mouse_down", &[])),
        ("sensing_mousex", sig("mouse_x", &[])),
        ("sensing_mousey", sig("mouse_y", &[])),
        ("sensing_loudness", sig("loudness", &[])),
        ("sensing_timer", sig("timer", &[])),
        (
            "sensing_current",
            field_sig("current", &["CURRENTMENU"], "CURRENTMENU", &[
                ("YEAR", "current_year"),
                ("MONTH", "current_month"),
                ("DATE", "current_date"),
                ("DAYOFWEEK", "current_day_of_week"),
                ("HOUR", "current_hour"),
                ("MINUTE", "current_minute"),
                ("SECOND", "current_second"),
            ]),
        ),
        ("sensing_dayssince2000", sig("days_since_2000", &[])),
        ("sensing_username", sig("username", &[])),
        ("operator_random", sig("random", &["FROM", "TO"])),
        ("operator_length", sig("length", &["STRING"])),
        ("operator_round", sig("round", &["NUM"])),
        (
            "operator_mathop",
            field_sig("mathop", &["OPERATOR", "NUM"], "OPERATOR", &[
                ("abs", "abs"),
                ("floor", "floor"),
                ("ceiling", "ceil"),
                ("sqrt", "sqrt"),
                ("sin", "sin"),
                ("cos", "cos"),
                ("tan", "tan"),
                ("asin", "asin"),
                ("acos", "acos"),
                ("atan", "atan"),
                ("ln", "ln"),
                ("log", "log"),
                ("e ^", "antiln"),
                ("10 ^", "antilog"),
            ]),
        ),
    ])
});

/// Instrumentation statements travel as procedure calls whose template
/// string is a fixed, zero-width-space-fenced name. Matched before
/// generic procedure-call resolution.
pub const INSTRUMENTATION: &[(&str, &str)] = &[
    ("\u{200b}\u{200b}breakpoint\u{200b}\u{200b}", "breakpoint"),
    ("\u{200b}\u{200b}log\u{200b}\u{200b} %s", "log"),
    ("\u{200b}\u{200b}warn\u{200b}\u{200b} %s", "warn"),
    ("\u{200b}\u{200b}error\u{200b}\u{200b} %s", "error"),
];

pub fn instrumentation(proccode: &str) -> Option<&'static str> {
    INSTRUMENTATION
        .iter()
        .find(|(template, _)| *template == proccode)
        .map(|(_, name)| *name)
}

/// Every display name the tables can produce; identifier sanitization
/// must not collide with these.
pub fn display_names() -> &'static HashSet<&'static str> {
    static NAMES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
        let mut names = HashSet::new();
        for table in [&*STATEMENTS, &*REPORTERS] {
            for signature in table.values() {
                names.insert(signature.name);
                for (_, overload) in signature.overloads {
                    names.insert(*overload);
                }
            }
        }
        names
    });
    &NAMES
}

/// One rendered argument: either a real input slot or a literal promoted
/// from a discriminant field.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Slot(&'static str),
    Literal(String),
}

#[derive(Debug, Clone)]
pub struct Resolved {
    pub name: &'static str,
    pub args: Vec<Arg>,
}

pub fn resolve_statement(blocks: &HashMap<String, Block>, block: &Block) -> Option<Resolved> {
    STATEMENTS.get(block.opcode.as_str()).map(|s| resolve(s, blocks, block))
}

pub fn resolve_reporter(blocks: &HashMap<String, Block>, block: &Block) -> Option<Resolved> {
    REPORTERS.get(block.opcode.as_str()).map(|s| resolve(s, blocks, block))
}

fn resolve(signature: &Signature, blocks: &HashMap<String, Block>, block: &Block) -> Resolved {
    // Menu flattening: a menu sub-block referenced by the named slot
    // contributes its sole field value as if it were a field on `block`.
    let menu_value = signature.menu.and_then(|slot| {
        let id = block.input(slot)?.block_id()?;
        let menu = blocks.get(id)?;
        if !menu.is_menu() {
            return None;
        }
        menu.fields.values().next().map(|field| field.value.clone())
    });

    let discriminant = signature.field.and_then(|field| {
        block
            .field(field)
            .map(|f| f.value.clone())
            .or_else(|| if signature.menu == signature.field { menu_value.clone() } else { None })
    });

    let Some(value) = discriminant else {
        return Resolved {
            name: signature.name,
            args: signature.inputs.iter().map(|slot| Arg::Slot(slot)).collect(),
        };
    };

    let field = signature.field.unwrap_or_default();
    match signature.overloads.iter().find(|(key, _)| *key == value) {
        // Overload hit: the discriminant is implied by the name and
        // dropped from the argument list.
        Some((_, name)) => Resolved {
            name,
            args: signature
                .inputs
                .iter()
                .filter(|slot| **slot != field)
                .map(|slot| Arg::Slot(slot))
                .collect(),
        },
        // Miss: some discriminants double as free-form values, so the
        // raw text is promoted into an ordinary literal argument.
        None => Resolved {
            name: signature.name,
            args: signature
                .inputs
                .iter()
                .map(|slot| {
                    if *slot == field {
                        Arg::Literal(value.clone())
                    } else {
                        Arg::Slot(slot)
                    }
                })
                .collect(),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Infix { left: &'static str, right: &'static str },
    /// `symbol operand`; `side` selects which associativity rule the
    /// operand is parenthesized under.
    Prefix { operand: &'static str, side: Side },
    /// `subject[index]` — element-of-string.
    Index { index: &'static str, subject: &'static str },
}

#[derive(Debug, Clone, Copy)]
pub struct Operator {
    pub symbol: &'static str,
    /// Lower number binds tighter.
    pub precedence: u8,
    pub shape: Shape,
    pub assoc: Side,
}

const fn infix(symbol: &'static str, precedence: u8, left: &'static str, right: &'static str) -> Operator {
    Operator { symbol, precedence, shape: Shape::Infix { left, right }, assoc: Side::Left }
}

static OPERATORS: LazyLock<HashMap<&'static str, Operator>> = LazyLock::new(|| {
    HashMap::from([
        ("operator_and", infix("and", 4, "OPERAND1", "OPERAND2")),
        ("operator_or", infix("or", 4, "OPERAND1", "OPERAND2")),
        (
            "operator_not",
            Operator {
                symbol: "not",
                precedence: 3,
                shape: Shape::Prefix { operand: "OPERAND", side: Side::Left },
                assoc: Side::Left,
            },
        ),
        ("operator_contains", infix("in", 3, "STRING2", "STRING1")),
        ("operator_equals", infix("==", 3, "OPERAND1", "OPERAND2")),
        ("operator_lt", infix("<", 3, "OPERAND1", "OPERAND2")),
        ("operator_gt", infix(">", 3, "OPERAND1", "OPERAND2")),
        ("operator_join", infix("&", 2, "STRING1", "STRING2")),
        ("operator_add", infix("+", 2, "NUM1", "NUM2")),
        ("operator_subtract", infix("-", 2, "NUM1", "NUM2")),
        ("operator_multiply", infix("*", 1, "NUM1", "NUM2")),
        ("operator_divide", infix("/", 1, "NUM1", "NUM2")),
        ("operator_mod", infix("%", 1, "NUM1", "NUM2")),
        (
            "operator_letter_of",
            Operator {
                symbol: "",
                precedence: 0,
                shape: Shape::Index { index: "LETTER", subject: "STRING" },
                assoc: Side::Left,
            },
        ),
        // Synthetic: produced by canonicalizing `0 - x`.
        (
            "negative",
            Operator {
                symbol: "-",
                precedence: 0,
                shape: Shape::Prefix { operand: "NUM2", side: Side::Right },
                assoc: Side::Left,
            },
        ),
    ])
});

pub fn operator(opcode: &str) -> Option<&'static Operator> {
    OPERATORS.get(opcode)
}

static NOT_EQUALS: Operator = infix("!=", 3, "OPERAND1", "OPERAND2");
static GREATER_EQUALS: Operator = infix(">=", 3, "OPERAND1", "OPERAND2");
static LESS_EQUALS: Operator = infix("<=", 3, "OPERAND1", "OPERAND2");

/// The negated form of a comparison opcode. The block format has no
/// opcodes for these; they only arise when `not` is rendered directly
/// over a comparison.
pub fn negated_comparison(opcode: &str) -> Option<&'static Operator> {
    match opcode {
        "operator_equals" => Some(&NOT_EQUALS),
        "operator_lt" => Some(&GREATER_EQUALS),
        "operator_gt" => Some(&LESS_EQUALS),
        _ => None,
    }
}

/// Infix symbols reused by the canonicalization pass for augmented
/// assignments (`x += y`, `s &= t`, ...).
pub fn augmentable_symbol(opcode: &str) -> Option<&'static str> {
    match opcode {
        "operator_add" => Some("+"),
        "operator_subtract" => Some("-"),
        "operator_multiply" => Some("*"),
        "operator_divide" => Some("/"),
        "operator_mod" => Some("%"),
        "operator_join" => Some("&"),
        _ => None,
    }
}

/// First-operand slot of an augmentable operator.
pub fn augmentable_lhs(opcode: &str) -> Option<&'static str> {
    match opcode {
        "operator_join" => Some("STRING1"),
        _ => augmentable_symbol(opcode).map(|_| "NUM1"),
    }
}

pub fn augmentable_rhs(opcode: &str) -> Option<&'static str> {
    match opcode {
        "operator_join" => Some("STRING2"),
        _ => augmentable_symbol(opcode).map(|_| "NUM2"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sb3::{Field, Input};

    fn block(opcode: &str) -> Block {
        Block {
            opcode: opcode.to_string(),
            next: None,
            inputs: HashMap::new(),
            fields: HashMap::new(),
            mutation: None,
            shadow: false,
            top_level: false,
            x: 0,
            y: 0,
        }
    }

    fn field(value: &str) -> Field {
        Field { value: value.to_string(), id: None }
    }

    #[test]
    fn overload_hit_drops_discriminant() {
        let blocks = HashMap::new();
        let mut stop = block("control_stop");
        stop.fields.insert("STOP_OPTION".into(), field("this script"));
        let resolved = resolve_statement(&blocks, &stop).unwrap();
        assert_eq!(resolved.name, "stop_this_script");
        assert!(resolved.args.is_empty());
    }

    #[test]
    fn overload_miss_promotes_discriminant() {
        let blocks = HashMap::new();
        let mut stop = block("control_stop");
        stop.fields.insert("STOP_OPTION".into(), field("all plus one"));
        let resolved = resolve_statement(&blocks, &stop).unwrap();
        assert_eq!(resolved.name, "stop");
        assert_eq!(resolved.args, vec![Arg::Literal("all plus one".into())]);
    }

    #[test]
    fn menu_flattening_feeds_overloads() {
        let mut menu = block("motion_goto_menu");
        menu.shadow = true;
        menu.fields.insert("TO".into(), field("_mouse_"));
        let mut blocks = HashMap::new();
        blocks.insert("menu1".to_string(), menu);

        let mut goto = block("motion_goto");
        goto.inputs.insert("TO".into(), Input::Block("menu1".into()));
        let resolved = resolve_statement(&blocks, &goto).unwrap();
        assert_eq!(resolved.name, "goto_mouse_pointer");
        assert!(resolved.args.is_empty());
    }

    #[test]
    fn menu_miss_promotes_free_form_choice() {
        let mut menu = block("sensing_keyoptions");
        menu.shadow = true;
        menu.fields.insert("KEY_OPTION".into(), field("space"));
        let mut blocks = HashMap::new();
        blocks.insert("menu1".to_string(), menu);

        let mut pressed = block("sensing_keypressed");
        pressed.inputs.insert("KEY_OPTION".into(), Input::Block("menu1".into()));
        let resolved = resolve_reporter(&blocks, &pressed).unwrap();
        assert_eq!(resolved.name, "key_pressed");
        assert_eq!(resolved.args, vec![Arg::Literal("space".into())]);
    }

    #[test]
    fn non_menu_operand_is_left_as_a_slot() {
        // A dynamic expression in a menu-capable slot must stay a nested
        // expression, not be mistaken for a fixed choice.
        let mut blocks = HashMap::new();
        blocks.insert("j".to_string(), block("operator_join"));
        let mut goto = block("motion_goto");
        goto.inputs.insert("TO".into(), Input::Block("j".into()));
        let resolved = resolve_statement(&blocks, &goto).unwrap();
        assert_eq!(resolved.name, "goto");
        assert_eq!(resolved.args, vec![Arg::Slot("TO")]);
    }

    #[test]
    fn unknown_opcode_has_no_signature() {
        let blocks = HashMap::new();
        assert!(resolve_statement(&blocks, &block("videoSensing_whenMotionGreaterThan")).is_none());
    }

    #[test]
    fn instrumentation_templates_match_exactly() {
        assert_eq!(
            instrumentation("\u{200b}\u{200b}log\u{200b}\u{200b} %s"),
            Some("log")
        );
        assert_eq!(instrumentation("log %s"), None);
    }
}
