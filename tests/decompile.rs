//! End-to-end tests: build a small .sb3 archive in memory, decompile it,
//! and check the emitted project tree.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::{json, Value};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use sb2gs::decompile::decompile_sb3;

const SPRITE_SVG: &str = concat!(
    "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100\" height=\"60\">",
    "<g><rect width=\"10\" height=\"10\"/></g></svg>"
);

fn write_sb3(path: &Path, project: &Value, assets: &[(&str, &[u8])]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    zip.start_file("project.json", options).unwrap();
    zip.write_all(project.to_string().as_bytes()).unwrap();
    for (name, bytes) in assets {
        zip.start_file(*name, options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

fn sample_project() -> Value {
    json!({
        "meta": {"semver": "3.0.0", "vm": "0.2.0"},
        "targets": [
            {
                "isStage": true,
                "name": "Stage",
                "volume": 100,
                "layerOrder": 0,
                "costumes": [
                    {"name": "backdrop1", "md5ext": "bb.svg", "dataFormat": "svg",
                     "rotationCenterX": 50, "rotationCenterY": 30},
                ],
                "comments": {
                    "c": {"text": "{\"framerate\":60} _twconfig_"},
                },
                "blocks": {},
            },
            {
                "isStage": false,
                "name": "Sprite1",
                "visible": true,
                "x": 0, "y": 0, "size": 100, "direction": 90,
                "volume": 100, "layerOrder": 1,
                "variables": {"v": ["FOO", 0]},
                "costumes": [
                    {"name": "costume1", "md5ext": "aa.svg", "dataFormat": "svg",
                     "rotationCenterX": 50, "rotationCenterY": 30},
                ],
                "blocks": {
                    "hat": {"opcode": "event_whenflagclicked", "next": "mv",
                            "inputs": {}, "fields": {}, "topLevel": true, "x": 0, "y": 0},
                    "mv": {"opcode": "motion_movesteps", "next": "set",
                           "inputs": {"STEPS": [1, [4, "10"]]}, "fields": {}},
                    "set": {"opcode": "data_setvariableto", "next": null,
                            "fields": {"VARIABLE": ["FOO", "v"]},
                            "inputs": {"VALUE": [3, "sum", [10, ""]]}},
                    "sum": {"opcode": "operator_add", "next": null, "fields": {},
                            "inputs": {"NUM1": [3, [12, "FOO", "v"], [4, "0"]],
                                       "NUM2": [1, [4, "1"]]}},
                    "def": {"opcode": "procedures_definition", "next": "say",
                            "inputs": {"custom_block": [1, "proto"]}, "fields": {},
                            "topLevel": true, "x": 0, "y": 100},
                    "proto": {"opcode": "procedures_prototype", "next": null,
                              "inputs": {}, "fields": {}, "shadow": true,
                              "mutation": {"proccode": "greet %s",
                                           "argumentids": "[\"a1\"]",
                                           "argumentnames": "[\"name\"]",
                                           "warp": "false"}},
                    "say": {"opcode": "looks_say", "next": null, "fields": {},
                            "inputs": {"MESSAGE": [3, "arg", [10, ""]]}},
                    "arg": {"opcode": "argument_reporter_string_number", "next": null,
                            "fields": {"VALUE": ["name", null]}, "inputs": {}},
                },
            },
        ],
    })
}

#[test]
fn decompiles_a_full_project_tree() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("game.sb3");
    write_sb3(
        &input,
        &sample_project(),
        &[("aa.svg", SPRITE_SVG.as_bytes()), ("bb.svg", SPRITE_SVG.as_bytes())],
    );
    let output = dir.path().join("game");
    decompile_sb3(&input, &output, false).unwrap();

    assert_eq!(
        fs::read_to_string(output.join("stage.gs")).unwrap(),
        "costumes \"assets/bb.svg\" as \"backdrop1\";\n"
    );
    assert_eq!(
        fs::read_to_string(output.join("Sprite1.gs")).unwrap(),
        concat!(
            "costumes \"assets/aa.svg\" as \"costume1\";\n",
            "var FOO = 0;\n",
            "\n",
            "onflag {\n",
            "    move 10;\n",
            "    FOO += 1;\n",
            "}\n",
            "\n",
            "nowarp proc greet name {\n",
            "    say $name;\n",
            "}\n",
        )
    );
    assert!(output.join("assets/aa.svg").is_file());
    assert!(output.join("assets/bb.svg").is_file());
    let toml = fs::read_to_string(output.join("goboscript.toml")).unwrap();
    assert!(toml.contains("frame_rate = 60\n"));
}

#[test]
fn rejects_unsupported_project_versions() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("old.sb3");
    let mut project = sample_project();
    project["meta"]["semver"] = json!("2.0.0");
    write_sb3(&input, &project, &[]);
    let err = decompile_sb3(&input, &dir.path().join("old"), false).unwrap_err();
    assert!(err.to_string().contains("unsupported project version"));
}

#[test]
fn refuses_to_clobber_a_foreign_directory() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("game.sb3");
    write_sb3(&input, &sample_project(), &[]);
    let output = dir.path().join("out");
    fs::create_dir(&output).unwrap();
    fs::write(output.join("notes.txt"), "keep me").unwrap();

    assert!(decompile_sb3(&input, &output, false).is_err());
    assert!(output.join("notes.txt").is_file());

    decompile_sb3(&input, &output, true).unwrap();
    assert!(!output.join("notes.txt").exists());
    assert!(output.join("stage.gs").is_file());
}

#[test]
fn rerun_over_previous_output_needs_no_force() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("game.sb3");
    write_sb3(&input, &sample_project(), &[]);
    let output = dir.path().join("game");
    decompile_sb3(&input, &output, false).unwrap();
    decompile_sb3(&input, &output, false).unwrap();
    assert!(output.join("Sprite1.gs").is_file());
}

#[test]
fn rejects_sprite_names_that_break_the_layout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("game.sb3");
    let mut project = sample_project();
    project["targets"][1]["name"] = json!("a/b");
    write_sb3(&input, &project, &[]);
    assert!(decompile_sb3(&input, &dir.path().join("out"), false).is_err());
}
