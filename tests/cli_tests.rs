//! Runs the `info-to-onnx` binary against dumps in temporary directories.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use info_to_onnx::proto::ModelProto;
use prost::Message;
use tempfile::TempDir;

const RELU_INFO: &str = "0\trelu0\tRelu()%2 <- %0
1\tadd0\tAdd()%3 <- %2 %1

graph. %3 <- %0

0\tx\tF32\tNCHW\t0 0\t[1 4]
1\tbias\tF32\tELSE\t0 16\t[1 4]
2\trelu_out\tF32\tNCHW\t0 0\t[1 4]
3\ty\tF32\tNCHW\t0 0\t[1 4]
";

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_info-to-onnx"))
}

/// Create a dump directory holding graph.info and graph.data
fn create_dump(info: &str) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("graph.info"), info).expect("Failed to write graph.info");
    fs::write(dir.path().join("graph.data"), [0u8; 16]).expect("Failed to write graph.data");
    dir
}

fn run(command: &mut Command) -> Output {
    command.output().expect("Failed to run info-to-onnx")
}

fn read_model(path: &Path) -> ModelProto {
    let bytes = fs::read(path).expect("Failed to read model");
    ModelProto::decode(bytes.as_slice()).expect("Failed to decode model")
}

#[test]
fn test_cli_help() {
    let output = run(bin().arg("--help"));
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--input"));
    assert!(stdout.contains("--summary"));
}

#[test]
fn test_convert_default_output() {
    let dir = create_dump(RELU_INFO);
    let output = run(bin().arg("--input").arg(dir.path()));
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let model_path = dir.path().join("model_refactor.onnx");
    assert!(model_path.exists());
    let graph = read_model(&model_path).graph.expect("graph");
    assert_eq!(graph.node.len(), 2);
    assert_eq!(graph.initializer[0].name, "bias");
}

#[test]
fn test_convert_explicit_output() {
    let dir = create_dump(RELU_INFO);
    let target = dir.path().join("custom.onnx");
    let output = run(bin().arg("-i").arg(dir.path()).arg("-o").arg(&target));
    assert!(output.status.success());
    assert!(target.exists());
    assert!(!dir.path().join("model_refactor.onnx").exists());
}

#[test]
fn test_input_defaults_to_current_dir() {
    let dir = create_dump(RELU_INFO);
    let output = run(bin().current_dir(dir.path()));
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("model_refactor.onnx").exists());
}

#[test]
fn test_summary_prints_counts() {
    let dir = create_dump(RELU_INFO);
    let output = run(bin().arg("--input").arg(dir.path()).arg("--summary"));
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nodes:        2"));
    assert!(stdout.contains("tensors:      4"));
    assert!(stdout.contains("initializers: 1"));
    assert!(!dir.path().join("model_refactor.onnx").exists());
}

#[test]
fn test_summary_json() {
    let dir = create_dump(RELU_INFO);
    let output = run(bin().arg("--input").arg(dir.path()).args(["--summary", "--json"]));
    assert!(output.status.success());

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("summary is not JSON");
    assert_eq!(summary["nodes"], 2);
    assert_eq!(summary["value_info"], 1);
}

#[test]
fn test_bad_layout_exits_non_zero() {
    let info = RELU_INFO.replace("1\tbias\tF32\tELSE", "1\tbias\tF32\tNHWC");
    let dir = create_dump(&info);
    let output = run(bin().arg("--input").arg(dir.path()));

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("NHWC"), "{}", stderr);
    assert!(!dir.path().join("model_refactor.onnx").exists());
}

#[test]
fn test_missing_dump_exits_non_zero() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = run(bin().arg("--input").arg(dir.path()));
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("graph.info"));
}
