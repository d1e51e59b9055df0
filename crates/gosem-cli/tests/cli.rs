//! End-to-end tests driving the `gosem` binary.

use serde_json::Value;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::time::Duration;

// ── Helpers ────────────────────────────────────────────────────────────────

/// Run `gosem` with an isolated home directory and the given stdin.
fn gosem(home: &Path, args: &[&str], stdin: impl AsRef<[u8]>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_gosem"))
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start gosem");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_ref())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

/// Kills the spawned server when the test ends, pass or fail.
struct Server(Child);

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn connect(port: u16) -> TcpStream {
    for _ in 0..100 {
        if let Ok(stream) = TcpStream::connect(("127.0.0.1", port)) {
            return stream;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    panic!("gosem serve did not listen on port {port}");
}

// ── Batch Tokenize ─────────────────────────────────────────────────────────

#[test]
fn default_command_reads_stdin() {
    let home = tempfile::TempDir::new().unwrap();
    let output = gosem(
        home.path(),
        &[],
        "package main\n\nfunc Add(a, b int) int { return a + b }\n",
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "{\"FunctionDecl\":[[3,6,3]]}\n");
}

#[test]
fn tokenize_file_uses_its_path() {
    let home = tempfile::TempDir::new().unwrap();
    let file = home.path().join("broken.go");
    std::fs::write(&file, "package main\n\nfunc main( {\n").unwrap();

    let output = gosem(
        home.path(),
        &["tokenize", "--file", file.to_str().unwrap()],
        "",
    );
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("broken.go:"), "stderr: {}", stderr(&output));
}

#[test]
fn syntax_error_on_stdin_names_stdin_go() {
    let home = tempfile::TempDir::new().unwrap();
    let output = gosem(home.path(), &["tokenize"], "func main() {}\n");
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("stdin.go:1:1"));
}

#[test]
fn resolution_error_is_logged_and_table_printed() {
    let home = tempfile::TempDir::new().unwrap();
    let output = gosem(
        home.path(),
        &["tokenize"],
        "package main\n\nfunc main() { missing() }\n",
    );
    assert!(output.status.success());
    let table: Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(table["FunctionDecl"], serde_json::json!([[3, 6, 4]]));
    assert!(stderr(&output).contains("undefined: missing"));
}

#[test]
fn invalid_utf8_is_a_syntax_error() {
    let home = tempfile::TempDir::new().unwrap();
    let output = gosem(
        home.path(),
        &["tokenize"],
        b"package main\n\nvar s = \"caf\xe9\"\n".as_slice(),
    );
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(
        stderr(&output).contains("stdin.go:3:13: illegal UTF-8 encoding"),
        "stderr: {}",
        stderr(&output)
    );
}

// ── Serve ──────────────────────────────────────────────────────────────────

#[test]
fn serve_answers_one_line_per_request() {
    let home = tempfile::TempDir::new().unwrap();
    let requests = [
        serde_json::json!([1, {
            "version": "v1.1", "id": "ed", "buf_type": "go", "buf_name": "a.go",
            "buf_body": "package main\n\ntype T int\n", "additional_info": ""
        }]),
        serde_json::json!([2, {
            "version": "v1", "id": 9, "buf_type": "rust", "buf_name": "b.rs",
            "buf_body": "fn main() {}", "additional_info": ""
        }]),
    ];
    let input = format!("{}\n{}\n", requests[0], requests[1]);
    let output = gosem(home.path(), &["serve"], &input);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    let lines: Vec<Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);

    assert_eq!(lines[0][0], 1);
    assert_eq!(lines[0][1]["return_code"], 0);
    assert_eq!(lines[0][1]["tokens"]["TypeRef"], serde_json::json!([[3, 6, 1]]));

    assert_eq!(lines[1][0], 2);
    assert_eq!(lines[1][1]["id"], "9");
    assert_eq!(lines[1][1]["return_code"], 1);
    assert_eq!(
        lines[1][1]["error_message"],
        "couldn't get tokenizer for buffer type: rust"
    );
}

#[test]
fn serve_port_answers_over_tcp() {
    let home = tempfile::TempDir::new().unwrap();
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let child = Command::new(env!("CARGO_BIN_EXE_gosem"))
        .args(["serve", "--port", &port.to_string()])
        .env("HOME", home.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start gosem serve");
    let _server = Server(child);

    let mut stream = connect(port);
    let request = serde_json::json!([5, {
        "version": "v1", "id": 3, "buf_type": "go", "buf_name": "net.go",
        "buf_body": "package main\n\nfunc Dial() {}\n", "additional_info": ""
    }]);
    writeln!(stream, "{request}").unwrap();

    let mut reply = String::new();
    BufReader::new(stream.try_clone().unwrap())
        .read_line(&mut reply)
        .unwrap();
    let reply: Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(reply[0], 5);
    assert_eq!(reply[1]["id"], "3");
    assert_eq!(reply[1]["return_code"], 0);
    assert_eq!(reply[1]["tokens"]["FunctionDecl"], serde_json::json!([[3, 6, 4]]));
}

// ── Config ─────────────────────────────────────────────────────────────────

#[test]
fn config_set_then_get() {
    let home = tempfile::TempDir::new().unwrap();
    let output = gosem(home.path(), &["config", "set", "catalog.embedded", "false"], "");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(home.path().join(".gosem").join("config.toml").exists());

    let output = gosem(home.path(), &["config", "get", "catalog.embedded"], "");
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "false");
}

#[test]
fn disabled_catalog_reports_unknown_imports() {
    let home = tempfile::TempDir::new().unwrap();
    gosem(home.path(), &["config", "set", "catalog.embedded", "false"], "");

    let output = gosem(
        home.path(),
        &["tokenize"],
        "package main\n\nimport \"fmt\"\n\nfunc main() { fmt.Println() }\n",
    );
    assert!(output.status.success());
    assert!(stderr(&output).contains("could not import fmt"));
    let table: Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(table["CallExpr"], serde_json::json!([[5, 19, 7]]));
}

#[test]
fn config_get_unknown_key_fails() {
    let home = tempfile::TempDir::new().unwrap();
    let output = gosem(home.path(), &["config", "get", "catalog.nope"], "");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown config key"));
}
