use std::net::TcpListener;
use std::process::{Command, Output};

/// Start the server on a port that is already bound, with `RUST_LOG` set to
/// `log` or removed when `None`.
fn run_on_taken_port(log: Option<&str>) -> Output {
    let taken = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port().to_string();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pollbench"));
    cmd.args(["--port", &port]);
    match log {
        Some(log) => cmd.env("RUST_LOG", log),
        None => cmd.env_remove("RUST_LOG"),
    };
    cmd.output().unwrap()
}

fn assert_bind_failure(output: &Output) {
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bind 127.0.0.1:"), "stderr: {}", stderr);
}

#[test]
fn exits_with_failure_when_port_is_taken() {
    assert_bind_failure(&run_on_taken_port(None));
}

#[test]
fn bind_failure_is_reported_when_rust_log_targets_other_crates() {
    assert_bind_failure(&run_on_taken_port(Some("mio=debug")));
}

#[test]
fn bind_failure_is_reported_when_rust_log_is_off() {
    assert_bind_failure(&run_on_taken_port(Some("off")));
}

#[test]
fn rejects_unknown_flags() {
    let output = Command::new(env!("CARGO_BIN_EXE_pollbench"))
        .arg("--keep-alive")
        .output()
        .unwrap();

    assert!(!output.status.success());
}
