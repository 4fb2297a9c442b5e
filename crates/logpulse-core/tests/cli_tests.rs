use std::fs;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};

const HEALTH: &str = "2025-08-14 10:15:30,042 - INFO - GET /api/v1/health status=200 0.001s\n";

fn logpulse(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_logpulse"));
    cmd.current_dir(dir)
        .env_remove("LOG_FILE")
        .env_remove("LOGPULSE_CONFIG")
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

/// Run to completion, killing the process if it outlives `limit`
fn run_within(mut cmd: Command, limit: Duration) -> Result<Output> {
    let mut child = cmd.spawn()?;
    let started = Instant::now();
    while child.try_wait()?.is_none() {
        if started.elapsed() > limit {
            child.kill()?;
            bail!("logpulse still running after {limit:?}");
        }
        thread::sleep(Duration::from_millis(20));
    }
    Ok(child.wait_with_output()?)
}

#[test]
fn test_dotenv_supplies_log_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("real.log");
    fs::write(&log, HEALTH)?;
    fs::write(dir.path().join(".env"), format!("LOG_FILE={}\n", log.display()))?;

    let mut cmd = logpulse(dir.path());
    cmd.args(["check", "--format", "json"]);
    let output = run_within(cmd, Duration::from_secs(30))?;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["path"], log.display().to_string());
    assert_eq!(report["parsed"], 1);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_timed_out_read_exits_promptly() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let fifo = dir.path().join("requests.fifo");
    assert!(Command::new("mkfifo").arg(&fifo).status()?.success());

    let mut cmd = logpulse(dir.path());
    cmd.env("LOGPULSE__SOURCE__READ_TIMEOUT", "300ms")
        .arg("overview")
        .arg("--log-file")
        .arg(&fifo);
    let output = run_within(cmd, Duration::from_secs(10))?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Timed out"));
    Ok(())
}
