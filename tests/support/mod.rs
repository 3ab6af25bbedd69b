use anyhow::{Context, Result, bail};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::NamedTempFile;

pub fn cli_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_dept-category"))
}

/// CLI command with every `DEPTCAT_*` variable cleared so the host environment
/// cannot leak into assertions.
pub fn cli_command() -> Command {
    let mut cmd = Command::new(cli_binary());
    cmd.env_remove("DEPTCAT_TABLE")
        .env_remove("DEPTCAT_FALLBACK")
        .env_remove("DEPTCAT_HOST")
        .env("RUST_LOG", "warn");
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Run `cmd` with `input` on stdin, returning the output regardless of status.
pub fn run_with_stdin(mut cmd: Command, input: &str) -> Result<Output> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to spawn {:?}", cmd))?;
    child
        .stdin
        .take()
        .context("stdin not captured")?
        .write_all(input.as_bytes())?;
    child.wait_with_output().context("waiting for child")
}

pub fn write_table(json: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("failed to allocate table file")?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    Ok(file)
}

pub fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

