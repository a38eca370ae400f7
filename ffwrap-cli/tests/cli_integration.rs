use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

// Binaries run with a clean view of the variables they react to.
fn tool(name: &str) -> Command {
    let mut cmd = Command::cargo_bin(name).expect("binary is built by cargo test");
    for var in ["DEBUG", "RUST_LOG", "FFWRAP_FFMPEG", "FFWRAP_FFPROBE", "FFWRAP_SHELL"] {
        cmd.env_remove(var);
    }
    cmd
}

#[cfg(unix)]
fn stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn test_help_exit_codes() {
    tool("ff_rotate")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--rotation").and(contains("--config")));

    tool("ff_concat")
        .arg("--help")
        .assert()
        .code(1)
        .stdout(contains("Usage"));

    tool("ff_shell").arg("-h").assert().code(1).stdout(contains("--arg"));
}

#[test]
fn test_unknown_flag() {
    tool("ff_scale")
        .arg("--frobnicate")
        .assert()
        .code(1)
        .stderr(contains("Unknown option: --frobnicate"));
}

#[test]
fn test_non_existent_input_is_a_no_op() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let output = dir.path().join("out.mp4");

    tool("ff_rotate")
        .arg("-i")
        .arg(dir.path().join("surely/not/here.mp4"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_unprobeable_input_is_copied() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("notes.txt");
    let output = dir.path().join("nested/out.mp4");
    fs::write(&input, "definitely not a video")?;

    tool("ff_sharpen")
        .env("FFWRAP_FFPROBE", dir.path().join("no-such-ffprobe"))
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(contains("passed through unchanged"));

    assert_eq!(fs::read(&output)?, fs::read(&input)?);
    Ok(())
}

#[test]
fn test_broken_config_fails() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let config = dir.path().join("broken.json");
    fs::write(&config, "{ \"input\": ")?;

    tool("ff_pad")
        .arg("-C")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(contains("Invalid config file"));
    Ok(())
}

#[test]
fn test_config_paths_are_relative_to_config() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let job = dir.path().join("job");
    fs::create_dir(&job)?;
    fs::write(job.join("in.mp4"), "bytes")?;
    let config = job.join("settings.json");
    fs::write(&config, r#"{"ff_scale": {"input": "in.mp4", "output": "out.mp4"}}"#)?;

    // Run from elsewhere; the copy must still land next to the config.
    tool("ff_scale")
        .current_dir(dir.path())
        .env("FFWRAP_FFPROBE", dir.path().join("no-such-ffprobe"))
        .arg("--config")
        .arg(&config)
        .arg("-o")
        .arg("ignored.mp4")
        .assert()
        .success();

    assert_eq!(fs::read(job.join("out.mp4"))?, b"bytes");
    assert!(!dir.path().join("ignored.mp4").exists());
    Ok(())
}

#[test]
fn test_concat_with_missing_input_writes_nothing() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let present = dir.path().join("a.mp4");
    fs::write(&present, "x")?;
    let output = dir.path().join("joined.mp4");

    // The missing clip comes first so it is the one reported.
    tool("ff_concat")
        .arg("-i")
        .arg(dir.path().join("missing.mp4"))
        .arg("-i")
        .arg(&present)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(contains("missing.mp4"));

    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_shell_without_script_is_a_no_op() {
    tool("ff_shell")
        .arg("-i")
        .arg("/no/such/script.sh")
        .assert()
        .success();
}

#[cfg(unix)]
#[test]
fn test_tool_exit_code_propagates() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("in.mp4");
    fs::write(&input, "x")?;
    let ffprobe = stub(dir.path(), "ffprobe", "echo h264");
    let ffmpeg = stub(dir.path(), "ffmpeg", "echo 'Conversion failed!' >&2\nexit 4");

    tool("ff_rotate")
        .env("FFWRAP_FFPROBE", &ffprobe)
        .env("FFWRAP_FFMPEG", &ffmpeg)
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.mp4"))
        .assert()
        .code(4)
        .stderr(contains("Conversion failed!"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_image_output_gets_extension() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("still.png");
    fs::write(&input, "x")?;
    let log = dir.path().join("args.log");
    let ffprobe = stub(dir.path(), "ffprobe", "echo png");
    let ffmpeg = stub(
        dir.path(),
        "ffmpeg",
        &format!("printf '%s\\n' \"$@\" > '{}'", log.display()),
    );

    tool("ff_image")
        .env("FFWRAP_FFPROBE", &ffprobe)
        .env("FFWRAP_FFMPEG", &ffmpeg)
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out"))
        .assert()
        .success();

    let args = fs::read_to_string(&log)?;
    let last = args.lines().last().unwrap_or_default();
    assert_eq!(Path::new(last), dir.path().join("out.mp4"));
    assert!(args.lines().any(|a| a == "libx264"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_thumbnail_count_uses_pattern() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("clip.mp4");
    fs::write(&input, "x")?;
    let log = dir.path().join("args.log");
    let ffprobe = stub(dir.path(), "ffprobe", "echo h264");
    let ffmpeg = stub(
        dir.path(),
        "ffmpeg",
        &format!("printf '%s\\n' \"$@\" > '{}'", log.display()),
    );

    tool("ff_thumbnail")
        .env("FFWRAP_FFPROBE", &ffprobe)
        .env("FFWRAP_FFMPEG", &ffmpeg)
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("shot.png"))
        .arg("-c")
        .arg("3")
        .assert()
        .success();

    let args = fs::read_to_string(&log)?;
    assert!(args.lines().any(|a| a.ends_with("shot-%02d.png")));
    assert!(args.lines().any(|a| a == "thumbnail=300"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_shell_runs_script_with_args() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let script = dir.path().join("job.sh");
    fs::write(&script, "echo \"got $1 $2\"\nexit 5\n")?;

    tool("ff_shell")
        .arg("-i")
        .arg(&script)
        .arg("-a")
        .arg("hello")
        .arg("-a")
        .arg("--world")
        .assert()
        .code(5)
        .stdout(contains("got hello --world"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_debug_echoes_command() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("in.mp4");
    fs::write(&input, "x")?;
    let ffprobe = stub(dir.path(), "ffprobe", "echo h264");
    let ffmpeg = stub(dir.path(), "ffmpeg", "exit 0");

    tool("ff_rotate")
        .env("DEBUG", "1")
        .env("FFWRAP_FFPROBE", &ffprobe)
        .env("FFWRAP_FFMPEG", &ffmpeg)
        .arg("-i")
        .arg(&input)
        .arg("-r")
        .arg("180")
        .arg("-o")
        .arg(dir.path().join("out.mp4"))
        .assert()
        .success()
        .stderr(contains("Running:").and(contains("hflip,vflip")));
    Ok(())
}
