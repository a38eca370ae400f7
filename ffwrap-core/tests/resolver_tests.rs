use ffwrap_core::operations::rotate::RotateParams;
use ffwrap_core::operations::scale::ScaleParams;
use ffwrap_core::operations::{Concat, Rotate, Scale, ShellRunner, Thumbnail};
use ffwrap_core::{LogLevel, ResolveError, SettingsSource, resolve};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_cli_defaults() {
    let settings = resolve::<Rotate, _, _>(["ff_rotate", "-i", "in.mp4"]).unwrap();
    assert_eq!(settings.inputs, vec![PathBuf::from("in.mp4")]);
    assert_eq!(settings.output, PathBuf::from("rotated.mp4"));
    assert_eq!(settings.log_level, LogLevel::Error);
    assert_eq!(settings.params, RotateParams::default());
}

#[test]
fn test_cli_and_config_resolve_identically() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("in.mp4");
    let output = dir.path().join("out.mp4");
    let config = dir.path().join("scale.json");
    fs::write(
        &config,
        format!(
            r#"{{"input": "{}", "output": "{}", "width": 640, "height": -1, "loglevel": "info"}}"#,
            input.display(),
            output.display()
        ),
    )?;

    let from_cli = resolve::<Scale, _, _>([
        "ff_scale".to_string(),
        "-i".to_string(),
        input.display().to_string(),
        "-o".to_string(),
        output.display().to_string(),
        "-W".to_string(),
        "640".to_string(),
        "-H".to_string(),
        "-1".to_string(),
        "-l".to_string(),
        "info".to_string(),
    ])
    .map_err(|e| format!("{e:?}"))?;
    let from_config = resolve::<Scale, _, _>([
        "ff_scale".to_string(),
        "-C".to_string(),
        config.display().to_string(),
    ])
    .map_err(|e| format!("{e:?}"))?;

    assert_eq!(from_cli.inputs, from_config.inputs);
    assert_eq!(from_cli.output, from_config.output);
    assert_eq!(from_cli.log_level, from_config.log_level);
    assert_eq!(from_cli.params, from_config.params);
    assert_eq!(from_cli.source, SettingsSource::CommandLine);
    assert_eq!(from_config.source, SettingsSource::ConfigFile(config.clone()));
    assert_eq!(
        from_config.params,
        ScaleParams {
            width: Some(640),
            height: Some(-1)
        }
    );
    Ok(())
}

#[test]
fn test_config_replaces_command_line_entirely() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("rotate.json");
    fs::write(&config, r#"{"ff_rotate": {"input": "/media/a.mp4"}}"#).unwrap();

    let settings = resolve::<Rotate, _, _>([
        "ff_rotate".to_string(),
        "-r".to_string(),
        "180".to_string(),
        "-o".to_string(),
        "/ignored.mp4".to_string(),
        "--config".to_string(),
        config.display().to_string(),
    ])
    .unwrap();

    assert_eq!(settings.inputs, vec![PathBuf::from("/media/a.mp4")]);
    // Defaults are not config-relative.
    assert_eq!(settings.output, PathBuf::from("rotated.mp4"));
    assert_eq!(settings.params.rotation, None);
}

#[test]
fn test_config_ignores_malformed_flag_values() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("rotate.json");
    fs::write(&config, r#"{"input": "/media/a.mp4", "rotation": 180}"#).unwrap();
    let config = config.display().to_string();

    let settings = resolve::<Rotate, _, _>([
        "ff_rotate",
        "-r",
        "abc",
        "-l",
        "loudest",
        "-C",
        config.as_str(),
    ])
    .unwrap();
    assert_eq!(settings.params.rotation, Some(180));
    assert_eq!(settings.log_level, LogLevel::Error);

    // Unknown flags and help are still honoured next to a config.
    let unknown = resolve::<Rotate, _, _>(["ff_rotate", "-C", config.as_str(), "--frobnicate"]);
    assert!(matches!(unknown, Err(ResolveError::UnknownFlag { .. })));
    let help = resolve::<Rotate, _, _>(["ff_rotate", "-C", config.as_str(), "--help"]);
    assert!(matches!(help, Err(ResolveError::Help(_))));
}

#[test]
fn test_malformed_flag_value_without_config_is_rejected() {
    let err = resolve::<Rotate, _, _>(["ff_rotate", "-i", "in.mp4", "-r", "abc"]).unwrap_err();
    assert!(matches!(err, ResolveError::InvalidArguments(_)));
}

#[test]
fn test_config_relative_paths_follow_config_location() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("jobs")).unwrap();
    let config = dir.path().join("jobs/thumb.json");
    fs::write(&config, r#"{"input": "clips/a.mp4", "output": "shots/a"}"#).unwrap();

    let settings = resolve::<Thumbnail, _, _>([
        "ff_thumbnail".to_string(),
        "-C".to_string(),
        config.display().to_string(),
    ])
    .unwrap();

    assert_eq!(settings.inputs, vec![dir.path().join("jobs/clips/a.mp4")]);
    assert_eq!(settings.output, dir.path().join("jobs/shots/a.png"));
}

#[test]
fn test_foreign_namespace_is_accepted() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("c.json");
    fs::write(&config, r#"{"ff_pad": {"input": "/a.mp4", "width": 320}}"#).unwrap();

    let settings = resolve::<Scale, _, _>([
        "ff_scale".to_string(),
        "-C".to_string(),
        config.display().to_string(),
    ])
    .unwrap();
    assert_eq!(settings.params.width, Some(320));
}

#[test]
fn test_broken_config_is_an_error() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("broken.json");
    fs::write(&config, "{ not json").unwrap();

    let err = resolve::<Scale, _, _>([
        "ff_scale".to_string(),
        "-C".to_string(),
        config.display().to_string(),
    ])
    .unwrap_err();
    assert!(matches!(err, ResolveError::Config(_)));

    let missing = resolve::<Scale, _, _>(["ff_scale", "-C", "/no/such/config.json"]).unwrap_err();
    assert!(matches!(missing, ResolveError::Config(_)));
}

#[test]
fn test_unknown_flag_is_named() {
    match resolve::<Rotate, _, _>(["ff_rotate", "--frobnicate"]) {
        Err(ResolveError::UnknownFlag { flag, usage }) => {
            assert_eq!(flag, "--frobnicate");
            assert!(usage.contains("ff_rotate"));
        }
        other => panic!("expected unknown flag, got {other:?}"),
    }
}

#[test]
fn test_help_lists_tool_flags() {
    match resolve::<Rotate, _, _>(["ff_rotate", "--help"]) {
        Err(ResolveError::Help(text)) => {
            assert!(text.contains("--rotation"));
            assert!(text.contains("--config"));
        }
        other => panic!("expected help, got {other:?}"),
    }
}

#[test]
fn test_missing_value_is_invalid_arguments() {
    let err = resolve::<Rotate, _, _>(["ff_rotate", "-i"]).unwrap_err();
    assert!(matches!(err, ResolveError::InvalidArguments(_)));
}

#[test]
fn test_last_input_wins_for_single_input_tools() {
    let settings = resolve::<Rotate, _, _>(["ff_rotate", "-i", "a.mp4", "-i", "b.mp4"]).unwrap();
    assert_eq!(settings.input(), Some(std::path::Path::new("b.mp4")));
}

#[test]
fn test_concat_keeps_every_input_in_order() {
    let settings =
        resolve::<Concat, _, _>(["ff_concat", "-i", "1.mp4", "-i", "2.mp4", "-i", "3.mp4"]).unwrap();
    assert_eq!(
        settings.inputs,
        vec![PathBuf::from("1.mp4"), PathBuf::from("2.mp4"), PathBuf::from("3.mp4")]
    );
}

#[test]
fn test_shell_args_may_look_like_flags() {
    let settings =
        resolve::<ShellRunner, _, _>(["ff_shell", "-i", "job.sh", "-a", "--verbose", "-a", "x"]).unwrap();
    assert_eq!(settings.params.arg, vec!["--verbose".to_string(), "x".to_string()]);
}

#[test]
fn test_stray_positionals_and_description_are_ignored() {
    let settings = resolve::<Rotate, _, _>([
        "ff_rotate",
        "leftover",
        "-i",
        "in.mp4",
        "--description",
        "turn it",
    ])
    .unwrap();
    assert_eq!(settings.inputs, vec![PathBuf::from("in.mp4")]);
}

#[test]
fn test_config_list_uses_first_entry_for_single_input_tools() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("rotate.json");
    fs::write(&config, r#"{"input": ["/a.mp4", "/b.mp4"]}"#).unwrap();

    let settings = resolve::<Rotate, _, _>([
        "ff_rotate".to_string(),
        "-C".to_string(),
        config.display().to_string(),
    ])
    .unwrap();
    assert_eq!(settings.input(), Some(std::path::Path::new("/a.mp4")));
}
