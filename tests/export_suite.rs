#[allow(dead_code)]
#[path = "../src/bin/export_frame.rs"]
mod export_frame;

use clap::Parser;
use std::path::PathBuf;

#[test]
fn parse_args_defaults_are_stable() {
    let args = export_frame::Cli::try_parse_from(["export_frame"]).expect("parse should succeed");

    assert_eq!(args.out, PathBuf::from("yantra.png"));
    assert_eq!(args.width, 1280);
    assert_eq!(args.height, 720);
    assert_eq!(args.time, 0.0);
    assert_eq!(args.audio_level, 0.0);
    assert_eq!(args.preset, None);
    assert_eq!(args.mode, None);
}

#[test]
fn parse_args_overrides_work() {
    let args = export_frame::Cli::try_parse_from([
        "export_frame",
        "--out",
        "stills/frame.png",
        "--width",
        "640",
        "--height",
        "360",
        "--time",
        "12.5",
        "--audio-level",
        "0.6",
        "--preset",
        "minimal",
        "--mode",
        "3d",
        "--background",
        "#000000",
    ])
    .expect("parse should succeed");

    assert_eq!(args.out, PathBuf::from("stills/frame.png"));
    assert_eq!(args.width, 640);
    assert_eq!(args.height, 360);
    assert_eq!(args.time, 12.5);
    assert_eq!(args.audio_level, 0.6);
    assert_eq!(args.preset.as_deref(), Some("minimal"));
    assert_eq!(args.mode, Some(export_frame::ModeArg::Relief));
}

#[test]
fn validate_rejects_degenerate_sizes() {
    let mut args = export_frame::Cli::try_parse_from(["export_frame"]).unwrap();
    args.width = 0;
    let err = export_frame::validate_args(&args).expect_err("width=0 must fail");
    assert!(err.to_string().contains("--width"));

    let mut args = export_frame::Cli::try_parse_from(["export_frame"]).unwrap();
    args.height = 0;
    let err = export_frame::validate_args(&args).expect_err("height=0 must fail");
    assert!(err.to_string().contains("--height"));
}

#[test]
fn validate_rejects_bad_time_and_level() {
    let mut args = export_frame::Cli::try_parse_from(["export_frame"]).unwrap();
    args.time = -1.0;
    assert!(export_frame::validate_args(&args).is_err());

    let mut args = export_frame::Cli::try_parse_from(["export_frame"]).unwrap();
    args.audio_level = 1.5;
    assert!(export_frame::validate_args(&args).is_err());
}

#[test]
fn build_params_applies_preset_mode_and_viewport() {
    let args = export_frame::Cli::try_parse_from([
        "export_frame",
        "--width",
        "320",
        "--height",
        "240",
        "--time",
        "3.25",
        "--preset",
        "minimal",
        "--mode",
        "2d",
    ])
    .unwrap();

    let params = export_frame::build_params(&args).expect("build should succeed");
    assert_eq!(params.viewport_width, 320);
    assert_eq!(params.viewport_height, 240);
    assert_eq!(params.elapsed_time, 3.25);
    assert!(!params.use_3d);
    // Minimal preset landed.
    assert!(!params.show_frame);
    assert_eq!(params.inner_radius, 110.0);
}

#[test]
fn build_params_rejects_unknown_presets() {
    let args =
        export_frame::Cli::try_parse_from(["export_frame", "--preset", "no-such-thing"]).unwrap();
    assert!(export_frame::build_params(&args).is_err());
}
