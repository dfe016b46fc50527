#[allow(dead_code)]
#[path = "../src/bin/export_video.rs"]
mod export_video;

use clap::Parser;
use std::path::PathBuf;
use tcb_scroller::scene::Demo;

#[test]
fn parse_args_defaults_are_stable() {
    let args = export_video::Cli::try_parse_from(["export_video"]).expect("parse should succeed");

    assert_eq!(args.out, PathBuf::from("scroller.mp4"));
    assert_eq!(args.width, 640);
    assert_eq!(args.height, 400);
    assert_eq!(args.fps, 60);
    assert_eq!(args.frames, None);
    assert_eq!(args.duration, None);
    assert_eq!(args.marker_style, export_video::StyleArg::Hidden);
    assert_eq!(args.escape, '^');
    assert_eq!(args.wave, 0);
}

#[test]
fn parse_args_overrides_work() {
    let args = export_video::Cli::try_parse_from([
        "export_video",
        "--out",
        "clips/out.mp4",
        "--width",
        "320",
        "--height",
        "200",
        "--fps",
        "50",
        "--duration",
        "12.5",
        "--marker-style",
        "echo",
        "--wave",
        "6",
    ])
    .expect("parse should succeed");

    assert_eq!(args.out, PathBuf::from("clips/out.mp4"));
    assert_eq!(args.width, 320);
    assert_eq!(args.height, 200);
    assert_eq!(args.fps, 50);
    assert_eq!(args.duration, Some(12.5));
    assert_eq!(args.marker_style, export_video::StyleArg::Echo);
    assert_eq!(args.wave, 6);
    export_video::validate_args(&args).expect("valid args");
}

#[test]
fn parse_rejects_zero_fps() {
    let args = export_video::Cli::try_parse_from(["export_video", "--fps", "0"])
        .expect("parse should succeed");

    let err = export_video::validate_args(&args).expect_err("fps=0 must fail validation");
    assert!(err.to_string().contains("--fps"));
}

#[test]
fn validate_rejects_bad_wave_and_frames() {
    let args = export_video::Cli::try_parse_from(["export_video", "--wave", "9"])
        .expect("parse should succeed");
    let err = export_video::validate_args(&args).expect_err("wave=9 must fail validation");
    assert!(err.to_string().contains("--wave"));

    let args = export_video::Cli::try_parse_from(["export_video", "--frames", "0"])
        .expect("parse should succeed");
    let err = export_video::validate_args(&args).expect_err("frames=0 must fail validation");
    assert!(err.to_string().contains("--frames"));
}

#[test]
fn validate_rejects_non_positive_duration_cap() {
    let args = export_video::Cli::try_parse_from(["export_video", "--duration", "0"])
        .expect("parse should succeed");

    let err = export_video::validate_args(&args).expect_err("duration=0 must fail validation");
    assert!(err.to_string().contains("--duration"));
}

#[test]
fn frame_count_is_repeatable_for_fractional_edges() {
    let cases = [
        (2.0, 60, 120usize),
        (2.999, 30, 89usize),
        (0.01, 60, 1usize),
        (59.0 / 60.0, 60, 59usize),
        (10.0 / 24.0, 24, 10usize),
    ];

    for (duration_s, fps, expected) in cases {
        assert_eq!(export_video::compute_frame_count(duration_s, fps), expected);
    }
}

#[test]
fn explicit_frames_win_over_duration() {
    let args = export_video::Cli::try_parse_from([
        "export_video",
        "--frames",
        "42",
        "--duration",
        "10",
    ])
    .expect("parse should succeed");
    assert_eq!(export_video::resolve_frame_count(&args), 42);

    let args = export_video::Cli::try_parse_from(["export_video", "--fps", "50"])
        .expect("parse should succeed");
    assert_eq!(export_video::resolve_frame_count(&args), 1000);
}

#[test]
fn render_frames_streams_exact_rgba_bytes() {
    let args = export_video::Cli::try_parse_from(["export_video", "--wave", "3"])
        .expect("parse should succeed");
    let engine = export_video::build_engine(&args).expect("engine");
    assert_eq!(engine.active_wave().get(), 3);

    let mut demo = Demo::new(engine);
    let mut sink = Vec::new();
    export_video::render_frames(&mut demo, 3, 64, 40, &mut sink).expect("render");
    assert_eq!(sink.len(), 3 * 64 * 40 * 4);
    assert_eq!(demo.frames(), 3);
}
