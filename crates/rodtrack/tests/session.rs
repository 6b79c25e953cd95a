mod common;

use approx::assert_abs_diff_eq;
use rodtrack::config::{TrackConfig, TrackReport};
use rodtrack::io::{load_sequence, LoadError};
use rodtrack::render::{export_sequence, render_path, MARK};
use rodtrack::tracking::{CancelToken, TrackError};
use rodtrack::{RunError, TrackMode, TrackSession};
use tempfile::tempdir;

use common::{write_config, write_frames, STEP};

#[test]
fn loader_stops_at_first_missing_frame() {
    let dir = tempdir().unwrap();
    let pattern = write_frames(dir.path(), 3);
    let frames = load_sequence(&pattern, 10, 8).unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames.get(0).unwrap().width(), 64);

    let frames = load_sequence(&pattern, 2, 8).unwrap();
    assert_eq!(frames.len(), 2);
}

#[test]
fn loader_requires_first_frame() {
    let dir = tempdir().unwrap();
    let pattern = dir.path().join("missing{}.png").to_string_lossy().into_owned();
    let err = load_sequence(&pattern, 10, 8).unwrap_err();
    assert!(matches!(err, LoadError::NoFrames { .. }));
}

#[test]
fn both_modes_follow_the_drift() {
    let dir = tempdir().unwrap();
    let pattern = write_frames(dir.path(), 5);
    let cfg_path = write_config(dir.path(), &pattern, "");
    let mut cfg = TrackConfig::load_json(&cfg_path).unwrap();
    let session = TrackSession::open(&cfg).unwrap();
    assert_eq!(session.frames.len(), 5);

    for mode in [TrackMode::Anchored, TrackMode::Incremental] {
        cfg.tracking.mode = mode;
        let res = session.track(&cfg.tracking).unwrap();
        assert_eq!(res.last, 4);
        let t = &res.trajectory;
        assert_eq!(t.len(), 5);
        for k in 0..t.len() {
            assert_abs_diff_eq!(t.x[k] - t.x[0], (STEP.0 * k as i64) as f64, epsilon = 1e-9);
            assert_abs_diff_eq!(t.y[k] - t.y[0], (STEP.1 * k as i64) as f64, epsilon = 1e-9);
            assert_eq!(t.rotation[k], 0.0);
        }
        assert!(res.steps.iter().all(|s| s.score == 0.0));
    }
}

#[test]
fn report_mirrors_trajectory() {
    let dir = tempdir().unwrap();
    let pattern = write_frames(dir.path(), 4);
    let cfg_path = write_config(dir.path(), &pattern, "");
    let cfg = TrackConfig::load_json(&cfg_path).unwrap();
    let session = TrackSession::open(&cfg).unwrap();
    let res = session.track(&cfg.tracking).unwrap();

    let mut report = TrackReport::new(&cfg, &cfg_path, session.frames.len());
    report.set_result(&res);
    report.write_json(cfg.output_path()).unwrap();

    let back = TrackReport::load_json(cfg.output_path()).unwrap();
    assert_eq!(back.lind, Some(3));
    assert_eq!(back.x, res.trajectory.x);
    assert_eq!(back.rotation_deg, vec![0.0; 4]);
    assert_eq!(back.steps.len(), 3);
    assert!(back.error.is_none());
}

#[test]
fn overlays_mark_path_and_outline() {
    let dir = tempdir().unwrap();
    let pattern = write_frames(dir.path(), 4);
    let cfg_path = write_config(dir.path(), &pattern, "");
    let cfg = TrackConfig::load_json(&cfg_path).unwrap();
    let session = TrackSession::open(&cfg).unwrap();
    let res = session.track(&cfg.tracking).unwrap();
    let outline = &session.marker.outline;

    // Outline corner (20, 20) moves with the marker to entry 3.
    let last = render_path(&session.frames, &res, outline, -1, false).unwrap();
    let (row, col) = (20 + 3 * STEP.1, 20 + 3 * STEP.0);
    assert_eq!(last.get(row, col), Some(MARK));

    let out_dir = dir.path().join("export");
    let written = export_sequence(&session.frames, &res, outline, &out_dir).unwrap();
    assert_eq!(written.len(), 4);
    assert!(written.iter().all(|p| p.is_file()));
    assert_eq!(written[2].file_name().unwrap(), "pt2.png");

    assert!(render_path(&session.frames, &res, outline, 4, true).is_err());
}

#[test]
fn region_outside_frames_is_reported() {
    let dir = tempdir().unwrap();
    let pattern = write_frames(dir.path(), 2);
    let cfg_path = write_config(dir.path(), &pattern, "");
    let mut cfg = TrackConfig::load_json(&cfg_path).unwrap();
    cfg.marker.x = 200.0;
    let session = TrackSession::open(&cfg).unwrap();
    let err = session.track(&cfg.tracking).unwrap_err();
    assert_eq!(err.last_good_frame(), Some(0));
    let run: RunError = err.into();
    assert!(matches!(run, RunError::Track(_)));
}

#[test]
fn cancel_token_stops_a_run_midway() {
    let dir = tempdir().unwrap();
    let pattern = write_frames(dir.path(), 5);
    let cfg_path = write_config(dir.path(), &pattern, "");
    let cfg = TrackConfig::load_json(&cfg_path).unwrap();
    let session = TrackSession::open(&cfg).unwrap();

    let token = CancelToken::new();
    let err = session
        .track_with_cancel(&cfg.tracking, token.clone(), |step| {
            if step.to == 3 {
                token.cancel();
            }
        })
        .unwrap_err();
    assert_eq!(err, TrackError::Cancelled { last_good_frame: 3 });

    let done = session
        .track_with_cancel(&cfg.tracking, CancelToken::new(), |_| {})
        .unwrap();
    assert_eq!(done.trajectory.len(), 5);
}
