#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};

pub const WIDTH: u32 = 64;
pub const HEIGHT: u32 = 64;
/// Per-frame motion in (col, row).
pub const STEP: (i64, i64) = (2, -1);

fn noise(row: i64, col: i64) -> u8 {
    let mut h = (row as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (col as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    h ^= h >> 29;
    h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h ^= h >> 32;
    (h & 0xff) as u8
}

/// Frame `k` of a texture drifting by `STEP` per frame.
pub fn drifting_frame(k: i64) -> GrayImage {
    GrayImage::from_fn(WIDTH, HEIGHT, |col, row| {
        Luma([noise(row as i64 + k * -STEP.1, col as i64 - k * STEP.0)])
    })
}

/// Write `count` frames as `f001.png`, `f002.png`, ... into `dir`.
pub fn write_frames(dir: &Path, count: usize) -> String {
    for k in 0..count {
        let path = dir.join(format!("f{:03}.png", k + 1));
        drifting_frame(k as i64).save(&path).expect("write frame");
    }
    dir.join("f{:03}.png").to_string_lossy().into_owned()
}

/// Small, fast config tracking a 10x16 block through the drifting texture.
pub fn write_config(dir: &Path, pattern: &str, extra: &str) -> PathBuf {
    let json = format!(
        r#"{{
    "frames": {pattern:?},
    "max_frames": 10,
    "marker": {{ "x": 19.5, "y": 19.5, "w": 10.0, "l": 16.0, "angle": 0.0 }},
    "tracking": {{
        "search": {{ "dra": 0.0, "nrot": 1, "dta": 3.0, "nt": 7 }}
    }},
    "output_path": {output:?}{extra}
}}"#,
        pattern = pattern,
        output = dir.join("report.json").to_string_lossy(),
        extra = extra,
    );
    let path = dir.join("config.json");
    std::fs::write(&path, json).expect("write config");
    path
}
