// tests/common/mod.rs
//! Synthetic gesture corpora shared by the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use gesture_core::config::{PathsConfig, SystemConfig};
use gesture_core::landmarks::{FrameRecord, HandPose, Landmark, SequenceRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Hand shape relative to the wrist; `extended` picks which fingers are straight
fn hand_shape(extended: [bool; 5]) -> Vec<Landmark> {
    let mut landmarks = vec![[0.0, 0.0, 0.0]];
    for (finger, straight) in extended.iter().enumerate() {
        let spread = (finger as f32 - 2.0) * 0.03;
        for joint in 0..4 {
            let step = joint as f32 + 1.0;
            let reach = if *straight || joint == 0 { 0.08 } else { 0.03 };
            landmarks.push([spread * step, -reach * step, 0.01 * joint as f32]);
        }
    }
    landmarks
}

fn place(shape: &[Landmark], angle: f32, origin: [f32; 2], rng: &mut StdRng) -> HandPose {
    let (sin, cos) = angle.sin_cos();
    let landmarks: Vec<Landmark> = shape
        .iter()
        .map(|[x, y, z]| {
            [
                origin[0] + x * cos - y * sin + rng.gen_range(-0.004..0.004),
                origin[1] + x * sin + y * cos + rng.gen_range(-0.004..0.004),
                *z + rng.gen_range(-0.004..0.004),
            ]
        })
        .collect();
    HandPose::from_landmarks(&landmarks).expect("21 landmarks")
}

/// Open hand swinging side to side, two full cycles
pub fn wave_sequence(rng: &mut StdRng) -> SequenceRecord {
    let frames = rng.gen_range(18..=24);
    let shape = hand_shape([true; 5]);
    let origin = [rng.gen_range(0.3..0.7), rng.gen_range(0.4..0.8)];
    let frames = (0..frames)
        .map(|i| {
            let phase = std::f32::consts::TAU * 2.0 * i as f32 / frames as f32;
            FrameRecord::right_only(place(&shape, 0.6 * phase.sin(), origin, rng))
        })
        .collect();
    SequenceRecord::new(frames)
}

/// Static index-finger point
pub fn point_sequence(rng: &mut StdRng) -> SequenceRecord {
    let frames = rng.gen_range(18..=24);
    let shape = hand_shape([false, true, false, false, false]);
    let origin = [rng.gen_range(0.3..0.7), rng.gen_range(0.4..0.8)];
    let frames = (0..frames)
        .map(|_| FrameRecord::right_only(place(&shape, 0.0, origin, rng)))
        .collect();
    SequenceRecord::new(frames)
}

pub fn write_sequence(path: &Path, sequence: &SequenceRecord) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string(sequence).unwrap()).unwrap();
}

/// Config rooted in `root` with every path inside it
pub fn config_in(root: &Path) -> SystemConfig {
    SystemConfig {
        paths: PathsConfig {
            gestures_dir: root.join("gestures"),
            models_dir: root.join("models"),
            classes_file: root.join("classes.json"),
            ..PathsConfig::default()
        },
        ..SystemConfig::default()
    }
}

/// Write `per_class` wave and point sequences under the config's gestures dir
pub fn write_wave_point_corpus(config: &SystemConfig, per_class: usize, seed: u64) {
    let mut rng = rng(seed);
    for i in 0..per_class {
        let wave = wave_sequence(&mut rng);
        write_sequence(&config.paths.gestures_dir.join("wave").join(format!("{}.json", i)), &wave);
        let point = point_sequence(&mut rng);
        write_sequence(&config.paths.gestures_dir.join("point").join(format!("{}.json", i)), &point);
    }
}
