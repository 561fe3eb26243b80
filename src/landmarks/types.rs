// src/landmarks/types.rs
//! Core types for hand landmark records
//!
//! Records arrive as JSON produced by an upstream landmark extractor:
//!
//! ```json
//! {"frames": [{"left_hand": {"landmarks": [[x, y, z], ...]}, "right_hand": null}]}
//! ```
//!
//! Parsing is lenient below the sequence level. Anything that is not a usable
//! 21-landmark hand resolves to [`HandData::Absent`] instead of failing the frame.

use crate::config::constants::landmarks::LANDMARKS_PER_HAND;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Single landmark (x, y, z)
pub type Landmark = [f32; 3];

/// Fixed 21x3 landmark array
pub type PoseArray = [Landmark; LANDMARKS_PER_HAND];

/// Raw hand pose: exactly 21 landmarks, wrist first
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    pub landmarks: PoseArray,
}

impl HandPose {
    /// Build a pose from the first 21 landmarks, or `None` when fewer are supplied
    pub fn from_landmarks(landmarks: &[Landmark]) -> Option<Self> {
        if landmarks.len() < LANDMARKS_PER_HAND {
            return None;
        }
        let mut pose = [[0.0; 3]; LANDMARKS_PER_HAND];
        pose.copy_from_slice(&landmarks[..LANDMARKS_PER_HAND]);
        Some(Self { landmarks: pose })
    }
}

/// Presence of one hand in a frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HandData {
    #[default]
    Absent,
    Present(HandPose),
}

impl HandData {
    /// Resolve a JSON hand record; malformed data is absent, not an error
    pub fn from_value(value: &Value) -> Self {
        let Some(entries) = value.get("landmarks").and_then(Value::as_array) else {
            return HandData::Absent;
        };
        if entries.len() < LANDMARKS_PER_HAND {
            return HandData::Absent;
        }

        let mut landmarks = Vec::with_capacity(LANDMARKS_PER_HAND);
        for entry in &entries[..LANDMARKS_PER_HAND] {
            match parse_landmark(entry) {
                Some(lm) => landmarks.push(lm),
                None => return HandData::Absent,
            }
        }

        HandPose::from_landmarks(&landmarks).map_or(HandData::Absent, HandData::Present)
    }

    fn to_value(self) -> Value {
        match self {
            HandData::Absent => Value::Null,
            HandData::Present(pose) => json!({ "landmarks": pose.landmarks.to_vec() }),
        }
    }
}

impl From<HandPose> for HandData {
    fn from(pose: HandPose) -> Self {
        HandData::Present(pose)
    }
}

/// Accepts `[x, y, z, ...]` or `{"x": .., "y": .., "z": ..}`
fn parse_landmark(entry: &Value) -> Option<Landmark> {
    match entry {
        Value::Array(coords) if coords.len() >= 3 => {
            let mut lm = [0.0f32; 3];
            for (slot, coord) in lm.iter_mut().zip(coords) {
                *slot = coord.as_f64()? as f32;
            }
            Some(lm)
        }
        Value::Object(map) => {
            let x = map.get("x")?.as_f64()? as f32;
            let y = map.get("y")?.as_f64()? as f32;
            let z = map.get("z").and_then(Value::as_f64).unwrap_or(0.0) as f32;
            Some([x, y, z])
        }
        _ => None,
    }
}

/// One captured frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct FrameRecord {
    pub left_hand: HandData,
    pub right_hand: HandData,
}

impl FrameRecord {
    pub fn new(left_hand: HandData, right_hand: HandData) -> Self {
        Self { left_hand, right_hand }
    }

    pub fn right_only(pose: HandPose) -> Self {
        Self::new(HandData::Absent, HandData::Present(pose))
    }
}

impl From<Value> for FrameRecord {
    fn from(value: Value) -> Self {
        let hand = |key: &str| value.get(key).map_or(HandData::Absent, HandData::from_value);
        FrameRecord {
            left_hand: hand("left_hand"),
            right_hand: hand("right_hand"),
        }
    }
}

impl From<FrameRecord> for Value {
    fn from(frame: FrameRecord) -> Self {
        json!({
            "left_hand": frame.left_hand.to_value(),
            "right_hand": frame.right_hand.to_value(),
        })
    }
}

/// A full gesture performance as stored on disk
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SequenceRecord {
    #[serde(default)]
    pub frames: Vec<FrameRecord>,
}

impl SequenceRecord {
    pub fn new(frames: Vec<FrameRecord>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landmark_list(count: usize) -> Vec<Value> {
        (0..count).map(|i| json!([i as f32 * 0.125, 0.5, 0.0])).collect()
    }

    #[test]
    fn test_hand_from_value() {
        let hand = HandData::from_value(&json!({ "landmarks": landmark_list(21) }));
        match hand {
            HandData::Present(pose) => assert_eq!(pose.landmarks[20], [2.5, 0.5, 0.0]),
            HandData::Absent => panic!("Expected present hand"),
        }
    }

    #[test]
    fn test_extra_landmarks_truncated() {
        let hand = HandData::from_value(&json!({ "landmarks": landmark_list(33) }));
        assert!(matches!(hand, HandData::Present(_)));
    }

    #[test]
    fn test_malformed_hands_are_absent() {
        assert_eq!(HandData::from_value(&Value::Null), HandData::Absent);
        assert_eq!(HandData::from_value(&json!({})), HandData::Absent);
        assert_eq!(HandData::from_value(&json!({ "landmarks": landmark_list(20) })), HandData::Absent);
        assert_eq!(HandData::from_value(&json!({ "landmarks": "nope" })), HandData::Absent);

        let mut bad = landmark_list(21);
        bad[4] = json!([1.0, "y", 0.0]);
        assert_eq!(HandData::from_value(&json!({ "landmarks": bad })), HandData::Absent);

        let mut short = landmark_list(21);
        short[7] = json!([1.0, 2.0]);
        assert_eq!(HandData::from_value(&json!({ "landmarks": short })), HandData::Absent);
    }

    #[test]
    fn test_object_landmarks_accepted() {
        let entries: Vec<Value> = (0..21).map(|i| json!({"x": i as f32, "y": 1.0, "z": 2.0})).collect();
        assert!(matches!(HandData::from_value(&json!({ "landmarks": entries })), HandData::Present(_)));
    }

    #[test]
    fn test_frame_record_parsing() {
        let record: SequenceRecord = serde_json::from_value(json!({
            "frames": [
                { "left_hand": null, "right_hand": { "landmarks": landmark_list(21) } },
                { "left_hand": { "landmarks": [] } },
                42,
            ]
        }))
        .unwrap();

        assert_eq!(record.len(), 3);
        assert!(!matches!(record.frames[0].left_hand, HandData::Present(_)));
        assert!(matches!(record.frames[0].right_hand, HandData::Present(_)));
        assert_eq!(record.frames[1], FrameRecord::default());
        assert_eq!(record.frames[2], FrameRecord::default());
    }

    #[test]
    fn test_missing_frames_is_empty() {
        let record: SequenceRecord = serde_json::from_str("{}").unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_frame_record_serializes_back() {
        let pose = HandPose::from_landmarks(&[[0.25, 0.5, 0.0]; 21]).unwrap();
        let frame = FrameRecord::right_only(pose);

        let text = serde_json::to_string(&frame).unwrap();
        let parsed: FrameRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, frame);
    }
}
