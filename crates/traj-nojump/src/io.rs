//! JSON dump of in-memory frames, as consumed and produced by the CLI.
//!
//! ```json
//! {"frames": [{"positions": [[0.1, 0.2, 0.3]], "box": [10, 10, 10, 90, 90, 90]}]}
//! ```
//!
//! `box` is either six cell parameters (lengths, then angles in degrees) or a
//! 3x3 matrix whose rows are the cell vectors. It may be omitted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use traj_core::error::{TrajError, TrajResult};
use traj_core::frame::{Box3, Frame};

use crate::executor::InMemoryTrajectory;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FramesDocument {
    pub frames: Vec<FrameRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub positions: Vec<[f64; 3]>,
    #[serde(default, rename = "box", skip_serializing_if = "Option::is_none")]
    pub box_: Option<BoxRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_ps: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoxRecord {
    Dimensions([f64; 6]),
    Matrix([[f64; 3]; 3]),
}

impl BoxRecord {
    pub fn to_box3(self) -> Box3 {
        match self {
            BoxRecord::Dimensions(dimensions) => Box3::from_dimensions(dimensions),
            BoxRecord::Matrix(cell) => Box3::from_matrix(cell),
        }
    }

    pub fn from_box3(box_: Box3) -> Option<Self> {
        match box_ {
            Box3::None => None,
            Box3::Orthorhombic { lx, ly, lz } => {
                Some(BoxRecord::Dimensions([lx, ly, lz, 90.0, 90.0, 90.0]))
            }
            Box3::Triclinic { m } => Some(BoxRecord::Matrix([
                [m[0], m[1], m[2]],
                [m[3], m[4], m[5]],
                [m[6], m[7], m[8]],
            ])),
        }
    }
}

impl FramesDocument {
    pub fn from_frames(frames: &[Frame]) -> Self {
        let frames = frames
            .iter()
            .map(|frame| FrameRecord {
                index: Some(frame.index),
                positions: frame.positions.clone(),
                box_: BoxRecord::from_box3(frame.box_),
                time_ps: frame.time_ps,
            })
            .collect();
        Self { frames }
    }

    /// Frames are stored in document order; `index` fields are ignored.
    pub fn into_trajectory(self) -> TrajResult<InMemoryTrajectory> {
        let frames = self
            .frames
            .into_iter()
            .enumerate()
            .map(|(idx, record)| Frame {
                index: idx,
                positions: record.positions,
                box_: record.box_.map(BoxRecord::to_box3).unwrap_or(Box3::None),
                time_ps: record.time_ps,
            })
            .collect();
        InMemoryTrajectory::new(frames)
    }
}

pub fn parse_frames_json(content: &str) -> TrajResult<InMemoryTrajectory> {
    let doc: FramesDocument = serde_json::from_str(content)
        .map_err(|e| TrajError::Parse(format!("json parse error: {e}")))?;
    doc.into_trajectory()
}

pub fn read_frames_json(path: &Path) -> TrajResult<InMemoryTrajectory> {
    let content = fs::read_to_string(path)?;
    parse_frames_json(&content)
}

pub fn frames_to_json(frames: &[Frame]) -> TrajResult<String> {
    serde_json::to_string_pretty(&FramesDocument::from_frames(frames))
        .map_err(|e| TrajError::Parse(format!("json encode error: {e}")))
}

pub fn write_frames_json(path: &Path, frames: &[Frame]) -> TrajResult<()> {
    let json = frames_to_json(frames)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::FrameSource;

    #[test]
    fn parses_both_box_layouts() {
        let traj = parse_frames_json(
            r#"{"frames": [
                {"positions": [[0.1, 0.2, 0.3]], "box": [2, 3, 4, 90, 90, 90]},
                {"positions": [[0.1, 0.2, 0.3]], "box": [[1, 0, 0], [0, 1, 0], [0.5, 0, 0.8]]},
                {"positions": [[0.1, 0.2, 0.3]]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(traj.n_frames(), 3);
        assert_eq!(traj.n_particles(), 1);
        let frames = traj.frames();
        assert_eq!(
            frames[0].box_,
            Box3::Orthorhombic {
                lx: 2.0,
                ly: 3.0,
                lz: 4.0
            }
        );
        assert!(matches!(frames[1].box_, Box3::Triclinic { .. }));
        assert_eq!(frames[2].box_, Box3::None);
        assert_eq!(frames[2].index, 2);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        assert!(matches!(
            parse_frames_json(r#"{"frames": [{"box": [1, 1, 1, 90, 90, 90]}]}"#),
            Err(TrajError::Parse(_))
        ));
    }

    #[test]
    fn write_then_read_keeps_frames() {
        let frames = vec![
            Frame::new(0, vec![[1.5, -2.0, 0.25]], Box3::from_matrix([
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.5, 0.0, 0.75],
            ]))
            .with_time(2.0),
            Frame::new(1, vec![[1.0, 1.0, 1.0]], Box3::None),
        ];
        let path = std::env::temp_dir().join(format!(
            "traj_nojump_frames_{}.json",
            std::process::id()
        ));
        write_frames_json(&path, &frames).unwrap();
        let traj = read_frames_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(traj.frames(), frames.as_slice());
    }
}
