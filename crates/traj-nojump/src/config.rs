use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use traj_core::error::{TrajError, TrajResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoJumpConfig {
    #[serde(default = "default_true")]
    pub check_continuity: bool,
    /// Index step that counts as contiguous access.
    #[serde(default = "default_stride")]
    pub stride: usize,
}

impl Default for NoJumpConfig {
    fn default() -> Self {
        Self {
            check_continuity: true,
            stride: 1,
        }
    }
}

impl NoJumpConfig {
    pub fn new(check_continuity: bool) -> Self {
        Self {
            check_continuity,
            ..Self::default()
        }
    }

    pub fn with_check_continuity(mut self, check_continuity: bool) -> Self {
        self.check_continuity = check_continuity;
        self
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn validate(&self) -> TrajResult<()> {
        if self.stride == 0 {
            return Err(TrajError::Invalid("nojump stride must be at least 1".into()));
        }
        Ok(())
    }
}

/// Which frames a run visits, in visiting order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameSelection {
    All,
    Slice {
        start: usize,
        stop: Option<usize>,
        step: usize,
    },
    /// Raw indices; negative values count from the end.
    Indices(Vec<i64>),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub nojump: NoJumpConfig,
    #[serde(default)]
    pub indices: Option<Vec<i64>>,
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub stop: Option<usize>,
    #[serde(default)]
    pub step: Option<usize>,
    #[serde(default)]
    pub deny_warnings: bool,
}

impl RunConfig {
    pub fn load(path: &Path) -> TrajResult<Self> {
        let content = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        let cfg: RunConfig = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| TrajError::Parse(format!("yaml parse error: {e}")))?,
            "json" | "" => serde_json::from_str(&content)
                .map_err(|e| TrajError::Parse(format!("json parse error: {e}")))?,
            other => {
                return Err(TrajError::Unsupported(format!(
                    "config extension '{other}' (expected json, yaml or yml)"
                )))
            }
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> TrajResult<()> {
        self.nojump.validate()?;
        let sliced = self.start.is_some() || self.stop.is_some() || self.step.is_some();
        if self.indices.is_some() && sliced {
            return Err(TrajError::Invalid(
                "frame indices and start/stop/step are mutually exclusive".into(),
            ));
        }
        if self.step == Some(0) {
            return Err(TrajError::Invalid("frame step must be at least 1".into()));
        }
        Ok(())
    }

    pub fn selection(&self) -> FrameSelection {
        if let Some(indices) = &self.indices {
            return FrameSelection::Indices(indices.clone());
        }
        if self.start.is_none() && self.stop.is_none() && self.step.is_none() {
            return FrameSelection::All;
        }
        FrameSelection::Slice {
            start: self.start.unwrap_or(0),
            stop: self.stop,
            step: self.step.unwrap_or(1).max(1),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_stride() -> usize {
    1
}
