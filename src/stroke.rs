//! Stroke data model and recorded practice-session files.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// One sampled pointer position. A time-ordered sequence of points is a
/// stroke: everything between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub t_ms: u64,
}

/// Practice mode. Trace shows a ghosted template under the pen; write is
/// freehand. The scorer is more lenient in trace mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Trace,
    Write,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Trace => "trace",
            Mode::Write => "write",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Mode::Trace),
            "write" => Ok(Mode::Write),
            other => Err(anyhow!("unknown mode '{other}' (expected trace or write)")),
        }
    }
}

/// A recorded practice run: the target word, the mode it was drawn in, and
/// every completed stroke in capture order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeSession {
    pub word: String,
    pub mode: Mode,
    pub strokes: Vec<Vec<Point>>,
}

impl PracticeSession {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;
        serde_json::from_str(&txt).map_err(|e| anyhow!("failed to parse {}: {e}", path.display()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let txt = serde_json::to_string_pretty(self)?;
        fs::write(path, txt).map_err(|e| anyhow!("failed to write {}: {e}", path.display()))
    }
}
