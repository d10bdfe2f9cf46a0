//! Practice-session progression.

use crate::analyzer::{AnalysisResult, AnalyzeError, StrokeAnalyzer};
use crate::stroke::{Mode, Point};

/// A letter must score above this for the session to move on to the next
/// one.
pub const ADVANCE_SCORE: u8 = 65;

/// Tracks one practice run over a fixed word: the letter the user is
/// currently working on and the most recent analysis. Each completed stroke
/// replaces the previous result; no history is kept.
#[derive(Debug)]
pub struct PracticeState {
    word: String,
    mode: Mode,
    current_letter: usize,
    latest: Option<AnalysisResult>,
}

impl PracticeState {
    pub fn new(word: &str, mode: Mode) -> Result<Self, AnalyzeError> {
        crate::analyzer::validate_word(word)?;
        Ok(Self {
            word: word.to_string(),
            mode,
            current_letter: 0,
            latest: None,
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_letter(&self) -> usize {
        self.current_letter
    }

    pub fn latest(&self) -> Option<&AnalysisResult> {
        self.latest.as_ref()
    }

    /// Runs one analysis for a completed stroke and advances the current
    /// letter (capped at the last one) when it scored well enough.
    pub fn on_stroke(
        &mut self,
        analyzer: &mut StrokeAnalyzer,
        stroke: &[Point],
    ) -> Result<AnalysisResult, AnalyzeError> {
        let result = analyzer.analyze(stroke, &self.word, self.mode)?;
        if result.letter_results[self.current_letter].score > ADVANCE_SCORE {
            self.current_letter = (self.current_letter + 1).min(self.word.len() - 1);
        }
        self.latest = Some(result.clone());
        Ok(result)
    }

    pub fn reset(&mut self) {
        self.current_letter = 0;
        self.latest = None;
    }
}
