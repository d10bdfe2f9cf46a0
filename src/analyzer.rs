//! Stroke analysis: one completed stroke in, per-letter and word-level
//! scores out.

use serde::Serialize;
use thiserror::Error;

use crate::config::Alphabet;
use crate::scorer;
use crate::segment;
use crate::stroke::{Mode, Point};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("target word is empty")]
    EmptyWord,
    #[error("target word contains '{0}'; only uppercase ASCII letters are scorable")]
    UnsupportedChar(char),
}

#[derive(Debug, Clone, Serialize)]
pub struct LetterResult {
    pub target: char,
    pub score: u8,
    pub feedback: String,
    pub directions: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub letter_results: Vec<LetterResult>,
    pub overall_score: f64,
    pub word_feedback: String,
}

/// The analyzer proper. Owns its letter-profile table and its random
/// source so both are injectable: callers extend coverage by supplying a
/// bigger [`Alphabet`], and tests pin the shape-score jitter with
/// [`StrokeAnalyzer::with_seed`].
pub struct StrokeAnalyzer {
    alphabet: Alphabet,
    rng: fastrand::Rng,
}

impl StrokeAnalyzer {
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(alphabet: Alphabet, seed: u64) -> Self {
        Self {
            alphabet,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Scores one completed stroke against the target word. The word must
    /// be non-empty uppercase ASCII (see [`validate_word`]); every other
    /// degenerate input resolves to a placeholder, never an error.
    pub fn analyze(
        &mut self,
        stroke: &[Point],
        target_word: &str,
        mode: Mode,
    ) -> Result<AnalysisResult, AnalyzeError> {
        validate_word(target_word)?;

        if stroke.len() < 2 {
            return Ok(empty_result(target_word));
        }

        let segments = segment::segment_letters(stroke, target_word.len());
        let mut letter_results = Vec::with_capacity(target_word.len());
        for (seg, target) in segments.iter().zip(target_word.chars()) {
            if seg.len() < 2 {
                letter_results.push(empty_letter(target));
                continue;
            }
            let (score, feedback, directions) = scorer::score_letter(
                seg,
                target,
                mode,
                self.alphabet.profile(target),
                &mut self.rng,
            );
            letter_results.push(LetterResult {
                target,
                score,
                feedback,
                directions,
            });
        }

        let overall_score = mean_score(&letter_results);
        Ok(AnalysisResult {
            letter_results,
            overall_score,
            word_feedback: word_feedback(overall_score).to_string(),
        })
    }
}

/// The caller-side precondition: non-empty, uppercase ASCII letters only.
pub fn validate_word(word: &str) -> Result<(), AnalyzeError> {
    if word.is_empty() {
        return Err(AnalyzeError::EmptyWord);
    }
    match word.chars().find(|c| !c.is_ascii_uppercase()) {
        Some(c) => Err(AnalyzeError::UnsupportedChar(c)),
        None => Ok(()),
    }
}

fn mean_score(results: &[LetterResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.score as f64).sum::<f64>() / results.len() as f64
}

fn word_feedback(avg: f64) -> &'static str {
    if avg > 80.0 {
        "Excellent! Keep practicing!"
    } else if avg > 65.0 {
        "Good job! Focus on problem letters"
    } else {
        "Try again - use tracing mode"
    }
}

fn empty_result(word: &str) -> AnalysisResult {
    AnalysisResult {
        letter_results: word.chars().map(empty_letter).collect(),
        overall_score: 0.0,
        word_feedback: "Draw something!".to_string(),
    }
}

fn empty_letter(target: char) -> LetterResult {
    LetterResult {
        target,
        score: 0,
        feedback: "No strokes".to_string(),
        directions: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LetterProfile;

    fn pt(x: f32, y: f32) -> Point {
        Point { x, y, t_ms: 0 }
    }

    fn test_alphabet() -> Alphabet {
        Alphabet::from_entries(
            "test",
            [
                (
                    'A',
                    LetterProfile {
                        directions: "DRURD".to_string(),
                        critical_points: vec![(0.5, 0.0)],
                    },
                ),
                (
                    'B',
                    LetterProfile {
                        directions: "DRURDR".to_string(),
                        critical_points: vec![],
                    },
                ),
            ],
        )
    }

    // two points per letter band, evenly spread over [0, 90]
    fn spread_stroke(letters: usize) -> Vec<Point> {
        let width = 90.0 / letters as f32;
        (0..letters)
            .flat_map(|i| {
                let x0 = i as f32 * width + 1.0;
                [pt(x0, 0.0), pt(x0 + width * 0.5, 10.0)]
            })
            .collect()
    }

    #[test]
    fn result_length_matches_word_length() {
        let mut analyzer = StrokeAnalyzer::with_seed(test_alphabet(), 1);
        for word in ["A", "AB", "BADGE", "XYZZY"] {
            let result = analyzer
                .analyze(&spread_stroke(word.len()), word, Mode::Trace)
                .unwrap();
            assert_eq!(result.letter_results.len(), word.len());
        }
    }

    #[test]
    fn overall_score_is_the_mean_over_the_full_word() {
        let mut analyzer = StrokeAnalyzer::with_seed(test_alphabet(), 7);
        // ink only on the left third: letters 2 and 3 get placeholders
        let stroke = vec![pt(0.0, 0.0), pt(5.0, 5.0), pt(10.0, 0.0), pt(90.0, 0.0)];
        let result = analyzer.analyze(&stroke, "ABC", Mode::Write).unwrap();
        let mean = result
            .letter_results
            .iter()
            .map(|r| r.score as f64)
            .sum::<f64>()
            / 3.0;
        assert!((result.overall_score - mean).abs() < 1e-9);
        assert_eq!(result.letter_results[1].score, 0);
    }

    #[test]
    fn short_stroke_yields_empty_result() {
        let mut analyzer = StrokeAnalyzer::with_seed(test_alphabet(), 3);
        for stroke in [vec![], vec![pt(4.0, 4.0)]] {
            let result = analyzer.analyze(&stroke, "AB", Mode::Trace).unwrap();
            assert_eq!(result.overall_score, 0.0);
            assert_eq!(result.word_feedback, "Draw something!");
            assert_eq!(result.letter_results.len(), 2);
            for r in &result.letter_results {
                assert_eq!(r.score, 0);
                assert_eq!(r.feedback, "No strokes");
                assert_eq!(r.directions, "");
            }
        }
    }

    #[test]
    fn short_segment_gets_placeholder_independently() {
        let mut analyzer = StrokeAnalyzer::with_seed(test_alphabet(), 5);
        // bucket 0 gets four points, bucket 1 exactly one
        let stroke = vec![
            pt(0.0, 0.0),
            pt(1.0, 2.0),
            pt(2.0, 4.0),
            pt(3.0, 6.0),
            pt(100.0, 0.0),
        ];
        let result = analyzer.analyze(&stroke, "AB", Mode::Trace).unwrap();
        let b = &result.letter_results[1];
        assert_eq!((b.score, b.feedback.as_str(), b.directions.as_str()), (0, "No strokes", ""));
        let a = &result.letter_results[0];
        assert!(a.score > 0);
        assert!(!a.directions.is_empty());
    }

    #[test]
    fn unknown_letter_blends_against_neutral_seventy() {
        let seed = 11;
        let mut analyzer = StrokeAnalyzer::with_seed(test_alphabet(), seed);
        let stroke = vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)];
        let result = analyzer.analyze(&stroke, "Z", Mode::Write).unwrap();

        let mut rng = fastrand::Rng::with_seed(seed);
        let shape = scorer::shape_score(Mode::Write, &mut rng);
        assert_eq!(result.letter_results[0].score, scorer::blend(shape, 70.0));
    }

    #[test]
    fn scores_stay_in_percent_range() {
        let mut analyzer = StrokeAnalyzer::with_seed(test_alphabet(), 99);
        for _ in 0..50 {
            let result = analyzer
                .analyze(&spread_stroke(3), "ABZ", Mode::Write)
                .unwrap();
            for r in &result.letter_results {
                assert!(r.score <= 100);
            }
            assert!((0.0..=100.0).contains(&result.overall_score));
        }
    }

    #[test]
    fn word_feedback_bands() {
        assert_eq!(word_feedback(81.0), "Excellent! Keep practicing!");
        assert_eq!(word_feedback(80.0), "Good job! Focus on problem letters");
        assert_eq!(word_feedback(66.0), "Good job! Focus on problem letters");
        assert_eq!(word_feedback(65.0), "Try again - use tracing mode");
        assert_eq!(word_feedback(0.0), "Try again - use tracing mode");
    }

    #[test]
    fn invalid_words_are_rejected_before_scoring() {
        let mut analyzer = StrokeAnalyzer::with_seed(test_alphabet(), 2);
        let stroke = spread_stroke(2);
        assert_eq!(
            analyzer.analyze(&stroke, "", Mode::Trace).unwrap_err(),
            AnalyzeError::EmptyWord
        );
        assert_eq!(
            analyzer.analyze(&stroke, "Ab", Mode::Trace).unwrap_err(),
            AnalyzeError::UnsupportedChar('b')
        );
        assert_eq!(
            analyzer.analyze(&stroke, "A B", Mode::Trace).unwrap_err(),
            AnalyzeError::UnsupportedChar(' ')
        );
    }

    #[test]
    fn direction_strings_survive_into_results() {
        let mut analyzer = StrokeAnalyzer::with_seed(test_alphabet(), 8);
        let stroke = vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)];
        let result = analyzer.analyze(&stroke, "A", Mode::Trace).unwrap();
        assert_eq!(result.letter_results[0].directions, "RD");
    }
}
