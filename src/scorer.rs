//! Per-letter scoring.
//!
//! A letter's score blends two parts: a jittered "shape" score whose base
//! depends on the practice mode, and a direction-similarity score against
//! the letter's profile. Feedback text is selected from the shape score
//! alone; the numeric result uses the blend.

use crate::config::LetterProfile;
use crate::directions;
use crate::stroke::{Mode, Point};

const TRACE_BASE: i32 = 80;
const WRITE_BASE: i32 = 60;
// jitter is uniform in [-15, 14]
const JITTER_LOW: i32 = -15;
const JITTER_HIGH: i32 = 15;

const NEUTRAL_DIRECTION_SCORE: f64 = 70.0;

/// Scores one letter segment. Returns the blended 0-100 score, the feedback
/// line, and the segment's encoded direction string. Callers must pass a
/// segment with at least two points.
pub fn score_letter(
    segment: &[Point],
    target: char,
    mode: Mode,
    profile: Option<&LetterProfile>,
    rng: &mut fastrand::Rng,
) -> (u8, String, String) {
    let encoded = directions::encode(segment);
    let shape = shape_score(mode, rng);
    let dir = direction_score(&encoded, profile);
    (blend(shape, dir), letter_feedback(shape, target), encoded)
}

/// Stand-in for unmodeled shape fidelity: the mode's base score plus
/// bounded uniform jitter, clamped to [0, 100].
pub fn shape_score(mode: Mode, rng: &mut fastrand::Rng) -> i32 {
    let base = match mode {
        Mode::Trace => TRACE_BASE,
        Mode::Write => WRITE_BASE,
    };
    (base + rng.i32(JITTER_LOW..JITTER_HIGH)).clamp(0, 100)
}

/// Similarity of the drawn directions to the profile's expected string,
/// mapped into [70, 100]. Letters without a profile score a flat 70.
pub fn direction_score(encoded: &str, profile: Option<&LetterProfile>) -> f64 {
    match profile {
        None => NEUTRAL_DIRECTION_SCORE,
        Some(p) => {
            let ratio = similarity_ratio(encoded.as_bytes(), p.directions.as_bytes());
            (NEUTRAL_DIRECTION_SCORE + ratio * 30.0).min(100.0)
        }
    }
}

pub fn blend(shape: i32, dir: f64) -> u8 {
    (shape as f64 * 0.6 + dir * 0.4).round() as u8
}

pub fn letter_feedback(shape: i32, target: char) -> String {
    if shape > 85 {
        format!("Perfect {target}!")
    } else if shape > 70 {
        format!("Good {target} - minor issues")
    } else if shape > 50 {
        format!("{target} needs practice")
    } else if shape > 30 {
        format!("Poor {target} - trace slowly")
    } else {
        format!("Retry {target}")
    }
}

/// Ratcliff/Obershelp similarity: twice the total length of the matching
/// blocks over the combined length. Two empty sequences are identical.
pub fn similarity_ratio(a: &[u8], b: &[u8]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_len(a, b) as f64 / total as f64
}

// Total matched length: take the longest common substring, then recurse on
// the pieces to its left and right.
fn matching_len(a: &[u8], b: &[u8]) -> usize {
    let (a_start, b_start, len) = longest_match(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_len(&a[..a_start], &b[..b_start])
        + matching_len(&a[a_start + len..], &b[b_start + len..])
}

// First longest common substring as (start in a, start in b, length).
fn longest_match(a: &[u8], b: &[u8]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // run_len[j + 1]: length of the common run ending at a[i], b[j]
    let mut prev = vec![0usize; b.len() + 1];
    for (i, &ac) in a.iter().enumerate() {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, &bc) in b.iter().enumerate() {
            if ac == bc {
                let run = prev[j] + 1;
                cur[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        prev = cur;
    }
    best
}
