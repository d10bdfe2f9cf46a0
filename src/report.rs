//! Terminal rendering of analysis results.

use crate::analyzer::AnalysisResult;

/// Renders the score panel and per-letter grid. `current_letter` marks the
/// letter the session is working on with a `>`.
pub fn render(result: &AnalysisResult, current_letter: Option<usize>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Overall: {:.0}%  ({})\n",
        result.overall_score,
        score_band(result.overall_score)
    ));
    out.push_str(&result.word_feedback);
    out.push('\n');

    for (i, letter) in result.letter_results.iter().enumerate() {
        let marker = if current_letter == Some(i) { '>' } else { ' ' };
        // direction hint abbreviated to the first three moves
        let hint: String = letter.directions.chars().take(3).collect();
        out.push_str(&format!(
            "{} {}  {:>3}%  {:<3}  {}\n",
            marker, letter.target, letter.score, hint, letter.feedback
        ));
    }
    out
}

fn score_band(score: f64) -> &'static str {
    if score >= 85.0 {
        "excellent"
    } else if score >= 70.0 {
        "good"
    } else if score >= 50.0 {
        "okay"
    } else {
        "poor"
    }
}
