//! Canned answers and the uniform answer draw.
//!
//! Answers keep the line breaks used to lay them out inside the ball's
//! triangle window. Use [`plain_text`] to get the single-line form.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The twenty canned answers, in display order.
pub const ANSWERS: [&str; 20] = [
    "It is\n certain",
    "It is\n decidedly\n so",
    "Without\n a doubt",
    "Yes\n definitely",
    "You may\n rely on\n it",
    "As I\n see it,\n yes",
    "Most\n likely",
    "Outlook\n good",
    "Yes",
    "Signs\n point to\n yes",
    "Reply\n hazy, try again",
    "Ask again\n later",
    "Better\n not tell\n you\n now",
    "Cannot\n predict\n now",
    "Concentrate\n and ask\n again",
    "Don't count\n on it",
    "My reply\n is no",
    "My\n sources\n say no",
    "Outlook\n not so\n good",
    "Very\n doubtful",
];

/// Answers that earn a celebration, in single-line form.
pub const AFFIRMATIVE: [&str; 3] = ["It is certain", "Yes definitely", "You may rely on it"];

/// Text shown in the ball's window before the first reveal.
pub const IDLE_FACE: &str = "8";

/// Uniform random draw over [`ANSWERS`].
///
/// Draws are independent; the selector carries no state besides its RNG.
#[derive(Debug, Clone)]
pub struct AnswerSelector<R = StdRng> {
    rng: R,
}

impl AnswerSelector<StdRng> {
    /// Creates a selector seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a deterministic selector.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for AnswerSelector<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> AnswerSelector<R> {
    /// Wraps an arbitrary RNG.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draws one answer with probability 1/20.
    pub fn draw(&mut self) -> &'static str {
        ANSWERS[self.rng.gen_range(0..ANSWERS.len())]
    }
}

/// Collapses an answer's layout line breaks into single spaces.
///
/// ```rust
/// assert_eq!(magic8::answer::plain_text("You may\n rely on\n it"), "You may rely on it");
/// ```
pub fn plain_text(answer: &str) -> String {
    answer
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns true if the answer is one of the celebrated affirmatives.
pub fn is_affirmative(answer: &str) -> bool {
    let plain = plain_text(answer);
    AFFIRMATIVE.contains(&plain.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_list_has_twenty_distinct_entries() {
        let mut unique: Vec<&str> = ANSWERS.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn test_draw_returns_listed_answer() {
        let mut selector = AnswerSelector::seeded(7);
        for _ in 0..100 {
            assert!(ANSWERS.contains(&selector.draw()));
        }
    }

    #[test]
    fn test_seeded_selectors_agree() {
        let mut a = AnswerSelector::seeded(99);
        let mut b = AnswerSelector::seeded(99);
        for _ in 0..50 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_draw_is_uniform() {
        let mut selector = AnswerSelector::seeded(2024);
        let samples = 200_000;
        let mut counts = [0usize; 20];
        for _ in 0..samples {
            let answer = selector.draw();
            let idx = ANSWERS.iter().position(|a| *a == answer).unwrap();
            counts[idx] += 1;
        }

        // Expected 10_000 per answer, std dev ~97; allow a wide margin.
        let expected = samples / ANSWERS.len();
        for (idx, count) in counts.iter().enumerate() {
            let diff = (*count as i64 - expected as i64).abs();
            assert!(diff < 600, "answer {} drawn {} times", idx, count);
        }
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(plain_text("It is\n certain"), "It is certain");
        assert_eq!(plain_text("Yes"), "Yes");
        assert_eq!(plain_text("Reply\n hazy, try again"), "Reply hazy, try again");
    }

    #[test]
    fn test_affirmative_subset() {
        let affirmative: Vec<&str> = ANSWERS
            .iter()
            .copied()
            .filter(|a| is_affirmative(a))
            .collect();
        assert_eq!(
            affirmative,
            vec!["It is\n certain", "Yes\n definitely", "You may\n rely on\n it"]
        );
        assert!(!is_affirmative("Yes"));
        assert!(!is_affirmative("It is\n decidedly\n so"));
    }
}
