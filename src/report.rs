use crate::stats::Direction;
use std::fmt;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// End-of-session summary
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub direction: Direction,
    /// All-time corrects for the active direction
    pub total_corrects: u64,
    /// All-time incorrects for the active direction
    pub total_incorrects: u64,
    pub time_taken: Duration,
    /// Questions answered in this run, including a quit item
    pub answered: usize,
    /// Correct answers in this run
    pub correct: usize,
    /// Missed prompts and their expected answers, in first-missed order
    pub wrong_answers: Vec<(String, String)>,
}

impl SessionReport {
    pub fn accuracy(&self) -> Option<f64> {
        match self.answered {
            0 => None,
            n => Some(self.correct as f64 * 100.0 / n as f64),
        }
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Direction: {}", self.direction)?;
        match self.accuracy() {
            Some(acc) => writeln!(
                f,
                "This run: {}/{} correct ({acc:.0}%)",
                self.correct, self.answered
            )?,
            None => writeln!(f, "This run: no questions answered")?,
        }
        writeln!(f, "Corrects: {}", self.total_corrects)?;
        writeln!(f, "Incorrects: {}", self.total_incorrects)?;
        writeln!(f, "Time taken: {:.2}s", self.time_taken.as_secs_f64())?;

        if self.wrong_answers.is_empty() {
            return Ok(());
        }
        writeln!(f, "Incorrects:")?;
        let width = self
            .wrong_answers
            .iter()
            .map(|(prompt, _)| prompt.width())
            .max()
            .unwrap_or(0);
        for (prompt, expected) in &self.wrong_answers {
            let pad = " ".repeat(width - prompt.width());
            writeln!(f, "{prompt}{pad}  ->  {expected}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(wrong: &[(&str, &str)]) -> SessionReport {
        SessionReport {
            direction: Direction::Forward,
            total_corrects: 7,
            total_incorrects: 3,
            time_taken: Duration::from_millis(12_340),
            answered: 4,
            correct: 3,
            wrong_answers: wrong
                .iter()
                .map(|(p, e)| (p.to_string(), e.to_string()))
                .collect(),
        }
    }

    #[test]
    fn renders_totals_and_time() {
        let text = report(&[]).to_string();
        assert!(text.contains("Corrects: 7"));
        assert!(text.contains("Incorrects: 3"));
        assert!(text.contains("Time taken: 12.34s"));
        assert!(text.contains("This run: 3/4 correct (75%)"));
        assert!(!text.contains("->"));
    }

    #[test]
    fn lists_misses_in_order_with_aligned_arrows() {
        let text = report(&[("kat", "cat"), ("olifant", "elephant")]).to_string();
        let lines: Vec<&str> = text.lines().collect();
        let tail = &lines[lines.len() - 2..];
        assert_eq!(tail[0], "kat      ->  cat");
        assert_eq!(tail[1], "olifant  ->  elephant");
    }

    #[test]
    fn accuracy_is_none_without_answers() {
        let mut r = report(&[]);
        r.answered = 0;
        r.correct = 0;
        assert_eq!(r.accuracy(), None);
        assert!(r.to_string().contains("no questions answered"));
    }
}
