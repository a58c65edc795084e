/// Minimum similarity for an answer to count as correct
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Separator between accepted alternatives in an expected answer
pub const ALTERNATIVE_SEPARATOR: char = '/';

pub const REVEAL_TOKEN: &str = "?";
pub const SKIP_TOKEN: &str = "/";
pub const QUIT_TOKEN: &str = "q";

/// Result of grading one answer attempt
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    Skipped,
    Revealed,
    QuitRequested,
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct)
    }

    /// Whether the expected answer must be shown (and acknowledged) before moving on
    pub fn shows_answer(&self) -> bool {
        matches!(self, Outcome::Incorrect | Outcome::Revealed)
    }

    pub fn ends_quiz(&self) -> bool {
        matches!(self, Outcome::QuitRequested)
    }
}

/// Grade `input` against `expected`, which may hold several `/`-separated alternatives.
pub fn grade(input: &str, expected: &str) -> Outcome {
    match input {
        REVEAL_TOKEN => Outcome::Revealed,
        SKIP_TOKEN => Outcome::Skipped,
        QUIT_TOKEN => Outcome::QuitRequested,
        _ => {
            let matched = expected
                .split(ALTERNATIVE_SEPARATOR)
                .map(str::trim)
                .any(|alt| similarity(input, alt) >= SIMILARITY_THRESHOLD);
            if matched {
                Outcome::Correct
            } else {
                Outcome::Incorrect
            }
        }
    }
}

/// Case-insensitive similarity in `[0, 1]`: `2 * LCS / (len(a) + len(b))`.
///
/// Lengths are counted in chars. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * lcs_len(&a, &b) as f64 / total as f64
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    // single-row DP; `prev` holds the previous row's diagonal
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut prev = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                prev + 1
            } else {
                above.max(row[j])
            };
            prev = above;
        }
    }
    row[b.len()]
}
