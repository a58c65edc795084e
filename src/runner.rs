use crate::console::Console;
use crate::error::Result;
use crate::grader::{grade, Outcome};
use crate::report::SessionReport;
use crate::selector::select;
use crate::session::SessionState;
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::debug;

pub const INSTRUCTIONS: [&str; 4] = [
    "Enter the answer and hit enter",
    "Enter ? to see the answer",
    "Enter / to skip",
    "Enter q to quit",
];

/// Prompt -> expected answer for everything missed in this run.
///
/// Entries keep the order in which they were first missed; a repeat miss of
/// the same prompt overwrites the expected answer in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrongAnswerLog {
    entries: Vec<(String, String)>,
}

impl WrongAnswerLog {
    pub fn record(&mut self, prompt: &str, expected: &str) {
        match self.entries.iter_mut().find(|(p, _)| p == prompt) {
            Some(entry) => entry.1 = expected.to_string(),
            None => self
                .entries
                .push((prompt.to_string(), expected.to_string())),
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    NotStarted,
    Running,
    Finished,
}

/// Drives one pass over the selected questions, mutating the session's statistics
pub struct QuizRunner<'a, C: Console> {
    session: &'a mut SessionState,
    console: &'a mut C,
    state: RunnerState,
    wrong_answers: WrongAnswerLog,
    answered: usize,
    correct: usize,
    started_at: Option<Instant>,
    time_taken: Duration,
}

impl<'a, C: Console> QuizRunner<'a, C> {
    pub fn new(session: &'a mut SessionState, console: &'a mut C) -> Self {
        Self {
            session,
            console,
            state: RunnerState::NotStarted,
            wrong_answers: WrongAnswerLog::default(),
            answered: 0,
            correct: 0,
            started_at: None,
            time_taken: Duration::ZERO,
        }
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn wrong_answers(&self) -> &WrongAnswerLog {
        &self.wrong_answers
    }

    /// Ask every index in order until done or the user quits.
    ///
    /// End of input is handled exactly like `q`.
    pub fn run(&mut self, indices: &[usize]) -> Result<SessionReport> {
        self.state = RunnerState::Running;
        let total = indices.len();

        for &index in indices {
            if self.started_at.is_none() {
                self.started_at = Some(Instant::now());
            }

            let outcome = self.ask(index)?;
            self.answered += 1;
            self.console.progress(self.answered, total);

            if outcome.ends_quiz() {
                debug!(answered = self.answered, total, "quit requested");
                break;
            }
            self.console.clear()?;
        }

        self.time_taken = self
            .started_at
            .map(|start| start.elapsed())
            .unwrap_or_default();
        self.state = RunnerState::Finished;
        Ok(self.report())
    }

    /// Ask one question, grade it and record the result
    fn ask(&mut self, index: usize) -> Result<Outcome> {
        let direction = self.session.direction;
        let (prompt, expected) = self.session.question(index);
        let (prompt, expected) = (prompt.to_string(), expected.to_string());

        let outcome = match self.console.prompt(&format!("{prompt}: "))? {
            Some(answer) => grade(&answer, &expected),
            None => Outcome::QuitRequested,
        };

        match outcome {
            Outcome::Revealed => {
                self.console
                    .acknowledge(&format!("Correct answer: {expected}"))?;
            }
            Outcome::Incorrect => {
                self.console
                    .acknowledge(&format!("Incorrect!, Correct answer: {expected}"))?;
            }
            _ => {}
        }

        if outcome.is_correct() {
            self.session.statistics.record_correct(direction, index);
            self.correct += 1;
        } else {
            self.session.statistics.record_incorrect(direction, index);
            self.wrong_answers.record(&prompt, &expected);
        }
        debug!(index, ?outcome, "graded");
        Ok(outcome)
    }

    /// Totals for the active direction plus what happened in this run
    pub fn report(&self) -> SessionReport {
        let direction = self.session.direction;
        let counters = self.session.statistics.counters(direction);
        SessionReport {
            direction,
            total_corrects: counters.total_corrects(),
            total_incorrects: counters.total_incorrects(),
            time_taken: self.time_taken,
            answered: self.answered,
            correct: self.correct,
            wrong_answers: self.wrong_answers.entries().to_vec(),
        }
    }
}

/// Select this run's questions, show the instructions and run the quiz.
///
/// Selection errors surface before any question is asked.
pub fn play<C: Console, R: Rng + ?Sized>(
    session: &mut SessionState,
    console: &mut C,
    rng: &mut R,
) -> Result<SessionReport> {
    let indices = select(
        &session.statistics,
        session.direction,
        session.len(),
        session.resumed,
        session.max_questions,
        rng,
    )?;
    for line in INSTRUCTIONS {
        console.say(line)?;
    }
    QuizRunner::new(session, console).run(&indices)
}
