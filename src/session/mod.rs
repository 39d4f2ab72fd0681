use anyhow::*;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::collections::HashMap;
use std::time::Duration;

use crate::catalog::Quiz;


/// The graded record of one completed quiz session. Produced exactly once per
/// session and never mutated afterwards; it is display state, not persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Attempt {
    pub quiz_id: String,
    pub answers: HashMap<String, String>,
    pub correct_count: usize,
    pub total_questions: usize,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug)]
struct ActiveSession {
    quiz: Quiz,
    answers: HashMap<String, String>,
    time_elapsed: Duration,
    time_limit: Duration,
}

impl ActiveSession {
    fn new(quiz: Quiz) -> ActiveSession {
        ActiveSession {
            time_limit: quiz.duration,
            quiz,
            answers: HashMap::new(),
            time_elapsed: Duration::default(),
        }
    }

    fn remaining_time(&self) -> Duration {
        self.time_limit
            .checked_sub(self.time_elapsed)
            .unwrap_or_default()
    }

    fn grade(self) -> Attempt {
        let correct_count = self
            .quiz
            .questions
            .iter()
            .filter(|question| {
                self.answers
                    .get(&question.id)
                    .map_or(false, |answer| question.is_answer_correct(answer))
            })
            .count();
        Attempt {
            quiz_id: self.quiz.id,
            total_questions: self.quiz.questions.len(),
            answers: self.answers,
            correct_count,
            completed_at: Utc::now(),
        }
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    InProgress(ActiveSession),
}

/// The quiz lifecycle state machine: `Idle` until a quiz is started, then
/// `InProgress` while answers accumulate against a countdown, back to `Idle`
/// the moment an [Attempt] is produced. The countdown is plain data on the
/// active session, so there is at most one per engine by construction and
/// replacing the session replaces it.
pub struct SessionEngine {
    current_phase: Phase,
    last_attempt: Option<Attempt>,
}

impl SessionEngine {
    pub fn new() -> SessionEngine {
        SessionEngine {
            current_phase: Phase::Idle,
            last_attempt: None,
        }
    }

    /// Installs a quiz with an empty answer set and a full countdown. Starting
    /// while a session is already in progress silently discards it.
    pub fn start(&mut self, quiz: Quiz) {
        if let Phase::InProgress(session) = &self.current_phase {
            warn!(
                "Discarding in-progress session for quiz {} without grading it",
                session.quiz.id
            );
        }
        info!("Starting quiz {} ({})", quiz.id, quiz.title);
        self.current_phase = Phase::InProgress(ActiveSession::new(quiz));
    }

    /// Upserts an answer. The question id is not validated against the active
    /// quiz; an id the quiz does not contain simply never grades as correct.
    pub fn record_answer(&mut self, question_id: &str, value: &str) -> Result<()> {
        match &mut self.current_phase {
            Phase::InProgress(session) => {
                session
                    .answers
                    .insert(question_id.to_owned(), value.to_owned());
                Ok(())
            }
            Phase::Idle => Err(anyhow!("Cannot record an answer with no quiz in progress")),
        }
    }

    /// Grades the active session and returns to `Idle`. Calling this with no
    /// active session is a caller bug and fails loudly.
    pub fn submit(&mut self) -> Result<Attempt> {
        self.finish()
            .context("Cannot submit with no quiz in progress")
    }

    /// Advances the countdown. Reaching zero auto-submits whatever answers
    /// have been recorded, through the exact same grading path as [submit];
    /// the resulting attempt carries no timed-out marker.
    pub fn tick(&mut self, dt: Duration) -> Option<Attempt> {
        let timed_out = match &mut self.current_phase {
            Phase::InProgress(session) => {
                session.time_elapsed += dt;
                session.time_elapsed >= session.time_limit
            }
            Phase::Idle => false,
        };
        if !timed_out {
            return None;
        }
        info!("Quiz time is up, submitting recorded answers");
        self.finish()
    }

    /// Drops the active session without grading it (leaving the quiz view,
    /// logging out). Distinct from timeout, which grades.
    pub fn abandon(&mut self) {
        if let Phase::InProgress(session) = &self.current_phase {
            info!("Abandoning quiz {} without grading", session.quiz.id);
        }
        self.current_phase = Phase::Idle;
    }

    pub fn active_quiz(&self) -> Option<&Quiz> {
        match &self.current_phase {
            Phase::InProgress(session) => Some(&session.quiz),
            Phase::Idle => None,
        }
    }

    pub fn recorded_answer(&self, question_id: &str) -> Option<&str> {
        match &self.current_phase {
            Phase::InProgress(session) => {
                session.answers.get(question_id).map(|s| s.as_str())
            }
            Phase::Idle => None,
        }
    }

    pub fn remaining_time(&self) -> Option<Duration> {
        match &self.current_phase {
            Phase::InProgress(session) => Some(session.remaining_time()),
            Phase::Idle => None,
        }
    }

    pub fn last_attempt(&self) -> Option<&Attempt> {
        self.last_attempt.as_ref()
    }

    fn finish(&mut self) -> Option<Attempt> {
        match std::mem::replace(&mut self.current_phase, Phase::Idle) {
            Phase::InProgress(session) => {
                let attempt = session.grade();
                info!(
                    "Graded quiz {}: {}/{} correct",
                    attempt.quiz_id, attempt.correct_count, attempt.total_questions
                );
                self.last_attempt = Some(attempt.clone());
                Some(attempt)
            }
            Phase::Idle => None,
        }
    }
}

impl Default for SessionEngine {
    fn default() -> Self {
        SessionEngine::new()
    }
}
