use itertools::Itertools;
use lazy_static::lazy_static;
use log::info;
use std::collections::HashMap;
use std::time::Duration;

pub mod question;
#[cfg(test)]
mod tests;

pub use question::{Difficulty, Question, Quiz};

const MIN_QUIZ_DURATION_SECONDS: u64 = 180;
const SECONDS_PER_QUESTION: u64 = 30;
const DEFAULT_CATEGORY: &str = "General";
const FIELDS_PER_ROW: usize = 8;

lazy_static! {
    static ref TOPIC_CATEGORIES: HashMap<&'static str, &'static str> = [
        ("Computer Science Fundamentals", "Technology"),
        ("Physics", "Science"),
        ("Biology", "Science"),
        ("Mechanical Engineering", "Engineering"),
        ("General Knowledge", "General"),
        ("Programming", "Technology"),
        ("Android Development", "Technology"),
        ("Aptitude", "Mathematics"),
        ("Movies", "Entertainment"),
        ("Literature", "Arts & Literature"),
    ]
    .iter()
    .cloned()
    .collect();
}

struct SourceRow {
    topic: String,
    prompt: String,
    options: Vec<String>,
    correct_answer: String,
    difficulty: Difficulty,
}

/// The set of quizzes available in the lobby, one per distinct topic in the
/// source dataset.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    quizzes: Vec<Quiz>,
}

impl Catalog {
    /// Builds a catalog from tabular text: a header row followed by one row per
    /// question. Malformed rows are dropped; empty or header-only input yields
    /// an empty catalog. This never fails.
    pub fn parse(source: &str) -> Catalog {
        let rows = source
            .trim()
            .lines()
            .skip(1) // header
            .filter_map(parse_row);

        // Group rows by topic, preserving first-appearance order of topics and
        // row order within each topic.
        let mut groups: Vec<(String, Vec<SourceRow>)> = Vec::new();
        for row in rows {
            match groups.iter_mut().find(|(topic, _)| *topic == row.topic) {
                Some((_, group)) => group.push(row),
                None => groups.push((row.topic.clone(), vec![row])),
            }
        }

        let quizzes = groups
            .into_iter()
            .enumerate()
            .map(|(index, (topic, rows))| build_quiz(index, topic, rows))
            .collect::<Vec<_>>();

        info!("Loaded {} quizzes from question bank", quizzes.len());
        Catalog { quizzes }
    }

    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    pub fn get(&self, quiz_id: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id == quiz_id)
    }

    pub fn categories(&self) -> Vec<&str> {
        self.quizzes
            .iter()
            .map(|q| q.category.as_str())
            .unique()
            .collect()
    }
}

fn build_quiz(index: usize, topic: String, rows: Vec<SourceRow>) -> Quiz {
    let duration_seconds = (rows.len() as u64 * SECONDS_PER_QUESTION).max(MIN_QUIZ_DURATION_SECONDS);
    let category = TOPIC_CATEGORIES
        .get(topic.as_str())
        .copied()
        .unwrap_or(DEFAULT_CATEGORY);
    let questions = rows
        .into_iter()
        .enumerate()
        .map(|(question_index, row)| Question {
            id: format!("q{}", question_index + 1),
            prompt: row.prompt,
            options: row.options,
            correct_answer: row.correct_answer,
            difficulty: row.difficulty,
        })
        .collect();
    Quiz {
        id: (index + 1).to_string(),
        description: format!("Test your knowledge in {}", topic),
        title: topic,
        duration: Duration::from_secs(duration_seconds),
        category: category.to_owned(),
        questions,
    }
}

fn parse_row(line: &str) -> Option<SourceRow> {
    let fields = split_fields(line);
    if fields.len() < FIELDS_PER_ROW {
        // Malformed row tolerance: drop it, do not error.
        return None;
    }
    let mut fields = fields.into_iter();
    let topic = fields.next()?;
    let prompt = fields.next()?;
    let options = fields.by_ref().take(4).collect();
    let correct_answer = fields.next()?;
    let difficulty = Difficulty::parse(&fields.next()?);
    Some(SourceRow {
        topic,
        prompt,
        options,
        correct_answer,
        difficulty,
    })
}

/// Splits one comma-delimited line into trimmed fields. A double quote toggles
/// quoting and is never emitted; commas inside a quoted run are literal. This
/// is deliberately the simple toggle scanner, not an RFC4180 reader: a doubled
/// quote is two toggles, not an escaped quote.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for character in line.chars() {
        match character {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_owned());
                current.clear();
            }
            other => current.push(other),
        }
    }
    fields.push(current.trim().to_owned());
    fields
}
