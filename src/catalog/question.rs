use std::time::Duration;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn parse(value: &str) -> Difficulty {
        match value.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub difficulty: Difficulty,
}

impl Question {
    /// Grading is trimmed, case-sensitive string equality. No partial credit.
    pub fn is_answer_correct(&self, answer: &str) -> bool {
        answer.trim() == self.correct_answer.trim()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: Duration,
    pub category: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn get_question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}
