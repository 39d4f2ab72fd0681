use std::time::Duration;

use super::*;

const HEADER: &str = "Topic,Question,OptionA,OptionB,OptionC,OptionD,CorrectAnswer,Difficulty";

fn source_with_rows(rows: &[&str]) -> String {
    let mut source = HEADER.to_owned();
    for row in rows {
        source.push('\n');
        source.push_str(row);
    }
    source
}

#[test]
fn empty_input_yields_empty_catalog() {
    assert!(Catalog::parse("").quizzes().is_empty());
}

#[test]
fn header_only_input_yields_empty_catalog() {
    assert!(Catalog::parse(HEADER).quizzes().is_empty());
}

#[test]
fn groups_rows_by_topic_in_first_appearance_order() {
    let source = source_with_rows(&[
        "Physics,Q1?,A,B,C,D,A,Easy",
        "Movies,Q2?,A,B,C,D,B,Easy",
        "Physics,Q3?,A,B,C,D,C,Medium",
        "Movies,Q4?,A,B,C,D,D,Hard",
        "Biology,Q5?,A,B,C,D,A,Easy",
    ]);
    let catalog = Catalog::parse(&source);
    let titles: Vec<&str> = catalog.quizzes().iter().map(|q| q.title.as_str()).collect();
    assert_eq!(titles, ["Physics", "Movies", "Biology"]);
    let counts: Vec<usize> = catalog
        .quizzes()
        .iter()
        .map(|q| q.question_count())
        .collect();
    assert_eq!(counts, [2, 2, 1]);
}

#[test]
fn preserves_row_order_within_a_quiz() {
    let source = source_with_rows(&[
        "Physics,First?,A,B,C,D,A,Easy",
        "Physics,Second?,A,B,C,D,B,Easy",
        "Physics,Third?,A,B,C,D,C,Easy",
    ]);
    let catalog = Catalog::parse(&source);
    let quiz = &catalog.quizzes()[0];
    let prompts: Vec<&str> = quiz.questions.iter().map(|q| q.prompt.as_str()).collect();
    assert_eq!(prompts, ["First?", "Second?", "Third?"]);
}

#[test]
fn assigns_sequential_identifiers() {
    let source = source_with_rows(&[
        "Physics,Q?,A,B,C,D,A,Easy",
        "Physics,Q?,A,B,C,D,A,Easy",
        "Movies,Q?,A,B,C,D,A,Easy",
    ]);
    let catalog = Catalog::parse(&source);
    assert_eq!(catalog.quizzes()[0].id, "1");
    assert_eq!(catalog.quizzes()[1].id, "2");
    let question_ids: Vec<&str> = catalog.quizzes()[0]
        .questions
        .iter()
        .map(|q| q.id.as_str())
        .collect();
    assert_eq!(question_ids, ["q1", "q2"]);
    // Question ids restart per quiz.
    assert_eq!(catalog.quizzes()[1].questions[0].id, "q1");
}

#[test]
fn drops_rows_with_too_few_fields() {
    let source = source_with_rows(&[
        "Physics,Q1?,A,B,C,D,A,Easy",
        "Physics,missing most fields",
        "Physics,Q2?,A,B,C,D,B,Easy",
    ]);
    let catalog = Catalog::parse(&source);
    assert_eq!(catalog.quizzes()[0].question_count(), 2);
}

#[test]
fn quoted_field_keeps_embedded_commas() {
    let source = source_with_rows(&[
        r#"Physics,What is the speed of light?,"299,792 km/s",B,C,D,"299,792 km/s",Medium"#,
    ]);
    let catalog = Catalog::parse(&source);
    let question = &catalog.quizzes()[0].questions[0];
    assert_eq!(question.options[0], "299,792 km/s");
    assert_eq!(question.correct_answer, "299,792 km/s");
}

#[test]
fn quote_characters_toggle_and_are_dropped() {
    // The scanner is a plain toggle, not RFC4180: a doubled quote opens and
    // closes quoting and never appears in the output field.
    assert_eq!(
        split_fields(r#"a,"b, c",d"#),
        vec!["a".to_owned(), "b, c".to_owned(), "d".to_owned()]
    );
    assert_eq!(
        split_fields(r#""He said ""stop, now"" twice",x"#),
        vec!["He said stop, now twice".to_owned(), "x".to_owned()]
    );
}

#[test]
fn duration_has_a_floor_of_three_minutes() {
    let source = source_with_rows(&[
        "Physics,Q?,A,B,C,D,A,Easy",
        "Physics,Q?,A,B,C,D,A,Easy",
    ]);
    let catalog = Catalog::parse(&source);
    assert_eq!(catalog.quizzes()[0].duration, Duration::from_secs(180));
}

#[test]
fn duration_scales_with_question_count() {
    let rows: Vec<String> = (0..7).map(|_| "Physics,Q?,A,B,C,D,A,Easy".to_owned()).collect();
    let rows: Vec<&str> = rows.iter().map(|r| r.as_str()).collect();
    let catalog = Catalog::parse(&source_with_rows(&rows));
    assert_eq!(catalog.quizzes()[0].duration, Duration::from_secs(210));
}

#[test]
fn maps_known_topics_to_categories() {
    let source = source_with_rows(&[
        "Physics,Q?,A,B,C,D,A,Easy",
        "Ancient History,Q?,A,B,C,D,A,Easy",
    ]);
    let catalog = Catalog::parse(&source);
    assert_eq!(catalog.quizzes()[0].category, "Science");
    // Unknown topics fall back to the default category.
    assert_eq!(catalog.quizzes()[1].category, "General");
}

#[test]
fn difficulty_defaults_to_medium_on_unknown_values() {
    let source = source_with_rows(&["Physics,Q?,A,B,C,D,A,Impossible"]);
    let catalog = Catalog::parse(&source);
    assert_eq!(
        catalog.quizzes()[0].questions[0].difficulty,
        Difficulty::Medium
    );
}

#[test]
fn lists_distinct_categories() {
    let source = source_with_rows(&[
        "Physics,Q?,A,B,C,D,A,Easy",
        "Biology,Q?,A,B,C,D,A,Easy",
        "Movies,Q?,A,B,C,D,A,Easy",
    ]);
    let catalog = Catalog::parse(&source);
    assert_eq!(catalog.categories(), ["Science", "Entertainment"]);
}
