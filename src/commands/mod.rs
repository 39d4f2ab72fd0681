use anyhow::*;
use itertools::Itertools;
use log::debug;
use std::fmt::Write as _;
use std::time::Duration;

use crate::app::App;
use crate::auth;
use crate::room::MessageKind;
use crate::store::ProgressStore;


const COUNTDOWN_BEFORE_ROOM_QUIZ: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Help,
    Login { email: String, password: String },
    Logout,
    Quizzes,
    Start { quiz_id: String },
    Answer { question_id: String, value: String },
    Submit,
    Leave,
    Time,
    Results,
    Profile,
    Room(RoomCommand),
    Quit,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RoomCommand {
    Create,
    Show,
    Ready { player: String },
    Chat { message: String },
    Kick { player: String },
    Begin,
    Cancel,
    Leave,
}

pub fn parse(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let keyword = words.next().context("Empty command")?;
    let command = match keyword {
        "help" => Command::Help,
        "login" => Command::Login {
            email: words
                .next()
                .context("Usage: login <email> <password>")?
                .to_owned(),
            password: words
                .next()
                .context("Usage: login <email> <password>")?
                .to_owned(),
        },
        "logout" => Command::Logout,
        "quizzes" | "lobby" => Command::Quizzes,
        "start" => Command::Start {
            quiz_id: words.next().context("Usage: start <quiz-id>")?.to_owned(),
        },
        "answer" => {
            let question_id = words.next().context("Usage: answer <question-id> <value>")?;
            let value = words.join(" ");
            if value.is_empty() {
                return Err(anyhow!("Usage: answer <question-id> <value>"));
            }
            Command::Answer {
                question_id: question_id.to_owned(),
                value,
            }
        }
        "submit" => Command::Submit,
        "leave" => Command::Leave,
        "time" => Command::Time,
        "results" => Command::Results,
        "profile" => Command::Profile,
        "room" => Command::Room(parse_room_command(&mut words)?),
        "quit" | "exit" => Command::Quit,
        other => return Err(anyhow!("Unknown command: {}", other)),
    };
    Ok(command)
}

fn parse_room_command<'a, I: Iterator<Item = &'a str>>(words: &mut I) -> Result<RoomCommand> {
    let keyword = words.next().unwrap_or("show");
    let command = match keyword {
        "create" => RoomCommand::Create,
        "show" => RoomCommand::Show,
        "ready" => RoomCommand::Ready {
            player: words.join(" "),
        },
        "chat" => {
            let message = words.join(" ");
            if message.is_empty() {
                return Err(anyhow!("Usage: room chat <message>"));
            }
            RoomCommand::Chat { message }
        }
        "kick" => {
            let player = words.join(" ");
            if player.is_empty() {
                return Err(anyhow!("Usage: room kick <player>"));
            }
            RoomCommand::Kick { player }
        }
        "begin" => RoomCommand::Begin,
        "cancel" => RoomCommand::Cancel,
        "leave" => RoomCommand::Leave,
        other => return Err(anyhow!("Unknown room command: {}", other)),
    };
    Ok(command)
}

/// Runs one command against the application context and renders the outcome.
pub fn execute<S: ProgressStore>(app: &mut App<S>, command: Command) -> Result<String> {
    match command {
        Command::Help => Ok(help_text()),
        Command::Login { email, password } => match app.login(&email, &password) {
            // Deliberately the same message for unknown email and wrong
            // password.
            None => {
                if !auth::is_authorized_email(&email) {
                    debug!("Login attempt for an email outside the allow-list");
                }
                Ok("Invalid credentials".to_owned())
            }
            Some(user) => Ok(format!("Welcome back, {}!", user.name)),
        },
        Command::Logout => {
            app.logout();
            Ok("Logged out".to_owned())
        }
        Command::Quizzes => Ok(render_lobby(app)),
        Command::Start { quiz_id } => {
            let quiz = app.start_quiz(&quiz_id)?;
            let mut text = format!(
                "{} — {} ({} questions, {})\n",
                quiz.title,
                quiz.description,
                quiz.question_count(),
                format_duration(quiz.duration)
            );
            for question in &quiz.questions {
                let _ = writeln!(
                    text,
                    "[{}] ({}) {}",
                    question.id,
                    question.difficulty.as_str(),
                    question.prompt
                );
                for option in &question.options {
                    let _ = writeln!(text, "    - {}", option);
                }
            }
            text.push_str("Answer with: answer <question-id> <value>");
            Ok(text)
        }
        Command::Answer { question_id, value } => {
            app.record_answer(&question_id, &value)?;
            let recorded = app.recorded_answer(&question_id).unwrap_or("").to_owned();
            match app
                .active_quiz()
                .and_then(|quiz| quiz.get_question(&question_id))
            {
                Some(question) => Ok(format!("{} -> {}", question.prompt, recorded)),
                None => Ok(format!("Recorded answer for {}", question_id)),
            }
        }
        Command::Submit => {
            let attempt = app.submit_quiz()?;
            Ok(format!(
                "Scored {}/{} on quiz {}",
                attempt.correct_count, attempt.total_questions, attempt.quiz_id
            ))
        }
        Command::Leave => {
            app.abandon_quiz();
            Ok("Left the quiz without submitting".to_owned())
        }
        Command::Time => match app.remaining_time() {
            Some(remaining) => Ok(format!("Time remaining: {}", format_duration(remaining))),
            None => Ok("No quiz in progress".to_owned()),
        },
        Command::Results => match app.last_attempt() {
            None => Ok("No attempt yet".to_owned()),
            Some(attempt) => {
                let mut text = format!(
                    "Last attempt (quiz {}): {}/{} correct, completed {}\n",
                    attempt.quiz_id,
                    attempt.correct_count,
                    attempt.total_questions,
                    attempt.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
                let mut question_ids: Vec<&String> = attempt.answers.keys().collect();
                question_ids.sort();
                for question_id in question_ids {
                    let _ = writeln!(text, "  {} -> {}", question_id, attempt.answers[question_id]);
                }
                Ok(text.trim_end().to_owned())
            }
        },
        Command::Profile => match app.current_user() {
            None => Ok("Not logged in".to_owned()),
            Some(user) => Ok(format!(
                "{} <{}>\nScore: {}\nQuizzes completed: {}",
                user.name, user.email, user.score, user.quizzes_completed
            )),
        },
        Command::Room(room_command) => execute_room(app, room_command),
        Command::Quit => Ok("Bye!".to_owned()),
    }
}

fn execute_room<S: ProgressStore>(app: &mut App<S>, command: RoomCommand) -> Result<String> {
    match command {
        RoomCommand::Create => {
            let room = app.create_room(Default::default())?;
            Ok(format!("Created room {}", room.code()))
        }
        RoomCommand::Show => match app.room() {
            None => Ok("Not in a room".to_owned()),
            Some(room) => {
                let mut text = format!(
                    "Room {} — topic: {} ({})\n",
                    room.code(),
                    room.settings().topic,
                    room.settings().difficulty.as_str()
                );
                for player in room.players() {
                    let _ = writeln!(
                        text,
                        "  {}{}{} [{}]",
                        player.name,
                        if player.is_host { " (host)" } else { "" },
                        if player.is_online { "" } else { " (away)" },
                        if player.is_ready { "ready" } else { "not ready" }
                    );
                }
                if let Some(remaining) = room.countdown_remaining() {
                    let _ = writeln!(text, "Starting in {}", format_duration(remaining));
                }
                let recent: Vec<_> = room.chat().iter().rev().take(5).collect();
                for message in recent.iter().rev() {
                    match message.kind {
                        MessageKind::System => {
                            let _ = writeln!(text, "  * {}", message.content);
                        }
                        MessageKind::Text => {
                            let _ = writeln!(text, "  <{}> {}", message.sender, message.content);
                        }
                    }
                }
                Ok(text.trim_end().to_owned())
            }
        },
        RoomCommand::Ready { player } => {
            let fallback = app.current_user().map(|u| u.name.clone());
            let name = if player.is_empty() {
                fallback.context("Log in first")?
            } else {
                player
            };
            let room = app.room_mut().context("Not in a room")?;
            room.toggle_ready(&name)?;
            Ok(format!("Toggled ready state for {}", name))
        }
        RoomCommand::Chat { message } => {
            let sender = app
                .current_user()
                .map(|u| u.name.clone())
                .context("Log in first")?;
            let room = app.room_mut().context("Not in a room")?;
            room.post_message(&sender, &message);
            Ok("Sent".to_owned())
        }
        RoomCommand::Kick { player } => {
            let room = app.room_mut().context("Not in a room")?;
            room.kick(&player)?;
            Ok(format!("Kicked {}", player))
        }
        RoomCommand::Begin => {
            let room = app.room_mut().context("Not in a room")?;
            room.start_countdown(COUNTDOWN_BEFORE_ROOM_QUIZ);
            Ok("Countdown started".to_owned())
        }
        RoomCommand::Cancel => {
            let room = app.room_mut().context("Not in a room")?;
            room.cancel_countdown();
            Ok("Countdown cancelled".to_owned())
        }
        RoomCommand::Leave => {
            app.leave_room();
            Ok("Left the room".to_owned())
        }
    }
}

fn render_lobby<S: ProgressStore>(app: &App<S>) -> String {
    if app.quizzes().is_empty() {
        return "No quizzes available".to_owned();
    }
    let mut text = String::new();
    for category in app.categories() {
        let _ = writeln!(text, "{}:", category);
        for quiz in app.quizzes().iter().filter(|q| q.category == category) {
            let _ = writeln!(
                text,
                "  [{}] {} — {} questions, {}",
                quiz.id,
                quiz.title,
                quiz.question_count(),
                format_duration(quiz.duration)
            );
        }
    }
    text.trim_end().to_owned()
}

fn help_text() -> String {
    [
        "login <email> <password>   Sign in",
        "logout                     Sign out",
        "quizzes                    List available quizzes",
        "start <quiz-id>            Start a quiz",
        "answer <qid> <value>       Record an answer",
        "submit                     Submit the active quiz",
        "leave                      Abandon the active quiz",
        "time                       Show remaining time",
        "results                    Review the last attempt",
        "profile                    Show your profile",
        "room create|show|ready|chat|kick|begin|cancel|leave",
        "quit                       Exit",
    ]
    .join("\n")
}

fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}
