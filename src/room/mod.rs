use anyhow::*;
use chrono::{DateTime, Utc};
use log::info;
use rand::Rng;
use std::time::Duration;

use crate::catalog::Difficulty;


const SHUFFLE_INTERVAL: Duration = Duration::from_secs(5);
const SHUFFLE_CHANCE: f64 = 0.2;
const READY_FLIP_CHANCE: f64 = 0.3;
const CHAT_CHANCE: f64 = 0.1;
const PRESENCE_FLIP_CHANCE: f64 = 0.05;

const SEEDED_PLAYERS: &[&str] = &["QuizWhiz", "BrainBox", "FactFinder"];
const CANNED_CHAT: &[&str] = &[
    "good luck everyone!",
    "ready when you are",
    "let's go",
    "this topic is my jam",
    "one more round after this?",
];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Player {
    pub name: String,
    pub is_host: bool,
    pub is_ready: bool,
    pub is_online: bool,
}

impl Player {
    fn new(name: &str, is_host: bool) -> Player {
        Player {
            name: name.to_owned(),
            is_host,
            is_ready: is_host,
            is_online: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageKind {
    Text,
    System,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChatMessage {
    pub sender: String,
    pub content: String,
    pub kind: MessageKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoomSettings {
    pub topic: String,
    pub difficulty: Difficulty,
    pub question_count: u32,
    pub seconds_per_question: u32,
}

impl Default for RoomSettings {
    fn default() -> Self {
        RoomSettings {
            topic: "Computer Science Fundamentals".to_owned(),
            difficulty: Difficulty::Medium,
            question_count: 10,
            seconds_per_question: 30,
        }
    }
}

/// A pretend multiplayer room. Presence, ready flags and chatter are mutated
/// locally by an injected RNG on a fixed interval; there is no networking and
/// no other client. The countdown reaching zero raises a flag the caller
/// consumes to launch the configured quiz.
pub struct Room<R: Rng> {
    code: String,
    players: Vec<Player>,
    chat: Vec<ChatMessage>,
    settings: RoomSettings,
    countdown: Option<Duration>,
    ready_to_begin: bool,
    time_since_shuffle: Duration,
    rng: R,
}

impl<R: Rng> Room<R> {
    pub fn new(code: &str, host_name: &str, settings: RoomSettings, rng: R) -> Room<R> {
        let mut players = vec![Player::new(host_name, true)];
        for name in SEEDED_PLAYERS {
            players.push(Player::new(name, false));
        }
        let mut room = Room {
            code: code.to_owned(),
            players,
            chat: Vec::new(),
            settings,
            countdown: None,
            ready_to_begin: false,
            time_since_shuffle: Duration::default(),
            rng,
        };
        room.post_system_message(&format!("Room {} created", room.code));
        room
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn settings(&self) -> &RoomSettings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: RoomSettings) {
        self.settings = settings;
        self.post_system_message("Quiz settings updated");
    }

    pub fn countdown_remaining(&self) -> Option<Duration> {
        self.countdown
    }

    /// True once the countdown has completed; consuming it resets the flag.
    pub fn take_ready_to_begin(&mut self) -> bool {
        std::mem::replace(&mut self.ready_to_begin, false)
    }

    pub fn toggle_ready(&mut self, player_name: &str) -> Result<()> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.name == player_name)
            .context("No such player in this room")?;
        player.is_ready = !player.is_ready;
        Ok(())
    }

    pub fn kick(&mut self, player_name: &str) -> Result<()> {
        let index = self
            .players
            .iter()
            .position(|p| p.name == player_name)
            .context("No such player in this room")?;
        if self.players[index].is_host {
            return Err(anyhow!("Cannot kick the host"));
        }
        self.players.remove(index);
        self.post_system_message(&format!("{} was removed from the room", player_name));
        Ok(())
    }

    pub fn post_message(&mut self, sender: &str, content: &str) {
        self.chat.push(ChatMessage {
            sender: sender.to_owned(),
            content: content.to_owned(),
            kind: MessageKind::Text,
            timestamp: Utc::now(),
        });
    }

    pub fn start_countdown(&mut self, duration: Duration) {
        info!("Room {} countdown started", self.code);
        self.countdown = Some(duration);
        self.ready_to_begin = false;
        self.post_system_message("Quiz starting soon, get ready!");
    }

    pub fn cancel_countdown(&mut self) {
        if self.countdown.take().is_some() {
            self.post_system_message("Countdown cancelled");
        }
    }

    /// Advances the countdown and, on the shuffle interval, applies random
    /// local state changes that stand in for other clients.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(remaining) = self.countdown {
            match remaining.checked_sub(dt) {
                Some(left) if left > Duration::default() => self.countdown = Some(left),
                _ => {
                    self.countdown = None;
                    self.ready_to_begin = true;
                    self.post_system_message("The quiz is starting!");
                }
            }
        }

        self.time_since_shuffle += dt;
        while self.time_since_shuffle >= SHUFFLE_INTERVAL {
            self.time_since_shuffle -= SHUFFLE_INTERVAL;
            self.shuffle();
        }
    }

    fn shuffle(&mut self) {
        if self.rng.gen_bool(SHUFFLE_CHANCE) {
            for player in self.players.iter_mut().filter(|p| !p.is_host) {
                if self.rng.gen_bool(READY_FLIP_CHANCE) {
                    player.is_ready = !player.is_ready;
                }
            }
        }

        if self.rng.gen_bool(CHAT_CHANCE) {
            let speakers: Vec<String> = self
                .players
                .iter()
                .filter(|p| !p.is_host && p.is_online)
                .map(|p| p.name.clone())
                .collect();
            if !speakers.is_empty() {
                let speaker = speakers[self.rng.gen_range(0, speakers.len())].clone();
                let line = CANNED_CHAT[self.rng.gen_range(0, CANNED_CHAT.len())];
                self.post_message(&speaker, line);
            }
        }

        if self.rng.gen_bool(PRESENCE_FLIP_CHANCE) {
            let candidates: Vec<usize> = self
                .players
                .iter()
                .enumerate()
                .filter(|(_i, p)| !p.is_host)
                .map(|(i, _p)| i)
                .collect();
            if !candidates.is_empty() {
                let index = candidates[self.rng.gen_range(0, candidates.len())];
                self.players[index].is_online = !self.players[index].is_online;
            }
        }
    }

    fn post_system_message(&mut self, content: &str) {
        self.chat.push(ChatMessage {
            sender: "system".to_owned(),
            content: content.to_owned(),
            kind: MessageKind::System,
            timestamp: Utc::now(),
        });
    }
}
