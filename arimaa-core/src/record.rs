//! Game record text format: player header, result and one line per half-turn

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::board::Board;
use crate::error::{EngineError, Result};
use crate::game::{Game, Outcome, STEPS_PER_TURN};
use crate::notation::{replay, Token, TurnLabel, TurnLine};
use crate::pieces::{Color, Player};

const TITLE: &str = "Arimaa game record";
const GOLD_NAME: &str = "Yellow (g): ";
const GOLD_TIME: &str = "Yellow time: ";
const SILVER_NAME: &str = "Blue (s): ";
const SILVER_TIME: &str = "Blue time: ";
const RESULT: &str = "Result: ";

/// Player name that marks a computer opponent
pub const COMPUTER_NAME: &str = "Computer";

/// A saved game
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameRecord {
    pub gold_name: String,
    pub gold_time: Duration,
    pub silver_name: String,
    pub silver_time: Duration,
    /// `None` while the game is unfinished
    pub winner: Option<Color>,
    pub lines: Vec<TurnLine>,
}

impl GameRecord {
    pub fn new(gold_name: &str, silver_name: &str) -> Self {
        Self {
            gold_name: gold_name.to_string(),
            gold_time: Duration::ZERO,
            silver_name: silver_name.to_string(),
            silver_time: Duration::ZERO,
            winner: None,
            lines: Vec::new(),
        }
    }

    /// Append `tokens` under `label`, opening a new line when the label changes
    pub fn record_tokens(&mut self, label: TurnLabel, tokens: impl IntoIterator<Item = Token>) {
        self.start_turn(label);
        if let Some(line) = self.lines.last_mut() {
            line.tokens.extend(tokens);
        }
    }

    /// Open an empty line for `label` unless it is already the last one
    pub fn start_turn(&mut self, label: TurnLabel) {
        if self.last_label() != Some(label) {
            self.lines.push(TurnLine::new(label));
        }
    }

    /// Mark `label` as resigned and record the winner
    pub fn record_resignation(&mut self, label: TurnLabel, winner: Color) {
        self.start_turn(label);
        if let Some(line) = self.lines.last_mut() {
            line.resigns = true;
        }
        self.winner = Some(winner);
    }

    pub fn record_outcome(&mut self, outcome: Option<Outcome>) {
        self.winner = outcome.map(|o| o.winner);
    }

    pub fn last_label(&self) -> Option<TurnLabel> {
        self.lines.last().map(|line| line.label)
    }

    /// `0-0` unfinished, `1-0` gold won, `0-1` silver won
    pub fn result_text(&self) -> &'static str {
        match self.winner {
            None => "0-0",
            Some(Color::Gold) => "1-0",
            Some(Color::Silver) => "0-1",
        }
    }

    /// All tokens in order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.lines.iter().flat_map(|line| &line.tokens)
    }

    /// Position after every recorded token
    pub fn board(&self) -> Result<Board> {
        replay(&self.lines)
    }

    /// Steps left on the last line's turn
    pub fn moves_left(&self) -> u8 {
        let taken = self.lines.last().map_or(0, TurnLine::steps_taken);
        STEPS_PER_TURN.saturating_sub(taken.min(u8::MAX as usize) as u8)
    }

    /// Continue an unfinished game where the record stops
    pub fn resume(&self) -> Result<Game> {
        if self.winner.is_some() {
            return Err(EngineError::GameEnded);
        }
        let gold = Player::gold(self.gold_name.as_str());
        let mut silver = Player::silver(self.silver_name.as_str());
        silver.is_computer = self.silver_name == COMPUTER_NAME;

        let board = self.board()?;
        match self.last_label() {
            Some(label) => Game::resume(gold, silver, board, label, self.moves_left()),
            None => Game::with_board(gold, silver, board),
        }
    }
}

/// `hh:mm:ss`
pub fn format_clock(time: Duration) -> String {
    let secs = time.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

pub fn parse_clock(text: &str) -> Result<Duration> {
    let invalid = || EngineError::InvalidNotation(format!("bad clock '{}'", text));
    let parts: Vec<u64> = text
        .split(':')
        .map(|p| p.parse::<u64>().map_err(|_| invalid()))
        .collect::<Result<_>>()?;
    match parts.as_slice() {
        [h, m, s] if *m < 60 && *s < 60 => h
            .checked_mul(3600)
            .and_then(|secs| secs.checked_add(m * 60 + s))
            .map(Duration::from_secs)
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// True for names of the form `arimaa-dd-mm-yyyy-hh-mm-ss.txt`
pub fn is_record_file_name(name: &str) -> bool {
    let Some(stamp) = name
        .strip_prefix("arimaa-")
        .and_then(|rest| rest.strip_suffix(".txt"))
    else {
        return false;
    };
    let fields: Vec<&str> = stamp.split('-').collect();
    let widths = [2, 2, 4, 2, 2, 2];
    fields.len() == widths.len()
        && fields
            .iter()
            .zip(widths)
            .all(|(field, width)| field.len() == width && field.bytes().all(|b| b.is_ascii_digit()))
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", TITLE)?;
        writeln!(f, "{}{}", GOLD_NAME, self.gold_name)?;
        writeln!(f, "{}{}", GOLD_TIME, format_clock(self.gold_time))?;
        writeln!(f, "{}{}", SILVER_NAME, self.silver_name)?;
        writeln!(f, "{}{}", SILVER_TIME, format_clock(self.silver_time))?;
        writeln!(f, "{}{}", RESULT, self.result_text())?;
        writeln!(f)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl FromStr for GameRecord {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let mut gold_name = None;
        let mut gold_time = None;
        let mut silver_name = None;
        let mut silver_time = None;
        let mut result = None;
        let mut lines = Vec::new();

        for (index, raw) in s.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || (index == 0 && line == TITLE) {
                continue;
            }
            if let Some(v) = line.strip_prefix(GOLD_NAME.trim_end()) {
                gold_name = Some(v.trim().to_string());
            } else if let Some(v) = line.strip_prefix(GOLD_TIME.trim_end()) {
                gold_time = Some(parse_clock(v.trim())?);
            } else if let Some(v) = line.strip_prefix(SILVER_NAME.trim_end()) {
                silver_name = Some(v.trim().to_string());
            } else if let Some(v) = line.strip_prefix(SILVER_TIME.trim_end()) {
                silver_time = Some(parse_clock(v.trim())?);
            } else if let Some(v) = line.strip_prefix(RESULT.trim_end()) {
                result = Some(match v.trim() {
                    "0-0" => None,
                    "1-0" => Some(Color::Gold),
                    "0-1" => Some(Color::Silver),
                    other => {
                        return Err(EngineError::InvalidNotation(format!("bad result '{}'", other)))
                    }
                });
            } else {
                lines.push(line.parse::<TurnLine>()?);
            }
        }

        let missing = |header: &str| EngineError::InvalidNotation(format!("missing header '{}'", header.trim()));
        Ok(Self {
            gold_name: gold_name.ok_or_else(|| missing(GOLD_NAME))?,
            gold_time: gold_time.ok_or_else(|| missing(GOLD_TIME))?,
            silver_name: silver_name.ok_or_else(|| missing(SILVER_NAME))?,
            silver_time: silver_time.ok_or_else(|| missing(SILVER_TIME))?,
            winner: result.ok_or_else(|| missing(RESULT))?,
            lines,
        })
    }
}
