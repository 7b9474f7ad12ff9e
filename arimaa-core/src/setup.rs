//! Setup - named starting layouts stored as JSON

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{EngineError, Result};
use crate::pieces::{Color, Piece, PieceType};
use crate::position::{Position, BOARD_SIZE};

/// Reference layout, rank 8 first. `.` is an empty square.
pub const STANDARD_ROWS: [&str; 8] = [
    "rrrrrrrr",
    "emhhddcc",
    "........",
    "........",
    "........",
    "........",
    "EMHHDDCC",
    "RRRRRRRR",
];

/// A named 8x8 starting layout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    pub name: String,
    pub rows: Vec<String>,
}

impl Setup {
    /// Both standard armies, silver on rows 0-1 and gold on rows 6-7
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            rows: STANDARD_ROWS.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn from_board(name: &str, board: &Board) -> Self {
        Self {
            name: name.to_string(),
            rows: board.to_rows(),
        }
    }

    /// Build the board this layout describes
    pub fn to_board(&self) -> Result<Board> {
        if self.rows.len() != BOARD_SIZE as usize {
            return Err(EngineError::InvalidNotation(format!(
                "setup '{}' has {} rows, expected {}",
                self.name,
                self.rows.len(),
                BOARD_SIZE
            )));
        }

        let mut board = Board::new();
        for (row, text) in self.rows.iter().enumerate() {
            if text.chars().count() != BOARD_SIZE as usize {
                return Err(EngineError::InvalidNotation(format!(
                    "setup row {} '{}' must have {} squares",
                    row, text, BOARD_SIZE
                )));
            }
            for (column, code) in text.chars().enumerate() {
                if code == '.' {
                    continue;
                }
                let piece = Piece::from_code(code).ok_or_else(|| {
                    EngineError::InvalidNotation(format!("unknown piece '{}' in setup row {}", code, row))
                })?;
                board.place_piece(piece, Position::new(row as u8, column as u8)?)?;
            }
        }
        Ok(board)
    }

    /// Deviations from a standard army on its home rows.
    ///
    /// These are reported, not enforced: any layout can be played.
    pub fn army_issues(&self) -> Result<Vec<String>> {
        let board = self.to_board()?;
        let mut issues = Vec::new();

        for color in [Color::Gold, Color::Silver] {
            let counts = board.piece_counts(color);
            for piece_type in PieceType::ALL {
                let found = counts.get(&piece_type).copied().unwrap_or(0);
                let expected = piece_type.standard_count();
                if found != expected {
                    issues.push(format!(
                        "{} has {} {}(s), expected {}",
                        color,
                        found,
                        piece_type.name(),
                        expected
                    ));
                }
            }

            let home = color.home_rows();
            for pos in board.positions_of(color) {
                if !home.contains(&pos.row()) {
                    issues.push(format!("{} piece on {} is outside its home rows", color, pos));
                }
            }
        }

        Ok(issues)
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read setup {}", path.display()))?;
        let setup: Setup = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse setup {}", path.display()))?;
        setup
            .to_board()
            .with_context(|| format!("Invalid layout in {}", path.display()))?;
        Ok(setup)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Setup {
    fn default() -> Self {
        Self::standard()
    }
}
