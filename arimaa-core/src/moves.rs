//! Move descriptors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::position::{Direction, Position};

/// One atomic relocation of a single piece to an adjacent square
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepMove {
    pub from: Position,
    pub to: Position,
}

impl StepMove {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    pub fn direction(&self) -> Option<Direction> {
        Direction::between(self.from, self.to)
    }
}

/// A move submitted to the board.
///
/// Moves carry positions only; the board resolves occupants when the move is
/// applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// A piece steps on its own
    Step { from: Position, to: Position },
    /// The agent at `from` takes the square `to` vacated by the pushed piece
    Push {
        from: Position,
        to: Position,
        pushed_from: Position,
        pushed_to: Position,
    },
    /// The agent steps away and the pulled piece follows into `from`
    Pull {
        from: Position,
        to: Position,
        pulled_from: Position,
        pulled_to: Position,
    },
}

impl Move {
    pub fn from(&self) -> Position {
        match *self {
            Move::Step { from, .. } | Move::Push { from, .. } | Move::Pull { from, .. } => from,
        }
    }

    pub fn to(&self) -> Position {
        match *self {
            Move::Step { to, .. } | Move::Push { to, .. } | Move::Pull { to, .. } => to,
        }
    }

    /// Direction of the agent's own leg
    pub fn direction(&self) -> Option<Direction> {
        Direction::between(self.from(), self.to())
    }

    /// The affected enemy piece's leg, for push and pull
    pub fn second_leg(&self) -> Option<StepMove> {
        match *self {
            Move::Step { .. } => None,
            Move::Push {
                pushed_from,
                pushed_to,
                ..
            } => Some(StepMove::new(pushed_from, pushed_to)),
            Move::Pull {
                pulled_from,
                pulled_to,
                ..
            } => Some(StepMove::new(pulled_from, pulled_to)),
        }
    }

    pub fn second_direction(&self) -> Option<Direction> {
        self.second_leg().and_then(|leg| leg.direction())
    }

    /// Atomic legs in the order they must be applied.
    ///
    /// A pull moves the puller first so its square is free for the pulled
    /// piece; a push moves the pushed piece first so the pusher can follow.
    pub fn legs(&self) -> Vec<StepMove> {
        match *self {
            Move::Step { from, to } => vec![StepMove::new(from, to)],
            Move::Pull {
                from,
                to,
                pulled_from,
                pulled_to,
            } => vec![StepMove::new(from, to), StepMove::new(pulled_from, pulled_to)],
            Move::Push {
                from,
                to,
                pushed_from,
                pushed_to,
            } => vec![StepMove::new(pushed_from, pushed_to), StepMove::new(from, to)],
        }
    }

    /// Steps of the 4-step turn budget this move consumes
    pub fn cost(&self) -> u8 {
        match self {
            Move::Step { .. } => 1,
            Move::Push { .. } | Move::Pull { .. } => 2,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Move::Step { .. } => "step",
            Move::Push { .. } => "push",
            Move::Pull { .. } => "pull",
        }
    }
}

impl From<StepMove> for Move {
    fn from(step: StepMove) -> Self {
        Move::Step {
            from: step.from,
            to: step.to,
        }
    }
}

impl fmt::Display for StepMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Step { from, to } => write!(f, "step {}-{}", from, to),
            Move::Push {
                from,
                to,
                pushed_from,
                pushed_to,
            } => write!(f, "push {}-{} by {}-{}", pushed_from, pushed_to, from, to),
            Move::Pull {
                from,
                to,
                pulled_from,
                pulled_to,
            } => write!(f, "pull {}-{} by {}-{}", pulled_from, pulled_to, from, to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Position {
        Position::from_notation(s).unwrap()
    }

    #[test]
    fn test_pull_legs_move_puller_first() {
        let mv = Move::Pull {
            from: sq("d4"),
            to: sq("d5"),
            pulled_from: sq("d3"),
            pulled_to: sq("d4"),
        };
        assert_eq!(
            mv.legs(),
            vec![StepMove::new(sq("d4"), sq("d5")), StepMove::new(sq("d3"), sq("d4"))]
        );
        assert_eq!(mv.cost(), 2);
        assert_eq!(mv.direction(), Some(Direction::North));
        assert_eq!(mv.second_direction(), Some(Direction::North));
    }

    #[test]
    fn test_push_legs_move_pushed_piece_first() {
        let mv = Move::Push {
            from: sq("d4"),
            to: sq("e4"),
            pushed_from: sq("e4"),
            pushed_to: sq("e5"),
        };
        assert_eq!(
            mv.legs(),
            vec![StepMove::new(sq("e4"), sq("e5")), StepMove::new(sq("d4"), sq("e4"))]
        );
        assert_eq!(mv.direction(), Some(Direction::East));
        assert_eq!(mv.second_direction(), Some(Direction::North));
    }

    #[test]
    fn test_step_costs_one() {
        let mv: Move = StepMove::new(sq("a1"), sq("a2")).into();
        assert_eq!(mv.cost(), 1);
        assert_eq!(mv.second_leg(), None);
        assert_eq!(mv.to_string(), "step a1-a2");
    }

    #[test]
    fn test_structural_equality() {
        let a = Move::Step { from: sq("b2"), to: sq("b3") };
        let b = Move::Step { from: sq("b2"), to: sq("b3") };
        assert_eq!(a, b);
    }
}
