//! Newtype wrappers for improved type safety and domain modeling.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Side length of the square board.
pub const BOARD_SIZE: usize = 3;

/// Number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// A cell coordinate on the board, `(row, col)` with the origin at the top left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    row: usize,
    col: usize,
}

impl Coord {
    /// The center cell.
    pub const CENTER: Coord = Coord::at(1, 1);

    /// Corners in the order the expert tries them on its second move.
    pub const CORNERS: [Coord; 4] = [
        Coord::at(0, 0),
        Coord::at(0, 2),
        Coord::at(2, 0),
        Coord::at(2, 2),
    ];

    /// Create a coordinate, validating it lies on the board.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidCoordinate`] if either component is >= 3.
    pub fn new(row: usize, col: usize) -> Result<Self, crate::Error> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Ok(Coord { row, col })
        } else {
            Err(crate::Error::InvalidCoordinate {
                row,
                col,
                size: BOARD_SIZE,
            })
        }
    }

    /// Create a coordinate from known-good constants without validation.
    pub(crate) const fn at(row: usize, col: usize) -> Self {
        Coord { row, col }
    }

    /// Build a coordinate from a row-major cell index (0-8).
    pub fn from_index(index: usize) -> Option<Self> {
        (index < CELL_COUNT).then(|| Coord::at(index / BOARD_SIZE, index % BOARD_SIZE))
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Row-major cell index (0-8).
    pub fn index(&self) -> usize {
        self.row * BOARD_SIZE + self.col
    }

    /// Parse a coordinate typed by a human, e.g. `"1,2"` or `"1 2"`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ParseCoordinate`] for malformed input and
    /// [`crate::Error::InvalidCoordinate`] for components off the board.
    pub fn parse(input: &str) -> Result<Self, crate::Error> {
        let parse_error = || crate::Error::ParseCoordinate {
            input: input.to_string(),
        };

        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect();

        match parts.as_slice() {
            [row, col] => {
                let row = row.parse::<usize>().map_err(|_| parse_error())?;
                let col = col.parse::<usize>().map_err(|_| parse_error())?;
                Coord::new(row, col)
            }
            _ => Err(parse_error()),
        }
    }
}

impl FromStr for Coord {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Coord::parse(s)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A validated board state key.
///
/// The key is the full grid serialized row-major, one character per cell
/// (`.` empty, `X`, `O`). Two boards with identical contents always produce
/// the same key, and the key is the only notion of state identity used by the
/// value table.
///
/// # Examples
///
/// ```
/// use tictactoe_td::tictactoe::Board;
/// use tictactoe_td::types::StateKey;
///
/// let board = Board::new();
/// assert_eq!(board.state_key().as_str(), ".........");
///
/// let key = StateKey::parse("X...O....").unwrap();
/// assert_eq!(key.to_string(), "X...O....");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateKey(String);

impl StateKey {
    /// Parse and validate a state key from a string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidStateKey`] if the string is not exactly
    /// nine characters drawn from `.`, `X` and `O`.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        let invalid = |reason: String| crate::Error::InvalidStateKey {
            key: s.to_string(),
            reason,
        };

        let len = s.chars().count();
        if len != CELL_COUNT {
            return Err(invalid(format!("expected {CELL_COUNT} cells, got {len}")));
        }
        if let Some((position, character)) = s
            .chars()
            .enumerate()
            .find(|(_, c)| !matches!(c, '.' | 'X' | 'O'))
        {
            return Err(invalid(format!(
                "invalid character '{character}' at position {position}"
            )));
        }

        Ok(StateKey(s.to_string()))
    }

    /// Wrap an encoding produced by [`crate::tictactoe::Board::state_key`].
    pub(crate) fn from_encoding(encoding: String) -> Self {
        StateKey(encoding)
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for StateKey {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StateKey::parse(&value)
    }
}

impl From<StateKey> for String {
    fn from(key: StateKey) -> Self {
        key.0
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value assigned to a state nobody has seen yet ("even odds").
pub const STARTING_VALUE: f64 = 0.5;

/// Default TD step size.
pub const DEFAULT_LEARNING_RATE: f64 = 0.5;

/// Default exploration probability (one move in a hundred).
pub const DEFAULT_EXPLORATION_RATE: f64 = 0.01;

/// Terminal rewards from the learning agent's point of view.
pub mod reward {
    /// Reward for a game the agent won.
    pub const WIN: f64 = 1.0;

    /// Reward for a tie.
    pub const TIE: f64 = 0.5;

    /// Reward for a game the agent lost.
    pub const LOSS: f64 = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_validation() {
        assert!(Coord::new(0, 0).is_ok());
        assert!(Coord::new(2, 2).is_ok());
        assert!(Coord::new(3, 0).is_err());
        assert!(Coord::new(0, 7).is_err());
    }

    #[test]
    fn test_coord_index_mapping() {
        assert_eq!(Coord::CENTER.index(), 4);
        assert_eq!(Coord::from_index(5), Some(Coord::at(1, 2)));
        assert_eq!(Coord::from_index(9), None);
        for index in 0..CELL_COUNT {
            assert_eq!(Coord::from_index(index).unwrap().index(), index);
        }
    }

    #[test]
    fn test_coord_parse() {
        assert_eq!(Coord::parse("1,2").unwrap(), Coord::at(1, 2));
        assert_eq!(Coord::parse(" 0 1 ").unwrap(), Coord::at(0, 1));
        assert_eq!("2, 0".parse::<Coord>().unwrap(), Coord::at(2, 0));
        assert!(matches!(
            Coord::parse("a,b"),
            Err(crate::Error::ParseCoordinate { .. })
        ));
        assert!(matches!(
            Coord::parse("1"),
            Err(crate::Error::ParseCoordinate { .. })
        ));
        assert!(matches!(
            Coord::parse("3,3"),
            Err(crate::Error::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_state_key_validation() {
        assert!(StateKey::parse(".........").is_ok());
        assert!(StateKey::parse("XOXOXOXOX").is_ok());
        assert!(StateKey::parse("XO").is_err());
        assert!(StateKey::parse("XOZ......").is_err());
        assert!(StateKey::parse("..........").is_err());
    }
}
