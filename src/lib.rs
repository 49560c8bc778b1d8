//! Move selection for the board game 'Connect 4'
//!
//! Two interchangeable agents pick a column for the player to move: a
//! depth-limited alpha-beta minimax search over a heuristic evaluation, and a
//! time-bounded Monte Carlo Tree Search whose playouts follow a cheap
//! bitboard move policy. Both are reached through [`Agent::choose_move`].
//!
//! # Basic Usage
//!
//! ```
//! use connect4_search::{AlphaBeta, Agent, Board, Player};
//!
//!# fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // both players hold three stacked tiles, player one to move
//! let board = Board::from_moves("010101")?;
//! let mut agent = AlphaBeta::default();
//!
//! assert_eq!(agent.choose_move(&board, Player::One)?, 0);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;

pub mod agent;

pub mod alpha_beta;

pub mod bitboard;

pub mod board;

pub mod config;

pub mod error;

pub mod evaluator;

pub mod mcts;

mod test;

pub use agent::{Agent, ForcedMove};
pub use alpha_beta::{AlphaBeta, SearchOutcome};
pub use bitboard::BitBoard;
pub use board::{Board, Cell, GameState, Player};
pub use config::{AlphaBetaConfig, MctsConfig, SelectionPolicy};
pub use error::{Error, Result};
pub use mcts::{Mcts, MctsOutcome};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// ensure that the given dimensions fit in a u64 for the bitboard representation
const_assert!(WIDTH * (HEIGHT + 1) < 64);
// untried columns of an MCTS node are tracked in a u8
const_assert!(WIDTH <= 8);
