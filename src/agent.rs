//! The interface through which a game driver asks a searcher for a move

use crate::board::{Board, Player};
use crate::error::{Error, Result};

/// A move picker for a single position
///
/// Implementations work on their own copy of `board` and never mutate the
/// caller's. They fail with [`Error::NoLegalMove`] on a full board rather
/// than guessing a column.
pub trait Agent {
    fn name(&self) -> &str;

    /// Returns the column `player` should drop into next
    fn choose_move(&mut self, board: &Board, player: Player) -> Result<usize>;
}

/// A move dictated by the position before any search
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ForcedMove {
    /// Dropping here wins on the spot
    Win(usize),
    /// The only column where the opponent would win next turn
    Block(usize),
}

impl ForcedMove {
    pub fn column(self) -> usize {
        match self {
            ForcedMove::Win(column) | ForcedMove::Block(column) => column,
        }
    }
}

/// Looks for an immediate win for `player`, then for a single opponent threat to block
///
/// With two or more opponent threats nothing is forced, the game is lost
/// against correct play and the searchers pick the least bad move themselves.
pub fn forced_move(board: &Board, player: Player) -> Result<Option<ForcedMove>> {
    if board.is_full() {
        return Err(Error::NoLegalMove);
    }
    if let Some(column) = board.winning_columns(player).next() {
        return Ok(Some(ForcedMove::Win(column)));
    }
    let mut threats = board.winning_columns(player.opponent());
    match (threats.next(), threats.next()) {
        (Some(column), None) => Ok(Some(ForcedMove::Block(column))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_beats_block() -> Result<()> {
        // both sides have a stack of 3, One to move
        let board = Board::from_moves("010101")?;
        assert_eq!(forced_move(&board, Player::One)?, Some(ForcedMove::Win(0)));
        assert_eq!(forced_move(&board, Player::Two)?, Some(ForcedMove::Win(1)));
        Ok(())
    }

    #[test]
    fn single_threat_is_blocked() -> Result<()> {
        let board = Board::from_moves("06162")?;
        assert_eq!(forced_move(&board, Player::Two)?, Some(ForcedMove::Block(3)));
        assert_eq!(ForcedMove::Block(3).column(), 3);
        Ok(())
    }

    #[test]
    fn double_threat_forces_nothing() -> Result<()> {
        // One holds columns 2-4 of the bottom row, open at both ends
        let board = Board::from_moves("26364")?;
        assert_eq!(board.winning_columns(Player::One).collect::<Vec<_>>(), vec![1, 5]);
        assert_eq!(forced_move(&board, Player::Two)?, None);
        assert_eq!(forced_move(&Board::new(), Player::One)?, None);
        Ok(())
    }

    #[test]
    fn full_board_has_no_move() -> Result<()> {
        let board = crate::test::drawn_board()?;
        assert!(board.is_full());
        assert_eq!(forced_move(&board, Player::One), Err(Error::NoLegalMove));
        Ok(())
    }
}
