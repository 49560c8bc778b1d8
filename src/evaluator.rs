//! Static position scoring shared by the searchers
//!
//! [`evaluate`] scores a whole grid for the alpha-beta searcher by counting
//! open windows of 4 cells. [`evaluate_bitboard`] scores a single candidate
//! move for the MCTS rollout policy.

use crate::bitboard::BitBoard;
use crate::board::{Board, Cell, Player};
use crate::error::{Error, Result};
use crate::{HEIGHT, WIDTH};

/// Score of a position already won by the evaluated player
pub const WIN_SCORE: i32 = 1_000_000;

// window weights, indexed by the number of the player's pieces in a window
// without opponent pieces
const WINDOW_WEIGHTS: [i32; 5] = [0, 1, 8, 27, 10_000];

/// Move completes four in a row
pub const TERMINAL_SCORE: i32 = 1_000_000;
/// Move fills a tile where the opponent would have completed four
pub const BLOCK_SCORE: i32 = 10_000;
pub const OPEN_THREE_SCORE: i32 = 100;
pub const THREE_SCORE: i32 = 50;
pub const TWO_SCORE: i32 = 10;
pub const ONE_SCORE: i32 = 1;

// (row, column) steps for rows, columns and both diagonals
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Scores every 4-cell window along every line of the board for `player`
///
/// A position where either side already has four in a row scores
/// `WIN_SCORE` or `-WIN_SCORE` regardless of the windows.
pub fn evaluate(board: &Board, player: Player) -> i32 {
    if board.four_in_a_row(player, None) {
        return WIN_SCORE;
    }
    if board.four_in_a_row(player.opponent(), None) {
        return -WIN_SCORE;
    }

    let own = player.cell();
    windows(board)
        .map(|window| score_window(&window, own))
        .sum()
}

fn score_window(window: &[Cell; 4], own: Cell) -> i32 {
    let mut pieces = 0;
    for &cell in window.iter() {
        if cell == own {
            pieces += 1;
        } else if !cell.is_empty() {
            // blocked by the opponent
            return 0;
        }
    }
    WINDOW_WEIGHTS[pieces]
}

// every run of 4 cells in a row, a column or a diagonal
fn windows(board: &Board) -> impl Iterator<Item = [Cell; 4]> + '_ {
    DIRECTIONS.iter().flat_map(move |&(d_row, d_column)| {
        (0..HEIGHT).flat_map(move |row| {
            (0..WIDTH).filter_map(move |column| {
                let end_row = row as isize + 3 * d_row;
                let end_column = column as isize + 3 * d_column;
                if end_row < 0 || end_row >= HEIGHT as isize || end_column < 0 || end_column >= WIDTH as isize {
                    return None;
                }
                let mut window = [Cell::Empty; 4];
                for (i, cell) in window.iter_mut().enumerate() {
                    let y = (row as isize + i as isize * d_row) as usize;
                    let x = (column as isize + i as isize * d_column) as usize;
                    *cell = board.get(y, x);
                }
                Some(window)
            })
        })
    })
}

/// Scores the move that turned the mover's tiles into `after`
///
/// `opponent` holds the opponent's tiles before the move and `move_bit` the
/// tile that was filled. Completing four beats blocking the opponent's
/// completion, which beats the longest alignment held afterwards.
pub fn evaluate_bitboard(after: &BitBoard, opponent: &BitBoard, move_bit: u64) -> i32 {
    if after.connected_four() {
        return TERMINAL_SCORE;
    }
    if opponent.winning_cells() & move_bit != 0 {
        return BLOCK_SCORE;
    }
    match after.connected_three() {
        Some(true) => OPEN_THREE_SCORE,
        Some(false) => THREE_SCORE,
        None if after.connected_two() => TWO_SCORE,
        None => ONE_SCORE,
    }
}

/// Scores a drop of `player` into `column` with [`evaluate_bitboard`]
pub fn score_move(board: &Board, column: usize, player: Player) -> Result<i32> {
    if column >= WIDTH {
        return Err(Error::ColumnOutOfRange { column });
    }
    if !board.playable(column) {
        return Err(Error::ColumnFull { column });
    }
    let own = BitBoard::encode(board, player);
    let opponent = BitBoard::encode(board, player.opponent());
    let move_bit = own.move_bit(column);
    Ok(evaluate_bitboard(&own.play(column), &opponent, move_bit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_is_neutral() {
        let board = Board::new();
        assert_eq!(evaluate(&board, Player::One), 0);
        assert_eq!(evaluate(&board, Player::Two), 0);
        assert_eq!(windows(&board).count(), 69);
    }

    #[test]
    fn centre_piece_sits_in_more_windows() -> Result<()> {
        let centre = Board::from_moves("3")?;
        let corner = Board::from_moves("0")?;
        assert_eq!(evaluate(&centre, Player::One), 7);
        assert_eq!(evaluate(&corner, Player::One), 3);
        // every window holding the piece is dead for the opponent
        assert_eq!(evaluate(&centre, Player::Two), 0);
        Ok(())
    }

    #[test]
    fn window_weights() {
        use Cell::{Empty, PlayerOne, PlayerTwo};
        assert_eq!(score_window(&[PlayerOne, PlayerOne, PlayerOne, Empty], PlayerOne), 27);
        assert_eq!(score_window(&[PlayerOne, Empty, PlayerOne, Empty], PlayerOne), 8);
        assert_eq!(score_window(&[Empty, Empty, Empty, PlayerOne], PlayerOne), 1);
        assert_eq!(score_window(&[PlayerOne, PlayerOne, PlayerTwo, Empty], PlayerOne), 0);
        assert_eq!(score_window(&[PlayerOne; 4], PlayerOne), 10_000);
    }

    #[test]
    fn won_positions_override_windows() -> Result<()> {
        let board = Board::from_moves("0101010")?;
        assert_eq!(evaluate(&board, Player::One), WIN_SCORE);
        assert_eq!(evaluate(&board, Player::Two), -WIN_SCORE);
        Ok(())
    }

    #[test]
    fn move_scores() -> Result<()> {
        // One holds the bottom of columns 0-2, Two the bottom of column 6
        let board = Board::from_moves("061626")?;
        assert_eq!(score_move(&board, 3, Player::One)?, TERMINAL_SCORE);
        assert_eq!(score_move(&board, 3, Player::Two)?, BLOCK_SCORE);
        assert_eq!(score_move(&board, 6, Player::Two)?, TERMINAL_SCORE);
        assert_eq!(score_move(&board, 6, Player::One)?, BLOCK_SCORE);

        let board = Board::from_moves("06")?;
        assert_eq!(score_move(&board, 1, Player::One)?, TWO_SCORE);
        assert_eq!(score_move(&board, 3, Player::One)?, ONE_SCORE);
        Ok(())
    }

    #[test]
    fn three_tiers() -> Result<()> {
        // a stack of 3 with room above is open
        let board = Board::from_moves("0606")?;
        assert_eq!(score_move(&board, 0, Player::One)?, OPEN_THREE_SCORE);

        // a bottom row run of 3 between the edge and a piece of One
        let board = Board::from_moves("30616")?;
        assert_eq!(score_move(&board, 2, Player::Two)?, THREE_SCORE);
        Ok(())
    }

    #[test]
    fn illegal_moves_are_rejected() -> Result<()> {
        let board = Board::from_moves("000000")?;
        assert_eq!(score_move(&board, 0, Player::One), Err(Error::ColumnFull { column: 0 }));
        assert_eq!(
            score_move(&board, WIDTH, Player::One),
            Err(Error::ColumnOutOfRange { column: WIDTH })
        );
        Ok(())
    }
}
