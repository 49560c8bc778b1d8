#![cfg(test)]

use anyhow::{anyhow, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::time::Duration;

use crate::{
    error, AlphaBeta, AlphaBetaConfig, Agent, Board, Cell, Mcts, MctsConfig, Player, HEIGHT, WIDTH,
};

/// A full board without four in a row anywhere
///
/// Columns are filled in pairs with alternating tiles, the pairs shifted by
/// one row against each other.
pub fn drawn_board() -> error::Result<Board> {
    let mut rows = [[Cell::Empty; WIDTH]; HEIGHT];
    for (row, cells) in rows.iter_mut().enumerate() {
        for (column, cell) in cells.iter_mut().enumerate() {
            *cell = if (column / 2 + row) % 2 == 0 {
                Cell::PlayerOne
            } else {
                Cell::PlayerTwo
            };
        }
    }
    Board::from_cells(rows)
}

// plays random legal moves until the game ends or `max_moves` is reached,
// calling `check` after every drop
fn random_game<F>(rng: &mut ChaCha8Rng, max_moves: usize, mut check: F) -> Result<Board>
where
    F: FnMut(&Board, Player, usize) -> Result<()>,
{
    let mut board = Board::new();
    let mut player = Player::One;
    for _ in 0..max_moves {
        let legal: Vec<usize> = board.legal_columns().collect();
        if legal.is_empty() {
            break;
        }
        let column = legal[rng.gen_range(0..legal.len())];
        board.drop(column, player)?;
        check(&board, player, column)?;
        if board.four_in_a_row(player, Some(column)) {
            break;
        }
        player = player.opponent();
    }
    Ok(board)
}

#[test]
pub fn win_detection_symmetry() -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..500 {
        random_game(&mut rng, WIDTH * HEIGHT, |board, player, column| {
            for &p in [player, player.opponent()].iter() {
                let anchored = board.four_in_a_row(p, Some(column));
                let scanned = board.four_in_a_row(p, None);
                if anchored != scanned {
                    return Err(anyhow!(
                        "{} after a drop into {}: anchored {}, scanned {}\n{}",
                        p,
                        column,
                        anchored,
                        scanned,
                        board
                    ));
                }
            }
            Ok(())
        })?;
    }
    Ok(())
}

#[test]
pub fn gravity_invariant() -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..200 {
        random_game(&mut rng, WIDTH * HEIGHT, |board, _, _| {
            for column in 0..WIDTH {
                let height = board.height(column);
                for row in 0..HEIGHT {
                    if board.get(row, column).is_empty() != (row >= height) {
                        return Err(anyhow!("gap in column {}\n{}", column, board));
                    }
                }
            }
            Ok(())
        })?;
    }
    Ok(())
}

// player one holds column 2 rows 0-2, player two column 3 rows 0-2
fn stacked_threes() -> Result<Board> {
    let mut rows = [[Cell::Empty; WIDTH]; HEIGHT];
    for cells in rows.iter_mut().take(3) {
        cells[2] = Cell::PlayerOne;
        cells[3] = Cell::PlayerTwo;
    }
    Ok(Board::from_cells(rows)?)
}

fn agents() -> Vec<Box<dyn Agent>> {
    vec![
        Box::new(AlphaBeta::default()),
        Box::new(AlphaBeta::new(AlphaBetaConfig::with_depth(1))),
        Box::new(Mcts::new(MctsConfig::for_testing())),
    ]
}

#[test]
pub fn every_agent_takes_the_win() -> Result<()> {
    let board = stacked_threes()?;
    for agent in agents().iter_mut() {
        assert_eq!(agent.choose_move(&board, Player::One)?, 2, "{}", agent.name());
        assert_eq!(agent.choose_move(&board, Player::Two)?, 3, "{}", agent.name());
    }
    Ok(())
}

#[test]
pub fn every_agent_blocks() -> Result<()> {
    // player two has three on the bottom row, player one must fill column 3
    let board = Board::from_moves("606152")?;
    for agent in agents().iter_mut() {
        assert_eq!(agent.choose_move(&board, Player::One)?, 3, "{}", agent.name());
    }
    Ok(())
}

#[test]
pub fn mcts_moves_are_legal() -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let config = MctsConfig {
        max_iterations: Some(100),
        ..MctsConfig::for_testing()
    };
    let mut mcts = Mcts::new(config);
    for _ in 0..20 {
        let moves = rng.gen_range(0..30);
        let mut last = None;
        let board = random_game(&mut rng, moves, |_, player, _| {
            last = Some(player);
            Ok(())
        })?;
        let to_move = last.map_or(Player::One, Player::opponent);
        if board.game_outcome(to_move.opponent(), None) != crate::GameState::Ongoing {
            continue;
        }
        let column = mcts.choose_move(&board, to_move)?;
        assert!(board.playable(column), "column {} on\n{}", column, board);
    }
    Ok(())
}

#[test]
pub fn mcts_on_empty_board() -> Result<()> {
    for &millis in [1, 20].iter() {
        let mut mcts = Mcts::new(MctsConfig::with_time_budget(Duration::from_millis(millis)));
        let column = mcts.choose_move(&Board::new(), Player::One)?;
        assert!(column < WIDTH);
    }
    Ok(())
}

#[test]
pub fn concurrent_searches_are_independent() -> Result<()> {
    let board = Board::from_moves("3324")?;
    let mcts = Mcts::new(MctsConfig {
        max_iterations: Some(200),
        ..MctsConfig::for_testing()
    });
    let alpha_beta = AlphaBeta::default();

    let sequential = (
        alpha_beta.search(&board, Player::One)?,
        mcts.search(&board, Player::One)?,
    );
    let parallel = (0..8)
        .into_par_iter()
        .map(|_| Ok((alpha_beta.search(&board, Player::One)?, mcts.search(&board, Player::One)?)))
        .collect::<error::Result<Vec<_>>>()?;

    assert!(parallel.iter().all(|outcome| *outcome == sequential));
    Ok(())
}
