use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};
use indicatif::ProgressBar;
use tracing::info;

use std::io::{stdin, stdout, Write};
use std::time::Duration;

use connect4_search::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    AlphaBeta,
    Mcts,
}

/// Play Connect 4 against a search agent in the terminal
#[derive(Parser, Debug)]
#[command(name = "connect4", version, about)]
struct Args {
    /// Search algorithm of the computer player
    #[arg(long, value_enum, default_value = "alpha-beta")]
    agent: AgentKind,

    /// Plies searched by the alpha-beta agent
    #[arg(long, default_value_t = config::DEFAULT_DEPTH)]
    depth: u32,

    /// Thinking time per move of the MCTS agent, in milliseconds
    #[arg(long, default_value_t = 2000)]
    budget_ms: u64,

    /// Seed for the MCTS rollouts, random if not given
    #[arg(long)]
    seed: Option<u64>,

    /// Let the computer make the first move
    #[arg(long)]
    first: bool,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn build_agent(args: &Args) -> Result<Box<dyn Agent>> {
    Ok(match args.agent {
        AgentKind::AlphaBeta => {
            let config = AlphaBetaConfig::with_depth(args.depth);
            config.validate()?;
            Box::new(AlphaBeta::new(config))
        }
        AgentKind::Mcts => {
            let config = MctsConfig {
                seed: args.seed,
                ..MctsConfig::with_time_budget(Duration::from_millis(args.budget_ms))
            };
            config.validate()?;
            Box::new(Mcts::new(config))
        }
    })
}

// draws the board with coloured tiles, top row first
fn display(board: &Board) -> Result<()> {
    let mut stdout = stdout();

    let columns: String = (0..WIDTH).map(|column| column.to_string()).collect();
    stdout.queue(PrintStyledContent(style(columns + "\n")))?;
    for row in (0..HEIGHT).rev() {
        for column in 0..WIDTH {
            stdout.queue(PrintStyledContent(
                style("O")
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(match board.get(row, column) {
                        Cell::PlayerOne => Color::Red,
                        Cell::PlayerTwo => Color::Yellow,
                        Cell::Empty => Color::DarkBlue,
                    }),
            ))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;
    Ok(())
}

fn read_column(board: &Board) -> Result<usize> {
    let stdin = stdin();
    loop {
        print!("Move input > ");
        stdout().flush()?;
        let mut input_str = String::new();
        if stdin.read_line(&mut input_str)? == 0 {
            anyhow::bail!("input closed");
        }

        match input_str.trim().parse::<usize>() {
            Err(_) => println!("Invalid number: {}", input_str.trim()),
            Ok(column) if column >= WIDTH => println!("{}", Error::ColumnOutOfRange { column }),
            Ok(column) if !board.playable(column) => println!("{}", Error::ColumnFull { column }),
            Ok(column) => return Ok(column),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let mut agent = build_agent(&args)?;
    let computer = if args.first { Player::One } else { Player::Two };
    info!(agent = agent.name(), %computer, "starting game");

    println!("Welcome to Connect 4\n");
    println!("You are {}, the computer ({}) is {}\n", computer.opponent(), agent.name(), computer);

    let mut board = Board::new();
    let mut player = Player::One;

    // game loop
    loop {
        display(&board)?;

        let column = if player == computer {
            let spinner = ProgressBar::new_spinner();
            spinner.set_message("Computer is thinking...");
            spinner.enable_steady_tick(100);
            let column = agent.choose_move(&board, player);
            spinner.finish_and_clear();

            let column = column?;
            println!("{} plays column {}", player, column);
            column
        } else {
            read_column(&board)?
        };

        board.drop(column, player)?;

        match board.game_outcome(player, Some(column)) {
            GameState::Win => {
                display(&board)?;
                println!("{} wins!", player);
                break;
            }
            GameState::Draw => {
                display(&board)?;
                println!("Draw!");
                break;
            }
            GameState::Ongoing => player = player.opponent(),
        }
    }
    Ok(())
}
