//! Monte Carlo Tree Search module
//!
//! This module contains all MCTS-related functionality:
//! - Tree node representation and UCB1 scoring
//! - The arena tree (expand, select, backpropagate)
//! - The time-bounded search loop and its move policy

pub mod node;
pub mod search;
pub mod tree;

pub use node::{Node, NodeId};
pub use search::{ChildStats, Mcts, MctsOutcome, MctsSearch};
pub use tree::{Playout, Tree};
