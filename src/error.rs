//! Error types shared by the board model and both searchers

/// Errors raised by the board model, the searchers and their configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid move, column {column} full")]
    ColumnFull { column: usize },

    #[error("invalid move, column {column} out of range, columns must be between 0 and {max}", max = crate::WIDTH - 1)]
    ColumnOutOfRange { column: usize },

    #[error("no legal move, the board is full")]
    NoLegalMove,

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_errors_display() {
        assert_eq!(
            Error::ColumnFull { column: 3 }.to_string(),
            "invalid move, column 3 full"
        );
        assert_eq!(
            Error::ColumnOutOfRange { column: 9 }.to_string(),
            "invalid move, column 9 out of range, columns must be between 0 and 6"
        );
    }

    #[test]
    fn board_error_display() {
        let err = Error::InvalidBoard("floating piece in column 2".into());
        assert_eq!(err.to_string(), "invalid board: floating piece in column 2");
    }
}
