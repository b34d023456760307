use thiserror::Error;

/// Error for invalid calculator input
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MortgageError {
    #[error("Mortgage amount must be a positive number, got {0}")]
    InvalidPrincipal(f64),

    #[error("Interest rate must be zero or a positive number, got {0}")]
    InvalidRate(f64),

    #[error("Loan term must be between 1 and 100 years, got {0}")]
    InvalidTerm(u32),

    #[error("Unknown repayment type: {0} (expected 'repayment' or 'interest_only')")]
    UnknownRepaymentType(String),
}
