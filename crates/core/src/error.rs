#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Balance overflow: {balance} + {reward} exceeds the representable range")]
    BalanceOverflow { balance: i64, reward: i64 },
}
