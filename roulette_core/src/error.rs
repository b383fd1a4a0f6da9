#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RouletteError {
    #[error("item count must be at least 1, got {0}")]
    InvalidItemCount(usize),
    #[error("no items to spin")]
    EmptyItems,
    #[error("item {0} is blank")]
    BlankItem(usize),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type RouletteResult<T> = Result<T, RouletteError>;
