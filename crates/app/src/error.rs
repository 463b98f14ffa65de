//! Application error types

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] hangout_core::Error),

    #[error(transparent)]
    Net(#[from] hangout_net::Error),
}
