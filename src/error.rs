use thiserror::Error as ThisError;

use crate::chain::ChainError;
use crate::config::ConfigError;
use crate::content::UploadError;

///
/// Error
///
/// Every failure aborts the run; there is no recovery path.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
