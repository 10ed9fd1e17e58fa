use thiserror::Error;

use crate::config::ConfigError;
use crate::document::DocumentError;
use crate::replay::ReplayError;
use crate::state::list::ListError;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    List(#[from] ListError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Replay(#[from] ReplayError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
