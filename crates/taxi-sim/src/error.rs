use taxi_core::CoreError;
use thiserror::Error;

/// Structural misuse of the simulation.  A single taxi's bad configuration is
/// never an error here: that taxi is logged and left idle.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
