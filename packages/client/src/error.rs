use lattice_core::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to load module `{import_source}`: {message}")]
    ImportSourceFailure {
        import_source: String,
        message: String,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
