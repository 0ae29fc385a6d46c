use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Read(#[from] abiml_reader::err::ReadError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad configuration: {0}")]
    Conf(#[from] toml::de::Error),
    #[error("empty document")]
    EmptyDocument,
}

pub type Result<T> = std::result::Result<T, DriverError>;
