use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    #[error("invalid token at byte {at}")]
    Lex { at: usize },
    #[error("unexpected `{found}` at byte {at}")]
    Unexpected { found: String, at: usize },
    #[error("closing tag `</{found}>` does not match `<{expected}>`")]
    MismatchedClose { expected: String, found: String },
    #[error("document ended inside an open element")]
    UnexpectedEof,
    #[error("no current element")]
    NoElement,
}

pub type Result<T> = std::result::Result<T, XmlError>;
