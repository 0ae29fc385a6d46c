use crate::xml::err::XmlError;
use thiserror::Error;

/// Reader failures fall into two families: structural (the document breaks
/// the element grammar) and reference (an id fails to resolve). Either is
/// fatal to the document being read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error("unexpected root element `{0}`")]
    UnexpectedRoot(String),
    #[error("unexpected element `{0}`")]
    UnexpectedElement(String),
    #[error("`namespace-decl` outside of a namespace or the global scope")]
    MisplacedNamespace,
    #[error("declaration outside of any scope")]
    NoScope,
    #[error("missing attribute `{attr}` on `{elem}`")]
    MissingAttr { elem: String, attr: &'static str },
    #[error("malformed value `{value}` for `{attr}` on `{elem}`")]
    MalformedAttr { elem: String, attr: &'static str, value: String },
    #[error("location on `{0}` has a filepath but no line or column")]
    PartialLocation(String),
    #[error("missing `{child}` under `{elem}`")]
    MissingChild { elem: String, child: &'static str },
    #[error("duplicate id `{0}`")]
    DuplicateId(String),
    #[error("unresolved reference to id `{0}`")]
    UnresolvedId(String),
    #[error("id `{id}` does not name a {expected}")]
    WrongKind { id: String, expected: &'static str },
    #[error("`{0}` is declaration-only but carries `def-of-decl-id`")]
    DeclOnlyDefinition(String),
    #[error("extra variadic parameter in `{0}`")]
    ExtraVariadic(String),
}

pub type Result<T> = std::result::Result<T, ReadError>;
