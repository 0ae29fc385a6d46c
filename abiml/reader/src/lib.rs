//! Reconstructs IR nodes from a streamed abixml document.

/// the XML-subset front end: lexer and pull cursor
pub mod xml {
    pub mod lexer;
    pub mod cursor;
    pub mod err;

}

pub mod context;
pub mod attrs;
pub mod build;
pub mod handle;
pub mod err;


pub use context::{ReadContext, WRAPPER_TAGS};
pub use err::{ReadError, Result};
pub use handle::handle_element;
