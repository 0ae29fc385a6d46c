//! Drivers that feed abixml streams through the reader: one per document
//! shape (single unit, corpus document, archive of entries).

pub mod conf;
pub mod err;

/// a single `abi-instr` document
pub mod unit {
    pub mod pack;
}

/// an `abi-corpus` document carrying several units in one stream
pub mod corpus {
    pub mod pack;
}

/// archives of named entries, each entry a complete unit document
pub mod archive {
    pub mod pack;

    #[cfg(test)]
    mod tests;
}

pub use conf::Conf;
pub use err::*;
pub use archive::pack::{ArchiveSource, DirArchive, MemArchive, read_corpus_from_archive};
pub use corpus::pack::{
    read_corpus_document_from_buffer, read_corpus_document_from_file,
    read_corpus_document_from_reader,
};
pub use unit::pack::{read_unit_from_buffer, read_unit_from_file, read_unit_from_reader};
