use crate::err::{DriverError, Result};
use crate::unit::pack::read_unit_at_cursor;
use abiml_ir::{Corpus, TranslationUnit};
use abiml_reader::context::ReadContext;
use abiml_reader::err::ReadError;
use abiml_reader::xml::cursor::Cursor;
use std::io::Read;
use std::path::Path;

pub fn read_corpus_document_from_file(path: impl AsRef<Path>) -> Result<Corpus> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path)?;
    read_corpus_document_from_buffer(&src, path.display().to_string())
}

pub fn read_corpus_document_from_reader(
    mut reader: impl Read, path: impl Into<String>,
) -> Result<Corpus> {
    let mut src = String::new();
    reader.read_to_string(&mut src)?;
    read_corpus_document_from_buffer(&src, path)
}

/// Read an `abi-corpus` document: several `abi-instr` sub-documents sharing
/// one stream. Each unit gets fresh identifier tables; ids do not leak
/// across units.
pub fn read_corpus_document_from_buffer(src: &str, path: impl Into<String>) -> Result<Corpus> {
    let mut cursor = Cursor::new(src);
    let mut ctx = ReadContext::new();
    cursor.advance().map_err(ReadError::from)?;
    let mut corpus = Corpus::new(path);
    match cursor.cur() {
        | None => return Err(DriverError::EmptyDocument),
        | Some(root) if root.name != "abi-corpus" => {
            return Err(ReadError::UnexpectedRoot(root.name.clone()).into());
        }
        | Some(root) => {
            if let Some(p) = root.attr("path") {
                corpus.path = p.to_owned();
            }
        }
    }
    cursor.advance().map_err(ReadError::from)?;
    loop {
        match cursor.cur() {
            | None => break,
            | Some(elem) if elem.name == "abi-instr" => {
                let mut tu = TranslationUnit::new(String::new());
                read_unit_at_cursor(&mut cursor, &mut ctx, &mut tu)?;
                corpus.units.push(tu);
                // the cursor is already parked on the next unit, if any
            }
            | Some(elem) => {
                return Err(ReadError::UnexpectedElement(elem.name.clone()).into());
            }
        }
    }
    Ok(corpus)
}
