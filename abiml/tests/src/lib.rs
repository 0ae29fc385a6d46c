//! Fixture helpers shared by the integration tests.

use abiml_driver::{DriverError, read_corpus_document_from_buffer, read_unit_from_buffer};
use abiml_ir::{ClassType, Corpus, Node, NodeId, TranslationUnit};
use unindent::unindent;

pub fn unit(doc: &str) -> TranslationUnit {
    match read_unit_from_buffer(&unindent(doc), "<fixture>") {
        | Ok(tu) => tu,
        | Err(err) => panic!("failed to read fixture: {}", err),
    }
}

pub fn unit_err(doc: &str) -> DriverError {
    match read_unit_from_buffer(&unindent(doc), "<fixture>") {
        | Ok(_) => panic!("expected the fixture to be rejected"),
        | Err(err) => err,
    }
}

pub fn corpus(doc: &str) -> Corpus {
    match read_corpus_document_from_buffer(&unindent(doc), "<fixture>") {
        | Ok(corpus) => corpus,
        | Err(err) => panic!("failed to read fixture: {}", err),
    }
}

pub fn corpus_err(doc: &str) -> DriverError {
    match read_corpus_document_from_buffer(&unindent(doc), "<fixture>") {
        | Ok(_) => panic!("expected the fixture to be rejected"),
        | Err(err) => err,
    }
}

/// The global-scope class named `name`, or panic.
pub fn class_named<'a>(tu: &'a TranslationUnit, name: &str) -> (NodeId, &'a ClassType) {
    let id = match tu.global_named(name) {
        | Some(id) => id,
        | None => panic!("no global named `{}`", name),
    };
    match &tu[&id] {
        | Node::Class(class) => (id, class),
        | other => panic!("`{}` is not a class: {:?}", name, other),
    }
}
