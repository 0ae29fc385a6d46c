use abiml_driver::{Conf, DriverError, MemArchive, read_corpus_from_archive};
use abiml_ir::Node;
use abiml_reader::err::ReadError;
use abiml_tests::{corpus, corpus_err, unit_err};
use pretty_assertions::assert_eq;

#[test]
fn empty_input_is_rejected() {
    assert!(matches!(unit_err(""), DriverError::EmptyDocument));
    assert!(matches!(corpus_err(""), DriverError::EmptyDocument));
}

#[test]
fn corpus_with_no_units_is_fine() {
    let corpus = corpus(r#"<abi-corpus path="lib.so"/>"#);
    assert_eq!(corpus.path, "lib.so");
    assert!(corpus.units.is_empty());
}

#[test]
fn corpus_reads_units_in_order() {
    let corpus = corpus(r#"
        <abi-corpus path="lib.so">
          <abi-instr path="a.cc" address-size="64">
            <type-decl name="int" size-in-bits="32" id="type-id-1"/>
          </abi-instr>
          <abi-instr path="b.cc">
            <type-decl name="char" size-in-bits="8" id="type-id-1"/>
            <type-decl name="long" size-in-bits="64" id="type-id-2"/>
          </abi-instr>
        </abi-corpus>
    "#);
    assert_eq!(corpus.path, "lib.so");
    assert_eq!(corpus.units.len(), 2);
    let a = &corpus.units[0];
    assert_eq!((a.path.as_str(), a.address_size, a.len()), ("a.cc", Some(64), 1));
    let b = &corpus.units[1];
    assert_eq!((b.path.as_str(), b.address_size, b.len()), ("b.cc", None, 2));
    assert_eq!(b[&b.global[0]].name(), Some("char"));
}

#[test]
fn corpus_units_have_independent_id_tables() {
    // the same id names a different type in each unit, which only works if
    // the tables reset between units
    let corpus = corpus(r#"
        <abi-corpus>
          <abi-instr path="a.cc">
            <type-decl name="int" size-in-bits="32" id="type-id-1"/>
            <pointer-type-def type-id="type-id-1" size-in-bits="64" id="type-id-2"/>
          </abi-instr>
          <abi-instr path="b.cc">
            <type-decl name="char" size-in-bits="8" id="type-id-1"/>
            <pointer-type-def type-id="type-id-1" size-in-bits="64" id="type-id-2"/>
          </abi-instr>
        </abi-corpus>
    "#);
    let b = &corpus.units[1];
    let Node::Pointer(p) = &b[&b.global[1]] else { panic!("expected a pointer") };
    assert_eq!(b[&p.pointee].name(), Some("char"));
}

#[test]
fn ids_do_not_leak_into_the_next_unit() {
    let err = corpus_err(r#"
        <abi-corpus>
          <abi-instr path="a.cc">
            <type-decl name="int" size-in-bits="32" id="type-id-1"/>
          </abi-instr>
          <abi-instr path="b.cc">
            <pointer-type-def type-id="type-id-1" size-in-bits="64" id="type-id-2"/>
          </abi-instr>
        </abi-corpus>
    "#);
    assert!(matches!(
        err,
        DriverError::Read(ReadError::UnresolvedId(id)) if id == "type-id-1"
    ));
}

#[test]
fn corpus_rejects_foreign_children() {
    let err = corpus_err(r#"
        <abi-corpus>
          <something-else/>
        </abi-corpus>
    "#);
    assert!(matches!(
        err,
        DriverError::Read(ReadError::UnexpectedElement(name)) if name == "something-else"
    ));
}

#[test]
fn archive_units_are_keyed_by_entry_name() {
    let mut archive = MemArchive::new();
    archive.add(
        "a.abi",
        // the path attribute loses to the entry name
        r#"<abi-instr path="elsewhere.cc">
             <type-decl name="int" size-in-bits="32" id="type-id-1"/>
           </abi-instr>"#,
    );
    archive.add("b.abi", "<abi-instr/>");
    let conf = Conf::default();
    let (corpus, read) =
        read_corpus_from_archive(&archive, "mem", &conf).expect("archive reads");
    assert_eq!(read, 2);
    assert_eq!(corpus.path, "mem");
    let names: Vec<_> = corpus.units.iter().map(|tu| tu.path.as_str()).collect();
    assert_eq!(names, ["a.abi", "b.abi"]);
    assert_eq!(corpus.units[0].len(), 1);
}

#[test]
fn archive_entries_do_not_share_id_tables() {
    let mut archive = MemArchive::new();
    archive.add(
        "a.abi",
        r#"<abi-instr><type-decl name="int" size-in-bits="32" id="type-id-1"/></abi-instr>"#,
    );
    archive.add(
        "b.abi",
        r#"<abi-instr><type-decl name="char" size-in-bits="8" id="type-id-1"/></abi-instr>"#,
    );
    let (corpus, read) =
        read_corpus_from_archive(&archive, "mem", &Conf::default()).expect("archive reads");
    assert_eq!(read, 2);
    assert_eq!(corpus.units[1][&corpus.units[1].global[0]].name(), Some("char"));
}
