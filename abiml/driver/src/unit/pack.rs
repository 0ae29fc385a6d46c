use crate::err::{DriverError, Result};
use abiml_ir::{ScopeRef, TranslationUnit};
use abiml_reader::attrs;
use abiml_reader::context::ReadContext;
use abiml_reader::err::ReadError;
use abiml_reader::handle::handle_element;
use abiml_reader::xml::cursor::Cursor;
use std::io::Read;
use std::path::Path;

pub fn read_unit_from_file(path: impl AsRef<Path>) -> Result<TranslationUnit> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path)?;
    read_unit_from_buffer(&src, path.display().to_string())
}

pub fn read_unit_from_reader(
    mut reader: impl Read, path: impl Into<String>,
) -> Result<TranslationUnit> {
    let mut src = String::new();
    reader.read_to_string(&mut src)?;
    read_unit_from_buffer(&src, path)
}

/// Read one `abi-instr` document. The `path` names the source for
/// diagnostics; a `path` attribute on the root overrides it.
pub fn read_unit_from_buffer(src: &str, path: impl Into<String>) -> Result<TranslationUnit> {
    let mut cursor = Cursor::new(src);
    let mut ctx = ReadContext::new();
    cursor.advance().map_err(ReadError::from)?;
    match cursor.cur() {
        | None => return Err(DriverError::EmptyDocument),
        | Some(root) if root.name != "abi-instr" => {
            return Err(ReadError::UnexpectedRoot(root.name.clone()).into());
        }
        | Some(_) => {}
    }
    let mut tu = TranslationUnit::new(path);
    read_unit_at_cursor(&mut cursor, &mut ctx, &mut tu)?;
    // a single-unit document has exactly one root
    if let Some(extra) = cursor.cur() {
        return Err(ReadError::UnexpectedElement(extra.name.clone()).into());
    }
    Ok(tu)
}

/// Core unit loop, shared with the corpus driver. The cursor must be
/// positioned on an `abi-instr` element; on return it is either exhausted
/// or parked on the next sibling element (the one whose depth emptied the
/// scope stack).
pub(crate) fn read_unit_at_cursor(
    cursor: &mut Cursor, ctx: &mut ReadContext, tu: &mut TranslationUnit,
) -> Result<()> {
    let Some(root) = cursor.cur() else {
        return Ok(());
    };
    ctx.clear();
    if let Some(path) = root.attr("path") {
        tu.path = path.to_owned();
    }
    tu.address_size = attrs::u64_attr(root, "address-size")?;
    ctx.push_scope_entry(ScopeRef::Global, ScopeRef::Global, root.depth);
    loop {
        cursor.advance().map_err(ReadError::from)?;
        let Some(depth) = cursor.cur().map(|elem| elem.depth) else {
            return Ok(());
        };
        ctx.sync_depth(depth);
        if ctx.stack_is_empty() {
            // the new element is a sibling of the unit root; it belongs to
            // the caller (the next unit of a corpus document)
            return Ok(());
        }
        handle_element(cursor, ctx, tu)?;
    }
}
