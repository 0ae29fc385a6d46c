//! Stream-level element dispatch. The driver advances the cursor, syncs the
//! scope stack against the new element's depth, then calls
//! [`handle_element`]; builders therefore run with `sync` off here.

use crate::attrs;
use crate::build;
use crate::context::ReadContext;
use crate::err::{ReadError, Result};
use crate::xml::cursor::Cursor;
use abiml_ir::{NamespaceDecl, Node, ScopeRef, TranslationUnit};

pub fn handle_element(
    cursor: &mut Cursor, ctx: &mut ReadContext, tu: &mut TranslationUnit,
) -> Result<()> {
    let Some(tag) = cursor.cur().map(|elem| elem.name.clone()) else {
        return Ok(());
    };
    match tag.as_str() {
        // namespaces stay open on the stream; their children follow as
        // ordinary events and nest via the scope stack
        | "namespace-decl" => handle_namespace(cursor, ctx, tu),
        | "type-decl" | "qualified-type-def" | "pointer-type-def" | "reference-type-def"
        | "enum-decl" | "typedef-decl" | "class-decl" => {
            let node = cursor.expand()?;
            build::build_type(ctx, tu, &node, false, true)?;
            Ok(())
        }
        | "var-decl" => {
            let node = cursor.expand()?;
            build::build_var(ctx, tu, &node, false, true)?;
            Ok(())
        }
        | "function-decl" => {
            let node = cursor.expand()?;
            build::build_function(ctx, tu, &node, None, false, true)?;
            Ok(())
        }
        | "function-template-decl" => {
            let node = cursor.expand()?;
            build::build_fn_template(ctx, tu, &node, false, true)?;
            Ok(())
        }
        | "class-template-decl" => {
            let node = cursor.expand()?;
            build::build_class_template(ctx, tu, &node, false, true)?;
            Ok(())
        }
        | _ => Err(ReadError::UnexpectedElement(tag)),
    }
}

/// Namespaces may only appear in the global scope or in another namespace.
fn handle_namespace(
    cursor: &mut Cursor, ctx: &mut ReadContext, tu: &mut TranslationUnit,
) -> Result<()> {
    let scope = ctx.current_scope(tu).ok_or(ReadError::NoScope)?;
    let allowed = match scope {
        | ScopeRef::Global => true,
        | ScopeRef::Node(id) => matches!(&tu[&id], Node::Namespace(_)),
    };
    if !allowed {
        return Err(ReadError::MisplacedNamespace);
    }
    let Some(elem) = cursor.cur() else {
        return Ok(());
    };
    let name = attrs::required(elem, "name")?.to_owned();
    let depth = elem.depth;
    let loc = attrs::location(elem, &mut tu.locs)?;
    let id = tu.alloc(NamespaceDecl { name, members: Vec::new(), loc });
    ctx.push_decl(tu, id, depth, true)
}
