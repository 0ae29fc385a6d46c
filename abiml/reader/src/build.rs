//! One builder per element kind. Builders return `Ok(None)` when the tag is
//! not theirs (so callers can chain alternatives), `Ok(Some(id))` on
//! success, and `Err` on a structural or reference failure. A builder that
//! fails never registers its partial node.

use crate::attrs;
use crate::context::ReadContext;
use crate::err::{ReadError, Result};
use crate::xml::cursor::ElemNode;
use abiml_ir::*;

/* --------------------------------- Helpers -------------------------------- */

fn push_decl(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, id: NodeId, node: &ElemNode, sync: bool,
    attach: bool,
) -> Result<()> {
    if sync {
        ctx.sync_depth(node.elem.depth);
    }
    ctx.push_decl(tu, id, node.elem.depth, attach)
}

fn push_and_key(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, key: &str, id: NodeId, node: &ElemNode,
    sync: bool, attach: bool,
) -> Result<()> {
    push_decl(ctx, tu, id, node, sync, attach)?;
    ctx.register_type(key, id)
}

// The *_mut accessors below recover the concrete payload of a node this
// module just allocated; the variant is known by construction.

fn class_mut<'a>(tu: &'a mut TranslationUnit, id: &NodeId) -> &'a mut ClassType {
    match tu.node_mut(id) {
        | Node::Class(c) => c,
        | _ => unreachable!(),
    }
}

fn fn_mut<'a>(tu: &'a mut TranslationUnit, id: &NodeId) -> &'a mut FunctionDecl {
    match tu.node_mut(id) {
        | Node::Function(f) => f,
        | _ => unreachable!(),
    }
}

fn fn_tmpl_mut<'a>(tu: &'a mut TranslationUnit, id: &NodeId) -> &'a mut FnTemplateDecl {
    match tu.node_mut(id) {
        | Node::FnTemplate(t) => t,
        | _ => unreachable!(),
    }
}

fn class_tmpl_mut<'a>(tu: &'a mut TranslationUnit, id: &NodeId) -> &'a mut ClassTemplateDecl {
    match tu.node_mut(id) {
        | Node::ClassTemplate(t) => t,
        | _ => unreachable!(),
    }
}

fn composition_mut<'a>(tu: &'a mut TranslationUnit, id: &NodeId) -> &'a mut TypeComposition {
    match tu.node_mut(id) {
        | Node::TypeComposition(c) => c,
        | _ => unreachable!(),
    }
}

/* ---------------------------------- Types --------------------------------- */

/// Alternation over every type-introducing element.
pub fn build_type(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, sync: bool, attach: bool,
) -> Result<Option<NodeId>> {
    if let Some(id) = build_type_decl(ctx, tu, node, sync, attach)? {
        return Ok(Some(id));
    }
    if let Some(id) = build_qualified_type(ctx, tu, node, sync, attach)? {
        return Ok(Some(id));
    }
    if let Some(id) = build_pointer_type(ctx, tu, node, sync, attach)? {
        return Ok(Some(id));
    }
    if let Some(id) = build_reference_type(ctx, tu, node, sync, attach)? {
        return Ok(Some(id));
    }
    if let Some(id) = build_enum_type(ctx, tu, node, sync, attach)? {
        return Ok(Some(id));
    }
    if let Some(id) = build_typedef(ctx, tu, node, sync, attach)? {
        return Ok(Some(id));
    }
    if let Some(id) = build_class(ctx, tu, node, sync, attach)? {
        return Ok(Some(id));
    }
    Ok(None)
}

pub fn build_type_decl(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, sync: bool, attach: bool,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "type-decl" {
        return Ok(None);
    }
    let name = attrs::required(elem, "name")?.to_owned();
    let key = attrs::required(elem, "id")?.to_owned();
    let (size, align) = attrs::size_align(elem)?;
    let loc = attrs::location(elem, &mut tu.locs)?;
    let id = tu.alloc(BasicType { name, size, align, loc });
    push_and_key(ctx, tu, &key, id, node, sync, attach)?;
    Ok(Some(id))
}

pub fn build_qualified_type(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, sync: bool, attach: bool,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "qualified-type-def" {
        return Ok(None);
    }
    let underlying = ctx.resolve_type(attrs::required(elem, "type-id")?)?;
    let cv = CvQual { is_const: attrs::flag(elem, "const"), is_volatile: attrs::flag(elem, "volatile") };
    let key = attrs::required(elem, "id")?.to_owned();
    let loc = attrs::location(elem, &mut tu.locs)?;
    let id = tu.alloc(QualifiedType { underlying, cv, loc });
    push_and_key(ctx, tu, &key, id, node, sync, attach)?;
    Ok(Some(id))
}

pub fn build_pointer_type(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, sync: bool, attach: bool,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "pointer-type-def" {
        return Ok(None);
    }
    let pointee = ctx.resolve_type(attrs::required(elem, "type-id")?)?;
    let (size, align) = attrs::size_align(elem)?;
    let key = attrs::required(elem, "id")?.to_owned();
    let loc = attrs::location(elem, &mut tu.locs)?;
    let id = tu.alloc(PointerType { pointee, size, align, loc });
    push_and_key(ctx, tu, &key, id, node, sync, attach)?;
    Ok(Some(id))
}

pub fn build_reference_type(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, sync: bool, attach: bool,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "reference-type-def" {
        return Ok(None);
    }
    let referent = ctx.resolve_type(attrs::required(elem, "type-id")?)?;
    let kind = attrs::ref_kind(elem)?;
    let (size, align) = attrs::size_align(elem)?;
    let key = attrs::required(elem, "id")?.to_owned();
    let loc = attrs::location(elem, &mut tu.locs)?;
    let id = tu.alloc(ReferenceType { referent, kind, size, align, loc });
    push_and_key(ctx, tu, &key, id, node, sync, attach)?;
    Ok(Some(id))
}

pub fn build_enum_type(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, sync: bool, attach: bool,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "enum-decl" {
        return Ok(None);
    }
    let name = attrs::required(elem, "name")?.to_owned();
    let key = attrs::required(elem, "id")?.to_owned();
    let loc = attrs::location(elem, &mut tu.locs)?;
    let mut underlying = None;
    let mut enumerators = Vec::new();
    for child in &node.children {
        match child.elem.name.as_str() {
            | "underlying-type" => {
                underlying = Some(ctx.resolve_type(attrs::required(&child.elem, "type-id")?)?);
            }
            | "enumerator" => {
                let name = attrs::required(&child.elem, "name")?.to_owned();
                let value = attrs::i64_attr(&child.elem, "value")?.ok_or_else(|| {
                    ReadError::MissingAttr { elem: child.elem.name.clone(), attr: "value" }
                })?;
                enumerators.push(Enumerator { name, value });
            }
            | _ => {}
        }
    }
    let underlying = underlying.ok_or_else(|| ReadError::MissingChild {
        elem: elem.name.clone(),
        child: "underlying-type",
    })?;
    let id = tu.alloc(EnumType { name, underlying, enumerators, loc });
    push_and_key(ctx, tu, &key, id, node, sync, attach)?;
    Ok(Some(id))
}

pub fn build_typedef(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, sync: bool, attach: bool,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "typedef-decl" {
        return Ok(None);
    }
    let name = attrs::required(elem, "name")?.to_owned();
    let underlying = ctx.resolve_type(attrs::required(elem, "type-id")?)?;
    let key = attrs::required(elem, "id")?.to_owned();
    let loc = attrs::location(elem, &mut tu.locs)?;
    let id = tu.alloc(TypedefDecl { name, underlying, loc });
    push_and_key(ctx, tu, &key, id, node, sync, attach)?;
    Ok(Some(id))
}

/* --------------------------------- Classes -------------------------------- */

pub fn build_class(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, sync: bool, attach: bool,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "class-decl" {
        return Ok(None);
    }
    let name = attrs::required(elem, "name")?.to_owned();
    let key = attrs::required(elem, "id")?.to_owned();
    let (size, align) = attrs::size_align(elem)?;
    let visibility = attrs::visibility(elem);
    let decl_only = attrs::flag(elem, "is-declaration-only");
    let def_id = elem.attr("def-of-decl-id").map(str::to_owned);
    let loc = attrs::location(elem, &mut tu.locs)?;
    if decl_only && def_id.is_some() {
        return Err(ReadError::DeclOnlyDefinition(name));
    }
    // `promoted` carries the registry key to overwrite and the stub node
    // this class supersedes.
    let promoted: Option<(String, NodeId)> = match &def_id {
        | Some(did) => {
            let stub = ctx.resolve_type(did)?;
            let is_stub = matches!(&tu[&stub], Node::Class(c) if c.is_decl_only);
            if !is_stub {
                return Err(ReadError::WrongKind {
                    id: did.clone(),
                    expected: "declaration-only class",
                });
            }
            Some((did.clone(), stub))
        }
        | None => match ctx.lookup_type(&key) {
            | Some(existing) => {
                let is_stub = matches!(&tu[&existing], Node::Class(c) if c.is_decl_only);
                if !is_stub {
                    return Err(ReadError::DuplicateId(key));
                }
                if decl_only {
                    // a repeated forward declaration resolves to the first stub
                    return Ok(Some(existing));
                }
                Some((key.clone(), existing))
            }
            | None => None,
        },
    };
    let id = tu.alloc(ClassType {
        name,
        size,
        align,
        visibility,
        is_decl_only: decl_only,
        earlier_decl: promoted.as_ref().map(|(_, stub)| *stub),
        bases: Vec::new(),
        member_types: Vec::new(),
        data_members: Vec::new(),
        member_fns: Vec::new(),
        member_templates: Vec::new(),
        members: Vec::new(),
        loc,
    });
    push_decl(ctx, tu, id, node, sync, attach)?;
    if !decl_only {
        for child in &node.children {
            build_class_member(ctx, tu, &id, child)?;
        }
    }
    match &promoted {
        | Some((did, _)) => {
            ctx.replace_type(did, id);
            if did != &key {
                ctx.register_type(&key, id)?;
            }
        }
        | None => ctx.register_type(&key, id)?,
    }
    Ok(Some(id))
}

fn build_class_member(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, class: &NodeId, child: &ElemNode,
) -> Result<()> {
    match child.elem.name.as_str() {
        | "base-class" => {
            let base = ctx.resolve_type(attrs::required(&child.elem, "type-id")?)?;
            if !matches!(&tu[&base], Node::Class(_)) {
                return Err(ReadError::WrongKind {
                    id: attrs::required(&child.elem, "type-id")?.to_owned(),
                    expected: "class",
                });
            }
            let access = attrs::access(&child.elem);
            let offset = attrs::u64_attr(&child.elem, "layout-offset-in-bits")?;
            let is_virtual = attrs::flag(&child.elem, "is-virtual");
            class_mut(tu, class).bases.push(BaseSpec { base, access, offset, is_virtual });
        }
        | "member-type" => {
            let access = attrs::access(&child.elem);
            for sub in &child.children {
                // inner types attach to the class scope as they build
                if let Some(ty) = build_type(ctx, tu, sub, true, true)? {
                    class_mut(tu, class).member_types.push(MemberType { ty, access });
                }
            }
        }
        | "data-member" => {
            let access = attrs::access(&child.elem);
            let is_static = attrs::flag(&child.elem, "static");
            let offset = attrs::u64_attr(&child.elem, "layout-offset-in-bits")?;
            for sub in &child.children {
                if let Some(var) = build_var(ctx, tu, sub, true, false)? {
                    class_mut(tu, class)
                        .data_members
                        .push(DataMember { var, access, is_static, offset });
                }
            }
        }
        | "member-function" => {
            let access = attrs::access(&child.elem);
            let vtable_offset = attrs::u64_attr(&child.elem, "vtable-offset")?;
            let is_static = attrs::flag(&child.elem, "static");
            let is_ctor = attrs::flag(&child.elem, "constructor");
            let is_dtor = attrs::flag(&child.elem, "destructor");
            let is_const = attrs::flag(&child.elem, "const");
            for sub in &child.children {
                if let Some(func) = build_function(ctx, tu, sub, Some(*class), true, false)? {
                    class_mut(tu, class).member_fns.push(MemberFn {
                        func,
                        access,
                        vtable_offset,
                        is_static,
                        is_ctor,
                        is_dtor,
                        is_const,
                    });
                }
            }
        }
        | "member-template" => {
            let access = attrs::access(&child.elem);
            let is_static = attrs::flag(&child.elem, "static");
            let is_ctor = attrs::flag(&child.elem, "constructor");
            let is_const = attrs::flag(&child.elem, "const");
            for sub in &child.children {
                let tmpl = match build_fn_template(ctx, tu, sub, true, false)? {
                    | Some(t) => Some(t),
                    | None => build_class_template(ctx, tu, sub, true, false)?,
                };
                if let Some(tmpl) = tmpl {
                    class_mut(tu, class).member_templates.push(MemberTemplate {
                        tmpl,
                        access,
                        is_static,
                        is_ctor,
                        is_const,
                    });
                }
            }
        }
        // unknown children are ignored for forward compatibility
        | _ => {}
    }
    Ok(())
}

/* ------------------------------- Declarations ------------------------------ */

pub fn build_var(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, sync: bool, attach: bool,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "var-decl" {
        return Ok(None);
    }
    let name = attrs::required(elem, "name")?.to_owned();
    let ty = ctx.resolve_type(attrs::required(elem, "type-id")?)?;
    let mangled_name = elem.attr("mangled-name").map(str::to_owned);
    let visibility = attrs::visibility(elem);
    let binding = attrs::binding(elem);
    let loc = attrs::location(elem, &mut tu.locs)?;
    let id = tu.alloc(VarDecl { name, ty, mangled_name, visibility, binding, loc });
    push_decl(ctx, tu, id, node, sync, attach)?;
    Ok(Some(id))
}

pub fn build_function(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, receiver: Option<NodeId>,
    sync: bool, attach: bool,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "function-decl" {
        return Ok(None);
    }
    let name = attrs::required(elem, "name")?.to_owned();
    let mangled_name = elem.attr("mangled-name").map(str::to_owned);
    let declared_inline = attrs::flag(elem, "declared-inline");
    let visibility = attrs::visibility(elem);
    let binding = attrs::binding(elem);
    let (size, align) = attrs::size_align(elem)?;
    let loc = attrs::location(elem, &mut tu.locs)?;
    let fname = name.clone();
    let id = tu.alloc(FunctionDecl {
        name,
        mangled_name,
        declared_inline,
        visibility,
        binding,
        sig: FnSignature { receiver, params: Vec::new(), ret: None, size, align },
        loc,
    });
    push_decl(ctx, tu, id, node, sync, attach)?;
    for child in &node.children {
        match child.elem.name.as_str() {
            | "parameter" => {
                let is_variadic = attrs::flag(&child.elem, "is-variadic");
                let ty = if is_variadic {
                    None
                } else {
                    Some(ctx.resolve_type(attrs::required(&child.elem, "type-id")?)?)
                };
                let pname = child.elem.attr("name").unwrap_or_default().to_owned();
                let is_artificial = attrs::flag(&child.elem, "is-artificial");
                let ploc = attrs::location(&child.elem, &mut tu.locs)?;
                let func = fn_mut(tu, &id);
                if is_variadic && func.sig.params.iter().any(|p| p.is_variadic) {
                    return Err(ReadError::ExtraVariadic(fname));
                }
                func.sig.params.push(FnParam {
                    ty,
                    name: pname,
                    is_variadic,
                    is_artificial,
                    loc: ploc,
                });
            }
            | "return" => {
                let ret = ctx.resolve_type(attrs::required(&child.elem, "type-id")?)?;
                fn_mut(tu, &id).sig.ret = Some(ret);
            }
            | _ => {}
        }
    }
    Ok(Some(id))
}

/* -------------------------------- Templates -------------------------------- */

pub fn build_fn_template(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, sync: bool, attach: bool,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "function-template-decl" {
        return Ok(None);
    }
    let key = attrs::required(elem, "id")?.to_owned();
    if ctx.lookup_fn_template(&key).is_some() {
        return Err(ReadError::DuplicateId(key));
    }
    let visibility = attrs::visibility(elem);
    let binding = attrs::binding(elem);
    let loc = attrs::location(elem, &mut tu.locs)?;
    let id = tu.alloc(FnTemplateDecl {
        visibility,
        binding,
        params: Vec::new(),
        pattern: None,
        members: Vec::new(),
        loc,
    });
    push_decl(ctx, tu, id, node, sync, attach)?;
    let mut index = 0;
    for child in &node.children {
        if let Some(param) = build_template_parameter(ctx, tu, child, index)? {
            index += 1;
            fn_tmpl_mut(tu, &id).params.push(param);
        } else if let Some(func) = build_function(ctx, tu, child, None, true, true)? {
            let tmpl = fn_tmpl_mut(tu, &id);
            if tmpl.pattern.is_some() {
                return Err(ReadError::UnexpectedElement(child.elem.name.clone()));
            }
            tmpl.pattern = Some(func);
        }
    }
    if fn_tmpl_mut(tu, &id).pattern.is_none() {
        return Err(ReadError::MissingChild { elem: elem.name.clone(), child: "function-decl" });
    }
    ctx.register_fn_template(&key, id)?;
    Ok(Some(id))
}

pub fn build_class_template(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, sync: bool, attach: bool,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "class-template-decl" {
        return Ok(None);
    }
    let key = attrs::required(elem, "id")?.to_owned();
    if ctx.lookup_class_template(&key).is_some() {
        return Err(ReadError::DuplicateId(key));
    }
    let visibility = attrs::visibility(elem);
    let loc = attrs::location(elem, &mut tu.locs)?;
    let id = tu.alloc(ClassTemplateDecl {
        visibility,
        params: Vec::new(),
        pattern: None,
        members: Vec::new(),
        loc,
    });
    push_decl(ctx, tu, id, node, sync, attach)?;
    let mut index = 0;
    for child in &node.children {
        if let Some(param) = build_template_parameter(ctx, tu, child, index)? {
            index += 1;
            class_tmpl_mut(tu, &id).params.push(param);
        } else if let Some(class) = build_class(ctx, tu, child, true, true)? {
            let tmpl = class_tmpl_mut(tu, &id);
            if tmpl.pattern.is_some() {
                return Err(ReadError::UnexpectedElement(child.elem.name.clone()));
            }
            tmpl.pattern = Some(class);
        }
    }
    if class_tmpl_mut(tu, &id).pattern.is_none() {
        return Err(ReadError::MissingChild { elem: elem.name.clone(), child: "class-decl" });
    }
    ctx.register_class_template(&key, id)?;
    Ok(Some(id))
}

/// Alternation over the four template-parameter kinds. `index` is the
/// 0-based position among the parameter siblings, maintained by the caller.
pub fn build_template_parameter(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, index: u32,
) -> Result<Option<NodeId>> {
    if let Some(id) = build_type_tparam(ctx, tu, node, index)? {
        return Ok(Some(id));
    }
    if let Some(id) = build_non_type_tparam(ctx, tu, node, index)? {
        return Ok(Some(id));
    }
    if let Some(id) = build_template_tparam(ctx, tu, node, index)? {
        return Ok(Some(id));
    }
    if let Some(id) = build_type_composition(ctx, tu, node, index)? {
        return Ok(Some(id));
    }
    Ok(None)
}

fn build_type_tparam(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, index: u32,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "template-type-parameter" {
        return Ok(None);
    }
    let key = elem.attr("id").map(str::to_owned);
    if let Some(key) = &key {
        if ctx.lookup_type(key).is_some() {
            return Err(ReadError::DuplicateId(key.clone()));
        }
    }
    let name = elem.attr("name").unwrap_or_default().to_owned();
    let loc = attrs::location(elem, &mut tu.locs)?;
    let id = tu.alloc(TypeTemplateParam { index, name, loc });
    push_decl(ctx, tu, id, node, true, true)?;
    if let Some(key) = &key {
        ctx.register_type(key, id)?;
    }
    Ok(Some(id))
}

fn build_non_type_tparam(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, index: u32,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "template-non-type-parameter" {
        return Ok(None);
    }
    let ty = ctx.resolve_type(attrs::required(elem, "type-id")?)?;
    let name = elem.attr("name").unwrap_or_default().to_owned();
    let loc = attrs::location(elem, &mut tu.locs)?;
    let id = tu.alloc(NonTypeTemplateParam { index, name, ty, loc });
    push_decl(ctx, tu, id, node, true, true)?;
    Ok(Some(id))
}

fn build_template_tparam(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, index: u32,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "template-template-parameter" {
        return Ok(None);
    }
    let key = attrs::required(elem, "id")?.to_owned();
    if ctx.lookup_type(&key).is_some() {
        return Err(ReadError::DuplicateId(key));
    }
    let name = elem.attr("name").unwrap_or_default().to_owned();
    let loc = attrs::location(elem, &mut tu.locs)?;
    let id = tu.alloc(TemplateTemplateParam { index, name, params: Vec::new(), loc });
    push_decl(ctx, tu, id, node, true, true)?;
    // inner parameters attach into this parameter's own scope
    let mut inner = 0;
    for child in &node.children {
        if build_template_parameter(ctx, tu, child, inner)?.is_some() {
            inner += 1;
        }
    }
    ctx.register_type(&key, id)?;
    Ok(Some(id))
}

fn build_type_composition(
    ctx: &mut ReadContext, tu: &mut TranslationUnit, node: &ElemNode, index: u32,
) -> Result<Option<NodeId>> {
    let elem = &node.elem;
    if elem.name != "template-parameter-type-composition" {
        return Ok(None);
    }
    let loc = attrs::location(elem, &mut tu.locs)?;
    let id = tu.alloc(TypeComposition { index, composed: None, loc });
    push_decl(ctx, tu, id, node, true, true)?;
    for child in &node.children {
        let composed = match build_pointer_type(ctx, tu, child, true, true)? {
            | Some(t) => Some(t),
            | None => match build_reference_type(ctx, tu, child, true, true)? {
                | Some(t) => Some(t),
                | None => build_qualified_type(ctx, tu, child, true, true)?,
            },
        };
        if composed.is_some() {
            composition_mut(tu, &id).composed = composed;
        }
    }
    Ok(Some(id))
}
