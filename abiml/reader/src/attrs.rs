//! Typed views over raw element attributes.

use crate::err::{ReadError, Result};
use crate::xml::cursor::Elem;
use abiml_ir::{Access, Binding, RefKind, Visibility};
use abiml_utils::loc::{Loc, LocMgr};

pub fn required<'a>(elem: &'a Elem, attr: &'static str) -> Result<&'a str> {
    elem.attr(attr).ok_or_else(|| ReadError::MissingAttr { elem: elem.name.clone(), attr })
}

/// A boolean attribute: present with the value `yes`.
pub fn flag(elem: &Elem, attr: &str) -> bool {
    elem.attr(attr) == Some("yes")
}

pub fn u64_attr(elem: &Elem, attr: &'static str) -> Result<Option<u64>> {
    match elem.attr(attr) {
        | None => Ok(None),
        | Some(raw) => raw.parse().map(Some).map_err(|_| ReadError::MalformedAttr {
            elem: elem.name.clone(),
            attr,
            value: raw.to_owned(),
        }),
    }
}

pub fn i64_attr(elem: &Elem, attr: &'static str) -> Result<Option<i64>> {
    match elem.attr(attr) {
        | None => Ok(None),
        | Some(raw) => raw.parse().map(Some).map_err(|_| ReadError::MalformedAttr {
            elem: elem.name.clone(),
            attr,
            value: raw.to_owned(),
        }),
    }
}

/// `size-in-bits` / `alignment-in-bits`, both defaulting to 0.
pub fn size_align(elem: &Elem) -> Result<(u64, u64)> {
    let size = u64_attr(elem, "size-in-bits")?.unwrap_or(0);
    let align = u64_attr(elem, "alignment-in-bits")?.unwrap_or(0);
    Ok((size, align))
}

/// Unknown visibility strings fall back to `default`, mirroring how
/// producers treat visibility as advisory.
pub fn visibility(elem: &Elem) -> Option<Visibility> {
    elem.attr("visibility").map(|raw| match raw {
        | "hidden" => Visibility::Hidden,
        | "internal" => Visibility::Internal,
        | "protected" => Visibility::Protected,
        | _ => Visibility::Default,
    })
}

pub fn binding(elem: &Elem) -> Option<Binding> {
    elem.attr("binding").map(|raw| match raw {
        | "local" => Binding::Local,
        | "weak" => Binding::Weak,
        | _ => Binding::Global,
    })
}

pub fn access(elem: &Elem) -> Option<Access> {
    elem.attr("access").map(|raw| match raw {
        | "private" => Access::Private,
        | "protected" => Access::Protected,
        | _ => Access::Public,
    })
}

/// Reference kind; absent means lvalue.
pub fn ref_kind(elem: &Elem) -> Result<RefKind> {
    match elem.attr("kind") {
        | None | Some("lvalue") => Ok(RefKind::Lvalue),
        | Some("rvalue") => Ok(RefKind::Rvalue),
        | Some(raw) => Err(ReadError::MalformedAttr {
            elem: elem.name.clone(),
            attr: "kind",
            value: raw.to_owned(),
        }),
    }
}

/// Resolve the `filepath`/`line`/`column` triple into an interned location.
/// No `filepath` means no location; a `filepath` without both coordinates is
/// a structural error.
pub fn location(elem: &Elem, locs: &mut LocMgr) -> Result<Option<Loc>> {
    let Some(path) = elem.attr("filepath") else {
        return Ok(None);
    };
    let path = path.to_owned();
    let (Some(line), Some(column)) = (u64_attr(elem, "line")?, u64_attr(elem, "column")?)
    else {
        return Err(ReadError::PartialLocation(elem.name.clone()));
    };
    Ok(Some(locs.intern(&path, line as u32, column as u32)))
}
