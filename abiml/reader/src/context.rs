use crate::err::{ReadError, Result};
use abiml_ir::{NodeId, ScopeRef, TranslationUnit};
use abiml_utils::arena::ArenaAssoc;

/// Wrapper elements spend one level of XML nesting without introducing an IR
/// scope of their own; they never produce a stack entry.
pub const WRAPPER_TAGS: [&str; 4] =
    ["member-type", "data-member", "member-function", "member-template"];

pub fn is_wrapper_tag(tag: &str) -> bool {
    WRAPPER_TAGS.contains(&tag)
}

/// One entry of the scope stack. `depth` is the XML depth of the element
/// that produced the entry; `scope` is the scope the declaration was
/// resolved against when pushed.
#[derive(Clone, Copy, Debug)]
pub struct ScopeEntry {
    pub decl: ScopeRef,
    pub scope: ScopeRef,
    pub depth: usize,
}

/// Per-document read state: the scope stack reconstructed from element
/// depths and the three identifier tables. Cleared wholesale at the start of
/// every document.
#[derive(Default)]
pub struct ReadContext {
    decls: Vec<ScopeEntry>,
    types: ArenaAssoc<String, NodeId>,
    fn_templates: ArenaAssoc<String, NodeId>,
    class_templates: ArenaAssoc<String, NodeId>,
}

impl ReadContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.decls.clear();
        self.types.clear();
        self.fn_templates.clear();
        self.class_templates.clear();
    }

    /* ------------------------------ Scope stack ------------------------------ */

    /// Pop every entry produced at `depth` or deeper. Called once per
    /// observed element; elements nested strictly deeper than everything on
    /// the stack pop nothing.
    pub fn sync_depth(&mut self, depth: usize) {
        while self.decls.last().is_some_and(|entry| entry.depth >= depth) {
            self.decls.pop();
        }
    }

    pub fn stack_is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn push_scope_entry(&mut self, decl: ScopeRef, scope: ScopeRef, depth: usize) {
        self.decls.push(ScopeEntry { decl, scope, depth });
    }

    /// The scope new declarations land in: the top entry itself when it is a
    /// scope, otherwise the scope that entry was attached against.
    pub fn current_scope(&self, tu: &TranslationUnit) -> Option<ScopeRef> {
        let entry = self.decls.last()?;
        match entry.decl {
            | ScopeRef::Global => Some(ScopeRef::Global),
            | ScopeRef::Node(id) if tu[&id].is_scope() => Some(ScopeRef::Node(id)),
            | ScopeRef::Node(_) => Some(entry.scope),
        }
    }

    /// Make `id` the current declaration at `depth`, attaching it to the
    /// current scope's member list unless `attach` is off (class member
    /// internals are recorded on the class instead).
    pub fn push_decl(
        &mut self, tu: &mut TranslationUnit, id: NodeId, depth: usize, attach: bool,
    ) -> Result<()> {
        let scope = self.current_scope(tu).ok_or(ReadError::NoScope)?;
        if attach && !tu.attach(scope, id) {
            return Err(ReadError::NoScope);
        }
        self.push_scope_entry(ScopeRef::Node(id), scope, depth);
        Ok(())
    }

    /* --------------------------- Identifier tables --------------------------- */

    pub fn register_type(&mut self, id: &str, node: NodeId) -> Result<()> {
        if self.types.contains_key(id) {
            return Err(ReadError::DuplicateId(id.to_owned()));
        }
        self.types.insert(id.to_owned(), node);
        Ok(())
    }
    /// Unconditional overwrite; only used to promote a declaration-only stub
    /// to its definition.
    pub fn replace_type(&mut self, id: &str, node: NodeId) {
        self.types.insert(id.to_owned(), node);
    }
    pub fn lookup_type(&self, id: &str) -> Option<NodeId> {
        self.types.get(id).copied()
    }
    /// Lookup that surfaces a miss as a reference error.
    pub fn resolve_type(&self, id: &str) -> Result<NodeId> {
        self.lookup_type(id).ok_or_else(|| ReadError::UnresolvedId(id.to_owned()))
    }

    pub fn register_fn_template(&mut self, id: &str, node: NodeId) -> Result<()> {
        if self.fn_templates.contains_key(id) {
            return Err(ReadError::DuplicateId(id.to_owned()));
        }
        self.fn_templates.insert(id.to_owned(), node);
        Ok(())
    }
    pub fn lookup_fn_template(&self, id: &str) -> Option<NodeId> {
        self.fn_templates.get(id).copied()
    }

    pub fn register_class_template(&mut self, id: &str, node: NodeId) -> Result<()> {
        if self.class_templates.contains_key(id) {
            return Err(ReadError::DuplicateId(id.to_owned()));
        }
        self.class_templates.insert(id.to_owned(), node);
        Ok(())
    }
    pub fn lookup_class_template(&self, id: &str) -> Option<NodeId> {
        self.class_templates.get(id).copied()
    }
}
