use crate::node::{Node, NodeId};
use abiml_utils::{arena::ArenaDense, loc::LocMgr};
use std::ops::Index;

/// Where a declaration is attached: the unit's global scope or a scope node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeRef {
    Global,
    Node(NodeId),
}

/// One compilation unit's worth of reconstructed ABI. The arena owns every
/// node; scopes and cross-references hold [`NodeId`]s into it.
#[derive(Debug)]
pub struct TranslationUnit {
    pub path: String,
    /// Pointer size of the target, in bits; `None` when the document does
    /// not say.
    pub address_size: Option<u64>,
    pub locs: LocMgr,
    nodes: ArenaDense<NodeId, Node>,
    /// Members of the global (root) scope, in declaration order.
    pub global: Vec<NodeId>,
}

impl TranslationUnit {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            address_size: None,
            locs: LocMgr::new(),
            nodes: ArenaDense::default(),
            global: Vec::new(),
        }
    }
    pub fn alloc(&mut self, node: impl Into<Node>) -> NodeId {
        self.nodes.alloc(node.into())
    }
    pub fn node(&self, id: &NodeId) -> &Node {
        &self.nodes[id]
    }
    pub fn node_mut(&mut self, id: &NodeId) -> &mut Node {
        &mut self.nodes[id]
    }
    /// Append `id` to the member list of `scope`. Returns `false` when the
    /// target node is not a scope.
    pub fn attach(&mut self, scope: ScopeRef, id: NodeId) -> bool {
        match scope {
            | ScopeRef::Global => {
                self.global.push(id);
                true
            }
            | ScopeRef::Node(s) => match self.nodes[&s].scope_members_mut() {
                | Some(members) => {
                    members.push(id);
                    true
                }
                | None => false,
            },
        }
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
    /// Look up a global-scope member by declared name.
    pub fn global_named(&self, name: &str) -> Option<NodeId> {
        self.global.iter().copied().find(|id| self.nodes[id].name() == Some(name))
    }
}

impl Index<&NodeId> for TranslationUnit {
    type Output = Node;
    fn index(&self, id: &NodeId) -> &Node {
        self.node(id)
    }
}

/// An ordered collection of translation units read from one corpus document
/// or archive.
#[derive(Debug)]
pub struct Corpus {
    pub path: String,
    pub units: Vec<TranslationUnit>,
}

impl Corpus {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), units: Vec::new() }
    }
}
