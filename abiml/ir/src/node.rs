use crate::*;
use abiml_utils::{arena::new_key_type, loc::Loc};
use derive_more::From;

new_key_type! {
    /// Non-owning handle to a node inside a [`TranslationUnit`]'s arena.
    pub struct NodeId<()>;
}

/* ---------------------------------- Types --------------------------------- */

/// A basic (builtin) type such as `int`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicType {
    pub name: String,
    pub size: u64,
    pub align: u64,
    pub loc: Option<Loc>,
}

/// A cv-qualified view of an underlying type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QualifiedType {
    pub underlying: NodeId,
    pub cv: CvQual,
    pub loc: Option<Loc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerType {
    pub pointee: NodeId,
    pub size: u64,
    pub align: u64,
    pub loc: Option<Loc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceType {
    pub referent: NodeId,
    pub kind: RefKind,
    pub size: u64,
    pub align: u64,
    pub loc: Option<Loc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enumerator {
    pub name: String,
    pub value: i64,
}

/// An enum type; enumerators keep their declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub underlying: NodeId,
    pub enumerators: Vec<Enumerator>,
    pub loc: Option<Loc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedefDecl {
    pub name: String,
    pub underlying: NodeId,
    pub loc: Option<Loc>,
}

/* --------------------------------- Classes -------------------------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseSpec {
    pub base: NodeId,
    pub access: Option<Access>,
    /// Layout offset of the base subobject, when laid out.
    pub offset: Option<u64>,
    pub is_virtual: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberType {
    pub ty: NodeId,
    pub access: Option<Access>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataMember {
    pub var: NodeId,
    pub access: Option<Access>,
    pub is_static: bool,
    /// `None` means "not laid out", distinct from an offset of 0.
    pub offset: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberFn {
    pub func: NodeId,
    pub access: Option<Access>,
    /// `None` when the function occupies no vtable slot.
    pub vtable_offset: Option<u64>,
    pub is_static: bool,
    pub is_ctor: bool,
    pub is_dtor: bool,
    pub is_const: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberTemplate {
    pub tmpl: NodeId,
    pub access: Option<Access>,
    pub is_static: bool,
    pub is_ctor: bool,
    pub is_const: bool,
}

/// A class or struct. A declaration-only class is a stub: no bases and no
/// members. A definition that supersedes an earlier stub keeps a back-link
/// to it in `earlier_decl`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassType {
    pub name: String,
    pub size: u64,
    pub align: u64,
    pub visibility: Option<Visibility>,
    pub is_decl_only: bool,
    pub earlier_decl: Option<NodeId>,
    pub bases: Vec<BaseSpec>,
    pub member_types: Vec<MemberType>,
    pub data_members: Vec<DataMember>,
    pub member_fns: Vec<MemberFn>,
    pub member_templates: Vec<MemberTemplate>,
    /// Lexical scope members, in declaration order.
    pub members: Vec<NodeId>,
    pub loc: Option<Loc>,
}

/* ------------------------------- Declarations ------------------------------ */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FnParam {
    /// `None` exactly for the variadic pseudo-parameter.
    pub ty: Option<NodeId>,
    pub name: String,
    pub is_variadic: bool,
    pub is_artificial: bool,
    pub loc: Option<Loc>,
}

/// The callable signature of a function; a method carries its class as the
/// implicit receiver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FnSignature {
    pub receiver: Option<NodeId>,
    pub params: Vec<FnParam>,
    pub ret: Option<NodeId>,
    pub size: u64,
    pub align: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub mangled_name: Option<String>,
    pub declared_inline: bool,
    pub visibility: Option<Visibility>,
    pub binding: Option<Binding>,
    pub sig: FnSignature,
    pub loc: Option<Loc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarDecl {
    pub name: String,
    pub ty: NodeId,
    pub mangled_name: Option<String>,
    pub visibility: Option<Visibility>,
    pub binding: Option<Binding>,
    pub loc: Option<Loc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub name: String,
    pub members: Vec<NodeId>,
    pub loc: Option<Loc>,
}

/* -------------------------------- Templates -------------------------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FnTemplateDecl {
    pub visibility: Option<Visibility>,
    pub binding: Option<Binding>,
    /// Template parameters, by position.
    pub params: Vec<NodeId>,
    /// The function the template stamps out.
    pub pattern: Option<NodeId>,
    /// Lexical scope members (parameters and the pattern).
    pub members: Vec<NodeId>,
    pub loc: Option<Loc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassTemplateDecl {
    pub visibility: Option<Visibility>,
    pub params: Vec<NodeId>,
    /// The class the template stamps out.
    pub pattern: Option<NodeId>,
    pub members: Vec<NodeId>,
    pub loc: Option<Loc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeTemplateParam {
    /// 0-based position among the parameter siblings.
    pub index: u32,
    pub name: String,
    pub loc: Option<Loc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NonTypeTemplateParam {
    pub index: u32,
    pub name: String,
    pub ty: NodeId,
    pub loc: Option<Loc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateTemplateParam {
    pub index: u32,
    pub name: String,
    /// Its own template parameters; doubles as its lexical scope.
    pub params: Vec<NodeId>,
    pub loc: Option<Loc>,
}

/// A type built out of a template parameter, e.g. a pointer to a type
/// parameter appearing in a parameter list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeComposition {
    pub index: u32,
    pub composed: Option<NodeId>,
    pub loc: Option<Loc>,
}

/* ---------------------------------- Node ----------------------------------- */

/// The closed set of IR node kinds. Capability checks are tag tests on this
/// enum, never downcasts.
#[derive(Clone, Debug, PartialEq, Eq, From)]
pub enum Node {
    Basic(BasicType),
    Qualified(QualifiedType),
    Pointer(PointerType),
    Reference(ReferenceType),
    Enum(EnumType),
    Typedef(TypedefDecl),
    Class(ClassType),
    Function(FunctionDecl),
    Var(VarDecl),
    Namespace(NamespaceDecl),
    FnTemplate(FnTemplateDecl),
    ClassTemplate(ClassTemplateDecl),
    TypeTemplateParam(TypeTemplateParam),
    NonTypeTemplateParam(NonTypeTemplateParam),
    TemplateTemplateParam(TemplateTemplateParam),
    TypeComposition(TypeComposition),
}

impl Node {
    pub fn is_type(&self) -> bool {
        match self {
            | Node::Basic(_)
            | Node::Qualified(_)
            | Node::Pointer(_)
            | Node::Reference(_)
            | Node::Enum(_)
            | Node::Typedef(_)
            | Node::Class(_)
            | Node::TypeTemplateParam(_)
            | Node::TemplateTemplateParam(_)
            | Node::TypeComposition(_) => true,
            | Node::Function(_)
            | Node::Var(_)
            | Node::Namespace(_)
            | Node::FnTemplate(_)
            | Node::ClassTemplate(_)
            | Node::NonTypeTemplateParam(_) => false,
        }
    }
    pub fn is_scope(&self) -> bool {
        matches!(
            self,
            Node::Class(_)
                | Node::Namespace(_)
                | Node::FnTemplate(_)
                | Node::ClassTemplate(_)
                | Node::TemplateTemplateParam(_)
        )
    }
    /// The ordered member list of a scope node, if this node is a scope.
    pub fn scope_members(&self) -> Option<&Vec<NodeId>> {
        match self {
            | Node::Class(c) => Some(&c.members),
            | Node::Namespace(n) => Some(&n.members),
            | Node::FnTemplate(t) => Some(&t.members),
            | Node::ClassTemplate(t) => Some(&t.members),
            | Node::TemplateTemplateParam(p) => Some(&p.params),
            | _ => None,
        }
    }
    pub fn scope_members_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            | Node::Class(c) => Some(&mut c.members),
            | Node::Namespace(n) => Some(&mut n.members),
            | Node::FnTemplate(t) => Some(&mut t.members),
            | Node::ClassTemplate(t) => Some(&mut t.members),
            | Node::TemplateTemplateParam(p) => Some(&mut p.params),
            | _ => None,
        }
    }
    pub fn name(&self) -> Option<&str> {
        match self {
            | Node::Basic(t) => Some(&t.name),
            | Node::Enum(t) => Some(&t.name),
            | Node::Typedef(t) => Some(&t.name),
            | Node::Class(c) => Some(&c.name),
            | Node::Function(f) => Some(&f.name),
            | Node::Var(v) => Some(&v.name),
            | Node::Namespace(n) => Some(&n.name),
            | Node::TypeTemplateParam(p) => Some(&p.name),
            | Node::NonTypeTemplateParam(p) => Some(&p.name),
            | Node::TemplateTemplateParam(p) => Some(&p.name),
            | Node::Qualified(_)
            | Node::Pointer(_)
            | Node::Reference(_)
            | Node::FnTemplate(_)
            | Node::ClassTemplate(_)
            | Node::TypeComposition(_) => None,
        }
    }
}
