pub mod node;
pub use node::*;

pub mod unit;
pub use unit::*;

use std::fmt::Display;

/* ------------------------------- Visibility ------------------------------- */

/// ELF visibility of a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Default,
    Hidden,
    Internal,
    Protected,
}

impl Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            | Visibility::Default => write!(f, "default"),
            | Visibility::Hidden => write!(f, "hidden"),
            | Visibility::Internal => write!(f, "internal"),
            | Visibility::Protected => write!(f, "protected"),
        }
    }
}

/* --------------------------------- Binding -------------------------------- */

/// ELF binding of a symbol-bearing declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    Global,
    Local,
    Weak,
}

impl Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            | Binding::Global => write!(f, "global"),
            | Binding::Local => write!(f, "local"),
            | Binding::Weak => write!(f, "weak"),
        }
    }
}

/* --------------------------------- Access --------------------------------- */

/// Access specifier of a class member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    Private,
    Protected,
    Public,
}

impl Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            | Access::Private => write!(f, "private"),
            | Access::Protected => write!(f, "protected"),
            | Access::Public => write!(f, "public"),
        }
    }
}

/* ------------------------------ CV qualifiers ------------------------------ */

/// The const/volatile qualifier set carried by a qualified type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CvQual {
    pub is_const: bool,
    pub is_volatile: bool,
}

impl CvQual {
    pub const CONST: CvQual = CvQual { is_const: true, is_volatile: false };
    pub const VOLATILE: CvQual = CvQual { is_const: false, is_volatile: true };
    pub fn is_empty(&self) -> bool {
        !self.is_const && !self.is_volatile
    }
}

impl std::ops::BitOr for CvQual {
    type Output = CvQual;
    fn bitor(self, rhs: CvQual) -> CvQual {
        CvQual {
            is_const: self.is_const || rhs.is_const,
            is_volatile: self.is_volatile || rhs.is_volatile,
        }
    }
}

impl Display for CvQual {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.is_const, self.is_volatile) {
            | (true, true) => write!(f, "const volatile"),
            | (true, false) => write!(f, "const"),
            | (false, true) => write!(f, "volatile"),
            | (false, false) => Ok(()),
        }
    }
}

/* -------------------------------- Reference ------------------------------- */

/// Lvalue vs. rvalue reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefKind {
    Lvalue,
    Rvalue,
}

impl Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            | RefKind::Lvalue => write!(f, "lvalue"),
            | RefKind::Rvalue => write!(f, "rvalue"),
        }
    }
}
