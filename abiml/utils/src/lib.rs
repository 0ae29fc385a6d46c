pub mod arena;
pub mod loc;

pub mod prelude {
    /// Source location handles.
    pub use crate::loc::{Loc, LocMgr, LocRecord};
    /// Data structures.
    pub use crate::arena::*;
}
