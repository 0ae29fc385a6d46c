use crate::arena::*;
use std::collections::HashMap;
use std::fmt::{Debug, Display};

new_key_type! {
    /// A cheap, copyable handle to an interned source location.
    pub struct Loc<()>;
}

/// A resolved source location: file path, 1-based line and column.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocRecord {
    pub path: String,
    pub line: u32,
    pub column: u32,
}

impl Display for LocRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let LocRecord { path, line, column } = self;
        write!(f, "{}:{}:{}", path, line, column)
    }
}

/// Interns (path, line, column) triples so that nodes carry [`Loc`] handles
/// instead of owned strings.
#[derive(Debug, Default)]
pub struct LocMgr {
    records: ArenaDense<Loc, LocRecord>,
    interned: HashMap<LocRecord, Loc>,
}

impl LocMgr {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn intern(&mut self, path: &str, line: u32, column: u32) -> Loc {
        let record = LocRecord { path: path.to_owned(), line, column };
        if let Some(loc) = self.interned.get(&record) {
            return *loc;
        }
        let loc = self.records.alloc(record.clone());
        self.interned.insert(record, loc);
        loc
    }
    pub fn get(&self, loc: &Loc) -> &LocRecord {
        &self.records[loc]
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
