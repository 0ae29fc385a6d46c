use std::{
    borrow::Borrow,
    collections::HashMap,
    hash::Hash,
    ops::{Index, IndexMut},
};

/* ---------------------------------- Index --------------------------------- */

pub use crate::new_key_type;

pub unsafe trait IndexLike: Clone + Copy + Eq + std::hash::Hash {
    type Meta;
    fn new(meta: Self::Meta, idx: usize) -> Self;
    fn index(&self) -> usize;
}

/* -------------------------------- Allocator ------------------------------- */

#[derive(Debug)]
pub struct IndexAlloc<Meta>(Meta, usize);
impl IndexAlloc<()> {
    pub fn new() -> Self {
        IndexAlloc((), 0)
    }
}
impl Default for IndexAlloc<()> {
    fn default() -> Self {
        Self::new()
    }
}
impl<Meta: Copy> Iterator for IndexAlloc<Meta> {
    type Item = (Meta, usize);
    fn next(&mut self) -> Option<Self::Item> {
        let IndexAlloc(meta, idx) = &mut *self;
        let old = *idx;
        *idx += 1;
        Some((*meta, old))
    }
}

/* ---------------------------------- Arena --------------------------------- */

/// Append-only storage keyed by generated ids; the owner of the values.
#[derive(Debug)]
pub struct ArenaDense<Id, T, Meta = ()> {
    allocator: IndexAlloc<Meta>,
    vec: Vec<T>,
    _marker: std::marker::PhantomData<Id>,
}

/// An association from externally supplied keys to values.
#[derive(Debug, Clone)]
pub struct ArenaAssoc<Id, T> {
    map: HashMap<Id, T>,
}

mod impls {
    use super::*;

    /* ------------------------------- ArenaDense ------------------------------- */

    impl<Id, T> Default for ArenaDense<Id, T, ()>
    where
        Id: IndexLike<Meta = ()>,
    {
        fn default() -> Self {
            Self {
                allocator: IndexAlloc((), 0),
                vec: Default::default(),
                _marker: Default::default(),
            }
        }
    }

    impl<Id, T, Meta> Index<&Id> for ArenaDense<Id, T, Meta>
    where
        Meta: Copy,
        Id: IndexLike<Meta = Meta>,
    {
        type Output = T;
        fn index(&self, id: &Id) -> &Self::Output {
            self.get(id).unwrap()
        }
    }
    impl<Id, T, Meta> IndexMut<&Id> for ArenaDense<Id, T, Meta>
    where
        Meta: Copy,
        Id: IndexLike<Meta = Meta>,
    {
        fn index_mut(&mut self, id: &Id) -> &mut Self::Output {
            self.get_mut(id).unwrap()
        }
    }

    impl<Id, T, Meta> ArenaDense<Id, T, Meta>
    where
        Meta: Copy,
        Id: IndexLike<Meta = Meta>,
    {
        pub fn new(allocator: IndexAlloc<Meta>) -> Self {
            ArenaDense { allocator, vec: Vec::new(), _marker: std::marker::PhantomData }
        }
        pub fn alloc(&mut self, val: T) -> Id {
            let id = self.allocator.next().unwrap();
            self.vec.push(val);
            IndexLike::new(id.0, id.1)
        }
        pub fn get(&self, id: &Id) -> Option<&T> {
            self.vec.get(id.index())
        }
        pub fn get_mut(&mut self, id: &Id) -> Option<&mut T> {
            self.vec.get_mut(id.index())
        }
        pub fn len(&self) -> usize {
            self.vec.len()
        }
        pub fn is_empty(&self) -> bool {
            self.vec.is_empty()
        }
        pub fn iter(&self) -> std::slice::Iter<'_, T> {
            self.vec.iter()
        }
    }

    /* ------------------------------- ArenaAssoc ------------------------------- */

    impl<Id, T> ArenaAssoc<Id, T> {
        pub fn new() -> Self {
            ArenaAssoc { map: HashMap::new() }
        }
    }

    impl<Id, T> Default for ArenaAssoc<Id, T> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<Id, T> ArenaAssoc<Id, T>
    where
        Id: Eq + Hash,
    {
        /// Last write wins; use [`Self::contains_key`] first when the old
        /// binding must survive.
        pub fn insert(&mut self, id: Id, val: T) {
            self.map.insert(id, val);
        }
        pub fn get<Q>(&self, id: &Q) -> Option<&T>
        where
            Id: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.map.get(id)
        }
        pub fn contains_key<Q>(&self, id: &Q) -> bool
        where
            Id: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.map.contains_key(id)
        }
        pub fn remove<Q>(&mut self, id: &Q) -> Option<T>
        where
            Id: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.map.remove(id)
        }
        pub fn clear(&mut self) {
            self.map.clear()
        }
        pub fn len(&self) -> usize {
            self.map.len()
        }
        pub fn is_empty(&self) -> bool {
            self.map.is_empty()
        }
        pub fn iter(&self) -> std::collections::hash_map::Iter<'_, Id, T> {
            self.map.iter()
        }
    }

    impl<Id, T> Index<&Id> for ArenaAssoc<Id, T>
    where
        Id: Eq + Hash,
    {
        type Output = T;
        fn index(&self, id: &Id) -> &Self::Output {
            self.get(id).unwrap()
        }
    }

    impl<Id, T> IntoIterator for ArenaAssoc<Id, T> {
        type Item = (Id, T);
        type IntoIter = std::collections::hash_map::IntoIter<Id, T>;
        fn into_iter(self) -> Self::IntoIter {
            self.map.into_iter()
        }
    }

    impl<Id, T> Extend<(Id, T)> for ArenaAssoc<Id, T>
    where
        Id: Eq + Hash,
    {
        fn extend<I: IntoIterator<Item = (Id, T)>>(&mut self, iter: I) {
            self.map.extend(iter);
        }
    }
}

#[macro_export]
macro_rules! new_key_type {
    ( $(#[$outer:meta])* $vis:vis struct $name:ident < $meta:ty > ; $($rest:tt)* ) => {
        $(#[$outer])*
        #[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
        $vis struct $name($meta, usize);

        unsafe impl $crate::arena::IndexLike for $name {
            type Meta = $meta;
            fn new(meta: Self::Meta, idx: usize) -> Self {
                Self(meta, idx)
            }
            fn index(&self) -> usize {
                self.1
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({:?}, {})", stringify!($name), self.0, self.1)
            }
        }

        impl $name {
            pub fn concise(&self) -> String {
                format!("[{:?}#{:?}]", self.0, self.1)
            }
        }

        $crate::new_key_type!($($rest)*);
    };

    // a nice default only for compiler use
    ( $(#[$outer:meta])* $vis:vis struct $name:ident ; $($rest:tt)* ) => {
        $crate::new_key_type!( $(#[$outer])* $vis struct $name<usize> ; $($rest)* );
    };

    () => {}
}
