use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use fnv::FnvHashSet;
use serde::{Serialize, Serializer};

/// Handle to a string stored in an [`Interner`].
///
/// Equality, ordering and hashing use the text. Use [`InternedStr::ptr_eq`]
/// to check whether two handles share the same storage.
#[derive(Clone)]
pub struct InternedStr(Arc<str>);

impl InternedStr {
    /// Creates a handle that is not backed by any pool.
    pub fn detached(text: &str) -> Self {
        InternedStr(Arc::from(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if both handles point at the same interned storage.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl Deref for InternedStr {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for InternedStr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq for InternedStr {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl Eq for InternedStr {}

impl PartialEq<str> for InternedStr {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for InternedStr {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl std::hash::Hash for InternedStr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for InternedStr {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InternedStr {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Debug for InternedStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for InternedStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for InternedStr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Wrapper so the set can be probed with a plain `&str`.
#[derive(PartialEq, Eq, Hash)]
struct Slot(Arc<str>);

impl Borrow<str> for Slot {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Deduplicating store for one kind of string. Entries live as long as the
/// interner.
#[derive(Default)]
pub struct Interner {
    slots: FnvHashSet<Slot>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared handle for `text`, storing it on first use.
    pub fn intern(&mut self, text: &str) -> InternedStr {
        if let Some(slot) = self.slots.get(text) {
            return InternedStr(Arc::clone(&slot.0));
        }
        let shared: Arc<str> = Arc::from(text);
        self.slots.insert(Slot(Arc::clone(&shared)));
        InternedStr(shared)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Which field a string is interned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    FileName,
    PackageName,
    Message,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FileName => "file name",
            Category::PackageName => "package name",
            Category::Message => "message",
        }
    }
}

/// One [`Interner`] per [`Category`]. Owned by a single builder; never
/// shared between parsing sessions.
#[derive(Default)]
pub struct StringPool {
    file_names: Interner,
    package_names: Interner,
    messages: Interner,
}

impl StringPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, category: Category, text: &str) -> InternedStr {
        self.interner_mut(category).intern(text)
    }

    /// Number of distinct strings stored for `category`.
    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::FileName => self.file_names.len(),
            Category::PackageName => self.package_names.len(),
            Category::Message => self.messages.len(),
        }
    }

    fn interner_mut(&mut self, category: Category) -> &mut Interner {
        match category {
            Category::FileName => &mut self.file_names,
            Category::PackageName => &mut self.package_names,
            Category::Message => &mut self.messages,
        }
    }
}
