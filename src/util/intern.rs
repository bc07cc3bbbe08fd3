use std::{collections::HashMap, fmt, hash::Hash, marker::PhantomData, num::NonZeroU32, rc::Rc};

/// A handle to some interned value of type `T`. To retrieve a `&T`, use
/// [`Interner::get`].
pub struct Interned<T: ?Sized> {
    // Non-zero so that `Option<Interned<T>>` stays four bytes wide.
    handle: NonZeroU32,
    _ty: PhantomData<T>,
}

impl<T: ?Sized> Interned<T> {
    const fn from_handle(handle: NonZeroU32) -> Self {
        Interned {
            handle,
            _ty: PhantomData,
        }
    }
}

impl<T: ?Sized> Copy for Interned<T> {}

impl<T: ?Sized> Clone for Interned<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Hash for Interned<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

impl<T: ?Sized> PartialEq for Interned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<T: ?Sized> Eq for Interned<T> {}

impl<T: ?Sized> PartialOrd for Interned<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: ?Sized> Ord for Interned<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.handle.cmp(&other.handle)
    }
}

impl<T: ?Sized> fmt::Debug for Interned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interned({})", self.handle)
    }
}

impl<T: ?Sized> From<&Interned<T>> for Interned<T> {
    fn from(value: &Interned<T>) -> Self {
        *value
    }
}

pub struct Interner<T: ?Sized> {
    map: HashMap<Rc<T>, NonZeroU32>,
    vec: Vec<Rc<T>>,
}

impl fmt::Debug for Interner<str> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (i, value) in self.vec.iter().enumerate() {
            map.entry(&(i + 1), value);
        }
        map.finish()
    }
}

impl<T: ?Sized> Interner<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Interner {
            map: HashMap::with_capacity(capacity),
            vec: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    /// Interns the provided value, returning a handle which can be used to
    /// retrieve it later.
    pub fn intern(&mut self, value: &T) -> Interned<T>
    where
        T: Eq + Hash,
        T: ToOwned,
        T::Owned: Into<Rc<T>>,
    {
        if let Some(handle) = self.map.get(value) {
            return Interned::from_handle(*handle);
        }
        let key: Rc<T> = value.to_owned().into();
        // Handles are 1-based so that the first one is `NonZeroU32::MIN`.
        let len = u32::try_from(self.vec.len()).expect("too many interned values");
        let handle = NonZeroU32::MIN.saturating_add(len);
        self.vec.push(Rc::clone(&key));
        self.map.insert(key, handle);
        Interned::from_handle(handle)
    }

    /// Returns the value behind `handle`. Panics if `handle` was produced by
    /// another interner with fewer values.
    pub fn get(&self, handle: impl Into<Interned<T>>) -> &T {
        let Interned { handle, .. } = handle.into();
        &self.vec[(handle.get() - 1) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_is_idempotent() {
        let mut i = Interner::<str>::with_capacity(4);

        let shape = i.intern("Shape");
        let area = i.intern("area");
        assert_eq!(i.intern("Shape"), shape);
        assert_ne!(shape, area);
        assert_eq!(i.len(), 2);

        assert_eq!(i.get(shape), "Shape");
        assert_eq!(i.get(&area), "area");
    }

    #[test]
    fn test_handle_niche() {
        assert_eq!(std::mem::size_of::<Option<Interned<str>>>(), 4);
    }

    #[test]
    fn test_empty_name() {
        let mut i = Interner::<str>::with_capacity(1);
        assert!(i.is_empty());
        let empty = i.intern("");
        assert_eq!(i.get(empty), "");
        assert!(!i.is_empty());
    }
}
