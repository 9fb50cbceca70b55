use crate::session::SessionCursor;
use crate::store::PathStore;

/// Binds one cursor to every path of a store in turn.
///
/// ```no_run
/// # use std::sync::Arc;
/// # use sky_cursor::{DataDescriptor, MemoryStore, PathIterator, SessionCursor};
/// let store = MemoryStore::new();
/// let cursor = SessionCursor::new(Arc::new(DataDescriptor::new()), Some(1800));
/// let mut paths = PathIterator::new(&store, cursor);
/// while paths.next_path().is_some() {
///     let cursor = paths.cursor_mut();
///     while cursor.next_session() {
///         while cursor.next_event() {}
///     }
/// }
/// ```
pub struct PathIterator<'s, S: PathStore + ?Sized> {
    store: &'s S,
    object_ids: std::vec::IntoIter<String>,
    current: Option<String>,
    cursor: SessionCursor,
}

impl<'s, S: PathStore + ?Sized> PathIterator<'s, S> {
    pub fn new(store: &'s S, cursor: SessionCursor) -> Self {
        Self {
            store,
            object_ids: store.object_ids().into_iter(),
            current: None,
            cursor,
        }
    }

    /// Binds the cursor to the next path and returns its object id.
    /// Objects that disappeared from the store since iteration began are skipped.
    pub fn next_path(&mut self) -> Option<&str> {
        for object_id in self.object_ids.by_ref() {
            if let Some(path) = self.store.get(&object_id) {
                self.cursor.bind(path);
                self.current = Some(object_id);
                return self.current.as_deref();
            }
        }
        self.current = None;
        None
    }

    /// The object id of the currently bound path.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn cursor(&self) -> &SessionCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut SessionCursor {
        &mut self.cursor
    }

    pub fn into_cursor(self) -> SessionCursor {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sky_pathcodec::{DataType, PathBuffer, Value};

    use crate::descriptor::DataDescriptor;
    use crate::store::MemoryStore;

    #[test]
    fn test_iterates_in_key_order() {
        let mut store = MemoryStore::new();
        for (id, count) in [("b", 2), ("a", 1), ("c", 3)] {
            let mut buf = PathBuffer::new();
            for i in 0..count {
                buf.event(i, 0, 0, &[(1, Value::from(i))]);
            }
            store.put(id, buf.freeze());
        }
        let d = DataDescriptor::from_table([(1, 0, DataType::Int)]).unwrap();
        let mut paths = PathIterator::new(&store, SessionCursor::new(Arc::new(d), None));

        let mut seen = Vec::new();
        while let Some(id) = paths.next_path() {
            let id = id.to_string();
            let cursor = paths.cursor_mut();
            let mut events = 0;
            while cursor.next_session() {
                while cursor.next_event() {
                    events += 1;
                }
            }
            seen.push((id, events));
        }
        assert_eq!(
            seen,
            vec![
                ("a".to_string(), 1),
                ("b".to_string(), 2),
                ("c".to_string(), 3)
            ]
        );
        assert_eq!(paths.current(), None);
    }

    #[test]
    fn test_empty_store() {
        let store = MemoryStore::new();
        let mut paths = PathIterator::new(
            &store,
            SessionCursor::new(Arc::new(DataDescriptor::new()), None),
        );
        assert!(paths.next_path().is_none());
        assert!(!paths.cursor_mut().next_session());
    }
}
