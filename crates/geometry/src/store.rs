use std::collections::BTreeMap;
use std::sync::Arc;

use kinema_common::GeometryHandle;

use crate::GeometryError;
use crate::buffer::GeometryBuffer;

/// Registry of immutable geometry buffers.
///
/// Nodes reference buffers by handle. A buffer is never edited in place;
/// [`GeometryStore::replace`] swaps the whole buffer behind a handle, so every
/// node bound to it sees the new geometry on the next frame.
#[derive(Debug, Clone, Default)]
pub struct GeometryStore {
    buffers: BTreeMap<GeometryHandle, Arc<GeometryBuffer>>,
    next_id: u64,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a finalized buffer and return its handle.
    pub fn insert(&mut self, buffer: GeometryBuffer) -> GeometryHandle {
        let handle = GeometryHandle(self.next_id);
        self.next_id += 1;
        tracing::debug!(
            handle = handle.0,
            vertices = buffer.vertex_count(),
            triangles = buffer.triangle_count(),
            "registered geometry"
        );
        self.buffers.insert(handle, Arc::new(buffer));
        handle
    }

    /// Swap the buffer behind `handle`, returning the previous one.
    pub fn replace(
        &mut self,
        handle: GeometryHandle,
        buffer: GeometryBuffer,
    ) -> Result<Arc<GeometryBuffer>, GeometryError> {
        let slot = self
            .buffers
            .get_mut(&handle)
            .ok_or(GeometryError::UnknownHandle(handle))?;
        tracing::debug!(
            handle = handle.0,
            vertices = buffer.vertex_count(),
            "replaced geometry"
        );
        Ok(std::mem::replace(slot, Arc::new(buffer)))
    }

    /// Drop a buffer once no node references it.
    pub fn remove(&mut self, handle: GeometryHandle) -> Option<Arc<GeometryBuffer>> {
        let removed = self.buffers.remove(&handle);
        if removed.is_some() {
            tracing::trace!(handle = handle.0, "removed geometry");
        }
        removed
    }

    pub fn get(&self, handle: GeometryHandle) -> Option<&Arc<GeometryBuffer>> {
        self.buffers.get(&handle)
    }

    pub fn contains(&self, handle: GeometryHandle) -> bool {
        self.buffers.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Iterate buffers in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (GeometryHandle, &Arc<GeometryBuffer>)> {
        self.buffers.iter().map(|(h, b)| (*h, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyhedra::{octahedron, scutoid};

    #[test]
    fn insert_and_get() {
        let mut store = GeometryStore::new();
        let id = store.insert(octahedron().unwrap());
        assert_eq!(store.get(id).unwrap().vertex_count(), 24);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn handles_are_distinct() {
        let mut store = GeometryStore::new();
        let a = store.insert(octahedron().unwrap());
        let b = store.insert(octahedron().unwrap());
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn replace_swaps_whole_buffer() {
        let mut store = GeometryStore::new();
        let id = store.insert(octahedron().unwrap());
        let held = Arc::clone(store.get(id).unwrap());

        let previous = store.replace(id, scutoid().unwrap()).unwrap();
        assert_eq!(previous.vertex_count(), 24);
        assert_eq!(store.get(id).unwrap().vertex_count(), 41);
        // Outstanding readers keep the buffer they already had.
        assert_eq!(held.vertex_count(), 24);
    }

    #[test]
    fn remove_frees_handle_without_reuse() {
        let mut store = GeometryStore::new();
        let a = store.insert(octahedron().unwrap());
        assert!(store.remove(a).is_some());
        assert!(store.remove(a).is_none());
        assert!(!store.contains(a));
        let b = store.insert(octahedron().unwrap());
        assert_ne!(a, b);
    }

    #[test]
    fn replace_unknown_handle_fails() {
        let mut store = GeometryStore::new();
        let err = store
            .replace(GeometryHandle(9), octahedron().unwrap())
            .unwrap_err();
        assert!(matches!(err, GeometryError::UnknownHandle(GeometryHandle(9))));
    }
}
