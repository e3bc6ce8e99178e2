use kinema_common::{GeometryHandle, NodeId};
use kinema_geometry::{GeometryBuffer, GeometryError, GeometryStore};
use kinema_kernel::{SceneError, SceneGraph, TransformNode};
use kinema_render::{Frame, Projection};

use crate::clock::{Clock, MonotonicClock};

/// Errors from binding scene content through a [`SceneContext`].
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Everything one running visualization owns: its graph, its geometry, its
/// camera and its clock.
///
/// Demos mutate the context only between ticks.
pub struct SceneContext {
    pub graph: SceneGraph,
    pub geometry: GeometryStore,
    pub projection: Projection,
    /// Multiplier applied to every tick's delta; `0.0` freezes rules.
    pub time_scale: f64,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for SceneContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneContext")
            .field("nodes", &self.graph.node_count())
            .field("buffers", &self.geometry.len())
            .field("projection", &self.projection)
            .field("time_scale", &self.time_scale)
            .finish_non_exhaustive()
    }
}

impl Default for SceneContext {
    fn default() -> Self {
        Self::new(Box::new(MonotonicClock::new()))
    }
}

impl SceneContext {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            graph: SceneGraph::new(),
            geometry: GeometryStore::new(),
            projection: Projection::default(),
            time_scale: 1.0,
            clock,
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Bind a stored buffer to a node. The handle must already be in the store.
    pub fn bind_geometry(&mut self, node: NodeId, handle: GeometryHandle) -> Result<(), ContextError> {
        if !self.geometry.contains(handle) {
            return Err(GeometryError::UnknownHandle(handle).into());
        }
        self.graph.set_geometry(node, Some(handle))?;
        Ok(())
    }

    /// Store `buffer`, then insert `node` under `parent` bound to it.
    ///
    /// If the node is rejected the buffer is dropped again, so a failed spawn
    /// leaves both the graph and the store as they were.
    pub fn spawn_mesh(
        &mut self,
        parent: NodeId,
        node: TransformNode,
        buffer: GeometryBuffer,
    ) -> Result<NodeId, ContextError> {
        let handle = self.geometry.insert(buffer);
        self.spawn_instance(parent, node, handle).inspect_err(|_| {
            self.geometry.remove(handle);
        })
    }

    /// Insert `node` under `parent`, sharing an already stored buffer.
    pub fn spawn_instance(
        &mut self,
        parent: NodeId,
        node: TransformNode,
        handle: GeometryHandle,
    ) -> Result<NodeId, ContextError> {
        if !self.geometry.contains(handle) {
            return Err(GeometryError::UnknownHandle(handle).into());
        }
        let id = self.graph.insert(parent, node.with_geometry(handle))?;
        Ok(id)
    }

    /// Draw list for the current world transforms.
    pub fn frame(&self) -> Frame<'_> {
        Frame::collect(&self.graph, &self.geometry, self.projection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use glam::Vec3;
    use kinema_common::NodeId;
    use kinema_geometry::polyhedra::octahedron;
    use kinema_kernel::{SceneError, UpdateRule};

    fn context() -> SceneContext {
        SceneContext::new(Box::new(ManualClock::new()))
    }

    #[test]
    fn bind_rejects_unknown_handle() {
        let mut ctx = context();
        let node = ctx
            .graph
            .insert(ctx.graph.root(), TransformNode::default())
            .unwrap();
        let err = ctx.bind_geometry(node, GeometryHandle(5)).unwrap_err();
        assert!(matches!(
            err,
            ContextError::Geometry(GeometryError::UnknownHandle(GeometryHandle(5)))
        ));
        assert!(ctx.graph.get(node).unwrap().geometry.is_none());
    }

    #[test]
    fn spawned_mesh_shows_up_in_frame() {
        let mut ctx = context();
        let root = ctx.graph.root();
        let id = ctx
            .spawn_mesh(root, TransformNode::default(), octahedron().unwrap())
            .unwrap();
        ctx.graph.recompute_world_transforms();
        let frame = ctx.frame();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.items[0].node, id);
    }

    #[test]
    fn instances_share_one_buffer() {
        let mut ctx = context();
        let root = ctx.graph.root();
        let handle = ctx.geometry.insert(octahedron().unwrap());
        ctx.spawn_instance(root, TransformNode::default(), handle).unwrap();
        ctx.spawn_instance(root, TransformNode::default(), handle).unwrap();
        ctx.graph.recompute_world_transforms();
        assert_eq!(ctx.geometry.len(), 1);
        assert_eq!(ctx.frame().len(), 2);
    }

    #[test]
    fn rejected_spawn_leaves_store_unchanged() {
        let mut ctx = context();
        let root = ctx.graph.root();

        let bad_rule = TransformNode::default().with_rule(UpdateRule::spin(Vec3::ZERO, 10.0));
        let err = ctx
            .spawn_mesh(root, bad_rule, octahedron().unwrap())
            .unwrap_err();
        assert!(matches!(err, ContextError::Scene(SceneError::InvalidRule { .. })));
        assert_eq!(ctx.geometry.len(), 0);

        let err = ctx
            .spawn_mesh(NodeId(99), TransformNode::default(), octahedron().unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            ContextError::Scene(SceneError::DanglingReference(NodeId(99)))
        ));
        assert!(ctx.geometry.is_empty());
        assert_eq!(ctx.graph.node_count(), 1);
    }
}
