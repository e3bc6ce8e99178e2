use glam::Mat4;
use kinema_common::{GeometryHandle, NodeId};
use kinema_geometry::{GeometryBuffer, GeometryStore};
use kinema_kernel::SceneGraph;

use crate::projection::Projection;

/// How a draw item's vertices are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    TriangleList,
}

/// One geometry-bearing node, ready to draw.
#[derive(Debug, Clone)]
pub struct DrawItem<'a> {
    pub node: NodeId,
    pub name: Option<&'a str>,
    pub geometry: GeometryHandle,
    pub buffer: &'a GeometryBuffer,
    pub primitive: Primitive,
    pub world: Mat4,
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub items: Vec<DrawItem<'a>>,
    pub projection: Projection,
}

impl<'a> Frame<'a> {
    /// Gather draw items from a graph whose world transforms are current.
    ///
    /// Nodes without geometry are grouping nodes and produce no item. A
    /// handle missing from the store is skipped with a warning.
    pub fn collect(graph: &'a SceneGraph, store: &'a GeometryStore, projection: Projection) -> Self {
        let mut items = Vec::new();
        graph.traverse(|node, data, world| {
            let Some(geometry) = data.geometry else {
                return;
            };
            match store.get(geometry) {
                Some(buffer) => items.push(DrawItem {
                    node,
                    name: data.name.as_deref(),
                    geometry,
                    buffer: buffer.as_ref(),
                    primitive: Primitive::TriangleList,
                    world,
                }),
                None => tracing::warn!(%node, handle = geometry.0, "geometry handle not in store"),
            }
        });
        Self { items, projection }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.items.iter().map(|i| i.buffer.triangle_count()).sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.items.iter().map(|i| i.buffer.vertex_count()).sum()
    }
}
