use std::fmt::Write;

use kinema_common::{GeometryHandle, NodeId};
use kinema_geometry::GeometryStore;
use kinema_kernel::{SceneGraph, UpdateRule};

/// Read-only queries against a scene for debugging and the CLI.
pub struct SceneInspector;

impl SceneInspector {
    /// Counts over the whole scene, in one pre-order walk from the root.
    pub fn summary(graph: &SceneGraph, store: &GeometryStore) -> SceneSummary {
        let mut summary = SceneSummary {
            nodes: graph.node_count(),
            buffers: store.len(),
            ..SceneSummary::default()
        };
        let mut stack = vec![(graph.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = graph.get(id) else {
                continue;
            };
            summary.reachable += 1;
            summary.max_depth = summary.max_depth.max(depth);
            if node.rule().is_some() {
                summary.animated += 1;
            }
            if let Some(buffer) = node.geometry.and_then(|h| store.get(h)) {
                summary.drawable += 1;
                summary.vertices += buffer.vertex_count();
                summary.triangles += buffer.triangle_count();
            }
            stack.extend(node.children().iter().map(|c| (*c, depth + 1)));
        }
        summary
    }

    /// Local and world placement of one node.
    pub fn inspect_node(graph: &SceneGraph, id: NodeId) -> Option<NodeInfo> {
        graph.get(id).map(|node| {
            let t = node.local.translation;
            let s = node.local.scale;
            NodeInfo {
                id,
                name: node.name.clone(),
                parent: node.parent(),
                children: node.children().len(),
                translation: [t.x, t.y, t.z],
                scale: [s.x, s.y, s.z],
                world_position: node.world().map(|w| {
                    let p = w.w_axis;
                    [p.x, p.y, p.z]
                }),
                geometry: node.geometry,
                rule: node.rule().map(rule_label),
            }
        })
    }

    /// Indented pre-order listing of the reachable tree.
    pub fn tree(graph: &SceneGraph) -> String {
        let mut out = String::new();
        let mut stack = vec![(graph.root(), 0usize)];
        while let Some((id, level)) = stack.pop() {
            let Some(node) = graph.get(id) else {
                continue;
            };
            let _ = write!(
                out,
                "{:indent$}{} {}",
                "",
                id,
                node.name.as_deref().unwrap_or("-"),
                indent = level * 2
            );
            if let Some(handle) = node.geometry {
                let _ = write!(out, " geometry={}", handle.0);
            }
            if let Some(rule) = node.rule() {
                let _ = write!(out, " rule={}", rule_label(rule));
            }
            out.push('\n');
            stack.extend(node.children().iter().rev().map(|c| (*c, level + 1)));
        }
        out
    }
}

fn rule_label(rule: &UpdateRule) -> &'static str {
    match rule {
        UpdateRule::Spin { .. } => "spin",
        UpdateRule::Orbit { .. } => "orbit",
        UpdateRule::BoundedOscillate { .. } => "oscillate",
        UpdateRule::Drift { .. } => "drift",
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneSummary {
    pub nodes: usize,
    pub reachable: usize,
    pub drawable: usize,
    pub animated: usize,
    pub buffers: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub max_depth: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: nodes={} reachable={} drawable={} animated={} buffers={} vertices={} triangles={} depth={}",
            self.nodes,
            self.reachable,
            self.drawable,
            self.animated,
            self.buffers,
            self.vertices,
            self.triangles,
            self.max_depth
        )
    }
}

#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: Option<String>,
    pub parent: Option<NodeId>,
    pub children: usize,
    pub translation: [f32; 3],
    pub scale: [f32; 3],
    pub world_position: Option<[f32; 3]>,
    pub geometry: Option<GeometryHandle>,
    pub rule: Option<&'static str>,
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node {} ({}) local=({:.2}, {:.2}, {:.2})",
            self.id,
            self.name.as_deref().unwrap_or("-"),
            self.translation[0],
            self.translation[1],
            self.translation[2],
        )?;
        match self.world_position {
            Some([x, y, z]) => write!(f, " world=({x:.2}, {y:.2}, {z:.2})")?,
            None => write!(f, " world=unset")?,
        }
        write!(f, " children={}", self.children)?;
        if let Some(rule) = self.rule {
            write!(f, " rule={rule}")?;
        }
        Ok(())
    }
}
