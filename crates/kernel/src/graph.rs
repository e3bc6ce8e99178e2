use std::collections::BTreeMap;

use glam::Mat4;
use kinema_common::{GeometryHandle, NodeId, Transform};

use crate::SceneError;
use crate::rule::{RuleState, UpdateRule};

/// One node of the transform hierarchy.
///
/// Structural fields (`parent`, `children`) and the cached world matrix are
/// owned by the [`SceneGraph`]; callers edit `local`, `name` and `geometry`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformNode {
    pub name: Option<String>,
    pub local: Transform,
    pub geometry: Option<GeometryHandle>,
    rule: Option<UpdateRule>,
    rule_state: RuleState,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    world: Option<Mat4>,
}

impl Default for TransformNode {
    fn default() -> Self {
        Self::new(Transform::IDENTITY)
    }
}

impl TransformNode {
    pub fn new(local: Transform) -> Self {
        Self {
            name: None,
            local,
            geometry: None,
            rule: None,
            rule_state: RuleState::default(),
            parent: None,
            children: Vec::new(),
            world: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_geometry(mut self, geometry: GeometryHandle) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// The rule is validated when the node is attached.
    pub fn with_rule(mut self, rule: UpdateRule) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn rule(&self) -> Option<&UpdateRule> {
        self.rule.as_ref()
    }

    pub fn rule_state(&self) -> &RuleState {
        &self.rule_state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in draw/update order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// World matrix from the last recompute pass that reached this node.
    pub fn world(&self) -> Option<Mat4> {
        self.world
    }
}

/// A subtree removed from a graph by [`SceneGraph::detach`].
///
/// The nodes keep their ids, local transforms, rules and last world matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct Subtree {
    root: NodeId,
    nodes: BTreeMap<NodeId, TransformNode>,
}

impl Subtree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&TransformNode> {
        self.nodes.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TransformNode)> {
        self.nodes.iter().map(|(id, n)| (*id, n))
    }
}

/// Arena-backed rooted tree of [`TransformNode`]s.
///
/// Nodes live in a `BTreeMap` keyed by sequential [`NodeId`]s. A node may sit
/// in the arena without being reachable from the root (created but not yet
/// attached); only reachable nodes take part in rule, recompute and traversal
/// passes.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, TransformNode>,
    root: NodeId,
    next_id: u64,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// A graph holding a single identity root named `root`.
    pub fn new() -> Self {
        Self::with_root(TransformNode::new(Transform::IDENTITY).named("root"))
    }

    pub fn with_root(mut root: TransformNode) -> Self {
        root.parent = None;
        root.children.clear();
        root.world = None;
        let id = NodeId(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(id, root);
        Self {
            nodes,
            root: id,
            next_id: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Add an unattached node to the arena.
    pub fn create(&mut self, mut node: TransformNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        node.parent = None;
        node.children.clear();
        node.world = None;
        self.nodes.insert(id, node);
        id
    }

    /// Create `node` and attach it under `parent`.
    pub fn insert(&mut self, parent: NodeId, node: TransformNode) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::DanglingReference(parent));
        }
        if let Some(rule) = &node.rule {
            rule.validate().map_err(|source| SceneError::InvalidRule {
                node: NodeId(self.next_id),
                source,
            })?;
        }
        let id = self.create(node);
        self.attach(parent, id)?;
        Ok(id)
    }

    /// Make `child` the last child of `parent`, removing it from any previous
    /// parent first.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::DanglingReference(parent));
        }
        let Some(child_node) = self.nodes.get(&child) else {
            return Err(SceneError::DanglingReference(child));
        };
        if child == self.root {
            return Err(SceneError::RootNotAttachable);
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::CycleDetected { parent, child });
        }
        if let Some(rule) = &child_node.rule {
            rule.validate()
                .map_err(|source| SceneError::InvalidRule { node: child, source })?;
        }

        if let Some(old) = child_node.parent {
            if let Some(old_parent) = self.nodes.get_mut(&old) {
                old_parent.children.retain(|c| *c != child);
            }
        }
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = Some(parent);
        }
        for id in self.subtree_ids(child) {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.world = None;
            }
        }
        tracing::debug!(%parent, %child, "attached node");
        Ok(())
    }

    /// Remove `id` and all of its descendants from the graph.
    pub fn detach(&mut self, id: NodeId) -> Result<Subtree, SceneError> {
        if id == self.root {
            return Err(SceneError::RootNotDetachable);
        }
        let Some(node) = self.nodes.get(&id) else {
            return Err(SceneError::DanglingReference(id));
        };
        if let Some(parent) = node.parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|c| *c != id);
            }
        }

        let mut nodes = BTreeMap::new();
        for member in self.subtree_ids(id) {
            if let Some(node) = self.nodes.remove(&member) {
                nodes.insert(member, node);
            }
        }
        if let Some(top) = nodes.get_mut(&id) {
            top.parent = None;
        }
        tracing::debug!(node = %id, removed = nodes.len(), "detached subtree");
        Ok(Subtree { root: id, nodes })
    }

    /// Compose world matrices for every node reachable from the root.
    ///
    /// One pre-order pass with an explicit stack; a parent is always finished
    /// before its children. Returns the number of nodes visited.
    pub fn recompute_world_transforms(&mut self) -> usize {
        let mut stack = vec![(self.root, Mat4::IDENTITY)];
        let mut visited = 0;
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            let world = parent_world * node.local.matrix();
            node.world = Some(world);
            visited += 1;
            stack.extend(node.children.iter().rev().map(|c| (*c, world)));
        }
        tracing::trace!(visited, "recomputed world transforms");
        visited
    }

    /// Pre-order read-only walk over reachable nodes with a computed world
    /// matrix.
    pub fn traverse<'g, F>(&'g self, mut visitor: F)
    where
        F: FnMut(NodeId, &'g TransformNode, Mat4),
    {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if let Some(world) = node.world {
                visitor(id, node, world);
            }
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Run every reachable node's update rule in pre-order.
    pub fn apply_rules(&mut self, delta_ms: f64) -> usize {
        let mut stack = vec![self.root];
        let mut applied = 0;
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            if let Some(rule) = node.rule {
                rule.apply(&mut node.rule_state, &mut node.local, delta_ms);
                applied += 1;
            }
            stack.extend(node.children.iter().rev().copied());
        }
        applied
    }

    /// Ids reachable from the root, in pre-order.
    pub fn reachable_ids(&self) -> Vec<NodeId> {
        self.subtree_ids(self.root)
    }

    pub fn reachable_count(&self) -> usize {
        self.reachable_ids().len()
    }

    /// Number of nodes in the arena, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&TransformNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TransformNode> {
        self.nodes.get_mut(&id)
    }

    pub fn local_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(&id).map(|n| &mut n.local)
    }

    /// Replace a node's rule and reset its accumulated state.
    pub fn set_rule(&mut self, id: NodeId, rule: Option<UpdateRule>) -> Result<(), SceneError> {
        if let Some(rule) = &rule {
            rule.validate()
                .map_err(|source| SceneError::InvalidRule { node: id, source })?;
        }
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(SceneError::DanglingReference(id))?;
        node.rule = rule;
        node.rule_state = RuleState::default();
        Ok(())
    }

    pub fn set_geometry(
        &mut self,
        id: NodeId,
        geometry: Option<GeometryHandle>,
    ) -> Result<(), SceneError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(SceneError::DanglingReference(id))?;
        node.geometry = geometry;
        Ok(())
    }

    /// First node (in id order) carrying `name`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name.as_deref() == Some(name))
            .map(|(id, _)| *id)
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_ancestor_or_self(self.root, id)
    }

    pub fn world_transform(&self, id: NodeId) -> Option<Mat4> {
        self.nodes.get(&id).and_then(|n| n.world)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TransformNode)> {
        self.nodes.iter().map(|(id, n)| (*id, n))
    }

    /// Walk the parent chain of `node` looking for `ancestor`.
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    fn subtree_ids(&self, top: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![top];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }
}
