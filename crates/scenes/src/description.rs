//! Scene descriptions: a node tree with transforms, geometry and update
//! rules, loaded from YAML or JSON.
//!
//! ```yaml
//! name: two-spinners
//! camera: [0.0, 0.0, -6.0]
//! nodes:
//!   - name: left
//!     transform: { translation: [-1.5, 0.0, 0.0] }
//!     geometry: { kind: octahedron }
//!     rule: { kind: spin, axis: [0.0, 1.0, 0.0], period_ms: 4000.0 }
//!   - name: right
//!     transform: { translation: [1.5, 0.0, 0.0] }
//!     geometry: { kind: pyramid, depth: 2 }
//! ```

use std::path::Path;

use glam::Vec3;
use kinema_animate::{Clock, SceneContext};
use kinema_common::{NodeId, Transform};
use kinema_geometry::polyhedra::{dodecahedron, octahedron, scutoid};
use kinema_geometry::primitives::{cuboid, uv_sphere};
use kinema_geometry::{Color, GeometryBuffer, GeometryError, fractal_pyramid};
use kinema_kernel::{TransformNode, UpdateRule};
use kinema_render::Projection;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::{Demo, DemoConfig, DemoError};

const DEFAULT_COLOR: Color = [0.8, 0.8, 0.8, 1.0];

fn default_color() -> Color {
    DEFAULT_COLOR
}

/// Which buffer a node draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeometrySpec {
    Octahedron,
    Dodecahedron,
    Scutoid,
    Pyramid {
        depth: i32,
    },
    Cuboid {
        size: [f32; 3],
        #[serde(default = "default_color")]
        color: Color,
    },
    Sphere {
        radius: f32,
        segments: u32,
        rings: u32,
        #[serde(default = "default_color")]
        color: Color,
    },
}

impl GeometrySpec {
    pub fn build(&self, rng: &mut impl Rng) -> Result<GeometryBuffer, GeometryError> {
        match *self {
            GeometrySpec::Octahedron => octahedron(),
            GeometrySpec::Dodecahedron => dodecahedron(),
            GeometrySpec::Scutoid => scutoid(),
            GeometrySpec::Pyramid { depth } => fractal_pyramid(depth, rng),
            GeometrySpec::Cuboid { size, color } => cuboid(size, color),
            GeometrySpec::Sphere {
                radius,
                segments,
                rings,
                color,
            } => uv_sphere(radius, segments, rings, color),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub transform: Transform,
    /// XYZ Euler angles in radians; replaces `transform.rotation` when set.
    #[serde(default)]
    pub euler: Option<Vec3>,
    #[serde(default)]
    pub geometry: Option<GeometrySpec>,
    #[serde(default)]
    pub rule: Option<UpdateRule>,
    #[serde(default)]
    pub children: Vec<NodeDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub name: String,
    #[serde(default)]
    pub projection: Option<Projection>,
    /// Root translation, i.e. the inverse camera position.
    #[serde(default)]
    pub camera: Option<Vec3>,
    #[serde(default)]
    pub nodes: Vec<NodeDescription>,
}

impl SceneDescription {
    pub fn from_yaml_str(text: &str) -> Result<Self, DemoError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, DemoError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a description file. `.json` files are parsed as JSON, anything
    /// else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DemoError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        tracing::debug!(path = %path.display(), is_json, "loading scene description");
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Total nodes described, not counting the root.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&NodeDescription> = self.nodes.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Populate `ctx` under its root. Children keep their described order.
    ///
    /// Fails on the first invalid rule or geometry; nodes inserted before
    /// the failure stay in the graph.
    pub fn build(&self, ctx: &mut SceneContext, rng: &mut impl Rng) -> Result<(), DemoError> {
        let _span = tracing::info_span!("build_description", scene = %self.name).entered();
        if let Some(projection) = self.projection {
            ctx.projection = projection;
        }
        let root = ctx.graph.root();
        if let Some(camera) = self.camera {
            if let Some(local) = ctx.graph.local_mut(root) {
                local.translation = camera;
            }
        }

        let mut stack: Vec<(NodeId, &NodeDescription)> =
            self.nodes.iter().rev().map(|n| (root, n)).collect();
        while let Some((parent, desc)) = stack.pop() {
            let mut local = desc.transform;
            if let Some(euler) = desc.euler {
                local.set_euler(euler);
            }
            let mut node = TransformNode::new(local);
            if let Some(name) = &desc.name {
                node = node.named(name.clone());
            }
            if let Some(rule) = desc.rule {
                node = node.with_rule(rule);
            }
            let id = match &desc.geometry {
                Some(spec) => ctx.spawn_mesh(parent, node, spec.build(rng)?)?,
                None => ctx.graph.insert(parent, node)?,
            };
            stack.extend(desc.children.iter().rev().map(|c| (id, c)));
        }
        tracing::info!(nodes = ctx.graph.node_count(), "scene description built");
        Ok(())
    }
}

/// A demo built from a [`SceneDescription`].
pub struct DescribedDemo {
    ctx: SceneContext,
    name: String,
}

impl DescribedDemo {
    pub fn build(
        description: &SceneDescription,
        config: &DemoConfig,
        clock: Box<dyn Clock>,
    ) -> Result<Self, DemoError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut ctx = SceneContext::new(clock);
        description.build(&mut ctx, &mut rng)?;
        Ok(Self {
            ctx,
            name: description.name.clone(),
        })
    }
}

impl Demo for DescribedDemo {
    fn name(&self) -> &str {
        &self.name
    }

    fn context(&self) -> &SceneContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.ctx
    }
}

/// Load a description file and build it.
pub fn load_demo(
    path: impl AsRef<Path>,
    config: &DemoConfig,
    clock: Box<dyn Clock>,
) -> Result<DescribedDemo, DemoError> {
    let description = SceneDescription::load(path)?;
    DescribedDemo::build(&description, config, clock)
}
