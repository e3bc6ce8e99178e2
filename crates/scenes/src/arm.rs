//! Articulated arm: a chain of pivoted joints, each carrying box segments,
//! posed through clamped joint angles.

use glam::Vec3;
use kinema_animate::{Clock, SceneContext};
use kinema_common::{NodeId, Transform};
use kinema_geometry::Color;
use kinema_geometry::primitives::cuboid;
use kinema_input::Action;
use kinema_kernel::TransformNode;
use kinema_render::Projection;

use crate::{Demo, DemoError, Response, handle_common};

const SEGMENT_COLOR: Color = [0.75, 0.75, 0.8, 1.0];
const JOINT_COLOR: Color = [0.9, 0.55, 0.2, 1.0];
const FLOOR_COLOR: Color = [0.35, 0.35, 0.35, 1.0];

/// Per-axis angle range in radians. A zero-width range locks the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointLimits {
    pub min: Vec3,
    pub max: Vec3,
}

impl JointLimits {
    pub fn clamp(&self, angles: Vec3) -> Vec3 {
        angles.clamp(self.min, self.max)
    }
}

/// One joint of the rig.
#[derive(Debug, Clone, Copy)]
pub struct JointSpec {
    pub name: &'static str,
    pub translation: Vec3,
    pub pivot: Vec3,
    pub limits: JointLimits,
}

/// Shoulder to hand, each joint the child of the previous one.
pub const JOINTS: [JointSpec; 4] = [
    JointSpec {
        name: "shoulder",
        translation: Vec3::new(0.0, -1.0, 0.0),
        pivot: Vec3::new(0.0, 3.0, 0.0),
        limits: JointLimits {
            min: Vec3::new(-1.5, 0.0, -2.0),
            max: Vec3::new(1.5, 0.0, 2.0),
        },
    },
    JointSpec {
        name: "elbow",
        translation: Vec3::new(0.0, 0.05, 0.0),
        pivot: Vec3::new(0.0, 0.5, 0.0),
        limits: JointLimits {
            min: Vec3::new(-2.0, -1.0, 0.0),
            max: Vec3::new(1.0, 1.0, 0.0),
        },
    },
    JointSpec {
        name: "wrist",
        translation: Vec3::ZERO,
        pivot: Vec3::new(0.0, -1.8, 0.0),
        limits: JointLimits {
            min: Vec3::new(-1.0, 0.0, 0.0),
            max: Vec3::new(1.0, 0.0, 0.0),
        },
    },
    JointSpec {
        name: "hand",
        translation: Vec3::ZERO,
        pivot: Vec3::new(0.0, -2.5, 0.0),
        limits: JointLimits {
            min: Vec3::new(-1.0, 0.0, -1.0),
            max: Vec3::new(1.0, 0.0, 1.0),
        },
    },
];

/// Box segments per joint: (name, joint index, size, position, color).
const SEGMENTS: [(&str, usize, [f32; 3], Vec3, Color); 6] = [
    ("shoulder_cap", 0, [0.5, 0.5, 0.5], Vec3::new(0.0, 3.0, 0.0), JOINT_COLOR),
    ("upper_arm", 0, [0.8, 2.0, 0.8], Vec3::new(0.0, 1.7, 0.0), SEGMENT_COLOR),
    ("elbow_cap", 1, [0.5, 0.5, 0.5], Vec3::new(0.0, 0.42, 0.0), JOINT_COLOR),
    ("forearm", 1, [0.8, 2.0, 0.8], Vec3::new(0.0, -0.85, 0.0), SEGMENT_COLOR),
    ("wrist_cap", 2, [0.5, 0.5, 0.5], Vec3::new(0.0, -2.1, 0.0), JOINT_COLOR),
    ("palm", 3, [0.7, 0.7, 0.7], Vec3::new(0.0, -2.72, 0.0), SEGMENT_COLOR),
];

pub const CAMERA_DISTANCE: f32 = 15.0;

pub struct ArmDemo {
    ctx: SceneContext,
    /// Joint nodes in [`JOINTS`] order.
    pub joints: Vec<NodeId>,
}

impl ArmDemo {
    pub fn build(clock: Box<dyn Clock>) -> Result<Self, DemoError> {
        let mut ctx = SceneContext::new(clock)
            .with_projection(Projection::default().with_far(10_000.0));
        let root = ctx.graph.root();
        if let Some(local) = ctx.graph.local_mut(root) {
            *local = Transform::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE));
        }

        ctx.spawn_mesh(
            root,
            TransformNode::new(Transform::from_translation(Vec3::new(0.0, -4.2, 0.0)))
                .named("floor"),
            cuboid([20.0, 0.1, 20.0], FLOOR_COLOR)?,
        )?;

        // Each joint's boxes go in before the next joint.
        let mut joints = Vec::with_capacity(JOINTS.len());
        let mut parent = root;
        for (index, spec) in JOINTS.iter().enumerate() {
            let joint = ctx.graph.insert(
                parent,
                TransformNode::new(
                    Transform::from_translation(spec.translation).with_pivot(spec.pivot),
                )
                .named(spec.name),
            )?;
            for (name, _, size, position, color) in
                SEGMENTS.iter().filter(|segment| segment.1 == index)
            {
                ctx.spawn_mesh(
                    joint,
                    TransformNode::new(Transform::from_translation(*position)).named(*name),
                    cuboid(*size, *color)?,
                )?;
            }
            joints.push(joint);
            parent = joint;
        }

        Ok(Self { ctx, joints })
    }

    /// Set a joint's XYZ Euler angles, clamped to its limits. Returns the
    /// applied angles.
    pub fn set_joint(&mut self, name: &str, angles: Vec3) -> Result<Vec3, DemoError> {
        let index = JOINTS
            .iter()
            .position(|j| j.name == name)
            .ok_or_else(|| DemoError::UnknownJoint(name.to_string()))?;
        let applied = JOINTS[index].limits.clamp(angles);
        if let Some(local) = self.ctx.graph.local_mut(self.joints[index]) {
            local.set_euler(applied);
        }
        tracing::debug!(joint = name, ?applied, "posed joint");
        Ok(applied)
    }
}

impl Demo for ArmDemo {
    fn name(&self) -> &str {
        "arm"
    }

    fn context(&self) -> &SceneContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.ctx
    }

    fn handle(&mut self, action: &Action) -> Result<Response, DemoError> {
        match action {
            Action::SetJoint { joint, angles } => {
                self.set_joint(joint, *angles)?;
                Ok(Response::Handled)
            }
            other => Ok(handle_common(&mut self.ctx, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{EulerRot, Mat4, Quat};
    use kinema_animate::ManualClock;

    fn demo() -> ArmDemo {
        ArmDemo::build(Box::new(ManualClock::new())).unwrap()
    }

    fn world_point(demo: &mut ArmDemo, name: &str) -> Vec3 {
        let ctx = demo.context_mut();
        ctx.graph.recompute_world_transforms();
        let id = ctx.graph.find(name).unwrap();
        ctx.graph.world_transform(id).unwrap().transform_point3(Vec3::ZERO)
    }

    #[test]
    fn rig_shape() {
        let demo = demo();
        let graph = &demo.context().graph;
        assert_eq!(demo.joints.len(), 4);
        for pair in demo.joints.windows(2) {
            assert_eq!(graph.parent(pair[1]), Some(pair[0]));
        }
        // root, floor, four joints, six boxes
        assert_eq!(graph.reachable_count(), 12);
        let shoulder = graph.children(demo.joints[0]);
        assert_eq!(shoulder.len(), 3);
        assert_eq!(shoulder[2], demo.joints[1]);
    }

    #[test]
    fn rest_pose_matches_segment_offsets() {
        let mut demo = demo();
        let palm = world_point(&mut demo, "palm");
        // shoulder and elbow translations stack; wrist and hand add none.
        let expected = Vec3::new(0.0, -1.0 + 0.05 - 2.72, -CAMERA_DISTANCE);
        assert!(palm.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn joint_rotates_about_its_pivot() {
        let mut demo = demo();
        let before = world_point(&mut demo, "shoulder_cap");
        demo.set_joint("shoulder", Vec3::new(1.0, 0.0, 0.0)).unwrap();
        // The cap sits exactly on the shoulder pivot, so it does not move.
        let after = world_point(&mut demo, "shoulder_cap");
        assert!(before.abs_diff_eq(after, 1e-5));

        let palm = world_point(&mut demo, "palm");
        assert!((palm.z + CAMERA_DISTANCE).abs() > 0.5);
    }

    #[test]
    fn pivot_matches_paired_wrapper_groups() {
        let mut demo = demo();
        let angles = Vec3::new(0.4, 0.0, -0.7);
        demo.set_joint("shoulder", angles).unwrap();
        let shoulder = demo.joints[0];
        let local = demo.context().graph.get(shoulder).unwrap().local.matrix();

        let rotation = Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z);
        let wrapped = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0))
            * Mat4::from_quat(rotation)
            * Mat4::from_translation(Vec3::new(0.0, -3.0, 0.0));
        assert!(local.abs_diff_eq(wrapped, 1e-5));
    }

    #[test]
    fn angles_are_clamped_and_locked_axes_stay_zero() {
        let mut demo = demo();
        let applied = demo.set_joint("elbow", Vec3::new(-5.0, 3.0, 1.0)).unwrap();
        assert_eq!(applied, Vec3::new(-2.0, 1.0, 0.0));
        let applied = demo.set_joint("wrist", Vec3::new(0.5, 0.5, 0.5)).unwrap();
        assert_eq!(applied, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn unknown_joint_is_an_error() {
        let mut demo = demo();
        let err = demo
            .handle(&Action::SetJoint {
                joint: "knee".into(),
                angles: Vec3::ZERO,
            })
            .unwrap_err();
        assert!(matches!(err, DemoError::UnknownJoint(name) if name == "knee"));
    }
}
