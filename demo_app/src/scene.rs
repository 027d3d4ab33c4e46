//! Scene description and per-frame driver for the orbit demo

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use thiserror::Error;

use scene_graph::config::{Config, ConfigError, SceneGraphConfig};
use scene_graph::foundation::math::{Mat4, Quat, Vec3};
use scene_graph::scene::{Pose, SceneGraph, SceneGraphError, UnitId};

/// Errors the demo can hit while building or running a scene
#[derive(Error, Debug)]
pub enum DemoError {
    /// Scene description could not be loaded
    #[error("Scene description: {0}")]
    Config(#[from] ConfigError),

    /// A node names a parent that is not declared before it
    #[error("Node '{node}' refers to unknown parent '{parent}'")]
    UnknownParent {
        /// Node being created
        node: String,
        /// Missing parent name
        parent: String,
    },

    /// Two nodes share a name
    #[error("Node name '{0}' is used twice")]
    DuplicateName(String),

    /// The graph failed its consistency check
    #[error("Scene graph inconsistent: {0}")]
    Graph(#[from] SceneGraphError),
}

/// One node of the demo scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescription {
    /// Unique name
    pub name: String,
    /// Parent name, declared earlier in the list
    pub parent: Option<String>,
    /// Initial world position
    pub position: [f32; 3],
    /// Initial uniform world scale
    pub scale: f32,
    /// Rotation speed around local Y in radians per second
    pub spin: f32,
    /// Placement pushed from outside every frame instead of spun
    pub simulated: bool,
}

/// Whole demo scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Number of frames to run
    pub frames: u32,
    /// Simulated seconds per frame
    pub frame_time: f32,
    /// Graph construction parameters
    pub graph: SceneGraphConfig,
    /// Nodes, parents before children
    pub nodes: Vec<NodeDescription>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        let node = |name: &str, parent: Option<&str>, position: [f32; 3], scale: f32, spin: f32| NodeDescription {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            position,
            scale,
            spin,
            simulated: false,
        };

        Self {
            frames: 240,
            frame_time: 1.0 / 60.0,
            graph: SceneGraphConfig {
                initial_capacity: 8,
                ..Default::default()
            },
            nodes: vec![
                node("sun", None, [0.0, 0.0, 0.0], 4.0, 0.1),
                node("earth", Some("sun"), [20.0, 0.0, 0.0], 1.0, 1.0),
                node("moon", Some("earth"), [23.0, 0.0, 0.0], 0.3, 3.0),
                node("mars", Some("sun"), [0.0, 0.0, 30.0], 0.6, 0.5),
                NodeDescription {
                    simulated: true,
                    ..node("probe", None, [0.0, 10.0, 0.0], 0.1, 0.0)
                },
            ],
        }
    }
}

impl Config for SceneDescription {}

/// What one frame produced
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Number of units whose world pose changed
    pub changed: usize,
    /// Name of the first changed unit
    pub first_name: Option<String>,
    /// World position of the first changed unit
    pub first_position: Option<Vec3>,
}

/// Owns the graph and plays the role of the world's update step
pub struct FrameDriver {
    graph: SceneGraph,
    names: SlotMap<UnitId, String>,
    spinners: Vec<(UnitId, f32)>,
    simulated: Vec<(UnitId, Vec3)>,
    frame_time: f32,
    time: f32,
    changed_units: Vec<UnitId>,
    changed_poses: Vec<Mat4>,
}

impl FrameDriver {
    /// Build the hierarchy described by `description`
    pub fn new(description: &SceneDescription) -> Result<Self, DemoError> {
        let mut graph = SceneGraph::with_config(&description.graph);
        let mut names = SlotMap::with_key();
        let mut by_name: HashMap<&str, UnitId> = HashMap::new();
        let mut spinners = Vec::new();
        let mut simulated = Vec::new();

        for node in &description.nodes {
            if by_name.contains_key(node.name.as_str()) {
                return Err(DemoError::DuplicateName(node.name.clone()));
            }

            let unit = names.insert(node.name.clone());
            let position = Vec3::from(node.position);
            let instance = graph.create_from_pose(
                unit,
                Pose {
                    scale: Vec3::new(node.scale, node.scale, node.scale),
                    ..Pose::from_position(position)
                },
            );

            if let Some(parent_name) = &node.parent {
                let parent = by_name.get(parent_name.as_str()).copied().ok_or_else(|| {
                    DemoError::UnknownParent {
                        node: node.name.clone(),
                        parent: parent_name.clone(),
                    }
                })?;
                graph.link(instance, graph.get(parent));
            }

            if node.simulated {
                simulated.push((unit, position));
            } else if node.spin != 0.0 {
                spinners.push((unit, node.spin));
            }
            by_name.insert(node.name.as_str(), unit);
        }

        graph.clear_changed();

        Ok(Self {
            graph,
            names,
            spinners,
            simulated,
            frame_time: description.frame_time,
            time: 0.0,
            changed_units: Vec::new(),
            changed_poses: Vec::new(),
        })
    }

    /// Advance one frame: mutate, drain the change feed, clear it
    pub fn step(&mut self) -> FrameReport {
        self.time += self.frame_time;

        for &(unit, spin) in &self.spinners {
            let instance = self.graph.get(unit);
            self.graph
                .set_local_rotation(instance, Quat::from_axis_angle(&Vec3::y_axis(), spin * self.time));
        }

        for &(unit, origin) in &self.simulated {
            let bob = Vec3::new(0.0, (self.time * 2.0).sin(), 0.0);
            let instance = self.graph.get(unit);
            self.graph
                .set_world_pose(instance, &Mat4::new_translation(&(origin + bob)));
        }

        self.changed_units.clear();
        self.changed_poses.clear();
        self.graph
            .get_changed(&mut self.changed_units, &mut self.changed_poses);
        self.graph.clear_changed();

        FrameReport {
            changed: self.changed_units.len(),
            first_name: self
                .changed_units
                .first()
                .and_then(|unit| self.names.get(*unit))
                .cloned(),
            first_position: self
                .changed_poses
                .first()
                .map(|pose| pose.fixed_view::<3, 1>(0, 3).into_owned()),
        }
    }

    /// The driven graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Units drained on the last step
    pub fn last_changed(&self) -> &[UnitId] {
        &self.changed_units
    }

    /// Name of `unit`
    pub fn name(&self, unit: UnitId) -> Option<&str> {
        self.names.get(unit).map(String::as_str)
    }
}
