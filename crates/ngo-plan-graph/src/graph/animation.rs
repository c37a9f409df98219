//! Spring animations and the animated scene
//!
//! # EGUI-RULES Compliance
//! - Animation state is UI-only, derived from layouts
//! - No callbacks; values are polled each frame via `get()`
//! - Call `tick(dt)` at the start of the frame, then paint with current values
//!
//! Spring presets come from `config/graph_settings.yaml` (`animation.springs`).

use std::collections::BTreeMap;

use egui::Pos2;

use super::arena::NodeKey;
use super::diff::LayoutDiff;
use super::layout::{EdgeKey, LayoutEdge, LayoutFrame, LayoutNode};
use crate::config::{global_config, SpringConfigYaml};

/// Stiffness and damping ratio (1.0 = critically damped, < 1.0 overshoots)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::from_preset("medium")
    }
}

impl From<SpringConfigYaml> for SpringConfig {
    fn from(yaml: SpringConfigYaml) -> Self {
        Self {
            stiffness: yaml.stiffness,
            damping: yaml.damping,
        }
    }
}

impl SpringConfig {
    /// Named preset: `fast`, `medium`, `slow`, `bouncy`, `camera`, `node`
    pub fn from_preset(name: &str) -> Self {
        global_config().animation.spring(name).into()
    }
}

// =============================================================================
// SPRING F32
// =============================================================================

const SNAP_DISTANCE: f32 = 0.0001;
const SNAP_VELOCITY: f32 = 0.001;

#[derive(Debug, Clone)]
pub struct SpringF32 {
    current: f32,
    target: f32,
    velocity: f32,
    config: SpringConfig,
}

impl SpringF32 {
    pub fn new(initial: f32) -> Self {
        Self::with_config(initial, SpringConfig::from_preset("medium"))
    }

    pub fn with_config(initial: f32, config: SpringConfig) -> Self {
        Self {
            current: initial,
            target: initial,
            velocity: 0.0,
            config,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Jump to `value` with no motion
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Advance by `dt` seconds: a = -k·x - 2ζ√k·v
    pub fn tick(&mut self, dt: f32) {
        // large steps destabilise the integration
        let dt = dt.min(0.1);

        let displacement = self.current - self.target;
        let stiffness = self.config.stiffness;
        let acceleration = -stiffness * displacement
            - self.config.damping * 2.0 * stiffness.sqrt() * self.velocity;

        self.velocity += acceleration * dt;
        self.current += self.velocity * dt;

        if (self.current - self.target).abs() < SNAP_DISTANCE && self.velocity.abs() < SNAP_VELOCITY {
            self.current = self.target;
            self.velocity = 0.0;
        }
    }

    pub fn get(&self) -> f32 {
        self.current
    }

    pub fn is_animating(&self) -> bool {
        (self.current - self.target).abs() > SNAP_DISTANCE || self.velocity.abs() > SNAP_VELOCITY
    }

    pub fn set_config(&mut self, config: SpringConfig) {
        self.config = config;
    }
}

// =============================================================================
// SPRING VEC2
// =============================================================================

/// Spring-driven 2D point
#[derive(Debug, Clone)]
pub struct SpringVec2 {
    pub x: SpringF32,
    pub y: SpringF32,
}

impl SpringVec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self::with_config(x, y, SpringConfig::from_preset("medium"))
    }

    pub fn with_config(x: f32, y: f32, config: SpringConfig) -> Self {
        Self {
            x: SpringF32::with_config(x, config),
            y: SpringF32::with_config(y, config),
        }
    }

    pub fn from_pos2(pos: Pos2, config: SpringConfig) -> Self {
        Self::with_config(pos.x, pos.y, config)
    }

    pub fn set_target(&mut self, x: f32, y: f32) {
        self.x.set_target(x);
        self.y.set_target(y);
    }

    pub fn set_target_pos2(&mut self, pos: Pos2) {
        self.set_target(pos.x, pos.y);
    }

    pub fn target(&self) -> (f32, f32) {
        (self.x.target(), self.y.target())
    }

    pub fn set_immediate(&mut self, x: f32, y: f32) {
        self.x.set_immediate(x);
        self.y.set_immediate(y);
    }

    pub fn tick(&mut self, dt: f32) {
        self.x.tick(dt);
        self.y.tick(dt);
    }

    pub fn get(&self) -> (f32, f32) {
        (self.x.get(), self.y.get())
    }

    pub fn get_pos2(&self) -> Pos2 {
        Pos2::new(self.x.get(), self.y.get())
    }

    pub fn is_animating(&self) -> bool {
        self.x.is_animating() || self.y.is_animating()
    }

    pub fn set_config(&mut self, config: SpringConfig) {
        self.x.set_config(config);
        self.y.set_config(config);
    }
}

// =============================================================================
// ANIMATED SCENE
// =============================================================================

/// A node as currently drawn: the last layout it belonged to plus its
/// in-flight position and presence (0 = gone, 1 = fully shown).
#[derive(Debug, Clone)]
pub struct AnimatedNode {
    pub layout: LayoutNode,
    position: SpringVec2,
    presence: SpringF32,
    exiting: bool,
}

impl AnimatedNode {
    pub fn position(&self) -> Pos2 {
        self.position.get_pos2()
    }

    /// Scale and opacity factor in `0..=1`
    pub fn presence(&self) -> f32 {
        self.presence.get().clamp(0.0, 1.0)
    }

    pub fn is_exiting(&self) -> bool {
        self.exiting
    }
}

#[derive(Debug, Clone)]
pub struct AnimatedEdge {
    pub edge: LayoutEdge,
    presence: SpringF32,
    exiting: bool,
}

impl AnimatedEdge {
    pub fn presence(&self) -> f32 {
        self.presence.get().clamp(0.0, 1.0)
    }

    pub fn is_exiting(&self) -> bool {
        self.exiting
    }
}

/// Everything on screen, keyed by identity. Exiting items stay until their
/// presence fades out.
#[derive(Debug, Clone)]
pub struct AnimatedScene {
    nodes: BTreeMap<NodeKey, AnimatedNode>,
    edges: BTreeMap<EdgeKey, AnimatedEdge>,
    spring: SpringConfig,
    fade_threshold: f32,
}

impl Default for AnimatedScene {
    fn default() -> Self {
        Self::new(
            SpringConfig::from_preset("node"),
            global_config().animation.exit_fade_threshold,
        )
    }
}

impl AnimatedScene {
    pub fn new(spring: SpringConfig, fade_threshold: f32) -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            spring,
            fade_threshold,
        }
    }

    /// Replace the scene with `frame`, no motion
    pub fn snap_to(&mut self, frame: &LayoutFrame) {
        self.nodes = frame
            .nodes
            .iter()
            .map(|n| (n.key.clone(), self.settled_node(n, n.position)))
            .collect();
        self.edges = frame
            .edges()
            .map(|e| (e.key.clone(), self.settled_edge(e)))
            .collect();
    }

    /// Start animating from the current scene towards `next`. Entering nodes
    /// grow out of `origin`'s previous position; exiting nodes collapse into
    /// `origin`'s new position. Without an origin the root is used.
    pub fn apply_diff(
        &mut self,
        diff: &LayoutDiff,
        prev: Option<&LayoutFrame>,
        next: &LayoutFrame,
        origin: Option<&NodeKey>,
    ) {
        let Some(prev) = prev else {
            self.snap_to(next);
            return;
        };

        let fallback = next.nodes.first().map(|n| n.position).unwrap_or(Pos2::ZERO);
        let origin_old = origin
            .and_then(|k| prev.position(k))
            .unwrap_or(fallback);
        let origin_new = origin
            .and_then(|k| next.position(k))
            .unwrap_or(fallback);

        for key in &diff.entered {
            let Some(layout) = next.node(key) else { continue };
            match self.nodes.get_mut(key) {
                // re-entering before its exit finished
                Some(node) => {
                    node.layout = layout.clone();
                    node.exiting = false;
                    node.position.set_target_pos2(layout.position);
                    node.presence.set_target(1.0);
                }
                None => {
                    let mut node = self.settled_node(layout, origin_old);
                    node.presence.set_immediate(0.0);
                    node.presence.set_target(1.0);
                    node.position.set_target_pos2(layout.position);
                    self.nodes.insert(key.clone(), node);
                }
            }
        }

        for key in &diff.updated {
            let Some(layout) = next.node(key) else { continue };
            match self.nodes.get_mut(key) {
                Some(node) => {
                    node.layout = layout.clone();
                    node.exiting = false;
                    node.position.set_target_pos2(layout.position);
                    node.presence.set_target(1.0);
                }
                None => {
                    let node = self.settled_node(layout, layout.position);
                    self.nodes.insert(key.clone(), node);
                }
            }
        }

        for key in &diff.exited {
            if let Some(node) = self.nodes.get_mut(key) {
                node.exiting = true;
                node.position.set_target_pos2(origin_new);
                node.presence.set_target(0.0);
            }
        }

        for edge in next.edges() {
            match self.edges.get_mut(&edge.key) {
                Some(animated) => {
                    animated.edge = edge.clone();
                    animated.exiting = false;
                    animated.presence.set_target(1.0);
                }
                None => {
                    let mut animated = self.settled_edge(edge);
                    animated.presence.set_immediate(0.0);
                    animated.presence.set_target(1.0);
                    self.edges.insert(edge.key.clone(), animated);
                }
            }
        }

        for key in &diff.edges_exited {
            if let Some(edge) = self.edges.get_mut(key) {
                edge.exiting = true;
                edge.presence.set_target(0.0);
            }
        }
    }

    /// Advance all springs and drop faded exits. Returns true while anything moves.
    pub fn tick(&mut self, dt: f32) -> bool {
        let mut animating = false;
        for node in self.nodes.values_mut() {
            node.position.tick(dt);
            node.presence.tick(dt);
            animating |= node.position.is_animating() || node.presence.is_animating();
        }
        for edge in self.edges.values_mut() {
            edge.presence.tick(dt);
            animating |= edge.presence.is_animating();
        }

        let threshold = self.fade_threshold;
        self.nodes
            .retain(|_, n| !(n.exiting && n.presence.get() <= threshold));
        self.edges
            .retain(|_, e| !(e.exiting && e.presence.get() <= threshold));

        animating
    }

    pub fn nodes(&self) -> impl Iterator<Item = &AnimatedNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &AnimatedEdge> {
        self.edges.values()
    }

    pub fn node(&self, key: &NodeKey) -> Option<&AnimatedNode> {
        self.nodes.get(key)
    }

    pub fn position(&self, key: &NodeKey) -> Option<Pos2> {
        self.nodes.get(key).map(AnimatedNode::position)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn settled_node(&self, layout: &LayoutNode, at: Pos2) -> AnimatedNode {
        AnimatedNode {
            layout: layout.clone(),
            position: SpringVec2::from_pos2(at, self.spring),
            presence: SpringF32::with_config(1.0, self.spring),
            exiting: false,
        }
    }

    fn settled_edge(&self, edge: &LayoutEdge) -> AnimatedEdge {
        AnimatedEdge {
            edge: edge.clone(),
            presence: SpringF32::with_config(1.0, self.spring),
            exiting: false,
        }
    }
}
