use eframe::egui::Vec2;

use super::node::Node;
use super::viewport::Viewport;

#[derive(Clone, Copy, Debug)]
pub struct PhysicsConfig {
    pub center_force: f32,
    pub repulsion_strength: f32,
    pub overlap_stiffness: f32,
    pub damping: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            center_force: 0.0001,
            repulsion_strength: 800.0,
            overlap_stiffness: 0.5,
            damping: 0.95,
        }
    }
}

/// Holds the layout still.
pub fn freeze(nodes: &mut [Node]) {
    for node in nodes {
        node.velocity = Vec2::ZERO;
    }
}

/// One frame of simulation. Each node integrates as soon as its own forces
/// are summed, so later nodes in the pass see earlier nodes' new positions.
/// Every pair is evaluated from both sides.
pub fn step_physics(
    nodes: &mut [Node],
    viewport: &Viewport,
    canvas_size: Vec2,
    config: PhysicsConfig,
) {
    if nodes.is_empty() {
        return;
    }

    let target = viewport.center_world(canvas_size);

    for index in 0..nodes.len() {
        if nodes[index].is_dragging {
            continue;
        }

        let pos = nodes[index].pos;
        let radius = nodes[index].radius;
        let mut velocity = nodes[index].velocity + (target - pos) * config.center_force;

        for (other_index, other) in nodes.iter().enumerate() {
            if other_index == index {
                continue;
            }

            let delta = other.pos - pos;
            let distance = delta.length().max(1.0);
            let min_distance = radius + other.radius;

            let mut magnitude = config.repulsion_strength / (distance * distance);
            if distance < min_distance {
                magnitude += (min_distance - distance) * config.overlap_stiffness;
            }

            velocity -= delta / distance * magnitude;
        }

        velocity *= config.damping;
        let node = &mut nodes[index];
        node.velocity = velocity;
        node.pos += velocity;
    }
}
