use eframe::egui::{Vec2, vec2};

use crate::util::stable_pair;

pub const NODE_RADIUS: f32 = 50.0;
const SCATTER_WIDTH: f32 = 500.0;
const SCATTER_HEIGHT: f32 = 300.0;
const OTHER_PREFIX: &str = "Other - ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Seed,
    Shifter,
    Affirmer,
}

impl NodeKind {
    pub const ALL: [Self; 3] = [Self::Seed, Self::Shifter, Self::Affirmer];

    pub fn label(self) -> &'static str {
        match self {
            Self::Seed => "Seed",
            Self::Shifter => "Shifter",
            Self::Affirmer => "Affirmer",
        }
    }

    pub fn legend(self) -> &'static str {
        match self {
            Self::Seed => "Seed - Beginning of belief",
            Self::Shifter => "Shifter - Turning point of belief",
            Self::Affirmer => "Affirmer - Strengthening beliefs",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: usize,
    pub label: String,
    pub pos: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub is_dragging: bool,
    pub kind: NodeKind,
    /// Set once the renderer has a bitmap for this node.
    pub has_image: bool,
}

impl Node {
    pub fn contains(&self, world: Vec2) -> bool {
        (world - self.pos).length() < self.radius
    }

    pub fn display_title(&self) -> String {
        display_title(&self.label)
    }
}

/// Titles `"Other - X"` labels as `"X Related Experience"`.
pub fn display_title(label: &str) -> String {
    match label.strip_prefix(OTHER_PREFIX) {
        Some(category) => format!("{category} Related Experience"),
        None => label.to_owned(),
    }
}

pub fn other_category(label: &str) -> Option<&str> {
    label.strip_prefix(OTHER_PREFIX)
}

/// Scatters one seed node per label around `center`.
pub fn spawn_nodes(labels: &[String], center: Vec2) -> Vec<Node> {
    labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let (jx, jy) = stable_pair(&(index, label.as_str()));
            let (vx, vy) = stable_pair(&(label.as_str(), index));
            Node {
                id: index,
                label: label.clone(),
                pos: center + vec2(jx * SCATTER_WIDTH * 0.5, jy * SCATTER_HEIGHT * 0.5),
                velocity: vec2(vx, vy),
                radius: NODE_RADIUS,
                is_dragging: false,
                kind: NodeKind::Seed,
                has_image: false,
            }
        })
        .collect()
}
