use eframe::egui::Pos2;

use super::node::Node;
use super::viewport::Viewport;

/// Topmost node under `screen`, scanning from the last-drawn node.
pub fn hit_test(nodes: &[Node], viewport: &Viewport, screen: Pos2) -> Option<usize> {
    let world = viewport.screen_to_world(screen);
    nodes
        .iter()
        .enumerate()
        .rev()
        .find(|(_, node)| node.contains(world))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Vec2, pos2, vec2};

    use super::super::node::spawn_nodes;
    use super::*;

    fn nodes_at(positions: &[(f32, f32)]) -> Vec<Node> {
        let labels = (0..positions.len()).map(|i| format!("n{i}")).collect::<Vec<_>>();
        let mut nodes = spawn_nodes(&labels, Vec2::ZERO);
        for (node, &(x, y)) in nodes.iter_mut().zip(positions) {
            node.pos = vec2(x, y);
        }
        nodes
    }

    #[test]
    fn topmost_node_wins_overlap() {
        let nodes = nodes_at(&[(100.0, 100.0), (120.0, 100.0)]);
        assert_eq!(hit_test(&nodes, &Viewport::default(), pos2(110.0, 100.0)), Some(1));
        assert_eq!(hit_test(&nodes, &Viewport::default(), pos2(60.0, 100.0)), Some(0));
    }

    #[test]
    fn empty_space_misses() {
        let nodes = nodes_at(&[(0.0, 0.0)]);
        assert_eq!(hit_test(&nodes, &Viewport::default(), pos2(500.0, 500.0)), None);
        assert_eq!(hit_test(&[], &Viewport::default(), pos2(0.0, 0.0)), None);
    }

    #[test]
    fn respects_pan_and_zoom() {
        let nodes = nodes_at(&[(200.0, 0.0)]);
        let viewport = Viewport {
            pan: vec2(-100.0, 50.0),
            zoom: 2.0,
        };
        // world (200, 0) -> screen (300, 50)
        assert_eq!(hit_test(&nodes, &viewport, pos2(300.0, 50.0)), Some(0));
        // 60 screen px = 30 world units, inside radius 50
        assert_eq!(hit_test(&nodes, &viewport, pos2(360.0, 50.0)), Some(0));
        // 120 screen px = 60 world units, outside
        assert_eq!(hit_test(&nodes, &viewport, pos2(420.0, 50.0)), None);
    }
}
