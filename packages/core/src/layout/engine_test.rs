//! Tests for the rank-based layout engine

#[cfg(test)]
mod tests {
    use crate::layout::engine::*;
    use crate::layout::geometry::has_overlaps;
    use crate::models::{edges_from_parent_links, Edge, Node, NodeType, Position};

    fn node(id: &str, parent: Option<&str>) -> Node {
        let node_type = if parent.is_none() {
            NodeType::Root
        } else {
            NodeType::Ai
        };
        Node::new_with_id(id.to_string(), node_type, id.to_string(), parent.map(String::from))
    }

    /// root → (a → (a1, a2, a3), b, c → (c1))
    fn sample_tree() -> Vec<Node> {
        vec![
            node("root", None),
            node("a", Some("root")),
            node("b", Some("root")),
            node("c", Some("root")),
            node("a1", Some("a")),
            node("a2", Some("a")),
            node("a3", Some("a")),
            node("c1", Some("c")),
        ]
    }

    fn position_of(nodes: &[Node], id: &str) -> Position {
        nodes.iter().find(|n| n.id == id).unwrap().position
    }

    #[test]
    fn test_empty_input() {
        let result = layout(&[], &[], &LayoutOptions::default());
        assert!(result.nodes.is_empty());
        assert!(result.edges.is_empty());
    }

    #[test]
    fn test_left_right_children_to_the_right() {
        let nodes = vec![node("root", None), node("a", Some("root")), node("b", Some("root"))];
        let edges = edges_from_parent_links(&nodes);
        let options = LayoutOptions::default().with_direction(LayoutDirection::LeftRight);

        let result = layout(&nodes, &edges, &options);
        let root = position_of(&result.nodes, "root");

        assert!(position_of(&result.nodes, "a").x > root.x);
        assert!(position_of(&result.nodes, "b").x > root.x);
    }

    #[test]
    fn test_top_bottom_children_below() {
        let nodes = vec![node("root", None), node("a", Some("root")), node("b", Some("root"))];
        let edges = edges_from_parent_links(&nodes);
        let options = LayoutOptions::default().with_direction(LayoutDirection::TopBottom);

        let result = layout(&nodes, &edges, &options);
        let root = position_of(&result.nodes, "root");

        assert!(position_of(&result.nodes, "a").y > root.y);
        assert!(position_of(&result.nodes, "b").y > root.y);
        // parent is centered over its children
        let mid = (position_of(&result.nodes, "a").x + position_of(&result.nodes, "b").x) / 2.0;
        assert_eq!(root.x, mid);
    }

    #[test]
    fn test_mirrored_directions() {
        let nodes = vec![node("root", None), node("a", Some("root"))];
        let edges = edges_from_parent_links(&nodes);

        let bt = layout(&nodes, &edges, &LayoutOptions::default().with_direction(LayoutDirection::BottomTop));
        assert!(position_of(&bt.nodes, "a").y < position_of(&bt.nodes, "root").y);

        let rl = layout(&nodes, &edges, &LayoutOptions::default().with_direction(LayoutDirection::RightLeft));
        assert!(position_of(&rl.nodes, "a").x < position_of(&rl.nodes, "root").x);
    }

    #[test]
    fn test_no_overlaps_for_any_direction() {
        let nodes = sample_tree();
        let edges = edges_from_parent_links(&nodes);

        for direction in [
            LayoutDirection::TopBottom,
            LayoutDirection::BottomTop,
            LayoutDirection::LeftRight,
            LayoutDirection::RightLeft,
        ] {
            let options = LayoutOptions::default().with_direction(direction);
            let result = layout(&nodes, &edges, &options);

            assert_eq!(result.nodes.len(), nodes.len());
            assert!(
                !has_overlaps(&result.nodes, options.node_size()),
                "overlap in {} layout",
                direction
            );
        }
    }

    #[test]
    fn test_forest_roots_do_not_overlap() {
        let nodes = vec![
            node("r1", None),
            node("x", Some("r1")),
            node("r2", None),
            node("y", Some("r2")),
        ];
        let edges = edges_from_parent_links(&nodes);
        let options = LayoutOptions::default();

        let result = layout(&nodes, &edges, &options);

        assert!(!has_overlaps(&result.nodes, options.node_size()));
    }

    #[test]
    fn test_manual_node_keeps_position() {
        let mut nodes = sample_tree();
        nodes[2] = node("b", Some("root")).with_manual_position(-999.0, 1234.5);
        let edges = edges_from_parent_links(&nodes);

        let result = layout(&nodes, &edges, &LayoutOptions::default());

        assert_eq!(position_of(&result.nodes, "b"), Position::new(-999.0, 1234.5));
        assert_ne!(position_of(&result.nodes, "a"), Position::default());
        // siblings still get a fresh position
        assert_ne!(position_of(&result.nodes, "c"), position_of(&nodes, "c"));
    }

    #[test]
    fn test_layout_does_not_mutate_input() {
        let nodes = sample_tree();
        let snapshot = nodes.clone();
        let edges = edges_from_parent_links(&nodes);

        let result = layout(&nodes, &edges, &LayoutOptions::default());

        assert_eq!(nodes, snapshot);
        assert_eq!(result.edges, edges);
    }

    #[test]
    fn test_cycle_does_not_hang() {
        let nodes = vec![node("a", Some("b")), node("b", Some("a"))];
        let edges = vec![Edge::between("a", "b"), Edge::between("b", "a")];

        let result = layout(&nodes, &edges, &LayoutOptions::default());

        assert_eq!(result.nodes.len(), 2);
        assert_ne!(position_of(&result.nodes, "a"), position_of(&result.nodes, "b"));
    }

    #[test]
    fn test_edges_to_unknown_nodes_are_ignored() {
        let nodes = vec![node("root", None), node("a", Some("root"))];
        let mut edges = edges_from_parent_links(&nodes);
        edges.push(Edge::between("root", "ghost"));

        let result = layout(&nodes, &edges, &LayoutOptions::default());

        assert_eq!(result.nodes.len(), 2);
        assert_eq!(result.edges.len(), 2);
    }

    #[test]
    fn test_positions_map() {
        let nodes = sample_tree();
        let edges = edges_from_parent_links(&nodes);
        let result = layout(&nodes, &edges, &LayoutOptions::default());

        let positions = result.positions();
        assert_eq!(positions.len(), nodes.len());
        assert_eq!(positions["a1"], position_of(&result.nodes, "a1"));
    }

    #[test]
    fn test_layout_descendants_holds_anchor_and_outsiders() {
        let nodes: Vec<Node> = sample_tree()
            .into_iter()
            .enumerate()
            .map(|(i, n)| n.with_position(i as f64 * 17.0, i as f64 * -3.0))
            .collect();
        let edges = edges_from_parent_links(&nodes);

        let result = layout_descendants("a", &nodes, &edges, &LayoutOptions::default());

        for outside in ["root", "b", "c", "c1"] {
            assert_eq!(position_of(&result.nodes, outside), position_of(&nodes, outside));
        }
        assert_eq!(position_of(&result.nodes, "a"), position_of(&nodes, "a"));

        let anchor = position_of(&nodes, "a");
        for child in ["a1", "a2", "a3"] {
            assert!(position_of(&result.nodes, child).y > anchor.y);
        }
        let subtree: Vec<Node> = result
            .nodes
            .iter()
            .filter(|n| ["a", "a1", "a2", "a3"].contains(&n.id.as_str()))
            .cloned()
            .collect();
        assert!(!has_overlaps(&subtree, LayoutOptions::default().node_size()));
    }

    #[test]
    fn test_layout_descendants_ignores_secondary_parent_edges() {
        let nodes: Vec<Node> = sample_tree()
            .into_iter()
            .enumerate()
            .map(|(i, n)| n.with_position(i as f64 * 17.0, i as f64 * -3.0))
            .collect();
        let mut edges = edges_from_parent_links(&nodes);
        // c1 already hangs off c; a later edge from a does not re-parent it
        edges.push(Edge::between("a", "c1"));

        let result = layout_descendants("a", &nodes, &edges, &LayoutOptions::default());

        assert_eq!(position_of(&result.nodes, "c1"), position_of(&nodes, "c1"));
        assert_ne!(position_of(&result.nodes, "a1"), position_of(&nodes, "a1"));
    }

    #[test]
    fn test_layout_descendants_unknown_anchor() {
        let nodes = sample_tree();
        let edges = edges_from_parent_links(&nodes);

        let result = layout_descendants("missing", &nodes, &edges, &LayoutOptions::default());

        assert_eq!(result.nodes, nodes);
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("lr".parse::<LayoutDirection>().unwrap(), LayoutDirection::LeftRight);
        assert_eq!("TB".parse::<LayoutDirection>().unwrap(), LayoutDirection::TopBottom);
        assert!("diagonal".parse::<LayoutDirection>().is_err());

        let json = serde_json::to_string(&LayoutDirection::RightLeft).unwrap();
        assert_eq!(json, "\"RL\"");
    }

    #[test]
    fn test_options_validation() {
        assert!(LayoutOptions::default().validate().is_ok());

        let mut options = LayoutOptions::default();
        options.node_width = 0.0;
        assert!(options.validate().is_err());

        let mut options = LayoutOptions::default();
        options.rank_separation = -1.0;
        assert!(options.validate().is_err());
    }
}
