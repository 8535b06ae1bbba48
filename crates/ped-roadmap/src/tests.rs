//! Unit tests for ped-roadmap.

#[cfg(test)]
mod helpers {
    use ped_core::{NodeId, Vec2};

    use crate::{NodeShape, Roadmap, RoadmapBuilder};

    /// ```text
    ///  3 ─── 2
    ///  │     │
    ///  0 ─── 1        4 (isolated)
    /// ```
    /// Square of side 10 plus one unreachable node.
    pub fn square() -> (Roadmap, [NodeId; 5]) {
        let mut b = RoadmapBuilder::new();
        let n0 = b.add_node(Vec2::new(0.0, 0.0), NodeShape::default());
        let n1 = b.add_node(Vec2::new(10.0, 0.0), NodeShape::default());
        let n2 = b.add_node(Vec2::new(10.0, 10.0), NodeShape::default());
        let n3 = b.add_node(Vec2::new(0.0, 10.0), NodeShape::default());
        let n4 = b.add_node(Vec2::new(50.0, 50.0), NodeShape::default());
        b.link_chain(&[n0, n1, n2, n3, n0]);
        b.mark_spawn(n0).mark_goal(n2);
        (b.build().unwrap(), [n0, n1, n2, n3, n4])
    }
}

#[cfg(test)]
mod network {
    use ped_core::{NodeId, Vec2};

    use super::helpers::square;
    use crate::{NodeShape, RoadmapBuilder, RoadmapError};

    #[test]
    fn csr_layout() {
        let (map, _) = square();
        assert_eq!(map.node_count(), 5);
        assert_eq!(map.edge_count(), 8);
        assert_eq!(map.neighbours(NodeId(0)).count(), 2);
        assert_eq!(map.neighbours(NodeId(4)).count(), 0);
    }

    #[test]
    fn shortest_path_includes_endpoints() {
        let (map, [n0, n1, _, _, _]) = square();
        assert_eq!(map.shortest_path(n0, n1).unwrap(), vec![n0, n1]);
        assert_eq!(map.shortest_path(n1, n1).unwrap(), vec![n1]);
    }

    #[test]
    fn shortest_path_two_hops() {
        let (map, [n0, _, n2, _, _]) = square();
        let path = map.shortest_path(n0, n2).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], n0);
        assert_eq!(path[2], n2);
        assert!((map.path_length(n0, n2).unwrap() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn unreachable_is_no_path() {
        let (map, [n0, _, _, _, n4]) = square();
        assert!(matches!(map.shortest_path(n0, n4), Err(RoadmapError::NoPath { .. })));
        assert_eq!(map.path_length(n0, n4), None);
    }

    #[test]
    fn unknown_node_is_error() {
        let (map, [n0, ..]) = square();
        assert!(matches!(
            map.shortest_path(n0, NodeId(99)),
            Err(RoadmapError::NodeNotFound(_))
        ));
    }

    #[test]
    fn build_rejects_bad_link() {
        let mut b = RoadmapBuilder::new();
        let a = b.add_node(Vec2::new(0.0, 0.0), NodeShape::default());
        b.link(a, NodeId(7));
        assert!(matches!(b.build(), Err(RoadmapError::NodeNotFound(NodeId(7)))));
    }

    #[test]
    fn build_rejects_degenerate_shape() {
        let mut b = RoadmapBuilder::new();
        b.add_node(Vec2::new(0.0, 0.0), NodeShape::Circle { radius: 0.0 });
        assert!(matches!(b.build(), Err(RoadmapError::InvalidShape { .. })));
    }

    #[test]
    fn closest_goal_and_nearest_node() {
        let (map, [n0, _, n2, _, _]) = square();
        assert_eq!(map.closest_goal(Vec2::new(0.0, 0.0)), Some(n2));
        assert_eq!(map.nearest_node(Vec2::new(1.0, -1.0)), Some(n0));
    }
}

#[cfg(test)]
mod sight {
    use ped_core::Vec2;

    use super::helpers::square;
    use crate::{LineOfSight, OpenFloor, Walls};

    #[test]
    fn open_floor_sees_everything() {
        assert!(OpenFloor.visible(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn wall_blocks_crossing_segment() {
        let mut w = Walls::new();
        w.add(Vec2::new(5.0, -5.0), Vec2::new(5.0, 5.0));
        assert!(!w.visible(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)));
        assert!(w.visible(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0)));
        assert!(w.visible(Vec2::new(0.0, 6.0), Vec2::new(10.0, 6.0)));
    }

    #[test]
    fn nearest_visible_skips_occluded() {
        let (map, [n0, _, _, n3, _]) = square();
        let p = Vec2::new(3.0, 4.0);
        // Unobstructed: node 0 at the origin is nearest (distance 5).
        assert_eq!(map.nearest_visible_node(p, &OpenFloor), Some(n0));
        // A box around the origin hides node 0; node 3 at (0, 10) is next.
        let mut walls = Walls::new();
        walls.add_box(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        assert_eq!(map.nearest_visible_node(p, &walls), Some(n3));
    }

    #[test]
    fn fully_occluded_is_none() {
        let (map, _) = square();
        let mut walls = Walls::new();
        walls.add_box(Vec2::new(4.0, 4.0), Vec2::new(6.0, 6.0));
        assert_eq!(map.nearest_visible_node(Vec2::new(5.0, 5.0), &walls), None);
    }
}

#[cfg(test)]
mod shape {
    use ped_core::Vec2;

    use crate::NodeShape;
    use crate::shape::{contains_point, target_point};

    #[test]
    fn circle() {
        let s = NodeShape::Circle { radius: 1.0 };
        let c = Vec2::new(2.0, 2.0);
        assert!(contains_point(&s, c, Vec2::new(2.5, 2.5)));
        assert!(!contains_point(&s, c, Vec2::new(3.5, 2.0)));
        assert_eq!(target_point(&s, c, Vec2::new(9.0, 9.0)), c);
    }

    #[test]
    fn ellipse_contains() {
        let s = NodeShape::Ellipse { semi_x: 3.0, semi_z: 0.5, rotation: 0.0 };
        let c = Vec2::new(0.0, 0.0);
        assert!(contains_point(&s, c, Vec2::new(2.9, 0.0)));
        assert!(!contains_point(&s, c, Vec2::new(0.0, 0.6)));
    }

    #[test]
    fn ellipse_target_on_major_axis() {
        let s = NodeShape::Ellipse { semi_x: 3.0, semi_z: 0.5, rotation: 0.0 };
        let c = Vec2::new(0.0, 0.0);
        let t = target_point(&s, c, Vec2::new(1.5, 8.0));
        assert!((t.x - 1.5).abs() < 1e-5 && t.y.abs() < 1e-5);
        // Clamped to the end of the axis.
        let t = target_point(&s, c, Vec2::new(10.0, 8.0));
        assert!((t.x - 3.0).abs() < 1e-5);
    }

    #[test]
    fn rotated_ellipse() {
        let s = NodeShape::Ellipse {
            semi_x: 3.0,
            semi_z: 0.5,
            rotation: std::f32::consts::FRAC_PI_2,
        };
        let c = Vec2::new(0.0, 0.0);
        // Major axis now runs along world z.
        assert!(contains_point(&s, c, Vec2::new(0.0, 2.5)));
        assert!(!contains_point(&s, c, Vec2::new(2.5, 0.0)));
        let t = target_point(&s, c, Vec2::new(5.0, 1.0));
        assert!(t.x.abs() < 1e-4 && (t.y - 1.0).abs() < 1e-4);
    }
}
