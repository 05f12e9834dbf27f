//! End-to-end layout behaviour over small fixture graphs.

use typegraph_layout::{
    CenterForce, CollideForce, InputNode, LayoutError, Link, LinkForce, ManyBodyForce, NodeId,
    Simulation, SimulationConfig,
};

// ============================================================================
// Fixtures
// ============================================================================

fn node_ids(n: i64) -> Vec<NodeId> {
    (1..=n).map(NodeId).collect()
}

fn simulation_with(n: i64, config: &SimulationConfig) -> Simulation {
    let mut sim = Simulation::with_config(config).unwrap();
    sim.add_nodes(node_ids(n).into_iter().map(InputNode::new)).unwrap();
    sim
}

fn centroid(sim: &Simulation) -> (f64, f64) {
    let n = sim.nodes().len() as f64;
    let (sx, sy) = sim
        .nodes()
        .iter()
        .fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
    (sx / n, sy / n)
}

fn distance(sim: &Simulation, a: i64, b: i64) -> f64 {
    let a = sim.node(NodeId(a)).unwrap();
    let b = sim.node(NodeId(b)).unwrap();
    (a.x - b.x).hypot(a.y - b.y)
}

fn path_links(ids: &[NodeId]) -> Vec<Link> {
    ids.windows(2).map(|w| Link::new(w[0], w[1])).collect()
}

/// Every linked pair sits within `tolerance * target` of the rest length.
fn assert_link_lengths(sim: &Simulation, links: &[Link], target: f64, tolerance: f64) {
    for link in links {
        let d = distance(sim, link.source.0, link.target.0);
        assert!(
            (d - target).abs() <= target * tolerance,
            "link {}-{} is {} long, expected about {}",
            link.source,
            link.target,
            d,
            target
        );
    }
}

fn min_pair_distance(sim: &Simulation) -> f64 {
    let nodes: Vec<_> = sim.nodes().iter().collect();
    let mut min = f64::INFINITY;
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            min = min.min((a.x - b.x).hypot(a.y - b.y));
        }
    }
    min
}

fn run_until_converged(sim: &mut Simulation, max_ticks: usize) -> usize {
    for tick in 1..=max_ticks {
        if sim.tick().converged {
            return tick;
        }
    }
    max_ticks
}

// ============================================================================
// Convergence
// ============================================================================

#[test]
fn test_path_graph_settles() {
    let mut sim = simulation_with(5, &SimulationConfig::default());
    let ids = node_ids(5);
    let links = path_links(&ids);

    sim.set_force("link", LinkForce::new(ids.clone(), links.clone(), 30.0).unwrap())
        .unwrap()
        .set_force("charge", ManyBodyForce::new(ids.clone(), -30.0).unwrap())
        .unwrap()
        .set_force("center", CenterForce::new(ids, 0.0, 0.0).unwrap())
        .unwrap();

    let ticks = run_until_converged(&mut sim, 400);
    assert!(ticks < 400, "did not converge in 400 ticks");
    assert!(sim.is_converged());

    let last = sim.tick();
    assert!(last.displacement < 0.1, "still moving: {}", last.displacement);
    assert!(sim.nodes().iter().all(|n| n.x.is_finite() && n.y.is_finite()));
    assert_link_lengths(&sim, &links, 30.0, 0.5);
}

#[test]
fn test_path_graph_with_collision_keeps_radius_apart() {
    let mut sim = simulation_with(5, &SimulationConfig::default());
    let ids = node_ids(5);
    let links = path_links(&ids);

    sim.set_force("link", LinkForce::new(ids.clone(), links.clone(), 30.0).unwrap())
        .unwrap()
        .set_force("charge", ManyBodyForce::new(ids.clone(), -30.0).unwrap())
        .unwrap()
        .set_force("collide", CollideForce::new(ids.clone(), 12.0).unwrap())
        .unwrap()
        .set_force("center", CenterForce::new(ids, 0.0, 0.0).unwrap())
        .unwrap();

    for _ in 0..400 {
        sim.tick();
    }

    let min = min_pair_distance(&sim);
    assert!(min >= 24.0 - 0.5, "closest pair only {} apart", min);
    assert_link_lengths(&sim, &links, 30.0, 0.5);
}

#[test]
fn test_alpha_reaches_min_in_about_300_ticks() {
    let mut sim = simulation_with(3, &SimulationConfig::default());
    let ticks = run_until_converged(&mut sim, 400);
    assert!((295..=305).contains(&ticks), "converged after {} ticks", ticks);
}

// ============================================================================
// Individual force behaviour in a running simulation
// ============================================================================

#[test]
fn test_center_and_collide_keep_centroid_and_remove_overlap() {
    let config = SimulationConfig {
        initial_radius: 1.0,
        ..Default::default()
    };
    let mut sim = simulation_with(20, &config);
    let ids = node_ids(20);
    sim.set_force("center", CenterForce::new(ids.clone(), 50.0, -20.0).unwrap())
        .unwrap()
        .set_force("collide", CollideForce::new(ids, 5.0).unwrap())
        .unwrap();

    for _ in 0..300 {
        sim.tick();
    }

    let (cx, cy) = centroid(&sim);
    assert!((cx - 50.0).abs() < 1e-6 && (cy + 20.0).abs() < 1e-6);

    let min = min_pair_distance(&sim);
    assert!(min >= 10.0 - 1.0, "closest pair only {} apart", min);
}

#[test]
fn test_charge_spreads_nodes() {
    let mut sim = simulation_with(10, &SimulationConfig::default());
    let spread = |sim: &Simulation| {
        let (cx, cy) = centroid(sim);
        sim.nodes().iter().map(|n| (n.x - cx).hypot(n.y - cy)).sum::<f64>()
    };
    let before = spread(&sim);

    sim.set_force("charge", ManyBodyForce::new(node_ids(10), -30.0).unwrap())
        .unwrap();
    for _ in 0..100 {
        sim.tick();
    }
    assert!(spread(&sim) > before * 1.5);
}

#[test]
fn test_two_linked_nodes_rest_at_link_distance() {
    let config = SimulationConfig {
        alpha_min: 0.005,
        ..Default::default()
    };
    let mut sim = simulation_with(2, &config);
    let ids = node_ids(2);
    sim.set_force(
        "link",
        LinkForce::new(ids.clone(), [Link::new(NodeId(1), NodeId(2))], 100.0).unwrap(),
    )
    .unwrap()
    .set_force("center", CenterForce::new(ids, 0.0, 0.0).unwrap())
    .unwrap();

    run_until_converged(&mut sim, 1000);
    assert!(sim.is_converged());

    assert!((distance(&sim, 1, 2) - 100.0).abs() < 1.0);
    let (mx, my) = centroid(&sim);
    assert!(mx.abs() < 1e-6 && my.abs() < 1e-6);
}

// ============================================================================
// Registration and determinism
// ============================================================================

#[test]
fn test_reregistering_force_is_idempotent() {
    let build = |times: usize| {
        let mut sim = simulation_with(6, &SimulationConfig::default());
        let ids = node_ids(6);
        for _ in 0..times {
            sim.set_force("charge", ManyBodyForce::new(ids.clone(), -50.0).unwrap())
                .unwrap();
        }
        sim.set_force("center", CenterForce::new(ids, 0.0, 0.0).unwrap())
            .unwrap();
        for _ in 0..50 {
            sim.tick();
        }
        sim
    };

    let once = build(1);
    let thrice = build(3);
    assert_eq!(thrice.force_names(), vec!["charge", "center"]);
    assert_eq!(once.nodes().as_slice(), thrice.nodes().as_slice());
}

#[test]
fn test_removed_force_stops_acting_and_can_return() {
    let ids = node_ids(4);
    let center_only = || {
        let mut sim = simulation_with(4, &SimulationConfig::default());
        sim.set_force("center", CenterForce::new(node_ids(4), 0.0, 0.0).unwrap())
            .unwrap();
        sim
    };

    let mut plain = center_only();
    let mut sim = center_only();
    sim.set_force("charge", ManyBodyForce::new(ids.clone(), -50.0).unwrap())
        .unwrap();
    assert!(sim.remove_force("charge").is_some());
    assert!(sim.remove_force("charge").is_none());
    assert_eq!(sim.force_names(), vec!["center"]);

    for _ in 0..10 {
        plain.tick();
        sim.tick();
    }
    assert_eq!(sim.nodes().as_slice(), plain.nodes().as_slice());

    sim.set_force("charge", ManyBodyForce::new(ids, -50.0).unwrap())
        .unwrap();
    assert_eq!(sim.force_names(), vec!["center", "charge"]);
    plain.tick();
    sim.tick();
    assert_ne!(sim.nodes().as_slice(), plain.nodes().as_slice());
}

#[test]
fn test_same_seed_same_layout() {
    let run = || {
        let mut sim = simulation_with(8, &SimulationConfig::default());
        let ids = node_ids(8);
        let links = [Link::new(NodeId(1), NodeId(2)), Link::new(NodeId(2), NodeId(3))];
        sim.set_force("link", LinkForce::new(ids.clone(), links, 40.0).unwrap())
            .unwrap()
            .set_force("collide", CollideForce::new(ids, 8.0).unwrap())
            .unwrap();
        for _ in 0..120 {
            sim.tick();
        }
        sim.nodes().as_slice().to_vec()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_duplicate_batch_adds_nothing() {
    let mut sim = simulation_with(3, &SimulationConfig::default());
    let batch = [NodeId(4), NodeId(5), NodeId(2)].map(InputNode::new);

    assert_eq!(
        sim.add_nodes(batch).unwrap_err(),
        LayoutError::DuplicateNode(NodeId(2))
    );
    assert_eq!(sim.nodes().len(), 3);
    assert!(!sim.nodes().contains(NodeId(4)));
}

#[test]
fn test_force_over_unregistered_node_fails() {
    let mut sim = simulation_with(2, &SimulationConfig::default());
    let err = sim
        .set_force("center", CenterForce::new([NodeId(1), NodeId(3)], 0.0, 0.0).unwrap())
        .unwrap_err();
    assert_eq!(err, LayoutError::UnknownNode(NodeId(3)));
    assert!(sim.force("center").is_none());
}
