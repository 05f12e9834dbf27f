//! Lays out a small ring-with-spokes graph and prints the settled positions.
//!
//! Run with: cargo run -p typegraph-layout --example simple_layout

use std::time::Instant;

use typegraph_layout::{
    CenterForce, CollideForce, InputNode, Link, LinkForce, ManyBodyForce, NodeId, Simulation,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let node_count = 40;
    let ids: Vec<NodeId> = (0..node_count).map(NodeId).collect();

    // A ring, plus a spoke from node 0 to every fifth node
    let mut links: Vec<Link> = (0..node_count)
        .map(|i| Link::new(NodeId(i), NodeId((i + 1) % node_count)))
        .collect();
    links.extend((5..node_count).step_by(5).map(|i| Link::new(NodeId(0), NodeId(i))));

    println!("Laying out {} nodes and {} links...", node_count, links.len());

    let mut sim = Simulation::new();
    sim.add_nodes(ids.iter().copied().map(InputNode::new))?;
    sim.set_force("center", CenterForce::new(ids.clone(), 0.0, 0.0)?)?
        .set_force("link", LinkForce::new(ids.clone(), links, 60.0)?)?
        .set_force("charge", ManyBodyForce::new(ids.clone(), -80.0)?)?
        .set_force("collide", CollideForce::new(ids, 10.0)?)?;

    let start = Instant::now();
    loop {
        let stats = sim.tick();
        if stats.iteration % 50 == 0 {
            println!(
                "  tick {:4}: alpha={:.4} displacement={:.3}",
                stats.iteration, stats.alpha, stats.displacement
            );
        }
        if stats.converged {
            break;
        }
    }
    let elapsed = start.elapsed();

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for node in sim.nodes().iter() {
        min_x = min_x.min(node.x);
        min_y = min_y.min(node.y);
        max_x = max_x.max(node.x);
        max_y = max_y.max(node.y);
    }

    println!();
    println!("Converged after {} ticks in {:?}", sim.iteration(), elapsed);
    println!(
        "Bounds: ({:.1}, {:.1}) - ({:.1}, {:.1})",
        min_x, min_y, max_x, max_y
    );
    for node in sim.nodes().iter().take(5) {
        println!("  node {:>2}: ({:8.2}, {:8.2})", node.id, node.x, node.y);
    }

    Ok(())
}
