use std::{env, fs, process};

use sociograph::{engine::Engine, parse::SAMPLE};

const STEPS: usize = 400;

fn main() {
    // Analyse the file given as first argument, or the built-in sample network.
    let text = match env::args().nth(1) {
        Some(path) => fs::read_to_string(&path).unwrap_or_else(|e| {
            eprintln!("failed to read {path}: {e}");
            process::exit(1);
        }),
        None => SAMPLE.to_owned(),
    };

    let mut engine = Engine::new();

    let Some(snapshot) = engine.ingest(&text) else {
        eprintln!("no valid relationships found, expected `Source,Target` lines");
        process::exit(1);
    };

    println!(
        "\n{} nodes, {} edges, density {:.1}%",
        snapshot.node_count,
        snapshot.edge_count,
        snapshot.density * 100.0
    );

    println!("\nTop by degree:");
    for (id, degree) in &snapshot.top_by_degree {
        println!("  {id:<16} {degree}");
    }

    println!("\nTop by betweenness:");
    for (id, score) in &snapshot.top_by_betweenness {
        println!("  {id:<16} {score:.1}");
    }

    println!("\nCommunities ({}):", snapshot.communities.len());
    for (i, members) in snapshot.communities.iter().enumerate() {
        println!("  {}: {}", i + 1, members.join(", "));
    }

    // Simulate a visualization showing the graph for a few hundred frames.
    engine.show_graph();
    for _ in 0..STEPS {
        engine.step();
    }

    println!("\nPositions after {STEPS} steps:");
    for node in engine.layout().nodes() {
        println!(
            "  {:<16} ({:>6.1}, {:>6.1}) r={} {}",
            node.id,
            node.x(),
            node.y(),
            node.radius,
            node.color_hex()
        );
    }
}
