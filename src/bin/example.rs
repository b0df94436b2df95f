//! Frame Adapter Example - Simple Portal Frame

use frame_adapter::prelude::*;

fn main() -> anyhow::Result<()> {
    println!("=== Frame Adapter Example: Portal Frame ===\n");

    // Create a new model
    let mut model = FrameModel::new();

    // Create a simple portal frame
    //
    //     3 -------- 4
    //     |          |
    //     |          |
    //     1          2
    //     ^          ^
    //   Fixed     Fixed
    //
    let height = 4.0; // 4m column height
    let span = 6.0; // 6m beam span

    model.add_node(1, Node::new(0.0, 0.0))?;
    model.add_node(2, Node::new(span, 0.0))?;
    model.add_node(3, Node::new(0.0, height))?;
    model.add_node(4, Node::new(span, height))?;

    model.fix(1, Fixity::fixed())?;
    model.fix(2, Fixity::fixed())?;

    // W12x26, approximately: A = 0.00494 m², Iz = 8.49e-5 m⁴
    let (a, e, iz) = (0.00494, 200e9, 8.49e-5);

    model.add_geom_transf(1, GeomTransf::Linear)?;
    model.add_element(1, ElasticBeamColumn::new([1, 3], a, e, iz, 1))?; // left column
    model.add_element(2, ElasticBeamColumn::new([2, 4], a, e, iz, 1))?; // right column
    model.add_element(3, ElasticBeamColumn::new([3, 4], a, e, iz, 1))?; // beam

    // Gravity from 20 kN/m on the beam lumped to its ends, plus a 10 kN sway load
    model.add_time_series(1, TimeSeries::linear())?;
    model.add_pattern(1, LoadPattern::plain(1))?;
    model.add_nodal_load(3, NodalLoad::new(10000.0, -span * 20000.0 / 2.0, 0.0))?;
    model.add_nodal_load(4, NodalLoad::fy(-span * 20000.0 / 2.0))?;

    let restrained: usize = model
        .node_ids()
        .filter_map(|id| model.node(id))
        .map(|node| node.fixity.num_restrained())
        .sum();

    println!("Model Summary:");
    println!("  Nodes: {}", model.num_nodes());
    println!("  Elements: {}", model.num_elements());
    println!("  Restrained DOFs: {}", restrained);

    let summary = model.analyze(&SolutionPolicy::linear_static())?;
    println!("  Equations: {}", summary.num_equations);
    println!("  Half-bandwidth: {}", summary.half_bandwidth);

    println!("\n--- Node Displacements ---");
    for id in model.node_ids() {
        let disp = model.node_displacement(id)?;
        println!(
            "  Node {}: DX = {:>10.4} mm, DY = {:>10.4} mm, RZ = {:>10.6} rad",
            id,
            disp.dx * 1000.0,
            disp.dy * 1000.0,
            disp.rz
        );
    }

    let (max_node, max_disp) = model
        .node_ids()
        .filter_map(|id| Some((id, model.node_displacement(id).ok()?.translation_magnitude())))
        .fold((0, 0.0), |best, (id, d)| if d > best.1 { (id, d) } else { best });
    println!("  Max translation: {:.4} mm at node {}", max_disp * 1000.0, max_node);

    println!("\n--- Element End Forces (local) ---");
    for id in model.element_ids() {
        let f = model.element_forces(id)?;
        println!(
            "  Element {}: N = {:>8.2} kN, V_i = {:>8.2} kN, M_i = {:>8.2} kN·m, M_j = {:>8.2} kN·m",
            id,
            f.axial() / 1000.0,
            f.v_i / 1000.0,
            f.m_i / 1000.0,
            f.m_j / 1000.0
        );
    }

    println!("\n=== Analysis Complete ===");
    Ok(())
}
