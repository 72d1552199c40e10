use druse::{delaunay_simplices, samples, voronoi_diagram};

fn main() {
    let n: usize = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(6);
    // A wheel triangulation: a regular polygon's corners and their centroid.
    let mut mesh = samples::wheel_delaunay_2d(n).unwrap();
    mesh.check().unwrap();
    let arrays = delaunay_simplices(&mesh, false).unwrap();
    println!("{} triangles over {} sites", arrays.simplices.nrows(), n + 1);
    // The dual diagram.
    let num_points = mesh.num_points();
    let diagram = voronoi_diagram(&mut mesh, num_points).unwrap();
    println!("voronoi vertices:");
    for k in 0..diagram.vertices.nrows() {
        println!(
            "  {:>2}: ({:.4}, {:.4})",
            k + 1,
            diagram.vertices[(k, 0)],
            diagram.vertices[(k, 1)]
        );
    }
    println!("ridges:");
    for (pair, verts) in diagram
        .ridge_points
        .iter()
        .zip(diagram.ridge_vertices.iter())
    {
        println!("  between sites {pair:?}: vertices {verts:?}");
    }
    println!("regions:");
    for (i, &r) in diagram.point_region.iter().enumerate() {
        if r < 0 {
            println!("  site {}: unmapped", i + 1);
        } else {
            println!("  site {}: {:?}", i + 1, diagram.regions[(r - 1) as usize]);
        }
    }
}
