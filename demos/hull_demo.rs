use druse::{hull_boundary_2d, hull_simplices, samples};

fn main() {
    let n: usize = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(8);
    // Build a snapshot of a regular polygon's hull and validate it.
    let mut mesh = samples::ngon_hull_2d(n).unwrap();
    mesh.check().unwrap();
    // Walk the boundary ring.
    let boundary = hull_boundary_2d(&mut mesh).unwrap();
    println!("boundary of the {n}-gon: {boundary:?}");
    // Extract the simplex tables.
    let arrays = hull_simplices(&mesh).unwrap();
    println!(
        "{} simplices over {} points",
        arrays.simplices.nrows(),
        mesh.num_points()
    );
    for k in 0..arrays.simplices.nrows() {
        let verts: Vec<i32> = arrays.simplices.row(k).iter().copied().collect();
        let nbrs: Vec<i32> = arrays.neighbors.row(k).iter().copied().collect();
        let eq: Vec<f64> = arrays.equations.row(k).iter().copied().collect();
        println!("simplex {k:>2}: vertices {verts:?} neighbors {nbrs:?} plane {eq:?}");
    }
    // A 3d hull goes through the same tables.
    let tet = samples::tetrahedron_hull_3d().unwrap();
    let arrays = hull_simplices(&tet).unwrap();
    println!(
        "tetrahedron: {} triangles over {} points",
        arrays.simplices.nrows(),
        tet.num_points()
    );
}
