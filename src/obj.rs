//! Loading point clouds from Wavefront OBJ files. Only vertex positions are
//! read; faces and attributes are skipped because extraction input is a raw
//! site cloud.

use std::path::Path;

use crate::error::Error;

/// Read the vertex positions of every model in an OBJ file as one flat
/// coordinate buffer, three coordinates per point.
pub fn load_obj_points(path: &Path) -> Result<Vec<f64>, Error> {
    match path.extension() {
        Some(ext) if ext == "obj" => {}
        _ => return Err(Error::InvalidObjFile(path.to_path_buf())),
    }
    let options = tobj::LoadOptions::default();
    let (models, _) =
        tobj::load_obj(path, &options).map_err(|e| Error::ObjLoadFailed(format!("{}", e)))?;
    let mut coords = Vec::new();
    for model in models {
        let positions = &model.mesh.positions;
        if positions.len() % 3 != 0 {
            return Err(Error::IncorrectNumberOfCoordinates(positions.len()));
        }
        coords.extend_from_slice(positions);
    }
    Ok(coords)
}
