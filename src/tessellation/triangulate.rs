use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{Result, TessellationError};
use crate::geometry::{Area, Ring};
use crate::math::Vect;

use super::TriangleMesh;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Triangulates the region enclosed by an area.
///
/// Every ring is inserted as a closed constraint loop; triangles are kept
/// where an odd number of constraints separates them from the unbounded
/// face. Triangles are wound counter-clockwise.
///
/// # Errors
///
/// Returns `TessellationError::Failed` if a vertex cannot be inserted or a
/// ring edge crosses another ring edge.
#[allow(clippy::cast_possible_truncation)]
pub fn triangulate_area(area: &Area) -> Result<TriangleMesh> {
    let mut cdt = Cdt::new();
    for ring in area.rings() {
        insert_constraint_loop(&mut cdt, ring)?;
    }

    let interior_faces = classify_interior_faces(&cdt);

    let mut mesh = TriangleMesh::default();
    let mut vertex_map: HashMap<usize, u32> = HashMap::new();

    for face_handle in cdt.inner_faces() {
        if !interior_faces.contains(&face_handle.fix().index()) {
            continue;
        }
        let mut triangle = [0u32; 3];
        for (slot, vh) in triangle.iter_mut().zip(face_handle.vertices()) {
            let idx = vh.fix().index();
            *slot = match vertex_map.get(&idx) {
                Some(&existing) => existing,
                None => {
                    let pos = vh.position();
                    let new_idx = mesh.vertices.len() as u32;
                    mesh.vertices.push(Vect::raw(pos.x, pos.y));
                    vertex_map.insert(idx, new_idx);
                    new_idx
                }
            };
        }
        mesh.indices.push(triangle);
    }

    Ok(mesh)
}

/// Inserts a ring as constraint edges.
fn insert_constraint_loop(cdt: &mut Cdt, ring: &Ring) -> Result<()> {
    let mut handles = Vec::with_capacity(ring.len());
    for p in ring.vertices() {
        let h = cdt
            .insert(SpadePoint2::new(p.x(), p.y()))
            .map_err(|e: InsertionError| TessellationError::Failed(format!("CDT insert: {e}")))?;
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(TessellationError::Failed(format!(
                "ring edge {i} crosses an existing constraint"
            ))
            .into());
        }
        cdt.add_constraint(from, to);
    }

    Ok(())
}

/// Flood-fills the inner faces from the hull, counting constraint edges
/// crossed. Faces at odd depth are interior.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer_fix {
            continue;
        }
        if let Some(inner) = edge.rev().face().as_inner() {
            let idx = inner.fix().index();
            if depth_map.contains_key(&idx) {
                continue;
            }
            let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(idx, depth);
            if depth % 2 == 1 {
                interior.insert(idx);
            }
            queue.push_back((inner.fix(), depth));
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let n_idx = neighbor.fix().index();
            if depth_map.contains_key(&n_idx) {
                continue;
            }
            let new_depth = depth + u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(n_idx, new_depth);
            if new_depth % 2 == 1 {
                interior.insert(n_idx);
            }
            queue.push_back((neighbor.fix(), new_depth));
        }
    }

    interior
}
