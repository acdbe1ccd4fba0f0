//! Scoped Assignment

use super::vertex::*;
use transport_core::pbrt::*;

/// Identifies one of the two subpaths of a bidirectional path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PathEnd {
    /// The subpath starting on a light.
    Light,

    /// The subpath starting on the camera.
    Camera,
}

/// Previous value of an overwritten vertex or vertex field.
enum Snapshot<'scene> {
    Vertex(Vertex<'scene>),
    Delta(bool),
    PdfRev(Float),
}

/// Temporarily overwrites vertices and vertex fields of a pair of subpaths.
/// Every overwrite records the previous value and all of them are restored
/// in reverse order when the guard is dropped.
///
/// The lifetime specifiers:
/// * `'a`     - Mutable borrow of the subpaths for the duration of the guard.
/// * `'scene` - Lifetime of the scene references held by the vertices.
pub struct ScopedAssignment<'a, 'scene> {
    /// Light subpath.
    light_vertices: &'a mut [Vertex<'scene>],

    /// Camera subpath.
    camera_vertices: &'a mut [Vertex<'scene>],

    /// Snapshots in the order they were taken.
    snapshots: Vec<(PathEnd, usize, Snapshot<'scene>)>,
}

impl<'a, 'scene> ScopedAssignment<'a, 'scene> {
    /// Create a guard that has not overwritten anything yet.
    ///
    /// * `light_vertices`  - Light subpath.
    /// * `camera_vertices` - Camera subpath.
    pub fn new(light_vertices: &'a mut [Vertex<'scene>], camera_vertices: &'a mut [Vertex<'scene>]) -> Self {
        Self {
            light_vertices,
            camera_vertices,
            snapshots: Vec::with_capacity(8),
        }
    }

    /// Returns the current light subpath.
    pub fn light(&self) -> &[Vertex<'scene>] {
        self.light_vertices
    }

    /// Returns the current camera subpath.
    pub fn camera(&self) -> &[Vertex<'scene>] {
        self.camera_vertices
    }

    /// Returns the current vertex at an index of a subpath.
    ///
    /// * `end`   - The subpath.
    /// * `index` - Vertex index.
    pub fn vertex(&self, end: PathEnd, index: usize) -> &Vertex<'scene> {
        match end {
            PathEnd::Light => &self.light_vertices[index],
            PathEnd::Camera => &self.camera_vertices[index],
        }
    }

    fn vertex_mut(&mut self, end: PathEnd, index: usize) -> &mut Vertex<'scene> {
        match end {
            PathEnd::Light => &mut self.light_vertices[index],
            PathEnd::Camera => &mut self.camera_vertices[index],
        }
    }

    /// Replaces a whole vertex.
    ///
    /// * `end`    - The subpath.
    /// * `index`  - Vertex index.
    /// * `vertex` - The new vertex.
    pub fn assign_vertex(&mut self, end: PathEnd, index: usize, vertex: Vertex<'scene>) {
        let old = std::mem::replace(self.vertex_mut(end, index), vertex);
        self.snapshots.push((end, index, Snapshot::Vertex(old)));
    }

    /// Overwrites the `delta` flag of a vertex.
    ///
    /// * `end`   - The subpath.
    /// * `index` - Vertex index.
    /// * `delta` - The new value.
    pub fn assign_delta(&mut self, end: PathEnd, index: usize, delta: bool) {
        let old = std::mem::replace(&mut self.vertex_mut(end, index).delta, delta);
        self.snapshots.push((end, index, Snapshot::Delta(old)));
    }

    /// Overwrites the reverse density of a vertex.
    ///
    /// * `end`     - The subpath.
    /// * `index`   - Vertex index.
    /// * `pdf_rev` - The new value.
    pub fn assign_pdf_rev(&mut self, end: PathEnd, index: usize, pdf_rev: Float) {
        let old = std::mem::replace(&mut self.vertex_mut(end, index).pdf_rev, pdf_rev);
        self.snapshots.push((end, index, Snapshot::PdfRev(old)));
    }
}

impl<'a, 'scene> Drop for ScopedAssignment<'a, 'scene> {
    fn drop(&mut self) {
        while let Some((end, index, snapshot)) = self.snapshots.pop() {
            let vertex = self.vertex_mut(end, index);
            match snapshot {
                Snapshot::Vertex(v) => *vertex = v,
                Snapshot::Delta(delta) => vertex.delta = delta,
                Snapshot::PdfRev(pdf_rev) => vertex.pdf_rev = pdf_rev,
            }
        }
    }
}
