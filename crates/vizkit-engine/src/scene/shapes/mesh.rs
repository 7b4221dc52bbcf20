use bytemuck::{Pod, Zeroable};

use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Pre-projected, per-vertex colored vertex in logical pixels.
///
/// `color` is linear premultiplied RGBA.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

/// Indexed triangle list drawn in index order.
///
/// There is no depth buffer: callers sort triangles back to front before
/// recording them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshCmd {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshCmd {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.len() < 3
    }

    /// Appends one triangle, returning its first index.
    pub fn push_triangle(&mut self, a: MeshVertex, b: MeshVertex, c: MeshVertex) -> u32 {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[a, b, c]);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
        base
    }
}

impl DrawList {
    /// Records a mesh. Meshes with fewer than one triangle are dropped.
    #[inline]
    pub fn push_mesh(&mut self, z: ZIndex, mesh: MeshCmd) {
        if mesh.is_empty() {
            return;
        }
        self.push(z, DrawCmd::Mesh(mesh));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> MeshVertex {
        MeshVertex { pos: [x, y], color: [1.0; 4] }
    }

    #[test]
    fn push_triangle_appends_sequential_indices() {
        let mut m = MeshCmd::default();
        m.push_triangle(v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0));
        let base = m.push_triangle(v(2.0, 0.0), v(3.0, 0.0), v(2.0, 1.0));
        assert_eq!(base, 3);
        assert_eq!(m.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn empty_mesh_is_not_recorded() {
        let mut dl = DrawList::new();
        dl.push_mesh(ZIndex::new(0), MeshCmd::default());
        assert!(dl.items().is_empty());
    }
}
