use sha2::{Digest, Sha256};

use crate::GeometryError;

/// RGBA color, one per vertex.
pub type Color = [f32; 4];

/// How a buffer's vertices are assembled into triangles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indexing {
    /// Implicit index sequence `0..vertex_count` (non-indexed triangle soup).
    Sequential,
    /// Explicit triangle list by index.
    Indexed(Vec<u32>),
}

/// An immutable vertex/color/index buffer.
///
/// The only way to obtain one is [`GeometryBuffer::new`], which validates the
/// buffer before it can ever be bound to a node. There are no mutators: a
/// buffer is replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuffer {
    positions: Vec<[f32; 3]>,
    colors: Vec<Color>,
    indexing: Indexing,
}

impl GeometryBuffer {
    /// Finalize a buffer from its parts.
    ///
    /// Fails with [`GeometryError::SizeMismatch`] when the color and position
    /// counts differ, [`GeometryError::IndexOutOfRange`] when an index does not
    /// address a vertex, and [`GeometryError::IncompleteTriangle`] when the draw
    /// count does not describe whole triangles.
    pub fn new(
        positions: Vec<[f32; 3]>,
        colors: Vec<Color>,
        indexing: Indexing,
    ) -> Result<Self, GeometryError> {
        if positions.len() != colors.len() {
            return Err(GeometryError::SizeMismatch {
                positions: positions.len(),
                colors: colors.len(),
            });
        }
        let draw_count = match &indexing {
            Indexing::Sequential => positions.len(),
            Indexing::Indexed(indices) => {
                if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
                    return Err(GeometryError::IndexOutOfRange {
                        index,
                        vertex_count: positions.len(),
                    });
                }
                indices.len()
            }
        };
        if draw_count % 3 != 0 {
            return Err(GeometryError::IncompleteTriangle { count: draw_count });
        }
        Ok(Self {
            positions,
            colors,
            indexing,
        })
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn indexing(&self) -> &Indexing {
        &self.indexing
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of indices the renderer draws (implicit or explicit).
    pub fn draw_count(&self) -> usize {
        match &self.indexing {
            Indexing::Sequential => self.positions.len(),
            Indexing::Indexed(indices) => indices.len(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.draw_count() / 3
    }

    /// The index sequence the renderer walks, materialized for sequential buffers.
    pub fn index_sequence(&self) -> Vec<u32> {
        match &self.indexing {
            Indexing::Sequential => (0..self.positions.len() as u32).collect(),
            Indexing::Indexed(indices) => indices.clone(),
        }
    }

    /// Raw position bytes, ready for a vertex buffer upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Raw index bytes; `None` for sequential buffers, which are drawn by count.
    pub fn index_bytes(&self) -> Option<&[u8]> {
        match &self.indexing {
            Indexing::Sequential => None,
            Indexing::Indexed(indices) => Some(bytemuck::cast_slice(indices)),
        }
    }

    /// Content hash over positions, colors and indices.
    ///
    /// Two buffers generated from the same inputs and seed share a fingerprint.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update((self.positions.len() as u64).to_le_bytes());
        hasher.update(self.position_bytes());
        hasher.update(self.color_bytes());
        match self.index_bytes() {
            Some(bytes) => hasher.update(bytes),
            None => hasher.update(b"sequential"),
        }
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        u64::from_le_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = [1.0, 1.0, 1.0, 1.0];

    #[test]
    fn mismatched_colors_rejected() {
        let err = GeometryBuffer::new(vec![[0.0; 3]; 24], vec![WHITE; 20], Indexing::Sequential)
            .unwrap_err();
        assert!(matches!(
            err,
            GeometryError::SizeMismatch {
                positions: 24,
                colors: 20
            }
        ));
    }

    #[test]
    fn out_of_range_index_rejected() {
        let err = GeometryBuffer::new(
            vec![[0.0; 3]; 3],
            vec![WHITE; 3],
            Indexing::Indexed(vec![0, 1, 3]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GeometryError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            }
        ));
    }

    #[test]
    fn partial_triangle_rejected() {
        let err = GeometryBuffer::new(vec![[0.0; 3]; 4], vec![WHITE; 4], Indexing::Sequential)
            .unwrap_err();
        assert!(matches!(err, GeometryError::IncompleteTriangle { count: 4 }));
    }

    #[test]
    fn sequential_index_sequence() {
        let buffer =
            GeometryBuffer::new(vec![[0.0; 3]; 6], vec![WHITE; 6], Indexing::Sequential).unwrap();
        assert_eq!(buffer.index_sequence(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(buffer.triangle_count(), 2);
        assert!(buffer.index_bytes().is_none());
        assert_eq!(buffer.position_bytes().len(), 6 * 3 * 4);
        assert_eq!(buffer.color_bytes().len(), 6 * 4 * 4);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = GeometryBuffer::new(vec![[0.0; 3]; 3], vec![WHITE; 3], Indexing::Sequential)
            .unwrap();
        let b = a.clone();
        let c = GeometryBuffer::new(
            vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![WHITE; 3],
            Indexing::Sequential,
        )
        .unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
