use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Lines,
    LineStrip,
    Points,
    Triangles,
}

/// Which part of a buffer has to be sent to the GPU again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dirty {
    Clean,
    All,
    /// Half-open range of vertex indices
    Range { start: usize, end: usize },
}

impl Dirty {
    fn with_range(self, start: usize, end: usize) -> Dirty {
        match self {
            Dirty::Clean => Dirty::Range { start, end },
            Dirty::All => Dirty::All,
            Dirty::Range { start: s, end: e } => Dirty::Range {
                start: s.min(start),
                end: e.max(end),
            },
        }
    }
}

/// A vertex buffer on the CPU side.
///
/// Buffers start out fully dirty. Replacing the contents dirties everything,
/// since the length may change; writing over existing vertices only dirties
/// the range that was touched, so fixed-size sets (like the draggable points)
/// can be patched in place.
#[derive(Debug, Clone)]
pub struct RenderData<V> {
    vertices: Vec<V>,
    primitive: Primitive,
    /// Line width or point size, depending on the primitive
    pub width: f32,
    dirty: Dirty,
}

impl<V: Clone> RenderData<V> {
    pub fn new(primitive: Primitive, vertices: Vec<V>) -> Self {
        RenderData {
            vertices,
            primitive,
            width: 1.0,
            dirty: Dirty::All,
        }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    pub fn dirty(&self) -> Dirty {
        self.dirty
    }

    pub fn replace(&mut self, vertices: Vec<V>) {
        self.vertices = vertices;
        self.dirty = Dirty::All;
    }

    /// Overwrites the vertices starting at `start`. Panics if that would run
    /// past the end of the buffer; use `replace` to resize.
    pub fn update_range(&mut self, start: usize, vertices: &[V]) {
        let end = start + vertices.len();
        assert!(
            end <= self.vertices.len(),
            "update of {}..{} out of bounds for {} vertices",
            start,
            end,
            self.vertices.len()
        );
        if vertices.is_empty() {
            return;
        }
        self.vertices[start..end].clone_from_slice(vertices);
        self.dirty = self.dirty.with_range(start, end);
    }

    pub fn set(&mut self, index: usize, vertex: V) {
        self.update_range(index, std::slice::from_ref(&vertex));
    }

    /// Returns what needs uploading and marks the buffer clean.
    pub fn take_dirty(&mut self) -> Dirty {
        std::mem::replace(&mut self.dirty, Dirty::Clean)
    }

    /// The buffer as a list of line segments. Strips are expanded into
    /// consecutive pairs; other primitives give nothing.
    pub fn segments(&self) -> Vec<(&V, &V)> {
        match self.primitive {
            Primitive::Lines => self.vertices.iter().tuples().collect(),
            Primitive::LineStrip => self.vertices.iter().tuple_windows().collect(),
            Primitive::Points | Primitive::Triangles => vec![],
        }
    }
}
