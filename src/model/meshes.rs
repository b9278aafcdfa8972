//! Vertex generators for the things the viewers draw.
//!
//! Everything here is pure: parameters in, vertices out. Line sets come out as
//! pairs of endpoints, curves as consecutive points, and solids as triangle
//! soups (three vertices per triangle, no index buffer).

use std::f32::consts::TAU;

use nalgebra::{Point2, Point3};

/// A 2D vertex with a per-vertex color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredVertex {
    pub position: Point2<f32>,
    pub color: Point3<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrochoidParams {
    /// Radius of the rolling circle
    pub r: f32,
    /// Distance of the traced point from the circle's center
    pub h: f32,
    pub t_max: f32,
    pub dt: f32,
}

impl Default for TrochoidParams {
    fn default() -> Self {
        TrochoidParams {
            r: 1.0,
            h: 1.0,
            t_max: 25.0,
            dt: 0.01,
        }
    }
}

fn vertex(x: f32, y: f32, color: Point3<f32>) -> ColoredVertex {
    ColoredVertex {
        position: Point2::new(x, y),
        color,
    }
}

/// Unit-spaced grid lines over [0, n] x [0, n], without the axes.
pub fn grid_vertices(n: usize, color: Point3<f32>) -> Vec<ColoredVertex> {
    let len = n as f32;
    let mut verts = Vec::with_capacity((n + 1) * 4);
    for i in 0..=n {
        let c = i as f32;
        // horizontal
        verts.push(vertex(0.0, c, color));
        verts.push(vertex(len, c, color));
        // vertical
        verts.push(vertex(c, 0.0, color));
        verts.push(vertex(c, len, color));
    }
    verts
}

pub fn axes_vertices(n: usize, x_color: Point3<f32>, y_color: Point3<f32>) -> Vec<ColoredVertex> {
    let len = n as f32;
    vec![
        vertex(0.0, 0.0, x_color),
        vertex(len, 0.0, x_color),
        vertex(0.0, 0.0, y_color),
        vertex(0.0, len, y_color),
    ]
}

/// Samples x = r t - h sin t, y = r - h cos t for t in [0, t_max].
/// Returns nothing if the step isn't positive.
pub fn trochoid_vertices(params: &TrochoidParams, color: Point3<f32>) -> Vec<ColoredVertex> {
    if !(params.dt > 0.0) || params.t_max < 0.0 {
        return vec![];
    }

    // Step by index rather than accumulating dt, so long curves don't drift
    let steps = (params.t_max / params.dt).floor() as usize;
    (0..=steps)
        .map(|i| i as f32 * params.dt)
        .map(|t| {
            let x = params.r * t - params.h * t.sin();
            let y = params.r - params.h * t.cos();
            vertex(x, y, color)
        })
        .collect()
}

/// Triangulated surface y = f(x, z) over [-half_range, half_range]^2, with
/// `resolution` samples along each axis.
pub fn surface_vertices<F>(f: F, half_range: f32, resolution: usize) -> Vec<Point3<f32>>
where
    F: Fn(f32, f32) -> f32,
{
    if resolution < 2 {
        return vec![];
    }

    let cells = resolution - 1;
    let coord = |i: usize| -half_range + (i as f32) / (cells as f32) * 2.0 * half_range;
    let sample = |i: usize, j: usize| {
        let (x, z) = (coord(i), coord(j));
        Point3::new(x, f(x, z), z)
    };

    let mut verts = Vec::with_capacity(cells * cells * 6);
    for i in 0..cells {
        for j in 0..cells {
            let top_left = sample(i, j);
            let top_right = sample(i + 1, j);
            let bottom_left = sample(i, j + 1);
            let bottom_right = sample(i + 1, j + 1);

            verts.extend_from_slice(&[top_left, top_right, bottom_left]);
            verts.extend_from_slice(&[top_right, bottom_left, bottom_right]);
        }
    }
    verts
}

/// The sides of a cone standing on the xz-plane with its apex on +y. The base
/// isn't included.
pub fn cone_vertices(radius: f32, height: f32, slices: usize) -> Vec<Point3<f32>> {
    let rim = |i: usize| {
        let theta = (i as f32) / (slices as f32) * TAU;
        Point3::new(radius * theta.cos(), 0.0, radius * theta.sin())
    };
    let apex = Point3::new(0.0, height, 0.0);

    (0..slices).flat_map(|i| vec![rim(i), rim(i + 1), apex]).collect()
}

/// An axis-aligned cube centered on the origin.
pub fn cube_vertices(edge: f32) -> Vec<Point3<f32>> {
    let s = edge / 2.0;
    // Each face as 4 corners, wound consistently
    let faces: [[[f32; 3]; 4]; 6] = [
        [[-s, -s, -s], [s, -s, -s], [s, s, -s], [-s, s, -s]],
        [[-s, -s, s], [s, -s, s], [s, s, s], [-s, s, s]],
        [[-s, s, s], [-s, s, -s], [-s, -s, -s], [-s, -s, s]],
        [[s, s, s], [s, s, -s], [s, -s, -s], [s, -s, s]],
        [[-s, -s, -s], [s, -s, -s], [s, -s, s], [-s, -s, s]],
        [[-s, s, -s], [s, s, -s], [s, s, s], [-s, s, s]],
    ];

    let mut verts = Vec::with_capacity(36);
    for face in faces.iter() {
        let [a, b, c, d] = *face;
        for corner in [a, b, c, c, d, a].iter() {
            verts.push(Point3::new(corner[0], corner[1], corner[2]));
        }
    }
    verts
}

/// The little bird from the first lab, in normalized device coordinates.
pub struct Figure {
    pub vertices: Vec<Point2<f32>>,
    pub triangles: Vec<[usize; 3]>,
    pub edges: Vec<[usize; 2]>,
}

pub fn bird_figure() -> Figure {
    let vertices: [(f32, f32); 18] = [
        (-0.25, 0.35),   // head
        (-0.10, 0.35),   // head
        (-0.10, 0.50),   // head + neck
        (0.00, 0.40),    // neck
        (0.00, 0.20),    // neck + bottom neck
        (-0.10, 0.30),   // neck + bottom neck
        (-0.20, 0.20),   // bottom neck
        (-0.10, 0.10),   // bottom neck + wing + torso
        (0.10, 0.30),    // wing
        (0.30, 0.10),    // wing
        (0.20, 0.10),    // torso
        (0.20, -0.20),   // torso
        (0.125, -0.125), // leg
        (0.275, -0.275), // leg
        (0.125, -0.425), // leg
        (0.20, -0.35),   // foot
        (0.20, -0.50),   // foot
        (0.05, -0.50),   // foot
    ];

    Figure {
        vertices: vertices.iter().map(|&(x, y)| Point2::new(x, y)).collect(),
        triangles: vec![
            [0, 1, 2],
            [2, 3, 4],
            [4, 5, 2],
            [4, 5, 6],
            [4, 7, 6],
            [7, 8, 9],
            [7, 10, 11],
            [12, 13, 14],
            [15, 16, 17],
        ],
        edges: vec![
            [0, 1],
            [1, 2],
            [2, 0],
            [2, 3],
            [3, 4],
            [4, 5],
            [5, 2],
            [5, 6],
            [6, 7],
            [7, 8],
            [8, 9],
            [9, 7],
            [7, 11],
            [10, 11],
            [12, 13],
            [13, 14],
            [12, 14],
            [15, 16],
            [16, 17],
            [15, 17],
        ],
    }
}
