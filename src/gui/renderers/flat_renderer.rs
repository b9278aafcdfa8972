use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, ShaderAttribute, ShaderUniform,
};

use nalgebra::{Matrix4, Point3};

use crate::model::meshes::ColoredVertex;
use crate::render::{Dirty, Primitive, RenderData};

struct Layer {
    // Stored as (pt, color, pt, color, ...)
    gpu_data: GPUVec<Point3<f32>>,
    primitive: Primitive,
    width: f32,
    // Layer space to pixels
    model: Matrix4<f32>,
    visible: bool,
}

// Draws 2D colored vertices in pixel space, ignoring the kiss3d camera. Each
// layer mirrors one `RenderData`, and only re-uploads what it reports dirty.
pub struct FlatRenderer {
    // OpenGL stuff
    shader: Effect,
    pos: ShaderAttribute<Point3<f32>>,
    color: ShaderAttribute<Point3<f32>>,
    model: ShaderUniform<Matrix4<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    point_size: ShaderUniform<f32>,
    projection: Matrix4<f32>,
    // Data storage
    layers: Vec<Layer>,
}

fn interleave(vertex: &ColoredVertex) -> [Point3<f32>; 2] {
    [
        Point3::new(vertex.position.x, vertex.position.y, 0.0),
        vertex.color,
    ]
}

// Strips go up as separate segments, so every layer can be drawn as a plain
// primitive.
fn gpu_vertices(data: &RenderData<ColoredVertex>) -> Vec<Point3<f32>> {
    match data.primitive() {
        Primitive::LineStrip => data
            .segments()
            .into_iter()
            .flat_map(|(a, b)| {
                let [a_pos, a_color] = interleave(a);
                let [b_pos, b_color] = interleave(b);
                vec![a_pos, a_color, b_pos, b_color]
            })
            .collect(),
        _ => data.vertices().iter().flat_map(interleave).collect(),
    }
}

impl FlatRenderer {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        FlatRenderer {
            pos: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            color: shader
                .get_attrib::<Point3<f32>>("color")
                .expect("Failed to get shader attribute."),
            model: shader
                .get_uniform::<Matrix4<f32>>("model")
                .expect("Failed to get shader uniform."),
            proj: shader
                .get_uniform::<Matrix4<f32>>("proj")
                .expect("Failed to get shader uniform."),
            point_size: shader
                .get_uniform::<f32>("size")
                .expect("Failed to get shader uniform."),
            shader,
            projection: Matrix4::identity(),
            layers: vec![],
        }
    }

    /// Adds a layer and returns its slot.
    pub fn add_layer(&mut self, data: &mut RenderData<ColoredVertex>) -> usize {
        data.take_dirty();
        let layer = Layer {
            gpu_data: GPUVec::new(
                gpu_vertices(data),
                BufferType::Array,
                AllocationType::StreamDraw,
            ),
            primitive: data.primitive(),
            width: data.width,
            model: Matrix4::identity(),
            visible: true,
        };
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// Brings a layer up to date with its `RenderData`.
    pub fn sync_layer(&mut self, slot: usize, data: &mut RenderData<ColoredVertex>) {
        let layer = &mut self.layers[slot];
        layer.width = data.width;

        match data.take_dirty() {
            Dirty::Clean => {}
            Dirty::Range { start, end } if data.primitive() != Primitive::LineStrip => {
                // Same length, so patch the buffer in place
                if let Some(buffer) = layer.gpu_data.data_mut() {
                    for (i, vertex) in data.vertices()[start..end].iter().enumerate() {
                        let [pos, color] = interleave(vertex);
                        buffer[2 * (start + i)] = pos;
                        buffer[2 * (start + i) + 1] = color;
                    }
                }
            }
            Dirty::All | Dirty::Range { .. } => {
                layer.gpu_data = GPUVec::new(
                    gpu_vertices(data),
                    BufferType::Array,
                    AllocationType::StreamDraw,
                );
            }
        }
    }

    pub fn set_model(&mut self, slot: usize, model: Matrix4<f32>) {
        self.layers[slot].model = model;
    }

    pub fn set_visible(&mut self, slot: usize, visible: bool) {
        self.layers[slot].visible = visible;
    }

    pub fn set_projection(&mut self, projection: Matrix4<f32>) {
        self.projection = projection;
    }
}

impl Renderer for FlatRenderer {
    fn render(&mut self, _pass: usize, _camera: &mut dyn Camera) {
        if self.layers.is_empty() {
            return;
        }

        self.shader.use_program();
        self.pos.enable();
        self.color.enable();
        self.proj.upload(&self.projection);

        let ctxt = Context::get();
        for layer in self.layers.iter_mut() {
            if !layer.visible || layer.gpu_data.len() == 0 {
                continue;
            }

            self.pos.bind_sub_buffer(&mut layer.gpu_data, 1, 0);
            self.color.bind_sub_buffer(&mut layer.gpu_data, 1, 1);
            self.model.upload(&layer.model);
            self.point_size.upload(&layer.width);

            let mode = match layer.primitive {
                Primitive::Lines | Primitive::LineStrip => Context::LINES,
                Primitive::Points => Context::POINTS,
                Primitive::Triangles => Context::TRIANGLES,
            };
            ctxt.line_width(layer.width);
            ctxt.point_size(layer.width);
            ctxt.draw_arrays(mode, 0, (layer.gpu_data.len() / 2) as i32);
        }

        self.pos.disable();
        self.color.disable();
    }
}

/// Vertex shader used by the material to display colored 2D primitives.
static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec3 color;
    varying   vec3 vColor;
    uniform   mat4 model;
    uniform   mat4 proj;
    uniform   float size;
    void main() {
        gl_Position = proj * model * vec4(position, 1.0);
        gl_PointSize = size;
        vColor = color;
    }";

/// Fragment shader used by the material to display colored 2D primitives.
static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    varying vec3 vColor;
    void main() {
        gl_FragColor = vec4(vColor, 1.0);
    }";
