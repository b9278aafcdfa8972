use kiss3d::camera::Camera;
use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};
use nalgebra::{Point2, Point3};

use super::renderers::FlatRenderer;
use crate::input::interaction::{InteractionState, PointerEvent, Response};
use crate::input::view::ViewTransform;
use crate::model::meshes::{axes_vertices, grid_vertices, trochoid_vertices, ColoredVertex};
use crate::model::sandbox::SandboxScene;
use crate::render::{Primitive, RenderData};

const KEY_ROTATE_LEFT: Key = Key::Left;
const KEY_ROTATE_RIGHT: Key = Key::Right;
const KEY_WIDEN: Key = Key::Q;
const KEY_NARROW: Key = Key::A;
const KEY_TALLEN: Key = Key::W;
const KEY_SHORTEN: Key = Key::S;
const KEY_MIRROR: Key = Key::M;
const KEY_RADIUS_UP: Key = Key::R;
const KEY_RADIUS_DOWN: Key = Key::F;
const KEY_DISTANCE_UP: Key = Key::H;
const KEY_DISTANCE_DOWN: Key = Key::G;
const KEY_LONGER: Key = Key::T;
const KEY_SHORTER: Key = Key::Y;
const KEY_FINER: Key = Key::Comma;
const KEY_COARSER: Key = Key::Period;
const KEY_GRID_UP: Key = Key::Equals;
const KEY_GRID_DOWN: Key = Key::Minus;
const KEY_RESET: Key = Key::Back;

const ANGLE_STEP: f32 = 5.0;
const SCALE_STEP: f32 = 0.1;
const TROCHOID_STEP: f32 = 0.1;

// Bounds for everything the keys can change
const SCALE_RANGE: (f32, f32) = (0.1, 10.0);
const RADIUS_RANGE: (f32, f32) = (0.1, 10.0);
const DISTANCE_RANGE: (f32, f32) = (0.0, 10.0);
const T_MAX_RANGE: (f32, f32) = (1.0, 100.0);
const DT_RANGE: (f32, f32) = (0.001, 0.1);
const GRID_RANGE: (usize, usize) = (2, 50);

// The parameter panel in the top-left corner; the pointer belongs to it
// while it's inside
const PANEL_SIZE: (f64, f64) = (520.0, 400.0);

fn grid_color() -> Point3<f32> {
    Point3::new(0.8, 0.8, 0.8)
}

fn trochoid_color() -> Point3<f32> {
    Point3::new(0.1, 0.3, 0.9)
}

struct Layers {
    grid: RenderData<ColoredVertex>,
    axes: RenderData<ColoredVertex>,
    trochoid: RenderData<ColoredVertex>,
    points: RenderData<ColoredVertex>,
}

struct Slots {
    grid: usize,
    axes: usize,
    trochoid: usize,
    points: usize,
}

fn clamp_parameters(scene: &mut SandboxScene) {
    let within = |x: f32, (lo, hi): (f32, f32)| nalgebra::clamp(x, lo, hi);

    let scale = &mut scene.figure.scale;
    scale.x = within(scale.x, SCALE_RANGE);
    scale.y = within(scale.y, SCALE_RANGE);

    let trochoid = &mut scene.trochoid;
    trochoid.r = within(trochoid.r, RADIUS_RANGE);
    trochoid.h = within(trochoid.h, DISTANCE_RANGE);
    trochoid.t_max = within(trochoid.t_max, T_MAX_RANGE);
    trochoid.dt = within(trochoid.dt, DT_RANGE);

    scene.grid_size = nalgebra::clamp(scene.grid_size, GRID_RANGE.0, GRID_RANGE.1);
}

/// The affine sandbox: a trochoid on a grid, placed by draggable points.
pub struct Sandbox {
    scene: SandboxScene,
    view: ViewTransform,
    input: InteractionState,
    layers: Layers,
    slots: Slots,
    renderer: FlatRenderer,
}

impl Layers {
    fn new(scene: &SandboxScene) -> Self {
        Layers {
            grid: RenderData::new(Primitive::Lines, grid_vertices(scene.grid_size, grid_color())),
            axes: RenderData::new(
                Primitive::Lines,
                axes_vertices(
                    scene.grid_size,
                    Point3::new(0.9, 0.3, 0.3),
                    Point3::new(0.3, 0.7, 0.3),
                ),
            )
            .with_width(2.0),
            trochoid: RenderData::new(
                Primitive::LineStrip,
                trochoid_vertices(&scene.trochoid, trochoid_color()),
            )
            .with_width(2.0),
            points: RenderData::new(Primitive::Points, scene.point_vertices()).with_width(10.0),
        }
    }
}

impl Sandbox {
    pub fn new(window: &mut Window) -> Self {
        let scene = SandboxScene::default();
        let mut view = ViewTransform::default();
        view.resize(window.width(), window.height());

        let mut layers = Layers::new(&scene);
        let mut renderer = FlatRenderer::new();
        let slots = Slots {
            grid: renderer.add_layer(&mut layers.grid),
            axes: renderer.add_layer(&mut layers.axes),
            trochoid: renderer.add_layer(&mut layers.trochoid),
            points: renderer.add_layer(&mut layers.points),
        };

        Sandbox {
            scene,
            view,
            input: InteractionState::default(),
            layers,
            slots,
            renderer,
        }
    }

    fn handle_event(&mut self, event: &WindowEvent) {
        let pointer_event = match *event {
            WindowEvent::CursorPos(x, y, _) => {
                self.input.ui_captures_pointer = x < PANEL_SIZE.0 && y < PANEL_SIZE.1;
                PointerEvent::Moved(Point2::new(x as f32, y as f32))
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Press, _) => {
                PointerEvent::PrimaryPressed
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Release, _) => {
                PointerEvent::PrimaryReleased
            }
            WindowEvent::MouseButton(MouseButton::Button2, Action::Press, _) => {
                PointerEvent::SecondaryPressed
            }
            WindowEvent::MouseButton(MouseButton::Button2, Action::Release, _) => {
                PointerEvent::SecondaryReleased
            }
            WindowEvent::Scroll(_, off, _) => PointerEvent::Scrolled(off as f32),
            WindowEvent::FramebufferSize(w, h) => {
                self.view.resize(w, h);
                return;
            }
            WindowEvent::Key(key, Action::Press, _) => {
                self.handle_key(key);
                return;
            }
            _ => return,
        };

        match self.input.handle(pointer_event, &mut self.scene, &mut self.view) {
            Response::PointMoved(_) => self.refresh_points(),
            Response::DragStarted(_)
            | Response::DragEnded
            | Response::ViewChanged
            | Response::Nothing => {}
        }
    }

    fn handle_key(&mut self, key: Key) {
        let figure = &mut self.scene.figure;
        let trochoid = &mut self.scene.trochoid;
        match key {
            KEY_ROTATE_LEFT => figure.angle_degrees += ANGLE_STEP,
            KEY_ROTATE_RIGHT => figure.angle_degrees -= ANGLE_STEP,
            KEY_WIDEN => figure.scale.x += SCALE_STEP,
            KEY_NARROW => figure.scale.x -= SCALE_STEP,
            KEY_TALLEN => figure.scale.y += SCALE_STEP,
            KEY_SHORTEN => figure.scale.y -= SCALE_STEP,
            KEY_MIRROR => figure.mirrored = !figure.mirrored,
            KEY_RADIUS_UP => trochoid.r += TROCHOID_STEP,
            KEY_RADIUS_DOWN => trochoid.r -= TROCHOID_STEP,
            KEY_DISTANCE_UP => trochoid.h += TROCHOID_STEP,
            KEY_DISTANCE_DOWN => trochoid.h -= TROCHOID_STEP,
            KEY_LONGER => trochoid.t_max += 1.0,
            KEY_SHORTER => trochoid.t_max -= 1.0,
            KEY_FINER => trochoid.dt /= 2.0,
            KEY_COARSER => trochoid.dt *= 2.0,
            KEY_GRID_UP => self.scene.grid_size += 1,
            KEY_GRID_DOWN => self.scene.grid_size = self.scene.grid_size.saturating_sub(1),
            KEY_RESET => self.scene = SandboxScene::default(),
            _ => return,
        }

        clamp_parameters(&mut self.scene);
        self.scene.figure.sync_visible();
        self.refresh_points();
        self.layers
            .trochoid
            .replace(trochoid_vertices(&self.scene.trochoid, trochoid_color()));

        if self.layers.grid.len() != (self.scene.grid_size + 1) * 4 {
            let n = self.scene.grid_size;
            self.layers.grid.replace(grid_vertices(n, grid_color()));
            self.layers.axes.replace(axes_vertices(
                n,
                Point3::new(0.9, 0.3, 0.3),
                Point3::new(0.3, 0.7, 0.3),
            ));
        }
    }

    // Only rewrites the points that actually moved
    fn refresh_points(&mut self) {
        for i in 0..self.scene.points().len() {
            let vertex = self.scene.point_vertex(i);
            if self.layers.points.vertices()[i] != vertex {
                self.layers.points.set(i, vertex);
            }
        }
    }

    fn sync_renderer(&mut self) {
        let grid_to_pixels = self.view.forward(None);
        let basis = self.scene.basis.matrix();
        let figure_to_pixels = self.view.forward(Some(&basis)) * self.scene.figure.model_matrix();

        let renderer = &mut self.renderer;
        renderer.set_projection(self.view.projection());
        renderer.set_model(self.slots.grid, grid_to_pixels);
        renderer.set_model(self.slots.axes, grid_to_pixels);
        renderer.set_model(self.slots.points, grid_to_pixels);
        renderer.set_model(self.slots.trochoid, figure_to_pixels);
        // Nothing sensible to draw through a collapsed basis
        renderer.set_visible(self.slots.trochoid, !self.scene.basis.is_degenerate());

        renderer.sync_layer(self.slots.grid, &mut self.layers.grid);
        renderer.sync_layer(self.slots.axes, &mut self.layers.axes);
        renderer.sync_layer(self.slots.trochoid, &mut self.layers.trochoid);
        renderer.sync_layer(self.slots.points, &mut self.layers.points);
    }

    fn panel_text(&self) -> String {
        let figure = &self.scene.figure;
        let trochoid = &self.scene.trochoid;
        let mut text = format!(
            "Angle: {:.0} deg (Left/Right)
Scale: {:.1} x {:.1} (Q/A, W/S)
Mirrored: {} (M)
r = {:.1} (R/F), h = {:.1} (H/G)
t max = {:.0} (T/Y), dt = {} (,/.)
Grid: {} (+/-)",
            figure.angle_degrees,
            figure.scale.x,
            figure.scale.y,
            figure.mirrored,
            trochoid.r,
            trochoid.h,
            trochoid.t_max,
            trochoid.dt,
            self.scene.grid_size,
        );
        for point in self.scene.points() {
            let value = self.scene.point(point.target);
            text.push_str(&format!(
                "\n{}: ({:.2}, {:.2})",
                point.target.label(),
                value.x,
                value.y
            ));
        }
        if self.scene.basis.is_degenerate() {
            text.push_str("\nBasis is degenerate!");
        }
        text
    }
}

impl State for Sandbox {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (None, None, Some(&mut self.renderer), None)
    }

    fn step(&mut self, window: &mut Window) {
        for event in window.events().iter() {
            self.handle_event(&event.value);
        }
        self.sync_renderer();

        let default_font = kiss3d::text::Font::default();
        window.draw_text(
            &self.panel_text(),
            &Point2::origin(),
            50.0,
            &default_font,
            &Point3::new(0.1, 0.1, 0.1),
        );
    }
}
