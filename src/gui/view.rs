use kiss3d::camera::Camera;
use kiss3d::light::Light;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Point2, Point3, Vector3};

use super::camera::{FlyCamera, Projection};
use super::controller::Controller;
use super::renderers::CompoundRenderer;
use crate::model::orrery::{Body, BodyID, Orrery};
use crate::render::Outline;

// Radius of the sphere mesh before the body's scale is applied
const BODY_MESH_RADIUS: f32 = 1.0;

pub struct View {
    // Object state
    orrery: Orrery,
    time: f32,
    body_nodes: Vec<(BodyID, SceneNode)>,
    // Camera
    camera: FlyCamera,
    // Misc
    renderer: CompoundRenderer,
    show_outlines: bool,
    show_orbits: bool,
}

impl View {
    pub fn new(orrery: Orrery, window: &mut Window, show_outlines: bool) -> Self {
        let camera = FlyCamera::new(
            Point3::new(0.0, 20.0, 60.0),
            window.width(),
            window.height(),
        );

        // Create objects for bodies
        let body_nodes = orrery
            .bodies()
            .map(|body| (body.id, Self::create_body_object(window, body)))
            .collect();

        let mut view = Self {
            orrery,
            time: 0.0,
            body_nodes,
            camera,
            renderer: CompoundRenderer::new(),
            show_outlines,
            show_orbits: false,
        };
        view.update_state_by(0.0);
        view
    }

    fn create_body_object(window: &mut Window, body: &Body) -> SceneNode {
        let mut node = match &body.info.model {
            Some(path) if path.exists() => {
                let mtl_dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
                window.add_obj(path, mtl_dir, Vector3::new(1.0, 1.0, 1.0))
            }
            Some(path) => {
                log::warn!(
                    "Model {} for {} not found, using a sphere",
                    path.display(),
                    body.info.name
                );
                window.add_sphere(BODY_MESH_RADIUS)
            }
            None => window.add_sphere(BODY_MESH_RADIUS),
        };
        let color = &body.info.color;
        node.set_color(color.x, color.y, color.z);
        node
    }

    pub fn update_state_by(&mut self, timestep: f32) {
        // Update the orrery, then move scene objects to the right places
        self.time += timestep;
        if let Err(e) = self.orrery.update(self.time) {
            log::error!("Failed to update bodies: {}", e);
            return;
        }
        self.update_scene_objects();
    }

    pub fn toggle_clockwise(&mut self) {
        let clockwise = !self.orrery.is_clockwise();
        self.orrery.set_clockwise(clockwise);
        log::info!(
            "Bodies now turn {}",
            if clockwise { "clockwise" } else { "counter-clockwise" }
        );
    }

    pub fn toggle_outlines(&mut self) {
        self.show_outlines = !self.show_outlines;
    }

    pub fn toggle_orbits(&mut self) {
        self.show_orbits = !self.show_orbits;
    }

    fn update_scene_objects(&mut self) {
        for (id, node) in self.body_nodes.iter_mut() {
            let pose = self.orrery.pose(*id);
            node.set_local_transformation(pose.isometry);
            node.set_local_scale(pose.scale, pose.scale, pose.scale);
        }
    }

    // the big boy
    pub fn prerender_scene(&mut self, window: &mut Window, controller: &Controller) {
        // kiss3d has a single light, so the first star gets it
        if let Some(star) = self.orrery.light_sources().next() {
            window.set_light(Light::Absolute(star.position()));
        }

        self.draw_outlines();
        if self.show_orbits {
            self.draw_orbits();
        }

        // Draw text
        let default_font = kiss3d::text::Font::default();
        let text_color = Point3::new(1.0, 1.0, 1.0);
        window.draw_text(
            &self.left_hand_text(),
            &Point2::origin(),
            60.0,
            &default_font,
            &text_color,
        );
        window.draw_text(
            &self.time_summary_text(controller),
            // no idea why i have to multiply by 2.0, but there it is
            &Point2::new(window.width() as f32 * 2.0 - 600.0, 0.0),
            60.0,
            &default_font,
            &text_color,
        );
    }

    fn draw_outlines(&mut self) {
        for body in self.orrery.bodies() {
            let outline = match body.info.outline {
                Some(color) if self.show_outlines => Some(Outline::new(color)),
                _ => None,
            };
            self.renderer.draw_body_outline(
                BODY_MESH_RADIUS,
                &body.pose().model_matrix(),
                outline.as_ref(),
            );
        }
    }

    fn draw_orbits(&mut self) {
        self.renderer.draw_axes(5.0);
        for body in self.orrery.bodies() {
            if body.motion.orbit_radius <= 0.0 {
                continue;
            }
            let center = match body.parent_id() {
                Some(parent) => self.orrery.position(parent),
                None => Point3::origin(),
            };

            let color = Point3::from(body.info.color.coords * 0.5);
            self.renderer.draw_orbit(
                center,
                &body.motion.orbit_axis,
                body.motion.orbit_radius,
                color,
            );
        }
    }

    fn left_hand_text(&self) -> String {
        let position = self.camera.position();
        format!(
            "Camera: ({:.1}, {:.1}, {:.1})
    Speed: {:.1}
    Sensitivity: {:.3}
    FOV: {:.0}
    Projection: {}
Bodies: {}",
            position.x,
            position.y,
            position.z,
            self.camera.speed(),
            self.camera.sensitivity(),
            self.camera.fov(),
            match self.camera.projection_mode() {
                Projection::Perspective => "perspective",
                Projection::Orthographic => "orthographic",
            },
            self.orrery.num_bodies(),
        )
    }

    fn time_summary_text(&self, controller: &Controller) -> String {
        format!(
            "Time: {:.1} s{}
Time scale: {}x
Direction: {}
FPS: {:.0}",
            self.time,
            if controller.is_paused() { " (paused)" } else { "" },
            controller.time_scale(),
            if self.orrery.is_clockwise() {
                "clockwise"
            } else {
                "counter-clockwise"
            },
            controller.fps(),
        )
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }
}
