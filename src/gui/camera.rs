use std::time::Instant;

use kiss3d::camera::Camera;
use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Orthographic3, Perspective3, Point3, Vector2, Vector3};

const KEYS_FORWARD: [Key; 2] = [Key::W, Key::Up];
const KEYS_BACKWARD: [Key; 2] = [Key::S, Key::Down];
const KEYS_LEFT: [Key; 2] = [Key::A, Key::Left];
const KEYS_RIGHT: [Key; 2] = [Key::D, Key::Right];
const KEYS_BOOST: [Key; 2] = [Key::LShift, Key::RShift];
const KEY_RISE: Key = Key::Space;
const KEY_SINK: Key = Key::LControl;
const KEY_SPEED_UP: Key = Key::Equals;
const KEY_SLOW_DOWN: Key = Key::Minus;
const KEY_RESET_SPEED: Key = Key::Key0;
const KEY_LESS_SENSITIVE: Key = Key::LBracket;
const KEY_MORE_SENSITIVE: Key = Key::RBracket;
const KEY_RESET_SENSITIVITY: Key = Key::Backslash;
const KEY_RESET_FOV: Key = Key::Z;
const KEY_PERSPECTIVE: Key = Key::P;
const KEY_ORTHOGRAPHIC: Key = Key::O;

const DEFAULT_SPEED: f32 = 5.0;
const MAX_SPEED: f32 = 30.0;
const DEFAULT_SENSITIVITY: f32 = 0.1;
const DEFAULT_FOV: f32 = 45.0;
const MIN_FOV: f32 = 1.0;
const MAX_FOV: f32 = 45.0;
const MAX_PITCH: f32 = 89.999;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 300.0;
// The orthographic view is fov / ORTHO_DIVISOR units wide on each side
const ORTHO_DIVISOR: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    Orthographic,
}

/// Movement requested for one frame. Each axis is -1, 0 or 1.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MoveInput {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
    pub boost: bool,
}

// A free-flying camera. Unlike ArcBall it isn't tied to a target: WASD moves
// it along where it's looking, Space/Ctrl move it along the world's up axis,
// and dragging with the right mouse button turns it. Scrolling narrows the
// field of view rather than moving the camera. Angles are kept in degrees.
pub struct FlyCamera {
    // -- position --
    position: Point3<f32>,
    yaw: f32,
    pitch: f32,
    // -- projection --
    width: u32,
    height: u32,
    fov: f32,
    projection: Projection,
    // -- other --
    last_cursor_pos: Vector2<f32>,
    last_update: Option<Instant>,
    // -- knobs to fiddle with --
    speed: f32,
    sensitivity: f32,
}

impl FlyCamera {
    pub fn new(position: Point3<f32>, width: u32, height: u32) -> Self {
        let mut camera = FlyCamera {
            position,
            yaw: -90.0,
            pitch: 0.0,
            width,
            height,
            fov: DEFAULT_FOV,
            projection: Projection::Perspective,
            last_cursor_pos: Vector2::zeros(),
            last_update: None,
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
        };
        camera.look_at(&Point3::origin());
        camera
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn projection_mode(&self) -> Projection {
        self.projection
    }

    pub fn front(&self) -> Vector3<f32> {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    pub fn right(&self) -> Vector3<f32> {
        self.front().cross(&Vector3::y()).normalize()
    }

    /// Moves the camera for `dt` seconds of held keys. Boosting doubles the
    /// distance covered.
    pub fn fly(&mut self, input: &MoveInput, dt: f32) {
        let mut velocity = self.speed * dt;
        if input.boost {
            velocity *= 2.0;
        }
        let step = self.front() * input.forward + self.right() * input.right + Vector3::y() * input.up;
        self.position += step * velocity;
    }

    /// Turns the camera by a cursor offset in pixels. Moving the cursor up
    /// makes the camera look up.
    pub fn turn(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = nalgebra::clamp(self.pitch - dy * self.sensitivity, -MAX_PITCH, MAX_PITCH);
    }

    pub fn look_at(&mut self, target: &Point3<f32>) {
        let to_target = target - self.position;
        if to_target.norm() < f32::EPSILON {
            return;
        }
        let dir = to_target.normalize();
        self.yaw = dir.z.atan2(dir.x).to_degrees();
        self.pitch = nalgebra::clamp(dir.y.asin().to_degrees(), -MAX_PITCH, MAX_PITCH);
    }

    pub fn zoom(&mut self, offset: f32) {
        self.fov = nalgebra::clamp(self.fov - offset, MIN_FOV, MAX_FOV);
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    fn adjust_speed(&mut self, delta: f32) {
        self.speed = nalgebra::clamp(self.speed + delta, 0.0, MAX_SPEED);
    }

    fn adjust_sensitivity(&mut self, delta: f32) {
        self.sensitivity = nalgebra::clamp(self.sensitivity + delta, 0.0, 1.0);
    }

    fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        match self.projection {
            Projection::Perspective => {
                Perspective3::new(self.aspect(), self.fov.to_radians(), Z_NEAR, Z_FAR).into_inner()
            }
            Projection::Orthographic => {
                let half_width = self.fov / ORTHO_DIVISOR;
                let half_height = half_width / self.aspect();
                Orthographic3::new(-half_width, half_width, -half_height, half_height, Z_NEAR, Z_FAR)
                    .into_inner()
            }
        }
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    fn held_keys(canvas: &Canvas) -> MoveInput {
        let held = |keys: &[Key]| keys.iter().any(|k| canvas.get_key(*k) == Action::Press);
        let axis = |plus: bool, minus: bool| (plus as i32 - minus as i32) as f32;
        MoveInput {
            forward: axis(held(&KEYS_FORWARD), held(&KEYS_BACKWARD)),
            right: axis(held(&KEYS_RIGHT), held(&KEYS_LEFT)),
            up: axis(held(&[KEY_RISE]), held(&[KEY_SINK])),
            boost: held(&KEYS_BOOST),
        }
    }
}

impl Camera for FlyCamera {
    fn handle_event(&mut self, canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let curr_pos = Vector2::new(x as f32, y as f32);
                if canvas.get_mouse_button(MouseButton::Button2) == Action::Press {
                    let dpos = curr_pos - self.last_cursor_pos;
                    self.turn(dpos.x, dpos.y);
                }
                self.last_cursor_pos = curr_pos;
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Press, _) => {
                self.look_at(&Point3::origin());
            }
            WindowEvent::Scroll(_, off, _) => self.zoom(off as f32),
            WindowEvent::FramebufferSize(w, h) => {
                self.width = w;
                self.height = h;
            }
            WindowEvent::Key(KEY_RESET_FOV, Action::Press, _) => self.fov = DEFAULT_FOV,
            WindowEvent::Key(KEY_RESET_SPEED, Action::Press, _) => self.speed = DEFAULT_SPEED,
            WindowEvent::Key(KEY_RESET_SENSITIVITY, Action::Press, _) => {
                self.sensitivity = DEFAULT_SENSITIVITY
            }
            WindowEvent::Key(KEY_PERSPECTIVE, Action::Press, _) => {
                self.set_projection(Projection::Perspective)
            }
            WindowEvent::Key(KEY_ORTHOGRAPHIC, Action::Press, _) => {
                self.set_projection(Projection::Orthographic)
            }
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        self.position
    }

    fn view_transform(&self) -> Isometry3<f32> {
        let target = self.position + self.front();
        Isometry3::look_at_rh(&self.position, &target, &Vector3::y())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (Z_NEAR, Z_FAR)
    }

    fn update(&mut self, canvas: &Canvas) {
        let now = Instant::now();
        let dt = match self.last_update.replace(now) {
            Some(prev) => now.duration_since(prev).as_secs_f32(),
            None => 0.0,
        };

        self.fly(&Self::held_keys(canvas), dt);

        // Held knobs change at a steady rate, not per frame
        let pressed = |k: Key| canvas.get_key(k) == Action::Press;
        if pressed(KEY_SPEED_UP) {
            self.adjust_speed(6.0 * dt);
        }
        if pressed(KEY_SLOW_DOWN) {
            self.adjust_speed(-6.0 * dt);
        }
        if pressed(KEY_MORE_SENSITIVE) {
            self.adjust_sensitivity(0.012 * dt);
        }
        if pressed(KEY_LESS_SENSITIVE) {
            self.adjust_sensitivity(-0.012 * dt);
        }
    }

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}
