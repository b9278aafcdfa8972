use std::time::Instant;

use kiss3d::event::{Action, Event, Key, WindowEvent};

use super::view::View;

// Key config, all in one place
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_REWIND: Key = Key::R;
const KEY_TOGGLE_PAUSE: Key = Key::Return;
const KEY_TOGGLE_CLOCKWISE: Key = Key::C;
const KEY_TOGGLE_OUTLINES: Key = Key::K;
const KEY_TOGGLE_ORBITS: Key = Key::L;

pub struct Controller {
    time_scale: f32,
    paused: bool,
    last_frame: Instant,
    fps_counter: FpsCounter,
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: usize,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window_size_millis: usize) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            previous_fps: 0.0,
            window_size_millis,
        }
    }

    pub fn reset(&mut self) {
        self.instant = Instant::now();
        self.counter = 0;
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    pub fn increment(&mut self) {
        self.counter += 1;

        let elapsed = self.instant.elapsed();
        if elapsed.as_millis() > self.window_size_millis as u128 {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed.as_millis() as f64;
            self.reset();
        }
    }
}

impl Controller {
    pub fn new(time_scale: f32) -> Self {
        Controller {
            time_scale,
            paused: false,
            last_frame: Instant::now(),
            fps_counter: FpsCounter::new(1000),
        }
    }

    pub fn process_event(&mut self, event: Event, view: &mut View) {
        match event.value {
            WindowEvent::Key(KEY_SPEED_UP, Action::Press, _) => {
                self.time_scale *= 2.0;
                log::info!("Time scale is {}x", self.time_scale);
            }
            WindowEvent::Key(KEY_SLOW_DOWN, Action::Press, _) => {
                self.time_scale /= 2.0;
                log::info!("Time scale is {}x", self.time_scale);
            }
            WindowEvent::Key(KEY_REWIND, Action::Press, _) => {
                self.time_scale *= -1.0;
                self.paused = false;
            }
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                self.paused = !self.paused;
            }
            WindowEvent::Key(KEY_TOGGLE_CLOCKWISE, Action::Press, _) => {
                view.toggle_clockwise();
            }
            WindowEvent::Key(KEY_TOGGLE_OUTLINES, Action::Press, _) => {
                view.toggle_outlines();
            }
            WindowEvent::Key(KEY_TOGGLE_ORBITS, Action::Press, _) => {
                view.toggle_orbits();
            }
            _ => {}
        }
    }

    /// Simulated seconds that passed since the last call. Zero while paused,
    /// negative when rewinding.
    pub fn advance(&mut self) -> f32 {
        let now = Instant::now();
        let real = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if self.paused {
            0.0
        } else {
            real * self.time_scale
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn fps(&self) -> f64 {
        self.fps_counter.value()
    }

    pub fn increment_frame_counter(&mut self) {
        self.fps_counter.increment()
    }
}
