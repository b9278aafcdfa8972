use nalgebra::{Point2, Vector2};

use super::picking::{pick_point, PICK_RADIUS_PIXELS};
use super::view::ViewTransform;
use crate::model::sandbox::SandboxScene;

/// Scroll zoom per wheel notch.
const ZOOM_STEP: f32 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        index: usize,
        /// Cursor minus point at grab time, in the point's own space
        offset: Vector2<f32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanState {
    Idle,
    Panning { last_cursor: Point2<f32> },
}

/// Pointer events, already stripped of window-system details. Cursor positions
/// are in window pixels with the origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved(Point2<f32>),
    PrimaryPressed,
    PrimaryReleased,
    SecondaryPressed,
    SecondaryReleased,
    Scrolled(f32),
}

/// What an event changed, so the caller knows which buffers to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Nothing,
    DragStarted(usize),
    /// The point at this index moved. Others may have moved along with it
    /// (the figure follows its pivot, and the basis carries the figure).
    PointMoved(usize),
    DragEnded,
    ViewChanged,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    pub cursor: Point2<f32>,
    pub drag: DragState,
    pub pan: PanState,
    /// Set while the pointer is over an overlay that wants the events
    pub ui_captures_pointer: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        InteractionState {
            cursor: Point2::origin(),
            drag: DragState::Idle,
            pan: PanState::Idle,
            ui_captures_pointer: false,
        }
    }
}

impl InteractionState {
    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::Idle
    }

    pub fn is_panning(&self) -> bool {
        self.pan != PanState::Idle
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        scene: &mut SandboxScene,
        view: &mut ViewTransform,
    ) -> Response {
        match event {
            PointerEvent::Moved(cursor) => self.on_move(cursor, scene, view),
            PointerEvent::PrimaryPressed => self.on_primary_press(scene, view),
            PointerEvent::PrimaryReleased => match self.drag {
                DragState::Dragging { .. } => {
                    self.drag = DragState::Idle;
                    Response::DragEnded
                }
                DragState::Idle => Response::Nothing,
            },
            PointerEvent::SecondaryPressed => {
                if self.ui_captures_pointer || self.is_dragging() {
                    return Response::Nothing;
                }
                self.pan = PanState::Panning {
                    last_cursor: self.cursor,
                };
                Response::Nothing
            }
            PointerEvent::SecondaryReleased => {
                self.pan = PanState::Idle;
                Response::Nothing
            }
            PointerEvent::Scrolled(notches) => {
                if self.ui_captures_pointer || notches == 0.0 {
                    return Response::Nothing;
                }
                view.zoom_by(ZOOM_STEP.powf(notches));
                Response::ViewChanged
            }
        }
    }

    fn on_primary_press(&mut self, scene: &SandboxScene, view: &ViewTransform) -> Response {
        if self.ui_captures_pointer || self.is_panning() {
            return Response::Nothing;
        }

        match pick_point(scene, view, &self.cursor, PICK_RADIUS_PIXELS) {
            Some(pick) => {
                let target = scene.points()[pick.index].target;
                let offset = pick.pointer_world - scene.point(target);
                self.drag = DragState::Dragging {
                    index: pick.index,
                    offset,
                };
                log::debug!("Grabbed {} at {:?}", target.label(), scene.point(target));
                Response::DragStarted(pick.index)
            }
            None => Response::Nothing,
        }
    }

    fn on_move(
        &mut self,
        cursor: Point2<f32>,
        scene: &mut SandboxScene,
        view: &mut ViewTransform,
    ) -> Response {
        self.cursor = cursor;

        if let DragState::Dragging { index, offset } = self.drag {
            let point = scene.points()[index];
            let basis = scene.basis.matrix();
            let basis = if point.uses_affine_basis() {
                Some(&basis)
            } else {
                None
            };
            // A degenerate basis freezes the point until it's repaired
            return match view.screen_to_world(&cursor, basis) {
                Some(world) => {
                    scene.set_point(point.target, world - offset);
                    Response::PointMoved(index)
                }
                None => Response::Nothing,
            };
        }

        if let PanState::Panning { last_cursor } = self.pan {
            view.pan_by(&(cursor - last_cursor));
            self.pan = PanState::Panning {
                last_cursor: cursor,
            };
            return Response::ViewChanged;
        }

        Response::Nothing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sandbox::PointTarget;
    use approx::assert_relative_eq;

    fn setup() -> (InteractionState, SandboxScene, ViewTransform) {
        (
            InteractionState::default(),
            SandboxScene::default(),
            ViewTransform::default(),
        )
    }

    #[test]
    fn test_press_on_empty_space() {
        let (mut state, mut scene, mut view) = setup();
        let far = view.world_to_screen(&Point2::new(15.0, 15.0), None);
        state.handle(PointerEvent::Moved(far), &mut scene, &mut view);
        assert_eq!(
            state.handle(PointerEvent::PrimaryPressed, &mut scene, &mut view),
            Response::Nothing
        );
        assert_eq!(state.drag, DragState::Idle);
    }

    #[test]
    fn test_release_ends_drag() {
        let (mut state, mut scene, mut view) = setup();
        let on_x = view.world_to_screen(&Point2::new(1.0, 0.0), None);
        state.handle(PointerEvent::Moved(on_x), &mut scene, &mut view);
        state.handle(PointerEvent::PrimaryPressed, &mut scene, &mut view);
        assert!(state.is_dragging());
        assert_eq!(
            state.handle(PointerEvent::PrimaryReleased, &mut scene, &mut view),
            Response::DragEnded
        );
        assert!(!state.is_dragging());
        assert_eq!(scene.point(PointTarget::BasisX), Point2::new(1.0, 0.0));
    }

    #[test]
    fn test_scroll_zooms() {
        let (mut state, mut scene, mut view) = setup();
        state.handle(PointerEvent::Scrolled(1.0), &mut scene, &mut view);
        assert_relative_eq!(view.pixels_per_unit, 55.0, epsilon = 1e-4);

        state.ui_captures_pointer = true;
        assert_eq!(
            state.handle(PointerEvent::Scrolled(1.0), &mut scene, &mut view),
            Response::Nothing
        );
        assert_relative_eq!(view.pixels_per_unit, 55.0, epsilon = 1e-4);
    }
}
