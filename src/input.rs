use crate::config::ROTATION_SENSITIVITY_FACTOR;
use std::cell::Cell;
use std::rc::Rc;

/// Yaw accumulator shared between gesture handling and the render loop.
///
/// Single-threaded by construction (`Rc<Cell<_>>` is `!Send`); a renderer on
/// another thread would need an atomic or a lock here instead. The value is
/// never wrapped or clamped.
#[derive(Clone, Debug, Default)]
pub struct RotationState(Rc<Cell<f64>>);

impl RotationState {
    pub fn yaw(&self) -> f64 {
        self.0.get()
    }

    pub fn add(&self, delta: f64) {
        self.0.set(self.0.get() + delta);
    }
}

/// Maps horizontal drag motion to yaw. No pitch, inertia or clamping.
pub struct GestureMapper {
    rotation: RotationState,
    sensitivity: f64,
    dragging: bool,
}

impl GestureMapper {
    pub fn new(rotation: RotationState) -> Self {
        Self {
            rotation,
            sensitivity: ROTATION_SENSITIVITY_FACTOR,
            dragging: false,
        }
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Pointer moved by `dx` pixels since the previous sample.
    pub fn on_move(&mut self, dx: f64) {
        if self.dragging {
            self.rotation.add(dx * self.sensitivity);
        }
    }
}
