use glam::Vec2;

/// Pointer position relative to the surface, and whether it is over it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub active: bool,
}

impl PointerState {
    /// Non-finite coordinates are dropped so they never reach particle state.
    pub fn moved(&mut self, position: Vec2) {
        if !position.is_finite() {
            return;
        }
        self.position = position;
        self.active = true;
    }

    pub fn left(&mut self) {
        self.active = false;
    }
}
