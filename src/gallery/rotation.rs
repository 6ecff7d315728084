//! Ring rotation state machine
//!
//! `Idle -> Rotating` on a navigation request, `Rotating -> Idle` once the
//! tween has run its full duration. The caption is hidden when a rotation
//! starts and the target artwork's caption is committed when it ends.
//! Requests that arrive while rotating are ignored.

use std::time::Duration;

use super::collection::Collection;
use super::display::DisplayState;
use super::scene::Ring;
use super::tween::{Easing, Tween};

/// Rotation state.
#[derive(Debug, Clone, Default)]
pub enum RotationState {
    #[default]
    Idle,
    Rotating {
        /// Panel whose caption is shown on completion
        target_index: usize,
        tween: Tween,
    },
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationRequest {
    Started,
    /// A rotation was already in flight
    Ignored,
}

/// Emitted by [`RotationController::tick`] when a rotation lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationCompleted {
    pub index: usize,
}

/// Sole owner of ring rotation.
#[derive(Debug, Clone)]
pub struct RotationController {
    state: RotationState,
    duration: Duration,
    easing: Easing,
}

impl RotationController {
    pub fn new(duration: Duration) -> Self {
        Self {
            state: RotationState::Idle,
            duration,
            easing: Easing::QuadraticInOut,
        }
    }

    pub fn state(&self) -> &RotationState {
        &self.state
    }

    pub fn is_rotating(&self) -> bool {
        matches!(self.state, RotationState::Rotating { .. })
    }

    /// Start rotating one panel in `direction` (-1 or +1), landing on `target_index`.
    pub fn request(
        &mut self,
        direction: i32,
        target_index: usize,
        ring: &Ring,
        display: &mut DisplayState,
    ) -> RotationRequest {
        if self.is_rotating() {
            log::debug!("Rotation in progress, ignoring request for panel {}", target_index);
            return RotationRequest::Ignored;
        }

        let from = ring.angle();
        let to = from + direction.signum() as f32 * ring.step();
        log::debug!(
            "Rotating ring {:.3} -> {:.3} rad towards panel {}",
            from,
            to,
            target_index
        );

        self.state = RotationState::Rotating {
            target_index,
            tween: Tween::new(from, to, self.duration, self.easing),
        };
        display.hide();
        RotationRequest::Started
    }

    /// Advance the active rotation by `dt`.
    pub fn tick(
        &mut self,
        dt: Duration,
        ring: &mut Ring,
        collection: &Collection,
        display: &mut DisplayState,
    ) -> Option<RotationCompleted> {
        let RotationState::Rotating {
            target_index,
            tween,
        } = &mut self.state
        else {
            return None;
        };

        tween.advance(dt);
        ring.set_angle(tween.value());

        if !tween.is_finished() {
            return None;
        }

        let index = *target_index;
        if let Some(entry) = collection.get(index) {
            display.commit(entry);
        }
        self.state = RotationState::Idle;
        Some(RotationCompleted { index })
    }
}

impl Default for RotationController {
    fn default() -> Self {
        Self::new(crate::config::ROTATION_DURATION)
    }
}
