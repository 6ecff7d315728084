//! Application state shared by the event handlers and the frame update.

use std::time::Duration;

use glam::Vec2;

use super::camera::GalleryCamera;
use super::collection::Collection;
use super::display::DisplayState;
use super::environment::{Mirror, SpotLight};
use super::hotspot::HotspotRole;
use super::picking::{pick_nearest, screen_to_ndc, Ray};
use super::rotation::{RotationCompleted, RotationController, RotationRequest};
use super::scene::{Ring, ShapeId};
use crate::config::{CameraConfig, SceneConfig};

/// Output surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing under the pointer
    Missed,
    /// Hit a shape that is not a hotspot
    NotInteractive(ShapeId),
    /// Hit a hotspot
    Navigated {
        role: HotspotRole,
        target_index: usize,
        request: RotationRequest,
    },
}

/// Everything the viewer mutates at runtime.
pub struct GalleryState {
    pub collection: Collection,
    pub ring: Ring,
    pub camera: GalleryCamera,
    pub light: SpotLight,
    pub mirror: Mirror,
    pub display: DisplayState,
    pub viewport: Viewport,
    rotation: RotationController,
}

impl GalleryState {
    /// Build the scene for `collection` at the given viewport size.
    pub fn new(collection: Collection, width: u32, height: u32) -> Self {
        let viewport = Viewport::new(width, height);
        let ring = Ring::build(&collection, &SceneConfig::default());
        let camera = GalleryCamera::new(&CameraConfig::default(), viewport.aspect());
        let mirror = Mirror::new(viewport.width, viewport.height);
        // Collection is never empty
        let display = collection
            .get(0)
            .map(DisplayState::showing)
            .unwrap_or_else(|| DisplayState {
                title: String::new(),
                artist: String::new(),
                visible: false,
            });

        log::info!(
            "Gallery ready: {} artworks, showing \"{}\" by {}",
            collection.len(),
            display.title,
            display.artist
        );

        Self {
            collection,
            ring,
            camera,
            light: SpotLight::default(),
            mirror,
            display,
            viewport,
            rotation: RotationController::default(),
        }
    }

    pub fn rotation(&self) -> &RotationController {
        &self.rotation
    }

    /// Route a click at a pixel position (origin top-left).
    pub fn click(&mut self, position: Vec2) -> ClickOutcome {
        let ndc = screen_to_ndc(
            position,
            self.viewport.width as f32,
            self.viewport.height as f32,
        );
        let ray = Ray::from_ndc(ndc, self.camera.view_projection_matrix().inverse());

        let Some(hit) = pick_nearest(&self.ring, &ray) else {
            log::debug!("Click at {:?} hit nothing", position);
            return ClickOutcome::Missed;
        };

        let Some(tag) = self.ring.hotspot(hit.shape).copied() else {
            log::debug!("Click hit non-interactive shape {:?}", hit.shape);
            return ClickOutcome::NotInteractive(hit.shape);
        };

        log::info!("{} arrow clicked", tag.role.name());
        let request = self.rotation.request(
            tag.role.direction(),
            tag.target_index,
            &self.ring,
            &mut self.display,
        );

        ClickOutcome::Navigated {
            role: tag.role,
            target_index: tag.target_index,
            request,
        }
    }

    /// Advance animation state by `dt`. Call once per frame before drawing.
    pub fn tick(&mut self, dt: Duration) -> Option<RotationCompleted> {
        let completed = self.rotation.tick(
            dt,
            &mut self.ring,
            &self.collection,
            &mut self.display,
        );
        if let Some(done) = completed {
            log::debug!("Rotation complete, now showing panel {}", done.index);
        }
        completed
    }

    /// Track a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.set_aspect(self.viewport.aspect());
        self.mirror.resize(self.viewport.width, self.viewport.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const WIDTH: u32 = 1280;
    const HEIGHT: u32 = 720;

    fn state() -> GalleryState {
        GalleryState::new(Collection::builtin().unwrap(), WIDTH, HEIGHT)
    }

    /// Screen position of a shape's centre.
    fn screen_pos(state: &GalleryState, id: ShapeId) -> Vec2 {
        let shape = state.ring.shape(id).unwrap();
        let centre = state.ring.shape_transform(shape).transform_point3(Vec3::ZERO);
        state
            .camera
            .world_to_screen(centre, state.viewport.width as f32, state.viewport.height as f32)
    }

    fn finish_rotation(state: &mut GalleryState) {
        for _ in 0..120 {
            state.tick(Duration::from_millis(16));
        }
        assert!(!state.rotation().is_rotating());
    }

    #[test]
    fn test_initial_display() {
        let state = state();
        assert_eq!(state.display.title, "The Death of Socrates");
        assert_eq!(state.display.artist, "Jacques-Louis David");
        assert!(state.display.visible);
        assert_eq!(state.ring.angle(), 0.0);
    }

    #[test]
    fn test_click_next_end_to_end() {
        let mut state = state();
        let next = state.ring.panels()[0].next;
        let pos = screen_pos(&state, next);

        let outcome = state.click(pos);
        assert_eq!(
            outcome,
            ClickOutcome::Navigated {
                role: HotspotRole::Next,
                target_index: 1,
                request: RotationRequest::Started,
            }
        );
        assert!(!state.display.visible);

        state.tick(Duration::from_millis(400));
        assert!(!state.display.visible);
        assert!(state.ring.angle() > 0.0);
        assert!(state.ring.angle() < state.ring.step());

        finish_rotation(&mut state);
        assert!((state.ring.angle().to_degrees() - 60.0).abs() < 1e-3);
        assert!(state.display.visible);
        assert_eq!(state.display.title, "Starry Night");
        assert_eq!(state.display.artist, "Vincent Van Gogh");
        assert_eq!(state.ring.front_index(), 1);
    }

    #[test]
    fn test_click_previous() {
        let mut state = state();
        let previous = state.ring.panels()[0].previous;
        let pos = screen_pos(&state, previous);

        let outcome = state.click(pos);
        assert!(matches!(
            outcome,
            ClickOutcome::Navigated {
                role: HotspotRole::Previous,
                target_index: 5,
                ..
            }
        ));
        finish_rotation(&mut state);
        assert!((state.ring.angle().to_degrees() + 60.0).abs() < 1e-3);
        assert_eq!(state.display.title, "A Sunday on La Grande Jatte");
        assert_eq!(state.display.artist, "George Seurat");
    }

    #[test]
    fn test_navigation_from_rotated_ring() {
        let mut state = state();
        // Walk forward round the whole ring and back to the start
        for step in 1..=6 {
            let front = state.ring.front_index();
            let next = state.ring.panels()[front].next;
            let pos = screen_pos(&state, next);
            state.click(pos);
            finish_rotation(&mut state);
            let expected = step % 6;
            assert_eq!(state.ring.front_index(), expected);
            assert_eq!(
                state.display.title,
                state.collection.get(expected).unwrap().title
            );
        }
    }

    #[test]
    fn test_click_on_nothing_is_noop() {
        let mut state = state();
        let before = state.display.clone();
        assert_eq!(state.click(Vec2::new(640.0, 5.0)), ClickOutcome::Missed);
        assert_eq!(state.display, before);
        assert_eq!(state.ring.angle(), 0.0);
        assert!(!state.rotation().is_rotating());
    }

    #[test]
    fn test_click_on_artwork_is_noop() {
        let mut state = state();
        let before = state.display.clone();
        let artwork = state.ring.panels()[0].artwork;
        let outcome = state.click(Vec2::new(WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0));
        assert_eq!(outcome, ClickOutcome::NotInteractive(artwork));
        assert_eq!(state.display, before);
        assert_eq!(state.ring.angle(), 0.0);
        state.tick(Duration::from_millis(500));
        assert_eq!(state.ring.angle(), 0.0);
    }

    #[test]
    fn test_double_click_is_ignored() {
        let mut state = state();
        let pos = screen_pos(&state, state.ring.panels()[0].next);
        state.click(pos);
        state.tick(Duration::from_millis(50));
        let second = state.click(pos);
        assert!(matches!(
            second,
            ClickOutcome::Navigated {
                request: RotationRequest::Ignored,
                ..
            }
        ));
        finish_rotation(&mut state);
        assert_eq!(state.ring.front_index(), 1);
    }

    #[test]
    fn test_resize() {
        let mut state = state();
        state.resize(1920, 1080);
        assert!((state.camera.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
        assert_eq!(state.viewport, Viewport::new(1920, 1080));
        assert_eq!(state.mirror.target_size(), (1920, 1080));

        state.resize(600, 900);
        assert!((state.camera.aspect() - 600.0 / 900.0).abs() < 1e-6);
        assert_eq!(state.mirror.target_size(), (600, 900));
    }

    #[test]
    fn test_resize_keeps_picking_aligned() {
        let mut state = state();
        state.resize(900, 900);
        let pos = screen_pos(&state, state.ring.panels()[0].next);
        assert!(matches!(state.click(pos), ClickOutcome::Navigated { .. }));
    }
}
