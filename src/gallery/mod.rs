//! Gallery core: collection, ring layout, picking and rotation.
//!
//! Nothing in here touches the GPU or the window, so the whole viewer
//! behaviour can be driven from tests.

pub mod camera;
pub mod collection;
pub mod display;
pub mod environment;
pub mod hotspot;
pub mod picking;
pub mod rotation;
pub mod scene;
pub mod state;
pub mod tween;

pub use camera::GalleryCamera;
pub use collection::{ArtworkEntry, Collection};
pub use display::DisplayState;
pub use environment::{Mirror, SpotLight};
pub use hotspot::{HotspotRole, HotspotTag};
pub use picking::{pick_nearest, screen_to_ndc, Hit, Ray};
pub use rotation::{RotationCompleted, RotationController, RotationRequest, RotationState};
pub use scene::{Panel, Ring, Shape, ShapeId, ShapeKind};
pub use state::{ClickOutcome, GalleryState, Viewport};
pub use tween::{Easing, Tween};
