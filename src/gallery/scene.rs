//! Ring scene construction
//!
//! Lays out one panel per artwork around the vertical axis. Each panel is a
//! pivot at angle `index * 2π/N` holding a border, the artwork face and two
//! navigation hotspots, all pushed out to the ring radius along the pivot's
//! -Z axis.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::{Mat4, Vec3};

use super::collection::Collection;
use super::hotspot::{HotspotRole, HotspotTag};
use crate::config::{Material, SceneConfig};

/// Stable identity of a shape within the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

/// What a shape is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Border,
    Artwork,
    Hotspot(HotspotRole),
}

/// A box mesh attached to a panel pivot.
#[derive(Debug, Clone)]
pub struct Shape {
    pub id: ShapeId,
    /// Owning panel index
    pub panel: usize,
    pub kind: ShapeKind,
    /// Position relative to the panel pivot
    pub offset: Vec3,
    /// Full box extents
    pub size: Vec3,
    pub material: Material,
}

impl Shape {
    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }
}

/// One artwork's pivot and shapes.
#[derive(Debug, Clone)]
pub struct Panel {
    pub index: usize,
    /// Pivot angle about the vertical axis in radians
    pub angle: f32,
    pub border: ShapeId,
    pub artwork: ShapeId,
    pub previous: ShapeId,
    pub next: ShapeId,
}

/// The rotating container holding every panel.
#[derive(Debug, Clone)]
pub struct Ring {
    panels: Vec<Panel>,
    shapes: Vec<Shape>,
    hotspots: HashMap<ShapeId, HotspotTag>,
    /// Angular position of the front panel. Only the rotation controller moves it.
    angle: f32,
}

/// Yaw about +Y.
fn yaw(angle: f32) -> Mat4 {
    Mat4::from_rotation_y(angle)
}

impl Ring {
    /// Build the ring for a collection.
    pub fn build(collection: &Collection, config: &SceneConfig) -> Self {
        let count = collection.len();
        let step = TAU / count as f32;
        let depth = -config.radius;

        let mut panels = Vec::with_capacity(count);
        let mut shapes = Vec::with_capacity(count * 4);
        let mut hotspots = HashMap::with_capacity(count * 2);

        let add_shape = |shapes: &mut Vec<Shape>,
                         panel: usize,
                         kind: ShapeKind,
                         offset: Vec3,
                         size: [f32; 3],
                         material: Material| {
            let id = ShapeId(shapes.len() as u32);
            shapes.push(Shape {
                id,
                panel,
                kind,
                offset,
                size: Vec3::from_array(size),
                material,
            });
            id
        };

        for index in 0..count {
            let border = add_shape(
                &mut shapes,
                index,
                ShapeKind::Border,
                Vec3::new(0.0, 0.0, depth),
                config.border_size,
                config.border_material,
            );
            let artwork = add_shape(
                &mut shapes,
                index,
                ShapeKind::Artwork,
                Vec3::new(0.0, 0.0, depth),
                config.artwork_size,
                config.artwork_material,
            );
            // The successor panel lies towards local -X, so "next" sits on that side
            let next = add_shape(
                &mut shapes,
                index,
                ShapeKind::Hotspot(HotspotRole::Next),
                Vec3::new(-config.hotspot_offset, 0.0, depth),
                config.hotspot_size,
                config.hotspot_material,
            );
            let previous = add_shape(
                &mut shapes,
                index,
                ShapeKind::Hotspot(HotspotRole::Previous),
                Vec3::new(config.hotspot_offset, 0.0, depth),
                config.hotspot_size,
                config.hotspot_material,
            );

            hotspots.insert(next, HotspotTag::new(HotspotRole::Next, index, count));
            hotspots.insert(previous, HotspotTag::new(HotspotRole::Previous, index, count));

            panels.push(Panel {
                index,
                angle: index as f32 * step,
                border,
                artwork,
                previous,
                next,
            });
        }

        log::debug!("Built ring with {} panels, {} shapes", panels.len(), shapes.len());

        Self {
            panels,
            shapes,
            hotspots,
            angle: 0.0,
        }
    }

    /// Number of panels (N).
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Angle between neighbouring panels.
    pub fn step(&self) -> f32 {
        TAU / self.panels.len() as f32
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0 as usize)
    }

    /// Pivot angle of panel `index`.
    pub fn panel_angle(&self, index: usize) -> f32 {
        index as f32 * self.step()
    }

    /// Hotspot metadata for a shape, if it is clickable.
    pub fn hotspot(&self, id: ShapeId) -> Option<&HotspotTag> {
        self.hotspots.get(&id)
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub(crate) fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }

    /// Panel nearest to the front of the camera.
    pub fn front_index(&self) -> usize {
        let count = self.panels.len() as i64;
        let steps = (self.angle / self.step()).round() as i64;
        steps.rem_euclid(count) as usize
    }

    /// World transform of the ring itself.
    ///
    /// The ring is yawed by the negated angle so that angle `i * step`
    /// brings panel `i` (pivoted by `+i * step`) to the front.
    pub fn transform(&self) -> Mat4 {
        yaw(-self.angle)
    }

    /// World transform of a shape, including the current ring rotation.
    pub fn shape_transform(&self, shape: &Shape) -> Mat4 {
        let pivot = yaw(self.panels[shape.panel].angle);
        self.transform() * pivot * Mat4::from_translation(shape.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> Ring {
        Ring::build(&Collection::builtin().unwrap(), &SceneConfig::default())
    }

    #[test]
    fn test_panel_layout() {
        let ring = ring();
        assert_eq!(ring.panel_count(), 6);
        assert_eq!(ring.shapes().len(), 24);

        for (i, panel) in ring.panels().iter().enumerate() {
            assert_eq!(panel.index, i);
            let expected = (i as f32 * 60.0).to_radians();
            assert!((panel.angle - expected).abs() < 1e-5);
            assert_eq!(panel.angle, ring.panel_angle(i));
        }
    }

    #[test]
    fn test_panels_partition_circle() {
        let ring = ring();
        let mut total = 0.0;
        for pair in ring.panels().windows(2) {
            let gap = pair[1].angle - pair[0].angle;
            assert!((gap - ring.step()).abs() < 1e-5);
            total += gap;
        }
        // Closing gap from the last panel back round to the first
        let last = ring.panels().last().unwrap().angle;
        total += TAU - last;
        assert!((total - TAU).abs() < 1e-4);
    }

    #[test]
    fn test_hotspot_targets() {
        let ring = ring();
        let n = ring.panel_count();
        for panel in ring.panels() {
            let i = panel.index;
            let previous = ring.hotspot(panel.previous).unwrap();
            let next = ring.hotspot(panel.next).unwrap();
            assert_eq!(previous.role, HotspotRole::Previous);
            assert_eq!(next.role, HotspotRole::Next);
            assert_eq!(previous.target_index, (i + n - 1) % n);
            assert_eq!(next.target_index, (i + 1) % n);
        }
    }

    #[test]
    fn test_exactly_one_hotspot_of_each_role_per_panel() {
        let ring = ring();
        for panel in ring.panels() {
            let roles: Vec<HotspotRole> = ring
                .shapes()
                .iter()
                .filter(|s| s.panel == panel.index)
                .filter_map(|s| ring.hotspot(s.id).map(|t| t.role))
                .collect();
            assert_eq!(roles.len(), 2);
            assert!(roles.contains(&HotspotRole::Previous));
            assert!(roles.contains(&HotspotRole::Next));
        }
    }

    #[test]
    fn test_non_hotspots_carry_no_tag() {
        let ring = ring();
        for panel in ring.panels() {
            assert!(ring.hotspot(panel.border).is_none());
            assert!(ring.hotspot(panel.artwork).is_none());
        }
    }

    #[test]
    fn test_front_panel_faces_camera() {
        let ring = ring();
        let artwork = ring.shape(ring.panels()[0].artwork).unwrap();
        let centre = ring.shape_transform(artwork).transform_point3(Vec3::ZERO);
        assert!(centre.abs_diff_eq(Vec3::new(0.0, 0.0, -4.0), 1e-5));
        assert_eq!(ring.front_index(), 0);
    }

    #[test]
    fn test_positive_angle_brings_next_panel_forward() {
        let mut ring = ring();
        ring.set_angle(ring.step());
        assert_eq!(ring.front_index(), 1);

        let artwork = ring.shape(ring.panels()[1].artwork).unwrap();
        let centre = ring.shape_transform(artwork).transform_point3(Vec3::ZERO);
        assert!(centre.abs_diff_eq(Vec3::new(0.0, 0.0, -4.0), 1e-4));

        ring.set_angle(-ring.step());
        assert_eq!(ring.front_index(), 5);
    }

    #[test]
    fn test_next_hotspot_faces_successor() {
        // Panel 1 sits on the same side of panel 0 as its "next" hotspot
        let ring = ring();
        let next = ring.shape(ring.panels()[0].next).unwrap();
        let next_pos = ring.shape_transform(next).transform_point3(Vec3::ZERO);
        let panel_one = ring.shape(ring.panels()[1].artwork).unwrap();
        let panel_one_pos = ring.shape_transform(panel_one).transform_point3(Vec3::ZERO);
        assert!(next_pos.x < 0.0);
        assert!(panel_one_pos.x < 0.0);
    }
}
