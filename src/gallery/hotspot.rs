//! Navigation hotspots attached to each panel.

/// Which way a hotspot navigates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotspotRole {
    Previous,
    Next,
}

impl HotspotRole {
    /// Rotation direction: -1 for previous, +1 for next.
    pub fn direction(&self) -> i32 {
        match self {
            HotspotRole::Previous => -1,
            HotspotRole::Next => 1,
        }
    }

    /// Index this role leads to from panel `index` in a ring of `count`.
    pub fn target_from(&self, index: usize, count: usize) -> usize {
        match self {
            HotspotRole::Previous => (index + count - 1) % count,
            HotspotRole::Next => (index + 1) % count,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HotspotRole::Previous => "Previous",
            HotspotRole::Next => "Next",
        }
    }

    pub fn all() -> &'static [HotspotRole] {
        &[HotspotRole::Previous, HotspotRole::Next]
    }
}

/// Metadata carried by a clickable shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotspotTag {
    pub role: HotspotRole,
    /// Panel brought to the front when this hotspot is clicked
    pub target_index: usize,
}

impl HotspotTag {
    pub fn new(role: HotspotRole, panel_index: usize, count: usize) -> Self {
        Self {
            role,
            target_index: role.target_from(panel_index, count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions() {
        assert_eq!(HotspotRole::Previous.direction(), -1);
        assert_eq!(HotspotRole::Next.direction(), 1);
    }

    #[test]
    fn test_targets_wrap() {
        assert_eq!(HotspotRole::Previous.target_from(0, 6), 5);
        assert_eq!(HotspotRole::Next.target_from(5, 6), 0);
        assert_eq!(HotspotRole::Next.target_from(2, 6), 3);
        assert_eq!(HotspotRole::Previous.target_from(2, 6), 1);
    }

    #[test]
    fn test_single_panel_targets_itself() {
        for role in HotspotRole::all() {
            assert_eq!(role.target_from(0, 1), 0);
        }
    }

    #[test]
    fn test_previous_and_next_are_inverse() {
        let count = 6;
        for i in 0..count {
            let next = HotspotTag::new(HotspotRole::Next, i, count).target_index;
            assert_eq!(HotspotRole::Previous.target_from(next, count), i);
        }
    }
}
