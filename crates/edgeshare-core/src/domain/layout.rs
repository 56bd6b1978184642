//! Named screen topology and the edge-crossing decision.
//!
//! The layout answers one question: *which screen lies beyond edge E of screen
//! S?*  It stores screens by name and a set of directed [`Link`]s.  Links are
//! directed on purpose: "laptop is right of desk" does not imply "desk is left
//! of laptop" unless configured.
//!
//! Geometry lives with the endpoints (a secondary reports its own shape when it
//! connects), so the layout never needs to be rebuilt when a resolution
//! changes.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use super::geometry::{Edge, ScreenShape, SideMask};

/// Errors that can occur when configuring the layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// A screen with that name is already part of the layout.
    #[error("duplicate screen name: {0}")]
    DuplicateScreen(String),

    /// A link references a screen that does not exist.
    #[error("link references unknown screen: {0}")]
    UnknownScreen(String),

    /// A link points a screen at itself.
    #[error("screen {0} cannot be its own neighbour")]
    SelfLink(String),
}

/// "Leaving `from` through `edge` enters `to`."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub from: String,
    pub edge: Edge,
    pub to: String,
}

/// The configured screen topology.
#[derive(Debug, Clone)]
pub struct ScreenLayout {
    screens: HashSet<String>,
    links: Vec<Link>,
}

impl ScreenLayout {
    /// Creates a layout containing only the primary screen.
    pub fn new(primary: impl Into<String>) -> Self {
        let mut screens = HashSet::new();
        screens.insert(primary.into());
        Self {
            screens,
            links: Vec::new(),
        }
    }

    /// Adds a screen.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DuplicateScreen`] if the name is taken.
    pub fn add_screen(&mut self, name: impl Into<String>) -> Result<(), LayoutError> {
        let name = name.into();
        if !self.screens.insert(name.clone()) {
            return Err(LayoutError::DuplicateScreen(name));
        }
        Ok(())
    }

    /// Removes a screen and every link touching it.
    pub fn remove_screen(&mut self, name: &str) {
        self.screens.remove(name);
        self.links.retain(|l| l.from != name && l.to != name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.screens.contains(name)
    }

    /// Returns all screen names.
    pub fn screens(&self) -> impl Iterator<Item = &str> {
        self.screens.iter().map(String::as_str)
    }

    /// Returns all links.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    /// Defines the neighbour beyond one edge, replacing any previous link for
    /// the same `from` + `edge` pair.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownScreen`] if either end is not part of the
    /// layout and [`LayoutError::SelfLink`] if both ends are the same screen.
    pub fn set_link(&mut self, link: Link) -> Result<(), LayoutError> {
        for name in [&link.from, &link.to] {
            if !self.screens.contains(name) {
                return Err(LayoutError::UnknownScreen(name.clone()));
            }
        }
        if link.from == link.to {
            return Err(LayoutError::SelfLink(link.from));
        }

        let before = self.links.len();
        self.links
            .retain(|l| !(l.from == link.from && l.edge == link.edge));
        if self.links.len() != before {
            debug!(from = %link.from, edge = %link.edge, "replacing existing link");
        }
        self.links.push(link);
        Ok(())
    }

    /// Returns the screen beyond `edge` of `from`, if one is configured.
    pub fn neighbor(&self, from: &str, edge: Edge) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.from == from && l.edge == edge)
            .map(|l| l.to.as_str())
    }

    /// Returns the edges of `from` whose neighbour satisfies `is_live`.
    ///
    /// The orchestrator passes "is currently connected", so an edge leading to
    /// a disconnected secondary is not a jump zone.
    pub fn active_sides<F>(&self, from: &str, is_live: F) -> SideMask
    where
        F: Fn(&str) -> bool,
    {
        Edge::ALL
            .into_iter()
            .filter(|edge| self.neighbor(from, *edge).is_some_and(&is_live))
            .collect()
    }
}

/// Decides which live edge, if any, a cursor sample crosses.
///
/// `(x, y)` is the sample in `shape`'s coordinates, `zone` the jump-zone width,
/// `sides` the live edges, and `motion` the delta since the previous sample.
///
/// When the sample is in two jump zones at once (a corner), the edge on the
/// axis of the dominant motion component wins.  Equal or zero motion falls
/// back to the fixed order top, bottom, left, right.
pub fn crossing_edge(
    shape: &ScreenShape,
    zone: u32,
    x: i32,
    y: i32,
    sides: SideMask,
    motion: (i32, i32),
) -> Option<Edge> {
    let mut candidates = Edge::ALL
        .into_iter()
        .filter(|edge| sides.contains(*edge) && shape.in_jump_zone(*edge, x, y, zone));

    let first = candidates.next()?;
    let second = match candidates.next() {
        Some(edge) => edge,
        None => return Some(first),
    };

    let (dx, dy) = (motion.0.unsigned_abs(), motion.1.unsigned_abs());
    let chosen = if dx > dy {
        [first, second].into_iter().find(|e| e.is_horizontal_exit())
    } else if dy > dx {
        [first, second].into_iter().find(|e| !e.is_horizontal_exit())
    } else {
        None
    };
    Some(chosen.unwrap_or(first))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn link(from: &str, edge: Edge, to: &str) -> Link {
        Link {
            from: from.to_string(),
            edge,
            to: to.to_string(),
        }
    }

    fn desk_and_laptop() -> ScreenLayout {
        let mut layout = ScreenLayout::new("desk");
        layout.add_screen("laptop").unwrap();
        layout.set_link(link("desk", Edge::Right, "laptop")).unwrap();
        layout.set_link(link("laptop", Edge::Left, "desk")).unwrap();
        layout
    }

    fn hd() -> ScreenShape {
        ScreenShape::new(0, 0, 1920, 1080)
    }

    // ── topology ──────────────────────────────────────────────────────────────

    #[test]
    fn test_add_screen_rejects_duplicate_name() {
        let mut layout = ScreenLayout::new("desk");
        assert_eq!(
            layout.add_screen("desk"),
            Err(LayoutError::DuplicateScreen("desk".to_string()))
        );
    }

    #[test]
    fn test_set_link_rejects_unknown_screen() {
        let mut layout = ScreenLayout::new("desk");
        assert_eq!(
            layout.set_link(link("desk", Edge::Right, "ghost")),
            Err(LayoutError::UnknownScreen("ghost".to_string()))
        );
    }

    #[test]
    fn test_set_link_rejects_self_link() {
        let mut layout = ScreenLayout::new("desk");
        assert_eq!(
            layout.set_link(link("desk", Edge::Left, "desk")),
            Err(LayoutError::SelfLink("desk".to_string()))
        );
    }

    #[test]
    fn test_set_link_replaces_existing_link_for_same_edge() {
        let mut layout = desk_and_laptop();
        layout.add_screen("tablet").unwrap();
        layout.set_link(link("desk", Edge::Right, "tablet")).unwrap();

        assert_eq!(layout.neighbor("desk", Edge::Right), Some("tablet"));
        let count = layout
            .links()
            .filter(|l| l.from == "desk" && l.edge == Edge::Right)
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_links_are_directed() {
        let mut layout = ScreenLayout::new("desk");
        layout.add_screen("laptop").unwrap();
        layout.set_link(link("desk", Edge::Right, "laptop")).unwrap();
        assert_eq!(layout.neighbor("laptop", Edge::Left), None);
    }

    #[test]
    fn test_remove_screen_drops_its_links() {
        let mut layout = desk_and_laptop();
        layout.remove_screen("laptop");
        assert!(!layout.contains("laptop"));
        assert_eq!(layout.links().count(), 0);
    }

    #[test]
    fn test_active_sides_only_counts_live_neighbours() {
        let layout = desk_and_laptop();
        assert_eq!(layout.active_sides("desk", |_| true), SideMask::RIGHT);
        assert_eq!(layout.active_sides("desk", |n| n != "laptop"), SideMask::NONE);
    }

    // ── crossing_edge ─────────────────────────────────────────────────────────

    #[test]
    fn test_crossing_edge_none_when_far_from_edges() {
        let result = crossing_edge(&hd(), 1, 960, 540, SideMask::ALL, (5, 0));
        assert_eq!(result, None);
    }

    #[test]
    fn test_crossing_edge_ignores_edges_without_live_neighbour() {
        let result = crossing_edge(&hd(), 1, 960, 1079, SideMask::RIGHT, (0, 5));
        assert_eq!(result, None);
    }

    #[test]
    fn test_crossing_edge_detects_right_edge() {
        let result = crossing_edge(&hd(), 1, 1919, 540, SideMask::RIGHT, (3, 0));
        assert_eq!(result, Some(Edge::Right));
    }

    #[test]
    fn test_corner_with_horizontal_motion_picks_horizontal_exit() {
        let sides = SideMask::RIGHT | SideMask::BOTTOM;
        let result = crossing_edge(&hd(), 1, 1919, 1079, sides, (12, 3));
        assert_eq!(result, Some(Edge::Right));
    }

    #[test]
    fn test_corner_with_vertical_motion_picks_vertical_exit() {
        let sides = SideMask::RIGHT | SideMask::BOTTOM;
        let result = crossing_edge(&hd(), 1, 1919, 1079, sides, (2, 9));
        assert_eq!(result, Some(Edge::Bottom));
    }

    #[test]
    fn test_corner_without_motion_uses_fixed_priority() {
        let sides = SideMask::LEFT | SideMask::TOP;
        // top wins over left when the cursor is stationary
        let result = crossing_edge(&hd(), 1, 0, 0, sides, (0, 0));
        assert_eq!(result, Some(Edge::Top));
    }

    #[test]
    fn test_corner_with_equal_motion_uses_fixed_priority() {
        let sides = SideMask::RIGHT | SideMask::BOTTOM;
        let result = crossing_edge(&hd(), 1, 1919, 1079, sides, (4, -4));
        assert_eq!(result, Some(Edge::Bottom));
    }
}
