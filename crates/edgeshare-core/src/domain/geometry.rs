//! Screen geometry.
//!
//! Every screen is an axis-aligned rectangle in its *own* local coordinate
//! space.  Unlike a single virtual desktop, edgeshare never places two screens
//! in one coordinate system: a handoff maps the crossing point from the source
//! rectangle onto the facing edge of the destination rectangle.

use serde::{Deserialize, Serialize};

/// The four edges of a rectangular screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// All edges, in the fixed priority order used when a stationary cursor
    /// sits in two jump zones at once.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Returns the edge on the opposite side of the rectangle.
    pub fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
        }
    }

    /// Returns `true` for the edges reached by horizontal motion (Left/Right).
    pub fn is_horizontal_exit(self) -> bool {
        matches!(self, Edge::Left | Edge::Right)
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        };
        f.write_str(s)
    }
}

/// Bitmask of the edges that currently have a live neighbour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMask(pub u8);

impl SideMask {
    pub const NONE: SideMask = SideMask(0);
    pub const LEFT: SideMask = SideMask(1 << 0);
    pub const RIGHT: SideMask = SideMask(1 << 1);
    pub const TOP: SideMask = SideMask(1 << 2);
    pub const BOTTOM: SideMask = SideMask(1 << 3);
    pub const ALL: SideMask = SideMask(0b1111);

    /// Returns the single-bit mask for `edge`.
    pub fn from_edge(edge: Edge) -> SideMask {
        match edge {
            Edge::Left => Self::LEFT,
            Edge::Right => Self::RIGHT,
            Edge::Top => Self::TOP,
            Edge::Bottom => Self::BOTTOM,
        }
    }

    pub fn contains(self, edge: Edge) -> bool {
        self.0 & Self::from_edge(edge).0 != 0
    }

    pub fn insert(&mut self, edge: Edge) {
        self.0 |= Self::from_edge(edge).0;
    }

    pub fn remove(&mut self, edge: Edge) {
        self.0 &= !Self::from_edge(edge).0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for SideMask {
    type Output = SideMask;

    fn bitor(self, rhs: SideMask) -> SideMask {
        SideMask(self.0 | rhs.0)
    }
}

impl FromIterator<Edge> for SideMask {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        let mut mask = SideMask::NONE;
        for edge in iter {
            mask.insert(edge);
        }
        mask
    }
}

/// A screen rectangle: origin plus size, in the screen's own coordinates.
///
/// Multi-monitor machines may report a non-zero (even negative) origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenShape {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ScreenShape {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the rightmost X coordinate (exclusive), saturating at
    /// `i32::MAX` for shapes that never passed validation.
    pub fn right(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width)
    }

    /// Returns the bottommost Y coordinate (exclusive), saturating like
    /// [`Self::right`].
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add_unsigned(self.height)
    }

    /// Returns `true` when either dimension is zero.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns the geometric center.
    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    /// Clamps `(x, y)` to the nearest pixel inside the rectangle.
    pub fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        (
            x.clamp(self.x, (self.right() - 1).max(self.x)),
            y.clamp(self.y, (self.bottom() - 1).max(self.y)),
        )
    }

    /// Returns the length of `edge` in pixels.
    pub fn edge_length(&self, edge: Edge) -> u32 {
        if edge.is_horizontal_exit() {
            self.height
        } else {
            self.width
        }
    }

    /// Returns `true` if `(x, y)` lies within `zone` pixels of `edge`.
    ///
    /// With `zone == 0` only points beyond the edge qualify, which is how a
    /// secondary screen (driven by relative motion) detects a crossing.
    pub fn in_jump_zone(&self, edge: Edge, x: i32, y: i32, zone: u32) -> bool {
        let zone = zone as i32;
        match edge {
            Edge::Left => x < self.x + zone,
            Edge::Right => x >= self.right() - zone,
            Edge::Top => y < self.y + zone,
            Edge::Bottom => y >= self.bottom() - zone,
        }
    }

    /// Moves `(x, y)` inward until it lies outside the `zone`-wide band along
    /// every edge.  Used when focus returns to a screen without a crossing, so
    /// the next sample does not bounce straight back out.
    pub fn outside_jump_zones(&self, x: i32, y: i32, zone: u32) -> (i32, i32) {
        let zone = zone as i32;
        let (x, y) = self.clamp(x, y);
        (
            x.min(self.right() - 1 - zone).max(self.x + zone),
            y.min(self.bottom() - 1 - zone).max(self.y + zone),
        )
    }

    /// Computes where a cursor leaving `self` through `edge` at `(x, y)` enters
    /// `target`.
    ///
    /// The coordinate along the shared edge is mapped proportionally; the
    /// other coordinate lands on the target's facing edge, pushed inward by
    /// `target_zone` so the entry point never sits in the target's own jump
    /// zone.
    pub fn entry_point(
        &self,
        edge: Edge,
        x: i32,
        y: i32,
        target: &ScreenShape,
        target_zone: u32,
    ) -> (i32, i32) {
        let push = target_zone as i32;
        let (entry_x, entry_y) = match edge {
            Edge::Right | Edge::Left => {
                let mapped = map_edge_position(self.height, target.height, y - self.y);
                let entry_x = if edge == Edge::Right {
                    target.x + push
                } else {
                    target.right() - 1 - push
                };
                (entry_x, target.y + mapped)
            }
            Edge::Bottom | Edge::Top => {
                let mapped = map_edge_position(self.width, target.width, x - self.x);
                let entry_y = if edge == Edge::Bottom {
                    target.y + push
                } else {
                    target.bottom() - 1 - push
                };
                (target.x + mapped, entry_y)
            }
        };
        target.clamp(entry_x, entry_y)
    }
}

/// Maps a position along one edge proportionally to the corresponding position
/// on another edge.
///
/// `from_length` is the length of the source edge, `to_length` the length of the
/// target edge, `pos` the offset along the source edge.  A zero `from_length`
/// maps everything to 0.
pub fn map_edge_position(from_length: u32, to_length: u32, pos: i32) -> i32 {
    if from_length == 0 {
        return 0;
    }
    let t = pos.clamp(0, from_length as i32) as f64 / from_length as f64;
    (t * to_length as f64) as i32
}
