//! The per-display screen model.
//!
//! A [`Screen`] is created only through [`Screen::new`], which enforces the
//! geometry invariants: the shape has a non-zero area, its far edges are
//! representable as `i32` coordinates, and the jump zone is narrow enough that
//! the cursor center lies strictly outside every jump zone.

use thiserror::Error;

use super::geometry::{Edge, ScreenShape};
use super::input::ModifierMask;

/// Geometry errors detected when a screen is configured.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScreenError {
    /// Width or height is zero.
    #[error("screen {name:?} has a degenerate shape {width}x{height}")]
    DegenerateShape { name: String, width: u32, height: u32 },

    /// The right or bottom edge falls outside the `i32` coordinate space.
    #[error("screen {name:?} at ({x}, {y}) with size {width}x{height} overflows the coordinate space")]
    ShapeOutOfRange {
        name: String,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// The jump zone would swallow the cursor center.
    #[error("screen {name:?}: jump zone of {zone}px must be less than half of {min_dimension}px")]
    JumpZoneTooLarge {
        name: String,
        zone: u32,
        min_dimension: u32,
    },
}

/// Checks the geometry invariants for a screen named `name`.
///
/// # Errors
///
/// - [`ScreenError::DegenerateShape`] for a zero-area shape.
/// - [`ScreenError::ShapeOutOfRange`] when `x + width` or `y + height` does
///   not fit in an `i32`.
/// - [`ScreenError::JumpZoneTooLarge`] when `2 * jump_zone` reaches the
///   smaller dimension.
pub fn validate_geometry(name: &str, shape: &ScreenShape, jump_zone: u32) -> Result<(), ScreenError> {
    if shape.is_degenerate() {
        return Err(ScreenError::DegenerateShape {
            name: name.to_string(),
            width: shape.width,
            height: shape.height,
        });
    }
    let fits = |origin: i32, extent: u32| {
        i32::try_from(extent)
            .ok()
            .and_then(|extent| origin.checked_add(extent))
            .is_some()
    };
    if !fits(shape.x, shape.width) || !fits(shape.y, shape.height) {
        return Err(ScreenError::ShapeOutOfRange {
            name: name.to_string(),
            x: shape.x,
            y: shape.y,
            width: shape.width,
            height: shape.height,
        });
    }
    let min_dimension = shape.width.min(shape.height);
    if jump_zone.saturating_mul(2) >= min_dimension {
        return Err(ScreenError::JumpZoneTooLarge {
            name: name.to_string(),
            zone: jump_zone,
            min_dimension,
        });
    }
    Ok(())
}

/// A display: identity, geometry, cursor, toggle state and lock flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    name: String,
    shape: ScreenShape,
    jump_zone: u32,
    cursor: (i32, i32),
    toggle_mask: ModifierMask,
    locked: bool,
}

impl Screen {
    /// Creates a validated screen with the cursor parked at its center.
    ///
    /// # Errors
    ///
    /// See [`validate_geometry`].
    pub fn new(name: impl Into<String>, shape: ScreenShape, jump_zone: u32) -> Result<Self, ScreenError> {
        let name = name.into();
        validate_geometry(&name, &shape, jump_zone)?;
        Ok(Self {
            cursor: shape.center(),
            name,
            shape,
            jump_zone,
            toggle_mask: ModifierMask::NONE,
            locked: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> ScreenShape {
        self.shape
    }

    /// Replaces the shape (e.g. after a resolution change) and clamps the
    /// cursor into it.
    ///
    /// # Errors
    ///
    /// Leaves the screen untouched and returns the validation error if the new
    /// shape is inconsistent with the jump zone.
    pub fn set_shape(&mut self, shape: ScreenShape) -> Result<(), ScreenError> {
        validate_geometry(&self.name, &shape, self.jump_zone)?;
        self.shape = shape;
        self.cursor = shape.clamp(self.cursor.0, self.cursor.1);
        Ok(())
    }

    pub fn jump_zone(&self) -> u32 {
        self.jump_zone
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    /// Moves the cursor, clamped into the shape.
    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = self.shape.clamp(x, y);
    }

    /// The reference point the primary parks its pointer on while a secondary
    /// is focused.  Always outside every jump zone.
    pub fn cursor_center(&self) -> (i32, i32) {
        self.shape.center()
    }

    /// Returns `true` if `(x, y)` is in the jump zone of `edge`.
    pub fn in_jump_zone(&self, edge: Edge, x: i32, y: i32) -> bool {
        self.shape.in_jump_zone(edge, x, y, self.jump_zone)
    }

    pub fn toggle_mask(&self) -> ModifierMask {
        self.toggle_mask
    }

    /// Stores only the toggle bits of `mask`.
    pub fn set_toggle_mask(&mut self, mask: ModifierMask) {
        self.toggle_mask = mask.toggles();
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}
