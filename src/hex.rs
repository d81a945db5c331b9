//! Hex coordinate engine for pointy-topped hexes.
//!
//! Three coordinate spaces are involved:
//!
//! - **axial** ([`Hex`]): the `(row, col)` address stored by models. Integral.
//! - **cube** ([`Cube`]): the redundant `(x, y, z)` form with `x + y + z == 0`,
//!   used only while rounding.
//! - **pixel** ([`Point`]): screen-space geometry.
//!
//! Nothing here knows physical units. `size` is the center-to-corner distance
//! in whatever unit the caller draws in, so a grid can be rescaled by passing a
//! different `size` instead of touching stored hexes. No function performs
//! bounds checking: every input maps to a hex of the unbounded grid.

#[cfg(test)]
#[path = "hex_test.rs"]
mod hex_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CORNER_STEP_DEG, POINTY_TOP_OFFSET_DEG, SQRT_3};
use crate::geom::Point;

/// An axial hex address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub row: i32,
    pub col: i32,
}

/// A real-valued axial coordinate, as produced by the inverse pixel transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FracHex {
    pub row: f64,
    pub col: f64,
}

/// Cube coordinate. Intermediate only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Hex {
    #[must_use]
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub fn to_cube(self) -> Cube {
        axial_to_cube(self)
    }

    /// Pixel center of this hex relative to the center of hex `(0, 0)`.
    #[must_use]
    pub fn to_pixel(self, size: f64) -> Point {
        axial_to_pixel(self, size)
    }
}

impl From<Hex> for FracHex {
    fn from(hex: Hex) -> Self {
        Self { row: f64::from(hex.row), col: f64::from(hex.col) }
    }
}

impl std::fmt::Display for Hex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FracHex {
    #[must_use]
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub fn to_cube(self) -> Cube {
        let x = self.col;
        let z = self.row;
        Cube { x, y: -x - z, z }
    }

    #[must_use]
    pub fn round(self) -> Hex {
        round_to_nearest_hex(self)
    }
}

impl Cube {
    /// Sum of the three axes; zero for every well-formed cube coordinate.
    #[must_use]
    pub fn sum(self) -> f64 {
        self.x + self.y + self.z
    }

    /// Round every axis, then restore `x + y + z == 0` by recomputing the axis
    /// that moved the most.
    ///
    /// Independent rounding generically breaks the invariant. The axis with the
    /// largest rounding delta is the least trustworthy, so it is the one
    /// derived from the other two. Ties fall through to `y`, then `z`.
    #[must_use]
    pub fn round(self) -> Self {
        let mut rx = self.x.round();
        let mut ry = self.y.round();
        let mut rz = self.z.round();

        let dx = (rx - self.x).abs();
        let dy = (ry - self.y).abs();
        let dz = (rz - self.z).abs();

        if dx > dy && dx > dz {
            rx = -ry - rz;
        } else if dy > dz {
            ry = -rx - rz;
        } else {
            rz = -rx - ry;
        }

        Self { x: rx, y: ry, z: rz }
    }
}

/// `x = col, z = row, y = -x - z`. Exact.
#[must_use]
pub fn axial_to_cube(a: Hex) -> Cube {
    let x = f64::from(a.col);
    let z = f64::from(a.row);
    Cube { x, y: -x - z, z }
}

/// `row = z, col = x`. Exact.
#[must_use]
pub fn cube_to_axial(c: Cube) -> FracHex {
    FracHex { row: c.z, col: c.x }
}

/// Pixel center of `a` for pointy-topped hexes of corner radius `size`.
#[must_use]
pub fn axial_to_pixel(a: Hex, size: f64) -> Point {
    let row = f64::from(a.row);
    let col = f64::from(a.col);
    Point {
        x: size * (SQRT_3 * col + (SQRT_3 / 2.0) * row),
        y: size * (1.5 * row),
    }
}

/// The hex containing `p`. Unbounded: callers check membership in their own grid.
#[must_use]
pub fn pixel_to_axial(p: Point, size: f64) -> Hex {
    let col = ((SQRT_3 / 3.0) * p.x - (1.0 / 3.0) * p.y) / size;
    let row = ((2.0 / 3.0) * p.y) / size;
    round_to_nearest_hex(FracHex { row, col })
}

/// Nearest integral hex to a real-valued axial coordinate.
#[must_use]
pub fn round_to_nearest_hex(a: FracHex) -> Hex {
    let rounded = a.to_cube().round();
    let axial = cube_to_axial(rounded);
    Hex { row: integral(axial.row), col: integral(axial.col) }
}

/// Corner `corner` (0..=5, clockwise from the upper right) of a pointy-topped hex.
#[must_use]
pub fn corner_point(center: Point, size: f64, corner: usize) -> Point {
    let step = f64::from(u8::try_from(corner % 6).unwrap_or_default());
    let angle = (CORNER_STEP_DEG * step + POINTY_TOP_OFFSET_DEG).to_radians();
    Point {
        x: center.x + size * angle.cos(),
        y: center.y + size * angle.sin(),
    }
}

/// All six corners, in drawing order.
#[must_use]
pub fn hex_corners(center: Point, size: f64) -> [Point; 6] {
    std::array::from_fn(|i| corner_point(center, size, i))
}

/// Horizontal extent of a pointy-topped hex (flat side to flat side).
#[must_use]
pub fn hex_width(size: f64) -> f64 {
    SQRT_3 * size
}

/// Vertical extent of a pointy-topped hex (corner to corner).
#[must_use]
pub fn hex_height(size: f64) -> f64 {
    2.0 * size
}

// Rounded cube axes are whole numbers; the cast only drops the zero fraction
// (and the sign of negative zero).
#[allow(clippy::cast_possible_truncation)]
fn integral(value: f64) -> i32 {
    value as i32
}
