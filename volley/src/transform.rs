use serde::{Deserialize, Serialize};

use crate::{Position, PositionBounds, COURT_DEPTH, COURT_WIDTH};

/// A point on screen, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// An axis-aligned rectangle on screen, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Maps between screen pixels and court meters.
///
/// The mapping is a pure scaling: the top left corner of the drawing area is
/// the point where the net meets the left sideline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoordinateTransformer {
    pub screen_width: f64,
    pub screen_height: f64,
    pub court_width: f64,
    pub court_depth: f64,
}

impl Default for CoordinateTransformer {
    fn default() -> Self {
        Self {
            screen_width: 600.0,
            screen_height: 360.0,
            court_width: COURT_WIDTH,
            court_depth: COURT_DEPTH,
        }
    }
}

impl CoordinateTransformer {
    /// Pixels per meter along x.
    pub fn scale_x(&self) -> f64 {
        self.screen_width / self.court_width
    }

    /// Pixels per meter along y.
    pub fn scale_y(&self) -> f64 {
        self.screen_height / self.court_depth
    }

    pub fn screen_to_volleyball(&self, point: ScreenPoint) -> Position {
        Position::new(point.x / self.scale_x(), point.y / self.scale_y())
    }

    pub fn volleyball_to_screen(&self, position: Position) -> ScreenPoint {
        ScreenPoint {
            x: position.x * self.scale_x(),
            y: position.y * self.scale_y(),
        }
    }

    pub fn bounds_to_screen(&self, bounds: &PositionBounds) -> ScreenRect {
        let top_left = self.volleyball_to_screen(Position::new(bounds.min_x, bounds.min_y));
        ScreenRect {
            x: top_left.x,
            y: top_left.y,
            width: bounds.width() * self.scale_x(),
            height: bounds.height() * self.scale_y(),
        }
    }

    /// The inverse of [`Self::bounds_to_screen()`]. The result is unconstrained.
    pub fn screen_rect_to_bounds(&self, rect: ScreenRect) -> PositionBounds {
        let min = self.screen_to_volleyball(ScreenPoint { x: rect.x, y: rect.y });
        let max = self.screen_to_volleyball(ScreenPoint {
            x: rect.x + rect.width,
            y: rect.y + rect.height,
        });
        PositionBounds {
            min_x: min.x,
            max_x: max.x,
            min_y: min.y,
            max_y: max.y,
            is_constrained: false,
            reasons: Vec::new(),
        }
    }
}
