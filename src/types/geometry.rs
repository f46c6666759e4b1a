use serde::Serialize;

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    /// Columns, left to right.
    Horizontal,
    /// Rows, top to bottom.
    Vertical,
}

/// Integer pixel rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right_plus_1(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom_plus_1(&self) -> i32 {
        self.y + self.height
    }

    /// Whether the point lies inside (right and bottom edges exclusive).
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right_plus_1() && y >= self.y && y < self.bottom_plus_1()
    }
}
