//! Pointer gestures on the canvas.
//!
//! Two kinds of drags reach the canvas:
//!
//! - **Reorder drags** start on a canvas item and only activate after the
//!   pointer has travelled `drag_activation_distance`. Releasing before that
//!   is a click.
//! - **Palette drags** come from outside the canvas and carry a payload
//!   tagged with [`PALETTE_MIME`]. Only those can create blocks on drop.

/// Payload tag identifying a block-type token dragged from the palette
pub const PALETTE_MIME: &str = "application/x-sitekit-block";

/// What a drop event carries
#[derive(Debug, Clone, PartialEq)]
pub struct DragPayload {
    pub mime: String,
    pub data: String,
}

impl DragPayload {
    pub fn new(mime: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            data: data.into(),
        }
    }

    /// Payload for dragging `block_type` out of the palette
    pub fn palette(block_type: impl Into<String>) -> Self {
        Self::new(PALETTE_MIME, block_type)
    }

    /// Block type to create, if this is a palette drag
    pub fn palette_block_type(&self) -> Option<&str> {
        (self.mime == PALETTE_MIME && !self.data.is_empty()).then_some(self.data.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A press on a canvas item, possibly turned into a reorder drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    pub component_id: String,
    pub origin: Point,
    pub pointer: Point,
    pub active: bool,
}

impl DragGesture {
    pub fn new(component_id: impl Into<String>, origin: Point) -> Self {
        Self {
            component_id: component_id.into(),
            origin,
            pointer: origin,
            active: false,
        }
    }

    /// Track the pointer; returns true when this move activated the drag
    pub fn move_to(&mut self, pointer: Point, activation_distance: f32) -> bool {
        self.pointer = pointer;
        if !self.active && self.origin.distance_to(pointer) >= activation_distance {
            self.active = true;
            return true;
        }
        false
    }
}

/// Visual state of one insertion gap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapState {
    /// Hairline
    Idle,
    /// Visible line with an "Insert here" button
    HoverInsert,
    /// Thick highlighted line with endpoint markers, under a palette drag
    DropTarget,
}

impl GapState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GapState::Idle => "idle",
            GapState::HoverInsert => "hover",
            GapState::DropTarget => "drop-target",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_activates_after_threshold() {
        let mut gesture = DragGesture::new("a", Point::new(10.0, 10.0));

        assert!(!gesture.move_to(Point::new(13.0, 14.0), 8.0));
        assert!(!gesture.active);

        assert!(gesture.move_to(Point::new(16.0, 18.0), 8.0));
        assert!(gesture.active);

        // Only the activating move reports true
        assert!(!gesture.move_to(Point::new(40.0, 40.0), 8.0));
    }

    #[test]
    fn test_only_palette_payloads_name_a_block() {
        assert_eq!(DragPayload::palette("hero").palette_block_type(), Some("hero"));
        assert_eq!(DragPayload::new("text/plain", "hero").palette_block_type(), None);
        assert_eq!(DragPayload::new(PALETTE_MIME, "").palette_block_type(), None);
    }
}
