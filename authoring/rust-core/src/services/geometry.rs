//! Hotspot geometry: maps pointer coordinates on a letterboxed image
//! to resolution-independent percentages of the rendered image, and
//! back. Reproduces `object-fit: contain` scaling.

/// Width/height in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Pointer position in container-local device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Position as a percentage of the rendered image, `[0, 100]` on both
/// axes, rounded to 0.1 (the storage precision contract).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

/// How a natural-resolution image sits inside a container under
/// contain-fit scaling. Derived state: recomputed on every image-load
/// and container-resize event, never persisted or cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBounds {
    pub container_width: f64,
    pub container_height: f64,
    pub natural_width: f64,
    pub natural_height: f64,
    pub rendered_width: f64,
    pub rendered_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub natural_aspect_ratio: f64,
    pub container_aspect_ratio: f64,
}

/// Contain-fit letterbox math. Returns `None` when either size is
/// degenerate (image not yet loaded, failed to load, or a collapsed
/// container), in which case all conversions must reject.
pub fn compute_bounds(container: Size, natural: Size) -> Option<ImageBounds> {
    if !container.is_valid() || !natural.is_valid() {
        return None;
    }

    let natural_aspect_ratio = natural.width / natural.height;
    let container_aspect_ratio = container.width / container.height;

    let (rendered_width, rendered_height, offset_x, offset_y) =
        if natural_aspect_ratio > container_aspect_ratio {
            // Image wider than container: width-limited, bars top/bottom.
            let rendered_width = container.width;
            let rendered_height = container.width / natural_aspect_ratio;
            (
                rendered_width,
                rendered_height,
                0.0,
                (container.height - rendered_height) / 2.0,
            )
        } else {
            // Height-limited, bars left/right.
            let rendered_height = container.height;
            let rendered_width = container.height * natural_aspect_ratio;
            (
                rendered_width,
                rendered_height,
                (container.width - rendered_width) / 2.0,
                0.0,
            )
        };

    Some(ImageBounds {
        container_width: container.width,
        container_height: container.height,
        natural_width: natural.width,
        natural_height: natural.height,
        rendered_width,
        rendered_height,
        offset_x,
        offset_y,
        natural_aspect_ratio,
        container_aspect_ratio,
    })
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Converts a pointer position to image percentages. Returns `None`
/// for pointers in the letterbox margin; the caller holds the last
/// valid position instead of clamping to the nearest edge.
pub fn pointer_to_percent(pointer: Point, bounds: &ImageBounds) -> Option<PercentPoint> {
    let within_x =
        pointer.x >= bounds.offset_x && pointer.x <= bounds.offset_x + bounds.rendered_width;
    let within_y =
        pointer.y >= bounds.offset_y && pointer.y <= bounds.offset_y + bounds.rendered_height;
    if !within_x || !within_y {
        return None;
    }

    let x = (pointer.x - bounds.offset_x) / bounds.rendered_width * 100.0;
    let y = (pointer.y - bounds.offset_y) / bounds.rendered_height * 100.0;
    Some(PercentPoint {
        x: round_tenth(x.clamp(0.0, 100.0)),
        y: round_tenth(y.clamp(0.0, 100.0)),
    })
}

/// Inverse of [`pointer_to_percent`]; used when rendering the marker.
pub fn percent_to_pointer(percent: PercentPoint, bounds: &ImageBounds) -> Point {
    Point {
        x: bounds.offset_x + percent.x / 100.0 * bounds.rendered_width,
        y: bounds.offset_y + percent.y / 100.0 * bounds.rendered_height,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging,
}

/// Drag interaction for one hotspot marker.
///
/// `Idle -> Dragging` on pointer-down on the marker; every in-bounds
/// move while dragging commits a new position immediately (live visual
/// feedback, no buffering); `Dragging -> Idle` on pointer-up anywhere
/// in the document. Moves landing in the letterbox margin are ignored
/// so the marker never jumps discontinuously.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    container: Option<Size>,
    natural: Option<Size>,
    dragging: bool,
    position: Option<PercentPoint>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        if self.dragging {
            DragState::Dragging
        } else {
            DragState::Idle
        }
    }

    /// Last committed marker position.
    pub fn position(&self) -> Option<PercentPoint> {
        self.position
    }

    /// Seeds the marker position from the stored item.
    pub fn set_position(&mut self, position: PercentPoint) {
        self.position = Some(PercentPoint {
            x: position.x.clamp(0.0, 100.0),
            y: position.y.clamp(0.0, 100.0),
        });
    }

    /// Recomputed from the event sources on demand; never cached
    /// across resizes.
    pub fn bounds(&self) -> Option<ImageBounds> {
        compute_bounds(self.container?, self.natural?)
    }

    pub fn image_loaded(&mut self, container: Size, natural: Size) {
        self.container = Some(container);
        self.natural = Some(natural);
    }

    /// Image failed to load: bounds become unavailable and every
    /// conversion rejects until a new load succeeds.
    pub fn image_failed(&mut self) {
        self.natural = None;
        self.dragging = false;
    }

    pub fn container_resized(&mut self, container: Size) {
        self.container = Some(container);
    }

    /// Pointer-down starts a drag only when it lands on the marker
    /// (within `marker_radius` device pixels of its rendered center).
    pub fn pointer_down(&mut self, pointer: Point, marker_radius: f64) -> bool {
        let (bounds, position) = match (self.bounds(), self.position) {
            (Some(bounds), Some(position)) => (bounds, position),
            _ => return false,
        };
        let marker = percent_to_pointer(position, &bounds);
        let dx = pointer.x - marker.x;
        let dy = pointer.y - marker.y;
        if dx * dx + dy * dy <= marker_radius * marker_radius {
            self.dragging = true;
        }
        self.dragging
    }

    /// While dragging, commits and returns the new position for every
    /// move inside the rendered image. Margin moves and moves with
    /// unavailable bounds return `None` and the position holds.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<PercentPoint> {
        if !self.dragging {
            return None;
        }
        let bounds = self.bounds()?;
        let committed = pointer_to_percent(pointer, &bounds)?;
        self.position = Some(committed);
        Some(committed)
    }

    /// Pointer-up anywhere in the document ends the drag; the pointer
    /// may have left the container mid-drag.
    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Closing the dialog discards the in-progress drag.
    pub fn cancel(&mut self) {
        self.dragging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{
        compute_bounds, percent_to_pointer, pointer_to_percent, DragSession, DragState,
        PercentPoint, Point, Size,
    };

    fn wide_in_square() -> super::ImageBounds {
        compute_bounds(Size::new(400.0, 400.0), Size::new(1920.0, 1080.0)).unwrap()
    }

    #[test]
    fn wide_image_is_width_limited() {
        let bounds = wide_in_square();
        assert_eq!(bounds.rendered_width, 400.0);
        assert_eq!(bounds.rendered_height, 225.0);
        assert_eq!(bounds.offset_x, 0.0);
        assert_eq!(bounds.offset_y, 87.5);
    }

    #[test]
    fn tall_image_is_height_limited() {
        let bounds = compute_bounds(Size::new(400.0, 400.0), Size::new(600.0, 1200.0)).unwrap();
        assert_eq!(bounds.rendered_height, 400.0);
        assert_eq!(bounds.rendered_width, 200.0);
        assert_eq!(bounds.offset_x, 100.0);
        assert_eq!(bounds.offset_y, 0.0);
    }

    #[test]
    fn degenerate_sizes_have_no_bounds() {
        assert!(compute_bounds(Size::new(0.0, 400.0), Size::new(100.0, 100.0)).is_none());
        assert!(compute_bounds(Size::new(400.0, 400.0), Size::new(100.0, 0.0)).is_none());
        assert!(compute_bounds(Size::new(400.0, 400.0), Size::new(f64::NAN, 100.0)).is_none());
    }

    #[test]
    fn pointer_maps_to_rounded_percent() {
        let bounds = wide_in_square();
        let percent = pointer_to_percent(Point::new(200.0, 100.0), &bounds).unwrap();
        assert_eq!(percent.x, 50.0);
        assert_eq!(percent.y, 5.6);
    }

    #[test]
    fn letterbox_margin_is_rejected() {
        let bounds = wide_in_square();
        // Top/bottom bars for a wide image in a square container.
        assert!(pointer_to_percent(Point::new(200.0, 10.0), &bounds).is_none());
        assert!(pointer_to_percent(Point::new(200.0, 390.0), &bounds).is_none());

        // Left/right bars for a tall image.
        let tall = compute_bounds(Size::new(400.0, 400.0), Size::new(600.0, 1200.0)).unwrap();
        assert!(pointer_to_percent(Point::new(50.0, 200.0), &tall).is_none());
        assert!(pointer_to_percent(Point::new(350.0, 200.0), &tall).is_none());
    }

    #[test]
    fn percent_stays_in_range_on_edges() {
        let bounds = wide_in_square();
        let top_left = pointer_to_percent(Point::new(0.0, 87.5), &bounds).unwrap();
        assert_eq!((top_left.x, top_left.y), (0.0, 0.0));
        let bottom_right = pointer_to_percent(Point::new(400.0, 312.5), &bounds).unwrap();
        assert_eq!((bottom_right.x, bottom_right.y), (100.0, 100.0));
    }

    #[test]
    fn round_trip_within_one_pixel() {
        let bounds = wide_in_square();
        for (px, py) in [(13.0, 100.0), (200.0, 150.0), (399.0, 311.0), (57.3, 92.1)] {
            let pointer = Point::new(px, py);
            let percent = pointer_to_percent(pointer, &bounds).unwrap();
            let back = percent_to_pointer(percent, &bounds);
            assert!(
                (back.x - pointer.x).abs() <= 1.0 && (back.y - pointer.y).abs() <= 1.0,
                "round trip drifted: {:?} -> {:?}",
                pointer,
                back
            );
        }
    }

    #[test]
    fn drag_commits_every_valid_move() {
        let mut session = DragSession::new();
        session.image_loaded(Size::new(400.0, 400.0), Size::new(1920.0, 1080.0));
        session.set_position(PercentPoint { x: 50.0, y: 50.0 });

        // Marker renders at (200, 200); press on it.
        assert!(session.pointer_down(Point::new(202.0, 199.0), 16.0));
        assert_eq!(session.state(), DragState::Dragging);

        let committed = session.pointer_move(Point::new(100.0, 150.0)).unwrap();
        assert_eq!(committed.x, 25.0);
        assert_eq!(session.position().unwrap().x, 25.0);

        // Margin move: ignored, position holds.
        assert!(session.pointer_move(Point::new(100.0, 10.0)).is_none());
        assert_eq!(session.position().unwrap().x, 25.0);

        session.pointer_up();
        assert_eq!(session.state(), DragState::Idle);
        assert!(session.pointer_move(Point::new(300.0, 200.0)).is_none());
    }

    #[test]
    fn press_off_the_marker_does_not_drag() {
        let mut session = DragSession::new();
        session.image_loaded(Size::new(400.0, 400.0), Size::new(1920.0, 1080.0));
        session.set_position(PercentPoint { x: 50.0, y: 50.0 });
        assert!(!session.pointer_down(Point::new(40.0, 200.0), 16.0));
        assert_eq!(session.state(), DragState::Idle);
    }

    #[test]
    fn failed_image_rejects_everything() {
        let mut session = DragSession::new();
        session.image_loaded(Size::new(400.0, 400.0), Size::new(1920.0, 1080.0));
        session.set_position(PercentPoint { x: 50.0, y: 50.0 });
        assert!(session.pointer_down(Point::new(200.0, 200.0), 16.0));

        session.image_failed();
        assert_eq!(session.state(), DragState::Idle);
        assert!(session.bounds().is_none());
        assert!(!session.pointer_down(Point::new(200.0, 200.0), 16.0));
        assert!(session.pointer_move(Point::new(200.0, 200.0)).is_none());
    }

    #[test]
    fn resize_recomputes_bounds() {
        let mut session = DragSession::new();
        session.image_loaded(Size::new(400.0, 400.0), Size::new(1920.0, 1080.0));
        assert_eq!(session.bounds().unwrap().rendered_height, 225.0);

        session.container_resized(Size::new(800.0, 450.0));
        let bounds = session.bounds().unwrap();
        assert!((bounds.rendered_width - 800.0).abs() < 1e-9);
        assert_eq!(bounds.rendered_height, 450.0);
        assert_eq!(bounds.offset_y, 0.0);
    }
}
