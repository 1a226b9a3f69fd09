//! Axis-aligned box geometry in normalized viewport space.

/// Center-size box in normalized viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxGeometry {
    /// Horizontal center.
    pub center_x: f32,
    /// Vertical center.
    pub center_y: f32,
    /// Width; may be non-positive for degenerate decodes.
    pub width: f32,
    /// Height; may be non-positive for degenerate decodes.
    pub height: f32,
}

impl BoxGeometry {
    /// Creates a box from its center and size.
    pub fn new(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self {
            center_x,
            center_y,
            width,
            height,
        }
    }

    /// Returns `(left, right, top, bottom)` with `top` the larger y value.
    pub fn edges(&self) -> (f32, f32, f32, f32) {
        let half_w = self.width * 0.5;
        let half_h = self.height * 0.5;
        (
            self.center_x - half_w,
            self.center_x + half_w,
            self.center_y + half_h,
            self.center_y - half_h,
        )
    }

    /// Returns the area, treating non-positive extents as zero.
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// Intersection-over-union of two boxes.
///
/// Returns 0 when the intersection is empty or the union has no area, except
/// that two identical boxes always score 1.
pub fn iou(a: &BoxGeometry, b: &BoxGeometry) -> f32 {
    let (a_left, a_right, a_top, a_bottom) = a.edges();
    let (b_left, b_right, b_top, b_bottom) = b.edges();

    let inter_left = a_left.max(b_left);
    let inter_right = a_right.min(b_right);
    let inter_top = a_top.min(b_top);
    let inter_bottom = a_bottom.max(b_bottom);

    if inter_left > inter_right || inter_bottom > inter_top {
        return if a == b { 1.0 } else { 0.0 };
    }

    let intersection = (inter_right - inter_left) * (inter_top - inter_bottom);
    let union = a.area() + b.area() - intersection;
    if union > 0.0 {
        intersection / union
    } else if a == b {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{iou, BoxGeometry};

    #[test]
    fn identical_boxes_have_unit_iou() {
        let a = BoxGeometry::new(0.5, 0.5, 0.2, 0.4);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn disjoint_boxes_have_zero_iou() {
        let a = BoxGeometry::new(0.2, 0.2, 0.1, 0.1);
        let b = BoxGeometry::new(0.8, 0.8, 0.1, 0.1);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn touching_boxes_have_zero_iou() {
        let a = BoxGeometry::new(0.25, 0.5, 0.5, 0.5);
        let b = BoxGeometry::new(0.75, 0.5, 0.5, 0.5);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn half_shifted_boxes_match_closed_form() {
        // Unit squares offset by half a width: inter 0.5, union 1.5.
        let a = BoxGeometry::new(0.0, 0.0, 1.0, 1.0);
        let b = BoxGeometry::new(0.5, 0.0, 1.0, 1.0);
        assert!((iou(&a, &b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn contained_box_uses_area_ratio() {
        let outer = BoxGeometry::new(0.5, 0.5, 0.4, 0.4);
        let inner = BoxGeometry::new(0.5, 0.5, 0.2, 0.2);
        assert!((iou(&outer, &inner) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn degenerate_boxes_never_overlap_others() {
        let real = BoxGeometry::new(0.5, 0.5, 0.4, 0.4);
        let flat = BoxGeometry::new(0.5, 0.5, 0.0, 0.2);
        let inverted = BoxGeometry::new(0.5, 0.5, -0.2, -0.2);
        assert_eq!(iou(&real, &flat), 0.0);
        assert_eq!(iou(&real, &inverted), 0.0);
        assert_eq!(inverted.area(), 0.0);
        assert_eq!(iou(&flat, &BoxGeometry::new(0.5, 0.5, 0.0, 0.1)), 0.0);
    }

    #[test]
    fn identical_degenerate_boxes_overlap_fully() {
        let flat = BoxGeometry::new(0.5, 0.5, 0.0, 0.2);
        let inverted = BoxGeometry::new(0.3, 0.3, -0.1, 0.1);
        assert_eq!(iou(&flat, &flat), 1.0);
        assert_eq!(iou(&inverted, &inverted), 1.0);
    }
}
