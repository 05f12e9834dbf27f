use crate::{Line, Point};

/// The two wings of an arrowhead, meeting at `tip`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrowhead {
    pub tip: Point,
    pub left: Point,
    pub right: Point,
}

impl Arrowhead {
    /// Triangle vertices, tip first.
    pub fn points(&self) -> [Point; 3] {
        [self.tip, self.left, self.right]
    }

    pub fn lines(&self) -> [Line; 2] {
        [Line::new(self.left, self.tip), Line::new(self.right, self.tip)]
    }
}

/// Arrowhead for the segment `from -> to`, with its tip at `to`.
///
/// `length` is measured back along the segment and `width` out to each side.
/// A zero-length segment has no direction and yields `None`.
pub fn arrowhead(from: Point, to: Point, length: f64, width: f64) -> Option<Arrowhead> {
    let d = to - from;
    let len = d.length();
    let n = d.normalized()?;

    let base = from + n * (len - length);
    let side = Point::new(-n.y, n.x);

    Some(Arrowhead {
        tip: to,
        left: base + side * width,
        right: base - side * width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_point_eq;

    #[test]
    fn test_arrowhead_horizontal() {
        let head = arrowhead(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 6.0, 3.0).unwrap();
        assert_eq!(head.tip, Point::new(10.0, 0.0));
        assert_point_eq(Point::new(4.0, 3.0), head.left);
        assert_point_eq(Point::new(4.0, -3.0), head.right);
        assert_eq!(head.lines()[0].to, head.tip);
    }

    #[test]
    fn test_arrowhead_zero_length() {
        let p = Point::new(2.0, 2.0);
        assert!(arrowhead(p, p, 6.0, 3.0).is_none());
    }
}
