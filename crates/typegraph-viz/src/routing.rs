//! Where edges are drawn: clipped to vertex outlines, broken around their
//! label, and bent through their band node when they share a vertex pair.

use typegraph_core::VertexShape;
use typegraph_geometry::{
    arc_through_points, arrowhead, diamond_arc_intersect_angles, diamond_incoming_line_intersect,
    ellipse_incoming_line_intersect, midpoint, normalised_angle, rad_to_deg,
    rect_arc_intersect_angles, rect_incoming_line_intersect, sweep_angle, Arc, Arrowhead,
    AngularDirection, Ellipse, Line, Point, Rect,
};

use crate::state::{BandState, EdgeState, VertexState};

pub const ARROW_LENGTH: f64 = 6.0;
pub const ARROW_WIDTH: f64 = 3.0;

/// Clearance between a box or diamond outline and the end of an edge.
const OUTLINE_PADDING: f64 = 4.0;
const ELLIPSE_PADDING: f64 = 2.0;

const LABEL_CHAR_WIDTH: f64 = 8.0;
const LABEL_TEXT_HEIGHT: f64 = 14.0;
const LABEL_PADDING: f64 = 2.0;

/// One drawable piece of an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgePiece {
    Line(Line),
    Arc(Arc),
}

/// The drawable form of an edge.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeRoute {
    /// Up to two line segments, one either side of the label.
    Straight {
        segments: Vec<Line>,
        arrowhead: Option<Arrowhead>,
        label_rect: Rect,
    },
    /// A banded edge curving through its band node. A piece falls back to a
    /// line when the arc around the label would sweep half a circle or more.
    Arc {
        pieces: Vec<EdgePiece>,
        arrowhead: Option<Arrowhead>,
        label_rect: Rect,
    },
}

impl EdgeRoute {
    pub fn label_rect(&self) -> Rect {
        match self {
            EdgeRoute::Straight { label_rect, .. } | EdgeRoute::Arc { label_rect, .. } => *label_rect,
        }
    }

    pub fn arrowhead(&self) -> Option<Arrowhead> {
        match self {
            EdgeRoute::Straight { arrowhead, .. } | EdgeRoute::Arc { arrowhead, .. } => *arrowhead,
        }
    }
}

/// Where an edge coming from `source` meets the padded outline of `vertex`.
pub fn edge_endpoint(source: Point, vertex: &VertexState) -> Option<Point> {
    match vertex.shape() {
        VertexShape::RoundedRect => rect_incoming_line_intersect(source, vertex.rect().inflate(OUTLINE_PADDING)),
        VertexShape::Diamond => diamond_incoming_line_intersect(source, vertex.rect().inflate(OUTLINE_PADDING)),
        VertexShape::Ellipse => Some(ellipse_incoming_line_intersect(
            source,
            Ellipse::new(
                vertex.position.x,
                vertex.position.y,
                vertex.width / 2.0 + ELLIPSE_PADDING,
                vertex.height / 2.0 + ELLIPSE_PADDING,
            ),
        )),
    }
}

/// Space reserved for `label` centred on `centre`, with a little padding.
///
/// Text is measured at a fixed width per character.
pub fn label_rect(centre: Point, label: &str) -> Rect {
    let chars = label.chars().count() as f64;
    Rect::from_center_size(
        centre,
        chars * LABEL_CHAR_WIDTH + 2.0 * LABEL_PADDING,
        LABEL_TEXT_HEIGHT + 2.0 * LABEL_PADDING,
    )
}

/// Polar angle on `arc` where it leaves the padded outline of `vertex`.
///
/// Ellipses are approximated by their inscribed diamond.
fn arc_end_angle(arc: Arc, vertex: &VertexState) -> Option<f64> {
    let outline = vertex.rect().inflate(OUTLINE_PADDING);
    let hits = match vertex.shape() {
        VertexShape::RoundedRect => rect_arc_intersect_angles(arc, outline),
        VertexShape::Diamond | VertexShape::Ellipse => diamond_arc_intersect_angles(arc, outline),
    };
    hits.first().copied()
}

/// Segment from `line_source` up to the label box.
fn segment_into_label(line_source: Point, label: Rect) -> Option<Line> {
    rect_incoming_line_intersect(line_source, label).map(|end| Line::new(line_source, end))
}

/// Segment from the label box to `line_target`, with its arrowhead.
fn segment_out_of_label(label: Rect, line_target: Point) -> Option<(Line, Option<Arrowhead>)> {
    let start = rect_incoming_line_intersect(line_target, label)?;
    Some((
        Line::new(start, line_target),
        arrowhead(start, line_target, ARROW_LENGTH, ARROW_WIDTH),
    ))
}

/// Segments either side of `label_rect`. A missing endpoint drops its segment.
fn straight_route(source: Option<Point>, target: Option<Point>, label_rect: Rect) -> EdgeRoute {
    let mut segments = Vec::with_capacity(2);
    let mut head = None;
    if let Some(segment) = source.and_then(|s| segment_into_label(s, label_rect)) {
        segments.push(segment);
    }
    if let Some((segment, arrow)) = target.and_then(|t| segment_out_of_label(label_rect, t)) {
        segments.push(segment);
        head = arrow;
    }
    EdgeRoute::Straight {
        segments,
        arrowhead: head,
        label_rect,
    }
}

/// Compute how `edge` should be drawn between `source` and `target`.
///
/// `band` is the edge's band entry, if it has one. Returns `None` when the
/// edge cannot be drawn, typically because one vertex sits inside the other.
pub fn route_edge(
    edge: &EdgeState,
    source: &VertexState,
    target: &VertexState,
    band: Option<&BandState>,
) -> Option<EdgeRoute> {
    let Some(band) = band else {
        let line_source = edge_endpoint(target.position, source)?;
        let line_target = edge_endpoint(source.position, target)?;
        let label = label_rect(midpoint(source.position, target.position), &edge.label);
        return Some(straight_route(Some(line_source), Some(line_target), label));
    };

    let label = label_rect(band.position, &edge.label);
    let line_source = edge_endpoint(label.center(), source);
    let line_target = edge_endpoint(label.center(), target);

    // nearly collinear points have no usable arc
    let Some(full_arc) = arc_through_points(source.position, band.position, target.position) else {
        return Some(straight_route(line_source, line_target, label));
    };

    let start_angle = arc_end_angle(full_arc, source)?;
    let end_angle = arc_end_angle(full_arc, target)?;
    let direction = full_arc.direction();
    let centre = full_arc.center();
    let label_angle = normalised_angle(rad_to_deg(
        (band.position.y - centre.y).atan2(band.position.x - centre.x),
    ));

    let mut pieces = Vec::with_capacity(2);
    let mut head = None;

    let towards_label = Arc {
        sweep_angle: sweep_angle(full_arc.start_angle, label_angle, direction),
        ..full_arc
    };
    if let Some(&label_entry) = rect_arc_intersect_angles(towards_label, label).first() {
        let sweep = sweep_angle(start_angle, label_entry, direction);
        if sweep.abs() < 180.0 {
            pieces.push(EdgePiece::Arc(Arc {
                start_angle,
                sweep_angle: sweep,
                ..full_arc
            }));
        } else if let Some(segment) = line_source.and_then(|s| segment_into_label(s, label)) {
            pieces.push(EdgePiece::Line(segment));
        }
    }

    let away_from_label = Arc {
        start_angle: label_angle,
        sweep_angle: sweep_angle(label_angle, full_arc.end_angle(), direction),
        ..full_arc
    };
    if let Some(&label_exit) = rect_arc_intersect_angles(away_from_label, label).first() {
        let sweep = sweep_angle(label_exit, end_angle, direction);
        if sweep.abs() < 180.0 {
            pieces.push(EdgePiece::Arc(Arc {
                start_angle: label_exit,
                sweep_angle: sweep,
                ..full_arc
            }));
            let approach = match direction {
                AngularDirection::Clockwise => end_angle - 1.0,
                AngularDirection::CounterClockwise => end_angle + 1.0,
            };
            head = arrowhead(
                full_arc.offset_at_angle(normalised_angle(approach)),
                full_arc.offset_at_angle(end_angle),
                ARROW_LENGTH,
                ARROW_WIDTH,
            );
        } else if let Some((segment, arrow)) = line_target.and_then(|t| segment_out_of_label(label, t)) {
            pieces.push(EdgePiece::Line(segment));
            head = arrow;
        }
    }

    Some(EdgeRoute::Arc {
        pieces,
        arrowhead: head,
        label_rect: label,
    })
}
