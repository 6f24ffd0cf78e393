//! Drawing geometry for a spacetime diagram, shared by the terminal canvas and
//! image export.
//!
//! Coordinates here are pixels: the origin sits at the bottom centre of the
//! drawing area, `x` grows to the right and `t` grows upwards.

use crate::objects::ObjectList;
use crate::relativity::ObserverFrame;
use crate::spacetime::SpacetimeEntity;

/// Colours worldlines and events cycle through.
pub const PALETTE: [Colour; 3] = [Colour::Red, Colour::Blue, Colour::Green];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    Red,
    Blue,
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub t: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// One drawable element of the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Dot {
        at: Point,
        colour: Colour,
        label: Option<String>,
    },
    Worldline {
        line: Segment,
        /// The reference point the worldline passes through.
        anchor: Point,
        colour: Colour,
        label: Option<String>,
    },
    LightCone(Segment),
}

/// Size and options of the drawing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramView {
    pub width: f64,
    pub height: f64,
    pub pixels_per_unit: f64,
    pub light_cone: bool,
    pub labels: bool,
}

impl Default for DiagramView {
    fn default() -> Self {
        Self {
            width: 750.0,
            height: 500.0,
            pixels_per_unit: 25.0,
            light_cone: false,
            labels: true,
        }
    }
}

impl DiagramView {
    /// Change the drawing area, scaling the units with the width so the diagram
    /// keeps its proportions.
    pub fn resize(&mut self, width: f64, height: f64) {
        if self.width > 0.0 {
            self.pixels_per_unit *= width / self.width;
        }
        self.width = width;
        self.height = height;
    }

    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    pub fn to_pixels(&self, x: f64, t: f64) -> Point {
        Point {
            x: x * self.pixels_per_unit,
            t: t * self.pixels_per_unit,
        }
    }

    /// The `x` axis along `t = 0` and the `t` axis up the middle.
    pub fn axes(&self) -> [Segment; 2] {
        let half = self.half_width();
        [
            Segment {
                from: Point { x: -half, t: 0.0 },
                to: Point { x: half, t: 0.0 },
            },
            Segment {
                from: Point { x: 0.0, t: 0.0 },
                to: Point { x: 0.0, t: self.height },
            },
        ]
    }

    /// A worldline starting at `intercept` on the `x` axis and moving at `beta`,
    /// cut off at the top of the drawing area or at the side edge it would
    /// cross first.
    pub fn worldline(&self, intercept: f64, beta: f64) -> Segment {
        let half = self.half_width();
        let mut dt = self.height;
        let mut dx = dt * beta;

        if beta != 0.0 && (intercept + dx).abs() > half {
            dx = half.copysign(dx) - intercept;
            dt = dx / beta;
        }

        Segment {
            from: Point { x: intercept, t: 0.0 },
            to: Point {
                x: intercept + dx,
                t: dt,
            },
        }
    }

    /// Everything to draw for `objects` as seen from `frame`.
    pub fn scene(&self, objects: &ObjectList, frame: &ObserverFrame) -> Vec<Mark> {
        let mut marks = Vec::with_capacity(objects.len() + 2);

        if self.light_cone {
            marks.push(Mark::LightCone(self.worldline(0.0, -1.0)));
            marks.push(Mark::LightCone(self.worldline(0.0, 1.0)));
        }

        for (i, object) in objects.iter().enumerate() {
            let colour = PALETTE[i % PALETTE.len()];
            let at = self.to_pixels(object.x(frame), object.t(frame));
            let label = self.labels.then(|| object.name().to_string());

            marks.push(match object {
                SpacetimeEntity::Traveller(traveller) => {
                    let intercept = traveller.x_intercept(frame) * self.pixels_per_unit;
                    Mark::Worldline {
                        line: self.worldline(intercept, traveller.beta(frame)),
                        anchor: at,
                        colour,
                        label,
                    }
                }
                SpacetimeEntity::Event(_) => Mark::Dot { at, colour, label },
            });
        }

        marks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relativity::{LorentzTransform, SpeedOfLight};

    fn rest() -> ObserverFrame {
        ObserverFrame::with_transform(0.0, LorentzTransform::new(SpeedOfLight::Normalized)).unwrap()
    }

    #[test]
    fn test_worldline_reaches_top() {
        let view = DiagramView::default();
        let line = view.worldline(10.0, 0.5);
        assert_eq!(line.from, Point { x: 10.0, t: 0.0 });
        assert_eq!(line.to, Point { x: 260.0, t: 500.0 });
    }

    #[test]
    fn test_worldline_clipped_at_side() {
        let view = DiagramView::default();
        // light ray to the right hits the edge at x = 375 before the top
        let line = view.worldline(0.0, 1.0);
        assert_eq!(line.to, Point { x: 375.0, t: 375.0 });

        let line = view.worldline(-100.0, -0.9);
        assert!((line.to.x + 375.0).abs() < 1e-9);
        assert!((line.to.t - 275.0 / 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_stationary_worldline_is_vertical() {
        let view = DiagramView::default();
        let line = view.worldline(-50.0, 0.0);
        assert_eq!(line.to, Point { x: -50.0, t: 500.0 });
    }

    #[test]
    fn test_scene_marks() {
        let mut objects = ObjectList::new();
        objects.push(SpacetimeEntity::event("baz", 2.0, -2.0));
        objects.push(SpacetimeEntity::traveller("foo", 0.1, 0.0, 0.0).unwrap());

        let view = DiagramView {
            light_cone: true,
            ..DiagramView::default()
        };
        let marks = view.scene(&objects, &rest());
        assert_eq!(marks.len(), 4);
        assert!(matches!(marks[0], Mark::LightCone(_)));
        assert_eq!(
            marks[2],
            Mark::Dot {
                at: Point { x: -50.0, t: 50.0 },
                colour: Colour::Red,
                label: Some("baz".to_string()),
            }
        );
        match &marks[3] {
            Mark::Worldline { line, colour, .. } => {
                assert_eq!(*colour, Colour::Blue);
                assert_eq!(line.from.x, 0.0);
                assert!((line.to.x - 50.0).abs() < 1e-9);
            }
            other => panic!("expected worldline, got {other:?}"),
        }
    }

    #[test]
    fn test_resize_scales_units() {
        let mut view = DiagramView::default();
        view.resize(1500.0, 400.0);
        assert_eq!(view.pixels_per_unit, 50.0);
        assert_eq!(view.height, 400.0);
    }
}
