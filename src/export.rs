use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;
use serde::Serialize;

use crate::objects::ObjectList;
use crate::relativity::ObserverFrame;
use crate::render::{Colour, DiagramView, Mark, Segment};

/// Padding around the drawing area, in pixels.
const PADDING: u32 = 10;
const DOT_RADIUS: i32 = 5;

/// One row of the observed-coordinates table.
#[derive(Debug, Serialize)]
pub struct ObservedRow<'a> {
    pub name: &'a str,
    pub kind: &'static str,
    pub x: f64,
    pub t: f64,
    pub beta: Option<f64>,
    pub x_intercept: Option<f64>,
}

pub fn observed_rows<'a>(objects: &'a ObjectList, frame: &ObserverFrame) -> Vec<ObservedRow<'a>> {
    objects
        .iter()
        .map(|object| {
            let traveller = object.as_traveller();
            ObservedRow {
                name: object.name(),
                kind: object.kind(),
                x: object.x(frame),
                t: object.t(frame),
                beta: traveller.map(|tr| tr.beta(frame)),
                x_intercept: traveller.map(|tr| tr.x_intercept(frame)),
            }
        })
        .collect()
}

/// Write the coordinates of every object as observed from `frame`.
pub fn export_csv(path: &Path, objects: &ObjectList, frame: &ObserverFrame) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in observed_rows(objects, frame) {
        writer.serialize(row)?;
    }
    writer.flush()?;
    log::info!("observed coordinates written to {}", path.display());
    Ok(())
}

fn rgb(colour: Colour) -> RGBColor {
    match colour {
        Colour::Red => RED,
        Colour::Blue => BLUE,
        Colour::Green => GREEN,
    }
}

fn ends(segment: &Segment) -> Vec<(f64, f64)> {
    vec![(segment.from.x, segment.from.t), (segment.to.x, segment.to.t)]
}

/// Render the diagram as seen from `frame` to an image file. The format follows
/// the file extension.
pub fn export_png(path: &Path, objects: &ObjectList, frame: &ObserverFrame, view: &DiagramView) -> Result<()> {
    let size = (
        view.width.round() as u32 + 2 * PADDING,
        view.height.round() as u32 + 2 * PADDING,
    );
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let half = view.half_width();
    let mut chart = ChartBuilder::on(&root)
        .margin(PADDING)
        .build_cartesian_2d(-half..half, 0f64..view.height)?;

    for axis in view.axes() {
        chart.draw_series(LineSeries::new(ends(&axis), BLACK.stroke_width(3)))?;
    }

    let mut labels = Vec::new();
    for mark in view.scene(objects, frame) {
        match mark {
            Mark::LightCone(line) => {
                chart.draw_series(LineSeries::new(ends(&line), YELLOW.stroke_width(3)))?;
            }
            Mark::Dot { at, colour, label } => {
                chart.draw_series(std::iter::once(Circle::new(
                    (at.x, at.t),
                    DOT_RADIUS,
                    rgb(colour).filled(),
                )))?;
                labels.extend(label.map(|text| (text, at)));
            }
            Mark::Worldline {
                line,
                anchor,
                colour,
                label,
            } => {
                chart.draw_series(LineSeries::new(ends(&line), rgb(colour).stroke_width(3)))?;
                labels.extend(label.map(|text| (text, anchor)));
            }
        }
    }

    let offset = f64::from(DOT_RADIUS) * 1.1;
    chart.draw_series(labels.into_iter().map(|(text, at)| {
        Text::new(
            text,
            (at.x + offset, at.t + offset),
            ("sans-serif", 14).into_font().color(&BLACK),
        )
    }))?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("diagram exported to {}", path.display());
    Ok(())
}
