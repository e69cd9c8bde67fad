//! Canvas drawing of core schematics
//!
//! Uses the same world-to-pixel [`Viewport`] as the SVG export, so the
//! window and the exported file match.

use std::f64::consts::PI;

use iced::widget::canvas::{self, Frame, Geometry, LineDash, Path, Stroke, Text};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use cao_core::schematic::{Anchor, Rgb, Schematic, Shape, Viewport};

use crate::Message;

const TITLE_HEIGHT: f32 = 22.0;
const ELLIPSE_SEGMENTS: usize = 48;

/// Canvas program for one schematic
pub struct SchematicView {
    schematic: Schematic,
}

impl SchematicView {
    pub fn new(schematic: Schematic) -> Self {
        Self { schematic }
    }

    fn draw_shape(&self, frame: &mut Frame, view: &Viewport, shape: &Shape) {
        let point = |x: f64, y: f64| {
            let (px, py) = view.map(x, y);
            Point::new(px as f32, py as f32)
        };

        match shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                let top_left = point(*x, y + height);
                let size = Size::new((width * view.sx) as f32, (height * view.sy) as f32);
                let rect = Path::rectangle(top_left, size);
                if let Some(fill) = fill {
                    frame.fill(&rect, color(*fill));
                }
                frame.stroke(&rect, Stroke::default().with_color(color(*stroke)).with_width(1.5));
            }
            Shape::Circle { cx, cy, r, fill, stroke } => {
                // Ellipse when the axes are scaled differently
                let outline = Path::new(|builder| {
                    for k in 0..=ELLIPSE_SEGMENTS {
                        let a = 2.0 * PI * k as f64 / ELLIPSE_SEGMENTS as f64;
                        let p = point(cx + r * a.cos(), cy + r * a.sin());
                        if k == 0 {
                            builder.move_to(p);
                        } else {
                            builder.line_to(p);
                        }
                    }
                    builder.close();
                });
                if let Some(fill) = fill {
                    frame.fill(&outline, color(*fill));
                }
                frame.stroke(&outline, Stroke::default().with_color(color(*stroke)).with_width(1.5));
            }
            Shape::Polyline {
                points,
                stroke,
                width,
                dashed,
            } => {
                if points.len() < 2 {
                    return;
                }
                let line = Path::new(|builder| {
                    builder.move_to(point(points[0][0], points[0][1]));
                    for [x, y] in &points[1..] {
                        builder.line_to(point(*x, *y));
                    }
                });
                let mut pen = Stroke::default().with_color(color(*stroke)).with_width(*width as f32);
                if *dashed {
                    pen.line_dash = LineDash {
                        segments: &[6.0, 4.0],
                        offset: 0,
                    };
                }
                frame.stroke(&line, pen);
            }
            Shape::Label {
                x,
                y,
                text,
                color: rgb,
                anchor,
            } => {
                let align = match anchor {
                    Anchor::Start => iced::alignment::Horizontal::Left,
                    Anchor::Middle => iced::alignment::Horizontal::Center,
                    Anchor::End => iced::alignment::Horizontal::Right,
                };
                frame.fill_text(Text {
                    content: text.clone(),
                    position: point(*x, *y),
                    color: color(*rgb),
                    size: iced::Pixels(10.0),
                    align_x: align.into(),
                    ..Text::default()
                });
            }
        }
    }
}

impl canvas::Program<Message> for SchematicView {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::WHITE);
        frame.fill_text(Text {
            content: self.schematic.title.clone(),
            position: Point::new(bounds.width / 2.0, 4.0),
            color: super::palette::PRIMARY,
            size: iced::Pixels(13.0),
            align_x: iced::alignment::Horizontal::Center.into(),
            ..Text::default()
        });

        if let Some(extent) = self.schematic.bounds() {
            let view = Viewport::fit(
                extent.padded(0.05),
                bounds.width as f64,
                (bounds.height - TITLE_HEIGHT) as f64,
                TITLE_HEIGHT as f64,
                self.schematic.equal_aspect,
            );
            for shape in &self.schematic.shapes {
                self.draw_shape(&mut frame, &view, shape);
            }
        }

        vec![frame.into_geometry()]
    }
}

fn color(rgb: Rgb) -> Color {
    let [r, g, b] = rgb.to_f32();
    Color::from_rgb(r, g, b)
}
