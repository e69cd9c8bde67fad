//! # Schematics
//!
//! A small retained drawing model for the technical sketches that accompany
//! calculation results (engine layout, cylinder section, crankshaft top view,
//! wing profile, ...). Shapes are expressed in drawing units (usually mm) with
//! the y axis pointing up. Front ends map them onto their own canvas; the
//! [`Schematic::to_svg`] renderer is used by the command line.
//!
//! ## Example
//!
//! ```rust
//! use cao_core::schematic::{Rgb, Schematic};
//!
//! let mut s = Schematic::new("Coupe");
//! s.rect(0.0, 0.0, 40.0, 20.0, Some(Rgb::from_hex(0xdde3f8)), Rgb::BLACK);
//! s.label(20.0, 25.0, "Cyl 1", Rgb::from_hex(0x117755));
//!
//! let b = s.bounds().unwrap();
//! assert_eq!(b.max_x, 40.0);
//! assert!(s.to_svg(400.0, 200.0).starts_with("<svg"));
//! ```

use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x11, 0x11, 0x11);
    pub const GREY: Rgb = Rgb(0xcc, 0xcc, 0xcc);

    /// Build from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Rgb(((hex >> 16) & 0xff) as u8, ((hex >> 8) & 0xff) as u8, (hex & 0xff) as u8)
    }

    /// `#rrggbb` notation
    pub fn to_hex_string(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Components as floats in `[0, 1]`
    pub fn to_f32(self) -> [f32; 3] {
        [self.0 as f32 / 255.0, self.1 as f32 / 255.0, self.2 as f32 / 255.0]
    }
}

/// Horizontal anchor of a text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// One drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum Shape {
    /// Axis-aligned rectangle with its lower-left corner at `(x, y)`
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Rgb>,
        stroke: Rgb,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Option<Rgb>,
        stroke: Rgb,
    },
    Polyline {
        points: Vec<[f64; 2]>,
        stroke: Rgb,
        width: f64,
        dashed: bool,
    },
    Label {
        x: f64,
        y: f64,
        text: String,
        color: Rgb,
        anchor: Anchor,
    },
}

/// Drawing extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    fn point(x: f64, y: f64) -> Self {
        Bounds {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Grow on every side by `fraction` of the largest dimension.
    pub fn padded(&self, fraction: f64) -> Self {
        let pad = self.width().max(self.height()).max(1e-9) * fraction;
        Bounds {
            min_x: self.min_x - pad,
            min_y: self.min_y - pad,
            max_x: self.max_x + pad,
            max_y: self.max_y + pad,
        }
    }
}

/// A titled list of shapes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schematic {
    pub title: String,
    pub shapes: Vec<Shape>,
    /// Keep x and y on the same scale
    pub equal_aspect: bool,
}

impl Schematic {
    pub fn new(title: impl Into<String>) -> Self {
        Schematic {
            title: title.into(),
            shapes: Vec::new(),
            equal_aspect: true,
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Option<Rgb>, stroke: Rgb) -> &mut Self {
        self.shapes.push(Shape::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        });
        self
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: Option<Rgb>, stroke: Rgb) -> &mut Self {
        self.shapes.push(Shape::Circle { cx, cy, r, fill, stroke });
        self
    }

    pub fn line(&mut self, points: Vec<[f64; 2]>, stroke: Rgb, width: f64) -> &mut Self {
        self.shapes.push(Shape::Polyline {
            points,
            stroke,
            width,
            dashed: false,
        });
        self
    }

    pub fn dashed(&mut self, points: Vec<[f64; 2]>, stroke: Rgb, width: f64) -> &mut Self {
        self.shapes.push(Shape::Polyline {
            points,
            stroke,
            width,
            dashed: true,
        });
        self
    }

    pub fn label(&mut self, x: f64, y: f64, text: impl Into<String>, color: Rgb) -> &mut Self {
        self.shapes.push(Shape::Label {
            x,
            y,
            text: text.into(),
            color,
            anchor: Anchor::Middle,
        });
        self
    }

    pub fn label_at(&mut self, x: f64, y: f64, text: impl Into<String>, color: Rgb, anchor: Anchor) -> &mut Self {
        self.shapes.push(Shape::Label {
            x,
            y,
            text: text.into(),
            color,
            anchor,
        });
        self
    }

    /// Extents of every shape, `None` for an empty drawing.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = Vec::new();
        for shape in &self.shapes {
            match shape {
                Shape::Rect { x, y, width, height, .. } => {
                    points.push((*x, *y));
                    points.push((x + width, y + height));
                }
                Shape::Circle { cx, cy, r, .. } => {
                    points.push((cx - r, cy - r));
                    points.push((cx + r, cy + r));
                }
                Shape::Polyline { points: line, .. } => {
                    points.extend(line.iter().map(|[x, y]| (*x, *y)));
                }
                Shape::Label { x, y, .. } => points.push((*x, *y)),
            }
        }
        let mut iter = points.into_iter();
        let (x0, y0) = iter.next()?;
        Some(iter.fold(Bounds::point(x0, y0), |mut b, (x, y)| {
            b.include(x, y);
            b
        }))
    }

    /// Render to a standalone SVG document of the given pixel size.
    pub fn to_svg(&self, width_px: f64, height_px: f64) -> String {
        let mut out = String::new();
        let title_h = 24.0;
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width_px,
            h = height_px
        );
        let _ = writeln!(out, r#"  <rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            out,
            r#"  <text x="{}" y="16" font-family="sans-serif" font-size="13" text-anchor="middle">{}</text>"#,
            width_px / 2.0,
            escape(&self.title)
        );

        let Some(bounds) = self.bounds() else {
            let _ = writeln!(out, "</svg>");
            return out;
        };
        let view = Viewport::fit(bounds.padded(0.05), width_px, height_px - title_h, title_h, self.equal_aspect);

        for shape in &self.shapes {
            match shape {
                Shape::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                    stroke,
                } => {
                    let (px, py) = view.map(*x, y + height);
                    let _ = writeln!(
                        out,
                        r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" stroke="{}" stroke-width="1.5"/>"#,
                        px,
                        py,
                        width * view.sx,
                        height * view.sy,
                        fill_attr(*fill),
                        stroke.to_hex_string()
                    );
                }
                Shape::Circle { cx, cy, r, fill, stroke } => {
                    let (px, py) = view.map(*cx, *cy);
                    let _ = writeln!(
                        out,
                        r#"  <ellipse cx="{:.2}" cy="{:.2}" rx="{:.2}" ry="{:.2}" fill="{}" stroke="{}" stroke-width="1.5"/>"#,
                        px,
                        py,
                        r * view.sx,
                        r * view.sy,
                        fill_attr(*fill),
                        stroke.to_hex_string()
                    );
                }
                Shape::Polyline {
                    points,
                    stroke,
                    width,
                    dashed,
                } => {
                    let mut coords = String::new();
                    for [x, y] in points {
                        let (px, py) = view.map(*x, *y);
                        let _ = write!(coords, "{:.2},{:.2} ", px, py);
                    }
                    let dash = if *dashed { r#" stroke-dasharray="6 4""# } else { "" };
                    let _ = writeln!(
                        out,
                        r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="{}"{}/>"#,
                        coords.trim_end(),
                        stroke.to_hex_string(),
                        width,
                        dash
                    );
                }
                Shape::Label {
                    x,
                    y,
                    text,
                    color,
                    anchor,
                } => {
                    let (px, py) = view.map(*x, *y);
                    let anchor = match anchor {
                        Anchor::Start => "start",
                        Anchor::Middle => "middle",
                        Anchor::End => "end",
                    };
                    let _ = writeln!(
                        out,
                        r#"  <text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="10" fill="{}" text-anchor="{}">{}</text>"#,
                        px,
                        py,
                        color.to_hex_string(),
                        anchor,
                        escape(text)
                    );
                }
            }
        }
        let _ = writeln!(out, "</svg>");
        out
    }
}

/// World-to-pixel mapping with the y axis flipped.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    bounds: Bounds,
    pub sx: f64,
    pub sy: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Viewport {
    /// Fit `bounds` into a `width` x `height` area starting `top` pixels down.
    pub fn fit(bounds: Bounds, width: f64, height: f64, top: f64, equal_aspect: bool) -> Self {
        let bw = bounds.width().max(1e-9);
        let bh = bounds.height().max(1e-9);
        let (mut sx, mut sy) = (width / bw, height / bh);
        if equal_aspect {
            let s = sx.min(sy);
            sx = s;
            sy = s;
        }
        Viewport {
            bounds,
            sx,
            sy,
            offset_x: (width - bw * sx) / 2.0,
            offset_y: top + (height - bh * sy) / 2.0,
        }
    }

    pub fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.offset_x + (x - self.bounds.min_x) * self.sx,
            self.offset_y + (self.bounds.max_y - y) * self.sy,
        )
    }
}

fn fill_attr(fill: Option<Rgb>) -> String {
    fill.map(Rgb::to_hex_string).unwrap_or_else(|| "none".to_string())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(Rgb::from_hex(0xef767a), Rgb(0xef, 0x76, 0x7a));
        assert_eq!(Rgb(1, 2, 255).to_hex_string(), "#0102ff");
    }

    #[test]
    fn test_bounds() {
        let mut s = Schematic::new("t");
        s.circle(10.0, 10.0, 5.0, None, Rgb::BLACK);
        s.line(vec![[-3.0, 0.0], [30.0, 2.0]], Rgb::BLACK, 1.0);
        let b = s.bounds().unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (-3.0, 0.0, 30.0, 15.0));
        assert!(Schematic::new("empty").bounds().is_none());
    }

    #[test]
    fn test_viewport_flips_y() {
        let b = Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 10.0,
            max_y: 10.0,
        };
        let v = Viewport::fit(b, 100.0, 100.0, 0.0, true);
        assert_eq!(v.map(0.0, 0.0), (0.0, 100.0));
        assert_eq!(v.map(10.0, 10.0), (100.0, 0.0));
    }

    #[test]
    fn test_svg_escapes_labels() {
        let mut s = Schematic::new("A & B");
        s.label(0.0, 0.0, "<x>", Rgb::BLACK);
        let svg = s.to_svg(200.0, 100.0);
        assert!(svg.contains("A &amp; B"));
        assert!(svg.contains("&lt;x&gt;"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
