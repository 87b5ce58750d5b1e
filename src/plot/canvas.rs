use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::GraphError;

use super::Point;

pub const BACKGROUND: RGBColor = RGBColor(0xF7, 0xF7, 0xF7);

/// Line colour and width for a stroked path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
  pub color: RGBColor,
  pub width: u32,
}

impl Stroke {
  pub fn new(color: RGBColor, width: u32) -> Self {
    Self { color, width }
  }
}

/// Horizontal anchor for text; the vertical anchor is always the middle
/// of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
  Left,
  Center,
  Right,
}

/// Drawing primitives the grid renderer and plotters paint with.
pub trait Surface {
  fn fill_rect(
    &mut self,
    top_left: Point,
    bottom_right: Point,
    color: RGBColor,
  ) -> Result<(), GraphError>;

  fn fill_circle(
    &mut self,
    center: Point,
    radius: f64,
    color: RGBColor,
  ) -> Result<(), GraphError>;

  fn stroke_path(
    &mut self,
    path: &[Point],
    stroke: Stroke,
  ) -> Result<(), GraphError>;

  fn text(
    &mut self,
    text: &str,
    at: Point,
    align: TextAlign,
    size: f64,
    color: RGBColor,
  ) -> Result<(), GraphError>;
}

/// In-memory RGB image backed by the plotters bitmap backend.
#[derive(Clone)]
pub struct Canvas {
  width: u32,
  height: u32,
  buf: Vec<u8>,
}

impl std::fmt::Debug for Canvas {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Canvas")
      .field("width", &self.width)
      .field("height", &self.height)
      .finish()
  }
}

fn pixel(p: Point) -> (i32, i32) {
  (p.0.round() as i32, p.1.round() as i32)
}

fn drawing_error(e: impl std::fmt::Display) -> GraphError {
  GraphError::Drawing(e.to_string())
}

impl Canvas {
  pub fn new(width: u32, height: u32, background: RGBColor) -> Self {
    let RGBColor(r, g, b) = background;
    let pixels = width as usize * height as usize;
    let buf = std::iter::repeat_n([r, g, b], pixels)
      .flatten()
      .collect();
    Self { width, height, buf }
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  /// Colour at a pixel, `None` outside the canvas.
  pub fn pixel(&self, x: u32, y: u32) -> Option<RGBColor> {
    if x >= self.width || y >= self.height {
      return None;
    }
    let i = (y as usize * self.width as usize + x as usize) * 3;
    Some(RGBColor(self.buf[i], self.buf[i + 1], self.buf[i + 2]))
  }

  pub fn rgb_bytes(&self) -> &[u8] {
    &self.buf
  }

  fn area(&mut self) -> DrawingArea<BitMapBackend<'_>, Shift> {
    BitMapBackend::with_buffer(&mut self.buf, (self.width, self.height))
      .into_drawing_area()
  }

  pub fn to_png(&self) -> Result<Vec<u8>, GraphError> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out).write_image(
      &self.buf,
      self.width,
      self.height,
      image::ExtendedColorType::Rgb8,
    )?;
    Ok(out)
  }
}

impl Surface for Canvas {
  fn fill_rect(
    &mut self,
    top_left: Point,
    bottom_right: Point,
    color: RGBColor,
  ) -> Result<(), GraphError> {
    let rect =
      Rectangle::new([pixel(top_left), pixel(bottom_right)], color.filled());
    let area = self.area();
    area.draw(&rect).map_err(drawing_error)?;
    area.present().map_err(drawing_error)
  }

  fn fill_circle(
    &mut self,
    center: Point,
    radius: f64,
    color: RGBColor,
  ) -> Result<(), GraphError> {
    let circle =
      Circle::new(pixel(center), radius.round() as i32, color.filled());
    let area = self.area();
    area.draw(&circle).map_err(drawing_error)?;
    area.present().map_err(drawing_error)
  }

  fn stroke_path(
    &mut self,
    path: &[Point],
    stroke: Stroke,
  ) -> Result<(), GraphError> {
    if path.len() < 2 {
      return Ok(());
    }
    let points: Vec<(i32, i32)> = path.iter().copied().map(pixel).collect();
    let element =
      PathElement::new(points, stroke.color.stroke_width(stroke.width));
    let area = self.area();
    area.draw(&element).map_err(drawing_error)?;
    area.present().map_err(drawing_error)
  }

  fn text(
    &mut self,
    text: &str,
    at: Point,
    align: TextAlign,
    size: f64,
    color: RGBColor,
  ) -> Result<(), GraphError> {
    let h_pos = match align {
      TextAlign::Left => HPos::Left,
      TextAlign::Center => HPos::Center,
      TextAlign::Right => HPos::Right,
    };
    let style = ("sans-serif", size)
      .into_font()
      .color(&color)
      .pos(Pos::new(h_pos, VPos::Center));
    let element = Text::new(text.to_string(), pixel(at), style);
    let area = self.area();
    area.draw(&element).map_err(drawing_error)?;
    area.present().map_err(drawing_error)
  }
}

/// `#RRGGBB` or `#RGB`, or one of the named palette colours.
pub fn parse_hex_color(s: &str) -> Option<RGBColor> {
  match s.trim().to_ascii_lowercase().as_str() {
    "red" => return Some(RGBColor(0xC2, 0x18, 0x5B)),
    "blue" => return Some(RGBColor(0x21, 0x96, 0xF3)),
    "green" => return Some(RGBColor(0x4C, 0xAF, 0x50)),
    "purple" => return Some(RGBColor(0x9C, 0x27, 0xB0)),
    "orange" => return Some(RGBColor(0xFF, 0x98, 0x00)),
    _ => {}
  }
  let s = s.trim().strip_prefix('#')?;
  if !s.is_ascii() {
    return None;
  }
  match s.len() {
    6 => {
      let r = u8::from_str_radix(&s[0..2], 16).ok()?;
      let g = u8::from_str_radix(&s[2..4], 16).ok()?;
      let b = u8::from_str_radix(&s[4..6], 16).ok()?;
      Some(RGBColor(r, g, b))
    }
    3 => {
      let r = u8::from_str_radix(&s[0..1], 16).ok()?;
      let g = u8::from_str_radix(&s[1..2], 16).ok()?;
      let b = u8::from_str_radix(&s[2..3], 16).ok()?;
      Some(RGBColor(r * 17, g * 17, b * 17))
    }
    _ => None,
  }
}
