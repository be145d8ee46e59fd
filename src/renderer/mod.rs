//! 2D drawing surface
//!
//! The simulation only issues primitive draw calls. The host owns the actual
//! canvas; on the web that is `canvas::CanvasSurface`, in tests and in the
//! headless runner a `CommandBuffer` records the calls instead.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use glam::Vec2;

use crate::consts::{BACKGROUND_COLOR, STAR_COLOR, STAR_COUNT, STAR_SCROLL_SPEED};
use crate::sim::geometry::{Playfield, Rect};

/// Primitive draw operations. Colors are CSS color strings.
pub trait Surface {
    /// Wipe the whole playfield
    fn clear(&mut self, rect: Rect) {
        self.fill_rect(rect, BACKGROUND_COLOR);
    }
    fn fill_rect(&mut self, rect: Rect, color: &str);
    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32);
    fn fill_triangle(&mut self, points: [Vec2; 3], color: &str);
    fn stroke_triangle(&mut self, points: [Vec2; 3], color: &str, line_width: f32);
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: String,
    },
    StrokeRect {
        rect: Rect,
        color: String,
        line_width: f32,
    },
    FillTriangle {
        points: [Vec2; 3],
        color: String,
    },
    StrokeTriangle {
        points: [Vec2; 3],
        color: String,
        line_width: f32,
    },
}

/// Surface that records every call
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    pub commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Colors of every filled triangle (the player ship is the only triangle)
    pub fn triangle_fills(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillTriangle { color, .. } => Some(color.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Filled rectangles of the given color
    pub fn rect_fills(&self, color: &str) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, color: c } if c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl Surface for CommandBuffer {
    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color: color.to_string(),
            line_width,
        });
    }

    fn fill_triangle(&mut self, points: [Vec2; 3], color: &str) {
        self.commands.push(DrawCommand::FillTriangle {
            points,
            color: color.to_string(),
        });
    }

    fn stroke_triangle(&mut self, points: [Vec2; 3], color: &str, line_width: f32) {
        self.commands.push(DrawCommand::StrokeTriangle {
            points,
            color: color.to_string(),
            line_width,
        });
    }
}

/// Clear to black and draw the slowly scrolling starfield
pub fn draw_background(surface: &mut dyn Surface, field: &Playfield, frame_count: u64) {
    surface.clear(field.rect());
    if field.width <= 0.0 || field.height <= 0.0 {
        return;
    }

    let scroll = frame_count as f32 * STAR_SCROLL_SPEED;
    for i in 0..STAR_COUNT {
        let x = (i as f32 * 37.0) % field.width;
        let y = (i as f32 * 53.0 + scroll) % field.height;
        surface.fill_rect(Rect::new(x, y, 1.0, 1.0), STAR_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_clears_then_draws_stars() {
        let mut buffer = CommandBuffer::new();
        let field = Playfield::new(800.0, 600.0);
        draw_background(&mut buffer, &field, 0);

        assert_eq!(buffer.len(), 1 + STAR_COUNT as usize);
        assert_eq!(
            buffer.commands[0],
            DrawCommand::FillRect {
                rect: field.rect(),
                color: BACKGROUND_COLOR.to_string(),
            }
        );
    }

    #[test]
    fn test_stars_scroll_and_wrap() {
        let field = Playfield::new(800.0, 600.0);
        let mut first = CommandBuffer::new();
        let mut later = CommandBuffer::new();
        draw_background(&mut first, &field, 0);
        draw_background(&mut later, &field, 10);

        // Star 1 sits at y = 53 on frame 0 and 5px lower ten frames later
        let y0 = first.commands[2].clone();
        let y10 = later.commands[2].clone();
        let (DrawCommand::FillRect { rect: a, .. }, DrawCommand::FillRect { rect: b, .. }) =
            (y0, y10)
        else {
            panic!("stars are filled rects");
        };
        assert_eq!(a.y, 53.0);
        assert_eq!(b.y, 58.0);

        let mut wrapped = CommandBuffer::new();
        draw_background(&mut wrapped, &field, 2000);
        for command in &wrapped.commands[1..] {
            if let DrawCommand::FillRect { rect, .. } = command {
                assert!(rect.y < field.height);
            }
        }
    }

    #[test]
    fn test_empty_field_draws_no_stars() {
        let mut buffer = CommandBuffer::new();
        draw_background(&mut buffer, &Playfield::new(0.0, 0.0), 5);
        assert_eq!(buffer.len(), 1);
    }
}
