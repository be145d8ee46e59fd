//! `Surface` backed by a browser 2D canvas context

use glam::Vec2;
use web_sys::CanvasRenderingContext2d;

use super::Surface;
use crate::sim::geometry::Rect;

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn trace_triangle(&self, points: &[Vec2; 3]) {
        self.ctx.begin_path();
        self.ctx.move_to(f64::from(points[0].x), f64::from(points[0].y));
        for p in &points[1..] {
            self.ctx.line_to(f64::from(p.x), f64::from(p.y));
        }
        self.ctx.close_path();
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.w),
            f64::from(rect.h),
        );
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(f64::from(line_width));
        self.ctx.stroke_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.w),
            f64::from(rect.h),
        );
    }

    fn fill_triangle(&mut self, points: [Vec2; 3], color: &str) {
        self.trace_triangle(&points);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
    }

    fn stroke_triangle(&mut self, points: [Vec2; 3], color: &str, line_width: f32) {
        self.trace_triangle(&points);
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(f64::from(line_width));
        self.ctx.stroke();
    }
}
