// Drawing surfaces. The simulation only needs three primitives: clear the
// whole surface, fill a circle, stroke a line. `CanvasSurface` sends them to
// a browser 2D context; `DisplayList` just records them.

use crate::color::Color;
use std::f64::consts::PI;
use vecmath::Vector2;
use web_sys::CanvasRenderingContext2d;

pub trait Surface {
    fn clear(&mut self, width: f64, height: f64);
    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, color: Color);
    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, width: f64, color: Color);
}

pub struct CanvasSurface {
    pub context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        CanvasSurface { context }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, color: Color) {
        self.context.set_fill_style_str(&color.to_css());
        self.context.begin_path();
        if let Err(e) = self.context.arc(center[0], center[1], radius, 0.0, PI * 2.0) {
            // Only throws for a negative radius; skip the particle
            log::trace!("arc failed: {:?}", e);
            return;
        }
        self.context.fill();
    }

    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, width: f64, color: Color) {
        self.context.set_stroke_style_str(&color.to_css());
        self.context.set_line_width(width);
        self.context.begin_path();
        self.context.move_to(from[0], from[1]);
        self.context.line_to(to[0], to[1]);
        self.context.stroke();
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
    },
    Circle {
        center: Vector2<f64>,
        radius: f64,
        color: Color,
    },
    Line {
        from: Vector2<f64>,
        to: Vector2<f64>,
        width: f64,
        color: Color,
    },
}

/// Headless surface that keeps every command it is given, in order.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        DisplayList::default()
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl Surface for DisplayList {
    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, width: f64, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_list_records_in_order() {
        let mut list = DisplayList::new();
        list.clear(10.0, 20.0);
        list.fill_circle([1.0, 2.0], 3.0, Color::CYAN);
        list.stroke_line([0.0, 0.0], [5.0, 5.0], 0.5, Color::CYAN.with_alpha(0.1));

        assert_eq!(list.commands.len(), 3);
        assert_eq!(
            list.commands[0],
            DrawCommand::Clear {
                width: 10.0,
                height: 20.0
            }
        );
        assert_eq!(list.circles().count(), 1);
        assert_eq!(list.lines().count(), 1);

        list.reset();
        assert!(list.commands.is_empty());
    }
}
