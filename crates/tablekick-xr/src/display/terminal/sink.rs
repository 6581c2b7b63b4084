//! Terminal display sink

use std::io::{self, Write};

use crossterm::{
    cursor, execute, queue,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use super::TopDownProjection;
use crate::display::{Color, DisplayError, DisplaySink, Scene, Shape, SurfaceCapabilities};
use crate::spatial::Point3D;

/// World-space padding around the fitted scene
const FIT_MARGIN: f32 = 0.1;

/// Cell in the terminal buffer
#[derive(Clone, PartialEq)]
struct Cell {
    symbol: char,
    fg: Color,
    bg: Color,
    /// Height of whatever was drawn here; higher wins in a top-down view
    height: f32,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            symbol: ' ',
            fg: Color::White,
            bg: Color::Black,
            height: f32::MIN,
        }
    }
}

/// Renders the scene top-down into the terminal with diff updates
pub struct TerminalDisplaySink {
    width: u16,
    height: u16,
    buffer: Vec<Cell>,
    prev_buffer: Vec<Cell>,
    clear_color: Color,
    frames: u64,
    /// Whether presenting writes to stdout
    attached: bool,
}

impl TerminalDisplaySink {
    /// Take over the terminal (alternate screen, raw mode). Callers poll
    /// [`poll_quit`](super::poll_quit) since Ctrl-C no longer interrupts.
    pub fn new() -> Result<Self, DisplayError> {
        let (width, height) = terminal::size().map_err(|e| DisplayError::Init(e.to_string()))?;
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let mut sink = Self::detached(width, height);
        sink.attached = true;
        Ok(sink)
    }

    /// Render into memory only
    pub fn detached(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            buffer: vec![Cell::default(); size],
            prev_buffer: vec![Cell::default(); size],
            clear_color: Color::Rgb(5, 7, 12),
            frames: 0,
            attached: false,
        }
    }

    /// The rendered grid as text, one line per row
    pub fn snapshot(&self) -> String {
        self.buffer
            .chunks(self.width.max(1) as usize)
            .map(|row| row.iter().map(|c| c.symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn resize_buffers(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = width as usize * height as usize;
        self.buffer = vec![Cell::default(); size];
        self.prev_buffer = vec![Cell::default(); size];
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    fn set_cell(&mut self, x: u16, y: u16, symbol: char, fg: Color, height: f32) {
        if let Some(idx) = self.index(x, y) {
            let cell = &mut self.buffer[idx];
            if height >= cell.height {
                cell.symbol = symbol;
                cell.fg = fg;
                cell.height = height;
            }
        }
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.set_cell(x.saturating_add(i as u16), y, ch, color, f32::MAX);
        }
    }

    fn draw_line(&mut self, from: (u16, u16), to: (u16, u16), symbol: char, color: Color, height: f32) {
        // Bresenham
        let (x1, y1) = (from.0 as i32, from.1 as i32);
        let (x2, y2) = (to.0 as i32, to.1 as i32);
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x1, y1);

        loop {
            if x >= 0 && y >= 0 {
                self.set_cell(x as u16, y as u16, symbol, color, height);
            }
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Rasterize the scene into the back buffer
    fn render(&mut self, scene: &Scene) {
        std::mem::swap(&mut self.buffer, &mut self.prev_buffer);
        let clear = Cell {
            bg: self.clear_color,
            ..Cell::default()
        };
        self.buffer.iter_mut().for_each(|cell| *cell = clear.clone());

        let mut shapes = Vec::new();
        for (id, node) in scene.iter() {
            if matches!(node.shape, Shape::Group) || !scene.is_effectively_visible(id) {
                continue;
            }
            if let Some(world) = scene.world_transform(id) {
                let footprint: Vec<Point3D> = node
                    .shape
                    .extent_points()
                    .into_iter()
                    .map(|p| world.transform_point(p))
                    .collect();
                shapes.push((node.shape.clone(), node.color, world.position, footprint));
            }
        }

        let all_points: Vec<Point3D> = shapes.iter().flat_map(|s| s.3.iter().copied()).collect();
        let Some(projection) = TopDownProjection::fit(all_points.iter(), FIT_MARGIN) else {
            return;
        };

        // Leave the first row for the status line
        let (width, rows) = (self.width, self.height.saturating_sub(1));
        for (shape, color, center, footprint) in shapes {
            let cells: Vec<(u16, u16)> = footprint
                .iter()
                .filter_map(|p| projection.to_cell(*p, width, rows))
                .map(|(x, y)| (x, y + 1))
                .collect();
            let height = center.y;

            match shape {
                Shape::Box { .. } if cells.len() == 4 && cells[0] != cells[2] => {
                    for i in 0..4 {
                        self.draw_line(cells[i], cells[(i + 1) % 4], '#', color, height);
                    }
                }
                Shape::Cylinder { .. } if cells.len() == 2 && cells[0] != cells[1] => {
                    self.draw_line(cells[0], cells[1], '|', color, height);
                }
                _ => {
                    if let Some((x, y)) = projection
                        .to_cell(center, width, rows)
                        .map(|(x, y)| (x, y + 1))
                    {
                        self.set_cell(x, y, point_symbol(&shape), color, height);
                    }
                }
            }
        }
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let mut stdout = io::stdout();

        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(idx) = self.index(x, y) {
                    let cell = &self.buffer[idx];
                    if cell != &self.prev_buffer[idx] {
                        queue!(
                            stdout,
                            cursor::MoveTo(x, y),
                            SetForegroundColor(cell.fg.to_crossterm()),
                            SetBackgroundColor(cell.bg.to_crossterm()),
                            Print(cell.symbol)
                        )?;
                    }
                }
            }
        }

        stdout.flush()?;
        Ok(())
    }
}

fn point_symbol(shape: &Shape) -> char {
    match shape {
        Shape::Sphere { .. } => 'o',
        Shape::Ring { .. } => '+',
        Shape::Box { .. } => '#',
        Shape::Cylinder { .. } => '|',
        Shape::Mesh { .. } => '@',
        Shape::Group => ' ',
    }
}

impl DisplaySink for TerminalDisplaySink {
    fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities {
            width: self.width as u32,
            height: self.height as u32,
            supports_depth: true,
            supports_meshes: false,
            fov_horizontal: None,
        }
    }

    fn load_asset(&mut self, key: &str) -> Result<(), DisplayError> {
        // Meshes draw as a single glyph; nothing to load
        tracing::debug!("terminal sink ignoring mesh asset '{}'", key);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), DisplayError> {
        let width = u16::try_from(width).unwrap_or(u16::MAX);
        let height = u16::try_from(height).unwrap_or(u16::MAX);
        if width != self.width || height != self.height {
            self.resize_buffers(width, height);
            if self.attached {
                execute!(io::stdout(), terminal::Clear(ClearType::All))?;
            }
        }
        Ok(())
    }

    fn present(&mut self, scene: &Scene) -> Result<(), DisplayError> {
        if self.attached {
            let (width, height) = terminal::size()?;
            if width != self.width || height != self.height {
                self.resize_buffers(width, height);
            }
        }

        self.frames += 1;
        self.render(scene);
        let status = format!("tablekick | frame {} | {} nodes", self.frames, scene.len());
        self.draw_text(0, 0, &status, Color::Grey);

        if self.attached {
            self.flush()?;
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), DisplayError> {
        if self.attached {
            self.attached = false;
            execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen)?;
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for TerminalDisplaySink {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::warn!("failed to restore terminal: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::VisualNode;
    use crate::spatial::{Axis, Vector3D};

    #[test]
    fn test_detached_render_draws_table_and_ball() {
        let mut scene = Scene::new();
        let rig = scene.insert(VisualNode::group("rig"));
        scene.insert(
            VisualNode::new(
                "table",
                Shape::Box {
                    size: Vector3D::new(1.2, 0.1, 0.7),
                },
            )
            .with_parent(rig)
            .with_color(Color::TABLE_BROWN),
        );
        scene.insert(
            VisualNode::new("ball", Shape::Sphere { radius: 0.03 })
                .with_parent(rig)
                .at(Point3D::new(0.0, 0.1, 0.0)),
        );

        let mut sink = TerminalDisplaySink::detached(60, 30);
        sink.present(&scene).unwrap();

        let text = sink.snapshot();
        assert!(text.starts_with("tablekick | frame 1"));
        let body: Vec<&str> = text.lines().skip(1).collect();
        assert!(body.iter().any(|row| row.contains('#')));
        assert!(body.iter().any(|row| row.contains('o')));
    }

    #[test]
    fn test_bar_renders_as_line() {
        let mut scene = Scene::new();
        scene.insert(VisualNode::new(
            "bar",
            Shape::Cylinder {
                radius: 0.02,
                length: 1.2,
                axis: Axis::Z,
            },
        ));
        scene.insert(VisualNode::new("ball", Shape::Sphere { radius: 0.03 }).at(Point3D::new(0.5, 0.0, 0.0)));

        let mut sink = TerminalDisplaySink::detached(40, 20);
        sink.present(&scene).unwrap();
        assert!(sink.snapshot().matches('|').count() > 3);
    }

    #[test]
    fn test_resize_reallocates() {
        let mut sink = TerminalDisplaySink::detached(10, 5);
        sink.resize(20, 8).unwrap();
        assert_eq!(sink.capabilities().width, 20);
        assert_eq!(sink.snapshot().lines().count(), 8);
    }
}
