use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

use crate::interpreter::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Display consumes the interpreter's framebuffer after a step raised the
/// draw flag. It never writes machine state; implementations only need to
/// turn 0/1 cells into something visible.
pub trait Display {
    /// render one frame of row-major 0/1 cells
    fn draw(&mut self, cells: &[u8]) -> Result<(), io::Error>;
}

// terminal metadata shared by the coordinate conversions
struct Resolution {
    width: usize,
    height: usize,
}

impl Resolution {
    fn cell_count(&self) -> usize {
        self.width * self.height
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.width - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.height - 1) as f64, 0.0]
    }

    /// canvas points for every cell holding `value`; the canvas y axis
    /// points up, so rows map to negative y
    fn cells_matching<'a>(
        &self,
        cells: &'a [u8],
        value: u8,
    ) -> impl Iterator<Item = (f64, f64)> + 'a {
        let width = self.width;
        cells
            .iter()
            .enumerate()
            .filter(move |(_, &cell)| cell == value)
            .map(move |(idx, _)| ((idx % width) as f64, -1.0 * ((idx / width) as f64)))
    }
}

/// monochrome display in a terminal, rendered with TUI over crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new(width: usize, height: usize) -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution { width, height },
        })
    }

    /// a display sized for the interpreter's framebuffer
    pub fn chip8() -> Result<MonoTermDisplay, io::Error> {
        MonoTermDisplay::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, cells: &[u8]) -> Result<(), io::Error> {
        // make sure we're given exactly the right amount of data to draw
        assert_eq!(
            cells.len(),
            self.resolution.cell_count(),
            "MonoTermDisplay must have correct-sized data to draw"
        );

        // 1:1 between framebuffer cells and canvas points for now
        self.terminal.draw(|f| {
            let size = Rect::new(
                0,
                0,
                2 + self.resolution.width as u16,
                2 + self.resolution.height as u16,
            );

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(self.resolution.x_bounds())
                .y_bounds(self.resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &self.resolution.cells_matching(cells, 0).collect::<Vec<_>>(),
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &self.resolution.cells_matching(cells, 1).collect::<Vec<_>>(),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for testing non-display routines
pub struct DummyDisplay {
    pub frames: usize,
}

impl DummyDisplay {
    pub fn new() -> Self {
        DummyDisplay { frames: 0 }
    }
}

impl Default for DummyDisplay {
    fn default() -> Self {
        DummyDisplay::new()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, _cells: &[u8]) -> Result<(), io::Error> {
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_count() {
        let r = Resolution { width: 64, height: 32 };
        assert_eq!(r.cell_count(), 2048);
    }

    #[test]
    fn test_x_bounds() {
        let r = Resolution { width: 64, height: 32 };
        assert_eq!(r.x_bounds(), [0.0, 63.0]);
    }

    #[test]
    fn test_y_bounds() {
        let r = Resolution { width: 64, height: 32 };
        assert_eq!(r.y_bounds(), [-31.0, 0.0]);
    }

    #[test]
    fn test_blank_buffer_has_no_lit_cells() {
        let r = Resolution { width: 64, height: 32 };
        let cells = [0u8; 2048];
        assert_eq!(r.cells_matching(&cells, 1).count(), 0);
        assert_eq!(r.cells_matching(&cells, 0).count(), 2048);
    }

    #[test]
    fn test_cell_coordinates() {
        let r = Resolution { width: 64, height: 32 };
        let mut cells = [0u8; 2048];
        cells[64 + 2] = 1; // row 1, column 2
        let lit: Vec<_> = r.cells_matching(&cells, 1).collect();
        assert_eq!(lit, vec![(2.0, -1.0)]);
    }

    #[test]
    fn test_dummy_display_counts_frames() {
        let mut d = DummyDisplay::new();
        d.draw(&[0; 2048]).unwrap();
        d.draw(&[0; 2048]).unwrap();
        assert_eq!(d.frames, 2);
    }
}
