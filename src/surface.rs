/// Drawing surfaces the renderer paints onto.
///
/// Coordinates are world pixels. [`TerminalSurface`] maps them onto
/// terminal cells with crossterm; [`HeadlessSurface`] keeps a tally in
/// memory so the engine can run without a terminal.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// World pixel position of the centre of terminal cell `(col, row)` for a
/// cell of `cell_w × cell_h` pixels.
pub fn cell_center(col: u16, row: u16, cell_w: f32, cell_h: f32) -> (f32, f32) {
    ((col as f32 + 0.5) * cell_w, (row as f32 + 0.5) * cell_h)
}

pub trait Surface {
    /// World size in pixels.
    fn size(&self) -> (f32, f32);

    /// Adopt a new world size in pixels.
    fn resize(&mut self, width: f32, height: f32);

    fn clear(&mut self) -> std::io::Result<()>;

    /// Put a single glyph at a world position. Off-surface plots are dropped.
    fn plot(&mut self, x: f32, y: f32, glyph: char, color: Color) -> std::io::Result<()>;

    /// Write a line of text anchored at a world position.
    fn text(&mut self, x: f32, y: f32, text: &str, color: Color, align: Align)
        -> std::io::Result<()>;

    /// Finish the frame.
    fn present(&mut self) -> std::io::Result<()>;
}

// ── Terminal ──────────────────────────────────────────────────────────────────

pub struct TerminalSurface<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    cell_w: f32,
    cell_h: f32,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, cols: u16, rows: u16, cell_w: f32, cell_h: f32) -> Self {
        Self {
            out,
            cols,
            rows,
            cell_w,
            cell_h,
        }
    }

    pub fn cells(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn cell_center(&self, col: u16, row: u16) -> (f32, f32) {
        cell_center(col, row, self.cell_w, self.cell_h)
    }

    fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let col = (x / self.cell_w).floor();
        let row = (y / self.cell_h).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols as f32 || row >= self.rows as f32 {
            None
        } else {
            Some((col as u16, row as u16))
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn size(&self) -> (f32, f32) {
        (self.cols as f32 * self.cell_w, self.rows as f32 * self.cell_h)
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.cols = (width / self.cell_w).round().max(1.0) as u16;
        self.rows = (height / self.cell_h).round().max(1.0) as u16;
    }

    fn clear(&mut self) -> std::io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn plot(&mut self, x: f32, y: f32, glyph: char, color: Color) -> std::io::Result<()> {
        if let Some((col, row)) = self.to_cell(x, y) {
            self.out.queue(cursor::MoveTo(col, row))?;
            self.out.queue(style::SetForegroundColor(color))?;
            self.out.queue(Print(glyph))?;
        }
        Ok(())
    }

    fn text(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        color: Color,
        align: Align,
    ) -> std::io::Result<()> {
        let row = (y / self.cell_h).floor();
        if row < 0.0 || row >= self.rows as f32 {
            return Ok(());
        }
        let len = text.chars().count() as f32;
        let anchor = (x / self.cell_w).floor();
        let col = match align {
            Align::Left => anchor,
            Align::Center => anchor - (len / 2.0).floor(),
            Align::Right => anchor - len,
        }
        .clamp(0.0, self.cols.saturating_sub(1) as f32);

        self.out.queue(cursor::MoveTo(col as u16, row as u16))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(text))?;
        Ok(())
    }

    fn present(&mut self) -> std::io::Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}

// ── Headless ──────────────────────────────────────────────────────────────────

/// In-memory surface: counts glyphs and keeps the text lines of the last
/// frame.
#[derive(Clone, Debug, Default)]
pub struct HeadlessSurface {
    pub width: f32,
    pub height: f32,
    pub frames: usize,
    pub plots: usize,
    pub texts: Vec<String>,
}

impl HeadlessSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts.iter().any(|t| t.contains(needle))
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) -> std::io::Result<()> {
        self.plots = 0;
        self.texts.clear();
        Ok(())
    }

    fn plot(&mut self, x: f32, y: f32, _glyph: char, _color: Color) -> std::io::Result<()> {
        if x >= 0.0 && y >= 0.0 && x < self.width && y < self.height {
            self.plots += 1;
        }
        Ok(())
    }

    fn text(
        &mut self,
        _x: f32,
        _y: f32,
        text: &str,
        _color: Color,
        _align: Align,
    ) -> std::io::Result<()> {
        self.texts.push(text.to_string());
        Ok(())
    }

    fn present(&mut self) -> std::io::Result<()> {
        self.frames += 1;
        Ok(())
    }
}
