use crate::shade::Shade;
use crate::terminal::Terminal;
use crossterm::style::Color;
use std::io;

/// Handle to a path held by a canvas.
pub type PathId = usize;

/// One command of an absolute-coordinate path. Absolute coordinates are what
/// make mid-path branching possible: a cursor can pop back to an earlier
/// point and keep appending without restating anything.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSeg {
    MoveTo(f64, f64),
    LineTo(f64, f64),
}

/// Stroke styling for a path. Figures are stroked, never filled.
#[derive(Clone, Copy, Debug)]
pub struct PathStyle {
    pub stroke: Shade,
    pub stroke_width: f64,
}

/// The drawing surface the growth engine talks to. Append-mostly: the engine
/// pushes path data and styles and never reads anything back. A sink that
/// rejects an append fails the whole operation; there is no retry.
pub trait Canvas {
    fn create_path(&mut self, segs: &[PathSeg]) -> io::Result<PathId>;
    fn set_path_data(&mut self, id: PathId, segs: &[PathSeg]) -> io::Result<()>;
    fn set_style(&mut self, id: PathId, style: PathStyle) -> io::Result<()>;
    fn remove_path(&mut self, id: PathId) -> io::Result<()>;
}

struct RetainedPath {
    segs: Vec<PathSeg>,
    style: Option<PathStyle>,
}

/// Terminal sink: retains every live path and rasterizes the lot into a
/// braille dot grid (2x4 dots per character cell) with Bresenham lines.
/// Engine coordinates are braille-dot coordinates, so a terminal of w x h
/// cells gives the figure a (2w) x (4h) canvas to grow on.
pub struct BrailleCanvas {
    cell_w: usize,
    cell_h: usize,
    paths: Vec<Option<RetainedPath>>,
}

impl BrailleCanvas {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w as usize,
            cell_h: cell_h as usize,
            paths: Vec::new(),
        }
    }

    pub fn dot_width(&self) -> usize {
        self.cell_w * 2
    }

    pub fn dot_height(&self) -> usize {
        self.cell_h * 4
    }

    /// Rasterize all live paths and hand each non-empty cell to `put`.
    /// Later paths win ties on cell color, so fresh growth shades over old.
    pub fn for_each_cell(&self, mut put: impl FnMut(i32, i32, char, Color)) {
        let (bw, bh) = (self.dot_width(), self.dot_height());
        if bw == 0 || bh == 0 {
            return;
        }

        let mut dots = vec![false; bw * bh];
        let mut cell_colors: Vec<Option<Color>> = vec![None; self.cell_w * self.cell_h];

        for path in self.paths.iter().flatten() {
            let color = path
                .style
                .map(|s| s.stroke.terminal_color())
                .unwrap_or(Color::White);
            let mut pen: Option<(i32, i32)> = None;
            for seg in &path.segs {
                match *seg {
                    PathSeg::MoveTo(x, y) => {
                        pen = Some((x.round() as i32, y.round() as i32));
                    }
                    PathSeg::LineTo(x, y) => {
                        let to = (x.round() as i32, y.round() as i32);
                        if let Some(from) = pen {
                            plot_line(from, to, |dx, dy| {
                                if dx >= 0 && dy >= 0 && (dx as usize) < bw && (dy as usize) < bh
                                {
                                    dots[dy as usize * bw + dx as usize] = true;
                                    let cell =
                                        (dy as usize / 4) * self.cell_w + dx as usize / 2;
                                    cell_colors[cell] = Some(color);
                                }
                            });
                        }
                        pen = Some(to);
                    }
                }
            }
        }

        for cy in 0..self.cell_h {
            for cx in 0..self.cell_w {
                let mut bits: u8 = 0;
                let bx = cx * 2;
                let by = cy * 4;
                // Standard braille dot numbering.
                if dots[by * bw + bx] {
                    bits |= 0x01;
                }
                if dots[(by + 1) * bw + bx] {
                    bits |= 0x02;
                }
                if dots[(by + 2) * bw + bx] {
                    bits |= 0x04;
                }
                if dots[by * bw + bx + 1] {
                    bits |= 0x08;
                }
                if dots[(by + 1) * bw + bx + 1] {
                    bits |= 0x10;
                }
                if dots[(by + 2) * bw + bx + 1] {
                    bits |= 0x20;
                }
                if dots[(by + 3) * bw + bx] {
                    bits |= 0x40;
                }
                if dots[(by + 3) * bw + bx + 1] {
                    bits |= 0x80;
                }

                if bits != 0 {
                    let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
                    let color = cell_colors[cy * self.cell_w + cx].unwrap_or(Color::White);
                    put(cx as i32, cy as i32, ch, color);
                }
            }
        }
    }

    /// Blit the rasterized figure into the terminal back-buffer.
    pub fn blit(&self, term: &mut Terminal) {
        self.for_each_cell(|x, y, ch, color| {
            term.set(x, y, ch, Some(color), false);
        });
    }

    fn path_mut(&mut self, id: PathId) -> io::Result<&mut RetainedPath> {
        self.paths
            .get_mut(id)
            .and_then(|slot| slot.as_mut())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such path"))
    }
}

impl Canvas for BrailleCanvas {
    fn create_path(&mut self, segs: &[PathSeg]) -> io::Result<PathId> {
        self.paths.push(Some(RetainedPath {
            segs: segs.to_vec(),
            style: None,
        }));
        Ok(self.paths.len() - 1)
    }

    fn set_path_data(&mut self, id: PathId, segs: &[PathSeg]) -> io::Result<()> {
        let path = self.path_mut(id)?;
        path.segs.clear();
        path.segs.extend_from_slice(segs);
        Ok(())
    }

    fn set_style(&mut self, id: PathId, style: PathStyle) -> io::Result<()> {
        self.path_mut(id)?.style = Some(style);
        Ok(())
    }

    fn remove_path(&mut self, id: PathId) -> io::Result<()> {
        match self.paths.get_mut(id) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                Ok(())
            }
            _ => Err(io::Error::new(io::ErrorKind::NotFound, "no such path")),
        }
    }
}

/// Bresenham's line algorithm over dot coordinates.
fn plot_line((mut x, mut y): (i32, i32), (x1, y1): (i32, i32), mut plot: impl FnMut(i32, i32)) {
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}
