use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// A single cell in the back-buffer.
#[derive(Clone)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bold: false,
        }
    }
}

/// Terminal abstraction for rendering: a cell back-buffer over crossterm.
/// With `alternate_screen` it enters raw mode and restores the terminal on
/// drop; without, it is just a buffer (print mode).
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Cell>,
    alternate_screen: bool,
}

impl Terminal {
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = size()?;

        if alternate_screen {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
        }

        Ok(Self {
            width,
            height,
            buffer: vec![Cell::default(); width as usize * height as usize],
            alternate_screen,
        })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Blank the back-buffer (not the screen).
    pub fn clear(&mut self) {
        for cell in &mut self.buffer {
            *cell = Cell::default();
        }
    }

    /// Clear the actual terminal.
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))
    }

    /// Set a character at a position; out-of-bounds writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bold: bool) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width as usize + x as usize] = Cell { ch, fg, bold };
        }
    }

    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, bold);
        }
    }

    /// Flush the whole back-buffer to the screen in one write.
    pub fn render(&self) -> io::Result<()> {
        let mut out = stdout();
        for y in 0..self.height {
            queue!(out, MoveTo(0, y))?;
            for x in 0..self.width {
                let cell = &self.buffer[y as usize * self.width as usize + x as usize];
                if cell.bold {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                match cell.fg {
                    Some(color) => {
                        queue!(out, SetForegroundColor(color), Print(cell.ch), ResetColor)?
                    }
                    None => queue!(out, Print(cell.ch))?,
                }
                if cell.bold {
                    queue!(out, SetAttribute(Attribute::Reset))?;
                }
            }
        }
        out.flush()
    }

    /// Wait for a keypress with a timeout.
    pub fn wait_key(&self, timeout_ms: u64) -> io::Result<Option<KeyCode>> {
        if poll(Duration::from_millis(timeout_ms))? {
            if let Event::Key(key_event) = read()? {
                return Ok(Some(key_event.code));
            }
        }
        Ok(None)
    }

    /// Print the back-buffer to stdout with ANSI colors (print mode).
    pub fn print_to_stdout(&self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = &self.buffer[y as usize * self.width as usize + x as usize];
                if cell.ch == ' ' {
                    print!(" ");
                    continue;
                }

                if cell.bold {
                    print!("\x1b[1m");
                }

                if let Some(color) = cell.fg {
                    match color {
                        Color::Rgb { r, g, b } => print!("\x1b[38;2;{};{};{}m", r, g, b),
                        Color::AnsiValue(v) => print!("\x1b[38;5;{}m", v),
                        Color::Black => print!("\x1b[30m"),
                        Color::DarkRed => print!("\x1b[31m"),
                        Color::DarkGreen => print!("\x1b[32m"),
                        Color::DarkYellow => print!("\x1b[33m"),
                        Color::DarkBlue => print!("\x1b[34m"),
                        Color::DarkMagenta => print!("\x1b[35m"),
                        Color::DarkCyan => print!("\x1b[36m"),
                        Color::Grey => print!("\x1b[37m"),
                        Color::DarkGrey => print!("\x1b[90m"),
                        Color::Red => print!("\x1b[91m"),
                        Color::Green => print!("\x1b[92m"),
                        Color::Yellow => print!("\x1b[93m"),
                        Color::Blue => print!("\x1b[94m"),
                        Color::Magenta => print!("\x1b[95m"),
                        Color::Cyan => print!("\x1b[96m"),
                        Color::White => print!("\x1b[97m"),
                        _ => {}
                    }
                }

                print!("{}", cell.ch);
                print!("\x1b[0m");
            }
            println!();
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}
