use crate::terminal::KeyEvent;
use crossterm::event::{Event, KeyEventKind, read};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{self, Stdout, Write};
use unicode_width::UnicodeWidthStr;

/// Raw-mode terminal session for a single editable line.
pub struct Terminal {
    stdout: Stdout,
    raw_mode: bool,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            raw_mode: false,
        }
    }

    pub fn enter_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.raw_mode = true;
        Ok(())
    }

    pub fn exit_raw_mode(&mut self) -> io::Result<()> {
        if self.raw_mode {
            terminal::disable_raw_mode()?;
            self.raw_mode = false;
        }
        Ok(())
    }

    pub fn read_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(key) = read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                return Ok(KeyEvent::from(key));
            }
        }
    }

    /// Redraws the line, then places the cursor. The cursor only moves after
    /// the new text has been queued so it lands on the updated content.
    pub fn render_line(
        &mut self,
        prompt: &str,
        text: &str,
        placeholder: &str,
        cursor_col: usize,
    ) -> io::Result<()> {
        queue!(
            self.stdout,
            cursor::MoveToColumn(0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            Print(prompt),
            Print(text),
            SetAttribute(Attribute::Dim),
            Print(placeholder),
            SetAttribute(Attribute::Reset),
        )?;
        let col = u16::try_from(prompt.width() + cursor_col).unwrap_or(u16::MAX);
        queue!(self.stdout, cursor::MoveToColumn(col))?;
        self.stdout.flush()
    }

    pub fn finish_line(&mut self) -> io::Result<()> {
        execute!(self.stdout, Print("\r\n"))?;
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.exit_raw_mode();
    }
}
