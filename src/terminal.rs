// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor, event,
    style::{Attribute, Color, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, ExecutableCommand,
};

/// Owns the terminal modes for the life of the rain. Dropping it puts the
/// terminal back the way the shell expects it.
pub struct Terminal {
    stdout: Stdout,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetBackgroundColor(Color::Black))?;
            out.execute(SetForegroundColor(Color::Black))?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore(&mut out);
            return Err(e);
        }
        Ok(Self { stdout: out })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore(&mut self.stdout);
    }
}

fn restore(out: &mut Stdout) {
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(terminal::Clear(terminal::ClearType::All));
    let _ = out.execute(cursor::MoveTo(0, 0));
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

/// For signal handlers and the panic hook, where the guard is out of reach.
pub fn restore_terminal_best_effort() {
    restore(&mut stdout());
}
