//! Live terminal loop: consumes model events, repaints the visible window,
//! and maps quit keys into the same event stream.

use std::io::{stdout, Write};

use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::event::{Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::model::{Event, Model};
use crate::render;

/// Run the live view until the model transitions to exiting, then restore
/// the terminal. Raw mode is released on error paths too.
pub async fn run(model: &mut Model, rx: &mut mpsc::Receiver<Event>) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    let result = event_loop(model, rx).await;
    terminal::disable_raw_mode()?;
    result
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

async fn event_loop(model: &mut Model, rx: &mut mpsc::Receiver<Event>) -> std::io::Result<()> {
    let mut keys = EventStream::new();
    if let Ok((width, _)) = terminal::size() {
        model.apply(Event::Resized { width });
    }
    let mut painted = 0u16;

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => model.apply(event),
                None => model.apply(Event::Quit),
            },
            term = keys.next() => match term {
                Some(Ok(TermEvent::Key(key))) if key.kind == KeyEventKind::Press && is_quit(&key) => {
                    model.apply(Event::Quit);
                }
                Some(Ok(TermEvent::Resize(width, _))) => model.apply(Event::Resized { width }),
                Some(Err(err)) => return Err(err),
                _ => {}
            },
        }

        if model.exiting() {
            break;
        }
        painted = repaint(model, painted)?;
    }

    // Leave a clean slate for the final history flush.
    let mut out = stdout();
    rewind(&mut out, painted)?;
    out.flush()
}

/// Repaint the visible window over the previous frame. Returns the number of
/// terminal rows the new frame occupies.
fn repaint(model: &Model, painted: u16) -> std::io::Result<u16> {
    let mut out = stdout();
    rewind(&mut out, painted)?;

    let frame = render::wrap(
        &render::lines(model, Some(model.window)).join("\n"),
        model.width,
    );
    let mut rows = 0;
    for line in frame.split('\n') {
        // Raw mode needs explicit carriage returns.
        queue!(out, Print(line), Print("\r\n"))?;
        rows += 1;
    }
    out.flush()?;
    Ok(rows)
}

fn rewind(out: &mut impl Write, painted: u16) -> std::io::Result<()> {
    if painted > 0 {
        queue!(
            out,
            MoveUp(painted),
            MoveToColumn(0),
            Clear(ClearType::FromCursorDown)
        )?;
    }
    Ok(())
}
