//! Line rendering for the live view and the final history flush.

use crossterm::style::{Color, Stylize};
use unicode_width::UnicodeWidthChar;

use crate::model::{Model, ProbeState};
use crate::probe::{Outcome, ProbeReport};

const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Visual bucket for a status code: 2xx green, 4xx yellow, 5xx red, anything
/// else unstyled.
pub fn status_class(status: u16) -> Option<Color> {
    match status {
        200..=299 => Some(Color::Green),
        400..=499 => Some(Color::Yellow),
        500..=599 => Some(Color::Red),
        _ => None,
    }
}

fn style_status(status: u16) -> String {
    match status_class(status) {
        Some(color) => status.to_string().with(color).to_string(),
        None => status.to_string(),
    }
}

/// Duration text rounded to milliseconds ("0s", "250ms", "1.234s", "1m2.5s").
pub fn format_duration(d: std::time::Duration) -> String {
    let ms = d.as_millis();
    if ms == 0 {
        return "0s".into();
    }
    if ms < 1000 {
        return format!("{ms}ms");
    }
    let secs = ms / 1000;
    let frac = format!("{:03}", ms % 1000);
    let frac = frac.trim_end_matches('0');
    let (mins, secs) = (secs / 60, secs % 60);
    let sec_text = if frac.is_empty() {
        format!("{secs}s")
    } else {
        format!("{secs}.{frac}s")
    };
    if mins == 0 {
        sec_text
    } else {
        format!("{mins}m{sec_text}")
    }
}

/// One display line per probe. Pending entries show the id alone.
pub fn line(id: u64, state: &ProbeState) -> String {
    match state {
        ProbeState::Pending => format!("{id}:"),
        ProbeState::Done(report) => report_line(report),
    }
}

fn report_line(r: &ProbeReport) -> String {
    let start = r.start.format(TIME_FORMAT);
    let end = r.end().format(TIME_FORMAT);
    let duration = format_duration(r.duration);
    match &r.outcome {
        Outcome::Failure { error } => format!(
            "{}: start={start}, duration={duration}, end={end} {error}",
            r.id
        ),
        Outcome::Success {
            status,
            url,
            payload,
        } => format!(
            "{}: start={start}, duration={duration}, end={end}, url={url} [{}] {}",
            r.id,
            style_status(*status),
            payload
        ),
    }
}

/// Render the history in dispatch order. `window` limits output to the last
/// K entries; `None` renders everything, which is what the final flush uses.
pub fn lines(model: &Model, window: Option<usize>) -> Vec<String> {
    let history = model.history();
    let skip = window.map_or(0, |w| history.len().saturating_sub(w));
    history
        .iter()
        .skip(skip)
        .map(|(id, state)| line(*id, state))
        .collect()
}

/// Hard-wrap `text` to `width` display columns. ANSI escape sequences take
/// no columns; width 0 (no terminal) disables wrapping.
pub fn wrap(text: &str, width: u16) -> String {
    if width == 0 {
        return text.to_string();
    }
    let width = width as usize;
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let mut col = 0;
        let mut in_escape = false;
        for ch in line.chars() {
            if in_escape {
                out.push(ch);
                if ch.is_ascii_alphabetic() {
                    in_escape = false;
                }
                continue;
            }
            if ch == '\u{1b}' {
                in_escape = true;
                out.push(ch);
                continue;
            }
            let w = ch.width().unwrap_or(0);
            if col + w > width {
                out.push('\n');
                col = 0;
            }
            out.push(ch);
            col += w;
        }
    }
    out
}
