//! Terminal drawing. Pure output: takes a `Frame` and queues crossterm
//! commands into any writer, so it renders into a `Vec<u8>` in tests.

use std::io::{self, Write};
use std::ops::Range;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};
use timer_core::{format_hms_cs, TimerState, TimerView};

use crate::app::{Frame, Overlay, HELP_TEXT};

const MAX_BOX_WIDTH: u16 = 48;
const MIN_BOX_WIDTH: u16 = 24;
const HEADER_ROWS: u16 = 2;
const FOOTER_ROWS: u16 = 2;
const FOOTER_HINT: &str =
    "Space start/pause  l lap  r reset  n new  d delete  \u{2191}\u{2193} select  ? help  q quit";

pub fn draw(out: &mut impl Write, frame: &Frame<'_>, width: u16, height: u16) -> io::Result<()> {
    // Rows are overwritten in place and only their tails cleared, so a
    // tick never blanks the whole screen.
    let used = match frame.overlay {
        Overlay::Help => draw_help(out)?,
        Overlay::ConfirmQuit => draw_confirm_quit(out)?,
        Overlay::None => {
            draw_header(out, frame)?;
            let bottom = height.saturating_sub(FOOTER_ROWS);
            let row = draw_timers(out, frame, width, bottom)?;
            clear_rows(out, row..bottom)?;
            draw_footer(out, frame, height)?;
            height
        }
    };
    queue!(out, MoveTo(0, used), Clear(ClearType::FromCursorDown))?;
    out.flush()
}

fn clear_rows(out: &mut impl Write, rows: Range<u16>) -> io::Result<()> {
    for row in rows {
        queue!(out, MoveTo(0, row), Clear(ClearType::UntilNewLine))?;
    }
    Ok(())
}

/// Prints `text` at the start of `row` and wipes whatever is left of the
/// previous frame to its right.
fn line(out: &mut impl Write, row: u16, text: &str) -> io::Result<()> {
    queue!(
        out,
        MoveTo(0, row),
        Print(text),
        Clear(ClearType::UntilNewLine),
    )
}

fn draw_header(out: &mut impl Write, frame: &Frame<'_>) -> io::Result<()> {
    let count = frame.snapshot.timers.len();
    let running = frame
        .snapshot
        .timers
        .iter()
        .filter(|t| t.state == TimerState::Running)
        .count();
    queue!(
        out,
        MoveTo(0, 0),
        Print(" "),
        SetAttribute(Attribute::Bold),
        Print("Thymer"),
        SetAttribute(Attribute::Reset),
        Print(format!(
            "  {} timer{}, {} running",
            count,
            if count == 1 { "" } else { "s" },
            running
        )),
        Clear(ClearType::UntilNewLine),
    )?;
    clear_rows(out, 1..HEADER_ROWS)
}

/// Rows one timer box occupies: two borders, time, status, lap summary,
/// then up to `lap_rows` recent laps.
pub fn box_height(view: &TimerView<'_>, lap_rows: usize) -> u16 {
    let laps = u16::try_from(view.laps.len().min(lap_rows)).unwrap_or(u16::MAX);
    let summary = u16::from(!view.laps.is_empty());
    laps.saturating_add(4 + summary)
}

/// Picks the contiguous run of boxes to show so the selected one is on
/// screen, scrolling as little as possible from the top.
pub fn visible_range(heights: &[u16], selected: Option<usize>, available: u16) -> Range<usize> {
    if heights.is_empty() {
        return 0..0;
    }
    let selected = selected.unwrap_or(0).min(heights.len() - 1);

    let mut first = 0;
    while first < selected {
        let used: u32 = heights[first..=selected].iter().map(|&h| u32::from(h)).sum();
        if used <= u32::from(available) {
            break;
        }
        first += 1;
    }

    let mut end = first;
    let mut used = 0u32;
    while end < heights.len() {
        let next = used + u32::from(heights[end]);
        if next > u32::from(available) && end > selected {
            break;
        }
        used = next;
        end += 1;
    }
    first..end
}

/// Draws boxes from `HEADER_ROWS` down, never touching `bottom` or below.
/// Returns the first row left undrawn.
fn draw_timers(out: &mut impl Write, frame: &Frame<'_>, width: u16, bottom: u16) -> io::Result<u16> {
    let timers = &frame.snapshot.timers;
    if timers.is_empty() {
        if HEADER_ROWS >= bottom {
            return Ok(HEADER_ROWS);
        }
        queue!(
            out,
            MoveTo(0, HEADER_ROWS),
            Print("  "),
            SetForegroundColor(Color::DarkGrey),
            Print("No timers. Press n to create one."),
            ResetColor,
            Clear(ClearType::UntilNewLine),
        )?;
        return Ok(HEADER_ROWS + 1);
    }

    let box_width = width.saturating_sub(2).clamp(MIN_BOX_WIDTH, MAX_BOX_WIDTH);
    let available = bottom.saturating_sub(HEADER_ROWS);
    let heights: Vec<u16> = timers.iter().map(|t| box_height(t, frame.lap_rows)).collect();
    let range = visible_range(&heights, frame.snapshot.selected, available);

    let mut row = HEADER_ROWS;
    for index in range {
        if row >= bottom {
            break;
        }
        let selected = frame.snapshot.selected == Some(index);
        row = draw_timer_box(out, &timers[index], selected, frame.lap_rows, row, bottom, box_width)?;
    }
    Ok(row)
}

fn draw_timer_box(
    out: &mut impl Write,
    view: &TimerView<'_>,
    selected: bool,
    lap_rows: usize,
    top: u16,
    bottom: u16,
    width: u16,
) -> io::Result<u16> {
    let inner = usize::from(width.saturating_sub(2));
    let border = if selected { Color::Blue } else { Color::DarkGrey };

    let marker = if selected { "\u{2192} " } else { "" };
    let title: String = format!(" {}{} ", marker, view.name)
        .chars()
        .take(inner)
        .collect();
    let fill = inner.saturating_sub(title.chars().count() + 1);

    queue!(out, MoveTo(0, top), Print(" "), SetForegroundColor(border))?;
    if selected {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    queue!(
        out,
        Print(format!("\u{250c}\u{2500}{}{}\u{2510}", title, "\u{2500}".repeat(fill))),
        SetAttribute(Attribute::Reset),
        ResetColor,
        Clear(ClearType::UntilNewLine),
    )?;

    let (icon, status_color) = match view.state {
        TimerState::Running => ("\u{25b6}", Color::Green),
        TimerState::Paused => ("\u{23f8}", Color::Yellow),
        TimerState::Idle => ("\u{25a0}", Color::DarkGrey),
    };

    let mut rows: Vec<(String, Option<Color>)> = vec![
        (format!("Time:   {}", format_hms_cs(view.elapsed_ms)), None),
        (format!("Status: {} {}", icon, view.state.label()), Some(status_color)),
    ];
    if !view.laps.is_empty() {
        rows.push((format!("Laps:   {} recorded", view.laps.len()), None));
        let skip = view.laps.len().saturating_sub(lap_rows);
        for lap in &view.laps[skip..] {
            rows.push((
                format!("  Lap {}: {}", lap.index, format_hms_cs(lap.split_ms)),
                Some(Color::Cyan),
            ));
        }
    }

    let mut row = top + 1;
    for (text, color) in rows {
        // Leave the last allowed row for the bottom border.
        if row + 1 >= bottom {
            break;
        }
        let text: String = text.chars().take(inner.saturating_sub(1)).collect();
        let pad = inner.saturating_sub(text.chars().count() + 1);
        queue!(
            out,
            MoveTo(0, row),
            Print(" "),
            SetForegroundColor(border),
            Print("\u{2502} "),
            ResetColor,
        )?;
        if let Some(color) = color {
            queue!(out, SetForegroundColor(color))?;
        }
        queue!(
            out,
            Print(text),
            ResetColor,
            Print(" ".repeat(pad)),
            SetForegroundColor(border),
            Print("\u{2502}"),
            ResetColor,
            Clear(ClearType::UntilNewLine),
        )?;
        row += 1;
    }

    if row >= bottom {
        return Ok(row);
    }
    queue!(
        out,
        MoveTo(0, row),
        Print(" "),
        SetForegroundColor(border),
        Print(format!("\u{2514}{}\u{2518}", "\u{2500}".repeat(inner))),
        ResetColor,
        Clear(ClearType::UntilNewLine),
    )?;
    Ok(row + 1)
}

fn draw_footer(out: &mut impl Write, frame: &Frame<'_>, height: u16) -> io::Result<()> {
    let hint_row = height.saturating_sub(1);
    queue!(out, MoveTo(0, hint_row.saturating_sub(1)), Print(" "))?;
    if let Some(status) = frame.status {
        queue!(
            out,
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor,
        )?;
    }
    queue!(
        out,
        Clear(ClearType::UntilNewLine),
        MoveTo(0, hint_row),
        Print(" "),
        SetForegroundColor(Color::DarkGrey),
        Print(FOOTER_HINT),
        ResetColor,
        Clear(ClearType::UntilNewLine),
    )
}

/// Returns the first row below the overlay.
fn draw_help(out: &mut impl Write) -> io::Result<u16> {
    clear_rows(out, 0..1)?;
    let mut row = 1;
    for (i, text) in HELP_TEXT.lines().enumerate() {
        if i == 0 {
            queue!(
                out,
                MoveTo(0, row),
                Print("  "),
                SetAttribute(Attribute::Bold),
                Print(text),
                SetAttribute(Attribute::Reset),
                Clear(ClearType::UntilNewLine),
            )?;
        } else {
            line(out, row, &format!("  {}", text))?;
        }
        row += 1;
    }
    clear_rows(out, row..row + 1)?;
    queue!(
        out,
        MoveTo(0, row + 1),
        Print("  "),
        SetForegroundColor(Color::DarkGrey),
        Print("Press any key to close"),
        ResetColor,
        Clear(ClearType::UntilNewLine),
    )?;
    Ok(row + 2)
}

fn draw_confirm_quit(out: &mut impl Write) -> io::Result<u16> {
    clear_rows(out, 0..1)?;
    queue!(
        out,
        MoveTo(0, 1),
        Print("  "),
        SetAttribute(Attribute::Bold),
        Print("Timer Running"),
        SetAttribute(Attribute::Reset),
        Clear(ClearType::UntilNewLine),
    )?;
    clear_rows(out, 2..3)?;
    line(out, 3, "  A timer is still running. Quit anyway?")?;
    clear_rows(out, 4..5)?;
    line(out, 5, "    y = Stop & quit")?;
    line(out, 6, "    n = Cancel")?;
    Ok(7)
}
