use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use tally::prelude::*;

use crate::log;
use crate::report::{Error, ErrorExt, Report};
use crate::session::Session;
use crate::Run;

/// Columns between buttons.
const GAP: u16 = 4;

const HELP: &str = "+/- click   \u{2190}/\u{2192} focus   enter click focused   q quit";

pub fn run(r: &Run) -> Report<()> {
    let session = Session::start(r.counter.start);

    log::starting!("counter at {}", session.value());

    let clicks = {
        let mut screen = Screen::enter()?;

        interact(&mut screen, &session)?
    };

    log::finished!("counter at {} after {clicks} clicks", session.value());

    Ok(())
}

fn interact(screen: &mut Screen, session: &Session) -> Report<usize> {
    let mut focus = 0;
    let mut clicks = 0;

    loop {
        let (width, height) = terminal::size().message("failed to read terminal size")?;
        let heading = session.displayed()?;
        let layout = Layout::new(width, height, &heading, session.buttons());

        draw(&mut screen.out, &layout, focus)
            .with_message(|| format!("failed to draw the counter at {heading}"))?;

        let event = event::read().message("failed to read terminal event")?;
        let clicked = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match input(key) {
                Input::Click(action) => Some(action),
                Input::ClickFocused => layout.buttons.get(focus).and_then(|b| b.action),
                Input::Focus(forward) => {
                    focus = cycle(focus, layout.buttons.len(), forward);
                    None
                }
                Input::Quit => return Ok(clicks),
                Input::Ignore => None,
            },
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => layout.hit(column, row).and_then(|idx| {
                focus = idx;
                layout.buttons[idx].action
            }),
            _ => None,
        };

        if let Some(action) = clicked {
            session.click(action)?;
            clicks += 1;
        }
    }
}

/// Raw mode and the alternate screen, restored on drop.
struct Screen {
    out: Stdout,
}

impl Screen {
    fn enter() -> Report<Self> {
        terminal::enable_raw_mode().message("failed to enable raw mode")?;

        let mut out = io::stdout();

        if let Err(err) = execute!(out, EnterAlternateScreen, EnableMouseCapture, Hide) {
            let _ = terminal::disable_raw_mode();

            return Err(Error::new(err, "failed to set up the terminal"));
        }

        Ok(Screen { out })
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Input {
    Click(Action),
    ClickFocused,
    /// Move focus forward (`true`) or backward (`false`)
    Focus(bool),
    Quit,
    Ignore,
}

fn input(key: KeyEvent) -> Input {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Input::Quit,
            _ => Input::Ignore,
        };
    }

    match key.code {
        KeyCode::Char('+' | '=' | 'k') | KeyCode::Up => Input::Click(Action::Increment),
        KeyCode::Char('-' | '_' | 'j') | KeyCode::Down => Input::Click(Action::Decrement),
        KeyCode::Right | KeyCode::Tab => Input::Focus(true),
        KeyCode::Left | KeyCode::BackTab => Input::Focus(false),
        KeyCode::Enter | KeyCode::Char(' ') => Input::ClickFocused,
        KeyCode::Char('q') | KeyCode::Esc => Input::Quit,
        _ => Input::Ignore,
    }
}

fn cycle(focus: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }

    if forward {
        (focus + 1) % len
    } else {
        (focus + len - 1) % len
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Rect {
    x: u16,
    y: u16,
    width: u16,
}

impl Rect {
    fn contains(self, column: u16, row: u16) -> bool {
        row == self.y && column >= self.x && column - self.x < self.width
    }
}

#[derive(Debug)]
struct Button {
    rect: Rect,
    text: String,
    action: Option<Action>,
}

/// Where the heading and the buttons go on screen. The heading sits just above the
/// vertical middle, the buttons a blank row below it, everything centered.
#[derive(Debug)]
struct Layout {
    heading: Rect,
    heading_text: String,
    buttons: Vec<Button>,
    help: Rect,
}

impl Layout {
    fn new(width: u16, height: u16, heading: &str, buttons: Vec<(String, Option<Action>)>) -> Self {
        let mid = height / 2;
        let heading_width = text_width(heading);

        let buttons = buttons
            .into_iter()
            .map(|(label, action)| {
                let text = format!("[ {label} ]");

                Button {
                    rect: Rect {
                        x: 0,
                        y: (mid + 1).min(height.saturating_sub(1)),
                        width: text_width(&text),
                    },
                    text,
                    action,
                }
            })
            .collect::<Vec<_>>();

        let total = buttons
            .iter()
            .map(|b| b.rect.width)
            .fold(0_u16, |acc, w| acc.saturating_add(w).saturating_add(GAP))
            .saturating_sub(GAP);

        let mut x = center(width, total);
        let buttons = buttons
            .into_iter()
            .map(|mut b| {
                b.rect.x = x;
                x = x.saturating_add(b.rect.width).saturating_add(GAP);
                b
            })
            .collect();

        Layout {
            heading: Rect {
                x: center(width, heading_width),
                y: mid.saturating_sub(1),
                width: heading_width,
            },
            heading_text: heading.to_owned(),
            buttons,
            help: Rect {
                x: center(width, text_width(HELP)),
                y: height.saturating_sub(1),
                width: text_width(HELP),
            },
        }
    }

    /// Index of the button at the given cell.
    fn hit(&self, column: u16, row: u16) -> Option<usize> {
        self.buttons
            .iter()
            .position(|b| b.rect.contains(column, row))
    }
}

fn text_width(text: &str) -> u16 {
    text.chars().count().try_into().unwrap_or(u16::MAX)
}

fn center(width: u16, len: u16) -> u16 {
    width.saturating_sub(len) / 2
}

fn draw<W: Write>(out: &mut W, layout: &Layout, focus: usize) -> io::Result<()> {
    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(layout.heading.x, layout.heading.y),
        PrintStyledContent(layout.heading_text.as_str().bold()),
    )?;

    for (idx, button) in layout.buttons.iter().enumerate() {
        queue!(out, MoveTo(button.rect.x, button.rect.y))?;

        if idx == focus {
            queue!(out, PrintStyledContent(button.text.as_str().reverse()))?;
        } else {
            queue!(out, Print(&button.text))?;
        }
    }

    queue!(
        out,
        MoveTo(layout.help.x, layout.help.y),
        PrintStyledContent(HELP.dim()),
    )?;

    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buttons() -> Vec<(String, Option<Action>)> {
        vec![
            ("+1".to_owned(), Some(Action::Increment)),
            ("-1".to_owned(), Some(Action::Decrement)),
        ]
    }

    #[test]
    fn key_bindings() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(input(key(KeyCode::Char('+'))), Input::Click(Action::Increment));
        assert_eq!(input(key(KeyCode::Up)), Input::Click(Action::Increment));
        assert_eq!(input(key(KeyCode::Char('-'))), Input::Click(Action::Decrement));
        assert_eq!(input(key(KeyCode::Char('j'))), Input::Click(Action::Decrement));
        assert_eq!(input(key(KeyCode::Tab)), Input::Focus(true));
        assert_eq!(input(key(KeyCode::Left)), Input::Focus(false));
        assert_eq!(input(key(KeyCode::Enter)), Input::ClickFocused);
        assert_eq!(input(key(KeyCode::Esc)), Input::Quit);
        assert_eq!(input(key(KeyCode::Char('x'))), Input::Ignore);
        assert_eq!(
            input(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Input::Quit
        );
    }

    #[test]
    fn focus_wraps_around() {
        assert_eq!(cycle(0, 2, true), 1);
        assert_eq!(cycle(1, 2, true), 0);
        assert_eq!(cycle(0, 2, false), 1);
        assert_eq!(cycle(0, 0, false), 0);
    }

    #[test]
    fn layout_is_centered() {
        let layout = Layout::new(40, 10, "3", buttons());

        assert_eq!(layout.heading, Rect { x: 19, y: 4, width: 1 });

        // "[ +1 ]" and "[ -1 ]" are 6 columns each, plus the gap: 16 columns.
        assert_eq!(layout.buttons[0].rect, Rect { x: 12, y: 6, width: 6 });
        assert_eq!(layout.buttons[1].rect, Rect { x: 22, y: 6, width: 6 });
        assert_eq!(layout.buttons[1].text, "[ -1 ]");
        assert_eq!(layout.help.y, 9);
    }

    #[test]
    fn hit_testing() {
        let layout = Layout::new(40, 10, "0", buttons());

        assert_eq!(layout.hit(12, 6), Some(0));
        assert_eq!(layout.hit(17, 6), Some(0));
        assert_eq!(layout.hit(18, 6), None);
        assert_eq!(layout.hit(27, 6), Some(1));
        assert_eq!(layout.hit(14, 5), None);
    }

    #[test]
    fn tiny_terminal() {
        let layout = Layout::new(2, 1, "-1234", buttons());

        assert_eq!(layout.heading.x, 0);
        assert_eq!(layout.heading.y, 0);
        assert_eq!(layout.buttons[0].rect.y, 0);
    }

    #[test]
    fn draws_heading_and_buttons() {
        let session = Session::start(4321);
        let layout = Layout::new(40, 10, &session.displayed().unwrap(), session.buttons());
        let mut out = Vec::new();

        draw(&mut out, &layout, 1).unwrap();

        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("4321"));
        assert!(out.contains("[ +1 ]"));
        assert!(out.contains("[ -1 ]"));
    }
}
