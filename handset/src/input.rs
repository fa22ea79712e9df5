//! Scripted input: text commands read from stdin, and the touch source the
//! UI loop feeds from them.

use crate::events::AppEvent;
use embedded_graphics::prelude::Point;
use handset_ui::{TouchSample, TouchSource};
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("'{command}' expects {expected}")]
    Arguments {
        command: &'static str,
        expected: &'static str,
    },
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
///
/// ```text
/// tap 60 100      down 10 60      up
/// joy -40 80      next            prev
/// page 2          pair            status Link lost
/// charge on       dump            quit
/// ```
pub fn parse_command(line: &str) -> Result<Option<AppEvent>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let event = match command.to_ascii_lowercase().as_str() {
        "down" => {
            let (x, y) = two_numbers(rest).ok_or(CommandError::Arguments {
                command: "down",
                expected: "<x> <y>",
            })?;
            AppEvent::TouchDown { x, y }
        }
        "up" => AppEvent::TouchUp,
        "tap" => {
            let (x, y) = two_numbers(rest).ok_or(CommandError::Arguments {
                command: "tap",
                expected: "<x> <y>",
            })?;
            AppEvent::Tap { x, y }
        }
        "joy" | "joystick" => {
            let (x, y) = two_numbers(rest).ok_or(CommandError::Arguments {
                command: "joy",
                expected: "<x> <y> in -100..=100",
            })?;
            AppEvent::Joystick { x, y }
        }
        "next" => AppEvent::NextPage,
        "prev" | "previous" => AppEvent::PreviousPage,
        "page" => {
            let id = rest.parse().map_err(|_| CommandError::Arguments {
                command: "page",
                expected: "<id>",
            })?;
            AppEvent::ShowPage(id)
        }
        "pair" => AppEvent::Pair,
        "charge" => match rest {
            "on" => AppEvent::Charging(true),
            "off" => AppEvent::Charging(false),
            _ => {
                return Err(CommandError::Arguments {
                    command: "charge",
                    expected: "on|off",
                });
            }
        },
        "status" => AppEvent::Status(rest.to_string()),
        "dump" => AppEvent::Dump,
        "quit" | "exit" => AppEvent::Shutdown,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(event))
}

fn two_numbers<T: std::str::FromStr>(args: &str) -> Option<(T, T)> {
    let mut parts = args.split_whitespace();
    let a = parts.next()?.parse().ok()?;
    let b = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((a, b))
}

/// Touch source whose current reading is set by the UI loop.
#[derive(Clone, Default)]
pub struct SharedTouch {
    sample: Rc<Cell<TouchSample>>,
}

impl SharedTouch {
    pub fn press(&self, x: i32, y: i32) {
        self.sample.set(TouchSample::contact(Point::new(x, y)));
    }

    pub fn lift(&self) {
        self.sample.set(TouchSample::RELEASED);
    }
}

impl TouchSource for SharedTouch {
    fn sample(&mut self) -> TouchSample {
        self.sample.get()
    }
}
