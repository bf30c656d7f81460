//! Line-oriented command parsing for the terminal front-end.

use crate::error::CommandError;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    /// 1-based index into the listing.
    Play(usize),
    Toggle,
    Seek(f64),
    Drag(f64),
    DragMove(f64),
    Drop(f64),
    Close,
    Open,
    Mini,
    Stop,
    Sleep(SleepRequest),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SleepRequest {
    Minutes(f64),
    /// Use the configured default duration.
    Default,
    Off,
}

pub const HELP: &str = "\
commands:
  list                 show practices
  play <n>             play practice number n
  toggle               play/pause
  seek <secs|m:ss>     jump to a position
  drag <secs>          start a scrub gesture
  drag-move <secs>     move the scrub handle
  drop <secs>          release the scrub handle and seek
  close                send the player to the background
  open | mini          show the full-screen or the mini player
  stop                 stop and close the player
  sleep [min|off]      arm or disarm the sleep timer
  status               show what is playing
  quit";

/// Parse one input line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let cmd = match word.to_ascii_lowercase().as_str() {
        "list" | "ls" => Command::List,
        "play" | "p" => Command::Play(parse_index("play", arg)?),
        "toggle" | "t" | "pause" => Command::Toggle,
        "seek" => Command::Seek(parse_position("seek", arg)?),
        "drag" => Command::Drag(parse_position("drag", arg)?),
        "drag-move" | "move" => Command::DragMove(parse_position("drag-move", arg)?),
        "drop" => Command::Drop(parse_position("drop", arg)?),
        "close" => Command::Close,
        "open" | "full" => Command::Open,
        "mini" => Command::Mini,
        "stop" => Command::Stop,
        "sleep" => Command::Sleep(parse_sleep(arg)?),
        "status" | "s" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(cmd))
}

fn parse_index(command: &'static str, arg: Option<&str>) -> Result<usize, CommandError> {
    let value = arg.ok_or(CommandError::MissingArgument {
        command,
        expected: "a practice number",
    })?;
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidArgument {
            command,
            value: value.to_string(),
            expected: "practice number",
        }),
    }
}

/// Seconds (`95`, `12.5`) or a clock (`1:35`).
fn parse_position(command: &'static str, arg: Option<&str>) -> Result<f64, CommandError> {
    let value = arg.ok_or(CommandError::MissingArgument {
        command,
        expected: "a position",
    })?;
    let parsed = match value.split_once(':') {
        Some((m, s)) => match (m.parse::<u64>(), s.parse::<f64>()) {
            (Ok(m), Ok(s)) if (0.0..60.0).contains(&s) => Some(m as f64 * 60.0 + s),
            _ => None,
        },
        None => value.parse::<f64>().ok(),
    };
    parsed
        .filter(|p| p.is_finite())
        .ok_or_else(|| CommandError::InvalidArgument {
            command,
            value: value.to_string(),
            expected: "position",
        })
}

fn parse_sleep(arg: Option<&str>) -> Result<SleepRequest, CommandError> {
    match arg {
        None => Ok(SleepRequest::Default),
        Some(a) if a.eq_ignore_ascii_case("off") => Ok(SleepRequest::Off),
        Some(a) => match a.parse::<f64>() {
            Ok(m) if m.is_finite() && m > 0.0 => Ok(SleepRequest::Minutes(m)),
            _ => Err(CommandError::InvalidArgument {
                command: "sleep",
                value: a.to_string(),
                expected: "number of minutes",
            }),
        },
    }
}
