use thiserror::Error;

pub const USAGE: &str = "Commands: 'k <pid>' to kill process, 'q' to quit";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("missing process id. Use 'k <pid>' to kill a process")]
    MissingPid,
    #[error("'{0}' is not a valid process id. Use 'k <pid>' with a positive integer")]
    InvalidPid(String),
    #[error("Invalid command: '{0}'. Commands: 'k <pid>' to kill process, 'q' to quit")]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Kill(u32),
    Invalid(InputError),
    None,
}

/// Turns one operator line into an action. Input is trimmed and
/// case-insensitive.
pub fn parse_command(line: &str) -> Action {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Action::None;
    };

    match command.to_lowercase().as_str() {
        "q" | "quit" | "exit" if parts.next().is_none() => Action::Quit,
        "k" | "kill" => {
            let Some(arg) = parts.next() else {
                return Action::Invalid(InputError::MissingPid);
            };
            if parts.next().is_some() {
                return Action::Invalid(InputError::Unknown(line.to_string()));
            }
            match arg.parse::<u32>() {
                Ok(pid) if pid > 0 => Action::Kill(pid),
                _ => Action::Invalid(InputError::InvalidPid(arg.to_string())),
            }
        }
        _ => Action::Invalid(InputError::Unknown(line.to_string())),
    }
}
