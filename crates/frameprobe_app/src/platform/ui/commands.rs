use frameprobe_core::{Msg, ProbeKind};

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Url(String),
    Preset(String),
    Load,
    Probe(ProbeKind),
    ClearResults,
    ClearConsole,
    Presets,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
}

pub const HELP: &str = "\
commands:
  url <target>     set the frame target (empty clears it)
  preset <name>    load a preset target
  load             load the current target
  basic            probe basic frame properties
  document         probe document content
  network          probe network and security details
  forms            try form interaction
  clear-results    empty the results panel
  clear-console    reset the console panel
  presets          list preset names
  show             print both panels
  quit             exit";

/// Parses a command line; blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "url" => Command::Url(rest.to_string()),
        "preset" if rest.is_empty() => return Err(CommandError::MissingArgument("preset")),
        "preset" => Command::Preset(rest.to_string()),
        "load" => Command::Load,
        "basic" => Command::Probe(ProbeKind::Basic),
        "document" => Command::Probe(ProbeKind::Document),
        "network" => Command::Probe(ProbeKind::Network),
        "forms" => Command::Probe(ProbeKind::Forms),
        "clear-results" => Command::ClearResults,
        "clear-console" => Command::ClearConsole,
        "presets" => Command::Presets,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Some(command))
}

impl Command {
    /// The state message this command stands for; local commands have none.
    pub fn into_msg(self) -> Option<Msg> {
        match self {
            Command::Url(target) => Some(Msg::TargetEdited(target)),
            Command::Preset(name) => Some(Msg::PresetSelected(name)),
            Command::Load => Some(Msg::LoadRequested),
            Command::Probe(kind) => Some(Msg::ProbeRequested(kind)),
            Command::ClearResults => Some(Msg::ClearResults),
            Command::ClearConsole => Some(Msg::ClearConsole),
            Command::Presets | Command::Show | Command::Help | Command::Quit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_keeps_the_rest_of_the_line() {
        assert_eq!(
            parse_command("url  data:text/html,<p>a b</p>  ").unwrap(),
            Some(Command::Url("data:text/html,<p>a b</p>".into()))
        );
        assert_eq!(
            parse_command("url").unwrap(),
            Some(Command::Url(String::new()))
        );
    }

    #[test]
    fn preset_requires_a_name() {
        assert_eq!(
            parse_command("preset").unwrap_err(),
            CommandError::MissingArgument("preset")
        );
        assert_eq!(
            parse_command("PRESET form-test").unwrap(),
            Some(Command::Preset("form-test".into()))
        );
    }

    #[test]
    fn probes_map_to_probe_requests() {
        let msgs: Vec<_> = ["basic", "document", "network", "forms"]
            .iter()
            .map(|line| parse_command(line).unwrap().unwrap().into_msg().unwrap())
            .collect();
        let expected: Vec<_> = ProbeKind::ALL.into_iter().map(Msg::ProbeRequested).collect();
        assert_eq!(msgs, expected);
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(
            parse_command("reload now").unwrap_err(),
            CommandError::Unknown("reload".into())
        );
    }

    #[test]
    fn local_commands_have_no_message() {
        for line in ["presets", "show", "help", "quit"] {
            let command = parse_command(line).unwrap().unwrap();
            assert_eq!(command.into_msg(), None, "{line}");
        }
    }
}
