//! Line commands accepted by the interactive front end.

use client_core::ParameterField;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Set { field: ParameterField, value: String },
    Show,
    Save(String),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  root <note>        A A# B C C# D D# E F F# G G#
  scale <type>       minor | major | harmonic minor
  tuning <notes..>   e.g. E A D G B E
  frets <n>
  chord <name|->     highlight a chord, '-' clears
  show               print the current query and chord list
  save <path>        write the displayed diagram to a file
  quit";

pub fn parse_command(line: &str) -> Result<Option<ReplCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "show" => ReplCommand::Show,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        "save" if rest.is_empty() => return Err("save needs a file path".to_string()),
        "save" => ReplCommand::Save(rest.to_string()),
        other => {
            let field = other
                .parse::<ParameterField>()
                .map_err(|err| format!("{err}; type 'help' for commands"))?;
            ReplCommand::Set {
                field,
                value: rest.to_string(),
            }
        }
    };
    Ok(Some(command))
}
