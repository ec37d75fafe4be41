use crate::views::form::{MultiField, SingleField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Show,
    Quit,
    Problem(String),
    Select { field: SingleField, input: String },
    Toggle { field: MultiField, input: String },
    Submit,
    Open(usize),
    Go(String),
    Back,
    Search(String),
    Reset,
}

pub const HELP: &str = "\
Commands:
  problem <text>           set the problem description (empty clears)
  phase|cluster|paradigm <n|iri|label|->
  task|dataset <n|iri|label|->
  condition <n|iri|label>  toggle a condition
  performance <n|iri|label>
                           toggle a performance preference
  submit                   run recommendations
  open <n>                 show details for result n
  search <text>            filter supporting articles (empty clears)
  go <path>                navigate to a path
  back                     return to the form
  reset                    clear the form and results
  show                     render the current page again
  help                     this text
  quit                     leave the shell";

pub fn parse(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, unquote(rest.trim())),
        None => (line, String::new()),
    };

    let command = match keyword.to_ascii_lowercase().as_str() {
        "help" | "?" => ShellCommand::Help,
        "show" => ShellCommand::Show,
        "quit" | "exit" => ShellCommand::Quit,
        "submit" => ShellCommand::Submit,
        "back" => ShellCommand::Back,
        "reset" => ShellCommand::Reset,
        "problem" => ShellCommand::Problem(rest),
        "search" => ShellCommand::Search(rest),
        "phase" => select(SingleField::Phase, rest)?,
        "cluster" => select(SingleField::Cluster, rest)?,
        "paradigm" => select(SingleField::Paradigm, rest)?,
        "task" => select(SingleField::Task, rest)?,
        "dataset" => select(SingleField::DatasetType, rest)?,
        "condition" => toggle(MultiField::Conditions, rest)?,
        "performance" => toggle(MultiField::Performance, rest)?,
        "open" => {
            let rank = rest
                .parse::<usize>()
                .map_err(|_| format!("open expects a result number, got '{rest}'"))?;
            ShellCommand::Open(rank)
        }
        "go" => {
            if rest.is_empty() {
                return Err("go expects a path".to_string());
            }
            ShellCommand::Go(rest)
        }
        other => return Err(format!("unknown command '{other}'; type help")),
    };

    Ok(Some(command))
}

fn select(field: SingleField, input: String) -> Result<ShellCommand, String> {
    if input.is_empty() {
        return Err(format!("{} expects a choice", field.label()));
    }
    Ok(ShellCommand::Select { field, input })
}

fn toggle(field: MultiField, input: String) -> Result<ShellCommand, String> {
    if input.is_empty() || input == "-" {
        return Err(format!("{} expects a choice", field.label()));
    }
    Ok(ShellCommand::Toggle { field, input })
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}
