//! Action word and `key:value` argument parsing.

use std::collections::BTreeMap;
use std::fmt;
use tm_migrate::MigrateError;

/// A trailing `key:value` argument. A bare `key` is a flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ArgValue {
    Flag,
    Text(String),
}

impl ArgValue {
    pub(crate) fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            ArgValue::Flag => None,
        }
    }
}

pub(crate) type ArgMap = BTreeMap<String, ArgValue>;

/// What the invocation asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Up,
    Down,
    Status { json: bool },
    Make { name: String },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Up => f.write_str("up"),
            Action::Down => f.write_str("down"),
            Action::Status { .. } => f.write_str("status"),
            Action::Make { name } => write!(f, "make:{name}"),
        }
    }
}

impl Action {
    /// Whether the action runs a batch inside a store transaction.
    pub(crate) fn is_batch(&self) -> bool {
        matches!(self, Action::Up | Action::Down)
    }
}

/// Split trailing arguments into a map. Later keys win.
pub(crate) fn parse_args(raw: &[String]) -> ArgMap {
    raw.iter()
        .filter(|arg| !arg.is_empty())
        .map(|arg| match arg.split_once(':') {
            Some((key, value)) => (key.to_string(), ArgValue::Text(value.to_string())),
            None => (arg.clone(), ArgValue::Flag),
        })
        .collect()
}

/// Resolve the action word and its arguments.
pub(crate) fn parse_action(action: Option<&str>, args: &ArgMap) -> Result<Action, MigrateError> {
    let Some(word) = action.map(str::trim).filter(|w| !w.is_empty()) else {
        return Err(MigrateError::UsageError(
            "no action given; expected one of up, down, status, make:<name>".to_string(),
        ));
    };
    let (verb, inline) = match word.split_once(':') {
        Some((verb, rest)) => (verb, Some(rest)),
        None => (word, None),
    };

    match verb {
        "up" => Ok(Action::Up),
        "down" => Ok(Action::Down),
        "status" => {
            let json = args.contains_key("json")
                || args.get("format").and_then(ArgValue::as_text) == Some("json");
            Ok(Action::Status { json })
        }
        "make" => {
            let name = inline
                .filter(|n| !n.trim().is_empty())
                .or_else(|| args.get("name").and_then(ArgValue::as_text))
                .ok_or_else(|| {
                    MigrateError::UsageError(
                        "make needs a name: `tm make:<name>` or `tm make name:<name>`".to_string(),
                    )
                })?;
            Ok(Action::Make {
                name: name.to_string(),
            })
        }
        other => Err(MigrateError::UsageError(format!(
            "unrecognized action '{other}'; expected one of up, down, status, make:<name>"
        ))),
    }
}

#[cfg(test)]
#[path = "action_test.rs"]
mod tests;
