//! Line-oriented JSON command protocol.
//!
//! Each input line is one command object tagged by `op`:
//!
//! ```text
//! {"op": "add_counter", "label": "Flights", "operator": "Bob", "specialization": "flight"}
//! {"op": "submit", "category": "flight", "priority": "vip", "quantity": 1, "amount": 750.0}
//! {"op": "pull_next", "counter": 1}
//! ```
//!
//! Each command yields one response line, `{"ok": ...}` or
//! `{"error": {"kind": ..., "message": ...}}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use queuedesk_core::{CounterId, Desk, DeskError, ErrorKind, NewCounter, NewRequest, RequestId};

use crate::metrics;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Submit(NewRequest),
    PullNext { counter: CounterId },
    StartService { counter: CounterId },
    CompleteService { counter: CounterId },
    CancelService { counter: CounterId },
    AddCounter(NewCounter),
    ToggleCounter { counter: CounterId },
    Stats,
    Find { request: RequestId },
    Waiting,
    Counters,
    Announcements,
    History,
    Reset,
    Metrics,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid command: {0}")]
    Parse(serde_json::Error),

    #[error(transparent)]
    Desk(#[from] DeskError),

    #[error("failed to encode response: {0}")]
    Encode(serde_json::Error),
}

impl CommandError {
    fn kind(&self) -> &'static str {
        match self {
            CommandError::Parse(_) => "invalid_input",
            CommandError::Desk(e) => match e.kind() {
                ErrorKind::CapacityExceeded => "capacity_exceeded",
                ErrorKind::NotFound => "not_found",
                ErrorKind::InvalidState => "invalid_state",
                ErrorKind::InvalidInput => "invalid_input",
            },
            CommandError::Encode(_) => "internal",
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Ok(Value),
    Error(ErrorBody),
}

impl From<CommandError> for Response {
    fn from(err: CommandError) -> Self {
        Response::Error(ErrorBody {
            kind: err.kind().to_string(),
            message: err.to_string(),
        })
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value, CommandError> {
    serde_json::to_value(value).map_err(CommandError::Encode)
}

/// Run one command against the desk.
pub fn execute(desk: &Desk, command: Command) -> Result<Value, CommandError> {
    debug!("Executing {:?}", command);
    match command {
        Command::Submit(new) => encode(&desk.submit(new)?),
        Command::PullNext { counter } => encode(&desk.pull_next(counter)?),
        Command::StartService { counter } => encode(&desk.start_service(counter)?),
        Command::CompleteService { counter } => encode(&desk.complete_service(counter)?),
        Command::CancelService { counter } => encode(&desk.cancel_service(counter)?),
        Command::AddCounter(spec) => encode(&desk.add_counter(spec)?),
        Command::ToggleCounter { counter } => {
            let active = desk.toggle_counter(counter)?;
            Ok(serde_json::json!({ "counter": counter, "active": active }))
        }
        Command::Stats => encode(&desk.stats()),
        Command::Find { request } => encode(&desk.find(request)?),
        Command::Waiting => encode(&desk.waiting()),
        Command::Counters => encode(&desk.counters()),
        Command::Announcements => encode(&desk.announcements()),
        Command::History => encode(&desk.history()),
        Command::Reset => {
            desk.reset();
            Ok(Value::Null)
        }
        Command::Metrics => {
            metrics::collect_dynamic_metrics(desk);
            Ok(Value::String(metrics::encode_metrics()))
        }
    }
}

/// Parse and run one input line.
pub fn handle_line(desk: &Desk, line: &str) -> Response {
    let result = serde_json::from_str::<Command>(line)
        .map_err(CommandError::Parse)
        .and_then(|command| execute(desk, command));

    match result {
        Ok(value) => Response::Ok(value),
        Err(err) => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use queuedesk_core::Config;
    use serde_json::json;

    fn ok(response: Response) -> Value {
        match response {
            Response::Ok(value) => value,
            Response::Error(body) => panic!("unexpected error: {:?}", body),
        }
    }

    fn error_kind(response: Response) -> String {
        match response {
            Response::Error(body) => body.kind,
            Response::Ok(value) => panic!("unexpected success: {}", value),
        }
    }

    #[test]
    fn test_submit_and_dispatch() {
        let desk = Desk::new(Config::default());
        let counter = ok(handle_line(
            &desk,
            r#"{"op":"add_counter","label":"Flights","operator":"Bob","specialization":"flight"}"#,
        ));
        assert_eq!(counter, json!(1));

        let submitted = ok(handle_line(
            &desk,
            r#"{"op":"submit","category":"flight","priority":"senior","quantity":1,"amount":750.0,
                "metadata":{"customer_name":"Sarah Johnson"}}"#,
        ));
        assert_eq!(submitted["id"], json!(1001));
        assert_eq!(submitted["priority"], json!("premium"));
        assert_eq!(submitted["status"], json!("pending"));

        let pulled = ok(handle_line(&desk, r#"{"op":"pull_next","counter":1}"#));
        assert_eq!(pulled["status"], json!("assigned"));

        let board = ok(handle_line(&desk, r#"{"op":"announcements"}"#));
        assert_eq!(board[0]["kind"], json!("calling"));
        assert_eq!(board[0]["customer_name"], json!("Sarah Johnson"));

        ok(handle_line(&desk, r#"{"op":"start_service","counter":1}"#));
        let receipt = ok(handle_line(&desk, r#"{"op":"complete_service","counter":1}"#));
        assert_eq!(receipt["confirmation_code"], json!("TKT1001"));

        let stats = ok(handle_line(&desk, r#"{"op":"stats"}"#));
        assert_eq!(stats["confirmed"], json!(1));
        assert_eq!(stats["revenue"], json!(750.0));
    }

    #[test]
    fn test_error_kinds() {
        let desk = Desk::new(Config::default());
        assert_eq!(
            error_kind(handle_line(&desk, r#"{"op":"pull_next","counter":7}"#)),
            "not_found"
        );
        assert_eq!(
            error_kind(handle_line(&desk, r#"{"op":"find","request":1001}"#)),
            "not_found"
        );
        assert_eq!(
            error_kind(handle_line(
                &desk,
                r#"{"op":"submit","category":"movie","priority":"urgent","quantity":1,"amount":1.0}"#
            )),
            "invalid_input"
        );
        assert_eq!(
            error_kind(handle_line(
                &desk,
                r#"{"op":"submit","category":"movie","priority":"normal","quantity":0,"amount":1.0}"#
            )),
            "invalid_input"
        );
        assert_eq!(error_kind(handle_line(&desk, "not json")), "invalid_input");

        ok(handle_line(
            &desk,
            r#"{"op":"add_counter","label":"General","operator":"Emma"}"#,
        ));
        assert_eq!(
            error_kind(handle_line(&desk, r#"{"op":"complete_service","counter":1}"#)),
            "invalid_state"
        );
    }

    #[test]
    fn test_toggle_and_reset() {
        let desk = Desk::new(Config::default());
        ok(handle_line(
            &desk,
            r#"{"op":"add_counter","label":"General","operator":"Emma"}"#,
        ));
        let toggled = ok(handle_line(&desk, r#"{"op":"toggle_counter","counter":1}"#));
        assert_eq!(toggled, json!({"counter": 1, "active": false}));

        assert_eq!(ok(handle_line(&desk, r#"{"op":"reset"}"#)), Value::Null);
        let counters = ok(handle_line(&desk, r#"{"op":"counters"}"#));
        assert_eq!(counters, json!([]));
    }

    #[test]
    fn test_response_serialization() {
        let response = Response::Error(ErrorBody {
            kind: "not_found".to_string(),
            message: "unknown counter: 3".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"error": {"kind": "not_found", "message": "unknown counter: 3"}})
        );
        assert_eq!(
            serde_json::to_value(Response::Ok(json!(1))).unwrap(),
            json!({"ok": 1})
        );
    }
}
