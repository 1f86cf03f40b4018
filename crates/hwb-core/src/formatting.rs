//! Formatting of chat messages (homework verdicts, failure reports).

use serde_json::Value;

use crate::{errors::Error, Result};

/// Known review status codes and the verdict shown to the student.
pub const HOMEWORK_VERDICTS: [(&str, &str); 3] = [
    ("approved", "Работа проверена: ревьюеру всё понравилось. Ура!"),
    ("reviewing", "Работа взята на проверку ревьюером."),
    ("rejected", "Работа проверена: у ревьюера есть замечания."),
];

pub fn verdict_for(status: &str) -> Option<&'static str> {
    HOMEWORK_VERDICTS
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, verdict)| *verdict)
}

/// Turn one homework record into the status-change notification.
pub fn parse_status(homework: &Value) -> Result<String> {
    let Some(record) = homework.as_object() else {
        return Err(Error::MalformedResponse(
            "homework record is not an object".to_string(),
        ));
    };

    let name = string_field(record, "homework_name")?;
    let status = string_field(record, "status")?;

    let verdict = verdict_for(status).ok_or_else(|| Error::UnknownStatus(status.to_string()))?;
    Ok(format!(
        "Изменился статус проверки работы \"{name}\". {verdict}"
    ))
}

/// Chat text reporting that a cycle failed.
pub fn failure_report(err: &Error) -> String {
    format!("Сбой в работе программы: {err}")
}

fn string_field<'a>(record: &'a serde_json::Map<String, Value>, key: &str) -> Result<&'a str> {
    match record.get(key) {
        None | Some(Value::Null) => Err(Error::MalformedResponse(format!(
            "homework record has no `{key}`"
        ))),
        Some(v) => v.as_str().ok_or_else(|| {
            Error::MalformedResponse(format!("homework `{key}` is not a string: {v}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn approved_message_matches_template() {
        let msg = parse_status(&json!({"homework_name": "hw1", "status": "approved"})).unwrap();
        assert_eq!(
            msg,
            "Изменился статус проверки работы \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[test]
    fn every_known_status_embeds_name_and_verdict() {
        for (code, verdict) in HOMEWORK_VERDICTS {
            let hw = json!({"homework_name": "user__project.zip", "status": code, "id": 7});
            let msg = parse_status(&hw).unwrap();
            assert!(msg.contains("user__project.zip"));
            assert!(msg.ends_with(verdict));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        for code in ["", "Approved", "pending", "done"] {
            let err = parse_status(&json!({"homework_name": "hw", "status": code})).unwrap_err();
            assert!(matches!(err, Error::UnknownStatus(ref s) if s == code));
        }
    }

    #[test]
    fn missing_fields_are_malformed() {
        let err = parse_status(&json!({"status": "approved"})).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(ref m) if m.contains("homework_name")));

        let err = parse_status(&json!({"homework_name": "hw"})).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(ref m) if m.contains("status")));

        let err = parse_status(&json!(["hw", "approved"])).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn failure_report_embeds_error() {
        let e = Error::UnknownStatus("pending".into());
        assert_eq!(
            failure_report(&e),
            "Сбой в работе программы: unknown homework status: pending"
        );
    }
}
