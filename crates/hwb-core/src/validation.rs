use serde_json::Value;

use crate::{domain::Cursor, errors::Error, Result};

/// Borrowed view of an API response that passed shape validation.
#[derive(Clone, Copy, Debug)]
pub struct HomeworkBatch<'a> {
    /// Newest first.
    pub homeworks: &'a [Value],
    pub current_date: Option<Cursor>,
}

impl<'a> HomeworkBatch<'a> {
    pub fn latest(&self) -> Option<&'a Value> {
        self.homeworks.first()
    }
}

/// Check that the API answered with an object carrying a `homeworks` list.
pub fn check_response(response: &Value) -> Result<HomeworkBatch<'_>> {
    tracing::debug!("checking api response");

    let Some(obj) = response.as_object() else {
        return Err(Error::MalformedResponse(format!(
            "expected a json object, got {}",
            json_type(response)
        )));
    };

    let Some(homeworks) = obj.get("homeworks") else {
        return Err(Error::MalformedResponse(
            "`homeworks` key is missing".to_string(),
        ));
    };

    let Some(homeworks) = homeworks.as_array() else {
        return Err(Error::MalformedResponse(format!(
            "`homeworks` must be a list, got {}",
            json_type(homeworks)
        )));
    };

    let current_date = match obj.get("current_date") {
        None | Some(Value::Null) => None,
        Some(v) => match v.as_i64() {
            Some(ts) => Some(ts),
            None => {
                tracing::warn!(value = %v, "ignoring non-integer `current_date`");
                None
            }
        },
    };

    tracing::debug!(count = homeworks.len(), "api response is well-formed");
    Ok(HomeworkBatch {
        homeworks: homeworks.as_slice(),
        current_date,
    })
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
