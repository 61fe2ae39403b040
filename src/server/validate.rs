// src/server/validate.rs
// =============================================================================
// Checks the body of POST /api/v1/search before anything touches the
// network.
//
// Rules:
// - the body must be a JSON object with both "username" and "pattern"
// - username must be a string that is not empty or blank
// - pattern must be a non-empty string that compiles as a regex
//
// The compiled pattern is handed on with the params so the search does not
// compile it a second time.
// =============================================================================

use crate::search::Pattern;
use crate::server::error::ApiError;
use serde_json::Value;

/// A search request that passed validation
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub username: String,
    pub pattern: Pattern,
}

pub fn clean_search_request(body: Option<&Value>) -> Result<SearchParams, ApiError> {
    let object = body
        .and_then(Value::as_object)
        .filter(|o| o.contains_key("username") && o.contains_key("pattern"))
        .ok_or_else(|| ApiError::BadRequest("username and pattern are required".to_string()))?;

    let username = match object.get("username") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => {
            return Err(ApiError::BadRequest(
                "invalid username, expected a non-empty string".to_string(),
            ))
        }
    };

    let pattern = match object.get("pattern") {
        Some(Value::String(s)) if !s.is_empty() => Pattern::compile(s).ok(),
        _ => None,
    };
    let pattern = pattern.ok_or_else(|| {
        ApiError::BadRequest(format!(
            "invalid pattern: {}",
            object.get("pattern").map(ToString::to_string).unwrap_or_default()
        ))
    })?;

    Ok(SearchParams { username, pattern })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(result: Result<SearchParams, ApiError>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_valid_request() {
        let body = json!({"username": "octocat", "pattern": "import requests"});
        let params = clean_search_request(Some(&body)).unwrap();
        assert_eq!(params.username, "octocat");
        assert_eq!(params.pattern.as_str(), "import requests");
        assert!(params.pattern.matches("import requests as r"));
    }

    #[test]
    fn test_missing_body_or_fields() {
        assert_eq!(message(clean_search_request(None)), "username and pattern are required");

        let body = json!({"username": "octocat"});
        assert_eq!(
            message(clean_search_request(Some(&body))),
            "username and pattern are required"
        );

        let body = json!(["octocat", "foo"]);
        assert!(clean_search_request(Some(&body)).is_err());
    }

    #[test]
    fn test_bad_username() {
        for username in [json!(""), json!("   "), json!(42), json!(null)] {
            let body = json!({"username": username, "pattern": "foo"});
            assert!(message(clean_search_request(Some(&body))).starts_with("invalid username"));
        }
    }

    #[test]
    fn test_bad_pattern() {
        for pattern in [json!(""), json!("("), json!(7)] {
            let body = json!({"username": "octocat", "pattern": pattern});
            assert!(message(clean_search_request(Some(&body))).starts_with("invalid pattern"));
        }
    }
}
