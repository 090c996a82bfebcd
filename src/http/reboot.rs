//! Administrator-triggered reboot countdown.

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
};

use crate::http::response::GatewayError;
use crate::http::server::AppState;
use crate::reboot::MINUTES_LEFT_PARAM;

/// `GET /reboot?minutesLeft=N` answers 200 with an empty body on success.
///
/// When `minutesLeft` is repeated the first occurrence is used.
pub async fn reboot(
    State(state): State<AppState>,
    method: Method,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<StatusCode, GatewayError> {
    if method != Method::GET {
        return Err(GatewayError::MethodNotAllowed);
    }
    state
        .reboot
        .trigger(first_value(&params, MINUTES_LEFT_PARAM))
        .await?;
    Ok(StatusCode::OK)
}

fn first_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_wins() {
        let params = vec![
            ("other".to_string(), "1".to_string()),
            ("minutesLeft".to_string(), "10".to_string()),
            ("minutesLeft".to_string(), "abc".to_string()),
        ];
        assert_eq!(first_value(&params, MINUTES_LEFT_PARAM), Some("10"));
        assert_eq!(first_value(&params, "missing"), None);
    }
}
