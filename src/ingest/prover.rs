//! Prover Speed API Client
//!
//! Retrieves the hourly prover speed ("power") of an address from the prover
//! service. One POST per window, no retry, default client timeouts.
//!
//! Endpoint: POST {base}/api/v1/provers/prover_speed_address
//! Request:  {"address": string, "start_time": i64, "end_time": i64}
//! Response: {"code": int, "message": string, "data": "<float as string>"}

use serde::{Deserialize, Serialize};

use crate::model::{FetchError, HourlyWindow};

pub const PROVER_SPEED_PATH: &str = "/api/v1/provers/prover_speed_address";

// ============================================================================
// API Request / Response Structures
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ProverSpeedRequest<'a> {
    pub address: &'a str,
    pub start_time: i64,
    pub end_time: i64,
}

/// Response envelope. `data` carries the float as a JSON string and is only
/// meaningful when `code == 0`.
#[derive(Debug, Deserialize)]
pub struct ProverSpeedResponse {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<String>,
}

impl ProverSpeedResponse {
    /// Converts the envelope into the power value, surfacing API errors and
    /// unparseable `data` strings.
    pub fn into_power(self) -> Result<f64, FetchError> {
        if self.code != 0 {
            return Err(FetchError::Api(self.message));
        }
        let raw = self
            .data
            .ok_or_else(|| FetchError::Decode("response has no data field".to_string()))?;
        parse_json_number(&raw)
    }
}

/// Decodes the inner string of `data` as a JSON number literal.
///
/// Only the JSON grammar is accepted: no surrounding whitespace, no leading
/// `+` or `.`, no `NaN`/`inf` spellings, and the result must be finite.
fn parse_json_number(raw: &str) -> Result<f64, FetchError> {
    let not_a_number = |detail: String| FetchError::Decode(format!("data {:?} is not a number: {}", raw, detail));

    if raw.trim() != raw {
        return Err(not_a_number("surrounding whitespace".to_string()));
    }
    let value = serde_json::from_str::<f64>(raw).map_err(|e| not_a_number(e.to_string()))?;
    if !value.is_finite() {
        return Err(not_a_number("value is not finite".to_string()));
    }
    Ok(value)
}

// ============================================================================
// Source trait
// ============================================================================

/// Anything that can produce the power value for one window.
pub trait PowerSource {
    fn fetch_power(&self, address: &str, window: &HourlyWindow) -> Result<f64, FetchError>;
}

// ============================================================================
// HTTP client
// ============================================================================

#[derive(Debug, Clone)]
pub struct ProverSpeedClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl ProverSpeedClient {
    pub fn new(http: reqwest::blocking::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, PROVER_SPEED_PATH)
    }

    /// Fetch the prover speed for `address` over `[start_time, end_time)`.
    ///
    /// The HTTP status is not inspected: the server reports failures through
    /// the `code` field of the body.
    pub fn fetch_prover_speed(
        &self,
        address: &str,
        start_time: i64,
        end_time: i64,
    ) -> Result<f64, FetchError> {
        let request = ProverSpeedRequest {
            address,
            start_time,
            end_time,
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("Accept", "application/json")
            .json(&request)
            .send()?;

        let body = response.text()?;
        let envelope: ProverSpeedResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        envelope.into_power()
    }
}

impl PowerSource for ProverSpeedClient {
    fn fetch_power(&self, address: &str, window: &HourlyWindow) -> Result<f64, FetchError> {
        self.fetch_prover_speed(address, window.start_epoch(), window.end_epoch())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    const ADDRESS: &str = "0x4a1f9c2e7b3d";

    fn client_for(server: &Server) -> ProverSpeedClient {
        ProverSpeedClient::new(reqwest::blocking::Client::new(), server.url())
    }

    // --- Envelope decoding --------------------------------------------------

    #[test]
    fn test_string_encoded_data_parses_to_float() {
        let resp: ProverSpeedResponse =
            serde_json::from_value(json!({"code": 0, "message": "ok", "data": "123.456"})).unwrap();
        assert_eq!(resp.into_power().unwrap(), 123.456);
    }

    #[test]
    fn test_nonzero_code_carries_message() {
        let resp: ProverSpeedResponse =
            serde_json::from_value(json!({"code": 1, "message": "not found"})).unwrap();
        match resp.into_power() {
            Err(FetchError::Api(msg)) => assert_eq!(msg, "not found"),
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_data_is_decode_error() {
        let resp: ProverSpeedResponse =
            serde_json::from_value(json!({"code": 0, "message": "", "data": "fast"})).unwrap();
        assert!(matches!(resp.into_power(), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_data_must_be_a_json_number_literal() {
        for raw in ["NaN", "inf", "-infinity", "+1.5", ".5", " 12 ", "12 ", "1e400", "0x10", ""] {
            let resp: ProverSpeedResponse =
                serde_json::from_value(json!({"code": 0, "message": "", "data": raw})).unwrap();
            assert!(
                matches!(resp.into_power(), Err(FetchError::Decode(_))),
                "data {:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_json_number_forms_are_accepted() {
        for (raw, expected) in [("0", 0.0), ("-3.25", -3.25), ("1e3", 1000.0), ("2.5E-1", 0.25)] {
            let resp: ProverSpeedResponse =
                serde_json::from_value(json!({"code": 0, "message": "", "data": raw})).unwrap();
            assert_eq!(resp.into_power().unwrap(), expected, "data {:?}", raw);
        }
    }

    #[test]
    fn test_missing_data_on_success_is_decode_error() {
        let resp: ProverSpeedResponse =
            serde_json::from_value(json!({"code": 0, "message": "ok"})).unwrap();
        assert!(matches!(resp.into_power(), Err(FetchError::Decode(_))));
    }

    // --- HTTP round trips ---------------------------------------------------

    #[test]
    fn test_fetch_sends_window_as_json_body() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", PROVER_SPEED_PATH)
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "address": ADDRESS,
                "start_time": 1_704_038_400i64,
                "end_time": 1_704_042_000i64
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"code": 0, "message": "success", "data": "42.5"}).to_string())
            .expect(1)
            .create();

        let power = client_for(&server)
            .fetch_prover_speed(ADDRESS, 1_704_038_400, 1_704_042_000)
            .expect("mocked fetch should succeed");

        assert_eq!(power, 42.5);
        mock.assert();
    }

    #[test]
    fn test_api_error_response() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", PROVER_SPEED_PATH)
            .with_status(200)
            .with_body(json!({"code": 1, "message": "not found"}).to_string())
            .create();

        let result = client_for(&server).fetch_prover_speed(ADDRESS, 0, 3600);

        assert!(matches!(result, Err(FetchError::Api(ref m)) if m == "not found"));
        mock.assert();
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("POST", PROVER_SPEED_PATH)
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create();

        let result = client_for(&server).fetch_prover_speed(ADDRESS, 0, 3600);
        assert!(matches!(result, Err(FetchError::Decode(_))), "got {:?}", result);
    }

    #[test]
    fn test_connection_refused_is_transport_error() {
        // Port 1 is reserved (tcpmux) and not listening in test environments.
        let client = ProverSpeedClient::new(reqwest::blocking::Client::new(), "http://127.0.0.1:1");
        let result = client.fetch_prover_speed(ADDRESS, 0, 3600);
        assert!(matches!(result, Err(FetchError::Transport(_))), "got {:?}", result);
    }

    #[test]
    fn test_trailing_slash_in_base_url_is_ignored() {
        let client = ProverSpeedClient::new(reqwest::blocking::Client::new(), "http://localhost:8088/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:8088/api/v1/provers/prover_speed_address"
        );
    }
}
