use crate::geocoding::{ApiKey, GeocodeError, GeocodeLookup};
use crate::models::Coordinates;
use crate::utils::constants::OPENCAGE_ENDPOINT;
use serde::Deserialize;
use std::time::Duration;
use ureq::{Agent, AgentBuilder};

/// Blocking OpenCage forward-geocoding client
pub struct OpenCageClient {
    agent: Agent,
    endpoint: String,
    api_key: ApiKey,
}

impl OpenCageClient {
    pub fn new(api_key: ApiKey, timeout: Duration) -> Self {
        Self::with_endpoint(api_key, timeout, OPENCAGE_ENDPOINT)
    }

    pub fn with_endpoint(api_key: ApiKey, timeout: Duration, endpoint: &str) -> Self {
        let agent = AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            endpoint: endpoint.to_string(),
            api_key,
        }
    }
}

impl GeocodeLookup for OpenCageClient {
    fn lookup(&self, query: &str, country: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let mut request = self
            .agent
            .get(&self.endpoint)
            .query("q", query)
            .query("key", self.api_key.expose())
            .query("limit", "1")
            .query("no_annotations", "1");

        let country = country.trim().to_lowercase();
        if !country.is_empty() {
            request = request.query("countrycode", &country);
        }

        let body = request
            .call()
            .map_err(map_transport_error)?
            .into_string()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        parse_response(&body)
    }
}

fn map_transport_error(error: ureq::Error) -> GeocodeError {
    match error {
        ureq::Error::Status(429, _) => GeocodeError::RateLimited(429),
        ureq::Error::Status(code, response) => {
            let message = response
                .into_string()
                .ok()
                .and_then(|body| serde_json::from_str::<OpenCageResponse>(&body).ok())
                .and_then(|parsed| parsed.status)
                .map(|status| status.message)
                .unwrap_or_default();
            GeocodeError::Rejected { code, message }
        }
        ureq::Error::Transport(transport) => GeocodeError::Transport(transport.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    status: Option<ResponseStatus>,
    #[serde(default)]
    results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
struct ResponseStatus {
    code: u16,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

/// Extract the best (first) match from an OpenCage JSON body
fn parse_response(body: &str) -> Result<Option<Coordinates>, GeocodeError> {
    let response: OpenCageResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::MalformedResponse(e.to_string()))?;

    if let Some(status) = response.status {
        match status.code {
            200 => {}
            402 | 429 => return Err(GeocodeError::RateLimited(status.code)),
            code => {
                return Err(GeocodeError::Rejected {
                    code,
                    message: status.message,
                })
            }
        }
    }

    let Some(best) = response.results.into_iter().next() else {
        return Ok(None);
    };

    let coordinates = Coordinates::new(best.geometry.lat, best.geometry.lng);
    if !coordinates.is_valid() {
        return Err(GeocodeError::MalformedResponse(format!(
            "coordinates out of range: ({}, {})",
            coordinates.latitude, coordinates.longitude
        )));
    }

    Ok(Some(coordinates))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_result() {
        let body = r#"{
            "status": {"code": 200, "message": "OK"},
            "results": [
                {"geometry": {"lat": 40.7128, "lng": -74.006}, "confidence": 9},
                {"geometry": {"lat": 10.0, "lng": 10.0}}
            ],
            "total_results": 2
        }"#;

        assert_eq!(
            parse_response(body),
            Ok(Some(Coordinates::new(40.7128, -74.006)))
        );
    }

    #[test]
    fn test_parse_no_results() {
        let body = r#"{"status": {"code": 200, "message": "OK"}, "results": []}"#;
        assert_eq!(parse_response(body), Ok(None));
    }

    #[test]
    fn test_parse_error_status() {
        let quota = r#"{"status": {"code": 402, "message": "quota exceeded"}, "results": []}"#;
        assert_eq!(parse_response(quota), Err(GeocodeError::RateLimited(402)));

        let bad_key = r#"{"status": {"code": 401, "message": "invalid API key"}, "results": []}"#;
        assert_eq!(
            parse_response(bad_key),
            Err(GeocodeError::Rejected {
                code: 401,
                message: "invalid API key".to_string()
            })
        );
    }

    #[test]
    fn test_parse_malformed_body() {
        assert!(matches!(
            parse_response("<html>gateway timeout</html>"),
            Err(GeocodeError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response(r#"{"results": [{"geometry": {"lat": "north"}}]}"#),
            Err(GeocodeError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response(r#"{"results": [{"geometry": {"lat": 95.0, "lng": 0.0}}]}"#),
            Err(GeocodeError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        let key = ApiKey::parse("abc123").unwrap();
        let client = OpenCageClient::with_endpoint(
            key,
            Duration::from_secs(2),
            "http://127.0.0.1:9/geocode",
        );

        let result = client.lookup("Savoria, Dillon", "US");
        assert!(matches!(result, Err(GeocodeError::Transport(_))));
    }
}
