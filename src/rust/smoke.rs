use std::env;
use std::fmt;

use log::{debug, info};
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

/// Where the scoring service runs when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
/// Overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "RESUME_SCREENER_API_URL";

const SEPARATOR_WIDTH: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum SmokeError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

/// JSON body of `POST /calculate-ats-only`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtsRequest {
    pub job_description: String,
    pub resume_text: String,
}

impl AtsRequest {
    pub fn new(job_description: impl Into<String>, resume_text: impl Into<String>) -> Self {
        Self {
            job_description: job_description.into(),
            resume_text: resume_text.into(),
        }
    }

    /// The fixed job description and resume the smoke test submits.
    pub fn sample() -> Self {
        Self::new(
            "We are looking for a Python developer with experience in Django, Flask, and REST APIs. Knowledge of JavaScript and SQL is preferred.",
            "Experienced Python developer with 3 years of experience in Django and Flask. Built multiple web applications and REST APIs. Skills include Python, JavaScript, SQL, Git, and Docker.",
        )
    }
}

/// Response body as returned by the service.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => match serde_json::to_string_pretty(value) {
                Ok(pretty) => write!(f, "{}", pretty),
                Err(_) => write!(f, "{}", value),
            },
            Self::Text(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EndpointResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl EndpointResponse {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    async fn from_response(response: reqwest::Response) -> Result<Self, SmokeError> {
        let status = response.status();
        let text = response.text().await?;
        let body = match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        };
        Ok(Self { status, body })
    }

    fn print(&self, title: &str) {
        println!("{}:", title);
        println!("Status Code: {}", self.status.as_u16());
        println!("Response: {}", self.body);
        println!("{}", "-".repeat(SEPARATOR_WIDTH));
    }
}

/// Outcome of [`SmokeClient::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmokeReport {
    pub health_ok: bool,
    /// `None` when the score check was skipped because the health check failed.
    pub ats_ok: Option<bool>,
}

fn base_url_or_default(configured: Option<String>) -> String {
    match configured {
        Some(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

/// Issues the manual smoke-test requests against an ATS scoring service.
///
/// Failures never propagate: every check prints what happened and reports
/// a plain `bool`.
#[derive(Debug, Clone)]
pub struct SmokeClient {
    client: Client,
    base_url: String,
}

impl SmokeClient {
    pub fn new(base_url: &str) -> Result<Self, SmokeError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let url = Url::parse(trimmed).map_err(|_| SmokeError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(SmokeError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base_url: trimmed.to_string(),
        })
    }

    /// Uses `RESUME_SCREENER_API_URL` when set, `http://localhost:5000` otherwise.
    pub fn new_default() -> Result<Self, SmokeError> {
        Self::new(&Self::get_default_base_url())
    }

    pub fn get_default_base_url() -> String {
        base_url_or_default(env::var(BASE_URL_ENV).ok())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /health`.
    pub async fn get_health(&self) -> Result<EndpointResponse, SmokeError> {
        let url = self.endpoint("/health");
        info!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        EndpointResponse::from_response(response).await
    }

    /// `POST /calculate-ats-only` with a JSON body.
    pub async fn post_calculate_ats_only(&self, request: &AtsRequest) -> Result<EndpointResponse, SmokeError> {
        let url = self.endpoint("/calculate-ats-only");
        info!("POST {}", url);
        let response = self.client.post(&url).json(request).send().await?;
        EndpointResponse::from_response(response).await
    }

    /// Prints the health endpoint's status and body; true iff it answered 200.
    pub async fn health_check(&self) -> bool {
        match self.get_health().await {
            Ok(response) => {
                response.print("Health Check");
                response.is_ok()
            }
            Err(e) => {
                debug!("Health check failed: {}", e);
                println!("Health check failed: {}", e);
                false
            }
        }
    }

    /// Submits [`AtsRequest::sample`] for scoring; true iff the service answered 200.
    pub async fn calculate_ats_only(&self) -> bool {
        match self.post_calculate_ats_only(&AtsRequest::sample()).await {
            Ok(response) => {
                response.print("ATS Calculation Test");
                response.is_ok()
            }
            Err(e) => {
                debug!("ATS calculation test failed: {}", e);
                println!("ATS calculation test failed: {}", e);
                false
            }
        }
    }

    /// How to exercise `POST /analyze-resume`, which needs a PDF upload and is never called here.
    pub fn analyze_resume_instructions(&self) -> String {
        format!(
            "Analyze Resume Endpoint:\n\
             This endpoint requires a PDF file upload.\n\
             You can test it manually using curl or Postman:\n\
             \n    curl -X POST {}/analyze-resume \\\n      \
             -F \"job_description=Python developer with Django experience\" \\\n      \
             -F \"resume_file=@path/to/your/resume.pdf\"\n",
            self.base_url
        )
    }

    /// Health check, then the score check if the service is healthy, then the upload instructions.
    pub async fn run(&self) -> SmokeReport {
        println!("Testing ATS Scoring API");
        println!("{}", "=".repeat(SEPARATOR_WIDTH));

        let health_ok = self.health_check().await;
        let ats_ok = if health_ok {
            Some(self.calculate_ats_only().await)
        } else {
            info!("Skipping score calculation, service is not healthy");
            None
        };

        println!("{}", self.analyze_resume_instructions());
        println!("{}", "-".repeat(SEPARATOR_WIDTH));
        println!(
            "\nTo test with your deployed API, pass --base-url or set {}",
            BASE_URL_ENV
        );

        SmokeReport { health_ok, ats_ok }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_validation() {
        assert!(SmokeClient::new("http://localhost:5000").is_ok());
        assert!(SmokeClient::new("https://ats.example.com/api/").is_ok());
        assert!(matches!(
            SmokeClient::new("localhost:5000"),
            Err(SmokeError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            SmokeClient::new("ftp://example.com"),
            Err(SmokeError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = SmokeClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.endpoint("/health"), "http://localhost:5000/health");
    }

    #[test]
    fn test_sample_request_serialization() {
        let value = serde_json::to_value(AtsRequest::sample()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object["job_description"].as_str().unwrap().contains("Python developer"));
        assert!(object["resume_text"].as_str().unwrap().contains("Django and Flask"));
    }

    #[test]
    fn test_analyze_resume_instructions() {
        let client = SmokeClient::new("http://api.example.com").unwrap();
        let text = client.analyze_resume_instructions();
        assert!(text.contains("curl -X POST http://api.example.com/analyze-resume"));
        assert!(text.contains("job_description="));
        assert!(text.contains("resume_file=@"));
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(
            base_url_or_default(Some("http://scoring.internal:8080".to_string())),
            "http://scoring.internal:8080"
        );
        assert_eq!(base_url_or_default(Some("  ".to_string())), DEFAULT_BASE_URL);
        assert_eq!(base_url_or_default(None), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_unreachable_service_reports_false() {
        // Bind then drop to get a local port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SmokeClient::new(&format!("http://{}", addr)).unwrap();
        assert!(!client.health_check().await);
        assert!(!client.calculate_ats_only().await);
        assert_eq!(
            client.run().await,
            SmokeReport {
                health_ok: false,
                ats_ok: None
            }
        );
    }
}
