use crate::error::{ApiError, Result};
use crate::model::{Annotation, Reference};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://sciwheel.com/extapi/work";

pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: String,
    timeout_secs: u64,
}

impl ApiClient {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(token, 30)
    }

    pub fn with_timeout(token: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("annomap/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", DEFAULT_BASE_URL, e)))?;

        Ok(Self {
            client,
            base_url,
            token: token.into(),
            timeout_secs,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        self.base_url = parsed;
        Ok(self)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// `GET {base}/references/{id}`
    pub async fn fetch_reference(&self, reference_id: &str) -> Result<Reference> {
        let url = self.endpoint(&["references", reference_id])?;
        self.get_json(url).await
    }

    /// `GET {base}/references/{id}/notes`
    pub async fn fetch_notes(&self, reference_id: &str) -> Result<Vec<Annotation>> {
        let url = self.endpoint(&["references", reference_id, "notes"])?;
        self.get_json(url).await
    }

    /// Issues both requests concurrently; the first failure wins.
    pub async fn fetch_reference_with_notes(
        &self,
        reference_id: &str,
    ) -> Result<(Reference, Vec<Annotation>)> {
        info!("Fetching reference {} and its notes", reference_id);
        futures::try_join!(
            self.fetch_reference(reference_id),
            self.fetch_notes(reference_id)
        )
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json;charset=UTF-8")
            .send()
            .await?;
        let status = response.status();
        debug!("{} answered {} in {:?}", url, status, start.elapsed());

        if status != StatusCode::OK {
            return Err(ApiError::from_status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new("secret-token")
            .unwrap()
            .with_base_url(&format!("{}/extapi/work", server.uri()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_reference_sends_bearer_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/extapi/work/references/9357944"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 9357944,
                "title": "Mind maps for reading",
                "abstractText": "We study notes.",
                "publishedYear": 2019,
                "authorsText": "Doe J, Roe R",
                "pmid": "123"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let reference = client.fetch_reference("9357944").await.unwrap();

        assert_eq!(reference.title_text(), "Mind maps for reading");
        assert_eq!(reference.published_year_text(), "2019");
        assert_eq!(reference.authors_text(), "Doe J, Roe R");
    }

    #[tokio::test]
    async fn test_fetch_notes_decodes_nullable_comments() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/extapi/work/references/42/notes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "comment": "#m ##sampling", "highlightText": "we sampled", "replies": []},
                {"id": 2, "comment": null, "highlightText": "plain highlight"},
                {"id": 3, "highlightText": "no comment field"}
            ])))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let notes = client.fetch_notes("42").await.unwrap();

        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].comment_text(), Some("#m ##sampling"));
        assert_eq!(notes[1].comment_text(), None);
        assert_eq!(notes[2].comment_text(), None);
        assert_eq!(notes[2].highlight(), Some("no comment field"));
    }

    #[tokio::test]
    async fn test_status_codes_map_to_error_categories() {
        let cases = [
            (401, "401"),
            (403, "403"),
            (500, "500"),
            (404, "404"),
        ];

        for (status, id) in cases {
            let mock_server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(format!("/extapi/work/references/{}", id)))
                .respond_with(ResponseTemplate::new(status))
                .mount(&mock_server)
                .await;

            let client = client_for(&mock_server).await;
            let err = client.fetch_reference(id).await.unwrap_err();

            match status {
                401 => assert!(matches!(err, ApiError::Unauthorized)),
                403 => assert!(matches!(err, ApiError::Forbidden)),
                500 => assert!(matches!(err, ApiError::ServerError)),
                _ => assert!(matches!(err, ApiError::UnexpectedStatus(404))),
            }
            assert_eq!(err.status(), Some(status));
        }
    }

    #[tokio::test]
    async fn test_non_200_success_is_unclassified() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/extapi/work/references/7"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let err = client.fetch_reference("7").await.unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedStatus(204)));
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_decode_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/extapi/work/references/7/notes"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let err = client.fetch_notes("7").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_joined_fetch_short_circuits_on_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/extapi/work/references/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"title": "t"})))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/extapi/work/references/5/notes"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let err = client.fetch_reference_with_notes("5").await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = ApiClient::new("t")
            .unwrap()
            .with_base_url("https://example.com/extapi/work/")
            .unwrap();
        let url = client.endpoint(&["references", "12", "notes"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/extapi/work/references/12/notes");
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        let result = ApiClient::new("t").unwrap().with_base_url("mailto:someone@example.com");
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }
}
