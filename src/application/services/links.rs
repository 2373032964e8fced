//! Short link service
//!
//! Maps each operation onto one HTTP request and interprets the status code.

use std::sync::Arc;

use tracing::{debug, instrument};
use url::Url;

use crate::application::outcome::{CommandOutcome, LinkStatus, ListResponse};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{ShortId, ShortLink, TargetUrl};
use crate::infrastructure::traits::{HttpRequest, HttpResponse, HttpTransport, Method};

const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";
const LOCATION: &str = "Location";

/// Service for the four shortener operations.
pub struct LinkService {
    settings: Arc<Settings>,
    transport: Arc<dyn HttpTransport>,
}

impl LinkService {
    /// Create a new link service.
    pub fn new(settings: Arc<Settings>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    /// `GET /api/list`. 200 carries a JSON object of short ID to target URL.
    #[instrument(skip(self))]
    pub fn list(&self) -> ApplicationResult<CommandOutcome<ListResponse>> {
        self.settings.ensure_ready()?;
        let request = self.request(Method::Get, format!("{}/api/list", self.base()));
        let response = self.send(&request, "error listing links")?;

        Ok(match response.status {
            200 => CommandOutcome::Success(ListResponse {
                body: response.body,
            }),
            status => Self::failure(status, response.body),
        })
    }

    /// `GET /{short_id}` without following the redirect.
    ///
    /// 200 or 302 means the link exists; 404 means it does not.
    #[instrument(skip(self))]
    pub fn get(&self, short_id: &str) -> ApplicationResult<CommandOutcome<LinkStatus>> {
        self.settings.ensure_ready()?;
        let short_id = ShortId::parse(short_id)?;
        // namespaced IDs keep their slashes, the service routes on the full path
        let url = format!("{}/{}", self.base(), short_id);
        let request = self.request(Method::Get, url.clone()).without_redirects();
        let response = self.send(&request, "error looking up link")?;

        let status = LinkStatus {
            short_id,
            request_url: url,
            status: response.status,
            location: response.header(LOCATION).map(str::to_string),
        };
        Ok(match response.status {
            200 | 302 => CommandOutcome::Success(status),
            404 => CommandOutcome::NotFound(status),
            code => Self::failure(code, response.body),
        })
    }

    /// `POST /api/create` with `{"short_id": ..., "target_url": ...}`. Expects 201.
    #[instrument(skip(self))]
    pub fn add(
        &self,
        short_id: &str,
        target_url: &str,
    ) -> ApplicationResult<CommandOutcome<ShortLink>> {
        self.settings.ensure_ready()?;
        let link = ShortLink::new(ShortId::parse(short_id)?, TargetUrl::parse(target_url)?);
        let body = serde_json::to_string(&link).map_err(|source| ApplicationError::Encode {
            context: "error creating link".into(),
            source,
        })?;
        let request = self
            .request(Method::Post, format!("{}/api/create", self.base()))
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        let response = self.send(&request, "error creating link")?;

        Ok(match response.status {
            201 => CommandOutcome::Success(link),
            status => Self::failure(status, response.body),
        })
    }

    /// `DELETE /api/delete/{short_id}` with the ID percent-encoded as one segment.
    #[instrument(skip(self))]
    pub fn delete(&self, short_id: &str) -> ApplicationResult<CommandOutcome<ShortId>> {
        self.settings.ensure_ready()?;
        let short_id = ShortId::parse(short_id)?;
        let url = self.delete_url(&short_id)?;
        let request = self.request(Method::Delete, url);
        let response = self.send(&request, "error deleting link")?;

        Ok(match response.status {
            200 => CommandOutcome::Success(short_id),
            status => Self::failure(status, response.body),
        })
    }

    fn base(&self) -> &str {
        &self.settings.base_url
    }

    fn request(&self, method: Method, url: String) -> HttpRequest {
        HttpRequest::new(method, url).header(AUTHORIZATION, self.settings.api_token.as_str())
    }

    fn delete_url(&self, short_id: &ShortId) -> ApplicationResult<String> {
        let mut url = Url::parse(self.base()).map_err(|e| {
            ApplicationError::config(format!("invalid base URL '{}': {e}", self.base()))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ApplicationError::config(format!("invalid base URL '{}'", self.base()))
            })?
            .pop_if_empty()
            .extend(["api", "delete", short_id.as_str()]);
        Ok(url.into())
    }

    fn send(&self, request: &HttpRequest, context: &str) -> ApplicationResult<HttpResponse> {
        debug!("{} {}", request.method, request.url);
        let response = self
            .transport
            .send(request)
            .map_err(|source| ApplicationError::Transport {
                context: context.to_string(),
                source,
            })?;
        debug!("{} {} -> {}", request.method, request.url, response.status);
        Ok(response)
    }

    fn failure<T>(status: u16, body: String) -> CommandOutcome<T> {
        match status {
            401 => CommandOutcome::Unauthorized { body },
            _ => CommandOutcome::ServerError { status, body },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::TransportError;

    struct Unreachable;

    impl HttpTransport for Unreachable {
        fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Err(TransportError::new("connection failed: refused"))
        }
    }

    fn service(base_url: &str) -> LinkService {
        let settings = Settings {
            api_token: "tok".into(),
            base_url: base_url.into(),
            timeout_secs: None,
        };
        LinkService::new(Arc::new(settings), Arc::new(Unreachable))
    }

    #[test]
    fn given_namespaced_id_when_building_delete_url_then_encodes_slash() {
        let svc = service("http://brig.gs");
        let id = ShortId::parse("a/b").unwrap();
        assert_eq!(svc.delete_url(&id).unwrap(), "http://brig.gs/api/delete/a%2Fb");
    }

    #[test]
    fn given_base_with_path_when_building_delete_url_then_appends_segments() {
        let svc = service("https://example.com/short");
        let id = ShortId::parse("x y").unwrap();
        assert_eq!(
            svc.delete_url(&id).unwrap(),
            "https://example.com/short/api/delete/x%20y"
        );
    }

    #[test]
    fn given_garbage_base_url_when_deleting_then_reports_config_error() {
        let svc = service("not a url");
        let err = svc.delete("a").unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
    }

    #[test]
    fn given_transport_failure_when_listing_then_reports_transport_error() {
        let err = service("http://brig.gs").list().unwrap_err();
        assert!(matches!(err, ApplicationError::Transport { .. }));
        assert!(err.to_string().starts_with("error listing links"));
    }
}
