use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::{
    Image, ImageId, Page, Property, PropertyFilters, PropertyId,
    SessionStore, ValidationErrors, requests, responses,
};

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// Invoked after a 401 has cleared the session, e.g. to navigate to login.
pub type UnauthorizedHandler = Arc<dyn Fn() + Send + Sync>;

/// An API client for interfacing with the backend.
///
/// Every request carries the stored bearer token, if any. A 401 from any
/// call other than login clears the session and runs the unauthorized
/// handler.
#[derive(Clone)]
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
    session: SessionStore,
    on_unauthorized: Option<UnauthorizedHandler>,
}

impl std::fmt::Debug for APIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("APIClient")
            .field("address", &self.address)
            .field("session", &self.session)
            .finish()
    }
}

impl APIClient {
    pub fn new(address: impl Into<String>, session: SessionStore) -> Self {
        Self {
            address: address.into().trim_end_matches('/').to_string(),
            inner_client: reqwest::Client::new(),
            session,
            on_unauthorized: None,
        }
    }

    pub fn with_unauthorized_handler(
        mut self,
        handler: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_unauthorized = Some(Arc::new(handler));
        self
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Resolve an image URL for display. Absolute URLs pass through;
    /// server-relative ones are joined to the API base, dropping a leading
    /// `/api` so it isn't doubled.
    pub fn image_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        let path = url.strip_prefix("/api").unwrap_or(url);
        let path = path.trim_start_matches('/');
        format!("{}/api/{path}", self.address)
    }
}

/// Helper methods for http actions
impl APIClient {
    fn format_url(&self, path: &str) -> String {
        format!("{}/api/{path}", &self.address)
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> reqwest::RequestBuilder {
        let request = self.inner_client.request(method, self.format_url(path));
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request, applying the global 401 policy to the response.
    async fn send(&self, request: reqwest::RequestBuilder) -> ReqwestResult {
        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
        }
        Ok(response)
    }

    fn handle_unauthorized(&self) {
        tracing::warn!("Request was unauthorized, clearing session");
        self.session.clear();
        if let Some(handler) = &self.on_unauthorized {
            handler();
        }
    }

    async fn get(&self, path: &str) -> ReqwestResult {
        self.send(self.request(reqwest::Method::GET, path)).await
    }

    async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ReqwestResult {
        self.send(self.request(reqwest::Method::GET, path).query(query))
            .await
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        self.send(self.request(reqwest::Method::POST, path).json(body))
            .await
    }

    async fn put(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        self.send(self.request(reqwest::Method::PUT, path).json(body))
            .await
    }

    async fn delete(&self, path: &str) -> ReqwestResult {
        self.send(self.request(reqwest::Method::DELETE, path)).await
    }
}

/// Property endpoints
impl APIClient {
    /// All properties, unpaginated.
    #[tracing::instrument(skip(self))]
    pub async fn list_properties(&self) -> Result<Vec<Property>, ClientError> {
        let response = self.get("properties").await?;
        let body: ListBody = ok_body(response).await?;
        Ok(body.into_page().content)
    }

    /// Fetch one property. When the direct endpoint fails for any reason
    /// other than a rejected session, the full list is searched instead.
    #[tracing::instrument(skip(self))]
    pub async fn get_property(
        &self,
        id: PropertyId,
    ) -> Result<Property, ClientError> {
        let direct = match self.get(&format!("properties/{id}")).await {
            Ok(response) => ok_body(response).await,
            Err(e) => Err(e.into()),
        };
        let error = match direct {
            Ok(property) => return Ok(property),
            Err(ClientError::Unauthorized) => {
                return Err(ClientError::Unauthorized);
            }
            Err(e) => e,
        };

        tracing::debug!("Direct fetch of property {id} failed ({error}), searching the list");
        let properties = self.list_properties().await?;
        properties
            .into_iter()
            .find(|property| property.id == Some(id))
            .ok_or_else(|| {
                ClientError::NotFound(format!("Property {id} not found"))
            })
    }

    #[tracing::instrument(skip_all)]
    pub async fn create_property(
        &self,
        property: &Property,
    ) -> Result<Property, ClientError> {
        let body = Property {
            id: None,
            ..property.clone()
        };
        let response = self.post("properties", &body).await?;
        ok_body(response).await
    }

    #[tracing::instrument(skip(self, property))]
    pub async fn update_property(
        &self,
        id: PropertyId,
        property: &Property,
    ) -> Result<Property, ClientError> {
        let body = Property {
            id: Some(id),
            ..property.clone()
        };
        let response = self.put(&format!("properties/{id}"), &body).await?;
        ok_body(response).await
    }

    /// Deleting an id that does not exist is an error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_property(
        &self,
        id: PropertyId,
    ) -> Result<(), ClientError> {
        let response = self.delete(&format!("properties/{id}")).await?;
        ok_empty(response).await
    }

    /// Upload files in order as the multipart field `files`.
    #[tracing::instrument(skip(self, files), fields(count = files.len()))]
    pub async fn upload_images(
        &self,
        property_id: PropertyId,
        files: &[requests::UploadFile],
    ) -> Result<Vec<Image>, ClientError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.data.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.content_type)?;
            form = form.part("files", part);
        }
        let request = self
            .request(
                reqwest::Method::POST,
                &format!("images/upload/{property_id}"),
            )
            .multipart(form);
        let response = self.send(request).await?;
        ok_body(response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_image(&self, id: ImageId) -> Result<(), ClientError> {
        let response = self.delete(&format!("images/{id}")).await?;
        ok_empty(response).await
    }

    /// Quick search by address, returning the matching properties only.
    #[tracing::instrument(skip(self))]
    pub async fn search(
        &self,
        criteria: &requests::SearchCriteria,
    ) -> Result<Vec<Property>, ClientError> {
        let query = match criteria.address.trim() {
            "" => vec![],
            address => vec![("address", address.to_string())],
        };
        let response = self.get_with_query("properties/search", &query).await?;
        let body: ListBody = ok_body(response).await?;
        Ok(body.into_page().content)
    }

    /// The page of results for a full filter tuple.
    #[tracing::instrument(skip(self))]
    pub async fn search_properties(
        &self,
        filters: &PropertyFilters,
    ) -> Result<Page<Property>, ClientError> {
        let response = self
            .get_with_query("properties/search", &filters.search_params())
            .await?;
        let body: ListBody = ok_body(response).await?;
        Ok(body.into_page())
    }
}

/// Auth endpoints
impl APIClient {
    /// Log in and persist the session. Bad credentials do not go through the
    /// unauthorized handler.
    #[tracing::instrument(skip_all, fields(username = %credentials.username))]
    pub async fn login(
        &self,
        credentials: &requests::LoginCredentials,
    ) -> Result<responses::UserProfile, ClientError> {
        let request = self
            .request(reqwest::Method::POST, "auth/login")
            .json(credentials);
        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::InvalidCredentials);
        }
        let login: responses::LoginResponse = ok_body(response).await?;
        self.session.save(&login);
        Ok(login.profile())
    }

    /// Check the stored token with the backend and refresh the stored user.
    /// Returns `None` without a request when no token is stored.
    #[tracing::instrument(skip(self))]
    pub async fn validate_session(
        &self,
    ) -> Result<Option<responses::UserProfile>, ClientError> {
        if self.session.token().is_none() {
            return Ok(None);
        }
        let response = self.get("auth/validate").await?;
        let user: responses::UserProfile = ok_body(response).await?;
        self.session.save_user(&user);
        Ok(Some(user))
    }

    /// Forget the session locally. Always succeeds.
    pub fn logout(&self) {
        tracing::debug!("Logging out");
        self.session.clear();
    }
}

/// List endpoints may answer with a bare array or a page envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody {
    Page(Page<Property>),
    Items(Vec<Property>),
}

impl ListBody {
    fn into_page(self) -> Page<Property> {
        match self {
            Self::Page(page) => page,
            Self::Items(items) => Page::single(items),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Field-keyed messages from a 400 response.
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("{0}")]
    NotFound(String),
    /// The session was rejected and has been cleared.
    #[error("Your session has expired. Please log in again.")]
    Unauthorized,
    #[error("Invalid username or password.")]
    InvalidCredentials,
    /// An unhandled API error to display, containing response text.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    /// Transport failures and server errors, which are shown generically.
    pub fn is_generic_failure(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::APIError(status, _) => status.is_server_error(),
            _ => false,
        }
    }

    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        if self.is_generic_failure() {
            return "Something went wrong. Please try again later."
                .to_string();
        }
        self.to_string()
    }
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    Ok(response.json::<T>().await?)
}

/// Check that an empty response is OK, returning a ClientError if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    Ok(())
}

async fn error_from_response(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => return ClientError::Network(e),
    };
    classify(status, text)
}

fn classify(status: StatusCode, text: String) -> ClientError {
    match status {
        StatusCode::BAD_REQUEST => {
            match serde_json::from_str::<ValidationErrors>(&text) {
                Ok(errors) if !errors.is_empty() => {
                    ClientError::Validation(errors)
                }
                _ => ClientError::APIError(status, text),
            }
        }
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::NOT_FOUND => ClientError::NotFound(if text.is_empty() {
            "Not found".to_string()
        } else {
            text
        }),
        _ => ClientError::APIError(status, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> APIClient {
        APIClient::new("http://localhost:8081/", SessionStore::in_memory())
    }

    #[test]
    fn absolute_image_urls_pass_through() {
        let url = "https://cdn.example.com/a.jpg";
        assert_eq!(client().image_url(url), url);
    }

    #[test]
    fn relative_image_urls_join_the_api_base() {
        assert_eq!(
            client().image_url("/api/images/3/file"),
            "http://localhost:8081/api/images/3/file"
        );
        assert_eq!(
            client().image_url("images/3/file"),
            "http://localhost:8081/api/images/3/file"
        );
    }

    #[test]
    fn bad_request_with_field_map_is_a_validation_error() {
        let error = classify(
            StatusCode::BAD_REQUEST,
            r#"{"price":"Price must be greater than 0"}"#.into(),
        );
        let ClientError::Validation(errors) = error else {
            panic!("expected validation error, got {error:?}");
        };
        assert_eq!(errors.get("price"), Some("Price must be greater than 0"));
    }

    #[test]
    fn bad_request_without_field_map_stays_an_api_error() {
        let error = classify(StatusCode::BAD_REQUEST, "nope".into());
        assert!(matches!(error, ClientError::APIError(_, ref t) if t == "nope"));
        assert!(!error.is_generic_failure());
    }

    #[test]
    fn server_errors_are_generic() {
        let error =
            classify(StatusCode::INTERNAL_SERVER_ERROR, "stack trace".into());
        assert!(error.is_generic_failure());
        assert!(!error.user_message().contains("stack trace"));
        assert!(matches!(
            classify(StatusCode::NOT_FOUND, String::new()),
            ClientError::NotFound(_)
        ));
    }

    #[test]
    fn bare_arrays_become_a_single_page() {
        let body: ListBody = serde_json::from_str("[]").unwrap();
        let page = body.into_page();
        assert!(page.empty && page.first && page.last);
        assert_eq!(page.number, 0);
    }
}
