//! An in-memory stand-in for the property REST backend.
//!
//! Everything is served under `/api`, mirroring the real service closely
//! enough for the client: bearer-token auth with an admin flag, a paginated
//! search endpoint, multipart image upload, and field-keyed 400 bodies.
//! [`Faults`] switch individual endpoints into failure so error paths can be
//! exercised.

use std::collections::{BTreeMap, HashMap};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::body::BoxBody;
use actix_web::dev::{HttpServiceFactory, Server, Service};
use actix_web::http::header;
use actix_web::{
    App, HttpRequest, HttpResponse, HttpServer, ResponseError, delete, get,
    post, put, web,
};
use futures::TryStreamExt;
use payloads::requests::LoginCredentials;
use payloads::responses::{LoginResponse, UserProfile};
use payloads::{Image, ImageId, Page, Property, PropertyId, ValidationErrors};
use serde::Deserialize;
use uuid::Uuid;

pub const DEFAULT_PASSWORD: &str = "password";
const DEFAULT_PAGE_SIZE: u32 = 12;

/// Endpoint failures to inject.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Faults {
    /// `GET /properties/{id}` answers 500.
    pub fail_get_by_id: bool,
    /// `POST /images/upload/{id}` answers 500.
    pub fail_uploads: bool,
}

struct StoredImage {
    content_type: String,
    data: Vec<u8>,
}

#[derive(Default)]
struct Store {
    properties: BTreeMap<PropertyId, Property>,
    images: HashMap<ImageId, StoredImage>,
    /// token -> user
    tokens: HashMap<String, UserProfile>,
    next_property_id: i64,
    next_image_id: i64,
}

impl Store {
    fn insert(&mut self, mut property: Property) -> Property {
        self.next_property_id += 1;
        let id = PropertyId(self.next_property_id);
        property.id = Some(id);
        self.properties.insert(id, property.clone());
        property
    }
}

pub struct MockBackend {
    store: Mutex<Store>,
    faults: Mutex<Faults>,
    requests: AtomicUsize,
    users: Vec<UserProfile>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Starts empty, with users `alice` (admin) and `bob`, both using
    /// [`DEFAULT_PASSWORD`].
    pub fn new() -> Self {
        Self {
            store: Mutex::default(),
            faults: Mutex::default(),
            requests: AtomicUsize::new(0),
            users: vec![
                UserProfile {
                    username: "alice".into(),
                    is_admin: true,
                },
                UserProfile {
                    username: "bob".into(),
                    is_admin: false,
                },
            ],
        }
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn faults(&self) -> Faults {
        *self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_faults(&self, faults: Faults) {
        *self.faults.lock().unwrap_or_else(PoisonError::into_inner) = faults;
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Invalidate every issued token, as if they had all expired.
    pub fn revoke_tokens(&self) {
        self.store().tokens.clear();
    }

    /// Seed a property directly, bypassing validation and auth.
    pub fn insert_property(&self, property: Property) -> Property {
        self.store().insert(property)
    }

    pub fn property(&self, id: PropertyId) -> Option<Property> {
        self.store().properties.get(&id).cloned()
    }

    pub fn property_count(&self) -> usize {
        self.store().properties.len()
    }

    /// The user for a bearer token, if one was sent. An unknown token is an
    /// error even on public endpoints.
    fn authenticate(
        &self,
        req: &HttpRequest,
    ) -> Result<Option<UserProfile>, APIError> {
        let Some(token) = bearer_token(req) else {
            return Ok(None);
        };
        match self.store().tokens.get(token) {
            Some(user) => Ok(Some(user.clone())),
            None => Err(APIError::AuthError),
        }
    }

    fn require_admin(&self, req: &HttpRequest) -> Result<UserProfile, APIError> {
        match self.authenticate(req)? {
            None => Err(APIError::AuthError),
            Some(user) if user.is_admin => Ok(user),
            Some(_) => Err(APIError::Forbidden),
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Build the server, but not await it. Returns the bound port, which is
/// OS-assigned when binding to 0.
pub fn build(
    backend: web::Data<MockBackend>,
    ip: &str,
    port: u16,
) -> std::io::Result<(Server, u16)> {
    let listener = TcpListener::bind(format!("{ip}:{port}"))?;
    let port = listener.local_addr()?.port();
    let server = HttpServer::new(move || {
        let counter = backend.clone();
        App::new()
            .wrap_fn(move |req, srv| {
                counter.requests.fetch_add(1, Ordering::SeqCst);
                srv.call(req)
            })
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .service(api_services())
            .app_data(backend.clone())
    })
    .workers(1)
    .listen(listener)?
    .run();
    Ok((server, port))
}

pub fn api_services() -> impl HttpServiceFactory {
    // search has to be registered ahead of the `{id}` routes
    web::scope("/api")
        .service(search_properties)
        .service(list_properties)
        .service(get_property)
        .service(create_property)
        .service(update_property)
        .service(delete_property)
        .service(upload_images)
        .service(image_file)
        .service(delete_image)
        .service(login)
        .service(validate)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub address: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub bedrooms: Option<u32>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// Filter and paginate. Address matches are case-insensitive substrings,
/// price bounds are inclusive and bedrooms must match exactly.
pub fn search<'a>(
    properties: impl IntoIterator<Item = &'a Property>,
    query: &SearchQuery,
) -> Result<Page<Property>, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if query.min_price.is_some_and(|p| p < 0.0) {
        errors.insert("minPrice", "Minimum price cannot be negative");
    }
    if query.max_price.is_some_and(|p| p < 0.0) {
        errors.insert("maxPrice", "Maximum price cannot be negative");
    }
    if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
        if min > max {
            errors.insert(
                "minPrice",
                "Minimum price cannot be greater than maximum price",
            );
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let address = query
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_lowercase);
    let matches: Vec<&Property> = properties
        .into_iter()
        .filter(|p| {
            address
                .as_ref()
                .is_none_or(|a| p.address.to_lowercase().contains(a))
        })
        .filter(|p| query.min_price.is_none_or(|min| p.price >= min))
        .filter(|p| query.max_price.is_none_or(|max| p.price <= max))
        .filter(|p| query.bedrooms.is_none_or(|b| p.bedrooms == b))
        .collect();

    let size = match query.size {
        None | Some(0) => DEFAULT_PAGE_SIZE,
        Some(size) => size,
    };
    let number = query.page.unwrap_or(0);
    let total_elements = matches.len() as u64;
    let total_pages = total_elements.div_ceil(u64::from(size)) as u32;
    let content: Vec<Property> = matches
        .into_iter()
        .skip(number as usize * size as usize)
        .take(size as usize)
        .cloned()
        .collect();
    Ok(Page {
        empty: content.is_empty(),
        content,
        number,
        total_pages,
        total_elements,
        size,
        first: number == 0,
        last: number + 1 >= total_pages,
    })
}

/// The same rules the form applies before sending.
pub fn validate_property(property: &Property) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if property.address.trim().is_empty() {
        errors.insert("address", "Address is required");
    }
    if property.price <= 0.0 {
        errors.insert("price", "Price must be greater than 0");
    }
    if property.bedrooms == 0 {
        errors.insert("bedrooms", "Number of bedrooms must be greater than 0");
    }
    if property.bathrooms <= 0.0 {
        errors.insert("bathrooms", "Number of bathrooms must be greater than 0");
    }
    if property.square_footage <= 0.0 {
        errors.insert("squareFootage", "Square footage must be greater than 0");
    }
    errors
}

#[tracing::instrument(skip(backend, req))]
#[get("/properties/search")]
async fn search_properties(
    query: web::Query<SearchQuery>,
    backend: web::Data<MockBackend>,
    req: HttpRequest,
) -> Result<HttpResponse, APIError> {
    backend.authenticate(&req)?;
    let store = backend.store();
    let page = search(store.properties.values(), &query)
        .map_err(APIError::Validation)?;
    Ok(HttpResponse::Ok().json(page))
}

/// Answers with a bare array rather than a page envelope.
#[tracing::instrument(skip(backend, req))]
#[get("/properties")]
async fn list_properties(
    backend: web::Data<MockBackend>,
    req: HttpRequest,
) -> Result<HttpResponse, APIError> {
    backend.authenticate(&req)?;
    let properties: Vec<Property> =
        backend.store().properties.values().cloned().collect();
    Ok(HttpResponse::Ok().json(properties))
}

#[tracing::instrument(skip(backend, req))]
#[get("/properties/{id}")]
async fn get_property(
    id: web::Path<i64>,
    backend: web::Data<MockBackend>,
    req: HttpRequest,
) -> Result<HttpResponse, APIError> {
    backend.authenticate(&req)?;
    if backend.faults().fail_get_by_id {
        return Err(anyhow::anyhow!("Injected get-by-id failure").into());
    }
    let id = PropertyId(id.into_inner());
    let property = backend
        .property(id)
        .ok_or_else(|| APIError::NotFound(format!("property {id}")))?;
    Ok(HttpResponse::Ok().json(property))
}

#[tracing::instrument(skip(backend, req))]
#[post("/properties")]
async fn create_property(
    details: web::Json<Property>,
    backend: web::Data<MockBackend>,
    req: HttpRequest,
) -> Result<HttpResponse, APIError> {
    backend.require_admin(&req)?;
    let errors = validate_property(&details);
    if !errors.is_empty() {
        return Err(APIError::Validation(errors));
    }
    let property = Property {
        images: vec![],
        ..details.into_inner()
    };
    let created = backend.store().insert(property);
    Ok(HttpResponse::Created().json(created))
}

#[tracing::instrument(skip(backend, req))]
#[put("/properties/{id}")]
async fn update_property(
    id: web::Path<i64>,
    details: web::Json<Property>,
    backend: web::Data<MockBackend>,
    req: HttpRequest,
) -> Result<HttpResponse, APIError> {
    backend.require_admin(&req)?;
    let id = PropertyId(id.into_inner());
    let errors = validate_property(&details);
    if !errors.is_empty() {
        return Err(APIError::Validation(errors));
    }
    let mut store = backend.store();
    let existing = store
        .properties
        .get_mut(&id)
        .ok_or_else(|| APIError::NotFound(format!("property {id}")))?;
    // images are managed through their own endpoints
    let images = std::mem::take(&mut existing.images);
    *existing = Property {
        id: Some(id),
        images,
        ..details.into_inner()
    };
    Ok(HttpResponse::Ok().json(existing.clone()))
}

#[tracing::instrument(skip(backend, req))]
#[delete("/properties/{id}")]
async fn delete_property(
    id: web::Path<i64>,
    backend: web::Data<MockBackend>,
    req: HttpRequest,
) -> Result<HttpResponse, APIError> {
    backend.require_admin(&req)?;
    let id = PropertyId(id.into_inner());
    let mut store = backend.store();
    let removed = store
        .properties
        .remove(&id)
        .ok_or_else(|| APIError::NotFound(format!("property {id}")))?;
    for image in removed.images {
        store.images.remove(&image.id);
    }
    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(skip(backend, req, payload))]
#[post("/images/upload/{property_id}")]
async fn upload_images(
    property_id: web::Path<i64>,
    mut payload: Multipart,
    backend: web::Data<MockBackend>,
    req: HttpRequest,
) -> Result<HttpResponse, APIError> {
    backend.require_admin(&req)?;
    let property_id = PropertyId(property_id.into_inner());
    if backend.property(property_id).is_none() {
        return Err(APIError::NotFound(format!("property {property_id}")));
    }
    if backend.faults().fail_uploads {
        return Err(anyhow::anyhow!("Injected upload failure").into());
    }

    let mut files = vec![];
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| APIError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("files") {
            continue;
        }
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload")
            .to_string();
        let content_type = field
            .content_type()
            .map(ToString::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let mut data = vec![];
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| APIError::BadRequest(e.to_string()))?
        {
            data.extend_from_slice(&chunk);
        }
        files.push((file_name, content_type, data));
    }
    if files.is_empty() {
        return Err(APIError::BadRequest("no files uploaded".into()));
    }

    let mut store = backend.store();
    let mut created = Vec::with_capacity(files.len());
    for (file_name, content_type, data) in files {
        store.next_image_id += 1;
        let id = ImageId(store.next_image_id);
        created.push(Image {
            id,
            file_name,
            content_type: content_type.clone(),
            url: format!("/api/images/{id}/file"),
        });
        store.images.insert(id, StoredImage { content_type, data });
    }
    let property = store
        .properties
        .get_mut(&property_id)
        .ok_or_else(|| APIError::NotFound(format!("property {property_id}")))?;
    property.images.extend(created.iter().cloned());
    Ok(HttpResponse::Ok().json(created))
}

#[tracing::instrument(skip(backend))]
#[get("/images/{id}/file")]
async fn image_file(
    id: web::Path<i64>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, APIError> {
    let id = ImageId(id.into_inner());
    let store = backend.store();
    let image = store
        .images
        .get(&id)
        .ok_or_else(|| APIError::NotFound(format!("image {id}")))?;
    Ok(HttpResponse::Ok()
        .content_type(image.content_type.as_str())
        .body(image.data.clone()))
}

#[tracing::instrument(skip(backend, req))]
#[delete("/images/{id}")]
async fn delete_image(
    id: web::Path<i64>,
    backend: web::Data<MockBackend>,
    req: HttpRequest,
) -> Result<HttpResponse, APIError> {
    backend.require_admin(&req)?;
    let id = ImageId(id.into_inner());
    let mut store = backend.store();
    if store.images.remove(&id).is_none() {
        return Err(APIError::NotFound(format!("image {id}")));
    }
    for property in store.properties.values_mut() {
        property.images.retain(|image| image.id != id);
    }
    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(skip_all, fields(username = %credentials.username))]
#[post("/auth/login")]
async fn login(
    credentials: web::Json<LoginCredentials>,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, APIError> {
    let user = backend
        .users
        .iter()
        .find(|user| user.username == credentials.username)
        .filter(|_| credentials.password == DEFAULT_PASSWORD)
        .cloned()
        .ok_or(APIError::AuthError)?;
    let token = Uuid::new_v4().to_string();
    backend.store().tokens.insert(token.clone(), user.clone());
    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        username: user.username,
        is_admin: user.is_admin,
    }))
}

#[tracing::instrument(skip(backend, req))]
#[get("/auth/validate")]
async fn validate(
    backend: web::Data<MockBackend>,
    req: HttpRequest,
) -> Result<HttpResponse, APIError> {
    let user = backend.authenticate(&req)?.ok_or(APIError::AuthError)?;
    Ok(HttpResponse::Ok().json(user))
}

#[derive(Debug, thiserror::Error)]
pub enum APIError {
    #[error("Authentication failed")]
    AuthError,
    #[error("Admin access required")]
    Forbidden,
    /// Sent as a JSON object of field -> message.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl ResponseError for APIError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::AuthError => {
                HttpResponse::Unauthorized().body(self.to_string())
            }
            Self::Forbidden => HttpResponse::Forbidden().body(self.to_string()),
            Self::Validation(errors) => HttpResponse::BadRequest().json(errors),
            Self::BadRequest(_) => {
                HttpResponse::BadRequest().body(self.to_string())
            }
            Self::NotFound(_) => HttpResponse::NotFound().body(self.to_string()),
            Self::UnexpectedError(e) => {
                tracing::error!("{e:#}");
                HttpResponse::InternalServerError().body(self.to_string())
            }
        }
    }
}
