pub mod backend;
pub mod mock;
pub mod telemetry;

use actix_web::web;
use payloads::{APIClient, ClientError, Property, SessionStore, requests};
use reqwest::StatusCode;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub use backend::{DEFAULT_PASSWORD, Faults, MockBackend};

pub struct TestApp {
    #[allow(unused)]
    pub port: u16,
    pub client: APIClient,
    pub backend: web::Data<MockBackend>,
}

/// Login helpers
impl TestApp {
    pub async fn login_alice(&self) -> anyhow::Result<()> {
        self.login("alice").await
    }

    pub async fn login_bob(&self) -> anyhow::Result<()> {
        self.login("bob").await
    }

    async fn login(&self, username: &str) -> anyhow::Result<()> {
        let credentials = requests::LoginCredentials {
            username: username.into(),
            password: DEFAULT_PASSWORD.into(),
        };
        self.client.login(&credentials).await?;
        Ok(())
    }

    /// A second client against the same backend with its own session.
    pub fn new_client(&self) -> APIClient {
        APIClient::new(
            format!("http://127.0.0.1:{}", self.port),
            SessionStore::in_memory(),
        )
    }
}

/// Fixtures
impl TestApp {
    /// Seed [`property_a`] and [`property_b`] directly into the backend.
    pub fn seed_two_properties(&self) -> (Property, Property) {
        (
            self.backend.insert_property(property_a()),
            self.backend.insert_property(property_b()),
        )
    }
}

pub async fn spawn_app_on_port(port: u16) -> TestApp {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    let backend = web::Data::new(MockBackend::new());
    let (server, port) =
        backend::build(backend.clone(), "127.0.0.1", port).unwrap();
    tokio::spawn(server);

    TestApp {
        port,
        client: APIClient::new(
            format!("http://127.0.0.1:{port}"),
            SessionStore::in_memory(),
        ),
        backend,
    }
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0).await
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T: std::fmt::Debug>(
    result: Result<T, ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(ClientError::APIError(code, _)) => assert_eq!(code, expected),
        other => panic!("Expected APIError({expected}), got {other:?}"),
    };
}

/// A three bedroom terrace.
pub fn property_a() -> Property {
    Property {
        id: None,
        address: "14 Elm Grove, Bristol".into(),
        description: "Victorian terrace with a south facing garden.".into(),
        price: 325_000.0,
        bedrooms: 3,
        bathrooms: 1.5,
        square_footage: 1_150.0,
        images: vec![],
    }
}

/// A four bedroom detached house.
pub fn property_b() -> Property {
    Property {
        id: None,
        address: "2 Mill Road, York".into(),
        description: String::new(),
        price: 550_000.0,
        bedrooms: 4,
        bathrooms: 2.0,
        square_footage: 1_900.0,
        images: vec![],
    }
}

pub fn jpeg(file_name: &str) -> requests::UploadFile {
    // not a decodable image; the backend stores bytes as given
    requests::UploadFile::new(
        file_name,
        "image/jpeg",
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9],
    )
}
