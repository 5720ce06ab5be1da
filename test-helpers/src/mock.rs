//! Development dataset for the dev-server
//!
//! Creates enough listings to exercise every part of the list view: more
//! than one page at the default page size, a spread of prices and bedroom
//! counts for the filters, and a few properties with images for the details
//! carousel.

use crate::TestApp;
use anyhow::Result;
use payloads::{Property, requests::UploadFile};

const STREETS: [&str; 8] = [
    "Acacia Avenue",
    "Baker Street",
    "Church Lane",
    "Elm Grove",
    "High Street",
    "Mill Road",
    "Park Crescent",
    "Station Road",
];

const TOWNS: [&str; 3] = ["Bristol", "Leeds", "York"];

pub struct DevDataset {
    pub properties: Vec<Property>,
    pub with_images: usize,
}

impl DevDataset {
    /// Creates the dataset through the API, logged in as Alice.
    pub async fn create(app: &TestApp) -> Result<Self> {
        app.login_alice().await?;

        tracing::info!("🏠 Creating development listings");
        let mut properties = vec![];
        for n in 0..30u32 {
            let property = app.client.create_property(&listing(n)).await?;
            properties.push(property);
        }

        tracing::info!("🖼️ Attaching sample images");
        let mut with_images = 0;
        for property in properties.iter_mut().step_by(4) {
            let Some(id) = property.id else { continue };
            let files = [
                placeholder("front.svg", "#4a7c59"),
                placeholder("garden.svg", "#c9a227"),
            ];
            property.images = app.client.upload_images(id, &files).await?;
            with_images += 1;
        }

        tracing::info!("✅ Development dataset created");
        Ok(Self {
            properties,
            with_images,
        })
    }

    pub fn print_summary(&self) {
        tracing::info!("📋 Available test data:");
        tracing::info!(
            "   🏠 {} properties, {} with images",
            self.properties.len(),
            self.with_images
        );
        tracing::info!(
            "   👤 alice / {} (admin), bob / {} (read only)",
            crate::DEFAULT_PASSWORD,
            crate::DEFAULT_PASSWORD
        );
    }
}

fn listing(n: u32) -> Property {
    let street = STREETS[n as usize % STREETS.len()];
    let town = TOWNS[n as usize % TOWNS.len()];
    let bedrooms = 1 + n % 5;
    Property {
        id: None,
        address: format!("{} {street}, {town}", n + 1),
        description: if n % 3 == 0 {
            String::new()
        } else {
            format!("A {bedrooms} bedroom home on {street}.")
        },
        price: f64::from(150_000 + 25_000 * (n % 12) + 10_000 * bedrooms),
        bedrooms,
        bathrooms: 1.0 + f64::from(n % 3) * 0.5,
        square_footage: f64::from(450 + 150 * bedrooms),
        images: vec![],
    }
}

fn placeholder(file_name: &str, fill: &str) -> UploadFile {
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="640" height="400">
<rect width="640" height="400" fill="{fill}"/></svg>"#
    );
    UploadFile::new(file_name, "image/svg+xml", svg.into_bytes())
}
