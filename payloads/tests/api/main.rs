mod auth;
mod form;
mod images;
mod properties;

use test_helpers::spawn_app;

#[tokio::test]
async fn empty_backend_lists_nothing() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let properties = app.client.list_properties().await?;
    assert!(properties.is_empty());

    Ok(())
}
