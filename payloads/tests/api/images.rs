use payloads::ClientError;
use test_helpers::{jpeg, property_a, spawn_app};

#[tokio::test]
async fn upload_view_and_delete_images() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;
    let property = app.client.create_property(&property_a()).await?;
    let id = property.id.expect("saved");

    let images = app
        .client
        .upload_images(id, &[jpeg("front.jpg"), jpeg("kitchen.jpg")])
        .await?;
    let names: Vec<&str> =
        images.iter().map(|image| image.file_name.as_str()).collect();
    assert_eq!(names, ["front.jpg", "kitchen.jpg"]);
    assert_eq!(images[0].content_type, "image/jpeg");
    assert_eq!(app.client.get_property(id).await?.images, images);

    // relative urls resolve against the backend
    let url = app.client.image_url(&images[0].url);
    assert!(url.starts_with(&app.client.address));
    let bytes = reqwest::get(&url).await?.error_for_status()?.bytes().await?;
    assert_eq!(bytes.as_ref(), jpeg("front.jpg").data.as_slice());

    app.client.delete_image(images[0].id).await?;
    let remaining = app.client.get_property(id).await?.images;
    assert_eq!(remaining, vec![images[1].clone()]);
    assert!(matches!(
        app.client.delete_image(images[0].id).await,
        Err(ClientError::NotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn upload_to_a_missing_property_is_not_found() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    let result = app
        .client
        .upload_images(payloads::PropertyId(404), &[jpeg("a.jpg")])
        .await;
    assert!(matches!(result, Err(ClientError::NotFound(_))));

    Ok(())
}
