use payloads::form::{
    FormMode, FormPhase, PropertyDraft, PropertyField, PropertyForm,
    SubmitError, submit_draft, submit_property,
};
use payloads::{PropertyFilters, PropertyId};
use test_helpers::{Faults, jpeg, property_a, property_b, spawn_app};

fn draft() -> PropertyDraft {
    PropertyDraft::from_property(&property_a())
}

#[tokio::test]
async fn local_validation_blocks_the_request() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;
    let before = app.backend.request_count();

    let mut draft = draft();
    draft.set(PropertyField::Price, "-5");
    let result =
        submit_draft(&app.client, FormMode::Create, &draft, &[]).await;

    let Err(SubmitError::Invalid(errors)) = result else {
        panic!("expected local validation failure, got {result:?}");
    };
    assert_eq!(
        errors.for_field(PropertyField::Price),
        Some("Price must be greater than 0")
    );
    assert_eq!(app.backend.request_count(), before);
    assert_eq!(app.backend.property_count(), 0);

    Ok(())
}

#[tokio::test]
async fn create_with_images_saves_then_uploads() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    let saved = submit_draft(
        &app.client,
        FormMode::Create,
        &draft(),
        &[jpeg("front.jpg")],
    )
    .await?;

    let id = saved.id.expect("saved");
    assert_eq!(saved.images.len(), 1);
    assert_eq!(app.client.get_property(id).await?.images, saved.images);

    Ok(())
}

#[tokio::test]
async fn upload_failure_keeps_the_saved_record() -> anyhow::Result<()> {
    let app = spawn_app().await;
    for _ in 0..41 {
        app.backend.insert_property(property_b());
    }
    app.login_alice().await?;
    app.backend.set_faults(Faults {
        fail_uploads: true,
        ..Default::default()
    });

    let mut form = PropertyForm::new(FormMode::Create);
    form.start();
    form.draft = draft();
    form.add_files([jpeg("front.jpg")]);
    let property = form.begin_submit().expect("draft is valid");
    let result =
        submit_property(&app.client, form.mode, &property, &form.files).await;

    let Err(SubmitError::UploadFailed { property, .. }) = &result else {
        panic!("expected upload failure, got {result:?}");
    };
    assert_eq!(property.id, Some(PropertyId(42)));
    form.finish_submit(&result);
    assert_eq!(form.phase, FormPhase::Editing);
    assert_eq!(
        form.error.as_deref(),
        Some("Error uploading images. Please try again.")
    );
    assert_eq!(form.mode, FormMode::Edit(PropertyId(42)));

    let fetched = app.client.get_property(PropertyId(42)).await?;
    assert_eq!(fetched.address, property_a().address);
    assert!(fetched.images.is_empty());

    Ok(())
}

#[tokio::test]
async fn server_validation_stops_before_upload() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;
    let before = app.backend.request_count();

    let mut property = property_a();
    property.address = "   ".into();
    let result = submit_property(
        &app.client,
        FormMode::Create,
        &property,
        &[jpeg("front.jpg")],
    )
    .await;

    let Err(SubmitError::Invalid(errors)) = result else {
        panic!("expected server validation failure, got {result:?}");
    };
    assert_eq!(
        errors.for_field(PropertyField::Address),
        Some("Address is required")
    );
    // the save was attempted, the upload was not
    assert_eq!(app.backend.request_count(), before + 1);

    Ok(())
}

#[tokio::test]
async fn unchanged_update_leaves_list_state_alone() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;
    let (existing, _) = app.seed_two_properties();
    let id = existing.id.expect("seeded");

    let list_state = PropertyFilters::from_query_string("bedrooms=3&page=2");
    let before = app.backend.request_count();

    let draft = PropertyDraft::from_property(&existing);
    let saved =
        submit_draft(&app.client, FormMode::Edit(id), &draft, &[]).await?;

    assert_eq!(saved, existing);
    // no files, so just the save
    assert_eq!(app.backend.request_count(), before + 1);
    assert_eq!(
        list_state,
        PropertyFilters::from_query_string("bedrooms=3&page=2")
    );
    assert_eq!(list_state.page, 2);

    Ok(())
}
