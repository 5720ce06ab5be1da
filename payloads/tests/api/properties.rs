use payloads::filters::FilterField;
use payloads::pagination::PaginationView;
use payloads::{ClientError, Property, PropertyFilters, PropertyId};
use reqwest::StatusCode;
use test_helpers::{
    Faults, assert_status_code, property_a, property_b, spawn_app,
};

#[tokio::test]
async fn bedroom_filter_returns_only_matching_properties() -> anyhow::Result<()>
{
    let app = spawn_app().await;
    let (three_bed, _four_bed) = app.seed_two_properties();

    let filters =
        PropertyFilters::default().with_field(FilterField::Bedrooms, "3");
    let page = app.client.search_properties(&filters).await?;

    assert_eq!(page.content, vec![three_bed]);
    assert!(page.first && page.last && !page.empty);

    Ok(())
}

#[tokio::test]
async fn address_and_price_filters() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (elm_grove, mill_road) = app.seed_two_properties();

    let filters =
        PropertyFilters::default().with_field(FilterField::Address, "MILL");
    let page = app.client.search_properties(&filters).await?;
    assert_eq!(page.content, vec![mill_road.clone()]);

    // bounds are inclusive
    let filters = PropertyFilters::default()
        .with_field(FilterField::MinPrice, "325000")
        .with_field(FilterField::MaxPrice, "550000");
    assert_eq!(app.client.search_properties(&filters).await?.content.len(), 2);

    let filters =
        PropertyFilters::default().with_field(FilterField::MaxPrice, "400000");
    let page = app.client.search_properties(&filters).await?;
    assert_eq!(page.content, vec![elm_grove]);

    let filters =
        PropertyFilters::default().with_field(FilterField::Bedrooms, "7");
    let page = app.client.search_properties(&filters).await?;
    assert!(page.empty);

    Ok(())
}

#[tokio::test]
async fn inverted_price_range_is_a_validation_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_bob().await?;

    let filters = PropertyFilters::default()
        .with_field(FilterField::MinPrice, "10")
        .with_field(FilterField::MaxPrice, "5");
    let error = app.client.search_properties(&filters).await.unwrap_err();
    let ClientError::Validation(errors) = error else {
        panic!("expected a validation error, got {error:?}");
    };
    assert!(errors.get("minPrice").is_some());
    // validation failures leave the session alone
    assert!(app.client.session().token().is_some());

    Ok(())
}

#[tokio::test]
async fn next_page_issues_a_fetch_for_the_new_tuple() -> anyhow::Result<()> {
    let app = spawn_app().await;
    for n in 0..30 {
        app.backend.insert_property(Property {
            address: format!("{n} Station Road"),
            ..property_a()
        });
    }

    let filters = PropertyFilters::default();
    let first = app.client.search_properties(&filters).await?;
    assert_eq!(first.content.len(), 12);
    assert_eq!(first.total_pages, 3);

    let view = PaginationView::from_page(&first).expect("three pages");
    assert!(view.previous_disabled);
    let next = view.next(&filters).expect("a next page");
    assert_eq!(next.to_query_string(), "page=1");

    let before = app.backend.request_count();
    let second = app.client.search_properties(&next).await?;
    assert_eq!(app.backend.request_count(), before + 1);
    assert_eq!(second.number, 1);
    assert_ne!(first.content, second.content);

    let last = app.client.search_properties(&filters.with_page(2)).await?;
    assert_eq!(last.content.len(), 6);
    let view = PaginationView::from_page(&last).expect("three pages");
    assert!(view.next_disabled);

    Ok(())
}

#[tokio::test]
async fn create_read_update_delete_property() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    let created = app.client.create_property(&property_a()).await?;
    let id = created.id.expect("server assigns an id");
    assert_eq!(created.address, property_a().address);

    let fetched = app.client.get_property(id).await?;
    assert_eq!(fetched, created);

    let updated = app
        .client
        .update_property(
            id,
            &Property {
                price: 310_000.0,
                ..fetched
            },
        )
        .await?;
    assert_eq!(updated.id, Some(id));
    assert_eq!(app.client.get_property(id).await?.price, 310_000.0);

    app.client.delete_property(id).await?;
    assert!(app.client.list_properties().await?.is_empty());

    // deleting again is an error, not a no-op
    assert!(matches!(
        app.client.delete_property(id).await,
        Err(ClientError::NotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn server_rejects_non_positive_fields() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    let result = app
        .client
        .create_property(&Property {
            price: 0.0,
            square_footage: -1.0,
            ..property_b()
        })
        .await;
    let Err(ClientError::Validation(errors)) = result else {
        panic!("expected validation error, got {result:?}");
    };
    assert_eq!(errors.get("price"), Some("Price must be greater than 0"));
    assert_eq!(
        errors.get("squareFootage"),
        Some("Square footage must be greater than 0")
    );
    assert_eq!(app.backend.property_count(), 0);

    Ok(())
}

#[tokio::test]
async fn writes_require_an_admin() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_bob().await?;

    let result = app.client.create_property(&property_a()).await;
    assert_status_code(result, StatusCode::FORBIDDEN);
    // a non-admin session is still a valid session
    assert!(app.client.session().token().is_some());

    Ok(())
}

#[tokio::test]
async fn get_by_id_falls_back_to_the_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    for _ in 0..6 {
        app.backend.insert_property(property_b());
    }
    let seventh = app.backend.insert_property(property_a());
    assert_eq!(seventh.id, Some(PropertyId(7)));

    app.backend.set_faults(Faults {
        fail_get_by_id: true,
        ..Default::default()
    });
    let property = app.client.get_property(PropertyId(7)).await?;
    assert_eq!(property, seventh);

    let missing = app.client.get_property(PropertyId(99)).await;
    let Err(ClientError::NotFound(message)) = missing else {
        panic!("expected not found, got {missing:?}");
    };
    assert_eq!(message, "Property 99 not found");

    Ok(())
}

#[tokio::test]
async fn missing_property_is_not_found() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let result = app.client.get_property(PropertyId(1)).await;
    let error = result.unwrap_err();
    assert!(matches!(error, ClientError::NotFound(_)));
    assert!(!error.is_generic_failure());

    Ok(())
}

#[tokio::test]
async fn quick_search_matches_address_substrings() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (elm_grove, _) = app.seed_two_properties();

    let criteria = payloads::requests::SearchCriteria {
        address: "elm gr".into(),
    };
    assert_eq!(app.client.search(&criteria).await?, vec![elm_grove]);

    let criteria = payloads::requests::SearchCriteria {
        address: "Nowhere".into(),
    };
    assert!(app.client.search(&criteria).await?.is_empty());

    Ok(())
}
