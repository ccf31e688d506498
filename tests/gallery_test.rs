mod common;

use assert_matches::assert_matches;
use common::TestApp;
use kids_store::{entities::ContentType, errors::ServiceError, ContentRef};
use rust_decimal_macros::dec;

#[tokio::test]
async fn images_attach_to_any_catalog_kind() {
    let app = TestApp::new().await;
    let product = app.product("Rain jacket", dec!(19.99)).await;
    let gallery = &app.services.gallery;

    let on_product = gallery
        .attach_image(ContentRef::Product(product.id), "product/rain-jacket/side.jpg", false)
        .await
        .unwrap();
    assert_eq!(on_product.content_type, ContentType::Product);
    assert_eq!(on_product.object_id, product.id);

    let on_manufacturer = gallery
        .attach_image(
            ContentRef::Manufacturer(product.manufacturer_id),
            "manufacturer/little-steps/logo.png",
            true,
        )
        .await
        .unwrap();
    let on_season = gallery
        .attach_image(ContentRef::Season(product.season_id), "season/summer/banner.png", true)
        .await
        .unwrap();

    let for_product = gallery
        .images_for(ContentRef::Product(product.id))
        .await
        .unwrap();
    assert_eq!(for_product.len(), 1);
    assert_eq!(for_product[0].id, on_product.id);

    let slider = gallery.slider_images().await.unwrap();
    assert_eq!(
        slider.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![on_manufacturer.id, on_season.id]
    );

    let hidden = gallery.set_use_in_slider(on_season.id, false).await.unwrap();
    assert!(!hidden.use_in_slider);
    assert_eq!(gallery.slider_images().await.unwrap().len(), 1);
}

#[tokio::test]
async fn attaching_to_a_missing_entity_fails() {
    let app = TestApp::new().await;
    let gallery = &app.services.gallery;

    assert_matches!(
        gallery
            .attach_image(ContentRef::Product(9999), "product/x/a.png", false)
            .await,
        Err(ServiceError::NotFound(_))
    );
    assert_matches!(
        gallery
            .attach_image(ContentRef::Season(9999), "season/x/a.png", false)
            .await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn image_references_must_fit_the_column() {
    let app = TestApp::new().await;
    let product = app.product("Rain jacket", dec!(19.99)).await;

    let result = app
        .services
        .gallery
        .attach_image(ContentRef::Product(product.id), &"a".repeat(101), false)
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn uploads_are_stored_under_the_owner() {
    let app = TestApp::new().await;
    let product = app.product("Rain jacket", dec!(19.99)).await;
    let gallery = &app.services.gallery;

    let entry = gallery
        .upload_image(ContentRef::Product(product.id), "front view.jpg", b"jpeg", true)
        .await
        .unwrap();
    assert_eq!(entry.image, "product/rain-jacket/front_view.jpg");
    assert!(entry.use_in_slider);

    let path = app.media_dir.path().join(&entry.image);
    assert_eq!(tokio::fs::read(&path).await.unwrap(), b"jpeg");

    gallery.detach_image(entry.id, true).await.unwrap();
    assert!(!path.exists());
    assert!(gallery
        .images_for(ContentRef::Product(product.id))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn failed_upload_leaves_no_row() {
    let app = TestApp::new().await;
    let gallery = &app.services.gallery;

    assert_matches!(
        gallery
            .upload_image(ContentRef::Product(9999), "a.jpg", b"jpeg", false)
            .await,
        Err(ServiceError::NotFound(_))
    );

    let season = app.season("winter").await;
    assert_matches!(
        gallery
            .upload_image(ContentRef::Season(season.id), "a.jpg", b"", false)
            .await,
        Err(ServiceError::ValidationError(_))
    );
    assert!(gallery
        .images_for(ContentRef::Season(season.id))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn repeated_uploads_keep_their_own_files() {
    let app = TestApp::new().await;
    let product = app.product("Rain jacket", dec!(19.99)).await;
    let gallery = &app.services.gallery;
    let target = ContentRef::Product(product.id);

    let first = gallery
        .upload_image(target, "front.jpg", b"FIRST", false)
        .await
        .unwrap();
    let second = gallery
        .upload_image(target, "front.jpg", b"SECOND", false)
        .await
        .unwrap();
    assert_eq!(first.image, "product/rain-jacket/front.jpg");
    assert_eq!(second.image, "product/rain-jacket/front_1.jpg");

    let first_path = app.media_dir.path().join(&first.image);
    let second_path = app.media_dir.path().join(&second.image);
    assert_eq!(tokio::fs::read(&first_path).await.unwrap(), b"FIRST");
    assert_eq!(tokio::fs::read(&second_path).await.unwrap(), b"SECOND");

    gallery.detach_image(second.id, true).await.unwrap();
    assert!(!second_path.exists());
    assert_eq!(tokio::fs::read(&first_path).await.unwrap(), b"FIRST");

    let remaining = gallery.images_for(target).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, first.id);
}

#[tokio::test]
async fn shared_files_outlive_all_but_the_last_reference() {
    let app = TestApp::new().await;
    let product = app.product("Rain jacket", dec!(19.99)).await;
    let gallery = &app.services.gallery;

    let uploaded = gallery
        .upload_image(ContentRef::Product(product.id), "front.jpg", b"jpeg", false)
        .await
        .unwrap();
    let shared = gallery
        .attach_image(ContentRef::Season(product.season_id), &uploaded.image, true)
        .await
        .unwrap();
    let path = app.media_dir.path().join(&uploaded.image);

    gallery.detach_image(uploaded.id, true).await.unwrap();
    assert!(path.exists());

    gallery.detach_image(shared.id, true).await.unwrap();
    assert!(!path.exists());

    assert_matches!(
        gallery.detach_image(shared.id, true).await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn catalog_images_are_not_removed_with_a_gallery_entry() {
    let app = TestApp::new().await;
    let product = app.product("Rain jacket", dec!(19.99)).await;
    let gallery = &app.services.gallery;

    let main_image = app.media_dir.path().join(&product.image);
    tokio::fs::create_dir_all(main_image.parent().unwrap())
        .await
        .unwrap();
    tokio::fs::write(&main_image, b"main").await.unwrap();

    let entry = gallery
        .attach_image(ContentRef::Product(product.id), &product.image, false)
        .await
        .unwrap();
    gallery.detach_image(entry.id, true).await.unwrap();

    assert!(main_image.exists());
}
