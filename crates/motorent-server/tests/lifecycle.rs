//! End-to-end lifecycle scenarios over the full service wiring, backed
//! by the in-memory store.

mod common;

use chrono::{Duration, Utc};
use common::{
    deliverer_command, motorcycle_command, random_digits, random_plate, rental_command,
    TestContext, BMP_PAYLOAD, PNG_PAYLOAD,
};
use motorent_server::media::ObjectStorage;
use rust_decimal_macros::dec;

#[test_log::test(tokio::test)]
async fn test_full_rental_lifecycle() {
    let context = TestContext::new().await;
    let plate = random_plate();
    let tax_id = random_digits(14);
    let today = Utc::now().date_naive();

    let created = context
        .services
        .motorcycles
        .create_motorcycle(motorcycle_command(&plate))
        .await
        .expect("Failed to create motorcycle");
    assert!(created.success, "Motorcycle creation should succeed");

    let mut command = deliverer_command(&tax_id, &random_digits(9));
    command.driver_license_image_base64 = Some(PNG_PAYLOAD.to_string());
    let created = context
        .services
        .deliverers
        .create_deliverer(command)
        .await
        .expect("Failed to create deliverer");
    assert!(created.success, "Deliverer creation should succeed");

    let motorcycle = context.motorcycle_by_plate(&plate).await;
    let deliverer = context.deliverer_by_tax_id(&tax_id).await;
    assert!(
        deliverer.driver_license_image_key.is_some(),
        "License image should be stored at creation"
    );

    let created = context
        .services
        .rentals
        .create_rental(rental_command(deliverer.id, motorcycle.id, 7))
        .await
        .expect("Failed to create rental");
    assert!(created.success, "Rental creation should succeed");

    let rental = context.single_rental_for(&motorcycle.id).await;
    assert_eq!(rental.plan_days, 7);
    assert_eq!(
        rental.start_date,
        today + Duration::days(1),
        "Rental should start the day after creation"
    );
    assert_eq!(
        rental.end_date,
        today + Duration::days(7),
        "End date should be the requested start plus the plan length"
    );
    assert!(rental.return_date.is_none());

    let quote = context
        .services
        .rentals
        .price_quote(&rental.id, rental.end_date)
        .await
        .expect("Failed to quote rental");
    assert_eq!(quote.data, Some(dec!(210.00)), "On-time total is rate times days");

    let recorded = context
        .services
        .rentals
        .record_return(&rental.id, rental.end_date)
        .await
        .expect("Failed to record return");
    assert_eq!(
        recorded.data.as_deref(),
        Some("Return date informed successfully and the total price for rental is 210.00")
    );

    let rental = context.single_rental_for(&motorcycle.id).await;
    assert_eq!(rental.return_date, Some(rental.end_date));

    context.cleanup().await;
}

#[test_log::test(tokio::test)]
async fn test_plate_reuse_after_soft_delete() {
    let context = TestContext::new().await;
    let plate = random_plate();

    let created = context
        .services
        .motorcycles
        .create_motorcycle(motorcycle_command(&plate))
        .await
        .expect("Failed to create motorcycle");
    assert!(created.success);

    let duplicate = context
        .services
        .motorcycles
        .create_motorcycle(motorcycle_command(&plate))
        .await
        .expect("Failed to run duplicate creation");
    assert!(!duplicate.success, "A live plate may exist only once");
    assert_eq!(
        duplicate.error_message.as_deref(),
        Some("The plate number must be unique.")
    );

    let motorcycle = context.motorcycle_by_plate(&plate).await;
    let deleted = context
        .services
        .motorcycles
        .delete_motorcycle(&motorcycle.id)
        .await
        .expect("Failed to delete motorcycle");
    assert!(deleted.success, "Deletion without rentals should succeed");

    let recreated = context
        .services
        .motorcycles
        .create_motorcycle(motorcycle_command(&plate))
        .await
        .expect("Failed to recreate motorcycle");
    assert!(
        recreated.success,
        "A soft-deleted plate should be available again"
    );

    let replacement = context.motorcycle_by_plate(&plate).await;
    assert_ne!(replacement.id, motorcycle.id, "The replacement is a new row");

    context.cleanup().await;
}

#[test_log::test(tokio::test)]
async fn test_delete_is_refused_while_a_rental_exists() {
    let context = TestContext::new().await;
    let plate = random_plate();
    let tax_id = random_digits(14);

    context
        .services
        .motorcycles
        .create_motorcycle(motorcycle_command(&plate))
        .await
        .expect("Failed to create motorcycle");
    context
        .services
        .deliverers
        .create_deliverer(deliverer_command(&tax_id, &random_digits(9)))
        .await
        .expect("Failed to create deliverer");

    let motorcycle = context.motorcycle_by_plate(&plate).await;
    let deliverer = context.deliverer_by_tax_id(&tax_id).await;
    context
        .services
        .rentals
        .create_rental(rental_command(deliverer.id, motorcycle.id, 15))
        .await
        .expect("Failed to create rental");

    let deleted = context
        .services
        .motorcycles
        .delete_motorcycle(&motorcycle.id)
        .await
        .expect("Failed to run deletion");
    assert!(!deleted.success, "Deletion should be refused");
    assert_eq!(
        deleted.error_message.as_deref(),
        Some("Motorcycle has rental record.")
    );

    let found = context
        .services
        .motorcycles
        .find_by_plate(&plate)
        .await
        .expect("Failed to look up motorcycle");
    assert!(found.success, "The motorcycle should still be live");

    context.cleanup().await;
}

#[test_log::test(tokio::test)]
async fn test_update_plate_number_round_trip() {
    let context = TestContext::new().await;
    let plate = random_plate();
    let new_plate = random_plate();

    context
        .services
        .motorcycles
        .create_motorcycle(motorcycle_command(&plate))
        .await
        .expect("Failed to create motorcycle");
    let motorcycle = context.motorcycle_by_plate(&plate).await;

    let updated = context
        .services
        .motorcycles
        .update_plate_number(&motorcycle.id, new_plate.clone())
        .await
        .expect("Failed to update plate");
    assert!(updated.success);
    assert_eq!(
        updated.data.as_deref(),
        Some("Motorcycle updated successfully.")
    );

    let found = context
        .services
        .motorcycles
        .find_by_plate(&new_plate)
        .await
        .expect("Failed to look up new plate");
    assert_eq!(
        found.data.as_ref().map(|m| m.id),
        Some(motorcycle.id),
        "The new plate should resolve to the same row"
    );

    let stale = context
        .services
        .motorcycles
        .find_by_plate(&plate)
        .await
        .expect("Failed to look up old plate");
    assert!(!stale.success, "The old plate should no longer resolve");
    assert_eq!(stale.error_message.as_deref(), Some("Motorcycle not found."));

    context.cleanup().await;
}

#[test_log::test(tokio::test)]
async fn test_listing_pages_through_the_fleet() {
    let context = TestContext::new().await;

    for _ in 0..5 {
        let created = context
            .services
            .motorcycles
            .create_motorcycle(motorcycle_command(&random_plate()))
            .await
            .expect("Failed to create motorcycle");
        assert!(created.success);
    }

    let page = context
        .services
        .motorcycles
        .list_motorcycles(2, 2)
        .await
        .expect("Failed to list motorcycles")
        .data
        .expect("Listing should carry a page");
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_count, 5);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.total_pages(), 3);

    let beyond = context
        .services
        .motorcycles
        .list_motorcycles(4, 2)
        .await
        .expect("Failed to list motorcycles")
        .data
        .expect("A page past the end is still a page");
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_count, 5);

    context.cleanup().await;
}

#[test_log::test(tokio::test)]
async fn test_deliverer_documents_must_be_unique() {
    let context = TestContext::new().await;
    let tax_id = random_digits(14);
    let license = random_digits(9);

    let created = context
        .services
        .deliverers
        .create_deliverer(deliverer_command(&tax_id, &license))
        .await
        .expect("Failed to create deliverer");
    assert!(created.success);

    let same_tax_id = context
        .services
        .deliverers
        .create_deliverer(deliverer_command(&tax_id, &random_digits(9)))
        .await
        .expect("Failed to run duplicate creation");
    assert_eq!(
        same_tax_id.error_message.as_deref(),
        Some("The business tax id must be unique.")
    );

    let same_license = context
        .services
        .deliverers
        .create_deliverer(deliverer_command(&random_digits(14), &license))
        .await
        .expect("Failed to run duplicate creation");
    assert_eq!(
        same_license.error_message.as_deref(),
        Some("The driver license number must be unique.")
    );

    let distinct = context
        .services
        .deliverers
        .create_deliverer(deliverer_command(&random_digits(14), &random_digits(9)))
        .await
        .expect("Failed to create deliverer");
    assert!(distinct.success, "Distinct documents should be accepted");

    context.cleanup().await;
}

#[test_log::test(tokio::test)]
async fn test_license_image_upload_and_replacement() {
    let context = TestContext::new().await;
    let tax_id = random_digits(14);

    let mut command = deliverer_command(&tax_id, &random_digits(9));
    command.driver_license_image_base64 = Some(PNG_PAYLOAD.to_string());
    context
        .services
        .deliverers
        .create_deliverer(command)
        .await
        .expect("Failed to create deliverer");

    let deliverer = context.deliverer_by_tax_id(&tax_id).await;
    let first_key = deliverer
        .driver_license_image_key
        .expect("Creation should store the image");
    let bytes = context
        .object_storage
        .download(&first_key)
        .await
        .expect("The stored object should be downloadable");
    assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);

    let attached = context
        .services
        .deliverers
        .attach_driver_license_image(&deliverer.id, BMP_PAYLOAD)
        .await
        .expect("Failed to attach image");
    assert!(attached.success, "A BMP replacement should be accepted");

    let deliverer = context.deliverer_by_tax_id(&tax_id).await;
    let second_key = deliverer
        .driver_license_image_key
        .expect("The replacement should be stored");
    assert_ne!(second_key, first_key, "Each upload gets a fresh key");

    let rejected = context
        .services
        .deliverers
        .attach_driver_license_image(&deliverer.id, "not-an-image")
        .await
        .expect("Failed to run attach");
    assert!(!rejected.success);
    assert_eq!(
        rejected.error_message.as_deref(),
        Some("The image extension is not valid.")
    );

    let deliverer = context.deliverer_by_tax_id(&tax_id).await;
    assert_eq!(
        deliverer.driver_license_image_key.as_deref(),
        Some(second_key.as_str()),
        "A rejected upload should leave the stored key alone"
    );

    context.cleanup().await;
}

#[test_log::test(tokio::test)]
async fn test_early_return_is_quoted_and_billed_with_the_penalty() {
    let context = TestContext::new().await;
    let plate = random_plate();
    let tax_id = random_digits(14);

    context
        .services
        .motorcycles
        .create_motorcycle(motorcycle_command(&plate))
        .await
        .expect("Failed to create motorcycle");
    context
        .services
        .deliverers
        .create_deliverer(deliverer_command(&tax_id, &random_digits(9)))
        .await
        .expect("Failed to create deliverer");

    let motorcycle = context.motorcycle_by_plate(&plate).await;
    let deliverer = context.deliverer_by_tax_id(&tax_id).await;
    context
        .services
        .rentals
        .create_rental(rental_command(deliverer.id, motorcycle.id, 7))
        .await
        .expect("Failed to create rental");

    let rental = context.single_rental_for(&motorcycle.id).await;
    let early = rental.end_date - Duration::days(2);

    // 210.00 base, 60.00 refunded, 12.00 penalty on the refund.
    let quote = context
        .services
        .rentals
        .price_quote(&rental.id, early)
        .await
        .expect("Failed to quote rental");
    assert_eq!(quote.data, Some(dec!(162.00)));

    let unchanged = context.single_rental_for(&motorcycle.id).await;
    assert!(
        unchanged.return_date.is_none(),
        "A quote should not record the return"
    );

    let recorded = context
        .services
        .rentals
        .record_return(&rental.id, early)
        .await
        .expect("Failed to record return");
    assert_eq!(
        recorded.data.as_deref(),
        Some("Return date informed successfully and the total price for rental is 162.00")
    );

    let rental = context.single_rental_for(&motorcycle.id).await;
    assert_eq!(rental.return_date, Some(early));

    context.cleanup().await;
}
