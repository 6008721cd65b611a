//! Integration tests for component CRUD and the inventory quantity rules
//! enforced on the update path, plus the referential delete guard.

use labstock_db::models::component::{CreateComponent, UpdateComponent};
use labstock_db::models::request::{CreateRequest, NewRequestItem};
use labstock_db::models::user::CreateUser;
use labstock_db::repositories::{
    ComponentDelete, ComponentRepo, ComponentUpdate, RequestRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_component(name: &str, total: i32, available: i32) -> CreateComponent {
    CreateComponent {
        name: name.to_string(),
        description: Some("bench stock".to_string()),
        image_url: None,
        total_quantity: total,
        available_quantity: available,
        category: Some("MICROCONTROLLER".to_string()),
        location: Some("CABINET_A".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_find_component(pool: PgPool) {
    let created = ComponentRepo::create(&pool, &new_component("Arduino Uno", 10, 10))
        .await
        .unwrap();

    assert_eq!(created.name, "Arduino Uno");
    assert_eq!(created.total_quantity, 10);
    assert_eq!(created.available_quantity, 10);
    assert_eq!(created.category.as_deref(), Some("MICROCONTROLLER"));

    let found = ComponentRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);

    assert!(ComponentRepo::find_by_id(&pool, created.id + 999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_components_ordered_by_name(pool: PgPool) {
    ComponentRepo::create(&pool, &new_component("Servo SG90", 5, 5)).await.unwrap();
    ComponentRepo::create(&pool, &new_component("Arduino Uno", 10, 10)).await.unwrap();

    let components = ComponentRepo::list(&pool).await.unwrap();
    let names: Vec<&str> = components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Arduino Uno", "Servo SG90"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_component_may_start_partially_available(pool: PgPool) {
    let created = ComponentRepo::create(&pool, &new_component("Multimeter", 6, 2))
        .await
        .unwrap();
    assert_eq!(created.total_quantity, 6);
    assert_eq!(created.available_quantity, 2);
}

// ---------------------------------------------------------------------------
// Update quantity rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_total_rebases_available(pool: PgPool) {
    let component = ComponentRepo::create(&pool, &new_component("Arduino Uno", 10, 7))
        .await
        .unwrap();

    let input = UpdateComponent {
        total_quantity: Some(20),
        ..Default::default()
    };
    let outcome = ComponentRepo::update(&pool, component.id, &input).await.unwrap();
    let updated = match outcome {
        ComponentUpdate::Updated(c) => c,
        other => panic!("expected update, got {other:?}"),
    };
    assert_eq!(updated.total_quantity, 20);
    assert_eq!(updated.available_quantity, 20, "available re-bases to the new total");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_rejects_available_above_total(pool: PgPool) {
    let component = ComponentRepo::create(&pool, &new_component("Arduino Uno", 10, 10))
        .await
        .unwrap();

    let input = UpdateComponent {
        available_quantity: Some(11),
        ..Default::default()
    };
    let outcome = ComponentRepo::update(&pool, component.id, &input).await.unwrap();
    assert!(matches!(outcome, ComponentUpdate::InvalidQuantities(_)));

    // Row unchanged.
    let current = ComponentRepo::find_by_id(&pool, component.id).await.unwrap().unwrap();
    assert_eq!(current.available_quantity, 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_name_keeps_quantities(pool: PgPool) {
    let component = ComponentRepo::create(&pool, &new_component("Arduino Uno", 10, 7))
        .await
        .unwrap();

    let input = UpdateComponent {
        name: Some("Arduino Uno R3".to_string()),
        ..Default::default()
    };
    let outcome = ComponentRepo::update(&pool, component.id, &input).await.unwrap();
    let updated = match outcome {
        ComponentUpdate::Updated(c) => c,
        other => panic!("expected update, got {other:?}"),
    };
    assert_eq!(updated.name, "Arduino Uno R3");
    assert_eq!(updated.total_quantity, 10);
    assert_eq!(updated.available_quantity, 7);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_component(pool: PgPool) {
    let outcome = ComponentRepo::update(&pool, 4242, &UpdateComponent::default())
        .await
        .unwrap();
    assert!(matches!(outcome, ComponentUpdate::NotFound));
}

// ---------------------------------------------------------------------------
// Deletion guard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_unreferenced_component(pool: PgPool) {
    let component = ComponentRepo::create(&pool, &new_component("Arduino Uno", 10, 10))
        .await
        .unwrap();

    assert_eq!(
        ComponentRepo::delete(&pool, component.id).await.unwrap(),
        ComponentDelete::Deleted
    );
    assert_eq!(
        ComponentRepo::delete(&pool, component.id).await.unwrap(),
        ComponentDelete::NotFound
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_referenced_component_blocked(pool: PgPool) {
    let student = UserRepo::create(
        &pool,
        &CreateUser {
            email: "student@lab.edu".to_string(),
            password_hash: Some("$argon2id$fake".to_string()),
            name: "student".to_string(),
            role: "STUDENT".to_string(),
            google_id: None,
        },
    )
    .await
    .unwrap();
    let faculty = UserRepo::create(
        &pool,
        &CreateUser {
            email: "prof@lab.edu".to_string(),
            password_hash: Some("$argon2id$fake".to_string()),
            name: "prof".to_string(),
            role: "FACULTY".to_string(),
            google_id: None,
        },
    )
    .await
    .unwrap();
    let component = ComponentRepo::create(&pool, &new_component("Arduino Uno", 10, 10))
        .await
        .unwrap();

    RequestRepo::create(
        &pool,
        &CreateRequest {
            user_id: student.id,
            target_faculty_id: faculty.id,
            project_title: "Weather station".to_string(),
            items: vec![NewRequestItem {
                component_id: component.id,
                quantity: 2,
            }],
        },
    )
    .await
    .unwrap();

    assert_eq!(
        ComponentRepo::delete(&pool, component.id).await.unwrap(),
        ComponentDelete::Referenced
    );
    // The component is intact.
    assert!(ComponentRepo::find_by_id(&pool, component.id).await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Existence checks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_missing_component_ids(pool: PgPool) {
    let component = ComponentRepo::create(&pool, &new_component("Arduino Uno", 10, 10))
        .await
        .unwrap();

    let missing = ComponentRepo::find_missing(&pool, &[component.id, 999, 1000])
        .await
        .unwrap();
    assert_eq!(missing, vec![999, 1000]);

    let none_missing = ComponentRepo::find_missing(&pool, &[component.id]).await.unwrap();
    assert!(none_missing.is_empty());
}
