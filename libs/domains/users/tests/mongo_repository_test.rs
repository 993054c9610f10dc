//! Integration tests for MongoUserRepository against a real MongoDB
//!
//! Each test starts its own container; run with `cargo test -- --ignored`.

use domain_users::{
    CreateUser, MongoUserRepository, UserChanges, UserDocument, UserError, UserRepository,
    UserService,
};
use mongodb::bson::{Document, doc, oid::ObjectId};
use test_utils::{TestDataBuilder, TestMongo};

fn document(builder: &TestDataBuilder, suffix: &str) -> UserDocument {
    UserDocument {
        id: ObjectId::new(),
        username: builder.username(suffix),
        email: builder.email(suffix),
        name: String::new(),
        password: "$argon2id$stub".to_string(),
        admin: false,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_insert_find_delete() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("test_insert_find_delete");
    let repo = MongoUserRepository::new(&mongo.database(&builder.database_name()));

    let user = document(&builder, "main");
    let id = user.id;
    repo.insert(user.clone()).await.unwrap();

    let found = repo.find_by_id(id).await.unwrap();
    assert_eq!(found, Some(user));

    assert_eq!(repo.delete(id).await.unwrap(), 1);
    assert_eq!(repo.delete(id).await.unwrap(), 0);
    assert!(repo.find_by_id(id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_id_is_store_error() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("test_duplicate_id_is_store_error");
    let repo = MongoUserRepository::new(&mongo.database(&builder.database_name()));

    let user = document(&builder, "dup");
    repo.insert(user.clone()).await.unwrap();

    let err = repo.insert(user).await.unwrap_err();
    assert!(matches!(err, UserError::Store(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_sets_only_changed_fields() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("test_update_sets_only_changed_fields");
    let repo = MongoUserRepository::new(&mongo.database(&builder.database_name()));

    let user = document(&builder, "partial");
    let id = user.id;
    repo.insert(user.clone()).await.unwrap();

    let changes = UserChanges {
        email: Some("new@example.test".into()),
        ..Default::default()
    };
    assert_eq!(repo.update_fields(id, changes.clone()).await.unwrap(), 1);
    assert_eq!(
        repo.update_fields(ObjectId::new(), changes).await.unwrap(),
        0
    );

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.email, "new@example.test");
    assert_eq!(stored.username, user.username);
    assert_eq!(stored.password, user.password);
    assert!(!stored.admin);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_all_in_storage_order() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("test_find_all_in_storage_order");
    let repo = MongoUserRepository::new(&mongo.database(&builder.database_name()));

    for suffix in ["one", "two", "three"] {
        repo.insert(document(&builder, suffix)).await.unwrap();
    }

    let names: Vec<_> = repo
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(
        names,
        [
            builder.username("one"),
            builder.username("two"),
            builder.username("three")
        ]
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_undecodable_document_aborts_listing() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("test_undecodable_document_aborts_listing");
    let db = mongo.database(&builder.database_name());
    let repo = MongoUserRepository::new(&db);

    repo.insert(document(&builder, "ok")).await.unwrap();
    db.collection::<Document>("users")
        .insert_one(doc! { "username": 42 })
        .await
        .unwrap();

    let err = repo.find_all().await.unwrap_err();
    assert!(matches!(err, UserError::Store(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_service_round_trip_hides_password() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("test_service_round_trip_hides_password");
    let repo = MongoUserRepository::with_collection(
        &mongo.database(&builder.database_name()),
        "accounts",
    );
    let service = UserService::new(repo);

    let created = service
        .create_user(CreateUser {
            username: "a".into(),
            email: "a@x.com".into(),
            password: "secret123".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    let id = created.id.clone().unwrap();

    let fetched = service.get_user(&id).await.unwrap().unwrap();
    assert_eq!(fetched.username, "a");
    assert_eq!(fetched.email, "a@x.com");

    let json = serde_json::to_string(&fetched).unwrap();
    test_utils::assertions::assert_no_password(&json, "secret123", "get_user");
}
