//! End-to-end association loading against the in-memory backend.
//!
//! Covers default-scope suppression per declaration, instance-level
//! memoization, and force_reload invalidation across all three
//! association kinds.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use unscoped_associations::{
    AssociationOptions, AssociationRegistry, BelongsToAssociation, HasManyAssociation,
    HasOneAssociation, MemoryDatabase, Model, ModelAssociations, QueryBuilder, Scope,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
    id: Option<i64>,
    name: String,
    active: bool,
}

impl Model for User {
    type PrimaryKey = i64;

    fn table_name() -> &'static str {
        "users"
    }

    fn primary_key(&self) -> Option<Self::PrimaryKey> {
        self.id
    }

    fn to_fields(&self) -> HashMap<String, Value> {
        let mut fields = HashMap::new();
        fields.insert("id".to_string(), json!(self.id));
        fields.insert("name".to_string(), Value::String(self.name.clone()));
        fields.insert("active".to_string(), json!(self.active));
        fields
    }

    fn default_scope(query: QueryBuilder<Self>) -> QueryBuilder<Self> {
        query.where_eq("active", true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Comment {
    id: Option<i64>,
    user_id: Option<i64>,
    body: String,
    published: bool,
}

impl Model for Comment {
    type PrimaryKey = i64;

    fn table_name() -> &'static str {
        "comments"
    }

    fn primary_key(&self) -> Option<Self::PrimaryKey> {
        self.id
    }

    fn to_fields(&self) -> HashMap<String, Value> {
        let mut fields = HashMap::new();
        fields.insert("id".to_string(), json!(self.id));
        fields.insert("user_id".to_string(), json!(self.user_id));
        fields.insert("body".to_string(), Value::String(self.body.clone()));
        fields.insert("published".to_string(), json!(self.published));
        fields
    }

    fn default_scope(query: QueryBuilder<Self>) -> QueryBuilder<Self> {
        query.where_eq("published", true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Profile {
    id: Option<i64>,
    user_id: Option<i64>,
    bio: String,
    visible: bool,
}

impl Model for Profile {
    type PrimaryKey = i64;

    fn table_name() -> &'static str {
        "profiles"
    }

    fn primary_key(&self) -> Option<Self::PrimaryKey> {
        self.id
    }

    fn to_fields(&self) -> HashMap<String, Value> {
        let mut fields = HashMap::new();
        fields.insert("id".to_string(), json!(self.id));
        fields.insert("user_id".to_string(), json!(self.user_id));
        fields.insert("bio".to_string(), Value::String(self.bio.clone()));
        fields.insert("visible".to_string(), json!(self.visible));
        fields
    }

    fn default_scope(query: QueryBuilder<Self>) -> QueryBuilder<Self> {
        query.where_eq("visible", true)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn seeded_db() -> MemoryDatabase {
    init_tracing();
    let db = MemoryDatabase::new();
    db.insert_all(
        "users",
        vec![
            json!({"id": 1, "name": "alice", "active": true}),
            json!({"id": 2, "name": "bob", "active": false}),
        ],
    )
    .unwrap();
    db.insert_all(
        "comments",
        vec![
            json!({"id": 1, "user_id": 1, "body": "first", "published": true}),
            json!({"id": 2, "user_id": 1, "body": "second", "published": false}),
            json!({"id": 3, "user_id": 1, "body": "third", "published": true}),
            json!({"id": 4, "user_id": 2, "body": "other", "published": true}),
        ],
    )
    .unwrap();
    db.insert_all(
        "profiles",
        vec![json!({"id": 1, "user_id": 1, "bio": "hidden", "visible": false})],
    )
    .unwrap();
    db
}

fn alice() -> User {
    User {
        id: Some(1),
        name: "alice".to_string(),
        active: true,
    }
}

#[tokio::test]
async fn unscoped_has_many_sees_past_the_default_scope() {
    let db = seeded_db();
    let registry = AssociationRegistry::new();
    let associations = ModelAssociations::<User>::new(&registry);

    let scoped = associations.has_many::<Comment>("comments", ()).unwrap();
    let unscoped = associations
        .has_many::<Comment>("all_comments", AssociationOptions::new().unscoped(true))
        .unwrap();

    let mut scoped_accessor =
        HasManyAssociation::<User, Comment>::new(alice(), scoped).unwrap();
    let mut unscoped_accessor =
        HasManyAssociation::<User, Comment>::new(alice(), unscoped).unwrap();

    let published = scoped_accessor.get(&db, false).await.unwrap();
    assert_eq!(published.len(), 2);
    assert!(published.iter().all(|c| c.published));

    let all = unscoped_accessor.get(&db, false).await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|c| c.user_id == Some(1)));
}

#[tokio::test]
async fn has_many_accessor_memoizes_per_instance() {
    let db = seeded_db();
    let registry = AssociationRegistry::new();
    let metadata = ModelAssociations::<User>::new(&registry)
        .has_many::<Comment>("comments", AssociationOptions::new().unscoped(true))
        .unwrap();

    let mut accessor = HasManyAssociation::<User, Comment>::new(alice(), metadata).unwrap();

    let first = accessor.get(&db, false).await.unwrap().as_ptr();
    let second = accessor.get(&db, false).await.unwrap().as_ptr();
    assert_eq!(first, second);
    assert!(accessor.is_loaded());
}

#[tokio::test]
async fn force_reload_picks_up_new_rows() {
    let db = seeded_db();
    let registry = AssociationRegistry::new();
    let metadata = ModelAssociations::<User>::new(&registry)
        .has_many::<Comment>("comments", AssociationOptions::new().unscoped(true))
        .unwrap();

    let mut accessor = HasManyAssociation::<User, Comment>::new(alice(), metadata).unwrap();
    assert_eq!(accessor.get(&db, false).await.unwrap().len(), 3);

    db.insert(
        "comments",
        json!({"id": 5, "user_id": 1, "body": "fourth", "published": false}),
    )
    .unwrap();

    // Cache hit ignores the new row until a reload is forced
    assert_eq!(accessor.get(&db, false).await.unwrap().len(), 3);
    assert_eq!(accessor.get(&db, true).await.unwrap().len(), 4);
}

#[tokio::test]
async fn unscoped_accessor_matches_manual_unscoped_query() {
    let db = seeded_db();
    let registry = AssociationRegistry::new();
    let metadata = ModelAssociations::<User>::new(&registry)
        .has_many::<Comment>("comments", AssociationOptions::new().unscoped(true))
        .unwrap();

    let mut accessor = HasManyAssociation::<User, Comment>::new(alice(), metadata).unwrap();
    let via_accessor: Vec<Option<i64>> = accessor
        .get(&db, false)
        .await
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();

    let via_builder: Vec<Option<i64>> = QueryBuilder::<Comment>::for_model()
        .where_eq("user_id", 1)
        .unscoped()
        .get(&db)
        .await
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();

    assert_eq!(via_accessor, via_builder);
}

#[tokio::test]
async fn unscoped_belongs_to_finds_inactive_parent() {
    let db = seeded_db();
    let registry = AssociationRegistry::new();
    let associations = ModelAssociations::<Comment>::new(&registry);

    let scoped = associations.belongs_to::<User>("user", ()).unwrap();
    let unscoped = associations
        .belongs_to::<User>("author", AssociationOptions::new().foreign_key("user_id").unscoped(true))
        .unwrap();

    // bob is inactive, so the default scope hides him
    let bobs_comment = Comment {
        id: Some(4),
        user_id: Some(2),
        body: "other".to_string(),
        published: true,
    };

    let mut scoped_accessor =
        BelongsToAssociation::<Comment, User>::new(bobs_comment.clone(), scoped).unwrap();
    assert!(scoped_accessor.get(&db, false).await.unwrap().is_none());

    let mut unscoped_accessor =
        BelongsToAssociation::<Comment, User>::new(bobs_comment, unscoped).unwrap();
    let author = unscoped_accessor.get(&db, false).await.unwrap().unwrap();
    assert_eq!(author.name, "bob");
    assert!(!author.active);
}

#[tokio::test]
async fn belongs_to_without_foreign_key_skips_the_query() {
    let db = seeded_db();
    let registry = AssociationRegistry::new();
    let metadata = ModelAssociations::<Comment>::new(&registry)
        .belongs_to::<User>("user", AssociationOptions::new().unscoped(true))
        .unwrap();

    let orphan = Comment {
        id: Some(9),
        user_id: None,
        body: "orphan".to_string(),
        published: true,
    };
    let mut accessor = BelongsToAssociation::<Comment, User>::new(orphan, metadata).unwrap();

    assert!(accessor.get(&db, false).await.unwrap().is_none());
    assert!(accessor.is_loaded());
}

#[tokio::test]
async fn unscoped_has_one_finds_invisible_profile() {
    let db = seeded_db();
    let registry = AssociationRegistry::new();
    let associations = ModelAssociations::<User>::new(&registry);

    let scoped = associations.has_one::<Profile>("profile", ()).unwrap();
    let unscoped = associations
        .has_one::<Profile>("any_profile", AssociationOptions::new().unscoped(true))
        .unwrap();

    let mut scoped_accessor =
        HasOneAssociation::<User, Profile>::new(alice(), scoped).unwrap();
    assert!(scoped_accessor.get(&db, false).await.unwrap().is_none());

    let mut unscoped_accessor =
        HasOneAssociation::<User, Profile>::new(alice(), unscoped).unwrap();
    let profile = unscoped_accessor.get(&db, false).await.unwrap().unwrap();
    assert_eq!(profile.bio, "hidden");
}

#[tokio::test]
async fn declaration_scope_applies_alongside_unscoped() {
    let db = seeded_db();
    let registry = AssociationRegistry::new();
    let metadata = ModelAssociations::<User>::new(&registry)
        .has_many::<Comment>(
            "drafts",
            (
                Scope::new().where_eq("published", false),
                AssociationOptions::new().foreign_key("user_id").unscoped(true),
            ),
        )
        .unwrap();

    let mut accessor = HasManyAssociation::<User, Comment>::new(alice(), metadata).unwrap();
    let drafts = accessor.get(&db, false).await.unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].body, "second");
}

#[tokio::test]
async fn registry_lookup_drives_accessor_construction() {
    let db = seeded_db();
    let registry = AssociationRegistry::new();
    ModelAssociations::<User>::new(&registry)
        .has_many::<Comment>("comments", AssociationOptions::new().unscoped(true))
        .unwrap();

    assert_eq!(
        registry.unscoped_associations(User::table_name()),
        vec!["comments"]
    );

    let metadata = registry
        .get_or_err(User::table_name(), "comments")
        .unwrap();
    let mut accessor = HasManyAssociation::<User, Comment>::new(alice(), metadata).unwrap();
    assert_eq!(accessor.get(&db, false).await.unwrap().len(), 3);
}

#[tokio::test]
async fn reset_clears_the_cache_slot() {
    let db = seeded_db();
    let registry = AssociationRegistry::new();
    let metadata = ModelAssociations::<User>::new(&registry)
        .has_many::<Comment>("comments", ())
        .unwrap();

    let mut accessor = HasManyAssociation::<User, Comment>::new(alice(), metadata).unwrap();
    accessor.get(&db, false).await.unwrap();
    assert!(accessor.is_loaded());
    assert_eq!(accessor.len(), 2);

    accessor.reset();
    assert!(!accessor.is_loaded());
    assert!(accessor.cached().is_none());
}
