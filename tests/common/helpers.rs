//! Store setup and seed data shared by the integration tests.

use serde_json::json;
use strata::memory::{MemoryObject, MemoryStore};
use strata::prelude::*;

use super::schema::Post;

pub fn setup_store() -> MemoryStore {
    MemoryStore::new()
}

pub fn setup_store_with(config: Config) -> MemoryStore {
    MemoryStore::with_context(QueryContext::new(config))
}

/// Inserts `count` posts titled `post-1..=count` with `views` equal to the
/// index.
pub fn insert_posts(store: &MemoryStore, count: usize) -> Vec<MemoryObject> {
    (1..=count)
        .map(|i| {
            store
                .insert("Post", json!({"title": format!("post-{i}"), "views": i}))
                .unwrap()
        })
        .collect()
}

/// Saves a record whose attributes may point at other records.
pub fn save(store: &MemoryStore, class: &str, attributes: Vec<(&str, Value<MemoryObject>)>) -> MemoryObject {
    let mut object = store.object(class);
    for (key, value) in attributes {
        object.set(key, value);
    }
    object.save(false).unwrap();
    object
}

pub struct Blog {
    pub ada: MemoryObject,
    pub bob: MemoryObject,
    pub rust: MemoryObject,
    pub go: MemoryObject,
}

/// Two users, two categories and three posts:
///
/// - `hello` by ada, in rust and go
/// - `second` by bob, in go
/// - `third` by ada, uncategorized
pub fn seed_blog(store: &MemoryStore) -> Blog {
    let ada = store.insert("User", json!({"name": "ada"})).unwrap();
    let bob = store.insert("User", json!({"name": "bob"})).unwrap();

    let rust = save(store, "Category", vec![
        ("label", Value::String("rust".into())),
        ("owner", Value::Object(ada.clone())),
    ]);
    let go = save(store, "Category", vec![
        ("label", Value::String("go".into())),
        ("owner", Value::Object(bob.clone())),
    ]);

    save(store, "Post", vec![
        ("title", Value::String("hello".into())),
        ("user", Value::Object(ada.clone())),
        ("categories", Value::Array(vec![Value::Object(rust.clone()), Value::Object(go.clone())])),
    ]);
    save(store, "Post", vec![
        ("title", Value::String("second".into())),
        ("user", Value::Object(bob.clone())),
        ("categories", Value::Array(vec![Value::Object(go.clone())])),
    ]);
    save(store, "Post", vec![
        ("title", Value::String("third".into())),
        ("user", Value::Object(ada.clone())),
    ]);

    store.clear_journal();

    Blog { ada, bob, rust, go }
}

pub fn titles(posts: &[Post]) -> Vec<String> {
    posts.iter().filter_map(Post::title).collect()
}
