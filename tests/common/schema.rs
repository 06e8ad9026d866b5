//! Test models: posts written by users and filed under categories.

use strata::memory::MemoryObject;
use strata::prelude::*;

/// Implements `Model` for a struct with `object` and `use_master_key` fields.
macro_rules! impl_model {
    ($model:ident, $class:literal { $($field:ident: $cell:expr),* $(,)? }) => {
        impl Model for $model {
            type Object = MemoryObject;
            const CLASS_NAME: &'static str = $class;

            fn from_object(object: MemoryObject, use_master_key: bool) -> Self {
                Self {
                    object,
                    use_master_key,
                    $($field: $cell,)*
                }
            }

            fn object(&self) -> &MemoryObject {
                &self.object
            }

            fn object_mut(&mut self) -> &mut MemoryObject {
                &mut self.object
            }

            fn uses_master_key(&self) -> bool {
                self.use_master_key
            }

            fn model_name() -> &'static str {
                $class
            }
        }
    };
}

pub struct Post {
    object: MemoryObject,
    use_master_key: bool,
    pub user: BelongsTo<User>,
    pub categories: BelongsToMany<Category>,
}

impl_model!(Post, "Post" {
    user: BelongsTo::new("user"),
    categories: BelongsToMany::new("categories"),
});

impl Post {
    pub fn title(&self) -> Option<String> {
        self.get("title").and_then(|v| v.as_str().map(str::to_owned))
    }

    pub fn user(&self) -> strata::Result<Option<&User>> {
        self.user.get(&self.object, self.use_master_key)
    }

    pub fn categories(&self) -> strata::Result<&[Category]> {
        self.categories.get(&self.object, self.use_master_key)
    }
}

impl Relations for Post {
    fn relation(&self, name: &str) -> strata::Result<Related<'_>> {
        match name {
            "user" => Ok(Related::one(self.user()?)),
            "categories" => Ok(Related::many(self.categories()?)),
            _ => Err(Self::unknown_relation(name)),
        }
    }
}

pub struct User {
    object: MemoryObject,
    use_master_key: bool,
    pub posts: HasMany<Post>,
}

impl_model!(User, "User" {
    posts: HasMany::new("user"),
});

impl User {
    pub fn name(&self) -> Option<String> {
        self.get("name").and_then(|v| v.as_str().map(str::to_owned))
    }

    pub fn posts(&self) -> strata::Result<&[Post]> {
        self.posts.get(&self.object, self.use_master_key)
    }
}

impl Relations for User {
    fn relation(&self, name: &str) -> strata::Result<Related<'_>> {
        match name {
            "posts" => Ok(Related::many(self.posts()?)),
            _ => Err(Self::unknown_relation(name)),
        }
    }
}

pub struct Category {
    object: MemoryObject,
    use_master_key: bool,
    pub posts: HasMany<Post>,
    pub owner: BelongsTo<User>,
}

impl_model!(Category, "Category" {
    posts: HasMany::new("categories"),
    owner: BelongsTo::new("owner"),
});

impl Category {
    pub fn label(&self) -> Option<String> {
        self.get("label").and_then(|v| v.as_str().map(str::to_owned))
    }

    pub fn posts(&self) -> strata::Result<&[Post]> {
        self.posts.get(&self.object, self.use_master_key)
    }

    pub fn owner(&self) -> strata::Result<Option<&User>> {
        self.owner.get(&self.object, self.use_master_key)
    }
}

impl Relations for Category {
    fn relation(&self, name: &str) -> strata::Result<Related<'_>> {
        match name {
            "posts" => Ok(Related::many(self.posts()?)),
            "owner" => Ok(Related::one(self.owner()?)),
            _ => Err(Self::unknown_relation(name)),
        }
    }
}
