#![cfg(feature = "memory")]
#![allow(dead_code)]

pub mod helpers;
pub mod schema;

pub use helpers::*;
pub use schema::*;
