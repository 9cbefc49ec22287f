#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web::{Data, ServiceConfig};
use promotions::{Config, Database, MemoryDatabase, Promotype};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Value};

pub const API_KEY: &str = "133b94898f9b6c07ede6296e0ec197f7";

const NAMES: &[&str] = &["Fido", "Kitty", "Leo", "Sammy", "Spring Sale", "Black Friday"];
const CATEGORIES: &[&str] = &["dog", "cat", "holiday", "seasonal", "friends_and_family"];

pub fn routes() -> impl FnOnce(&mut ServiceConfig) {
    routes_with(Config::in_memory(API_KEY))
}

pub fn routes_with(config: Config) -> impl FnOnce(&mut ServiceConfig) {
    let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());
    promotions::configure(config, Data::from(db))
}

/// A random, valid promotion body.
pub fn fake_promotion() -> Value {
    let mut rng = rand::thread_rng();
    let promotype = Promotype::ALL
        .choose(&mut rng)
        .copied()
        .unwrap_or_default();

    json!({
        "name": NAMES.choose(&mut rng).copied().unwrap_or("Fido"),
        "category": CATEGORIES.choose(&mut rng).copied().unwrap_or("dog"),
        "available": rng.gen::<bool>(),
        "promotype": promotype.name(),
    })
}
