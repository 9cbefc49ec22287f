use async_trait::async_trait;
use mongodb::bson::{self, Document};
use mongodb::{Client, IndexModel};
use tracing::info;

use crate::error::Error;
use crate::promotion::db::{MemoryPromotionStore, MongoPromotionStore, PromotionStore};
use crate::promotion::Promotion;

/// Process-wide handle to wherever promotions are persisted.
#[async_trait]
pub trait Database: Send + Sync {
    fn promotions(&self) -> &dyn PromotionStore;

    /// Wipes everything in the store.
    async fn drop(&self) -> Result<(), Error>;
}

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    promotions: MongoPromotionStore,
    db: mongodb::Database,
}

impl MongoDatabase {
    pub fn new(db: mongodb::Database) -> MongoDatabase {
        MongoDatabase {
            promotions: MongoPromotionStore::new(
                db.collection::<Promotion>("promotions"),
                db.collection::<Document>("counters"),
            ),
            db,
        }
    }

    pub async fn connect(uri: &str, name: &str) -> Result<MongoDatabase, Error> {
        info!("connecting to db: {}", uri);
        let db = Client::with_uri_str(uri).await?.database(name);

        MongoDatabase::initialize(db).await
    }

    pub async fn initialize(db: mongodb::Database) -> Result<MongoDatabase, Error> {
        // ping the database to ensure connection is established
        db.run_command(bson::doc! { "ping": 1 }, None).await?;

        let promotions = db.collection::<Promotion>("promotions");
        for key in ["name", "category"] {
            let mut keys = Document::new();
            keys.insert(key, 1);
            let index = IndexModel::builder().keys(keys).build();
            promotions.create_index(index, None).await?;
        }

        Ok(MongoDatabase::new(db))
    }
}

#[async_trait]
impl Database for MongoDatabase {
    fn promotions(&self) -> &dyn PromotionStore {
        &self.promotions
    }

    async fn drop(&self) -> Result<(), Error> {
        self.db.drop(None).await?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryDatabase {
    promotions: MemoryPromotionStore,
}

impl MemoryDatabase {
    pub fn new() -> MemoryDatabase {
        MemoryDatabase::default()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    fn promotions(&self) -> &dyn PromotionStore {
        &self.promotions
    }

    async fn drop(&self) -> Result<(), Error> {
        self.promotions.clear()
    }
}
