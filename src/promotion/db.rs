use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::Collection;

use crate::error::Error;

use super::{Promotion, PromotionId, Promotype};

const PROMOTIONS: &str = "promotions";

/// A single-field selection over the stored promotions. Matches are exact and
/// case-sensitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromotionFilter {
    All,
    Name(String),
    Category(String),
    Available(bool),
    Promotype(Promotype),
}

impl PromotionFilter {
    pub fn matches(&self, promotion: &Promotion) -> bool {
        match self {
            PromotionFilter::All => true,
            PromotionFilter::Name(name) => promotion.name.as_deref() == Some(name.as_str()),
            PromotionFilter::Category(category) => &promotion.category == category,
            PromotionFilter::Available(available) => promotion.available == *available,
            PromotionFilter::Promotype(promotype) => promotion.promotype == *promotype,
        }
    }

    fn to_document(&self) -> Result<Document, Error> {
        let document = match self {
            PromotionFilter::All => bson::doc! {},
            PromotionFilter::Name(name) => bson::doc! { "name": name.as_str() },
            PromotionFilter::Category(category) => bson::doc! { "category": category.as_str() },
            PromotionFilter::Available(available) => bson::doc! { "available": *available },
            PromotionFilter::Promotype(promotype) => {
                bson::doc! { "promotype": bson::to_bson(promotype)? }
            }
        };

        Ok(document)
    }
}

#[async_trait]
pub trait PromotionStore: Send + Sync {
    /// Persists a new promotion under a freshly assigned id.
    async fn insert_promotion(&self, promotion: Promotion) -> Result<Promotion, Error>;

    async fn update_promotion(&self, promotion: Promotion) -> Result<Promotion, Error>;

    async fn delete_promotion(&self, promotion_id: PromotionId) -> Result<(), Error>;

    async fn fetch_promotion_by_id(
        &self,
        promotion_id: PromotionId,
    ) -> Result<Option<Promotion>, Error>;

    async fn fetch_promotions(&self, filter: PromotionFilter) -> Result<Vec<Promotion>, Error>;
}

#[derive(Debug, Clone)]
pub struct MongoPromotionStore {
    promotions: Collection<Promotion>,
    counters: Collection<Document>,
}

impl MongoPromotionStore {
    pub fn new(promotions: Collection<Promotion>, counters: Collection<Document>) -> Self {
        MongoPromotionStore {
            promotions,
            counters,
        }
    }

    async fn next_promotion_id(&self) -> Result<PromotionId, Error> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self
            .counters
            .find_one_and_update(
                bson::doc! { "_id": PROMOTIONS },
                bson::doc! { "$inc": { "seq": 1_i64 } },
                options,
            )
            .await?
            .ok_or_else(|| Error::ExistentialState("promotion counter was not upserted".into()))?;

        let seq = counter
            .get_i64("seq")
            .map_err(|err| Error::ExistentialState(format!("promotion counter: {}", err)))?;

        Ok(PromotionId(seq))
    }
}

#[async_trait]
impl PromotionStore for MongoPromotionStore {
    #[tracing::instrument(skip(self))]
    async fn insert_promotion(&self, mut promotion: Promotion) -> Result<Promotion, Error> {
        promotion.id = Some(self.next_promotion_id().await?);
        self.promotions.insert_one(&promotion, None).await?;

        Ok(promotion)
    }

    #[tracing::instrument(skip(self))]
    async fn update_promotion(&self, promotion: Promotion) -> Result<Promotion, Error> {
        let promotion_id = promotion.id.ok_or_else(|| {
            Error::ExistentialState("attempted to update a promotion without an id".into())
        })?;

        let result = self
            .promotions
            .replace_one(bson::doc! { "_id": promotion_id }, &promotion, None)
            .await?;

        if result.matched_count == 0 {
            return Err(Error::ConcurrentModificationDetected);
        }

        Ok(promotion)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_promotion(&self, promotion_id: PromotionId) -> Result<(), Error> {
        self.promotions
            .delete_one(bson::doc! { "_id": promotion_id }, None)
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_promotion_by_id(
        &self,
        promotion_id: PromotionId,
    ) -> Result<Option<Promotion>, Error> {
        let promotion = self
            .promotions
            .find_one(bson::doc! { "_id": promotion_id }, None)
            .await?;

        Ok(promotion)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_promotions(&self, filter: PromotionFilter) -> Result<Vec<Promotion>, Error> {
        let options = FindOptions::builder().sort(bson::doc! { "_id": 1 }).build();
        let promotions: Vec<Promotion> = self
            .promotions
            .find(filter.to_document()?, options)
            .await?
            .try_collect()
            .await?;

        Ok(promotions)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    promotions: BTreeMap<PromotionId, Promotion>,
}

/// Keeps promotions in process memory, ordered by id.
#[derive(Debug, Default)]
pub struct MemoryPromotionStore {
    state: Mutex<MemoryState>,
}

impl MemoryPromotionStore {
    pub fn new() -> Self {
        MemoryPromotionStore::default()
    }

    /// Removes every promotion. Ids are not reused afterwards.
    pub fn clear(&self) -> Result<(), Error> {
        self.lock()?.promotions.clear();

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, Error> {
        self.state
            .lock()
            .map_err(|_| Error::ExistentialState("promotion store lock was poisoned".into()))
    }
}

#[async_trait]
impl PromotionStore for MemoryPromotionStore {
    #[tracing::instrument(skip(self))]
    async fn insert_promotion(&self, mut promotion: Promotion) -> Result<Promotion, Error> {
        let mut state = self.lock()?;
        state.last_id += 1;
        let promotion_id = PromotionId(state.last_id);

        promotion.id = Some(promotion_id);
        state.promotions.insert(promotion_id, promotion.clone());

        Ok(promotion)
    }

    #[tracing::instrument(skip(self))]
    async fn update_promotion(&self, promotion: Promotion) -> Result<Promotion, Error> {
        let promotion_id = promotion.id.ok_or_else(|| {
            Error::ExistentialState("attempted to update a promotion without an id".into())
        })?;

        let mut state = self.lock()?;
        let stored = state
            .promotions
            .get_mut(&promotion_id)
            .ok_or(Error::ConcurrentModificationDetected)?;
        *stored = promotion.clone();

        Ok(promotion)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_promotion(&self, promotion_id: PromotionId) -> Result<(), Error> {
        self.lock()?.promotions.remove(&promotion_id);

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_promotion_by_id(
        &self,
        promotion_id: PromotionId,
    ) -> Result<Option<Promotion>, Error> {
        Ok(self.lock()?.promotions.get(&promotion_id).cloned())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_promotions(&self, filter: PromotionFilter) -> Result<Vec<Promotion>, Error> {
        let promotions = self
            .lock()?
            .promotions
            .values()
            .filter(|promotion| filter.matches(promotion))
            .cloned()
            .collect();

        Ok(promotions)
    }
}
