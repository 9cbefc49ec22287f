use tracing::info;

use crate::database::Database;
use crate::error::Error;

use super::db::PromotionFilter;
use super::{Promotion, PromotionId, Promotype};

#[tracing::instrument(skip(db))]
pub async fn create_promotion(
    db: &dyn Database,
    mut promotion: Promotion,
) -> Result<Promotion, Error> {
    let name = promotion
        .name
        .clone()
        .ok_or_else(|| Error::validation("name attribute is not set"))?;
    info!("Creating {}", name);

    // the store decides the id
    promotion.id = None;

    db.promotions().insert_promotion(promotion).await
}

#[tracing::instrument(skip(db))]
pub async fn update_promotion(db: &dyn Database, promotion: Promotion) -> Result<Promotion, Error> {
    if promotion.id.is_none() {
        return Err(Error::validation("Update called with empty ID field"));
    }
    info!("Saving {}", promotion);

    db.promotions().update_promotion(promotion).await
}

#[tracing::instrument(skip(db))]
pub async fn delete_promotion(db: &dyn Database, promotion: &Promotion) -> Result<(), Error> {
    let promotion_id = promotion
        .id
        .ok_or_else(|| Error::validation("Delete called with empty ID field"))?;
    info!("Deleting {}", promotion);

    db.promotions().delete_promotion(promotion_id).await
}

#[tracing::instrument(skip(db))]
pub async fn set_promotion_availability(
    db: &dyn Database,
    promotion_id: PromotionId,
    available: bool,
) -> Result<Promotion, Error> {
    let mut promotion = expect_promotion_by_id(db, promotion_id).await?;
    promotion.available = available;

    update_promotion(db, promotion).await
}

#[tracing::instrument(skip(db))]
pub async fn get_promotions(db: &dyn Database) -> Result<Vec<Promotion>, Error> {
    info!("Processing all Promotions");
    db.promotions().fetch_promotions(PromotionFilter::All).await
}

#[tracing::instrument(skip(db))]
pub async fn get_promotions_by_filter(
    db: &dyn Database,
    filter: PromotionFilter,
) -> Result<Vec<Promotion>, Error> {
    db.promotions().fetch_promotions(filter).await
}

#[tracing::instrument(skip(db))]
pub async fn get_promotion_by_id(
    db: &dyn Database,
    promotion_id: PromotionId,
) -> Result<Option<Promotion>, Error> {
    info!("Processing lookup for id {} ...", promotion_id);
    db.promotions().fetch_promotion_by_id(promotion_id).await
}

#[tracing::instrument(skip(db))]
pub async fn expect_promotion_by_id(
    db: &dyn Database,
    promotion_id: PromotionId,
) -> Result<Promotion, Error> {
    let promotion = get_promotion_by_id(db, promotion_id)
        .await?
        .ok_or(Error::PromotionNotFound { promotion_id })?;

    Ok(promotion)
}

#[tracing::instrument(skip(db))]
pub async fn get_promotions_by_name(
    db: &dyn Database,
    name: &str,
) -> Result<Vec<Promotion>, Error> {
    info!("Processing name query for {} ...", name);
    get_promotions_by_filter(db, PromotionFilter::Name(name.to_owned())).await
}

#[tracing::instrument(skip(db))]
pub async fn get_promotions_by_category(
    db: &dyn Database,
    category: &str,
) -> Result<Vec<Promotion>, Error> {
    info!("Processing category query for {} ...", category);
    get_promotions_by_filter(db, PromotionFilter::Category(category.to_owned())).await
}

#[tracing::instrument(skip(db))]
pub async fn get_promotions_by_availability(
    db: &dyn Database,
    available: bool,
) -> Result<Vec<Promotion>, Error> {
    info!("Processing available query for {} ...", available);
    get_promotions_by_filter(db, PromotionFilter::Available(available)).await
}

#[tracing::instrument(skip(db))]
pub async fn get_promotions_by_promotype(
    db: &dyn Database,
    promotype: Promotype,
) -> Result<Vec<Promotion>, Error> {
    info!("Processing promotype query for {} ...", promotype);
    get_promotions_by_filter(db, PromotionFilter::Promotype(promotype)).await
}
