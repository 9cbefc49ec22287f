use actix_web::http::header::LOCATION;
use actix_web::web::{Data, Json, Path, Query};
use actix_web::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::database::Database;
use crate::error::Error;

use super::db::PromotionFilter;
use super::{manager, Promotion, PromotionId, Promotype};

/// The wire form of a [`Promotion`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionBody {
    pub id: Option<PromotionId>,
    pub name: Option<String>,
    pub category: String,
    pub available: bool,
    pub promotype: Promotype,
}

impl PromotionBody {
    pub fn render(promotion: Promotion) -> PromotionBody {
        PromotionBody {
            id: promotion.id,
            name: promotion.name,
            category: promotion.category,
            available: promotion.available,
            promotype: promotion.promotype,
        }
    }
}

/// Optional list filters. Only the first non-empty one in field order is
/// applied.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PromotionQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub available: Option<String>,
    pub promotype: Option<String>,
}

impl PromotionQuery {
    pub fn into_filter(self) -> Result<PromotionFilter, Error> {
        if let Some(name) = non_empty(self.name) {
            return Ok(PromotionFilter::Name(name));
        }
        if let Some(category) = non_empty(self.category) {
            return Ok(PromotionFilter::Category(category));
        }
        if let Some(available) = non_empty(self.available) {
            let available = parse_bool(&available).ok_or_else(|| {
                Error::validation(format!("Invalid value for [available]: {}", available))
            })?;
            return Ok(PromotionFilter::Available(available));
        }
        if let Some(promotype) = non_empty(self.promotype) {
            return Ok(PromotionFilter::Promotype(promotype.parse()?));
        }

        Ok(PromotionFilter::All)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[tracing::instrument(skip(db))]
pub async fn get_promotions(
    db: Data<dyn Database>,
    query: Query<PromotionQuery>,
) -> Result<Json<Vec<PromotionBody>>, Error> {
    info!("Request for Promotion list");
    let promotions = match query.into_inner().into_filter()? {
        PromotionFilter::All => manager::get_promotions(&**db).await?,
        PromotionFilter::Name(name) => manager::get_promotions_by_name(&**db, &name).await?,
        PromotionFilter::Category(category) => {
            manager::get_promotions_by_category(&**db, &category).await?
        }
        PromotionFilter::Available(available) => {
            manager::get_promotions_by_availability(&**db, available).await?
        }
        PromotionFilter::Promotype(promotype) => {
            manager::get_promotions_by_promotype(&**db, promotype).await?
        }
    };

    let body = promotions.into_iter().map(PromotionBody::render).collect();

    Ok(Json(body))
}

#[tracing::instrument(skip(db, req))]
pub async fn create_promotion(
    req: HttpRequest,
    db: Data<dyn Database>,
    body: Json<Value>,
) -> Result<HttpResponse, Error> {
    info!("Request to create a promotion");
    let mut promotion = Promotion::new();
    promotion.populate(&body)?;

    let promotion = manager::create_promotion(&**db, promotion).await?;
    let promotion_id = promotion
        .id
        .ok_or_else(|| Error::ExistentialState("created promotion has no id".into()))?;
    let location = req
        .url_for("get_promotion_by_id", [promotion_id.to_string()])
        .map_err(|err| Error::ExistentialState(err.to_string()))?;

    info!("Promotion with ID [{}] created.", promotion_id);
    Ok(HttpResponse::Created()
        .insert_header((LOCATION, location.as_str()))
        .json(PromotionBody::render(promotion)))
}

#[tracing::instrument(skip(db))]
pub async fn get_promotion_by_id(
    db: Data<dyn Database>,
    params: Path<PromotionId>,
) -> Result<Json<PromotionBody>, Error> {
    let promotion_id = params.into_inner();
    info!("Request for promotion with id: {}", promotion_id);

    let promotion = manager::expect_promotion_by_id(&**db, promotion_id).await?;

    Ok(Json(PromotionBody::render(promotion)))
}

#[tracing::instrument(skip(db))]
pub async fn update_promotion(
    db: Data<dyn Database>,
    params: Path<PromotionId>,
    body: Json<Value>,
) -> Result<Json<PromotionBody>, Error> {
    let promotion_id = params.into_inner();
    info!("Request to update promotion with id: {}", promotion_id);

    let mut promotion = manager::expect_promotion_by_id(&**db, promotion_id).await?;
    promotion.populate(&body)?;
    promotion.id = Some(promotion_id);

    let promotion = manager::update_promotion(&**db, promotion).await?;

    info!("Promotion with ID [{}] updated.", promotion_id);
    Ok(Json(PromotionBody::render(promotion)))
}

#[tracing::instrument(skip(db))]
pub async fn delete_promotion(
    db: Data<dyn Database>,
    params: Path<PromotionId>,
) -> Result<HttpResponse, Error> {
    let promotion_id = params.into_inner();
    info!("Request to delete promotion with id: {}", promotion_id);

    // already gone counts as deleted
    if let Some(promotion) = manager::get_promotion_by_id(&**db, promotion_id).await? {
        manager::delete_promotion(&**db, &promotion).await?;
        info!("Promotion with id '{}' deleted.", promotion_id);
    }

    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(skip(db))]
pub async fn activate_promotion(
    db: Data<dyn Database>,
    params: Path<PromotionId>,
) -> Result<Json<PromotionBody>, Error> {
    let promotion_id = params.into_inner();
    info!("Request to activate promotion with id: {}", promotion_id);

    let promotion = manager::set_promotion_availability(&**db, promotion_id, true).await?;

    Ok(Json(PromotionBody::render(promotion)))
}

#[tracing::instrument(skip(db))]
pub async fn deactivate_promotion(
    db: Data<dyn Database>,
    params: Path<PromotionId>,
) -> Result<Json<PromotionBody>, Error> {
    let promotion_id = params.into_inner();
    info!("Request to deactivate promotion with id: {}", promotion_id);

    let promotion = manager::set_promotion_availability(&**db, promotion_id, false).await?;

    Ok(Json(PromotionBody::render(promotion)))
}
