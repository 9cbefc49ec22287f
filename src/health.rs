use actix_web::web::Json;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexBody {
    pub name: String,
    pub version: String,
    pub paths: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
}

#[tracing::instrument]
pub async fn index() -> Json<IndexBody> {
    Json(IndexBody {
        name: "Promotion REST API Service".into(),
        version: "1.0".into(),
        paths: "/promotions".into(),
    })
}

#[tracing::instrument]
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "OK".into(),
    })
}
