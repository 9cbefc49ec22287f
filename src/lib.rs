use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::middleware::{from_fn, NormalizePath};
use actix_web::web::{self, Data, JsonConfig, PathConfig, QueryConfig, ServiceConfig};
use actix_web::{App, HttpResponse, HttpServer, ResponseError};
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod health;
pub mod promotion;

use promotion::endpoints;

pub use config::Config;
pub use database::{Database, MemoryDatabase, MongoDatabase};
pub use error::Error;
pub use promotion::{PromotionBody, PromotionId, Promotype};

/// Registers every route of the service along with its shared state.
pub fn configure(config: Config, db: Data<dyn Database>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
            // format json errors with custom format
            Error::from(err).into()
        }))
        .app_data(PathConfig::default().error_handler(|err, _req| {
            // format path errors with custom format
            Error::InvalidPath(err).into()
        }))
        .app_data(QueryConfig::default().error_handler(|err, _req| {
            // format query errors with custom format
            Error::InvalidQuery(err).into()
        }))
        .app_data(Data::new(config))
        .app_data(db)
        .service(
            web::resource("/")
                .route(web::get().to(health::index))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/health")
                .route(web::get().to(health::health))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::scope("/promotions")
                .wrap(from_fn(auth::require_api_key))
                .service(
                    web::resource("")
                        .route(web::get().to(endpoints::get_promotions))
                        .route(web::post().to(endpoints::create_promotion))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/{promotion_id}")
                        .name("get_promotion_by_id")
                        .route(web::get().to(endpoints::get_promotion_by_id))
                        .route(web::put().to(endpoints::update_promotion))
                        .route(web::delete().to(endpoints::delete_promotion))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/{promotion_id}/activate")
                        .route(web::put().to(endpoints::activate_promotion))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/{promotion_id}/deactivate")
                        .route(web::put().to(endpoints::deactivate_promotion))
                        .default_service(web::to(method_not_allowed)),
                ),
        )
        .default_service(web::to(path_not_found));
    }
}

// known path, unsupported method
async fn method_not_allowed() -> HttpResponse {
    Error::MethodNotAllowed.error_response()
}

async fn path_not_found() -> HttpResponse {
    Error::PathNotFound.error_response()
}

/// Opens the store named by the configuration.
pub async fn connect(config: &Config) -> Result<Data<dyn Database>, Error> {
    let db: Arc<dyn Database> = if config.uses_memory_store() {
        info!("using in-memory store");
        Arc::new(MemoryDatabase::new())
    } else {
        Arc::new(MongoDatabase::connect(&config.database_uri, &config.database_name).await?)
    };

    Ok(Data::from(db))
}

/// Builds the http server on an already bound listener.
pub fn serve(
    listener: TcpListener,
    config: Config,
    db: Data<dyn Database>,
) -> Result<Server, Error> {
    if config.api_key.is_none() {
        warn!("API_KEY is not set, all mutating requests will be rejected");
    }
    info!("listening on {}", listener.local_addr()?);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure(config.clone(), db.clone()))
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub async fn run(config: Config) -> Result<(), Error> {
    let db = connect(&config).await?;
    let listener = TcpListener::bind(&config.bind_address)?;

    serve(listener, config, db)?.await?;

    Ok(())
}
