//! HTTP routes for the prediction service.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, ContentType};
use actix_web::http::Method;
use actix_web::middleware::{Condition, DefaultHeaders, Logger};
use actix_web::{web, App, HttpResponse, HttpServer};
use gluco_model::Forecaster;

use crate::api::{parse_readings, ApiError, PredictResponse};
use crate::config::AppConfig;

const INDEX_HTML: &str = include_str!("../static/index.html");
const SCRIPT_JS: &str = include_str!("../static/script.js");

async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}

async fn script() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(SCRIPT_JS)
}

/// Body extraction failures (size limit, broken stream) are reported as a
/// JSON 400 like every other malformed request.
async fn predict(
    forecaster: web::Data<Forecaster>,
    body: Result<web::Bytes, actix_web::Error>,
) -> Result<HttpResponse, ApiError> {
    let body = body.map_err(|e| ApiError::BadRequest(format!("Request body rejected: {e}")))?;
    let window = parse_readings(&body)?;

    let forecaster = forecaster.into_inner();
    let forecast = web::block(move || forecaster.forecast(&window))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PredictResponse {
        predicted_glucose_levels: forecast,
    }))
}

async fn preflight() -> HttpResponse {
    HttpResponse::NoContent()
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .finish()
}

/// Register the service's routes
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/static/script.js", web::get().to(script))
        .service(
            web::resource("/predict")
                .route(web::post().to(predict))
                .route(web::method(Method::OPTIONS).to(preflight)),
        );
}

/// Build the application around a loaded forecaster
pub fn build_app(
    forecaster: web::Data<Forecaster>,
    cors_allow_origin: Option<String>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let cors = DefaultHeaders::new().add((
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        cors_allow_origin.clone().unwrap_or_default(),
    ));

    App::new()
        .app_data(forecaster)
        .wrap(Condition::new(cors_allow_origin.is_some(), cors))
        .wrap(Logger::default())
        .configure(routes)
}

/// Serve until the process is signalled to stop
pub async fn run(config: &AppConfig, forecaster: Forecaster) -> std::io::Result<()> {
    tracing::info!(model = forecaster.model_name(), "Forecaster ready");

    let forecaster = web::Data::new(forecaster);
    let cors_allow_origin = config.cors_origin();

    let mut server = HttpServer::new(move || {
        build_app(forecaster.clone(), cors_allow_origin.clone())
    });
    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    let (host, port) = config.bind_addr();
    let server = server.bind((host.as_str(), port))?;
    tracing::info!("Listening on {host}:{port}");

    server.run().await
}
