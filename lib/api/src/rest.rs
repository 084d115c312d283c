use crate::state::AppState;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use calorix_core::{CatalogEntry, Error, DEFAULT_QUANTITY};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PredictRequest {
    food_name: String,
    #[serde(default = "default_quantity")]
    quantity: f64,
}

fn default_quantity() -> f64 {
    DEFAULT_QUANTITY
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: AppState, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(Self::configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Register every route; shared by the server and tests
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.route("/health", web::get().to(health))
            .route("/predict", web::post().to(predict))
            .route("/train", web::post().to(train))
            .route("/foods", web::get().to(list_foods))
            .route("/foods", web::post().to(add_food))
            .route("/foods", web::put().to(replace_foods))
            .route("/foods/{id}", web::delete().to(delete_food));
    }
}

fn error_response(e: &Error) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        Error::InvalidInput(_) => HttpResponse::BadRequest().json(body),
        Error::FoodNotFound(_) => HttpResponse::NotFound().json(body),
        _ => {
            warn!("Request failed: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

async fn health(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let status = state.predictor.status();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "trained": status.trained,
        "samples": status.samples,
        "catalogSize": status.catalog_size,
    })))
}

async fn predict(
    state: web::Data<AppState>,
    req: web::Json<PredictRequest>,
) -> ActixResult<HttpResponse> {
    match state.predictor.predict(&req.food_name, req.quantity) {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn train(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    match state.retrain() {
        Ok(report) => Ok(HttpResponse::Ok().json(report)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn list_foods(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.catalog.list()))
}

async fn add_food(
    state: web::Data<AppState>,
    req: web::Json<CatalogEntry>,
) -> ActixResult<HttpResponse> {
    let entry = req.into_inner();
    match state.mutate(|catalog| catalog.insert(entry)) {
        Ok((stored, _)) => Ok(HttpResponse::Created().json(stored)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn replace_foods(
    state: web::Data<AppState>,
    req: web::Json<Vec<CatalogEntry>>,
) -> ActixResult<HttpResponse> {
    let entries = req.into_inner();
    match state.mutate(|catalog| catalog.replace_all(entries)) {
        Ok((count, report)) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "count": count,
            "trained": report.trained,
            "samples": report.samples,
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn delete_food(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let raw_id = path.into_inner();
    let id = match Uuid::parse_str(&raw_id) {
        Ok(id) => id,
        Err(_) => {
            let e = Error::InvalidInput(format!("invalid food id: {}", raw_id));
            return Ok(error_response(&e));
        }
    };

    let removed = state.mutate(|catalog| {
        if catalog.remove(&id)? {
            Ok(())
        } else {
            Err(Error::FoodNotFound(raw_id.clone()))
        }
    });

    match removed {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({ "result": true }))),
        Err(e) => Ok(error_response(&e)),
    }
}
