use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, web};

use crate::dto::api::{ApiResponse, StatusUpdated};
use crate::dto::query::SerializedQuery;
use crate::forms::payouts::{BulkStatusForm, RequestPayoutForm};
use crate::repository::InMemoryLedger;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::payouts as payout_service;

/// Paginated payouts list consumed by the list controller.
#[get("/v1/payouts")]
pub async fn api_v1_payouts(req: HttpRequest, repo: web::Data<InMemoryLedger>) -> impl Responder {
    let params = match SerializedQuery::from_query_string(req.query_string()) {
        Ok(params) => params,
        Err(err) => return error_response(&ServiceError::from(err)),
    };

    match payout_service::list_payouts(repo.get_ref(), &params) {
        Ok(page) => HttpResponse::Ok().json(ApiResponse::ok(page)),
        Err(err) => error_response(&err),
    }
}

#[get("/v1/sellers/{seller_id}/balance")]
pub async fn api_v1_seller_balance(
    seller_id: web::Path<i32>,
    repo: web::Data<InMemoryLedger>,
) -> impl Responder {
    match payout_service::get_balance(repo.get_ref(), seller_id.into_inner()) {
        Ok(balance) => HttpResponse::Ok().json(ApiResponse::ok(balance)),
        Err(err) => error_response(&err),
    }
}

#[post("/v1/payouts")]
pub async fn api_v1_request_payout(
    repo: web::Data<InMemoryLedger>,
    web::Json(form): web::Json<RequestPayoutForm>,
) -> impl Responder {
    match payout_service::request_payout(repo.get_ref(), form) {
        Ok(payout) => {
            log::info!("Payout {} requested by seller {}", payout.id, payout.seller_id);
            HttpResponse::Created().json(ApiResponse::ok(payout))
        }
        Err(err) => error_response(&err),
    }
}

#[post("/v1/payouts/status")]
pub async fn api_v1_payouts_status(
    repo: web::Data<InMemoryLedger>,
    web::Json(form): web::Json<BulkStatusForm>,
) -> impl Responder {
    match payout_service::update_payout_status(repo.get_ref(), form) {
        Ok(updated) => HttpResponse::Ok().json(ApiResponse::ok(StatusUpdated { updated })),
        Err(err) => error_response(&err),
    }
}

#[delete("/v1/payouts/{payout_id}")]
pub async fn api_v1_delete_payout(
    payout_id: web::Path<i32>,
    repo: web::Data<InMemoryLedger>,
) -> impl Responder {
    match payout_service::delete_payout(repo.get_ref(), payout_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    }
}

/// Registers every payout API handler on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_v1_payouts)
        .service(api_v1_seller_balance)
        .service(api_v1_payouts_status)
        .service(api_v1_request_payout)
        .service(api_v1_delete_payout);
}
