use actix_web::{web, HttpResponse};

mod get;
mod patch;
mod post;

pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/accounts")
            .route(web::get().to(get::accounts))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
    cfg.service(
        web::resource("/accounts/assign-credentials")
            .route(web::post().to(post::assign_credentials))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
    cfg.service(
        web::resource("/accounts/violations/{id}")
            .route(web::patch().to(patch::resolve_violation))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
    cfg.service(
        web::resource("/accounts/{challenge_id}")
            .route(web::get().to(get::account))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
    cfg.service(
        web::resource("/accounts/{challenge_id}/breach")
            .route(web::post().to(post::breach))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
    cfg.service(
        web::resource("/accounts/{challenge_id}/snapshots")
            .route(web::get().to(get::snapshots))
            .route(web::post().to(post::ingest_snapshot))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
    cfg.service(
        web::resource("/accounts/{challenge_id}/violations")
            .route(web::get().to(get::violations))
            .route(web::post().to(post::ingest_violation))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
}
