use actix_web::{web, HttpResponse};

mod get;
mod post;

pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/challenges")
            .route(web::get().to(get::challenges))
            .route(web::post().to(post::challenge))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
    cfg.service(
        web::resource("/challenges/types")
            .route(web::get().to(get::challenge_types))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
    cfg.service(
        web::resource("/challenges/quote")
            .route(web::get().to(get::quote))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
    cfg.service(
        web::resource("/challenges/coupons/validate")
            .route(web::post().to(post::validate_coupon))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
    cfg.service(
        web::resource("/challenges/{id}")
            .route(web::get().to(get::challenge))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
    cfg.service(
        web::resource("/challenges/{id}/phase-complete")
            .route(web::post().to(post::complete_phase))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
}
