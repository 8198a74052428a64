use actix_web::{web, HttpResponse};

mod get;
mod patch;
mod post;

pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/notifications")
            .route(web::get().to(get::notifications))
            .route(web::post().to(post::notification))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    )
    .service(
        web::resource("/notifications/{id}")
            .route(web::patch().to(patch::notification))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
}
