use actix_web::{web, HttpResponse};

mod get;
mod patch;
mod post;

pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/support/tickets")
            .route(web::get().to(get::tickets))
            .route(web::post().to(post::ticket))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    )
    .service(
        web::resource("/support/tickets/{id}")
            .route(web::get().to(get::ticket))
            .route(web::patch().to(patch::ticket))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    )
    .service(
        web::resource("/support/tickets/{id}/messages")
            .route(web::post().to(post::ticket_message))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
}
