use actix_web::{web, HttpResponse};

mod get;
mod patch;
mod post;

pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users")
            .route(web::get().to(get::users))
            .route(web::post().to(post::user))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    )
    .service(
        web::resource("/users/{user_id}")
            .route(web::get().to(get::user))
            .route(web::patch().to(patch::user))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
}
