use actix_web::{web, HttpResponse};

mod post;

pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/email/send")
            .route(web::post().to(post::send))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
}
