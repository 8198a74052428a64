use actix_web::{web, HttpResponse};

mod get;

pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/health")
            .route(web::get().to(get::health))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
}
