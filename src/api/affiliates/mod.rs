use actix_web::{web, HttpResponse};

mod get;
mod post;

pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/affiliates")
            .route(web::post().to(post::affiliate))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    )
    .service(
        web::resource("/affiliates/track-referral")
            .route(web::post().to(post::track_referral))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    )
    .service(
        web::resource("/affiliates/record-purchase")
            .route(web::post().to(post::record_purchase))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    )
    .service(
        web::resource("/affiliates/request-payout")
            .route(web::post().to(post::request_payout))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    )
    .service(
        web::resource("/affiliates/{user_id}")
            .route(web::get().to(get::affiliate))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    )
    .service(
        web::resource("/affiliates/{user_id}/referrals")
            .route(web::get().to(get::referrals))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    )
    .service(
        web::resource("/affiliates/{user_id}/payouts")
            .route(web::get().to(get::payouts))
            .route(web::head().to(|| HttpResponse::MethodNotAllowed())),
    );
}
