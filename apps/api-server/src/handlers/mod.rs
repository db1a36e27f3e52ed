//! HTTP handlers and route configuration.

/// Build an initialized test service over the full route table.
#[cfg(test)]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .app_data(crate::middleware::error::json_config())
                .configure(crate::handlers::configure_routes),
        )
        .await
    };
}

mod auth;
mod health;
mod posts;
mod visitors;

use actix_web::web;

use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/admin")
                    .route("/login", web::post().to(auth::login))
                    .route("/posts", web::get().to(posts::list_all_posts)),
            )
            .service(
                web::resource("/posts")
                    .route(web::get().to(posts::list_posts))
                    .route(web::post().to(posts::create_post)),
            )
            .service(
                web::resource("/posts/{id}")
                    .route(web::get().to(posts::get_post))
                    .route(web::put().to(posts::update_post))
                    .route(web::delete().to(posts::delete_post)),
            )
            .service(
                web::resource("/visitors")
                    .wrap(RateLimitMiddleware)
                    .route(web::get().to(visitors::list_visitors))
                    .route(web::post().to(visitors::register_visitor)),
            ),
    );
}
