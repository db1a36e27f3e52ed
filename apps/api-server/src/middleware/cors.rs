//! CORS policy for the browser frontend.

use actix_cors::Cors;
use actix_web::http::header;

use crate::config::CorsConfig;

/// Build the CORS middleware. Credentials are always allowed; with no
/// configured origins the requesting origin is echoed back.
pub fn cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default();

    if config.allowed_origins.is_empty() {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors.allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, ResponseError, http::StatusCode, test, web};

    use super::*;

    struct Preflight {
        status: StatusCode,
        allow_origin: Option<String>,
        allow_credentials: Option<String>,
        allow_methods: Option<String>,
    }

    async fn preflight(config: CorsConfig, origin: &str) -> Preflight {
        let app = test::init_service(
            App::new()
                .wrap(cors(&config))
                .route("/api/posts", web::get().to(|| async { HttpResponse::Ok().finish() }))
                .route(
                    "/api/posts",
                    web::post().to(|| async { HttpResponse::Created().finish() }),
                ),
        )
        .await;

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/posts")
            .insert_header((header::ORIGIN, origin))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
            .to_request();

        match test::try_call_service(&app, req).await {
            Ok(resp) => {
                let get = |name| {
                    resp.headers()
                        .get(name)
                        .and_then(|v| v.to_str().ok())
                        .map(String::from)
                };
                Preflight {
                    status: resp.status(),
                    allow_origin: get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
                    allow_credentials: get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
                    allow_methods: get(header::ACCESS_CONTROL_ALLOW_METHODS),
                }
            }
            Err(err) => Preflight {
                status: err.as_response_error().status_code(),
                allow_origin: None,
                allow_credentials: None,
                allow_methods: None,
            },
        }
    }

    #[actix_web::test]
    async fn test_preflight_reflects_any_origin_with_credentials() {
        let resp = preflight(CorsConfig::default(), "http://localhost:5173").await;

        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.allow_origin.as_deref(), Some("http://localhost:5173"));
        assert_eq!(resp.allow_credentials.as_deref(), Some("true"));
        assert!(resp.allow_methods.unwrap().contains("POST"));
    }

    #[actix_web::test]
    async fn test_configured_origins_exclude_others() {
        let config = CorsConfig {
            allowed_origins: vec!["https://blog.example".to_string()],
        };

        let allowed = preflight(config.clone(), "https://blog.example").await;
        assert_eq!(allowed.status, StatusCode::OK);
        assert_eq!(allowed.allow_origin.as_deref(), Some("https://blog.example"));

        let denied = preflight(config, "https://elsewhere.example").await;
        assert!(!denied.status.is_success());
        assert!(denied.allow_origin.is_none());
    }
}
