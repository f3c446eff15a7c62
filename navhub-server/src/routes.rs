use actix_cors::Cors;
use actix_web::{HttpRequest, HttpResponse, http::header::HeaderMap, web};
use navhub_weather::{ClientAddress, WeatherLookup};
use serde_json::json;
use tracing::info;

/// Mount `/api/weather` (CORS-enabled) and `/health`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(api_cors())
            .route("/weather", web::get().to(weather)),
    )
    .route("/health", web::get().to(health));
}

// Link page may be served from another origin.
fn api_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET"])
        .allow_any_header()
        .max_age(3600)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Always answers 200; failures are reported in the body with `success: false`.
pub async fn weather(req: HttpRequest, lookup: web::Data<WeatherLookup>) -> HttpResponse {
    let headers = req.headers();
    let address = ClientAddress::from_headers(
        header_str(headers, ClientAddress::FORWARDED_FOR),
        header_str(headers, ClientAddress::REAL_IP),
    );
    info!(%address, "Weather requested");

    let envelope = lookup.lookup(&address).await;
    HttpResponse::Ok().json(envelope)
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use navhub_weather::{
        ForecastProvider, GeocodingProvider, GeolocationProvider, LookupError,
        model::{ForecastSnapshot, GeoLocation, Place},
    };
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct RecordingGeolocation {
        fail: bool,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GeolocationProvider for RecordingGeolocation {
        async fn locate(&self, address: &ClientAddress) -> Result<GeoLocation, LookupError> {
            self.seen.lock().expect("lock").push(address.to_string());
            if self.fail {
                return Err(LookupError::geolocation(Some("reserved range".into())));
            }
            Ok(GeoLocation {
                country: "中国".into(),
                region_name: "天津市".into(),
                city: "和平区".into(),
            })
        }
    }

    #[derive(Debug)]
    struct FixedGeocoding;

    #[async_trait]
    impl GeocodingProvider for FixedGeocoding {
        async fn search(&self, name: &str) -> Result<Option<Place>, LookupError> {
            Ok(Some(Place {
                latitude: 39.12,
                longitude: 117.2,
                name: name.to_string(),
            }))
        }
    }

    #[derive(Debug)]
    struct FixedForecast;

    #[async_trait]
    impl ForecastProvider for FixedForecast {
        async fn forecast(&self, _place: &Place) -> Result<ForecastSnapshot, LookupError> {
            Ok(ForecastSnapshot {
                temperature: 17.5,
                weather_code: 3,
                wind_speed: 4.49,
                max_temp: 20.1,
                min_temp: 9.9,
                daily_weather_code: 61,
            })
        }
    }

    fn lookup_with(geolocation: Arc<RecordingGeolocation>) -> web::Data<WeatherLookup> {
        web::Data::new(WeatherLookup::new(
            geolocation,
            Arc::new(FixedGeocoding),
            Arc::new(FixedForecast),
        ))
    }

    #[actix_web::test]
    async fn weather_uses_first_forwarded_address() {
        let geolocation = Arc::new(RecordingGeolocation::default());
        let app = test::init_service(
            App::new()
                .app_data(lookup_with(geolocation.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/weather")
            .insert_header(("x-forwarded-for", " 203.0.113.7 , 10.0.0.1"))
            .insert_header(("x-real-ip", "10.0.0.1"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(*geolocation.seen.lock().expect("lock"), ["203.0.113.7"]);
        assert_eq!(body["success"], true);
        assert_eq!(body["location"]["city"], "和平区");
        assert_eq!(body["weather"]["current"]["temperature"], 18);
        assert_eq!(body["weather"]["current"]["wind_speed"], 4);
        assert_eq!(body["weather"]["current"]["weather_text"], "阴天");
        assert_eq!(body["weather"]["today"]["max_temp"], 20);
        assert_eq!(body["weather"]["today"]["min_temp"], 10);
        assert_eq!(body["weather"]["today"]["weather_text"], "小雨");
    }

    #[actix_web::test]
    async fn weather_falls_back_to_real_ip_then_unknown() {
        let geolocation = Arc::new(RecordingGeolocation::default());
        let app = test::init_service(
            App::new()
                .app_data(lookup_with(geolocation.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/weather")
            .insert_header(("x-real-ip", "192.0.2.44"))
            .to_request();
        let _: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get().uri("/api/weather").to_request();
        let _: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(*geolocation.seen.lock().expect("lock"), ["192.0.2.44", "unknown"]);
    }

    #[actix_web::test]
    async fn weather_failure_is_still_http_ok() {
        let geolocation = Arc::new(RecordingGeolocation {
            fail: true,
            ..Default::default()
        });
        let app = test::init_service(
            App::new()
                .app_data(lookup_with(geolocation))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/weather").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "IP定位失败: reserved range");
        assert_eq!(body["fallback"]["city"], "Tianjin");
        assert_eq!(body["fallback"]["temperature"], 18);
        assert_eq!(body["fallback"]["weather_text"], "晴朗");
        assert_eq!(body["fallback"]["hint"], "已使用默认天气数据");
    }

    #[actix_web::test]
    async fn weather_allows_cross_origin_requests() {
        let app = test::init_service(
            App::new()
                .app_data(lookup_with(Arc::default()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/weather")
            .insert_header(("origin", "https://nav.example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.headers().contains_key("access-control-allow-origin"));
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let app = test::init_service(App::new().configure(configure)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, json!({ "status": "ok" }));
    }
}
