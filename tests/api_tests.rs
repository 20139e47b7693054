use std::io::Cursor;

use pokeinfo::api::{ApiConfig, FetchError, HttpPokeClient, PokeClient};
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer) -> HttpPokeClient {
    HttpPokeClient::new(ApiConfig {
        api_base: format!("{}/api/v2", server.uri()),
        artwork_base: format!("{}/artwork", server.uri()),
    })
}

fn pikachu_json() -> serde_json::Value {
    json!({
        "id": 25,
        "name": "pikachu",
        "types": [{"slot": 1, "type": {"name": "electric", "url": ""}}],
        "abilities": [
            {"ability": {"name": "static", "url": ""}, "is_hidden": false, "slot": 1},
            {"ability": {"name": "lightning-rod", "url": ""}, "is_hidden": true, "slot": 3}
        ],
        "stats": [
            {"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": ""}},
            {"base_stat": 90, "effort": 2, "stat": {"name": "speed", "url": ""}}
        ],
        "weight": 60
    })
}

fn png_bytes() -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 128, 255, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[tokio::test]
async fn list_names_requests_limit_and_keeps_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1302,
            "results": [
                {"name": "bulbasaur", "url": ""},
                {"name": "ivysaur", "url": ""},
                {"name": "venusaur", "url": ""}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let names = client_for(&server).list_names(3).await.unwrap();
    let names: Vec<_> = names.into_iter().map(|summary| summary.name).collect();
    assert_eq!(names, vec!["bulbasaur", "ivysaur", "venusaur"]);
}

#[tokio::test]
async fn list_names_reports_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).list_names(100).await.unwrap_err();
    assert_eq!(err, FetchError::Http { status: 500 });
}

#[tokio::test]
async fn details_lowercase_the_requested_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/pikachu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pikachu_json()))
        .expect(1)
        .mount(&server)
        .await;

    let details = client_for(&server).get_details("  PIKACHU ").await.unwrap();
    assert_eq!(details.id, 25);
    assert_eq!(details.types, vec!["electric"]);
    assert_eq!(details.abilities, vec!["static", "lightning-rod"]);
    assert_eq!(details.stats.len(), 2);
    assert_eq!(details.stats[1].base_value, 90);
}

#[tokio::test]
async fn unknown_name_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/missingno"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_details("MissingNo").await.unwrap_err();
    assert_eq!(
        err,
        FetchError::NotFound {
            name: "missingno".into()
        }
    );
    assert_eq!(err.to_string(), "Error: 404 (Missingno not found)");
}

#[tokio::test]
async fn malformed_details_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/eevee"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\": \"oops\"}"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_details("eevee").await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn artwork_is_fetched_by_id_and_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artwork/25.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes()))
        .mount(&server)
        .await;

    let artwork = client_for(&server).resolve_artwork(25).await.unwrap();
    assert_eq!((artwork.width, artwork.height), (4, 4));
}

#[tokio::test]
async fn missing_artwork_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artwork/10001.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).resolve_artwork(10001).await.unwrap_err();
    assert!(err.reason.contains("404"));
}

#[tokio::test]
async fn undecodable_artwork_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artwork/1.png"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    assert!(client_for(&server).resolve_artwork(1).await.is_err());
}
