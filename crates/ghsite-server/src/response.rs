use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, ContentType};

use ghsite::RawFile;

const IMMUTABLE: &str = "public, max-age=31536000, immutable";

pub fn html(body: String, max_age: u64) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .insert_header((CACHE_CONTROL, format!("public, max-age={max_age}")))
        .body(body)
}

/// A bundled stylesheet, cacheable forever since its URL is versioned.
pub fn stylesheet(content_type: &'static str, source: &'static str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((CACHE_CONTROL, IMMUTABLE))
        .body(source)
}

pub fn text(status: StatusCode, body: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::plaintext())
        .body(body.into())
}

/// Pass a repository file through untouched.
pub fn raw(file: RawFile, path: &str, max_age: u64) -> HttpResponse {
    let content_type = content_type_for(path)
        .map(str::to_owned)
        .or(file.content_type)
        .unwrap_or_else(|| "application/octet-stream".to_owned());

    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((CACHE_CONTROL, format!("public, max-age={max_age}")))
        .body(file.bytes)
}

fn content_type_for(path: &str) -> Option<&'static str> {
    let (_, ext) = path.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
