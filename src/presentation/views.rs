use askama::Template;
use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::application::render::Markup;
use crate::domain::card::ImageFormat;

pub const IMAGE_FORMAT_HEADER: HeaderName = HeaderName::from_static("x-image-format");

/// Style sheet embedded in every card.
#[derive(Template)]
#[template(path = "card/stylesheet.css", escape = "none")]
pub struct CardStylesheetTemplate<'a> {
    pub background: &'a str,
    pub radial: &'a str,
    pub primary: &'a str,
    pub secondary: &'a str,
    pub gradient_stop: u8,
    pub neutral: &'a str,
    pub font_family: &'a str,
    pub font_size: String,
    pub caption_size: String,
}

/// The full card document handed to the screenshot step.
#[derive(Template)]
#[template(path = "card/document.html")]
pub struct CardDocumentTemplate<'a> {
    pub stylesheet: &'a str,
    pub font_stylesheets: &'a [String],
    pub avatar_url: &'a str,
    pub brand_label: &'a str,
    pub brand_emphasis: &'a str,
    pub images: &'a [Markup],
    pub heading: &'a Markup,
    pub caption: Option<&'a Markup>,
}

/// Wrap a rendered card for delivery to the screenshot step.
pub fn render_card_response(html: String, format: ImageFormat) -> Response {
    let mut response = (StatusCode::OK, Html(html)).into_response();
    response.headers_mut().insert(
        IMAGE_FORMAT_HEADER,
        HeaderValue::from_static(format.as_str()),
    );
    response
}
