use thoughtcard::application::render::{CardRenderService, RenderPipelineConfig, RenderService};
use thoughtcard::domain::{
    card::{CardRequest, parse_card_query},
    font_size::FontSize,
    theme::{CardDesign, Theme},
};

fn render(request: &CardRequest) -> String {
    CardRenderService::default()
        .render(request)
        .expect("card renders")
}

fn section<'a>(html: &'a str, open: &str) -> &'a str {
    let start = html.find(open).expect("section present") + open.len();
    let end = start + html[start..].find("</div>").expect("section closes");
    &html[start..end]
}

#[test]
fn identical_requests_render_identical_documents() {
    let request = CardRequest::new("Hello **world** 🎉")
        .with_theme(Theme::Dark)
        .with_markdown(true)
        .with_images(["https://a.test/a.svg", "https://b.test/b.svg"])
        .with_caption("launch day");

    assert_eq!(render(&request), render(&request));
}

#[test]
fn images_render_in_order_with_separators() {
    let request = CardRequest::new("Stack").with_images([
        "https://a.test/first.svg",
        "https://b.test/second.svg",
        "https://c.test/third.svg",
    ]);
    let html = render(&request);

    assert_eq!(html.matches(r#"<img class="logo""#).count(), 3);
    assert_eq!(html.matches(r#"<div class="plus">+</div>"#).count(), 2);

    let first = html.find("first.svg").expect("first image");
    let second = html.find("second.svg").expect("second image");
    let third = html.find("third.svg").expect("third image");
    assert!(first < second && second < third);
}

#[test]
fn no_images_omits_the_wrapper() {
    let html = render(&CardRequest::new("Just text"));
    assert!(!html.contains(r#"class="img-wrapper""#));
    assert!(!html.contains(r#"class="logo""#));
    assert!(!html.contains(r#"class="plus""#));
}

#[test]
fn single_image_has_no_separator() {
    let html = render(&CardRequest::new("Solo").with_images(["https://a.test/a.svg"]));
    assert_eq!(html.matches(r#"<img class="logo""#).count(), 1);
    assert!(!html.contains(r#"class="plus""#));
}

#[test]
fn dark_theme_swaps_the_palette() {
    let light = render(&CardRequest::new("Hi"));
    let dark = render(&CardRequest::new("Hi").with_theme(Theme::Dark));

    assert!(light.contains("background: #FFFFFF;"));
    assert!(!light.contains("#15283B"));
    assert!(dark.contains("background: #15283B;"));
    assert!(!dark.contains("#FFFFFF"));
    assert!(dark.contains("#FBB13C"));
}

#[test]
fn caption_block_follows_caption_presence() {
    let without = render(&CardRequest::new("Hi"));
    assert!(!without.contains(r#"<div class="caption">"#));

    let with = render(&CardRequest::new("Hi").with_caption("v1.0"));
    assert_eq!(with.matches(r#"<div class="caption">"#).count(), 1);
    assert_eq!(section(&with, r#"<div class="caption">"#), "v1.0");
}

#[test]
fn literal_heading_cannot_inject_markup() {
    let html = render(&CardRequest::new(r#"<script>alert("pwned")</script>"#));
    let heading = section(&html, r#"<div class="heading">"#);
    assert!(!heading.contains('<'));
    assert!(!html.contains("<script>"));
}

#[test]
fn image_urls_cannot_escape_the_src_attribute() {
    let html = render(&CardRequest::new("Hi").with_images([r#"x.png" onerror="alert(1)"#]));
    assert!(!html.contains(r#"onerror="alert"#));
    assert!(!html.contains(r#"x.png""#));
}

#[test]
fn captions_are_escaped() {
    let html = render(&CardRequest::new("Hi").with_caption("<b>bold</b>"));
    let caption = section(&html, r#"<div class="caption">"#);
    assert!(caption.starts_with("&lt;b&gt;bold"));
}

#[test]
fn markdown_heading_renders_formatting() {
    let html = render(&CardRequest::new("**Bold** and _soft_").with_markdown(true));
    let heading = section(&html, r#"<div class="heading">"#);
    assert_eq!(heading, "<p><strong>Bold</strong> and <em>soft</em></p>\n");
}

#[test]
fn font_size_and_caption_size_share_a_unit() {
    let size: FontSize = "4rem".parse().expect("valid size");
    let html = render(&CardRequest::new("Hi").with_font_size(size));
    assert!(html.contains("font-size: 4rem;"));
    assert!(html.contains("font-size: 1.5rem;"));
}

#[test]
fn default_font_size_yields_default_caption_size() {
    let html = render(&CardRequest::new("Hi"));
    assert!(html.contains("font-size: 96px;"));
    assert!(html.contains("font-size: 36px;"));
}

#[test]
fn emoji_in_heading_become_glyph_images() {
    let html = render(&CardRequest::new("Ship it 🚀"));
    let heading = section(&html, r#"<div class="heading">"#);
    assert!(heading.contains(r#"class="emoji""#));
    assert!(heading.contains(
        "https://cdn.jsdelivr.net/gh/twitter/twemoji@14.0.2/assets/svg/1f680.svg"
    ));
}

#[test]
fn brand_header_uses_the_configured_design() {
    let design = CardDesign {
        brand_label: "<Acme> |".to_string(),
        brand_emphasis: "updates.".to_string(),
        avatar_url: "https://acme.test/avatar.png".to_string(),
        font_stylesheets: vec!["https://fonts.test/nunito.css".to_string()],
        ..CardDesign::default()
    };
    let service = CardRenderService::new(RenderPipelineConfig {
        sanitize_markdown: false,
        design,
    });
    let html = service
        .render(&CardRequest::new("Hi"))
        .expect("card renders");

    assert!(html.contains("&lt;Acme&gt; |"));
    assert!(html.contains(r#"<span class="brand--emphasis">updates.</span>"#));
    assert!(html.contains(r#"src="https://acme.test/avatar.png""#));
    assert!(html.contains(r#"<link rel="stylesheet" href="https://fonts.test/nunito.css">"#));
}

#[test]
fn stock_design_reproduces_the_default_brand() {
    let html = render(&CardRequest::new("Hi"));
    assert!(html.contains("<title>Generated Image</title>"));
    assert!(html.contains("@saharshy29 |"));
    assert!(html.contains(r#"<span class="brand--emphasis">thoughts.</span>"#));
    assert!(!html.contains("<link rel=\"stylesheet\""));
}

#[test]
fn parsed_url_renders_end_to_end() {
    let parsed = parse_card_query(
        "/Hello World.jpeg",
        Some("theme=dark&md=1&fontSize=100px&images=https%3A%2F%2Fa.test%2Fa.svg&caption=undefined"),
    )
    .expect("query parses");

    assert_eq!(parsed.request.theme, Theme::Dark);
    assert!(parsed.request.markdown);
    assert_eq!(parsed.request.caption, None);

    let html = render(&parsed.request);
    assert!(html.contains("font-size: 100px;"));
    assert!(html.contains("font-size: 37.5px;"));
    assert!(html.contains("<p>Hello World</p>"));
    assert!(!html.contains(r#"<div class="caption">"#));
    assert_eq!(html.matches(r#"<img class="logo""#).count(), 1);
}

#[test]
fn plain_hello_card_at_forty_pixels() {
    let size: FontSize = "40px".parse().expect("valid size");
    let html = render(&CardRequest::new("Hello").with_font_size(size));

    assert!(html.contains("#FFFFFF"));
    assert_eq!(section(&html, r#"<div class="heading">"#), "Hello");
    assert!(html.contains("font-size: 40px;"));
    assert!(html.contains("font-size: 15px;"));
    assert!(!html.contains(r#"class="img-wrapper""#));
    assert!(!html.contains(r#"<div class="caption">"#));
}

#[test]
fn empty_caption_still_renders_its_block() {
    let html = render(&CardRequest::new("Hi").with_caption(""));
    assert_eq!(section(&html, r#"<div class="caption">"#), "");
}

#[test]
fn legal_marks_in_captions_stay_text() {
    let html = render(&CardRequest::new("Hi").with_caption("\u{00A9} 2024 Acme\u{2122}"));
    let caption = section(&html, r#"<div class="caption">"#);
    assert!(!caption.contains(r#"class="emoji""#), "{caption}");
    assert!(caption.contains('\u{00A9}'));
    assert!(caption.contains('\u{2122}'));
}
