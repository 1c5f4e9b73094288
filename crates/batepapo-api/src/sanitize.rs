use std::collections::HashSet;
use std::sync::LazyLock;

static STRIPPER: LazyLock<ammonia::Builder<'static>> = LazyLock::new(|| {
    let mut builder = ammonia::Builder::empty();
    builder.clean_content_tags(HashSet::from(["script", "style"]));
    builder
});

/// Strips all HTML markup from user input and trims surrounding whitespace.
///
/// Text content of ordinary tags is kept (`<b>Bob</b>` becomes `Bob`); script and
/// style bodies are dropped. The cleaner re-escapes text for HTML output, so the
/// handful of entities it emits are decoded back: stored values are plain text.
pub fn sanitize(input: &str) -> String {
    let cleaned = STRIPPER.clean(input).to_string();
    cleaned
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
