//! Custom Askama template filters.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// The file name a visitor uploaded, recovered from a stored image URL.
///
/// Usage in templates: `{{ url|upload_name }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn upload_name(url: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(original_file_name(&url.to_string()).to_owned())
}

/// Strip the directory and the random `<32 hex>-` prefix storage adds.
fn original_file_name(url: &str) -> &str {
    let file = url.rsplit('/').next().unwrap_or(url);
    match file.split_once('-') {
        Some((prefix, name))
            if prefix.len() == 32 && prefix.bytes().all(|b| b.is_ascii_hexdigit()) =>
        {
            name
        }
        _ => file,
    }
}
