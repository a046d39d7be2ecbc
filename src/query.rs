use crate::{ClientError, Result};

/// Trims `value`, rejecting blank input with [`ClientError::InvalidInput`].
pub(crate) fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::invalid_input(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_owned())
}

/// Appends URL-encoded `key=value` pairs to `path`.
pub(crate) fn with_query(path: &str, pairs: &[(&str, &str)]) -> String {
    let mut url = String::from(path);
    for (index, (key, value)) in pairs.iter().enumerate() {
        url.push(if index == 0 { '?' } else { '&' });
        url.push_str(&urlencoding::encode(key));
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}
