use crate::{Error, GithubHandle, Result};

pub const MAX_HANDLE_LENGTH: usize = 39;

/// Checks GitHub login rules: 1 to 39 ASCII alphanumerics or hyphens, no
/// leading, trailing or doubled hyphen.
pub fn validate_handle(handle: &str) -> Result<GithubHandle> {
    let handle = handle.trim();
    if handle.is_empty() {
        return Err(Error::invalid("GitHub username must not be empty"));
    }
    if handle.len() > MAX_HANDLE_LENGTH {
        return Err(Error::invalid(format!(
            "GitHub username is longer than {MAX_HANDLE_LENGTH} characters"
        )));
    }
    if !handle
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(Error::invalid(format!(
            "GitHub username `{handle}` contains characters other than letters, digits and hyphens"
        )));
    }
    if handle.starts_with('-') || handle.ends_with('-') || handle.contains("--") {
        return Err(Error::invalid(format!(
            "GitHub username `{handle}` has a misplaced hyphen"
        )));
    }

    Ok(handle.to_string())
}

pub fn avatar_url(handle: &str) -> String {
    format!("https://ui-avatars.com/api/?name={handle}&background=random")
}

pub fn profile_url(handle: &str) -> String {
    format!("https://github.com/{handle}")
}
