//! The `docs` workflow: open the Laravel documentation in the browser

use anyhow::Result;

const DOCS_BASE: &str = "https://laravel.com/docs/";

/// Map the optional version argument onto a documentation URL. Old major
/// versions point at their final minor release.
pub fn docs_url(version: Option<&str>) -> String {
    let mut url = String::from(DOCS_BASE);
    if let Some(version) = version {
        match version {
            "4" => url.push_str("4.2"),
            "5" => url.push_str("5.8"),
            "6" => url.push_str("6.x"),
            "7" => url.push_str("7.x"),
            other => url.push_str(other),
        }
    }
    url
}

pub fn run(version: Option<&str>) -> Result<i32> {
    let url = docs_url(version);
    cliclack::log::info(format!("Opening the Laravel docs: {}", url))?;
    open::that(&url)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_majors_map_to_their_last_minor() {
        assert_eq!(docs_url(Some("4")), "https://laravel.com/docs/4.2");
        assert_eq!(docs_url(Some("5")), "https://laravel.com/docs/5.8");
        assert_eq!(docs_url(Some("6")), "https://laravel.com/docs/6.x");
        assert_eq!(docs_url(Some("7")), "https://laravel.com/docs/7.x");
    }

    #[test]
    fn other_versions_pass_through() {
        assert_eq!(docs_url(Some("11.x")), "https://laravel.com/docs/11.x");
        assert_eq!(docs_url(None), "https://laravel.com/docs/");
    }
}
