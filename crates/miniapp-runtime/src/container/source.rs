//! Container source URLs

use url::Url;

use crate::error::ContainerError;

/// Resolve `url` against `base` and append context values as query
/// parameters.
pub fn build_container_url(
    base: &str,
    url: &str,
    params: &[(String, String)],
) -> Result<String, ContainerError> {
    let invalid = |source| ContainerError::InvalidUrl {
        url: url.to_string(),
        source,
    };
    let base = Url::parse(base).map_err(invalid)?;
    let mut resolved = base.join(url).map_err(invalid)?;

    if !params.is_empty() {
        let mut query = resolved.query_pairs_mut();
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }
    Ok(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_relative_url_resolves_against_base() {
        let url = build_container_url("https://host.example/", "/apps/swap/index.html", &[]).unwrap();
        assert_eq!(url, "https://host.example/apps/swap/index.html");
    }

    #[test]
    fn test_params_are_appended_and_encoded() {
        let url = build_container_url(
            "https://host.example/",
            "https://swap.example/app?v=2",
            &params(&[("appId", "swap"), ("theme", "dark mode")]),
        )
        .unwrap();
        assert_eq!(
            url,
            "https://swap.example/app?v=2&appId=swap&theme=dark+mode"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = build_container_url("https://host.example/", "http://[::1", &[]).unwrap_err();
        assert!(matches!(err, ContainerError::InvalidUrl { .. }));
    }
}
