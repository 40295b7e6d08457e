//! Video URL normalization.
//!
//! Share links (`youtu.be/<id>`), shorts (`youtube.com/shorts/<id>`) and
//! watch pages carrying extra parameters all collapse to the canonical
//! watch URL. Anything else passes through trimmed.

use url::Url;

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Rewrite a user-supplied video link to its canonical watch URL.
///
/// Inputs outside the recognized shapes are returned trimmed but otherwise
/// unchanged. A blank input is returned as given.
pub fn normalize_video_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return raw.to_string();
    }

    parse_lenient(trimmed)
        .and_then(|url| video_id(&url))
        .map_or_else(
            || trimmed.to_string(),
            |id| format!("{WATCH_URL_PREFIX}{id}"),
        )
}

/// Parse `input`, retrying with an `https://` scheme for bare host links
/// such as `youtu.be/abc`.
fn parse_lenient(input: &str) -> Option<Url> {
    match Url::parse(input) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{input}")).ok()
        }
        Err(_) => None,
    }
}

fn video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    let path = url.path().trim_matches('/');

    let id = if host == "youtu.be" || host == "www.youtu.be" {
        path.split('/').next().map(str::to_string)
    } else if host.contains("youtube.com") {
        let from_query = url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());

        from_query.or_else(|| {
            path.strip_prefix("shorts/")
                .and_then(|rest| rest.split('/').next())
                .map(str::to_string)
        })
    } else {
        None
    };

    id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "https://www.youtube.com/watch?v=abc123";

    #[test]
    fn share_links_become_watch_urls() {
        assert_eq!(normalize_video_url("https://youtu.be/abc123"), CANONICAL);
        assert_eq!(normalize_video_url("https://www.youtu.be/abc123"), CANONICAL);
        assert_eq!(
            normalize_video_url("https://youtu.be/abc123?si=tracking"),
            CANONICAL
        );
    }

    #[test]
    fn watch_urls_drop_extra_parameters() {
        assert_eq!(
            normalize_video_url("https://www.youtube.com/watch?v=abc123&list=PL1&t=42"),
            CANONICAL
        );
        assert_eq!(
            normalize_video_url("https://m.youtube.com/watch?feature=share&v=abc123"),
            CANONICAL
        );
        assert_eq!(
            normalize_video_url("https://music.youtube.com/watch?v=abc123"),
            CANONICAL
        );
    }

    #[test]
    fn shorts_become_watch_urls() {
        assert_eq!(
            normalize_video_url("https://www.youtube.com/shorts/abc123"),
            CANONICAL
        );
        assert_eq!(
            normalize_video_url("https://youtube.com/shorts/abc123/?feature=share"),
            CANONICAL
        );
    }

    #[test]
    fn host_matching_ignores_case() {
        assert_eq!(normalize_video_url("https://YOUTU.BE/abc123"), CANONICAL);
    }

    #[test]
    fn bare_host_links_are_recognized() {
        assert_eq!(normalize_video_url("youtu.be/abc123"), CANONICAL);
        assert_eq!(
            normalize_video_url("www.youtube.com/watch?v=abc123"),
            CANONICAL
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(normalize_video_url("  https://youtu.be/abc123 \n"), CANONICAL);
    }

    #[test]
    fn unrecognized_links_pass_through_trimmed() {
        assert_eq!(
            normalize_video_url("  https://vimeo.com/12345  "),
            "https://vimeo.com/12345"
        );
        assert_eq!(
            normalize_video_url("https://www.youtube.com/channel/UC123"),
            "https://www.youtube.com/channel/UC123"
        );
        assert_eq!(normalize_video_url("not a url"), "not a url");
        assert_eq!(normalize_video_url("example.org/video"), "example.org/video");
    }

    #[test]
    fn missing_ids_pass_through() {
        assert_eq!(normalize_video_url("https://youtu.be/"), "https://youtu.be/");
        assert_eq!(
            normalize_video_url("https://www.youtube.com/watch?v="),
            "https://www.youtube.com/watch?v="
        );
        assert_eq!(
            normalize_video_url("https://www.youtube.com/shorts/"),
            "https://www.youtube.com/shorts/"
        );
    }

    #[test]
    fn blank_input_is_returned_as_given() {
        assert_eq!(normalize_video_url(""), "");
        assert_eq!(normalize_video_url("   "), "   ");
    }
}
