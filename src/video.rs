use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VideoProvider {
    Youtube,
    Vimeo,
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSource {
    pub provider: VideoProvider,
    pub embed_url: String,
}

/// Work out how a video URL is played. Returns `None` for anything that is not http(s).
pub fn resolve(url: &str) -> Option<VideoSource> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
    let host = host.trim_start_matches("www.").trim_start_matches("m.");
    if host.is_empty() {
        return None;
    }

    let source = match host {
        "youtube.com" => youtube_id(path).map(youtube),
        "youtu.be" => first_segment(path).map(youtube),
        "vimeo.com" => first_segment(path).filter(|id| is_numeric(id)).map(vimeo),
        "player.vimeo.com" => path
            .strip_prefix("video/")
            .and_then(first_segment)
            .filter(|id| is_numeric(id))
            .map(vimeo),
        _ => None,
    };

    Some(source.unwrap_or_else(|| VideoSource {
        provider: VideoProvider::Direct,
        embed_url: url.to_string(),
    }))
}

fn youtube_id(path: &str) -> Option<&str> {
    let (path, query) = path.split_once('?').unwrap_or((path, ""));
    if path == "watch" {
        return query
            .split('&')
            .find_map(|pair| pair.strip_prefix("v="))
            .filter(|id| !id.is_empty());
    }
    ["embed/", "shorts/", "live/"]
        .iter()
        .find_map(|prefix| path.strip_prefix(prefix))
        .and_then(first_segment)
}

fn first_segment(path: &str) -> Option<&str> {
    path.split(['/', '?', '#'])
        .next()
        .filter(|segment| !segment.is_empty())
}

fn is_numeric(id: &str) -> bool {
    id.bytes().all(|b| b.is_ascii_digit())
}

fn youtube(id: &str) -> VideoSource {
    VideoSource {
        provider: VideoProvider::Youtube,
        embed_url: format!("https://www.youtube.com/embed/{id}"),
    }
}

fn vimeo(id: &str) -> VideoSource {
    VideoSource {
        provider: VideoProvider::Vimeo,
        embed_url: format!("https://player.vimeo.com/video/{id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_variants_share_an_embed_url() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=42",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://m.youtube.com/shorts/dQw4w9WgXcQ",
        ] {
            let source = resolve(url).expect("resolved");
            assert_eq!(source.provider, VideoProvider::Youtube, "{url}");
            assert_eq!(source.embed_url, "https://www.youtube.com/embed/dQw4w9WgXcQ");
        }
    }

    #[test]
    fn vimeo_links_use_the_player() {
        let source = resolve("https://vimeo.com/76979871").unwrap();
        assert_eq!(source.provider, VideoProvider::Vimeo);
        assert_eq!(source.embed_url, "https://player.vimeo.com/video/76979871");

        let source = resolve("https://player.vimeo.com/video/76979871?h=abc").unwrap();
        assert_eq!(source.embed_url, "https://player.vimeo.com/video/76979871");
    }

    #[test]
    fn other_http_urls_play_directly() {
        let source = resolve("https://cdn.example.com/lesson-1.mp4").unwrap();
        assert_eq!(source.provider, VideoProvider::Direct);
        assert_eq!(source.embed_url, "https://cdn.example.com/lesson-1.mp4");

        // a youtube page that is not a video
        let source = resolve("https://www.youtube.com/@channel").unwrap();
        assert_eq!(source.provider, VideoProvider::Direct);
    }

    #[test]
    fn non_http_urls_are_rejected() {
        assert_eq!(resolve("ftp://example.com/a.mp4"), None);
        assert_eq!(resolve("javascript:alert(1)"), None);
        assert_eq!(resolve("https://"), None);
    }
}
