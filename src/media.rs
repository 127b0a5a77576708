use url::Url;

use crate::content::{MediaItem, MediaKind};

/// What a stored media URL may become on screen. `render_media` is a pure
/// mapping; no retries, no caching.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaRender {
    Image { url: String, alt: String },
    Embed { src: String, title: Option<String> },
    ExternalLink { href: String, label: String },
}

/// Maps a media item to one of the three render variants, given the URL of
/// the page doing the rendering. URLs from the page's own origin are never
/// embedded (recursive app-in-app framing).
pub fn render_media(item: &MediaItem, page: &Url) -> MediaRender {
    let resolved = resolve(&item.url, page);

    match item.kind {
        MediaKind::Image => match resolved {
            Some(url) => MediaRender::Image {
                url: url.to_string(),
                alt: item.caption.clone().unwrap_or_default(),
            },
            None => fallback(item),
        },
        MediaKind::Video => {
            let safe = resolved.filter(|url| url.origin() != page.origin());
            match safe.and_then(|url| embed_src(&url)) {
                Some(src) => MediaRender::Embed {
                    src,
                    title: item.caption.clone(),
                },
                None => fallback(item),
            }
        }
    }
}

fn resolve(raw: &str, page: &Url) -> Option<Url> {
    if raw.trim().is_empty() {
        return None;
    }
    page.join(raw).ok()
}

/// Known-provider normalization, first match wins: YouTube watch/short
/// URLs, then Vimeo numeric ids.
fn embed_src(url: &Url) -> Option<String> {
    let host = url.host_str()?;

    if matches!(host, "www.youtube.com" | "youtube.com" | "m.youtube.com") {
        let id = url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())?;
        return Some(format!("https://www.youtube.com/embed/{}", id));
    }

    if host == "youtu.be" {
        let id = url.path_segments()?.find(|s| !s.is_empty())?;
        return Some(format!("https://www.youtube.com/embed/{}", id));
    }

    if matches!(host, "vimeo.com" | "www.vimeo.com") {
        let id = url.path_segments()?.find(|s| !s.is_empty())?;
        if id.chars().all(|c| c.is_ascii_digit()) {
            return Some(format!("https://player.vimeo.com/video/{}", id));
        }
    }

    None
}

fn fallback(item: &MediaItem) -> MediaRender {
    let href = if Url::parse(&item.url).is_ok() {
        item.url.clone()
    } else {
        format!("https://{}", item.url)
    };

    MediaRender::ExternalLink {
        href,
        label: item
            .caption
            .clone()
            .unwrap_or_else(|| String::from("Open media")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://app.coursebook.io/courses/42").unwrap()
    }

    fn video(url: &str) -> MediaItem {
        MediaItem {
            kind: MediaKind::Video,
            url: url.to_string(),
            caption: Some("Lecture".to_string()),
        }
    }

    #[test]
    fn youtube_watch_url_is_embedded() {
        let out = render_media(&video("https://www.youtube.com/watch?v=abc123"), &page());
        assert_eq!(
            out,
            MediaRender::Embed {
                src: "https://www.youtube.com/embed/abc123".to_string(),
                title: Some("Lecture".to_string()),
            }
        );
    }

    #[test]
    fn youtube_short_url_is_embedded() {
        let out = render_media(&video("https://youtu.be/abc123"), &page());
        assert!(
            matches!(out, MediaRender::Embed { ref src, .. } if src == "https://www.youtube.com/embed/abc123")
        );
    }

    #[test]
    fn vimeo_url_is_embedded() {
        let out = render_media(&video("https://vimeo.com/55555"), &page());
        assert!(
            matches!(out, MediaRender::Embed { ref src, .. } if src == "https://player.vimeo.com/video/55555")
        );
    }

    #[test]
    fn vimeo_non_numeric_path_falls_back() {
        let out = render_media(&video("https://vimeo.com/about"), &page());
        assert!(matches!(out, MediaRender::ExternalLink { .. }));
    }

    #[test]
    fn same_origin_video_is_never_embedded() {
        let out = render_media(
            &video("https://app.coursebook.io/media/clip.mp4"),
            &page(),
        );
        assert!(matches!(out, MediaRender::ExternalLink { .. }));
    }

    #[test]
    fn relative_url_resolves_to_page_origin_and_falls_back() {
        let out = render_media(&video("/media/clip.mp4"), &page());
        assert!(matches!(out, MediaRender::ExternalLink { .. }));
    }

    #[test]
    fn unknown_provider_falls_back_to_link() {
        let out = render_media(&video("https://example.com/talk.mp4"), &page());
        assert_eq!(
            out,
            MediaRender::ExternalLink {
                href: "https://example.com/talk.mp4".to_string(),
                label: "Lecture".to_string(),
            }
        );
    }

    #[test]
    fn empty_url_does_not_panic() {
        let out = render_media(&video(""), &page());
        assert!(matches!(out, MediaRender::ExternalLink { .. }));
    }

    #[test]
    fn schemeless_fallback_is_prefixed() {
        let item = MediaItem {
            kind: MediaKind::Video,
            url: "example.com/talk".to_string(),
            caption: None,
        };
        // "example.com/talk" joins against the page origin, so it is
        // same-origin and must come out as a link.
        let out = render_media(&item, &page());
        assert_eq!(
            out,
            MediaRender::ExternalLink {
                href: "https://example.com/talk".to_string(),
                label: "Open media".to_string(),
            }
        );
    }

    #[test]
    fn image_renders_with_caption_as_alt() {
        let item = MediaItem {
            kind: MediaKind::Image,
            url: "https://cdn.example.com/fig.png".to_string(),
            caption: Some("Figure 1".to_string()),
        };
        assert_eq!(
            render_media(&item, &page()),
            MediaRender::Image {
                url: "https://cdn.example.com/fig.png".to_string(),
                alt: "Figure 1".to_string(),
            }
        );
    }

    #[test]
    fn unparsable_image_url_falls_back() {
        let item = MediaItem {
            kind: MediaKind::Image,
            url: "   ".to_string(),
            caption: None,
        };
        assert!(matches!(
            render_media(&item, &page()),
            MediaRender::ExternalLink { .. }
        ));
    }
}
