/// How an object is handed to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaClass {
    /// Seekable stream, shown inline and cacheable.
    Video,
    /// Atomic download, served as an attachment.
    Generic,
}

impl MediaClass {
    /// Classify a declared content type. Only the `video/` prefix matters.
    pub fn of(content_type: &str) -> Self {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        let is_video = essence
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("video/"));

        if is_video {
            MediaClass::Video
        } else {
            MediaClass::Generic
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaClass::Video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_prefix() {
        assert_eq!(MediaClass::of("video/mp4"), MediaClass::Video);
        assert_eq!(MediaClass::of("video/webm; codecs=vp9"), MediaClass::Video);
        assert_eq!(MediaClass::of("Video/Quicktime"), MediaClass::Video);
    }

    #[test]
    fn everything_else_is_generic() {
        for ct in ["image/png", "application/pdf", "audio/mpeg", "", "video", "videos/mp4", "text/video/"] {
            assert_eq!(MediaClass::of(ct), MediaClass::Generic, "{ct:?}");
        }
    }
}
