use crate::{ByteRange, MediaClass, RangeSpec};

/// What a single request will deliver.
///
/// Built from a parsed [`RangeSpec`], so `start <= end < size` always holds
/// for partial plans. A full plan over an empty object is the one case with
/// `content_length == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPlan {
    pub start: u64,
    /// Inclusive; meaningless when `content_length == 0`.
    pub end: u64,
    pub size: u64,
    pub content_length: u64,
    pub partial: bool,
    pub class: MediaClass,
}

impl DeliveryPlan {
    pub fn new(range: RangeSpec, size: u64, class: MediaClass) -> Self {
        match range {
            RangeSpec::Unbounded => Self {
                start: 0,
                end: size.saturating_sub(1),
                size,
                content_length: size,
                partial: false,
                class,
            },
            RangeSpec::Bounded { start, end } => {
                debug_assert!(start <= end && end < size);
                Self {
                    start,
                    end,
                    size,
                    content_length: end - start + 1,
                    partial: true,
                    class,
                }
            }
        }
    }

    /// 206 for partial plans, 200 otherwise.
    pub fn status_code(&self) -> u16 {
        if self.partial {
            206
        } else {
            200
        }
    }

    pub fn is_video(&self) -> bool {
        self.class.is_video()
    }

    /// Whether the response goes out inline with a cache directive.
    ///
    /// Partial responses are only served on the streaming path, so they
    /// share the video headers whatever the content type.
    pub fn is_streaming(&self) -> bool {
        self.partial || self.is_video()
    }

    /// Interval to request from a store with native range reads.
    pub fn byte_range(&self) -> ByteRange {
        ByteRange::new(self.start, Some(self.end))
    }

    /// `bytes {start}-{end}/{size}`, for partial plans only.
    pub fn content_range(&self) -> Option<String> {
        self.partial
            .then(|| format!("bytes {}-{}/{}", self.start, self.end, self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_covers_object() {
        let plan = DeliveryPlan::new(RangeSpec::Unbounded, 1000, MediaClass::Video);
        assert_eq!((plan.start, plan.end, plan.content_length), (0, 999, 1000));
        assert_eq!(plan.status_code(), 200);
        assert_eq!(plan.content_range(), None);
        assert!(plan.is_streaming());
    }

    #[test]
    fn bounded_is_partial() {
        let plan = DeliveryPlan::new(
            RangeSpec::Bounded { start: 999, end: 999 },
            1000,
            MediaClass::Generic,
        );
        assert_eq!(plan.content_length, 1);
        assert_eq!(plan.status_code(), 206);
        assert_eq!(plan.content_range().as_deref(), Some("bytes 999-999/1000"));
        assert_eq!(plan.byte_range(), ByteRange::new(999, Some(999)));
        assert!(plan.is_streaming());
    }

    #[test]
    fn generic_full_download_is_not_streaming() {
        let plan = DeliveryPlan::new(RangeSpec::Unbounded, 10, MediaClass::Generic);
        assert!(!plan.is_streaming());
    }

    #[test]
    fn empty_object_full_plan() {
        let plan = DeliveryPlan::new(RangeSpec::Unbounded, 0, MediaClass::Generic);
        assert_eq!(plan.content_length, 0);
        assert_eq!(plan.status_code(), 200);
    }
}
