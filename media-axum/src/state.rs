use std::sync::Arc;

use media_blob::MediaDelivery;

pub struct MediaAxumState {
    pub delivery: Arc<MediaDelivery>,
}

impl Clone for MediaAxumState {
    fn clone(&self) -> Self {
        Self {
            delivery: Arc::clone(&self.delivery),
        }
    }
}

impl MediaAxumState {
    pub fn new(delivery: MediaDelivery) -> Self {
        Self {
            delivery: Arc::new(delivery),
        }
    }
}
