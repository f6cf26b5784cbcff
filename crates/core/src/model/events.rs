use crate::model::catalog::ContentSource;
use crate::model::ids::ItemKey;

/// A learner picked a video item; the playback surface should start it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayVideo {
    pub source: ContentSource,
    pub title: String,
    pub key: ItemKey,
    pub thumbnail: Option<ContentSource>,
}

/// The playback surface finished a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoComplete {
    pub key: ItemKey,
}

/// Messages carried on the in-process course event channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseEvent {
    PlayVideo(PlayVideo),
    VideoComplete(VideoComplete),
}

impl CourseEvent {
    #[must_use]
    pub fn video_complete(key: ItemKey) -> Self {
        Self::VideoComplete(VideoComplete { key })
    }

    /// Catalog position the event refers to.
    #[must_use]
    pub fn key(&self) -> ItemKey {
        match self {
            CourseEvent::PlayVideo(e) => e.key,
            CourseEvent::VideoComplete(e) => e.key,
        }
    }
}
