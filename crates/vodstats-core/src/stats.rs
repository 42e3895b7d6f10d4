//! Reduction of a list of videos into a [`VideoStatsSummary`].

use crate::duration::parse_minutes;
use crate::{StatsError, VideoRecord, VideoStatsSummary};
use tracing::trace;

/// Summarize `videos` in a single pass.
///
/// - Durations that fail to parse count as zero minutes.
/// - The most viewed video is the first one with the strictly greatest view
///   count. If no video has a positive count, the leader stays empty with a
///   count of zero.
/// - `average_views_per_minute` is zero when the total duration is zero.
///
/// # Errors
///
/// Returns [`StatsError::NoVideos`] when `videos` is empty.
pub fn summarize(videos: &[VideoRecord]) -> Result<VideoStatsSummary, StatsError> {
    if videos.is_empty() {
        return Err(StatsError::NoVideos);
    }

    let mut total_views: u64 = 0;
    let mut total_duration_minutes = 0.0_f64;
    let mut most_viewed_title = "";
    let mut most_viewed_view_count: u64 = 0;

    for video in videos {
        total_views = total_views.saturating_add(video.view_count);

        match parse_minutes(&video.duration) {
            Some(minutes) => total_duration_minutes += minutes,
            None => trace!(
                title = %video.title,
                duration = %video.duration,
                "skipping unparsable duration"
            ),
        }

        if video.view_count > most_viewed_view_count {
            most_viewed_title = &video.title;
            most_viewed_view_count = video.view_count;
        }
    }

    let average_views = total_views as f64 / videos.len() as f64;
    let average_views_per_minute = if total_duration_minutes > 0.0 {
        total_views as f64 / total_duration_minutes
    } else {
        0.0
    };

    Ok(VideoStatsSummary {
        total_views,
        average_views,
        total_duration_minutes,
        average_views_per_minute,
        most_viewed_title: most_viewed_title.to_string(),
        most_viewed_view_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_numeric_contract() {
        let videos = vec![
            VideoRecord::new("Vid1", 100, "10m0s"),
            VideoRecord::new("Vid2", 200, "20m0s"),
        ];

        let summary = summarize(&videos).unwrap();
        assert_eq!(summary.total_views, 300);
        assert_eq!(summary.average_views, 150.0);
        assert_eq!(summary.total_duration_minutes, 30.0);
        assert_eq!(summary.average_views_per_minute, 10.0);
        assert_eq!(summary.most_viewed_title, "Vid2");
        assert_eq!(summary.most_viewed_view_count, 200);
    }

    #[test]
    fn test_summarize_first_video_wins_ties() {
        let videos = vec![
            VideoRecord::new("First", 200, "10m"),
            VideoRecord::new("Second", 200, "20m"),
        ];

        let summary = summarize(&videos).unwrap();
        assert_eq!(summary.most_viewed_title, "First");
        assert_eq!(summary.most_viewed_view_count, 200);
    }

    #[test]
    fn test_summarize_tolerates_invalid_duration() {
        let videos = vec![VideoRecord::new("BadDuration", 50, "invalid")];

        let summary = summarize(&videos).unwrap();
        assert_eq!(summary.total_views, 50);
        assert_eq!(summary.average_views, 50.0);
        assert_eq!(summary.total_duration_minutes, 0.0);
        assert_eq!(summary.average_views_per_minute, 0.0);
        assert_eq!(summary.most_viewed_title, "BadDuration");
    }

    #[test]
    fn test_summarize_mixed_valid_and_invalid_durations() {
        let videos = vec![
            VideoRecord::new("a", 30, "garbage"),
            VideoRecord::new("b", 90, "1h5m30s"),
            VideoRecord::new("c", 11, ""),
        ];

        let summary = summarize(&videos).unwrap();
        assert_eq!(summary.total_views, 131);
        assert_eq!(summary.total_duration_minutes, 65.5);
        assert_eq!(summary.average_views_per_minute, 131.0 / 65.5);
        assert_eq!(summary.most_viewed_title, "b");
    }

    #[test]
    fn test_summarize_skips_overflowing_duration() {
        let videos = vec![
            VideoRecord::new("Endless", 10, "9999999999h"),
            VideoRecord::new("Normal", 20, "10m"),
        ];

        let summary = summarize(&videos).unwrap();
        assert_eq!(summary.total_duration_minutes, 10.0);
        assert_eq!(summary.average_views_per_minute, 3.0);
    }

    #[test]
    fn test_summarize_empty_input() {
        assert_eq!(summarize(&[]), Err(StatsError::NoVideos));
    }

    #[test]
    fn test_summarize_all_zero_views_keeps_placeholder() {
        let videos = vec![
            VideoRecord::new("Quiet", 0, "5m"),
            VideoRecord::new("Quieter", 0, "5m"),
        ];

        let summary = summarize(&videos).unwrap();
        assert_eq!(summary.total_views, 0);
        assert_eq!(summary.average_views, 0.0);
        assert_eq!(summary.total_duration_minutes, 10.0);
        assert_eq!(summary.average_views_per_minute, 0.0);
        assert_eq!(summary.most_viewed_title, "");
        assert_eq!(summary.most_viewed_view_count, 0);
    }
}
