//! Synthetic word-by-word highlighting for remote playback.
//!
//! The schedule assumes an average speaking rate and runs on wall-clock time;
//! it is not synchronized to the audio position.

use std::time::Duration;

use tokio::time::{Instant, sleep_until};

use super::playback::PlaybackHandle;

/// Assumed average speaking rate of the teacher voice.
pub const WORDS_PER_SECOND: f64 = 2.5;

/// Time between two highlighted words at the given rate.
pub fn word_interval(words_per_second: f64) -> Duration {
    Duration::from_secs_f64(1.0 / words_per_second.max(0.1))
}

/// Offsets (from playback start) at which each word index becomes active.
pub fn highlight_schedule(text: &str, words_per_second: f64) -> Vec<(Duration, usize)> {
    let step = word_interval(words_per_second);
    (0..text.split_whitespace().count())
        .map(|index| (step * index as u32, index))
        .collect()
}

/// Advances the highlight through every word of `text` following
/// [`highlight_schedule`], then clears it one interval after the last word.
pub async fn run_highlight(text: &str, words_per_second: f64, handle: &PlaybackHandle) {
    let started = Instant::now();
    let schedule = highlight_schedule(text, words_per_second);
    let done = schedule
        .last()
        .map(|(offset, _)| *offset + word_interval(words_per_second));

    for (offset, index) in schedule {
        sleep_until(started + offset).await;
        handle.highlight(Some(index));
    }
    if let Some(done) = done {
        sleep_until(started + done).await;
    }
    handle.highlight(None);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::voice::PlaybackSlot;

    #[test]
    fn test_word_interval_default_rate() {
        assert_eq!(word_interval(WORDS_PER_SECOND), Duration::from_millis(400));
    }

    #[test]
    fn test_schedule_splits_on_whitespace() {
        let schedule = highlight_schedule("Hello!  What do\nyou like?", WORDS_PER_SECOND);
        assert_eq!(schedule.len(), 5);
        assert_eq!(schedule[0], (Duration::ZERO, 0));
        assert_eq!(schedule[4], (Duration::from_millis(1600), 4));
    }

    #[test]
    fn test_schedule_empty_text() {
        assert!(highlight_schedule("   ", WORDS_PER_SECOND).is_empty());
    }

    #[test]
    fn test_word_interval_guards_zero_rate() {
        assert_eq!(word_interval(0.0), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_highlight_walks_every_word() {
        let mut slot = PlaybackSlot::new();
        slot.start(|handle| async move {
            run_highlight("one two three", WORDS_PER_SECOND, &handle).await;
            std::future::pending::<anyhow::Result<()>>().await
        });
        let mut rx = slot.subscribe();

        let mut seen = Vec::new();
        while seen.len() < 4 {
            rx.changed().await.unwrap();
            seen.push(rx.borrow_and_update().highlight);
        }

        assert_eq!(seen, vec![Some(0), Some(1), Some(2), None]);
        assert!(slot.is_speaking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_highlight_follows_schedule_timing() {
        let mut slot = PlaybackSlot::new();
        let started = Instant::now();
        slot.start(|handle| async move {
            run_highlight("one two three", WORDS_PER_SECOND, &handle).await;
            std::future::pending::<anyhow::Result<()>>().await
        });
        let mut rx = slot.subscribe();

        let mut offsets = Vec::new();
        for (offset, index) in highlight_schedule("one two three", WORDS_PER_SECOND) {
            rx.wait_for(|state| state.highlight == Some(index))
                .await
                .unwrap();
            offsets.push((started.elapsed(), offset));
        }

        for (elapsed, offset) in offsets {
            assert_eq!(elapsed, offset);
        }
    }
}
