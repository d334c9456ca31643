//! Debounced background saving of a [`Draft`].

use std::fmt;
use std::time::{Duration, SystemTime};

use blogstore_types::{Post, PostId};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::{Client, Draft};

/// Time without edits after which a draft is saved.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_secs(5);

/// Number of undelivered [`AutoSaveEvent`]s kept for [`AutoSaver::next_event`].
///
/// When the buffer is full, newer events are discarded. Saving continues regardless.
pub const AUTOSAVE_EVENT_BUFFER: usize = 16;

/// Destination for drafts saved by an [`AutoSaver`].
///
/// Implemented by [`Client`], which saves through the blog API.
#[async_trait::async_trait]
pub trait DraftSink: Send + Sync + 'static {
    /// Saves the draft with draft status and returns the stored post.
    async fn save_draft(&self, draft: &Draft) -> crate::Result<Post>;
}

#[async_trait::async_trait]
impl DraftSink for Client {
    async fn save_draft(&self, draft: &Draft) -> crate::Result<Post> {
        Client::save_draft(self, draft).await
    }
}

/// Outcome of an automatic save.
#[derive(Clone, Debug)]
pub enum AutoSaveEvent {
    /// The draft was saved.
    Saved {
        /// The post as stored by the server.
        post: Post,
        /// When the save completed.
        at: SystemTime,
    },
    /// Saving failed. The next edit schedules another attempt.
    Failed {
        /// Description of the failure.
        message: String,
    },
}

/// Saves a draft in the background once editing pauses.
///
/// Every change to the title or content restarts a timer. When the timer runs out, the latest
/// draft is saved, unless it has neither title nor content. The id assigned by the first save is
/// reused for all later saves. Changing only the tags does not restart the timer, but the tags
/// are included in the next save.
///
/// Dropping the `AutoSaver` cancels a pending save.
pub struct AutoSaver {
    draft: watch::Sender<Draft>,
    events: mpsc::Receiver<AutoSaveEvent>,
    task: JoinHandle<()>,
}

impl AutoSaver {
    /// Starts auto-saving with the [default delay](DEFAULT_AUTOSAVE_DELAY).
    ///
    /// `initial` is the draft as loaded into the editor. It is not saved until it changes.
    pub fn spawn<S: DraftSink>(sink: S, initial: Draft) -> Self {
        Self::with_delay(sink, initial, DEFAULT_AUTOSAVE_DELAY)
    }

    /// Starts auto-saving with a custom delay.
    pub fn with_delay<S: DraftSink>(sink: S, initial: Draft, delay: Duration) -> Self {
        let (draft_tx, draft_rx) = watch::channel(initial);
        let (events_tx, events_rx) = mpsc::channel(AUTOSAVE_EVENT_BUFFER);

        let task = tokio::spawn(run(sink, draft_rx, events_tx, delay));

        Self {
            draft: draft_tx,
            events: events_rx,
            task,
        }
    }

    /// Replaces the draft with the editor's current state.
    pub fn update(&self, draft: Draft) {
        self.draft.send_if_modified(|current| {
            let changed = current.title != draft.title || current.content != draft.content;
            *current = draft;
            changed
        });
    }

    /// Returns the latest draft.
    ///
    /// The id assigned by the first successful save shows up here once its event has been
    /// received through [`next_event`](Self::next_event).
    pub fn draft(&self) -> Draft {
        self.draft.borrow().clone()
    }

    /// Waits for the outcome of the next save attempt.
    ///
    /// Returns `None` once the background task has stopped.
    pub async fn next_event(&mut self) -> Option<AutoSaveEvent> {
        let event = self.events.recv().await?;

        if let AutoSaveEvent::Saved { post, .. } = &event {
            // Not a content change, so this must not restart the timer.
            self.draft.send_if_modified(|draft| {
                if draft.id.is_none() {
                    draft.id = Some(post.id.clone());
                }
                false
            });
        }

        Some(event)
    }
}

impl fmt::Debug for AutoSaver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoSaver")
            .field("draft", &*self.draft.borrow())
            .finish_non_exhaustive()
    }
}

impl Drop for AutoSaver {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<S: DraftSink>(
    sink: S,
    mut draft_rx: watch::Receiver<Draft>,
    events: mpsc::Sender<AutoSaveEvent>,
    delay: Duration,
) {
    let mut saved_id: Option<PostId> = None;

    while draft_rx.changed().await.is_ok() {
        // Further edits push the save out again.
        loop {
            tokio::select! {
                changed = draft_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = tokio::time::sleep(delay) => break,
            }
        }

        let mut draft = draft_rx.borrow_and_update().clone();
        if !draft.has_text() {
            continue;
        }
        if draft.id.is_none() {
            draft.id = saved_id.clone();
        }

        let event = match sink.save_draft(&draft).await {
            Ok(post) => {
                tracing::debug!(id = %post.id, "draft saved automatically");
                saved_id = Some(post.id.clone());
                AutoSaveEvent::Saved {
                    post,
                    at: SystemTime::now(),
                }
            }
            Err(error) => {
                tracing::warn!(error = &error as &dyn std::error::Error, "auto-save failed");
                AutoSaveEvent::Failed {
                    message: error.to_string(),
                }
            }
        };

        match events.try_send(event) {
            Ok(()) => (),
            Err(TrySendError::Full(_)) => tracing::debug!("auto-save event buffer full"),
            Err(TrySendError::Closed(_)) => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use blogstore_types::{PostInput, PostStatus};
    use reqwest::StatusCode;
    use tokio::time::Instant;

    use super::*;

    /// Records every saved draft and assigns the id `post-1` to new posts.
    #[derive(Clone, Debug, Default)]
    struct RecordingSink {
        saved: Arc<Mutex<Vec<Draft>>>,
        fail: bool,
    }

    impl RecordingSink {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn saved(&self) -> Vec<Draft> {
            self.saved.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl DraftSink for RecordingSink {
        async fn save_draft(&self, draft: &Draft) -> crate::Result<Post> {
            self.saved.lock().unwrap().push(draft.clone());
            if self.fail {
                return Err(crate::Error::Api {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Failed to save draft".into(),
                });
            }

            let mut post = Post::create(draft.to_input(), PostStatus::Draft, SystemTime::now());
            post.id = draft.id.clone().unwrap_or_else(|| "post-1".into());
            Ok(post)
        }
    }

    fn draft(title: &str, content: &str) -> Draft {
        Draft {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Waits long enough that any pending save must have happened.
    async fn expect_no_event(saver: &mut AutoSaver) {
        let result = tokio::time::timeout(Duration::from_secs(60), saver.next_event()).await;
        assert!(result.is_err(), "unexpected event: {result:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn coalesces_bursts_of_edits() {
        let sink = RecordingSink::default();
        let mut saver = AutoSaver::spawn(sink.clone(), Draft::default());

        saver.update(draft("H", ""));
        tokio::time::sleep(Duration::from_secs(2)).await;
        saver.update(draft("He", ""));
        tokio::time::sleep(Duration::from_secs(2)).await;
        saver.update(draft("Hello", "<p>x</p>"));
        let last_edit = Instant::now();

        let event = saver.next_event().await.unwrap();
        assert!(last_edit.elapsed() >= DEFAULT_AUTOSAVE_DELAY);

        let AutoSaveEvent::Saved { post, .. } = event else {
            panic!("expected a successful save");
        };
        assert_eq!(post.title, "Hello");

        let saved = sink.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].content, "<p>x</p>");
    }

    #[tokio::test(start_paused = true)]
    async fn reuses_assigned_id() {
        let sink = RecordingSink::default();
        let mut saver = AutoSaver::spawn(sink.clone(), Draft::default());

        saver.update(draft("First", ""));
        saver.next_event().await.unwrap();
        assert_eq!(saver.draft().id, Some("post-1".into()));

        // The editor does not know about the id yet.
        saver.update(draft("Second", ""));
        saver.next_event().await.unwrap();

        let saved = sink.saved();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].id, None);
        assert_eq!(saved[1].id, Some("post-1".into()));
        assert_eq!(saved[1].title, "Second");
    }

    #[tokio::test(start_paused = true)]
    async fn existing_post_keeps_its_id() {
        let sink = RecordingSink::default();
        let initial = Draft {
            id: Some("existing".into()),
            ..draft("Old", "<p>old</p>")
        };
        let mut saver = AutoSaver::spawn(sink.clone(), initial.clone());

        saver.update(Draft {
            content: "<p>new</p>".into(),
            ..initial
        });
        saver.next_event().await.unwrap();

        assert_eq!(sink.saved()[0].id, Some("existing".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn skips_empty_drafts() {
        let sink = RecordingSink::default();
        let mut saver = AutoSaver::spawn(sink.clone(), Draft::default());

        saver.update(draft("typo", ""));
        saver.update(draft("", ""));
        expect_no_event(&mut saver).await;

        assert!(sink.saved().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn tag_changes_do_not_trigger() {
        let sink = RecordingSink::default();
        let initial = draft("Title", "");
        let mut saver = AutoSaver::spawn(sink.clone(), initial.clone());

        let mut tagged = initial;
        tagged.add_tag("rust");
        saver.update(tagged.clone());
        expect_no_event(&mut saver).await;
        assert!(sink.saved().is_empty());

        // The tags still go out with the next content change.
        tagged.content = "<p>body</p>".into();
        saver.update(tagged);
        saver.next_event().await.unwrap();
        assert_eq!(sink.saved()[0].tags, ["rust"]);
    }

    #[tokio::test(start_paused = true)]
    async fn reports_failures() {
        let sink = RecordingSink::failing();
        let mut saver = AutoSaver::spawn(sink, Draft::default());

        saver.update(draft("Doomed", ""));
        let event = saver.next_event().await.unwrap();

        let AutoSaveEvent::Failed { message } = event else {
            panic!("expected a failure");
        };
        assert!(message.contains("Failed to save draft"));
        assert_eq!(saver.draft().id, None);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_save() {
        let sink = RecordingSink::default();
        let saver = AutoSaver::spawn(sink.clone(), Draft::default());

        saver.update(draft("Unsaved", ""));
        drop(saver);
        tokio::time::sleep(DEFAULT_AUTOSAVE_DELAY * 2).await;

        assert!(sink.saved().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unread_events_are_bounded() {
        let sink = RecordingSink::default();
        let mut saver = AutoSaver::spawn(sink.clone(), Draft::default());

        let rounds = AUTOSAVE_EVENT_BUFFER + 4;
        for i in 0..rounds {
            saver.update(draft(&format!("edit {i}"), ""));
            tokio::time::sleep(DEFAULT_AUTOSAVE_DELAY * 2).await;
        }

        // Every save happened even though nobody read the events.
        assert_eq!(sink.saved().len(), rounds);

        let mut buffered = 0;
        while saver.events.try_recv().is_ok() {
            buffered += 1;
        }
        assert_eq!(buffered, AUTOSAVE_EVENT_BUFFER);
    }

    #[test]
    fn input_round_trip() {
        let input = draft("T", "C").to_input();
        assert_eq!(
            input,
            PostInput {
                title: Some("T".into()),
                content: Some("C".into()),
                tags: Some(Vec::new()),
            }
        );
    }
}
