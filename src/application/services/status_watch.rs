use futures::stream::{self, Stream};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use uuid::Uuid;

use crate::application::use_cases::{CaseStudyDetail, GetCaseStudyError, GetCaseStudyUseCase};

/// One observation of a case study while its files are being extracted.
#[derive(Debug, Clone)]
pub struct StatusTick {
    pub detail: CaseStudyDetail,
    /// No file is processing any more; this is the last tick.
    pub done: bool,
}

enum WatchState {
    First,
    Next,
    Done,
}

/// Re-reads a case study every `interval` until no file is processing.
///
/// The stream ends after the first tick with `done` set or after the first
/// error. Polling only happens while the stream is being consumed, so
/// dropping it stops the watch.
pub fn watch_case_study(
    use_case: Arc<GetCaseStudyUseCase>,
    user_id: String,
    case_study_id: Uuid,
    interval: Duration,
) -> impl Stream<Item = Result<StatusTick, GetCaseStudyError>> + Send + 'static {
    stream::unfold(WatchState::First, move |state| {
        let use_case = use_case.clone();
        let user_id = user_id.clone();
        async move {
            match state {
                WatchState::Done => return None,
                WatchState::Next => sleep(interval).await,
                WatchState::First => {}
            }

            match use_case.execute(&user_id, case_study_id).await {
                Ok(detail) => {
                    let done = !detail.is_processing();
                    let next = if done { WatchState::Done } else { WatchState::Next };
                    Some((Ok(StatusTick { detail, done }), next))
                }
                Err(error) => Some((Err(error), WatchState::Done)),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ExtractionOutcome;
    use crate::test_support::InMemoryStore;
    use futures::StreamExt;

    fn use_case(store: &Arc<InMemoryStore>) -> Arc<GetCaseStudyUseCase> {
        Arc::new(GetCaseStudyUseCase::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        ))
    }

    #[tokio::test]
    async fn test_ends_once_nothing_is_processing() {
        let store = InMemoryStore::new();
        let case_study = store.seed_case_study("user_1", "Acme");
        let file = store.seed_file(case_study.id(), "req-1");

        let mut ticks = Box::pin(watch_case_study(
            use_case(&store),
            "user_1".to_string(),
            case_study.id(),
            Duration::from_millis(5),
        ));

        let first = ticks.next().await.unwrap().unwrap();
        assert!(!first.done);

        let mut completed = file.clone();
        completed.complete(ExtractionOutcome::default()).unwrap();
        store.replace_file(completed);

        let last = ticks.next().await.unwrap().unwrap();
        assert!(last.done);
        assert!(ticks.next().await.is_none());
    }

    #[tokio::test]
    async fn test_error_ends_the_stream() {
        let store = InMemoryStore::new();
        let case_study = store.seed_case_study("user_1", "Acme");

        let ticks: Vec<_> = watch_case_study(
            use_case(&store),
            "user_2".to_string(),
            case_study.id(),
            Duration::from_millis(5),
        )
        .collect()
        .await;

        assert_eq!(ticks.len(), 1);
        assert!(matches!(ticks[0], Err(GetCaseStudyError::NotFound(_))));
    }
}
