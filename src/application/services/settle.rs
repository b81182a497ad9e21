use futures::future::join_all;
use std::future::Future;

/// Result of one task joined by [`settle_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T, E> {
    Fulfilled(T),
    Rejected(E),
}

impl<T, E> Settled<T, E> {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Settled::Fulfilled(_))
    }

    pub fn into_result(self) -> Result<T, E> {
        match self {
            Settled::Fulfilled(value) => Ok(value),
            Settled::Rejected(error) => Err(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for Settled<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Settled::Fulfilled(value),
            Err(error) => Settled::Rejected(error),
        }
    }
}

/// Drives every future to completion concurrently and reports each outcome in
/// input order. A failing future never cancels the others.
pub async fn settle_all<I, F, T, E>(futures: I) -> Vec<Settled<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    join_all(futures)
        .await
        .into_iter()
        .map(Settled::from)
        .collect()
}
