//! LoggingMiddleware - logs all actions for debugging

use super::{BoxFuture, Middleware, MiddlewareContext, Next};
use crate::action::Action;
use crate::state::State;

/// Logs every action that passes through the chain
///
/// Register it first to see every action, including those later middleware
/// drop, or last to see only what reaches the reducer.
pub struct LoggingMiddleware {
    tag: String,
}

impl LoggingMiddleware {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new("store")
    }
}

impl<S: State, A: Action> Middleware<S, A> for LoggingMiddleware {
    fn handle<'a>(
        &'a self,
        _context: &'a MiddlewareContext<S, A>,
        next: Next<'a, S, A>,
        action: A,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            log::debug!("[{}] Action: {:?}", self.tag, action);
            if let Err(e) = next.run(action).await {
                log::warn!("[{}] Action failed: {}", self.tag, e);
                return Err(e.into());
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::Store;

    #[tokio::test]
    async fn test_logging_middleware_forwards_actions() {
        let store: Store<u32, u32> = Store::new(
            0,
            |n: u32, delta: &u32| n + delta,
            vec![Box::new(LoggingMiddleware::new("counter"))],
        )
        .unwrap();

        store.dispatch(3).await.unwrap();

        assert_eq!(*store.state(), 3);
    }

    #[tokio::test]
    async fn test_logging_middleware_passes_errors_through() {
        let store: Store<u32, u32> = Store::new(
            0,
            |_: u32, _: &u32| -> u32 { panic!("bad reducer") },
            vec![Box::new(LoggingMiddleware::default())],
        )
        .unwrap();

        let result = store.dispatch(1).await;

        assert!(matches!(result, Err(StoreError::ReducerPanicked(msg)) if msg == "bad reducer"));
        assert_eq!(*store.state(), 0);
    }
}
