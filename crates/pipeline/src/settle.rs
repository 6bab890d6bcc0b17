//! Failure-isolating combinators for best-effort branches.
//!
//! A settled branch yields `Some(value)` on success and `None` when it
//! returned an error or panicked. The failure is logged and goes no further.

use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::future::join_all;
use futures::FutureExt;

/// Await `branch`, converting an error or a panic into `None`.
pub async fn settle<T, E, F>(name: &str, branch: F) -> Option<T>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match AssertUnwindSafe(branch).catch_unwind().await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(err)) => {
            tracing::warn!(branch = name, error = %err, "Best-effort branch failed");
            None
        }
        Err(payload) => {
            tracing::error!(
                branch = name,
                panic = panic_message(payload.as_ref()),
                "Best-effort branch panicked"
            );
            None
        }
    }
}

/// Run all `branches` concurrently and settle each one independently.
/// Output order matches input order.
pub async fn settle_all<T, E, F, I>(name: &str, branches: I) -> Vec<Option<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    join_all(branches.into_iter().map(|branch| settle(name, branch))).await
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn success_passes_through() {
        let value = settle("ok", async { Ok::<_, String>(42) }).await;
        assert_eq!(value, Some(42));
    }

    #[tokio::test]
    async fn error_becomes_none() {
        let value = settle("err", async { Err::<u32, _>("boom".to_string()) }).await;
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn panic_becomes_none() {
        let value = settle("panic", async {
            if true {
                panic!("kaboom");
            }
            Ok::<u32, String>(1)
        })
        .await;
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn settle_all_isolates_each_branch_and_keeps_order() {
        let branches = (0..4u32).map(|i| async move {
            match i {
                1 => Err(format!("branch {i} failed")),
                2 => panic!("branch {i} panicked"),
                _ => Ok(i * 10),
            }
        });

        let results = settle_all("many", branches).await;

        assert_eq!(results, vec![Some(0), None, None, Some(30)]);
    }
}
