//! Row request parameters and completion callbacks.

use log::debug;
use tokio::sync::oneshot;

use crate::model::Row;
use crate::query::Request;

/// Rows delivered to the grid on success.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBlock {
    /// The rows of the requested block.
    pub row_data: Vec<Row>,
    /// Total row count, if known.
    pub row_count: Option<usize>,
}

/// How a row request completed.
#[derive(Debug, Clone, PartialEq)]
pub enum RowsOutcome {
    /// The request succeeded with a block of rows.
    Success(RowBlock),
    /// The request failed; no rows are delivered.
    Fail,
}

type Callback = Box<dyn FnOnce(RowsOutcome) + Send>;

/// A single row request together with its completion callback.
///
/// [`success`](Self::success) and [`fail`](Self::fail) consume the params,
/// so a request can be completed at most once. Params dropped without being
/// completed, for example when the runtime shuts down mid-request, complete
/// as failed.
///
/// # Example
///
/// ```
/// use gridsource_lib::query::Request;
/// use gridsource_lib::datasource::{GetRowsParams, RowsOutcome};
///
/// let params = GetRowsParams::new(Request::range(0, 100), |outcome| match outcome {
///     RowsOutcome::Success(block) => println!("got {} rows", block.row_data.len()),
///     RowsOutcome::Fail => println!("request failed"),
/// });
/// params.fail();
/// ```
pub struct GetRowsParams {
    request: Request,
    callback: Option<Callback>,
}

impl GetRowsParams {
    /// Creates params that invoke `callback` on completion.
    pub fn new(request: Request, callback: impl FnOnce(RowsOutcome) + Send + 'static) -> Self {
        Self {
            request,
            callback: Some(Box::new(callback)),
        }
    }

    /// Creates params whose outcome is delivered through a oneshot channel.
    pub fn channel(request: Request) -> (Self, oneshot::Receiver<RowsOutcome>) {
        let (tx, rx) = oneshot::channel();
        let params = Self::new(request, move |outcome| {
            // The receiver may have given up on the request.
            let _ = tx.send(outcome);
        });
        (params, rx)
    }

    /// Returns the request.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Completes the request with rows.
    pub fn success(mut self, row_data: Vec<Row>, row_count: Option<usize>) {
        self.complete(RowsOutcome::Success(RowBlock { row_data, row_count }));
    }

    /// Completes the request as failed.
    pub fn fail(mut self) {
        self.complete(RowsOutcome::Fail);
    }

    fn complete(&mut self, outcome: RowsOutcome) {
        if let Some(callback) = self.callback.take() {
            callback(outcome);
        }
    }
}

impl Drop for GetRowsParams {
    fn drop(&mut self) {
        if self.callback.is_some() {
            debug!("Row request dropped before completion: {:?}", self.request);
            self.complete(RowsOutcome::Fail);
        }
    }
}

impl std::fmt::Debug for GetRowsParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetRowsParams")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<RowsOutcome>>>, impl FnOnce(RowsOutcome) + Send + 'static) {
        let outcomes = Arc::new(Mutex::new(Vec::new()));
        let sink = outcomes.clone();
        (outcomes, move |outcome| sink.lock().unwrap().push(outcome))
    }

    #[test]
    fn test_success_completes_once() {
        let (outcomes, callback) = recorder();
        GetRowsParams::new(Request::range(0, 1), callback).success(Vec::new(), Some(0));

        let outcomes = outcomes.lock().unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0], RowsOutcome::Success(_)));
    }

    #[test]
    fn test_dropped_params_fail() {
        let (outcomes, callback) = recorder();
        drop(GetRowsParams::new(Request::range(0, 1), callback));

        assert_eq!(*outcomes.lock().unwrap(), [RowsOutcome::Fail]);
    }
}
