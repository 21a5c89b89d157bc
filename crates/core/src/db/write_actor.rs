use std::any::Any;
use std::sync::Arc;

use diesel::SqliteConnection;
use log::error;
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::{DatabaseError, Error, Result};

// A job is a closure run on the writer's dedicated connection. The return
// value is type-erased so one channel can carry jobs of any result type.
type Job = Box<dyn FnOnce(&mut SqliteConnection) -> Result<Box<dyn Any + Send + 'static>> + Send + 'static>;

/// Handle for submitting write jobs to the single-writer actor.
///
/// Every job runs inside an immediate transaction on the actor's dedicated
/// connection, so multi-statement mutations are atomic and writes from
/// concurrent requests are serialized.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(Job, oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>)>,
}

impl WriteHandle {
    /// Executes a database job on the writer's connection and returns its
    /// result. The job is rolled back in full if it returns an error.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| {
                Error::Database(DatabaseError::TransactionFailed(
                    "writer actor is no longer running".to_string(),
                ))
            })?;

        let boxed = ret_rx.await.map_err(|_| {
            Error::Database(DatabaseError::TransactionFailed(
                "writer actor dropped the reply channel".to_string(),
            ))
        })??;

        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            Error::Database(DatabaseError::TransactionFailed(
                "writer actor returned an unexpected result type".to_string(),
            ))
        })
    }
}

/// Spawns the background task that owns one connection from the pool and
/// processes write jobs serially, each inside an immediate transaction.
pub fn spawn_writer(pool: Arc<DbPool>) -> Result<WriteHandle> {
    let (tx, mut rx) =
        mpsc::channel::<(Job, oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>)>(1024);

    let mut conn = pool.get()?;

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> =
                conn.immediate_transaction::<_, Error, _>(|c| job(c));

            if let Err(e) = &result {
                error!("write job failed, transaction rolled back: {}", e);
            }

            // The receiver may have given up (request cancelled); nothing
            // left to do with the result in that case.
            let _ = reply_tx.send(result);
        }
    });

    Ok(WriteHandle { tx })
}
