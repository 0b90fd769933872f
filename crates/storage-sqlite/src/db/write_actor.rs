//! Single-writer actor.
//!
//! SQLite allows one writer at a time; funneling every write through one
//! dedicated connection turns "database is locked" errors into queueing and
//! gives each job transactional read-modify-write semantics. A job runs
//! inside an immediate transaction, so the balance checks and multi-table
//! writes the repositories perform are atomic and serialized.

use std::any::Any;

use diesel::result::Error as DieselError;
use diesel::{Connection, SqliteConnection};
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::StorageError;
use moneta_core::errors::{Error, Result};

type ErasedResult = Result<Box<dyn Any + Send + 'static>>;
type ErasedJob = Box<dyn FnOnce(&mut SqliteConnection) -> ErasedResult + Send + 'static>;

/// Failure of a writer job: either Diesel's own transaction machinery, or an
/// application error returned by the job (kept intact so business errors
/// like "insufficient balance" survive the transaction wrapper).
enum TxFailure {
    Db(DieselError),
    App(Error),
}

impl From<DieselError> for TxFailure {
    fn from(e: DieselError) -> Self {
        TxFailure::Db(e)
    }
}

/// Handle for submitting jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(ErasedJob, oneshot::Sender<ErasedResult>)>,
}

impl WriteHandle {
    /// Runs `job` on the writer's connection inside an immediate
    /// transaction and returns its result.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Any + Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let erased: ErasedJob =
            Box::new(move |conn| job(conn).map(|v| Box::new(v) as Box<dyn Any + Send>));

        self.tx
            .send((erased, reply_tx))
            .await
            .expect("writer actor channel closed; the actor task has stopped");

        reply_rx
            .await
            .expect("writer actor dropped the reply sender")
            .map(|boxed| {
                *boxed
                    .downcast::<T>()
                    .unwrap_or_else(|_| panic!("writer actor returned an unexpected type"))
            })
    }
}

/// Spawns the writer task. It holds one pooled connection for its lifetime
/// and processes jobs strictly in order.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, oneshot::Sender<ErasedResult>)>(1024);

    tokio::spawn(async move {
        let mut conn = pool
            .get()
            .expect("failed to check out the writer connection");

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: ErasedResult = conn
                .immediate_transaction::<_, TxFailure, _>(|c| job(c).map_err(TxFailure::App))
                .map_err(|failure| match failure {
                    TxFailure::Db(e) => StorageError::QueryFailed(e).into(),
                    TxFailure::App(e) => e,
                });

            // Receiver may have gone away (request cancelled); nothing to do.
            let _ = reply_tx.send(result);
        }
        // Channel closed: every WriteHandle was dropped, the actor exits.
    });

    WriteHandle { tx }
}
