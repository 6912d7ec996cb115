use futures_util::StreamExt;
use tokio::task::JoinHandle;

use model::LoadSession;

/// Shows load progress as it happens, and cancels the load on Ctrl-C.
pub struct Watcher {
    printer: JoinHandle<()>,
    interrupt: JoinHandle<()>,
}

pub fn watch() -> (LoadSession, Watcher) {
    let (session, mut progress) = LoadSession::new();

    let printer = tokio::spawn(async move {
        while let Some(update) = progress.next().await {
            info!("{}", update.message);
        }
    });

    let cancel = session.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, abandoning the load");
            cancel.cancel();
        }
    });

    (
        session,
        Watcher {
            printer,
            interrupt,
        },
    )
}

impl Watcher {
    /// Ends the session once its load is done, after everything it reported has been shown.
    pub async fn finish(self, session: LoadSession) {
        session.dispose();
        let _ = self.printer.await;
        self.interrupt.abort();
    }
}
