use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use frameprobe_logging::{probe_error, probe_trace};

use crate::loader::FrameLoader;
use crate::{EngineEvent, Generation};

enum EngineCommand {
    Load { generation: Generation, target: String },
}

/// Runs frame loads on a worker thread and hands back completion events.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(loader: FrameLoader) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let loader = Arc::new(loader);

        thread::Builder::new()
            .name("frameprobe-engine".into())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let loader = loader.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(loader.as_ref(), command, event_tx).await;
                    });
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn load(&self, generation: Generation, target: impl Into<String>) {
        let command = EngineCommand::Load {
            generation,
            target: target.into(),
        };
        if self.cmd_tx.send(command).is_err() {
            probe_error!("engine worker is gone; load {generation} dropped");
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    loader: &FrameLoader,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Load { generation, target } => {
            probe_trace!("load {generation} started for {target}");
            let event = match loader.load(&target).await {
                Ok(frame) => EngineEvent::FrameLoaded {
                    generation,
                    frame: Box::new(frame),
                },
                Err(error) => EngineEvent::LoadFailed { generation, error },
            };
            let _ = event_tx.send(event);
        }
    }
}
