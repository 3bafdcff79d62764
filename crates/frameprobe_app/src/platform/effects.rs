use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use frameprobe_core::{run_probe, Effect, FrameAccess, Msg};
use frameprobe_engine::{EngineEvent, EngineHandle, FrameLoader, Generation, LoadedFrame};
use frameprobe_logging::{probe_debug, probe_info, probe_warn};

/// The frame currently shown, tagged with the load that produced it.
///
/// `frame` is `None` only until the first load is requested; after that the
/// element stays mounted, with content once a load succeeds.
#[derive(Default)]
struct MountedFrame {
    latest: Option<Generation>,
    frame: Option<LoadedFrame>,
}

impl MountedFrame {
    fn is_current(&self, generation: Generation) -> bool {
        self.latest == Some(generation)
    }
}

/// Executes effects from `update` and feeds their outcomes back as messages.
pub struct EffectRunner {
    loader: FrameLoader,
    engine: EngineHandle,
    mounted: MountedFrame,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(loader: FrameLoader, msg_tx: mpsc::Sender<Msg>) -> std::io::Result<Self> {
        Ok(Self {
            engine: EngineHandle::new(loader.clone())?,
            loader,
            mounted: MountedFrame::default(),
            msg_tx,
        })
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadFrame { generation, target } => {
                    probe_info!("LoadFrame generation={} target={}", generation, target);
                    self.mounted = MountedFrame {
                        latest: Some(generation),
                        frame: Some(self.loader.unloaded_frame(&target)),
                    };
                    self.engine.load(generation, target);
                }
                Effect::Schedule { delay, msg } => self.schedule(delay, msg),
                Effect::CheckDocument { generation } => {
                    let document_reachable = self.mounted.is_current(generation)
                        && self
                            .mounted
                            .frame
                            .as_ref()
                            .is_some_and(LoadedFrame::document_reachable);
                    self.send(Msg::BlockCheckCompleted {
                        generation,
                        document_reachable,
                    });
                }
                Effect::RunProbe(kind) => {
                    let frame = self
                        .mounted
                        .frame
                        .as_mut()
                        .map(|frame| frame as &mut dyn FrameAccess);
                    match run_probe(kind, frame, &mut rand::thread_rng()) {
                        Some(report) => self.send(Msg::ProbeCompleted(report)),
                        None => probe_debug!("{} probe skipped: no frame mounted", kind.label()),
                    }
                }
            }
        }
    }

    /// Mounts finished loads and reports them; call once per loop iteration.
    pub fn poll_engine(&mut self) {
        while let Some(event) = self.engine.try_recv() {
            match event {
                EngineEvent::FrameLoaded { generation, frame } => {
                    let source = frame.src().to_string();
                    if self.mounted.is_current(generation) {
                        self.mounted.frame = Some(*frame);
                    } else {
                        probe_debug!("dropping superseded load {generation}");
                    }
                    self.send(Msg::FrameLoaded { generation, source });
                }
                EngineEvent::LoadFailed { generation, error } => {
                    // The unloaded element stays mounted for probes.
                    probe_warn!("Load {} failed: {}", generation, error);
                    self.send(Msg::FrameLoadFailed {
                        generation,
                        message: error.to_string(),
                    });
                }
            }
        }
    }

    fn schedule(&self, delay: Duration, msg: Msg) {
        let msg_tx = self.msg_tx.clone();
        let spawned = thread::Builder::new()
            .name("frameprobe-timer".into())
            .spawn(move || {
                thread::sleep(delay);
                let _ = msg_tx.send(msg);
            });
        if let Err(err) = spawned {
            probe_warn!("could not start timer thread: {err}");
        }
    }

    fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use frameprobe_core::{update, AppState, ProbeKind, ProbeReport};
    use frameprobe_engine::{FetchSettings, FrameSettings};

    use super::*;

    fn runner() -> (EffectRunner, mpsc::Receiver<Msg>) {
        let (msg_tx, msg_rx) = mpsc::channel();
        let loader = FrameLoader::new(FetchSettings::default(), FrameSettings::default());
        (EffectRunner::new(loader, msg_tx).unwrap(), msg_rx)
    }

    fn wait_for(runner: &mut EffectRunner, msg_rx: &mpsc::Receiver<Msg>) -> Msg {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            runner.poll_engine();
            if let Ok(msg) = msg_rx.try_recv() {
                return msg;
            }
            assert!(Instant::now() < deadline, "no message arrived");
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn probe_without_frame_sends_nothing() {
        let (mut runner, msg_rx) = runner();
        runner.enqueue(vec![Effect::RunProbe(ProbeKind::Basic)]);
        assert!(msg_rx.try_recv().is_err());
    }

    fn probe_result(
        runner: &mut EffectRunner,
        msg_rx: &mpsc::Receiver<Msg>,
        kind: ProbeKind,
    ) -> ProbeReport {
        runner.enqueue(vec![Effect::RunProbe(kind)]);
        match msg_rx.try_recv().unwrap() {
            Msg::ProbeCompleted(report) => report,
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn probe_right_after_startup_yields_a_result() {
        let (mut runner, msg_rx) = runner();
        let (state, effects) = update(AppState::new(), Msg::LoadRequested);
        runner.enqueue(effects);

        let (state, effects) = update(state, Msg::ProbeRequested(ProbeKind::Basic));
        runner.enqueue(effects);
        let report = match msg_rx.try_recv().unwrap() {
            Msg::ProbeCompleted(report) => report,
            other => panic!("unexpected message {other:?}"),
        };
        let (state, _) = update(state, Msg::ProbeCompleted(report));

        assert_eq!(state.results().len(), 1);
        assert_eq!(state.results()[0].title, "Basic Frame Properties");
        assert!(state.results()[0]
            .content
            .starts_with("Source URL: data:text/html,"));
    }

    #[test]
    fn basic_probe_after_failed_load_yields_a_result() {
        let (mut runner, msg_rx) = runner();
        runner.enqueue(vec![Effect::LoadFrame {
            generation: 1,
            target: "ftp://example.com/".into(),
        }]);
        assert!(matches!(
            wait_for(&mut runner, &msg_rx),
            Msg::FrameLoadFailed { generation: 1, .. }
        ));

        let report = probe_result(&mut runner, &msg_rx, ProbeKind::Basic);
        assert_eq!(report.result.title, "Basic Frame Properties");
        assert!(report.result.content.contains("Source URL: ftp://example.com/"));
        assert!(report.result.content.contains("Loading State: Loading/Blocked"));

        let report = probe_result(&mut runner, &msg_rx, ProbeKind::Document);
        assert_eq!(report.result.title, "Document Access Blocked");
    }

    #[test]
    fn pending_load_has_no_reachable_document() {
        let (mut runner, msg_rx) = runner();
        runner.mounted = MountedFrame {
            latest: Some(4),
            frame: Some(runner.loader.unloaded_frame("/api/test-pages/same-origin")),
        };
        runner.enqueue(vec![Effect::CheckDocument { generation: 4 }]);
        assert_eq!(
            msg_rx.try_recv().unwrap(),
            Msg::BlockCheckCompleted {
                generation: 4,
                document_reachable: false
            }
        );

        let report = probe_result(&mut runner, &msg_rx, ProbeKind::Basic);
        assert!(report
            .result
            .content
            .contains("Source URL: http://127.0.0.1:5000/api/test-pages/same-origin"));
    }

    #[test]
    fn loaded_frame_is_mounted_and_probed() {
        let (mut runner, msg_rx) = runner();
        runner.enqueue(vec![Effect::LoadFrame {
            generation: 1,
            target: "data:text/html,<title>Mounted</title><p>hi</p>".into(),
        }]);

        let loaded = wait_for(&mut runner, &msg_rx);
        assert!(matches!(loaded, Msg::FrameLoaded { generation: 1, .. }));

        runner.enqueue(vec![Effect::CheckDocument { generation: 1 }]);
        assert_eq!(
            msg_rx.try_recv().unwrap(),
            Msg::BlockCheckCompleted {
                generation: 1,
                document_reachable: true
            }
        );

        runner.enqueue(vec![Effect::RunProbe(ProbeKind::Document)]);
        match msg_rx.try_recv().unwrap() {
            Msg::ProbeCompleted(report) => {
                assert_eq!(report.result.title, "Document Information");
                assert!(report.result.content.contains("Title: Mounted"));
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn superseded_load_is_not_mounted() {
        let (mut runner, msg_rx) = runner();
        runner.enqueue(vec![Effect::LoadFrame {
            generation: 1,
            target: "data:text/html,<title>Old</title>".into(),
        }]);
        runner.mounted.latest = Some(2);

        let loaded = wait_for(&mut runner, &msg_rx);
        assert!(matches!(loaded, Msg::FrameLoaded { generation: 1, .. }));
        let mounted = runner.mounted.frame.as_ref().unwrap();
        assert!(!mounted.document_reachable());
    }

    #[test]
    fn failed_load_reports_message() {
        let (mut runner, msg_rx) = runner();
        runner.enqueue(vec![Effect::LoadFrame {
            generation: 3,
            target: "ftp://example.com/".into(),
        }]);
        assert_eq!(
            wait_for(&mut runner, &msg_rx),
            Msg::FrameLoadFailed {
                generation: 3,
                message: "unsupported scheme ftp".into()
            }
        );
    }

    #[test]
    fn scheduled_messages_arrive_after_delay() {
        let (mut runner, msg_rx) = runner();
        runner.enqueue(vec![Effect::Schedule {
            delay: Duration::from_millis(20),
            msg: Msg::LoadRequested,
        }]);
        assert_eq!(
            msg_rx.recv_timeout(Duration::from_secs(2)).unwrap(),
            Msg::LoadRequested
        );
    }
}
