use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use frameprobe_core::{update, AppState, Msg};
use frameprobe_engine::{FetchSettings, FrameLoader, FrameSettings};
use frameprobe_logging::{probe_info, probe_warn};
use frameprobe_server::ServerConfig;

use super::effects::EffectRunner;
use super::server::spawn_embedded_server;
use super::ui::commands::{parse_command, Command, HELP};
use super::ui::render::{render_full, render_presets, PanelRenderer};

/// How long the loop waits for a message before checking input again.
const POLL_INTERVAL: Duration = Duration::from_millis(75);

pub struct AppConfig {
    /// Test page server to run alongside the probe; `None` to use an external one.
    pub server: Option<ServerConfig>,
    pub frame: FrameSettings,
    pub fetch: FetchSettings,
}

pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let mut frame = config.frame;
    if let Some(server) = config.server {
        match spawn_embedded_server(server) {
            Ok(addr) => frame.host_origin = format!("http://{addr}"),
            Err(err) => {
                probe_warn!("embedded server unavailable: {err:#}");
                eprintln!("Warning: test page server not started: {err:#}");
            }
        }
    }
    probe_info!("frame host origin {}", frame.host_origin);

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let loader = FrameLoader::new(config.fetch, frame);
    let runner = EffectRunner::new(loader, msg_tx).context("starting frame engine")?;
    let lines = spawn_stdin_reader().context("starting input reader")?;

    let mut app = App {
        state: AppState::new(),
        runner,
        renderer: PanelRenderer::default(),
        out: io::stdout(),
    };
    app.state.consume_dirty();
    let initial = app.renderer.render_update(&app.state.view());
    app.print(&initial)?;
    app.print("Type 'help' for commands.\n")?;

    // The frame element starts out pointing at the default target.
    app.dispatch_msg(Msg::LoadRequested);
    app.flush_render()?;
    app.run(&lines, &msg_rx)
}

struct App {
    state: AppState,
    runner: EffectRunner,
    renderer: PanelRenderer,
    out: io::Stdout,
}

enum Flow {
    Continue,
    Quit,
}

impl App {
    fn run(
        &mut self,
        lines: &mpsc::Receiver<String>,
        msg_rx: &mpsc::Receiver<Msg>,
    ) -> anyhow::Result<()> {
        loop {
            loop {
                match lines.try_recv() {
                    Ok(line) => {
                        if let Flow::Quit = self.handle_line(&line)? {
                            return Ok(());
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    // Input closed.
                    Err(TryRecvError::Disconnected) => return Ok(()),
                }
            }

            self.runner.poll_engine();
            match msg_rx.recv_timeout(POLL_INTERVAL) {
                Ok(msg) => self.dispatch_msg(msg),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            }
            while let Ok(msg) = msg_rx.try_recv() {
                self.dispatch_msg(msg);
            }
            self.flush_render()?;
        }
    }

    fn handle_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(err) => {
                self.print(&format!("{err}\n"))?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => self.print(&format!("{HELP}\n"))?,
            Command::Presets => self.print(&render_presets())?,
            Command::Show => {
                self.flush_render()?;
                self.print(&render_full(&self.state.view()))?;
            }
            Command::Preset(ref name) if frameprobe_core::preset_target(name).is_none() => {
                self.print(&format!("unknown preset '{name}' (type 'presets')\n"))?;
            }
            command => {
                if let Some(msg) = command.into_msg() {
                    self.dispatch_msg(msg);
                }
                self.flush_render()?;
            }
        }
        Ok(Flow::Continue)
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn flush_render(&mut self) -> anyhow::Result<()> {
        if self.state.consume_dirty() {
            let text = self.renderer.render_update(&self.state.view());
            self.print(&text)?;
        }
        Ok(())
    }

    fn print(&self, text: &str) -> anyhow::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let mut out = self.out.lock();
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

fn spawn_stdin_reader() -> io::Result<mpsc::Receiver<String>> {
    let (line_tx, line_rx) = mpsc::channel();
    thread::Builder::new()
        .name("frameprobe-input".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(line_rx)
}
