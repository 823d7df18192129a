use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::InputState;
use crate::input::platform::translate_window_event;
use crate::time::FramePacer;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
    /// Redraw rate; the window is redrawn at most this often.
    pub target_fps: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "ocrtunes".to_string(),
            initial_size: LogicalSize::new(1400.0, 900.0),
            resizable: false,
            target_fps: 60,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and drives `app` until the window closes or a frame
    /// returns [`AppControl::Exit`].
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState { config, gpu_init, app, window: None, failed: None };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failed {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input: InputState,
    pacer: FramePacer,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct RuntimeState<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    window: Option<WindowEntry>,
    /// Startup error reported once the loop has exited.
    failed: Option<anyhow::Error>,
}

impl<A: App> RuntimeState<A> {
    fn open_window(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        let window = event_loop.create_window(attrs).context("failed to create window")?;
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            input: InputState::default(),
            pacer: FramePacer::new(self.config.target_fps, Instant::now()),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        log::info!("window open ({} fps)", self.config.target_fps);
        Ok(entry)
    }

    /// Runs one app frame with the input queued since the last one.
    fn frame(&mut self) -> AppControl {
        let Some(entry) = self.window.as_mut() else { return AppControl::Continue; };
        let app = &mut self.app;
        entry.with_mut(|fields| {
            let dt = fields.pacer.tick(Instant::now());
            let control = {
                let mut ctx = FrameCtx { window: fields.window, gpu: fields.gpu, events: fields.input.events(), dt };
                app.on_frame(&mut ctx)
            };
            fields.input.clear_events();
            control
        })
    }
}

impl<A: App> ApplicationHandler for RuntimeState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match self.open_window(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
            }
            Err(e) => {
                log::error!("{e:#}");
                self.failed = Some(e);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.window.as_mut() else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        // fixed-rate redraw: wake at the next deadline
        let now = Instant::now();
        let deadline = entry.with_mut(|fields| {
            if fields.pacer.poll(now) {
                fields.window.request_redraw();
            }
            fields.pacer.deadline()
        });
        event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(entry) = self.window.as_mut() else { return; };

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.window, fields.input, &event) {
                fields.input.apply_event(ev);
            }
        });

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.window = None;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => {
                if self.frame() == AppControl::Exit {
                    self.window = None;
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}
