use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};

/// Window configuration, read once when the window opens.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "vizkit".to_string(),
            initial_size: LogicalSize::new(300.0, 300.0),
            resizable: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `app` until it asks to exit or the window
    /// is closed, then calls [`CoreApp::on_exit`].
    ///
    /// The app is borrowed, so the caller keeps it whether or not the loop
    /// succeeded. Window or GPU initialization failures are returned as errors.
    pub fn run<A: CoreApp>(config: RuntimeConfig, gpu_init: GpuInit, app: &mut A) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState { config, gpu_init, app, window: None, started: false, fatal: None };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        // Drop the surface before the window goes away.
        state.window = None;
        state.app.on_exit();

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowEntry {
    fn id(&self) -> WindowId {
        self.with_window(|w| w.id())
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }
}

struct AppState<'a, A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: &'a mut A,

    window: Option<WindowEntry>,
    started: bool,
    fatal: Option<anyhow::Error>,
}

impl<A: CoreApp> AppState<'_, A> {
    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        let window = event_loop.create_window(attrs).context("failed to create window")?;
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        log::info!("opened window '{}'", self.config.title);
        entry.request_redraw();
        self.window = Some(entry);
        Ok(())
    }

    fn redraw(&mut self) -> AppControl {
        let Some(entry) = self.window.as_mut() else {
            return AppControl::Exit;
        };
        let app = &mut *self.app;
        entry.with_mut(|fields| {
            let control = {
                let mut ctx = FrameCtx {
                    window: WindowCtx { window: fields.window },
                    gpu: fields.gpu,
                    input: fields.input_state,
                    input_frame: fields.input_frame,
                };
                app.on_frame(&mut ctx)
            };
            fields.input_frame.clear();
            control
        })
    }
}

impl<A: CoreApp> ApplicationHandler for AppState<'_, A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;
        event_loop.set_control_flow(ControlFlow::Wait);

        if let Err(e) = self.open_window(event_loop) {
            log::error!("failed to create window: {e:#}");
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(entry) = self.window.as_mut().filter(|e| e.id() == window_id) else {
            return;
        };

        let is_input = entry.with_mut(|fields| {
            let translated = translate_window_event(fields.window, fields.input_state, &event);
            let is_input = translated.is_some();
            if let Some(ev) = translated {
                fields.input_state.apply_event(fields.input_frame, ev);
            }
            is_input
        });
        if is_input {
            entry.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                log::debug!("close requested");
                self.window = None;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                if self.redraw() == AppControl::Exit {
                    self.window = None;
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}
