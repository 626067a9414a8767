use crate::keymap::KeyMap;
use crate::tone::Cue;
use anyhow::Result;
use flanker_experiment::{DriverEvent, ExperimentConfig, ExperimentDriver, JsonLinesSink};
use flanker_render::{FontVec, SceneRenderer};
use flanker_timing::PrecisionTimer;
use pixels::{Pixels, SurfaceTexture};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

type Driver = ExperimentDriver<PrecisionTimer, StdRng, JsonLinesSink, Cue>;

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    renderer: Option<SceneRenderer>,
    font: Option<FontVec>,
    driver: Driver,
    keymap: KeyMap,
    current_size: Option<PhysicalSize<u32>>,
    scale_factor: f64,
    refresh_rate: Option<f64>,
    should_exit: bool,
}

impl App {
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        // All setup failures are fatal before the session starts.
        let font = SceneRenderer::load_font(config.font_path.as_deref())?;
        let sink = JsonLinesSink::create(&config.output_path)?;
        let cue = Cue::init(config.tone_hz, config.tone_ms);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let timer = PrecisionTimer::new();
        let driver = ExperimentDriver::new(config, timer, rng, sink, cue)?;

        Ok(Self {
            window: None,
            pixels: None,
            renderer: None,
            font: Some(font),
            driver,
            keymap: KeyMap::standard(),
            current_size: None,
            scale_factor: 1.0,
            refresh_rate: None,
            should_exit: false,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        println!("=== HAND-SHIELDING FLANKER TASK ===");
        println!("Platform: {}", std::env::consts::OS);
        println!("H/S keys respond, SPACE advances, ESC aborts.\n");
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let primary_monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .ok_or_else(|| anyhow::anyhow!("no monitor available"))?;

        self.refresh_rate = primary_monitor
            .refresh_rate_millihertz()
            .map(|rate| rate as f64 / 1000.0);

        let window_attributes = Window::default_attributes()
            .with_title("Flanker task")
            .with_fullscreen(Some(Fullscreen::Borderless(Some(primary_monitor.clone()))))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let physical_size = window.inner_size();
        self.current_size = Some(physical_size);
        self.scale_factor = window.scale_factor();

        println!("Display configuration:");
        println!(
            "  Physical size: {}x{}",
            physical_size.width, physical_size.height
        );
        println!("  Scale factor: {:.2}", self.scale_factor);
        if let Some(refresh_rate) = self.refresh_rate {
            println!("  Refresh rate: {:.1} Hz", refresh_rate);
        }

        let surface_texture =
            SurfaceTexture::new(physical_size.width, physical_size.height, window.clone());
        self.pixels = Some(Pixels::new(
            physical_size.width,
            physical_size.height,
            surface_texture,
        )?);

        let font = self.font.take().expect("font consumed once");
        self.renderer = Some(SceneRenderer::new(
            physical_size.width,
            physical_size.height,
            font,
        )?);
        self.driver
            .resize_surface(physical_size.width, physical_size.height);

        window.set_cursor_visible(false);
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let (Some(pixels), Some(renderer)) = (&mut self.pixels, &mut self.renderer) else {
            return Ok(());
        };
        let scene = self.driver.scene();
        let canvas = renderer.render_scene(&scene)?;
        pixels.frame_mut().copy_from_slice(canvas.data());
        pixels.render()?;
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        for event in self.driver.update()? {
            if event == DriverEvent::SessionFinished {
                self.should_exit = true;
            }
        }
        Ok(())
    }

    fn handle_input(&mut self, key: winit::keyboard::PhysicalKey) {
        use winit::keyboard::PhysicalKey;
        let PhysicalKey::Code(code) = key else {
            return;
        };
        let Some(input) = self.keymap.map(code) else {
            return;
        };
        match self.driver.handle_key(input) {
            Ok(events) => {
                if events.contains(&DriverEvent::SessionFinished) {
                    self.should_exit = true;
                }
            }
            Err(err) => {
                eprintln!("session error: {err}");
                self.should_exit = true;
            }
        }
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        self.current_size = Some(new_size);
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                eprintln!("failed to resize surface: {e}");
            }
            if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                eprintln!("failed to resize buffer: {e}");
            }
        }
        if let Some(renderer) = &mut self.renderer {
            if let Err(e) = renderer.resize(new_size.width, new_size.height) {
                eprintln!("failed to resize canvas: {e}");
            }
        }
        self.driver.resize_surface(new_size.width, new_size.height);
        println!("Display resized to: {}x{}", new_size.width, new_size.height);
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.set_cursor_visible(true);
        }
        println!("\nSession ended.");
        self.should_exit = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                eprintln!("failed to create window and surface: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.driver.request_quit();
                if let Err(e) = self.update() {
                    eprintln!("session error: {e}");
                }
                self.cleanup_and_exit(event_loop);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    eprintln!("render error: {e}");
                }
                if let Err(e) = self.update() {
                    eprintln!("session error: {e}");
                    self.should_exit = true;
                }
                if self.should_exit {
                    self.cleanup_and_exit(event_loop);
                } else if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                self.handle_input(event.physical_key);
            }
            WindowEvent::Resized(size) => self.handle_resize(size),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
                if let Some(window) = &self.window {
                    self.handle_resize(window.inner_size());
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
        }
    }
}
