use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use rand::seq::IteratorRandom;

use crate::config::{GRID_HEIGHT, GRID_WIDTH, INITIAL_LETTER, MAX_TICKS_PER_FRAME, TICK_RATE_HZ};
use crate::glyphs::{self, LETTERS};
use crate::gpu::{build_instances, random_axis, BoardBuffers, BoardView, GpuContext, RenderPipeline};
use crate::simulation::{AnimationState, Grid, PixelMap};
use crate::timestep::FixedTimestep;

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    board_buffers: Option<BoardBuffers>,
    render_pipeline: Option<RenderPipeline>,
    grid: Grid,
    clock: FixedTimestep,
    view: BoardView,
    letter: Option<char>,
    started: Instant,
    last_frame: Instant,
    fps_counter: FpsCounter,
}

impl App {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            window: None,
            gpu: None,
            board_buffers: None,
            render_pipeline: None,
            grid: Grid::new_default(),
            clock: FixedTimestep::from_hz(TICK_RATE_HZ, MAX_TICKS_PER_FRAME),
            view: BoardView::with_random_axis(&mut rand::thread_rng()),
            letter: None,
            started: now,
            last_frame: now,
            fps_counter: FpsCounter::new(),
        }
    }

    /// Load a letter onto the grid. Unknown characters are ignored.
    fn show_letter(&mut self, ch: char) {
        let Some(pixels) = glyphs::glyph(ch) else {
            log::debug!("No glyph for {:?}", ch);
            return;
        };

        match self.grid.set_pixels(&pixels) {
            Ok(()) => {
                let upper = ch.to_ascii_uppercase();
                log::info!("Showing letter {}", upper);
                self.letter = Some(upper);
            }
            Err(e) => log::error!("Could not load glyph {:?}: {}", ch, e),
        }
    }

    fn show_random_letter(&mut self) {
        if let Some(ch) = LETTERS.chars().choose(&mut rand::thread_rng()) {
            self.show_letter(ch);
        }
    }

    fn clear(&mut self) {
        if let Err(e) = self.grid.set_pixels(&PixelMap::new(0, 0)) {
            log::error!("Could not clear grid: {}", e);
            return;
        }
        log::info!("Cleared board");
        self.letter = None;
    }

    /// Run the simulation ticks owed since the last frame
    fn advance_simulation(&mut self) {
        let now = Instant::now();
        let due = self.clock.accumulate(now - self.last_frame);
        self.last_frame = now;

        for _ in 0..due {
            if self.grid.step() == AnimationState::Idle {
                break;
            }
        }
    }

    fn render(&mut self) {
        self.advance_simulation();

        let (Some(gpu), Some(buffers), Some(pipeline)) = (
            self.gpu.as_ref(),
            self.board_buffers.as_mut(),
            self.render_pipeline.as_ref(),
        ) else {
            return;
        };

        self.view.aspect = gpu.aspect();
        let seconds = self.started.elapsed().as_secs_f32();
        let instances = build_instances(
            &self.grid.snapshot(),
            self.grid.width(),
            self.grid.height(),
            self.view.board_rotation(seconds),
        );
        buffers.update_camera(&gpu.queue, self.view.view_projection());
        buffers.update_instances(&gpu.queue, &instances);

        // Get surface texture
        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure surface
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        pipeline.draw(&mut encoder, &view, &gpu.depth_view, buffers);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(fps) = self.fps_counter.tick() {
            if let Some(window) = &self.window {
                let letter = self.letter.map_or_else(|| "-".to_string(), |c| c.to_string());
                let state = match self.grid.state() {
                    AnimationState::Animating => "animating",
                    AnimationState::Idle => "idle",
                };
                window.set_title(&format!(
                    "Letter Wave - {:.0} FPS - {} ({})",
                    fps, letter, state
                ));
            }
        }
    }

    fn handle_key(&mut self, physical: PhysicalKey, logical: &Key) {
        match physical {
            PhysicalKey::Code(KeyCode::Space) => self.show_random_letter(),
            PhysicalKey::Code(KeyCode::Backspace | KeyCode::Delete) => self.clear(),
            PhysicalKey::Code(KeyCode::Tab) => {
                self.view.wobble_axis = random_axis(&mut rand::thread_rng());
                log::info!("Wobble axis: {}", self.view.wobble_axis);
            }
            _ => {
                if let Key::Character(text) = logical {
                    if let Some(ch) = text.chars().next() {
                        self.show_letter(ch);
                    }
                }
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing Letter Wave...");
        log::info!("Grid size: {}x{}", GRID_WIDTH, GRID_HEIGHT);

        // Create window
        let window_attrs = Window::default_attributes()
            .with_title("Letter Wave - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(900, 900));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // Initialize GPU
        log::info!("Creating GPU context...");
        let gpu = match pollster::block_on(GpuContext::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("GPU initialization failed: {}", e);
                event_loop.exit();
                return;
            }
        };

        log::info!("Creating board buffers...");
        let board_buffers = BoardBuffers::new(&gpu.device, GRID_WIDTH * GRID_HEIGHT);

        log::info!("Creating render pipeline...");
        let render_pipeline = RenderPipeline::new(&gpu.device, gpu.format(), &board_buffers);

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  A-Z: Show letter");
        log::info!("  Space: Random letter");
        log::info!("  Backspace: Clear board");
        log::info!("  Tab: New wobble axis");
        log::info!("  Escape: Quit");

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.board_buffers = Some(board_buffers);
        self.render_pipeline = Some(render_pipeline);

        self.last_frame = Instant::now();
        self.show_letter(INITIAL_LETTER);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() && !event.repeat {
                    if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                        log::info!("Escape pressed, exiting...");
                        event_loop.exit();
                    } else {
                        self.handle_key(event.physical_key, &event.logical_key);
                    }
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    gpu.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                // Request another frame immediately
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
