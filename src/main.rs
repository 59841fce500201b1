use std::error::Error;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use clap::Parser;
use glow::HasContext;
use glutin::config::{ ConfigTemplateBuilder, GlConfig };
use glutin::context::{ ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version };
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{ Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface };
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ ActiveEventLoop, EventLoop };
use winit::keyboard::PhysicalKey;
use winit::window::{ Window, WindowId };

use gl_chapters::chapters::{ self, Chapter, ChapterEntry, InputAction, LoopFeedback, CHAPTERS };
use gl_chapters::engine::backend::report_errors;
use gl_chapters::engine::config::AppConfig;
use gl_chapters::engine::systems::input_system::{ apply_cursor_capture, InputSystem };

#[derive(Parser, Debug)]
#[command(name = "gl-chapters", version, about = "Runs one OpenGL tutorial chapter")]
struct Cli {
    /// List the available chapters and exit
    #[arg(long)]
    list: bool,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Chapter to run
    #[arg(default_value = "hello-triangle")]
    chapter: String,
}

// Fields drop in declaration order: the chapter's GPU objects go before the
// context that owns them.
struct Graphics {
    chapter: Box<dyn Chapter>,
    gl: Rc<glow::Context>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

struct App {
    entry: &'static ChapterEntry,
    config: AppConfig,
    graphics: Option<Graphics>,
    input: InputSystem,
    pending: Vec<InputAction>,
    start_time: Option<Instant>,
    error: Option<Box<dyn Error>>,
}

fn non_zero(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN)
}

impl App {
    fn new(entry: &'static ChapterEntry, config: AppConfig) -> Self {
        Self {
            entry,
            config,
            graphics: None,
            input: InputSystem::new(),
            pending: Vec::new(),
            start_time: None,
            error: None,
        }
    }

    fn create_graphics(&self, event_loop: &ActiveEventLoop) -> Result<Graphics, Box<dyn Error>> {
        let window_config = &self.config.window;
        let title = window_config.title
            .clone()
            .unwrap_or_else(|| format!("gl-chapters: {}", self.entry.name));
        let attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(window_config.width, window_config.height));

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, template, |configs| {
                // glutin never calls the picker with an empty list
                configs
                    .max_by_key(|config| config.num_samples())
                    .expect("display offered no OpenGL configuration")
            })?;
        let window = window.ok_or("window creation failed")?;
        let raw_handle = window.window_handle()?.as_raw();

        let [major, minor] = window_config.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(raw_handle));

        let display = gl_config.display();
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes)? };

        let size = window.inner_size();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>
            ::new()
            .build(raw_handle, non_zero(size.width), non_zero(size.height));
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes)? };
        let context = not_current.make_current(&surface)?;

        let interval = if window_config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            log::warn!("could not set swap interval: {}", e);
        }

        let gl = unsafe { glow::Context::from_loader_function_cstr(|s| display.get_proc_address(s)) };
        let version = gl.version();
        log::info!("OpenGL {}.{} {}", version.major, version.minor, version.vendor_info);
        unsafe {
            gl.viewport(0, 0, size.width as i32, size.height as i32);
        }

        let gl = Rc::new(gl);
        let chapter = (self.entry.bootstrap)(gl.clone(), &self.config)?;
        log::info!("started chapter {}", self.entry.name);

        Ok(Graphics { chapter, gl, surface, context, window })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(graphics) = &mut self.graphics else {
            return;
        };

        let mut actions = std::mem::take(&mut self.pending);
        actions.extend(self.input.frame_actions());

        let time = self.start_time.map_or(0.0, |start| start.elapsed().as_secs_f32());
        let feedback = graphics.chapter.render_frame(time, &actions);
        report_errors(graphics.gl.as_ref());

        if let Err(e) = graphics.surface.swap_buffers(&graphics.context) {
            log::error!("swap_buffers failed: {}", e);
        }

        match feedback {
            LoopFeedback::Continue => graphics.window.request_redraw(),
            LoopFeedback::Exit => event_loop.exit(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        match self.create_graphics(event_loop) {
            Ok(graphics) => {
                let size = graphics.window.inner_size();
                self.pending.push(InputAction::Resized { width: size.width, height: size.height });
                self.start_time = Some(Instant::now());
                graphics.window.request_redraw();
                self.graphics = Some(graphics);
            }
            Err(e) => {
                log::error!("could not start chapter {}: {}", self.entry.name, e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            WindowEvent::Resized(size) => {
                if let Some(graphics) = &self.graphics {
                    if size.width > 0 && size.height > 0 {
                        graphics.surface.resize(&graphics.context, non_zero(size.width), non_zero(size.height));
                        self.pending.push(InputAction::Resized { width: size.width, height: size.height });
                    }
                    graphics.window.request_redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(action) = self.input.receive_key(code, event.state, event.repeat) {
                        if let (InputAction::CursorCaptured(captured), Some(graphics)) = (action, &self.graphics) {
                            apply_cursor_capture(&graphics.window, captured);
                        }
                        self.pending.push(action);
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(action) = self.input.receive_cursor(position.x, position.y) {
                    self.pending.push(action);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.pending.push(self.input.receive_scroll(delta));
            }

            WindowEvent::Focused(false) => self.input.clear(),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // release the chapter while its context is still current
        self.graphics = None;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().filter_level(log::LevelFilter::Info).parse_default_env().init();

    let cli = Cli::parse();
    if cli.list {
        for entry in CHAPTERS {
            println!("{:<16} {}", entry.name, entry.description);
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let entry = chapters::find(&cli.chapter)?;
    log::info!("running chapter {}", entry.name);

    let event_loop = EventLoop::new()?;
    let mut app = App::new(entry, config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
