//! Stage demo application
//!
//! Boots the engine on the software canvas, loads the textures and fonts named
//! in a config file, draws one frame of shadowed and centered text and writes
//! it to a PNG.
//!
//! Usage: `stage_demo [demo.toml]`

use serde::{Deserialize, Serialize};
use stage_engine::foundation::logging;
use stage_engine::prelude::*;
use stage_engine::text::FontId;
use std::path::PathBuf;
use thiserror::Error;

/// Demo configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct DemoConfig {
    /// Engine setup (window, asset folders, log level)
    engine: EngineConfig,
    /// Framebuffer size
    target_width: u32,
    target_height: u32,
    /// Images drawn along the top edge, relative to the images folder
    textures: Vec<PathBuf>,
    /// Font descriptors, relative to the fonts folder
    fonts: Vec<PathBuf>,
    /// Text drawn with every font
    message: String,
    /// Where the frame is written
    output: PathBuf,
    /// Optional settings file (volumes, fullscreen)
    settings: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::new("Stage Demo").with_assets(AssetConfig::new("assets")),
            target_width: 1280,
            target_height: 720,
            textures: Vec::new(),
            fonts: vec![PathBuf::from("main.ron")],
            message: "Hello World\nAV To Wa".to_string(),
            output: PathBuf::from("frame.png"),
            settings: None,
        }
    }
}

impl Config for DemoConfig {}

#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] stage_engine::config::ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to write frame: {0}")]
    Output(String),
}

struct StageDemo {
    engine: Engine<SoftwareCanvas>,
    config: DemoConfig,
    fonts: Vec<FontId>,
    textures: Vec<TextureId>,
}

impl StageDemo {
    fn new(config: DemoConfig) -> Result<Self, DemoError> {
        let canvas = SoftwareCanvas::new(config.target_width, config.target_height);
        let mut engine = Engine::new(config.engine.clone(), canvas)?;

        if let Some(path) = &config.settings {
            if let Err(e) = engine.load_settings(path) {
                log::warn!("Using default settings: {}", e);
            }
        }

        Ok(Self {
            engine,
            config,
            fonts: Vec::new(),
            textures: Vec::new(),
        })
    }

    fn load_assets(&mut self) -> Result<(), DemoError> {
        let loaded = self
            .engine
            .load_textures(&self.config.textures)
            .map_err(EngineError::from)?;
        self.textures = (0..loaded as i64)
            .map(|i| self.engine.texture_id(i))
            .collect::<Result<_, _>>()
            .map_err(EngineError::from)?;

        let loaded = self.engine.load_fonts(&self.config.fonts).map_err(EngineError::from)?;
        self.fonts = (0..loaded as i64)
            .map(|i| self.engine.font_id(i))
            .collect::<Result<_, _>>()
            .map_err(EngineError::from)?;

        log::info!("Loaded {} textures and {} fonts", self.textures.len(), self.fonts.len());
        Ok(())
    }

    fn draw_frame(&mut self) -> Result<(), DemoError> {
        self.engine.backend_mut().clear(Color::rgb(32, 32, 48));
        let logical = self.engine.dispatcher().logical_size();

        let mut x = 16.0;
        for (i, &texture) in self.textures.iter().enumerate() {
            let width = self.engine.texture_by_id(texture).map_err(EngineError::from)?.width as f32;
            if i % 2 == 0 {
                self.engine.draw_texture(texture, x, 16.0)?;
            } else {
                self.engine.draw_texture_rotated(texture, x, 16.0, 15.0)?;
            }
            x += width + 16.0;
        }

        let mut y = logical.y / 3.0;
        for &font in &self.fonts {
            let width = self.engine.text_width(&self.config.message, font).map_err(EngineError::from)?;
            log::debug!("Message is {} px wide", width);

            self.engine.draw_text_ext(
                &self.config.message,
                font,
                Color::rgb(255, 220, 120),
                TextStyle::SHADOW | TextStyle::CENTER,
                logical.x / 2.0,
                y,
            )?;
            self.engine
                .draw_text_scaled(&self.config.message, font, 0.5, 16.0, logical.y - 64.0)?;
            y += 96.0;
        }
        Ok(())
    }

    fn save(&self) -> Result<(), DemoError> {
        self.engine
            .backend()
            .save_png(&self.config.output)
            .map_err(|e| DemoError::Output(e.to_string()))?;
        log::info!("Wrote {}", self.config.output.display());
        Ok(())
    }
}

fn run() -> Result<(), DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => DemoConfig::load_from_file(&path)?,
        None => DemoConfig::default(),
    };
    logging::init(&config.engine.log_level);
    log::info!("Starting stage demo");

    let mut demo = StageDemo::new(config)?;
    demo.load_assets()?;
    demo.draw_frame()?;
    demo.save()
}

fn main() {
    if let Err(e) = run() {
        eprintln!("stage_demo: {e}");
        std::process::exit(1);
    }
}
