use hudsnap_core::{AppConfig, AppConfigExt, FrameOutput, OverlayHost, PositionStore};
use hudsnap_overlay::{GuideStyle, HeadlessSurface, Scene};

/// Everything the REPL drives: config, the engine and a headless surface
pub struct ReplContext {
    pub config: AppConfig,
    pub host: OverlayHost<PositionStore>,
    pub scene: Scene<HeadlessSurface>,
}

impl ReplContext {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::load();
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Result<Self, String> {
        let host = match OverlayHost::with_store(&config) {
            Ok(host) => host,
            Err(e) => {
                let fallback = std::env::temp_dir().join("hudsnap").join("layout.json");
                tracing::warn!(error = %e, path = ?fallback, "Using temporary layout file");
                OverlayHost::new(&config, PositionStore::new(fallback))
            }
        };

        let container = host.container();
        let surface = HeadlessSurface::new(
            container.width.ceil() as u32,
            container.height.ceil() as u32,
        )
        .map_err(|e| e.to_string())?;
        let mut scene = Scene::new(surface, GuideStyle::from_settings(&config.layout));
        scene.render_full(&host);
        scene.sync_input(&host);

        Ok(Self {
            config,
            host,
            scene,
        })
    }

    /// Paint pending damage and push input state. Queued drag moves are
    /// left for an explicit frame.
    pub fn settle(&mut self) {
        if !self.host.needs_frame() {
            self.scene.present(&mut self.host);
        }
        self.scene.sync_input(&self.host);
    }

    /// Run one paint frame
    pub fn frame(&mut self) -> FrameOutput {
        let output = self.scene.present(&mut self.host);
        self.scene.sync_input(&self.host);
        output
    }
}
