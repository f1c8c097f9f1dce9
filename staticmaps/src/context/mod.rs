//! Render context: viewport configuration, layers and objects.
//!
//! A [`Context`] is a mutable builder. Configure it with the setters, then
//! call one of the render methods. Rendering never mutates the context, so
//! the same context can be rendered again after further changes.
//!
//! # Pipeline
//!
//! 1. Resolve `(zoom, center)` from the bounding box, center or objects. A
//!    context with none of them fails with [`RenderError::NoCenter`] before
//!    any HTTP client is created.
//! 2. Build a [`Transformer`] and allocate a canvas covering its tile grid.
//! 3. Fill the background, draw the base layer, then each overlay layer.
//! 4. Draw the objects in the order they were added.
//! 5. Crop to the requested size and draw the attribution caption.
//!
//! # Example
//!
//! ```no_run
//! use staticmaps::color::Color;
//! use staticmaps::context::Context;
//! use staticmaps::coord::LatLng;
//! use staticmaps::objects::Marker;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ctx = Context::new();
//! ctx.set_size(640, 480);
//! ctx.add_object(Marker::new(LatLng::new(52.514, 13.35), Color::RED, 16.0));
//! let img = ctx.render().await?;
//! img.save("berlin.png")?;
//! # Ok(())
//! # }
//! ```

mod error;
mod resolve;

pub use error::RenderError;

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, info, warn};

use resolve::ViewportRequest;

use crate::cache::{SharedTileCache, StaticTileCache, TileCache};
use crate::color::Color;
use crate::config::{ConfigFile, ConfigFileError, DEFAULT_MAX_ZOOM, DEFAULT_SIZE, DEFAULT_USER_AGENT};
use crate::coord::{GeoRect, LatLng};
use crate::fetcher::TileFetcher;
use crate::objects::MapObject;
use crate::orchestrator;
use crate::provider::{AsyncHttpClient, AsyncReqwestClient, TileProvider};
use crate::render::{self, Canvas, TextRenderer};
use crate::transform::Transformer;

/// Name of the default cache below the user cache directory.
pub const DEFAULT_CACHE_NAME: &str = "tiles";

/// Static map render context.
pub struct Context {
    width: u32,
    height: u32,
    zoom: Option<u32>,
    max_zoom: u32,
    center: Option<LatLng>,
    bounding_box: Option<GeoRect>,
    background: Option<Color>,
    objects: Vec<Arc<dyn MapObject>>,
    tile_provider: Arc<TileProvider>,
    overlays: Vec<Arc<TileProvider>>,
    cache: Option<SharedTileCache>,
    online: bool,
    user_agent: String,
    attribution: Option<String>,
    text: Option<Arc<TextRenderer>>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("zoom", &self.zoom)
            .field("max_zoom", &self.max_zoom)
            .field("center", &self.center)
            .field("bounding_box", &self.bounding_box)
            .field("background", &self.background)
            .field("objects", &self.objects.len())
            .field("tile_provider", &self.tile_provider.name)
            .field(
                "overlays",
                &self.overlays.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            )
            .field("cache", &self.cache.as_ref().map(|c| c.path().to_path_buf()))
            .field("online", &self.online)
            .field("user_agent", &self.user_agent)
            .field("attribution", &self.attribution)
            .finish_non_exhaustive()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Creates a context with default settings: 512x512 pixels, the
    /// OpenStreetMap provider and a tile cache in the user cache directory.
    pub fn new() -> Self {
        let cache = StaticTileCache::from_user_cache(DEFAULT_CACHE_NAME, crate::cache::DEFAULT_CACHE_PERM)
            .map(|c| Arc::new(c) as SharedTileCache);
        if cache.is_none() {
            debug!("No user cache directory, tile caching disabled");
        }

        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            zoom: None,
            max_zoom: DEFAULT_MAX_ZOOM,
            center: None,
            bounding_box: None,
            background: None,
            objects: Vec::new(),
            tile_provider: Arc::new(TileProvider::default()),
            overlays: Vec::new(),
            cache,
            online: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            attribution: None,
            text: None,
        }
    }

    /// Creates a context from persistent configuration.
    pub fn from_config(config: &ConfigFile) -> Result<Self, ConfigFileError> {
        let mut ctx = Self::new();

        let name = config.provider.provider_type.as_str();
        let mut provider =
            TileProvider::lookup(name).ok_or_else(|| ConfigFileError::InvalidValue {
                section: "provider".to_string(),
                key: "type".to_string(),
                value: name.to_string(),
                reason: "unknown tile provider".to_string(),
            })?;
        if let Some(key) = &config.provider.api_key {
            provider = provider.with_api_key(key.clone());
        }
        ctx.set_tile_provider(provider);

        let cache = &config.cache;
        let shared = if !cache.enabled {
            None
        } else if let Some(dir) = &cache.directory {
            Some(Arc::new(StaticTileCache::new(dir.clone(), cache.permissions)) as SharedTileCache)
        } else {
            StaticTileCache::from_user_cache(DEFAULT_CACHE_NAME, cache.permissions)
                .map(|c| Arc::new(c) as SharedTileCache)
        };
        ctx.set_cache(shared);

        let render = &config.render;
        ctx.set_size(render.width, render.height)
            .set_max_zoom(render.max_zoom)
            .set_user_agent(render.user_agent.clone())
            .set_online(render.online);
        Ok(ctx)
    }

    /// Sets the output size in pixels.
    pub fn set_size(&mut self, width: u32, height: u32) -> &mut Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Fixes the zoom level instead of fitting it.
    pub fn set_zoom(&mut self, zoom: u32) -> &mut Self {
        self.zoom = Some(zoom);
        self
    }

    /// Upper bound for automatically chosen zoom levels.
    pub fn set_max_zoom(&mut self, max_zoom: u32) -> &mut Self {
        self.max_zoom = max_zoom;
        self
    }

    /// Fixes the map center.
    pub fn set_center(&mut self, center: LatLng) -> &mut Self {
        self.center = Some(center);
        self
    }

    /// Frames the map on `bbox`, overriding center and objects.
    pub fn set_bounding_box(&mut self, bbox: GeoRect) -> &mut Self {
        self.bounding_box = Some(bbox);
        self
    }

    /// Fills the canvas with `color` before any tiles are drawn.
    pub fn set_background(&mut self, color: Color) -> &mut Self {
        self.background = Some(color);
        self
    }

    /// Replaces the base tile layer.
    pub fn set_tile_provider(&mut self, provider: TileProvider) -> &mut Self {
        self.tile_provider = Arc::new(provider);
        self
    }

    /// Adds a tile layer drawn above the base layer.
    pub fn add_overlay(&mut self, provider: TileProvider) -> &mut Self {
        self.overlays.push(Arc::new(provider));
        self
    }

    /// Removes all overlay layers.
    pub fn clear_overlays(&mut self) -> &mut Self {
        self.overlays.clear();
        self
    }

    /// Replaces the tile cache; `None` disables caching.
    pub fn set_cache(&mut self, cache: Option<SharedTileCache>) -> &mut Self {
        self.cache = cache;
        self
    }

    /// When offline, only cached tiles are used.
    pub fn set_online(&mut self, online: bool) -> &mut Self {
        self.online = online;
        self
    }

    /// `User-Agent` sent with tile requests.
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Replaces the provider attribution. An empty string draws no caption.
    pub fn override_attribution(&mut self, attribution: impl Into<String>) -> &mut Self {
        self.attribution = Some(attribution.into());
        self
    }

    /// Uses a specific text renderer instead of the system font.
    pub fn set_text_renderer(&mut self, text: Arc<TextRenderer>) -> &mut Self {
        self.text = Some(text);
        self
    }

    /// Adds an object, drawn above all previously added ones.
    pub fn add_object<O: MapObject + 'static>(&mut self, object: O) -> &mut Self {
        self.objects.push(Arc::new(object));
        self
    }

    /// Adds an already shared object.
    pub fn add_shared_object(&mut self, object: Arc<dyn MapObject>) -> &mut Self {
        self.objects.push(object);
        self
    }

    /// Removes all objects.
    pub fn clear_objects(&mut self) -> &mut Self {
        self.objects.clear();
        self
    }

    /// Output size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn tile_provider(&self) -> &TileProvider {
        &self.tile_provider
    }

    pub fn overlays(&self) -> impl Iterator<Item = &TileProvider> {
        self.overlays.iter().map(|p| p.as_ref())
    }

    pub fn cache(&self) -> Option<&SharedTileCache> {
        self.cache.as_ref()
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn max_zoom(&self) -> u32 {
        self.max_zoom
    }

    /// Number of registered objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Caption drawn on the final image.
    pub fn attribution(&self) -> &str {
        self.attribution
            .as_deref()
            .unwrap_or(&self.tile_provider.attribution)
    }

    /// Resolves the viewport without rendering.
    pub fn determine_zoom_center(&self) -> Result<(u32, LatLng), RenderError> {
        ViewportRequest {
            width: self.width,
            height: self.height,
            tile_size: self.tile_provider.tile_size,
            max_zoom: self.max_zoom,
            zoom: self.zoom,
            center: self.center,
            bounding_box: self.bounding_box,
            caption_height: f64::from(render::attribution_height(self.attribution())),
            objects: &self.objects,
        }
        .resolve()
    }

    /// Renders the final image, fetching tiles over HTTPS.
    pub async fn render(&self) -> Result<RgbaImage, RenderError> {
        self.check_size()?;
        self.determine_zoom_center()?;
        let client = AsyncReqwestClient::new(&self.user_agent).map_err(RenderError::HttpClient)?;
        self.render_with_client(Arc::new(client)).await
    }

    /// Renders the final image using `client` for tile requests.
    pub async fn render_with_client<C>(&self, client: Arc<C>) -> Result<RgbaImage, RenderError>
    where
        C: AsyncHttpClient + 'static,
    {
        let (canvas, transformer) = self.render_canvas(client).await?;

        let (x, y) = transformer.crop_origin();
        let mut out = canvas.crop(x, y, self.width, self.height)?;
        render::draw_attribution(&mut out, self.attribution());
        out.into_rgba_image()
    }

    /// Renders the uncropped working canvas, without caption, and returns the
    /// transformer that placed everything on it.
    pub async fn render_with_transformer<C>(
        &self,
        client: Arc<C>,
    ) -> Result<(RgbaImage, Transformer), RenderError>
    where
        C: AsyncHttpClient + 'static,
    {
        let (canvas, transformer) = self.render_canvas(client).await?;
        Ok((canvas.into_rgba_image()?, transformer))
    }

    /// Renders the uncropped working canvas and returns the area it covers.
    pub async fn render_with_bounds<C>(
        &self,
        client: Arc<C>,
    ) -> Result<(RgbaImage, GeoRect), RenderError>
    where
        C: AsyncHttpClient + 'static,
    {
        let (img, transformer) = self.render_with_transformer(client).await?;
        Ok((img, transformer.rect()))
    }

    fn check_size(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    async fn render_canvas<C>(&self, client: Arc<C>) -> Result<(Canvas, Transformer), RenderError>
    where
        C: AsyncHttpClient + 'static,
    {
        self.check_size()?;
        let (zoom, center) = self.determine_zoom_center()?;
        let tile_size = self.tile_provider.tile_size;
        let transformer = Transformer::new(self.width, self.height, zoom, center, tile_size);
        info!(
            zoom = zoom,
            center = %center,
            width = self.width,
            height = self.height,
            provider = %self.tile_provider.name,
            "Rendering map"
        );

        let (pw, ph) = transformer.pixel_size();
        let text = self.text.clone().unwrap_or_else(TextRenderer::system);
        let mut canvas = Canvas::with_text_renderer(pw, ph, text)?;
        if let Some(bg) = self.background {
            canvas.fill(bg);
        }

        for provider in std::iter::once(&self.tile_provider).chain(&self.overlays) {
            if provider.tile_size != tile_size && !provider.is_none() {
                warn!(
                    provider = %provider.name,
                    tile_size = provider.tile_size,
                    base_tile_size = tile_size,
                    "Overlay tile size differs from the base layer, skipping"
                );
                continue;
            }
            let fetcher = TileFetcher::new(Arc::clone(provider), Arc::clone(&client))
                .with_cache(self.cache.clone())
                .with_online(self.online);
            orchestrator::render_layer(&fetcher, &transformer, &mut canvas).await;
        }

        for object in &self.objects {
            object.draw(&mut canvas, &transformer);
        }

        Ok((canvas, transformer))
    }
}
