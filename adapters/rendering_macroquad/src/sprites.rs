use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, ensure, Context, Result};
use macroquad::{
    color::Color as MacroquadColor,
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};
use tron_rider_rendering::SpriteKey;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;
const ALL_SPRITE_KEYS: [SpriteKey; 3] = [SpriteKey::Background, SpriteKey::Bike, SpriteKey::Wall];

/// Sprite files listed by a manifest, validated against the file system.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteManifest {
    entries: Vec<(SpriteKey, PathBuf)>,
}

impl SpriteManifest {
    /// Reads the manifest at `path` and checks that every listed sprite exists.
    ///
    /// Sprite paths are resolved relative to the manifest's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        for (key, path) in &entries {
            ensure!(
                path.is_file(),
                "sprite {key:?} references missing file {}",
                path.display()
            );
        }
        Ok(Self { entries })
    }

    /// Sprites in canonical key order.
    #[must_use]
    pub fn entries(&self) -> &[(SpriteKey, PathBuf)] {
        &self.entries
    }
}

/// Parameters describing how a sprite should be drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawParams {
    /// Screen-space position of the sprite's top-left corner.
    pub(crate) position: MacroquadVec2,
    /// Screen-space size.
    pub(crate) size: MacroquadVec2,
    /// Mirrors the sprite horizontally.
    pub(crate) flip_x: bool,
}

impl DrawParams {
    pub(crate) fn new(position: MacroquadVec2, size: MacroquadVec2) -> Self {
        Self {
            position,
            size,
            flip_x: false,
        }
    }

    pub(crate) fn flipped(mut self) -> Self {
        self.flip_x = true;
        self
    }
}

/// Cache of textures loaded from the sprite manifest.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Loads every sprite listed by the manifest.
    ///
    /// Requires an active macroquad context.
    pub(crate) fn load(manifest: &SpriteManifest) -> Result<Self> {
        Self::from_entries(manifest.entries(), &mut default_loader)
    }

    /// Draws the requested sprite; returns `false` when it is not loaded.
    pub(crate) fn draw(&self, key: SpriteKey, params: DrawParams) -> bool {
        let Some(texture) = self.texture(key) else {
            return false;
        };

        texture::draw_texture_ex(
            texture,
            params.position.x,
            params.position.y,
            MacroquadColor::new(1.0, 1.0, 1.0, 1.0),
            DrawTextureParams {
                dest_size: Some(params.size),
                flip_x: params.flip_x,
                ..DrawTextureParams::default()
            },
        );
        true
    }

    pub(crate) fn texture(&self, key: SpriteKey) -> Option<Texture2D> {
        self.textures.get(&key).copied()
    }

    fn from_entries(
        entries: &[(SpriteKey, PathBuf)],
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            let texture = loader(*key, path).with_context(|| {
                format!("failed to load sprite {key:?} from {}", path.display())
            })?;
            if textures.insert(*key, texture).is_some() {
                bail!("duplicate sprite entry for {key:?}");
            }
        }
        Ok(Self { textures })
    }
}

fn default_loader(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(SpriteKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let key = parse_sprite_key(&name)
            .with_context(|| format!("unknown sprite key `{name}` in manifest"))?;
        let path = base_path.join(relative_path);
        if resolved.insert(key, path).is_some() {
            bail!("sprite manifest contains duplicate entry for {key:?}");
        }
    }

    let mut ordered = Vec::with_capacity(ALL_SPRITE_KEYS.len());
    for key in ALL_SPRITE_KEYS {
        let Some(path) = resolved.remove(&key) else {
            bail!("sprite manifest missing entry for {key:?}");
        };
        ordered.push((key, path));
    }

    Ok(ordered)
}

fn parse_sprite_key(name: &str) -> Result<SpriteKey> {
    match name {
        "Background" => Ok(SpriteKey::Background),
        "Bike" => Ok(SpriteKey::Bike),
        "Wall" => Ok(SpriteKey::Wall),
        _ => bail!("unknown sprite key `{name}`"),
    }
}
