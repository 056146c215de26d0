use crate::error::{Result, RuntimeError};
use image::ImageReader;
use nametag_engine::{FontBook, FontWeight, Template};
use std::io::Cursor;
use std::path::Path;

/// Load an image template, reading its intrinsic pixel size.
///
/// The template id defaults to the file stem.
pub async fn load_template(path: impl AsRef<Path>, id: Option<String>) -> Result<Template> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string());
    let id = id.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone())
    });

    let (bytes, (width, height)) = tokio::task::spawn_blocking(move || {
        let dimensions = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()?
            .into_dimensions()?;
        Ok::<_, RuntimeError>((bytes, dimensions))
    })
    .await??;

    log::info!("Loaded template '{}' ({}x{})", id, width, height);
    Ok(Template::image(id, name, bytes, width, height))
}

/// Read a TrueType/OpenType file into `fonts` under `family`.
pub async fn load_font(
    fonts: &mut FontBook,
    family: &str,
    weight: FontWeight,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    fonts
        .register(family, weight, bytes)
        .map_err(|e| RuntimeError::Font(format!("{}: {}", path.display(), e)))?;
    Ok(())
}
