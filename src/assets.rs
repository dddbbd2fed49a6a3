//! Costume post-processing. Compiling the decompiled tree re-derives
//! rotation centers from asset dimensions, so art saved with an
//! off-center pivot is rewritten onto the full stage canvas.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use xmltree::Element;

use crate::sb3::Asset;

/// Assets shared between costumes are only rewritten once per run.
pub fn fix_center(costume: &Asset, path: &Path, recentered: &mut HashSet<String>) -> Result<()> {
    if !recentered.insert(costume.md5ext.clone()) {
        return Ok(());
    }
    if costume.data_format == "svg" {
        fix_vector_center(costume, path)
    } else {
        fix_bitmap_center(costume, path)
    }
}

fn fix_vector_center(costume: &Asset, path: &Path) -> Result<()> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
    let mut root = Element::parse(bytes.as_slice())
        .with_context(|| format!("'{}' is not valid SVG", path.display()))?;
    if dimension(&root, "width") / 2.0 == costume.rotation_center_x
        && dimension(&root, "height") / 2.0 == costume.rotation_center_y
    {
        return Ok(());
    }
    root.attributes.insert("width".to_string(), "480".to_string());
    root.attributes.insert("height".to_string(), "360".to_string());
    root.attributes
        .insert("viewBox".to_string(), "0,0,480,360".to_string());
    // The editor wraps content in a <g> whose transform re-applies the
    // old pivot; with the canvas normalized it must go.
    if let Some(group) = root.get_mut_child("g") {
        group.attributes.remove("transform");
    }
    let file = fs::File::create(path)
        .with_context(|| format!("failed to rewrite '{}'", path.display()))?;
    root.write(file)
        .with_context(|| format!("failed to serialize '{}'", path.display()))?;
    Ok(())
}

/// Bitmaps at double stage resolution get pasted onto a 960x720 canvas
/// so the pivot lands back at the canvas center.
fn fix_bitmap_center(costume: &Asset, path: &Path) -> Result<()> {
    let img = image::open(path)
        .with_context(|| format!("failed to decode bitmap '{}'", path.display()))?;
    if costume.rotation_center_x == f64::from(img.width() / 2)
        && costume.rotation_center_y == f64::from(img.height() / 2)
    {
        return Ok(());
    }
    let mut canvas = RgbaImage::new(960, 720);
    image::imageops::overlay(
        &mut canvas,
        &img.to_rgba8(),
        480 - costume.rotation_center_x as i64,
        360 - costume.rotation_center_y as i64,
    );
    let format = ImageFormat::from_extension(&costume.data_format).unwrap_or(ImageFormat::Png);
    // JPEG has no alpha channel.
    if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgba8(canvas)
            .to_rgb8()
            .save_with_format(path, format)
    } else {
        canvas.save_with_format(path, format)
    }
    .with_context(|| format!("failed to rewrite '{}'", path.display()))
}

fn dimension(root: &Element, name: &str) -> f64 {
    root.attributes
        .get(name)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0.0)
}
