use std::{fs, path::Path};

use anyhow::{Context, Result};
use image::RgbImage;
use tensorx::{DecodedTensor, PixelBuffer};

pub fn encode_file(input: &Path, out: &Path) -> Result<()> {
    let rgb = image::open(input)
        .with_context(|| format!("Failed to read image {}", input.display()))?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    tracing::info!("Encoding {} ({width}x{height})", input.display());

    let pixels = PixelBuffer::new(width, height, rgb.into_raw())?;
    let bytes = tensorx::encode(&pixels);
    fs::write(out, &bytes).with_context(|| format!("Failed to write {}", out.display()))?;

    println!("Wrote {} ({} bytes)", out.display(), bytes.len());
    Ok(())
}

pub fn decode_file(input: &Path, out: &Path) -> Result<()> {
    let bytes =
        fs::read(input).with_context(|| format!("Failed to read tensor {}", input.display()))?;
    let tensor = DecodedTensor::parse(&bytes)
        .with_context(|| format!("Failed to decode tensor {}", input.display()))?;
    if tensor.is_latent() {
        tracing::info!("Input is a 4-channel latent; writing an approximate RGB preview");
    }

    let pixels = tensor.to_pixels();
    let (width, height) = (pixels.width(), pixels.height());
    let img = RgbImage::from_raw(width, height, pixels.into_raw())
        .context("Decoded pixel buffer does not match its dimensions")?;
    img.save(out)
        .with_context(|| format!("Failed to write image {}", out.display()))?;

    println!("Wrote {} ({width}x{height})", out.display());
    Ok(())
}
