pub mod image_helper {
    use crate::error::{Result, SizerError};
    use image::{ImageBuffer, ImageEncoder, ImageReader, Rgba};
    use std::path::Path;

    /// A decoded map at 16 bits per channel.
    pub type WideMap = ImageBuffer<Rgba<u16>, Vec<u16>>;

    /// Opens and decodes a map image, widening it to 16-bit RGBA.
    /// Channels stay straight (not premultiplied by alpha).
    ///
    /// The format is sniffed from the file contents, so a mislabelled extension
    /// still decodes.
    pub fn load_map(path: &Path) -> Result<WideMap> {
        let open_error = |source| SizerError::ResourceOpen {
            path: path.to_path_buf(),
            source,
        };
        let reader = ImageReader::open(path)
            .map_err(open_error)?
            .with_guessed_format()
            .map_err(open_error)?;
        let decoded = reader.decode().map_err(|source| SizerError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "Loaded map"
        );
        Ok(decoded.to_rgba16())
    }

    /// Writes a tightly packed RGBA8 buffer as a PNG.
    pub fn save(
        path: &Path,
        width: u32,
        height: u32,
        buffer: &[u8],
    ) -> std::result::Result<(), image::error::ImageError> {
        let output = std::fs::File::create(path)?;
        let encoder = image::codecs::png::PngEncoder::new(output);

        encoder.write_image(buffer, width, height, image::ExtendedColorType::Rgba8)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::image_helper::*;
    use crate::core_modules::color::color::Color;
    use crate::core_modules::pixel_grid::PixelGrid;
    use crate::error::SizerError;
    use tempfile::TempDir;

    #[test]
    fn save_then_load_keeps_8bit_colors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bands.png");
        let width = 3u32;
        let height = 2u32;
        let mut buffer = vec![255u8; (width * height * 4) as usize];
        for (i, pixel) in buffer.chunks_mut(4).enumerate() {
            pixel[0] = (i * 40) as u8;
            pixel[1] = 200;
            pixel[2] = 7;
        }

        save(&path, width, height, &buffer).expect("Error Saving File.");
        let map = load_map(&path).unwrap();

        assert_eq!(PixelGrid::width(&map), 3);
        assert_eq!(PixelGrid::height(&map), 2);
        assert_eq!(map.sample(0, 0), Color::new(0, 200, 7, 255));
        assert_eq!(map.sample(2, 1), Color::new(200, 200, 7, 255));
    }

    #[test]
    fn translucent_pixels_keep_straight_channels() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("haze.png");
        save(&path, 1, 1, &[255, 255, 255, 210]).unwrap();
        let map = load_map(&path).unwrap();

        let sample = map.sample(0, 0);
        assert_eq!(sample, Color::new(255, 255, 255, 210));
        // Premultiplied this would be about (210, 210, 210) and match.
        assert!(!sample.approx_eq(&Color::opaque(200, 200, 200), 50));
    }

    #[test]
    fn missing_file_is_a_resource_error() {
        let dir = TempDir::new().unwrap();
        let err = load_map(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, SizerError::ResourceOpen { .. }), "{err:?}");
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        let err = load_map(&path).unwrap_err();
        assert!(matches!(err, SizerError::ImageDecode { .. }), "{err:?}");
    }
}
