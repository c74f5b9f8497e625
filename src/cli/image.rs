//! `oai image`: generate images and write them to disk.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::api::OpenAiClient;

/// Request `n` images of `size` pixels square and write them next to `output`.
pub fn generate(
    client: &OpenAiClient,
    prompt: &str,
    size: &str,
    n: u8,
    output: &Path,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let images = client.generate_images(prompt, &dimensions(size), n)?;
    debug!(count = images.len(), "received images");
    Ok(write_images(&images, output)?)
}

/// `512` becomes `512x512`; values already in `WxH` form pass through.
fn dimensions(size: &str) -> String {
    if size.contains('x') {
        size.to_string()
    } else {
        format!("{size}x{size}")
    }
}

/// Where image `index` of `count` goes: `output` itself for a single image,
/// otherwise `name-<index>.ext` starting from 1.
fn numbered_path(output: &Path, index: usize, count: usize) -> PathBuf {
    if count <= 1 {
        return output.to_path_buf();
    }
    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let name = match output.extension() {
        Some(ext) => format!("{stem}-{index}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{index}"),
    };
    output.with_file_name(name)
}

fn write_images(images: &[Vec<u8>], output: &Path) -> std::io::Result<Vec<PathBuf>> {
    images
        .iter()
        .enumerate()
        .map(|(i, bytes)| {
            let path = numbered_path(output, i + 1, images.len());
            fs::write(&path, bytes)?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sizes_expand_to_square_dimensions() {
        assert_eq!(dimensions("256"), "256x256");
        assert_eq!(dimensions("1024x1024"), "1024x1024");
    }

    #[test]
    fn single_image_uses_output_path() {
        let output = Path::new("out/cat.png");
        assert_eq!(numbered_path(output, 1, 1), PathBuf::from("out/cat.png"));
    }

    #[test]
    fn multiple_images_are_numbered_before_extension() {
        let output = Path::new("out/cat.png");
        assert_eq!(numbered_path(output, 2, 3), PathBuf::from("out/cat-2.png"));
        assert_eq!(
            numbered_path(Path::new("cat"), 1, 2),
            PathBuf::from("cat-1")
        );
    }

    #[test]
    fn writes_every_image() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("cat.png");
        let images = vec![b"one".to_vec(), b"two".to_vec()];

        let written = write_images(&images, &output).unwrap();
        assert_eq!(
            written,
            vec![temp_dir.path().join("cat-1.png"), temp_dir.path().join("cat-2.png")]
        );
        assert_eq!(fs::read(&written[1]).unwrap(), b"two");
    }
}
