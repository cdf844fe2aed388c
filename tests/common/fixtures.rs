//! Test fixtures: small maps and claim tables written to a temporary directory.

use claim_sizer::core_modules::utils::image_helper::image_helper::save;
use std::path::PathBuf;
use tempfile::TempDir;

/// Claim table matching the 2x2 primaries map. Columns are name, red, blue, green, class.
pub const PRIMARY_CLAIMS: &str = "\
name,red,blue,green,class
Red,200,0,0,1
Green,0,0,200,2
Blue,0,200,0,3
";

/// The 2x2 map as (x, y, rgba) entries.
pub const PRIMARY_PIXELS: [(u32, u32, [u8; 4]); 4] = [
    (0, 0, [200, 0, 0, 255]),
    (0, 1, [210, 5, 0, 255]),
    (1, 0, [0, 200, 0, 255]),
    (1, 1, [0, 0, 200, 255]),
];

/// A scratch directory holding one map and one claim table.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes an RGBA8 PNG from sparse pixels; unspecified pixels use `background`.
    pub fn write_map(
        &self,
        name: &str,
        width: u32,
        height: u32,
        background: [u8; 4],
        pixels: &[(u32, u32, [u8; 4])],
    ) -> PathBuf {
        let mut buffer: Vec<u8> = background
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        for (x, y, rgba) in pixels {
            let offset = ((y * width + x) * 4) as usize;
            buffer[offset..offset + 4].copy_from_slice(rgba);
        }
        let path = self.path(name);
        save(&path, width, height, &buffer).expect("write map");
        path
    }

    pub fn write_text(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).expect("write text fixture");
        path
    }

    /// The 2x2 primaries map plus its claim table.
    pub fn primaries(&self) -> (PathBuf, PathBuf) {
        let map = self.write_map("map.png", 2, 2, [0, 0, 0, 255], &PRIMARY_PIXELS);
        let claims = self.write_text("claims.csv", PRIMARY_CLAIMS);
        (map, claims)
    }
}
