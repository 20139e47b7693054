use base64::{engine::general_purpose, Engine as _};
use image::GenericImageView;
use serde::{Deserialize, Serialize};

/// Decoded official artwork. `payload` keeps the original PNG bytes, base64 encoded,
/// ready for the kitty graphics protocol (format 100).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub payload: String,
    pub width: u32,
    pub height: u32,
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[error("Image not available: {reason}")]
pub struct ArtworkUnavailable {
    pub reason: String,
}

impl ArtworkUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub fn artwork_url(base: &str, id: u32) -> String {
    format!("{}/{id}.png", base.trim_end_matches('/'))
}

pub fn decode_artwork(bytes: &[u8]) -> Result<Artwork, ArtworkUnavailable> {
    let image =
        image::load_from_memory(bytes).map_err(|err| ArtworkUnavailable::new(err.to_string()))?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ArtworkUnavailable::new("empty image"));
    }
    Ok(Artwork {
        payload: general_purpose::STANDARD.encode(bytes),
        width,
        height,
    })
}

pub fn kitty_sequence(artwork: &Artwork, cols: u16, rows: u16) -> Result<String, String> {
    let mut sequences = String::new();
    let chunk_size = 4096;
    let payload = artwork.payload.as_bytes();
    let total_chunks = payload.len().div_ceil(chunk_size);

    for (index, chunk) in payload.chunks(chunk_size).enumerate() {
        let more = index + 1 < total_chunks;
        let chunk_str = std::str::from_utf8(chunk).map_err(|err| err.to_string())?;
        if index == 0 {
            let mut params = format!(
                "f=100,s={},v={},a=T,t=d,q=2",
                artwork.width, artwork.height
            );
            if cols > 0 {
                params.push_str(&format!(",c={cols}"));
            }
            if rows > 0 {
                params.push_str(&format!(",r={rows}"));
            }
            params.push_str(&format!(",m={}", if more { 1 } else { 0 }));
            sequences.push_str(&format!("\x1b_G{params};{chunk_str}\x1b\\"));
        } else {
            sequences.push_str(&format!(
                "\x1b_Gm={};{chunk_str}\x1b\\",
                if more { 1 } else { 0 }
            ));
        }
    }
    Ok(sequences)
}
