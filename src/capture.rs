//! Still-capture seam.
//!
//! The camera is a collaborator: the kernel only needs one encoded
//! still per capture request. Real devices sit behind
//! [`CaptureSource`]; `StubCamera` produces deterministic synthetic
//! stills for tests and the demo binary.

use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::classify::EncodedCapture;

/// One captured still, as compressed (JPEG) bytes.
#[derive(Clone, Debug)]
pub struct CapturedImage {
    pub jpeg: Vec<u8>,
}

impl CapturedImage {
    /// Encode for transport to the Classifier Service.
    pub fn encode(&self) -> EncodedCapture {
        EncodedCapture {
            image_data: BASE64.encode(&self.jpeg),
        }
    }
}

/// Camera seam. `capture_still` blocks briefly on real hardware.
pub trait CaptureSource {
    /// True once the device can take a picture.
    fn is_ready(&self) -> bool;

    /// Take one still.
    fn capture_still(&mut self) -> Result<CapturedImage>;
}

/// Deterministic synthetic camera.
///
/// Emits a small byte pattern that varies per capture so downstream
/// consumers see distinct payloads. Not a decodable JPEG; the stub
/// classifier never decodes it.
pub struct StubCamera {
    captures: u64,
}

impl StubCamera {
    pub fn new() -> Self {
        Self { captures: 0 }
    }

    pub fn captures(&self) -> u64 {
        self.captures
    }
}

impl Default for StubCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSource for StubCamera {
    fn is_ready(&self) -> bool {
        true
    }

    fn capture_still(&mut self) -> Result<CapturedImage> {
        self.captures += 1;
        let mut jpeg = vec![0xFF, 0xD8];
        jpeg.extend(self.captures.to_be_bytes());
        jpeg.extend([0xFF, 0xD9]);
        Ok(CapturedImage { jpeg })
    }
}
