//! Latent-to-RGB preview transform.

/// Affine map from 4 latent values to 8-bit RGB.
///
/// Each output channel is `k0*v0 + k1*v1 + k2*v2 + k3*v3 + bias`, truncated
/// toward zero and clamped to `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    pub coefficients: [[f32; 4]; 3],
    pub bias: [f32; 3],
}

/// Preview matrix for Stable Diffusion 1.x/2.x 4-channel latents.
///
/// Pinned to what the generation service produces; other latent families
/// need their own matrix.
pub const SD_LATENT_TO_RGB: ColorMatrix = ColorMatrix {
    coefficients: [
        [49.5210, 29.0283, -23.9673, -39.4981],
        [41.1373, 42.4951, 24.7349, -50.8279],
        [40.2919, 18.9304, 30.0236, -81.9976],
    ],
    bias: [99.9368, 99.8421, 99.5384],
};

impl ColorMatrix {
    #[inline]
    pub fn apply(&self, v: [f32; 4]) -> [u8; 3] {
        let mut out = [0u8; 3];
        for ((dst, k), bias) in out.iter_mut().zip(&self.coefficients).zip(self.bias) {
            let x = k[0] * v[0] + k[1] * v[1] + k[2] * v[2] + k[3] * v[3] + bias;
            *dst = truncate_to_u8(x);
        }
        out
    }
}

/// Truncate toward zero, then clamp to `[0, 255]`. NaN maps to 0.
// TODO: switch to round-to-nearest once the service side changes too.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn truncate_to_u8(x: f32) -> u8 {
    // `as` saturates and truncates toward zero.
    x.trunc().clamp(0.0, 255.0) as u8
}
