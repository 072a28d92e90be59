//! Packed color helpers
//!
//! Every color inside the engine is a `u32` packed as
//! `B | G << 8 | R << 16 | A << 24`. Decoded images arrive as
//! `R | G << 8 | B << 16 | A << 24` and are repacked once at load time
//! with [`swap_red_blue`].

/// Build a packed color from channels
#[inline]
pub const fn pack(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16) | ((a as u32) << 24)
}

/// Opaque packed color
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    pack(r, g, b, 255)
}

/// Split a packed color into (r, g, b, a)
#[inline]
pub const fn unpack(color: u32) -> (u8, u8, u8, u8) {
    (
        ((color >> 16) & 0xff) as u8,
        ((color >> 8) & 0xff) as u8,
        (color & 0xff) as u8,
        (color >> 24) as u8,
    )
}

#[inline]
pub const fn alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

/// Exchange the first and third byte of a word.
/// Converts decoder order (R first) to engine order (B first) and back.
#[inline]
pub const fn swap_red_blue(color: u32) -> u32 {
    (color & 0xff00_ff00) | ((color & 0x0000_00ff) << 16) | ((color >> 16) & 0x0000_00ff)
}

/// Alpha blend a single color channel: `(1 - a) * dst + a * src`, rounded.
/// Exact at `alpha == 0` and `alpha == 255`.
#[inline]
pub fn blend_channel(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((src as u32 * a + dst as u32 * (255 - a) + 127) / 255) as u8
}

/// Composite `src` over `dst` using the source alpha byte.
/// The result carries no alpha; the framebuffer is always opaque.
#[inline]
pub fn blend_over(dst: u32, src: u32) -> u32 {
    let a = alpha(src);
    match a {
        0 => dst & 0x00ff_ffff,
        255 => src & 0x00ff_ffff,
        _ => {
            let (sr, sg, sb, _) = unpack(src);
            let (dr, dg, db, _) = unpack(dst);
            let r = blend_channel(sr, dr, a);
            let g = blend_channel(sg, dg, a);
            let b = blend_channel(sb, db, a);
            pack(r, g, b, 0)
        },
    }
}
