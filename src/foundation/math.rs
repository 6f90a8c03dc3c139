pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Rec. 601 luma of a straight-alpha color, rounded to u8.
pub(crate) fn luminosity_u8(r: u8, g: u8, b: u8) -> u8 {
    let l = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    ((l + 500) / 1000).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
