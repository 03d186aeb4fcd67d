/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard_u8(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    (0..height)
        .flat_map(|y| (0..width).map(move |x| ((x / cell + y / cell) & 1) as usize))
        .map(|parity| if parity == 0 { 32u8 } else { 220u8 })
        .collect()
}

/// `background` image with a `side × side` square of `foreground` at
/// `(x0, y0)`.
pub fn square_u8(
    width: usize,
    height: usize,
    (x0, y0): (usize, usize),
    side: usize,
    background: u8,
    foreground: u8,
) -> Vec<u8> {
    assert!(x0 + side <= width && y0 + side <= height, "square must fit");
    let mut img = vec![background; width * height];
    for row in img.chunks_exact_mut(width).skip(y0).take(side) {
        row[x0..x0 + side].fill(foreground);
    }
    img
}

/// Deterministic pseudo-random bytes (xorshift), for brute-force checks.
pub fn noise_u8(width: usize, height: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.max(1);
    (0..width * height)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}
