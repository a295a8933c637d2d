/// Precompute a normalised 1D Gaussian kernel of the given size.
///
/// `kernel_size` must be odd and >= 1. Sigma follows the sigma=0 convention
/// of deriving it from the kernel size:
/// `sigma = 0.3 * ((kernel_size - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_kernel_1d(kernel_size: usize) -> Vec<f32> {
    debug_assert!(kernel_size >= 1 && kernel_size % 2 == 1);
    let sigma = 0.3 * ((kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let half = (kernel_size / 2) as f64;
    let mut kernel_f64: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel_f64.iter().sum();
    for v in &mut kernel_f64 {
        *v /= sum;
    }
    kernel_f64.iter().map(|&v| v as f32).collect()
}

/// Maps an out-of-range coordinate back inside `0..len` by mirroring
/// around the edge pixel (`gfedcb|abcdefgh|gfedcba`).
fn reflect_101(mut i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    loop {
        if i < 0 {
            i = -i;
        } else if i > last {
            i = 2 * last - i;
        } else {
            return i as usize;
        }
    }
}

/// Convenience wrapper that builds both kernels and its own temp buffer.
#[cfg(test)]
pub fn gaussian_blur(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel_size: (usize, usize),
) {
    let kernel_x = gaussian_kernel_1d(kernel_size.0);
    let kernel_y = gaussian_kernel_1d(kernel_size.1);
    let mut temp = Vec::new();
    separable_gaussian_blur(data, width, height, channels, &kernel_x, &kernel_y, &mut temp);
}

/// Apply a separable Gaussian blur in place with independent horizontal
/// (`kernel_x`) and vertical (`kernel_y`) kernels, reusing `temp`.
///
/// Borders are reflected without repeating the edge pixel. The buffer keeps
/// its dimensions; empty images are left untouched.
pub fn separable_gaussian_blur(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel_x: &[f32],
    kernel_y: &[f32],
    temp: &mut Vec<f32>,
) {
    if width == 0 || height == 0 {
        return;
    }
    let half_x = (kernel_x.len() / 2) as isize;
    let half_y = (kernel_y.len() / 2) as isize;

    temp.resize(width * height * channels, 0.0);

    let columns: Vec<Vec<usize>> = (0..width)
        .map(|x| {
            (0..kernel_x.len())
                .map(|k| reflect_101(x as isize + k as isize - half_x, width))
                .collect()
        })
        .collect();

    // Horizontal pass: data → temp
    for y in 0..height {
        let row = y * width;
        for (x, taps) in columns.iter().enumerate() {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (&sx, &w) in taps.iter().zip(kernel_x) {
                    sum += data[(row + sx) * channels + c] as f32 * w;
                }
                temp[(row + x) * channels + c] = sum;
            }
        }
    }

    let rows: Vec<Vec<usize>> = (0..height)
        .map(|y| {
            (0..kernel_y.len())
                .map(|k| reflect_101(y as isize + k as isize - half_y, height))
                .collect()
        })
        .collect();

    // Vertical pass: temp → data
    for (y, taps) in rows.iter().enumerate() {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (&sy, &w) in taps.iter().zip(kernel_y) {
                    sum += temp[(sy * width + x) * channels + c] * w;
                }
                data[(y * width + x) * channels + c] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}
