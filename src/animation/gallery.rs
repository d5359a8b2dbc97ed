/// Opacity of each of `count` stacked gallery images at `progress`.
///
/// The gallery pages through images as progress advances: the current image fades out while the
/// next fades in, everything else stays hidden. At or before progress 0 the first image is fully
/// shown.
pub fn gallery_opacities(progress: f64, count: usize) -> Vec<f64> {
    let mut out = vec![0.0; count];
    if count == 0 {
        return out;
    }
    if progress.is_nan() || progress <= 0.0 {
        out[0] = 1.0;
        return out;
    }

    let scaled = progress.min(1.0) * count as f64;
    let current = (scaled.floor() as usize).min(count - 1);
    let next = (current + 1).min(count - 1);
    if next == current {
        // Nothing left to fade toward.
        out[current] = 1.0;
        return out;
    }

    let local = scaled - scaled.floor();
    out[current] = 1.0 - local;
    out[next] = local;
    out
}
