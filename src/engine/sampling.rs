//! Frame sampling arithmetic
//!
//! A video is sampled at a fixed wall-clock interval by keeping every
//! `stride`-th decoded frame, where `stride = max(1, round(fps * interval))`.
//! Ordinals are decode positions, counted sequentially; timestamps are not
//! consulted.

/// Number of decoded frames between two samples.
///
/// `None` when the frame rate or interval is not a positive finite number,
/// which callers treat as "nothing to sample".
pub fn sampling_stride(fps: f64, interval_seconds: f64) -> Option<usize> {
    if !fps.is_finite() || fps <= 0.0 {
        return None;
    }
    if !interval_seconds.is_finite() || interval_seconds <= 0.0 {
        return None;
    }

    let stride = (fps * interval_seconds).round();
    Some((stride as usize).max(1))
}

/// Decides, frame by frame in decode order, which frames to keep
#[derive(Debug, Clone)]
pub struct StrideSelector {
    stride: usize,
    position: usize,
}

impl StrideSelector {
    pub fn new(stride: usize) -> Self {
        Self {
            stride: stride.max(1),
            position: 0,
        }
    }

    /// Advance past one decoded frame; returns its ordinal if it is sampled
    pub fn advance(&mut self) -> Option<usize> {
        let ordinal = self.position;
        self.position += 1;
        (ordinal % self.stride == 0).then_some(ordinal)
    }

    /// Frames seen so far
    pub fn decoded(&self) -> usize {
        self.position
    }

    pub fn stride(&self) -> usize {
        self.stride
    }
}

/// Sample an in-memory sequence, pairing each kept item with its ordinal
pub fn sample_sequence<T, I>(items: I, stride: usize) -> Vec<(usize, T)>
where
    I: IntoIterator<Item = T>,
{
    let mut selector = StrideSelector::new(stride);
    items
        .into_iter()
        .filter_map(|item| selector.advance().map(|ordinal| (ordinal, item)))
        .collect()
}
