// Sampler LibAV adapter - Frame sampling using libav decoding

use std::path::Path;

use async_trait::async_trait;
use ffmpeg_next as ffmpeg;
use image::RgbImage;
use tracing::{debug, info, warn};

use crate::domain::model::Frame;
use crate::engine::sampling::{sampling_stride, StrideSelector};
use crate::error::{ScreenError, ScreenResult};
use crate::ports::FrameSource;

/// LibAV-based frame sampler
pub struct SamplerLibavAdapter;

impl SamplerLibavAdapter {
    /// Create new LibAV sampler
    pub fn new() -> Self {
        Self
    }

    /// Sample frames synchronously. Any failure to open or decode the
    /// source yields the frames gathered so far (usually none).
    pub fn sample_blocking(video_path: &Path, interval_seconds: f64) -> Vec<Frame> {
        let mut frames = Vec::new();
        if let Err(e) = Self::decode_into(video_path, interval_seconds, &mut frames) {
            warn!(
                "Frame sampling stopped for {}: {} ({} frames kept)",
                video_path.display(),
                e,
                frames.len()
            );
        }
        info!("Sampled {} frames from {}", frames.len(), video_path.display());
        frames
    }

    fn decode_into(
        video_path: &Path,
        interval_seconds: f64,
        frames: &mut Vec<Frame>,
    ) -> ScreenResult<()> {
        ffmpeg::init()?;

        let mut ictx = ffmpeg::format::input(&video_path)?;

        let (stream_index, fps, parameters) = {
            let stream = ictx
                .streams()
                .best(ffmpeg::media::Type::Video)
                .ok_or_else(|| ScreenError::decode("no video stream found"))?;
            (stream.index(), Self::stream_fps(&stream), stream.parameters())
        };

        let stride = match sampling_stride(fps, interval_seconds) {
            Some(stride) => stride,
            None => {
                warn!("Unusable frame rate {} in {}", fps, video_path.display());
                return Ok(());
            }
        };
        debug!("fps={:.3} interval={}s stride={}", fps, interval_seconds, stride);

        let mut decoder = ffmpeg::codec::context::Context::from_parameters(parameters)?
            .decoder()
            .video()?;

        let mut selector = StrideSelector::new(stride);
        let mut scaler: Option<ffmpeg::software::scaling::Context> = None;

        for (stream, packet) in ictx.packets() {
            if stream.index() != stream_index {
                continue;
            }
            if let Err(e) = decoder.send_packet(&packet) {
                warn!("Skipping undecodable packet in {}: {}", video_path.display(), e);
                continue;
            }
            Self::drain_decoder(&mut decoder, &mut selector, &mut scaler, frames)?;
        }

        decoder.send_eof()?;
        Self::drain_decoder(&mut decoder, &mut selector, &mut scaler, frames)?;

        debug!("Decoded {} frames", selector.decoded());
        Ok(())
    }

    /// Pull every frame the decoder has ready, keeping the sampled ones
    fn drain_decoder(
        decoder: &mut ffmpeg::decoder::Video,
        selector: &mut StrideSelector,
        scaler: &mut Option<ffmpeg::software::scaling::Context>,
        frames: &mut Vec<Frame>,
    ) -> ScreenResult<()> {
        let mut decoded = ffmpeg::util::frame::video::Video::empty();
        while decoder.receive_frame(&mut decoded).is_ok() {
            let Some(ordinal) = selector.advance() else {
                continue;
            };

            if scaler.is_none() {
                *scaler = Some(ffmpeg::software::scaling::Context::get(
                    decoded.format(),
                    decoded.width(),
                    decoded.height(),
                    ffmpeg::format::Pixel::RGB24,
                    decoded.width(),
                    decoded.height(),
                    ffmpeg::software::scaling::Flags::BILINEAR,
                )?);
            }

            let mut rgb_frame = ffmpeg::util::frame::video::Video::empty();
            if let Some(scaler) = scaler.as_mut() {
                scaler.run(&decoded, &mut rgb_frame)?;
            }
            frames.push(Frame::new(ordinal, Self::to_rgb_image(&rgb_frame)?));
        }
        Ok(())
    }

    /// Average frame rate, falling back to the nominal rate
    fn stream_fps(stream: &ffmpeg::Stream) -> f64 {
        let average = stream.avg_frame_rate();
        if average.numerator() > 0 && average.denominator() > 0 {
            return f64::from(average);
        }
        let nominal = stream.rate();
        if nominal.numerator() > 0 && nominal.denominator() > 0 {
            f64::from(nominal)
        } else {
            0.0
        }
    }

    /// Copy an RGB24 frame into a tightly packed image, dropping row padding
    fn to_rgb_image(rgb_frame: &ffmpeg::util::frame::video::Video) -> ScreenResult<RgbImage> {
        let width = rgb_frame.width();
        let height = rgb_frame.height();
        let row_bytes = width as usize * 3;
        let stride = rgb_frame.stride(0);
        let data = rgb_frame.data(0);

        let mut pixels = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let start = row * stride;
            let end = start + row_bytes;
            if end > data.len() {
                return Err(ScreenError::decode("truncated RGB frame"));
            }
            pixels.extend_from_slice(&data[start..end]);
        }

        RgbImage::from_raw(width, height, pixels)
            .ok_or_else(|| ScreenError::decode("RGB buffer does not match frame size"))
    }
}

impl Default for SamplerLibavAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FrameSource for SamplerLibavAdapter {
    async fn sample_frames(&self, video_path: &Path, interval_seconds: f64) -> Vec<Frame> {
        let path = video_path.to_path_buf();
        match tokio::task::spawn_blocking(move || Self::sample_blocking(&path, interval_seconds))
            .await
        {
            Ok(frames) => frames,
            Err(e) => {
                warn!("Frame sampling task failed: {}", e);
                Vec::new()
            }
        }
    }
}
