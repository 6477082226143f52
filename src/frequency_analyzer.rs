use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::collections::VecDeque;
use std::sync::Arc;

// Configuration constants
const MAGNITUDE_AMPLIFICATION: f32 = 4.0; // Boost quiet input into the visible byte range
const MAX_BYTE: f32 = 255.0; // Upper bound of a bin amplitude

/// One frequency-domain snapshot of the microphone signal: ordered byte
/// amplitude bins (0-255), low frequencies first. Produced once per tick
/// and owned by that tick alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyFrame {
    bins: Vec<u8>,
}

impl FrequencyFrame {
    pub fn new(bins: Vec<u8>) -> Self {
        Self { bins }
    }

    /// A frame of silent bins
    pub fn silent(bin_count: usize) -> Self {
        Self {
            bins: vec![0; bin_count],
        }
    }

    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Arithmetic mean of the bins, in [0, 255]. An empty frame is silent.
    pub fn loudness(&self) -> f32 {
        if self.bins.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.bins.iter().map(|&b| b as u32).sum();
        sum as f32 / self.bins.len() as f32
    }
}

/// Converts raw capture blocks into byte frequency bins.
///
/// Keeps the most recent `fft_size` samples, applies a Hann window and a
/// forward FFT, and folds the magnitudes of the lower half-spectrum into
/// bytes with a square-root transfer for perceptual balance.
pub struct FrequencyAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_input: Vec<Complex<f32>>,
    window: Vec<f32>, // Hann window for better frequency resolution
    recent: VecDeque<f32>,
    fft_size: usize,
}

impl FrequencyAnalyzer {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let fft_input = vec![Complex { re: 0.0, im: 0.0 }; fft_size];

        // Pre-compute Hann window coefficients: 0.5 * (1 - cos(2pi * i / (N-1)))
        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (fft_size - 1) as f32).cos())
            })
            .collect();

        Self {
            fft,
            fft_input,
            window,
            recent: VecDeque::with_capacity(fft_size),
            fft_size,
        }
    }

    /// Number of bins each frame carries
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Feeds a capture block in, keeping only the newest `fft_size` samples
    pub fn push_samples(&mut self, samples: &[f32]) {
        self.recent.extend(samples.iter().copied());
        while self.recent.len() > self.fft_size {
            self.recent.pop_front();
        }
    }

    /// Produces the frequency frame for the current tick. Always yields
    /// `fft_size / 2` bins; missing samples are treated as silence.
    pub fn frame(&mut self) -> FrequencyFrame {
        if self.recent.is_empty() {
            return FrequencyFrame::silent(self.bin_count());
        }

        // Right-align the newest samples, zero-padding the front
        let pad = self.fft_size - self.recent.len();
        for slot in self.fft_input.iter_mut().take(pad) {
            *slot = Complex { re: 0.0, im: 0.0 };
        }
        for (i, &sample) in self.recent.iter().enumerate() {
            self.fft_input[pad + i] = Complex {
                re: sample * self.window[pad + i],
                im: 0.0,
            };
        }

        self.fft.process(&mut self.fft_input);

        // A full-scale Hann-windowed sine peaks near fft_size / 4
        let full_scale = self.fft_size as f32 / 4.0;
        let bins = self
            .fft_input
            .iter()
            .take(self.bin_count())
            .map(|c| {
                let magnitude = (c.re * c.re + c.im * c.im).sqrt();
                let normalized = magnitude / full_scale;
                let scaled = (normalized * MAGNITUDE_AMPLIFICATION).sqrt().min(1.0);
                (scaled * MAX_BYTE).round() as u8
            })
            .collect();

        FrequencyFrame::new(bins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loudness_is_the_mean_of_the_bins() {
        let frame = FrequencyFrame::new(vec![0, 255]);
        assert!((frame.loudness() - 127.5).abs() < f32::EPSILON);

        let frame = FrequencyFrame::new(vec![10, 20, 30]);
        assert!((frame.loudness() - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_frame_is_silent() {
        assert_eq!(FrequencyFrame::new(Vec::new()).loudness(), 0.0);
        assert_eq!(FrequencyFrame::silent(128).loudness(), 0.0);
    }

    #[test]
    fn silence_produces_zero_bins() {
        let mut analyzer = FrequencyAnalyzer::new(256);
        analyzer.push_samples(&[0.0; 256]);
        let frame = analyzer.frame();
        assert_eq!(frame.len(), 128);
        assert!(frame.bins().iter().all(|&b| b == 0));
        assert_eq!(frame.loudness(), 0.0);
    }

    #[test]
    fn frame_always_carries_half_spectrum_bins() {
        let mut analyzer = FrequencyAnalyzer::new(256);
        assert_eq!(analyzer.frame().len(), 128);

        // Fewer samples than the FFT size still yields a full frame
        analyzer.push_samples(&[0.5; 40]);
        assert_eq!(analyzer.frame().len(), 128);
    }

    #[test]
    fn sine_concentrates_energy_near_its_bin() {
        let fft_size = 256;
        let cycle_bin = 8;
        let samples: Vec<f32> = (0..fft_size)
            .map(|i| {
                (2.0 * std::f32::consts::PI * cycle_bin as f32 * i as f32 / fft_size as f32).sin()
            })
            .collect();

        let mut analyzer = FrequencyAnalyzer::new(fft_size);
        analyzer.push_samples(&samples);
        let frame = analyzer.frame();

        let peak = frame
            .bins()
            .iter()
            .enumerate()
            .max_by_key(|(_, &b)| b)
            .map(|(i, _)| i)
            .unwrap();
        assert!(
            (peak as i32 - cycle_bin as i32).abs() <= 1,
            "energy peak at bin {} rather than near {}",
            peak,
            cycle_bin
        );
        assert!(frame.bins()[cycle_bin] > 128);
        assert!(frame.loudness() > 0.0 && frame.loudness() <= 255.0);
    }

    #[test]
    fn frames_are_deterministic_for_identical_input() {
        let samples: Vec<f32> = (0..256).map(|i| (i as f32 * 0.1).sin() * 0.3).collect();

        let mut first = FrequencyAnalyzer::new(256);
        first.push_samples(&samples);
        let mut second = FrequencyAnalyzer::new(256);
        second.push_samples(&samples);

        assert_eq!(first.frame(), second.frame());
    }

    #[test]
    fn only_the_newest_samples_are_kept() {
        let mut analyzer = FrequencyAnalyzer::new(64);
        analyzer.push_samples(&[1.0; 200]);
        assert_eq!(analyzer.recent.len(), 64);
    }
}
