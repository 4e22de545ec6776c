use anyhow::{Context, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat};
use ringbuf::HeapRb;
use ringbuf::traits::{Consumer as _, Producer as _, Split as _};
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Analysis window and hop, in samples. Small enough that the level
/// tracks the music rather than trailing it.
const WINDOW: usize = 1024;
const HOP: usize = 256;

/// RMS of typical program material is well under full scale; the gain
/// maps a loud signal to ~1.0 before the clamp.
const RMS_GAIN: f32 = 4.0;

/// One-pole smoothing of the published level.
const SMOOTHING: f32 = 0.85;

/// The one scalar the renderer reads: the smoothed microphone level in
/// [0, 1]. Published as raw f32 bits in a single word, so readers never
/// block and never observe a torn value.
pub struct AtomicAudioLevel {
    level: AtomicU32,
    updated_ms: AtomicU64,
}

impl AtomicAudioLevel {
    pub fn new() -> Self {
        Self {
            level: AtomicU32::new(0.0f32.to_bits()),
            updated_ms: AtomicU64::new(0),
        }
    }

    pub fn store(&self, level: f32) {
        self.level
            .store(level.max(0.0).min(1.0).to_bits(), Ordering::Release);
        self.updated_ms.store(now_ms(), Ordering::Relaxed);
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.level.load(Ordering::Acquire))
    }

    /// Milliseconds since the analyzer last published; 0 if it never has.
    pub fn age_ms(&self) -> f32 {
        let t = self.updated_ms.load(Ordering::Relaxed);
        if t == 0 {
            return 0.0;
        }
        now_ms().saturating_sub(t) as f32
    }
}

impl Default for AtomicAudioLevel {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_millis(0))
        .as_millis() as u64
}

/// Reduce one analysis window to the bounded level scalar.
pub fn window_level(window: &[f32]) -> f32 {
    if window.is_empty() {
        return 0.0;
    }
    let mean_sq = window.iter().map(|s| s * s).sum::<f32>() / window.len() as f32;
    (mean_sq.sqrt() * RMS_GAIN).min(1.0)
}

pub struct AudioSystem {
    // The stream must stay alive for capture to continue.
    _stream: cpal::Stream,
    stop: Arc<AtomicBool>,
    analyzer_handle: Option<thread::JoinHandle<()>>,
    level: Arc<AtomicAudioLevel>,
    pub sample_rate_hz: u32,
}

impl AudioSystem {
    /// Open the default (or substring-matched) input device and start
    /// the capture stream plus the analyzer thread.
    pub fn start(device_query: Option<&str>) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = select_input_device(&host, device_query)?;
        let supported = device
            .default_input_config()
            .context("get default input config")?;
        let sample_rate_hz = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        let config: cpal::StreamConfig = supported.clone().into();

        let rb = HeapRb::<f32>::new((sample_rate_hz as usize).saturating_mul(4));
        let (mut prod, mut cons) = rb.split();

        let stop = Arc::new(AtomicBool::new(false));
        let level = Arc::new(AtomicAudioLevel::new());
        let level_for_thread = Arc::clone(&level);
        let stop_for_thread = Arc::clone(&stop);

        let err_fn = |err| eprintln!("audio stream error: {err}");

        let stream = match supported.sample_format() {
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _| push_interleaved(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _| push_interleaved(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            SampleFormat::U16 => device.build_input_stream(
                &config,
                move |data: &[u16], _| push_interleaved(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            fmt => return Err(anyhow!("unsupported sample format: {fmt:?}")),
        };

        stream.play().context("start input stream")?;

        let analyzer_handle =
            thread::spawn(move || analyze_loop(&mut cons, &stop_for_thread, &level_for_thread));

        Ok(Self {
            _stream: stream,
            stop,
            analyzer_handle: Some(analyzer_handle),
            level,
            sample_rate_hz,
        })
    }

    pub fn level(&self) -> Arc<AtomicAudioLevel> {
        Arc::clone(&self.level)
    }
}

impl Drop for AudioSystem {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(h) = self.analyzer_handle.take() {
            let _ = h.join();
        }
    }
}

pub fn list_input_devices() -> anyhow::Result<()> {
    let host = cpal::default_host();
    let devices = host.input_devices().context("enumerate input devices")?;

    let mut out = io::stdout();
    writeln!(out, "Input devices:")?;
    for dev in devices {
        let name = dev.name().unwrap_or_else(|_| "<unknown>".to_string());
        writeln!(out, "  - {}", name)?;
    }
    Ok(())
}

fn select_input_device(
    host: &cpal::Host,
    device_query: Option<&str>,
) -> anyhow::Result<cpal::Device> {
    let devices = host
        .input_devices()
        .context("enumerate input devices")?
        .collect::<Vec<_>>();

    if let Some(want) = device_query.map(|s| s.to_lowercase()) {
        if let Some(dev) = devices.iter().find(|d| {
            d.name()
                .map(|n| n.to_lowercase().contains(&want))
                .unwrap_or(false)
        }) {
            return Ok(dev.clone());
        }
        return Err(anyhow!("no input device matching: {want}"));
    }

    host.default_input_device()
        .ok_or_else(|| anyhow!("no default input device found"))
}

fn push_interleaved<T: Sample<Float = f32> + Copy>(
    data: &[T],
    channels: usize,
    prod: &mut ringbuf::HeapProd<f32>,
) {
    for frame in data.chunks(channels) {
        let mut acc = 0.0f32;
        for s in frame {
            acc += (*s).to_float_sample();
        }
        let mono = acc / channels as f32;
        let _ = prod.try_push(mono);
    }
}

fn analyze_loop(cons: &mut ringbuf::HeapCons<f32>, stop: &AtomicBool, level: &AtomicAudioLevel) {
    let mut scratch = vec![0.0f32; WINDOW];
    let mut write_pos = 0usize;
    let mut filled = 0usize;
    let mut since_last = 0usize;
    let mut smoothed = 0.0f32;

    while !stop.load(Ordering::Relaxed) {
        let mut got_any = false;
        while let Some(s) = cons.try_pop() {
            got_any = true;
            scratch[write_pos] = s;
            write_pos = (write_pos + 1) % WINDOW;
            if filled < WINDOW {
                filled += 1;
            }
            since_last += 1;
            if filled == WINDOW && since_last >= HOP {
                since_last = 0;
                let raw = window_level(&scratch);
                smoothed = smoothed * SMOOTHING + raw * (1.0 - SMOOTHING);
                level.store(smoothed);
            }
        }

        if !got_any {
            thread::sleep(Duration::from_millis(1));
        }
    }
}
