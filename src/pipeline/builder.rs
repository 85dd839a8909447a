use crate::alignment::segmenter::Segmenter;
use crate::audio::silence::RmsSilenceDetector;
use crate::config::{AssemblerConfig, SegmenterConfig};
use crate::corpus::assembler::CorpusAssembler;
use crate::pipeline::defaults::WavClipSink;
use crate::pipeline::traits::{ClipSink, SilenceDetector};

/// Wires a [`CorpusAssembler`] together, defaulting the collaborators
/// (RMS silence detection, WAV clip export) when not overridden. Tests
/// swap in scripted detectors and in-memory sinks through the same seams.
pub struct CorpusAssemblerBuilder {
    assembler_config: AssemblerConfig,
    segmenter_config: SegmenterConfig,
    detector: Option<Box<dyn SilenceDetector>>,
    sink: Option<Box<dyn ClipSink>>,
}

impl CorpusAssemblerBuilder {
    pub fn new(assembler_config: AssemblerConfig) -> Self {
        Self {
            assembler_config,
            segmenter_config: SegmenterConfig::default(),
            detector: None,
            sink: None,
        }
    }

    pub fn with_segmenter_config(mut self, segmenter_config: SegmenterConfig) -> Self {
        self.segmenter_config = segmenter_config;
        self
    }

    pub fn with_silence_detector(mut self, detector: Box<dyn SilenceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn with_clip_sink(mut self, sink: Box<dyn ClipSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> CorpusAssembler {
        let detector = self
            .detector
            .unwrap_or_else(|| Box::new(RmsSilenceDetector::default()));
        let sink = self.sink.unwrap_or_else(|| {
            Box::new(WavClipSink {
                force: self.assembler_config.force,
            })
        });
        let segmenter = Segmenter::with_detector(self.segmenter_config, detector);
        CorpusAssembler::from_parts(self.assembler_config, segmenter, sink)
    }
}
