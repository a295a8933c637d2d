use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use rand::Rng;

use crate::compositing::frame_compositor::FrameCompositor;
use crate::settings::live_settings::LiveSettings;
use crate::shared::frame::Frame;
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::frame_source::FrameSource;

use super::session_logger::{NullSessionLogger, SessionLogger};

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

type SendError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionReport {
    pub frames_processed: usize,
    pub frames_dropped: usize,
}

/// Runs the live simulation: `source → composite → sink`.
///
/// The source and sink each get a dedicated thread connected by bounded
/// channels; compositing runs on the calling thread. Every frame is rendered
/// against a fresh snapshot of the shared [`LiveSettings`], so controls can
/// change while the session runs. A frame that fails to decode or composite
/// is dropped and counted; the stream keeps going. Sink failures end the
/// session.
pub struct SimulationSession<R: Rng> {
    compositor: FrameCompositor<R>,
    settings: Arc<LiveSettings>,
    cancelled: Arc<AtomicBool>,
    logger: Box<dyn SessionLogger>,
    channel_capacity: usize,
}

impl<R: Rng> SimulationSession<R> {
    pub fn new(compositor: FrameCompositor<R>, settings: Arc<LiveSettings>) -> Self {
        Self {
            compositor,
            settings,
            cancelled: Arc::new(AtomicBool::new(false)),
            logger: Box::new(NullSessionLogger),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn SessionLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Flag that stops the session at the next frame boundary when set.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn run(
        mut self,
        source: Box<dyn FrameSource>,
        sink: Box<dyn FrameSink>,
    ) -> Result<SessionReport, Box<dyn std::error::Error>> {
        let total = source.frame_count().unwrap_or(0);
        let cap = self.channel_capacity;
        self.logger.info(&format!(
            "Starting session ({} frames, initial settings {:?})",
            source
                .frame_count()
                .map_or_else(|| "unbounded".to_string(), |n| n.to_string()),
            self.settings.snapshot()
        ));

        let (frame_tx, frame_rx) = crossbeam_channel::bounded::<Result<Frame, SendError>>(cap);
        let (write_tx, write_rx) = crossbeam_channel::bounded::<Frame>(cap);

        let source_handle = spawn_source(source, frame_tx, Arc::clone(&self.cancelled));
        let sink_handle = spawn_sink(sink, write_rx);

        let report = self.run_main_loop(frame_rx, &write_tx, total);
        drop(write_tx);

        let result = join_threads(source_handle, sink_handle).map(|()| report);
        if let Ok(report) = &result {
            self.logger.info(&format!(
                "Session finished: {} processed, {} dropped",
                report.frames_processed, report.frames_dropped
            ));
        }
        self.logger.summary();
        result
    }

    fn run_main_loop(
        &mut self,
        frame_rx: crossbeam_channel::Receiver<Result<Frame, SendError>>,
        write_tx: &crossbeam_channel::Sender<Frame>,
        total: usize,
    ) -> SessionReport {
        let mut report = SessionReport::default();

        for frame_result in &frame_rx {
            if self.cancelled.load(Ordering::Relaxed) {
                break;
            }
            self.logger.metric("queue_depth", frame_rx.len() as f64);

            let frame = match frame_result {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Dropping unreadable frame: {e}");
                    report.frames_dropped += 1;
                    continue;
                }
            };

            let snapshot = self.settings.snapshot();
            let started = Instant::now();
            match self
                .compositor
                .transform(&frame, snapshot.severity, snapshot.split_percent)
            {
                Ok(output) => {
                    self.logger
                        .timing("transform", started.elapsed().as_secs_f64() * 1000.0);
                    if write_tx.send(output).is_err() {
                        // Sink thread has exited; its error surfaces on join.
                        break;
                    }
                    report.frames_processed += 1;
                }
                Err(e) => {
                    log::warn!("Dropping frame {}: {e}", frame.index());
                    report.frames_dropped += 1;
                }
            }
            self.logger
                .progress(report.frames_processed + report.frames_dropped, total);
        }

        report
    }
}

fn spawn_source(
    mut source: Box<dyn FrameSource>,
    frame_tx: crossbeam_channel::Sender<Result<Frame, SendError>>,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<Box<dyn FrameSource>> {
    std::thread::spawn(move || {
        for frame_result in source.frames() {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let mapped = frame_result.map_err(|e| -> SendError { e.to_string().into() });
            if frame_tx.send(mapped).is_err() {
                break;
            }
        }
        source
    })
}

fn spawn_sink(
    mut sink: Box<dyn FrameSink>,
    write_rx: crossbeam_channel::Receiver<Frame>,
) -> JoinHandle<Result<Box<dyn FrameSink>, SendError>> {
    std::thread::spawn(move || {
        for frame in write_rx {
            sink.write(&frame)
                .map_err(|e| -> SendError { e.to_string().into() })?;
        }
        Ok(sink)
    })
}

/// Joins both I/O threads and reports the first failure.
fn join_threads(
    source_handle: JoinHandle<Box<dyn FrameSource>>,
    sink_handle: JoinHandle<Result<Box<dyn FrameSink>, SendError>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut first_error: Option<Box<dyn std::error::Error>> = None;

    match source_handle.join() {
        Ok(mut source) => source.close(),
        Err(_) => first_error = Some("Source thread panicked".into()),
    }

    match sink_handle.join() {
        Ok(Ok(mut sink)) => {
            if let Err(e) = sink.close() {
                first_error.get_or_insert(e);
            }
        }
        Ok(Err(e)) => {
            first_error.get_or_insert(e.to_string().into());
        }
        Err(_) => {
            first_error.get_or_insert("Sink thread panicked".into());
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::compositing::divider::DividerStyle;
    use crate::degradation::domain::degradation_filter::DegradationFilter;
    use crate::degradation::domain::noise_synthesizer::NoiseSynthesizer;
    use crate::settings::live_settings::SettingsSnapshot;
    use crate::severity::severity_level::SeverityLevel;
    use crate::severity::severity_profile::SeverityProfiles;

    // --- Stubs ---

    struct StubSource {
        frames: Vec<Result<Frame, String>>,
        closed: Arc<Mutex<bool>>,
    }

    impl FrameSource for StubSource {
        fn frame_count(&self) -> Option<usize> {
            Some(self.frames.len())
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            Box::new(
                self.frames
                    .drain(..)
                    .map(|r| r.map_err(|e| -> Box<dyn std::error::Error> { e.into() })),
            )
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
        }
    }

    #[derive(Default)]
    struct StubSink {
        written: Arc<Mutex<Vec<Frame>>>,
        fail_on_write: bool,
    }

    impl FrameSink for StubSink {
        fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail_on_write {
                return Err("disk full".into());
            }
            self.written.lock().unwrap().push(frame.clone());
            Ok(())
        }

        fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }
    }

    fn compositor() -> FrameCompositor {
        FrameCompositor::new(
            DegradationFilter::new(SeverityProfiles::default(), NoiseSynthesizer::seeded(1)),
            DividerStyle {
                thickness: 0,
                color: [255, 255, 255],
            },
        )
    }

    fn settings(severity: SeverityLevel, split_percent: u32) -> Arc<LiveSettings> {
        Arc::new(
            LiveSettings::new(SettingsSnapshot {
                severity,
                split_percent,
            })
            .unwrap(),
        )
    }

    fn source(frames: Vec<Result<Frame, String>>) -> (Box<dyn FrameSource>, Arc<Mutex<bool>>) {
        let closed = Arc::new(Mutex::new(false));
        let src = StubSource {
            frames,
            closed: Arc::clone(&closed),
        };
        (Box::new(src), closed)
    }

    #[test]
    fn test_processes_every_frame_in_order() {
        let frames = (0..5)
            .map(|i| Ok(Frame::filled(16, 8, [i as u8, 0, 0], i)))
            .collect();
        let (src, closed) = source(frames);
        let sink = StubSink::default();
        let written = Arc::clone(&sink.written);

        let report = SimulationSession::new(compositor(), settings(SeverityLevel::Healthy, 50))
            .run(src, Box::new(sink))
            .unwrap();

        assert_eq!(
            report,
            SessionReport {
                frames_processed: 5,
                frames_dropped: 0,
            }
        );
        let written = written.lock().unwrap();
        let indices: Vec<usize> = written.iter().map(|f| f.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert!(*closed.lock().unwrap());
    }

    #[test]
    fn test_bad_frames_are_dropped_not_fatal() {
        let frames = vec![
            Ok(Frame::filled(16, 8, [0, 0, 0], 0)),
            Err("corrupt capture".to_string()),
            Ok(Frame::new(vec![0u8; 16 * 8], 16, 8, 1, 2)),
            Ok(Frame::filled(16, 8, [0, 0, 0], 3)),
        ];
        let (src, _) = source(frames);
        let sink = StubSink::default();
        let written = Arc::clone(&sink.written);

        let report = SimulationSession::new(compositor(), settings(SeverityLevel::Late, 50))
            .run(src, Box::new(sink))
            .unwrap();

        assert_eq!(report.frames_processed, 2);
        assert_eq!(report.frames_dropped, 2);
        assert_eq!(written.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_sink_failure_ends_session_with_error() {
        let frames = (0..3).map(|i| Ok(Frame::filled(8, 8, [9, 9, 9], i))).collect();
        let (src, _) = source(frames);
        let sink = StubSink {
            fail_on_write: true,
            ..StubSink::default()
        };

        let err = SimulationSession::new(compositor(), settings(SeverityLevel::Early, 50))
            .run(src, Box::new(sink))
            .unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_cancelled_session_writes_nothing() {
        let frames = (0..3).map(|i| Ok(Frame::filled(8, 8, [9, 9, 9], i))).collect();
        let (src, _) = source(frames);
        let sink = StubSink::default();
        let written = Arc::clone(&sink.written);

        let session = SimulationSession::new(compositor(), settings(SeverityLevel::Early, 50));
        session.cancel_handle().store(true, Ordering::Relaxed);
        let report = session.run(src, Box::new(sink)).unwrap();

        assert_eq!(report.frames_processed, 0);
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_settings_are_read_per_frame() {
        let frame = Frame::filled(20, 4, [255, 0, 0], 0);
        let live = settings(SeverityLevel::Healthy, 100);
        let mut session = SimulationSession::new(compositor(), Arc::clone(&live));

        let (out_tx, out_rx) = crossbeam_channel::unbounded();
        let run_one = |session: &mut SimulationSession<_>, frame: &Frame| {
            let (tx, rx) = crossbeam_channel::unbounded();
            tx.send(Ok(frame.clone())).unwrap();
            drop(tx);
            session.run_main_loop(rx, &out_tx, 1)
        };

        run_one(&mut session, &frame);
        assert_eq!(out_rx.recv().unwrap(), frame);

        live.set_severity(SeverityLevel::Late);
        live.set_split_position(0).unwrap();
        run_one(&mut session, &frame);
        let degraded = out_rx.recv().unwrap();
        assert_ne!(degraded, frame);
        assert_eq!(degraded.dimensions(), frame.dimensions());
    }
}
