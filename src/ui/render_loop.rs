//! Render/sync loop - per frame: drain events, paint the board, draw every
//! piece at its current position, present, wait for the next frame.

use std::thread;
use std::time::{Duration, Instant};

use shakmaty::Square;

use crate::domain::PieceId;
use crate::models::PieceRegistry;
use crate::ui::board_layout::BoardLayout;
use crate::ui::canvas::{Canvas, Rect};
use crate::ui::theme::Palette;

/// Input the loop reacts to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoopEvent {
    CloseRequested,
    /// Anything the loop does not understand; logged and skipped
    Unrecognized(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Absorbing; the canvas has been released
    Terminated,
}

/// Where the blocking loop gets its events from
pub trait EventSource {
    fn poll_events(&mut self) -> Vec<LoopEvent>;
}

/// Event source that asks to close after a fixed number of frames
#[derive(Debug)]
pub struct FrameLimit {
    remaining: u32,
}

impl FrameLimit {
    pub fn new(frames: u32) -> Self {
        Self { remaining: frames }
    }
}

impl EventSource for FrameLimit {
    fn poll_events(&mut self) -> Vec<LoopEvent> {
        if self.remaining == 0 {
            return vec![LoopEvent::CloseRequested];
        }
        self.remaining -= 1;
        Vec::new()
    }
}

/// Fixed frame cadence
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    next_frame: Option<Instant>,
}

impl FramePacer {
    pub fn new(frame_rate: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / frame_rate.max(1),
            next_frame: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleep until the next frame boundary
    pub fn wait(&mut self) {
        let now = Instant::now();
        let target = self.next_frame.unwrap_or(now + self.interval);
        if target > now {
            thread::sleep(target - now);
        }
        // a late frame restarts the cadence instead of bursting to catch up
        self.next_frame = Some(target.max(now) + self.interval);
    }
}

pub struct RenderLoop<C: Canvas> {
    canvas: Option<C>,
    state: LoopState,
    layout: BoardLayout,
    palette: Palette,
    frames: u64,
}

impl<C: Canvas> RenderLoop<C> {
    pub fn new(canvas: C, layout: BoardLayout, palette: Palette) -> Self {
        Self {
            canvas: Some(canvas),
            state: LoopState::Running,
            layout,
            palette,
            frames: 0,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// The canvas, until the loop terminates
    pub fn canvas(&self) -> Option<&C> {
        self.canvas.as_ref()
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one iteration: handle events, then draw and present a frame
    /// unless a close request ended the loop.
    pub fn step(
        &mut self,
        events: impl IntoIterator<Item = LoopEvent>,
        registry: &PieceRegistry,
    ) -> LoopState {
        if self.state == LoopState::Terminated {
            return self.state;
        }

        for event in events {
            match event {
                LoopEvent::CloseRequested => {
                    self.terminate();
                    return self.state;
                }
                LoopEvent::Unrecognized(what) => {
                    tracing::warn!(event = %what, "ignoring unrecognized event");
                }
            }
        }

        let Some(canvas) = self.canvas.as_mut() else {
            return self.state;
        };

        let size = self.layout.square_size;
        for square in Square::ALL {
            let origin = self.layout.square_to_pixel(square);
            let rect = Rect {
                x: origin.x,
                y: origin.y,
                width: size,
                height: size,
            };
            canvas.fill_rect(rect, self.palette.square_color(square));
        }

        // later pieces paint over earlier ones
        for piece in registry.all() {
            match piece.placement {
                Some(placement) => canvas.blit(&piece.asset, placement.pixel),
                None => tracing::trace!(piece = %piece.id, "skipping unplaced piece"),
            }
        }

        canvas.present();
        self.frames += 1;
        self.state
    }

    /// Step repeatedly at the pacer's cadence until the source asks to close.
    /// Returns the number of frames presented.
    pub fn run(
        &mut self,
        source: &mut impl EventSource,
        registry: &PieceRegistry,
        pacer: &mut FramePacer,
    ) -> u64 {
        while self.step(source.poll_events(), registry) == LoopState::Running {
            pacer.wait();
        }
        self.frames
    }

    /// Extension point for applying a move to a piece's position.
    /// Not implemented: pieces only move through the starting layout.
    #[allow(dead_code)]
    pub fn move_piece(&mut self, _piece: PieceId) {}

    fn terminate(&mut self) {
        if let Some(mut canvas) = self.canvas.take() {
            canvas.release();
        }
        self.state = LoopState::Terminated;
        tracing::info!(frames = self.frames, "render loop terminated");
    }
}
