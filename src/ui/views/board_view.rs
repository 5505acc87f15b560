//! Chess board view - hosts the render loop in a gpui window.
//!
//! A background timer steps the loop at the configured frame rate. Each
//! step records a display list; `render` turns the presented list into
//! absolutely positioned elements. Closing the window is routed through the
//! loop so it can release its canvas before the app quits.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use gpui::{
    AnyElement, AsyncApp, Context, RenderImage, Task, WeakEntity, Window, div, img, prelude::*,
    px, rgb,
};
use image::RgbaImage;

use crate::domain::{PieceColor, PieceKind};
use crate::models::PieceRegistry;
use crate::ui::atlas::SpriteAtlas;
use crate::ui::canvas::{DisplayList, DrawCommand};
use crate::ui::render_loop::{LoopEvent, LoopState, RenderLoop};

/// The main chess board view
pub struct ChessBoardView {
    registry: PieceRegistry,
    render_loop: RenderLoop<DisplayList>,
    /// GPU-side copies of the sliced sprites, one per kind and color
    sprites: HashMap<(PieceKind, PieceColor), Arc<RenderImage>>,
    /// Events collected between frames
    pending_events: Vec<LoopEvent>,
    board_size: f32,
    _frame_task: Task<()>,
}

impl ChessBoardView {
    pub fn new(
        registry: PieceRegistry,
        atlas: &SpriteAtlas,
        render_loop: RenderLoop<DisplayList>,
        board_size: u32,
        frame_interval: Duration,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let sprites = atlas
            .iter()
            .map(|asset| ((asset.kind, asset.color), to_render_image(&asset.image)))
            .collect();

        // Keep the window open until the loop has seen the close request
        let weak_view = cx.weak_entity();
        window.on_window_should_close(cx, move |_window, cx| {
            weak_view
                .update(cx, |view, _| {
                    view.pending_events.push(LoopEvent::CloseRequested);
                })
                .is_err()
        });

        let _frame_task = cx.spawn(
            async move |weak_entity: WeakEntity<ChessBoardView>, cx: &mut AsyncApp| {
                Self::run_frame_loop(weak_entity, frame_interval, cx).await;
            },
        );

        Self {
            registry,
            render_loop,
            sprites,
            pending_events: Vec::new(),
            board_size: board_size as f32,
            _frame_task,
        }
    }

    /// Step the loop once per frame interval until it terminates or the view is dropped
    async fn run_frame_loop(
        weak_entity: WeakEntity<ChessBoardView>,
        frame_interval: Duration,
        cx: &mut AsyncApp,
    ) {
        loop {
            cx.background_executor().timer(frame_interval).await;

            let state = weak_entity.update(cx, |view, cx| view.tick(cx));
            match state {
                Ok(LoopState::Running) => continue,
                _ => break,
            }
        }
    }

    fn tick(&mut self, cx: &mut Context<Self>) -> LoopState {
        let events = std::mem::take(&mut self.pending_events);
        let state = self.render_loop.step(events, &self.registry);
        match state {
            LoopState::Running => cx.notify(),
            LoopState::Terminated => {
                self.sprites.clear();
                cx.quit();
            }
        }
        state
    }

    fn render_command(&self, command: &DrawCommand) -> Option<AnyElement> {
        match command {
            DrawCommand::Fill { rect, color } => Some(
                div()
                    .absolute()
                    .left(px(rect.x as f32))
                    .top(px(rect.y as f32))
                    .w(px(rect.width as f32))
                    .h(px(rect.height as f32))
                    .bg(rgb(color.to_hex()))
                    .into_any_element(),
            ),
            DrawCommand::Blit { asset, at } => {
                let sprite = self.sprites.get(&(asset.kind, asset.color))?;
                Some(
                    img(Arc::clone(sprite))
                        .absolute()
                        .left(px(at.x as f32))
                        .top(px(at.y as f32))
                        .w(px(asset.image.width() as f32))
                        .h(px(asset.image.height() as f32))
                        .into_any_element(),
                )
            }
        }
    }
}

impl Render for ChessBoardView {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        let commands = self
            .render_loop
            .canvas()
            .map(|list| list.presented())
            .unwrap_or_default();

        div()
            .relative()
            .size(px(self.board_size))
            .overflow_hidden()
            .children(commands.iter().filter_map(|c| self.render_command(c)))
    }
}

/// Copy a sprite into gpui's image type, which stores pixels as BGRA
fn to_render_image(image: &RgbaImage) -> Arc<RenderImage> {
    let mut bgra = image.clone();
    for pixel in bgra.pixels_mut() {
        pixel.0.swap(0, 2);
    }
    Arc::new(RenderImage::new(vec![image::Frame::new(bgra)]))
}
