// SPDX-License-Identifier: GPL-3.0-only

//! Terminal front end
//!
//! Renders the viewfinder window to the terminal using Unicode half-block
//! characters for improved vertical resolution, with the camera buttons and a
//! status line underneath.

use crate::app::{Action, AppModel};
use crate::backends::compositor::{WindowCompositor, WindowEvent, WindowSnapshot};
use crate::constants::UI_TICK;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::RgbImage;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use std::io::{self, stdout};
use std::sync::mpsc::Receiver;
use tracing::{debug, info};

/// Run the terminal UI until the user quits
pub fn run(
    model: &mut AppModel,
    compositor: &WindowCompositor,
    events: &Receiver<WindowEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, model, compositor, events);

    // Close the camera before restoring the terminal
    model.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: &mut AppModel,
    compositor: &WindowCompositor,
    events: &Receiver<WindowEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut frame_widget = FrameWidget::new();
    info!("Terminal UI started");

    loop {
        while let Ok(event) = events.try_recv() {
            model.handle_window_event(event);
        }
        model.poll_capture();

        let snapshot = model
            .viewfinder()
            .handle()
            .and_then(|handle| compositor.snapshot(handle));
        frame_widget.update(snapshot.as_ref());

        terminal.draw(|f| {
            let area = f.area();

            let camera_area = Rect {
                height: area.height.saturating_sub(2),
                ..area
            };
            f.render_widget(&frame_widget, camera_area);

            let controls_area = Rect {
                y: area.y + area.height.saturating_sub(2),
                height: 1u16.min(area.height),
                ..area
            };
            f.render_widget(ControlBar { model }, controls_area);

            let status_area = Rect {
                y: area.y + area.height.saturating_sub(1),
                height: 1u16.min(area.height),
                ..area
            };
            f.render_widget(
                StatusBar {
                    message: model.status(),
                },
                status_area,
            );
        })?;

        if event::poll(UI_TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(c) => {
                    if let Some(action) = Action::from_key(c) {
                        model.click(action);
                    }
                }
                _ => {}
            }
        }
    }

    info!("Terminal UI closed");
    Ok(())
}

/// Widget that renders the viewfinder using half-block characters
struct FrameWidget {
    image: Option<RgbImage>,
    frame_seq: u64,
    mirror: bool,
    visible: bool,
}

impl FrameWidget {
    fn new() -> Self {
        Self {
            image: None,
            frame_seq: 0,
            mirror: false,
            visible: false,
        }
    }

    /// Follow the committed state of the viewfinder window
    fn update(&mut self, snapshot: Option<&WindowSnapshot>) {
        let Some(snapshot) = snapshot else {
            *self = Self::new();
            return;
        };

        self.mirror = snapshot.properties.mirror;
        self.visible = snapshot.properties.visible;

        if snapshot.frame_seq == self.frame_seq {
            return;
        }
        self.frame_seq = snapshot.frame_seq;

        let Some(data) = &snapshot.frame else {
            return;
        };
        match image::load_from_memory_with_format(data, image::ImageFormat::Jpeg) {
            Ok(decoded) => self.image = Some(decoded.to_rgb8()),
            Err(e) => debug!(error = %e, seq = snapshot.frame_seq, "Skipping undecodable frame"),
        }
    }

    fn sample(&self, image: &RgbImage, x: u32, y: u32) -> Color {
        let x = x.min(image.width() - 1);
        let y = y.min(image.height() - 1);
        let x = if self.mirror { image.width() - 1 - x } else { x };
        let [r, g, b] = image.get_pixel(x, y).0;
        Color::Rgb(r, g, b)
    }
}

impl Widget for &FrameWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let image = match &self.image {
            Some(image) if self.visible && image.width() > 0 && image.height() > 0 => image,
            _ => {
                let msg = if self.visible {
                    "Waiting for camera..."
                } else {
                    "Camera off"
                };
                let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
                let y = area.y + area.height / 2;
                if y < area.y + area.height && x < area.x + area.width {
                    buf.set_string(x, y, msg, Style::default());
                }
                return;
            }
        };

        // Each terminal cell displays 2 vertical pixels using half-block characters
        let frame_aspect = image.width() as f64 / image.height() as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            let h = term_height;
            let w = h * frame_aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            let w = term_width;
            let h = w / frame_aspect;
            (w as u16, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = image.width() as f64 / display_width as f64;
        let y_scale = image.height() as f64 / (display_height * 2) as f64;

        // Upper half (▀) colored with fg, lower half with bg
        for ty in 0..display_height {
            for tx in 0..display_width {
                let term_x = x_offset + tx;
                let term_y = y_offset + ty;

                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(self.sample(image, src_x, src_y_top));
                    cell.set_bg(self.sample(image, src_x, src_y_bottom));
                }
            }
        }
    }
}

/// Visible camera buttons
struct ControlBar<'a> {
    model: &'a AppModel,
}

impl Widget for ControlBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut x = area.x;
        let right = area.x + area.width;

        for button in self.model.controls().buttons().filter(|b| b.is_visible()) {
            if x >= right {
                break;
            }
            let style = if button.is_enabled() {
                Style::default().fg(Color::Black).bg(Color::Gray)
            } else {
                Style::default()
                    .fg(Color::DarkGray)
                    .bg(Color::Black)
                    .add_modifier(Modifier::DIM)
            };
            let label = format!(" [{}] {} ", button.action().key(), button.label());
            let (next_x, _) =
                buf.set_stringn(x, area.y, &label, (right - x) as usize, style);
            x = next_x.saturating_add(1);
        }

        if x < right {
            buf.set_stringn(
                x,
                area.y,
                " [q] Quit",
                (right - x) as usize,
                Style::default().fg(Color::Gray),
            );
        }
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        buf.set_stringn(
            area.x,
            area.y,
            self.message,
            area.width as usize,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}
