// SPDX-License-Identifier: MPL-2.0

//! Camera control buttons
//!
//! Four buttons with mutually exclusive visibility:
//!
//! | state   | Front | Rear | Take Picture | Stop |
//! |---------|-------|------|--------------|------|
//! | idle    | shown | shown| hidden       | hidden |
//! | running | hidden| hidden| shown       | shown |
//!
//! A click only produces a [`Message`] when the button is both visible and
//! enabled, which is how a second capture is kept out while one is in flight.

use crate::app::state::Message;

/// User-triggered camera action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    StartFront,
    StartRear,
    TakePicture,
    Stop,
}

impl Action {
    /// Display order of the buttons
    pub const ALL: [Action; 4] = [
        Action::StartFront,
        Action::StartRear,
        Action::TakePicture,
        Action::Stop,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Action::StartFront => "Front Camera",
            Action::StartRear => "Rear Camera",
            Action::TakePicture => "Take Picture",
            Action::Stop => "Stop Camera",
        }
    }

    /// Key that triggers the action in the terminal UI
    pub fn key(&self) -> char {
        match self {
            Action::StartFront => 'f',
            Action::StartRear => 'r',
            Action::TakePicture => 'p',
            Action::Stop => 's',
        }
    }

    /// Action bound to a key, if any
    pub fn from_key(key: char) -> Option<Action> {
        match key.to_ascii_lowercase() {
            ' ' => Some(Action::TakePicture),
            c => Action::ALL.into_iter().find(|a| a.key() == c),
        }
    }

    /// Message dispatched when the action fires
    pub fn message(&self) -> Message {
        match self {
            Action::StartFront => Message::StartFront,
            Action::StartRear => Message::StartRear,
            Action::TakePicture => Message::TakePicture,
            Action::Stop => Message::StopCamera,
        }
    }
}

/// A single push button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    action: Action,
    visible: bool,
    enabled: bool,
}

impl Button {
    fn new(action: Action, visible: bool) -> Self {
        Self {
            action,
            visible,
            enabled: true,
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn label(&self) -> &'static str {
        self.action.label()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Restore the default enabled state
    pub fn reset_enabled(&mut self) {
        self.enabled = true;
    }

    /// Message for a click, or `None` when the button cannot be clicked
    pub fn on_click(&self) -> Option<Message> {
        (self.visible && self.enabled).then(|| self.action.message())
    }
}

/// The control bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    start_front: Button,
    start_rear: Button,
    take_picture: Button,
    stop: Button,
}

impl Controls {
    /// Controls in the idle layout
    pub fn new() -> Self {
        Self {
            start_front: Button::new(Action::StartFront, true),
            start_rear: Button::new(Action::StartRear, true),
            take_picture: Button::new(Action::TakePicture, false),
            stop: Button::new(Action::Stop, false),
        }
    }

    pub fn button(&self, action: Action) -> &Button {
        match action {
            Action::StartFront => &self.start_front,
            Action::StartRear => &self.start_rear,
            Action::TakePicture => &self.take_picture,
            Action::Stop => &self.stop,
        }
    }

    pub fn button_mut(&mut self, action: Action) -> &mut Button {
        match action {
            Action::StartFront => &mut self.start_front,
            Action::StartRear => &mut self.start_rear,
            Action::TakePicture => &mut self.take_picture,
            Action::Stop => &mut self.stop,
        }
    }

    /// Buttons in display order
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        Action::ALL.into_iter().map(|a| self.button(a))
    }

    /// Camera running: capture and stop available, start actions hidden
    pub fn show_running(&mut self) {
        self.start_front.set_visible(false);
        self.start_rear.set_visible(false);
        self.stop.set_visible(true);
        self.take_picture.set_visible(true);
        self.take_picture.set_enabled(true);
    }

    /// Camera idle: only start actions available
    pub fn show_idle(&mut self) {
        self.take_picture.set_visible(false);
        self.stop.set_visible(false);
        self.start_front.set_visible(true);
        self.start_rear.set_visible(true);
    }

    /// Dispatch a click on the button bound to `action`
    pub fn click(&self, action: Action) -> Option<Message> {
        self.button(action).on_click()
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_layout() {
        let controls = Controls::new();
        assert_eq!(controls.click(Action::StartFront), Some(Message::StartFront));
        assert_eq!(controls.click(Action::StartRear), Some(Message::StartRear));
        assert_eq!(controls.click(Action::TakePicture), None);
        assert_eq!(controls.click(Action::Stop), None);
    }

    #[test]
    fn test_running_layout() {
        let mut controls = Controls::new();
        controls.show_running();
        assert_eq!(controls.click(Action::StartFront), None);
        assert_eq!(controls.click(Action::StartRear), None);
        assert_eq!(controls.click(Action::TakePicture), Some(Message::TakePicture));
        assert_eq!(controls.click(Action::Stop), Some(Message::StopCamera));
    }

    #[test]
    fn test_disabled_button_ignores_clicks() {
        let mut controls = Controls::new();
        controls.show_running();
        controls.button_mut(Action::TakePicture).set_enabled(false);
        assert_eq!(controls.click(Action::TakePicture), None);

        controls.button_mut(Action::TakePicture).reset_enabled();
        assert_eq!(controls.click(Action::TakePicture), Some(Message::TakePicture));
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Action::from_key('f'), Some(Action::StartFront));
        assert_eq!(Action::from_key('R'), Some(Action::StartRear));
        assert_eq!(Action::from_key(' '), Some(Action::TakePicture));
        assert_eq!(Action::from_key('s'), Some(Action::Stop));
        assert_eq!(Action::from_key('x'), None);
    }

    #[test]
    fn test_buttons_in_display_order() {
        let labels: Vec<_> = Controls::new().buttons().map(|b| b.label()).collect();
        assert_eq!(
            labels,
            vec!["Front Camera", "Rear Camera", "Take Picture", "Stop Camera"]
        );
    }
}
