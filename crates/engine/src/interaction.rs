//! Expand/collapse state machine for rendered cards.
//!
//! Cards are identified by rank. Every card starts collapsed and at most one
//! card is expanded at any time; expanding a card while another is expanded
//! collapses the other first. The page-level flags follow the expanded card:
//! overlay visible, scroll locked and "a card is expanded" are always all
//! true or all false.
//!
//! The controller also tracks where focus sits so it can hand focus to the
//! close control on expansion and return it to the card root on collapse.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Collapsed,
    Expanded,
}

/// Focusable parts of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// The card's own interactive root.
    CardRoot(u32),
    /// The close control of an expanded card.
    CloseControl(u32),
    /// The external streaming link.
    StreamingLink(u32),
}

impl FocusTarget {
    pub fn card(self) -> u32 {
        match self {
            FocusTarget::CardRoot(card) | FocusTarget::CloseControl(card) | FocusTarget::StreamingLink(card) => card,
        }
    }
}

/// Part of a card that received a pointer or keyboard activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationTarget {
    Body,
    CloseControl,
    StreamingLink,
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKey {
    Enter,
    Space,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    /// `card` expanded; `replaced` was expanded before and got collapsed.
    Expanded { card: u32, replaced: Option<u32> },
    Collapsed { card: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    pub transition: Transition,
    /// The key's default behavior (scrolling for Space) must be suppressed.
    pub prevent_default: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionController {
    expanded: Option<u32>,
    overlay_visible: bool,
    scroll_locked: bool,
    focus: Option<FocusTarget>,
}

impl ExpansionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_of(&self, card: u32) -> CardState {
        if self.expanded == Some(card) {
            CardState::Expanded
        } else {
            CardState::Collapsed
        }
    }

    pub fn expanded(&self) -> Option<u32> {
        self.expanded
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn focus(&self) -> Option<FocusTarget> {
        self.focus
    }

    /// Overlay, scroll lock and expansion agree.
    pub fn is_consistent(&self) -> bool {
        self.overlay_visible == self.scroll_locked && self.overlay_visible == self.expanded.is_some()
    }

    /// Pointer activation on part of a card.
    ///
    /// The body expands a collapsed card; the close control collapses its own
    /// expanded card; the streaming link never changes expansion.
    pub fn activate(&mut self, card: u32, target: ActivationTarget) -> Transition {
        match target {
            ActivationTarget::Body if self.state_of(card) == CardState::Collapsed => self.expand(card),
            ActivationTarget::Body | ActivationTarget::StreamingLink => Transition::Unchanged,
            ActivationTarget::CloseControl if self.expanded == Some(card) => self.collapse(),
            ActivationTarget::CloseControl => Transition::Unchanged,
        }
    }

    /// Activation of the overlay behind the expanded card.
    pub fn activate_overlay(&mut self) -> Transition {
        self.collapse()
    }

    /// Key pressed while `focused_card`'s root has focus (if any card does).
    ///
    /// Escape collapses from anywhere. Enter and Space on a collapsed card
    /// behave like a pointer activation on its body and suppress the
    /// default scroll of Space.
    pub fn key(&mut self, focused_card: Option<u32>, key: CardKey) -> KeyOutcome {
        match (key, focused_card) {
            (CardKey::Escape, _) => KeyOutcome {
                transition: self.collapse(),
                prevent_default: false,
            },
            (CardKey::Enter | CardKey::Space, Some(card)) if self.state_of(card) == CardState::Collapsed => KeyOutcome {
                transition: self.activate(card, ActivationTarget::Body),
                prevent_default: true,
            },
            _ => KeyOutcome {
                transition: Transition::Unchanged,
                prevent_default: false,
            },
        }
    }

    /// Expands `card`, collapsing any other expanded card first, and moves
    /// focus to its close control.
    pub fn expand(&mut self, card: u32) -> Transition {
        if self.expanded == Some(card) {
            return Transition::Unchanged;
        }
        let replaced = self.expanded.take();
        if let Some(previous) = replaced {
            debug!(card = previous, "collapsing before expanding another card");
        }
        self.expanded = Some(card);
        self.overlay_visible = true;
        self.scroll_locked = true;
        self.focus = Some(FocusTarget::CloseControl(card));
        debug_assert!(self.is_consistent());
        Transition::Expanded { card, replaced }
    }

    /// Collapses the expanded card, if any, and returns focus to its root.
    pub fn collapse(&mut self) -> Transition {
        let Some(card) = self.expanded.take() else {
            return Transition::Unchanged;
        };
        self.overlay_visible = false;
        self.scroll_locked = false;
        self.focus = Some(FocusTarget::CardRoot(card));
        debug_assert!(self.is_consistent());
        Transition::Collapsed { card }
    }

    /// Moves focus to a card root. Ignored while a card is expanded, since
    /// focus stays inside the expanded card.
    pub fn focus_card(&mut self, card: u32) {
        if self.expanded.is_none() {
            self.focus = Some(FocusTarget::CardRoot(card));
        }
    }

    /// Clears card focus, e.g. when focus moves to the filter controls.
    pub fn blur(&mut self) {
        if self.expanded.is_none() {
            self.focus = None;
        }
    }

    /// Alternates focus between the close control and the streaming link
    /// of the expanded card.
    pub fn cycle_focus(&mut self) {
        let Some(card) = self.expanded else {
            return;
        };
        self.focus = Some(match self.focus {
            Some(FocusTarget::CloseControl(_)) => FocusTarget::StreamingLink(card),
            _ => FocusTarget::CloseControl(card),
        });
    }

    /// Reconciles with a freshly rendered view: an expanded card that is no
    /// longer shown collapses, and focus on a vanished card is dropped.
    pub fn retain_visible(&mut self, is_visible: impl Fn(u32) -> bool) -> Transition {
        let transition = match self.expanded {
            Some(card) if !is_visible(card) => self.collapse(),
            _ => Transition::Unchanged,
        };
        if self.focus.is_some_and(|focus| !is_visible(focus.card())) {
            self.focus = None;
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_activation_expands_and_focuses_close_control() {
        let mut controller = ExpansionController::new();
        let transition = controller.activate(4, ActivationTarget::Body);
        assert_eq!(transition, Transition::Expanded { card: 4, replaced: None });
        assert_eq!(controller.state_of(4), CardState::Expanded);
        assert!(controller.overlay_visible());
        assert!(controller.scroll_locked());
        assert_eq!(controller.focus(), Some(FocusTarget::CloseControl(4)));
    }

    #[test]
    fn activation_inside_expanded_card_is_ignored() {
        let mut controller = ExpansionController::new();
        controller.activate(4, ActivationTarget::Body);
        assert_eq!(controller.activate(4, ActivationTarget::Body), Transition::Unchanged);
        assert_eq!(controller.expanded(), Some(4));
    }

    #[test]
    fn close_control_and_overlay_collapse() {
        let mut controller = ExpansionController::new();
        controller.activate(2, ActivationTarget::Body);
        assert_eq!(controller.activate(2, ActivationTarget::CloseControl), Transition::Collapsed { card: 2 });
        assert_eq!(controller.focus(), Some(FocusTarget::CardRoot(2)));

        controller.activate(5, ActivationTarget::Body);
        assert_eq!(controller.activate_overlay(), Transition::Collapsed { card: 5 });
        assert!(!controller.overlay_visible());
        assert!(!controller.scroll_locked());
    }

    #[test]
    fn close_control_of_a_collapsed_card_does_nothing() {
        let mut controller = ExpansionController::new();
        assert_eq!(controller.activate(1, ActivationTarget::CloseControl), Transition::Unchanged);
        assert!(controller.is_consistent());
    }

    #[test]
    fn expanding_another_card_collapses_the_first() {
        let mut controller = ExpansionController::new();
        controller.expand(1);
        assert_eq!(controller.expand(2), Transition::Expanded { card: 2, replaced: Some(1) });
        assert_eq!(controller.state_of(1), CardState::Collapsed);
        assert_eq!(controller.state_of(2), CardState::Expanded);
        assert!(controller.is_consistent());
    }

    #[test]
    fn space_on_collapsed_card_expands_and_prevents_scroll() {
        let mut controller = ExpansionController::new();
        let outcome = controller.key(Some(3), CardKey::Space);
        assert!(outcome.prevent_default);
        assert_eq!(outcome.transition, Transition::Expanded { card: 3, replaced: None });

        let outcome = controller.key(Some(3), CardKey::Enter);
        assert!(!outcome.prevent_default);
        assert_eq!(outcome.transition, Transition::Unchanged);
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut controller = ExpansionController::new();
        let outcome = controller.key(Some(3), CardKey::Other);
        assert_eq!(outcome.transition, Transition::Unchanged);
        assert_eq!(controller.key(None, CardKey::Enter).transition, Transition::Unchanged);
    }

    #[test]
    fn cycle_focus_alternates_inside_expanded_card() {
        let mut controller = ExpansionController::new();
        controller.cycle_focus();
        assert_eq!(controller.focus(), None);

        controller.expand(9);
        controller.cycle_focus();
        assert_eq!(controller.focus(), Some(FocusTarget::StreamingLink(9)));
        controller.cycle_focus();
        assert_eq!(controller.focus(), Some(FocusTarget::CloseControl(9)));
    }

    #[test]
    fn vanished_expanded_card_collapses() {
        let mut controller = ExpansionController::new();
        controller.expand(9);
        assert_eq!(controller.retain_visible(|card| card != 9), Transition::Collapsed { card: 9 });
        assert_eq!(controller.focus(), None);
        assert!(controller.is_consistent());
    }

    #[test]
    fn card_focus_is_frozen_while_expanded() {
        let mut controller = ExpansionController::new();
        controller.focus_card(1);
        assert_eq!(controller.focus(), Some(FocusTarget::CardRoot(1)));
        controller.expand(1);
        controller.focus_card(2);
        controller.blur();
        assert_eq!(controller.focus(), Some(FocusTarget::CloseControl(1)));
    }
}
