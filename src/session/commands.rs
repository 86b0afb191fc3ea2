use std::time::Instant;

use crate::{
    error::SessionError,
    hotkeys::{HotkeyResult, Key},
    models::{Label, LabelUpdate, Segment, Signal},
};

use super::LabelingSession;

/// Callbacks a rendering surface reports back to the session.
#[derive(Debug, Clone)]
pub enum UiCommand {
    PointerDown { x: f64, width_px: f64 },
    PointerMove { x: f64, width_px: f64 },
    PointerUp,
    PointerLeave,
    ConfirmSegment { slot: usize, description: Option<String> },
    DiscardSegment,
    QuickLabel { slot: usize },
    EditLabel { id: String, update: LabelUpdate },
    DeleteLabel { id: String },
    ClickLabel { id: String },
    Seek { time: f64 },
    SeekPixel { x: f64, width_px: f64 },
    Skip { delta: f64 },
    PlayPause,
    SetSpeed { speed: f64 },
    CycleSpeed,
    KeyPress { key: Key, shift: bool, input_focused: bool },
    SwitchSignal(Box<Signal>),
}

/// What a command changed, for the caller's own bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandEffect {
    None,
    SegmentSelected(Segment),
    LabelCreated(Label),
    LabelEdited(Label),
    LabelDeleted { removed: bool },
    LabelSelected(Option<String>),
    Seeked(f64),
    Playing(bool),
    Speed(f64),
    Hotkey(HotkeyResult),
}

impl UiCommand {
    /// Commands that can change playback and therefore may need the ticker.
    pub fn touches_playback(&self) -> bool {
        matches!(
            self,
            UiCommand::PlayPause | UiCommand::KeyPress { .. } | UiCommand::SwitchSignal(_)
        )
    }
}

pub fn apply_command(
    session: &mut LabelingSession,
    command: UiCommand,
    now: Instant,
) -> Result<CommandEffect, SessionError> {
    let effect = match command {
        UiCommand::PointerDown { x, width_px } => {
            session.pointer_down(x, width_px)?;
            CommandEffect::None
        }
        UiCommand::PointerMove { x, width_px } => {
            session.pointer_move(x, width_px)?;
            CommandEffect::None
        }
        UiCommand::PointerUp => session
            .pointer_up()
            .map_or(CommandEffect::None, CommandEffect::SegmentSelected),
        UiCommand::PointerLeave => session
            .pointer_leave()
            .map_or(CommandEffect::None, CommandEffect::SegmentSelected),
        UiCommand::ConfirmSegment { slot, description } => session
            .confirm_pending(slot, description)?
            .map_or(CommandEffect::None, CommandEffect::LabelCreated),
        UiCommand::DiscardSegment => {
            session.discard_pending();
            CommandEffect::None
        }
        UiCommand::QuickLabel { slot } => session
            .quick_label(slot)?
            .map_or(CommandEffect::None, CommandEffect::LabelCreated),
        UiCommand::EditLabel { id, update } => {
            CommandEffect::LabelEdited(session.edit_label(&id, update)?)
        }
        UiCommand::DeleteLabel { id } => CommandEffect::LabelDeleted {
            removed: session.delete_label(&id),
        },
        UiCommand::ClickLabel { id } => CommandEffect::LabelSelected(session.click_label(&id)),
        UiCommand::Seek { time } => CommandEffect::Seeked(session.seek(time)),
        UiCommand::SeekPixel { x, width_px } => {
            CommandEffect::Seeked(session.seek_pixel(x, width_px)?)
        }
        UiCommand::Skip { delta } => CommandEffect::Seeked(session.skip(delta)),
        UiCommand::PlayPause => CommandEffect::Playing(session.toggle_playback(now)),
        UiCommand::SetSpeed { speed } => {
            session.set_speed(speed)?;
            CommandEffect::Speed(speed)
        }
        UiCommand::CycleSpeed => CommandEffect::Speed(session.cycle_speed()?),
        UiCommand::KeyPress {
            key,
            shift,
            input_focused,
        } => CommandEffect::Hotkey(session.key_press(&key, shift, input_focused, now)?),
        UiCommand::SwitchSignal(signal) => {
            session.switch_signal(*signal);
            CommandEffect::None
        }
    };
    Ok(effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::default_categories, settings::LabelerSettings, signals::default_signals};

    fn session() -> LabelingSession {
        let signal = default_signals(Some(1)).unwrap().remove(0);
        LabelingSession::new(signal, default_categories(), LabelerSettings::default())
    }

    #[test]
    fn drag_then_confirm_creates_label() {
        let mut session = session();
        let now = Instant::now();
        for command in [
            UiCommand::PointerDown { x: 100.0, width_px: 500.0 },
            UiCommand::PointerMove { x: 250.0, width_px: 500.0 },
        ] {
            assert_eq!(apply_command(&mut session, command, now), Ok(CommandEffect::None));
        }
        assert_eq!(
            apply_command(&mut session, UiCommand::PointerUp, now),
            Ok(CommandEffect::SegmentSelected(Segment::new(2.0, 5.0)))
        );
        let effect = apply_command(
            &mut session,
            UiCommand::ConfirmSegment {
                slot: 4,
                description: Some("tall".into()),
            },
            now,
        )
        .unwrap();
        let CommandEffect::LabelCreated(label) = effect else {
            panic!("expected a label, got {effect:?}");
        };
        assert_eq!(label.category, "Peak");
        assert_eq!(label.description.as_deref(), Some("tall"));
    }

    #[test]
    fn invalid_edit_surfaces_error() {
        let mut session = session();
        let now = Instant::now();
        session.seek(5.0);
        let CommandEffect::LabelCreated(label) =
            apply_command(&mut session, UiCommand::QuickLabel { slot: 0 }, now).unwrap()
        else {
            panic!("quick label not created");
        };
        let result = apply_command(
            &mut session,
            UiCommand::EditLabel {
                id: label.id.clone(),
                update: LabelUpdate {
                    start_time: Some(6.0),
                    ..LabelUpdate::default()
                },
            },
            now,
        );
        assert!(matches!(result, Err(SessionError::Label(_))));
        assert_eq!(session.labels()[0], label);
    }

    #[test]
    fn delete_click_twice_is_harmless() {
        let mut session = session();
        let now = Instant::now();
        session.seek(1.0);
        apply_command(&mut session, UiCommand::QuickLabel { slot: 3 }, now).unwrap();
        let id = session.labels()[0].id.clone();
        let delete = UiCommand::DeleteLabel { id };
        assert_eq!(
            apply_command(&mut session, delete.clone(), now),
            Ok(CommandEffect::LabelDeleted { removed: true })
        );
        assert_eq!(
            apply_command(&mut session, delete, now),
            Ok(CommandEffect::LabelDeleted { removed: false })
        );
    }

    #[test]
    fn invalid_speed_is_rejected() {
        let mut session = session();
        let result = apply_command(&mut session, UiCommand::SetSpeed { speed: 0.0 }, Instant::now());
        assert!(matches!(result, Err(SessionError::Playback(_))));
    }
}
