use crate::application::{App, AppMode, Screen};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('r') => {
                    app.reset_all();
                    return;
                }
                KeyCode::Char('e') => {
                    app.export_csv();
                    return;
                }
                KeyCode::Char('n') if app.screen() == Screen::NameEntry => {
                    app.reconfigure();
                    return;
                }
                _ => return,
            }
        }

        match app.mode {
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::Normal => {
                if key == KeyCode::F(1) || (key == KeyCode::Char('?') && !app.accepts_text()) {
                    app.show_help();
                    return;
                }
                match app.screen() {
                    Screen::CountEntry => Self::handle_count_entry(app, key),
                    Screen::NameEntry => Self::handle_name_entry(app, key),
                    Screen::Counting => Self::handle_counting(app, key),
                }
            }
        }
    }

    fn handle_count_entry(app: &mut App, key: KeyCode) {
        app.status_message = None;
        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => app.push_count_digit(c),
            KeyCode::Backspace => app.pop_count_digit(),
            KeyCode::Esc => app.clear_count_input(),
            KeyCode::Enter => app.submit_station_count(),
            _ => {}
        }
    }

    fn handle_name_entry(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.confirm_names(),
            KeyCode::Tab | KeyCode::Down => app.next_name_field(),
            KeyCode::BackTab | KeyCode::Up => app.previous_name_field(),
            KeyCode::Backspace => app.name_backspace(),
            KeyCode::Char(c) => app.name_input_char(c),
            _ => {}
        }
    }

    fn handle_counting(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => app.press_digit(c),
            KeyCode::Enter => app.commit(),
            KeyCode::Backspace => app.backspace(),
            KeyCode::Esc | KeyCode::Delete | KeyCode::Char('c') => app.clear_input(),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_full_keyboard_flow() {
        let mut app = App::default();

        type_text(&mut app, "2");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::NameEntry);

        type_text(&mut app, "Depot?");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Harbor");
        assert_eq!(app.session.stations()[0].name, "Depot?");
        assert_eq!(app.mode, AppMode::Normal);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Counting);

        type_text(&mut app, "15");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.stations()[0].count, 1);
        assert_eq!(app.session.current_station_index(), 1);
    }

    #[test]
    fn test_clear_keys_on_counting_screen() {
        let mut app = App::default();
        type_text(&mut app, "1");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "A");
        press(&mut app, KeyCode::Enter);

        type_text(&mut app, "99");
        press(&mut app, KeyCode::Esc);
        assert!(app.session.pending_input().is_empty());

        type_text(&mut app, "4c");
        assert!(app.session.pending_input().is_empty());
    }

    #[test]
    fn test_ctrl_r_resets_from_counting() {
        let mut app = App::default();
        type_text(&mut app, "1");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "A");
        press(&mut app, KeyCode::Enter);

        InputHandler::handle_key_event(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(app.screen(), Screen::CountEntry);
    }

    #[test]
    fn test_ctrl_n_reconfigures_names() {
        let mut app = App::default();
        type_text(&mut app, "3");
        press(&mut app, KeyCode::Enter);

        InputHandler::handle_key_event(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(app.screen(), Screen::CountEntry);
    }

    #[test]
    fn test_help_toggle() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.help_scroll, 2);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_unbound_ctrl_chords_do_not_type() {
        let mut app = App::default();
        type_text(&mut app, "1");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Depot");

        InputHandler::handle_key_event(&mut app, KeyCode::Char('a'), KeyModifiers::CONTROL);
        InputHandler::handle_key_event(&mut app, KeyCode::Backspace, KeyModifiers::CONTROL);
        assert_eq!(app.session.stations()[0].name, "Depot");
        assert_eq!(app.screen(), Screen::NameEntry);
    }

    #[test]
    fn test_letters_ignored_on_count_screen() {
        let mut app = App::default();
        type_text(&mut app, "x1y");
        assert_eq!(app.count_input, "1");
    }
}
