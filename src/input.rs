use crate::app::App;
use crate::models::Tab;
use crate::upload::parse_path_list;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const SCROLL_STEP: u16 = 3;
const PAGE_STEP: u16 = 10;

/// Insert at a byte cursor, keeping it on a char boundary.
fn insert_char(buffer: &mut String, cursor: &mut usize, c: char) {
    *cursor = (*cursor).min(buffer.len());
    buffer.insert(*cursor, c);
    *cursor += c.len_utf8();
}

fn backspace(buffer: &mut String, cursor: &mut usize) {
    *cursor = (*cursor).min(buffer.len());
    if let Some((idx, _)) = buffer[..*cursor].char_indices().next_back() {
        buffer.remove(idx);
        *cursor = idx;
    }
}

fn move_left(buffer: &str, cursor: &mut usize) {
    *cursor = (*cursor).min(buffer.len());
    if let Some((idx, _)) = buffer[..*cursor].char_indices().next_back() {
        *cursor = idx;
    }
}

fn move_right(buffer: &str, cursor: &mut usize) {
    if let Some(c) = buffer[(*cursor).min(buffer.len())..].chars().next() {
        *cursor += c.len_utf8();
    }
}

/// Route one key press. Returns `false` once the app should exit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return !app.should_quit;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return false;
    }

    if app.alert.is_some() {
        app.dismiss_alert();
        return true;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
        app.toggle_chat();
        return true;
    }

    if app.chat.open {
        handle_chat_key(app, key);
        return true;
    }

    match key.code {
        KeyCode::Tab => {
            app.set_tab(app.tab.next());
            return true;
        }
        KeyCode::BackTab => {
            app.set_tab(app.tab.previous());
            return true;
        }
        KeyCode::Char('b') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.sidebar_open = !app.sidebar_open;
            return true;
        }
        _ => {}
    }

    match app.tab {
        Tab::Revision => handle_revision_key(app, key),
        Tab::Quiz => handle_quiz_key(app, key),
        Tab::Context => handle_context_key(app, key),
    }

    !app.should_quit
}

fn handle_revision_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.prev_chapter(),
        KeyCode::Down | KeyCode::Char('j') => app.next_chapter(),
        KeyCode::PageUp => app.chapter_scroll = app.chapter_scroll.saturating_sub(PAGE_STEP),
        KeyCode::PageDown => app.chapter_scroll = app.chapter_scroll.saturating_add(PAGE_STEP),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(id) = c.to_digit(10) {
                app.select_chapter(id);
            }
        }
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('a') => app.toggle_ai(),
        KeyCode::Char('r') => app.load_questions(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_question(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_question(),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_reveal(app.selected_question),
        _ => {}
    }
}

fn handle_context_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('x') {
            app.submit_context(String::new());
        }
        return;
    }

    match key.code {
        KeyCode::Enter => {
            if app.analyzing_upload {
                return;
            }
            let paths = parse_path_list(&app.upload_input);
            if !paths.is_empty() {
                app.upload_input.clear();
                app.upload_files(paths);
            }
        }
        KeyCode::Esc => app.upload_input.clear(),
        KeyCode::Backspace => {
            app.upload_input.pop();
        }
        KeyCode::Char(c) => app.upload_input.push(c),
        _ => {}
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    if let Some(paths) = app.chat.attach_input.as_mut() {
        match key.code {
            KeyCode::Esc => app.chat.attach_input = None,
            KeyCode::Enter => {
                let paths = parse_path_list(paths);
                app.chat.attach_input = None;
                app.chat_attach(paths);
            }
            KeyCode::Backspace => {
                paths.pop();
            }
            KeyCode::Char(c) => paths.push(c),
            _ => {}
        }
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('o') => app.chat.attach_input = Some(String::new()),
            KeyCode::Char('l') => app.clear_chat(),
            KeyCode::Char('d') => {
                if let Some(last) = app.chat.attachments.len().checked_sub(1) {
                    app.chat_remove_attachment(last);
                }
            }
            _ => {}
        }
        return;
    }

    if key.code == KeyCode::Enter {
        app.chat_send();
        return;
    }

    let chat = &mut app.chat;
    match key.code {
        KeyCode::Esc => chat.open = false,
        KeyCode::Up => chat.scroll_up(SCROLL_STEP),
        KeyCode::Down => chat.scroll_down(SCROLL_STEP),
        KeyCode::PageUp => chat.scroll_up(PAGE_STEP),
        KeyCode::PageDown => chat.scroll_down(PAGE_STEP),
        KeyCode::Left => move_left(&chat.input_buffer, &mut chat.cursor_position),
        KeyCode::Right => move_right(&chat.input_buffer, &mut chat.cursor_position),
        KeyCode::Home => chat.cursor_position = 0,
        KeyCode::End => chat.cursor_position = chat.input_buffer.len(),
        KeyCode::Backspace => backspace(&mut chat.input_buffer, &mut chat.cursor_position),
        KeyCode::Char(c) => insert_char(&mut chat.input_buffer, &mut chat.cursor_position, c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::AppEvent;
    use std::time::Duration;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn app() -> (App, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let config = Config {
            static_delay: Duration::ZERO,
            ..Config::default()
        };
        (App::new(config, None, tx), rx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_text_editing_respects_char_boundaries() {
        let mut buffer = String::new();
        let mut cursor = 0;
        for c in "héllo".chars() {
            insert_char(&mut buffer, &mut cursor, c);
        }
        assert_eq!(cursor, buffer.len());

        move_left(&buffer, &mut cursor);
        move_left(&buffer, &mut cursor);
        move_left(&buffer, &mut cursor);
        assert_eq!(&buffer[cursor..], "llo");
        backspace(&mut buffer, &mut cursor);
        assert_eq!(buffer, "hllo");
        assert_eq!(cursor, 1);

        move_right(&buffer, &mut cursor);
        assert_eq!(cursor, 2);
    }

    #[tokio::test]
    async fn test_tab_cycles_and_quits() {
        let (mut app, _rx) = app();
        assert!(handle_key(&mut app, key(KeyCode::Tab)));
        assert_eq!(app.tab, Tab::Quiz);
        assert_eq!(app.quiz_fetches(), 1);
        handle_key(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.tab, Tab::Revision);

        assert!(!handle_key(&mut app, key(KeyCode::Char('q'))));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_ctrl_c_always_quits() {
        let (mut app, _rx) = app();
        app.chat.open = true;
        assert!(!handle_key(&mut app, ctrl('c')));
    }

    #[tokio::test]
    async fn test_quiz_keys() {
        let (mut app, mut rx) = app();
        app.set_tab(Tab::Quiz);
        let event = rx.recv().await.unwrap();
        app.handle_event(event);

        handle_key(&mut app, key(KeyCode::Down));
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.revealed.contains(&1));
        handle_key(&mut app, key(KeyCode::Char(' ')));
        assert!(app.revealed.is_empty());

        handle_key(&mut app, key(KeyCode::Char('r')));
        assert_eq!(app.quiz_fetches(), 2);
        handle_key(&mut app, key(KeyCode::Char('a')));
        assert!(app.use_ai);
        assert_eq!(app.quiz_fetches(), 3);
    }

    #[tokio::test]
    async fn test_revision_keys() {
        let (mut app, _rx) = app();
        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.current_chapter_id, 2);
        handle_key(&mut app, key(KeyCode::Char('4')));
        assert_eq!(app.current_chapter_id, 4);
        handle_key(&mut app, key(KeyCode::Up));
        assert_eq!(app.current_chapter_id, 3);
        handle_key(&mut app, ctrl('b'));
        assert!(!app.sidebar_open);
    }

    #[tokio::test]
    async fn test_context_tab_typing_does_not_quit() {
        let (mut app, _rx) = app();
        app.set_tab(Tab::Context);
        type_text(&mut app, "quiz.md");
        assert_eq!(app.upload_input, "quiz.md");
        assert!(!app.should_quit);
        handle_key(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.upload_input, "quiz.m");
    }

    #[tokio::test]
    async fn test_context_enter_starts_upload() {
        let (mut app, mut rx) = app();
        app.set_tab(Tab::Context);
        type_text(&mut app, "/no/such/file.txt");
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.analyzing_upload);
        assert!(app.upload_input.is_empty());

        let event = rx.recv().await.unwrap();
        app.handle_event(event);
        assert!(app.alert.is_some());

        // Any key dismisses the alert without acting on it.
        handle_key(&mut app, key(KeyCode::Char('x')));
        assert!(app.alert.is_none());
        assert!(app.upload_input.is_empty());
    }

    #[tokio::test]
    async fn test_chat_keys() {
        let (mut app, _rx) = app();
        handle_key(&mut app, ctrl('t'));
        assert!(app.chat.open);

        type_text(&mut app, "hi q");
        assert_eq!(app.chat.input_buffer, "hi q");
        assert!(!app.should_quit);

        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.chat.input_buffer.is_empty());
        assert_eq!(app.chat.messages.len(), 3);

        handle_key(&mut app, ctrl('o'));
        assert_eq!(app.chat.attach_input.as_deref(), Some(""));
        type_text(&mut app, "a.md");
        assert_eq!(app.chat.attach_input.as_deref(), Some("a.md"));
        handle_key(&mut app, key(KeyCode::Esc));
        assert!(app.chat.attach_input.is_none());

        handle_key(&mut app, key(KeyCode::Esc));
        assert!(!app.chat.open);
    }

    #[tokio::test]
    async fn test_chat_ctrl_l_clears() {
        let (mut app, _rx) = app();
        app.chat.open = true;
        app.global_context = "Domain: X".to_string();
        handle_key(&mut app, ctrl('l'));
        assert_eq!(app.chat.messages.len(), 1);
        assert!(app.global_context.is_empty());
    }
}
