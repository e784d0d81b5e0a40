//! Key events in, [`Effect`]s out. No terminal access.

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::{BrowserEntry, Config, ConfigError};
use crate::launcher;
use crate::registry::file_stem;

/// Single-line text input.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    value: String,
    // In chars, not bytes
    cursor: usize,
    selected: bool,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self {
            value,
            cursor,
            selected: false,
        }
    }

    /// Mark the whole contents as selected: the next edit replaces them.
    pub fn select_all(mut self) -> Self {
        self.selected = !self.value.is_empty();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
        self.selected = false;
    }

    /// Returns `false` for keys the field does not use.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let len = self.value.chars().count();
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => self.clear(),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                if self.selected {
                    self.clear();
                }
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.selected {
                    self.clear();
                } else if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.selected {
                    self.clear();
                } else if self.cursor < len {
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
            }
            KeyCode::Left => {
                self.selected = false;
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                self.selected = false;
                self.cursor = (self.cursor + 1).min(len);
            }
            KeyCode::Home => {
                self.selected = false;
                self.cursor = 0;
            }
            KeyCode::End => {
                self.selected = false;
                self.cursor = len;
            }
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Url,
    List,
}

/// The two steps of adding a browser.
#[derive(Debug, Clone)]
pub enum Prompt {
    Path(TextField),
    Name { path: PathBuf, name: TextField },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Launch { index: usize, url: String },
    OpenConfigDir,
    Quit,
}

pub struct App {
    pub config: Config,
    config_path: PathBuf,
    pub url: TextField,
    pub focus: Focus,
    pub cursor: Option<usize>,
    pub prompt: Option<Prompt>,
    pub status: Option<String>,
}

impl App {
    pub fn new(config: Config, config_path: PathBuf, url: impl Into<String>) -> Self {
        let cursor = config.selected_index();
        Self {
            config,
            config_path,
            url: TextField::new(url).select_all(),
            focus: Focus::Url,
            cursor,
            prompt: None,
            status: None,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn save_config(&self) -> Result<(), ConfigError> {
        self.config.save_to(&self.config_path)
    }

    /// Remember `index` as the browser to pre-select next time and persist.
    pub fn finish_launch(&mut self, index: usize) -> Result<(), ConfigError> {
        if self.config.record_launch(index) {
            self.save_config()?;
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Effect {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            return Effect::Quit;
        }

        self.status = None;

        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return Effect::None;
        }

        match key.code {
            KeyCode::Esc => Effect::Quit,
            KeyCode::Char('g') if ctrl => self.go(),
            KeyCode::F(2) => {
                self.open_add_prompt();
                Effect::None
            }
            KeyCode::F(8) => {
                self.remove_selected();
                Effect::None
            }
            KeyCode::F(5) => Effect::OpenConfigDir,
            KeyCode::F(6) => {
                self.status = Some("Set as default browser is not implemented.".to_string());
                Effect::None
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Url => Focus::List,
                    Focus::List => Focus::Url,
                };
                Effect::None
            }
            KeyCode::Up => {
                self.move_cursor(-1);
                Effect::None
            }
            KeyCode::Down => {
                self.move_cursor(1);
                Effect::None
            }
            KeyCode::Enter => match self.focus {
                Focus::Url => self.go(),
                Focus::List if self.url.value().is_empty() => {
                    self.status = Some("Type a URL first, or press Ctrl-G to go.".to_string());
                    Effect::None
                }
                Focus::List => self.go(),
            },
            _ => {
                match self.focus {
                    Focus::Url => {
                        self.url.handle_key(key);
                    }
                    Focus::List => self.handle_list_key(key),
                }
                Effect::None
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Home if !self.config.browsers.is_empty() => self.cursor = Some(0),
            KeyCode::End if !self.config.browsers.is_empty() => {
                self.cursor = Some(self.config.browsers.len() - 1)
            }
            KeyCode::Char('a') => self.open_add_prompt(),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected(),
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };

        self.prompt = match (prompt, key.code) {
            (Prompt::Path(_), KeyCode::Esc) => None,
            (Prompt::Path(field), KeyCode::Enter) => match launcher::resolve_command(field.value())
            {
                Some(path) => {
                    let name = TextField::new(file_stem(&path)).select_all();
                    Some(Prompt::Name { path, name })
                }
                None => {
                    self.status = Some(format!("{} is not an executable file", field.value()));
                    Some(Prompt::Path(field))
                }
            },
            // Dismissing the name prompt still adds the browser, under its file stem
            (Prompt::Name { path, .. }, KeyCode::Esc) => {
                self.add_browser(&path, "");
                None
            }
            (Prompt::Name { path, name }, KeyCode::Enter) => {
                self.add_browser(&path, name.value());
                None
            }
            (Prompt::Path(mut field), _) => {
                field.handle_key(key);
                Some(Prompt::Path(field))
            }
            (Prompt::Name { path, mut name }, _) => {
                name.handle_key(key);
                Some(Prompt::Name { path, name })
            }
        };
    }

    fn open_add_prompt(&mut self) {
        self.prompt = Some(Prompt::Path(TextField::default()));
    }

    fn go(&mut self) -> Effect {
        match self.cursor {
            Some(index) if index < self.config.browsers.len() => Effect::Launch {
                index,
                url: self.url.value().to_string(),
            },
            _ => Effect::None,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.config.browsers.len();
        if len == 0 {
            self.cursor = None;
            return;
        }
        let current = self.cursor.unwrap_or(0) as isize;
        self.cursor = Some((current + delta).clamp(0, len as isize - 1) as usize);
    }

    fn add_browser(&mut self, path: &Path, name: &str) {
        let entry = BrowserEntry::from_executable(path, name);
        let index = self.config.add_browser(entry);
        self.cursor = Some(index);
        self.persist();
    }

    fn remove_selected(&mut self) {
        let Some(index) = self.cursor else {
            return;
        };
        if let Some(removed) = self.config.remove_browser(index) {
            self.cursor = self.config.selected_index();
            self.status = Some(format!("Removed {}", removed.name));
            self.persist();
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.save_config() {
            log::error!("{}", e);
            self.status = Some(format!("Could not save config: {}", e));
        }
    }
}
