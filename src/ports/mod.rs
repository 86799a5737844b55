// src/ports/mod.rs
pub mod html;
pub mod terminal;
pub mod view;

pub use html::HtmlPresenter;
pub use terminal::TerminalPresenter;
pub use view::{DeleteAction, NoteCard, NoteListView};
