// src/ports/view.rs
use crate::constants::EMPTY_NOTES_MESSAGE;
use crate::domain::Note;
use crate::util::text::transcription_bullets;

/// Delete affordance with the note id bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteAction {
    pub note_id: i64,
}

impl DeleteAction {
    /// Invoke the delete callback with the bound id
    pub fn dispatch<R>(&self, on_delete: impl FnOnce(i64) -> R) -> R {
        on_delete(self.note_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub heading: String,
    pub items: Vec<String>,
    pub delete: DeleteAction,
}

/// Rendering model for a sequence of notes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteListView {
    Empty { message: &'static str },
    Cards(Vec<NoteCard>),
}

impl NoteListView {
    pub fn build(notes: &[Note]) -> Self {
        if notes.is_empty() {
            return Self::Empty {
                message: EMPTY_NOTES_MESSAGE,
            };
        }

        Self::Cards(
            notes
                .iter()
                .map(|note| NoteCard {
                    heading: note.filename.clone(),
                    items: transcription_bullets(&note.transcription),
                    delete: DeleteAction { note_id: note.id },
                })
                .collect(),
        )
    }
}
