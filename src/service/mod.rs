use crate::{
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
    models::Note,
    repository::{Repository, RepositoryError},
};

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
        }
    }
}

#[derive(Clone)]
pub struct NoteService {
    repo: Repository,
}

impl NoteService {
    pub const fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, RepositoryError> {
        self.repo
            .create_note(request.title, request.content)
            .await
            .map(NoteResponse::from)
    }

    pub async fn update_note(
        &self,
        id: i64,
        request: UpdateNoteRequest,
    ) -> Result<Option<NoteResponse>, RepositoryError> {
        self.repo
            .update_note(id, request.title, request.content)
            .await
            .map(|note| note.map(NoteResponse::from))
    }

    pub async fn delete_note(&self, id: i64) -> Result<bool, RepositoryError> {
        self.repo.delete_note(id).await
    }

    pub async fn get_one_note(&self, id: i64) -> Result<Option<NoteResponse>, RepositoryError> {
        self.repo
            .get_one_note(id)
            .await
            .map(|note| note.map(NoteResponse::from))
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, RepositoryError> {
        self.repo
            .get_all_notes()
            .await
            .map(|notes| notes.into_iter().map(NoteResponse::from).collect())
    }
}
