//! Category, exercise and training catalog.
//!
//! Seeded from the bundled fixture file. Edits never mutate a catalog in
//! place: every store operation returns a new snapshot.

use std::fs;
use std::io;
use std::path::Path;

use chrono::NaiveDate;
use include_dir::{include_dir, Dir};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, PlaybackError};
use crate::plan::TrainingDraft;
use crate::session::{Session, Step};

static FIXTURE_DIR: Dir = include_dir!("src/fixtures");
const FIXTURE_FILE: &str = "catalog.json";

const SHARE_ID_LEN: usize = 8;
const SHARE_ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub description: String,
    pub estimated_minutes: u32,
    pub category_id: String,
}

/// An exercise placed in a training, with its own duration and position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExercise {
    pub exercise_id: String,
    pub custom_minutes: u32,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Training {
    pub id: String,
    pub name: String,
    pub categories: Vec<String>,
    pub exercises: Vec<TrainingExercise>,
    pub total_minutes: u32,
    pub observations: String,
    pub created_by: String,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub share_id: String,
}

/// Resolves share identifiers to playable sessions
pub trait SessionLoader {
    fn load(&self, share_id: &str) -> Result<Session, CatalogError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
    exercises: Vec<Exercise>,
    trainings: Vec<Training>,
}

impl Catalog {
    /// Catalog built from the bundled fixture data
    pub fn seeded() -> Result<Self, CatalogError> {
        let file = FIXTURE_DIR.get_file(FIXTURE_FILE).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "bundled catalog fixture missing")
        })?;
        let text = file.contents_utf8().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "catalog fixture is not UTF-8")
        })?;
        Self::from_json_str(text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json_str(&text)?;
        tracing::info!(
            "loaded catalog from {:?}: {} trainings",
            path.as_ref(),
            catalog.trainings.len()
        );
        Ok(catalog)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn trainings(&self) -> &[Training] {
        &self.trainings
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn training(&self, id: &str) -> Option<&Training> {
        self.trainings.iter().find(|t| t.id == id)
    }

    pub fn find_by_share_id(&self, share_id: &str) -> Option<&Training> {
        self.trainings.iter().find(|t| t.share_id == share_id)
    }

    /// Builds the playback session for a training: exercises in `order`,
    /// minutes converted to seconds.
    pub fn session_for(&self, training: &Training) -> Result<Session, CatalogError> {
        let mut entries: Vec<&TrainingExercise> = training.exercises.iter().collect();
        entries.sort_by_key(|te| te.order);

        let mut steps = Vec::with_capacity(entries.len());
        for (position, entry) in entries.into_iter().enumerate() {
            let exercise = self
                .exercise(&entry.exercise_id)
                .ok_or_else(|| CatalogError::UnknownExercise(entry.exercise_id.clone()))?;

            // an exercise may appear more than once, so ids carry the position
            let mut step = Step::new(
                format!("{}-{}", position + 1, entry.exercise_id),
                exercise.name.clone(),
                exercise.description.clone(),
                entry.custom_minutes.saturating_mul(60),
            )?;
            if let Some(category) = self.category(&exercise.category_id) {
                step = step.with_category(category.name.clone());
            }
            steps.push(step);
        }

        Ok(Session::new(training.name.clone(), steps)?
            .with_share_id(training.share_id.clone())
            .with_notes(training.observations.clone())
            .with_total_duration(training.total_minutes.saturating_mul(60)))
    }

    /// Adds a training built from `draft` and returns the new snapshot with
    /// the created record.
    pub fn create_training(
        &self,
        draft: TrainingDraft,
        created_by: &str,
        today: NaiveDate,
    ) -> Result<(Catalog, Training), CatalogError> {
        self.check_exercises(&draft)?;

        let share_id = loop {
            let candidate = generate_share_id(&mut rand::thread_rng());
            if self.find_by_share_id(&candidate).is_none() {
                break candidate;
            }
        };

        let training = Training {
            id: self.next_training_id(),
            name: draft.name,
            categories: draft.categories,
            total_minutes: draft.total_minutes,
            exercises: draft.exercises,
            observations: draft.observations,
            created_by: created_by.to_string(),
            created_at: today,
            updated_at: today,
            share_id,
        };
        tracing::info!(
            "created training '{}' shared as {}",
            training.name,
            training.share_id
        );

        let mut next = self.clone();
        next.trainings.push(training.clone());
        Ok((next, training))
    }

    /// Replaces the editable fields of training `id`. The share identifier
    /// and creation data are kept.
    pub fn update_training(
        &self,
        id: &str,
        draft: TrainingDraft,
        today: NaiveDate,
    ) -> Result<Catalog, CatalogError> {
        self.check_exercises(&draft)?;

        let mut next = self.clone();
        let training = next
            .trainings
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CatalogError::TrainingNotFound(id.to_string()))?;

        training.name = draft.name;
        training.categories = draft.categories;
        training.exercises = draft.exercises;
        training.total_minutes = draft.total_minutes;
        training.observations = draft.observations;
        training.updated_at = today;
        Ok(next)
    }

    pub fn delete_training(&self, id: &str) -> Result<Catalog, CatalogError> {
        if self.training(id).is_none() {
            return Err(CatalogError::TrainingNotFound(id.to_string()));
        }
        let mut next = self.clone();
        next.trainings.retain(|t| t.id != id);
        Ok(next)
    }

    /// Rejects drafts that would store a training the loader cannot play
    fn check_exercises(&self, draft: &TrainingDraft) -> Result<(), CatalogError> {
        if draft.exercises.is_empty() {
            return Err(CatalogError::EmptyPlan);
        }
        for entry in &draft.exercises {
            if self.exercise(&entry.exercise_id).is_none() {
                return Err(CatalogError::UnknownExercise(entry.exercise_id.clone()));
            }
            if entry.custom_minutes == 0 {
                return Err(PlaybackError::InvalidDuration(0).into());
            }
        }
        Ok(())
    }

    // Max + 1 rather than count + 1 so ids stay unique after deletes
    fn next_training_id(&self) -> String {
        let max = self
            .trainings
            .iter()
            .filter_map(|t| t.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }
}

impl SessionLoader for Catalog {
    fn load(&self, share_id: &str) -> Result<Session, CatalogError> {
        let training = self
            .find_by_share_id(share_id)
            .ok_or_else(|| CatalogError::SessionNotFound(share_id.to_string()))?;
        let session = self.session_for(training)?;
        tracing::info!(
            "loaded '{}' ({} steps) for share id {}",
            session.title,
            session.len(),
            share_id
        );
        Ok(session)
    }
}

/// Eight random upper-case base-36 characters
pub fn generate_share_id<R: Rng>(rng: &mut R) -> String {
    (0..SHARE_ID_LEN)
        .map(|_| SHARE_ID_ALPHABET[rng.gen_range(0..SHARE_ID_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Command, SessionController, TickOutcome};
    use assert_matches::assert_matches;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    fn draft(name: &str, exercises: Vec<TrainingExercise>) -> TrainingDraft {
        let total_minutes = exercises.iter().map(|e| e.custom_minutes).sum();
        TrainingDraft {
            name: name.to_string(),
            categories: vec![],
            exercises,
            total_minutes,
            observations: String::new(),
        }
    }

    fn entry(exercise_id: &str, minutes: u32, order: usize) -> TrainingExercise {
        TrainingExercise {
            exercise_id: exercise_id.to_string(),
            custom_minutes: minutes,
            order,
        }
    }

    #[test]
    fn test_seeded_catalog() {
        let catalog = Catalog::seeded().unwrap();
        assert_eq!(catalog.categories().len(), 4);
        assert_eq!(catalog.exercises().len(), 5);
        assert_eq!(catalog.trainings().len(), 2);
        assert_eq!(
            catalog.exercise("4").map(|e| e.name.as_str()),
            Some("Sprints")
        );
    }

    #[test]
    fn test_load_share_id_builds_session() {
        let catalog = Catalog::seeded().unwrap();
        let session = catalog.load("abc123").unwrap();

        let durations: Vec<u32> = session.steps().iter().map(|s| s.duration_seconds()).collect();
        assert_eq!(durations, vec![600, 900, 1200]);
        assert_eq!(session.total_duration_seconds(), 45 * 60);
        assert_eq!(session.share_id, "abc123");
        assert_eq!(session.steps()[0].label, "Calentamiento articular");
        assert_eq!(session.steps()[2].category.as_deref(), Some("Fuerza"));
    }

    #[test]
    fn test_load_unknown_share_id() {
        let catalog = Catalog::seeded().unwrap();
        assert_matches!(
            catalog.load("nope"),
            Err(CatalogError::SessionNotFound(id)) if id == "nope"
        );
    }

    #[test]
    fn test_session_follows_order_field() {
        let mut catalog = Catalog::seeded().unwrap();
        catalog.trainings[1].exercises = vec![entry("4", 5, 2), entry("3", 7, 1)];
        let session = catalog.load("def456").unwrap();
        assert_eq!(session.steps()[0].id, "1-3");
        assert_eq!(session.steps()[1].id, "2-4");
    }

    #[test]
    fn test_zero_minute_entry_fails_load() {
        let mut catalog = Catalog::seeded().unwrap();
        catalog.trainings[0].exercises[1].custom_minutes = 0;
        assert_matches!(
            catalog.load("abc123"),
            Err(CatalogError::Playback(PlaybackError::InvalidDuration(0)))
        );
    }

    #[test]
    fn test_empty_training_fails_load() {
        let mut catalog = Catalog::seeded().unwrap();
        catalog.trainings[0].exercises.clear();
        assert_matches!(
            catalog.load("abc123"),
            Err(CatalogError::Playback(PlaybackError::EmptySession))
        );
    }

    #[test]
    fn test_create_training_returns_new_snapshot() {
        let catalog = Catalog::seeded().unwrap();
        let (next, created) = catalog
            .create_training(draft("Velocidad", vec![entry("4", 20, 1)]), "1", today())
            .unwrap();

        assert_eq!(catalog.trainings().len(), 2);
        assert_eq!(next.trainings().len(), 3);
        assert_eq!(created.id, "3");
        assert_eq!(created.created_at, today());
        assert_eq!(created.share_id.len(), 8);
        assert!(next.load(&created.share_id).is_ok());
    }

    #[test]
    fn test_create_training_rejects_unknown_exercise() {
        let catalog = Catalog::seeded().unwrap();
        assert_matches!(
            catalog.create_training(draft("x", vec![entry("99", 5, 1)]), "1", today()),
            Err(CatalogError::UnknownExercise(id)) if id == "99"
        );
    }

    #[test]
    fn test_update_training_keeps_share_id() {
        let catalog = Catalog::seeded().unwrap();
        let next = catalog
            .update_training("1", draft("Renamed", vec![entry("5", 15, 1)]), today())
            .unwrap();

        let updated = next.training("1").unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.share_id, "abc123");
        assert_eq!(updated.total_minutes, 15);
        assert_eq!(updated.updated_at, today());
        assert_eq!(
            updated.created_at,
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
        );
        // earlier snapshot untouched
        assert_eq!(
            catalog.training("1").unwrap().name,
            "Entrenamiento Juveniles Semana 1"
        );
    }

    #[test]
    fn test_update_missing_training() {
        let catalog = Catalog::seeded().unwrap();
        assert_matches!(
            catalog.update_training("42", draft("x", vec![entry("1", 5, 1)]), today()),
            Err(CatalogError::TrainingNotFound(_))
        );
    }

    #[test]
    fn test_delete_then_create_keeps_ids_unique() {
        let catalog = Catalog::seeded().unwrap();
        let next = catalog.delete_training("1").unwrap();
        assert!(next.training("1").is_none());
        assert_matches!(
            next.load("abc123"),
            Err(CatalogError::SessionNotFound(_))
        );

        let (next, created) = next
            .create_training(draft("x", vec![entry("1", 5, 1)]), "1", today())
            .unwrap();
        assert_eq!(created.id, "3");
        assert_eq!(next.trainings().len(), 2);
    }

    #[test]
    fn test_repeated_exercise_loads_and_plays() {
        let catalog = Catalog::seeded().unwrap();
        let (catalog, created) = catalog
            .create_training(
                draft(
                    "Intervals",
                    vec![entry("4", 1, 1), entry("5", 1, 2), entry("4", 1, 3)],
                ),
                "1",
                today(),
            )
            .unwrap();

        let session = catalog.load(&created.share_id).unwrap();
        let ids: Vec<&str> = session.steps().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["1-4", "2-5", "3-4"]);
        assert_eq!(session.steps()[2].label, "Sprints");

        let mut controller = SessionController::new(session).unwrap();
        controller.apply(Command::Select(2)).unwrap();
        controller.apply(Command::Start).unwrap();
        assert_eq!(
            (0..60).map(|_| controller.tick()).max(),
            Some(TickOutcome::Expired)
        );
    }

    #[test]
    fn test_unplayable_drafts_are_rejected() {
        let catalog = Catalog::seeded().unwrap();
        assert_matches!(
            catalog.create_training(draft("empty", vec![]), "1", today()),
            Err(CatalogError::EmptyPlan)
        );
        assert_matches!(
            catalog.create_training(draft("zero", vec![entry("1", 0, 1)]), "1", today()),
            Err(CatalogError::Playback(PlaybackError::InvalidDuration(0)))
        );
        assert_matches!(
            catalog.update_training("1", draft("empty", vec![]), today()),
            Err(CatalogError::EmptyPlan)
        );
        assert_matches!(
            catalog.update_training("1", draft("zero", vec![entry("2", 0, 1)]), today()),
            Err(CatalogError::Playback(PlaybackError::InvalidDuration(0)))
        );
        // rejected edits leave the stored training playable
        assert!(catalog.load("abc123").is_ok());
    }

    #[test]
    fn test_delete_missing_training() {
        let catalog = Catalog::seeded().unwrap();
        assert_matches!(
            catalog.delete_training("7"),
            Err(CatalogError::TrainingNotFound(_))
        );
    }

    #[test]
    fn test_generate_share_id_alphabet() {
        let id = generate_share_id(&mut rand::thread_rng());
        assert_eq!(id.len(), 8);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_from_path_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let catalog = Catalog::seeded().unwrap();
        std::fs::write(&path, serde_json::to_string(&catalog).unwrap()).unwrap();
        assert_eq!(Catalog::from_path(&path).unwrap(), catalog);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        assert_matches!(
            Catalog::from_json_str("{ not json"),
            Err(CatalogError::Fixture(_))
        );
    }
}
